//! Domain records persisted in the entity collections.
//!
//! Field names serialize in camelCase so stored collections stay compatible with the
//! blobs written by earlier versions of the application.

pub mod checklist;
pub mod company;
pub mod employee;
pub mod equipment;
pub mod inspection_category;
pub mod service_order;

pub use checklist::{AnswerKind, Checklist, ChecklistInput, ChecklistItem};
pub use company::{Company, CompanyInput, CompanyLogo, CompanyProfile, LogoPosition, UserProfile};
pub use employee::{Employee, EmployeeInput};
pub use equipment::{Equipment, EquipmentCategory, EquipmentDetails, EquipmentInput};
pub use inspection_category::{InspectionCategory, InspectionCategoryInput};
pub use service_order::{ServiceOrder, ServiceOrderInput, ServiceOrderStatus};

/// Trimmed value of an optional form field, `None` when absent or blank
pub(crate) fn filled(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Case-insensitive substring match used by list searches
pub(crate) fn matches_search(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
