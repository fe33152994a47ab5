use crate::repositories::Identified;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};
use utoipa::ToSchema;

/// Lifecycle status of a service order.
///
/// Older stored orders use the Portuguese values, which are still accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceOrderStatus {
    #[default]
    #[serde(alias = "pendente")]
    Pending,
    #[serde(alias = "em_andamento")]
    InProgress,
    #[serde(alias = "concluida")]
    Completed,
    #[serde(alias = "cancelada")]
    Canceled,
}

impl ServiceOrderStatus {
    /// Label used in printed documents
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::InProgress => "Em Andamento",
            Self::Completed => "Concluída",
            Self::Canceled => "Cancelada",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: String,
    /// `NNNNN/YYYY`
    pub number: String,
    pub employee_id: String,
    pub equipment_category_id: String,
    pub inspection_category_id: String,
    pub checklist_id: String,
    #[serde(default)]
    pub observations: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ServiceOrderStatus,
}

impl ServiceOrder {
    /// Leading decimal digits of the part before the first `/`
    pub fn sequence(&self) -> Option<u64> {
        parse_sequence(&self.number)
    }
}

impl Identified for ServiceOrder {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Parses the leading digits of an order number prefix. `"00042/2024"` gives 42,
/// `"12abc/2024"` gives 12 and `"abc/2024"` gives `None`.
pub fn parse_sequence(number: &str) -> Option<u64> {
    let prefix = number.split('/').next().unwrap_or_default();
    let digits: String = prefix
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    // Saturate absurdly long digit runs instead of failing
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Formats a sequence as `NNNNN/YYYY`
pub fn format_number(sequence: u64, year: i32) -> String {
    format!("{:05}/{}", sequence, year)
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderInput {
    pub number: Option<String>,
    pub employee_id: Option<String>,
    pub equipment_category_id: Option<String>,
    pub inspection_category_id: Option<String>,
    pub checklist_id: Option<String>,
    pub observations: Option<String>,
    /// Ignored on create, where orders always start pending
    pub status: Option<ServiceOrderStatus>,
}
