pub mod checklists;
pub mod common;
pub mod company;
pub mod dashboard;
pub mod employees;
pub mod equipment;
pub mod inspection_categories;
pub mod service_orders;

use crate::backend::CompanyDirectory;
use crate::events::EventSender;
use crate::services::{
    checklists::ChecklistService, company::CompanyService, dashboard::DashboardService,
    employees::EmployeeService, equipment::EquipmentService,
    inspection_categories::InspectionCategoryService, service_orders::ServiceOrderService,
    Repositories,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer used by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub employees: Arc<EmployeeService>,
    pub equipment: Arc<EquipmentService>,
    pub inspection_categories: Arc<InspectionCategoryService>,
    pub checklists: Arc<ChecklistService>,
    pub service_orders: Arc<ServiceOrderService>,
    pub dashboard: Arc<DashboardService>,
    pub company: Arc<CompanyService>,
}

impl AppServices {
    pub fn new(
        repos: Repositories,
        event_sender: Arc<EventSender>,
        directory: Option<Arc<dyn CompanyDirectory>>,
        enforce_unique_order_numbers: bool,
    ) -> Self {
        Self {
            employees: Arc::new(EmployeeService::new(
                repos.employees.clone(),
                event_sender.clone(),
            )),
            equipment: Arc::new(EquipmentService::new(
                repos.equipment.clone(),
                event_sender.clone(),
            )),
            inspection_categories: Arc::new(InspectionCategoryService::new(
                repos.inspection_categories.clone(),
                event_sender.clone(),
            )),
            checklists: Arc::new(ChecklistService::new(
                repos.checklists.clone(),
                repos.inspection_categories.clone(),
                event_sender.clone(),
            )),
            service_orders: Arc::new(ServiceOrderService::new(
                repos.clone(),
                event_sender.clone(),
                enforce_unique_order_numbers,
            )),
            dashboard: Arc::new(DashboardService::new(repos)),
            company: Arc::new(CompanyService::new(directory, event_sender)),
        }
    }
}
