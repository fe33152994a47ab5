use crate::{
    errors::ServiceError,
    models::{EquipmentCategory, InspectionCategory, ServiceOrder, ServiceOrderStatus},
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;
use utoipa::ToSchema;

use super::Repositories;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub canceled: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityTotals {
    pub employees: usize,
    pub equipment: usize,
    pub checklists: usize,
    pub inspection_categories: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryCount {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Orders created in one month, split by inspection kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyOrders {
    /// 1-based month
    pub month: u32,
    pub label: String,
    pub preventive: usize,
    pub routine: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub year: i32,
    pub status: StatusCounts,
    pub totals: EntityTotals,
    pub equipment_by_category: Vec<CategoryCount>,
    pub monthly: Vec<MonthlyOrders>,
}

pub fn status_counts(orders: &[ServiceOrder]) -> StatusCounts {
    let mut counts = StatusCounts {
        total: orders.len(),
        ..Default::default()
    };
    for order in orders {
        match order.status {
            ServiceOrderStatus::Pending => counts.pending += 1,
            ServiceOrderStatus::InProgress => counts.in_progress += 1,
            ServiceOrderStatus::Completed => counts.completed += 1,
            ServiceOrderStatus::Canceled => counts.canceled += 1,
        }
    }
    counts
}

/// Twelve months of `year`. Orders whose inspection category is missing count as
/// routine.
pub fn monthly_orders(
    orders: &[ServiceOrder],
    categories: &[InspectionCategory],
    year: i32,
) -> Vec<MonthlyOrders> {
    let preventive: HashMap<&str, bool> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.is_preventive()))
        .collect();

    let mut months: Vec<MonthlyOrders> = MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| MonthlyOrders {
            month: i as u32 + 1,
            label: (*label).to_string(),
            preventive: 0,
            routine: 0,
        })
        .collect();

    for order in orders.iter().filter(|o| o.created_at.year() == year) {
        let slot = &mut months[order.created_at.month0() as usize];
        if preventive
            .get(order.inspection_category_id.as_str())
            .copied()
            .unwrap_or(false)
        {
            slot.preventive += 1;
        } else {
            slot.routine += 1;
        }
    }
    months
}

/// Dashboard projection, recomputed from the stores on every call
#[derive(Clone)]
pub struct DashboardService {
    repos: Repositories,
}

impl DashboardService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    #[instrument(skip(self))]
    pub async fn summary(&self, year: i32) -> Result<DashboardSummary, ServiceError> {
        let orders = self.repos.service_orders.list().await?;
        let equipment = self.repos.equipment.list().await?;
        let categories = self.repos.inspection_categories.list().await?;
        let checklists = self.repos.checklists.list().await?;
        let employees = self.repos.employees.list().await?;

        let equipment_by_category = EquipmentCategory::all()
            .into_iter()
            .map(|category| CategoryCount {
                id: category.id().to_string(),
                name: category.display_name().to_string(),
                count: equipment.iter().filter(|e| e.category() == category).count(),
            })
            .collect();

        Ok(DashboardSummary {
            year,
            status: status_counts(&orders),
            totals: EntityTotals {
                employees: employees.len(),
                equipment: equipment.len(),
                checklists: checklists.len(),
                inspection_categories: categories.len(),
            },
            equipment_by_category,
            monthly: monthly_orders(&orders, &categories, year),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn order(id: &str, category: &str, month: u32, year: i32, status: ServiceOrderStatus) -> ServiceOrder {
        ServiceOrder {
            id: id.into(),
            number: format!("{:05}/{}", id.len(), year),
            employee_id: "e1".into(),
            equipment_category_id: "aircon".into(),
            inspection_category_id: category.into(),
            checklist_id: "c1".into(),
            observations: String::new(),
            created_at: Utc.with_ymd_and_hms(year, month, 10, 9, 0, 0).unwrap(),
            status,
        }
    }

    #[test]
    fn status_counts_cover_every_status() {
        let orders = vec![
            order("a", "1", 1, 2025, ServiceOrderStatus::Pending),
            order("b", "1", 1, 2025, ServiceOrderStatus::Pending),
            order("c", "1", 2, 2025, ServiceOrderStatus::Canceled),
        ];
        assert_eq!(
            status_counts(&orders),
            StatusCounts {
                pending: 2,
                in_progress: 0,
                completed: 0,
                canceled: 1,
                total: 3
            }
        );
    }

    #[test]
    fn monthly_split_uses_category_names() {
        let categories = InspectionCategory::defaults();
        let orders = vec![
            order("a", "5", 3, 2025, ServiceOrderStatus::Pending),
            order("b", "1", 3, 2025, ServiceOrderStatus::Completed),
            order("c", "deleted", 3, 2025, ServiceOrderStatus::Pending),
            order("d", "6", 12, 2025, ServiceOrderStatus::Pending),
            order("e", "6", 12, 2024, ServiceOrderStatus::Pending),
        ];

        let months = monthly_orders(&orders, &categories, 2025);
        assert_eq!(months.len(), 12);
        assert_eq!(months[2].label, "Mar");
        assert_eq!((months[2].preventive, months[2].routine), (1, 2));
        assert_eq!((months[11].preventive, months[11].routine), (1, 0));
        assert_eq!(months[0].preventive + months[0].routine, 0);
    }
}
