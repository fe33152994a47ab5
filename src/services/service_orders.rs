use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        equipment::EquipmentCategoryView,
        filled, matches_search, new_id,
        service_order::format_number,
        Checklist, Employee, EquipmentCategory, InspectionCategory, ServiceOrder, ServiceOrderInput,
        ServiceOrderStatus,
    },
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use super::{search_term, Repositories};

pub const EMPLOYEE_NOT_FOUND: &str = "Funcionário não encontrado";
pub const CATEGORY_NOT_FOUND: &str = "Categoria não encontrada";
pub const CHECKLIST_NOT_FOUND: &str = "Checklist não encontrado";

/// A service order joined with the records it references.
///
/// Dangling references leave the joined record empty and fall back to a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderDetail {
    #[serde(flatten)]
    pub order: ServiceOrder,
    pub employee: Option<Employee>,
    pub equipment_category: Option<EquipmentCategoryView>,
    pub inspection_category: Option<InspectionCategory>,
    pub checklist: Option<Checklist>,
    pub employee_name: String,
    pub equipment_category_name: String,
    pub inspection_category_name: String,
    pub checklist_name: String,
}

/// Checklists offered for an inspection category, and the selection that survives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSelection {
    pub options: Vec<Checklist>,
    pub selected: Option<String>,
}

/// Narrows `checklists` to those of `inspection_category_id`, in store order.
///
/// With no category the options are empty. `selected` survives only when it is one
/// of the options.
pub fn filter_checklists_by_inspection_category(
    checklists: &[Checklist],
    inspection_category_id: Option<&str>,
    selected: Option<&str>,
) -> ChecklistSelection {
    let options: Vec<Checklist> = match inspection_category_id.filter(|id| !id.is_empty()) {
        Some(category_id) => checklists
            .iter()
            .filter(|c| c.category_id == category_id)
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    let selected = selected
        .filter(|id| options.iter().any(|c| c.id == *id))
        .map(str::to_string);

    ChecklistSelection { options, selected }
}

/// Largest numeric prefix across `orders` plus one, formatted for `year`
pub fn next_number<'a, I>(orders: I, year: i32) -> String
where
    I: IntoIterator<Item = &'a ServiceOrder>,
{
    let max = orders
        .into_iter()
        .filter_map(ServiceOrder::sequence)
        .max()
        .unwrap_or(0);
    format_number(max.saturating_add(1), year)
}

struct OrderFields {
    number: String,
    employee_id: String,
    equipment_category_id: String,
    inspection_category_id: String,
    checklist_id: String,
    observations: String,
}

impl OrderFields {
    /// Presence checks in form order. The first missing field is reported.
    fn from_input(input: &ServiceOrderInput) -> Result<Self, ServiceError> {
        let required = |value: &Option<String>, field: &'static str, message: &str| {
            filled(value).ok_or_else(|| ServiceError::missing_field(field, message))
        };

        Ok(Self {
            number: required(&input.number, "number", "O número da OS é obrigatório.")?,
            employee_id: required(
                &input.employee_id,
                "employeeId",
                "Selecione um funcionário responsável.",
            )?,
            equipment_category_id: required(
                &input.equipment_category_id,
                "equipmentCategoryId",
                "Selecione uma categoria de equipamento.",
            )?,
            inspection_category_id: required(
                &input.inspection_category_id,
                "inspectionCategoryId",
                "Selecione uma categoria de inspeção.",
            )?,
            checklist_id: required(&input.checklist_id, "checklistId", "Selecione um checklist.")?,
            observations: input.observations.clone().unwrap_or_default(),
        })
    }
}

/// Records joined at projection time
struct Lookup {
    employees: HashMap<String, Employee>,
    inspection_categories: HashMap<String, InspectionCategory>,
    checklists: HashMap<String, Checklist>,
}

impl Lookup {
    fn detail(&self, order: ServiceOrder) -> ServiceOrderDetail {
        let employee = self.employees.get(&order.employee_id).cloned();
        let equipment_category =
            EquipmentCategory::from_id(&order.equipment_category_id).map(EquipmentCategoryView::from);
        let inspection_category = self
            .inspection_categories
            .get(&order.inspection_category_id)
            .cloned();
        let checklist = self.checklists.get(&order.checklist_id).cloned();

        ServiceOrderDetail {
            employee_name: employee
                .as_ref()
                .map_or_else(|| EMPLOYEE_NOT_FOUND.to_string(), |e| e.name.clone()),
            equipment_category_name: equipment_category
                .as_ref()
                .map_or_else(|| CATEGORY_NOT_FOUND.to_string(), |c| c.name.clone()),
            inspection_category_name: inspection_category
                .as_ref()
                .map_or_else(|| CATEGORY_NOT_FOUND.to_string(), |c| c.name.clone()),
            checklist_name: checklist
                .as_ref()
                .map_or_else(|| CHECKLIST_NOT_FOUND.to_string(), |c| c.name.clone()),
            order,
            employee,
            equipment_category,
            inspection_category,
            checklist,
        }
    }
}

/// Service order workflow: numbering, validation, status changes and joins
#[derive(Clone)]
pub struct ServiceOrderService {
    repos: Repositories,
    event_sender: Arc<EventSender>,
    enforce_unique_numbers: bool,
}

impl ServiceOrderService {
    pub fn new(
        repos: Repositories,
        event_sender: Arc<EventSender>,
        enforce_unique_numbers: bool,
    ) -> Self {
        Self {
            repos,
            event_sender,
            enforce_unique_numbers,
        }
    }

    async fn lookup(&self) -> Result<Lookup, ServiceError> {
        Ok(Lookup {
            employees: self
                .repos
                .employees
                .list()
                .await?
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect(),
            inspection_categories: self
                .repos
                .inspection_categories
                .list()
                .await?
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
            checklists: self
                .repos
                .checklists
                .list()
                .await?
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
        })
    }

    /// Reference checks. With `previous`, references equal to the stored ones are not
    /// re-checked and may dangle.
    async fn check_references(
        &self,
        fields: &OrderFields,
        previous: Option<&ServiceOrder>,
    ) -> Result<(), ServiceError> {
        let employee_changed = previous.map_or(true, |p| p.employee_id != fields.employee_id);
        let equipment_changed =
            previous.map_or(true, |p| p.equipment_category_id != fields.equipment_category_id);
        let inspection_changed =
            previous.map_or(true, |p| p.inspection_category_id != fields.inspection_category_id);
        let checklist_changed = previous.map_or(true, |p| p.checklist_id != fields.checklist_id);

        if employee_changed && self.repos.employees.get(&fields.employee_id).await?.is_none() {
            return Err(ServiceError::ValidationError(
                "Funcionário não encontrado.".to_string(),
            ));
        }
        if equipment_changed && EquipmentCategory::from_id(&fields.equipment_category_id).is_none()
        {
            return Err(ServiceError::ValidationError(
                "Categoria de equipamento inválida.".to_string(),
            ));
        }
        if inspection_changed
            && self
                .repos
                .inspection_categories
                .get(&fields.inspection_category_id)
                .await?
                .is_none()
        {
            return Err(ServiceError::ValidationError(
                "Categoria de inspeção não encontrada.".to_string(),
            ));
        }

        if checklist_changed || inspection_changed {
            let checklist = self
                .repos
                .checklists
                .get(&fields.checklist_id)
                .await?
                .ok_or_else(|| ServiceError::ValidationError("Checklist não encontrado.".to_string()))?;
            if checklist.category_id != fields.inspection_category_id {
                return Err(ServiceError::ValidationError(
                    "O checklist selecionado não pertence à categoria de inspeção.".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Number for the next order, based on the largest existing numeric prefix
    #[instrument(skip(self))]
    pub async fn generate_next_number(&self, year: i32) -> Result<String, ServiceError> {
        let orders = self.repos.service_orders.list().await?;
        Ok(next_number(&orders, year))
    }

    /// Orders joined with their references, filtered by status and by a search over
    /// number, employee, category names and observations
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<&str>,
        status: Option<ServiceOrderStatus>,
    ) -> Result<Vec<ServiceOrderDetail>, ServiceError> {
        let orders = self.repos.service_orders.list().await?;
        let lookup = self.lookup().await?;
        let term = search_term(search);

        Ok(orders
            .into_iter()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .map(|o| lookup.detail(o))
            .filter(|d| match &term {
                Some(term) => {
                    matches_search(&d.order.number, term)
                        || d.employee.as_ref().map_or(false, |e| matches_search(&e.name, term))
                        || d
                            .equipment_category
                            .as_ref()
                            .map_or(false, |c| matches_search(&c.name, term))
                        || d
                            .inspection_category
                            .as_ref()
                            .map_or(false, |c| matches_search(&c.name, term))
                        || matches_search(&d.order.observations, term)
                }
                None => true,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<ServiceOrder, ServiceError> {
        self.repos
            .service_orders
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Service order {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn detail(&self, id: &str) -> Result<ServiceOrderDetail, ServiceError> {
        let order = self.get(id).await?;
        Ok(self.lookup().await?.detail(order))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: ServiceOrderInput) -> Result<ServiceOrder, ServiceError> {
        let fields = OrderFields::from_input(&input)?;
        self.check_references(&fields, None).await?;

        let order = ServiceOrder {
            id: new_id(),
            number: fields.number,
            employee_id: fields.employee_id,
            equipment_category_id: fields.equipment_category_id,
            inspection_category_id: fields.inspection_category_id,
            checklist_id: fields.checklist_id,
            observations: fields.observations,
            created_at: Utc::now(),
            status: ServiceOrderStatus::Pending,
        };

        let enforce = self.enforce_unique_numbers;
        let order = self
            .repos
            .service_orders
            .mutate(move |orders| {
                check_number_collision(orders, &order, enforce)?;
                orders.push(order.clone());
                Ok(order)
            })
            .await?;

        info!(order_id = %order.id, number = %order.number, "service order created");
        self.event_sender
            .send_or_log(Event::ServiceOrderCreated {
                order_id: order.id.clone(),
                number: order.number.clone(),
            })
            .await;
        Ok(order)
    }

    /// Full update with the same validation as create. `id` and `createdAt` are kept.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: &str,
        input: ServiceOrderInput,
    ) -> Result<ServiceOrder, ServiceError> {
        let existing = self.get(id).await?;
        let fields = OrderFields::from_input(&input)?;
        self.check_references(&fields, Some(&existing)).await?;

        let order = ServiceOrder {
            id: existing.id.clone(),
            number: fields.number,
            employee_id: fields.employee_id,
            equipment_category_id: fields.equipment_category_id,
            inspection_category_id: fields.inspection_category_id,
            checklist_id: fields.checklist_id,
            observations: fields.observations,
            created_at: existing.created_at,
            status: input.status.unwrap_or(existing.status),
        };

        let enforce = self.enforce_unique_numbers;
        let (old_status, order) = self
            .repos
            .service_orders
            .mutate(move |orders| {
                check_number_collision(orders, &order, enforce)?;
                let slot = orders
                    .iter_mut()
                    .find(|o| o.id == order.id)
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Service order {} not found", order.id))
                    })?;
                let old_status = slot.status;
                *slot = order.clone();
                Ok((old_status, order))
            })
            .await?;

        self.event_sender
            .send_or_log(Event::ServiceOrderUpdated(order.id.clone()))
            .await;
        self.notify_status_change(&order, old_status).await;
        Ok(order)
    }

    /// Sets the status without re-validating anything else. Every transition is allowed.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: &str,
        status: ServiceOrderStatus,
    ) -> Result<ServiceOrder, ServiceError> {
        let id_owned = id.to_string();
        let (old_status, order) = self
            .repos
            .service_orders
            .mutate(move |orders| {
                let slot = orders
                    .iter_mut()
                    .find(|o| o.id == id_owned)
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Service order {} not found", id_owned))
                    })?;
                let old_status = slot.status;
                slot.status = status;
                Ok((old_status, slot.clone()))
            })
            .await?;

        self.notify_status_change(&order, old_status).await;
        Ok(order)
    }

    async fn notify_status_change(&self, order: &ServiceOrder, old_status: ServiceOrderStatus) {
        if old_status == order.status {
            return;
        }
        self.event_sender
            .send_or_log(Event::ServiceOrderStatusChanged {
                order_id: order.id.clone(),
                old_status,
                new_status: order.status,
            })
            .await;
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if self.repos.service_orders.delete(id).await? {
            self.event_sender
                .send_or_log(Event::ServiceOrderDeleted(id.to_string()))
                .await;
        }
        Ok(())
    }

    /// Checklist options for the order form
    #[instrument(skip(self))]
    pub async fn checklist_options(
        &self,
        inspection_category_id: Option<&str>,
        selected: Option<&str>,
    ) -> Result<ChecklistSelection, ServiceError> {
        let checklists = self.repos.checklists.list().await?;
        Ok(filter_checklists_by_inspection_category(
            &checklists,
            inspection_category_id,
            selected,
        ))
    }
}

/// Numbers are advisory-unique: a collision is logged, or rejected when enforced
fn check_number_collision(
    orders: &[ServiceOrder],
    order: &ServiceOrder,
    enforce: bool,
) -> Result<(), ServiceError> {
    let collides = orders
        .iter()
        .any(|o| o.id != order.id && o.number.trim() == order.number);
    if !collides {
        return Ok(());
    }
    if enforce {
        return Err(ServiceError::Conflict(format!(
            "Já existe uma OS com o número {}.",
            order.number
        )));
    }
    warn!(number = %order.number, "service order number already in use");
    Ok(())
}
