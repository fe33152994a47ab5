use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        equipment::EquipmentCategoryView, matches_search, new_id, Equipment, EquipmentCategory,
        EquipmentInput,
    },
    repositories::CollectionRepository,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::search_term;

/// Equipment inventory plus the fixed, read-only category list
#[derive(Clone)]
pub struct EquipmentService {
    repository: Arc<CollectionRepository<Equipment>>,
    event_sender: Arc<EventSender>,
}

impl EquipmentService {
    pub fn new(
        repository: Arc<CollectionRepository<Equipment>>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            repository,
            event_sender,
        }
    }

    pub fn categories(&self) -> Vec<EquipmentCategoryView> {
        EquipmentCategory::all()
            .into_iter()
            .map(EquipmentCategoryView::from)
            .collect()
    }

    pub fn category(&self, id: &str) -> Result<EquipmentCategoryView, ServiceError> {
        EquipmentCategory::from_id(id)
            .map(EquipmentCategoryView::from)
            .ok_or_else(|| ServiceError::NotFound(format!("Equipment category {} not found", id)))
    }

    /// Lists equipment matching `search` on TAG, name or location, optionally
    /// restricted to one category
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Equipment>, ServiceError> {
        let category = match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(id) => Some(EquipmentCategory::from_id(id).ok_or_else(|| {
                ServiceError::ValidationError(format!("Unknown equipment category: {}", id))
            })?),
            None => None,
        };
        let term = search_term(search);

        Ok(self
            .repository
            .list()
            .await?
            .into_iter()
            .filter(|e| category.map_or(true, |c| e.category() == c))
            .filter(|e| match &term {
                Some(term) => {
                    matches_search(&e.tag, term)
                        || matches_search(&e.location, term)
                        || e.details.name().map_or(false, |n| matches_search(n, term))
                }
                None => true,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Equipment, ServiceError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Equipment {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: EquipmentInput) -> Result<Equipment, ServiceError> {
        let equipment = input.into_equipment(new_id())?;
        let equipment = self.repository.insert(equipment).await?;

        self.event_sender
            .send_or_log(Event::EquipmentCreated(equipment.id.clone()))
            .await;
        info!(
            equipment_id = %equipment.id,
            tag = %equipment.tag,
            category = equipment.category().id(),
            "equipment registered"
        );
        Ok(equipment)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: &str, input: EquipmentInput) -> Result<Equipment, ServiceError> {
        let equipment = input.into_equipment(id.to_string())?;
        let equipment = self.repository.replace(id, equipment).await?;

        self.event_sender
            .send_or_log(Event::EquipmentUpdated(equipment.id.clone()))
            .await;
        Ok(equipment)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if self.repository.delete(id).await? {
            self.event_sender
                .send_or_log(Event::EquipmentDeleted(id.to_string()))
                .await;
        }
        Ok(())
    }
}
