use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{matches_search, new_id, InspectionCategory, InspectionCategoryInput},
    repositories::CollectionRepository,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::search_term;

#[derive(Clone)]
pub struct InspectionCategoryService {
    repository: Arc<CollectionRepository<InspectionCategory>>,
    event_sender: Arc<EventSender>,
}

impl InspectionCategoryService {
    pub fn new(
        repository: Arc<CollectionRepository<InspectionCategory>>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            repository,
            event_sender,
        }
    }

    /// Writes the default categories when the collection has never been persisted.
    ///
    /// Returns whether seeding happened. An emptied collection is not re-seeded.
    #[instrument(skip(self))]
    pub async fn seed_defaults(&self) -> Result<bool, ServiceError> {
        let defaults = InspectionCategory::defaults();
        let count = defaults.len();
        let seeded = self.repository.seed_if_unpersisted(defaults).await?;
        if seeded {
            info!(count, "default inspection categories seeded");
            self.event_sender
                .send_or_log(Event::InspectionCategoriesSeeded(count))
                .await;
        }
        Ok(seeded)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<InspectionCategory>, ServiceError> {
        let categories = self.repository.list().await?;
        Ok(match search_term(search) {
            Some(term) => categories
                .into_iter()
                .filter(|c| matches_search(&c.name, &term))
                .collect(),
            None => categories,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<InspectionCategory, ServiceError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inspection category {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        input: InspectionCategoryInput,
    ) -> Result<InspectionCategory, ServiceError> {
        let category = input.into_category(new_id())?;
        let category = self.repository.insert(category).await?;

        self.event_sender
            .send_or_log(Event::InspectionCategoryCreated(category.id.clone()))
            .await;
        Ok(category)
    }

    /// Renames a category. Existing checklists keep the items they were created with.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: &str,
        input: InspectionCategoryInput,
    ) -> Result<InspectionCategory, ServiceError> {
        let category = input.into_category(id.to_string())?;
        let category = self.repository.replace(id, category).await?;

        self.event_sender
            .send_or_log(Event::InspectionCategoryUpdated(category.id.clone()))
            .await;
        Ok(category)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if self.repository.delete(id).await? {
            self.event_sender
                .send_or_log(Event::InspectionCategoryDeleted(id.to_string()))
                .await;
        }
        Ok(())
    }
}
