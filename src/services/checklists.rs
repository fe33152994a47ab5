use crate::{
    catalog,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{filled, matches_search, new_id, Checklist, ChecklistInput, InspectionCategory},
    repositories::CollectionRepository,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::search_term;

/// Checklists are instantiated from the template catalog using the name of their
/// inspection category.
#[derive(Clone)]
pub struct ChecklistService {
    repository: Arc<CollectionRepository<Checklist>>,
    inspection_categories: Arc<CollectionRepository<InspectionCategory>>,
    event_sender: Arc<EventSender>,
}

struct ValidatedChecklist {
    category: InspectionCategory,
    name: String,
}

impl ChecklistService {
    pub fn new(
        repository: Arc<CollectionRepository<Checklist>>,
        inspection_categories: Arc<CollectionRepository<InspectionCategory>>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            repository,
            inspection_categories,
            event_sender,
        }
    }

    async fn validate(&self, input: &ChecklistInput) -> Result<ValidatedChecklist, ServiceError> {
        let category_id = filled(&input.category_id).ok_or_else(|| {
            ServiceError::missing_field("categoryId", "Selecione uma categoria de inspeção.")
        })?;
        let name = filled(&input.name).ok_or_else(|| {
            ServiceError::missing_field("name", "O nome do checklist é obrigatório.")
        })?;
        let category = self
            .inspection_categories
            .get(&category_id)
            .await?
            .ok_or_else(|| ServiceError::ValidationError("Categoria inválida.".to_string()))?;

        Ok(ValidatedChecklist { category, name })
    }

    /// Lists checklists matching `search` on their name or their category's name,
    /// optionally restricted to one inspection category
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<&str>,
        category_id: Option<&str>,
    ) -> Result<Vec<Checklist>, ServiceError> {
        let checklists = self.repository.list().await?;
        let category_names: HashMap<String, String> = self
            .inspection_categories
            .list()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let term = search_term(search);
        let category_id = category_id.map(str::trim).filter(|c| !c.is_empty());

        Ok(checklists
            .into_iter()
            .filter(|c| category_id.map_or(true, |id| c.category_id == id))
            .filter(|c| match &term {
                Some(term) => {
                    matches_search(&c.name, term)
                        || category_names
                            .get(&c.category_id)
                            .map_or(false, |name| matches_search(name, term))
                }
                None => true,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Checklist, ServiceError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Checklist {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: ChecklistInput) -> Result<Checklist, ServiceError> {
        let validated = self.validate(&input).await?;
        let checklist = Checklist {
            id: new_id(),
            items: catalog::instantiate(&validated.category.name),
            category_id: validated.category.id,
            name: validated.name,
        };
        let checklist = self.repository.insert(checklist).await?;

        info!(
            checklist_id = %checklist.id,
            items = checklist.items.len(),
            "checklist created"
        );
        self.event_sender
            .send_or_log(Event::ChecklistCreated(checklist.id.clone()))
            .await;
        Ok(checklist)
    }

    /// Updates name and category. Items are re-instantiated from the catalog when
    /// either changed, otherwise the stored items are kept.
    #[instrument(skip(self))]
    pub async fn update(&self, id: &str, input: ChecklistInput) -> Result<Checklist, ServiceError> {
        let existing = self.get(id).await?;
        let validated = self.validate(&input).await?;

        let changed =
            existing.name != validated.name || existing.category_id != validated.category.id;
        let items = if changed {
            catalog::instantiate(&validated.category.name)
        } else {
            existing.items
        };
        let checklist = Checklist {
            id: existing.id,
            category_id: validated.category.id,
            name: validated.name,
            items,
        };
        let checklist = self.repository.replace(id, checklist).await?;

        self.event_sender
            .send_or_log(Event::ChecklistUpdated(checklist.id.clone()))
            .await;
        Ok(checklist)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if self.repository.delete(id).await? {
            self.event_sender
                .send_or_log(Event::ChecklistDeleted(id.to_string()))
                .await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{inspection_categories::InspectionCategoryService, test_support};
    use assert_matches::assert_matches;

    async fn service() -> ChecklistService {
        let repos = test_support::repositories();
        let (events, _rx) = test_support::events();
        InspectionCategoryService::new(repos.inspection_categories.clone(), events.clone())
            .seed_defaults()
            .await
            .unwrap();
        ChecklistService::new(repos.checklists, repos.inspection_categories, events)
    }

    fn input(category_id: Option<&str>, name: Option<&str>) -> ChecklistInput {
        ChecklistInput {
            category_id: category_id.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn items_come_from_the_category_template() {
        let service = service().await;
        let checklist = service
            .create(input(Some("1"), Some("Ronda Geradores Bloco A")))
            .await
            .unwrap();

        assert_eq!(checklist.items.len(), 5);
        assert_eq!(checklist.items[0].id, "g1");
    }

    #[tokio::test]
    async fn validation_order() {
        let service = service().await;

        assert_matches!(
            service.create(input(None, None)).await,
            Err(ServiceError::MissingField { field: "categoryId", .. })
        );
        assert_matches!(
            service.create(input(Some("1"), Some("  "))).await,
            Err(ServiceError::MissingField { field: "name", .. })
        );
        assert_matches!(
            service.create(input(Some("99"), Some("Checklist"))).await,
            Err(ServiceError::ValidationError(msg)) if msg == "Categoria inválida."
        );
    }

    #[tokio::test]
    async fn update_reinstantiates_items_only_when_changed() {
        let service = service().await;
        let created = service
            .create(input(Some("1"), Some("Geradores")))
            .await
            .unwrap();

        let same = service
            .update(&created.id, input(Some("1"), Some("Geradores")))
            .await
            .unwrap();
        assert_eq!(same.items, created.items);

        let moved = service
            .update(&created.id, input(Some("4"), Some("Elevadores")))
            .await
            .unwrap();
        assert_eq!(moved.items.len(), 11);
        assert_eq!(moved.items[0].id, "el1");
    }

    #[tokio::test]
    async fn list_searches_category_names() {
        let service = service().await;
        let boiler = service
            .create(input(Some("3"), Some("Caldeira central")))
            .await
            .unwrap();
        service
            .create(input(Some("1"), Some("Geradores")))
            .await
            .unwrap();

        assert_eq!(service.list(Some("boiler"), None).await.unwrap(), vec![boiler.clone()]);
        assert_eq!(service.list(None, Some("3")).await.unwrap(), vec![boiler]);
    }
}
