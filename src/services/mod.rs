pub mod checklists;
pub mod company;
pub mod dashboard;
pub mod documents;
pub mod employees;
pub mod equipment;
pub mod inspection_categories;
pub mod service_orders;

use crate::models::{Checklist, Employee, Equipment, InspectionCategory, ServiceOrder};
use crate::repositories::{keys, CollectionRepository, CollectionStore};
use std::sync::Arc;

/// One repository per entity collection, all backed by the same store.
#[derive(Clone)]
pub struct Repositories {
    pub employees: Arc<CollectionRepository<Employee>>,
    pub equipment: Arc<CollectionRepository<Equipment>>,
    pub inspection_categories: Arc<CollectionRepository<InspectionCategory>>,
    pub checklists: Arc<CollectionRepository<Checklist>>,
    pub service_orders: Arc<CollectionRepository<ServiceOrder>>,
}

impl Repositories {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            employees: Arc::new(CollectionRepository::new(keys::EMPLOYEES, store.clone())),
            equipment: Arc::new(CollectionRepository::new(keys::EQUIPMENTS, store.clone())),
            inspection_categories: Arc::new(CollectionRepository::new(
                keys::INSPECTION_CATEGORIES,
                store.clone(),
            )),
            checklists: Arc::new(CollectionRepository::new(keys::CHECKLISTS, store.clone())),
            service_orders: Arc::new(CollectionRepository::new(keys::SERVICE_ORDERS, store)),
        }
    }
}

/// Lowercased, trimmed search term. Blank terms match everything.
pub(crate) fn search_term(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Repositories;
    use crate::events::{Event, EventSender};
    use crate::repositories::InMemoryCollectionStore;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    pub fn repositories() -> Repositories {
        Repositories::new(Arc::new(InMemoryCollectionStore::new()))
    }

    pub fn events() -> (Arc<EventSender>, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(64);
        (Arc::new(EventSender::new(tx)), rx)
    }
}
