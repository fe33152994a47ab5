use crate::errors::ServiceError;
use async_trait::async_trait;

pub mod collection;
pub mod memory_store;
pub mod sql_store;

pub use collection::CollectionRepository;
pub use memory_store::InMemoryCollectionStore;
pub use sql_store::SqlCollectionStore;

/// Collection keys used by the entity repositories
pub mod keys {
    pub const EMPLOYEES: &str = "employees";
    pub const EQUIPMENTS: &str = "equipments";
    pub const INSPECTION_CATEGORIES: &str = "inspectionCategories";
    pub const CHECKLISTS: &str = "checklists";
    pub const SERVICE_ORDERS: &str = "serviceOrders";
}

/// A persisted collection blob and the version it was written at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCollection {
    pub payload: String,
    pub version: i64,
}

/// Persistence adapter for whole-collection blobs.
///
/// `save` is conditional: `expected_version` is the version the caller loaded, or
/// `None` when the collection was never persisted. A mismatch yields
/// [`ServiceError::ConcurrentModification`] and leaves storage untouched.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn load(&self, name: &str) -> Result<Option<StoredCollection>, ServiceError>;

    /// Current version of `name` without reading its payload
    async fn version(&self, name: &str) -> Result<Option<i64>, ServiceError>;

    async fn save(
        &self,
        name: &str,
        payload: String,
        expected_version: Option<i64>,
    ) -> Result<i64, ServiceError>;
}

/// Records stored in a [`CollectionRepository`] expose their id
pub trait Identified {
    fn id(&self) -> &str;
}
