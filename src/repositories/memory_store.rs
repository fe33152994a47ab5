use super::{CollectionStore, StoredCollection};
use crate::errors::ServiceError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local collection store, used by unit tests
#[derive(Debug, Default)]
pub struct InMemoryCollectionStore {
    collections: RwLock<HashMap<String, StoredCollection>>,
}

impl InMemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for InMemoryCollectionStore {
    async fn load(&self, name: &str) -> Result<Option<StoredCollection>, ServiceError> {
        Ok(self.collections.read().await.get(name).cloned())
    }

    async fn version(&self, name: &str) -> Result<Option<i64>, ServiceError> {
        Ok(self.collections.read().await.get(name).map(|c| c.version))
    }

    async fn save(
        &self,
        name: &str,
        payload: String,
        expected_version: Option<i64>,
    ) -> Result<i64, ServiceError> {
        let mut collections = self.collections.write().await;
        let current = collections.get(name).map(|c| c.version);

        if current != expected_version {
            return Err(ServiceError::ConcurrentModification(name.to_string()));
        }

        let version = current.unwrap_or(0) + 1;
        collections.insert(name.to_string(), StoredCollection { payload, version });
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn versions_advance_and_stale_writes_fail() {
        let store = InMemoryCollectionStore::new();
        assert!(store.load("employees").await.unwrap().is_none());

        let v1 = store.save("employees", "[]".into(), None).await.unwrap();
        assert_eq!(v1, 1);

        let v2 = store.save("employees", "[1]".into(), Some(1)).await.unwrap();
        assert_eq!(v2, 2);

        assert_matches!(
            store.save("employees", "[2]".into(), Some(1)).await,
            Err(ServiceError::ConcurrentModification(name)) if name == "employees"
        );
        assert_matches!(
            store.save("employees", "[2]".into(), None).await,
            Err(ServiceError::ConcurrentModification(_))
        );

        let stored = store.load("employees").await.unwrap().unwrap();
        assert_eq!(stored.payload, "[1]");
        assert_eq!(store.version("employees").await.unwrap(), Some(2));
        assert_eq!(store.version("checklists").await.unwrap(), None);
        assert_eq!(stored.version, 2);
    }
}
