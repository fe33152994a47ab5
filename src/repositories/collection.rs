use super::{CollectionStore, Identified};
use crate::errors::ServiceError;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug)]
struct CacheState<T> {
    items: Vec<T>,
    /// Version the cache was loaded at. `None` means never persisted.
    version: Option<i64>,
    loaded: bool,
}

/// Cached, write-through repository over one persisted collection.
///
/// Reads are served from the cache once its version matches storage. Every mutation is applied to a copy, persisted
/// as a whole and only then swapped into the cache, so a failed save leaves both the
/// cache and storage as they were.
pub struct CollectionRepository<T> {
    name: &'static str,
    store: Arc<dyn CollectionStore>,
    state: RwLock<CacheState<T>>,
}

impl<T> CollectionRepository<T>
where
    T: Identified + Clone + Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(name: &'static str, store: Arc<dyn CollectionStore>) -> Self {
        Self {
            name,
            store,
            state: RwLock::new(CacheState {
                items: Vec::new(),
                version: None,
                loaded: false,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    async fn reload(&self, state: &mut CacheState<T>) -> Result<(), ServiceError> {
        match self.store.load(self.name).await? {
            Some(stored) => {
                state.items = serde_json::from_str(&stored.payload)?;
                state.version = Some(stored.version);
            }
            None => {
                state.items = Vec::new();
                state.version = None;
            }
        }
        state.loaded = true;
        debug!(
            collection = self.name,
            items = state.items.len(),
            version = ?state.version,
            "collection loaded"
        );
        Ok(())
    }

    /// Reloads the cache when storage holds a different version than the one cached.
    ///
    /// Other writers sharing the store (other server instances) become visible on the
    /// next read.
    async fn refresh(&self) -> Result<(), ServiceError> {
        let stored = self.store.version(self.name).await?;
        {
            let state = self.state.read().await;
            if state.loaded && state.version == stored {
                return Ok(());
            }
        }
        let mut state = self.state.write().await;
        if !state.loaded || state.version != stored {
            self.reload(&mut state).await?;
        }
        Ok(())
    }

    /// All records in stored order
    pub async fn list(&self) -> Result<Vec<T>, ServiceError> {
        self.refresh().await?;
        Ok(self.state.read().await.items.clone())
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>, ServiceError> {
        self.refresh().await?;
        Ok(self
            .state
            .read()
            .await
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned())
    }

    /// True once the collection has been written at least once
    pub async fn is_persisted(&self) -> Result<bool, ServiceError> {
        self.refresh().await?;
        Ok(self.state.read().await.version.is_some())
    }

    /// Applies `f` to a copy of the collection and persists the result.
    ///
    /// An error from `f` aborts without touching storage. A version conflict reloads
    /// the cache from storage and is returned as `ConcurrentModification`.
    pub async fn mutate<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let mut state = self.state.write().await;
        if !state.loaded {
            self.reload(&mut state).await?;
        }

        let mut items = state.items.clone();
        let result = f(&mut items)?;
        let payload = serde_json::to_string(&items)?;

        match self.store.save(self.name, payload, state.version).await {
            Ok(version) => {
                state.items = items;
                state.version = Some(version);
                Ok(result)
            }
            Err(ServiceError::ConcurrentModification(name)) => {
                warn!(collection = self.name, "stale collection version, reloading");
                if let Err(e) = self.reload(&mut state).await {
                    warn!(collection = self.name, error = %e, "reload after conflict failed");
                    state.loaded = false;
                }
                Err(ServiceError::ConcurrentModification(name))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn insert(&self, item: T) -> Result<T, ServiceError> {
        self.mutate(move |items| {
            items.push(item.clone());
            Ok(item)
        })
        .await
    }

    /// Replaces the record with `id`. Missing ids are `NotFound`.
    pub async fn replace(&self, id: &str, item: T) -> Result<T, ServiceError> {
        let name = self.name;
        self.mutate(move |items| {
            let slot = items
                .iter_mut()
                .find(|existing| existing.id() == id)
                .ok_or_else(|| ServiceError::NotFound(format!("{} record {} not found", name, id)))?;
            *slot = item.clone();
            Ok(item)
        })
        .await
    }

    /// Removes the record with `id`. Returns whether anything was removed.
    ///
    /// Deleting a missing id succeeds without writing.
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        if self.get(id).await?.is_none() {
            debug!(collection = self.name, id, "delete of missing id ignored");
            return Ok(false);
        }

        self.mutate(|items| {
            let before = items.len();
            items.retain(|item| item.id() != id);
            Ok(items.len() != before)
        })
        .await
    }

    /// Persists `items` only when the collection has never been written.
    pub async fn seed_if_unpersisted(&self, items: Vec<T>) -> Result<bool, ServiceError> {
        if self.is_persisted().await? {
            return Ok(false);
        }

        let mut state = self.state.write().await;
        if state.version.is_some() {
            return Ok(false);
        }

        let payload = serde_json::to_string(&items)?;
        let version = self.store.save(self.name, payload, None).await?;
        state.items = items;
        state.version = Some(version);
        Ok(true)
    }
}
