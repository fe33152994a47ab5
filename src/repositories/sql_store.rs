use super::{CollectionStore, StoredCollection};
use crate::db::DbPool;
use crate::entities::stored_collection::{self, Column, Entity as Collections};
use crate::errors::ServiceError;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::instrument;

/// Collection store backed by the `collections` table
#[derive(Clone, Debug)]
pub struct SqlCollectionStore {
    db: Arc<DbPool>,
}

impl SqlCollectionStore {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CollectionStore for SqlCollectionStore {
    #[instrument(skip(self))]
    async fn load(&self, name: &str) -> Result<Option<StoredCollection>, ServiceError> {
        let row = Collections::find_by_id(name.to_string())
            .one(&*self.db)
            .await?;

        Ok(row.map(|model| StoredCollection {
            payload: model.payload,
            version: model.version,
        }))
    }

    #[instrument(skip(self))]
    async fn version(&self, name: &str) -> Result<Option<i64>, ServiceError> {
        let version = Collections::find_by_id(name.to_string())
            .select_only()
            .column(Column::Version)
            .into_tuple::<i64>()
            .one(&*self.db)
            .await?;
        Ok(version)
    }

    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    async fn save(
        &self,
        name: &str,
        payload: String,
        expected_version: Option<i64>,
    ) -> Result<i64, ServiceError> {
        let db = &*self.db;
        let now = Utc::now();

        let affected = crate::tracing::with_timing("collection.save", move || async move {
            match expected_version {
                None => {
                    let row = stored_collection::ActiveModel {
                        name: Set(name.to_string()),
                        payload: Set(payload),
                        version: Set(1),
                        updated_at: Set(now),
                    };
                    Collections::insert(row)
                        .on_conflict(OnConflict::column(Column::Name).do_nothing().to_owned())
                        .exec_without_returning(db)
                        .await
                }
                Some(version) => Collections::update_many()
                    .col_expr(Column::Payload, Expr::value(payload))
                    .col_expr(Column::Version, Expr::value(version + 1))
                    .col_expr(Column::UpdatedAt, Expr::value(now))
                    .filter(Column::Name.eq(name))
                    .filter(Column::Version.eq(version))
                    .exec(db)
                    .await
                    .map(|res| res.rows_affected),
            }
        })
        .await?;

        if affected == 0 {
            return Err(ServiceError::ConcurrentModification(name.to_string()));
        }

        Ok(expected_version.unwrap_or(0) + 1)
    }
}
