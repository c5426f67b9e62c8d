//! Postgres-backed page store.
//!
//! Runtime-checked `sqlx` queries against the schema in `src/db/migrations`.
//! Partial updates use `COALESCE` so absent patch fields keep their stored
//! value. Bulk reorder runs in one transaction and validates membership before
//! writing.

#[cfg(test)]
#[path = "postgres_test.rs"]
mod postgres_test;

use async_trait::async_trait;
use blocks::rest::{ComponentPatch, NewComponent, PageSummary};
use blocks::{ComponentId, PageComponentRow, ReorderItem};
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;

use super::store::{PageStore, StoreError, normalize_data, validate_page_key, validate_reorder, validate_type};

type ComponentTuple = (i64, String, String, i64, Value, bool);

const COMPONENT_COLUMNS: &str = "id, page_key, component_type, component_order, component_data, is_active";

fn to_row((id, page_key, component_type, component_order, component_data, is_active): ComponentTuple) -> PageComponentRow {
    PageComponentRow { id, page_key: Some(page_key), component_type, component_order, component_data, is_active }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn page_exists(&self, key: &str) -> Result<bool, StoreError> {
        let row = sqlx::query_as::<_, (String,)>("SELECT key FROM pages WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl PageStore for PgStore {
    async fn create_page(&self, key: &str) -> Result<PageSummary, StoreError> {
        validate_page_key(key)?;
        match sqlx::query("INSERT INTO pages (key) VALUES ($1)")
            .bind(key)
            .execute(&self.pool)
            .await
        {
            Ok(_) => {
                info!(page_key = %key, "page created");
                Ok(PageSummary { key: key.to_owned(), component_count: 0 })
            }
            Err(e) if is_unique_violation(&e) => Err(StoreError::PageExists(key.to_owned())),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_pages(&self) -> Result<Vec<PageSummary>, StoreError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT p.key, COUNT(c.id) FROM pages p \
             LEFT JOIN page_components c ON c.page_key = p.key \
             GROUP BY p.key ORDER BY p.key",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(key, component_count)| PageSummary { key, component_count })
            .collect())
    }

    async fn delete_page(&self, key: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM pages WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::PageNotFound(key.to_owned()));
        }
        info!(page_key = %key, "page deleted");
        Ok(())
    }

    async fn list_components(&self, page_key: &str) -> Result<Vec<PageComponentRow>, StoreError> {
        let rows = sqlx::query_as::<_, ComponentTuple>(&format!(
            "SELECT {COMPONENT_COLUMNS} FROM page_components \
             WHERE page_key = $1 ORDER BY component_order, id"
        ))
        .bind(page_key)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    async fn create_component(&self, new: NewComponent) -> Result<PageComponentRow, StoreError> {
        validate_type(&new.component_type)?;
        let data = normalize_data(new.component_data)?;
        if !self.page_exists(&new.page_key).await? {
            return Err(StoreError::PageNotFound(new.page_key));
        }
        let row = sqlx::query_as::<_, ComponentTuple>(&format!(
            "INSERT INTO page_components (page_key, component_type, component_order, component_data, is_active) \
             VALUES ($1, $2, COALESCE($3, (SELECT COALESCE(LEAST(MAX(component_order), 9223372036854775806) + 1, 0) \
                                          FROM page_components WHERE page_key = $1)), $4, $5) \
             RETURNING {COMPONENT_COLUMNS}"
        ))
        .bind(&new.page_key)
        .bind(&new.component_type)
        .bind(new.component_order)
        .bind(data)
        .bind(new.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;
        info!(page_key = %new.page_key, id = row.0, component_type = %new.component_type, "component created");
        Ok(to_row(row))
    }

    async fn update_component(&self, id: ComponentId, patch: ComponentPatch) -> Result<PageComponentRow, StoreError> {
        if let Some(component_type) = &patch.component_type {
            validate_type(component_type)?;
        }
        let data = match patch.component_data {
            Some(data) => Some(normalize_data(Some(data))?),
            None => None,
        };
        let row = sqlx::query_as::<_, ComponentTuple>(&format!(
            "UPDATE page_components SET \
               component_type = COALESCE($2, component_type), \
               component_data = COALESCE($3, component_data), \
               is_active = COALESCE($4, is_active), \
               updated_at = now() \
             WHERE id = $1 RETURNING {COMPONENT_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.component_type)
        .bind(data)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::ComponentNotFound(id))?;
        Ok(to_row(row))
    }

    async fn update_order(&self, id: ComponentId, order: i64) -> Result<PageComponentRow, StoreError> {
        let row = sqlx::query_as::<_, ComponentTuple>(&format!(
            "UPDATE page_components SET component_order = $2, updated_at = now() \
             WHERE id = $1 RETURNING {COMPONENT_COLUMNS}"
        ))
        .bind(id)
        .bind(order)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::ComponentNotFound(id))?;
        Ok(to_row(row))
    }

    async fn delete_component(&self, id: ComponentId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM page_components WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::ComponentNotFound(id));
        }
        Ok(())
    }

    async fn bulk_reorder(&self, page_key: &str, items: &[ReorderItem]) -> Result<Vec<PageComponentRow>, StoreError> {
        if !self.page_exists(page_key).await? {
            return Err(StoreError::PageNotFound(page_key.to_owned()));
        }
        let mut tx = self.pool.begin().await?;
        let page_ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM page_components WHERE page_key = $1 FOR UPDATE")
            .bind(page_key)
            .fetch_all(&mut *tx)
            .await?;
        let page_ids: Vec<ComponentId> = page_ids.into_iter().map(|(id,)| id).collect();
        validate_reorder(&page_ids, items)?;

        for item in items {
            sqlx::query("UPDATE page_components SET component_order = $2, updated_at = now() WHERE id = $1")
                .bind(item.id)
                .bind(item.order)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        info!(page_key = %page_key, count = items.len(), "components reordered");

        self.list_components(page_key).await
    }
}
