//! PostgreSQL document store keeping every collection in one JSONB table.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use docrepo_core::error::{AppError, ErrorKind};
use docrepo_core::result::AppResult;
use docrepo_core::traits::DocumentStore;
use docrepo_core::types::{Filter, FindQuery, Patch, Sort};

use super::connection::DatabasePool;
use super::sql::{push_order_by, push_where, push_window};
use crate::identity::assign_identity;

/// Document store over the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    db: DatabasePool,
}

impl PgDocumentStore {
    /// Create a store over a connected pool. Migrations must already have
    /// run; [`StoreManager`](crate::StoreManager) takes care of that.
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    fn pool(&self) -> &PgPool {
        self.db.pool()
    }
}

fn read_error(context: &str, e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::StoreRead, format!("{context}: {e}"), e)
}

fn write_error(context: &str, e: sqlx::Error) -> AppError {
    let duplicate = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    let message = if duplicate {
        format!("{context}: duplicate key")
    } else {
        format!("{context}: {e}")
    };
    AppError::with_source(ErrorKind::StoreWrite, message, e)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn provider_type(&self) -> &str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }

    async fn insert_one(&self, collection: &str, doc: Value) -> AppResult<Value> {
        let (id, body) = assign_identity(doc)?;
        let Json(stored) = sqlx::query_scalar::<_, Json<Value>>(
            "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3) RETURNING body",
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(Value::Object(body)))
        .fetch_one(self.pool())
        .await
        .map_err(|e| write_error("Failed to insert document", e))?;

        debug!(collection, id = %id, "Inserted document");
        Ok(stored)
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        sqlx::query_scalar::<_, Json<Value>>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map(|found| found.map(|Json(body)| body))
        .map_err(|e| read_error("Failed to get document", e))
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Value>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT body FROM documents");
        push_where(&mut qb, collection, filter);
        push_order_by(&mut qb, &Sort::natural());
        qb.push(" LIMIT 1");

        qb.build_query_scalar::<Json<Value>>()
            .fetch_optional(self.pool())
            .await
            .map(|found| found.map(|Json(body)| body))
            .map_err(|e| read_error("Failed to find document", e))
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> AppResult<Vec<Value>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT body FROM documents");
        push_where(&mut qb, collection, &query.filter);
        push_order_by(&mut qb, &query.sort);
        push_window(&mut qb, query.skip, query.limit);

        let rows = qb
            .build_query_scalar::<Json<Value>>()
            .fetch_all(self.pool())
            .await
            .map_err(|e| read_error("Failed to find documents", e))?;

        Ok(rows
            .into_iter()
            .map(|Json(body)| match &query.projection {
                Some(projection) => projection.apply(&body),
                None => body,
            })
            .collect())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: &Patch,
    ) -> AppResult<Option<Value>> {
        sqlx::query_scalar::<_, Json<Value>>(
            "UPDATE documents SET body = (body - $3::text[]) || $4 \
             WHERE collection = $1 AND id = $2 RETURNING body",
        )
        .bind(collection)
        .bind(id)
        .bind(patch.removals())
        .bind(Json(Value::Object(patch.assignments())))
        .fetch_optional(self.pool())
        .await
        .map(|found| found.map(|Json(body)| body))
        .map_err(|e| write_error("Failed to update document", e))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "DELETE FROM documents WHERE (collection, id) IN (SELECT collection, id FROM documents",
        );
        push_where(&mut qb, collection, filter);
        push_order_by(&mut qb, &Sort::natural());
        qb.push(" LIMIT 1)");

        let result = qb
            .build()
            .execute(self.pool())
            .await
            .map_err(|e| write_error("Failed to delete document", e))?;
        Ok(result.rows_affected())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents");
        push_where(&mut qb, collection, filter);

        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(|e| read_error("Failed to count documents", e))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}
