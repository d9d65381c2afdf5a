//! `PostgreSQL` document repository.
//!
//! Queries are checked at runtime so the crate builds without a live database.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use quarry_ledger_core::{Collection, DocumentId};

use super::RepositoryError;
use crate::models::{Document, Page, PageRequest};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    collection: String,
    data: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = RepositoryError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let collection = row.collection.parse::<Collection>().map_err(|e| {
            RepositoryError::DataCorruption(format!("document {}: {e}", row.id))
        })?;
        let Value::Object(data) = row.data.0 else {
            return Err(RepositoryError::DataCorruption(format!(
                "document {} is not a JSON object",
                row.id
            )));
        };

        Ok(Self {
            id: DocumentId::new(row.id),
            collection,
            data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for document database operations.
pub struct DocumentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DocumentRepository<'a> {
    /// Create a new document repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one page of a collection, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn find(
        &self,
        collection: Collection,
        request: PageRequest,
    ) -> Result<Page, RepositoryError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
                .bind(collection.slug())
                .fetch_one(self.pool)
                .await?;

        let rows = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, collection, data, created_at, updated_at
            FROM documents
            WHERE collection = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(collection.slug())
        .bind(i64::from(request.limit))
        .bind(i64::try_from(request.offset()).unwrap_or(i64::MAX))
        .fetch_all(self.pool)
        .await?;

        let docs = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Document>, _>>()?;

        Ok(Page::new(
            docs,
            u64::try_from(total).unwrap_or_default(),
            request,
        ))
    }

    /// Get a document by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is invalid.
    pub async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<Document>, RepositoryError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, collection, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.slug())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        collection: Collection,
        data: Map<String, Value>,
    ) -> Result<Document, RepositoryError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            INSERT INTO documents (id, collection, data)
            VALUES ($1, $2, $3)
            RETURNING id, collection, data, created_at, updated_at
            ",
        )
        .bind(DocumentId::generate())
        .bind(collection.slug())
        .bind(Json(Value::Object(data)))
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Lock the row, apply `change`, and write the result in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the document does not exist.
    /// The transaction is rolled back if `change` fails.
    pub async fn modify<F>(
        &self,
        collection: Collection,
        id: DocumentId,
        change: F,
    ) -> Result<Document, RepositoryError>
    where
        F: FnOnce(Map<String, Value>) -> Result<Map<String, Value>, RepositoryError> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, collection, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            FOR UPDATE
            ",
        )
        .bind(collection.slug())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let current: Document = current.try_into()?;
        let data = change(current.data)?;

        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            UPDATE documents
            SET data = $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            RETURNING id, collection, data, created_at, updated_at
            ",
        )
        .bind(collection.slug())
        .bind(id)
        .bind(Json(Value::Object(data)))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    /// Delete a document, returning it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the document does not exist.
    pub async fn delete(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Document, RepositoryError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            DELETE FROM documents
            WHERE collection = $1 AND id = $2
            RETURNING id, collection, data, created_at, updated_at
            ",
        )
        .bind(collection.slug())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
