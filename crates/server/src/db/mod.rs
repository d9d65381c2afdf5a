//! Document storage.
//!
//! # Backends
//!
//! - [`DocumentRepository`] - `PostgreSQL`, one JSONB row per document in the
//!   `documents` table
//! - [`MemoryStore`] - process-local store used when no `DATABASE_URL` is
//!   configured, and in tests
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p quarry-ledger-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use quarry_ledger_core::{AggregateError, Collection, DocumentId};

use crate::models::{Document, Page, PageRequest};

pub use memory::MemoryStore;
pub use postgres::DocumentRepository;

/// Migrations embedded from `crates/server/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested document was not found.
    #[error("not found")]
    NotFound,

    /// The change was refused by the derived-field hook.
    #[error(transparent)]
    Rejected(#[from] AggregateError),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// The document store behind the record service.
#[derive(Clone)]
pub enum DocumentStore {
    Postgres(PgPool),
    Memory(MemoryStore),
}

impl DocumentStore {
    /// Connect to `PostgreSQL` when a URL is given, otherwise start empty in memory.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the database cannot be reached.
    pub async fn connect(database_url: Option<&SecretString>) -> Result<Self, sqlx::Error> {
        match database_url {
            Some(url) => Ok(Self::Postgres(create_pool(url).await?)),
            None => Ok(Self::memory()),
        }
    }

    /// An empty in-memory store.
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::default())
    }

    /// Short backend name for logs.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// List one page of a collection, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find(
        &self,
        collection: Collection,
        request: PageRequest,
    ) -> Result<Page, RepositoryError> {
        match self {
            Self::Postgres(pool) => DocumentRepository::new(pool).find(collection, request).await,
            Self::Memory(store) => Ok(store.find(collection, request).await),
        }
    }

    /// Fetch one document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<Document>, RepositoryError> {
        match self {
            Self::Postgres(pool) => {
                DocumentRepository::new(pool)
                    .find_by_id(collection, id)
                    .await
            }
            Self::Memory(store) => Ok(store.find_by_id(collection, id).await),
        }
    }

    /// Insert a new document with a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        collection: Collection,
        data: Map<String, Value>,
    ) -> Result<Document, RepositoryError> {
        match self {
            Self::Postgres(pool) => DocumentRepository::new(pool).create(collection, data).await,
            Self::Memory(store) => Ok(store.create(collection, data).await),
        }
    }

    /// Read-modify-write one document.
    ///
    /// `change` receives the current fields and returns the replacement.
    /// Concurrent calls on the same document are serialized, so no change is
    /// lost. If `change` fails nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the document does not exist, or
    /// whatever error `change` returns.
    pub async fn modify<F>(
        &self,
        collection: Collection,
        id: DocumentId,
        change: F,
    ) -> Result<Document, RepositoryError>
    where
        F: FnOnce(Map<String, Value>) -> Result<Map<String, Value>, RepositoryError> + Send,
    {
        match self {
            Self::Postgres(pool) => {
                DocumentRepository::new(pool)
                    .modify(collection, id, change)
                    .await
            }
            Self::Memory(store) => store.modify(collection, id, change).await,
        }
    }

    /// Hard-delete a document and return it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the document does not exist.
    pub async fn delete(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Document, RepositoryError> {
        match self {
            Self::Postgres(pool) => DocumentRepository::new(pool).delete(collection, id).await,
            Self::Memory(store) => store.delete(collection, id).await,
        }
    }

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the database does not answer.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            Self::Memory(_) => Ok(()),
        }
    }
}
