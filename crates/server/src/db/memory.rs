//! In-memory document store.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use quarry_ledger_core::{Collection, DocumentId};

use super::RepositoryError;
use crate::models::{Document, Page, PageRequest};

/// Documents held in insertion order behind a single lock.
///
/// Cloning shares the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl MemoryStore {
    pub async fn find(&self, collection: Collection, request: PageRequest) -> Page {
        let documents = self.documents.read().await;
        let matching: Vec<&Document> = documents
            .iter()
            .rev()
            .filter(|d| d.collection == collection)
            .collect();

        let docs = matching
            .iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(request.limit as usize)
            .map(|d| (*d).clone())
            .collect();

        Page::new(docs, matching.len() as u64, request)
    }

    pub async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Option<Document> {
        self.documents
            .read()
            .await
            .iter()
            .find(|d| d.collection == collection && d.id == id)
            .cloned()
    }

    pub async fn create(&self, collection: Collection, data: Map<String, Value>) -> Document {
        let now = Utc::now();
        let document = Document {
            id: DocumentId::generate(),
            collection,
            data,
            created_at: now,
            updated_at: now,
        };
        self.documents.write().await.push(document.clone());
        document
    }

    /// Apply `change` while holding the write lock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown document, or the
    /// error from `change`, in which case the document is left unchanged.
    pub async fn modify<F>(
        &self,
        collection: Collection,
        id: DocumentId,
        change: F,
    ) -> Result<Document, RepositoryError>
    where
        F: FnOnce(Map<String, Value>) -> Result<Map<String, Value>, RepositoryError>,
    {
        let mut documents = self.documents.write().await;
        let document = documents
            .iter_mut()
            .find(|d| d.collection == collection && d.id == id)
            .ok_or(RepositoryError::NotFound)?;

        document.data = change(document.data.clone())?;
        document.updated_at = Utc::now();
        Ok(document.clone())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown document.
    pub async fn delete(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Document, RepositoryError> {
        let mut documents = self.documents.write().await;
        let index = documents
            .iter()
            .position(|d| d.collection == collection && d.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(documents.remove(index))
    }
}
