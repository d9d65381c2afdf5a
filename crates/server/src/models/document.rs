//! Stored documents and paginated listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use quarry_ledger_core::{Collection, DocumentId};

use crate::config::MAX_PAGE_LIMIT;

/// Fields owned by the store; client-supplied values are discarded.
pub const RESERVED_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// A schemaless record in one collection.
///
/// Serializes flat: the record's own fields next to `id`, `createdAt` and
/// `updatedAt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    #[serde(skip)]
    pub collection: Collection,
    #[serde(flatten)]
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Remove store-owned fields from client input.
pub fn strip_reserved(data: &mut Map<String, Value>) {
    for field in RESERVED_FIELDS {
        data.remove(field);
    }
}

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// A resolved, bounded page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Fill in defaults and clamp `limit` to `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn resolve(self, default_limit: u32) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1).max(1),
            limit: self
                .limit
                .unwrap_or(default_limit)
                .clamp(1, MAX_PAGE_LIMIT),
        }
    }
}

impl PageRequest {
    /// Number of documents to skip.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of a collection, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub docs: Vec<Document>,
    pub total_docs: u64,
    pub limit: u32,
    pub page: u32,
    pub total_pages: u64,
}

impl Page {
    #[must_use]
    pub fn new(docs: Vec<Document>, total_docs: u64, request: PageRequest) -> Self {
        Self {
            docs,
            total_docs,
            limit: request.limit,
            page: request.page,
            total_pages: total_docs.div_ceil(u64::from(request.limit)),
        }
    }
}
