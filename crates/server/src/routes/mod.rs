//! HTTP route handlers for the record service.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                   - Liveness check
//! GET    /health/ready                             - Store readiness check
//!
//! # Documents
//! GET    /api/{collection}?page=&limit=            - Paginated listing, newest first
//! POST   /api/{collection}                         - Create (derived fields filled for batches)
//! GET    /api/{collection}/{id}                    - Fetch one document
//! PATCH  /api/{collection}/{id}                    - Shallow merge update
//! DELETE /api/{collection}/{id}                    - Hard delete
//!
//! # Payments (vendors, parties, blocks, todis, galas, stones)
//! POST   /api/{collection}/{id}/received-amounts   - Append a received amount
//!
//! # Computation
//! POST   /api/compute/{kind}                       - Derive fields without storing
//! ```

pub mod compute;
pub mod documents;
pub mod health;
pub mod payments;

use axum::{
    Router,
    routing::{get, post},
};

use quarry_ledger_core::{Collection, DocumentId};

use crate::error::AppError;
use crate::state::AppState;

/// Build the complete router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/compute/{kind}", post(compute::compute))
        .route(
            "/api/{collection}",
            get(documents::list).post(documents::create),
        )
        .route(
            "/api/{collection}/{id}",
            get(documents::show)
                .patch(documents::update)
                .delete(documents::destroy),
        )
        .route(
            "/api/{collection}/{id}/received-amounts",
            post(payments::append),
        )
}

/// Resolve a collection slug from the path; unknown slugs are a 404.
fn parse_collection(slug: &str) -> Result<Collection, AppError> {
    slug.parse()
        .map_err(|e: quarry_ledger_core::UnknownCollection| AppError::NotFound(e.to_string()))
}

/// Resolve a document ID from the path; malformed IDs are a 404.
fn parse_id(collection: Collection, raw: &str) -> Result<DocumentId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{collection}/{raw}")))
}
