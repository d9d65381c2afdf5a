//! Generic document CRUD handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;

use super::{parse_collection, parse_id};
use crate::error::AppError;
use crate::models::{Document, Page, Pagination};
use crate::services::RecordService;
use crate::state::AppState;

/// `GET /api/{collection}`
pub async fn list(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Page>, AppError> {
    let collection = parse_collection(&slug)?;
    let request = pagination.resolve(state.config().page_limit);
    let page = state.store().find(collection, request).await?;
    Ok(Json(page))
}

/// `POST /api/{collection}`
pub async fn create(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let collection = parse_collection(&slug)?;
    let document = RecordService::new(state.store(), state.formulas())
        .create(collection, body)
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// `GET /api/{collection}/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path((slug, raw_id)): Path<(String, String)>,
) -> Result<Json<Document>, AppError> {
    let collection = parse_collection(&slug)?;
    let id = parse_id(collection, &raw_id)?;
    state
        .store()
        .find_by_id(collection, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{collection}/{id}")))
}

/// `PATCH /api/{collection}/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path((slug, raw_id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> Result<Json<Document>, AppError> {
    let collection = parse_collection(&slug)?;
    let id = parse_id(collection, &raw_id)?;
    let document = RecordService::new(state.store(), state.formulas())
        .update(collection, id, patch)
        .await?;
    Ok(Json(document))
}

/// `DELETE /api/{collection}/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    Path((slug, raw_id)): Path<(String, String)>,
) -> Result<Json<Document>, AppError> {
    let collection = parse_collection(&slug)?;
    let id = parse_id(collection, &raw_id)?;
    let document = state.store().delete(collection, id).await?;
    tracing::info!(collection = %collection, id = %id, "Document deleted");
    Ok(Json(document))
}
