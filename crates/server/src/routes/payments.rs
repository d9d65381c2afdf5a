//! Received-amount ledger handler.

use axum::{
    Json,
    extract::{Path, State},
};

use super::{parse_collection, parse_id};
use crate::error::AppError;
use crate::models::{Document, ReceivedAmountRequest};
use crate::services::RecordService;
use crate::state::AppState;

/// `POST /api/{collection}/{id}/received-amounts`
pub async fn append(
    State(state): State<AppState>,
    Path((slug, raw_id)): Path<(String, String)>,
    Json(payment): Json<ReceivedAmountRequest>,
) -> Result<Json<Document>, AppError> {
    let collection = parse_collection(&slug)?;
    let id = parse_id(collection, &raw_id)?;
    let document = RecordService::new(state.store(), state.formulas())
        .append_received_amount(collection, id, payment)
        .await?;
    Ok(Json(document))
}
