//! Stateless derived-field computation.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use quarry_ledger_core::BatchKind;

use crate::error::AppError;
use crate::services::RecordService;
use crate::state::AppState;

/// `POST /api/compute/{kind}`
///
/// Returns the posted record with its derived fields filled in. Nothing is
/// stored.
pub async fn compute(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(record): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let kind: BatchKind = kind
        .parse()
        .map_err(|e: quarry_ledger_core::ParseKindError| AppError::NotFound(e.to_string()))?;
    let derived = RecordService::new(state.store(), state.formulas()).preview(kind, &record)?;
    Ok(Json(derived))
}
