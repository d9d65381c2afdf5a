//! Unified error handling for the record service.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use quarry_ledger_core::AggregateError;

use crate::db::RepositoryError;

/// Application-level error type for the record service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// A record failed validation in the derived-field computation.
    #[error("{0}")]
    InvalidInput(#[from] AggregateError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("document".to_string()),
            RepositoryError::Rejected(e) => Self::InvalidInput(e),
            other => Self::Database(other),
        }
    }
}

/// JSON error body returned by every API endpoint.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidInput(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Record service request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Database(_) => ApiError {
                error: "Internal server error".to_string(),
                field: None,
            },
            Self::InvalidInput(e) => ApiError {
                error: e.to_string(),
                field: Some(e.field().to_string()),
            },
            _ => ApiError {
                error: self.to_string(),
                field: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quarry_ledger_core::{BatchKind, DimensionFormula, derive_record};
    use serde_json::json;

    fn rejection() -> AggregateError {
        derive_record(
            BatchKind::Block,
            DimensionFormula::Volumetric,
            &json!({ "groups": [{ "measures": [{ "l": -1 }] }] }),
        )
        .unwrap_err()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("mines/123".to_string());
        assert_eq!(err.to_string(), "Not found: mines/123");

        let err = AppError::BadRequest("body must be a JSON object".to_string());
        assert_eq!(err.to_string(), "Bad request: body must be a JSON object");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(rejection().into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "test".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        assert!(matches!(
            AppError::from(RepositoryError::NotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(RepositoryError::Rejected(rejection())),
            AppError::InvalidInput(e) if e.field() == "groups[0].measures[0].l"
        ));
        assert!(matches!(
            AppError::from(RepositoryError::DataCorruption("bad".to_string())),
            AppError::Database(_)
        ));
    }
}
