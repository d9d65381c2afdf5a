//! Aggregation error type.

/// Errors raised by the aggregator.
///
/// `InvalidInput` is the only kind: missing or zero fields are valid
/// zero-contribution inputs and never produce an error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// A value is negative or outside the range the computation accepts.
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput {
        /// Path of the offending field (e.g. `groups[0].measures[1].l`).
        field: String,
        /// Human-readable reason.
        reason: String,
    },
}

impl AggregateError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(field: impl Into<String>) -> Self {
        Self::invalid(field, "out of range")
    }

    /// Path of the field that was rejected.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidInput { field, .. } => field,
        }
    }

    /// Prefix the field path with the location of the enclosing value.
    #[must_use]
    pub fn within(self, prefix: &str) -> Self {
        match self {
            Self::InvalidInput { field, reason } => Self::InvalidInput {
                field: format!("{prefix}.{field}"),
                reason,
            },
        }
    }
}
