//! Document collections served by the record service.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::kind::BatchKind;

/// Error returned for a collection slug that is not served.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown collection: {0}")]
pub struct UnknownCollection(pub String);

/// A named collection of documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Mines,
    Vendors,
    Parties,
    Sites,
    Transactions,
    Blocks,
    Todis,
    Galas,
    Stones,
}

impl Collection {
    /// All collections.
    pub const ALL: [Self; 9] = [
        Self::Mines,
        Self::Vendors,
        Self::Parties,
        Self::Sites,
        Self::Transactions,
        Self::Blocks,
        Self::Todis,
        Self::Galas,
        Self::Stones,
    ];

    /// URL slug, also used as the stored collection name.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Mines => "mines",
            Self::Vendors => "vendors",
            Self::Parties => "parties",
            Self::Sites => "sites",
            Self::Transactions => "transactions",
            Self::Blocks => "blocks",
            Self::Todis => "todis",
            Self::Galas => "galas",
            Self::Stones => "stones",
        }
    }

    /// The batch kind whose derived fields are computed on every write, if any.
    #[must_use]
    pub const fn batch_kind(self) -> Option<BatchKind> {
        match self {
            Self::Blocks => Some(BatchKind::Block),
            Self::Todis => Some(BatchKind::Todi),
            Self::Galas => Some(BatchKind::Gala),
            Self::Stones => Some(BatchKind::Stone),
            _ => None,
        }
    }

    /// Whether documents in this collection keep a `receivedAmounts` list.
    #[must_use]
    pub const fn tracks_payments(self) -> bool {
        matches!(self, Self::Vendors | Self::Parties) || self.batch_kind().is_some()
    }
}

impl From<BatchKind> for Collection {
    fn from(kind: BatchKind) -> Self {
        match kind {
            BatchKind::Block => Self::Blocks,
            BatchKind::Todi => Self::Todis,
            BatchKind::Gala => Self::Galas,
            BatchKind::Stone => Self::Stones,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Collection {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| UnknownCollection(s.to_owned()))
    }
}
