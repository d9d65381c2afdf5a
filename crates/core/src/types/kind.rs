//! Batch kinds and the dimensional formula each kind is costed with.
//!
//! Block and Stone records are measured as volumes (`l × b × h`), while Todi
//! and Gala records are costed by surface (`l × b`). The mapping is held in a
//! [`FormulaTable`] so deployments can override it per kind.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a kind or formula name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {what}: {value}")]
pub struct ParseKindError {
    what: &'static str,
    value: String,
}

/// The four batch record types that carry measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKind {
    /// Raw blocks cut at the mine.
    Block,
    /// Todi processing batch.
    Todi,
    /// Gala processing batch.
    Gala,
    /// Stone inventory entry.
    Stone,
}

impl BatchKind {
    /// All batch kinds, in display order.
    pub const ALL: [Self; 4] = [Self::Block, Self::Todi, Self::Gala, Self::Stone];

    /// Lowercase name used in field names and URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Todi => "todi",
            Self::Gala => "gala",
            Self::Stone => "stone",
        }
    }

    /// Formula used when no override is configured.
    #[must_use]
    pub const fn default_formula(self) -> DimensionFormula {
        match self {
            Self::Block | Self::Stone => DimensionFormula::Volumetric,
            Self::Todi | Self::Gala => DimensionFormula::Area,
        }
    }

    /// Name of the derived total-area field (e.g. `total_block_area`).
    #[must_use]
    pub const fn total_area_field(self) -> &'static str {
        match self {
            Self::Block => "total_block_area",
            Self::Todi => "total_todi_area",
            Self::Gala => "total_gala_area",
            Self::Stone => "total_stone_area",
        }
    }

    /// Name of the derived total-cost field (e.g. `total_block_cost`).
    #[must_use]
    pub const fn total_cost_field(self) -> &'static str {
        match self {
            Self::Block => "total_block_cost",
            Self::Todi => "total_todi_cost",
            Self::Gala => "total_gala_cost",
            Self::Stone => "total_stone_cost",
        }
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" | "blocks" => Ok(Self::Block),
            "todi" | "todis" => Ok(Self::Todi),
            "gala" | "galas" => Ok(Self::Gala),
            "stone" | "stones" => Ok(Self::Stone),
            _ => Err(ParseKindError {
                what: "batch kind",
                value: s.to_owned(),
            }),
        }
    }
}

/// How a measure's dimensions combine into an area figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionFormula {
    /// `length × breadth × height`.
    Volumetric,
    /// `length × breadth`; height is ignored.
    Area,
}

impl fmt::Display for DimensionFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volumetric => f.write_str("volumetric"),
            Self::Area => f.write_str("area"),
        }
    }
}

impl FromStr for DimensionFormula {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "volumetric" | "volume" | "lbh" => Ok(Self::Volumetric),
            "area" | "lb" => Ok(Self::Area),
            _ => Err(ParseKindError {
                what: "dimension formula",
                value: s.to_owned(),
            }),
        }
    }
}

/// Per-kind formula configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaTable {
    block: DimensionFormula,
    todi: DimensionFormula,
    gala: DimensionFormula,
    stone: DimensionFormula,
}

impl Default for FormulaTable {
    fn default() -> Self {
        Self {
            block: BatchKind::Block.default_formula(),
            todi: BatchKind::Todi.default_formula(),
            gala: BatchKind::Gala.default_formula(),
            stone: BatchKind::Stone.default_formula(),
        }
    }
}

impl FormulaTable {
    /// Formula configured for `kind`.
    #[must_use]
    pub const fn formula_for(&self, kind: BatchKind) -> DimensionFormula {
        match kind {
            BatchKind::Block => self.block,
            BatchKind::Todi => self.todi,
            BatchKind::Gala => self.gala,
            BatchKind::Stone => self.stone,
        }
    }

    /// Returns a copy of the table with `kind` switched to `formula`.
    #[must_use]
    pub const fn with(mut self, kind: BatchKind, formula: DimensionFormula) -> Self {
        match kind {
            BatchKind::Block => self.block = formula,
            BatchKind::Todi => self.todi = formula,
            BatchKind::Gala => self.gala = formula,
            BatchKind::Stone => self.stone = formula,
        }
        self
    }
}
