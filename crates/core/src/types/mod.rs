//! Core types for Quarry Ledger.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod collection;
pub mod id;
pub mod kind;

pub use collection::{Collection, UnknownCollection};
pub use id::*;
pub use kind::{BatchKind, DimensionFormula, FormulaTable, ParseKindError};
