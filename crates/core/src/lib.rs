//! Quarry Ledger Core - Shared types and cost aggregation.
//!
//! This crate provides the types and pure computations used across all
//! Quarry Ledger components:
//! - `server` - Record service exposing CRUD endpoints over the document store
//! - `cli` - Command-line tools for migrations and offline computation
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Every aggregation call operates on its arguments alone, so
//! concurrent callers never share state.
//!
//! # Modules
//!
//! - [`types`] - Document IDs, collections, batch kinds and dimensional formulas
//! - [`aggregator`] - Measure, group and batch totals, final cost and payments
//! - [`record`] - Lenient JSON boundary that fills derived fields on a record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregator;
pub mod record;
pub mod types;

pub use aggregator::{
    AggregateError, Measure, MeasureGroup, ReceivedAmount, Totals, VendorAccount,
    append_received_amount, compute_batch_totals, compute_final_cost, compute_group_totals,
    compute_measure, compute_remaining_payment,
};
pub use record::{BatchInput, BatchSummary, derive_fields, derive_record, lenient_decimal};
pub use types::*;
