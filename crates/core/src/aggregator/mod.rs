//! Measurement aggregation for batch records.
//!
//! Pure functions from measurement inputs to derived totals: per-measure area
//! and cost, per-group and per-batch totals, final cost after depreciation,
//! and remaining payment balances. Nothing here performs I/O or keeps state;
//! each call returns a fresh value.
//!
//! All arithmetic uses [`rust_decimal::Decimal`], so recomputing the same
//! inputs on every save yields identical results with no floating drift.
//! Every sum and product is checked; a result that does not fit is rejected
//! as invalid input rather than wrapping or panicking.
//!
//! ```
//! use quarry_ledger_core::{
//!     DimensionFormula, MeasureGroup, compute_batch_totals, compute_final_cost,
//! };
//! use rust_decimal::Decimal;
//!
//! let group = MeasureGroup::measure(
//!     &[(Decimal::TWO, Decimal::ONE, Decimal::new(5, 1), Decimal::ONE_HUNDRED)],
//!     DimensionFormula::Volumetric,
//! )?;
//! let totals = compute_batch_totals(
//!     &[group.clone(), group],
//!     Decimal::from(50),
//!     Decimal::from(30),
//! )?;
//! assert_eq!(totals.total_cost, Decimal::from(280));
//! assert_eq!(compute_final_cost(totals.total_cost, Decimal::TEN)?, Decimal::from(252));
//! # Ok::<(), quarry_ledger_core::AggregateError>(())
//! ```

use rust_decimal::Decimal;

mod error;
mod group;
mod measure;
mod payment;

pub use error::AggregateError;
pub use group::{MeasureGroup, Totals, compute_batch_totals, compute_group_totals};
pub use measure::{Measure, compute_measure};
pub use payment::{
    ReceivedAmount, VendorAccount, append_received_amount, compute_final_cost,
    compute_remaining_payment,
};

/// Sum `values`, rejecting a total that does not fit in a `Decimal` as `field`.
pub(crate) fn checked_sum(
    values: impl IntoIterator<Item = Decimal>,
    field: &str,
) -> Result<Decimal, AggregateError> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value)
            .ok_or_else(|| AggregateError::out_of_range(field))
    })
}
