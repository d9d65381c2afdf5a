//! Final cost, remaining payment and received-amount ledgers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AggregateError, checked_sum};

/// A single payment received against an account or batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedAmount {
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

/// Running ledger of amounts received from a vendor.
///
/// The list is append-only; the balance is always recomputed from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorAccount {
    #[serde(rename = "receivedAmounts", default)]
    pub received_amounts: Vec<ReceivedAmount>,
}

impl VendorAccount {
    /// Sum of all received amounts.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::InvalidInput`] for `receivedAmounts` when the
    /// sum does not fit in a `Decimal`.
    pub fn balance(&self) -> Result<Decimal, AggregateError> {
        checked_sum(self.received_amounts.iter().map(|r| r.amount), "receivedAmounts")
    }
}

/// Apply a depreciation percentage to a total cost.
///
/// `final = total − total × percent / 100`.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidInput`] for `depreciation` when the
/// percentage is negative or greater than 100, and for `final_cost` when the
/// depreciated amount does not fit in a `Decimal`.
pub fn compute_final_cost(
    total_cost: Decimal,
    depreciation_percent: Decimal,
) -> Result<Decimal, AggregateError> {
    if depreciation_percent < Decimal::ZERO || depreciation_percent > Decimal::ONE_HUNDRED {
        return Err(AggregateError::invalid(
            "depreciation",
            format!("must be between 0 and 100 (got {depreciation_percent})"),
        ));
    }

    total_cost
        .checked_mul(depreciation_percent)
        .and_then(|d| d.checked_div(Decimal::ONE_HUNDRED))
        .and_then(|d| total_cost.checked_sub(d))
        .ok_or_else(|| AggregateError::out_of_range("final_cost"))
}

/// Balance still owed on a batch after the advance and later payments.
///
/// The result is not clamped: a negative value records an overpayment.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidInput`] for `partyRemainingPayment` when
/// the received total or the balance does not fit in a `Decimal`.
pub fn compute_remaining_payment(
    final_cost: Decimal,
    advance_payment: Decimal,
    prior_received_amounts: &[Decimal],
) -> Result<Decimal, AggregateError> {
    let received = checked_sum(prior_received_amounts.iter().copied(), "partyRemainingPayment")?;
    final_cost
        .checked_sub(advance_payment)
        .and_then(|d| d.checked_sub(received))
        .ok_or_else(|| AggregateError::out_of_range("partyRemainingPayment"))
}

/// Return a copy of `account` with one more received amount at the end.
///
/// The input is left untouched so a caller can retry the append against the
/// latest stored state.
#[must_use]
pub fn append_received_amount(
    account: &VendorAccount,
    amount: Decimal,
    date: Option<NaiveDate>,
    description: impl Into<String>,
) -> VendorAccount {
    let mut received_amounts = Vec::with_capacity(account.received_amounts.len() + 1);
    received_amounts.extend_from_slice(&account.received_amounts);
    received_amounts.push(ReceivedAmount {
        amount,
        date,
        description: description.into(),
    });
    VendorAccount { received_amounts }
}
