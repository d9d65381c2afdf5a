//! Single-piece measurements.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AggregateError;
use crate::types::DimensionFormula;

/// One physical measurement of a stone or block piece with its derived
/// area and cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub length: Decimal,
    pub breadth: Decimal,
    pub height: Decimal,
    pub rate: Decimal,
    /// `length × breadth × height` or `length × breadth`, depending on the formula.
    pub area: Decimal,
    /// `area × rate`.
    pub cost: Decimal,
}

impl Measure {
    /// Measure a piece and compute its area and cost.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::InvalidInput`] if any dimension or the rate
    /// is negative, or if the product does not fit in a `Decimal`.
    pub fn new(
        length: Decimal,
        breadth: Decimal,
        height: Decimal,
        rate: Decimal,
        formula: DimensionFormula,
    ) -> Result<Self, AggregateError> {
        let (area, cost) = compute_measure(length, breadth, height, rate, formula)?;
        Ok(Self {
            length,
            breadth,
            height,
            rate,
            area,
            cost,
        })
    }
}

/// Compute `(area, cost)` for one measurement.
///
/// With [`DimensionFormula::Area`] the height is ignored, but it must still be
/// non-negative. Zero is permitted everywhere and yields zero area and cost.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidInput`] naming `l`, `b`, `h` or `rate`
/// when that value is negative.
pub fn compute_measure(
    length: Decimal,
    breadth: Decimal,
    height: Decimal,
    rate: Decimal,
    formula: DimensionFormula,
) -> Result<(Decimal, Decimal), AggregateError> {
    for (field, value) in [("l", length), ("b", breadth), ("h", height), ("rate", rate)] {
        if value < Decimal::ZERO {
            return Err(AggregateError::invalid(
                field,
                format!("must not be negative (got {value})"),
            ));
        }
    }

    let surface = length
        .checked_mul(breadth)
        .ok_or_else(|| AggregateError::invalid("l", "area out of range"))?;
    let area = match formula {
        DimensionFormula::Volumetric => surface
            .checked_mul(height)
            .ok_or_else(|| AggregateError::invalid("h", "area out of range"))?,
        DimensionFormula::Area => surface,
    };
    let cost = area
        .checked_mul(rate)
        .ok_or_else(|| AggregateError::invalid("rate", "cost out of range"))?;

    Ok((area, cost))
}
