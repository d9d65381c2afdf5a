//! Measure groups and batch-level totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AggregateError, Measure, checked_sum};
use crate::types::DimensionFormula;

/// Summed area and cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_area: Decimal,
    pub total_cost: Decimal,
}

/// An ordered run of measures sharing a date and logistics costs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureGroup {
    pub date: Option<NaiveDate>,
    pub hydra_cost: Decimal,
    pub truck_cost: Decimal,
    pub measures: Vec<Measure>,
}

impl MeasureGroup {
    /// Build a dateless group with no logistics costs from raw
    /// `(length, breadth, height, rate)` readings.
    ///
    /// # Errors
    ///
    /// Returns the first [`AggregateError`] raised by a reading, with the
    /// field path prefixed by `measures[i]`.
    pub fn measure(
        readings: &[(Decimal, Decimal, Decimal, Decimal)],
        formula: DimensionFormula,
    ) -> Result<Self, AggregateError> {
        let measures = readings
            .iter()
            .enumerate()
            .map(|(i, &(l, b, h, rate))| {
                Measure::new(l, b, h, rate, formula).map_err(|e| e.within(&format!("measures[{i}]")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            measures,
            ..Self::default()
        })
    }

    /// Totals over this group's measures.
    ///
    /// # Errors
    ///
    /// Same as [`compute_group_totals`].
    pub fn totals(&self) -> Result<Totals, AggregateError> {
        compute_group_totals(&self.measures)
    }
}

/// Sum area and cost across a sequence of measures.
///
/// An empty sequence yields zero totals. The result does not depend on the
/// order of the measures.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidInput`] for `total_area` or `total_cost`
/// when a sum does not fit in a `Decimal`.
pub fn compute_group_totals(measures: &[Measure]) -> Result<Totals, AggregateError> {
    Ok(Totals {
        total_area: checked_sum(measures.iter().map(|m| m.area), "total_area")?,
        total_cost: checked_sum(measures.iter().map(|m| m.cost), "total_cost")?,
    })
}

/// Sum group totals and add the flat logistics surcharge to the cost.
///
/// `hydra_cost + truck_cost` is added once per batch, regardless of the
/// number of groups.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidInput`] for `total_area` or `total_cost`
/// when a sum does not fit in a `Decimal`.
pub fn compute_batch_totals(
    groups: &[MeasureGroup],
    hydra_cost: Decimal,
    truck_cost: Decimal,
) -> Result<Totals, AggregateError> {
    let per_group = groups
        .iter()
        .map(MeasureGroup::totals)
        .collect::<Result<Vec<_>, _>>()?;

    let total_area = checked_sum(per_group.iter().map(|t| t.total_area), "total_area")?;
    let total_cost = checked_sum(
        per_group
            .iter()
            .map(|t| t.total_cost)
            .chain([hydra_cost, truck_cost]),
        "total_cost",
    )?;

    Ok(Totals {
        total_area,
        total_cost,
    })
}
