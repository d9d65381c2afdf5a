//! Parse-and-derive boundary between JSON records and the aggregator.
//!
//! Records arrive as loosely typed JSON: numbers may be strings, fields may
//! be missing, and measurements may be nested (`groups[].measures[]`) or flat
//! (`addmeasures[]`). This module normalizes them into [`BatchInput`], runs
//! the aggregator, and writes the derived fields back onto a copy of the
//! record.
//!
//! Unparseable or missing numeric fields count as zero. Negative dimensions
//! and rates, and depreciation outside `[0, 100]`, are still rejected.
//!
//! # Derived fields
//!
//! | Location      | Fields                                                        |
//! |---------------|---------------------------------------------------------------|
//! | each measure  | `area`, `cost`                                                |
//! | each group    | `total_area`, `total_cost`                                    |
//! | record        | `total_<kind>_area`, `total_<kind>_cost`, `final_cost`, `partyRemainingPayment` |

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Number, Value};

use crate::aggregator::{
    AggregateError, Measure, MeasureGroup, ReceivedAmount, Totals, VendorAccount,
    checked_sum, compute_batch_totals, compute_final_cost, compute_remaining_payment,
};
use crate::types::{BatchKind, DimensionFormula};

/// Keys that may hold the top-level measurement array.
const GROUP_KEYS: [&str; 2] = ["groups", "addmeasures"];
/// Keys that may hold the measures inside a group.
const MEASURE_KEYS: [&str; 2] = ["measures", "addmeasures"];
/// An entry is a measure only if it carries at least one dimension.
const DIMENSION_KEYS: [&str; 3] = ["l", "b", "h"];

pub const FINAL_COST_FIELD: &str = "final_cost";
pub const REMAINING_PAYMENT_FIELD: &str = "partyRemainingPayment";
pub const RECEIVED_AMOUNTS_FIELD: &str = "receivedAmounts";
pub const BALANCE_FIELD: &str = "balance";

/// One `{l, b, h, rate?}` entry as read from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureInput {
    pub l: Decimal,
    pub b: Decimal,
    pub h: Decimal,
    /// Per-measure rate; falls back to the record-level `rate` when absent.
    pub rate: Option<Decimal>,
    /// JSON pointer of the entry inside the record.
    pub pointer: String,
}

/// A group of measures as read from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInput {
    pub date: Option<NaiveDate>,
    pub hydra_cost: Decimal,
    pub truck_cost: Decimal,
    pub measures: Vec<MeasureInput>,
    /// JSON pointer of the group object; `None` for the implicit group that
    /// wraps a flat measure list.
    pub pointer: Option<String>,
}

/// Normalized numeric view of a batch record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchInput {
    pub groups: Vec<GroupInput>,
    pub rate: Decimal,
    pub hydra_cost: Decimal,
    pub truck_cost: Decimal,
    pub depreciation: Decimal,
    pub party_advance_payment: Decimal,
    pub estimate_cost: Decimal,
    pub received_amounts: Vec<ReceivedAmount>,
}

/// Everything the aggregator derives for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub groups: Vec<MeasureGroup>,
    pub totals: Totals,
    pub final_cost: Decimal,
    pub remaining_payment: Decimal,
}

impl BatchInput {
    /// Read a batch record leniently. Never fails: anything unreadable is zero.
    #[must_use]
    pub fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            groups: read_groups(record),
            rate: decimal_field(record, "rate"),
            hydra_cost: decimal_field(record, "hydra_cost"),
            truck_cost: decimal_field(record, "truck_cost"),
            depreciation: decimal_field(record, "depreciation"),
            party_advance_payment: decimal_field(record, "partyAdvancePayment"),
            estimate_cost: decimal_field(record, "estimate_cost"),
            received_amounts: read_received_amounts(record),
        }
    }

    /// Whether any group holds at least one measure.
    #[must_use]
    pub fn has_measures(&self) -> bool {
        self.groups.iter().any(|g| !g.measures.is_empty())
    }

    /// Run the aggregator over this input.
    ///
    /// The logistics surcharge is the record-level `hydra_cost`/`truck_cost`
    /// plus any group-level values. When the record has no measures yet the
    /// final cost is the `estimate_cost`.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::InvalidInput`] for a negative dimension or
    /// rate (with its path in the record) and for a depreciation or total
    /// that is out of range.
    pub fn summarize(&self, formula: DimensionFormula) -> Result<BatchSummary, AggregateError> {
        if self.rate < Decimal::ZERO {
            return Err(AggregateError::invalid(
                "rate",
                format!("must not be negative (got {})", self.rate),
            ));
        }

        let groups = self
            .groups
            .iter()
            .map(|g| self.measure_group(g, formula))
            .collect::<Result<Vec<_>, _>>()?;

        let hydra_cost = checked_sum(
            std::iter::once(self.hydra_cost).chain(groups.iter().map(|g| g.hydra_cost)),
            "hydra_cost",
        )?;
        let truck_cost = checked_sum(
            std::iter::once(self.truck_cost).chain(groups.iter().map(|g| g.truck_cost)),
            "truck_cost",
        )?;
        let totals = compute_batch_totals(&groups, hydra_cost, truck_cost)?;

        let depreciated = compute_final_cost(totals.total_cost, self.depreciation)?;
        let final_cost = if self.has_measures() {
            depreciated
        } else {
            self.estimate_cost
        };

        let received: Vec<Decimal> = self.received_amounts.iter().map(|r| r.amount).collect();
        let remaining_payment =
            compute_remaining_payment(final_cost, self.party_advance_payment, &received)?;

        Ok(BatchSummary {
            groups,
            totals,
            final_cost,
            remaining_payment,
        })
    }

    fn measure_group(
        &self,
        group: &GroupInput,
        formula: DimensionFormula,
    ) -> Result<MeasureGroup, AggregateError> {
        let measures = group
            .measures
            .iter()
            .map(|m| {
                Measure::new(m.l, m.b, m.h, m.rate.unwrap_or(self.rate), formula)
                    .map_err(|e| e.within(&pointer_to_path(&m.pointer)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MeasureGroup {
            date: group.date,
            hydra_cost: group.hydra_cost,
            truck_cost: group.truck_cost,
            measures,
        })
    }
}

/// Compute and overwrite the derived fields of a batch record.
///
/// Returns a new record; the input is not modified.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidInput`] when the record is not a JSON
/// object, or for any rejection raised by [`BatchInput::summarize`].
pub fn derive_record(
    kind: BatchKind,
    formula: DimensionFormula,
    record: &Value,
) -> Result<Value, AggregateError> {
    let Value::Object(fields) = record else {
        return Err(AggregateError::invalid("$", "record must be a JSON object"));
    };

    let mut fields = fields.clone();
    derive_fields(kind, formula, &mut fields)?;
    Ok(Value::Object(fields))
}

/// In-place variant of [`derive_record`].
///
/// On error `record` is left exactly as it was.
///
/// # Errors
///
/// Same as [`BatchInput::summarize`].
pub fn derive_fields(
    kind: BatchKind,
    formula: DimensionFormula,
    record: &mut Map<String, Value>,
) -> Result<(), AggregateError> {
    let input = BatchInput::from_record(record);
    let summary = input.summarize(formula)?;
    let group_totals = summary
        .groups
        .iter()
        .map(MeasureGroup::totals)
        .collect::<Result<Vec<_>, _>>()?;

    let mut derived = Value::Object(std::mem::take(record));
    let groups = input.groups.iter().zip(&summary.groups).zip(&group_totals);
    for ((group_input, group), totals) in groups {
        for (measure_input, measure) in group_input.measures.iter().zip(&group.measures) {
            if let Some(Value::Object(entry)) = derived.pointer_mut(&measure_input.pointer) {
                entry.insert("area".to_owned(), decimal_to_json(measure.area));
                entry.insert("cost".to_owned(), decimal_to_json(measure.cost));
            }
        }

        if let Some(pointer) = &group_input.pointer
            && let Some(Value::Object(entry)) = derived.pointer_mut(pointer)
        {
            entry.insert("total_area".to_owned(), decimal_to_json(totals.total_area));
            entry.insert("total_cost".to_owned(), decimal_to_json(totals.total_cost));
        }
    }
    if let Value::Object(fields) = derived {
        *record = fields;
    }

    record.insert(
        kind.total_area_field().to_owned(),
        decimal_to_json(summary.totals.total_area),
    );
    record.insert(
        kind.total_cost_field().to_owned(),
        decimal_to_json(summary.totals.total_cost),
    );
    record.insert(FINAL_COST_FIELD.to_owned(), decimal_to_json(summary.final_cost));
    record.insert(
        REMAINING_PAYMENT_FIELD.to_owned(),
        decimal_to_json(summary.remaining_payment),
    );

    Ok(())
}

impl VendorAccount {
    /// Read the `receivedAmounts` list of any record leniently.
    #[must_use]
    pub fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            received_amounts: read_received_amounts(record),
        }
    }

    /// Write the ledger and its derived `balance` onto a record.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::InvalidInput`] when the balance does not fit
    /// in a `Decimal`; `record` is then left unchanged.
    pub fn merge_into_record(&self, record: &mut Map<String, Value>) -> Result<(), AggregateError> {
        let balance = self.balance()?;
        record.insert(
            RECEIVED_AMOUNTS_FIELD.to_owned(),
            Value::Array(
                self.received_amounts
                    .iter()
                    .map(received_amount_to_json)
                    .collect(),
            ),
        );
        record.insert(BALANCE_FIELD.to_owned(), decimal_to_json(balance));
        Ok(())
    }
}

/// Parse a JSON number or numeric string, treating anything else as zero.
#[must_use]
pub fn lenient_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => Decimal::ZERO,
    }
}

/// Parse a date from `YYYY-MM-DD` or an ISO-8601 timestamp.
#[must_use]
pub fn lenient_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    let day = s.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Encode a decimal as a JSON number, integral when it has no fraction.
///
/// Values that an `f64` cannot carry exactly (more than about 15 significant
/// digits) are written as strings, which [`lenient_decimal`] reads back
/// unchanged.
#[must_use]
pub fn decimal_to_json(value: Decimal) -> Value {
    let normalized = value.normalize();
    if normalized.scale() == 0
        && let Some(i) = normalized.to_i64()
    {
        return Value::Number(Number::from(i));
    }

    normalized
        .to_f64()
        .filter(|f| f.to_string().parse::<Decimal>().ok() == Some(normalized))
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(normalized.to_string()), Value::Number)
}

fn parse_decimal(s: &str) -> Decimal {
    let s = s.trim();
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}

fn decimal_field(record: &Map<String, Value>, key: &str) -> Decimal {
    record.get(key).map_or(Decimal::ZERO, lenient_decimal)
}

fn optional_rate(record: &Map<String, Value>) -> Option<Decimal> {
    match record.get("rate") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(lenient_decimal(value)),
    }
}

fn nested_measures(item: &Value) -> Option<(&'static str, &Vec<Value>)> {
    MEASURE_KEYS
        .into_iter()
        .find_map(|key| item.get(key).and_then(Value::as_array).map(|a| (key, a)))
}

fn is_measure(item: &Value) -> bool {
    item.as_object()
        .is_some_and(|fields| DIMENSION_KEYS.iter().any(|key| fields.contains_key(*key)))
}

fn read_measure(entry: &Value, pointer: String) -> Option<MeasureInput> {
    if !is_measure(entry) {
        return None;
    }
    let fields = entry.as_object()?;
    Some(MeasureInput {
        l: decimal_field(fields, "l"),
        b: decimal_field(fields, "b"),
        h: decimal_field(fields, "h"),
        rate: optional_rate(fields),
        pointer,
    })
}

fn read_measures(entries: &[Value], base: &str) -> Vec<MeasureInput> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| read_measure(entry, format!("{base}/{i}")))
        .collect()
}

fn read_groups(record: &Map<String, Value>) -> Vec<GroupInput> {
    let Some((key, items)) = GROUP_KEYS
        .into_iter()
        .find_map(|key| record.get(key).and_then(Value::as_array).map(|a| (key, a)))
    else {
        return Vec::new();
    };

    // Flat layout: every object in the list is itself a measure. Anything else
    // (nested measures, or a group that has only a date and logistics so far)
    // is read as a list of groups.
    let flat = items
        .iter()
        .filter(|item| item.is_object())
        .all(|item| is_measure(item) && nested_measures(item).is_none());
    if flat {
        let measures = read_measures(items, &format!("/{key}"));
        if measures.is_empty() {
            return Vec::new();
        }
        return vec![GroupInput {
            date: None,
            hydra_cost: Decimal::ZERO,
            truck_cost: Decimal::ZERO,
            measures,
            pointer: None,
        }];
    }

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let fields = item.as_object()?;
            let pointer = format!("/{key}/{i}");
            let measures = nested_measures(item)
                .map(|(inner, entries)| read_measures(entries, &format!("{pointer}/{inner}")))
                .unwrap_or_default();
            Some(GroupInput {
                date: fields.get("date").and_then(lenient_date),
                hydra_cost: decimal_field(fields, "hydra_cost"),
                truck_cost: decimal_field(fields, "truck_cost"),
                measures,
                pointer: Some(pointer),
            })
        })
        .collect()
}

fn read_received_amounts(record: &Map<String, Value>) -> Vec<ReceivedAmount> {
    let Some(entries) = record.get(RECEIVED_AMOUNTS_FIELD).and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(fields) => Some(ReceivedAmount {
                amount: decimal_field(fields, "amount"),
                date: fields.get("date").and_then(lenient_date),
                description: fields
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
            }),
            Value::Number(_) | Value::String(_) => Some(ReceivedAmount {
                amount: lenient_decimal(entry),
                date: None,
                description: String::new(),
            }),
            _ => None,
        })
        .collect()
}

fn received_amount_to_json(received: &ReceivedAmount) -> Value {
    let mut fields = Map::new();
    fields.insert("amount".to_owned(), decimal_to_json(received.amount));
    fields.insert(
        "date".to_owned(),
        received
            .date
            .map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string())),
    );
    fields.insert(
        "description".to_owned(),
        Value::String(received.description.clone()),
    );
    Value::Object(fields)
}

/// `/groups/0/measures/1` becomes `groups[0].measures[1]`.
fn pointer_to_path(pointer: &str) -> String {
    let mut path = String::new();
    for segment in pointer.split('/').filter(|s| !s.is_empty()) {
        if segment.bytes().all(|b| b.is_ascii_digit()) {
            path.push('[');
            path.push_str(segment);
            path.push(']');
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(segment);
        }
    }
    path
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn num(value: &Value) -> Decimal {
        lenient_decimal(value)
    }

    fn block_record() -> Value {
        json!({
            "name": "Block lot 7",
            "hydra_cost": 50,
            "truck_cost": 30,
            "depreciation": 10,
            "groups": [
                { "date": "2024-01-05", "measures": [{ "l": 2, "b": 1, "h": 0.5, "rate": 100 }] },
                { "date": "2024-01-06", "measures": [{ "l": 2, "b": 1, "h": 0.5, "rate": 100 }] }
            ]
        })
    }

    #[test]
    fn test_block_batch_end_to_end() {
        let derived =
            derive_record(BatchKind::Block, DimensionFormula::Volumetric, &block_record()).unwrap();

        assert_eq!(num(&derived["total_block_area"]), dec!(2));
        assert_eq!(num(&derived["total_block_cost"]), dec!(280));
        assert_eq!(num(&derived["final_cost"]), dec!(252));
        assert_eq!(num(&derived["partyRemainingPayment"]), dec!(252));
        assert_eq!(num(&derived["groups"][0]["measures"][0]["area"]), dec!(1));
        assert_eq!(num(&derived["groups"][1]["measures"][0]["cost"]), dec!(100));
        assert_eq!(num(&derived["groups"][1]["total_cost"]), dec!(100));
        assert_eq!(derived["name"], "Block lot 7");
    }

    #[test]
    fn test_derive_is_idempotent() {
        let once =
            derive_record(BatchKind::Block, DimensionFormula::Volumetric, &block_record()).unwrap();
        let twice = derive_record(BatchKind::Block, DimensionFormula::Volumetric, &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_string_numbers_are_parsed() {
        let record = json!({
            "depreciation": "10",
            "hydra_cost": " 50 ",
            "truck_cost": "30.0",
            "groups": [{ "measures": [{ "l": "2", "b": "1", "h": "0.5", "rate": "100" }] }]
        });
        let derived =
            derive_record(BatchKind::Block, DimensionFormula::Volumetric, &record).unwrap();
        assert_eq!(num(&derived["total_block_cost"]), dec!(180));
        assert_eq!(num(&derived["final_cost"]), dec!(162));
    }

    #[test]
    fn test_unparseable_and_missing_fields_are_zero() {
        let record = json!({
            "hydra_cost": "n/a",
            "truck_cost": null,
            "groups": [{ "measures": [{ "l": 4, "b": "abc", "h": 1, "rate": 10 }, { "l": 1 }] }]
        });
        let derived =
            derive_record(BatchKind::Stone, DimensionFormula::Volumetric, &record).unwrap();
        assert!(num(&derived["total_stone_area"]).is_zero());
        assert!(num(&derived["total_stone_cost"]).is_zero());
        assert!(num(&derived["final_cost"]).is_zero());
    }

    #[test]
    fn test_negative_dimension_rejected_with_path() {
        let record = json!({
            "hydra_cost": "garbage",
            "groups": [
                { "measures": [{ "l": 1, "b": 1, "h": 1 }] },
                { "measures": [{ "l": 1, "b": 1, "h": 1 }, { "l": -2, "b": 1, "h": 1 }] }
            ]
        });
        let err = derive_record(BatchKind::Block, DimensionFormula::Volumetric, &record)
            .unwrap_err();
        assert_eq!(err.field(), "groups[1].measures[1].l");
    }

    #[test]
    fn test_negative_string_rate_rejected() {
        let record = json!({ "addmeasures": [{ "l": 1, "b": 1, "rate": "-5" }] });
        let err = derive_record(BatchKind::Gala, DimensionFormula::Area, &record).unwrap_err();
        assert_eq!(err.field(), "addmeasures[0].rate");
    }

    #[test]
    fn test_depreciation_out_of_range_rejected_without_measures() {
        for depreciation in [json!(-1), json!("101")] {
            let record = json!({ "estimate_cost": 5000, "depreciation": depreciation });
            let err = derive_record(BatchKind::Todi, DimensionFormula::Area, &record).unwrap_err();
            assert_eq!(err.field(), "depreciation");
        }
    }

    #[test]
    fn test_estimate_cost_used_without_measures() {
        let record = json!({
            "estimate_cost": "4500",
            "depreciation": 10,
            "partyAdvancePayment": 1000
        });
        let derived = derive_record(BatchKind::Todi, DimensionFormula::Area, &record).unwrap();
        assert_eq!(num(&derived["final_cost"]), dec!(4500));
        assert_eq!(num(&derived["partyRemainingPayment"]), dec!(3500));
    }

    #[test]
    fn test_flat_measure_list_with_record_rate() {
        let record = json!({
            "rate": 20,
            "addmeasures": [
                { "l": 3, "b": 2, "h": 9 },
                { "l": 1, "b": 1, "h": 9, "rate": 50 }
            ]
        });
        let derived = derive_record(BatchKind::Gala, DimensionFormula::Area, &record).unwrap();
        assert_eq!(num(&derived["addmeasures"][0]["cost"]), dec!(120));
        assert_eq!(num(&derived["addmeasures"][1]["cost"]), dec!(50));
        assert_eq!(num(&derived["total_gala_area"]), dec!(7));
        assert_eq!(num(&derived["total_gala_cost"]), dec!(170));
    }

    #[test]
    fn test_group_logistics_add_to_surcharge() {
        let record = json!({
            "hydra_cost": 10,
            "groups": [
                { "hydra_cost": 5, "truck_cost": "7", "measures": [{ "l": 1, "b": 1, "h": 1, "rate": 100 }] }
            ]
        });
        let derived =
            derive_record(BatchKind::Block, DimensionFormula::Volumetric, &record).unwrap();
        assert_eq!(num(&derived["total_block_cost"]), dec!(122));
        assert_eq!(num(&derived["groups"][0]["total_cost"]), dec!(100));
    }

    #[test]
    fn test_remaining_payment_uses_received_amounts() {
        let mut record = block_record();
        record["partyAdvancePayment"] = json!(100);
        record["receivedAmounts"] = json!([
            { "amount": 100, "date": "2024-02-01", "description": "cash" },
            { "amount": "102", "date": "2024-02-03T10:00:00.000Z" }
        ]);
        let derived =
            derive_record(BatchKind::Block, DimensionFormula::Volumetric, &record).unwrap();
        assert_eq!(num(&derived["partyRemainingPayment"]), dec!(-50));
    }

    #[test]
    fn test_non_object_record_rejected() {
        let err = derive_record(BatchKind::Block, DimensionFormula::Area, &json!([1, 2]))
            .unwrap_err();
        assert_eq!(err.field(), "$");
    }

    #[test]
    fn test_derive_fields_leaves_record_on_error() {
        let Value::Object(mut fields) = json!({
            "depreciation": 150,
            "groups": [{ "measures": [{ "l": 1, "b": 1, "h": 1, "rate": 1 }] }]
        }) else {
            unreachable!()
        };
        let before = fields.clone();
        let err = derive_fields(BatchKind::Block, DimensionFormula::Volumetric, &mut fields)
            .unwrap_err();
        assert_eq!(err.field(), "depreciation");
        assert_eq!(fields, before);
    }

    #[test]
    fn test_input_record_untouched() {
        let record = block_record();
        let before = record.clone();
        let _ = derive_record(BatchKind::Block, DimensionFormula::Volumetric, &record).unwrap();
        assert_eq!(record, before);
    }

    #[test]
    fn test_lenient_decimal() {
        assert_eq!(lenient_decimal(&json!(12.5)), dec!(12.5));
        assert_eq!(lenient_decimal(&json!("1e3")), dec!(1000));
        assert_eq!(lenient_decimal(&json!("  7 ")), dec!(7));
        assert!(lenient_decimal(&json!("twelve")).is_zero());
        assert!(lenient_decimal(&json!(true)).is_zero());
        assert!(lenient_decimal(&Value::Null).is_zero());
    }

    #[test]
    fn test_lenient_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 3);
        assert_eq!(lenient_date(&json!("2024-02-03")), expected);
        assert_eq!(lenient_date(&json!("2024-02-03T10:00:00.000Z")), expected);
        assert_eq!(lenient_date(&json!("03/02/2024")), None);
        assert_eq!(lenient_date(&json!(20_240_203)), None);
    }

    #[test]
    fn test_decimal_to_json() {
        assert_eq!(decimal_to_json(dec!(252.00)), json!(252));
        assert_eq!(decimal_to_json(dec!(0.5)), json!(0.5));
        assert_eq!(decimal_to_json(dec!(-100)), json!(-100));
    }

    #[test]
    fn test_vendor_account_record_roundtrip() {
        let Value::Object(mut record) = json!({
            "name": "Sharma Transport",
            "receivedAmounts": [{ "amount": "1500", "date": "2024-04-01", "description": "advance" }, 250]
        }) else {
            unreachable!()
        };
        let account = VendorAccount::from_record(&record);
        assert_eq!(account.balance().unwrap(), dec!(1750));

        let updated = crate::append_received_amount(
            &account,
            dec!(250),
            NaiveDate::from_ymd_opt(2024, 4, 9),
            "second instalment",
        );
        updated.merge_into_record(&mut record).unwrap();

        assert_eq!(record["receivedAmounts"].as_array().unwrap().len(), 3);
        assert_eq!(record["receivedAmounts"][2]["date"], "2024-04-09");
        assert_eq!(num(&record["balance"]), dec!(2000));
        assert_eq!(record["name"], "Sharma Transport");
    }

    #[test]
    fn test_group_without_measures_keeps_estimate_and_logistics() {
        let record = json!({
            "estimate_cost": 5000,
            "groups": [{ "date": "2024-01-01", "hydra_cost": 50, "truck_cost": 30 }]
        });
        let derived =
            derive_record(BatchKind::Block, DimensionFormula::Volumetric, &record).unwrap();
        assert_eq!(num(&derived["final_cost"]), dec!(5000));
        assert_eq!(num(&derived["total_block_cost"]), dec!(80));
        assert!(num(&derived["total_block_area"]).is_zero());

        let group = derived["groups"][0].as_object().unwrap();
        assert!(!group.contains_key("area"));
        assert!(!group.contains_key("cost"));
        assert!(num(&group["total_cost"]).is_zero());

        let with_empty_list = json!({
            "estimate_cost": 5000,
            "groups": [{ "date": "2024-01-01", "hydra_cost": 50, "truck_cost": 30, "measures": [] }]
        });
        let derived_empty =
            derive_record(BatchKind::Block, DimensionFormula::Volumetric, &with_empty_list)
                .unwrap();
        assert_eq!(derived_empty["final_cost"], derived["final_cost"]);
        assert_eq!(derived_empty["total_block_cost"], derived["total_block_cost"]);
    }

    #[test]
    fn test_partial_groups_beside_measured_groups() {
        let record = json!({
            "estimate_cost": 9999,
            "groups": [
                { "date": "2024-01-05", "measures": [{ "l": 2, "b": 1, "h": 0.5, "rate": 100 }] },
                { "date": "2024-01-06", "truck_cost": 30 },
                {}
            ]
        });
        let derived =
            derive_record(BatchKind::Block, DimensionFormula::Volumetric, &record).unwrap();
        assert_eq!(num(&derived["total_block_cost"]), dec!(130));
        assert_eq!(num(&derived["final_cost"]), dec!(130));
    }

    #[test]
    fn test_entries_without_dimensions_are_not_measures() {
        let record = json!({
            "estimate_cost": 700,
            "groups": [{ "measures": [{ "rate": 10 }, {}] }]
        });
        let derived = derive_record(BatchKind::Todi, DimensionFormula::Area, &record).unwrap();
        assert_eq!(num(&derived["final_cost"]), dec!(700));
        assert!(derived["groups"][0]["measures"][0].get("area").is_none());
    }

    #[test]
    fn test_huge_logistics_rejected_not_panicking() {
        let record = json!({
            "hydra_cost": "79228162514264337593543950335",
            "truck_cost": "79228162514264337593543950335"
        });
        let err = derive_record(BatchKind::Block, DimensionFormula::Volumetric, &record)
            .unwrap_err();
        assert_eq!(err.field(), "total_cost");
    }

    #[test]
    fn test_huge_measure_sum_rejected_not_panicking() {
        let record = json!({
            "addmeasures": [
                { "l": "1e14", "b": "1e14", "h": 1, "rate": 5 },
                { "l": "1e14", "b": "1e14", "h": 1, "rate": 5 }
            ]
        });
        let err = derive_record(BatchKind::Block, DimensionFormula::Volumetric, &record)
            .unwrap_err();
        assert_eq!(err.field(), "total_cost");
    }

    #[test]
    fn test_huge_depreciated_cost_rejected() {
        let record = json!({
            "depreciation": 10,
            "addmeasures": [{ "l": 1, "b": 1, "h": 1, "rate": "79228162514264337593543950335" }]
        });
        let err = derive_record(BatchKind::Stone, DimensionFormula::Volumetric, &record)
            .unwrap_err();
        assert_eq!(err.field(), "final_cost");
    }

    #[test]
    fn test_high_precision_values_survive_storage() {
        let precise = dec!(1234567.123456789012345);
        let encoded = decimal_to_json(precise);
        assert!(encoded.is_string());
        assert_eq!(lenient_decimal(&encoded), precise);

        let record = json!({
            "groups": [{ "measures": [{ "l": "1.000000000001", "b": "3.3333333333333", "h": 1, "rate": 7 }] }]
        });
        let once = derive_record(BatchKind::Block, DimensionFormula::Volumetric, &record).unwrap();
        let twice = derive_record(BatchKind::Block, DimensionFormula::Volumetric, &once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            num(&once["final_cost"]),
            dec!(1.000000000001) * dec!(3.3333333333333) * dec!(7)
        );
    }

    #[test]
    fn test_pointer_to_path() {
        assert_eq!(pointer_to_path("/groups/0/measures/12"), "groups[0].measures[12]");
        assert_eq!(pointer_to_path("/addmeasures/3"), "addmeasures[3]");
    }
}
