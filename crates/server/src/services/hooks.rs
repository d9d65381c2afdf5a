//! Before-change hook applied to every write.
//!
//! Batch collections (blocks, todis, galas, stones) get their derived cost
//! and area fields recomputed from the merged record. Other collections pass
//! through unchanged.

use serde_json::{Map, Value};

use quarry_ledger_core::{AggregateError, Collection, FormulaTable, derive_fields};

/// Prepare `data` for storage in `collection`.
///
/// # Errors
///
/// Returns the aggregator's rejection for an invalid batch record. The
/// caller must not persist anything in that case.
pub fn before_change(
    collection: Collection,
    formulas: FormulaTable,
    mut data: Map<String, Value>,
) -> Result<Map<String, Value>, AggregateError> {
    let Some(kind) = collection.batch_kind() else {
        return Ok(data);
    };

    let formula = formulas.formula_for(kind);
    derive_fields(kind, formula, &mut data).inspect_err(|e| {
        tracing::debug!(collection = %collection, field = e.field(), "Batch record rejected");
    })?;
    Ok(data)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_non_batch_collection_untouched() {
        let data = fields(json!({ "name": "Rathore Minerals", "hydra_cost": -5 }));
        let out = before_change(Collection::Vendors, FormulaTable::default(), data.clone()).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_batch_collection_derived() {
        let data = fields(json!({
            "rate": 10,
            "addmeasures": [{ "l": 2, "b": 3, "h": 4 }]
        }));
        let out = before_change(Collection::Todis, FormulaTable::default(), data).unwrap();
        assert_eq!(out["total_todi_area"], 6);
        assert_eq!(out["total_todi_cost"], 60);
        assert_eq!(out["final_cost"], 60);
    }

    #[test]
    fn test_configured_formula_is_used() {
        let formulas = FormulaTable::default().with(
            quarry_ledger_core::BatchKind::Todi,
            quarry_ledger_core::DimensionFormula::Volumetric,
        );
        let data = fields(json!({
            "rate": 10,
            "addmeasures": [{ "l": 2, "b": 3, "h": 4 }]
        }));
        let out = before_change(Collection::Todis, formulas, data).unwrap();
        assert_eq!(out["total_todi_area"], 24);
    }

    #[test]
    fn test_rejection_propagates() {
        let data = fields(json!({ "depreciation": 120 }));
        let err = before_change(Collection::Stones, FormulaTable::default(), data).unwrap_err();
        assert_eq!(err.field(), "depreciation");
    }
}
