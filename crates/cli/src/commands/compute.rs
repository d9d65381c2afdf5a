//! Offline derived-field computation.
//!
//! Reads one batch record as JSON, fills in its derived fields exactly as the
//! server would before storing it, and prints the result to stdout.

use std::io::Read;
use std::path::Path;

use quarry_ledger_core::{BatchKind, DimensionFormula, derive_record};
use quarry_ledger_server::config::ServerConfig;
use serde_json::Value;

/// Compute and print the derived fields of a record.
///
/// Without `formula`, the formula configured for `kind` (see
/// `QUARRY_FORMULA_*`) is used.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, the configuration
/// is invalid, or the record is rejected.
pub fn run(
    kind: BatchKind,
    input: Option<&Path>,
    formula: Option<DimensionFormula>,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let formula = match formula {
        Some(formula) => formula,
        None => ServerConfig::from_env()?.formulas.formula_for(kind),
    };

    let derived = compute(kind, formula, &raw)?;
    tracing::debug!(kind = %kind, formula = %formula, "Record computed");

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&derived)?);
    }
    Ok(())
}

fn compute(
    kind: BatchKind,
    formula: DimensionFormula,
    raw: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let record: Value = serde_json::from_str(raw)?;
    Ok(derive_record(kind, formula, &record)?)
}
