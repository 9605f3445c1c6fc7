use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::FoodEntry;
use crate::state::FoodLedger;

/// Write the ledger to `path` in the canonical export form.
pub fn export_ledger<P: AsRef<Path>>(path: P, ledger: &FoodLedger) -> Result<()> {
    fs::write(path, ledger.to_json())?;
    Ok(())
}

/// Read and parse an exported ledger file.
///
/// Returns the parsed entries so the caller can decide when to swap them
/// in; any IO, parse, or validation failure leaves the caller's ledger
/// untouched.
pub fn import_ledger<P: AsRef<Path>>(path: P) -> Result<Vec<FoodEntry>> {
    let content = fs::read_to_string(path)?;
    FoodLedger::parse_entries(&content)
}
