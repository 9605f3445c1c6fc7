use crate::error::{Result, TrackerError};
use crate::models::{FoodEntry, Totals};

/// Ordered ledger of logged food entries.
///
/// Insertion order is display order; totals and export both preserve it.
/// Entries are immutable once appended and are only removed by replacing
/// the whole list (import).
#[derive(Debug, Default)]
pub struct FoodLedger {
    entries: Vec<FoodEntry>,
}

impl FoodLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the end of the ledger.
    ///
    /// The caller is responsible for validating the entry first.
    pub fn append(&mut self, entry: FoodEntry) {
        self.entries.push(entry);
    }

    /// Replace every entry with `entries`, used by import.
    ///
    /// Fails without touching the current ledger if any element violates
    /// the entry invariant.
    pub fn replace_all(&mut self, entries: Vec<FoodEntry>) -> Result<()> {
        for entry in &entries {
            entry.validate()?;
        }
        self.entries = entries;
        Ok(())
    }

    /// Running totals, recomputed on every call.
    pub fn totals(&self) -> Totals {
        Totals::from_entries(&self.entries)
    }

    pub fn entries(&self) -> &[FoodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical export form: a JSON array in display order, 2-space
    /// indented.
    pub fn to_json(&self) -> String {
        // A Vec of plain serde structs cannot fail to serialize.
        serde_json::to_string_pretty(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parse the export form back into an entry list.
    ///
    /// Malformed JSON reports `Parse`; well-formed JSON whose entries are
    /// missing fields, carry wrong-typed or extra fields, or break the
    /// numeric invariant reports `Validation`.
    pub fn parse_entries(text: &str) -> Result<Vec<FoodEntry>> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(TrackerError::Parse)?;

        let entries: Vec<FoodEntry> = serde_json::from_value(value)
            .map_err(|e| TrackerError::Validation(format!("invalid food entry: {}", e)))?;

        for entry in &entries {
            entry.validate()?;
        }

        Ok(entries)
    }

    /// Parse `text` and replace the ledger with the result.
    ///
    /// On any failure the existing entries are left unchanged.
    pub fn load_json(&mut self, text: &str) -> Result<()> {
        let entries = Self::parse_entries(text)?;
        self.entries = entries;
        Ok(())
    }
}
