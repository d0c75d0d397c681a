//! Ledger ingestion: JSON document → flat tabular records.
//!
//! Each transaction object is flattened into a [`FlatRecord`] keyed by
//! `_`-joined paths, so `actionData.amount` becomes `actionData_amount`.

mod flatten;
mod loader;

pub use flatten::{flatten_object, flatten_value, KEY_SEPARATOR};
pub use loader::{load, load_str};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One ledger entry after flattening
pub type FlatRecord = BTreeMap<String, Value>;

/// Flattened ledger: one row per transaction, one column per flattened key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerTable {
    rows: Vec<FlatRecord>,
    columns: BTreeSet<String>,
}

impl LedgerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: FlatRecord) {
        self.columns.extend(row.keys().cloned());
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[FlatRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<FlatRecord> {
        self.rows
    }

    /// Union of keys seen in any row
    pub fn columns(&self) -> &BTreeSet<String> {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<FlatRecord> for LedgerTable {
    fn from_iter<I: IntoIterator<Item = FlatRecord>>(iter: I) -> Self {
        let mut table = LedgerTable::new();
        for row in iter {
            table.push(row);
        }
        table
    }
}
