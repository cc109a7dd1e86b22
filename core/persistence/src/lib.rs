//! FILENAME: core/persistence/src/lib.rs
//! Cellgraph Persistence Module
//!
//! Saves and loads spreadsheets as JSON snapshots. A snapshot stores only what
//! the user typed; values are recomputed by replaying every cell through
//! `Spreadsheet::set_contents_of_cell` on load.
//!
//! FORMAT:
//! {"cells":{"A1":{"stringForm":"5"},"B3":{"stringForm":"=A1+2"}},"Version":"default"}

mod error;
mod json_reader;
mod json_writer;

pub use error::PersistenceError;
pub use json_reader::{load, saved_version};
pub use json_writer::save;

use engine::Spreadsheet;
use indexmap::IndexMap;
use log::debug;
use parser::FormulaRules;
use serde::{Deserialize, Serialize};

// ============================================================================
// SNAPSHOT
// ============================================================================

/// The on-disk form of a spreadsheet. Cells keep the order they have in the
/// file; a saved spreadsheet writes them in name order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cells: IndexMap<String, SavedCell>,
    #[serde(rename = "Version")]
    pub version: String,
}

/// One non-empty cell: the text that recreates its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCell {
    pub string_form: String,
}

impl Snapshot {
    pub fn from_spreadsheet(sheet: &Spreadsheet) -> Self {
        let cells = sheet
            .nonempty_cells()
            .map(|(name, cell)| {
                let saved = SavedCell {
                    string_form: cell.contents.string_form(),
                };
                (name.to_string(), saved)
            })
            .collect();

        Snapshot {
            cells,
            version: sheet.version().to_string(),
        }
    }

    /// Rebuilds a spreadsheet, rejecting a snapshot written under another
    /// version. Cells are replayed in stored order; the first failure aborts.
    pub fn to_spreadsheet(&self, rules: FormulaRules, version: &str) -> Result<Spreadsheet, PersistenceError> {
        if self.version != version {
            return Err(PersistenceError::VersionMismatch {
                expected: version.to_string(),
                found: self.version.clone(),
            });
        }

        let mut sheet = Spreadsheet::with_rules(rules, version);
        for (name, saved) in &self.cells {
            sheet
                .set_contents_of_cell(name, &saved.string_form)
                .map_err(|source| PersistenceError::Replay {
                    cell: name.clone(),
                    source,
                })?;
        }
        sheet.mark_saved();

        debug!("restored {} cell(s), version {:?}", self.cells.len(), version);
        Ok(sheet)
    }
}

/// Serializes `sheet` to snapshot JSON.
pub fn to_json(sheet: &Spreadsheet) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&Snapshot::from_spreadsheet(sheet))?)
}

/// Parses snapshot JSON and rebuilds the spreadsheet it describes.
pub fn from_json(json: &str, rules: FormulaRules, version: &str) -> Result<Spreadsheet, PersistenceError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    snapshot.to_spreadsheet(rules, version)
}
