//! FILENAME: core/persistence/src/json_reader.rs

use crate::{PersistenceError, Snapshot};
use engine::Spreadsheet;
use log::info;
use parser::FormulaRules;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Loads the spreadsheet stored at `path`, which must have been saved under
/// `version`. Names and formulas are checked against `rules` as they are
/// replayed.
pub fn load(path: &Path, rules: FormulaRules, version: &str) -> Result<Spreadsheet, PersistenceError> {
    let json = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&json)?;
    let sheet = snapshot.to_spreadsheet(rules, version)?;

    info!("loaded {} cell(s) from {}", snapshot.cells.len(), path.display());
    Ok(sheet)
}

/// Only the version tag of a snapshot; cells are not parsed or replayed.
#[derive(Deserialize)]
struct VersionOnly {
    #[serde(rename = "Version")]
    version: String,
}

/// Reads the version tag a snapshot was saved under.
pub fn saved_version(path: &Path) -> Result<String, PersistenceError> {
    let json = fs::read_to_string(path)?;
    let header: VersionOnly = serde_json::from_str(&json)?;
    Ok(header.version)
}
