//! FILENAME: core/persistence/src/json_writer.rs

use crate::{PersistenceError, Snapshot};
use engine::Spreadsheet;
use log::info;
use std::fs;
use std::path::Path;

/// Writes `sheet` to `path` and clears its changed flag.
/// On failure the flag is left as it was.
pub fn save(sheet: &mut Spreadsheet, path: &Path) -> Result<(), PersistenceError> {
    let snapshot = Snapshot::from_spreadsheet(sheet);
    let json = serde_json::to_string(&snapshot)?;
    fs::write(path, json)?;

    sheet.mark_saved();
    info!("saved {} cell(s) to {}", snapshot.cells.len(), path.display());
    Ok(())
}
