//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the spreadsheet engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod dependency_graph;
pub mod error;
pub mod evaluator;
pub mod recalc;
pub mod spreadsheet;

// Re-export commonly used types at the crate root
pub use cell::{Cell, CellContents, CellValue};
pub use dependency_graph::DependencyGraph;
pub use error::{CycleError, SpreadsheetError, SpreadsheetResult};
pub use evaluator::{evaluate, EvalError, EvalResult, Evaluator, Lookup};
pub use parser::{Formula, FormulaFormatError, FormulaRules};
pub use recalc::cells_to_recalculate;
pub use spreadsheet::{Spreadsheet, DEFAULT_VERSION};
