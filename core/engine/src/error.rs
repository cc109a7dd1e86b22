//! FILENAME: core/engine/src/error.rs

use parser::FormulaFormatError;
use thiserror::Error;

/// A content update would make a cell depend on itself.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Circular reference detected: {}", .cycle_path.join(" -> "))]
pub struct CycleError {
    /// The cells involved in the cycle, starting and ending with the same name.
    pub cycle_path: Vec<String>,
}

/// Failures of spreadsheet operations. Any of these leaves the spreadsheet
/// exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpreadsheetError {
    #[error("Invalid cell name: {0:?}")]
    InvalidName(String),

    #[error("Invalid formula: {0}")]
    FormulaFormat(#[from] FormulaFormatError),

    #[error(transparent)]
    CircularDependency(#[from] CycleError),
}

pub type SpreadsheetResult<T> = Result<T, SpreadsheetError>;
