//! FILENAME: core/parser/src/error.rs

use thiserror::Error;

/// Raised when a formula string cannot become a `Formula`.
/// Always detected at construction time, before any evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaFormatError {
    #[error("The formula is empty")]
    Empty,

    #[error("Invalid token: {0}")]
    IllegalToken(String),

    #[error("The formula must start with a number, variable or '(' but starts with '{0}'")]
    InvalidStart(String),

    #[error("The formula must end with a number, variable or ')' but ends with '{0}'")]
    InvalidEnd(String),

    #[error("Closing parenthesis has no matching '(' at token {position}")]
    UnmatchedClose { position: usize },

    #[error("{opened} '(' but {closed} ')'")]
    UnbalancedParens { opened: usize, closed: usize },

    #[error("'{previous}' must be followed by a number, variable or '(' but found '{found}'")]
    ExpectedOperand { previous: String, found: String },

    #[error("'{previous}' must be followed by an operator or ')' but found '{found}'")]
    ExpectedOperator { previous: String, found: String },

    #[error("Invalid variable: {0}")]
    InvalidVariable(String),
}
