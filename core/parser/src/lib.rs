//! FILENAME: core/parser/src/lib.rs
//! PURPOSE: Library root for the Cellgraph formula parser.
//! CONTEXT: This crate turns formula strings into validated, immutable
//! token sequences. Evaluation lives in the engine crate.
//!
//! PIPELINE: Formula String --> Lexer --> Tokens --> Validation --> Formula --> Evaluator
//!
//! SUPPORTED FEATURES:
//! - Arithmetic: +, -, *, /
//! - Parentheses for grouping
//! - Decimal and scientific number literals: 3, 0.5, 1e6
//! - Variables (cell names): A1, total_2, _tmp

pub mod error;
pub mod formula;
pub mod lexer;
pub mod token;


// Re-export commonly used types for convenience
pub use error::FormulaFormatError;
pub use formula::{Formula, FormulaResult, FormulaRules};
pub use lexer::{is_valid_name, Lexer};
pub use token::{Operator, Token};
