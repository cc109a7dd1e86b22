//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the data held by a single named cell.
//! CONTEXT: A cell separates what the user typed (`CellContents`) from the
//! cached result of the last recalculation (`CellValue`).

use crate::evaluator::EvalError;
use parser::Formula;
use serde::{Deserialize, Serialize};

/// What the user put in a cell. Empty text means "nothing".
#[derive(Debug, Clone, PartialEq)]
pub enum CellContents {
    Text(String),
    Number(f64),
    Formula(Formula),
}

impl CellContents {
    pub const EMPTY: CellContents = CellContents::Text(String::new());

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContents::Text(text) if text.is_empty())
    }

    /// The text that reproduces these contents when fed back into
    /// `Spreadsheet::set_contents_of_cell`.
    pub fn string_form(&self) -> String {
        match self {
            CellContents::Text(text) => text.clone(),
            CellContents::Number(n) => n.to_string(),
            CellContents::Formula(formula) => format!("={}", formula),
        }
    }
}

impl Default for CellContents {
    fn default() -> Self {
        CellContents::EMPTY
    }
}

/// The cached result of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error(EvalError),
}

impl CellValue {
    pub const EMPTY: CellValue = CellValue::Text(String::new());

    /// The numeric value other formulas may read, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::EMPTY
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub contents: CellContents,
    pub value: CellValue,
}

impl Cell {
    /// Builds a cell whose value is its contents. Formula cells start with an
    /// empty value until the spreadsheet evaluates them.
    pub fn new(contents: CellContents) -> Self {
        let value = match &contents {
            CellContents::Text(text) => CellValue::Text(text.clone()),
            CellContents::Number(n) => CellValue::Number(*n),
            CellContents::Formula(_) => CellValue::EMPTY,
        };
        Cell { contents, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_contents() {
        assert!(CellContents::EMPTY.is_empty());
        assert!(CellContents::default().is_empty());
        assert!(!CellContents::Text(" ".to_string()).is_empty());
        assert!(!CellContents::Number(0.0).is_empty());
    }

    #[test]
    fn test_string_form() {
        assert_eq!(CellContents::Number(5.0).string_form(), "5");
        assert_eq!(CellContents::Number(0.25).string_form(), "0.25");
        assert_eq!(CellContents::Text("hi".to_string()).string_form(), "hi");

        let formula = Formula::new("A1 + 2.0").unwrap();
        assert_eq!(CellContents::Formula(formula).string_form(), "=A1+2");
    }

    #[test]
    fn test_value_as_number() {
        assert_eq!(CellValue::Number(3.0).as_number(), Some(3.0));
        assert_eq!(CellValue::Text("3".to_string()).as_number(), None);
        assert_eq!(CellValue::Error(EvalError::DivideByZero).as_number(), None);
        assert!(CellValue::Error(EvalError::DivideByZero).is_error());
    }

    #[test]
    fn test_new_cell_copies_literal_contents() {
        let cell = Cell::new(CellContents::Number(4.0));
        assert_eq!(cell.value, CellValue::Number(4.0));

        let cell = Cell::new(CellContents::Formula(Formula::new("1").unwrap()));
        assert_eq!(cell.value, CellValue::EMPTY);
    }

    #[test]
    fn test_value_serializes() {
        let json = serde_json::to_string(&CellValue::Number(1.5)).unwrap();
        let back: CellValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellValue::Number(1.5));
    }

    #[test]
    fn test_error_value_serializes() {
        let value = CellValue::Error(EvalError::Overflow);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(serde_json::from_str::<CellValue>(&json).unwrap(), value);
    }
}
