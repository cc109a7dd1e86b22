//! FILENAME: core/engine/src/evaluator.rs
//! PURPOSE: Evaluates validated formulas to numbers.
//! CONTEXT: After a formula is built by the parser crate, this module walks its
//! tokens left to right with an operator stack and a value stack, applying the
//! usual precedence (`*` and `/` before `+` and `-`, parentheses first).
//!
//! Variables are resolved through a `Lookup`, the only capability the
//! evaluator has into the outside world. Evaluation never panics: every
//! failure comes back as an `EvalError` value.

use parser::{Formula, Operator, Token};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a formula could not produce a number.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvalError {
    #[error("Division by zero")]
    DivideByZero,

    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Malformed expression: {0}")]
    Malformed(String),

    /// The result left the finite range of `f64` (infinity or NaN).
    #[error("Numeric overflow")]
    Overflow,
}

pub type EvalResult = Result<f64, EvalError>;

/// Resolves a normalized variable name to a number, or `None` when the
/// variable has no numeric value.
pub trait Lookup {
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn lookup(&self, name: &str) -> Option<f64> {
        self(name)
    }
}

/// Entry of the operator stack.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StackOp {
    Arith(Operator),
    LParen,
}

pub struct Evaluator<'a, L: Lookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: Lookup + ?Sized> Evaluator<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Evaluator { lookup }
    }

    pub fn evaluate(&self, formula: &Formula) -> EvalResult {
        let mut ops: Vec<StackOp> = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        for token in formula.tokens() {
            match token {
                Token::Operator(op @ (Operator::Add | Operator::Subtract)) => {
                    resolve_additive(&mut ops, &mut values)?;
                    ops.push(StackOp::Arith(*op));
                }
                Token::Operator(op) => ops.push(StackOp::Arith(*op)),
                Token::LParen => ops.push(StackOp::LParen),
                Token::RParen => {
                    resolve_additive(&mut ops, &mut values)?;
                    match ops.pop() {
                        Some(StackOp::LParen) => {}
                        _ => return Err(malformed("')' without matching '('")),
                    }
                    if let Some(&StackOp::Arith(op)) = ops.last() {
                        if op.is_multiplicative() {
                            ops.pop();
                            let right = pop_value(&mut values)?;
                            let left = pop_value(&mut values)?;
                            values.push(apply(op, left, right)?);
                        }
                    }
                }
                Token::Number(n) => self.push_operand(*n, &mut ops, &mut values)?,
                Token::Variable(name) => {
                    let name = formula.rules().normalize(name);
                    let value = self
                        .lookup
                        .lookup(&name)
                        .ok_or(EvalError::UndefinedVariable(name))?;
                    self.push_operand(value, &mut ops, &mut values)?;
                }
                Token::Illegal(text) => return Err(malformed(&format!("illegal token '{}'", text))),
            }
        }

        match (ops.as_slice(), values.as_slice()) {
            ([], [value]) => finite(*value),
            ([], _) => Err(malformed("expected exactly one value")),
            ([StackOp::Arith(op)], [left, right]) if !op.is_multiplicative() => {
                apply(*op, *left, *right)
            }
            _ => Err(malformed("leftover operators")),
        }
    }

    /// Pushes a number, first folding it into a pending `*` or `/`.
    fn push_operand(&self, value: f64, ops: &mut Vec<StackOp>, values: &mut Vec<f64>) -> Result<(), EvalError> {
        if let Some(&StackOp::Arith(op)) = ops.last() {
            if op.is_multiplicative() {
                ops.pop();
                let left = pop_value(values)?;
                values.push(apply(op, left, value)?);
                return Ok(());
            }
        }
        values.push(value);
        Ok(())
    }
}

/// Applies a pending `+` or `-` on top of the operator stack, if any.
fn resolve_additive(ops: &mut Vec<StackOp>, values: &mut Vec<f64>) -> Result<(), EvalError> {
    if let Some(&StackOp::Arith(op)) = ops.last() {
        if !op.is_multiplicative() {
            ops.pop();
            let right = pop_value(values)?;
            let left = pop_value(values)?;
            values.push(apply(op, left, right)?);
        }
    }
    Ok(())
}

fn pop_value(values: &mut Vec<f64>) -> Result<f64, EvalError> {
    values.pop().ok_or_else(|| malformed("missing operand"))
}

fn apply(op: Operator, left: f64, right: f64) -> EvalResult {
    let result = match op {
        Operator::Add => left + right,
        Operator::Subtract => left - right,
        Operator::Multiply => left * right,
        Operator::Divide if right == 0.0 => return Err(EvalError::DivideByZero),
        Operator::Divide => left / right,
    };
    finite(result)
}

/// Cached values must serialize, so infinities and NaN never escape.
fn finite(value: f64) -> EvalResult {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::Overflow)
    }
}

fn malformed(reason: &str) -> EvalError {
    EvalError::Malformed(reason.to_string())
}

/// Evaluates `formula`, resolving variables with `lookup`.
pub fn evaluate<L: Lookup + ?Sized>(formula: &Formula, lookup: &L) -> EvalResult {
    Evaluator::new(lookup).evaluate(formula)
}
