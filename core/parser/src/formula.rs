//! FILENAME: core/parser/src/formula.rs
//! PURPOSE: Validated, immutable infix formulas.
//! CONTEXT: A `Formula` is built once from user text. Construction runs the
//! lexer, checks the token grammar, and normalizes variable names through the
//! caller's `FormulaRules`. Nothing is evaluated here; the engine crate walks
//! the stored tokens later.
//!
//! GRAMMAR CHECKS (in order):
//! 1. At least one token, and no illegal tokens
//! 2. Starts with number / variable / "(", ends with number / variable / ")"
//! 3. Closing parentheses never outnumber opening ones, and the counts match
//! 4. After an operator or "(": number / variable / "("
//! 5. After a number / variable / ")": operator or ")"
//! 6. Every normalized variable passes the validity predicate

use crate::error::FormulaFormatError;
use crate::lexer::{is_valid_name, Lexer};
use crate::token::Token;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

type NormalizeFn = dyn Fn(&str) -> String + Send + Sync;
type ValidateFn = dyn Fn(&str) -> bool + Send + Sync;

/// The variable-name policy shared by a spreadsheet and every formula it builds:
/// a normalizer (e.g. upper-casing) and a validity predicate applied to the
/// normalized form.
#[derive(Clone)]
pub struct FormulaRules {
    normalize: Arc<NormalizeFn>,
    is_valid: Arc<ValidateFn>,
}

impl FormulaRules {
    pub fn new<N, V>(normalize: N, is_valid: V) -> Self
    where
        N: Fn(&str) -> String + Send + Sync + 'static,
        V: Fn(&str) -> bool + Send + Sync + 'static,
    {
        FormulaRules {
            normalize: Arc::new(normalize),
            is_valid: Arc::new(is_valid),
        }
    }

    pub fn normalize(&self, name: &str) -> String {
        (self.normalize)(name)
    }

    pub fn is_valid(&self, name: &str) -> bool {
        (self.is_valid)(name)
    }
}

impl Default for FormulaRules {
    /// Identity normalizer, every name valid.
    fn default() -> Self {
        FormulaRules::new(|name| name.to_string(), |_| true)
    }
}

impl fmt::Debug for FormulaRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaRules").finish_non_exhaustive()
    }
}

pub type FormulaResult<T> = Result<T, FormulaFormatError>;

/// A syntactically valid infix arithmetic formula.
///
/// Equality and hashing go through the canonical text (`Display`), so
/// formulas whose literals differ only in spelling (`2.0` vs `2e0`) are equal.
#[derive(Clone)]
pub struct Formula {
    tokens: Vec<Token>,
    rules: FormulaRules,
}

impl Formula {
    /// Builds a formula with the identity normalizer and no extra validity rule.
    pub fn new(text: &str) -> FormulaResult<Self> {
        Formula::with_rules(text, FormulaRules::default())
    }

    /// Builds a formula, normalizing every variable through `rules` and
    /// rejecting any whose normalized form is not valid.
    pub fn with_rules(text: &str, rules: FormulaRules) -> FormulaResult<Self> {
        let raw: Vec<Token> = Lexer::new(text).collect();
        let tokens = validate(raw, &rules)?;
        Ok(Formula { tokens, rules })
    }

    /// The validated tokens, variables already normalized.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn rules(&self) -> &FormulaRules {
        &self.rules
    }

    /// The distinct normalized variable names this formula references.
    pub fn variables(&self) -> HashSet<String> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Variable(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

fn validate(tokens: Vec<Token>, rules: &FormulaRules) -> FormulaResult<Vec<Token>> {
    let (first, last) = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(FormulaFormatError::Empty),
    };

    if let Some(Token::Illegal(text)) = tokens.iter().find(|t| matches!(t, Token::Illegal(_))) {
        return Err(FormulaFormatError::IllegalToken(text.clone()));
    }
    if !first.can_start_operand() {
        return Err(FormulaFormatError::InvalidStart(first.to_string()));
    }
    if !last.can_end_operand() {
        return Err(FormulaFormatError::InvalidEnd(last.to_string()));
    }

    let mut opened = 0usize;
    let mut closed = 0usize;
    let mut previous: Option<&Token> = None;
    let mut normalized = Vec::with_capacity(tokens.len());

    for (position, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => opened += 1,
            Token::RParen => {
                closed += 1;
                if closed > opened {
                    return Err(FormulaFormatError::UnmatchedClose { position });
                }
            }
            _ => {}
        }

        if let Some(prev) = previous {
            if prev.can_end_operand() {
                if !matches!(token, Token::Operator(_) | Token::RParen) {
                    return Err(FormulaFormatError::ExpectedOperator {
                        previous: prev.to_string(),
                        found: token.to_string(),
                    });
                }
            } else if !token.can_start_operand() {
                return Err(FormulaFormatError::ExpectedOperand {
                    previous: prev.to_string(),
                    found: token.to_string(),
                });
            }
        }

        normalized.push(match token {
            Token::Variable(name) => {
                let name = rules.normalize(name);
                if !is_valid_name(&name) || !rules.is_valid(&name) {
                    return Err(FormulaFormatError::InvalidVariable(name));
                }
                Token::Variable(name)
            }
            other => other.clone(),
        });
        previous = Some(token);
    }

    if opened != closed {
        return Err(FormulaFormatError::UnbalancedParens { opened, closed });
    }

    Ok(normalized)
}

impl fmt::Display for Formula {
    /// Canonical text: tokens joined without whitespace, numbers re-formatted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Formula").field(&self.to_string()).finish()
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl FromStr for Formula {
    type Err = FormulaFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}
