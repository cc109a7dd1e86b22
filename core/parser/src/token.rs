//! FILENAME: core/parser/src/token.rs
//! PURPOSE: Token definitions for the formula lexer.
//! CONTEXT: Tokens are the atomic units produced by the lexer and validated by
//! `Formula` construction. Once a formula is built its tokens never change.

/// The four arithmetic operators a formula may contain.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Returns true for `*` and `/`, which bind tighter than `+` and `-`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }
}

/// Tokens recognized by the formula lexer.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // Operands
    Number(f64),
    Variable(String),

    Operator(Operator),

    // Delimiters
    LParen,
    RParen,

    /// Input that matches none of the patterns above. Never survives validation.
    Illegal(String),
}

impl Token {
    /// Numbers and variables: the tokens that produce a value on their own.
    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_))
    }

    /// Tokens allowed to open an expression or follow an operator / `(`.
    pub fn can_start_operand(&self) -> bool {
        self.is_operand() || *self == Token::LParen
    }

    /// Tokens allowed to close an expression or precede an operator / `)`.
    pub fn can_end_operand(&self) -> bool {
        self.is_operand() || *self == Token::RParen
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // f64's Display is the shortest text that parses back to the same
            // value, so "2.000", "2e0" and "2" all render as "2".
            Token::Number(n) => write!(f, "{}", n),
            Token::Variable(s) => write!(f, "{}", s),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Illegal(s) => write!(f, "{}", s),
        }
    }
}
