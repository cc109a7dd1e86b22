//! FILENAME: core/parser/src/lexer.rs
//! PURPOSE: Scans a raw formula string and produces a stream of Tokens.
//! CONTEXT: This is the first stage of formula construction. It handles
//! whitespace skipping, decimal and scientific number literals, variable
//! names, and the single-character operators and parentheses.
//!
//! RECOGNIZED PATTERNS:
//! - Operators: + - * /
//! - Parentheses: ( )
//! - Numbers: 12, 1.5, .5, 3., 1e6, 2.5E-3
//! - Variables: letter or underscore, then letters, digits or underscores
//!
//! Anything else becomes `Token::Illegal` and is rejected by validation.

use crate::token::{Operator, Token};
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token, or None at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();

        let token = match self.input.next()? {
            '+' => Token::Operator(Operator::Add),
            '-' => Token::Operator(Operator::Subtract),
            '*' => Token::Operator(Operator::Multiply),
            '/' => Token::Operator(Operator::Divide),
            '(' => Token::LParen,
            ')' => Token::RParen,

            ch if ch.is_ascii_digit() || ch == '.' => self.read_number(ch),

            ch if is_name_start(ch) => self.read_variable(ch),

            ch => Token::Illegal(ch.to_string()),
        };
        Some(token)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    fn read_number(&mut self, first_char: char) -> Token {
        let mut number_str = String::from(first_char);
        let mut has_dot = first_char == '.';

        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.input.next();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                number_str.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        self.read_exponent(&mut number_str);

        match number_str.parse::<f64>() {
            Ok(n) if n.is_finite() => Token::Number(n),
            // A lone "." has no digits; "1e400" overflows to infinity
            _ => Token::Illegal(number_str),
        }
    }

    /// Appends an `e[+-]digits` suffix, but only when at least one digit
    /// follows; otherwise the `e` is left for the next token.
    fn read_exponent(&mut self, number_str: &mut String) {
        let mut ahead = self.input.clone();
        let marker = match ahead.next() {
            Some(ch @ ('e' | 'E')) => ch,
            _ => return,
        };

        let mut suffix = String::from(marker);
        if let Some(&sign) = ahead.peek() {
            if sign == '+' || sign == '-' {
                suffix.push(sign);
                ahead.next();
            }
        }

        let mut digits = 0;
        while let Some(&ch) = ahead.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            suffix.push(ch);
            ahead.next();
            digits += 1;
        }

        if digits > 0 {
            number_str.push_str(&suffix);
            self.input = ahead;
        }
    }

    fn read_variable(&mut self, first_char: char) -> Token {
        let mut name = String::from(first_char);

        while let Some(&ch) = self.input.peek() {
            if is_name_continue(ch) {
                name.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        Token::Variable(name)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Returns true if `ch` can start a variable or cell name.
pub fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Returns true if `ch` can appear after the first character of a name.
pub fn is_name_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Returns true if the whole string is a well-formed variable / cell name.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => chars.all(is_name_continue),
        _ => false,
    }
}
