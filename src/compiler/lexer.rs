//! Lexer for single statements
//!
//! Converts one line of script source into the flat [`Token`] stream the
//! token pipeline consumes. Type names become [`Token::VarType`], reserved
//! words [`Token::Keyword`], and integer literals untyped constants. Whether a
//! `-` is a negation or a subtraction is left to the pipeline.

use super::errors::LexError;
use super::operators::Operator;
use super::token::{Keyword, Token, TokenList};
use crate::program::types::DataType;

/// Lexer for statement source text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self::with_line(input, 1)
    }

    /// Start counting lines at `line` (for statements cut out of a larger file)
    pub fn with_line(input: &str, line: u32) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();
            if self.is_at_end() {
                break;
            }
            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let (line, column) = (self.line, self.column);
        let ch = self.advance().ok_or_else(|| self.error("Unexpected end of input", line, column))?;

        let op = match ch {
            '0'..='9' => return self.number_literal(ch, line, column),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(ch)),

            '+' => self.choose(&[('+', Operator::UnaryIncrement), ('=', Operator::AssignPlus)], Operator::BinaryPlus),
            '-' => self.choose(&[('-', Operator::UnaryDecrement), ('=', Operator::AssignMinus)], Operator::BinaryMinus),
            '*' => self.choose(&[('=', Operator::AssignMultiply)], Operator::BinaryMultiply),
            '/' => self.choose(&[('=', Operator::AssignDivide)], Operator::BinaryDivide),
            '%' => self.choose(&[('=', Operator::AssignModulo)], Operator::BinaryModulo),
            '=' => self.choose(&[('=', Operator::CompareEqual)], Operator::Assign),
            '!' => self.choose(&[('=', Operator::CompareNotEqual)], Operator::UnaryNot),
            '^' => self.choose(&[('=', Operator::AssignXor)], Operator::BinaryXor),
            '&' => self.choose(&[('&', Operator::LogicalAnd), ('=', Operator::AssignAnd)], Operator::BinaryAnd),
            '|' => self.choose(&[('|', Operator::LogicalOr), ('=', Operator::AssignOr)], Operator::BinaryOr),
            '<' => {
                if self.peek() == Some('<') {
                    self.advance();
                    self.choose(&[('=', Operator::AssignShiftLeft)], Operator::BinaryShiftLeft)
                } else {
                    self.choose(&[('=', Operator::CompareLessOrEqual)], Operator::CompareLess)
                }
            }
            '>' => {
                if self.peek() == Some('>') {
                    self.advance();
                    self.choose(&[('=', Operator::AssignShiftRight)], Operator::BinaryShiftRight)
                } else {
                    self.choose(&[('=', Operator::CompareGreaterOrEqual)], Operator::CompareGreater)
                }
            }
            '~' => Operator::UnaryBitNot,
            '?' => Operator::QuestionMark,
            ':' => Operator::Colon,
            ';' => Operator::SemicolonSeparator,
            ',' => Operator::CommaSeparator,
            '(' => Operator::ParenthesisLeft,
            ')' => Operator::ParenthesisRight,
            '[' => Operator::BracketLeft,
            ']' => Operator::BracketRight,

            _ => {
                return Err(self.error(&format!("Unexpected character: '{}'", ch), line, column));
            }
        };

        Ok(Token::Operator(op))
    }

    /// Consume one of the listed follow-up characters, or fall back to `single`
    fn choose(&mut self, followers: &[(char, Operator)], single: Operator) -> Operator {
        for &(next, op) in followers {
            if self.peek() == Some(next) {
                self.advance();
                return op;
            }
        }
        single
    }

    /// Decimal or `0x` hexadecimal integer literal
    fn number_literal(&mut self, first_digit: char, line: u32, column: u32) -> Result<Token, LexError> {
        let mut num_str = String::new();
        let radix = if first_digit == '0' && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            16
        } else {
            num_str.push(first_digit);
            10
        };

        while let Some(ch) = self.peek() {
            if ch.is_digit(radix) {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Literals above i64::MAX keep their bit pattern
        let value = u64::from_str_radix(&num_str, radix)
            .map_err(|_| self.error(&format!("Invalid integer literal: {}", num_str), line, column))?;

        Ok(Token::constant(value as i64))
    }

    /// Identifier, keyword or type name; identifiers may contain dots (`base.update`)
    fn identifier_or_keyword(&mut self, first_char: char) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if let Some(data_type) = DataType::from_name(&ident) {
            Token::VarType(data_type)
        } else if let Some(keyword) = Keyword::from_name(&ident) {
            Token::Keyword(keyword)
        } else {
            Token::Identifier(ident)
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.peek_ahead(1) == Some('/') {
                while let Some(ch) = self.advance() {
                    if ch == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn error(&self, message: &str, line: u32, column: u32) -> LexError {
        LexError {
            message: message.to_string(),
            line,
            column,
        }
    }
}

impl TokenList {
    /// Lex `source` into a fresh token list
    pub fn parse(source: &str) -> Result<TokenList, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(TokenList::from_tokens(tokens))
    }
}
