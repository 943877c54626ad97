//! Byte-oriented scanner.
//!
//! `Scanner` walks the raw source buffer and yields tokens as a fused
//! iterator, so the driver can interleave error reporting with collection.
//! Lexical errors are yielded in-line as `Err` items and scanning continues
//! with the next byte; exactly one EOF token is emitted, carrying the final
//! source line.

use std::iter::FusedIterator;

use log::debug;
use phf::phf_map;

use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and" => TokenType::AND,
    b"class" => TokenType::CLASS,
    b"else" => TokenType::ELSE,
    b"false" => TokenType::FALSE,
    b"fun" => TokenType::FUN,
    b"for" => TokenType::FOR,
    b"if" => TokenType::IF,
    b"nil" => TokenType::NIL,
    b"or" => TokenType::OR,
    b"print" => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super" => TokenType::SUPER,
    b"this" => TokenType::THIS,
    b"true" => TokenType::TRUE,
    b"var" => TokenType::VAR,
    b"while" => TokenType::WHILE,
};

#[derive(Debug, Clone)]
pub struct Scanner {
    source: Vec<u8>,
    start: usize,
    current: usize,
    line: usize,
    pending: Option<TokenType>,
    emitted_eof: bool,
}

impl Scanner {
    pub fn new(source: &[u8]) -> Self {
        Self {
            source: source.to_vec(),
            start: 0,
            current: 0,
            line: 1,
            pending: None,
            emitted_eof: false,
        }
    }

    fn scan_token(&mut self) -> Result<()> {
        let byte: u8 = self.advance();

        match byte {
            b'(' => self.emit(TokenType::LEFT_PAREN),

            b')' => self.emit(TokenType::RIGHT_PAREN),

            b'{' => self.emit(TokenType::LEFT_BRACE),

            b'}' => self.emit(TokenType::RIGHT_BRACE),

            b',' => self.emit(TokenType::COMMA),

            b'.' => self.emit(TokenType::DOT),

            b'-' => self.emit(TokenType::MINUS),

            b'+' => self.emit(TokenType::PLUS),

            b';' => self.emit(TokenType::SEMICOLON),

            b'*' => self.emit(TokenType::STAR),

            b'!' => {
                let token_type = if self.match_byte(b'=') {
                    TokenType::BANG_EQUAL
                } else {
                    TokenType::BANG
                };

                self.emit(token_type);
            }

            b'=' => {
                let token_type = if self.match_byte(b'=') {
                    TokenType::EQUAL_EQUAL
                } else {
                    TokenType::EQUAL
                };

                self.emit(token_type);
            }

            b'<' => {
                let token_type = if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else {
                    TokenType::LESS
                };

                self.emit(token_type);
            }

            b'>' => {
                let token_type = if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER
                };

                self.emit(token_type);
            }

            b' ' | b'\r' | b'\t' => {}

            b'\n' => {
                self.line += 1;
            }

            b'/' => {
                if self.match_byte(b'/') {
                    while self.peek() != b'\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.emit(TokenType::SLASH);
                }
            }

            b'"' => {
                self.string()?;
            }

            b'0'..=b'9' => {
                self.number();
            }

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.identifier();
            }

            _ => {
                return Err(LoxError::lex(
                    self.line,
                    format!("Unexpected character: {}", byte as char),
                ));
            }
        }

        Ok(())
    }

    fn string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.peek() == b'\n' {
                self.line += 1;
            }

            self.advance();
        }

        if self.is_at_end() {
            return Err(LoxError::lex(self.line, "Unterminated string."));
        }

        // Closing quote.
        self.advance();

        let literal =
            String::from_utf8_lossy(&self.source[self.start + 1..self.current - 1]).into_owned();

        self.emit(TokenType::STRING(literal));

        Ok(())
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = String::from_utf8_lossy(&self.source[self.start..self.current]);

        let value: f64 = text.parse().unwrap_or(0.0);

        self.emit(TokenType::NUMBER(value));
    }

    fn identifier(&mut self) {
        while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
            self.advance();
        }

        let text: &[u8] = &self.source[self.start..self.current];

        match KEYWORDS.get(text) {
            Some(token_type) => self.emit(token_type.clone()),

            None => self.emit(TokenType::IDENTIFIER),
        }
    }

    #[inline]
    fn emit(&mut self, token_type: TokenType) {
        self.pending = Some(token_type);
    }

    #[inline]
    fn advance(&mut self) -> u8 {
        let byte = self.source[self.current];

        self.current += 1;

        byte
    }

    #[inline]
    fn match_byte(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.current += 1;

            true
        }
    }

    #[inline]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.source[self.current]
        }
    }

    #[inline]
    fn peek_next(&self) -> u8 {
        if self.current + 1 >= self.source.len() {
            0
        } else {
            self.source[self.current + 1]
        }
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

impl Iterator for Scanner {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.is_at_end() {
                if self.emitted_eof {
                    return None;
                }

                self.emitted_eof = true;

                return Some(Ok(Token::new(TokenType::EOF, String::new(), self.line)));
            }

            self.start = self.current;

            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            if let Some(token_type) = self.pending.take() {
                let lexeme =
                    String::from_utf8_lossy(&self.source[self.start..self.current]).into_owned();

                debug!("token {:?} '{}' at line {}", token_type, lexeme, self.line);

                return Some(Ok(Token::new(token_type, lexeme, self.line)));
            }
        }
    }
}

impl FusedIterator for Scanner {}
