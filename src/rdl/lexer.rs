//! RDL lexer/tokenizer.
//!
//! The [`Lexer`] converts report source text into a list of [`Token`]s. It handles:
//! - Double-quoted string literals with `\"`, `\\`, `\n`, `\t` and `\r` escapes
//! - Bare identifiers (`[A-Za-z_][A-Za-z0-9_]*`)
//! - The four operators and the brace/bracket delimiters
//! - Whitespace and comments (`// line` and `/* block */`), which are skipped
//!
//! A `/` immediately followed by `/` or `*` always starts a comment, never a division operator.

use super::error::{Span, SyntaxError};
use super::token::{Token, TokenKind};

/// RDL lexer over a borrowed input string.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenizes the whole input. The last token is always [`TokenKind::Eof`].
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] for unterminated strings or block comments and invalid escapes.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let eof = token.is_eof();
            tokens.push(token);
            if eof {
                return Ok(tokens);
            }
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.input[self.pos..].starts_with(prefix)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn error(&self, message: impl Into<String>, span: Span) -> SyntaxError {
        SyntaxError::new(message, span, self.input)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), SyntaxError> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            }

            if self.starts_with("//") {
                while let Some(ch) = self.bump() {
                    if ch == '\n' {
                        break;
                    }
                }
                continue;
            }

            if self.starts_with("/*") {
                let start = self.pos;
                self.pos += 2;
                match self.input[self.pos..].find("*/") {
                    Some(end) => self.pos += end + 2,
                    None => {
                        return Err(self.error(
                            "unterminated block comment",
                            Span::new(start, self.input.len()),
                        ));
                    }
                }
                continue;
            }

            return Ok(());
        }
    }

    fn scan_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace_and_comments()?;

        let start = self.pos;
        let Some(ch) = self.bump() else {
            return Ok(Token::new(TokenKind::Eof, Span::at(start)));
        };

        let kind = match ch {
            '"' => return self.scan_string(start),
            c if is_ident_start(c) => {
                while self.peek().is_some_and(is_ident_continue) {
                    self.bump();
                }
                TokenKind::Ident(self.input[start..self.pos].to_string())
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            other => TokenKind::Unknown(other),
        };

        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    /// Scans a string literal; the opening quote at `start` is already consumed.
    fn scan_string(&mut self, start: usize) -> Result<Token, SyntaxError> {
        let mut value = String::new();
        loop {
            let escape_at = self.pos;
            match self.bump() {
                None => {
                    return Err(self.error(
                        "unterminated string literal",
                        Span::new(start, self.pos),
                    ));
                }
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(_) => {
                        return Err(self.error(
                            "invalid escape sequence",
                            Span::new(escape_at, self.pos),
                        ));
                    }
                    None => {
                        return Err(self.error(
                            "unterminated string literal",
                            Span::new(start, self.pos),
                        ));
                    }
                },
                Some(ch) => value.push(ch),
            }
        }
        Ok(Token::new(TokenKind::String(value), Span::new(start, self.pos)))
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
