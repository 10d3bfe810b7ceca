//! RDL parser using recursive descent.
//!
//! Grammar (keywords are case-sensitive, section order is fixed):
//!
//! ```text
//! Report      := "report" String "{" "query" String
//!                "params" "[" String* "]"
//!                "processes" "[" RowProcess* "]"
//!                "columns" "[" Column* "]" "}"
//! RowProcess  := String Ident+ Operator
//! Column      := "label" String "key" String
//! Operator    := "+" | "-" | "*" | "/"
//! ```
//!
//! Parsing is fail-fast: the first violation aborts with a [`SyntaxError`] and no partial
//! descriptor is returned.

use super::descriptor::ReportDescriptor;
use super::error::{Span, SyntaxError};
use super::lexer::Lexer;
use super::token::{Token, TokenKind};
use crate::processing::{Operator, RowProcess};
use crate::types::Column;

/// RDL parser that converts report source text into a [`ReportDescriptor`].
pub struct Parser<'a> {
    input: &'a str,
}

/// Token cursor used while parsing one input.
struct TokenStream<'a> {
    tokens: Vec<Token>,
    pos: usize,
    input: &'a str,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given RDL input.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parses the input into a report descriptor.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] if the input is not a single well-formed report.
    pub fn parse(&self) -> Result<ReportDescriptor, SyntaxError> {
        let tokens = Lexer::new(self.input).tokenize()?;
        let mut stream = TokenStream {
            tokens,
            pos: 0,
            input: self.input,
        };

        let report = stream.parse_report()?;

        if !stream.current().is_eof() {
            return Err(stream.unexpected("end of input"));
        }
        Ok(report)
    }
}

impl TokenStream<'_> {
    fn parse_report(&mut self) -> Result<ReportDescriptor, SyntaxError> {
        self.expect_keyword("report")?;
        let name = self.expect_string("report name")?;
        self.expect(TokenKind::LBrace)?;

        self.expect_keyword("query")?;
        let query = self.expect_string("query string")?;

        self.expect_keyword("params")?;
        self.expect(TokenKind::LBracket)?;
        let mut params = Vec::new();
        while let TokenKind::String(param) = &self.current().kind {
            params.push(param.clone());
            self.advance();
        }
        self.expect(TokenKind::RBracket)?;

        self.expect_keyword("processes")?;
        self.expect(TokenKind::LBracket)?;
        let mut row_processes = Vec::new();
        while matches!(self.current().kind, TokenKind::String(_)) {
            row_processes.push(self.parse_row_process()?);
        }
        self.expect(TokenKind::RBracket)?;

        self.expect_keyword("columns")?;
        self.expect(TokenKind::LBracket)?;
        let mut columns = Vec::new();
        while self.check_keyword("label") {
            columns.push(self.parse_column()?);
        }
        self.expect(TokenKind::RBracket)?;

        self.expect(TokenKind::RBrace)?;

        Ok(ReportDescriptor {
            name,
            query,
            params,
            row_processes,
            columns,
        })
    }

    /// `String Ident+ Operator`
    fn parse_row_process(&mut self) -> Result<RowProcess, SyntaxError> {
        let output_key = self.expect_string("row process output key")?;

        let mut operand_keys = Vec::new();
        while let TokenKind::Ident(name) = &self.current().kind {
            operand_keys.push(name.clone());
            self.advance();
        }
        if operand_keys.is_empty() {
            return Err(self.unexpected("operand identifier"));
        }

        let operator = match self.current().kind {
            TokenKind::Plus => Operator::Add,
            TokenKind::Minus => Operator::Sub,
            TokenKind::Star => Operator::Mul,
            TokenKind::Slash => Operator::Div,
            _ => return Err(self.unexpected("operator ('+', '-', '*' or '/')")),
        };
        self.advance();

        Ok(RowProcess {
            output_key,
            operand_keys,
            operator,
        })
    }

    /// `"label" String "key" String`
    fn parse_column(&mut self) -> Result<Column, SyntaxError> {
        self.expect_keyword("label")?;
        let label = self.expect_string("column label")?;
        self.expect_keyword("key")?;
        let key = self.expect_string("column key")?;
        Ok(Column::new(label, key))
    }

    fn current(&self) -> &Token {
        // The lexer always terminates the stream with Eof and we never advance past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn advance(&mut self) {
        if !self.current().is_eof() {
            self.pos += 1;
        }
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Ident(name) if name == keyword)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), SyntaxError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{keyword}'")))
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), SyntaxError> {
        if self.current().kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&kind.display_name()))
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<String, SyntaxError> {
        match &self.current().kind {
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(self.unexpected(&format!("{what} (string literal)"))),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        SyntaxError::unexpected_token(
            expected,
            &self.current().kind.display_name(),
            self.current_span(),
            self.input,
        )
    }
}
