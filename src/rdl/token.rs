//! RDL token types.

use super::error::Span;

/// An RDL token with its span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The span of this token in the source.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an end-of-file token.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// The kind of an RDL token.
///
/// Keywords (`report`, `query`, `params`, ...) are lexed as identifiers and matched by the parser
/// in context, so they remain usable as operand names.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Double-quoted string literal, quotes stripped and escapes decoded.
    String(String),
    /// Bare identifier.
    Ident(String),

    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,

    /// {
    LBrace,
    /// }
    RBrace,
    /// [
    LBracket,
    /// ]
    RBracket,

    /// Any other character.
    Unknown(char),

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns the display name for error messages.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::String(s) => format!("string \"{s}\""),
            TokenKind::Ident(s) => format!("identifier '{s}'"),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Unknown(ch) => format!("'{ch}'"),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}
