//! Classified spans produced by the tokenizer

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Byte range into the tokenized text (end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Boolean keyword, including the unary NOT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connective {
    And,
    Or,
    Not,
}

impl Connective {
    /// Canonical uppercase spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
            Connective::Not => "NOT",
        }
    }

    /// Number of chars the keyword occupies in the input
    pub fn width(&self) -> usize {
        self.as_str().len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Paren {
    Open,
    Close,
}

/// Classification of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Whitespace,
    Connective(Connective),
    Paren(Paren),
    /// Field name of a `Key=Value` block, letters only
    Key,
    Equals,
    /// Quoted value including both quote characters
    QuotedValue,
    BareChar,
}

/// A classified span of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    /// The original text covered by this token
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.range()]
    }

    /// Text to render: connectives are normalized to uppercase, everything
    /// else is the original slice
    pub fn display<'a>(&self, source: &'a str) -> &'a str {
        match self.kind {
            TokenKind::Connective(connective) => connective.as_str(),
            _ => self.text(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basics() {
        let span = Span::new(2, 5);
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
        assert_eq!(span.range(), 2..5);
        assert!(Span::new(4, 4).is_empty());
    }

    #[test]
    fn test_connective_display_is_canonical() {
        let source = "a and b";
        let token = Token::new(TokenKind::Connective(Connective::And), 2, 5);
        assert_eq!(token.text(source), "and");
        assert_eq!(token.display(source), "AND");
    }

    #[test]
    fn test_non_connective_display_is_original() {
        let source = "ti=\"x\"";
        let token = Token::new(TokenKind::Key, 0, 2);
        assert_eq!(token.display(source), "ti");
    }
}
