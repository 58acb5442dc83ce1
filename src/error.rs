use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Locale;

/// Closed set of reasons an expression can be rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ValueExpected,
    UnterminatedQuote,
    KeyExpected,
    EqualsExpected,
    UnexpectedEnd,
    MissingClosingParen,
    MixedExpressionTypes,
    MissingConnective,
    DuplicateConnective,
    ExpressionExpectedAfterConnective,
    TrailingCharacters,
    UnbalancedParens,
    MalformedExpression,
}

impl ErrorKind {
    /// Every kind, in declaration order
    pub const ALL: [ErrorKind; 13] = [
        ErrorKind::ValueExpected,
        ErrorKind::UnterminatedQuote,
        ErrorKind::KeyExpected,
        ErrorKind::EqualsExpected,
        ErrorKind::UnexpectedEnd,
        ErrorKind::MissingClosingParen,
        ErrorKind::MixedExpressionTypes,
        ErrorKind::MissingConnective,
        ErrorKind::DuplicateConnective,
        ErrorKind::ExpressionExpectedAfterConnective,
        ErrorKind::TrailingCharacters,
        ErrorKind::UnbalancedParens,
        ErrorKind::MalformedExpression,
    ];

    /// Human-readable message in the given locale
    pub fn message(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.message_en(),
            Locale::Ru => self.message_ru(),
        }
    }

    fn message_en(&self) -> &'static str {
        match self {
            ErrorKind::ValueExpected => "Value expected",
            ErrorKind::UnterminatedQuote => "Unterminated quote",
            ErrorKind::KeyExpected => "Key expected before '='",
            ErrorKind::EqualsExpected => "'=' expected after key",
            ErrorKind::UnexpectedEnd => "Unexpected end of expression",
            ErrorKind::MissingClosingParen => "Missing closing parenthesis",
            ErrorKind::MixedExpressionTypes => "Keyed and plain expressions cannot be mixed",
            ErrorKind::MissingConnective => "Missing AND/OR between operands",
            ErrorKind::DuplicateConnective => "Duplicate connective",
            ErrorKind::ExpressionExpectedAfterConnective => "Expression expected after connective",
            ErrorKind::TrailingCharacters => "Unexpected characters at end of expression",
            ErrorKind::UnbalancedParens => "Unbalanced parentheses",
            ErrorKind::MalformedExpression => "Malformed expression",
        }
    }

    fn message_ru(&self) -> &'static str {
        match self {
            ErrorKind::ValueExpected => "Ожидается значение после оператора",
            ErrorKind::UnterminatedQuote => "Незакрытая кавычка",
            ErrorKind::KeyExpected => "Ожидается ключ перед оператором =",
            ErrorKind::EqualsExpected => "Ожидается оператор = после ключа",
            ErrorKind::UnexpectedEnd => "Неожиданный конец выражения",
            ErrorKind::MissingClosingParen => "Отсутствует закрывающая скобка",
            ErrorKind::MixedExpressionTypes => "Смешение типов логических выражений",
            ErrorKind::MissingConnective => "Отсутствует логическая связка",
            ErrorKind::DuplicateConnective => "Повторяющаяся логическая связка",
            ErrorKind::ExpressionExpectedAfterConnective => "Выражение после связки отсутствует",
            ErrorKind::TrailingCharacters => "Неожиданные символы в конце",
            ErrorKind::UnbalancedParens => "Неверное количество скобок",
            ErrorKind::MalformedExpression => "Некорректное выражение",
        }
    }
}

/// First violation found while validating an expression.
///
/// `offset` is a byte offset into the validated text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[error("{} at offset {offset}", .kind.message(Locale::En))]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub offset: usize,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Message for display next to the rejected input
    pub fn message(&self, locale: Locale) -> &'static str {
        self.kind.message(locale)
    }
}

/// Main error type for bibquery operations
#[derive(Error, Debug)]
pub enum BibqueryError {
    #[error("Invalid expression: {0}")]
    Validation(#[from] ValidationError),

    #[error("Input too long: {actual} characters, limit is {limit}")]
    InputTooLong { limit: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for bibquery operations
pub type Result<T> = std::result::Result<T, BibqueryError>;

impl BibqueryError {
    /// Validation kind, if this error came from rejecting an expression
    pub fn validation_kind(&self) -> Option<ErrorKind> {
        match self {
            BibqueryError::Validation(err) => Some(err.kind),
            _ => None,
        }
    }
}
