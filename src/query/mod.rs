//! Boolean search expressions
//!
//! Supports syntax like:
//! - `(TI="Kaspersky" OR AB="Avast") AND NOT (DP="2021-21-17")`
//! - `rust OR 'systems programming'`
//! - `TI=“Kaspersky”` (curly quotes pair with each other)
//!
//! An expression is either entirely keyed (`Key=Value` blocks) or entirely
//! plain (bare or quoted values); the two styles never mix.
//!
//! # Grammar
//!
//! ```text
//! expression  := block (connective block)*
//! connective  := AND | OR
//! block       := NOT? (group | key_value | plain_value)
//! group       := '(' expression ')'
//! key_value   := KEY '=' value
//! plain_value := value
//! value       := QUOTED | BARE
//! ```
//!
//! # Example
//!
//! ```rust
//! use bibquery::query::{tokenize, validate, TokenKind};
//!
//! let text = r#"TI="rust" AND NOT AB=draft"#;
//! validate(text).unwrap();
//!
//! let keys: Vec<&str> = tokenize(text)
//!     .filter(|token| token.kind == TokenKind::Key)
//!     .map(|token| token.text(text))
//!     .collect();
//! assert_eq!(keys, vec!["TI", "AB"]);
//! ```

pub mod lexer;
pub mod token;
pub mod tokenizer;
pub mod validator;


pub use lexer::{closes, is_quote, Source, QUOTE_PAIRS};
pub use token::{Connective, Paren, Span, Token, TokenKind};
pub use tokenizer::Tokens;
pub use validator::{ParseState, Validator, DEFAULT_MAX_DEPTH};

use crate::error::ValidationError;

/// Check that `text` is a well-formed expression.
///
/// Reports only the first violation, in scan order. Nesting deeper than
/// [`DEFAULT_MAX_DEPTH`] groups is rejected as `MalformedExpression` at the
/// first `(` past the cap; use [`Validator::with_max_depth`] for another cap.
pub fn validate(text: &str) -> std::result::Result<(), ValidationError> {
    Validator::new(text).validate().map(|_| ())
}

/// Split `text` into classified spans.
///
/// Meant for text that passed [`validate`]; on other input the spans still
/// cover the text but carry no meaning.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens::new(text)
}
