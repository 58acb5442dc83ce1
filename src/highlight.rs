//! Validate-then-tokenize pipeline used by the rendering layer
//!
//! Accepted text comes back as classified tokens. Rejected text comes back
//! as one raw span plus the error, so it can be shown unstyled next to a
//! message.

use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::{debug, trace};

use crate::config::Settings;
use crate::error::{BibqueryError, ValidationError};
use crate::query::{Span, Token, TokenKind, Tokens, Validator};
use crate::Result;

/// How a token is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    Connective,
    Key,
    QuotedValue,
    Plain,
}

impl Style {
    /// Style for a token kind; parens, `=`, whitespace and bare chars are plain
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Connective(_) => Style::Connective,
            TokenKind::Key => Style::Key,
            TokenKind::QuotedValue => Style::QuotedValue,
            TokenKind::Whitespace
            | TokenKind::Paren(_)
            | TokenKind::Equals
            | TokenKind::BareChar => Style::Plain,
        }
    }

    /// CSS class for the style
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            Style::Connective => Some("logical-operator"),
            Style::Key => Some("key"),
            Style::QuotedValue => Some("quoted-value"),
            Style::Plain => None,
        }
    }
}

/// Outcome of highlighting one input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Highlight {
    Accepted { tokens: Vec<Token> },
    Rejected { raw: Span, error: ValidationError },
}

impl Highlight {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Highlight::Accepted { .. })
    }

    /// Tokens of an accepted input; empty when rejected
    pub fn tokens(&self) -> &[Token] {
        match self {
            Highlight::Accepted { tokens } => tokens,
            Highlight::Rejected { .. } => &[],
        }
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Highlight::Accepted { .. } => None,
            Highlight::Rejected { error, .. } => Some(error),
        }
    }

    /// Render as HTML spans; `text` must be the highlighted input
    pub fn render_html(&self, text: &str) -> String {
        let mut html = String::with_capacity(text.len() * 2);
        match self {
            Highlight::Accepted { tokens } => {
                for token in tokens {
                    let content = escape_html(token.display(text));
                    match Style::of(token.kind).css_class() {
                        Some(class) => {
                            let _ = write!(html, "<span class=\"{}\">{}</span>", class, content);
                        }
                        None => {
                            let _ = write!(html, "<span>{}</span>", content);
                        }
                    }
                }
            }
            Highlight::Rejected { raw, .. } => {
                let _ = write!(html, "<span>{}</span>", escape_html(&text[raw.range()]));
            }
        }
        html
    }
}

/// Runs validation and tokenization under the configured limits
pub struct Highlighter {
    settings: Settings,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Highlighter {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate `text` and tokenize it if accepted.
    ///
    /// Only an input over the length cap is an error; a rejected expression
    /// is a regular [`Highlight::Rejected`] outcome.
    pub fn highlight(&self, text: &str) -> Result<Highlight> {
        self.check_len(text)?;

        match self.validator(text).validate() {
            Ok(_) => {
                let tokens: Vec<Token> = Tokens::new(text).collect();
                trace!("Expression accepted with {} tokens", tokens.len());
                Ok(Highlight::Accepted { tokens })
            }
            Err(error) => {
                debug!(
                    "Expression rejected: {:?} at offset {}",
                    error.kind, error.offset
                );
                Ok(Highlight::Rejected {
                    raw: Span::new(0, text.len()),
                    error,
                })
            }
        }
    }

    /// Validate `text` under the configured limits without tokenizing it.
    ///
    /// A rejected expression is returned as [`BibqueryError::Validation`].
    pub fn check(&self, text: &str) -> Result<()> {
        self.check_len(text)?;
        self.validator(text).validate()?;
        Ok(())
    }

    fn check_len(&self, text: &str) -> Result<()> {
        let len = text.chars().count();
        if len > self.settings.max_input_len {
            return Err(BibqueryError::InputTooLong {
                limit: self.settings.max_input_len,
                actual: len,
            });
        }
        Ok(())
    }

    fn validator<'a>(&self, text: &'a str) -> Validator<'a> {
        Validator::new(text).with_max_depth(self.settings.max_depth)
    }

    /// Localized message for a rejected outcome
    pub fn message(&self, highlight: &Highlight) -> Option<&'static str> {
        highlight
            .error()
            .map(|error| error.message(self.settings.locale))
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
