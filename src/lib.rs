pub mod config;
pub mod error;
pub mod highlight;
pub mod query;

pub use config::{Locale, Settings};
pub use error::{BibqueryError, ErrorKind, Result, ValidationError};
pub use highlight::{Highlight, Highlighter, Style};
pub use query::{tokenize, validate, Token, TokenKind, Tokens};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
