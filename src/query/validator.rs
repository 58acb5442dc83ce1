//! Recursive descent validator for search expressions
//!
//! # Grammar
//!
//! ```text
//! expression  := block (connective block)*
//! connective  := AND | OR
//! block       := NOT? (group | key_value | plain_value)
//! group       := '(' expression ')'
//! key_value   := KEY '=' value        KEY = [A-Za-z]{2,}
//! plain_value := value
//! value       := QUOTED | BARE
//! ```
//!
//! Besides the grammar, the validator enforces rules that need state shared
//! across the whole expression tree: keyed and plain blocks never mix (even
//! across parentheses), connectives are never doubled or dangling, and two
//! operands are never adjacent without a connective.

use super::lexer::{is_operand_start, is_quote, Source};
use super::token::Connective;
use crate::error::{ErrorKind, ValidationError};

/// Default cap on parenthesis nesting
pub const DEFAULT_MAX_DEPTH: usize = 256;

type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// State shared by every recursive call of a single validation.
///
/// The type flags are global to the expression: a keyed block inside one
/// group forbids plain blocks in every other group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseState {
    pub paren_depth: usize,
    pub saw_plain_value: bool,
    pub saw_keyed_value: bool,
    pub last_was_connective: bool,
    pub last_was_block: bool,
}

/// Validator for boolean search expressions
pub struct Validator<'a> {
    source: Source<'a>,
    position: usize,
    max_depth: usize,
}

impl<'a> Validator<'a> {
    /// Create a new validator for the given expression
    pub fn new(input: &'a str) -> Self {
        Self {
            source: Source::new(input),
            position: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the deepest accepted parenthesis nesting
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate the whole input, stopping at the first violation.
    ///
    /// Returns the final parse state on success.
    pub fn validate(mut self) -> ValidationResult<ParseState> {
        let mut state = ParseState::default();

        self.skip_whitespace();
        self.parse_expression(&mut state)?;
        self.skip_whitespace();

        if !self.source.is_eof(self.position) {
            return Err(self.error(ErrorKind::TrailingCharacters));
        }
        if state.paren_depth != 0 {
            return Err(self.error(ErrorKind::UnbalancedParens));
        }

        Ok(state)
    }

    /// Parse: expression := block (connective block)*
    fn parse_expression(&mut self, state: &mut ParseState) -> ValidationResult<()> {
        loop {
            self.parse_block(state)?;

            self.skip_whitespace();
            let Some(ch) = self.current_char() else {
                break;
            };

            // Only operands starting with a letter or a quote are caught here;
            // anything else falls through to the trailing-characters check
            if state.last_was_block && is_operand_start(ch) && !self.next_word_is_connective() {
                return Err(self.error(ErrorKind::MissingConnective));
            }

            if let Some(connective) = self.source.match_connective(self.position) {
                self.position += connective.width();
                state.last_was_connective = true;
                state.last_was_block = false;

                self.skip_whitespace();
                match self.current_char() {
                    None | Some(')') => {
                        return Err(self.error(ErrorKind::ExpressionExpectedAfterConnective))
                    }
                    Some(_) => continue,
                }
            }

            if ch == ')' || state.paren_depth == 0 {
                break;
            }
        }

        Ok(())
    }

    /// Parse: block := NOT? (group | key_value | plain_value)
    fn parse_block(&mut self, state: &mut ParseState) -> ValidationResult<()> {
        self.skip_whitespace();
        if self.source.is_eof(self.position) {
            return Err(self.error(ErrorKind::UnexpectedEnd));
        }

        self.reject_connective_as_operand(state)?;

        if self.source.match_keyword(self.position) == Some(Connective::Not) {
            self.position += Connective::Not.width();
            self.skip_whitespace();
            state.last_was_connective = false;

            if self.source.is_eof(self.position) {
                return Err(self.error(ErrorKind::ValueExpected));
            }
            self.reject_connective_as_operand(state)?;
        }

        if self.current_char() == Some('(') {
            return self.parse_group(state);
        }

        let block_start = self.position;
        if self.source.key_lookahead(self.position).is_some() {
            if state.saw_plain_value {
                return Err(self.error_at(ErrorKind::MixedExpressionTypes, block_start));
            }
            state.saw_keyed_value = true;
            self.parse_key_value()?;
        } else {
            if state.saw_keyed_value {
                return Err(self.error_at(ErrorKind::MixedExpressionTypes, block_start));
            }
            state.saw_plain_value = true;
            self.parse_value()?;
        }

        state.last_was_connective = false;
        state.last_was_block = true;
        Ok(())
    }

    /// Parse: group := '(' expression ')'
    fn parse_group(&mut self, state: &mut ParseState) -> ValidationResult<()> {
        if state.paren_depth >= self.max_depth {
            return Err(self.error(ErrorKind::MalformedExpression));
        }

        self.position += 1; // consume '('
        state.paren_depth += 1;

        self.skip_whitespace();
        self.parse_expression(state)?;
        self.skip_whitespace();

        if self.current_char() != Some(')') {
            return Err(self.error(ErrorKind::MissingClosingParen));
        }
        self.position += 1;
        state.paren_depth -= 1;

        state.last_was_connective = false;
        state.last_was_block = true;
        Ok(())
    }

    /// Parse: key_value := KEY '=' value
    fn parse_key_value(&mut self) -> ValidationResult<()> {
        let key_start = self.position;
        while self.current_char().is_some_and(|ch| ch.is_ascii_alphabetic()) {
            self.position += 1;
        }
        if self.position == key_start {
            return Err(self.error(ErrorKind::KeyExpected));
        }

        self.skip_whitespace();
        if self.current_char() != Some('=') {
            return Err(self.error(ErrorKind::EqualsExpected));
        }
        self.position += 1;
        self.skip_whitespace();

        self.parse_value()
    }

    /// Parse: value := QUOTED | BARE
    fn parse_value(&mut self) -> ValidationResult<()> {
        let Some(ch) = self.current_char() else {
            return Err(self.error(ErrorKind::ValueExpected));
        };

        if is_quote(ch) {
            return match self.source.scan_quoted(self.position) {
                Some(end) => {
                    self.position = end;
                    Ok(())
                }
                None => Err(self.error(ErrorKind::UnterminatedQuote)),
            };
        }

        let end = self.source.scan_bare(self.position);
        if end == self.position {
            return Err(self.error(ErrorKind::ValueExpected));
        }
        self.position = end;
        Ok(())
    }

    /// A whole-word AND/OR where an operand belongs is doubled when it
    /// follows another connective, and a missing value otherwise
    fn reject_connective_as_operand(&self, state: &ParseState) -> ValidationResult<()> {
        if self.source.standalone_connective(self.position).is_none() {
            return Ok(());
        }
        if state.last_was_connective {
            Err(self.error(ErrorKind::DuplicateConnective))
        } else {
            Err(self.error(ErrorKind::ValueExpected))
        }
    }

    fn next_word_is_connective(&self) -> bool {
        let end = self.source.next_word_end(self.position);
        let word = self.source.slice(self.position, end);
        word.eq_ignore_ascii_case("AND") || word.eq_ignore_ascii_case("OR")
    }

    fn current_char(&self) -> Option<char> {
        self.source.char_at(self.position)
    }

    fn skip_whitespace(&mut self) {
        self.position = self.source.skip_whitespace(self.position);
    }

    fn error(&self, kind: ErrorKind) -> ValidationError {
        self.error_at(kind, self.position)
    }

    fn error_at(&self, kind: ErrorKind, position: usize) -> ValidationError {
        ValidationError::new(kind, self.source.byte_offset(position))
    }
}
