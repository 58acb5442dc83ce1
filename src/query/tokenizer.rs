//! Highlighting tokenizer
//!
//! Splits an already validated expression into classified spans that cover
//! every character exactly once, left to right. Scanning is greedy and the
//! first matching rule wins:
//!
//! 1. a whitespace char is its own token
//! 2. AND / OR / NOT as a case-insensitive prefix
//! 3. `(` and `)`
//! 4. `Key=` followed by its value
//! 5. a quoted value, when the quote starts an operand
//! 6. any other single char

use std::collections::VecDeque;
use std::iter::FusedIterator;

use super::lexer::{is_quote, quote_starts_operand, Source};
use super::token::{Paren, Token, TokenKind};

/// Lazy token stream over one input; it cannot be restarted once consumed
pub struct Tokens<'a> {
    source: Source<'a>,
    position: usize,
    /// Tokens already scanned by a multi-token rule, waiting to be yielded
    pending: VecDeque<Token>,
    /// Kind of the last token yielded
    previous: Option<TokenKind>,
}

impl<'a> Tokens<'a> {
    /// Create a token stream for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            source: Source::new(input),
            position: 0,
            pending: VecDeque::new(),
            previous: None,
        }
    }

    fn scan_token(&mut self, ch: char) -> Token {
        let start = self.position;

        if ch.is_whitespace() {
            return self.advance_to(TokenKind::Whitespace, start + 1);
        }

        if let Some(keyword) = self.source.match_keyword(start) {
            return self.advance_to(TokenKind::Connective(keyword), start + keyword.width());
        }

        match ch {
            '(' => return self.advance_to(TokenKind::Paren(Paren::Open), start + 1),
            ')' => return self.advance_to(TokenKind::Paren(Paren::Close), start + 1),
            _ => {}
        }

        if let Some(lookahead) = self.source.key_lookahead(start) {
            let key = self.token(TokenKind::Key, start, lookahead.key_end);
            for pos in lookahead.key_end..lookahead.equals {
                self.queue(TokenKind::Whitespace, pos, pos + 1);
            }
            self.queue(TokenKind::Equals, lookahead.equals, lookahead.equals + 1);
            self.position = lookahead.equals + 1;
            self.queue_key_value();
            return key;
        }

        if is_quote(ch) && quote_starts_operand(self.previous) {
            return self.scan_quoted_token();
        }

        self.advance_to(TokenKind::BareChar, start + 1)
    }

    /// Queue the whitespace and value following `Key=`
    fn queue_key_value(&mut self) {
        while self.source.char_at(self.position).is_some_and(char::is_whitespace) {
            self.queue(TokenKind::Whitespace, self.position, self.position + 1);
            self.position += 1;
        }

        match self.source.char_at(self.position) {
            Some(ch) if is_quote(ch) => {
                let token = self.scan_quoted_token();
                self.pending.push_back(token);
            }
            Some(_) => {
                let end = self.source.scan_bare(self.position);
                if end > self.position {
                    self.queue(TokenKind::BareChar, self.position, end);
                    self.position = end;
                }
            }
            None => {}
        }
    }

    /// Scan a quoted value at the cursor; an unmatched opening quote becomes
    /// a single bare char
    fn scan_quoted_token(&mut self) -> Token {
        let start = self.position;
        match self.source.scan_quoted(start) {
            Some(end) => self.advance_to(TokenKind::QuotedValue, end),
            None => self.advance_to(TokenKind::BareChar, start + 1),
        }
    }

    fn advance_to(&mut self, kind: TokenKind, end: usize) -> Token {
        let token = self.token(kind, self.position, end);
        self.position = end;
        token
    }

    fn queue(&mut self, kind: TokenKind, start: usize, end: usize) {
        let token = self.token(kind, start, end);
        self.pending.push_back(token);
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token {
        Token::new(
            kind,
            self.source.byte_offset(start),
            self.source.byte_offset(end),
        )
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = match self.pending.pop_front() {
            Some(token) => token,
            None => {
                let ch = self.source.char_at(self.position)?;
                self.scan_token(ch)
            }
        };
        self.previous = Some(token.kind);
        Some(token)
    }
}

impl FusedIterator for Tokens<'_> {}
