//! Lexical primitives shared by the validator and the tokenizer
//!
//! Both passes walk the same [`Source`] with a char-index cursor and ask it
//! the same questions (is a quoted value here, where does a bare value end,
//! is this a keyword), so they cannot disagree about span boundaries.

use super::token::{Connective, TokenKind};

/// Quote pairing table: `(open, close)` pairs that terminate each other.
///
/// Straight quotes close only themselves; either curly quote closes a value
/// opened with either curly quote.
pub const QUOTE_PAIRS: [(char, char); 6] = [
    ('"', '"'),
    ('\'', '\''),
    ('\u{201C}', '\u{201D}'),
    ('\u{201D}', '\u{201C}'),
    ('\u{201C}', '\u{201C}'),
    ('\u{201D}', '\u{201D}'),
];

/// Characters that terminate a bare value besides whitespace
pub const BARE_STOP_CHARS: [char; 4] = [')', '=', '(', '\\'];

/// Check if a character opens a quoted value
pub fn is_quote(ch: char) -> bool {
    QUOTE_PAIRS.iter().any(|&(open, _)| open == ch)
}

/// Check if `close` terminates a value opened with `open`
pub fn closes(open: char, close: char) -> bool {
    QUOTE_PAIRS.contains(&(open, close))
}

/// Check if a character may appear inside a bare value
pub fn is_bare_char(ch: char) -> bool {
    !ch.is_whitespace() && !BARE_STOP_CHARS.contains(&ch)
}

/// Check if a character looks like the start of another operand
pub fn is_operand_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || is_quote(ch)
}

/// Check if a quote right after a token of kind `previous` opens a quoted
/// value. Glued to a bare value or key it is an ordinary char, the way
/// [`Source::scan_bare`] reads it.
pub fn quote_starts_operand(previous: Option<TokenKind>) -> bool {
    match previous {
        None => true,
        Some(kind) => matches!(
            kind,
            TokenKind::Whitespace
                | TokenKind::Paren(_)
                | TokenKind::Connective(_)
                | TokenKind::Equals
        ),
    }
}

/// Result of a successful `Key=` lookahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLookahead {
    /// Cursor just past the key letters
    pub key_end: usize,
    /// Cursor of the `=` sign
    pub equals: usize,
}

/// Input decoded once into chars, with the byte offset of each char
pub struct Source<'a> {
    text: &'a str,
    chars: Vec<char>,
    offsets: Vec<usize>,
}

impl<'a> Source<'a> {
    /// Decode the given input
    pub fn new(text: &'a str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut offsets = Vec::with_capacity(text.len() + 1);
        for (offset, ch) in text.char_indices() {
            chars.push(ch);
            offsets.push(offset);
        }
        offsets.push(text.len());

        Self {
            text,
            chars,
            offsets,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Number of chars in the input
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Check if the cursor has reached the end of input
    pub fn is_eof(&self, at: usize) -> bool {
        at >= self.chars.len()
    }

    /// Char under the cursor
    pub fn char_at(&self, at: usize) -> Option<char> {
        self.chars.get(at).copied()
    }

    /// Byte offset of a cursor position; positions past the end map to the
    /// input length
    pub fn byte_offset(&self, at: usize) -> usize {
        self.offsets
            .get(at)
            .copied()
            .unwrap_or(self.text.len())
    }

    /// Original text between two cursor positions
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }

    /// Advance past any whitespace
    pub fn skip_whitespace(&self, mut at: usize) -> usize {
        while self.char_at(at).is_some_and(char::is_whitespace) {
            at += 1;
        }
        at
    }

    /// Case-insensitive ASCII prefix match of `word` at the cursor
    pub fn starts_with_ignore_case(&self, at: usize, word: &str) -> bool {
        let mut pos = at;
        for expected in word.chars() {
            match self.char_at(pos) {
                Some(ch) if ch.eq_ignore_ascii_case(&expected) => pos += 1,
                _ => return false,
            }
        }
        true
    }

    /// Match AND, OR or NOT as a literal prefix, ignoring case
    pub fn match_keyword(&self, at: usize) -> Option<Connective> {
        [Connective::And, Connective::Or, Connective::Not]
            .into_iter()
            .find(|keyword| self.starts_with_ignore_case(at, keyword.as_str()))
    }

    /// Match AND or OR as a literal prefix, ignoring case
    pub fn match_connective(&self, at: usize) -> Option<Connective> {
        self.match_keyword(at)
            .filter(|keyword| *keyword != Connective::Not)
    }

    /// Match AND or OR only when it forms a whole word, i.e. it is followed
    /// by end of input, whitespace, a parenthesis or a quote
    pub fn standalone_connective(&self, at: usize) -> Option<Connective> {
        let connective = self.match_connective(at)?;
        match self.char_at(at + connective.width()) {
            None => Some(connective),
            Some(ch) if ch.is_whitespace() || ch == '(' || ch == ')' || is_quote(ch) => {
                Some(connective)
            }
            Some(_) => None,
        }
    }

    /// Probe for `[A-Za-z]{2,}\s*=` at the cursor
    pub fn key_lookahead(&self, at: usize) -> Option<KeyLookahead> {
        let mut pos = at;
        while self.char_at(pos).is_some_and(|ch| ch.is_ascii_alphabetic()) {
            pos += 1;
        }
        if pos - at < 2 {
            return None;
        }

        let key_end = pos;
        let equals = self.skip_whitespace(key_end);
        (self.char_at(equals) == Some('=')).then_some(KeyLookahead { key_end, equals })
    }

    /// Find the end of a quoted value whose opening quote is at the cursor.
    ///
    /// Returns the cursor just past the matching closing quote, or `None`
    /// if the input ends first. A backslash consumes the following char
    /// unconditionally.
    pub fn scan_quoted(&self, at: usize) -> Option<usize> {
        let open = self.char_at(at).filter(|&ch| is_quote(ch))?;
        let mut pos = at + 1;
        let mut escaped = false;

        while let Some(ch) = self.char_at(pos) {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if closes(open, ch) {
                return Some(pos + 1);
            }
            pos += 1;
        }

        None
    }

    /// Find the end of a bare value starting at the cursor; equals `at` when
    /// the value is empty
    pub fn scan_bare(&self, mut at: usize) -> usize {
        while self.char_at(at).is_some_and(is_bare_char) {
            at += 1;
        }
        at
    }

    /// End of the word at the cursor: the run up to whitespace or a
    /// parenthesis. A parenthesis under the cursor forms its own word.
    pub fn next_word_end(&self, at: usize) -> usize {
        match self.char_at(at) {
            None => at,
            Some('(') | Some(')') => at + 1,
            Some(_) => {
                let mut pos = at;
                while self
                    .char_at(pos)
                    .is_some_and(|ch| !ch.is_whitespace() && ch != '(' && ch != ')')
                {
                    pos += 1;
                }
                pos
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_starts_operand() {
        use crate::query::token::Paren;

        assert!(quote_starts_operand(None));
        assert!(quote_starts_operand(Some(TokenKind::Whitespace)));
        assert!(quote_starts_operand(Some(TokenKind::Paren(Paren::Open))));
        assert!(quote_starts_operand(Some(TokenKind::Connective(Connective::Not))));
        assert!(quote_starts_operand(Some(TokenKind::Equals)));
        assert!(!quote_starts_operand(Some(TokenKind::BareChar)));
        assert!(!quote_starts_operand(Some(TokenKind::Key)));
        assert!(!quote_starts_operand(Some(TokenKind::QuotedValue)));
    }

    #[test]
    fn test_quote_pairing_table() {
        assert!(closes('"', '"'));
        assert!(closes('\'', '\''));
        assert!(closes('\u{201C}', '\u{201D}'));
        assert!(closes('\u{201D}', '\u{201C}'));
        assert!(closes('\u{201C}', '\u{201C}'));
        assert!(!closes('"', '\''));
        assert!(!closes('\u{201C}', '"'));
        assert!(!closes('"', '\u{201D}'));
    }

    #[test]
    fn test_is_quote() {
        for ch in ['"', '\'', '\u{201C}', '\u{201D}'] {
            assert!(is_quote(ch));
        }
        assert!(!is_quote('`'));
        assert!(!is_quote('a'));
    }

    #[test]
    fn test_byte_offsets_with_multibyte_chars() {
        let src = Source::new("TI=\u{201C}Ж\u{201D}");
        assert_eq!(src.len(), 6);
        assert_eq!(src.byte_offset(3), 3);
        assert_eq!(src.byte_offset(4), 6);
        assert_eq!(src.byte_offset(5), 8);
        assert_eq!(src.byte_offset(6), 11);
        assert_eq!(src.slice(3, 6), "\u{201C}Ж\u{201D}");
    }

    #[test]
    fn test_scan_quoted_simple() {
        let src = Source::new("\"hello world\" rest");
        assert_eq!(src.scan_quoted(0), Some(13));
    }

    #[test]
    fn test_scan_quoted_escaped_quote() {
        let src = Source::new(r#""a\"b""#);
        assert_eq!(src.scan_quoted(0), Some(6));
    }

    #[test]
    fn test_scan_quoted_escaped_backslash() {
        // The second backslash is consumed by the first, so the quote closes
        let src = Source::new(r#""a\\" x"#);
        assert_eq!(src.scan_quoted(0), Some(5));
    }

    #[test]
    fn test_scan_quoted_curly_pair() {
        let src = Source::new("\u{201C}Kaspersky\u{201D}");
        assert_eq!(src.scan_quoted(0), Some(11));

        let src = Source::new("\u{201D}Kaspersky\u{201C}");
        assert_eq!(src.scan_quoted(0), Some(11));
    }

    #[test]
    fn test_scan_quoted_mismatched_styles() {
        let src = Source::new("\u{201C}Kaspersky\"");
        assert_eq!(src.scan_quoted(0), None);

        let src = Source::new("'abc\"");
        assert_eq!(src.scan_quoted(0), None);
    }

    #[test]
    fn test_scan_quoted_not_a_quote() {
        let src = Source::new("abc");
        assert_eq!(src.scan_quoted(0), None);
    }

    #[test]
    fn test_scan_bare_stops() {
        let src = Source::new("2021-21-17) AND");
        assert_eq!(src.scan_bare(0), 10);

        let src = Source::new("a=b");
        assert_eq!(src.scan_bare(0), 1);

        let src = Source::new("ab\\c");
        assert_eq!(src.scan_bare(0), 2);

        let src = Source::new(")");
        assert_eq!(src.scan_bare(0), 0);
    }

    #[test]
    fn test_match_keyword_case_insensitive_prefix() {
        let src = Source::new("and");
        assert_eq!(src.match_keyword(0), Some(Connective::And));

        let src = Source::new("Or x");
        assert_eq!(src.match_keyword(0), Some(Connective::Or));

        let src = Source::new("NOTE");
        assert_eq!(src.match_keyword(0), Some(Connective::Not));

        let src = Source::new("AN");
        assert_eq!(src.match_keyword(0), None);
    }

    #[test]
    fn test_match_connective_excludes_not() {
        let src = Source::new("NOT x");
        assert_eq!(src.match_connective(0), None);
    }

    #[test]
    fn test_standalone_connective() {
        assert_eq!(
            Source::new("AND B").standalone_connective(0),
            Some(Connective::And)
        );
        assert_eq!(
            Source::new("or(").standalone_connective(0),
            Some(Connective::Or)
        );
        assert_eq!(Source::new("OR").standalone_connective(0), Some(Connective::Or));
        assert_eq!(Source::new("ORACLE").standalone_connective(0), None);
        assert_eq!(Source::new("ANDROID").standalone_connective(0), None);
    }

    #[test]
    fn test_key_lookahead() {
        let src = Source::new("TI=\"x\"");
        assert_eq!(
            src.key_lookahead(0),
            Some(KeyLookahead {
                key_end: 2,
                equals: 2
            })
        );

        let src = Source::new("title  = x");
        assert_eq!(
            src.key_lookahead(0),
            Some(KeyLookahead {
                key_end: 5,
                equals: 7
            })
        );
    }

    #[test]
    fn test_key_lookahead_rejects() {
        assert_eq!(Source::new("T=x").key_lookahead(0), None);
        assert_eq!(Source::new("TI x").key_lookahead(0), None);
        assert_eq!(Source::new("T1=x").key_lookahead(0), None);
        assert_eq!(Source::new("\"TI\"=x").key_lookahead(0), None);
    }

    #[test]
    fn test_next_word_end() {
        let src = Source::new("AND(B)");
        assert_eq!(src.next_word_end(0), 3);
        assert_eq!(src.next_word_end(3), 4);

        let src = Source::new("\"b\" c");
        assert_eq!(src.next_word_end(0), 3);
    }

    #[test]
    fn test_skip_whitespace() {
        let src = Source::new("  \t\nx");
        assert_eq!(src.skip_whitespace(0), 4);
        assert_eq!(src.skip_whitespace(4), 4);
    }

    #[test]
    fn test_operand_start() {
        assert!(is_operand_start('a'));
        assert!(is_operand_start('Z'));
        assert!(is_operand_start('"'));
        assert!(is_operand_start('\u{201C}'));
        assert!(!is_operand_start('1'));
        assert!(!is_operand_start('-'));
        assert!(!is_operand_start('Ж'));
    }
}
