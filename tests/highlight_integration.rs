//! Integration tests for the highlighting pipeline and its settings

use bibquery::{BibqueryError, ErrorKind, Highlight, Highlighter, Locale, Settings, TokenKind};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_settings(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_settings_from_file() {
    let file = write_settings(r#"{"locale": "ru", "max_depth": 2}"#);
    let settings = Settings::from_json_file(file.path()).unwrap();

    assert_eq!(settings.locale, Locale::Ru);
    assert_eq!(settings.max_depth, 2);
    assert_eq!(settings.max_input_len, Settings::default().max_input_len);
}

#[test]
fn test_invalid_settings_file() {
    let file = write_settings(r#"{"max_depth": 0}"#);
    let err = Settings::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, BibqueryError::Config(_)));

    let file = write_settings("not json");
    let err = Settings::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, BibqueryError::Json(_)));
}

#[test]
fn test_missing_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Settings::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, BibqueryError::Io(_)));
}

#[test]
fn test_highlight_with_file_settings() {
    let file = write_settings(r#"{"locale": "ru", "max_depth": 1}"#);
    let highlighter = Highlighter::new(Settings::from_json_file(file.path()).unwrap());

    let outcome = highlighter.highlight("((TI=x))").unwrap();
    assert_eq!(
        outcome.error().map(|e| e.kind),
        Some(ErrorKind::MalformedExpression)
    );
    assert_eq!(highlighter.message(&outcome), Some("Некорректное выражение"));

    let outcome = highlighter.highlight("(TI=x)").unwrap();
    assert!(outcome.is_accepted());
}

#[test]
fn test_accepted_tokens_cover_input() {
    let text = "ti=\u{201C}Лаборатория Касперского\u{201D} or ab='Avast'";
    let outcome = Highlighter::default().highlight(text).unwrap();

    let tokens = outcome.tokens();
    assert_eq!(tokens.first().map(|t| t.span.start), Some(0));
    assert_eq!(tokens.last().map(|t| t.span.end), Some(text.len()));
    for pair in tokens.windows(2) {
        assert_eq!(pair[0].span.end, pair[1].span.start);
    }

    let quoted: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::QuotedValue)
        .map(|t| t.text(text))
        .collect();
    assert_eq!(
        quoted,
        vec!["\u{201C}Лаборатория Касперского\u{201D}", "'Avast'"]
    );
}

#[test]
fn test_rejected_outcome_json() {
    let outcome = Highlighter::default().highlight("A B").unwrap();
    let json = serde_json::to_string(&outcome).unwrap();
    let back: Highlight = serde_json::from_str(&json).unwrap();

    assert_eq!(back, outcome);
    assert_eq!(
        back.error().map(|e| (e.kind, e.offset)),
        Some((ErrorKind::MissingConnective, 2))
    );
}

#[test]
fn test_html_rendering_for_the_ui() {
    let text = "a and not b";
    let outcome = Highlighter::default().highlight(text).unwrap();
    let html = outcome.render_html(text);

    assert!(html.contains("<span class=\"logical-operator\">AND</span>"));
    assert!(html.contains("<span class=\"logical-operator\">NOT</span>"));
    assert!(!html.contains("and"));
}
