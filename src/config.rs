use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::BibqueryError;
use crate::Result;

/// Language for user-facing error messages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl FromStr for Locale {
    type Err = BibqueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ru" | "russian" => Ok(Locale::Ru),
            other => Err(BibqueryError::Config(format!("Unknown locale '{}'", other))),
        }
    }
}

/// Limits and presentation settings for validating and highlighting expressions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Longest accepted input, in characters
    pub max_input_len: usize,
    /// Deepest accepted parenthesis nesting
    pub max_depth: usize,
    pub locale: Locale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_input_len: 10_000,
            max_depth: 256,
            locale: Locale::En,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)?;
        settings.check()?;
        Ok(settings)
    }

    /// Set the input length cap
    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = max_input_len;
        self
    }

    /// Set the nesting cap
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the message locale
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Reject settings that would make every expression invalid
    pub fn check(&self) -> Result<()> {
        if self.max_input_len == 0 {
            return Err(BibqueryError::Config(
                "max_input_len must be greater than zero".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(BibqueryError::Config(
                "max_depth must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.max_input_len, 10_000);
        assert_eq!(settings.max_depth, 256);
        assert_eq!(settings.locale, Locale::En);
        assert!(settings.check().is_ok());
    }

    #[test]
    fn test_settings_builder() {
        let settings = Settings::default()
            .with_max_input_len(64)
            .with_max_depth(4)
            .with_locale(Locale::Ru);

        assert_eq!(settings.max_input_len, 64);
        assert_eq!(settings.max_depth, 4);
        assert_eq!(settings.locale, Locale::Ru);
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(Settings::default().with_max_depth(0).check().is_err());
        assert!(Settings::default().with_max_input_len(0).check().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"locale": "ru"}"#).unwrap();
        assert_eq!(settings.locale, Locale::Ru);
        assert_eq!(settings.max_depth, 256);
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert_eq!("english".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }
}
