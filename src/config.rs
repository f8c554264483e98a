//! Quoting Configuration
//!
//! Selects quoting options by name, from a TOML file and the
//! `QUOTING_STYLE` environment variable:
//!
//! ```toml
//! style = "shell-escape"
//! elide-null-bytes = true
//! quote-these-too = ":"
//! printability = "ascii"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};
use crate::quoting::{Printability, QuoteSet, QuotingFlags, QuotingOptions, QuotingStyle};

/// Environment variable naming the default quoting style.
pub const QUOTING_STYLE_ENV: &str = "QUOTING_STYLE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct QuotingConfig {
    pub style: Option<String>,
    pub elide_null_bytes: bool,
    pub elide_outer_quotes: bool,
    pub split_trigraphs: bool,
    pub left_quote: Option<char>,
    pub right_quote: Option<char>,
    /// Characters that must always be quoted.
    pub quote_these_too: String,
    pub printability: Printability,
}

impl QuotingConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| QuoteError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), style = ?config.style, "loaded quoting config");
        Ok(config)
    }

    /// Override the style with `value`, ignoring empty values.
    pub fn with_env_style(mut self, value: Option<String>) -> Self {
        if let Some(style) = value.filter(|s| !s.is_empty()) {
            self.style = Some(style);
        }
        self
    }

    /// Override the style from `QUOTING_STYLE`.
    pub fn with_env(self) -> Self {
        self.with_env_style(std::env::var(QUOTING_STYLE_ENV).ok())
    }

    pub fn flags(&self) -> QuotingFlags {
        let mut flags = QuotingFlags::empty();
        flags.set(QuotingFlags::ELIDE_NULL_BYTES, self.elide_null_bytes);
        flags.set(QuotingFlags::ELIDE_OUTER_QUOTES, self.elide_outer_quotes);
        flags.set(QuotingFlags::SPLIT_TRIGRAPHS, self.split_trigraphs);
        flags
    }

    /// Resolve names into engine options. `default_style` applies when no
    /// style is configured. Giving both quotes and no style selects the
    /// custom style.
    pub fn into_options(&self, default_style: QuotingStyle) -> Result<QuotingOptions> {
        let mut options = match (self.left_quote, self.right_quote) {
            (Some(left), Some(right)) if self.style.is_none() => {
                QuotingOptions::custom(left, right)?
            }
            (Some(_), None) | (None, Some(_)) if self.style.is_none() => {
                return Err(QuoteError::MissingCustomQuotes);
            }
            _ => {
                let style = match &self.style {
                    Some(name) => name.parse()?,
                    None => default_style,
                };
                QuotingOptions::new(style)
            }
        };
        options.flags = self.flags();
        options.quote_these_too = QuoteSet::from_chars(self.quote_these_too.chars())?;
        options.printability = self.printability;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = QuotingConfig::from_toml_str(
            r#"
            style = "c"
            elide-null-bytes = true
            split-trigraphs = true
            quote-these-too = ":="
            printability = "ascii"
            "#,
        )
        .unwrap();
        assert_eq!(config.style.as_deref(), Some("c"));

        let options = config.into_options(QuotingStyle::Literal).unwrap();
        assert_eq!(options.style, QuotingStyle::C);
        assert_eq!(
            options.flags,
            QuotingFlags::ELIDE_NULL_BYTES | QuotingFlags::SPLIT_TRIGRAPHS
        );
        assert!(options.quote_these_too.contains(':' as u32));
        assert!(options.quote_these_too.contains('=' as u32));
        assert_eq!(options.printability, Printability::Ascii);
        assert_eq!(options.quote("a:b"), "\"a\\:b\"");
    }

    #[test]
    fn test_empty_config_uses_default_style() {
        let config = QuotingConfig::from_toml_str("").unwrap();
        assert_eq!(config, QuotingConfig::default());
        let options = config.into_options(QuotingStyle::ShellEscape).unwrap();
        assert_eq!(options.style, QuotingStyle::ShellEscape);
        assert!(options.flags.is_empty());
    }

    #[test]
    fn test_unknown_style_name() {
        let config = QuotingConfig::from_toml_str("style = \"posix\"").unwrap();
        assert!(matches!(
            config.into_options(QuotingStyle::Literal),
            Err(QuoteError::UnknownStyle(name)) if name == "posix"
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            QuotingConfig::from_toml_str("colour = \"red\""),
            Err(QuoteError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_custom_quotes() {
        let config = QuotingConfig::from_toml_str("left-quote = \"<\"\nright-quote = \">\"").unwrap();
        let options = config.into_options(QuotingStyle::Shell).unwrap();
        assert_eq!(options.style, QuotingStyle::Custom);
        assert_eq!(options.quote("x"), "<x>");

        let config = QuotingConfig::from_toml_str("left-quote = \"<\"").unwrap();
        assert!(matches!(
            config.into_options(QuotingStyle::Shell),
            Err(QuoteError::MissingCustomQuotes)
        ));
    }

    #[test]
    fn test_named_style_wins_over_quotes() {
        let config =
            QuotingConfig::from_toml_str("style = \"c\"\nleft-quote = \"<\"\nright-quote = \">\"")
                .unwrap();
        let options = config.into_options(QuotingStyle::Shell).unwrap();
        assert_eq!(options.style, QuotingStyle::C);
    }

    #[test]
    fn test_env_style_override() {
        let config = QuotingConfig::from_toml_str("style = \"c\"").unwrap();
        let config = config.with_env_style(Some("shell-always".to_string()));
        assert_eq!(config.style.as_deref(), Some("shell-always"));
        let config = config.with_env_style(Some(String::new()));
        assert_eq!(config.style.as_deref(), Some("shell-always"));
        let config = config.with_env_style(None);
        assert_eq!(config.style.as_deref(), Some("shell-always"));
    }

    #[test]
    fn test_quote_these_too_out_of_range() {
        let config = QuotingConfig::from_toml_str("quote-these-too = \"€\"").unwrap();
        assert!(matches!(
            config.into_options(QuotingStyle::C),
            Err(QuoteError::CharOutOfRange('€'))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = QuotingConfig::load(Path::new("/nonexistent/quotearg.toml")).unwrap_err();
        assert!(matches!(err, QuoteError::ConfigRead { .. }));
    }
}
