//! Error Types
//!
//! Errors raised while selecting a quoting style or loading quoting
//! configuration. Quoting itself is total and never fails.

use thiserror::Error;

/// Quoting errors
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("invalid quoting style: '{0}'")]
    UnknownStyle(String),

    #[error("invalid quoting style index: {0}")]
    InvalidStyleIndex(u32),

    #[error("custom quoting requires non-null left and right quotes")]
    MissingCustomQuotes,

    #[error("cannot force quoting of '{0}': only code points below U+0100 are supported")]
    CharOutOfRange(char),

    #[error("cannot read config '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            QuoteError::UnknownStyle("bogus".to_string()).to_string(),
            "invalid quoting style: 'bogus'"
        );
        assert_eq!(
            QuoteError::InvalidStyleIndex(42).to_string(),
            "invalid quoting style index: 42"
        );
    }

    #[test]
    fn test_config_read_keeps_source() {
        use std::error::Error as _;
        let err = QuoteError::ConfigRead {
            path: "/nope.toml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().starts_with("cannot read config '/nope.toml'"));
        assert!(err.source().is_some());
    }
}
