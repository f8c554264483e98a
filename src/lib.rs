//! quotearg - Quote arguments for display to people and shells
//!
//! This library renders arbitrary strings (paths, arguments) in one of
//! several quoting styles, so that a value containing spaces, quotes or
//! control characters is shown as one unambiguous token.

pub mod config;
pub mod error;
pub mod quoting;

pub use config::QuotingConfig;
pub use error::{QuoteError, Result};
pub use quoting::{
    quote_restyled, quote_style, Printability, QuoteSet, QuotingFlags, QuotingOptions,
    QuotingStyle, QUOTING_STYLE_ARGS,
};
