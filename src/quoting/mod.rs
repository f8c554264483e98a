//! Argument Quoting
//!
//! Renders an argument so it can be displayed unambiguously and, for the
//! shell and C styles, parsed back to the original text.
//!
//! ```
//! use quotearg::quoting::{QuotingFlags, QuotingOptions, QuotingStyle};
//!
//! let opts = QuotingOptions::new(QuotingStyle::Shell);
//! assert_eq!(opts.quote("notes.txt"), "notes.txt");
//! assert_eq!(opts.quote("my notes.txt"), "'my notes.txt'");
//!
//! let opts = QuotingOptions::new(QuotingStyle::C).with_flags(QuotingFlags::SPLIT_TRIGRAPHS);
//! assert_eq!(opts.quote("??=\n"), r#""?""?=\n""#);
//! ```

mod classify;
mod engine;
mod escape_run;
mod policy;
mod printable;
pub mod types;

pub use engine::{quote_restyled, quote_style, MAX_PASSES};
pub use types::{
    Printability, QuoteSet, QuotingFlags, QuotingOptions, QuotingStyle, QUOTING_STYLE_ARGS,
};
