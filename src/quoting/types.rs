//! Quoting Types
//!
//! Styles, flags and options accepted by the quoting engine.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};

/// How an argument is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuotingStyle {
    /// Output the argument unchanged.
    #[default]
    Literal,
    /// Quote for the shell, omitting quotes when none are needed.
    Shell,
    /// Always wrap in single quotes.
    ShellAlways,
    /// Like `Shell`, but escape non-printable characters with `$'...'`.
    ShellEscape,
    /// Like `ShellAlways`, but escape non-printable characters with `$'...'`.
    ShellEscapeAlways,
    /// A C string literal in double quotes.
    C,
    /// A C string literal, unquoted when no escapes are needed.
    CMaybe,
    /// C backslash escapes without surrounding quotes.
    Escape,
    /// Locale quote characters around C-style escapes.
    Locale,
    /// Like `Locale`, using the C locale quote character.
    CLocale,
    /// Caller supplied left and right quote characters.
    Custom,
}

/// Style names in declaration order. `Custom` has no name.
pub const QUOTING_STYLE_ARGS: [&str; 11] = [
    "literal",
    "shell",
    "shell-always",
    "shell-escape",
    "shell-escape-always",
    "c",
    "c-maybe",
    "escape",
    "locale",
    "clocale",
    "",
];

const QUOTING_STYLES: [QuotingStyle; 11] = [
    QuotingStyle::Literal,
    QuotingStyle::Shell,
    QuotingStyle::ShellAlways,
    QuotingStyle::ShellEscape,
    QuotingStyle::ShellEscapeAlways,
    QuotingStyle::C,
    QuotingStyle::CMaybe,
    QuotingStyle::Escape,
    QuotingStyle::Locale,
    QuotingStyle::CLocale,
    QuotingStyle::Custom,
];

lazy_static::lazy_static! {
    /// Named styles keyed by their command-line spelling
    static ref STYLES_BY_NAME: HashMap<&'static str, QuotingStyle> = {
        QUOTING_STYLE_ARGS
            .iter()
            .zip(QUOTING_STYLES.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, style)| (*name, *style))
            .collect()
    };
}

impl QuotingStyle {
    /// All styles, in declaration order.
    pub fn all() -> &'static [QuotingStyle] {
        &QUOTING_STYLES
    }

    /// The command-line name of this style (empty for `Custom`).
    pub fn name(self) -> &'static str {
        QUOTING_STYLE_ARGS[self as usize]
    }

    /// The quote character used by the locale styles.
    pub fn locale_quote(self) -> char {
        if self == QuotingStyle::CLocale {
            '\''
        } else {
            '"'
        }
    }
}

impl fmt::Display for QuotingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotingStyle::Custom => write!(f, "custom"),
            style => write!(f, "{}", style.name()),
        }
    }
}

impl FromStr for QuotingStyle {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self> {
        STYLES_BY_NAME
            .get(s)
            .copied()
            .ok_or_else(|| QuoteError::UnknownStyle(s.to_string()))
    }
}

impl TryFrom<u32> for QuotingStyle {
    type Error = QuoteError;

    fn try_from(index: u32) -> Result<Self> {
        QUOTING_STYLES
            .get(index as usize)
            .copied()
            .ok_or(QuoteError::InvalidStyleIndex(index))
    }
}

bitflags! {
    /// Flags modifying how a style is applied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct QuotingFlags: u32 {
        /// Drop NUL characters instead of copying them when they are not escaped.
        const ELIDE_NULL_BYTES = 0x01;
        /// Omit the outer quotes when the argument does not need them.
        const ELIDE_OUTER_QUOTES = 0x02;
        /// Break up C trigraphs with an empty string literal.
        const SPLIT_TRIGRAPHS = 0x04;
    }
}

/// A set of code points below U+0100 that must always be quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuoteSet {
    bits: [u32; 8],
}

impl QuoteSet {
    pub const fn new() -> Self {
        Self { bits: [0; 8] }
    }

    /// Build a set from characters, rejecting any at or above U+0100.
    pub fn from_chars<I: IntoIterator<Item = char>>(chars: I) -> Result<Self> {
        let mut set = Self::new();
        for c in chars {
            set.set(c, true)?;
        }
        Ok(set)
    }

    /// Turn quoting of `c` on or off, returning the previous setting.
    pub fn set(&mut self, c: char, quote: bool) -> Result<bool> {
        let code = c as u32;
        if code >= 0x100 {
            return Err(QuoteError::CharOutOfRange(c));
        }
        let word = &mut self.bits[(code / 32) as usize];
        let mask = 1 << (code % 32);
        let previous = *word & mask != 0;
        if quote {
            *word |= mask;
        } else {
            *word &= !mask;
        }
        Ok(previous)
    }

    pub fn contains(&self, code: u32) -> bool {
        code < 0x100 && self.bits[(code / 32) as usize] >> (code % 32) & 1 == 1
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }
}

/// Which code points count as printable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Printability {
    /// Printable Unicode scalar values.
    #[default]
    Unicode,
    /// Printable ASCII only, as in the C locale.
    Ascii,
}

/// Everything the engine needs to quote one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotingOptions {
    pub style: QuotingStyle,
    pub flags: QuotingFlags,
    pub quote_these_too: QuoteSet,
    /// Opening quote for `Custom`; `'\0'` for none.
    pub left_quote: char,
    /// Closing quote for `Custom`; `'\0'` for none.
    pub right_quote: char,
    pub printability: Printability,
}

impl Default for QuotingOptions {
    fn default() -> Self {
        Self::new(QuotingStyle::default())
    }
}

impl QuotingOptions {
    pub fn new(style: QuotingStyle) -> Self {
        Self {
            style,
            flags: QuotingFlags::empty(),
            quote_these_too: QuoteSet::new(),
            left_quote: '\0',
            right_quote: '\0',
            printability: Printability::default(),
        }
    }

    /// Options for the `Custom` style. Both quotes must be non-null.
    pub fn custom(left_quote: char, right_quote: char) -> Result<Self> {
        if left_quote == '\0' || right_quote == '\0' {
            return Err(QuoteError::MissingCustomQuotes);
        }
        Ok(Self {
            left_quote,
            right_quote,
            ..Self::new(QuotingStyle::Custom)
        })
    }

    pub fn with_flags(mut self, flags: QuotingFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_printability(mut self, printability: Printability) -> Self {
        self.printability = printability;
        self
    }

    /// Force quoting of `c`, returning whether it was already forced.
    pub fn set_char_quoting(&mut self, c: char, quote: bool) -> Result<bool> {
        self.quote_these_too.set(c, quote)
    }

    /// Quote a string with these options.
    pub fn quote(&self, arg: &str) -> String {
        let input: Vec<u32> = arg.chars().map(u32::from).collect();
        let mut out = Vec::with_capacity(input.len() + 2);
        self.quote_into(&mut out, &input);
        out.into_iter().collect()
    }

    /// Append the quoted form of `input` to `out`.
    ///
    /// Returns the number of passes made over the input: 1, or 2 when
    /// outer-quote elision was rejected and the argument was requoted.
    pub fn quote_into(&self, out: &mut Vec<char>, input: &[u32]) -> usize {
        super::engine::quote_buffer(out, input, self)
    }
}
