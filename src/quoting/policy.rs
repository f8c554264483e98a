//! Style Resolution
//!
//! Maps a requested style to the concrete escaping policy used for one
//! pass over the input.

use super::types::QuotingStyle;

/// The resolved form of a style, fixed for the duration of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EscapePolicy {
    /// Style after rewriting. Every shell variant resolves to `ShellAlways`
    /// and `CMaybe` resolves to `C`.
    pub style: QuotingStyle,
    pub backslash_escapes: bool,
    pub elide_outer_quotes: bool,
    /// Emitted before the argument unless quotes are elided.
    pub open_quote: Option<char>,
    /// Emitted after the argument unless quotes are elided, and protected
    /// inside it.
    pub quote: Option<char>,
}

fn non_null(c: char) -> Option<char> {
    (c != '\0').then_some(c)
}

impl EscapePolicy {
    pub fn resolve(
        style: QuotingStyle,
        elide_outer_quotes: bool,
        left_quote: char,
        right_quote: char,
    ) -> Self {
        let mut policy = EscapePolicy {
            style,
            backslash_escapes: false,
            elide_outer_quotes,
            open_quote: None,
            quote: None,
        };

        match style {
            QuotingStyle::Literal => {}
            QuotingStyle::C | QuotingStyle::CMaybe => {
                if style == QuotingStyle::CMaybe {
                    policy.style = QuotingStyle::C;
                    policy.elide_outer_quotes = true;
                }
                policy.backslash_escapes = true;
                policy.open_quote = Some('"');
                policy.quote = Some('"');
            }
            QuotingStyle::Escape => {
                policy.backslash_escapes = true;
                policy.elide_outer_quotes = false;
            }
            QuotingStyle::Locale | QuotingStyle::CLocale | QuotingStyle::Custom => {
                let (left, right) = if style == QuotingStyle::Custom {
                    (left_quote, right_quote)
                } else {
                    (style.locale_quote(), style.locale_quote())
                };
                policy.backslash_escapes = true;
                policy.open_quote = non_null(left);
                policy.quote = non_null(right);
            }
            QuotingStyle::Shell
            | QuotingStyle::ShellEscape
            | QuotingStyle::ShellAlways
            | QuotingStyle::ShellEscapeAlways => {
                match style {
                    QuotingStyle::ShellEscape => {
                        policy.backslash_escapes = true;
                        policy.elide_outer_quotes = true;
                    }
                    QuotingStyle::Shell => policy.elide_outer_quotes = true,
                    QuotingStyle::ShellEscapeAlways if !policy.elide_outer_quotes => {
                        policy.backslash_escapes = true;
                    }
                    _ => {}
                }
                policy.style = QuotingStyle::ShellAlways;
                policy.open_quote = Some('\'');
                policy.quote = Some('\'');
            }
        }

        policy
    }

    /// The style to requote with once elision has been rejected.
    pub fn retry_style(&self) -> QuotingStyle {
        if self.style == QuotingStyle::ShellAlways && self.backslash_escapes {
            QuotingStyle::ShellEscapeAlways
        } else {
            self.style
        }
    }

    pub fn is_shell(&self) -> bool {
        self.style == QuotingStyle::ShellAlways
    }
}
