//! Character Classification
//!
//! Decides, one code point at a time, how the active policy renders the
//! input. The decision is returned as a [`Step`] and carried out by the
//! engine; nothing is written here.

use super::policy::EscapePolicy;
use super::types::{Printability, QuoteSet, QuotingFlags, QuotingStyle};

/// Substitute for code points outside the Unicode scalar range.
pub(crate) const REPLACEMENT: char = char::REPLACEMENT_CHARACTER;

/// The body of a backslash escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Escaped {
    /// `\` followed by this character, e.g. `\n` or `\"`.
    Char(char),
    /// `\0`, or `\000` when a digit follows.
    Nul { pad: bool },
    /// `\xHH`, `\uHHHH` or `\UHHHHHHHH`.
    Code(char),
}

/// What to do with the code point at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Write the character unchanged.
    Copy(char),
    /// Write a backslash escape.
    Escape(Escaped),
    /// A single quote inside shell quoting: `'\''`.
    SpliceQuote,
    /// A C trigraph `??x`, written as `?""?x`. Consumes three code points.
    Trigraph(char),
    /// Skip the code point.
    Drop,
    /// The argument cannot be shown without outer quotes.
    RejectElision,
}

impl Step {
    /// Number of input code points consumed.
    pub fn width(&self) -> usize {
        match self {
            Step::Trigraph(_) => 3,
            _ => 1,
        }
    }
}

pub(crate) struct Classifier<'a> {
    input: &'a [u32],
    policy: &'a EscapePolicy,
    flags: QuotingFlags,
    quote_these_too: &'a QuoteSet,
    printability: Printability,
}

impl<'a> Classifier<'a> {
    pub fn new(
        input: &'a [u32],
        policy: &'a EscapePolicy,
        flags: QuotingFlags,
        quote_these_too: &'a QuoteSet,
        printability: Printability,
    ) -> Self {
        Self {
            input,
            policy,
            flags,
            quote_these_too,
            printability,
        }
    }

    fn peek(&self, i: usize) -> Option<char> {
        self.input.get(i).copied().and_then(char::from_u32)
    }

    fn eliding_shell(&self) -> bool {
        self.policy.is_shell() && self.policy.elide_outer_quotes
    }

    pub fn step(&self, i: usize) -> Step {
        let raw = self.input[i];

        // A character that would read as the closing quote is protected.
        let mut is_right_quote = false;
        if self.policy.backslash_escapes
            && !self.policy.is_shell()
            && self.policy.quote.map(u32::from) == Some(raw)
        {
            if self.policy.elide_outer_quotes {
                return Step::RejectElision;
            }
            is_right_quote = true;
        }

        let Some(c) = char::from_u32(raw) else {
            return self.unprintable(REPLACEMENT);
        };

        match c {
            '\0' => {
                if self.policy.backslash_escapes {
                    let pad = !self.policy.is_shell()
                        && self.peek(i + 1).is_some_and(|n| n.is_ascii_digit());
                    self.escape(Escaped::Nul { pad })
                } else if self.flags.contains(QuotingFlags::ELIDE_NULL_BYTES) {
                    Step::Drop
                } else {
                    self.settle(c, is_right_quote)
                }
            }
            '?' => self.question_mark(i, is_right_quote),
            '\x07' => self.control(c, 'a', false, is_right_quote),
            '\x08' => self.control(c, 'b', false, is_right_quote),
            '\x0c' => self.control(c, 'f', false, is_right_quote),
            '\n' => self.control(c, 'n', true, is_right_quote),
            '\r' => self.control(c, 'r', true, is_right_quote),
            '\t' => self.control(c, 't', true, is_right_quote),
            '\x0b' => self.control(c, 'v', false, is_right_quote),
            '\\' => {
                if self.policy.is_shell() {
                    if self.policy.elide_outer_quotes {
                        return Step::RejectElision;
                    }
                    return Step::Copy(c);
                }
                if self.policy.backslash_escapes
                    && self.policy.elide_outer_quotes
                    && self.policy.quote.is_some()
                {
                    return Step::Copy(c);
                }
                self.control(c, '\\', true, is_right_quote)
            }
            '{' | '}' if self.input.len() != 1 => self.settle(c, is_right_quote),
            '#' | '~' if i != 0 => self.settle(c, is_right_quote),
            '{' | '}' | '#' | '~' | ' ' | '!' | '"' | '$' | '&' | '(' | ')' | '*' | ';' | '<'
            | '=' | '>' | '[' | '^' | '`' | '|' => {
                if self.eliding_shell() {
                    return Step::RejectElision;
                }
                self.settle(c, is_right_quote)
            }
            '\'' => {
                if self.policy.is_shell() {
                    if self.policy.elide_outer_quotes {
                        return Step::RejectElision;
                    }
                    return Step::SpliceQuote;
                }
                self.settle(c, is_right_quote)
            }
            '%' | '+' | ',' | '-' | '.' | '/' | ':' | ']' | '_' => self.settle(c, is_right_quote),
            c if c.is_ascii_alphanumeric() => self.settle(c, is_right_quote),
            c if !self.printability.is_printable(c) => self.unprintable(c),
            c => self.settle(c, is_right_quote),
        }
    }

    fn question_mark(&self, i: usize, is_right_quote: bool) -> Step {
        if self.policy.is_shell() {
            if self.policy.elide_outer_quotes {
                return Step::RejectElision;
            }
        } else if self.policy.style == QuotingStyle::C
            && self.flags.contains(QuotingFlags::SPLIT_TRIGRAPHS)
            && self.peek(i + 1) == Some('?')
        {
            if let Some(third @ ('!' | '\'' | '(' | ')' | '-' | '/' | '<' | '=' | '>')) =
                self.peek(i + 2)
            {
                if self.policy.elide_outer_quotes {
                    return Step::RejectElision;
                }
                return Step::Trigraph(third);
            }
        }
        self.settle('?', is_right_quote)
    }

    /// Characters with a one-letter backslash mnemonic. `always_quoted`
    /// ones can never be shown with shell quotes elided.
    fn control(&self, c: char, mnemonic: char, always_quoted: bool, is_right_quote: bool) -> Step {
        if self.eliding_shell() && (always_quoted || !self.printability.is_printable(c)) {
            return Step::RejectElision;
        }
        if self.policy.backslash_escapes {
            return self.escape(Escaped::Char(mnemonic));
        }
        self.settle(c, is_right_quote)
    }

    fn unprintable(&self, c: char) -> Step {
        if self.eliding_shell() {
            return Step::RejectElision;
        }
        if self.policy.backslash_escapes {
            return self.escape(Escaped::Code(c));
        }
        self.settle(c, false)
    }

    fn escape(&self, escaped: Escaped) -> Step {
        if self.policy.elide_outer_quotes {
            Step::RejectElision
        } else {
            Step::Escape(escaped)
        }
    }

    /// Copy `c`, unless it is the closing quote or the caller asked for it
    /// to be quoted.
    fn settle(&self, c: char, is_right_quote: bool) -> Step {
        let forced = ((self.policy.backslash_escapes && !self.policy.is_shell())
            || self.policy.elide_outer_quotes)
            && self.quote_these_too.contains(c as u32);
        if forced || is_right_quote {
            self.escape(Escaped::Char(c))
        } else {
            Step::Copy(c)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(s: &str) -> Vec<u32> {
        s.chars().map(u32::from).collect()
    }

    fn step_with(style: QuotingStyle, elide: bool, flags: QuotingFlags, s: &str, i: usize) -> Step {
        let input = codes(s);
        let policy = EscapePolicy::resolve(style, elide, '\0', '\0');
        let set = QuoteSet::new();
        Classifier::new(&input, &policy, flags, &set, Printability::Unicode).step(i)
    }

    fn step(style: QuotingStyle, elide: bool, s: &str, i: usize) -> Step {
        step_with(style, elide, QuotingFlags::empty(), s, i)
    }

    #[test]
    fn test_safe_characters_copy() {
        for s in ["a", "Z", "0", "%", "+", ",", "-", ".", "/", ":", "]", "_"] {
            assert_eq!(step(QuotingStyle::Shell, false, s, 0), Step::Copy(s.chars().next().unwrap()));
        }
    }

    #[test]
    fn test_shell_metacharacters_reject_elision() {
        for s in [" ", "!", "\"", "$", "&", "(", ")", "*", ";", "<", "=", ">", "[", "^", "`", "|", "?"] {
            assert_eq!(step(QuotingStyle::Shell, false, s, 0), Step::RejectElision, "{:?}", s);
        }
        assert_eq!(step(QuotingStyle::ShellAlways, false, "$", 0), Step::Copy('$'));
    }

    #[test]
    fn test_positional_metacharacters() {
        assert_eq!(step(QuotingStyle::Shell, false, "{", 0), Step::RejectElision);
        assert_eq!(step(QuotingStyle::Shell, false, "{a", 0), Step::Copy('{'));
        assert_eq!(step(QuotingStyle::Shell, false, "#a", 0), Step::RejectElision);
        assert_eq!(step(QuotingStyle::Shell, false, "a#", 1), Step::Copy('#'));
        assert_eq!(step(QuotingStyle::Shell, false, "~", 0), Step::RejectElision);
        assert_eq!(step(QuotingStyle::Shell, false, "a~", 1), Step::Copy('~'));
    }

    #[test]
    fn test_single_quote() {
        assert_eq!(step(QuotingStyle::ShellAlways, false, "'", 0), Step::SpliceQuote);
        assert_eq!(step(QuotingStyle::Shell, false, "'", 0), Step::RejectElision);
        assert_eq!(step(QuotingStyle::C, false, "'", 0), Step::Copy('\''));
        assert_eq!(step(QuotingStyle::CLocale, false, "'", 0), Step::Escape(Escaped::Char('\'')));
    }

    #[test]
    fn test_right_quote_protection() {
        assert_eq!(step(QuotingStyle::C, false, "\"", 0), Step::Escape(Escaped::Char('"')));
        assert_eq!(step(QuotingStyle::CMaybe, false, "\"", 0), Step::RejectElision);
        assert_eq!(step(QuotingStyle::Escape, false, "\"", 0), Step::Copy('"'));
    }

    #[test]
    fn test_control_mnemonics() {
        assert_eq!(step(QuotingStyle::C, false, "\t", 0), Step::Escape(Escaped::Char('t')));
        assert_eq!(step(QuotingStyle::C, false, "\x07", 0), Step::Escape(Escaped::Char('a')));
        assert_eq!(step(QuotingStyle::ShellAlways, false, "\n", 0), Step::Copy('\n'));
        assert_eq!(step(QuotingStyle::Shell, false, "\n", 0), Step::RejectElision);
        assert_eq!(step(QuotingStyle::Shell, false, "\x0b", 0), Step::RejectElision);
        assert_eq!(step(QuotingStyle::CMaybe, false, "\t", 0), Step::RejectElision);
    }

    #[test]
    fn test_backslash() {
        assert_eq!(step(QuotingStyle::ShellAlways, false, "\\", 0), Step::Copy('\\'));
        assert_eq!(step(QuotingStyle::Shell, false, "\\", 0), Step::RejectElision);
        assert_eq!(step(QuotingStyle::CMaybe, false, "\\", 0), Step::Copy('\\'));
        assert_eq!(step(QuotingStyle::C, false, "\\", 0), Step::Escape(Escaped::Char('\\')));
        assert_eq!(step(QuotingStyle::Literal, false, "\\", 0), Step::Copy('\\'));
    }

    #[test]
    fn test_nul() {
        assert_eq!(step(QuotingStyle::C, false, "\0", 0), Step::Escape(Escaped::Nul { pad: false }));
        assert_eq!(step(QuotingStyle::C, false, "\x007", 0), Step::Escape(Escaped::Nul { pad: true }));
        assert_eq!(step(QuotingStyle::C, false, "\0x", 0), Step::Escape(Escaped::Nul { pad: false }));
        assert_eq!(
            step(QuotingStyle::ShellEscapeAlways, false, "\x007", 0),
            Step::Escape(Escaped::Nul { pad: false })
        );
        assert_eq!(step(QuotingStyle::Literal, false, "\0", 0), Step::Copy('\0'));
        assert_eq!(
            step_with(QuotingStyle::Shell, false, QuotingFlags::ELIDE_NULL_BYTES, "\0", 0),
            Step::Drop
        );
    }

    #[test]
    fn test_trigraphs() {
        let split = QuotingFlags::SPLIT_TRIGRAPHS;
        assert_eq!(step_with(QuotingStyle::C, false, split, "??=", 0), Step::Trigraph('='));
        assert_eq!(step_with(QuotingStyle::C, false, split, "??a", 0), Step::Copy('?'));
        assert_eq!(step_with(QuotingStyle::C, false, split, "??", 0), Step::Copy('?'));
        assert_eq!(step(QuotingStyle::C, false, "??=", 0), Step::Copy('?'));
        assert_eq!(step_with(QuotingStyle::CMaybe, false, split, "??/", 0), Step::RejectElision);
        assert_eq!(Step::Trigraph('=').width(), 3);
    }

    #[test]
    fn test_unprintable() {
        assert_eq!(step(QuotingStyle::C, false, "\x1b", 0), Step::Escape(Escaped::Code('\x1b')));
        assert_eq!(step(QuotingStyle::Literal, false, "\x1b", 0), Step::Copy('\x1b'));
        assert_eq!(step(QuotingStyle::Shell, false, "\x1b", 0), Step::RejectElision);
        assert_eq!(step(QuotingStyle::ShellAlways, false, "\x1b", 0), Step::Copy('\x1b'));
        assert_eq!(step(QuotingStyle::C, false, "é", 0), Step::Copy('é'));
    }

    #[test]
    fn test_out_of_range_code_point() {
        let input = [0x11_0000];
        let policy = EscapePolicy::resolve(QuotingStyle::C, false, '\0', '\0');
        let set = QuoteSet::new();
        let classifier =
            Classifier::new(&input, &policy, QuotingFlags::empty(), &set, Printability::Unicode);
        assert_eq!(classifier.step(0), Step::Escape(Escaped::Code(REPLACEMENT)));

        let policy = EscapePolicy::resolve(QuotingStyle::Literal, false, '\0', '\0');
        let classifier =
            Classifier::new(&input, &policy, QuotingFlags::empty(), &set, Printability::Unicode);
        assert_eq!(classifier.step(0), Step::Copy(REPLACEMENT));
    }

    #[test]
    fn test_quote_these_too() {
        let input = codes("a:b");
        let set = QuoteSet::from_chars([':']).unwrap();
        let policy = EscapePolicy::resolve(QuotingStyle::C, false, '\0', '\0');
        let classifier =
            Classifier::new(&input, &policy, QuotingFlags::empty(), &set, Printability::Unicode);
        assert_eq!(classifier.step(1), Step::Escape(Escaped::Char(':')));
        assert_eq!(classifier.step(0), Step::Copy('a'));

        let policy = EscapePolicy::resolve(QuotingStyle::ShellAlways, false, '\0', '\0');
        let classifier =
            Classifier::new(&input, &policy, QuotingFlags::empty(), &set, Printability::Unicode);
        assert_eq!(classifier.step(1), Step::Copy(':'));
    }
}
