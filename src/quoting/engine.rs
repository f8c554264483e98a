//! Quoting Engine
//!
//! Runs the classifier over an argument and writes the result. When outer
//! quotes are to be elided the first pass is speculative: if any character
//! needs quoting, the pass is thrown away and the argument is quoted again
//! with elision off. A pass without elision never rejects, so there are at
//! most two passes.

use super::classify::{Classifier, Escaped, Step};
use super::escape_run::EscapeRun;
use super::policy::EscapePolicy;
use super::types::{QuoteSet, QuotingFlags, QuotingOptions, QuotingStyle};

/// Upper bound on passes over one argument.
pub const MAX_PASSES: usize = 2;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// The first pass found a character that needs outer quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ElisionRejected {
    at: usize,
}

/// One pass over the input under a fixed policy.
struct Pass<'a> {
    out: &'a mut Vec<char>,
    start: usize,
    policy: EscapePolicy,
    run: EscapeRun,
}

impl<'a> Pass<'a> {
    fn new(out: &'a mut Vec<char>, policy: EscapePolicy) -> Self {
        let start = out.len();
        Self {
            out,
            start,
            run: EscapeRun::new(policy.is_shell()),
            policy,
        }
    }

    fn run(mut self, classifier: &Classifier<'_>, len: usize) -> Result<(), ElisionRejected> {
        if !self.policy.elide_outer_quotes {
            if let Some(open) = self.policy.open_quote {
                self.out.push(open);
            }
        }

        let mut i = 0;
        while i < len {
            let step = classifier.step(i);
            match step {
                Step::Copy(c) => self.emit_literal(c),
                Step::Escape(escaped) => self.emit_escape(escaped),
                Step::SpliceQuote => self.run.splice_quote(self.out),
                Step::Trigraph(third) => {
                    self.run.end(self.out);
                    self.out.extend(['?', '"', '"', '?']);
                    self.out.push(third);
                }
                Step::Drop => {}
                Step::RejectElision => return Err(ElisionRejected { at: i }),
            }
            i += step.width();
        }

        if self.policy.elide_outer_quotes {
            if self.policy.is_shell() && self.out.len() == self.start {
                return Err(ElisionRejected { at: len });
            }
        } else if let Some(close) = self.policy.quote {
            // Also ends an open `$'...'` run.
            self.out.push(close);
        }
        self.run.finish();
        Ok(())
    }

    fn emit_literal(&mut self, c: char) {
        self.run.end(self.out);
        self.out.push(c);
    }

    fn emit_escape(&mut self, escaped: Escaped) {
        self.run.begin(self.out);
        self.out.push('\\');
        match escaped {
            Escaped::Char(c) => self.out.push(c),
            Escaped::Nul { pad } => {
                if pad {
                    self.out.extend(['0', '0']);
                }
                self.out.push('0');
            }
            Escaped::Code(c) => push_code_escape(self.out, c),
        }
    }
}

/// `xHH` below U+0020, `uHHHH` below U+10000, `UHHHHHHHH` otherwise.
fn push_code_escape(out: &mut Vec<char>, c: char) {
    let code = c as u32;
    let (marker, digits) = match code {
        0..=0x1F => ('x', 2),
        0x20..=0xFFFF => ('u', 4),
        _ => ('U', 8),
    };
    out.push(marker);
    for shift in (0..digits).rev() {
        let nibble = (code >> (shift * 4)) & 0xF;
        out.push(HEX_DIGITS[nibble as usize] as char);
    }
}

/// Quote `input` onto the end of `out`, returning the number of passes made.
pub(crate) fn quote_buffer(out: &mut Vec<char>, input: &[u32], options: &QuotingOptions) -> usize {
    let start = out.len();
    let mut style = options.style;
    let mut flags = options.flags;
    let mut quote_these_too = options.quote_these_too;

    for pass in 1..=MAX_PASSES {
        out.truncate(start);
        let policy = EscapePolicy::resolve(
            style,
            flags.contains(QuotingFlags::ELIDE_OUTER_QUOTES),
            options.left_quote,
            options.right_quote,
        );
        tracing::trace!(pass, ?style, elide = policy.elide_outer_quotes, "quoting pass");

        let classifier = Classifier::new(
            input,
            &policy,
            flags,
            &quote_these_too,
            options.printability,
        );
        match Pass::new(out, policy).run(&classifier, input.len()) {
            Ok(()) => return pass,
            Err(ElisionRejected { at }) => {
                debug_assert!(policy.elide_outer_quotes);
                style = policy.retry_style();
                flags.remove(QuotingFlags::ELIDE_OUTER_QUOTES);
                quote_these_too = QuoteSet::new();
                tracing::debug!(at, ?style, "outer quotes required, quoting again");
            }
        }
    }

    unreachable!("a pass without outer-quote elision cannot be rejected")
}

/// Append the quoted form of `input` to `output` and return it.
///
/// Code points outside the Unicode scalar range are replaced with U+FFFD.
pub fn quote_restyled(
    mut output: Vec<char>,
    input: &[u32],
    style: QuotingStyle,
    flags: QuotingFlags,
    quote_these_too: &QuoteSet,
    left_quote: char,
    right_quote: char,
) -> Vec<char> {
    let options = QuotingOptions {
        style,
        flags,
        quote_these_too: *quote_these_too,
        left_quote,
        right_quote,
        printability: Default::default(),
    };
    quote_buffer(&mut output, input, &options);
    output
}

/// Quote a string in the given style with default flags.
pub fn quote_style(style: QuotingStyle, arg: &str) -> String {
    QuotingOptions::new(style).quote(arg)
}
