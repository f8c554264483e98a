//! Escape Runs
//!
//! Inside single-quoted shell output, escaped characters are written in a
//! `$'...'` segment. Consecutive escapes share one segment:
//!
//! ```text
//! 'a'$'\n\t''b'
//! ```
//!
//! The tracker opens a segment before the first escape, closes it before
//! the next literal character, and is a no-op outside the shell family.

#[derive(Debug, Default)]
pub(crate) struct EscapeRun {
    enabled: bool,
    pending_end: bool,
}

impl EscapeRun {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pending_end: false,
        }
    }

    /// Leave the current `'...'` segment and open `$'...'`, unless one is
    /// already open.
    pub fn begin(&mut self, out: &mut Vec<char>) {
        if self.enabled && !self.pending_end {
            out.extend(['\'', '$', '\'']);
            self.pending_end = true;
        }
    }

    /// Close an open `$'...'` segment and resume `'...'`.
    pub fn end(&mut self, out: &mut Vec<char>) {
        if self.pending_end {
            out.extend(['\'', '\'']);
            self.pending_end = false;
        }
    }

    /// Write a single quote as `'\''`. The first quote closes whichever
    /// segment is open, so no run survives it.
    pub fn splice_quote(&mut self, out: &mut Vec<char>) {
        out.extend(['\'', '\\', '\'', '\'']);
        self.pending_end = false;
    }

    /// End of input. The outer closing `'` terminates an open run.
    pub fn finish(&mut self) {
        self.pending_end = false;
    }
}
