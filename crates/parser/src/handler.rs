//! Sinks for the diagnostics a parse attempt accumulated.

use std::io::{self, Write};

use crate::error::Diag;

/// Receives every diagnostic once, after a parse entry point finishes.
pub trait ErrorHandler {
    fn on_error(&mut self, diag: &Diag);
}

impl<F: FnMut(&Diag)> ErrorHandler for F {
    #[inline]
    fn on_error(&mut self, diag: &Diag) {
        self(diag)
    }
}

/// Writes one diagnostic per line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutErrorHandler;

impl ErrorHandler for StdoutErrorHandler {
    fn on_error(&mut self, diag: &Diag) {
        // A closed stdout is not the parser's problem.
        let _ = writeln!(io::stdout().lock(), "{diag}");
    }
}

/// Writes one diagnostic per line to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrErrorHandler;

impl ErrorHandler for StderrErrorHandler {
    fn on_error(&mut self, diag: &Diag) {
        let _ = writeln!(io::stderr().lock(), "{diag}");
    }
}
