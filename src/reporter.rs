//! Error‑reporting collaborator.
//!
//! Pipeline stages hand their [`LoxError`]s here; the reporter writes them in
//! their display form (`[line N] Error at 'x': ...` for compile errors,
//! `message\n[line N]` for runtime errors) and remembers which kinds occurred
//! so the driver can pick an exit status.

use std::io::{self, Write};

use log::warn;

use crate::error::LoxError;

pub struct Reporter {
    sink: Box<dyn Write>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Box::new(io::stderr()))
    }
}

impl Reporter {
    pub fn new(sink: Box<dyn Write>) -> Self {
        Self {
            sink,
            had_error: false,
            had_runtime_error: false,
        }
    }

    /// Write `error` to the sink and record its kind.
    pub fn report(&mut self, error: &LoxError) {
        if let Err(e) = writeln!(self.sink, "{}", error) {
            warn!("Could not write diagnostic: {}", e);
        }

        if error.is_runtime() {
            self.had_runtime_error = true;
        } else {
            self.had_error = true;
        }
    }

    pub fn report_all<'e>(&mut self, errors: impl IntoIterator<Item = &'e LoxError>) {
        for error in errors {
            self.report(error);
        }
    }

    /// A scan, parse or resolve error was reported.
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Forget earlier errors; the prompt does this between lines.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }
}
