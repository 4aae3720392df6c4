//! Driver session: source text in, output and diagnostics out.
//!
//! A [`Lox`] owns one interpreter for its whole lifetime, so consecutive
//! [`Lox::run`] calls (the prompt's lines) share globals.  Expression ids keep
//! counting across runs; closures from an earlier run stay correctly resolved.

use std::io::{self, Write};

use log::{debug, info};

use crate::ast::Stmt;
use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::reporter::Reporter;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;

/// Outcome of running one source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Scan, parse or resolve errors; nothing was executed.
    CompileError,
    /// Execution started and was stopped by a runtime error.
    RuntimeError,
}

impl RunStatus {
    /// Conventional process exit status (sysexits `EX_DATAERR` / `EX_SOFTWARE`).
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::CompileError => 65,
            RunStatus::RuntimeError => 70,
        }
    }
}

pub struct Lox {
    interpreter: Interpreter,
    reporter: Reporter,
    next_id: usize,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    /// A session printing to stdout and reporting to stderr.
    pub fn new() -> Self {
        Self::with_sinks(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_sinks(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
            reporter: Reporter::new(err),
            next_id: 0,
        }
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Clear the error flags before the next prompt line.
    pub fn reset_errors(&mut self) {
        self.reporter.reset();
    }

    /// Scan, parse and resolve `source`.
    ///
    /// Returns the resolved program, or every compile error met.  Resolution
    /// only runs on a program that scanned and parsed cleanly.
    pub fn compile(&mut self, source: &str) -> Result<Vec<Stmt>, Vec<LoxError>> {
        let (tokens, mut errors) = scan_tokens(source);

        let mut parser = Parser::new(&tokens).with_first_id(self.next_id);
        let statements = parser.parse();
        self.next_id = parser.next_id();
        errors.extend(parser.take_errors());

        if !errors.is_empty() {
            debug!("Compilation stopped after parsing: {} error(s)", errors.len());
            return Err(errors);
        }

        let errors = {
            let mut resolver = Resolver::new(&mut self.interpreter);
            resolver.resolve(&statements);
            resolver.take_errors()
        };

        if !errors.is_empty() {
            debug!("Compilation stopped after resolving: {} error(s)", errors.len());
            return Err(errors);
        }

        Ok(statements)
    }

    /// Compile and execute `source`, reporting any errors.
    pub fn run(&mut self, source: &str) -> RunStatus {
        info!("Running {} byte(s) of source", source.len());

        let statements = match self.compile(source) {
            Ok(statements) => statements,
            Err(errors) => {
                self.reporter.report_all(&errors);
                return RunStatus::CompileError;
            }
        };

        match self.interpreter.interpret(&statements) {
            Ok(()) => RunStatus::Success,
            Err(error) => {
                self.reporter.report(&error);
                RunStatus::RuntimeError
            }
        }
    }
}
