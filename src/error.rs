//! Centralised error hierarchy for the **Lox interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  This enables a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow`, while still preserving rich diagnostic detail.
//!
//! Compile‑time errors (`Lex`, `Parse`, `Resolve`) are accumulated and block
//! execution.  Errors raised while a program runs (`Runtime`, `StackOverflow`,
//! and `Internal` for a resolver/environment mismatch) unwind the whole
//! program.  `Io` covers the output sink and file loading; a failed `print`
//! counts as a runtime error.
//!
//! Returning from a function is *not* an error and never travels through this
//! type; see [`crate::interpreter::Flow`].
//!
//! The module **does not** print diagnostics itself; that is the job of
//! [`crate::reporter::Reporter`].

use std::io;
use thiserror::Error;

use log::info;

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        /// `" at end"` or `" at '<lexeme>'"`.
        location: String,
    },

    /// Static‑analysis failure (scoping rules checked by the resolver).
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        line: usize,
        location: String,
    },

    /// Runtime evaluation error, attributed to the offending token's line.
    #[error("{message}\n[line {line}]")]
    Runtime { message: String, line: usize },

    /// The Lox call stack grew past [`crate::interpreter::MAX_CALL_DEPTH`].
    #[error("Stack overflow.\n[line {line}]")]
    StackOverflow { line: usize },

    /// The resolver and the runtime environment chain disagree.
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Where a token‑attributed compile error points.
fn location_of(token: &Token) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_owned()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Resolve error: line={}, msg={}",
            token.line, message
        );

        LoxError::Resolve {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Runtime error: line={}, msg={}",
            token.line, message
        );

        LoxError::Runtime {
            message,
            line: token.line,
        }
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        LoxError::Internal {
            message: msg.into(),
        }
    }

    /// Scan, parse and resolve errors: these block execution.
    pub fn is_compile(&self) -> bool {
        matches!(
            self,
            LoxError::Lex { .. } | LoxError::Parse { .. } | LoxError::Resolve { .. }
        )
    }

    /// Errors raised while the program was running, including a failed write
    /// to the output sink.
    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            LoxError::Runtime { .. }
                | LoxError::StackOverflow { .. }
                | LoxError::Internal { .. }
                | LoxError::Io(_)
        )
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;
