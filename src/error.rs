//! Centralised error hierarchy for the **Monkey interpreter**.
//!
//! Only *host-level* failures live here: malformed source (scanner, parser),
//! misuse of the macro facility, and I/O.  Faults inside a running program
//! (type mismatch, unbound identifier, ...) are ordinary runtime values, see
//! [`Value::Error`](crate::value::Value::Error), and never reach this type.
//!
//! The module **does not** print diagnostics itself

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MonkeyError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error: {message}")]
    Parse { message: String, line: usize },

    /// A macro was invoked in a way that cannot produce syntax.  Expansion
    /// stops at the first one.
    #[error("Macro error: {0}")]
    Macro(String),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl MonkeyError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        MonkeyError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", line, message);

        MonkeyError::Parse { message, line }
    }

    /// Helper constructor for the **macro expander**.
    pub fn macro_usage<S: Into<String>>(msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Macro error: msg={}", message);

        MonkeyError::Macro(message)
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, MonkeyError>;
