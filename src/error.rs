use std::cell::Cell;
use std::rc::Rc;

use crate::token::{Token, Type};

/// The four kinds of error a run can report. Each carries just enough to
/// format its own diagnostic line.
#[derive(Debug, Clone)]
pub enum LoxError {
    /// A scan error is reported by line only; the scanner has no tokens
    /// yet to point at.
    Scan { line: usize, message: String },
    /// A parse error points at the offending token (or end-of-file).
    Parse { token: Token, message: String },
    /// A resolve error is syntactically valid but semantically wrong; it
    /// is reported by line only, same as a scan error.
    Resolve { token: Token, message: String },
    /// A runtime error aborts the current `interpret` call.
    Runtime { token: Token, message: String },
}

impl LoxError {
    /// Formats the diagnostic and prints it to stderr.
    pub fn print(&self) {
        match self {
            LoxError::Scan { line, message } => {
                eprintln!("[line {line}] Error: {message}");
            }
            LoxError::Parse { token, message } => {
                let r#where = if token.r#type == Type::Eof {
                    " at end".to_string()
                } else {
                    format!(" at '{}'", token.lexeme)
                };
                eprintln!("[line {}] Error{where}: {message}", token.line);
            }
            LoxError::Resolve { token, message } => {
                eprintln!("[line {}] Error: {message}", token.line);
            }
            LoxError::Runtime { token, message } => {
                eprintln!("{message}\n[line {}]", token.line);
            }
        }
    }
}

/// The shared collaborator that every stage reports through. It tracks
/// whether a syntax/resolve error or a runtime error has
/// occurred so the driver can decide whether to run the next stage and
/// what exit code to use, and it owns the actual diagnostic printing.
#[derive(Clone, Default)]
pub struct ErrorReporter {
    had_error: Rc<Cell<bool>>,
    had_runtime_error: Rc<Cell<bool>>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports an error: prints its diagnostic and sets the matching flag.
    pub fn report(&self, error: &LoxError) {
        log::debug!("reporting error: {error:?}");
        error.print();
        match error {
            LoxError::Runtime { .. } => self.had_runtime_error.set(true),
            _ => self.had_error.set(true),
        }
    }

    /// True once a scan, parse, or resolve error has been reported.
    pub fn had_error(&self) -> bool {
        self.had_error.get()
    }

    /// True once a runtime error has been reported.
    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error.get()
    }

    /// Clears both flags; used between lines in the interactive prompt.
    pub fn reset(&self) {
        self.had_error.set(false);
        self.had_runtime_error.set(false);
    }
}
