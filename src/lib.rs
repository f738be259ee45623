//! `lox` is a tree-walking interpreter for Lox, the small dynamically
//! typed scripting language from Bob Nystrom's *Crafting Interpreters*.
//!
//! A run passes source text through four stages, each fully consuming its
//! predecessor's output before the next begins:
//!
//! 1. [`scanner`] turns source text into a token stream.
//! 2. [`parser`] turns tokens into an AST ([`expr`]/[`stmt`]) via
//!    recursive descent.
//! 3. [`resolver`] statically resolves every variable reference to a
//!    scope-hop distance, so the interpreter never has to search.
//! 4. [`interpreter`] walks the resolved AST, evaluating it against a
//!    chain of [`environment`]s.
//!
//! If the scanner, parser, or resolver reports any error, the pipeline
//! stops before interpretation. A runtime error aborts the current
//! [`Lox::run`] call. All four stages report through one shared
//! [`error::ErrorReporter`].

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod printer;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use std::fs;
use std::io::Write;

use error::ErrorReporter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The top-level driver: owns the interpreter's persistent state
/// (`globals`, the resolver side table) across calls to [`Lox::run`], so
/// that the interactive prompt can build on variables and functions
/// defined on earlier lines.
pub struct Lox {
    interpreter: Interpreter,
    reporter: ErrorReporter,
}

impl Lox {
    /// `output` receives everything a `print` statement writes. Tests
    /// pass an in-memory buffer; the CLI passes `Box::new(io::stdout())`.
    pub fn new(output: Box<dyn Write>) -> Self {
        let reporter = ErrorReporter::new();
        Lox { interpreter: Interpreter::new(reporter.clone(), output), reporter }
    }

    pub fn had_error(&self) -> bool {
        self.reporter.had_error()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.reporter.had_runtime_error()
    }

    pub fn reset_errors(&self) {
        self.reporter.reset();
    }

    /// Reads `path` and runs its contents once. Caller checks
    /// [`Lox::had_error`]/[`Lox::had_runtime_error`] for the process exit
    /// code; this method never calls `process::exit` itself.
    pub fn run_file(&mut self, path: &str) -> std::io::Result<()> {
        let source = fs::read_to_string(path)?;
        self.run(&source);
        Ok(())
    }

    pub fn run(&mut self, source: &str) {
        let tokens = Scanner::new(source, self.reporter.clone()).scan_tokens();
        if self.reporter.had_error() {
            return;
        }

        let statements = Parser::new(tokens, self.reporter.clone()).parse();
        if self.reporter.had_error() {
            return;
        }

        Resolver::new(&mut self.interpreter, self.reporter.clone()).resolve(&statements);
        if self.reporter.had_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_errors_clears_flags_between_prompt_lines() {
        let mut lox = Lox::new(Box::new(std::io::sink()));
        lox.run("1 +;");
        assert!(lox.had_error());
        lox.reset_errors();
        assert!(!lox.had_error());
    }

    #[test]
    fn a_syntax_error_suppresses_execution() {
        let mut lox = Lox::new(Box::new(std::io::sink()));
        lox.run("var a = ;");
        assert!(lox.had_error());
        assert!(!lox.had_runtime_error());
    }
}
