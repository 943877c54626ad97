//! Top-level driver: wires scanner, parser, resolver, and evaluator
//! together for a whole file or a single REPL line, and tracks the error
//! flags the CLI turns into exit codes.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::stmt::Stmt;

pub struct Lox {
    interpreter: Interpreter,
    had_error: bool,
    had_runtime_error: bool,
}

impl Lox {
    pub fn new() -> Self {
        Lox {
            interpreter: Interpreter::new(),
            had_error: false,
            had_runtime_error: false,
        }
    }

    /// True after any scan, parse, or resolve diagnostic.
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    /// True after a runtime error aborted an input unit.
    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Process a whole source file once.
    pub fn run_file(&mut self, path: &Path) -> Result<()> {
        let source = fs::read(path)?;

        self.run(&source, false);

        Ok(())
    }

    /// Read-eval-print loop.  Errors are reported but never exit; the
    /// error flag resets between lines so one typo does not poison the
    /// session.
    pub fn run_prompt(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut line = String::new();

        loop {
            print!("> ");
            io::stdout().flush()?;

            line.clear();

            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            self.run(line.trim_end().as_bytes(), true);

            self.had_error = false;
        }

        Ok(())
    }

    fn run(&mut self, source: &[u8], interactive: bool) {
        info!("running {} byte(s) of source", source.len());

        let mut tokens = Vec::new();

        for result in Scanner::new(source) {
            match result {
                Ok(token) => tokens.push(token),

                Err(e) => {
                    eprintln!("{e}");
                    self.had_error = true;
                }
            }
        }

        // At the prompt, a bare expression line (no trailing `;`) still
        // evaluates and echoes; anything else takes the statement path.
        let (statements, parse_errors) = if interactive {
            match Parser::new(tokens.clone()).parse_expression() {
                Ok(expr) => (vec![Stmt::Expression(expr)], Vec::new()),

                Err(_) => Parser::new(tokens).parse(),
            }
        } else {
            Parser::new(tokens).parse()
        };

        for e in &parse_errors {
            eprintln!("{e}");
        }

        self.had_error |= !parse_errors.is_empty();

        // The resolver still walks whatever statements were salvaged, so
        // static diagnostics surface even alongside parse errors.
        if let Err(resolve_errors) = Resolver::new(&mut self.interpreter).resolve(&statements) {
            for e in &resolve_errors {
                eprintln!("{e}");
            }

            self.had_error = true;
        }

        if self.had_error {
            return;
        }

        // A solitary expression typed at the prompt echoes its value.
        if interactive {
            if let [Stmt::Expression(expr)] = statements.as_slice() {
                match self.interpreter.interpret_expression(expr) {
                    Ok(value) => println!("{value}"),

                    Err(e) => {
                        eprintln!("{e}");
                        self.had_runtime_error = true;
                    }
                }

                return;
            }
        }

        if let Err(e) = self.interpreter.interpret(&statements) {
            eprintln!("{e}");
            self.had_runtime_error = true;
        }
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}
