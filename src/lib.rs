//! Core library for the Calla command-script interpreter.
//! Implements lexing, parsing, variable expansion, command dispatch, and the
//! batch/REPL session drivers.

pub mod ast;
pub mod commands;
pub mod diagnostics;
pub mod environment;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod repl;
pub mod runtime;

pub use diagnostics::{CallaError, Diagnostic, DiagnosticKind, SourceSpan};
pub use environment::VarStore;
pub use registry::{Command, CommandRegistry, NativeCommand};
pub use repl::Repl;
pub use runtime::Interpreter;
