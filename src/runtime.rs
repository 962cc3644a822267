use std::rc::Rc;

use crate::{
    ast::{Argument, Expr, ExprKind, Stmt, StmtKind},
    commands,
    diagnostics::{CallaError, Diagnostic, DiagnosticKind, Result},
    environment::VarStore,
    lexer::is_identifier_char,
    parser,
    registry::{Command, CommandRegistry},
};

/// One interpreter session: owns the variable store and command registry,
/// evaluates statements, and carries the shared batch/REPL print policy.
pub struct Interpreter {
    vars: VarStore,
    registry: CommandRegistry,
}

struct Evaluation {
    value: Option<String>,
    suppress_print: bool,
}

impl Interpreter {
    /// A session with the built-in commands installed.
    pub fn new() -> Self {
        let mut registry = CommandRegistry::new();
        commands::install(&mut registry);
        Self {
            vars: VarStore::new(),
            registry,
        }
    }

    /// A session over a caller-provided registry; nothing is pre-installed.
    pub fn with_registry(registry: CommandRegistry) -> Self {
        Self {
            vars: VarStore::new(),
            registry,
        }
    }

    pub fn register(&mut self, command: Rc<dyn Command>) {
        self.registry.register(command);
    }

    pub fn vars(&self) -> &VarStore {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut VarStore {
        &mut self.vars
    }

    /// Evaluates every statement in order, stopping at the first error, and
    /// returns the last printable result. Primarily for embedding and tests;
    /// the session drivers use [`Interpreter::run`].
    pub fn eval_source(&mut self, source: &str) -> Result<Option<String>> {
        let script = parser::parse_script(source);
        let mut last = None;
        for stmt in &script.statements {
            if let Some(value) = self.eval_statement(stmt)? {
                last = Some(value);
            }
        }
        Ok(last)
    }

    /// Evaluates every statement in order with the session print policy:
    /// non-suppressed results go to stdout one per line, statement errors go
    /// to stderr, and no error stops the remaining statements.
    pub fn run(&mut self, source: &str) {
        let script = parser::parse_script(source);
        for stmt in &script.statements {
            match self.eval_statement(stmt) {
                Ok(Some(value)) => println!("{value}"),
                Ok(None) => {}
                Err(CallaError::Diagnostic(diag)) => {
                    eprintln!("{:?}: {}", diag.kind, diag.message);
                }
                Err(other) => eprintln!("error: {other}"),
            }
        }
    }

    /// Returns the statement's printable result, or `None` for assignments
    /// and for calls whose command suppresses driver printing.
    pub fn eval_statement(&mut self, stmt: &Stmt) -> Result<Option<String>> {
        match &stmt.kind {
            StmtKind::Assign { name, value } => {
                let evaluation = self.evaluate(value)?;
                self.vars
                    .set(name.clone(), evaluation.value.unwrap_or_default());
                Ok(None)
            }
            StmtKind::Expr(expr) => {
                let evaluation = self.evaluate(expr)?;
                if evaluation.suppress_print {
                    Ok(None)
                } else {
                    Ok(evaluation.value)
                }
            }
        }
    }

    /// An unquoted argument that is a bare identifier naming a set variable
    /// resolves to that variable's value; everything else (quoted text, unset
    /// names, mixed text) passes through `%name%` expansion only. This is
    /// what lets `greet(name)` see the value of `name` while `echo(hello)`
    /// still receives the word `hello` when no such variable exists.
    fn argument_value(&self, arg: &Argument) -> Result<String> {
        if !arg.quoted && is_identifier(&arg.text) {
            if let Some(value) = self.vars.get(&arg.text) {
                let value = value.to_string();
                return self.vars.expand(&value, arg.span);
            }
        }
        self.vars.expand(&arg.text, arg.span)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Evaluation> {
        match &expr.kind {
            ExprKind::Literal(text) => Ok(Evaluation {
                value: Some(self.vars.expand(text, expr.span)?),
                suppress_print: false,
            }),
            ExprKind::Call { name, args } => {
                let mut expanded = Vec::with_capacity(args.len());
                for arg in args {
                    expanded.push(self.argument_value(arg)?);
                }
                let command = self.registry.lookup(name).ok_or_else(|| {
                    CallaError::from(
                        Diagnostic::new(
                            DiagnosticKind::Runtime,
                            format!("command not found: {name}"),
                        )
                        .with_span(expr.span),
                    )
                })?;
                let value = command.execute(&expanded).map_err(|err| {
                    CallaError::from(
                        Diagnostic::new(
                            DiagnosticKind::Runtime,
                            format!("command `{name}` failed: {err}"),
                        )
                        .with_span(expr.span),
                    )
                })?;
                Ok(Evaluation {
                    value,
                    suppress_print: command.suppresses_output(),
                })
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_identifier_char)
}
