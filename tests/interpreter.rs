use std::{cell::RefCell, rc::Rc};

use calla::{
    diagnostics::{CallaError, DiagnosticKind, Result, SourceSpan},
    environment::{VarStore, MAX_EXPANSION_PASSES},
    registry::{Command, CommandRegistry, NativeCommand},
    runtime::Interpreter,
};

fn eval(source: &str) -> Option<String> {
    let mut interpreter = Interpreter::new();
    interpreter
        .eval_source(source)
        .expect("evaluation should succeed")
}

fn eval_error(source: &str) -> CallaError {
    let mut interpreter = Interpreter::new();
    match interpreter.eval_source(source) {
        Ok(value) => panic!("expected error, received {value:?}"),
        Err(err) => err,
    }
}

fn span() -> SourceSpan {
    SourceSpan::new(0, 0)
}

/// Records every argument list it is invoked with.
struct Probe {
    calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl Command for Probe {
    fn name(&self) -> &str {
        "probe"
    }

    fn execute(&self, args: &[String]) -> Result<Option<String>> {
        self.calls.borrow_mut().push(args.to_vec());
        Ok(None)
    }
}

fn probe_session() -> (Interpreter, Rc<RefCell<Vec<Vec<String>>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut registry = CommandRegistry::new();
    registry.register(Rc::new(Probe {
        calls: Rc::clone(&calls),
    }));
    (Interpreter::with_registry(registry), calls)
}

#[test]
fn arguments_are_trimmed_and_unquoted() {
    let (mut interpreter, calls) = probe_session();
    interpreter
        .eval_source("probe( a , \"b c\", 'd')")
        .expect("probe call");
    assert_eq!(calls.borrow()[0], vec!["a", "b c", "d"]);
}

#[test]
fn empty_parens_pass_no_arguments() {
    let (mut interpreter, calls) = probe_session();
    interpreter.eval_source("probe()").expect("probe call");
    interpreter.eval_source("probe(   )").expect("probe call");
    assert_eq!(calls.borrow()[0], Vec::<String>::new());
    assert_eq!(calls.borrow()[1], Vec::<String>::new());
}

#[test]
fn bare_commas_pass_empty_arguments() {
    let (mut interpreter, calls) = probe_session();
    interpreter.eval_source("probe(a,,b)").expect("probe call");
    assert_eq!(calls.borrow()[0], vec!["a", "", "b"]);
}

#[test]
fn quoted_separator_does_not_split_statement() {
    let (mut interpreter, calls) = probe_session();
    interpreter
        .eval_source("probe('a; b')")
        .expect("probe call");
    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(calls.borrow()[0], vec!["a; b"]);
}

#[test]
fn unquoted_identifier_argument_resolves_variable() {
    let (mut interpreter, calls) = probe_session();
    interpreter
        .eval_source("var name = World\nprobe(name, 'name', missing)")
        .expect("probe call");
    assert_eq!(calls.borrow()[0], vec!["World", "name", "missing"]);
}

#[test]
fn assignment_produces_no_printable_result() {
    let mut interpreter = Interpreter::new();
    let result = interpreter
        .eval_source("var x = greet(World)")
        .expect("assignment");
    assert_eq!(result, None);
    assert_eq!(interpreter.vars().get("x"), Some("Hello World!"));
}

#[test]
fn assignment_of_resultless_call_stores_empty_string() {
    let (mut interpreter, _calls) = probe_session();
    interpreter
        .eval_source("var x = probe(a)")
        .expect("assignment");
    assert_eq!(interpreter.vars().get("x"), Some(""));
}

#[test]
fn greet_scenario() {
    let value = eval("var name = World\ngreet(name)");
    assert_eq!(value.as_deref(), Some("Hello World!"));
}

#[test]
fn echo_joins_arguments_and_suppresses_driver_output() {
    let mut interpreter = Interpreter::new();
    let result = interpreter
        .eval_source("echo(hello, world)")
        .expect("echo call");
    assert_eq!(result, None, "echo prints itself, the driver must not");

    interpreter
        .eval_source("var x = echo(hello, world)")
        .expect("assignment");
    assert_eq!(interpreter.vars().get("x"), Some("hello world"));
}

#[test]
fn print_is_an_alias_for_echo() {
    let mut interpreter = Interpreter::new();
    interpreter
        .eval_source("var x = print(aliased)")
        .expect("alias call");
    assert_eq!(interpreter.vars().get("x"), Some("aliased"));
}

#[test]
fn literal_statement_expands_variables() {
    let value = eval("var who = World\nHello %who%");
    assert_eq!(value.as_deref(), Some("Hello World"));
}

#[test]
fn unset_variable_expands_to_empty_string() {
    let store = VarStore::new();
    let expanded = store.expand("[%missing%]", span()).expect("expansion");
    assert_eq!(expanded, "[]");
}

#[test]
fn chained_expansion_reaches_fixed_point() {
    let mut store = VarStore::new();
    store.set("a", "1");
    store.set("b", "%a%2");
    let expanded = store.expand("%b%", span()).expect("expansion");
    assert_eq!(expanded, "12");
}

#[test]
fn expansion_is_idempotent_once_settled() {
    let mut store = VarStore::new();
    store.set("a", "1");
    let once = store.expand("%a% and %a%", span()).expect("expansion");
    let twice = store.expand(&once, span()).expect("expansion");
    assert_eq!(once, twice);
}

#[test]
fn lone_percent_signs_pass_through() {
    let store = VarStore::new();
    let expanded = store.expand("100% done %", span()).expect("expansion");
    assert_eq!(expanded, "100% done %");
}

#[test]
fn self_referential_expansion_is_bounded() {
    let mut store = VarStore::new();
    store.set("a", "%a%");
    let err = store
        .expand("%a%", span())
        .expect_err("expansion must not loop forever");
    match err {
        CallaError::Diagnostic(diag) => {
            assert_eq!(diag.kind, DiagnosticKind::Expansion);
            assert!(
                diag.notes
                    .iter()
                    .any(|note| note.contains(&MAX_EXPANSION_PASSES.to_string())),
                "note should name the pass bound: {:?}",
                diag.notes
            );
        }
        other => panic!("expected diagnostic, found {other}"),
    }
}

#[test]
fn unknown_command_reports_and_session_survives() {
    let err = eval_error("foo()");
    assert!(format!("{err}").contains("command not found: foo"));

    let mut interpreter = Interpreter::new();
    assert!(interpreter.eval_source("foo()").is_err());
    let value = interpreter
        .eval_source("greet(World)")
        .expect("session keeps working");
    assert_eq!(value.as_deref(), Some("Hello World!"));
}

#[test]
fn failing_handler_is_reported_by_name() {
    let err = eval_error("greet(a, b)");
    let message = format!("{err}");
    assert!(message.contains("command `greet` failed"), "{message}");
}

#[test]
fn unmatched_statements_are_literal_text() {
    let value = eval("just some words");
    assert_eq!(value.as_deref(), Some("just some words"));

    // Trailing text after the parenthesis disqualifies the call form.
    let value = eval("greet(World) tail");
    assert_eq!(value.as_deref(), Some("greet(World) tail"));
}

#[test]
fn nested_call_text_is_passed_literally() {
    let (mut interpreter, calls) = probe_session();
    interpreter
        .eval_source("probe(inner(x))")
        .expect("probe call");
    assert_eq!(calls.borrow()[0], vec!["inner(x)"]);
}

#[test]
fn last_registration_wins() {
    let mut registry = CommandRegistry::new();
    registry.register(Rc::new(NativeCommand {
        name: "twice",
        aliases: &[],
        suppresses_output: false,
        callback: |_| Ok(Some("first".into())),
    }));
    registry.register(Rc::new(NativeCommand {
        name: "twice",
        aliases: &[],
        suppresses_output: false,
        callback: |_| Ok(Some("second".into())),
    }));
    let command = registry.lookup("twice").expect("registered");
    assert_eq!(command.execute(&[]).expect("execute"), Some("second".into()));
}

#[test]
fn nameless_command_is_skipped() {
    let mut registry = CommandRegistry::new();
    registry.register(Rc::new(NativeCommand {
        name: "",
        aliases: &["ghost"],
        suppresses_output: false,
        callback: |_| Ok(None),
    }));
    assert!(registry.lookup("").is_none());
    assert!(registry.lookup("ghost").is_none());
}

#[test]
fn demo_scripts_run() {
    for script in ["demos/quickstart.ca", "demos/variables.ca"] {
        let source = std::fs::read_to_string(script)
            .unwrap_or_else(|err| panic!("failed to read {script}: {err}"));
        let mut interpreter = Interpreter::new();
        assert!(
            interpreter.eval_source(&source).is_ok(),
            "{script} should run"
        );
    }
}
