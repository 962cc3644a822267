use indexmap::IndexMap;

use crate::{
    diagnostics::{CallaError, Diagnostic, DiagnosticKind, Result, SourceSpan},
    lexer::is_identifier_char,
};

/// Maximum number of full substitution passes before expansion is declared
/// non-terminating for a statement. Iterative expansion has no natural bound
/// once a variable's value reintroduces a reference to itself.
pub const MAX_EXPANSION_PASSES: usize = 16;

/// Session-scoped variable store: a flat mapping from identifier to the last
/// assigned string value. Created empty, mutated only by assignment, and
/// never shared between sessions.
#[derive(Debug, Default)]
pub struct VarStore {
    bindings: IndexMap<String, String>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites unconditionally; there are no append semantics.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bindings.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// Expands every `%identifier%` reference in `text`, repeating until a
    /// pass substitutes nothing. An unset variable expands to the empty
    /// string. Exceeding [`MAX_EXPANSION_PASSES`] reports an error instead
    /// of hanging the session.
    pub fn expand(&self, text: &str, span: SourceSpan) -> Result<String> {
        let mut current = text.to_string();
        for _ in 0..MAX_EXPANSION_PASSES {
            let (next, changed) = self.substitute_once(&current);
            if !changed {
                return Ok(next);
            }
            current = next;
        }
        Err(CallaError::from(
            Diagnostic::new(
                DiagnosticKind::Expansion,
                format!("variable expansion did not settle for `{text}`"),
            )
            .with_span(span)
            .with_note(format!(
                "gave up after {MAX_EXPANSION_PASSES} passes; a variable likely references itself"
            )),
        ))
    }

    /// One substitution pass. A `%` not followed by `identifier%` is plain
    /// text and passes through untouched.
    fn substitute_once(&self, text: &str) -> (String, bool) {
        let mut output = String::with_capacity(text.len());
        let mut changed = false;
        let mut rest = text;
        while let Some(pos) = rest.find('%') {
            output.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let ident_len = after.chars().take_while(|ch| is_identifier_char(*ch)).count();
            if ident_len > 0 && after[ident_len..].starts_with('%') {
                output.push_str(self.get(&after[..ident_len]).unwrap_or(""));
                changed = true;
                rest = &after[ident_len + 1..];
            } else {
                output.push('%');
                rest = after;
            }
        }
        output.push_str(rest);
        (output, changed)
    }
}
