use crate::diagnostics::SourceSpan;

/// One parsed source: an ordered sequence of statements.
#[derive(Debug, Clone)]
pub struct Script {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `var name = <expression>`. Assignments never produce printable output.
    Assign { name: String, value: Expr },
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    /// `name(args)` anchored at both ends of the statement.
    Call { name: String, args: Vec<Argument> },
    /// Fallback: raw text, subject only to variable expansion.
    Literal(String),
}

/// One call argument: trimmed, with one matching pair of quotes stripped.
/// Variable expansion happens at evaluation time, not parse time; `quoted`
/// records whether a quote pair was stripped, because only unquoted bare
/// identifiers resolve against the variable store.
#[derive(Debug, Clone)]
pub struct Argument {
    pub text: String,
    pub quoted: bool,
    pub span: SourceSpan,
}
