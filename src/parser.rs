use crate::{
    ast::{Argument, Expr, ExprKind, Script, Stmt, StmtKind},
    diagnostics::SourceSpan,
    lexer::{Keyword, Lexer, Token, TokenKind},
};

/// Parses a whole source into a script. Parsing is total: every statement
/// that matches neither the assignment form nor the call form falls back to
/// a literal, so there is no parse error to report.
pub fn parse_script(source: &str) -> Script {
    let tokens = Lexer::new(source).tokenize();
    Parser::new(source, tokens).parse_script()
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    current: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            current: 0,
        }
    }

    fn parse_script(mut self) -> Script {
        let mut statements = Vec::new();
        while let Some(group) = self.statement_tokens() {
            if !group.is_empty() {
                statements.push(self.classify(&group));
            }
        }
        Script { statements }
    }

    /// Collects the tokens of the next statement, up to the next separator.
    /// Quoted strings are single tokens, so a `;` or newline inside quotes
    /// never ends a statement. Returns `None` at end of input.
    fn statement_tokens(&mut self) -> Option<Vec<Token>> {
        if matches!(self.peek_kind(), TokenKind::Eof) {
            return None;
        }
        let mut group = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Separator => {
                    self.current += 1;
                    break;
                }
                _ => group.push(self.advance()),
            }
        }
        Some(group)
    }

    fn peek_kind(&self) -> &TokenKind {
        self.tokens
            .get(self.current)
            .map(|token| &token.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        self.current += 1;
        token
    }

    /// The three ordered checks: assignment form, call form, literal fallback.
    fn classify(&self, group: &[Token]) -> Stmt {
        let span = group_span(group);
        if group.len() >= 3
            && group[0].kind == TokenKind::Keyword(Keyword::Var)
            && group[1].kind == TokenKind::Identifier
            && group[2].kind == TokenKind::Assign
        {
            let rest = &group[3..];
            let value = self.expression(rest, SourceSpan::new(span.end, span.end));
            return Stmt {
                kind: StmtKind::Assign {
                    name: group[1].lexeme.clone(),
                    value,
                },
                span,
            };
        }
        Stmt {
            kind: StmtKind::Expr(self.expression(group, span)),
            span,
        }
    }

    fn expression(&self, tokens: &[Token], empty_span: SourceSpan) -> Expr {
        if tokens.is_empty() {
            return Expr {
                kind: ExprKind::Literal(String::new()),
                span: empty_span,
            };
        }
        let span = group_span(tokens);
        if tokens.len() >= 3
            && tokens[0].kind == TokenKind::Identifier
            && tokens[1].kind == TokenKind::LParen
            && tokens[tokens.len() - 1].kind == TokenKind::RParen
        {
            let args = self.arguments(&tokens[2..tokens.len() - 1]);
            return Expr {
                kind: ExprKind::Call {
                    name: tokens[0].lexeme.clone(),
                    args,
                },
                span,
            };
        }
        Expr {
            kind: ExprKind::Literal(self.slice(span).trim().to_string()),
            span,
        }
    }

    /// Splits the tokens between the call parentheses on every comma.
    /// `f()` and `f(   )` yield no arguments; `f(a,,b)` yields an empty
    /// middle argument, matching the naive comma split of the original
    /// grammar. Nested parentheses are not parsed; they pass through as
    /// literal argument text.
    fn arguments(&self, inner: &[Token]) -> Vec<Argument> {
        if inner.is_empty() {
            return Vec::new();
        }
        let mut args = Vec::new();
        let mut group_start = 0;
        let mut boundary = inner[0].span.start;
        for idx in 0..=inner.len() {
            let at_comma = inner
                .get(idx)
                .is_some_and(|token| token.kind == TokenKind::Comma);
            if idx == inner.len() || at_comma {
                args.push(self.argument(&inner[group_start..idx], boundary));
                if at_comma {
                    boundary = inner[idx].span.end;
                    group_start = idx + 1;
                }
            }
            if idx == inner.len() {
                break;
            }
        }
        args
    }

    fn argument(&self, group: &[Token], boundary: usize) -> Argument {
        if group.is_empty() {
            return Argument {
                text: String::new(),
                quoted: false,
                span: SourceSpan::new(boundary, boundary),
            };
        }
        let span = group_span(group);
        let trimmed = self.slice(span).trim();
        let stripped = strip_quotes(trimmed);
        Argument {
            text: stripped.to_string(),
            quoted: stripped.len() != trimmed.len(),
            span,
        }
    }

    fn slice(&self, span: SourceSpan) -> &'a str {
        &self.source[span.start..span.end]
    }
}

fn group_span(tokens: &[Token]) -> SourceSpan {
    SourceSpan::new(tokens[0].span.start, tokens[tokens.len() - 1].span.end)
}

/// Removes one matching pair of leading/trailing single or double quotes.
fn strip_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &text[1..text.len() - 1];
        }
    }
    text
}
