use crate::diagnostics::SourceSpan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyword {
    Var,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword(Keyword),
    /// Quoted string; the lexeme holds the contents without the quotes.
    Str,
    LParen,
    RParen,
    Comma,
    Assign,
    /// Statement separator: `;` or a newline.
    Separator,
    /// Any other run of raw text.
    Text,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: SourceSpan,
}

/// Infallible scanner for the command-script grammar. There is no invalid
/// input: anything that fails to lex as a structured token degrades to a
/// `Text` token, and statement classification happens later in the parser.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current: usize,
    peeked: Option<(usize, char)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices(),
            current: 0,
            peeked: None,
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = if let Some((idx, ch)) = self.peeked.take() {
            Some((idx, ch))
        } else {
            self.chars.next()
        };
        if let Some((idx, ch)) = next {
            self.current = idx + ch.len_utf8();
            Some((idx, ch))
        } else {
            None
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    fn skip_blanks(&mut self) {
        // A newline is a statement separator, never skippable whitespace.
        while let Some((_, ch)) = self.peek() {
            if ch.is_whitespace() && ch != '\n' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn identifier_or_keyword(&mut self, start: usize) -> Token {
        while let Some((_, ch)) = self.peek() {
            if is_identifier_char(ch) {
                self.bump();
            } else {
                break;
            }
        }
        let end = self.current;
        let lexeme = self.source[start..end].to_string();
        let kind = keyword_for(&lexeme).unwrap_or(TokenKind::Identifier);
        Token {
            kind,
            lexeme,
            span: SourceSpan { start, end },
        }
    }

    /// Lexes a quoted string, or falls back to a `Text` token holding the
    /// lone quote character when no closing quote exists.
    fn string_or_text(&mut self, start: usize, quote: char) -> Token {
        match self.source[self.current..].find(quote) {
            Some(rel) => {
                let close = self.current + rel;
                while self.current <= close {
                    if self.bump().is_none() {
                        break;
                    }
                }
                let end = self.current;
                Token {
                    kind: TokenKind::Str,
                    lexeme: self.source[start + 1..close].to_string(),
                    span: SourceSpan { start, end },
                }
            }
            None => Token {
                kind: TokenKind::Text,
                lexeme: quote.to_string(),
                span: SourceSpan {
                    start,
                    end: self.current,
                },
            },
        }
    }

    fn text_run(&mut self, start: usize) -> Token {
        while let Some((_, ch)) = self.peek() {
            if is_text_char(ch) {
                self.bump();
            } else {
                break;
            }
        }
        let end = self.current;
        Token {
            kind: TokenKind::Text,
            lexeme: self.source[start..end].to_string(),
            span: SourceSpan { start, end },
        }
    }

    fn simple_token(&mut self, start: usize, kind: TokenKind) -> Token {
        let end = self.current;
        Token {
            kind,
            lexeme: self.source[start..end].to_string(),
            span: SourceSpan { start, end },
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_blanks();
            let (start, ch) = match self.bump() {
                Some(pair) => pair,
                None => {
                    tokens.push(Token {
                        kind: TokenKind::Eof,
                        lexeme: String::new(),
                        span: SourceSpan {
                            start: self.current,
                            end: self.current,
                        },
                    });
                    break;
                }
            };

            let token = match ch {
                ch if is_identifier_char(ch) => self.identifier_or_keyword(start),
                '"' | '\'' => self.string_or_text(start, ch),
                '(' => self.simple_token(start, TokenKind::LParen),
                ')' => self.simple_token(start, TokenKind::RParen),
                ',' => self.simple_token(start, TokenKind::Comma),
                '=' => self.simple_token(start, TokenKind::Assign),
                ';' | '\n' => self.simple_token(start, TokenKind::Separator),
                _ => self.text_run(start),
            };
            tokens.push(token);
        }
        tokens
    }
}

pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_text_char(ch: char) -> bool {
    !ch.is_whitespace()
        && !is_identifier_char(ch)
        && !matches!(ch, '"' | '\'' | '(' | ')' | ',' | '=' | ';')
}

fn keyword_for(ident: &str) -> Option<TokenKind> {
    match ident {
        "var" => Some(TokenKind::Keyword(Keyword::Var)),
        _ => None,
    }
}
