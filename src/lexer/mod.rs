pub mod token;
pub use token::Token;

use crate::span::{Span, Spanned};
use logos::Logos;

/// Token stream with comments split off.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    /// Significant tokens, always terminated by a single `Token::Eof`.
    pub tokens: Vec<Spanned<Token>>,
    /// Spans of line and block comments, in source order.
    pub comments: Vec<Span>,
    /// Spans of string and character literals missing their closing quote.
    pub unterminated: Vec<Span>,
}

impl Lexed {
    /// The significant token whose span contains `offset`, if any.
    pub fn token_at(&self, offset: usize) -> Option<&Spanned<Token>> {
        let idx = self.tokens.partition_point(|t| t.span.end <= offset);
        self.tokens
            .get(idx)
            .filter(|t| t.span.start <= offset && offset < t.span.end && t.node != Token::Eof)
    }

    /// The comment whose span contains `offset`, if any.
    pub fn comment_at(&self, offset: usize) -> Option<Span> {
        let idx = self.comments.partition_point(|c| c.end <= offset);
        self.comments.get(idx).copied().filter(|c| c.start <= offset && offset < c.end)
    }

    /// Whether the literal at `span` runs to the end of its line unclosed.
    pub fn is_unterminated(&self, span: Span) -> bool {
        self.unterminated.binary_search_by_key(&span.start, |s| s.start).is_ok()
    }
}

/// Split `source` into tokens. Never fails: characters the lexer does not
/// recognize come back as `Token::Unknown`.
pub fn lex(source: &str) -> Lexed {
    let mut tokens = Vec::new();
    let mut comments = Vec::new();
    let mut unterminated = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::new(range.start, range.end);
        match result {
            Ok(tok) if tok.is_comment() => comments.push(span),
            Ok(tok) => {
                if matches!(tok, Token::StringLit | Token::CharLit) && !is_closed(lexer.slice()) {
                    unterminated.push(span);
                }
                tokens.push(Spanned::new(tok, span));
            }
            Err(()) => tokens.push(Spanned::new(Token::Unknown, span)),
        }
    }

    tokens.push(Spanned::new(Token::Eof, Span::point(source.len())));
    tracing::trace!(tokens = tokens.len(), comments = comments.len(), "lexed source");
    Lexed { tokens, comments, unterminated }
}

/// Whether a quoted literal ends with its own quote rather than an escaped one.
fn is_closed(literal: &str) -> bool {
    let mut chars = literal.chars();
    let Some(quote) = chars.next() else {
        return false;
    };
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            c if c == quote => return true,
            _ => {}
        }
    }
    false
}
