//! Resynchronization after the completion node has been built.
//!
//! Once a completion node exists the grammar stops consuming and unwinds to
//! the nearest statement or member boundary. From there the skippers below
//! discard the rest of the broken construct so that parsing can resume at
//! the next one.

use super::types::TypeScan;
use super::{Parser, is_member_only};
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Statement,
    Member,
}

fn opener_of(close: Token) -> Token {
    match close {
        Token::RParen => Token::LParen,
        Token::RBracket => Token::LBracket,
        _ => Token::LBrace,
    }
}

/// Keywords that begin a statement and are never part of an expression.
pub(super) fn is_statement_keyword(tok: Token) -> bool {
    matches!(
        tok,
        Token::If
            | Token::While
            | Token::For
            | Token::Do
            | Token::Try
            | Token::Switch
            | Token::Return
            | Token::Throw
            | Token::Break
            | Token::Continue
            | Token::Synchronized
            | Token::Else
            | Token::Catch
            | Token::Finally
            | Token::Case
            | Token::Default
    )
}

fn is_declaration_keyword(tok: Token) -> bool {
    matches!(tok, Token::Class | Token::Interface | Token::Enum)
}

impl<'a> Parser<'a> {
    /// Delimiters opened in `tokens[from..pos]` and still open.
    fn open_delims(&self, from: usize) -> Vec<Token> {
        let mut stack = Vec::new();
        for t in &self.tokens[from.min(self.pos)..self.pos] {
            match t.node {
                Token::LParen | Token::LBracket | Token::LBrace => stack.push(t.node),
                Token::RParen | Token::RBracket | Token::RBrace => {
                    let open = opener_of(t.node);
                    if let Some(i) = stack.iter().rposition(|&o| o == open) {
                        stack.truncate(i);
                    }
                }
                _ => {}
            }
        }
        stack
    }

    /// Skip the rest of the statement that began at token `from`.
    pub(super) fn recover_statement(&mut self, from: usize) {
        self.skip_rest(from, Level::Statement);
    }

    /// Skip the rest of the member or top-level declaration that began at `from`.
    pub(super) fn recover_member(&mut self, from: usize) {
        self.skip_rest(from, Level::Member);
    }

    fn skip_rest(&mut self, from: usize, level: Level) {
        let mut stack = self.open_delims(from);
        // Entries below this index were open before skipping started.
        let mut seeded = stack.len();
        let skip_from = self.pos;

        if level == Level::Statement && stack.is_empty() && self.identifier_on_next_line() {
            self.recovering = false;
            return;
        }

        loop {
            let braces = stack.iter().filter(|&&t| t == Token::LBrace).count();
            let tok = self.peek();
            match tok {
                Token::Eof => break,
                Token::Semi if braces == 0 => {
                    self.advance();
                    break;
                }
                Token::RBrace => {
                    let Some(i) = stack.iter().rposition(|&t| t == Token::LBrace) else {
                        break;
                    };
                    let opened_here = i >= seeded;
                    stack.truncate(i);
                    seeded = seeded.min(i);
                    self.advance();
                    if opened_here && stack.is_empty() {
                        break;
                    }
                }
                Token::LParen | Token::LBracket | Token::LBrace => {
                    stack.push(tok);
                    self.advance();
                }
                Token::RParen | Token::RBracket => {
                    let open = opener_of(tok);
                    if let Some(i) = stack.iter().rposition(|&t| t == open) {
                        stack.truncate(i);
                        seeded = seeded.min(i);
                    }
                    self.advance();
                }
                _ if braces == 0 && self.is_resume_point(tok, level) => break,
                _ => {
                    self.advance();
                }
            }
        }

        self.recovering = false;
        tracing::trace!(
            level = ?level,
            from = self.span_of(skip_from).start,
            to = self.peek_span().start,
            "skipped rest of construct"
        );
    }

    /// An identifier right after the identifier being completed, on a later
    /// line: two names cannot continue one expression, so it begins the
    /// next statement.
    fn identifier_on_next_line(&self) -> bool {
        if self.pos == 0 || self.peek() != Token::Ident || self.tok(self.pos - 1) != Token::Ident {
            return false;
        }
        let prev = self.span_of(self.pos - 1);
        self.source
            .get(prev.end..self.peek_span().start)
            .is_some_and(|between| between.contains('\n'))
    }

    fn is_resume_point(&self, tok: Token, level: Level) -> bool {
        // `Foo.class`, unless the dot is the one being completed on.
        if tok == Token::Class
            && self.pos > 0
            && self.tok(self.pos - 1) == Token::Dot
            && self.cursor.gap != self.pos
        {
            return false;
        }
        let method_start = tok == Token::Void && self.nth(1) == Token::Ident;
        if is_member_only(tok) || is_declaration_keyword(tok) || method_start {
            return true;
        }
        match level {
            Level::Statement => is_statement_keyword(tok),
            Level::Member => {
                matches!(tok, Token::Abstract | Token::Final | Token::Import | Token::Package | Token::At)
            }
        }
    }

    /// Skip to the `)` closing a parenthesized header whose contents began
    /// at `from`, consuming it. Stops early at a brace or statement keyword.
    pub(super) fn skip_to_close_paren(&mut self, from: usize, allow_semi: bool) {
        let mut depth = self
            .open_delims(from)
            .iter()
            .filter(|&&t| t != Token::LBrace)
            .count();
        loop {
            match self.peek() {
                Token::Eof | Token::LBrace | Token::RBrace => break,
                Token::RParen if depth == 0 => {
                    self.advance();
                    break;
                }
                Token::Semi if depth == 0 && !allow_semi => break,
                Token::LParen | Token::LBracket => {
                    depth += 1;
                    self.advance();
                }
                Token::RParen | Token::RBracket => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                tok if depth == 0 && (is_statement_keyword(tok) || is_member_only(tok)) => break,
                _ => {
                    self.advance();
                }
            }
        }
        self.recovering = false;
    }

    /// Skip a damaged declaration header up to its body or terminator.
    pub(super) fn skip_to_body(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Token::Eof | Token::LBrace | Token::RBrace => break,
                Token::Semi if depth == 0 => break,
                Token::LParen => depth += 1,
                Token::RParen => depth = depth.saturating_sub(1),
                tok if depth == 0 && (is_member_only(tok) || is_declaration_keyword(tok)) => break,
                _ => {}
            }
            self.advance();
        }
        self.recovering = false;
    }

    /// Skip to one of `stops` at nesting depth zero without consuming it.
    pub(super) fn skip_until(&mut self, stops: &[Token]) {
        let mut depth = 0usize;
        loop {
            let tok = self.peek();
            if tok == Token::Eof || (depth == 0 && stops.contains(&tok)) {
                break;
            }
            match tok {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
        self.recovering = false;
    }

    /// `Type name(..)` followed by a body, `throws` or `;`. The identifier
    /// being typed is never taken for the start of a header.
    fn at_method_header(&self) -> bool {
        let TypeScan::Closed(j) = self.scan_type(self.pos) else {
            return false;
        };
        if self.tok(j) != Token::Ident || self.tok(j + 1) != Token::LParen {
            return false;
        }
        if self.can_complete() && self.cursor.token.is_some_and(|t| (self.pos..=j).contains(&t)) {
            return false;
        }
        match self.matching_paren(j + 1) {
            Some(close) => matches!(self.tok(close + 1), Token::LBrace | Token::Throws | Token::Semi),
            None => false,
        }
    }

    /// Index of the `)` closing the `(` at `open`, stopping at braces.
    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for i in open..self.tokens.len() {
            match self.tok(i) {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                Token::LBrace | Token::RBrace | Token::Semi | Token::Eof => return None,
                _ => {}
            }
        }
        None
    }

    /// A member declaration starts here although a method body is still
    /// open: the body is unwound so the member parses at type level.
    pub(super) fn should_unwind(&self) -> bool {
        if !self.in_method_body() {
            return false;
        }
        let unwind = match self.peek() {
            tok if is_member_only(tok) => true,
            Token::Void => self.nth(1) == Token::Ident,
            tok if tok == Token::Ident || tok.is_primitive() => self.at_method_header(),
            _ => false,
        };
        if unwind {
            tracing::trace!(at = self.peek_span().start, "member start inside method body, unwinding");
        }
        unwind
    }
}
