pub mod ast;
pub mod completion;

mod decl;
mod diet;
mod expr;
mod recovery;
mod stmt;
mod types;

use serde::{Deserialize, Serialize};

use crate::lexer::Token;
use crate::span::{Span, Spanned};
use ast::*;
use completion::{CompletionKind, CompletionNode, keyword_candidates};

/// How much of method and initializer bodies to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Declarations only; bodies are skipped unless the cursor is inside.
    Diet,
    /// Every body is parsed statement by statement.
    #[default]
    Method,
}

/// Result of one parse: the recovered tree and the completion node, if one fired.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub unit: CompilationUnit,
    pub completion: Option<CompletionNode>,
}

/// Where the cursor sits relative to the token stream.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    /// Byte offset just past the last typed character.
    caret: usize,
    /// Identifier token the caret is inside of or at the end of.
    token: Option<usize>,
    /// First token starting at or after the caret.
    gap: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    Unit,
    TypeBody,
    MethodBody,
    Block,
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    kind: ScopeKind,
    open: usize,
}

pub struct Parser<'a> {
    tokens: Vec<Spanned<Token>>,
    source: &'a str,
    pos: usize,
    mode: ParseMode,
    cursor: Cursor,
    completion: Option<CompletionNode>,
    /// Set once the completion node exists, until the enclosing construct is skipped.
    recovering: bool,
    scopes: Vec<Scope>,
    /// Nesting depth of bodies parsed in full while in diet mode.
    full_depth: usize,
    /// Type context for the next `new`, set by `throw`.
    new_type_ctx: Option<completion::TypeCtx>,
    /// No completion inside an empty diamond of this allocation.
    diamond_gap_blocked: bool,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with `Token::Eof`, as produced by `lexer::lex`.
    /// `cursor` is the offset of the last typed byte.
    pub fn new(tokens: &[Spanned<Token>], source: &'a str, cursor: usize, mode: ParseMode) -> Self {
        let caret = caret_after(source, cursor);
        Self::with_caret(tokens, source, Some(caret), mode)
    }

    /// A parser with no completion point.
    pub fn outline(tokens: &[Spanned<Token>], source: &'a str, mode: ParseMode) -> Self {
        Self::with_caret(tokens, source, None, mode)
    }

    fn with_caret(tokens: &[Spanned<Token>], source: &'a str, caret: Option<usize>, mode: ParseMode) -> Self {
        let mut tokens = tokens.to_vec();
        if tokens.last().is_none_or(|t| t.node != Token::Eof) {
            tokens.push(Spanned::new(Token::Eof, Span::point(source.len())));
        }

        let cursor = match caret {
            Some(caret) => {
                let token = tokens.iter().position(|t| {
                    (t.node == Token::Ident || t.node.is_keyword())
                        && t.span.start < caret
                        && caret <= t.span.end
                });
                // A keyword being typed is just an identifier prefix.
                if let Some(i) = token {
                    tokens[i].node = Token::Ident;
                }
                let gap = tokens.partition_point(|t| t.span.start < caret);
                Cursor { caret, token, gap }
            }
            None => Cursor { caret: usize::MAX, token: None, gap: usize::MAX },
        };
        tracing::trace!(caret = cursor.caret, token = ?cursor.token, gap = cursor.gap, "cursor resolved");

        Self {
            tokens,
            source,
            pos: 0,
            mode,
            cursor,
            completion: None,
            recovering: false,
            scopes: Vec::new(),
            full_depth: 0,
            new_type_ctx: None,
            diamond_gap_blocked: false,
        }
    }

    // ── Token access ─────────────────────────────────────────────────

    fn eof_index(&self) -> usize {
        self.tokens.len() - 1
    }

    fn tok(&self, i: usize) -> Token {
        self.tokens.get(i).map_or(Token::Eof, |t| t.node)
    }

    fn nth(&self, n: usize) -> Token {
        self.tok(self.pos + n)
    }

    fn peek(&self) -> Token {
        self.tok(self.pos)
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos.min(self.eof_index())].span
    }

    fn span_of(&self, i: usize) -> Span {
        self.tokens[i.min(self.eof_index())].span
    }

    fn at(&self, tok: Token) -> bool {
        self.peek() == tok
    }

    fn at_eof(&self) -> bool {
        self.at(Token::Eof)
    }

    /// Consume the current token. Never moves past `Eof`.
    fn advance(&mut self) -> Spanned<Token> {
        let tok = self.tokens[self.pos.min(self.eof_index())].clone();
        if self.pos < self.eof_index() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, tok: Token) -> bool {
        if self.at(tok) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `tok` if present. A missing token is tolerated and left for
    /// the enclosing construct.
    fn expect(&mut self, tok: Token) -> bool {
        if self.eat(tok) {
            return true;
        }
        tracing::trace!(expected = %tok, found = %self.peek(), at = self.peek_span().start, "tolerating missing token");
        false
    }

    fn ident(&mut self) -> Spanned<String> {
        let tok = self.advance();
        Spanned::new(tok.span.slice(self.source).to_string(), tok.span)
    }

    fn text(&self, span: Span) -> String {
        span.slice(self.source).to_string()
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    /// Whether tokens `i` and `i + 1` touch.
    fn adjacent(&self, i: usize) -> bool {
        i < self.eof_index() && self.span_of(i).end == self.span_of(i + 1).start
    }

    // ── Cursor ───────────────────────────────────────────────────────

    fn can_complete(&self) -> bool {
        self.completion.is_none()
    }

    fn cursor_token_is(&self, i: usize) -> bool {
        self.can_complete() && self.cursor.token == Some(i)
    }

    fn cursor_gap_is(&self, i: usize) -> bool {
        self.can_complete() && self.cursor.token.is_none() && self.cursor.gap == i
    }

    /// The current token is the identifier being typed.
    fn at_cursor_token(&self) -> bool {
        self.cursor_token_is(self.pos)
    }

    /// The caret sits in the whitespace before the current token.
    fn at_gap(&self) -> bool {
        self.cursor_gap_is(self.pos)
    }

    /// Whether the cursor lies within tokens `from..=to`, counting a gap
    /// right after `to`.
    fn cursor_within(&self, from: usize, to: usize) -> bool {
        match self.cursor.token {
            Some(t) => from < t && t <= to,
            None => from < self.cursor.gap && self.cursor.gap <= to + 1,
        }
    }

    fn typed_prefix(&self, span: Span) -> String {
        let end = self.cursor.caret.clamp(span.start, span.end);
        self.source[span.start..end].to_string()
    }

    fn complete(&mut self, kind: CompletionKind, token: String, replaced: Span) -> CompletionNode {
        let node = CompletionNode {
            kind,
            token,
            replaced,
            replaced_source: replaced.slice(self.source).to_string(),
            span: replaced,
        };
        tracing::debug!(node = %node, start = replaced.start, end = replaced.end, "completion node created");
        self.completion = Some(node.clone());
        self.recovering = true;
        node
    }

    /// Consume the cursor token and complete on it. `start` is where the
    /// replaced source begins, before any qualifier.
    fn complete_token(&mut self, kind: CompletionKind, start: usize) -> CompletionNode {
        let tok = self.advance();
        let token = self.typed_prefix(tok.span);
        self.complete(kind, token, Span::new(start.min(tok.span.start), tok.span.end))
    }

    /// Complete on nothing typed yet. `start` is where a qualifier begins,
    /// or the caret when there is none.
    fn complete_gap(&mut self, kind: CompletionKind, start: usize) -> CompletionNode {
        let end = if start >= self.cursor.caret { start } else { self.prev_end().max(start) };
        self.complete(kind, String::new(), Span::new(start, end))
    }

    // ── Scopes ───────────────────────────────────────────────────────

    fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope { kind, open: self.pos });
    }

    fn pop_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            if self.at_eof() && scope.kind != ScopeKind::Unit {
                tracing::trace!(kind = ?scope.kind, open = scope.open, "scope closed at end of file");
            }
        }
    }

    /// Innermost non-block scope is a method body.
    fn in_method_body(&self) -> bool {
        self.scopes
            .iter()
            .rev()
            .find(|s| s.kind != ScopeKind::Block)
            .is_some_and(|s| s.kind == ScopeKind::MethodBody)
    }

    fn parsing_full(&self) -> bool {
        self.mode == ParseMode::Method || self.full_depth > 0
    }

    // ── Compilation unit ─────────────────────────────────────────────

    pub fn parse_unit(mut self) -> ParseOutcome {
        self.push_scope(ScopeKind::Unit);
        let mut unit = CompilationUnit::default();

        if self.at(Token::Package) {
            unit.package = Some(self.parse_package());
        }

        loop {
            match self.peek() {
                Token::Eof => break,
                Token::Semi => {
                    self.advance();
                }
                Token::Import => unit.imports.push(self.parse_import()),
                _ => {
                    let before = self.pos;
                    self.parse_top_level(&mut unit);
                    if self.recovering {
                        self.recover_member(before);
                    }
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
        }

        self.pop_scope();
        ParseOutcome { unit, completion: self.completion }
    }

    fn parse_package(&mut self) -> Spanned<PackageDecl> {
        let before = self.pos;
        let start = self.peek_span().start;
        self.advance();
        let (name, _) = self.parse_dotted_reference(|qualifier| CompletionKind::Package { qualifier }, false);
        if self.recovering {
            self.recover_member(before);
        } else {
            self.expect(Token::Semi);
        }
        Spanned::new(PackageDecl { annotations: Vec::new(), name }, self.span_from(start))
    }

    fn parse_import(&mut self) -> Spanned<ImportDecl> {
        let before = self.pos;
        let start = self.peek_span().start;
        self.advance();
        let is_static = self.eat(Token::Static);
        let (name, on_demand) = self.parse_dotted_reference(
            |qualifier| CompletionKind::Import { qualifier, is_static },
            true,
        );
        if self.recovering {
            self.recover_member(before);
        } else {
            self.expect(Token::Semi);
        }
        Spanned::new(ImportDecl { name, is_static, on_demand }, self.span_from(start))
    }

    /// `a.b.c`, optionally ending in `.*` for imports.
    fn parse_dotted_reference(
        &mut self,
        make: impl FnOnce(Vec<String>) -> CompletionKind,
        allow_star: bool,
    ) -> (Reference, bool) {
        let start = self.peek_span().start;
        let mut segments: Vec<Spanned<String>> = Vec::new();
        let mut on_demand = false;

        loop {
            let qualifier = || segments.iter().map(|s| s.node.clone()).collect::<Vec<_>>();
            if self.at_cursor_token() {
                let node = self.complete_token(make(qualifier()), start);
                return (Reference::Completion(node), false);
            }
            if self.at_gap() && !self.at(Token::Ident) {
                let from = if segments.is_empty() { self.cursor.caret } else { start };
                let node = self.complete_gap(make(qualifier()), from);
                return (Reference::Completion(node), false);
            }
            if !self.at(Token::Ident) {
                break;
            }
            segments.push(self.ident());
            if !self.at(Token::Dot) {
                break;
            }
            if allow_star && self.nth(1) == Token::Star {
                self.advance();
                self.advance();
                on_demand = true;
                break;
            }
            self.advance();
        }
        (Reference::Path(segments), on_demand)
    }

    fn parse_top_level(&mut self, unit: &mut CompilationUnit) {
        let start = self.peek_span().start;
        let modifiers = self.parse_modifiers();

        if self.at_cursor_token() {
            let pool: &[&'static str] = if modifiers.is_empty() {
                &["import", "package", "public", "abstract", "final", "class", "interface", "enum"]
            } else {
                &["class", "interface", "enum"]
            };
            let span = self.peek_span();
            let candidates = keyword_candidates(&self.typed_prefix(span), pool);
            let node = self.complete_token(CompletionKind::Keyword { candidates }, span.start);
            // The keyword is the whole construct; nothing to skip.
            self.recovering = false;
            let import = ImportDecl { name: Reference::Completion(node), is_static: false, on_demand: false };
            unit.imports.push(Spanned::new(import, span));
            return;
        }

        if self.at_type_decl_start() {
            unit.types.push(self.parse_type_decl(modifiers, start));
        }
    }

    fn at_type_decl_start(&self) -> bool {
        match self.peek() {
            Token::Class | Token::Interface | Token::Enum => true,
            Token::At => self.nth(1) == Token::Interface,
            _ => false,
        }
    }
}

/// Offset just past the character that starts at `cursor`.
fn caret_after(source: &str, cursor: usize) -> usize {
    if cursor >= source.len() {
        return source.len();
    }
    let mut caret = cursor + 1;
    while caret < source.len() && !source.is_char_boundary(caret) {
        caret += 1;
    }
    caret
}

pub(crate) fn can_start_expr(tok: Token) -> bool {
    tok.is_literal()
        || tok.is_primitive()
        || matches!(
            tok,
            Token::Ident
                | Token::This
                | Token::Super
                | Token::New
                | Token::Void
                | Token::LParen
                | Token::Bang
                | Token::Tilde
                | Token::Plus
                | Token::Minus
                | Token::PlusPlus
                | Token::MinusMinus
        )
}

pub(crate) fn can_start_type(tok: Token) -> bool {
    tok == Token::Ident || tok == Token::Void || tok.is_primitive()
}

/// Modifiers that only ever open a member declaration.
pub(crate) fn is_member_only(tok: Token) -> bool {
    matches!(
        tok,
        Token::Public
            | Token::Private
            | Token::Protected
            | Token::Static
            | Token::Native
            | Token::Transient
            | Token::Volatile
    )
}
