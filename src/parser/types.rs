use super::ast::*;
use super::completion::{CompletionKind, TypeCtx, keyword_candidates};
use super::{Parser, can_start_type};
use crate::lexer::Token;
use crate::span::{Span, Spanned};

/// Outcome of scanning ahead for a type without consuming anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TypeScan {
    /// A complete type; the index is the first token after it.
    Closed(usize),
    /// Type arguments left open where the cursor is; the index is the first
    /// token after what was scanned.
    Unclosed(usize),
    NotType,
}

impl<'a> Parser<'a> {
    // ── Type references ──────────────────────────────────────────────

    /// A type with optional trailing `[]` pairs.
    pub(super) fn parse_type(&mut self, ctx: TypeCtx) -> Spanned<TypeRef> {
        let start = self.peek_span().start;
        let base = self.parse_class_type(ctx);
        if self.recovering {
            return base;
        }
        let dims = self.parse_dims();
        if dims == 0 {
            return base;
        }
        Spanned::new(TypeRef::Array { elem: Box::new(base), dims }, self.span_from(start))
    }

    pub(super) fn parse_dims(&mut self) -> usize {
        let mut dims = 0;
        while self.at(Token::LBracket) && self.nth(1) == Token::RBracket {
            self.advance();
            self.advance();
            dims += 1;
        }
        dims
    }

    /// A possibly qualified, possibly parameterized type name, or a primitive.
    pub(super) fn parse_class_type(&mut self, ctx: TypeCtx) -> Spanned<TypeRef> {
        let start = self.peek_span().start;

        if self.at_gap() && !can_start_type(self.peek()) {
            let node = self.complete_gap(CompletionKind::for_type(ctx, Vec::new()), self.cursor.caret);
            let span = node.span;
            return Spanned::new(TypeRef::Completion(node), span);
        }

        if self.peek().is_primitive() || self.at(Token::Void) {
            let name = self.ident();
            let span = name.span;
            return Spanned::new(TypeRef::simple(name), span);
        }

        let mut segments: Vec<TypeSegment> = Vec::new();
        loop {
            if self.at_cursor_token() {
                let qualifier = segments.iter().map(|s| s.name.node.clone()).collect();
                let node = self.complete_token(CompletionKind::for_type(ctx, qualifier), start);
                let span = node.span;
                return Spanned::new(TypeRef::Completion(node), span);
            }
            if !self.at(Token::Ident) {
                break;
            }
            let name = self.ident();
            let args = if self.at(Token::Lt) {
                let args = self.parse_type_args();
                if self.recovering {
                    segments.push(TypeSegment { name, args: Some(args) });
                    return Spanned::new(TypeRef::Named(segments), self.span_from(start));
                }
                Some(args)
            } else {
                None
            };
            segments.push(TypeSegment { name, args });

            if !self.at(Token::Dot) {
                break;
            }
            if self.nth(1) == Token::Ident {
                self.advance();
                continue;
            }
            if self.cursor_gap_is(self.pos + 1) {
                self.advance();
                let qualifier = segments.iter().map(|s| s.name.node.clone()).collect();
                let node = self.complete_gap(CompletionKind::for_type(ctx, qualifier), start);
                let span = node.span;
                return Spanned::new(TypeRef::Completion(node), span);
            }
            break;
        }

        if segments.is_empty() {
            return Spanned::new(TypeRef::Named(Vec::new()), Span::point(start));
        }
        Spanned::new(TypeRef::Named(segments), self.span_from(start))
    }

    /// `<A, B<C>>`. An empty list is a diamond.
    pub(super) fn parse_type_args(&mut self) -> Vec<Spanned<TypeRef>> {
        self.advance();
        let mut args = Vec::new();

        if self.at(Token::Gt) && !(self.at_gap() && !self.diamond_gap_blocked) {
            self.advance();
            return args;
        }

        loop {
            let arg = if self.at(Token::Question) {
                self.parse_wildcard()
            } else {
                self.parse_type(TypeCtx::Type)
            };
            args.push(arg);
            if self.recovering {
                break;
            }
            if self.eat(Token::Comma) {
                continue;
            }
            self.expect(Token::Gt);
            break;
        }
        args
    }

    fn parse_wildcard(&mut self) -> Spanned<TypeRef> {
        let start = self.advance().span.start;
        let bound = match self.peek() {
            Token::Extends => {
                self.advance();
                Some(WildcardBound::Extends(Box::new(self.parse_type(TypeCtx::Type))))
            }
            Token::Super => {
                self.advance();
                Some(WildcardBound::Super(Box::new(self.parse_type(TypeCtx::Type))))
            }
            Token::Ident if self.at_cursor_token() => {
                let span = self.peek_span();
                let candidates = keyword_candidates(&self.typed_prefix(span), &["extends", "super"]);
                let node = self.complete_token(CompletionKind::Keyword { candidates }, span.start);
                Some(WildcardBound::Keyword(node))
            }
            _ => None,
        };
        Spanned::new(TypeRef::Wildcard(bound), self.span_from(start))
    }

    /// `<T extends A & B, U>` on a declaration.
    pub(super) fn parse_type_params(&mut self) -> Vec<Spanned<TypeParam>> {
        let open = self.pos;
        self.advance();
        let mut params = Vec::new();
        while self.at(Token::Ident) {
            let name = self.ident();
            let start = name.span.start;
            let mut bounds = Vec::new();
            if self.eat(Token::Extends) {
                loop {
                    bounds.push(self.parse_type(TypeCtx::Type));
                    if self.recovering || !self.eat(Token::Amp) {
                        break;
                    }
                }
            }
            params.push(Spanned::new(TypeParam { name, bounds }, self.span_from(start)));
            if self.recovering {
                self.skip_past_type_params(open);
                return params;
            }
            if !self.eat(Token::Comma) {
                break;
            }
        }
        self.expect(Token::Gt);
        params
    }

    /// Skip the rest of the type parameter list opened at `open` and its
    /// closing `>`, so the declaration it belongs to can go on parsing.
    fn skip_past_type_params(&mut self, open: usize) {
        let mut depth = (open + 1..self.pos).fold(0usize, |depth, i| match self.tok(i) {
            Token::Lt => depth + 1,
            Token::Gt => depth.saturating_sub(1),
            _ => depth,
        });
        loop {
            match self.peek() {
                Token::Lt => depth += 1,
                Token::Gt if depth == 0 => {
                    self.advance();
                    break;
                }
                Token::Gt => depth -= 1,
                Token::LBrace | Token::RBrace | Token::LParen | Token::Semi | Token::Eof => break,
                _ => {}
            }
            self.advance();
        }
        self.recovering = false;
    }

    // ── Lookahead ────────────────────────────────────────────────────

    /// Scan a type starting at token `i` without consuming.
    pub(super) fn scan_type(&self, i: usize) -> TypeScan {
        let mut i = i;
        if self.tok(i).is_primitive() {
            i += 1;
        } else if self.tok(i) == Token::Ident {
            loop {
                i += 1;
                if self.tok(i) == Token::Lt {
                    match self.scan_type_args(i) {
                        TypeScan::Closed(j) => i = j,
                        other => return other,
                    }
                }
                if self.tok(i) == Token::Dot && self.tok(i + 1) == Token::Ident {
                    i += 1;
                    continue;
                }
                break;
            }
        } else {
            return TypeScan::NotType;
        }
        while self.tok(i) == Token::LBracket && self.tok(i + 1) == Token::RBracket {
            i += 2;
        }
        TypeScan::Closed(i)
    }

    fn scan_type_args(&self, lt: usize) -> TypeScan {
        let mut i = lt + 1;
        if self.tok(i) == Token::Gt {
            return TypeScan::Closed(i + 1);
        }
        loop {
            if self.cursor_gap_is(i) && !can_start_type(self.tok(i)) && self.tok(i) != Token::Question {
                return TypeScan::Unclosed(i);
            }
            let arg = if self.tok(i) == Token::Question {
                i += 1;
                if matches!(self.tok(i), Token::Extends | Token::Super) {
                    self.scan_type(i + 1)
                } else if self.cursor_token_is(i) {
                    return TypeScan::Unclosed(i + 1);
                } else {
                    TypeScan::Closed(i)
                }
            } else {
                self.scan_type(i)
            };
            match arg {
                TypeScan::Closed(j) => i = j,
                TypeScan::Unclosed(j) => return TypeScan::Unclosed(j),
                TypeScan::NotType => {
                    return if self.cursor_within(lt, i) { TypeScan::Unclosed(i) } else { TypeScan::NotType };
                }
            }
            match self.tok(i) {
                Token::Comma => i += 1,
                Token::Gt => return TypeScan::Closed(i + 1),
                _ => {
                    return if self.cursor_within(lt, i) { TypeScan::Unclosed(i) } else { TypeScan::NotType };
                }
            }
        }
    }
}
