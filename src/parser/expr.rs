use super::ast::*;
use super::completion::{CompletionKind, CompletionNode, TypeCtx};
use super::types::TypeScan;
use super::{Parser, can_start_expr};
use crate::lexer::Token;
use crate::span::{Span, Spanned};

/// Binding power for binary operators. Higher binds tighter.
fn infix_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (1, 2),
        BinOp::And => (3, 4),
        BinOp::BitOr => (5, 6),
        BinOp::BitXor => (7, 8),
        BinOp::BitAnd => (9, 10),
        BinOp::Eq | BinOp::Ne => (11, 12),
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => (13, 14),
        BinOp::Shl | BinOp::Shr | BinOp::UShr => (15, 16),
        BinOp::Add | BinOp::Sub => (17, 18),
        BinOp::Mul | BinOp::Div | BinOp::Rem => (19, 20),
    }
}

const INSTANCEOF_BP: u8 = 13;

/// Tokens that may follow `(Type)` for it to read as a cast.
fn can_follow_cast(tok: Token) -> bool {
    tok.is_literal()
        || matches!(
            tok,
            Token::Ident | Token::This | Token::Super | Token::New | Token::LParen | Token::Bang | Token::Tilde
        )
}

fn boxed(expr: Spanned<Expr>) -> Box<Spanned<Expr>> {
    Box::new(expr)
}

fn missing(at: usize) -> Spanned<Expr> {
    Spanned::new(Expr::Name(Vec::new()), Span::point(at))
}

fn completion_expr(node: CompletionNode) -> Spanned<Expr> {
    let span = node.span;
    Spanned::new(Expr::Completion(node), span)
}

impl<'a> Parser<'a> {
    // ── Operators ────────────────────────────────────────────────────

    /// Assignment operator at the current position and how many tokens it spans.
    fn peek_assign_op(&self) -> Option<(AssignOp, usize)> {
        let op = match self.peek() {
            Token::Eq => AssignOp::Assign,
            Token::PlusEq => AssignOp::Add,
            Token::MinusEq => AssignOp::Sub,
            Token::StarEq => AssignOp::Mul,
            Token::SlashEq => AssignOp::Div,
            Token::PercentEq => AssignOp::Rem,
            Token::AmpEq => AssignOp::BitAnd,
            Token::PipeEq => AssignOp::BitOr,
            Token::CaretEq => AssignOp::BitXor,
            Token::ShlEq => AssignOp::Shl,
            Token::Gt => return self.peek_shift_assign(),
            _ => return None,
        };
        Some((op, 1))
    }

    /// `>>=` and `>>>=` arrive as separate `>` tokens.
    fn peek_shift_assign(&self) -> Option<(AssignOp, usize)> {
        let p = self.pos;
        match (self.tok(p + 1), self.adjacent(p)) {
            (Token::GtEq, true) => Some((AssignOp::Shr, 2)),
            (Token::Gt, true) if self.tok(p + 2) == Token::GtEq && self.adjacent(p + 1) => Some((AssignOp::UShr, 3)),
            _ => None,
        }
    }

    fn peek_binop(&self) -> Option<(BinOp, usize)> {
        let op = match self.peek() {
            Token::PipePipe => BinOp::Or,
            Token::AmpAmp => BinOp::And,
            Token::Pipe => BinOp::BitOr,
            Token::Caret => BinOp::BitXor,
            Token::Amp => BinOp::BitAnd,
            Token::EqEq => BinOp::Eq,
            Token::BangEq => BinOp::Ne,
            Token::Lt => BinOp::Lt,
            Token::LtEq => BinOp::Le,
            Token::GtEq => BinOp::Ge,
            Token::Shl => BinOp::Shl,
            Token::Plus => BinOp::Add,
            Token::Minus => BinOp::Sub,
            Token::Star => BinOp::Mul,
            Token::Slash => BinOp::Div,
            Token::Percent => BinOp::Rem,
            Token::Gt => {
                if self.peek_shift_assign().is_some() {
                    return None;
                }
                let p = self.pos;
                if self.tok(p + 1) == Token::Gt && self.adjacent(p) {
                    if self.tok(p + 2) == Token::Gt && self.adjacent(p + 1) {
                        return Some((BinOp::UShr, 3));
                    }
                    return Some((BinOp::Shr, 2));
                }
                BinOp::Gt
            }
            _ => return None,
        };
        Some((op, 1))
    }

    // ── Expressions ──────────────────────────────────────────────────

    pub(super) fn parse_expr(&mut self) -> Spanned<Expr> {
        let target = self.parse_conditional();
        if self.recovering {
            return target;
        }
        let Some((op, width)) = self.peek_assign_op() else {
            return target;
        };
        for _ in 0..width {
            self.advance();
        }
        let value = self.parse_expr();
        let span = target.span.to(value.span);
        Spanned::new(Expr::Assign { op, target: boxed(target), value: boxed(value) }, span)
    }

    /// Variable initializer: an expression or an array initializer.
    pub(super) fn parse_var_init(&mut self) -> Spanned<Expr> {
        if self.at(Token::LBrace) {
            self.parse_array_init()
        } else {
            self.parse_expr()
        }
    }

    pub(super) fn parse_conditional(&mut self) -> Spanned<Expr> {
        let cond = self.parse_binary(0);
        if self.recovering || !self.at(Token::Question) {
            return cond;
        }
        self.advance();
        let then_expr = self.parse_expr();
        let else_expr = if self.recovering {
            missing(self.prev_end())
        } else {
            self.expect(Token::Colon);
            self.parse_conditional()
        };
        let span = cond.span.to(else_expr.span).to(then_expr.span);
        Spanned::new(
            Expr::Conditional { cond: boxed(cond), then_expr: boxed(then_expr), else_expr: boxed(else_expr) },
            span,
        )
    }

    fn parse_binary(&mut self, min_bp: u8) -> Spanned<Expr> {
        let mut lhs = self.parse_unary();
        loop {
            if self.recovering {
                break;
            }
            if self.at(Token::Instanceof) {
                if INSTANCEOF_BP < min_bp {
                    break;
                }
                self.advance();
                let ty = self.parse_type(TypeCtx::Type);
                let span = lhs.span.to(ty.span);
                lhs = Spanned::new(Expr::InstanceOf { expr: boxed(lhs), ty }, span);
                continue;
            }
            let Some((op, width)) = self.peek_binop() else {
                break;
            };
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            for _ in 0..width {
                self.advance();
            }
            let rhs = self.parse_binary(r_bp);
            let span = lhs.span.to(rhs.span);
            lhs = Spanned::new(Expr::Binary { op, lhs: boxed(lhs), rhs: boxed(rhs) }, span);
        }
        lhs
    }

    fn parse_unary(&mut self) -> Spanned<Expr> {
        let start = self.peek_span().start;
        let op = match self.peek() {
            Token::Plus => Some(UnaryOp::Plus),
            Token::Minus => Some(UnaryOp::Neg),
            Token::Bang => Some(UnaryOp::Not),
            Token::Tilde => Some(UnaryOp::BitNot),
            Token::PlusPlus => Some(UnaryOp::PreInc),
            Token::MinusMinus => Some(UnaryOp::PreDec),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary();
            let span = Span::new(start, operand.span.end.max(start));
            return Spanned::new(Expr::Unary { op, operand: boxed(operand) }, span);
        }

        if self.at(Token::LParen) && self.is_cast_ahead() {
            return self.parse_cast();
        }

        let primary = self.parse_primary();
        let mut expr = self.parse_selectors(primary);
        while !self.recovering && matches!(self.peek(), Token::PlusPlus | Token::MinusMinus) {
            let op = if self.advance().node == Token::PlusPlus { PostfixOp::Inc } else { PostfixOp::Dec };
            let span = self.span_from(expr.span.start);
            expr = Spanned::new(Expr::Postfix { op, operand: boxed(expr) }, span);
        }
        expr
    }

    /// `(Type) operand`, decided before consuming the parenthesis.
    fn is_cast_ahead(&self) -> bool {
        let first = self.pos + 1;
        let TypeScan::Closed(j) = self.scan_type(first) else {
            return false;
        };
        if self.tok(j) != Token::RParen {
            return false;
        }
        self.tok(first).is_primitive() || can_follow_cast(self.tok(j + 1))
    }

    fn parse_cast(&mut self) -> Spanned<Expr> {
        let start = self.advance().span.start;
        let ty = self.parse_type(TypeCtx::Type);
        if self.recovering {
            // A half-typed cast type stands alone.
            return match ty.node {
                TypeRef::Completion(node) => completion_expr(node),
                _ => type_as_expr(ty),
            };
        }
        self.expect(Token::RParen);
        let expr = self.parse_unary();
        let span = Span::new(start, expr.span.end.max(start));
        Spanned::new(Expr::Cast { ty, expr: boxed(expr) }, span)
    }

    fn parse_primary(&mut self) -> Spanned<Expr> {
        let new_ctx = self.new_type_ctx.take();
        let start = self.peek_span().start;

        if self.at_gap() && !can_start_expr(self.peek()) {
            let node = self.complete_gap(CompletionKind::Name { qualifier: Vec::new() }, self.cursor.caret);
            return completion_expr(node);
        }

        match self.peek() {
            tok if tok.is_literal() => {
                let t = self.advance();
                Spanned::new(Expr::Literal(self.text(t.span)), t.span)
            }
            Token::This => Spanned::new(Expr::This, self.advance().span),
            Token::Super => Spanned::new(Expr::Super, self.advance().span),
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr();
                if !self.recovering {
                    self.expect(Token::RParen);
                }
                Spanned::new(Expr::Paren(boxed(inner)), self.span_from(start))
            }
            Token::New => self.parse_new(None, start, new_ctx.unwrap_or(TypeCtx::Type)),
            Token::Ident => self.parse_name_primary(),
            Token::LBrace => self.parse_array_init(),
            tok if tok.is_primitive() || tok == Token::Void => {
                let ty = self.parse_type(TypeCtx::Type);
                self.parse_class_literal(ty, start)
            }
            _ => missing(start),
        }
    }

    /// A dotted name, a call on a simple name, or a class literal on a named type.
    fn parse_name_primary(&mut self) -> Spanned<Expr> {
        let start = self.peek_span().start;
        let mut segments: Vec<Spanned<String>> = Vec::new();

        loop {
            if self.at_cursor_token() {
                let qualifier = segments.iter().map(|s| s.node.clone()).collect();
                let node = self.complete_token(CompletionKind::Name { qualifier }, start);
                return completion_expr(node);
            }
            segments.push(self.ident());
            if !self.at(Token::Dot) {
                break;
            }
            let next = self.pos + 1;
            if self.tok(next) == Token::Ident && (self.tok(next + 1) != Token::LParen || self.cursor_token_is(next)) {
                self.advance();
                continue;
            }
            if self.cursor_gap_is(next) {
                self.advance();
                let qualifier = segments.iter().map(|s| s.node.clone()).collect();
                let node = self.complete_gap(CompletionKind::Name { qualifier }, start);
                return completion_expr(node);
            }
            break;
        }

        if self.at(Token::LBracket) && self.nth(1) == Token::RBracket {
            let ty_segments = segments.into_iter().map(|name| TypeSegment { name, args: None }).collect();
            let named = Spanned::new(TypeRef::Named(ty_segments), self.span_from(start));
            let dims = self.parse_dims();
            let ty = Spanned::new(TypeRef::Array { elem: Box::new(named), dims }, self.span_from(start));
            return self.parse_class_literal(ty, start);
        }

        if segments.len() == 1 && self.at(Token::LParen) {
            let name = segments.remove(0);
            let args = match self.parse_arguments(start, |args| CompletionKind::MessageSend {
                receiver: None,
                type_args: None,
                selector: name.node.clone(),
                args: args.to_vec(),
            }) {
                Ok(args) => args,
                Err(node) => return completion_expr(node),
            };
            let call = Expr::Call { receiver: None, type_args: None, name, args };
            return Spanned::new(call, self.span_from(start));
        }

        Spanned::new(Expr::Name(segments), self.span_from(start))
    }

    /// `Type.class`, or a completion on what follows `Type.`.
    fn parse_class_literal(&mut self, ty: Spanned<TypeRef>, start: usize) -> Spanned<Expr> {
        if self.at(Token::Dot) {
            let next = self.pos + 1;
            if self.cursor_token_is(next) {
                self.advance();
                let node = self.complete_token(CompletionKind::ClassLiteralAccess { ty: Box::new(ty) }, start);
                return completion_expr(node);
            }
            if self.cursor_gap_is(next) {
                self.advance();
                let node = self.complete_gap(CompletionKind::ClassLiteralAccess { ty: Box::new(ty) }, start);
                return completion_expr(node);
            }
            if self.tok(next) == Token::Class {
                self.advance();
                self.advance();
                return Spanned::new(Expr::ClassLiteral(ty), self.span_from(start));
            }
        }
        type_as_expr(ty)
    }

    /// Member selections, calls and indexing after a primary.
    fn parse_selectors(&mut self, mut lhs: Spanned<Expr>) -> Spanned<Expr> {
        loop {
            if self.recovering {
                break;
            }
            let start = lhs.span.start;
            match self.peek() {
                Token::Dot => {
                    let next = self.pos + 1;
                    if self.cursor_token_is(next) || self.cursor_gap_is(next) {
                        self.advance();
                        let kind = match lhs.node {
                            Expr::Name(segments) => CompletionKind::Name {
                                qualifier: segments.into_iter().map(|s| s.node).collect(),
                            },
                            _ => CompletionKind::MemberAccess { receiver: boxed(lhs) },
                        };
                        let node = if self.at_cursor_token() {
                            self.complete_token(kind, start)
                        } else {
                            self.complete_gap(kind, start)
                        };
                        return completion_expr(node);
                    }
                    match self.tok(next) {
                        Token::Ident => {
                            self.advance();
                            let name = self.ident();
                            lhs = self.finish_member(lhs, None, name);
                        }
                        Token::Lt => {
                            self.advance();
                            lhs = self.parse_generic_call(lhs);
                        }
                        Token::New => {
                            self.advance();
                            let new_start = self.peek_span().start;
                            let alloc = self.parse_new(Some(lhs), new_start, TypeCtx::Type);
                            let span = Span::new(start, alloc.span.end.max(start));
                            lhs = Spanned::new(alloc.node, span);
                        }
                        Token::This | Token::Super => {
                            self.advance();
                            let kw = self.ident();
                            let span = self.span_from(start);
                            lhs = Spanned::new(Expr::FieldAccess { receiver: boxed(lhs), name: kw }, span);
                        }
                        Token::Class => {
                            self.advance();
                            self.advance();
                            let ty = expr_as_type(lhs);
                            lhs = Spanned::new(Expr::ClassLiteral(ty), self.span_from(start));
                        }
                        _ => break,
                    }
                }
                Token::LBracket => {
                    self.advance();
                    let index = self.parse_expr();
                    if !self.recovering {
                        self.expect(Token::RBracket);
                    }
                    let span = self.span_from(start);
                    lhs = Spanned::new(Expr::Index { array: boxed(lhs), index: boxed(index) }, span);
                }
                _ => break,
            }
        }
        lhs
    }

    /// `recv.name` or `recv.<T>name(args)` once the name is known.
    fn finish_member(
        &mut self,
        receiver: Spanned<Expr>,
        type_args: Option<Vec<Spanned<TypeRef>>>,
        name: Spanned<String>,
    ) -> Spanned<Expr> {
        let start = receiver.span.start;
        if !self.at(Token::LParen) {
            let span = self.span_from(start);
            return Spanned::new(Expr::FieldAccess { receiver: boxed(receiver), name }, span);
        }
        let args = match self.parse_arguments(start, |args| CompletionKind::MessageSend {
            receiver: Some(boxed(receiver.clone())),
            type_args: type_args.clone(),
            selector: name.node.clone(),
            args: args.to_vec(),
        }) {
            Ok(args) => args,
            Err(node) => return completion_expr(node),
        };
        let call = Expr::Call { receiver: Some(boxed(receiver)), type_args, name, args };
        Spanned::new(call, self.span_from(start))
    }

    /// `recv.<T>sel(args)`, positioned at `<`.
    fn parse_generic_call(&mut self, receiver: Spanned<Expr>) -> Spanned<Expr> {
        let start = receiver.span.start;
        let type_args = self.parse_type_args();
        if self.recovering {
            let call = Expr::Call {
                receiver: Some(boxed(receiver)),
                type_args: Some(type_args),
                name: Spanned::new(String::new(), Span::point(self.prev_end())),
                args: Vec::new(),
            };
            return Spanned::new(call, self.span_from(start));
        }
        if self.at_cursor_token() || (self.at_gap() && !self.at(Token::Ident)) {
            let kind = CompletionKind::MessageSendName { receiver: Some(boxed(receiver)), type_args };
            let node = if self.at_cursor_token() {
                self.complete_token(kind, start)
            } else {
                self.complete_gap(kind, start)
            };
            return completion_expr(node);
        }
        let name = if self.at(Token::Ident) {
            self.ident()
        } else {
            Spanned::new(String::new(), Span::point(self.prev_end()))
        };
        self.finish_member(receiver, Some(type_args), name)
    }

    /// Parenthesized arguments at `(`. A gap before any argument can start
    /// turns the whole call into a completion node built by `on_gap`.
    pub(super) fn parse_arguments(
        &mut self,
        start: usize,
        on_gap: impl FnOnce(&[Spanned<Expr>]) -> CompletionKind,
    ) -> Result<Vec<Spanned<Expr>>, CompletionNode> {
        self.advance();
        let mut args = Vec::new();
        loop {
            if self.at_gap() && !can_start_expr(self.peek()) {
                let kind = on_gap(&args);
                return Err(self.complete_gap(kind, start));
            }
            if self.eat(Token::RParen) {
                break;
            }
            if !can_start_expr(self.peek()) && !self.at(Token::LBrace) {
                break;
            }
            args.push(self.parse_expr());
            if self.recovering {
                break;
            }
            if self.eat(Token::Comma) {
                continue;
            }
            self.expect(Token::RParen);
            break;
        }
        Ok(args)
    }

    /// `new T(args) { body }`, `new T[n][]` or `new T[] { .. }`, positioned at `new`.
    pub(super) fn parse_new(
        &mut self,
        qualifier: Option<Spanned<Expr>>,
        start: usize,
        ctx: TypeCtx,
    ) -> Spanned<Expr> {
        self.advance();
        if self.at(Token::Lt) {
            // Constructor type arguments carry nothing we keep.
            self.parse_type_args();
            if self.recovering {
                return missing(start);
            }
        }

        let blocked = qualifier
            .as_ref()
            .is_some_and(|q| matches!(&q.node, Expr::New { ty, .. } if ty.node.has_type_args()));
        self.diamond_gap_blocked = blocked;
        let ty = self.parse_class_type(ctx);
        self.diamond_gap_blocked = false;

        if self.recovering {
            let alloc = Expr::New { qualifier: qualifier.map(boxed), ty, args: Vec::new(), body: None };
            return Spanned::new(alloc, self.span_from(start));
        }

        if self.at(Token::LBracket) {
            return self.parse_new_array(ty, start);
        }

        let args = if self.at(Token::LParen) {
            let parsed = self.parse_arguments(start, |args| match &qualifier {
                Some(receiver) => CompletionKind::QualifiedAllocation {
                    receiver: boxed(receiver.clone()),
                    ty: Box::new(ty.clone()),
                    args: args.to_vec(),
                },
                None => CompletionKind::Allocation { ty: Box::new(ty.clone()), args: args.to_vec() },
            });
            match parsed {
                Ok(args) => args,
                Err(node) => return completion_expr(node),
            }
        } else {
            Vec::new()
        };

        let body = if !self.recovering && self.at(Token::LBrace) {
            let name = Spanned::new(crate::pretty::type_to_string(&ty), ty.span);
            Some(Box::new(self.parse_anonymous_body(name)))
        } else {
            None
        };
        let alloc = Expr::New { qualifier: qualifier.map(boxed), ty, args, body };
        Spanned::new(alloc, self.span_from(start))
    }

    fn parse_new_array(&mut self, elem: Spanned<TypeRef>, start: usize) -> Spanned<Expr> {
        let mut dims = Vec::new();
        let mut extra_dims = 0;
        while self.at(Token::LBracket) {
            if self.nth(1) == Token::RBracket {
                self.advance();
                self.advance();
                extra_dims += 1;
                continue;
            }
            self.advance();
            dims.push(self.parse_expr());
            if self.recovering {
                break;
            }
            self.expect(Token::RBracket);
        }
        let init = if !self.recovering && self.at(Token::LBrace) {
            Some(boxed(self.parse_array_init()))
        } else {
            None
        };
        Spanned::new(Expr::NewArray { elem, dims, extra_dims, init }, self.span_from(start))
    }

    /// `{a, b, {c}}`, positioned at `{`.
    pub(super) fn parse_array_init(&mut self) -> Spanned<Expr> {
        let start = self.advance().span.start;
        let mut elems = Vec::new();
        loop {
            if self.eat(Token::RBrace) {
                break;
            }
            if !(can_start_expr(self.peek()) || self.at(Token::LBrace) || self.at_gap()) {
                break;
            }
            elems.push(self.parse_var_init());
            if self.recovering {
                break;
            }
            if self.eat(Token::Comma) {
                continue;
            }
            self.expect(Token::RBrace);
            break;
        }
        Spanned::new(Expr::ArrayInit(elems), self.span_from(start))
    }
}

/// A type standing where an expression was expected.
fn type_as_expr(ty: Spanned<TypeRef>) -> Spanned<Expr> {
    let span = ty.span;
    let text = crate::pretty::type_to_string(&ty);
    Spanned::new(Expr::Name(vec![Spanned::new(text, span)]), span)
}

/// A name used as the type of a class literal.
fn expr_as_type(expr: Spanned<Expr>) -> Spanned<TypeRef> {
    let span = expr.span;
    let segments = match expr.node {
        Expr::Name(segments) => segments.into_iter().map(|name| TypeSegment { name, args: None }).collect(),
        other => {
            let text = crate::pretty::expr_to_string(&Spanned::new(other, span));
            vec![TypeSegment { name: Spanned::new(text, span), args: None }]
        }
    };
    Spanned::new(TypeRef::Named(segments), span)
}
