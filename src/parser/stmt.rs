use super::ast::*;
use super::completion::{CompletionKind, TypeCtx, keyword_candidates};
use super::types::TypeScan;
use super::{Parser, ScopeKind, can_start_expr, can_start_type};
use crate::lexer::Token;
use crate::span::{Span, Spanned};

/// Tokens after an identifier that make it the start of an expression.
fn continues_expression(tok: Token) -> bool {
    matches!(
        tok,
        Token::Dot
            | Token::LParen
            | Token::LBracket
            | Token::Lt
            | Token::Colon
            | Token::PlusPlus
            | Token::MinusMinus
            | Token::Eq
            | Token::PlusEq
            | Token::MinusEq
            | Token::StarEq
            | Token::SlashEq
            | Token::PercentEq
            | Token::AmpEq
            | Token::PipeEq
            | Token::CaretEq
            | Token::ShlEq
    )
}

/// An `if` whose innermost `else` slot is still free.
fn has_dangling_if(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::If { else_branch: None, .. } => true,
        Stmt::If { else_branch: Some(else_branch), .. } => has_dangling_if(&else_branch.node),
        _ => false,
    }
}

fn empty_at(at: usize) -> Box<Spanned<Stmt>> {
    Box::new(Spanned::new(Stmt::Empty, Span::point(at)))
}

impl<'a> Parser<'a> {
    // ── Blocks ───────────────────────────────────────────────────────

    pub(super) fn parse_block(&mut self) -> Spanned<Block> {
        let start = self.peek_span().start;
        if !self.eat(Token::LBrace) {
            return Spanned::new(Block::default(), Span::point(self.prev_end()));
        }
        self.push_scope(ScopeKind::Block);
        let stmts = self.parse_block_stmts(&[]);
        self.pop_scope();
        self.expect(Token::RBrace);
        Spanned::new(Block { stmts }, self.span_from(start))
    }

    /// Statements up to the closing `}` or one of `stops`.
    pub(super) fn parse_block_stmts(&mut self, stops: &[Token]) -> Vec<Spanned<Stmt>> {
        let mut stmts: Vec<Spanned<Stmt>> = Vec::new();
        loop {
            let tok = self.peek();
            if matches!(tok, Token::RBrace | Token::Eof) || stops.contains(&tok) || self.should_unwind() {
                break;
            }
            if let Some(kw) = self.keyword_after(stmts.last().map(|s| &s.node)) {
                stmts.push(kw);
                continue;
            }
            let before = self.pos;
            self.parse_block_stmt_into(&mut stmts);
            if self.pos == before {
                self.advance();
            }
        }
        stmts
    }

    /// One block statement. A declaration with several declarators adds one
    /// statement per declarator.
    fn parse_block_stmt_into(&mut self, out: &mut Vec<Spanned<Stmt>>) {
        let before = self.pos;
        let start = self.peek_span().start;

        let with_modifiers = match self.peek() {
            Token::Final | Token::Abstract | Token::Strictfp => true,
            Token::At => self.nth(1) != Token::Interface,
            _ => false,
        };

        if with_modifiers || self.is_local_decl_ahead() {
            let modifiers = self.parse_modifiers();
            if self.at_type_decl_start() {
                let decl = self.parse_type_decl(modifiers, start);
                out.push(Spanned::new(Stmt::LocalClass(Box::new(decl.node)), decl.span));
            } else {
                for decl in self.parse_local_decls(modifiers, start) {
                    out.push(Spanned::new(Stmt::Local(decl.node), decl.span));
                }
                if !self.recovering {
                    self.expect(Token::Semi);
                }
            }
        } else if let Some(stmt) = self.parse_statement() {
            out.push(stmt);
        }

        if self.recovering {
            self.recover_statement(before);
        }
    }

    /// The body of a compound statement. Missing bodies come back empty.
    fn parse_sub_statement(&mut self) -> Box<Spanned<Stmt>> {
        let at = self.prev_end();
        if matches!(self.peek(), Token::RBrace | Token::Eof) || self.should_unwind() {
            return empty_at(at);
        }
        let mut out = Vec::new();
        self.parse_block_stmt_into(&mut out);
        match out.into_iter().next() {
            Some(stmt) => Box::new(stmt),
            None => empty_at(at),
        }
    }

    /// Whether a local variable declaration starts here.
    fn is_local_decl_ahead(&self) -> bool {
        let tok = self.peek();
        if tok.is_primitive() {
            // `int[].class` is an expression.
            let mut j = self.pos + 1;
            while self.tok(j) == Token::LBracket && self.tok(j + 1) == Token::RBracket {
                j += 2;
            }
            return self.tok(j) != Token::Dot;
        }
        if tok != Token::Ident {
            return false;
        }
        match self.scan_type(self.pos) {
            TypeScan::Closed(j) => {
                let next = self.tok(j);
                let generic = (self.pos..j).any(|i| self.tok(i) == Token::Lt);
                (next == Token::Ident && self.tok(j + 1) != Token::LParen)
                    || (generic && matches!(next, Token::Semi | Token::RBrace | Token::Eof))
            }
            TypeScan::Unclosed(j) => matches!(
                self.tok(j),
                Token::Semi | Token::RBrace | Token::Eof | Token::Ident | Token::Comma | Token::LBracket
            ),
            TypeScan::NotType => false,
        }
    }

    /// `Type a = 1, b[] = {2}`, without the terminator.
    pub(super) fn parse_local_decls(&mut self, modifiers: ModifierList, start: usize) -> Vec<Spanned<LocalDecl>> {
        let ty = self.parse_type(TypeCtx::Type);
        if self.recovering {
            let name = if self.at(Token::Ident) { NameSlot::Named(self.ident()) } else { NameSlot::Missing };
            let decl = LocalDecl { modifiers, ty, name, dims: 0, init: None };
            return vec![Spanned::new(decl, self.span_from(start))];
        }

        let mut decls = Vec::new();
        loop {
            let name = self.parse_declarator_name(CompletionKind::LocalName);
            let (dims, init) = if self.recovering {
                (0, None)
            } else {
                let dims = self.parse_dims();
                let init = if self.eat(Token::Eq) { Some(self.parse_var_init()) } else { None };
                (dims, init)
            };
            let decl = LocalDecl { modifiers: modifiers.clone(), ty: ty.clone(), name, dims, init };
            decls.push(Spanned::new(decl, self.span_from(start)));
            if self.recovering || !self.eat(Token::Comma) {
                break;
            }
        }
        decls
    }

    /// A declared name, or a completion on it when it is being typed.
    pub(super) fn parse_declarator_name(&mut self, kind: CompletionKind) -> NameSlot {
        if self.at_cursor_token() {
            let start = self.peek_span().start;
            return NameSlot::Completing(self.complete_token(kind, start));
        }
        if self.at(Token::Ident) {
            NameSlot::Named(self.ident())
        } else {
            NameSlot::Missing
        }
    }

    /// `else`, `catch` or `finally` being typed after the statement it belongs to.
    fn keyword_after(&mut self, prev: Option<&Stmt>) -> Option<Spanned<Stmt>> {
        if !self.at_cursor_token() || continues_expression(self.nth(1)) {
            return None;
        }
        let pool: &[&'static str] = match prev {
            Some(stmt) if has_dangling_if(stmt) => &["else"],
            Some(Stmt::Try { finally: None, .. }) => &["catch", "finally"],
            _ => return None,
        };
        let span = self.peek_span();
        let candidates = keyword_candidates(&self.typed_prefix(span), pool);
        if candidates.is_empty() {
            return None;
        }
        let node = self.complete_token(CompletionKind::Keyword { candidates }, span.start);
        self.recovering = false;
        Some(Spanned::new(Stmt::Keyword(node), span))
    }

    // ── Statements ───────────────────────────────────────────────────

    fn parse_statement(&mut self) -> Option<Spanned<Stmt>> {
        let start = self.peek_span().start;
        let stmt = match self.peek() {
            Token::LBrace => Stmt::Block(self.parse_block().node),
            Token::Semi => {
                self.advance();
                Stmt::Empty
            }
            Token::If => self.parse_if(),
            Token::While => self.parse_while(),
            Token::Do => self.parse_do(),
            Token::For => self.parse_for(),
            Token::Switch => self.parse_switch(),
            Token::Return => self.parse_return(),
            Token::Break | Token::Continue => self.parse_jump(),
            Token::Throw => self.parse_throw(),
            Token::Try => self.parse_try(),
            Token::Synchronized => self.parse_synchronized(),
            Token::Assert => self.parse_assert(),
            Token::Class | Token::Interface | Token::Enum => {
                let decl = self.parse_type_decl(ModifierList::default(), start);
                Stmt::LocalClass(Box::new(decl.node))
            }
            Token::This | Token::Super if self.nth(1) == Token::LParen => self.parse_ctor_call(),
            Token::Ident if self.nth(1) == Token::Colon => self.parse_labeled(),
            tok if can_start_expr(tok) => {
                let expr = self.parse_expr();
                if !self.recovering {
                    self.expect(Token::Semi);
                }
                Stmt::Expr(expr)
            }
            _ => return None,
        };
        Some(Spanned::new(stmt, self.span_from(start)))
    }

    /// `( expr )` of a compound statement. A completion inside skips to the `)`.
    fn parse_paren_cond(&mut self) -> Spanned<Expr> {
        self.expect(Token::LParen);
        let from = self.pos;
        let cond = self.parse_optional_expr();
        self.close_header(from, false);
        cond
    }

    fn parse_optional_expr(&mut self) -> Spanned<Expr> {
        if can_start_expr(self.peek()) || self.at_gap() {
            self.parse_expr()
        } else {
            Spanned::new(Expr::Name(Vec::new()), Span::point(self.prev_end()))
        }
    }

    fn close_header(&mut self, from: usize, allow_semi: bool) {
        if self.recovering {
            self.skip_to_close_paren(from, allow_semi);
        } else {
            self.expect(Token::RParen);
        }
    }

    fn parse_if(&mut self) -> Stmt {
        self.advance();
        let cond = self.parse_paren_cond();
        let then_branch = self.parse_sub_statement();
        let else_branch = if self.eat(Token::Else) { Some(self.parse_sub_statement()) } else { None };
        Stmt::If { cond, then_branch, else_branch }
    }

    fn parse_while(&mut self) -> Stmt {
        self.advance();
        let cond = self.parse_paren_cond();
        let body = self.parse_sub_statement();
        Stmt::While { cond, body }
    }

    fn parse_do(&mut self) -> Stmt {
        self.advance();
        let body = self.parse_sub_statement();
        let cond = if self.eat(Token::While) {
            let cond = self.parse_paren_cond();
            self.expect(Token::Semi);
            Some(cond)
        } else {
            None
        };
        Stmt::DoWhile { body, cond }
    }

    fn parse_for(&mut self) -> Stmt {
        self.advance();
        self.expect(Token::LParen);
        let from = self.pos;
        let mut init = Vec::new();

        let local_start = self.peek_span().start;
        if matches!(self.peek(), Token::Final | Token::At) || self.is_local_decl_ahead() {
            let modifiers = self.parse_modifiers();
            let mut decls = self.parse_local_decls(modifiers, local_start);
            if !self.recovering && decls.len() == 1 && self.eat(Token::Colon) {
                let var = decls.remove(0);
                let iterable = self.parse_optional_expr();
                self.close_header(from, false);
                let body = self.parse_sub_statement();
                return Stmt::ForEach { var, iterable, body };
            }
            init = decls
                .into_iter()
                .map(|d| Spanned::new(Stmt::Local(d.node), d.span))
                .collect();
        } else {
            while can_start_expr(self.peek()) || self.at_gap() {
                let expr = self.parse_expr();
                let span = expr.span;
                init.push(Spanned::new(Stmt::Expr(expr), span));
                if self.recovering || !self.eat(Token::Comma) {
                    break;
                }
            }
        }

        let mut cond = None;
        let mut update = Vec::new();
        if !self.recovering {
            self.expect(Token::Semi);
            if can_start_expr(self.peek()) || self.at_gap() {
                cond = Some(self.parse_expr());
            }
        }
        if !self.recovering {
            self.expect(Token::Semi);
            while can_start_expr(self.peek()) || self.at_gap() {
                update.push(self.parse_expr());
                if self.recovering || !self.eat(Token::Comma) {
                    break;
                }
            }
        }
        self.close_header(from, true);
        let body = self.parse_sub_statement();
        Stmt::For { init, cond, update, body }
    }

    fn parse_switch(&mut self) -> Stmt {
        self.advance();
        let selector = self.parse_paren_cond();
        let mut cases = Vec::new();
        if !self.eat(Token::LBrace) {
            return Stmt::Switch { selector, cases };
        }

        self.push_scope(ScopeKind::Block);
        loop {
            let start = self.peek_span().start;
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => break,
                Token::Case | Token::Default => {
                    let is_case = self.advance().node == Token::Case;
                    let label = if is_case {
                        let label = self.parse_optional_expr();
                        if self.recovering {
                            self.skip_until(&[Token::Colon, Token::Case, Token::Default]);
                        }
                        Some(label)
                    } else {
                        None
                    };
                    self.expect(Token::Colon);
                    let stmts = self.parse_block_stmts(&[Token::Case, Token::Default]);
                    cases.push(Spanned::new(SwitchCase { label, stmts }, self.span_from(start)));
                }
                _ if self.should_unwind() => break,
                _ => {
                    // Statements before the first label.
                    self.advance();
                }
            }
        }
        self.pop_scope();
        Stmt::Switch { selector, cases }
    }

    fn parse_return(&mut self) -> Stmt {
        self.advance();
        let value = if can_start_expr(self.peek()) || self.at_gap() { Some(self.parse_expr()) } else { None };
        if !self.recovering {
            self.expect(Token::Semi);
        }
        Stmt::Return(value)
    }

    fn parse_jump(&mut self) -> Stmt {
        let is_break = self.advance().node == Token::Break;
        let label = if self.at_cursor_token() {
            let start = self.peek_span().start;
            Some(NameSlot::Completing(self.complete_token(CompletionKind::Label, start)))
        } else if self.at_gap() && matches!(self.peek(), Token::Semi | Token::RBrace | Token::Eof) {
            Some(NameSlot::Completing(self.complete_gap(CompletionKind::Label, self.cursor.caret)))
        } else if self.at(Token::Ident) {
            Some(NameSlot::Named(self.ident()))
        } else {
            None
        };
        if !self.recovering {
            self.expect(Token::Semi);
        }
        if is_break { Stmt::Break(label) } else { Stmt::Continue(label) }
    }

    fn parse_throw(&mut self) -> Stmt {
        self.advance();
        self.new_type_ctx = Some(TypeCtx::Exception);
        let value = self.parse_optional_expr();
        self.new_type_ctx = None;
        if !self.recovering {
            self.expect(Token::Semi);
        }
        Stmt::Throw(value)
    }

    fn parse_try(&mut self) -> Stmt {
        self.advance();

        let mut resources = Vec::new();
        if self.eat(Token::LParen) {
            let from = self.pos;
            loop {
                let tok = self.peek();
                if !(matches!(tok, Token::Final | Token::At) || can_start_type(tok) || self.at_gap()) {
                    break;
                }
                let start = self.peek_span().start;
                let modifiers = self.parse_modifiers();
                resources.extend(self.parse_local_decls(modifiers, start).into_iter().take(1));
                if self.recovering || !self.eat(Token::Semi) {
                    break;
                }
            }
            self.close_header(from, true);
        }

        let body = self.parse_block();

        let mut catches = Vec::new();
        while self.at(Token::Catch) {
            let start = self.advance().span.start;
            self.expect(Token::LParen);
            let from = self.pos;
            let modifiers = self.parse_modifiers();
            let mut types = vec![self.parse_type(TypeCtx::Exception)];
            while !self.recovering && self.eat(Token::Pipe) {
                types.push(self.parse_type(TypeCtx::Exception));
            }
            let name = if self.recovering {
                if self.at(Token::Ident) { NameSlot::Named(self.ident()) } else { NameSlot::Missing }
            } else {
                self.parse_declarator_name(CompletionKind::LocalName)
            };
            self.close_header(from, false);
            let body = self.parse_block();
            catches.push(Spanned::new(CatchClause { modifiers, types, name, body }, self.span_from(start)));
        }

        let finally = if self.eat(Token::Finally) { Some(self.parse_block()) } else { None };
        Stmt::Try { resources, body, catches, finally }
    }

    fn parse_synchronized(&mut self) -> Stmt {
        self.advance();
        let lock = self.parse_paren_cond();
        let body = self.parse_block();
        Stmt::Synchronized { lock, body }
    }

    fn parse_assert(&mut self) -> Stmt {
        self.advance();
        let cond = self.parse_optional_expr();
        let message = if !self.recovering && self.eat(Token::Colon) { Some(self.parse_optional_expr()) } else { None };
        if !self.recovering {
            self.expect(Token::Semi);
        }
        Stmt::Assert { cond, message }
    }

    /// `this(..);` or `super(..);` at the start of a constructor body.
    fn parse_ctor_call(&mut self) -> Stmt {
        let start = self.peek_span().start;
        let (kind, selector) = if self.advance().node == Token::This {
            (CtorCallKind::This, "this")
        } else {
            (CtorCallKind::Super, "super")
        };
        let parsed = self.parse_arguments(start, |args| CompletionKind::MessageSend {
            receiver: None,
            type_args: None,
            selector: selector.to_string(),
            args: args.to_vec(),
        });
        let args = match parsed {
            Ok(args) => args,
            Err(node) => {
                let span = node.span;
                return Stmt::Expr(Spanned::new(Expr::Completion(node), span));
            }
        };
        if !self.recovering {
            self.expect(Token::Semi);
        }
        Stmt::CtorCall { kind, qualifier: None, args, implicit: false }
    }

    fn parse_labeled(&mut self) -> Stmt {
        let label = self.ident();
        self.advance();
        let body = self.parse_sub_statement();
        Stmt::Labeled { label, body }
    }
}
