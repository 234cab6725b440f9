use super::ast::*;
use super::completion::{CompletionKind, TypeCtx, keyword_candidates};
use super::{Parser, ScopeKind, can_start_expr, can_start_type};
use crate::lexer::Token;
use crate::span::{Span, Spanned};

/// `super();` standing in for the constructor call the source leaves out.
pub(super) fn implicit_super(at: usize) -> Spanned<Stmt> {
    Spanned::new(
        Stmt::CtorCall { kind: CtorCallKind::Super, qualifier: None, args: Vec::new(), implicit: true },
        Span::point(at),
    )
}

fn is_void(ty: &TypeRef) -> bool {
    matches!(ty, TypeRef::Named(segs) if segs.len() == 1 && segs[0].name.node == "void" && segs[0].args.is_none())
}

impl<'a> Parser<'a> {
    // ── Modifiers and annotations ────────────────────────────────────

    pub(super) fn parse_modifiers(&mut self) -> ModifierList {
        let mut list = ModifierList::default();
        loop {
            let flag = match self.peek() {
                Token::Public => Modifiers::PUBLIC,
                Token::Protected => Modifiers::PROTECTED,
                Token::Private => Modifiers::PRIVATE,
                Token::Abstract => Modifiers::ABSTRACT,
                Token::Final => Modifiers::FINAL,
                Token::Transient => Modifiers::TRANSIENT,
                Token::Volatile => Modifiers::VOLATILE,
                Token::Native => Modifiers::NATIVE,
                Token::Strictfp => Modifiers::STRICTFP,
                Token::Static if self.nth(1) != Token::LBrace => Modifiers::STATIC,
                Token::Synchronized if self.nth(1) != Token::LParen => Modifiers::SYNCHRONIZED,
                Token::At if self.nth(1) != Token::Interface => {
                    let annotation = self.parse_annotation();
                    list.annotations.push(annotation);
                    continue;
                }
                _ => break,
            };
            self.advance();
            list.flags |= flag;
        }
        list
    }

    /// `@Name`, `@Name(value)` or `@Name(k = v, ..)`. Never leaves the
    /// parser recovering: a completion inside is skipped past here.
    fn parse_annotation(&mut self) -> Spanned<Annotation> {
        let start = self.advance().span.start;
        let name = self.parse_class_type(TypeCtx::Type);
        if self.recovering {
            self.recovering = false;
            return Spanned::new(Annotation { name, args: AnnotationArgs::Marker }, self.span_from(start));
        }

        let args = if self.eat(Token::LParen) {
            let from = self.pos;
            let args = if self.at(Token::RParen) {
                AnnotationArgs::Pairs(Vec::new())
            } else if self.at(Token::Ident) && self.nth(1) == Token::Eq && !self.at_cursor_token() {
                let mut pairs = Vec::new();
                while self.at(Token::Ident) && self.nth(1) == Token::Eq {
                    let key = self.ident();
                    self.advance();
                    let value = self.parse_element_value();
                    pairs.push((key, value));
                    if self.recovering || !self.eat(Token::Comma) {
                        break;
                    }
                }
                AnnotationArgs::Pairs(pairs)
            } else {
                AnnotationArgs::Single(self.parse_element_value())
            };
            if self.recovering {
                self.skip_to_close_paren(from, false);
            } else {
                self.expect(Token::RParen);
            }
            args
        } else {
            AnnotationArgs::Marker
        };
        Spanned::new(Annotation { name, args }, self.span_from(start))
    }

    /// The string literal under the cursor, inside an annotation value.
    fn at_cursor_string(&self) -> bool {
        let span = self.peek_span();
        self.at(Token::StringLit) && self.can_complete() && span.start < self.cursor.caret && self.cursor.caret <= span.end
    }

    fn parse_element_value(&mut self) -> Spanned<ElementValue> {
        let start = self.peek_span().start;
        match self.peek() {
            Token::At => {
                let annotation = self.parse_annotation();
                Spanned::new(ElementValue::Annotation(Box::new(annotation.node)), annotation.span)
            }
            Token::LBrace => {
                self.advance();
                let mut items = Vec::new();
                loop {
                    if self.eat(Token::RBrace) {
                        break;
                    }
                    let tok = self.peek();
                    if !(can_start_expr(tok) || matches!(tok, Token::At | Token::LBrace) || self.at_gap()) {
                        break;
                    }
                    items.push(self.parse_element_value());
                    if self.recovering {
                        break;
                    }
                    if self.eat(Token::Comma) {
                        continue;
                    }
                    self.expect(Token::RBrace);
                    break;
                }
                Spanned::new(ElementValue::Array(items), self.span_from(start))
            }
            Token::StringLit if self.at_cursor_string() => {
                let tok = self.advance();
                let token = self.typed_prefix(tok.span);
                let node = self.complete(CompletionKind::String, token, tok.span);
                Spanned::new(ElementValue::Expr(Expr::Completion(node)), tok.span)
            }
            _ => {
                let expr = self.parse_conditional();
                Spanned::new(ElementValue::Expr(expr.node), expr.span)
            }
        }
    }

    // ── Type declarations ────────────────────────────────────────────

    /// Positioned at `class`, `interface`, `enum` or `@interface`.
    pub(super) fn parse_type_decl(&mut self, modifiers: ModifierList, start: usize) -> Spanned<TypeDecl> {
        let kind = match self.advance().node {
            Token::Interface => TypeKind::Interface,
            Token::Enum => TypeKind::Enum,
            Token::At => {
                self.advance();
                TypeKind::Annotation
            }
            _ => TypeKind::Class,
        };
        let name = if self.at(Token::Ident) {
            self.ident()
        } else {
            Spanned::new(String::new(), Span::point(self.prev_end()))
        };

        let mut decl = TypeDecl::new(kind, name);
        decl.modifiers = modifiers;
        if self.at(Token::Lt) {
            decl.type_params = self.parse_type_params();
        }
        if !self.recovering {
            self.parse_type_header(&mut decl);
        }
        if self.recovering || !matches!(self.peek(), Token::LBrace | Token::RBrace | Token::Eof) {
            self.skip_to_body();
        }
        self.parse_type_body(&mut decl);
        self.add_default_constructor(&mut decl);

        tracing::trace!(name = %decl.name.node, kind = ?decl.kind, "type declaration");
        Spanned::new(decl, self.span_from(start))
    }

    fn parse_type_header(&mut self, decl: &mut TypeDecl) {
        loop {
            match self.peek() {
                Token::Extends => {
                    self.advance();
                    if decl.kind == TypeKind::Interface {
                        self.parse_type_list(&mut decl.interfaces, TypeCtx::Interface);
                    } else {
                        decl.superclass = Some(self.parse_type(TypeCtx::Class));
                    }
                }
                Token::Implements => {
                    self.advance();
                    self.parse_type_list(&mut decl.interfaces, TypeCtx::Interface);
                }
                Token::Ident if self.at_cursor_token() => {
                    let pool: &[&'static str] = match decl.kind {
                        TypeKind::Class if decl.superclass.is_none() && decl.interfaces.is_empty() => {
                            &["extends", "implements"]
                        }
                        TypeKind::Class | TypeKind::Enum if decl.interfaces.is_empty() => &["implements"],
                        TypeKind::Interface if decl.interfaces.is_empty() => &["extends"],
                        _ => &[],
                    };
                    let span = self.peek_span();
                    let candidates = keyword_candidates(&self.typed_prefix(span), pool);
                    let node = self.complete_token(CompletionKind::Keyword { candidates }, span.start);
                    self.recovering = false;
                    decl.header_keyword = Some(node);
                }
                _ => break,
            }
            if self.recovering {
                break;
            }
        }
    }

    fn parse_type_list(&mut self, out: &mut Vec<Spanned<TypeRef>>, ctx: TypeCtx) {
        loop {
            out.push(self.parse_type(ctx));
            if self.recovering || !self.eat(Token::Comma) {
                break;
            }
        }
    }

    /// `{ members }`. A missing body leaves the declaration empty.
    fn parse_type_body(&mut self, decl: &mut TypeDecl) {
        if !self.eat(Token::LBrace) {
            return;
        }
        self.push_scope(ScopeKind::TypeBody);
        if decl.kind == TypeKind::Enum {
            self.parse_enum_constants(decl);
        }
        loop {
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => break,
                Token::Semi => {
                    self.advance();
                    continue;
                }
                _ => {}
            }
            let before = self.pos;
            self.parse_member(decl);
            if self.recovering {
                self.recover_member(before);
            }
            if self.pos == before {
                self.advance();
            }
        }
        self.pop_scope();
    }

    /// Body of an anonymous class or an enum constant, positioned at `{`.
    pub(super) fn parse_anonymous_body(&mut self, name: Spanned<String>) -> Spanned<TypeDecl> {
        let start = self.peek_span().start;
        let mut decl = TypeDecl::new(TypeKind::Anonymous, name);
        self.parse_type_body(&mut decl);
        Spanned::new(decl, self.span_from(start))
    }

    fn parse_enum_constants(&mut self, decl: &mut TypeDecl) {
        loop {
            match self.peek() {
                Token::Semi => {
                    self.advance();
                    break;
                }
                Token::RBrace | Token::Eof => break,
                _ => {}
            }
            let start = self.peek_span().start;
            let annotations = if self.at(Token::At) { self.parse_modifiers().annotations } else { Vec::new() };
            if !self.at(Token::Ident) {
                break;
            }
            let name = self.ident();

            let args = if self.at(Token::LParen) {
                let from = self.pos + 1;
                let selector = name.node.clone();
                let parsed = self.parse_arguments(start, |args| CompletionKind::MessageSend {
                    receiver: None,
                    type_args: None,
                    selector,
                    args: args.to_vec(),
                });
                let args = match parsed {
                    Ok(args) => args,
                    Err(node) => {
                        let span = node.span;
                        vec![Spanned::new(Expr::Completion(node), span)]
                    }
                };
                if self.recovering {
                    self.skip_to_close_paren(from, false);
                }
                Some(args)
            } else {
                None
            };
            let body = if !self.recovering && self.at(Token::LBrace) {
                Some(Box::new(self.parse_anonymous_body(name.clone())))
            } else {
                None
            };
            decl.constants.push(Spanned::new(EnumConstant { annotations, name, args, body }, self.span_from(start)));

            if self.recovering {
                self.skip_until(&[Token::Comma, Token::Semi, Token::RBrace]);
            }
            if self.eat(Token::Comma) {
                continue;
            }
            self.eat(Token::Semi);
            break;
        }
    }

    // ── Members ──────────────────────────────────────────────────────

    fn parse_member(&mut self, decl: &mut TypeDecl) {
        let start = self.peek_span().start;

        if self.at(Token::LBrace) || (self.at(Token::Static) && self.nth(1) == Token::LBrace) {
            let is_static = self.eat(Token::Static);
            if let Some(body) = self.parse_method_body(false) {
                decl.fields.push(Spanned::new(FieldDecl::Initializer { is_static, body }, self.span_from(start)));
            }
            return;
        }

        let modifiers = self.parse_modifiers();
        if self.at_type_decl_start() {
            let member = self.parse_type_decl(modifiers, start);
            decl.member_types.push(member);
            return;
        }

        let type_params = if self.at(Token::Lt) {
            self.parse_type_params()
        } else {
            Vec::new()
        };

        if self.at(Token::Ident) && self.nth(1) == Token::LParen {
            let name = self.parse_method_name();
            self.parse_method_rest(decl, modifiers, type_params, None, name, start);
            return;
        }

        if !can_start_type(self.peek()) {
            return;
        }
        let ty = self.parse_type(TypeCtx::Type);
        if self.recovering {
            // A name after a half-typed type still belongs to the member.
            let name = if self.at(Token::Ident) { NameSlot::Named(self.ident()) } else { NameSlot::Missing };
            let field = FieldDecl::Var { modifiers, ty, name, dims: 0, init: None };
            decl.fields.push(Spanned::new(field, self.span_from(start)));
            return;
        }

        if self.at_cursor_token() && (self.nth(1) == Token::LParen || is_void(&ty.node)) {
            let name = self.parse_method_name();
            self.parse_method_rest(decl, modifiers, type_params, Some(ty), name, start);
            return;
        }

        let name = self.parse_declarator_name(CompletionKind::FieldName);
        if !self.recovering && self.at(Token::LParen) {
            self.parse_method_rest(decl, modifiers, type_params, Some(ty), name, start);
            return;
        }
        self.parse_field_declarators(decl, modifiers, ty, name, start);
    }

    /// A method name; a half-typed one completes without disturbing the
    /// rest of the declaration.
    fn parse_method_name(&mut self) -> NameSlot {
        if self.at_cursor_token() {
            let start = self.peek_span().start;
            let node = self.complete_token(CompletionKind::MethodName, start);
            self.recovering = false;
            return NameSlot::Completing(node);
        }
        NameSlot::Named(self.ident())
    }

    fn parse_method_rest(
        &mut self,
        decl: &mut TypeDecl,
        modifiers: ModifierList,
        type_params: Vec<Spanned<TypeParam>>,
        return_type: Option<Spanned<TypeRef>>,
        name: NameSlot,
        start: usize,
    ) {
        let kind = match (&return_type, decl.kind) {
            (None, _) => MethodKind::Constructor,
            (Some(_), TypeKind::Annotation) => MethodKind::AnnotationMember,
            (Some(_), _) => MethodKind::Method,
        };

        let params = self.parse_params();
        let mut dims = 0;
        let mut throws = Vec::new();
        let mut default_value = None;
        if !self.recovering {
            dims = self.parse_dims();
            if self.eat(Token::Throws) {
                self.parse_type_list(&mut throws, TypeCtx::Exception);
            }
        }
        if !self.recovering && self.eat(Token::Default) {
            default_value = Some(self.parse_element_value());
        }
        if self.recovering || !matches!(self.peek(), Token::LBrace | Token::Semi | Token::RBrace | Token::Eof) {
            self.skip_to_body();
        }

        let is_class_ctor = kind == MethodKind::Constructor && decl.kind == TypeKind::Class;
        let body = if self.at(Token::LBrace) {
            self.parse_method_body(is_class_ctor)
        } else {
            self.eat(Token::Semi);
            None
        };

        let method = MethodDecl {
            modifiers,
            type_params,
            kind,
            return_type,
            name,
            params,
            dims,
            throws,
            body,
            default_value,
            is_default_ctor: false,
        };
        decl.methods.push(Spanned::new(method, self.span_from(start)));
    }

    fn parse_params(&mut self) -> Vec<Spanned<Param>> {
        let mut params = Vec::new();
        if !self.eat(Token::LParen) {
            return params;
        }
        loop {
            if self.eat(Token::RParen) {
                break;
            }
            let tok = self.peek();
            if !(matches!(tok, Token::Final | Token::At) || can_start_type(tok) || self.at_gap()) {
                break;
            }
            let start = self.peek_span().start;
            let modifiers = self.parse_modifiers();
            let ty = self.parse_type(TypeCtx::Type);
            let varargs = !self.recovering && self.eat(Token::Ellipsis);
            let name = if self.recovering {
                if self.at(Token::Ident) { NameSlot::Named(self.ident()) } else { NameSlot::Missing }
            } else {
                self.parse_declarator_name(CompletionKind::ArgumentName)
            };
            let dims = if self.recovering { 0 } else { self.parse_dims() };
            params.push(Spanned::new(Param { modifiers, ty, varargs, name, dims }, self.span_from(start)));
            if self.recovering {
                break;
            }
            if !self.eat(Token::Comma) {
                self.expect(Token::RParen);
                break;
            }
        }
        params
    }

    fn parse_field_declarators(
        &mut self,
        decl: &mut TypeDecl,
        modifiers: ModifierList,
        ty: Spanned<TypeRef>,
        first: NameSlot,
        start: usize,
    ) {
        let mut name = first;
        loop {
            let (dims, init) = if self.recovering {
                (0, None)
            } else {
                let dims = self.parse_dims();
                let init = if self.eat(Token::Eq) { Some(self.parse_var_init()) } else { None };
                (dims, init)
            };
            let field = FieldDecl::Var { modifiers: modifiers.clone(), ty: ty.clone(), name, dims, init };
            decl.fields.push(Spanned::new(field, self.span_from(start)));
            if self.recovering || !self.eat(Token::Comma) {
                break;
            }
            name = self.parse_declarator_name(CompletionKind::FieldName);
        }
        if !self.recovering {
            self.expect(Token::Semi);
        }
    }

    /// Classes and enums without a constructor get the implicit one, first
    /// among the methods.
    fn add_default_constructor(&self, decl: &mut TypeDecl) {
        if !matches!(decl.kind, TypeKind::Class | TypeKind::Enum) || decl.has_constructor() {
            return;
        }
        let flags = match decl.kind {
            TypeKind::Enum => Modifiers::empty(),
            _ => decl.modifiers.flags & Modifiers::ACCESS,
        };
        let span = decl.name.span;
        let stmts = if self.parsing_full() { vec![implicit_super(span.end)] } else { Vec::new() };
        let ctor = MethodDecl {
            modifiers: ModifierList { flags, annotations: Vec::new() },
            type_params: Vec::new(),
            kind: MethodKind::Constructor,
            return_type: None,
            name: NameSlot::Named(decl.name.clone()),
            params: Vec::new(),
            dims: 0,
            throws: Vec::new(),
            body: Some(Spanned::new(MethodBody { stmts, skipped: false }, span)),
            default_value: None,
            is_default_ctor: true,
        };
        decl.methods.insert(0, Spanned::new(ctor, span));
    }
}
