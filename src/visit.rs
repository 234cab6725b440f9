//! Read-only traversal of the recovered tree.
//!
//! Implement `Visitor` for a pass, overriding only the methods you need, and
//! call the matching `walk_*` function inside an override to keep recursing.
//! Omitting the walk call prunes traversal at that node.
//!
//! `find_parent` is built on it: it locates the construct directly enclosing
//! the completion node.

use serde::Serialize;

use crate::parser::ast::*;
use crate::parser::completion::CompletionNode;
use crate::pretty;
use crate::span::{Span, Spanned};

pub trait Visitor<'ast>: Sized {
    fn visit_unit(&mut self, unit: &'ast CompilationUnit) {
        walk_unit(self, unit);
    }

    fn visit_type_decl(&mut self, decl: &'ast TypeDecl, span: Span) {
        walk_type_decl(self, decl, span);
    }

    fn visit_type_body(&mut self, decl: &'ast TypeDecl) {
        walk_type_body(self, decl);
    }

    fn visit_enum_constant(&mut self, constant: &'ast Spanned<EnumConstant>) {
        walk_enum_constant(self, constant);
    }

    fn visit_field(&mut self, field: &'ast Spanned<FieldDecl>) {
        walk_field(self, field);
    }

    fn visit_method(&mut self, method: &'ast Spanned<MethodDecl>) {
        walk_method(self, method);
    }

    fn visit_param(&mut self, param: &'ast Spanned<Param>) {
        walk_param(self, param);
    }

    fn visit_annotation(&mut self, annotation: &'ast Annotation, span: Span) {
        walk_annotation(self, annotation, span);
    }

    /// Statements of a method body, block, or catch/finally clause.
    fn visit_body(&mut self, stmts: &'ast [Spanned<Stmt>]) {
        walk_body(self, stmts);
    }

    fn visit_stmt(&mut self, stmt: &'ast Spanned<Stmt>) {
        walk_stmt(self, stmt);
    }

    /// A local declared outside a declaration statement: a for-each
    /// variable or a try resource.
    fn visit_local(&mut self, local: &'ast Spanned<LocalDecl>) {
        walk_local_decl(self, &local.node);
    }

    fn visit_expr(&mut self, expr: &'ast Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, ty: &'ast Spanned<TypeRef>) {
        walk_type(self, ty);
    }

    fn visit_completion(&mut self, _node: &'ast CompletionNode) {}
}

// ── Walk functions ───────────────────────────────────────────────────

pub fn walk_unit<'ast, V: Visitor<'ast>>(v: &mut V, unit: &'ast CompilationUnit) {
    if let Some(pkg) = &unit.package {
        for annotation in &pkg.node.annotations {
            v.visit_annotation(&annotation.node, annotation.span);
        }
        walk_reference(v, &pkg.node.name);
    }
    for import in &unit.imports {
        walk_reference(v, &import.node.name);
    }
    for decl in &unit.types {
        v.visit_type_decl(&decl.node, decl.span);
    }
}

fn walk_reference<'ast, V: Visitor<'ast>>(v: &mut V, reference: &'ast Reference) {
    if let Reference::Completion(node) = reference {
        v.visit_completion(node);
    }
}

fn walk_name_slot<'ast, V: Visitor<'ast>>(v: &mut V, name: &'ast NameSlot) {
    if let NameSlot::Completing(node) = name {
        v.visit_completion(node);
    }
}

fn walk_modifiers<'ast, V: Visitor<'ast>>(v: &mut V, modifiers: &'ast ModifierList) {
    for annotation in &modifiers.annotations {
        v.visit_annotation(&annotation.node, annotation.span);
    }
}

fn walk_type_params<'ast, V: Visitor<'ast>>(v: &mut V, params: &'ast [Spanned<TypeParam>]) {
    for param in params {
        for bound in &param.node.bounds {
            v.visit_type(bound);
        }
    }
}

pub fn walk_type_decl<'ast, V: Visitor<'ast>>(v: &mut V, decl: &'ast TypeDecl, _span: Span) {
    walk_modifiers(v, &decl.modifiers);
    walk_type_params(v, &decl.type_params);
    if let Some(superclass) = &decl.superclass {
        v.visit_type(superclass);
    }
    for interface in &decl.interfaces {
        v.visit_type(interface);
    }
    if let Some(node) = &decl.header_keyword {
        v.visit_completion(node);
    }
    v.visit_type_body(decl);
}

pub fn walk_type_body<'ast, V: Visitor<'ast>>(v: &mut V, decl: &'ast TypeDecl) {
    for member in &decl.member_types {
        v.visit_type_decl(&member.node, member.span);
    }
    for constant in &decl.constants {
        v.visit_enum_constant(constant);
    }
    for field in &decl.fields {
        v.visit_field(field);
    }
    for method in &decl.methods {
        v.visit_method(method);
    }
}

pub fn walk_enum_constant<'ast, V: Visitor<'ast>>(v: &mut V, constant: &'ast Spanned<EnumConstant>) {
    for annotation in &constant.node.annotations {
        v.visit_annotation(&annotation.node, annotation.span);
    }
    for arg in constant.node.args.iter().flatten() {
        v.visit_expr(arg);
    }
    if let Some(body) = &constant.node.body {
        v.visit_type_body(&body.node);
    }
}

pub fn walk_field<'ast, V: Visitor<'ast>>(v: &mut V, field: &'ast Spanned<FieldDecl>) {
    match &field.node {
        FieldDecl::Var { modifiers, ty, name, init, .. } => {
            walk_modifiers(v, modifiers);
            v.visit_type(ty);
            walk_name_slot(v, name);
            if let Some(init) = init {
                v.visit_expr(init);
            }
        }
        FieldDecl::Initializer { body, .. } => v.visit_body(&body.node.stmts),
    }
}

pub fn walk_method<'ast, V: Visitor<'ast>>(v: &mut V, method: &'ast Spanned<MethodDecl>) {
    let method = &method.node;
    walk_modifiers(v, &method.modifiers);
    walk_type_params(v, &method.type_params);
    if let Some(ret) = &method.return_type {
        v.visit_type(ret);
    }
    walk_name_slot(v, &method.name);
    for param in &method.params {
        v.visit_param(param);
    }
    for ty in &method.throws {
        v.visit_type(ty);
    }
    if let Some(value) = &method.default_value {
        walk_element_value(v, value);
    }
    if let Some(body) = &method.body {
        v.visit_body(&body.node.stmts);
    }
}

pub fn walk_param<'ast, V: Visitor<'ast>>(v: &mut V, param: &'ast Spanned<Param>) {
    walk_modifiers(v, &param.node.modifiers);
    v.visit_type(&param.node.ty);
    walk_name_slot(v, &param.node.name);
}

pub fn walk_annotation<'ast, V: Visitor<'ast>>(v: &mut V, annotation: &'ast Annotation, _span: Span) {
    v.visit_type(&annotation.name);
    match &annotation.args {
        AnnotationArgs::Marker => {}
        AnnotationArgs::Single(value) => walk_element_value(v, value),
        AnnotationArgs::Pairs(pairs) => {
            for (_, value) in pairs {
                walk_element_value(v, value);
            }
        }
    }
}

fn walk_element_value<'ast, V: Visitor<'ast>>(v: &mut V, value: &'ast Spanned<ElementValue>) {
    match &value.node {
        ElementValue::Expr(expr) => walk_expr_node(v, expr),
        ElementValue::Annotation(annotation) => v.visit_annotation(annotation, value.span),
        ElementValue::Array(items) => {
            for item in items {
                walk_element_value(v, item);
            }
        }
    }
}

pub fn walk_body<'ast, V: Visitor<'ast>>(v: &mut V, stmts: &'ast [Spanned<Stmt>]) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_local_decl<'ast, V: Visitor<'ast>>(v: &mut V, local: &'ast LocalDecl) {
    walk_modifiers(v, &local.modifiers);
    v.visit_type(&local.ty);
    walk_name_slot(v, &local.name);
    if let Some(init) = &local.init {
        v.visit_expr(init);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast>>(v: &mut V, stmt: &'ast Spanned<Stmt>) {
    match &stmt.node {
        Stmt::Block(block) => v.visit_body(&block.stmts),
        Stmt::Local(local) => walk_local_decl(v, local),
        Stmt::LocalClass(decl) => v.visit_type_decl(decl, stmt.span),
        Stmt::Expr(expr) | Stmt::Throw(expr) => v.visit_expr(expr),
        Stmt::If { cond, then_branch, else_branch } => {
            v.visit_expr(cond);
            v.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                v.visit_stmt(else_branch);
            }
        }
        Stmt::While { cond, body } => {
            v.visit_expr(cond);
            v.visit_stmt(body);
        }
        Stmt::DoWhile { body, cond } => {
            v.visit_stmt(body);
            if let Some(cond) = cond {
                v.visit_expr(cond);
            }
        }
        Stmt::For { init, cond, update, body } => {
            for s in init {
                v.visit_stmt(s);
            }
            if let Some(cond) = cond {
                v.visit_expr(cond);
            }
            for e in update {
                v.visit_expr(e);
            }
            v.visit_stmt(body);
        }
        Stmt::ForEach { var, iterable, body } => {
            v.visit_local(var);
            v.visit_expr(iterable);
            v.visit_stmt(body);
        }
        Stmt::Switch { selector, cases } => {
            v.visit_expr(selector);
            for case in cases {
                if let Some(label) = &case.node.label {
                    v.visit_expr(label);
                }
                v.visit_body(&case.node.stmts);
            }
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        Stmt::Break(label) | Stmt::Continue(label) => {
            if let Some(label) = label {
                walk_name_slot(v, label);
            }
        }
        Stmt::Try { resources, body, catches, finally } => {
            for resource in resources {
                v.visit_local(resource);
            }
            v.visit_body(&body.node.stmts);
            for catch in catches {
                walk_modifiers(v, &catch.node.modifiers);
                for ty in &catch.node.types {
                    v.visit_type(ty);
                }
                walk_name_slot(v, &catch.node.name);
                v.visit_body(&catch.node.body.node.stmts);
            }
            if let Some(finally) = finally {
                v.visit_body(&finally.node.stmts);
            }
        }
        Stmt::Synchronized { lock, body } => {
            v.visit_expr(lock);
            v.visit_body(&body.node.stmts);
        }
        Stmt::Labeled { body, .. } => v.visit_stmt(body),
        Stmt::Assert { cond, message } => {
            v.visit_expr(cond);
            if let Some(message) = message {
                v.visit_expr(message);
            }
        }
        Stmt::CtorCall { qualifier, args, .. } => {
            if let Some(qualifier) = qualifier {
                v.visit_expr(qualifier);
            }
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Stmt::Keyword(node) => v.visit_completion(node),
        Stmt::Empty => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast>>(v: &mut V, expr: &'ast Spanned<Expr>) {
    walk_expr_node(v, &expr.node);
}

fn walk_expr_node<'ast, V: Visitor<'ast>>(v: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Literal(_) | Expr::Name(_) | Expr::This | Expr::Super => {}
        Expr::FieldAccess { receiver, .. } => v.visit_expr(receiver),
        Expr::Call { receiver, type_args, args, .. } => {
            if let Some(receiver) = receiver {
                v.visit_expr(receiver);
            }
            for ty in type_args.iter().flatten() {
                v.visit_type(ty);
            }
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::New { qualifier, ty, args, body } => {
            if let Some(qualifier) = qualifier {
                v.visit_expr(qualifier);
            }
            v.visit_type(ty);
            for arg in args {
                v.visit_expr(arg);
            }
            if let Some(body) = body {
                v.visit_type_body(&body.node);
            }
        }
        Expr::NewArray { elem, dims, init, .. } => {
            v.visit_type(elem);
            for dim in dims {
                v.visit_expr(dim);
            }
            if let Some(init) = init {
                v.visit_expr(init);
            }
        }
        Expr::ArrayInit(elems) => {
            for elem in elems {
                v.visit_expr(elem);
            }
        }
        Expr::Index { array, index } => {
            v.visit_expr(array);
            v.visit_expr(index);
        }
        Expr::Unary { operand, .. } | Expr::Postfix { operand, .. } => v.visit_expr(operand),
        Expr::Binary { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Expr::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Expr::Conditional { cond, then_expr, else_expr } => {
            v.visit_expr(cond);
            v.visit_expr(then_expr);
            v.visit_expr(else_expr);
        }
        Expr::InstanceOf { expr, ty } => {
            v.visit_expr(expr);
            v.visit_type(ty);
        }
        Expr::Cast { ty, expr } => {
            v.visit_type(ty);
            v.visit_expr(expr);
        }
        Expr::Paren(inner) => v.visit_expr(inner),
        Expr::ClassLiteral(ty) => v.visit_type(ty),
        Expr::Completion(node) => v.visit_completion(node),
    }
}

pub fn walk_type<'ast, V: Visitor<'ast>>(v: &mut V, ty: &'ast Spanned<TypeRef>) {
    match &ty.node {
        TypeRef::Named(segments) => {
            for segment in segments {
                for arg in segment.args.iter().flatten() {
                    v.visit_type(arg);
                }
            }
        }
        TypeRef::Array { elem, .. } => v.visit_type(elem),
        TypeRef::Wildcard(bound) => match bound {
            Some(WildcardBound::Extends(b)) | Some(WildcardBound::Super(b)) => v.visit_type(b),
            Some(WildcardBound::Keyword(node)) => v.visit_completion(node),
            None => {}
        },
        TypeRef::Completion(node) => v.visit_completion(node),
    }
}

// ── Completion parent ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    Expression,
    Type,
    Statement,
    LocalDeclaration,
    Field,
    Parameter,
    Method,
    TypeDeclaration,
    EnumConstant,
    Annotation,
}

/// The construct holding the completion node as a direct child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentRef {
    pub kind: ParentKind,
    pub span: Span,
    /// The parent rendered on its own; declarations render up to their body.
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
enum Candidate<'ast> {
    Expr(&'ast Spanned<Expr>),
    Type(&'ast Spanned<TypeRef>),
    Stmt(&'ast Spanned<Stmt>),
    Local(&'ast Spanned<LocalDecl>),
    Field(&'ast Spanned<FieldDecl>),
    Param(&'ast Spanned<Param>),
    Method(&'ast Spanned<MethodDecl>),
    TypeDecl(&'ast TypeDecl, Span),
    EnumConstant(&'ast Spanned<EnumConstant>),
    Annotation(&'ast Annotation, Span),
}

impl Candidate<'_> {
    fn into_parent(self) -> ParentRef {
        let (kind, span, text) = match self {
            Candidate::Expr(e) => (ParentKind::Expression, e.span, pretty::expr_to_string(e)),
            Candidate::Type(t) => (ParentKind::Type, t.span, pretty::type_to_string(t)),
            Candidate::Stmt(s) => (ParentKind::Statement, s.span, pretty::stmt_to_string(s, 0)),
            Candidate::Local(l) => (ParentKind::LocalDeclaration, l.span, pretty::local_to_string(&l.node)),
            Candidate::Field(f) => (ParentKind::Field, f.span, pretty::field_to_string(&f.node)),
            Candidate::Param(p) => (ParentKind::Parameter, p.span, pretty::param_to_string(&p.node)),
            Candidate::Method(m) => (ParentKind::Method, m.span, pretty::method_header_to_string(&m.node)),
            Candidate::TypeDecl(d, span) => (ParentKind::TypeDeclaration, span, pretty::type_header_to_string(d)),
            Candidate::EnumConstant(c) => {
                (ParentKind::EnumConstant, c.span, pretty::enum_constant_to_string(&c.node))
            }
            Candidate::Annotation(a, span) => (ParentKind::Annotation, span, pretty::annotation_to_string(a)),
        };
        ParentRef { kind, span, text }
    }
}

/// Tracks the innermost candidate parent while walking. `None` entries are
/// barriers: statement lists and bare expression statements, which never
/// count as a parent.
struct ParentFinder<'ast, 't> {
    target: &'t CompletionNode,
    stack: Vec<Option<Candidate<'ast>>>,
    found: Option<Option<Candidate<'ast>>>,
}

impl<'ast> ParentFinder<'ast, '_> {
    fn within(&mut self, candidate: Option<Candidate<'ast>>, walk: impl FnOnce(&mut Self)) {
        if self.found.is_some() {
            return;
        }
        self.stack.push(candidate);
        walk(self);
        self.stack.pop();
    }
}

impl<'ast> Visitor<'ast> for ParentFinder<'ast, '_> {
    fn visit_type_decl(&mut self, decl: &'ast TypeDecl, span: Span) {
        self.within(Some(Candidate::TypeDecl(decl, span)), |f| walk_type_decl(f, decl, span));
    }

    fn visit_type_body(&mut self, decl: &'ast TypeDecl) {
        self.within(None, |f| walk_type_body(f, decl));
    }

    fn visit_enum_constant(&mut self, constant: &'ast Spanned<EnumConstant>) {
        self.within(Some(Candidate::EnumConstant(constant)), |f| walk_enum_constant(f, constant));
    }

    fn visit_field(&mut self, field: &'ast Spanned<FieldDecl>) {
        let candidate = match field.node {
            FieldDecl::Var { .. } => Some(Candidate::Field(field)),
            FieldDecl::Initializer { .. } => None,
        };
        self.within(candidate, |f| walk_field(f, field));
    }

    fn visit_method(&mut self, method: &'ast Spanned<MethodDecl>) {
        self.within(Some(Candidate::Method(method)), |f| walk_method(f, method));
    }

    fn visit_param(&mut self, param: &'ast Spanned<Param>) {
        self.within(Some(Candidate::Param(param)), |f| walk_param(f, param));
    }

    fn visit_annotation(&mut self, annotation: &'ast Annotation, span: Span) {
        self.within(Some(Candidate::Annotation(annotation, span)), |f| walk_annotation(f, annotation, span));
    }

    fn visit_body(&mut self, stmts: &'ast [Spanned<Stmt>]) {
        self.within(None, |f| walk_body(f, stmts));
    }

    fn visit_stmt(&mut self, stmt: &'ast Spanned<Stmt>) {
        let candidate = match stmt.node {
            Stmt::Block(_) | Stmt::Expr(_) => None,
            Stmt::Keyword(_) => return walk_stmt(self, stmt),
            _ => Some(Candidate::Stmt(stmt)),
        };
        self.within(candidate, |f| walk_stmt(f, stmt));
    }

    fn visit_local(&mut self, local: &'ast Spanned<LocalDecl>) {
        self.within(Some(Candidate::Local(local)), |f| walk_local_decl(f, &local.node));
    }

    fn visit_expr(&mut self, expr: &'ast Spanned<Expr>) {
        if matches!(expr.node, Expr::Completion(_)) {
            return walk_expr(self, expr);
        }
        self.within(Some(Candidate::Expr(expr)), |f| walk_expr(f, expr));
    }

    fn visit_type(&mut self, ty: &'ast Spanned<TypeRef>) {
        if ty.node.is_completion() {
            return walk_type(self, ty);
        }
        self.within(Some(Candidate::Type(ty)), |f| walk_type(f, ty));
    }

    fn visit_completion(&mut self, node: &'ast CompletionNode) {
        if self.found.is_none() && node == self.target {
            self.found = Some(self.stack.last().copied().flatten());
        }
    }
}

/// The construct directly enclosing `node` in `unit`, if the node is in the
/// tree and has a parent other than a statement list.
pub fn find_parent(unit: &CompilationUnit, node: &CompletionNode) -> Option<ParentRef> {
    let mut finder = ParentFinder { target: node, stack: Vec::new(), found: None };
    finder.visit_unit(unit);
    let parent = finder.found.flatten().map(Candidate::into_parent);
    tracing::trace!(parent = ?parent.as_ref().map(|p| p.kind), "completion parent");
    parent
}
