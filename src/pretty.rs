use crate::parser::ast::*;
use crate::span::Spanned;

/// Render a recovered compilation unit. Completion nodes print as
/// `<Tag:text>` where they sit in the tree.
pub fn render(unit: &CompilationUnit) -> String {
    let mut p = Printer::new();
    p.emit_unit(unit);
    p.buf
}

pub fn expr_to_string(expr: &Spanned<Expr>) -> String {
    let mut p = Printer::new();
    p.emit_expr(&expr.node);
    p.buf
}

pub fn type_to_string(ty: &Spanned<TypeRef>) -> String {
    let mut p = Printer::new();
    p.emit_type(&ty.node);
    p.buf
}

/// A statement as it appears at nesting level `indent`, without the
/// leading indentation of its first line.
pub fn stmt_to_string(stmt: &Spanned<Stmt>, indent: usize) -> String {
    let mut p = Printer::new();
    p.indent = indent;
    p.emit_stmt(&stmt.node);
    p.buf
}

pub fn local_to_string(local: &LocalDecl) -> String {
    let mut p = Printer::new();
    p.emit_local(local);
    p.buf
}

pub fn param_to_string(param: &Param) -> String {
    let mut p = Printer::new();
    p.emit_param(param);
    p.buf
}

pub fn field_to_string(field: &FieldDecl) -> String {
    let mut p = Printer::new();
    p.emit_field(field);
    p.buf
}

pub fn enum_constant_to_string(constant: &EnumConstant) -> String {
    let mut p = Printer::new();
    p.emit_enum_constant(constant);
    p.buf
}

pub fn annotation_to_string(annotation: &Annotation) -> String {
    let mut p = Printer::new();
    p.emit_annotation(annotation);
    p.buf
}

/// A method up to its body.
pub fn method_header_to_string(method: &MethodDecl) -> String {
    let mut p = Printer::new();
    p.emit_method_header(method);
    p.buf
}

/// A type declaration up to its body.
pub fn type_header_to_string(decl: &TypeDecl) -> String {
    let mut p = Printer::new();
    p.emit_type_header(decl);
    p.buf
}

struct Printer {
    buf: String,
    indent: usize,
}

impl Printer {
    fn new() -> Self {
        Self { buf: String::new(), indent: 0 }
    }

    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn newline(&mut self) {
        self.buf.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buf.push_str("  ");
        }
    }

    fn indent(&mut self) {
        self.indent += 1;
    }

    fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    fn write_dims(&mut self, dims: usize) {
        for _ in 0..dims {
            self.write("[]");
        }
    }

    fn write_list<T>(&mut self, items: &[T], sep: &str, mut emit: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(sep);
            }
            emit(self, item);
        }
    }

    // ── Compilation unit ─────────────────────────────────────────────

    fn emit_unit(&mut self, unit: &CompilationUnit) {
        if let Some(pkg) = &unit.package {
            for annotation in &pkg.node.annotations {
                self.emit_annotation(&annotation.node);
                self.write(" ");
            }
            self.write("package ");
            self.emit_reference(&pkg.node.name);
            self.write(";");
            self.newline();
        }
        for import in &unit.imports {
            let import = &import.node;
            self.write("import ");
            if import.is_static {
                self.write("static ");
            }
            self.emit_reference(&import.name);
            if import.on_demand {
                self.write(".*");
            }
            self.write(";");
            self.newline();
        }
        for decl in &unit.types {
            self.emit_type_decl(&decl.node);
            self.newline();
        }
    }

    fn emit_reference(&mut self, reference: &Reference) {
        match reference {
            Reference::Path(segments) => self.write(&Reference::dotted(segments)),
            Reference::Completion(node) => self.write(&node.to_string()),
        }
    }

    fn emit_name_slot(&mut self, name: &NameSlot) {
        match name {
            NameSlot::Named(n) => self.write(&n.node),
            NameSlot::Completing(node) => self.write(&node.to_string()),
            NameSlot::Missing => {}
        }
    }

    // ── Modifiers and annotations ────────────────────────────────────

    fn emit_modifiers(&mut self, modifiers: &ModifierList) {
        for annotation in &modifiers.annotations {
            self.emit_annotation(&annotation.node);
            self.write(" ");
        }
        for kw in modifiers.flags.keywords() {
            self.write(kw);
            self.write(" ");
        }
    }

    fn emit_annotation(&mut self, annotation: &Annotation) {
        self.write("@");
        self.emit_type(&annotation.name.node);
        match &annotation.args {
            AnnotationArgs::Marker => {}
            AnnotationArgs::Single(value) => {
                self.write("(");
                self.emit_element_value(&value.node);
                self.write(")");
            }
            AnnotationArgs::Pairs(pairs) => {
                self.write("(");
                self.write_list(pairs, ", ", |p, (key, value)| {
                    p.write(&key.node);
                    p.write(" = ");
                    p.emit_element_value(&value.node);
                });
                self.write(")");
            }
        }
    }

    fn emit_element_value(&mut self, value: &ElementValue) {
        match value {
            ElementValue::Expr(expr) => self.emit_expr(expr),
            ElementValue::Annotation(annotation) => self.emit_annotation(annotation),
            ElementValue::Array(items) => {
                self.write("{");
                self.write_list(items, ", ", |p, v| p.emit_element_value(&v.node));
                self.write("}");
            }
        }
    }

    // ── Declarations ─────────────────────────────────────────────────

    fn emit_type_params(&mut self, params: &[Spanned<TypeParam>]) {
        if params.is_empty() {
            return;
        }
        self.write("<");
        self.write_list(params, ", ", |p, param| {
            p.write(&param.node.name.node);
            if !param.node.bounds.is_empty() {
                p.write(" extends ");
                p.write_list(&param.node.bounds, " & ", |p, b| p.emit_type(&b.node));
            }
        });
        self.write(">");
    }

    fn emit_type_header(&mut self, decl: &TypeDecl) {
        self.emit_modifiers(&decl.modifiers);
        self.write(match decl.kind {
            TypeKind::Class | TypeKind::Anonymous => "class ",
            TypeKind::Interface => "interface ",
            TypeKind::Enum => "enum ",
            TypeKind::Annotation => "@interface ",
        });
        self.write(&decl.name.node);
        self.emit_type_params(&decl.type_params);
        if let Some(superclass) = &decl.superclass {
            self.write(" extends ");
            self.emit_type(&superclass.node);
        }
        if !decl.interfaces.is_empty() {
            self.write(if decl.kind == TypeKind::Interface { " extends " } else { " implements " });
            self.write_list(&decl.interfaces, ", ", |p, i| p.emit_type(&i.node));
        }
        if let Some(node) = &decl.header_keyword {
            self.write(" ");
            self.write(&node.to_string());
        }
    }

    fn emit_type_decl(&mut self, decl: &TypeDecl) {
        self.emit_type_header(decl);
        self.write(" ");
        self.emit_type_body(decl);
    }

    /// `{`, the members one per line, then `}` at the current level.
    fn emit_type_body(&mut self, decl: &TypeDecl) {
        self.write("{");
        self.newline();
        self.indent();
        for member in &decl.member_types {
            self.write_indent();
            self.emit_type_decl(&member.node);
            self.newline();
        }
        let last = decl.constants.len();
        for (i, constant) in decl.constants.iter().enumerate() {
            self.write_indent();
            self.emit_enum_constant(&constant.node);
            self.write(if i + 1 == last { ";" } else { "," });
            self.newline();
        }
        for field in &decl.fields {
            self.write_indent();
            self.emit_field(&field.node);
            self.newline();
        }
        for method in &decl.methods {
            self.write_indent();
            self.emit_method(&method.node);
            self.newline();
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn emit_enum_constant(&mut self, constant: &EnumConstant) {
        for annotation in &constant.annotations {
            self.emit_annotation(&annotation.node);
            self.write(" ");
        }
        self.write(&constant.name.node);
        if let Some(args) = &constant.args {
            self.emit_args(args);
        }
        if let Some(body) = &constant.body {
            self.write(" ");
            self.emit_type_body(&body.node);
        }
    }

    fn emit_field(&mut self, field: &FieldDecl) {
        match field {
            FieldDecl::Var { modifiers, ty, name, dims, init } => {
                self.emit_modifiers(modifiers);
                self.emit_type(&ty.node);
                if !matches!(name, NameSlot::Missing) {
                    self.write(" ");
                    self.emit_name_slot(name);
                }
                self.write_dims(*dims);
                if let Some(init) = init {
                    self.write(" = ");
                    self.emit_expr(&init.node);
                }
                self.write(";");
            }
            FieldDecl::Initializer { is_static, body } => {
                if *is_static {
                    self.write("static ");
                }
                self.emit_stmt_block(&body.node.stmts);
            }
        }
    }

    fn emit_method_header(&mut self, method: &MethodDecl) {
        self.emit_modifiers(&method.modifiers);
        if !method.type_params.is_empty() {
            self.emit_type_params(&method.type_params);
            self.write(" ");
        }
        if let Some(ret) = &method.return_type {
            self.emit_type(&ret.node);
            self.write(" ");
        }
        self.emit_name_slot(&method.name);
        self.write("(");
        self.write_list(&method.params, ", ", |p, param| p.emit_param(&param.node));
        self.write(")");
        self.write_dims(method.dims);
        if !method.throws.is_empty() {
            self.write(" throws ");
            self.write_list(&method.throws, ", ", |p, t| p.emit_type(&t.node));
        }
        if let Some(value) = &method.default_value {
            self.write(" default ");
            self.emit_element_value(&value.node);
        }
    }

    fn emit_method(&mut self, method: &MethodDecl) {
        self.emit_method_header(method);
        match &method.body {
            Some(body) => {
                self.write(" ");
                self.emit_stmt_block(&body.node.stmts);
            }
            None => self.write(";"),
        }
    }

    fn emit_param(&mut self, param: &Param) {
        self.emit_modifiers(&param.modifiers);
        self.emit_type(&param.ty.node);
        if param.varargs {
            self.write("...");
        }
        if !matches!(param.name, NameSlot::Missing) {
            self.write(" ");
            self.emit_name_slot(&param.name);
        }
        self.write_dims(param.dims);
    }

    // ── Statements ───────────────────────────────────────────────────

    /// `{`, statements one per line one level deeper, `}`.
    fn emit_stmt_block(&mut self, stmts: &[Spanned<Stmt>]) {
        self.write("{");
        self.newline();
        self.indent();
        for stmt in stmts {
            self.write_indent();
            self.emit_stmt(&stmt.node);
            self.newline();
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn emit_local(&mut self, local: &LocalDecl) {
        self.emit_modifiers(&local.modifiers);
        self.emit_type(&local.ty.node);
        if !matches!(local.name, NameSlot::Missing) {
            self.write(" ");
            self.emit_name_slot(&local.name);
        }
        self.write_dims(local.dims);
        if let Some(init) = &local.init {
            self.write(" = ");
            self.emit_expr(&init.node);
        }
    }

    /// The init part of a classic `for` header.
    fn emit_for_init(&mut self, init: &[Spanned<Stmt>]) {
        for (i, stmt) in init.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            match &stmt.node {
                Stmt::Local(local) if i > 0 => {
                    self.emit_name_slot(&local.name);
                    self.write_dims(local.dims);
                    if let Some(value) = &local.init {
                        self.write(" = ");
                        self.emit_expr(&value.node);
                    }
                }
                Stmt::Local(local) => self.emit_local(local),
                Stmt::Expr(expr) => self.emit_expr(&expr.node),
                other => self.emit_stmt(other),
            }
        }
    }

    fn emit_label(&mut self, keyword: &str, label: &Option<NameSlot>) {
        self.write(keyword);
        if let Some(label) = label {
            if !matches!(label, NameSlot::Missing) {
                self.write(" ");
                self.emit_name_slot(label);
            }
        }
        self.write(";");
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.emit_stmt_block(&block.stmts),
            Stmt::Local(local) => {
                self.emit_local(local);
                self.write(";");
            }
            Stmt::LocalClass(decl) => self.emit_type_decl(decl),
            Stmt::Expr(expr) => {
                self.emit_expr(&expr.node);
                self.write(";");
            }
            Stmt::If { cond, then_branch, else_branch } => {
                self.write("if (");
                self.emit_expr(&cond.node);
                self.write(") ");
                self.emit_stmt(&then_branch.node);
                if let Some(else_branch) = else_branch {
                    self.write(" else ");
                    self.emit_stmt(&else_branch.node);
                }
            }
            Stmt::While { cond, body } => {
                self.write("while (");
                self.emit_expr(&cond.node);
                self.write(") ");
                self.emit_stmt(&body.node);
            }
            Stmt::DoWhile { body, cond } => {
                self.write("do ");
                self.emit_stmt(&body.node);
                self.write(" while (");
                if let Some(cond) = cond {
                    self.emit_expr(&cond.node);
                }
                self.write(");");
            }
            Stmt::For { init, cond, update, body } => {
                self.write("for (");
                self.emit_for_init(init);
                self.write("; ");
                if let Some(cond) = cond {
                    self.emit_expr(&cond.node);
                }
                self.write("; ");
                self.write_list(update, ", ", |p, e| p.emit_expr(&e.node));
                self.write(") ");
                self.emit_stmt(&body.node);
            }
            Stmt::ForEach { var, iterable, body } => {
                self.write("for (");
                self.emit_local(&var.node);
                self.write(" : ");
                self.emit_expr(&iterable.node);
                self.write(") ");
                self.emit_stmt(&body.node);
            }
            Stmt::Switch { selector, cases } => {
                self.write("switch (");
                self.emit_expr(&selector.node);
                self.write(") {");
                self.newline();
                self.indent();
                for case in cases {
                    self.write_indent();
                    match &case.node.label {
                        Some(label) => {
                            self.write("case ");
                            self.emit_expr(&label.node);
                            self.write(":");
                        }
                        None => self.write("default:"),
                    }
                    self.newline();
                    self.indent();
                    for stmt in &case.node.stmts {
                        self.write_indent();
                        self.emit_stmt(&stmt.node);
                        self.newline();
                    }
                    self.dedent();
                }
                self.dedent();
                self.write_indent();
                self.write("}");
            }
            Stmt::Return(value) => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.emit_expr(&value.node);
                }
                self.write(";");
            }
            Stmt::Break(label) => self.emit_label("break", label),
            Stmt::Continue(label) => self.emit_label("continue", label),
            Stmt::Throw(value) => {
                self.write("throw ");
                self.emit_expr(&value.node);
                self.write(";");
            }
            Stmt::Try { resources, body, catches, finally } => {
                self.write("try ");
                if !resources.is_empty() {
                    self.write("(");
                    self.write_list(resources, "; ", |p, r| p.emit_local(&r.node));
                    self.write(") ");
                }
                self.emit_stmt_block(&body.node.stmts);
                for catch in catches {
                    let catch = &catch.node;
                    self.write(" catch (");
                    self.emit_modifiers(&catch.modifiers);
                    self.write_list(&catch.types, " | ", |p, t| p.emit_type(&t.node));
                    if !matches!(catch.name, NameSlot::Missing) {
                        self.write(" ");
                        self.emit_name_slot(&catch.name);
                    }
                    self.write(") ");
                    self.emit_stmt_block(&catch.body.node.stmts);
                }
                if let Some(finally) = finally {
                    self.write(" finally ");
                    self.emit_stmt_block(&finally.node.stmts);
                }
            }
            Stmt::Synchronized { lock, body } => {
                self.write("synchronized (");
                self.emit_expr(&lock.node);
                self.write(") ");
                self.emit_stmt_block(&body.node.stmts);
            }
            Stmt::Labeled { label, body } => {
                self.write(&label.node);
                self.write(": ");
                self.emit_stmt(&body.node);
            }
            Stmt::Assert { cond, message } => {
                self.write("assert ");
                self.emit_expr(&cond.node);
                if let Some(message) = message {
                    self.write(" : ");
                    self.emit_expr(&message.node);
                }
                self.write(";");
            }
            Stmt::CtorCall { kind, qualifier, args, .. } => {
                if let Some(qualifier) = qualifier {
                    self.emit_expr(&qualifier.node);
                    self.write(".");
                }
                self.write(match kind {
                    CtorCallKind::This => "this",
                    CtorCallKind::Super => "super",
                });
                self.emit_args(args);
                self.write(";");
            }
            Stmt::Keyword(node) => {
                self.write(&node.to_string());
                self.write(";");
            }
            Stmt::Empty => self.write(";"),
        }
    }

    // ── Expressions ──────────────────────────────────────────────────

    fn emit_args(&mut self, args: &[Spanned<Expr>]) {
        self.write("(");
        self.write_list(args, ", ", |p, a| p.emit_expr(&a.node));
        self.write(")");
    }

    fn emit_type_args(&mut self, args: &[Spanned<TypeRef>]) {
        self.write("<");
        self.write_list(args, ", ", |p, a| p.emit_type(&a.node));
        self.write(">");
    }

    fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(text) => self.write(text),
            Expr::Name(segments) => self.write(&Reference::dotted(segments)),
            Expr::This => self.write("this"),
            Expr::Super => self.write("super"),
            Expr::FieldAccess { receiver, name } => {
                self.emit_expr(&receiver.node);
                self.write(".");
                self.write(&name.node);
            }
            Expr::Call { receiver, type_args, name, args } => {
                if let Some(receiver) = receiver {
                    self.emit_expr(&receiver.node);
                    self.write(".");
                }
                if let Some(type_args) = type_args {
                    self.emit_type_args(type_args);
                }
                self.write(&name.node);
                self.emit_args(args);
            }
            Expr::New { qualifier, ty, args, body } => {
                if let Some(qualifier) = qualifier {
                    self.emit_expr(&qualifier.node);
                    self.write(".");
                }
                self.write("new ");
                self.emit_type(&ty.node);
                self.emit_args(args);
                if let Some(body) = body {
                    self.write(" ");
                    self.emit_type_body(&body.node);
                }
            }
            Expr::NewArray { elem, dims, extra_dims, init } => {
                self.write("new ");
                self.emit_type(&elem.node);
                for dim in dims {
                    self.write("[");
                    self.emit_expr(&dim.node);
                    self.write("]");
                }
                self.write_dims(*extra_dims);
                if let Some(init) = init {
                    self.write(" ");
                    self.emit_expr(&init.node);
                }
            }
            Expr::ArrayInit(elems) => {
                self.write("{");
                self.write_list(elems, ", ", |p, e| p.emit_expr(&e.node));
                self.write("}");
            }
            Expr::Index { array, index } => {
                self.emit_expr(&array.node);
                self.write("[");
                self.emit_expr(&index.node);
                self.write("]");
            }
            Expr::Unary { op, operand } => {
                self.write(&op.to_string());
                self.emit_expr(&operand.node);
            }
            Expr::Postfix { op, operand } => {
                self.emit_expr(&operand.node);
                self.write(&op.to_string());
            }
            Expr::Binary { op, lhs, rhs } => {
                self.emit_expr(&lhs.node);
                self.write(&format!(" {op} "));
                self.emit_expr(&rhs.node);
            }
            Expr::Assign { op, target, value } => {
                self.emit_expr(&target.node);
                self.write(&format!(" {op} "));
                self.emit_expr(&value.node);
            }
            Expr::Conditional { cond, then_expr, else_expr } => {
                self.emit_expr(&cond.node);
                self.write(" ? ");
                self.emit_expr(&then_expr.node);
                self.write(" : ");
                self.emit_expr(&else_expr.node);
            }
            Expr::InstanceOf { expr, ty } => {
                self.emit_expr(&expr.node);
                self.write(" instanceof ");
                self.emit_type(&ty.node);
            }
            Expr::Cast { ty, expr } => {
                self.write("(");
                self.emit_type(&ty.node);
                self.write(") ");
                self.emit_expr(&expr.node);
            }
            Expr::Paren(inner) => {
                self.write("(");
                self.emit_expr(&inner.node);
                self.write(")");
            }
            Expr::ClassLiteral(ty) => {
                self.emit_type(&ty.node);
                self.write(".class");
            }
            Expr::Completion(node) => self.write(&node.to_string()),
        }
    }

    // ── Types ────────────────────────────────────────────────────────

    fn emit_type(&mut self, ty: &TypeRef) {
        match ty {
            TypeRef::Named(segments) => {
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 {
                        self.write(".");
                    }
                    self.write(&segment.name.node);
                    if let Some(args) = &segment.args {
                        self.emit_type_args(args);
                    }
                }
            }
            TypeRef::Array { elem, dims } => {
                self.emit_type(&elem.node);
                self.write_dims(*dims);
            }
            TypeRef::Wildcard(bound) => {
                self.write("?");
                match bound {
                    Some(WildcardBound::Extends(b)) => {
                        self.write(" extends ");
                        self.emit_type(&b.node);
                    }
                    Some(WildcardBound::Super(b)) => {
                        self.write(" super ");
                        self.emit_type(&b.node);
                    }
                    Some(WildcardBound::Keyword(node)) => {
                        self.write(" ");
                        self.write(&node.to_string());
                    }
                    None => {}
                }
            }
            TypeRef::Completion(node) => self.write(&node.to_string()),
        }
    }
}
