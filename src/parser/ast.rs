use bitflags::bitflags;

use super::completion::CompletionNode;
use crate::span::Spanned;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    pub package: Option<Spanned<PackageDecl>>,
    pub imports: Vec<Spanned<ImportDecl>>,
    pub types: Vec<Spanned<TypeDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageDecl {
    pub annotations: Vec<Spanned<Annotation>>,
    pub name: Reference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub name: Reference,
    pub is_static: bool,
    pub on_demand: bool,
}

/// A dotted name, or the completion node standing in for one.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    Path(Vec<Spanned<String>>),
    Completion(CompletionNode),
}

impl Reference {
    pub fn dotted(segments: &[Spanned<String>]) -> String {
        segments.iter().map(|s| s.node.as_str()).collect::<Vec<_>>().join(".")
    }
}

/// A declared name that may be the thing being completed, or absent after recovery.
#[derive(Debug, Clone, PartialEq)]
pub enum NameSlot {
    Named(Spanned<String>),
    Completing(CompletionNode),
    Missing,
}

impl NameSlot {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NameSlot::Named(n) => Some(&n.node),
            _ => None,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC       = 1 << 0;
        const PROTECTED    = 1 << 1;
        const PRIVATE      = 1 << 2;
        const ABSTRACT     = 1 << 3;
        const STATIC       = 1 << 4;
        const FINAL        = 1 << 5;
        const TRANSIENT    = 1 << 6;
        const VOLATILE     = 1 << 7;
        const SYNCHRONIZED = 1 << 8;
        const NATIVE       = 1 << 9;
        const STRICTFP     = 1 << 10;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Modifiers::empty()
    }
}

impl Modifiers {
    pub const ACCESS: Modifiers = Modifiers::PUBLIC.union(Modifiers::PROTECTED).union(Modifiers::PRIVATE);

    /// Keywords in canonical order.
    pub fn keywords(self) -> Vec<&'static str> {
        const ORDER: [(Modifiers, &str); 11] = [
            (Modifiers::PUBLIC, "public"),
            (Modifiers::PROTECTED, "protected"),
            (Modifiers::PRIVATE, "private"),
            (Modifiers::ABSTRACT, "abstract"),
            (Modifiers::STATIC, "static"),
            (Modifiers::FINAL, "final"),
            (Modifiers::TRANSIENT, "transient"),
            (Modifiers::VOLATILE, "volatile"),
            (Modifiers::SYNCHRONIZED, "synchronized"),
            (Modifiers::NATIVE, "native"),
            (Modifiers::STRICTFP, "strictfp"),
        ];
        ORDER.iter().filter(|(m, _)| self.contains(*m)).map(|(_, kw)| *kw).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModifierList {
    pub flags: Modifiers,
    pub annotations: Vec<Spanned<Annotation>>,
}

impl ModifierList {
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.annotations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: Spanned<TypeRef>,
    pub args: AnnotationArgs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationArgs {
    Marker,
    Single(Spanned<ElementValue>),
    Pairs(Vec<(Spanned<String>, Spanned<ElementValue>)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Expr(Expr),
    Annotation(Box<Annotation>),
    Array(Vec<Spanned<ElementValue>>),
}

// ── Types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// `a.b.C<T>`; primitives and `void` are single-segment names.
    Named(Vec<TypeSegment>),
    Array { elem: Box<Spanned<TypeRef>>, dims: usize },
    Wildcard(Option<WildcardBound>),
    Completion(CompletionNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSegment {
    pub name: Spanned<String>,
    /// `None` without angle brackets, `Some(vec![])` for a diamond.
    pub args: Option<Vec<Spanned<TypeRef>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WildcardBound {
    Extends(Box<Spanned<TypeRef>>),
    Super(Box<Spanned<TypeRef>>),
    Keyword(CompletionNode),
}

impl TypeRef {
    pub fn simple(name: Spanned<String>) -> TypeRef {
        TypeRef::Named(vec![TypeSegment { name, args: None }])
    }

    pub fn has_type_args(&self) -> bool {
        match self {
            TypeRef::Named(segs) => segs.iter().any(|s| s.args.as_ref().is_some_and(|a| !a.is_empty())),
            TypeRef::Array { elem, .. } => elem.node.has_type_args(),
            _ => false,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, TypeRef::Completion(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: Spanned<String>,
    pub bounds: Vec<Spanned<TypeRef>>,
}

// ── Declarations ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Anonymous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub modifiers: ModifierList,
    pub kind: TypeKind,
    pub name: Spanned<String>,
    pub type_params: Vec<Spanned<TypeParam>>,
    pub superclass: Option<Spanned<TypeRef>>,
    pub interfaces: Vec<Spanned<TypeRef>>,
    /// A half-typed `extends`/`implements` in the header.
    pub header_keyword: Option<CompletionNode>,
    pub member_types: Vec<Spanned<TypeDecl>>,
    pub constants: Vec<Spanned<EnumConstant>>,
    pub fields: Vec<Spanned<FieldDecl>>,
    pub methods: Vec<Spanned<MethodDecl>>,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, name: Spanned<String>) -> Self {
        Self {
            modifiers: ModifierList::default(),
            kind,
            name,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            header_keyword: None,
            member_types: Vec::new(),
            constants: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn has_constructor(&self) -> bool {
        self.methods.iter().any(|m| m.node.kind == MethodKind::Constructor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub annotations: Vec<Spanned<Annotation>>,
    pub name: Spanned<String>,
    pub args: Option<Vec<Spanned<Expr>>>,
    pub body: Option<Box<Spanned<TypeDecl>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldDecl {
    Var {
        modifiers: ModifierList,
        ty: Spanned<TypeRef>,
        name: NameSlot,
        dims: usize,
        init: Option<Spanned<Expr>>,
    },
    Initializer {
        is_static: bool,
        body: Spanned<MethodBody>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Constructor,
    AnnotationMember,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub modifiers: ModifierList,
    pub type_params: Vec<Spanned<TypeParam>>,
    pub kind: MethodKind,
    /// Absent for constructors.
    pub return_type: Option<Spanned<TypeRef>>,
    pub name: NameSlot,
    pub params: Vec<Spanned<Param>>,
    pub dims: usize,
    pub throws: Vec<Spanned<TypeRef>>,
    /// `None` for abstract and native methods.
    pub body: Option<Spanned<MethodBody>>,
    pub default_value: Option<Spanned<ElementValue>>,
    pub is_default_ctor: bool,
}

/// Statements of a method or initializer body. `skipped` marks a body whose
/// statements were not materialized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodBody {
    pub stmts: Vec<Spanned<Stmt>>,
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub modifiers: ModifierList,
    pub ty: Spanned<TypeRef>,
    pub varargs: bool,
    pub name: NameSlot,
    pub dims: usize,
}

// ── Statements ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalDecl {
    pub modifiers: ModifierList,
    pub ty: Spanned<TypeRef>,
    pub name: NameSlot,
    pub dims: usize,
    pub init: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub modifiers: ModifierList,
    /// More than one entry for a multi-catch union.
    pub types: Vec<Spanned<TypeRef>>,
    pub name: NameSlot,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for `default`.
    pub label: Option<Spanned<Expr>>,
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtorCallKind {
    This,
    Super,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    Local(LocalDecl),
    LocalClass(Box<TypeDecl>),
    Expr(Spanned<Expr>),
    If {
        cond: Spanned<Expr>,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    DoWhile {
        body: Box<Spanned<Stmt>>,
        cond: Option<Spanned<Expr>>,
    },
    For {
        init: Vec<Spanned<Stmt>>,
        cond: Option<Spanned<Expr>>,
        update: Vec<Spanned<Expr>>,
        body: Box<Spanned<Stmt>>,
    },
    ForEach {
        var: Spanned<LocalDecl>,
        iterable: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    Switch {
        selector: Spanned<Expr>,
        cases: Vec<Spanned<SwitchCase>>,
    },
    Return(Option<Spanned<Expr>>),
    Break(Option<NameSlot>),
    Continue(Option<NameSlot>),
    Throw(Spanned<Expr>),
    Try {
        resources: Vec<Spanned<LocalDecl>>,
        body: Spanned<Block>,
        catches: Vec<Spanned<CatchClause>>,
        finally: Option<Spanned<Block>>,
    },
    Synchronized {
        lock: Spanned<Expr>,
        body: Spanned<Block>,
    },
    Labeled {
        label: Spanned<String>,
        body: Box<Spanned<Stmt>>,
    },
    Assert {
        cond: Spanned<Expr>,
        message: Option<Spanned<Expr>>,
    },
    CtorCall {
        kind: CtorCallKind,
        qualifier: Option<Box<Spanned<Expr>>>,
        args: Vec<Spanned<Expr>>,
        implicit: bool,
    },
    /// A half-typed structural keyword such as `else` or `finally`.
    Keyword(CompletionNode),
    Empty,
}

// ── Expressions ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal text exactly as written.
    Literal(String),
    Name(Vec<Spanned<String>>),
    This,
    Super,
    FieldAccess {
        receiver: Box<Spanned<Expr>>,
        name: Spanned<String>,
    },
    Call {
        receiver: Option<Box<Spanned<Expr>>>,
        type_args: Option<Vec<Spanned<TypeRef>>>,
        name: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
    New {
        qualifier: Option<Box<Spanned<Expr>>>,
        ty: Spanned<TypeRef>,
        args: Vec<Spanned<Expr>>,
        body: Option<Box<Spanned<TypeDecl>>>,
    },
    NewArray {
        elem: Spanned<TypeRef>,
        dims: Vec<Spanned<Expr>>,
        extra_dims: usize,
        init: Option<Box<Spanned<Expr>>>,
    },
    ArrayInit(Vec<Spanned<Expr>>),
    Index {
        array: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Assign {
        op: AssignOp,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Conditional {
        cond: Box<Spanned<Expr>>,
        then_expr: Box<Spanned<Expr>>,
        else_expr: Box<Spanned<Expr>>,
    },
    InstanceOf {
        expr: Box<Spanned<Expr>>,
        ty: Spanned<TypeRef>,
    },
    Cast {
        ty: Spanned<TypeRef>,
        expr: Box<Spanned<Expr>>,
    },
    Paren(Box<Spanned<Expr>>),
    ClassLiteral(Spanned<TypeRef>),
    Completion(CompletionNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    BitNot,
    PreInc,
    PreDec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Inc,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::UShr => ">>>",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc => "++",
            UnaryOp::PreDec => "--",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for PostfixOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PostfixOp::Inc => "++",
            PostfixOp::Dec => "--",
        })
    }
}

impl std::fmt::Display for AssignOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
        };
        f.write_str(s)
    }
}
