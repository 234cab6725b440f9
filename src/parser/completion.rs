//! The closed set of completion nodes.

use std::fmt;

use super::ast::{Expr, TypeRef};
use crate::pretty;
use crate::span::{Span, Spanned};

/// Which reference position a type is parsed in. Decides the completion
/// variant when the cursor lands inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCtx {
    Type,
    Class,
    Interface,
    Exception,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompletionKind {
    Name { qualifier: Vec<String> },
    MemberAccess { receiver: Box<Spanned<Expr>> },
    Type { qualifier: Vec<String> },
    Class { qualifier: Vec<String> },
    Interface { qualifier: Vec<String> },
    Exception { qualifier: Vec<String> },
    Import { qualifier: Vec<String>, is_static: bool },
    Package { qualifier: Vec<String> },
    Keyword { candidates: Vec<&'static str> },
    Label,
    LocalName,
    FieldName,
    ArgumentName,
    MethodName,
    MessageSend {
        receiver: Option<Box<Spanned<Expr>>>,
        type_args: Option<Vec<Spanned<TypeRef>>>,
        selector: String,
        args: Vec<Spanned<Expr>>,
    },
    MessageSendName {
        receiver: Option<Box<Spanned<Expr>>>,
        type_args: Vec<Spanned<TypeRef>>,
    },
    Allocation {
        ty: Box<Spanned<TypeRef>>,
        args: Vec<Spanned<Expr>>,
    },
    QualifiedAllocation {
        receiver: Box<Spanned<Expr>>,
        ty: Box<Spanned<TypeRef>>,
        args: Vec<Spanned<Expr>>,
    },
    ClassLiteralAccess { ty: Box<Spanned<TypeRef>> },
    String,
}

impl CompletionKind {
    pub fn for_type(ctx: TypeCtx, qualifier: Vec<String>) -> Self {
        match ctx {
            TypeCtx::Type => CompletionKind::Type { qualifier },
            TypeCtx::Class => CompletionKind::Class { qualifier },
            TypeCtx::Interface => CompletionKind::Interface { qualifier },
            TypeCtx::Exception => CompletionKind::Exception { qualifier },
        }
    }

    /// The tag printed in `<Tag:text>`.
    pub fn tag(&self) -> &'static str {
        match self {
            CompletionKind::Name { .. } => "CompleteOnName",
            CompletionKind::MemberAccess { .. } => "CompleteOnMemberAccess",
            CompletionKind::Type { .. } => "CompleteOnType",
            CompletionKind::Class { .. } => "CompleteOnClass",
            CompletionKind::Interface { .. } => "CompleteOnInterface",
            CompletionKind::Exception { .. } => "CompleteOnException",
            CompletionKind::Import { .. } => "CompleteOnImport",
            CompletionKind::Package { .. } => "CompleteOnPackage",
            CompletionKind::Keyword { .. } => "CompleteOnKeyword",
            CompletionKind::Label => "CompleteOnLabel",
            CompletionKind::LocalName => "CompleteOnLocalName",
            CompletionKind::FieldName => "CompleteOnFieldName",
            CompletionKind::ArgumentName => "CompleteOnArgumentName",
            CompletionKind::MethodName => "CompletionOnMethodName",
            CompletionKind::MessageSend { .. } => "CompleteOnMessageSend",
            CompletionKind::MessageSendName { .. } => "CompleteOnMessageSendName",
            CompletionKind::Allocation { .. } => "CompleteOnAllocationExpression",
            CompletionKind::QualifiedAllocation { .. } => "CompleteOnQualifiedAllocationExpression",
            CompletionKind::ClassLiteralAccess { .. } => "CompleteOnClassLiteralAccess",
            CompletionKind::String => "CompletionOnString",
        }
    }
}

/// The node marking what the user is typing.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionNode {
    pub kind: CompletionKind,
    /// Identifier typed so far, up to the cursor. May be empty.
    pub token: String,
    /// Source range a suggestion would overwrite.
    pub replaced: Span,
    /// Verbatim text of `replaced`.
    pub replaced_source: String,
    pub span: Span,
}

impl CompletionNode {
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    fn qualified(qualifier: &[String], token: &str) -> String {
        if qualifier.is_empty() {
            token.to_string()
        } else {
            format!("{}.{}", qualifier.join("."), token)
        }
    }

    fn args_text(args: &[Spanned<Expr>]) -> String {
        args.iter().map(pretty::expr_to_string).collect::<Vec<_>>().join(", ")
    }

    fn type_args_text(args: &[Spanned<TypeRef>]) -> String {
        format!("<{}>", args.iter().map(pretty::type_to_string).collect::<Vec<_>>().join(", "))
    }

    /// The text printed after the tag.
    pub fn text(&self) -> String {
        match &self.kind {
            CompletionKind::Name { qualifier }
            | CompletionKind::Type { qualifier }
            | CompletionKind::Class { qualifier }
            | CompletionKind::Interface { qualifier }
            | CompletionKind::Exception { qualifier }
            | CompletionKind::Import { qualifier, .. }
            | CompletionKind::Package { qualifier } => Self::qualified(qualifier, &self.token),
            CompletionKind::MemberAccess { receiver } => {
                format!("{}.{}", pretty::expr_to_string(receiver), self.token)
            }
            CompletionKind::MessageSend { receiver, type_args, selector, args } => {
                let mut out = String::new();
                if let Some(recv) = receiver {
                    out.push_str(&pretty::expr_to_string(recv));
                    out.push('.');
                }
                if let Some(targs) = type_args {
                    out.push_str(&Self::type_args_text(targs));
                }
                out.push_str(selector);
                out.push('(');
                out.push_str(&Self::args_text(args));
                out.push(')');
                out
            }
            CompletionKind::MessageSendName { receiver, type_args } => {
                let mut out = String::new();
                if let Some(recv) = receiver {
                    out.push_str(&pretty::expr_to_string(recv));
                    out.push('.');
                }
                out.push_str(&Self::type_args_text(type_args));
                out.push_str(&self.token);
                out.push_str("()");
                out
            }
            CompletionKind::Allocation { ty, args } => {
                format!("new {}({})", pretty::type_to_string(ty), Self::args_text(args))
            }
            CompletionKind::QualifiedAllocation { receiver, ty, args } => format!(
                "{}.new {}({})",
                pretty::expr_to_string(receiver),
                pretty::type_to_string(ty),
                Self::args_text(args)
            ),
            CompletionKind::ClassLiteralAccess { ty } => {
                format!("{}.{}", pretty::type_to_string(ty), self.token)
            }
            CompletionKind::Keyword { .. }
            | CompletionKind::Label
            | CompletionKind::LocalName
            | CompletionKind::FieldName
            | CompletionKind::ArgumentName
            | CompletionKind::MethodName
            | CompletionKind::String => self.token.clone(),
        }
    }
}

impl fmt::Display for CompletionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.tag(), self.text())
    }
}

/// Keywords that may follow at a structural position, filtered by what was typed.
pub fn keyword_candidates(prefix: &str, pool: &[&'static str]) -> Vec<&'static str> {
    pool.iter().copied().filter(|kw| kw.starts_with(prefix)).collect()
}
