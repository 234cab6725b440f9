mod common;
use common::*;

use assist_parser::{ParentKind, ParentRef};

fn parent_behind(src: &str, marker: &str) -> Option<ParentRef> {
    let result = complete_behind(src, marker, Method);
    result.completion.expect("expected a completion").parent
}

fn parent_kind(src: &str, marker: &str) -> Option<ParentKind> {
    parent_behind(src, marker).map(|p| p.kind)
}

// ============================================================
// Expressions
// ============================================================

#[test]
fn call_argument() {
    let parent = parent_behind(&in_method("foo(1, a.b);"), "a.b").unwrap();
    assert_eq!(parent.kind, ParentKind::Expression);
    assert_eq!(parent.text, "foo(1, <CompleteOnName:a.b>)");
}

#[test]
fn binary_operand_in_field_initializer() {
    let parent = parent_behind(&in_class("int x = y * z.w;"), "z.w").unwrap();
    assert_eq!(parent.kind, ParentKind::Expression);
    assert_eq!(parent.text, "y * <CompleteOnName:z.w>");
}

#[test]
fn expression_statement_has_none() {
    assert_eq!(parent_kind(&in_method("a.b"), "a.b"), None);
    assert_eq!(parent_kind(&in_method("fo"), "fo"), None);
}

// ============================================================
// Statements and declarations
// ============================================================

#[test]
fn return_statement() {
    let parent = parent_behind(&in_method("return a.b;"), "a.b").unwrap();
    assert_eq!(parent.kind, ParentKind::Statement);
    assert_eq!(parent.text, "return <CompleteOnName:a.b>;");
}

#[test]
fn if_condition() {
    assert_eq!(parent_kind(&in_method("if (fo) {\n    }"), "fo"), Some(ParentKind::Statement));
}

#[test]
fn field_type() {
    assert_eq!(parent_kind(&in_class("Str f;"), "Str"), Some(ParentKind::Field));
}

#[test]
fn parameter_type() {
    let parent = parent_behind(&in_class("void m(Str x) {}"), "Str").unwrap();
    assert_eq!(parent.kind, ParentKind::Parameter);
    assert_eq!(parent.text, "<CompleteOnType:Str> x");
}

#[test]
fn superclass() {
    let parent = parent_behind("class X extends Ob {}", "Ob").unwrap();
    assert_eq!(parent.kind, ParentKind::TypeDeclaration);
    assert!(parent.text.starts_with("class X extends <CompleteOnClass:Ob>"), "{}", parent.text);
}

#[test]
fn thrown_exception_type() {
    let parent = parent_behind(&in_class("void m() throws IOE {}"), "IOE").unwrap();
    assert_eq!(parent.kind, ParentKind::Method);
    assert!(parent.text.contains("throws <CompleteOnException:IOE>"), "{}", parent.text);
}

#[test]
fn annotation_name() {
    assert_eq!(parent_kind(&in_class("@Overr\n  void m() {}"), "Overr"), Some(ParentKind::Annotation));
}

#[test]
fn enum_constant_argument() {
    assert_eq!(parent_kind("enum E { A(fo), B }", "fo"), Some(ParentKind::EnumConstant));
}

#[test]
fn type_argument() {
    let parent = parent_behind(&in_class("List<Str> x;"), "Str").unwrap();
    assert_eq!(parent.kind, ParentKind::Type);
    assert_eq!(parent.text, "List<<CompleteOnType:Str>>");
}

#[test]
fn parent_span_covers_the_node() {
    let src = in_method("return a.b;");
    let result = complete_behind(&src, "a.b", Method);
    let completion = result.completion.unwrap();
    let parent = completion.parent.unwrap();
    assert!(parent.span.start <= completion.node.span.start);
    assert!(completion.node.span.end <= parent.span.end);
}
