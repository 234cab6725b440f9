mod common;
use common::*;

use assist_parser::CompletionKind;

// ============================================================
// Plain type positions
// ============================================================

#[test]
fn local_variable_type() {
    let src = in_method("Str x;");
    assert_node_in(&src, "Str", "<CompleteOnType:Str>", "<CompleteOnType:Str> x;");
}

#[test]
fn qualified_local_variable_type() {
    let src = in_method("java.util.Li x;");
    let result = complete_behind(&src, "Li", Method);
    let node = result.node().unwrap();
    assert!(matches!(&node.kind, CompletionKind::Type { qualifier } if qualifier == &["java", "util"]));
    assert_eq!(node.to_string(), "<CompleteOnType:java.util.Li>");
    assert_eq!(node.replaced_source, "java.util.Li");
}

#[test]
fn field_type() {
    let src = in_class("Str x;");
    assert_node_in(&src, "Str", "<CompleteOnType:Str>", "<CompleteOnType:Str> x;");
}

#[test]
fn parameter_type() {
    let src = in_class("void m(Str x) {}");
    assert_node_in(&src, "Str", "<CompleteOnType:Str>", "void m(<CompleteOnType:Str> x) {");
}

#[test]
fn cast_type() {
    let src = in_method("Object o = (Str) x;");
    assert_node_in(&src, "Str", "<CompleteOnType:Str>", "Object o = <CompleteOnType:Str>;");
}

#[test]
fn instanceof_type() {
    let src = in_method("if (o instanceof Str)");
    assert_node_in(&src, "Str", "<CompleteOnType:Str>", "if (o instanceof <CompleteOnType:Str>) ;");
}

// ============================================================
// Declaration headers
// ============================================================

#[test]
fn superclass_is_a_class_reference() {
    let src = "class X extends Ob {}";
    assert_node_in(src, "Ob", "<CompleteOnClass:Ob>", "class X extends <CompleteOnClass:Ob> {");
}

#[test]
fn implemented_type_is_an_interface_reference() {
    let src = "class X implements java.io.Ser {}";
    assert_node(src, "Ser", "<CompleteOnInterface:java.io.Ser>");
}

#[test]
fn interface_extends_interfaces() {
    let src = "interface I extends A, Ser {}";
    assert_node_in(src, "Ser", "<CompleteOnInterface:Ser>", "interface I extends A, <CompleteOnInterface:Ser> {");
}

#[test]
fn throws_clause_is_an_exception_reference() {
    let src = in_class("void m() throws IOExc {}");
    assert_node_in(&src, "IOExc", "<CompleteOnException:IOExc>", "void m() throws <CompleteOnException:IOExc> {");
}

#[test]
fn catch_type_is_an_exception_reference() {
    let src = in_method("try {\n    } catch (IOExc e) {\n    }");
    assert_node_in(&src, "IOExc", "<CompleteOnException:IOExc>", "catch (<CompleteOnException:IOExc> e) {");
}

#[test]
fn header_completion_keeps_the_body() {
    let src = "class X extends Ob {\n  int y;\n}\n";
    let (_, tree) = render_with(src, "Ob", Method);
    assert!(tree.contains("int y;"), "{tree}");
}

// ============================================================
// Class literals
// ============================================================

#[test]
fn class_literal_on_array_type() {
    let src = in_method("Object c = String[].cl");
    assert_node(&src, "cl", "<CompleteOnClassLiteralAccess:String[].cl>");
}

#[test]
fn class_literal_on_primitive() {
    let src = in_method("Object c = int.cl");
    assert_node(&src, "cl", "<CompleteOnClassLiteralAccess:int.cl>");
}

#[test]
fn class_literal_on_primitive_array_statement() {
    let src = in_method("int[].cl");
    assert_node(&src, "cl", "<CompleteOnClassLiteralAccess:int[].cl>");
}
