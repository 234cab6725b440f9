mod common;
use common::*;

use assist_parser::CompletionKind;
use assist_parser::parser::ast::{MethodKind, NameSlot, Stmt, TypeKind};

// ============================================================
// Package and imports
// ============================================================

#[test]
fn package_name() {
    let src = "package org.ecl;\nclass A {}\n";
    let result = complete_behind(src, "org.ec", Method);
    let node = result.node().unwrap();
    assert_eq!(node.to_string(), "<CompleteOnPackage:org.ec>");
    assert_eq!(node.replaced_source, "org.ecl");
    assert!(result.render().starts_with("package <CompleteOnPackage:org.ec>;\n"));
}

#[test]
fn import_name() {
    let src = "import java.ut;\nclass A {}\n";
    assert_node_in(src, "java.ut", "<CompleteOnImport:java.ut>", "import <CompleteOnImport:java.ut>;");
}

#[test]
fn static_import_name() {
    let src = "import static java.lang.Math.ma;\n";
    let result = complete_behind(src, "Math.ma", Method);
    let node = result.node().unwrap();
    assert!(matches!(&node.kind, CompletionKind::Import { is_static: true, .. }));
    assert!(result.render().contains("import static <CompleteOnImport:java.lang.Math.ma>;"));
}

#[test]
fn import_after_dot() {
    let src = "import java.util.\nclass A {}\n";
    let result = complete_behind(src, "util.", Method);
    assert_eq!(node_text(&result), "<CompleteOnImport:java.util.>");
    assert_eq!(result.unit.types.len(), 1);
}

#[test]
fn imports_after_broken_import_survive() {
    let src = "import java.ut;\nimport java.io.File;\nclass A {}\n";
    let (_, tree) = render_with(src, "java.ut", Method);
    assert!(tree.contains("import java.io.File;"), "{tree}");
}

// ============================================================
// Declared names
// ============================================================

#[test]
fn field_name() {
    let src = in_class("int na");
    assert_node_in(&src, "na", "<CompleteOnFieldName:na>", "int <CompleteOnFieldName:na>;");
}

#[test]
fn second_field_declarator_name() {
    let src = in_class("int a = 1, na");
    assert_node_in(&src, "na", "<CompleteOnFieldName:na>", "int <CompleteOnFieldName:na>;");
}

#[test]
fn method_name_with_void_type() {
    let src = in_class("void na");
    assert_node_in(&src, "na", "<CompletionOnMethodName:na>", "void <CompletionOnMethodName:na>();");
}

#[test]
fn method_name_before_parameters() {
    let src = in_class("String na(int a) { return null; }");
    let result = complete_behind(&src, "na", Method);
    assert_eq!(node_text(&result), "<CompletionOnMethodName:na>");
    let x = &result.unit.types[0].node;
    let method = &x.methods[1].node;
    assert_eq!(method.params.len(), 1);
    assert_eq!(method.body.as_ref().unwrap().node.stmts.len(), 1);
}

#[test]
fn argument_name() {
    let src = in_class("void m(String na) {}");
    assert_node_in(&src, "na", "<CompleteOnArgumentName:na>", "void m(String <CompleteOnArgumentName:na>) {");
}

#[test]
fn local_name() {
    let src = in_method("String na");
    assert_node_in(&src, "na", "<CompleteOnLocalName:na>", "String <CompleteOnLocalName:na>;");
}

#[test]
fn catch_parameter_name() {
    let src = in_method("try {\n    } catch (Exception ex) {\n    }");
    assert_node(&src, "ex", "<CompleteOnLocalName:ex>");
}

// ============================================================
// Annotations
// ============================================================

#[test]
fn annotation_name_on_method() {
    let src = in_class("@Overr\n  void m() {}");
    let result = complete_behind(&src, "Overr", Method);
    assert_eq!(node_text(&result), "<CompleteOnType:Overr>");
    let tree = result.render();
    assert!(tree.contains("@<CompleteOnType:Overr> void m() {"), "{tree}");
}

#[test]
fn annotation_value_name() {
    let src = "@Retention(RetentionPolicy.RUN) @interface Tag {}";
    let result = complete_behind(src, "RUN", Method);
    assert_eq!(node_text(&result), "<CompleteOnName:RetentionPolicy.RUN>");
    assert_eq!(result.unit.types[0].node.kind, TypeKind::Annotation);
}

// ============================================================
// Enums
// ============================================================

#[test]
fn enum_constant_argument() {
    let src = "enum E { A(fo), B }";
    let result = complete_behind(src, "fo", Method);
    assert_eq!(node_text(&result), "<CompleteOnName:fo>");
    let e = &result.unit.types[0].node;
    assert_eq!(e.constants.len(), 2);
    assert!(e.fields.is_empty());
}

#[test]
fn enum_constant_open_arguments() {
    let src = "enum E { A(, B }";
    let result = complete_behind(src, "A(", Method);
    assert_eq!(node_text(&result), "<CompleteOnMessageSend:A()>");
}

#[test]
fn enum_constant_body() {
    let src = "enum E { A { void m() { fo } }, B }";
    let result = complete_behind(src, "fo", Method);
    assert_eq!(node_text(&result), "<CompleteOnName:fo>");
    assert_eq!(result.unit.types[0].node.constants.len(), 2);
}

// ============================================================
// Default constructors
// ============================================================

#[test]
fn class_without_constructor_gets_one() {
    let unit = assist_parser::parse("public class A { void m() {} }", Method);
    let ctor = &unit.types[0].node.methods[0].node;
    assert!(ctor.is_default_ctor);
    assert_eq!(ctor.kind, MethodKind::Constructor);
    assert!(matches!(&ctor.name, NameSlot::Named(n) if n.node == "A"));
    let body = &ctor.body.as_ref().unwrap().node;
    assert!(matches!(body.stmts[0].node, Stmt::CtorCall { implicit: true, .. }));
}

#[test]
fn explicit_constructor_suppresses_default() {
    let unit = assist_parser::parse("class A { A(int x) {} }", Method);
    let methods = &unit.types[0].node.methods;
    assert_eq!(methods.len(), 1);
    assert!(!methods[0].node.is_default_ctor);
}

#[test]
fn interfaces_and_annotation_types_get_none() {
    let unit = assist_parser::parse("interface I { void m(); } @interface T { int v(); }", Method);
    assert_eq!(unit.types[0].node.methods.len(), 1);
    assert_eq!(unit.types[1].node.methods.len(), 1);
}

#[test]
fn member_and_local_classes_get_one() {
    let unit = assist_parser::parse("class A { class B {} void m() { class C {} } }", Method);
    let a = &unit.types[0].node;
    assert!(a.member_types[0].node.methods[0].node.is_default_ctor);
    let m = &a.methods[1].node;
    match &m.body.as_ref().unwrap().node.stmts[0].node {
        Stmt::LocalClass(c) => assert!(c.methods[0].node.is_default_ctor),
        other => panic!("expected a local class, got {other:?}"),
    }
}
