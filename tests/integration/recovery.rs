mod common;
use common::*;

use assist_parser::parse;

fn outline(src: &str) -> String {
    assist_parser::pretty::render(&parse(src, Method))
}

// ============================================================
// Skipping after the completion node
// ============================================================

#[test]
fn nested_calls_are_skipped_to_the_semicolon() {
    let src = in_method("foo(bar(a.b, 1), 2);\n    after();");
    let (node, tree) = render_with(&src, "a.b", Method);
    assert_eq!(node, "<CompleteOnName:a.b>");
    assert!(tree.contains("foo(bar(<CompleteOnName:a.b>));"), "{tree}");
    assert!(tree.contains("after();"), "{tree}");
}

#[test]
fn statement_keyword_ends_skipping() {
    let src = in_method("foo(a.b, \n    if (c) d();");
    let (_, tree) = render_with(&src, "a.b", Method);
    assert!(tree.contains("if (c) d();"), "{tree}");
}

#[test]
fn condition_completion_keeps_the_body() {
    let src = in_method("if (a.b) {\n      c();\n    }\n    d();");
    let (node, tree) = render_with(&src, "a.b", Method);
    assert_eq!(node, "<CompleteOnName:a.b>");
    assert!(tree.contains("if (<CompleteOnName:a.b>) {"), "{tree}");
    assert!(tree.contains("c();"), "{tree}");
    assert!(tree.contains("d();"), "{tree}");
}

#[test]
fn for_header_completion_keeps_the_body() {
    let src = in_method("for (int i = 0; i < n.le; i++) {\n      body();\n    }");
    let (_, tree) = render_with(&src, "n.le", Method);
    assert!(tree.contains("for (int i = 0; i < <CompleteOnName:n.le>; ) {"), "{tree}");
    assert!(tree.contains("body();"), "{tree}");
}

#[test]
fn case_label_completion_keeps_the_case_body() {
    let src = in_method("switch (k) {\n    case FO:\n      a();\n    }");
    let (_, tree) = render_with(&src, "FO", Method);
    assert!(tree.contains("case <CompleteOnName:FO>:"), "{tree}");
    assert!(tree.contains("a();"), "{tree}");
}

#[test]
fn field_initializer_completion() {
    let src = in_class("int x = a.b;\n  int y;");
    let (_, tree) = render_with(&src, "a.b", Method);
    assert!(tree.contains("int x = <CompleteOnName:a.b>;"), "{tree}");
    assert!(tree.contains("int y;"), "{tree}");
}

#[test]
fn later_members_survive_broken_ones() {
    let src = "class A {\n  void m() { a.b }\n  void n() { ) ) }\n  int z;\n}\n";
    let (node, tree) = render_with(src, "a.b", Method);
    assert_eq!(node, "<CompleteOnName:a.b>");
    assert!(tree.contains("void n() {"), "{tree}");
    assert!(tree.contains("int z;"), "{tree}");
}

#[test]
fn partial_identifier_before_a_call_on_the_next_line() {
    let src = in_method("Strin\n    bar();");
    let result = complete_behind(&src, "Strin", Method);
    let tree = result.render();
    assert_eq!(node_text(&result), "<CompleteOnName:Strin>", "{tree}");
    assert!(tree.contains("bar();"), "{tree}");
    let x = &result.unit.types[0].node;
    assert!(x.fields.is_empty(), "{tree}");
    assert_eq!(x.methods.len(), 2, "{tree}");
}

// ============================================================
// Unbalanced input without a cursor
// ============================================================

#[test]
fn member_declaration_closes_an_open_body() {
    let unit = parse("class A {\n  void m() {\n    if (a) {\n      int y;\n  void n() { }\n}\n", Method);
    let methods = &unit.types[0].node.methods;
    assert_eq!(methods.len(), 3);
}

#[test]
fn typed_method_header_closes_an_open_body() {
    let unit = parse("class A {\n  void m() {\n    a();\n  String n() { return null; }\n}\n", Method);
    let a = &unit.types[0].node;
    assert_eq!(a.methods.len(), 3);
    assert_eq!(a.methods[2].node.name.as_str(), Some("n"));
}

#[test]
fn call_statement_after_a_local_type_does_not_close_the_body() {
    let unit = parse("class A {\n  void m() {\n    String s;\n    foo(s);\n  }\n}\n", Method);
    let a = &unit.types[0].node;
    assert_eq!(a.methods.len(), 2);
    assert!(a.fields.is_empty());
}

#[test]
fn member_modifier_closes_an_open_call() {
    let tree = outline("class A {\n  void m() {\n    foo(\n  private int x;\n}\n");
    assert!(tree.contains("private int x;"), "{tree}");
    assert!(tree.contains("foo();"), "{tree}");
}

#[test]
fn stray_closers_in_class_body() {
    let unit = parse("class A { ) ] int x; }", Method);
    assert_eq!(unit.types[0].node.fields.len(), 1);
}

#[test]
fn unclosed_class_at_end_of_file() {
    let unit = parse("class A { void m() { x();", Method);
    let a = &unit.types[0].node;
    assert_eq!(a.methods.len(), 2);
    assert_eq!(a.methods[1].node.body.as_ref().unwrap().node.stmts.len(), 1);
}

#[test]
fn corrupted_method_header_keeps_the_body() {
    let tree = outline("class A {\n  void foo()[i {\n    bar();\n  }\n}\n");
    assert!(tree.contains("bar();"), "{tree}");
}

#[test]
fn missing_semicolons_are_tolerated() {
    let tree = outline("class A {\n  int x = 1\n  void m() { a() b() }\n}\n");
    assert!(tree.contains("int x = 1;"), "{tree}");
    assert!(tree.contains("a();"), "{tree}");
    assert!(tree.contains("b();"), "{tree}");
}
