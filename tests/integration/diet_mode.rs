mod common;
use common::*;

// ============================================================
// Skipping bodies
// ============================================================

#[test]
fn only_the_body_holding_the_cursor_is_parsed() {
    let src = "class A {
  void a() { x(); }
  void b() { fo }
  void c() { y(); }
}
";
    let result = complete_behind(src, "fo", Diet);
    assert_eq!(node_text(&result), "<CompleteOnName:fo>");
    insta::assert_snapshot!(result.render(), @r"
    class A {
      A() {
      }
      void a() {
      }
      void b() {
        <CompleteOnName:fo>;
      }
      void c() {
      }
    }
    ");
}

#[test]
fn cursor_in_declaration_skips_every_body() {
    let src = "class A {\n  Str f;\n  void a() { x(); }\n}\n";
    let result = complete_behind(src, "Str", Diet);
    assert_eq!(node_text(&result), "<CompleteOnType:Str>");
    let tree = result.render();
    assert!(!tree.contains("x();"), "{tree}");
}

#[test]
fn field_initializers_are_kept() {
    let src = "class A {\n  int f = g(1);\n  void a() { fo }\n}\n";
    let (_, tree) = render_with(src, "fo", Diet);
    assert!(tree.contains("int f = g(1);"), "{tree}");
}

#[test]
fn initializer_block_holding_the_cursor() {
    let src = "class A {\n  static { fo }\n}\n";
    let (node, tree) = render_with(src, "fo", Diet);
    assert_eq!(node, "<CompleteOnName:fo>");
    assert!(tree.contains("static {\n    <CompleteOnName:fo>;\n  }"), "{tree}");
}

#[test]
fn constructor_body_gets_implicit_super_when_parsed() {
    let src = "class A {\n  A() { fo }\n}\n";
    let (_, tree) = render_with(src, "fo", Diet);
    assert!(tree.contains("A() {\n    super();\n    <CompleteOnName:fo>;\n  }"), "{tree}");
}

#[test]
fn bodies_inside_the_parsed_body_are_parsed_too() {
    let src = "class A {
  void a() {
    Runnable r = new Runnable() {
      public void run() { go(); }
    };
    fo
  }
}
";
    let (_, tree) = render_with(src, "fo", Diet);
    assert!(tree.contains("go();"), "{tree}");
}

// ============================================================
// Unbalanced bodies
// ============================================================

#[test]
fn unbalanced_body_away_from_cursor_is_dropped() {
    let src = "class A {\n  void a() { if (x) { go();\n  void b() { y.z }\n}\n";
    let (node, tree) = render_with(src, "y.z", Diet);
    assert_eq!(node, "<CompleteOnName:y.z>");
    assert!(!tree.contains("go();"), "{tree}");
    assert!(tree.contains("void b() {"), "{tree}");
}

#[test]
fn unbalanced_body_holding_the_cursor_is_kept() {
    let src = "class A {\n  void a() { if (x) { fo\n  void b() { y(); }\n}\n";
    let result = complete_behind(src, "fo", Diet);
    assert_eq!(node_text(&result), "<CompleteOnName:fo>");
    assert_eq!(result.unit.types[0].node.methods.len(), 3);
}

// ============================================================
// Mode agreement
// ============================================================

#[test]
fn both_modes_find_the_same_node() {
    let cases = [
        (in_method("int x = a.b;"), "a.b"),
        (in_method("Object o = new Foo("), "Foo("),
        (in_class("void m(Str x) {}"), "Str"),
        (in_method("for (String s : li"), "li"),
        ("class X extends Ob {}".to_string(), "Ob"),
    ];
    for (src, marker) in &cases {
        let diet = complete_behind(src, marker, Diet);
        let method = complete_behind(src, marker, Method);
        assert_eq!(diet.node(), method.node(), "source:\n{src}");
    }
}
