mod common;
use common::*;

use assist_parser::{CompletionKind, ParseResult};

fn candidates(result: &ParseResult) -> Vec<&'static str> {
    match &result.node().expect("a completion node").kind {
        CompletionKind::Keyword { candidates } => candidates.clone(),
        other => panic!("expected a keyword completion, got {other:?}"),
    }
}

// ============================================================
// Compilation unit
// ============================================================

#[test]
fn top_level_keyword_prefix() {
    let src = "pu\nclass A {}";
    let result = complete_behind(src, "pu", Method);
    assert_eq!(candidates(&result), vec!["public"]);
    assert_eq!(result.node().unwrap().to_string(), "<CompleteOnKeyword:pu>");
    assert_eq!(result.unit.types.len(), 1);
}

#[test]
fn top_level_keyword_with_several_matches() {
    let src = "p";
    let result = complete_behind(src, "p", Method);
    assert_eq!(candidates(&result), vec!["package", "public"]);
}

#[test]
fn keyword_after_modifiers_names_a_type_kind() {
    let src = "public cl";
    let result = complete_behind(src, "cl", Method);
    assert_eq!(candidates(&result), vec!["class"]);
}

// ============================================================
// Type headers
// ============================================================

#[test]
fn class_header_keyword() {
    let src = "class X ext {\n  int y;\n}\n";
    let result = complete_behind(src, "ext", Method);
    assert_eq!(candidates(&result), vec!["extends"]);
    let tree = result.render();
    assert!(tree.contains("class X <CompleteOnKeyword:ext> {"), "{tree}");
    assert!(tree.contains("int y;"), "{tree}");
}

#[test]
fn header_keyword_after_superclass() {
    let src = "class X extends Y imp {}";
    let result = complete_behind(src, "imp", Method);
    assert_eq!(candidates(&result), vec!["implements"]);
}

#[test]
fn interface_header_keyword() {
    let src = "interface I ex {}";
    let result = complete_behind(src, "ex", Method);
    assert_eq!(candidates(&result), vec!["extends"]);
}

// ============================================================
// Statement continuations
// ============================================================

#[test]
fn else_after_if() {
    let src = in_method("if (a) b();\n    el");
    let result = complete_behind(&src, "el", Method);
    assert_eq!(candidates(&result), vec!["else"]);
    assert!(result.render().contains("<CompleteOnKeyword:el>;"));
}

#[test]
fn else_after_nested_if() {
    let src = in_method("if (a) b(); else if (c) d();\n    e");
    let result = complete_behind(&src, "e", Method);
    assert_eq!(candidates(&result), vec!["else"]);
}

#[test]
fn finally_after_try() {
    let src = in_method("try {\n    } catch (E e) {\n    }\n    fin");
    let result = complete_behind(&src, "fin", Method);
    assert_eq!(candidates(&result), vec!["finally"]);
}

#[test]
fn catch_or_finally_after_bare_try() {
    let src = in_method("try {\n    }\n    c");
    let result = complete_behind(&src, "c", Method);
    assert_eq!(candidates(&result), vec!["catch"]);
}

#[test]
fn no_else_after_plain_statement() {
    let src = in_method("b();\n    el");
    assert_node(&src, "el", "<CompleteOnName:el>");
}

#[test]
fn identifier_continuing_an_expression_is_not_a_keyword() {
    let src = in_method("if (a) b();\n    el.run();");
    assert_node(&src, "el", "<CompleteOnName:el>");
}

#[test]
fn statements_after_keyword_completion_are_kept() {
    let src = in_method("if (a) b();\n    el\n    c();");
    let (_, tree) = render_with(&src, "el", Method);
    assert!(tree.contains("c();"), "{tree}");
}
