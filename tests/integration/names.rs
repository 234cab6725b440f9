mod common;
use common::*;

use assist_parser::CompletionKind;

// ============================================================
// Single and qualified names
// ============================================================

#[test]
fn simple_name_in_initializer() {
    let src = in_method("int x = fo");
    assert_node_in(&src, "fo", "<CompleteOnName:fo>", "int x = <CompleteOnName:fo>;");
}

#[test]
fn name_prefix_stops_at_cursor() {
    let src = in_method("int x = foobar;");
    let result = complete_behind(&src, "foo", Method);
    let node = result.node().unwrap();
    assert_eq!(node.token, "foo");
    assert_eq!(node.replaced_source, "foobar");
}

#[test]
fn qualified_name_carries_qualifier() {
    let src = in_method("int x = a.b.cd;");
    let result = complete_behind(&src, "a.b.c", Method);
    let node = result.node().unwrap();
    assert!(matches!(&node.kind, CompletionKind::Name { qualifier } if qualifier == &["a", "b"]));
    assert_eq!(node.token, "c");
    assert_eq!(node.replaced_source, "a.b.cd");
    assert_eq!(node.to_string(), "<CompleteOnName:a.b.c>");
}

#[test]
fn empty_name_after_assignment() {
    let src = in_method("int x = ;");
    assert_node_in(&src, "= ", "<CompleteOnName:>", "int x = <CompleteOnName:>;");
}

#[test]
fn name_in_return() {
    let src = in_method("return fo");
    assert_node_in(&src, "fo", "<CompleteOnName:fo>", "return <CompleteOnName:fo>;");
}

#[test]
fn name_in_if_condition() {
    let src = in_method("if (a.b");
    assert_node_in(&src, "a.b", "<CompleteOnName:a.b>", "if (<CompleteOnName:a.b>) ;");
}

#[test]
fn name_in_foreach_iterable() {
    let src = in_method("for (String s : li");
    assert_node_in(&src, "li", "<CompleteOnName:li>", "for (String s : <CompleteOnName:li>) ;");
}

#[test]
fn name_as_call_argument() {
    let src = in_method("bar(1, fo);");
    assert_node_in(&src, "fo", "<CompleteOnName:fo>", "bar(1, <CompleteOnName:fo>);");
}

#[test]
fn right_operand_of_comparison() {
    let src = in_method("x = i < le;");
    assert_node_in(&src, "le", "<CompleteOnName:le>", "x = i < <CompleteOnName:le>;");
}

// ============================================================
// Member access on expressions
// ============================================================

#[test]
fn member_access_on_call_result() {
    let src = in_method("foo().ba");
    let result = complete_behind(&src, "ba", Method);
    let node = result.node().unwrap();
    assert_eq!(node.to_string(), "<CompleteOnMemberAccess:foo().ba>");
    assert_eq!(node.replaced_source, "foo().ba");
}

#[test]
fn member_access_on_this() {
    let src = in_method("this.fo");
    assert_node(&src, "fo", "<CompleteOnMemberAccess:this.fo>");
}

#[test]
fn member_access_on_array_element() {
    let src = in_method("a[0].x");
    assert_node(&src, "x", "<CompleteOnMemberAccess:a[0].x>");
}

#[test]
fn member_access_after_dot_with_nothing_typed() {
    let src = in_method("foo().\n");
    let result = complete_behind(&src, "foo().", Method);
    let node = result.node().unwrap();
    assert_eq!(node.to_string(), "<CompleteOnMemberAccess:foo().>");
    assert_eq!(node.token, "");
}

// ============================================================
// Message sends
// ============================================================

#[test]
fn open_call_without_arguments() {
    let src = in_method("foo(");
    let result = complete_behind(&src, "foo(", Method);
    let node = result.node().unwrap();
    assert_eq!(node.to_string(), "<CompleteOnMessageSend:foo()>");
    assert_eq!(node.replaced_source, "foo(");
}

#[test]
fn open_call_keeps_earlier_arguments() {
    let src = in_method("x.bar(1, ");
    assert_node(&src, ", ", "<CompleteOnMessageSend:x.bar(1)>");
}

// ============================================================
// Labels
// ============================================================

#[test]
fn label_after_break() {
    let src = in_method("out: for (;;) break ou");
    assert_node_in(&src, "ou", "<CompleteOnLabel:ou>", "break <CompleteOnLabel:ou>;");
}

#[test]
fn empty_label_after_continue() {
    let src = in_method("for (;;) continue ;");
    assert_node_in(&src, "continue ", "<CompleteOnLabel:>", "continue <CompleteOnLabel:>;");
}

// ============================================================
// Keywords typed as identifiers
// ============================================================

#[test]
fn partial_keyword_is_a_name() {
    let src = in_method("foo();\n    whi");
    assert_node(&src, "whi", "<CompleteOnName:whi>");
}

#[test]
fn prefix_of_null_literal_is_a_name() {
    let src = in_method("int x = nul");
    assert_node(&src, "nul", "<CompleteOnName:nul>");
}
