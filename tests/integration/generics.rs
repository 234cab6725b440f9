mod common;
use common::*;

// `<` opens type arguments when what follows can close into a type around
// the cursor, and is a comparison otherwise.

// ============================================================
// Type arguments
// ============================================================

#[test]
fn unterminated_argument_list() {
    let src = in_method("Y<Z");
    assert_node_in(&src, "Z", "<CompleteOnType:Z>", "Y<<CompleteOnType:Z>>;");
}

#[test]
fn argument_in_closed_list() {
    let src = in_method("List<Str> x;");
    assert_node_in(&src, "Str", "<CompleteOnType:Str>", "List<<CompleteOnType:Str>>;");
}

#[test]
fn second_argument() {
    let src = in_method("Map<String, Li> m;");
    assert_node_in(&src, "Li", "<CompleteOnType:Li>", "Map<String, <CompleteOnType:Li>>;");
}

#[test]
fn nested_arguments() {
    let src = in_class("Map<String, List<Int>> m;");
    assert_node_in(&src, "Int", "<CompleteOnType:Int>", "Map<String, List<<CompleteOnType:Int>>>;");
}

#[test]
fn field_argument_in_class_body() {
    let src = in_class("java.util.List<Str> xs;");
    assert_node(&src, "Str", "<CompleteOnType:Str>");
}

#[test]
fn wildcard_bound_keyword() {
    let src = in_class("List<? ext> xs;");
    assert_node_in(&src, "ext", "<CompleteOnKeyword:ext>", "List<? <CompleteOnKeyword:ext>>;");
}

#[test]
fn wildcard_bound_type() {
    let src = in_class("List<? extends Num> xs;");
    assert_node_in(&src, "Num", "<CompleteOnType:Num>", "List<? extends <CompleteOnType:Num>>;");
}

#[test]
fn method_type_parameter_bound_stays_in_the_member() {
    let src = "class X { <T extends Lis> void n() {} int after; }";
    assert_node_in(src, "Lis", "<CompleteOnType:Lis>", "<T extends <CompleteOnType:Lis>> void n() {");
    let result = complete_behind(src, "Lis", Method);
    let parent = result.completion.as_ref().unwrap().parent.as_ref().unwrap();
    assert_eq!(parent.kind, assist_parser::ParentKind::Method);
    assert!(result.render().contains("int after;"));
}

#[test]
fn second_method_type_parameter_bound() {
    let src = in_class("<K, V extends Numb> V get(K key) { return null; }");
    assert_node_in(&src, "Numb", "<CompleteOnType:Numb>", "<K, V extends <CompleteOnType:Numb>> V get(K key) {");
}

// ============================================================
// Comparisons
// ============================================================

#[test]
fn comparison_in_condition() {
    let src = in_method("if (i < le)");
    assert_node_in(&src, "le", "<CompleteOnName:le>", "if (i < <CompleteOnName:le>) ;");
}

#[test]
fn parenthesized_unclosed_generic_falls_back_to_a_name() {
    let src = in_method("Object o = (Y<Z ) e;");
    assert_node(&src, "Z", "<CompleteOnName:Z>");
}

#[test]
fn comparison_with_literal_is_not_a_type() {
    let src = in_method("boolean b = i < 10 && fo;");
    assert_node(&src, "fo", "<CompleteOnName:fo>");
}

// ============================================================
// Generic method calls
// ============================================================

#[test]
fn selector_after_explicit_type_arguments() {
    let src = in_method("this.<String>fo");
    let result = complete_behind(&src, "fo", Method);
    let node = result.node().unwrap();
    assert_eq!(node.to_string(), "<CompleteOnMessageSendName:this.<String>fo()>");
    assert_eq!(node.token, "fo");
}

#[test]
fn type_argument_of_generic_call() {
    let src = in_method("this.<Str>foo();");
    assert_node(&src, "Str", "<CompleteOnType:Str>");
}

// ============================================================
// Diamonds
// ============================================================

#[test]
fn inside_diamond() {
    let src = in_method("List<String> l = new ArrayList<>();");
    assert_node(&src, "ArrayList<", "<CompleteOnType:>");
}

#[test]
fn diamond_after_parameterized_qualified_allocation_has_no_completion() {
    let src = in_method("Object o = new A<String>().new B<>();");
    let result = complete_behind(&src, "B<", Method);
    assert!(result.completion.is_none(), "{}", result.render());
}
