mod common;
use common::*;

use assist_parser::CompletionKind;

// ============================================================
// Allocated type
// ============================================================

#[test]
fn type_after_new() {
    let src = in_method("Object o = new Fo");
    assert_node_in(&src, "Fo", "<CompleteOnType:Fo>", "Object o = new <CompleteOnType:Fo>();");
}

#[test]
fn qualified_type_after_new() {
    let src = in_method("Object o = new java.util.Array");
    assert_node(&src, "Array", "<CompleteOnType:java.util.Array>");
}

#[test]
fn thrown_allocation_is_an_exception_reference() {
    let src = in_method("throw new IOExc");
    assert_node_in(&src, "IOExc", "<CompleteOnException:IOExc>", "throw new <CompleteOnException:IOExc>();");
}

#[test]
fn nested_allocation_in_throw_is_a_plain_type() {
    let src = in_method("throw new Wrapper(new Ca");
    assert_node(&src, "Ca", "<CompleteOnType:Ca>");
}

// ============================================================
// Constructor arguments
// ============================================================

#[test]
fn open_constructor_call() {
    let src = in_method("Object o = new Foo(");
    let result = complete_behind(&src, "Foo(", Method);
    let node = result.node().unwrap();
    assert_eq!(node.to_string(), "<CompleteOnAllocationExpression:new Foo()>");
    assert!(matches!(&node.kind, CompletionKind::Allocation { args, .. } if args.is_empty()));
}

#[test]
fn open_constructor_call_after_arguments() {
    let src = in_method("Object o = new Foo(1, \"a\", ");
    assert_node(&src, "\"a\", ", "<CompleteOnAllocationExpression:new Foo(1, \"a\")>");
}

#[test]
fn open_qualified_allocation() {
    let src = in_method("Object o = outer.new Inner(");
    assert_node(&src, "Inner(", "<CompleteOnQualifiedAllocationExpression:outer.new Inner()>");
}

#[test]
fn name_inside_constructor_arguments() {
    let src = in_method("Object o = new Foo(ba);");
    assert_node_in(&src, "ba", "<CompleteOnName:ba>", "Object o = new Foo(<CompleteOnName:ba>);");
}

// ============================================================
// Arrays and anonymous classes
// ============================================================

#[test]
fn array_dimension_expression() {
    let src = in_method("int[] a = new int[si");
    assert_node(&src, "si", "<CompleteOnName:si>");
}

#[test]
fn array_initializer_element() {
    let src = in_method("int[] a = {1, fo};");
    assert_node_in(&src, "fo", "<CompleteOnName:fo>", "int[] a = {1, <CompleteOnName:fo>};");
}

#[test]
fn inside_anonymous_class_method() {
    let src = in_method("Runnable r = new Runnable() {\n      public void run() { fo }\n    };\n    after();");
    let (node, tree) = render_with(&src, "fo", Method);
    assert_eq!(node, "<CompleteOnName:fo>");
    assert!(tree.contains("Runnable r = new Runnable() {"), "{tree}");
    assert!(tree.contains("after();"), "{tree}");
}

#[test]
fn anonymous_class_has_no_default_constructor() {
    let src = in_method("Runnable r = new Runnable() {\n      public void run() { fo }\n    };");
    let (_, tree) = render_with(&src, "fo", Method);
    assert_eq!(tree.matches("super();").count(), 1, "{tree}");
}
