mod common;
use common::*;

use assist_parser::InvalidCursorReason;

fn rejection(source: &str, cursor: usize) -> Option<InvalidCursorReason> {
    assist_parser::complete(source, cursor, Method).err().and_then(|e| e.reason())
}

// ============================================================
// Literals
// ============================================================

#[test]
fn inside_number_literal() {
    let src = in_method("int x = i + 1;");
    let at = src.find("1;").unwrap();
    assert_eq!(rejection(&src, at), Some(InvalidCursorReason::NoCompletionInsideNumber));
}

#[test]
fn inside_long_and_float_literals() {
    let src = in_method("long a = 100L; float b = 2.5f;");
    assert_eq!(rejection(&src, cursor_behind(&src, "10")), Some(InvalidCursorReason::NoCompletionInsideNumber));
    assert_eq!(rejection(&src, cursor_behind(&src, "2.5")), Some(InvalidCursorReason::NoCompletionInsideNumber));
}

#[test]
fn inside_string_literal() {
    let src = in_method("String s = \"hello world\";");
    assert_eq!(rejection(&src, cursor_behind(&src, "hello")), Some(InvalidCursorReason::NoCompletionInsideString));
}

#[test]
fn on_closing_quote_of_string_is_outside() {
    let src = in_method("String s = \"abc\";");
    let at = src.find("abc").unwrap() + 3;
    assert_eq!(rejection(&src, at), None);
    assert!(assist_parser::complete(&src, at, Method).is_ok());
    assert_eq!(rejection(&src, at - 1), Some(InvalidCursorReason::NoCompletionInsideString));
}

#[test]
fn on_closing_quote_of_character_is_outside() {
    let src = in_method("char c = 'z';");
    assert_eq!(rejection(&src, cursor_behind(&src, "'z'")), None);
}

#[test]
fn end_of_unterminated_string_is_inside() {
    let src = "class X {\n  String s = \"abc\n}\n";
    assert_eq!(rejection(src, cursor_behind(src, "\"abc")), Some(InvalidCursorReason::NoCompletionInsideString));
}

#[test]
fn inside_character_literal() {
    let src = in_method("char c = 'z';");
    assert_eq!(rejection(&src, cursor_behind(&src, "'z")), Some(InvalidCursorReason::NoCompletionInsideCharacter));
}

#[test]
fn dot_after_string_literal_is_completable() {
    let src = in_method("\"abc.txt\".");
    let result = complete_behind(&src, "\"abc.txt\".", Method);
    assert_eq!(node_text(&result), "<CompleteOnMemberAccess:\"abc.txt\".>");
}

// ============================================================
// Comments
// ============================================================

#[test]
fn inside_line_comment() {
    let src = "class X {\n  // describe here\n  int x;\n}\n";
    assert_eq!(rejection(src, cursor_behind(src, "describe")), Some(InvalidCursorReason::NoCompletionInsideComment));
}

#[test]
fn inside_block_and_doc_comments() {
    let src = "class X {\n  /** docs */\n  int x; /* block */\n}\n";
    assert_eq!(rejection(src, cursor_behind(src, "docs")), Some(InvalidCursorReason::NoCompletionInsideComment));
    assert_eq!(rejection(src, cursor_behind(src, "block")), Some(InvalidCursorReason::NoCompletionInsideComment));
}

#[test]
fn inside_unterminated_comment() {
    let src = "class X {\n  int x; /* never closed\n";
    assert_eq!(rejection(src, src.len() - 2), Some(InvalidCursorReason::NoCompletionInsideComment));
}

#[test]
fn identifier_after_comment_is_completable() {
    let src = in_method("/* note */ fo");
    assert_eq!(node_text(&complete_behind(&src, "fo", Method)), "<CompleteOnName:fo>");
}

// ============================================================
// Annotation values
// ============================================================

#[test]
fn annotation_string_value_completes() {
    let src = "@SuppressWarnings(\"unch\") class X {}";
    let result = complete_behind(src, "unch", Method);
    let node = result.node().unwrap();
    assert_eq!(node.tag(), "CompletionOnString");
    assert_eq!(node.token, "\"unch");
    assert_eq!(node.replaced_source, "\"unch\"");
}

#[test]
fn string_in_call_argument_is_still_rejected() {
    let src = in_method("foo(\"unch\");");
    assert_eq!(rejection(&src, cursor_behind(&src, "unch")), Some(InvalidCursorReason::NoCompletionInsideString));
}

// ============================================================
// Error surface
// ============================================================

#[test]
fn rejection_carries_offset_and_token_span() {
    let src = "int x = 12345;";
    let err = assist_parser::complete(src, 10, Method).unwrap_err();
    match err {
        assist_parser::CompletionError::InvalidCursorLocation { offset, span, .. } => {
            assert_eq!(offset, 10);
            assert_eq!(span.slice(src), "12345");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cursor_past_end_is_not_rejected() {
    let src = in_method("fo");
    assert!(assist_parser::complete(&src, src.len() + 10, Method).is_ok());
}
