//! Cursor classification.
//!
//! Runs before any grammar work. A cursor that sits inside a string,
//! character, numeric literal or comment can never be completed, and the
//! caller gets a distinguished error for it. The closing quote of a
//! terminated literal counts as outside. The one exception is a string
//! literal used as an annotation member value: that literal is itself a
//! completion target.

use crate::diagnostics::{CompletionError, InvalidCursorReason};
use crate::lexer::{Lexed, Token};
use crate::span::Spanned;

/// Classify `cursor` (offset of the last typed byte) against the token stream.
pub fn locate(lexed: &Lexed, cursor: usize) -> Result<(), CompletionError> {
    if let Some(comment) = lexed.comment_at(cursor) {
        return Err(CompletionError::invalid_location(
            InvalidCursorReason::NoCompletionInsideComment,
            cursor,
            comment,
        ));
    }

    let Some(tok) = lexed.token_at(cursor) else {
        return Ok(());
    };
    if matches!(tok.node, Token::StringLit | Token::CharLit)
        && cursor + 1 == tok.span.end
        && !lexed.is_unterminated(tok.span)
    {
        // On the closing quote the literal is finished.
        return Ok(());
    }
    let reason = match tok.node {
        Token::StringLit => {
            let idx = lexed.tokens.partition_point(|t| t.span.end <= cursor);
            if is_annotation_value(&lexed.tokens, idx) {
                return Ok(());
            }
            InvalidCursorReason::NoCompletionInsideString
        }
        Token::CharLit => InvalidCursorReason::NoCompletionInsideCharacter,
        Token::Number => InvalidCursorReason::NoCompletionInsideNumber,
        _ => return Ok(()),
    };
    tracing::debug!(cursor, ?reason, "cursor rejected");
    Err(CompletionError::invalid_location(reason, cursor, tok.span))
}

/// Whether the string literal at `idx` is an annotation member value:
/// `@A("x")`, `@A(k = "x")` or an element of `@A({"x", "y"})`.
pub(crate) fn is_annotation_value(tokens: &[Spanned<Token>], idx: usize) -> bool {
    if idx == 0 {
        return false;
    }
    if !matches!(
        tokens[idx - 1].node,
        Token::LParen | Token::Eq | Token::Comma | Token::LBrace
    ) {
        return false;
    }

    // Walk back to the unmatched `(` that opens the annotation arguments.
    let mut depth = 0usize;
    let mut i = idx;
    let open = loop {
        if i == 0 {
            return false;
        }
        i -= 1;
        match tokens[i].node {
            Token::RParen | Token::RBrace => depth += 1,
            Token::LBrace if depth == 0 => continue,
            Token::LParen | Token::LBrace if depth > 0 => depth -= 1,
            Token::LParen => break i,
            Token::Semi => return false,
            _ => {}
        }
    };

    // `@` Ident (`.` Ident)* `(`
    let mut j = open;
    loop {
        if j == 0 || tokens[j - 1].node != Token::Ident {
            return false;
        }
        j -= 1;
        if j == 0 {
            return false;
        }
        match tokens[j - 1].node {
            Token::At => return true,
            Token::Dot => j -= 1,
            _ => return false,
        }
    }
}
