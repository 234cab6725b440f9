//! Method and initializer bodies.
//!
//! In diet mode a body is brace-matched and skipped unless the cursor is
//! inside it. A body whose braces do not balance before the next member
//! declaration is parsed anyway, so that recovery can find where it really
//! ends, and its statements are dropped again unless the completion node
//! came out of it.

use super::ast::*;
use super::completion::{CompletionKind, CompletionNode};
use super::decl::implicit_super;
use super::{ParseMode, Parser, ScopeKind, is_member_only};
use crate::lexer::Token;
use crate::span::Spanned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyPlan {
    Parse,
    /// Jump past the `}` at this token index.
    Skip { close: usize },
    ParseAndDiscard,
}

fn starts_with_ctor_call(stmts: &[Spanned<Stmt>]) -> bool {
    match stmts.first().map(|s| &s.node) {
        Some(Stmt::CtorCall { .. }) => true,
        Some(Stmt::Expr(Spanned {
            node:
                Expr::Completion(CompletionNode {
                    kind: CompletionKind::MessageSend { receiver: None, selector, .. },
                    ..
                }),
            ..
        })) => selector == "this" || selector == "super",
        _ => false,
    }
}

impl<'a> Parser<'a> {
    /// Index of the `}` matching the `{` at `open`, or `None` when a member
    /// declaration or the end of input comes first.
    fn matching_brace(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for i in open..self.tokens.len() {
            match self.tok(i) {
                Token::LBrace => depth += 1,
                Token::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                Token::Eof => return None,
                tok if depth == 1 && is_member_only(tok) => return None,
                _ => {}
            }
        }
        None
    }

    fn plan_body(&self, open: usize) -> BodyPlan {
        if self.parsing_full() {
            return BodyPlan::Parse;
        }
        match self.matching_brace(open) {
            Some(close) => {
                let caret = self.cursor.caret;
                let inside =
                    self.can_complete() && self.span_of(open).end <= caret && caret <= self.span_of(close).start;
                if inside { BodyPlan::Parse } else { BodyPlan::Skip { close } }
            }
            None => BodyPlan::ParseAndDiscard,
        }
    }

    /// A `{ .. }` body of a method, constructor or initializer.
    /// `class_ctor` asks for an implicit `super()` when the body has no
    /// explicit constructor call.
    pub(super) fn parse_method_body(&mut self, class_ctor: bool) -> Option<Spanned<MethodBody>> {
        if !self.at(Token::LBrace) {
            return None;
        }
        let open = self.pos;
        let start = self.peek_span().start;
        let plan = self.plan_body(open);
        tracing::trace!(?plan, at = start, "method body");

        if let BodyPlan::Skip { close } = plan {
            self.pos = close + 1;
            let body = MethodBody { stmts: Vec::new(), skipped: true };
            return Some(Spanned::new(body, self.span_from(start)));
        }

        let nested = self.mode == ParseMode::Diet;
        if nested {
            self.full_depth += 1;
        }
        let had_completion = self.completion.is_some();

        self.advance();
        self.push_scope(ScopeKind::MethodBody);
        let mut stmts = self.parse_block_stmts(&[]);
        self.pop_scope();
        self.expect(Token::RBrace);

        if nested {
            self.full_depth -= 1;
        }

        let completed_here = !had_completion && self.completion.is_some();
        if plan == BodyPlan::ParseAndDiscard && !completed_here {
            let body = MethodBody { stmts: Vec::new(), skipped: true };
            return Some(Spanned::new(body, self.span_from(start)));
        }

        if class_ctor && !starts_with_ctor_call(&stmts) {
            stmts.insert(0, implicit_super(self.span_of(open).end));
        }
        Some(Spanned::new(MethodBody { stmts, skipped: false }, self.span_from(start)))
    }
}
