//! Fault-tolerant, completion-aware parsing of Java-like source.
//!
//! `complete` takes a buffer being edited and the offset of the last typed
//! character. It rejects cursors inside literals and comments, then parses
//! the whole buffer into a best-effort tree holding at most one completion
//! node that marks what is being typed.

pub mod config;
pub mod diagnostics;
pub mod lexer;
pub mod locator;
pub mod parser;
pub mod pretty;
pub mod span;
pub mod visit;

pub use diagnostics::{CompletionError, InvalidCursorReason};
pub use parser::ParseMode;
pub use parser::ast::CompilationUnit;
pub use parser::completion::{CompletionKind, CompletionNode};
pub use visit::{ParentKind, ParentRef};

/// The completion node and the construct it sits in.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub node: CompletionNode,
    pub parent: Option<ParentRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub unit: CompilationUnit,
    /// `None` when the cursor is not at a completable position.
    pub completion: Option<Completion>,
}

impl ParseResult {
    pub fn render(&self) -> String {
        pretty::render(&self.unit)
    }

    pub fn node(&self) -> Option<&CompletionNode> {
        self.completion.as_ref().map(|c| &c.node)
    }
}

/// Parse `source` for completion at `cursor`, the byte offset of the last
/// typed character.
pub fn complete(source: &str, cursor: usize, mode: ParseMode) -> Result<ParseResult, CompletionError> {
    let lexed = lexer::lex(source);
    locator::locate(&lexed, cursor)?;

    let outcome = parser::Parser::new(&lexed.tokens, source, cursor, mode).parse_unit();
    let completion = outcome.completion.map(|node| {
        let parent = visit::find_parent(&outcome.unit, &node);
        Completion { node, parent }
    });
    match &completion {
        Some(c) => tracing::debug!(node = %c.node, "completion found"),
        None => tracing::debug!(cursor, "no completion at cursor"),
    }
    Ok(ParseResult { unit: outcome.unit, completion })
}

/// Parse `source` with no completion point.
pub fn parse(source: &str, mode: ParseMode) -> CompilationUnit {
    let lexed = lexer::lex(source);
    parser::Parser::outline(&lexed.tokens, source, mode).parse_unit().unit
}
