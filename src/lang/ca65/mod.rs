//! # ca65 language module
//!
//! Syntactic analysis of source for the ca65 macro assembler, 6502 flavor.
//! The lexer feeds a hand written recursive descent parser that produces a line
//! oriented syntax tree, with block directives owning the lines they enclose.
//! Parsing never stops at the first error: the tree always covers the valid prefix,
//! and a list of errors with positions comes back alongside it.
//!
//! ```rs
//! let parsed = ca65kit::lang::ca65::parse("L: lda #$10\n");
//! assert!(parsed.errors.is_empty());
//! ```
//!
//! The `diagnostics`, `settings`, and `formatter` modules are the language utilities
//! built on the tree.

pub mod keywords;
pub mod lexer;
pub mod ast;
pub mod parser;
mod expression;
mod operand;
mod directives;
pub mod settings;
pub mod diagnostics;
pub mod formatter;

#[cfg(test)]
mod tests;

use lsp_types as lsp;
use lexer::{Span,LineIndex};

pub use parser::{parse,Parsed,ParseError};

/// Convert a byte span to an LSP range, columns are byte offsets within the row
pub fn lsp_range(span: Span, index: &LineIndex) -> lsp::Range {
    let start = index.position(span.start);
    let end = index.position(span.end);
    lsp::Range::new(
        lsp::Position::new(start.row,start.col),
        lsp::Position::new(end.row,end.col)
    )
}
