//! # `ca65kit` main library
//!
//! This library parses source code written for the ca65 macro assembler, 6502 flavor.
//! The result is a line oriented syntax tree in which block directives (`.proc`, `.struct`,
//! `.if`, `.macro`, ...) own the lines they enclose.
//!
//! ## Architecture
//!
//! Analysis proceeds in layers, all found in `lang::ca65`:
//! * `lexer` turns bytes into tokens, and can also capture raw text for macro arguments
//! * `keywords` holds the directive, pseudo function, and opcode tables
//! * `parser` with its helpers builds the tree and collects errors without stopping
//! * `diagnostics`, `formatter`, and `settings` are utilities built on the tree
//!
//! ## Errors
//!
//! Parsing is total: every input produces a `Program` and a list of `ParseError`.
//! Most errors spoil only their own line.  A mismatched block terminator is fatal,
//! the tree then stops before it and the rest of the source is reported as unparsed.
//!
//! ## Command Line
//!
//! The `ca65kit` binary exposes the library through `verify`, `parse`, and `format`
//! subcommands, each of which reads the source from stdin.

pub mod lang;
pub mod commands;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;
