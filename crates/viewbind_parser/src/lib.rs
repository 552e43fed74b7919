//! viewbind_parser: scanner and recursive-descent parser for Java source.
//!
//! Parses a single compilation unit into a [`viewbind_ast::ClassArena`].
//! Declarations are parsed structurally; method bodies are captured at
//! statement granularity with their source text preserved, so a unit can be
//! printed back without losing user code. Comments survive as leading trivia
//! on declarations or as comment statements inside bodies.

mod parser;
mod scanner;
mod token;

pub use parser::{parse, ParseError, Parser};
pub use scanner::Scanner;
pub use token::TokenKind;
