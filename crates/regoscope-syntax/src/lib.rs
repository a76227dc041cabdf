//! Structural Rego parsing (no IO).
//!
//! Input: a file path (for diagnostics) and its source text.
//! Output: a [`Module`] exposing the package, imports, rule heads and comments, or a
//! [`SyntaxError`] pointing at the offending position.
//!
//! Rule bodies are checked for balanced delimiters but are not interpreted.

#![forbid(unsafe_code)]

pub mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::{
    AssignOp, Body, Comment, Else, Head, Import, Location, Module, Package, Ref, RefPart, Rule,
    Term,
};
pub use error::SyntaxError;

/// Anything that can turn Rego source text into a [`Module`].
pub trait ModuleParser {
    fn parse_module(&self, path: &str, text: &str) -> Result<Module, SyntaxError>;
}

impl<P: ModuleParser + ?Sized> ModuleParser for &P {
    fn parse_module(&self, path: &str, text: &str) -> Result<Module, SyntaxError> {
        (**self).parse_module(path, text)
    }
}

/// The built-in Rego parser. Stateless; cheap to copy and share across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegoParser;

impl ModuleParser for RegoParser {
    fn parse_module(&self, path: &str, text: &str) -> Result<Module, SyntaxError> {
        parser::parse_module(path, text)
    }
}

/// Fuzz-friendly entry point. **Never panics** on any input.
pub fn parse_module(path: &str, text: &str) -> Result<Module, SyntaxError> {
    RegoParser.parse_module(path, text)
}
