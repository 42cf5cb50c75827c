pub mod ast;
pub mod compiler;
pub mod discover;
pub mod driver;
pub mod error;
pub mod filter;
pub mod index;
pub mod json;
pub mod parser;
mod scan;
pub mod tree;

use serde::Serialize;

use ast::Program;
use error::SyntaxError;
use tree::CompiledStatement;

pub use driver::{Options, OutputFormat};
pub use index::{build_index, KnowledgeIndex};

// ── Core API ───────────────────────────────────────────────────────

/// One document, parsed and compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub ast: Program,
    pub compiled: Vec<CompiledStatement>,
}

/// Parse and compile a single document.
pub fn compile_source(source: &str) -> Result<Compilation, SyntaxError> {
    let ast = parser::parse(source)?;
    let compiled = compiler::compile(&ast);
    Ok(Compilation { ast, compiled })
}

/// A compiled document as it appears in `json` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub file: String,
    /// Dropped once a symbol filter has rewritten `compiled`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<Program>,
    pub compiled: Vec<CompiledStatement>,
}

impl Document {
    pub fn new(file: impl Into<String>, compilation: Compilation) -> Self {
        Document {
            file: file.into(),
            ast: Some(compilation.ast),
            compiled: compilation.compiled,
        }
    }
}

#[cfg(test)]
mod tests;
