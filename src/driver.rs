//! Batch driver: discover documents, compile each one, render the result.

use std::path::{Path, PathBuf};

use crate::discover::collect_documents;
use crate::error::DriverError;
use crate::filter::filter_statements;
use crate::index::build_index;
use crate::json::{to_json, JsonStyle};
use crate::{compile_source, Document};

const PREVIEW_STATEMENTS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compiled statements (and syntax tree) per file
    #[default]
    Json,
    /// Human-readable counts and head preview per file
    Summary,
    /// Cross-document knowledge index
    Index,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub format: OutputFormat,
    pub pretty: bool,
    /// Keep only statements matching this symbol query.
    pub symbol: Option<String>,
}

/// Run the whole pipeline over the given inputs and return the rendered output.
pub fn run(inputs: &[PathBuf], options: &Options) -> Result<String, DriverError> {
    if inputs.is_empty() {
        return Err(DriverError::Usage(
            "No input files or directories were provided.".to_string(),
        ));
    }
    let paths = collect_documents(inputs);
    if paths.is_empty() {
        return Err(DriverError::EmptyResult(
            "No |Ψ documents were found in the provided paths.".to_string(),
        ));
    }
    let documents = load_documents(&paths)?;
    render(documents, options)
}

/// Read and compile each document in order. The first failure aborts.
pub fn load_documents(paths: &[PathBuf]) -> Result<Vec<Document>, DriverError> {
    paths.iter().map(|path| load_document(path)).collect()
}

fn load_document(path: &Path) -> Result<Document, DriverError> {
    let source = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let compilation = compile_source(&source).map_err(|source| DriverError::Syntax {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        file = %path.display(),
        statements = compilation.compiled.len(),
        "compiled document"
    );
    Ok(Document::new(path.display().to_string(), compilation))
}

/// Apply the symbol filter, if any, then render in the requested format.
pub fn render(mut documents: Vec<Document>, options: &Options) -> Result<String, DriverError> {
    if let Some(query) = &options.symbol {
        documents = filter_documents(documents, query)?;
    }
    let style = JsonStyle::from_pretty(options.pretty);
    match options.format {
        OutputFormat::Json => {
            let json = match documents.as_slice() {
                [single] => to_json(single, style)?,
                all => to_json(all, style)?,
            };
            Ok(json)
        }
        OutputFormat::Summary => Ok(render_summary(&documents)),
        OutputFormat::Index => Ok(to_json(&build_index(&documents), style)?),
    }
}

/// Filter every document by `query`, dropping documents with no match.
/// Filtered documents no longer carry their syntax tree.
fn filter_documents(documents: Vec<Document>, query: &str) -> Result<Vec<Document>, DriverError> {
    let filtered: Vec<Document> = documents
        .into_iter()
        .filter_map(|doc| {
            let compiled = filter_statements(&doc.compiled, query);
            tracing::debug!(file = %doc.file, matched = compiled.len(), "applied symbol filter");
            (!compiled.is_empty()).then(|| Document {
                file: doc.file,
                ast: None,
                compiled,
            })
        })
        .collect();
    if filtered.is_empty() {
        return Err(DriverError::EmptyResult(format!(
            "No statements matched symbol query '{query}'."
        )));
    }
    Ok(filtered)
}

// ── Summary ─────────────────────────────────────────────────────────

pub fn render_summary(documents: &[Document]) -> String {
    let sections: Vec<String> = documents.iter().map(file_summary).collect();
    format!("{}\n", sections.join("\n\n"))
}

fn file_summary(doc: &Document) -> String {
    let statements = &doc.compiled;
    let prefixed = statements.iter().filter(|stmt| stmt.prefix).count();
    let psi_heads = statements
        .iter()
        .filter(|stmt| stmt.head.as_symbol().is_some())
        .count();

    let mut lines = vec![
        doc.file.clone(),
        format!("  statements: {}", statements.len()),
        format!("  prefixed: {prefixed}"),
        format!("  psi_heads: {psi_heads}"),
    ];

    let preview: Vec<&str> = statements
        .iter()
        .take(PREVIEW_STATEMENTS)
        .map(|stmt| stmt.head.summary())
        .filter(|summary| !summary.is_empty())
        .collect();
    if !preview.is_empty() {
        lines.push("  preview:".to_string());
        lines.extend(preview.iter().map(|line| format!("    - {line}")));
    }
    lines.join("\n")
}
