//! Cross-document knowledge index.
//!
//! Every symbol-headed statement in the corpus becomes one [`Entry`],
//! grouped under its decorated identifier. Block values are walked with a
//! breadcrumb of ancestor heads; list values are not descended into.

use std::collections::HashMap;

use serde::Serialize;

use crate::filter::decorate;
use crate::tree::*;
use crate::Document;

const BLOCK_PREVIEW_ITEMS: usize = 3;
const LIST_PREVIEW_ITEMS: usize = 5;
const ELLIPSIS: &str = "…";
const PATH_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeIndex {
    pub files: Vec<FileSummary>,
    pub symbols: Vec<SymbolGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub file: String,
    /// Statements visited, nested block statements included.
    pub statements: usize,
    pub psi_symbols: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolGroup {
    pub identifier: String,
    pub occurrences: usize,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub head: EntryHead,
    pub file: String,
    /// Summaries of the ancestor heads, outermost first.
    pub path: Vec<String>,
    pub prefix: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryHead {
    pub raw: String,
    pub inner: String,
    pub segments: Vec<String>,
}

/// Accumulates entries while walking one document.
struct Walker<'a> {
    file: &'a str,
    groups: &'a mut HashMap<String, Vec<Entry>>,
    statements: usize,
    symbols: usize,
}

impl Walker<'_> {
    fn walk(&mut self, statements: &[CompiledStatement], path: &mut Vec<String>) {
        for stmt in statements {
            self.statements += 1;
            if let Some(symbol) = stmt.head.as_symbol() {
                self.symbols += 1;
                self.record(stmt, symbol, path);
            }
            if let Some(nested) = stmt.block() {
                path.push(stmt.head.summary().to_string());
                self.walk(nested, path);
                path.pop();
            }
        }
    }

    fn record(&mut self, stmt: &CompiledStatement, symbol: &SymbolInfo, path: &[String]) {
        let (value_type, value_preview) = match &stmt.value {
            Some(value) => {
                let (kind, preview) = preview_value(value);
                (Some(kind.to_string()), Some(preview))
            }
            None => (None, None),
        };
        let entry = Entry {
            head: EntryHead {
                raw: symbol.raw.clone(),
                inner: symbol.inner.clone(),
                segments: symbol.segments.clone(),
            },
            file: self.file.to_string(),
            path: path.to_vec(),
            prefix: stmt.prefix,
            value_type,
            value_preview,
        };
        self.groups
            .entry(decorate(&symbol.identifier))
            .or_default()
            .push(entry);
    }
}

/// Build the index for a set of compiled documents.
/// The output is fully ordered, so identical inputs give identical output.
pub fn build_index(documents: &[Document]) -> KnowledgeIndex {
    let mut groups: HashMap<String, Vec<Entry>> = HashMap::new();
    let mut files = Vec::with_capacity(documents.len());

    for doc in documents {
        let mut walker = Walker {
            file: &doc.file,
            groups: &mut groups,
            statements: 0,
            symbols: 0,
        };
        walker.walk(&doc.compiled, &mut Vec::new());
        files.push(FileSummary {
            file: doc.file.clone(),
            statements: walker.statements,
            psi_symbols: walker.symbols,
        });
    }

    let mut symbols: Vec<SymbolGroup> = groups
        .into_iter()
        .map(|(identifier, mut entries)| {
            entries.sort_by(|a, b| {
                a.file
                    .cmp(&b.file)
                    .then_with(|| a.path.join(PATH_SEPARATOR).cmp(&b.path.join(PATH_SEPARATOR)))
            });
            SymbolGroup {
                identifier,
                occurrences: entries.len(),
                entries,
            }
        })
        .collect();
    symbols.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    files.sort_by(|a, b| a.file.cmp(&b.file));

    KnowledgeIndex { files, symbols }
}

/// `(valueType, valuePreview)` for a statement value.
fn preview_value(value: &CompiledValue) -> (&'static str, String) {
    match value {
        CompiledValue::Block(block) => {
            let heads = block.statements.iter().map(|stmt| stmt.head.summary());
            let shown = join_preview(heads, block.statements.len(), BLOCK_PREVIEW_ITEMS, " | ");
            ("Block", format!("Block({}): {}", block.statements.len(), shown))
        }
        CompiledValue::List(list) => {
            let items = list.items.iter().map(ExpressionInfo::summary);
            let shown = join_preview(items, list.items.len(), LIST_PREVIEW_ITEMS, ", ");
            ("List", format!("List({}): {}", list.items.len(), shown))
        }
        CompiledValue::Expression(info) => (info.kind(), info.summary().to_string()),
    }
}

fn join_preview<'a>(
    parts: impl Iterator<Item = &'a str>,
    total: usize,
    limit: usize,
    separator: &str,
) -> String {
    let mut shown: Vec<&str> = parts.take(limit).collect();
    if total > limit {
        shown.push(ELLIPSIS);
    }
    shown.join(separator)
}
