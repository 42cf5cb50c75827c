use crate::compiler::{SIGIL_PREFIX, SYMBOL_OPEN};
use crate::tree::*;

/// Keep the statements whose head matches `query`, plus every statement
/// whose block contains a match. A parent kept only for its children
/// carries just the matching subset of its block.
pub fn filter_statements(statements: &[CompiledStatement], query: &str) -> Vec<CompiledStatement> {
    statements
        .iter()
        .filter_map(|stmt| filter_statement(stmt, query))
        .collect()
}

fn filter_statement(stmt: &CompiledStatement, query: &str) -> Option<CompiledStatement> {
    if head_matches(&stmt.head, query) {
        return Some(stmt.clone());
    }
    let nested = filter_statements(stmt.block()?, query);
    if nested.is_empty() {
        return None;
    }
    Some(CompiledStatement {
        prefix: stmt.prefix,
        head: stmt.head.clone(),
        value: Some(CompiledValue::Block(CompiledBlock { statements: nested })),
    })
}

/// A symbol head matches when its raw spelling, identifier, inner text or
/// any one segment equals the query. Symbols written with the `Ψ_` prefix
/// also match on their decorated identifier.
pub fn head_matches(head: &ExpressionInfo, query: &str) -> bool {
    let Some(symbol) = head.as_symbol() else {
        return false;
    };
    if symbol.raw == query
        || symbol.identifier == query
        || symbol.inner == query
        || symbol.segments.iter().any(|segment| segment == query)
    {
        return true;
    }
    uses_sigil_prefix(&symbol.raw) && decorate(&symbol.identifier) == query
}

fn uses_sigil_prefix(raw: &str) -> bool {
    raw.strip_prefix(SYMBOL_OPEN)
        .is_some_and(|rest| rest.starts_with('_'))
}

/// `Net` → `Ψ_Net`; identifiers that already carry the prefix are unchanged.
pub fn decorate(identifier: &str) -> String {
    if identifier.starts_with(SIGIL_PREFIX) {
        identifier.to_string()
    } else {
        format!("{SIGIL_PREFIX}{identifier}")
    }
}
