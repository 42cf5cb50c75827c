use crate::ast::*;
use crate::scan::{is_whitespace, Nesting};
use crate::tree::*;

/// Opening sequence of a symbol.
pub const SYMBOL_OPEN: &str = "|Ψ";
/// Closing glyph of a symbol.
pub const SYMBOL_CLOSE: char = '⟩';
/// Canonical prefix of a decorated identifier.
pub const SIGIL_PREFIX: &str = "Ψ_";

/// Compile every top-level statement of a program.
/// Never fails: anything unrecognized becomes text.
pub fn compile(program: &Program) -> Vec<CompiledStatement> {
    compile_statements(&program.statements)
}

fn compile_statements(statements: &[Statement]) -> Vec<CompiledStatement> {
    statements.iter().map(compile_statement).collect()
}

fn compile_statement(stmt: &Statement) -> CompiledStatement {
    CompiledStatement {
        prefix: stmt.prefix,
        head: compile_expression(&stmt.head),
        value: stmt.value.as_ref().map(compile_value),
    }
}

fn compile_value(value: &Value) -> CompiledValue {
    match value {
        Value::Block(block) => CompiledValue::Block(CompiledBlock {
            statements: compile_statements(&block.statements),
        }),
        Value::List(list) => CompiledValue::List(CompiledList {
            items: list.items.iter().map(compile_expression).collect(),
        }),
        Value::Expression(expr) => CompiledValue::Expression(compile_expression(expr)),
    }
}

pub fn compile_expression(expr: &Expression) -> ExpressionInfo {
    let trimmed = expr.text.trim_matches(is_whitespace);
    if trimmed.is_empty() {
        return ExpressionInfo::text("");
    }
    match parse_symbol(trimmed) {
        Some(symbol) => ExpressionInfo::Symbol(symbol),
        None => ExpressionInfo::text(trimmed),
    }
}

/// Recognize `|Ψ…⟩` and break its interior into segments.
pub fn parse_symbol(text: &str) -> Option<SymbolInfo> {
    let interior = text.strip_prefix(SYMBOL_OPEN)?.strip_suffix(SYMBOL_CLOSE)?;
    let inner = interior.strip_prefix('_').unwrap_or(interior);
    let segments = split_segments(inner);
    let identifier = identifier_of(&segments, inner);
    Some(SymbolInfo {
        raw: text.to_string(),
        inner: inner.to_string(),
        identifier,
        segments,
    })
}

/// Head name of a symbol. The first segment normally supplies it; an empty
/// first segment (as in `|Ψ.Net⟩`) defers to the first segment that has a name.
fn identifier_of(segments: &[String], inner: &str) -> String {
    segments
        .iter()
        .map(|segment| strip_invocation(segment))
        .find(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| inner.trim_matches(is_whitespace).to_string())
}

/// `Foo(a, b)` → `Foo`
fn strip_invocation(segment: &str) -> &str {
    match segment.find('(') {
        Some(open) => segment[..open].trim_matches(is_whitespace),
        None => segment.trim_matches(is_whitespace),
    }
}

/// Split on `.` seen outside every group and string. Inner segments are
/// kept even when empty; a trailing segment only when it has content.
pub fn split_segments(value: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut nesting = Nesting::new();
    let mut start = 0;
    let mut pos = 0;

    while pos < value.len() {
        let rest = &value[pos..];
        if nesting.is_top_level() && rest.starts_with('.') {
            segments.push(value[start..pos].trim_matches(is_whitespace).to_string());
            pos += 1;
            start = pos;
            continue;
        }
        pos += nesting.consume(rest);
    }

    let last = value[start..].trim_matches(is_whitespace);
    if !last.is_empty() {
        segments.push(last.to_string());
    }
    segments
}
