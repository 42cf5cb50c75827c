use serde::Serialize;

/// A statement after compilation: same shape as the syntax tree, with every
/// raw expression classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStatement {
    pub prefix: bool,
    pub head: ExpressionInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<CompiledValue>,
}

/// A classified expression: either a recognized `|Ψ…⟩` symbol or plain text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ExpressionInfo {
    #[serde(rename = "PsiSymbol")]
    Symbol(SymbolInfo),
    Text(TextInfo),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolInfo {
    /// The full spelling, delimiters included.
    pub raw: String,
    /// Text between the delimiters, minus at most one leading underscore.
    pub inner: String,
    /// Head name of the symbol, with any call arguments stripped.
    pub identifier: String,
    /// Dot-separated parts of `inner`, split only at top level.
    pub segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextInfo {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Block")]
pub struct CompiledBlock {
    pub statements: Vec<CompiledStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "List")]
pub struct CompiledList {
    pub items: Vec<ExpressionInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompiledValue {
    Block(CompiledBlock),
    List(CompiledList),
    Expression(ExpressionInfo),
}

impl ExpressionInfo {
    pub fn text(text: impl Into<String>) -> Self {
        ExpressionInfo::Text(TextInfo { text: text.into() })
    }

    /// The short human-readable form used in previews and breadcrumbs:
    /// the raw spelling of a symbol, or the literal text.
    pub fn summary(&self) -> &str {
        match self {
            ExpressionInfo::Symbol(symbol) => &symbol.raw,
            ExpressionInfo::Text(text) => &text.text,
        }
    }

    pub fn as_symbol(&self) -> Option<&SymbolInfo> {
        match self {
            ExpressionInfo::Symbol(symbol) => Some(symbol),
            ExpressionInfo::Text(_) => None,
        }
    }

    /// Name of the variant as it appears in the `kind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            ExpressionInfo::Symbol(_) => "PsiSymbol",
            ExpressionInfo::Text(_) => "Text",
        }
    }
}

impl CompiledStatement {
    /// Nested statements when the value is a block.
    pub fn block(&self) -> Option<&[CompiledStatement]> {
        match &self.value {
            Some(CompiledValue::Block(block)) => Some(&block.statements),
            _ => None,
        }
    }
}
