//! Syntax tree produced by the parser.
//! Expressions are raw trimmed text; classification happens in the compiler.

use serde::Serialize;

/// Root of one parsed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// `[⊗] head [= value]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Statement {
    /// True when the statement was introduced by the `⊗` marker.
    pub prefix: bool,
    pub head: Expression,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Opaque text between two structural delimiters, already trimmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Expression {
    pub text: String,
}

/// `{ statements }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Block {
    pub statements: Vec<Statement>,
}

/// `[ expr, expr, ... ]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct List {
    pub items: Vec<Expression>,
}

/// The right-hand side of `=`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Block(Block),
    List(List),
    Expression(Expression),
}

impl Expression {
    pub fn new(text: impl Into<String>) -> Self {
        Expression { text: text.into() }
    }
}
