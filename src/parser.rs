use crate::ast::*;
use crate::error::{Position, SyntaxError};
use crate::scan::{is_whitespace, Nesting};

/// Marker that flags a statement as prefixed.
pub const PREFIX_MARKER: char = '⊗';

const HEAD_DELIMITERS: &[char] = &['=', ';', ',', '\n', '\r', '}'];
const VALUE_DELIMITERS: &[char] = &[';', ',', '\n', '\r', '}'];
const LIST_DELIMITERS: &[char] = &[',', ']'];

/// Parser state: tracks position in the input string.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

/// Parse a notation document into a program.
pub fn parse(input: &str) -> Result<Program, SyntaxError> {
    let mut parser = Parser { input, pos: 0 };
    let statements = parser.parse_statements()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("Unexpected trailing content."));
    }
    Ok(Program { statements })
}

impl<'a> Parser<'a> {
    // ── Helpers ──────────────────────────────────────────────────────

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    fn eat_char(&mut self, ch: char) -> bool {
        if self.peek_char() == Some(ch) {
            self.advance(ch.len_utf8());
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, ch: char) -> Result<(), SyntaxError> {
        if self.eat_char(ch) {
            Ok(())
        } else {
            Err(self.error(format!("Expected '{}'.", ch)))
        }
    }

    /// Current position in the source.
    fn position(&self) -> Position {
        let consumed = &self.input[..self.pos];
        let line = consumed.matches('\n').count();
        let line_start = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Position {
            line,
            column: consumed[line_start..].chars().count(),
            offset: consumed.chars().count(),
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.position())
    }

    // ── Whitespace & Terminators ────────────────────────────────────

    fn skip_ws(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !is_whitespace(ch) {
                break;
            }
            self.advance(ch.len_utf8());
        }
    }

    /// Eat any run of `;`, `,` and line breaks (with surrounding whitespace)
    /// that follows a statement.
    fn skip_terminators(&mut self) {
        loop {
            self.skip_ws();
            match self.peek_char() {
                Some(ch @ (';' | ',' | '\n' | '\r')) => self.advance(ch.len_utf8()),
                _ => break,
            }
        }
    }

    // ── Statements ──────────────────────────────────────────────────

    /// Parse statements until end of input or an enclosing `}`.
    fn parse_statements(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        let mut statements = Vec::new();
        loop {
            self.skip_ws();
            if self.at_end() || self.peek_char() == Some('}') {
                return Ok(statements);
            }
            if let Some(stmt) = self.parse_statement()? {
                statements.push(stmt);
            }
        }
    }

    /// Parse one statement. Returns `None` for an empty statement, which
    /// is still consumed so the caller always makes progress.
    fn parse_statement(&mut self) -> Result<Option<Statement>, SyntaxError> {
        let prefix = self.eat_char(PREFIX_MARKER);
        if prefix {
            self.skip_ws();
        }

        let head = self.read_expression(HEAD_DELIMITERS);
        self.skip_ws();

        let value = if self.eat_char('=') {
            self.skip_ws();
            Some(self.parse_value()?)
        } else {
            None
        };

        self.skip_terminators();

        if head.is_empty() {
            return Ok(None);
        }
        Ok(Some(Statement {
            prefix,
            head: Expression::new(head),
            value,
        }))
    }

    // ── Values ──────────────────────────────────────────────────────

    fn parse_value(&mut self) -> Result<Value, SyntaxError> {
        match self.peek_char() {
            Some('{') => self.parse_block().map(Value::Block),
            Some('[') => self.parse_list().map(Value::List),
            _ => Ok(Value::Expression(Expression::new(
                self.read_expression(VALUE_DELIMITERS),
            ))),
        }
    }

    fn parse_block(&mut self) -> Result<Block, SyntaxError> {
        self.expect_char('{')?;
        let statements = self.parse_statements()?;
        self.skip_ws();
        self.expect_char('}')?;
        Ok(Block { statements })
    }

    fn parse_list(&mut self) -> Result<List, SyntaxError> {
        self.expect_char('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.at_end() {
                return Err(self.error("Unexpected end of input inside list."));
            }
            if self.peek_char() == Some(']') {
                break;
            }
            items.push(Expression::new(self.read_expression(LIST_DELIMITERS)));
            self.skip_ws();
            self.eat_char(',');
        }
        self.expect_char(']')?;
        Ok(List { items })
    }

    // ── Expressions ─────────────────────────────────────────────────

    /// Read raw text up to the first delimiter seen at top level, and
    /// return it trimmed. The delimiter itself is not consumed.
    fn read_expression(&mut self, delimiters: &[char]) -> String {
        let start = self.pos;
        let mut nesting = Nesting::new();
        while let Some(ch) = self.peek_char() {
            if nesting.is_top_level() && delimiters.contains(&ch) {
                break;
            }
            let len = nesting.consume(self.remaining());
            self.advance(len);
        }
        self.input[start..self.pos]
            .trim_matches(is_whitespace)
            .to_string()
    }
}
