use std::fmt;
use std::path::PathBuf;

/// A 0-based position in the source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// 0-based line number
    pub line: usize,
    /// 0-based column (character offset within the line)
    pub column: usize,
    /// 0-based character offset from the start of input
    pub offset: usize,
}

/// Malformed document structure: an unclosed block or list, or content
/// left over after the last statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub position: Position,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        SyntaxError {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (at position {})",
            self.message, self.position.offset
        )
    }
}

impl std::error::Error for SyntaxError {}

/// Everything that can stop a compiler run.
#[derive(Debug)]
pub enum DriverError {
    /// Bad invocation, reported before any document is read.
    Usage(String),
    /// A document could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A document could not be parsed.
    Syntax { path: PathBuf, source: SyntaxError },
    /// Nothing to output: no documents found, or the symbol filter matched nothing.
    EmptyResult(String),
    Json(serde_json::Error),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Usage(msg) => write!(f, "{msg}"),
            DriverError::Io { path, .. } => write!(f, "Unable to read {}", path.display()),
            DriverError::Syntax { path, .. } => write!(f, "Failed to parse {}", path.display()),
            DriverError::EmptyResult(msg) => write!(f, "{msg}"),
            DriverError::Json(e) => write!(f, "JSON serialization failed: {e}"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Io { source, .. } => Some(source),
            DriverError::Syntax { source, .. } => Some(source),
            DriverError::Json(e) => Some(e),
            DriverError::Usage(_) | DriverError::EmptyResult(_) => None,
        }
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(e: serde_json::Error) -> Self {
        DriverError::Json(e)
    }
}

impl DriverError {
    /// True for failures caused by the query or the inputs rather than by a
    /// malformed document.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, DriverError::EmptyResult(_))
    }
}
