use serde::Serialize;

/// JSON formatting style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsonStyle {
    /// Compact: no whitespace between tokens.
    Compact,
    /// Pretty: 2-space indented, one entry per line.
    Pretty,
}

impl JsonStyle {
    pub fn from_pretty(pretty: bool) -> Self {
        if pretty {
            JsonStyle::Pretty
        } else {
            JsonStyle::Compact
        }
    }
}

/// Serialize any output shape, followed by a trailing newline.
pub fn to_json<T: Serialize + ?Sized>(value: &T, style: JsonStyle) -> serde_json::Result<String> {
    let mut out = match style {
        JsonStyle::Compact => serde_json::to_string(value)?,
        JsonStyle::Pretty => serde_json::to_string_pretty(value)?,
    };
    out.push('\n');
    Ok(out)
}
