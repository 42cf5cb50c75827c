//! Flat nesting tracker shared by the parser's expression reader and the
//! compiler's segment splitter.
//!
//! Delimiters such as `;`, `,`, `=` or `.` only count when every depth
//! counter is zero and no string is open. Counters never go below zero, so a
//! closer that was never opened is plain text.

const TRIPLE_QUOTE: &str = "\"\"\"";

#[derive(Debug, Clone, Copy, PartialEq)]
enum StringMode {
    Single,
    Double,
    Triple,
}

#[derive(Debug, Default)]
pub(crate) struct Nesting {
    paren: usize,
    brace: usize,
    bracket: usize,
    string: Option<StringMode>,
}

impl Nesting {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// True when the next character would be seen outside every group and string.
    pub(crate) fn is_top_level(&self) -> bool {
        self.string.is_none() && self.paren == 0 && self.brace == 0 && self.bracket == 0
    }

    /// Step over the next unit of `rest` and return its length in bytes.
    ///
    /// A unit is one character, a backslash escape pair inside a single- or
    /// double-quoted string, or a `"""` run that opens or closes a triple
    /// quoted string.
    pub(crate) fn consume(&mut self, rest: &str) -> usize {
        let mut chars = rest.chars();
        let Some(ch) = chars.next() else {
            return 0;
        };

        match self.string {
            Some(StringMode::Triple) => {
                if rest.starts_with(TRIPLE_QUOTE) {
                    self.string = None;
                    return TRIPLE_QUOTE.len();
                }
                return ch.len_utf8();
            }
            Some(mode) => {
                if ch == '\\' {
                    return ch.len_utf8() + chars.next().map_or(0, char::len_utf8);
                }
                let closes = match mode {
                    StringMode::Single => ch == '\'',
                    _ => ch == '"',
                };
                if closes {
                    self.string = None;
                }
                return ch.len_utf8();
            }
            None => {}
        }

        match ch {
            '(' => self.paren += 1,
            ')' => self.paren = self.paren.saturating_sub(1),
            '{' => self.brace += 1,
            '}' => self.brace = self.brace.saturating_sub(1),
            '[' => self.bracket += 1,
            ']' => self.bracket = self.bracket.saturating_sub(1),
            '"' if rest.starts_with(TRIPLE_QUOTE) => {
                self.string = Some(StringMode::Triple);
                return TRIPLE_QUOTE.len();
            }
            '"' => self.string = Some(StringMode::Double),
            '\'' => self.string = Some(StringMode::Single),
            _ => {}
        }
        ch.len_utf8()
    }
}

/// Whitespace between tokens: the ASCII set plus the Unicode space separators.
pub(crate) fn is_whitespace(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\n'
            | '\u{000B}'
            | '\u{000C}'
            | '\r'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}
