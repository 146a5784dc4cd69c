//! Source offsets and their line/column form.

use serde::{Deserialize, Serialize};
pub use text_size::{TextRange, TextSize};

/// A source location: byte offset plus line and column.
///
/// Whether `line`/`column` count from 0 or 1 is decided by the
/// [`crate::CorrelateConfig`] used to produce it; columns count bytes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// Pre-computed line starts for one snapshot of a source file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    line_ends: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![TextSize::from(0)];
        let mut line_ends = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                b'\r' => {
                    let width = if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + width) as u32));
                    i += width;
                }
                _ => i += 1,
            }
        }
        line_ends.push(TextSize::of(text));

        Self {
            line_starts,
            line_ends,
            text_len: TextSize::of(text),
        }
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.text_len
    }

    /// Zero-based line containing `offset`. Offsets past the end clamp to the
    /// last line.
    pub fn line_of(&self, offset: TextSize) -> u32 {
        let offset = offset.min(self.text_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        };
        line as u32
    }

    /// Zero-based `(line, column)` of `offset`; a column inside a line break
    /// clamps to the line end.
    pub fn line_col(&self, offset: TextSize) -> (u32, u32) {
        let line = self.line_of(offset);
        let start = self.line_starts[line as usize];
        let end = self.line_ends[line as usize];
        let col = offset.min(self.text_len).min(end) - start;
        (line, u32::from(col))
    }

    /// `offset` as a [`Position`] with lines and columns counted from `base`.
    pub fn position(&self, offset: TextSize, base: u32) -> Position {
        let (line, column) = self.line_col(offset);
        Position::new(u32::from(offset), line + base, column + base)
    }
}
