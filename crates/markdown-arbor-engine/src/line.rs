//! One line of parser input.
//!
//! The container parser is line-oriented: input is split into [`ParseLine`]s
//! up front, and every piece of directive machinery consumes characters
//! through a line's movable cursor. A line always remembers its original
//! untrimmed text, so source columns can be reconstructed no matter how much
//! syntax has been consumed.

use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

use markdown_arbor_tree::{SourceLocation, SourceRange};

/// Width of `ch` when it lands at 0-based `column`: a tab advances to the
/// next multiple of four columns, everything else is one column wide.
fn column_width(ch: char, column: usize) -> usize {
    if ch == '\t' { 4 - (column % 4) } else { 1 }
}

#[derive(Debug, Clone)]
pub(crate) struct ParseLine {
    text: String,
    /// Byte offset of the parse cursor into `text`.
    cursor: usize,
    /// 1-based line number in the outer document.
    number: usize,
    source: Option<Arc<PathBuf>>,
}

impl ParseLine {
    pub(crate) fn new(
        text: impl Into<String>,
        number: usize,
        source: Option<Arc<PathBuf>>,
    ) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            number,
            source,
        }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn number(&self) -> usize {
        self.number
    }

    pub(crate) fn source(&self) -> Option<Arc<PathBuf>> {
        self.source.clone()
    }

    /// The unconsumed remainder of the line.
    pub(crate) fn rest(&self) -> &str {
        &self.text[self.cursor..]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.cursor >= self.text.len()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Rewinds to a cursor obtained from [`ParseLine::cursor`]. Used to back
    /// out of speculative matches.
    pub(crate) fn restore(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.cursor += ch.len_utf8();
        Some(ch)
    }

    /// Consumes spaces and tabs, returning how many bytes were skipped.
    pub(crate) fn skip_whitespace(&mut self) -> usize {
        let before = self.cursor;
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.bump();
        }
        self.cursor - before
    }

    /// Consumes characters while `pred` holds, returning the consumed byte
    /// range within the line's text.
    pub(crate) fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> Range<usize> {
        let start = self.cursor;
        while matches!(self.peek(), Some(ch) if pred(ch)) {
            self.bump();
        }
        start..self.cursor
    }

    /// Location of the cursor. Columns are 1-based byte offsets.
    pub(crate) fn location(&self) -> SourceLocation {
        self.location_at(self.cursor)
    }

    pub(crate) fn location_at(&self, byte: usize) -> SourceLocation {
        SourceLocation::new(self.number, byte + 1, self.source.clone())
    }

    pub(crate) fn end_location(&self) -> SourceLocation {
        self.location_at(self.text.len())
    }

    /// Range of `[start, end)` byte offsets within this line.
    pub(crate) fn range_of(&self, bytes: Range<usize>) -> SourceRange {
        SourceRange::new(self.location_at(bytes.start), self.location_at(bytes.end))
    }

    /// True when nothing but whitespace remains at the cursor.
    pub(crate) fn is_blank(&self) -> bool {
        self.rest().trim().is_empty()
    }

    /// Columns of whitespace at the cursor, tab stops every four columns.
    pub(crate) fn indentation_column_count(&self) -> usize {
        let mut column = 0;
        for ch in self.text[..self.cursor].chars() {
            column += column_width(ch, column);
        }
        let base = column;
        for ch in self.rest().chars() {
            if ch == ' ' || ch == '\t' {
                column += column_width(ch, column);
            } else {
                break;
            }
        }
        column - base
    }

    /// True when the remainder, after whitespace, opens a code fence.
    pub(crate) fn looks_like_code_fence(&self) -> bool {
        let trimmed = self.rest().trim_start();
        trimmed.starts_with("```") || trimmed.starts_with("~~~")
    }

    /// The remainder after stripping up to `columns` columns of leading
    /// whitespace, never consuming a non-whitespace character. Returns the
    /// stripped text and the total number of bytes removed from the front of
    /// the original line (consumed syntax plus stripped indentation), which
    /// is the per-line figure the range adjuster later adds back to columns.
    pub(crate) fn trimmed_for_sub_parse(&self, columns: usize) -> (&str, usize) {
        let mut stripped_columns = 0;
        let mut bytes = 0;
        for ch in self.rest().chars() {
            if stripped_columns >= columns {
                break;
            }
            match ch {
                ' ' => stripped_columns += 1,
                '\t' => stripped_columns = (stripped_columns / 4 + 1) * 4,
                _ => break,
            }
            bytes += ch.len_utf8();
        }
        (&self.rest()[bytes..], self.cursor + bytes)
    }
}
