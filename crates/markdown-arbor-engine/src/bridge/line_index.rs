//! Byte-offset to line/column translation.

use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

use markdown_arbor_tree::{SourceLocation, SourceRange};

/// Precomputed line starts for one parsed text, so event offsets translate
/// to 1-based line/column pairs by binary search.
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    pub(crate) fn location(
        &self,
        offset: usize,
        source: &Option<Arc<PathBuf>>,
    ) -> SourceLocation {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        SourceLocation::new(line, offset - line_start + 1, source.clone())
    }

    pub(crate) fn range(
        &self,
        bytes: Range<usize>,
        source: &Option<Arc<PathBuf>>,
    ) -> SourceRange {
        SourceRange::new(
            self.location(bytes.start, source),
            self.location(bytes.end, source),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_map_to_lines_and_columns() {
        let index = LineIndex::new("ab\ncde\n\nf");
        let loc = |offset| {
            let l = index.location(offset, &None);
            (l.line, l.column)
        };
        assert_eq!(loc(0), (1, 1));
        assert_eq!(loc(1), (1, 2));
        assert_eq!(loc(3), (2, 1));
        assert_eq!(loc(5), (2, 3));
        assert_eq!(loc(7), (3, 1));
        assert_eq!(loc(8), (4, 1));
        // one past the end lands after the last character
        assert_eq!(loc(9), (4, 2));
    }

    #[test]
    fn empty_text_still_has_a_first_line() {
        let index = LineIndex::new("");
        let l = index.location(0, &None);
        assert_eq!((l.line, l.column), (1, 1));
    }
}
