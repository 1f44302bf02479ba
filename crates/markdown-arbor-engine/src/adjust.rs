//! Re-mapping of sub-parse positions into outer-document coordinates.
//!
//! A line run's text is stripped of indentation and joined before it is
//! handed to the CommonMark core, so the sub-parse reports positions
//! relative to that logical text: line 1 column 1 is the first stripped
//! character. This pass walks the freshly built sub-tree and rewrites every
//! recorded range back into the outer document's coordinates: the line
//! number shifts by the run's starting line, and each column gains back the
//! bytes that were stripped from the front of that particular line.
//!
//! The rewrite mutates node headers in place through the parse-phase range
//! path. That is safe here and only here: the nodes were just built by the
//! sub-parse and no caller has seen them yet.

use std::rc::Rc;

use markdown_arbor_tree::{RawNode, SourceLocation, SourceRange};

pub(crate) struct RangeAdjuster {
    /// Line number the sub-parsed text started at in the outer document.
    start_line: usize,
    /// Bytes stripped from the front of each line of the logical text,
    /// indexed by 0-based sub-parse line number.
    trimmed_per_line: Vec<usize>,
    total: Option<SourceRange>,
}

impl RangeAdjuster {
    pub(crate) fn new(start_line: usize, trimmed_per_line: Vec<usize>) -> Self {
        Self {
            start_line,
            trimmed_per_line,
            total: None,
        }
    }

    /// Rewrites `node`'s range and every descendant's, accumulating the
    /// union of everything visited.
    pub(crate) fn adjust(&mut self, node: &Rc<RawNode>) {
        if let Some(range) = node.parsed_range() {
            let adjusted = SourceRange::new(
                self.adjust_location(range.start),
                self.adjust_location(range.end),
            );
            SourceRange::accumulate(&mut self.total, &adjusted);
            node.set_parsed_range_during_parse(adjusted);
        }
        for child in node.children() {
            self.adjust(child);
        }
    }

    fn adjust_location(&self, location: SourceLocation) -> SourceLocation {
        // a sub-parse can report a line past the recorded set (e.g. a range
        // ending just after the final newline); clamp the lookup instead of
        // treating it as an error
        let trimmed = if self.trimmed_per_line.is_empty() {
            0
        } else {
            let index = (location.line - 1).min(self.trimmed_per_line.len() - 1);
            self.trimmed_per_line[index]
        };
        SourceLocation::new(
            self.start_line + (location.line - 1),
            location.column + trimmed,
            location.source,
        )
    }

    /// Union of every adjusted range seen so far, for the enclosing
    /// container's own range.
    pub(crate) fn total_range(&self) -> Option<&SourceRange> {
        self.total.as_ref()
    }
}
