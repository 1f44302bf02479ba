//! Source positions for parsed markup.
//!
//! Locations are 1-based: the first character of a document is line 1,
//! column 1. Columns count bytes within the line, which matches the way the
//! parser slices lines and keeps range arithmetic exact for the adjustment
//! pass.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

/// A single position in a source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: usize,
    /// 1-based byte column within the line.
    pub column: usize,
    /// The file this location came from, if known. Shared so that every
    /// location in a parse references one allocation.
    #[serde(skip)]
    pub source: Option<Arc<PathBuf>>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, source: Option<Arc<PathBuf>>) -> Self {
        Self {
            line,
            column,
            source,
        }
    }

    /// Ordering key ignoring the source file.
    fn pos(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// True if `self` comes before `other` in document order.
    pub fn is_before(&self, other: &SourceLocation) -> bool {
        self.pos() < other.pos()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "{}:", source.display())?;
        }
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range `[start, end)` of source positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// The smallest range covering both `self` and `other`.
    pub fn widened_to(&self, other: &SourceRange) -> SourceRange {
        let start = if other.start.is_before(&self.start) {
            other.start.clone()
        } else {
            self.start.clone()
        };
        let end = if self.end.is_before(&other.end) {
            other.end.clone()
        } else {
            self.end.clone()
        };
        SourceRange { start, end }
    }

    /// Widens `range` in place to cover `other`, or records `other` if no
    /// range has been observed yet.
    pub fn accumulate(range: &mut Option<SourceRange>, other: &SourceRange) {
        match range {
            Some(r) => *r = r.widened_to(other),
            None => *range = Some(other.clone()),
        }
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}:{}", self.start, self.end.line, self.end.column)
    }
}
