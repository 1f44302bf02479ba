use thiserror::Error;

use crate::kind::MarkupKind;

/// Returned when a generic markup node is converted to a typed view of the
/// wrong kind, e.g. treating a `Paragraph` node as a `Heading`.
///
/// Kind mismatches discovered *inside* the tree (a list holding a non-item
/// child) are programmer errors and panic instead; only the typed
/// re-wrapping at the public boundary is recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot view a `{actual}` node as `{requested}`")]
pub struct ConversionError {
    /// The kind the node actually has.
    pub actual: MarkupKind,
    /// The kind the caller asked for.
    pub requested: MarkupKind,
}

impl ConversionError {
    pub fn new(actual: MarkupKind, requested: MarkupKind) -> Self {
        Self { actual, requested }
    }
}
