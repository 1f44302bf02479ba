//! Immutable, structurally-shared markup trees.
//!
//! The tree has three layers. [`RawNode`] is pure structure: an immutable,
//! reference-counted node holding a kind-specific payload, a child array,
//! and a precomputed subtree size. [`MarkupNode`] addresses a raw node
//! within a tree, pairing it with a stable identity and a parent link.
//! The typed views in [`typed`] give each kind its own API over that
//! occurrence, checked once at conversion.
//!
//! Edits never mutate in place: changing a node builds new raw nodes from
//! the edited node up to the root and shares every untouched subtree with
//! the original tree. The root of the edited tree draws a fresh identity,
//! so occurrences of the old and new trees are never identical.
//!
//! Consumers traverse through the visitor contracts in [`visit`], which
//! dispatch exhaustively over the closed kind set and descend only on
//! request.

mod counter;
mod dump;
mod error;
mod identity;
mod kind;
mod node;
mod raw;
mod source;
pub mod typed;
mod visit;

pub use dump::dump_structure;
pub use error::ConversionError;
pub use identity::NodeId;
pub use kind::MarkupKind;
pub use node::{Children, MarkupNode, PathStep, ReverseChildren};
pub use raw::{
    Checkbox, ColumnAlignment, DirectiveArgumentText, DirectiveArgumentTextSegment, RawData,
    RawNode,
};
pub use source::{SourceLocation, SourceRange};
pub use visit::{MarkupRewriter, MarkupVisitor, MarkupWalker};
