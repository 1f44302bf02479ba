//! Raw storage layer: payloads and shared immutable nodes.

mod data;
mod node;

pub use data::{
    Checkbox, ColumnAlignment, DirectiveArgumentText, DirectiveArgumentTextSegment, RawData,
};
pub use node::RawNode;
