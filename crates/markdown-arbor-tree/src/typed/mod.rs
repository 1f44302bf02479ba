//! Typed views over node occurrences, one per kind.
//!
//! A typed view is a thin wrapper around a [`MarkupNode`] whose kind has
//! been checked once at construction. Conversion from a generic occurrence
//! goes through `TryFrom` and fails with a [`crate::ConversionError`] naming
//! both kinds. Payload setters rebuild the tree copy-on-write through the
//! occurrence's edit walk and leave the view pointing at the new tree.

use crate::error::ConversionError;
use crate::kind::MarkupKind;
use crate::node::MarkupNode;

/// Declares a typed view struct whose name doubles as its kind variant.
macro_rules! typed_node {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(MarkupNode);

        impl $name {
            /// The generic occurrence behind this view.
            pub fn as_markup(&self) -> &MarkupNode {
                &self.0
            }

            /// Unwraps back into the generic occurrence.
            pub fn into_markup(self) -> MarkupNode {
                self.0
            }

            /// Wraps without re-checking the kind. Callers must have matched
            /// on the kind already; the visitor dispatch does.
            pub(crate) fn from_markup_unchecked(node: MarkupNode) -> Self {
                debug_assert_eq!(node.kind(), MarkupKind::$name);
                Self(node)
            }

            #[allow(dead_code)]
            pub(crate) fn markup_mut(&mut self) -> &mut MarkupNode {
                &mut self.0
            }
        }

        impl TryFrom<MarkupNode> for $name {
            type Error = $crate::ConversionError;

            fn try_from(node: MarkupNode) -> Result<Self, $crate::ConversionError> {
                if node.kind() == MarkupKind::$name {
                    Ok(Self(node))
                } else {
                    Err($crate::ConversionError::new(node.kind(), MarkupKind::$name))
                }
            }
        }

        impl From<$name> for MarkupNode {
            fn from(view: $name) -> MarkupNode {
                view.0
            }
        }
    };
}

pub(crate) use typed_node;

/// Collects child occurrences into the raw handles a constructor needs.
pub(crate) fn raw_children(
    children: impl IntoIterator<Item = MarkupNode>,
) -> Vec<std::rc::Rc<crate::raw::RawNode>> {
    children.into_iter().map(|c| c.raw().clone()).collect()
}

mod blocks;
mod directives;
mod inlines;
mod tables;

pub use blocks::{
    BlockQuote, CodeBlock, CustomBlock, Document, Heading, HtmlBlock, List, ListItem, Paragraph,
    ThematicBreak,
};
pub use directives::{
    BlockDirective, DoxygenAbstract, DoxygenDiscussion, DoxygenNote, DoxygenParameter,
    DoxygenReturns,
};
pub use inlines::{
    CustomInline, Emphasis, Image, InlineAttributes, InlineCode, InlineHtml, LineBreak, Link,
    SoftBreak, Strikethrough, Strong, SymbolLink, Text,
};
pub use tables::{Table, TableBody, TableCell, TableHead, TableRow};
