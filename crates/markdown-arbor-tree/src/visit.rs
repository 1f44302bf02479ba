//! Traversal contracts over markup trees.
//!
//! Three traits share one dispatch scheme: every node kind has exactly one
//! entry point, unhandled kinds route to a default, and traversal into
//! children only happens when an entry point explicitly asks for it. That
//! last part is deliberate: a visitor that does not descend prunes the
//! subtree, which is how consumers skip regions cheaply.
//!
//! - [`MarkupWalker`]: read-only walk, no results.
//! - [`MarkupRewriter`]: produces a rewritten tree; returning `None` from an
//!   entry point deletes that node.
//! - [`MarkupVisitor`]: produces a caller-chosen result per visited node.

use std::rc::Rc;

use crate::kind::MarkupKind;
use crate::node::MarkupNode;
use crate::raw::RawNode;
use crate::typed;

macro_rules! markup_visitors {
    ($( $kind:ident => $visit:ident / $rewrite:ident ),* $(,)?) => {
        /// Read-only traversal. Override the entry points for the kinds you
        /// care about and call [`MarkupWalker::descend_into`] wherever the
        /// walk should continue below the current node.
        pub trait MarkupWalker {
            /// Entry point for kinds without a dedicated override.
            fn visit_default(&mut self, node: &MarkupNode) {
                self.descend_into(node);
            }

            /// Walks each child of `node`. Never called automatically; an
            /// entry point that skips it stops the walk at `node`.
            fn descend_into(&mut self, node: &MarkupNode) {
                for child in node.children() {
                    self.walk(&child);
                }
            }

            /// Dispatches `node` to the entry point for its kind.
            fn walk(&mut self, node: &MarkupNode) {
                match node.kind() {
                    $(
                        MarkupKind::$kind => {
                            let view = typed::$kind::from_markup_unchecked(node.clone());
                            self.$visit(&view);
                        }
                    )*
                }
            }

            $(
                #[doc = concat!("Entry point for `", stringify!($kind), "` nodes.")]
                fn $visit(&mut self, view: &typed::$kind) {
                    self.visit_default(view.as_markup());
                }
            )*
        }

        /// Tree-producing traversal. Each entry point returns the node's
        /// replacement; `None` deletes the node from its parent. The default
        /// keeps the node and rewrites its children.
        pub trait MarkupRewriter {
            /// Entry point for kinds without a dedicated override: keep the
            /// node, rewrite below it.
            fn rewrite_default(&mut self, node: &MarkupNode) -> Option<MarkupNode> {
                Some(self.rewrite_children(node))
            }

            /// Rebuilds `node` from the rewritten forms of its children,
            /// dropping children whose entry point returned `None`. A node
            /// whose children all come back unchanged is returned as-is, so
            /// untouched subtrees stay shared with the input tree.
            fn rewrite_children(&mut self, node: &MarkupNode) -> MarkupNode {
                let mut new_children: Vec<Rc<RawNode>> = Vec::with_capacity(node.child_count());
                let mut changed = false;
                for child in node.children() {
                    match self.rewrite(&child) {
                        Some(replacement) => {
                            changed |= !Rc::ptr_eq(replacement.raw(), child.raw());
                            new_children.push(replacement.raw().clone());
                        }
                        None => changed = true,
                    }
                }
                if changed {
                    MarkupNode::new_root(node.raw().with_unchecked_children(new_children))
                } else {
                    node.clone()
                }
            }

            /// Dispatches `node` to the entry point for its kind.
            fn rewrite(&mut self, node: &MarkupNode) -> Option<MarkupNode> {
                match node.kind() {
                    $(
                        MarkupKind::$kind => {
                            let view = typed::$kind::from_markup_unchecked(node.clone());
                            self.$rewrite(&view)
                        }
                    )*
                }
            }

            $(
                #[doc = concat!("Entry point for `", stringify!($kind), "` nodes.")]
                fn $rewrite(&mut self, view: &typed::$kind) -> Option<MarkupNode> {
                    self.rewrite_default(view.as_markup())
                }
            )*
        }

        /// Result-producing traversal with a caller-chosen result type.
        /// Descending is the implementor's business; entry points compute
        /// their result however they like, usually from children visited
        /// through [`MarkupVisitor::visit`].
        pub trait MarkupVisitor {
            type Result;

            /// Entry point for kinds without a dedicated override.
            fn visit_default(&mut self, node: &MarkupNode) -> Self::Result;

            /// Dispatches `node` to the entry point for its kind.
            fn visit(&mut self, node: &MarkupNode) -> Self::Result {
                match node.kind() {
                    $(
                        MarkupKind::$kind => {
                            let view = typed::$kind::from_markup_unchecked(node.clone());
                            self.$visit(&view)
                        }
                    )*
                }
            }

            $(
                #[doc = concat!("Entry point for `", stringify!($kind), "` nodes.")]
                fn $visit(&mut self, view: &typed::$kind) -> Self::Result {
                    self.visit_default(view.as_markup())
                }
            )*
        }
    };
}

markup_visitors! {
    Document => visit_document / rewrite_document,
    BlockQuote => visit_block_quote / rewrite_block_quote,
    CodeBlock => visit_code_block / rewrite_code_block,
    Heading => visit_heading / rewrite_heading,
    HtmlBlock => visit_html_block / rewrite_html_block,
    List => visit_list / rewrite_list,
    ListItem => visit_list_item / rewrite_list_item,
    Paragraph => visit_paragraph / rewrite_paragraph,
    ThematicBreak => visit_thematic_break / rewrite_thematic_break,
    CustomBlock => visit_custom_block / rewrite_custom_block,
    BlockDirective => visit_block_directive / rewrite_block_directive,
    Table => visit_table / rewrite_table,
    TableHead => visit_table_head / rewrite_table_head,
    TableBody => visit_table_body / rewrite_table_body,
    TableRow => visit_table_row / rewrite_table_row,
    TableCell => visit_table_cell / rewrite_table_cell,
    Text => visit_text / rewrite_text,
    Emphasis => visit_emphasis / rewrite_emphasis,
    Strong => visit_strong / rewrite_strong,
    Strikethrough => visit_strikethrough / rewrite_strikethrough,
    Link => visit_link / rewrite_link,
    Image => visit_image / rewrite_image,
    InlineCode => visit_inline_code / rewrite_inline_code,
    SymbolLink => visit_symbol_link / rewrite_symbol_link,
    InlineHtml => visit_inline_html / rewrite_inline_html,
    CustomInline => visit_custom_inline / rewrite_custom_inline,
    LineBreak => visit_line_break / rewrite_line_break,
    SoftBreak => visit_soft_break / rewrite_soft_break,
    InlineAttributes => visit_inline_attributes / rewrite_inline_attributes,
    DoxygenDiscussion => visit_doxygen_discussion / rewrite_doxygen_discussion,
    DoxygenNote => visit_doxygen_note / rewrite_doxygen_note,
    DoxygenAbstract => visit_doxygen_abstract / rewrite_doxygen_abstract,
    DoxygenParameter => visit_doxygen_parameter / rewrite_doxygen_parameter,
    DoxygenReturns => visit_doxygen_returns / rewrite_doxygen_returns,
}
