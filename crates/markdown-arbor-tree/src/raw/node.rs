//! Immutable, reference-counted tree nodes.
//!
//! A `RawNode` is pure structure: a payload, a child array, and precomputed
//! counts. It knows nothing about identity or parents; those are layered on
//! by [`crate::node::MarkupNode`]. Nodes are shared freely between trees:
//! an edit builds new nodes along the edited path and reuses every other
//! subtree by reference.

use std::cell::RefCell;
use std::rc::Rc;

use crate::kind::MarkupKind;
use crate::source::SourceRange;

use super::data::{
    Checkbox, ColumnAlignment, DirectiveArgumentText, RawData,
};

pub struct RawNode {
    data: RawData,
    children: Box<[Rc<RawNode>]>,
    /// 1 + the subtree counts of all children. Lets preorder offsets be
    /// computed by summation instead of traversal.
    subtree_count: usize,
    /// Set by parsing, cleared by edits. Interior mutability exists only for
    /// the range-adjustment pass over freshly built sub-parses; nothing else
    /// may write through it.
    parsed_range: RefCell<Option<SourceRange>>,
}

impl std::fmt::Debug for RawNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawNode")
            .field("data", &self.data)
            .field("subtree_count", &self.subtree_count)
            .field("parsed_range", &self.parsed_range.borrow())
            .field("children", &self.children)
            .finish()
    }
}

/// Structural preconditions per kind. Violations are internal bugs in
/// whatever built the children, so they abort instead of erroring.
fn check_structure(data: &RawData, children: &[Rc<RawNode>]) {
    fn require_all(parent: MarkupKind, children: &[Rc<RawNode>], expected: MarkupKind) {
        for child in children {
            if child.kind() != expected {
                panic!(
                    "a `{parent}` node may only contain `{expected}` children, found `{}`",
                    child.kind()
                );
            }
        }
    }

    match data.kind() {
        MarkupKind::List => require_all(MarkupKind::List, children, MarkupKind::ListItem),
        MarkupKind::TableHead => {
            require_all(MarkupKind::TableHead, children, MarkupKind::TableCell)
        }
        MarkupKind::TableRow => require_all(MarkupKind::TableRow, children, MarkupKind::TableCell),
        MarkupKind::TableBody => require_all(MarkupKind::TableBody, children, MarkupKind::TableRow),
        MarkupKind::Table => {
            let kinds: Vec<MarkupKind> = children.iter().map(|c| c.kind()).collect();
            if kinds != [MarkupKind::TableHead, MarkupKind::TableBody] {
                panic!("a `Table` node must contain exactly a `TableHead` and a `TableBody`, found {kinds:?}");
            }
        }
        _ => {}
    }
}

impl RawNode {
    fn new_node(
        data: RawData,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        check_structure(&data, &children);
        Self::new_unchecked(data, parsed_range, children)
    }

    fn new_unchecked(
        data: RawData,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        let subtree_count = 1 + children.iter().map(|c| c.subtree_count).sum::<usize>();
        Rc::new(RawNode {
            data,
            children: children.into_boxed_slice(),
            subtree_count,
            parsed_range: RefCell::new(parsed_range),
        })
    }

    pub fn data(&self) -> &RawData {
        &self.data
    }

    pub fn kind(&self) -> MarkupKind {
        self.data.kind()
    }

    /// Number of direct children. O(1).
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Number of nodes in this subtree, including this node. O(1).
    pub fn subtree_count(&self) -> usize {
        self.subtree_count
    }

    pub fn parsed_range(&self) -> Option<SourceRange> {
        self.parsed_range.borrow().clone()
    }

    /// Overwrites the parsed range during the parsing phase. This is the one
    /// sanctioned exception to node immutability: it exists for the range
    /// adjuster, which only touches nodes a sub-parse just built and no
    /// external holder can see yet. Not part of the public API.
    #[doc(hidden)]
    pub fn set_parsed_range_during_parse(&self, range: SourceRange) {
        *self.parsed_range.borrow_mut() = Some(range);
    }

    pub fn child(&self, index: usize) -> Option<&Rc<RawNode>> {
        self.children.get(index)
    }

    pub fn children(&self) -> &[Rc<RawNode>] {
        &self.children
    }

    /// Materializes the child array as an owned vector of shared handles.
    pub fn copy_children(&self) -> Vec<Rc<RawNode>> {
        self.children.to_vec()
    }

    /// A new node identical to this one except for the child at `index`.
    /// All other children are shared by reference. With `preserve_range` the
    /// new node keeps this node's parsed range; without it the range comes
    /// from the replacement (usually `None` for fresh edits, which is how
    /// edited ancestors lose their recorded positions).
    pub fn substituting_child(
        &self,
        new_child: Rc<RawNode>,
        index: usize,
        preserve_range: bool,
    ) -> Rc<RawNode> {
        assert!(
            index < self.children.len(),
            "child index {index} out of bounds for `{}` with {} children",
            self.kind(),
            self.children.len()
        );
        let range = if preserve_range {
            self.parsed_range()
        } else {
            new_child.parsed_range()
        };
        let mut children = self.copy_children();
        children[index] = new_child;
        Self::new_node(self.data.clone(), range, children)
    }

    /// A new node with the same payload and a wholly new child list. The
    /// parsed range is dropped: the content changed. Structural rules for
    /// this kind are re-checked.
    pub fn with_children(&self, children: Vec<Rc<RawNode>>) -> Rc<RawNode> {
        Self::new_node(self.data.clone(), None, children)
    }

    /// Like [`RawNode::with_children`] but skips the per-kind structural
    /// checks. For builders that have already validated the children.
    pub fn with_unchecked_children(&self, children: Vec<Rc<RawNode>>) -> Rc<RawNode> {
        Self::new_unchecked(self.data.clone(), None, children)
    }

    /// A new node with different payload over the same shared children.
    /// Panics if the payload changes kind; payload edits are not allowed to
    /// re-kind a node.
    pub fn with_data(&self, data: RawData) -> Rc<RawNode> {
        assert_eq!(
            data.kind(),
            self.kind(),
            "payload replacement must not change the node kind"
        );
        Self::new_unchecked(data, None, self.copy_children())
    }

    /// Recursive structural equality: same kinds, same payloads, same child
    /// shapes, ignoring parsed ranges and identity. Shared subtrees
    /// short-circuit on pointer identity, so comparing a tree against a
    /// lightly edited copy touches only the changed path.
    pub fn has_same_structure(self: &Rc<Self>, other: &Rc<RawNode>) -> bool {
        if Rc::ptr_eq(self, other) {
            return true;
        }
        if self.subtree_count != other.subtree_count
            || self.children.len() != other.children.len()
            || !self.data.matches(&other.data)
        {
            return false;
        }
        self.children
            .iter()
            .zip(other.children.iter())
            .all(|(a, b)| a.has_same_structure(b))
    }
}

// One constructor per kind. Each takes the kind's payload, an optional
// parsed range, and children where the kind has them.
impl RawNode {
    pub fn document(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::Document, parsed_range, children)
    }

    pub fn block_quote(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::BlockQuote, parsed_range, children)
    }

    pub fn code_block(
        language: Option<String>,
        content: String,
        parsed_range: Option<SourceRange>,
    ) -> Rc<RawNode> {
        Self::new_node(
            RawData::CodeBlock { language, content },
            parsed_range,
            Vec::new(),
        )
    }

    pub fn heading(
        level: u32,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::Heading { level }, parsed_range, children)
    }

    pub fn html_block(html: String, parsed_range: Option<SourceRange>) -> Rc<RawNode> {
        Self::new_node(RawData::HtmlBlock { html }, parsed_range, Vec::new())
    }

    pub fn list(
        ordered: bool,
        start: Option<u64>,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::List { ordered, start }, parsed_range, children)
    }

    pub fn list_item(
        checkbox: Option<Checkbox>,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::ListItem { checkbox }, parsed_range, children)
    }

    pub fn paragraph(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::Paragraph, parsed_range, children)
    }

    pub fn thematic_break(parsed_range: Option<SourceRange>) -> Rc<RawNode> {
        Self::new_node(RawData::ThematicBreak, parsed_range, Vec::new())
    }

    pub fn custom_block(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::CustomBlock, parsed_range, children)
    }

    pub fn block_directive(
        name: String,
        name_range: Option<SourceRange>,
        argument_text: DirectiveArgumentText,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(
            RawData::BlockDirective {
                name,
                name_range,
                argument_text,
            },
            parsed_range,
            children,
        )
    }

    pub fn table(
        column_alignments: Vec<ColumnAlignment>,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(
            RawData::Table { column_alignments },
            parsed_range,
            children,
        )
    }

    pub fn table_head(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::TableHead, parsed_range, children)
    }

    pub fn table_body(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::TableBody, parsed_range, children)
    }

    pub fn table_row(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::TableRow, parsed_range, children)
    }

    pub fn table_cell(
        colspan: u32,
        rowspan: u32,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(
            RawData::TableCell { colspan, rowspan },
            parsed_range,
            children,
        )
    }

    pub fn text(content: String, parsed_range: Option<SourceRange>) -> Rc<RawNode> {
        Self::new_node(RawData::Text { content }, parsed_range, Vec::new())
    }

    pub fn emphasis(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::Emphasis, parsed_range, children)
    }

    pub fn strong(parsed_range: Option<SourceRange>, children: Vec<Rc<RawNode>>) -> Rc<RawNode> {
        Self::new_node(RawData::Strong, parsed_range, children)
    }

    pub fn strikethrough(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::Strikethrough, parsed_range, children)
    }

    pub fn link(
        destination: Option<String>,
        title: Option<String>,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(
            RawData::Link { destination, title },
            parsed_range,
            children,
        )
    }

    pub fn image(
        source: Option<String>,
        title: Option<String>,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::Image { source, title }, parsed_range, children)
    }

    pub fn inline_code(code: String, parsed_range: Option<SourceRange>) -> Rc<RawNode> {
        Self::new_node(RawData::InlineCode { code }, parsed_range, Vec::new())
    }

    pub fn symbol_link(
        destination: Option<String>,
        parsed_range: Option<SourceRange>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::SymbolLink { destination }, parsed_range, Vec::new())
    }

    pub fn inline_html(html: String, parsed_range: Option<SourceRange>) -> Rc<RawNode> {
        Self::new_node(RawData::InlineHtml { html }, parsed_range, Vec::new())
    }

    pub fn custom_inline(text: String, parsed_range: Option<SourceRange>) -> Rc<RawNode> {
        Self::new_node(RawData::CustomInline { text }, parsed_range, Vec::new())
    }

    pub fn line_break(parsed_range: Option<SourceRange>) -> Rc<RawNode> {
        Self::new_node(RawData::LineBreak, parsed_range, Vec::new())
    }

    pub fn soft_break(parsed_range: Option<SourceRange>) -> Rc<RawNode> {
        Self::new_node(RawData::SoftBreak, parsed_range, Vec::new())
    }

    pub fn inline_attributes(
        attributes: String,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(
            RawData::InlineAttributes { attributes },
            parsed_range,
            children,
        )
    }

    pub fn doxygen_discussion(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::DoxygenDiscussion, parsed_range, children)
    }

    pub fn doxygen_note(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::DoxygenNote, parsed_range, children)
    }

    pub fn doxygen_abstract(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::DoxygenAbstract, parsed_range, children)
    }

    pub fn doxygen_parameter(
        name: String,
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::DoxygenParameter { name }, parsed_range, children)
    }

    pub fn doxygen_returns(
        parsed_range: Option<SourceRange>,
        children: Vec<Rc<RawNode>>,
    ) -> Rc<RawNode> {
        Self::new_node(RawData::DoxygenReturns, parsed_range, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceLocation;

    fn range(l1: usize, c1: usize, l2: usize, c2: usize) -> SourceRange {
        SourceRange::new(
            SourceLocation::new(l1, c1, None),
            SourceLocation::new(l2, c2, None),
        )
    }

    fn sample_paragraph(text: &str) -> Rc<RawNode> {
        RawNode::paragraph(None, vec![RawNode::text(text.to_string(), None)])
    }

    #[test]
    fn counts_are_consistent() {
        let doc = RawNode::document(
            None,
            vec![sample_paragraph("a"), sample_paragraph("b")],
        );
        assert_eq!(doc.child_count(), 2);
        // document + 2 * (paragraph + text)
        assert_eq!(doc.subtree_count(), 5);
        for child in doc.children() {
            assert_eq!(
                child.subtree_count(),
                1 + child
                    .children()
                    .iter()
                    .map(|c| c.subtree_count())
                    .sum::<usize>()
            );
        }
    }

    #[test]
    fn substituting_child_shares_untouched_siblings() {
        let keep = sample_paragraph("keep");
        let doc = RawNode::document(None, vec![sample_paragraph("old"), keep.clone()]);
        let edited = doc.substituting_child(sample_paragraph("new"), 0, false);

        assert!(Rc::ptr_eq(edited.child(1).unwrap(), &keep));
        assert!(!Rc::ptr_eq(edited.child(0).unwrap(), doc.child(0).unwrap()));
        assert_eq!(edited.subtree_count(), doc.subtree_count());
    }

    #[test]
    fn substituting_child_range_handling() {
        let doc = RawNode::document(
            Some(range(1, 1, 3, 1)),
            vec![sample_paragraph("a"), sample_paragraph("b")],
        );
        let preserved = doc.substituting_child(sample_paragraph("x"), 0, true);
        assert_eq!(preserved.parsed_range(), Some(range(1, 1, 3, 1)));

        let dropped = doc.substituting_child(sample_paragraph("x"), 0, false);
        assert_eq!(dropped.parsed_range(), None);
    }

    #[test]
    fn same_structure_ignores_ranges() {
        let a = RawNode::document(Some(range(1, 1, 2, 1)), vec![sample_paragraph("hi")]);
        let b = RawNode::document(None, vec![sample_paragraph("hi")]);
        assert!(a.has_same_structure(&b));
        assert!(b.has_same_structure(&a));

        let c = RawNode::document(None, vec![sample_paragraph("bye")]);
        assert!(!a.has_same_structure(&c));
    }

    #[test]
    fn same_structure_detects_kind_change() {
        let para = RawNode::document(None, vec![sample_paragraph("x")]);
        let quote = RawNode::document(
            None,
            vec![RawNode::block_quote(None, vec![sample_paragraph("x")])],
        );
        assert!(!para.has_same_structure(&quote));
    }

    #[test]
    #[should_panic(expected = "may only contain `ListItem` children")]
    fn list_rejects_non_item_children() {
        RawNode::list(false, None, None, vec![sample_paragraph("not an item")]);
    }

    #[test]
    #[should_panic(expected = "must contain exactly a `TableHead` and a `TableBody`")]
    fn table_requires_head_and_body() {
        RawNode::table(Vec::new(), None, vec![RawNode::table_head(None, Vec::new())]);
    }

    #[test]
    #[should_panic(expected = "may only contain `TableRow` children")]
    fn table_body_rejects_non_rows() {
        RawNode::table_body(None, vec![RawNode::table_cell(1, 1, None, Vec::new())]);
    }

    #[test]
    fn with_data_keeps_children_and_drops_range() {
        let heading = RawNode::heading(
            1,
            Some(range(1, 1, 1, 8)),
            vec![RawNode::text("Title".to_string(), None)],
        );
        let renumbered = heading.with_data(RawData::Heading { level: 3 });
        assert_eq!(renumbered.parsed_range(), None);
        assert_eq!(renumbered.child_count(), 1);
        assert!(Rc::ptr_eq(
            renumbered.child(0).unwrap(),
            heading.child(0).unwrap()
        ));
    }
}
