//! Node occurrences: raw nodes addressed within a tree.
//!
//! A [`MarkupNode`] pairs a shared raw node with its identity and a link to
//! the parent occurrence it was reached through. Occurrences are cheap,
//! transient values created on demand as a tree is navigated; the tree never
//! materializes them eagerly. Parent links only point upward and an
//! occurrence holds no children, so the link graph cannot form a cycle.

use std::rc::Rc;

use crate::identity::{NodeId, NodeMetadata};
use crate::kind::MarkupKind;
use crate::raw::{RawData, RawNode};
use crate::source::SourceRange;

/// One step of a path lookup: a child index and, optionally, the kind the
/// child is required to have.
pub type PathStep = (usize, Option<MarkupKind>);

/// A node occurrence within a markup tree.
#[derive(Clone)]
pub struct MarkupNode {
    raw: Rc<RawNode>,
    metadata: NodeMetadata,
    parent: Option<Rc<MarkupNode>>,
}

impl std::fmt::Debug for MarkupNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkupNode")
            .field("id", &self.metadata.id)
            .field("index_in_parent", &self.metadata.index_in_parent)
            .field("raw", &self.raw)
            .finish()
    }
}

impl MarkupNode {
    /// Wraps a raw tree as a new root, drawing a fresh root identifier.
    pub fn new_root(raw: Rc<RawNode>) -> MarkupNode {
        MarkupNode {
            raw,
            metadata: NodeMetadata::new_root(),
            parent: None,
        }
    }

    pub fn raw(&self) -> &Rc<RawNode> {
        &self.raw
    }

    pub fn data(&self) -> &RawData {
        self.raw.data()
    }

    pub fn kind(&self) -> MarkupKind {
        self.raw.kind()
    }

    /// This occurrence's identity. Stable for the lifetime of the tree it
    /// belongs to: addressing the same position twice yields the same id.
    pub fn id(&self) -> NodeId {
        self.metadata.id
    }

    pub fn index_in_parent(&self) -> usize {
        self.metadata.index_in_parent
    }

    /// The parent occurrence, or `None` if this is a root.
    pub fn parent(&self) -> Option<&MarkupNode> {
        self.parent.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Walks the parent chain to the root. O(height).
    pub fn root(&self) -> MarkupNode {
        let mut current = self.clone();
        while let Some(parent) = &current.parent {
            current = (**parent).clone();
        }
        current
    }

    /// The range this node was parsed from, if it still reflects a parse.
    /// Edits clear the ranges of every ancestor of the edited node.
    pub fn range(&self) -> Option<SourceRange> {
        self.raw.parsed_range()
    }

    pub fn child_count(&self) -> usize {
        self.raw.child_count()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.child_count() == 0
    }

    /// Lazy forward iterator over child occurrences. Each step is O(1); the
    /// sequence can be restarted by calling `children()` again.
    pub fn children(&self) -> Children {
        Children {
            parent: Rc::new(self.clone()),
            next_index: 0,
            next_metadata: NodeMetadata::first_child(&self.metadata),
        }
    }

    /// Iterator over children from last to first, computed by symmetric
    /// subtraction of subtree counts from the back.
    pub fn children_reversed(&self) -> ReverseChildren {
        let count = self.raw.child_count();
        let next_metadata = self.raw.child(count.wrapping_sub(1)).map(|last| {
            NodeMetadata::last_child(
                &self.metadata,
                self.raw.subtree_count(),
                last.subtree_count(),
                count,
            )
        });
        ReverseChildren {
            parent: Rc::new(self.clone()),
            next_metadata,
        }
    }

    /// The child at `position`, or `None` past the end. Costs O(position) to
    /// locate, because each preceding sibling's subtree size participates in
    /// the child's identity.
    pub fn child_at(&self, position: usize) -> Option<MarkupNode> {
        self.children().nth(position)
    }

    /// Descends through `path`, failing closed: `None` if any index is out
    /// of bounds or an expected kind does not match the node found there.
    pub fn child_through_path(&self, path: &[PathStep]) -> Option<MarkupNode> {
        let mut current = self.clone();
        for (index, expected_kind) in path {
            let child = current.child_at(*index)?;
            if let Some(kind) = expected_kind {
                if child.kind() != *kind {
                    return None;
                }
            }
            current = child;
        }
        Some(current)
    }

    /// This subtree as its own root. Content and ranges are untouched; only
    /// identity and parent linkage change. A node that already is a root is
    /// returned unchanged.
    pub fn detached_from_parent(&self) -> MarkupNode {
        if self.parent.is_none() {
            self.clone()
        } else {
            MarkupNode::new_root(self.raw.clone())
        }
    }

    /// Identity comparison: same root, same position. O(1). Distinct from
    /// structural equality.
    pub fn is_identical_to(&self, other: &MarkupNode) -> bool {
        self.metadata.id == other.metadata.id
    }

    /// Structural comparison ignoring identity and ranges.
    pub fn has_same_structure(&self, other: &MarkupNode) -> bool {
        self.raw.has_same_structure(&other.raw)
    }

    /// Replaces this node's children without checking kind constraints; the
    /// caller vouches for them. Produces a new tree through
    /// [`MarkupNode::replacing_self`] and returns the occurrence of the
    /// rebuilt node within it.
    pub fn with_unchecked_children(&self, children: Vec<Rc<RawNode>>) -> MarkupNode {
        self.replacing_self(self.raw.with_unchecked_children(children), false)
    }

    /// The copy-on-write edit walk: substitute `new_raw` for this node in
    /// its parent, rebuild the parent the same way, and so on to the root,
    /// which receives a fresh identity. Subtrees off the edited path are
    /// shared with the original tree. Returns the occurrence of `new_raw`
    /// inside the new tree.
    pub(crate) fn replacing_self(&self, new_raw: Rc<RawNode>, preserve_range: bool) -> MarkupNode {
        match &self.parent {
            None => MarkupNode::new_root(new_raw),
            Some(parent) => {
                let index = self.metadata.index_in_parent;
                let new_parent_raw = parent.raw.substituting_child(new_raw, index, preserve_range);
                let new_parent = parent.replacing_self(new_parent_raw, preserve_range);
                new_parent
                    .child_at(index)
                    .expect("substituted child exists at its original index")
            }
        }
    }
}

/// Forward iterator over an occurrence's children. See
/// [`MarkupNode::children`].
#[derive(Clone)]
pub struct Children {
    parent: Rc<MarkupNode>,
    next_index: usize,
    next_metadata: NodeMetadata,
}

impl Iterator for Children {
    type Item = MarkupNode;

    fn next(&mut self) -> Option<MarkupNode> {
        let raw = self.parent.raw.child(self.next_index)?.clone();
        let metadata = self.next_metadata;
        self.next_metadata = NodeMetadata::next_sibling(&metadata, raw.subtree_count());
        self.next_index += 1;
        Some(MarkupNode {
            raw,
            metadata,
            parent: Some(self.parent.clone()),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.parent.raw.child_count() - self.next_index;
        (remaining, Some(remaining))
    }
}

/// Reverse iterator over an occurrence's children. See
/// [`MarkupNode::children_reversed`].
#[derive(Clone)]
pub struct ReverseChildren {
    parent: Rc<MarkupNode>,
    next_metadata: Option<NodeMetadata>,
}

impl Iterator for ReverseChildren {
    type Item = MarkupNode;

    fn next(&mut self) -> Option<MarkupNode> {
        let metadata = self.next_metadata?;
        let index = metadata.index_in_parent;
        let raw = self.parent.raw.child(index)?.clone();
        self.next_metadata = if index == 0 {
            None
        } else {
            let previous = self.parent.raw.child(index - 1)?;
            Some(NodeMetadata::previous_sibling(
                &metadata,
                previous.subtree_count(),
            ))
        };
        Some(MarkupNode {
            raw,
            metadata,
            parent: Some(self.parent.clone()),
        })
    }
}
