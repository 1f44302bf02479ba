//! Stable per-occurrence identity.
//!
//! An occurrence is identified by the root tree it belongs to and its
//! depth-first preorder offset within that root. Offsets are derived from
//! precomputed subtree counts, so walking to a sibling or child never
//! rescans the tree.

use std::fmt;

use crate::counter;

/// Identity of one node occurrence: which root it lives in and where.
///
/// Two occurrences are *identical* (the same node of the same tree) exactly
/// when both components are equal. This is unrelated to structural equality:
/// detaching a subtree gives structurally equal content under a fresh
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    root_id: u64,
    child_id: usize,
}

impl NodeId {
    /// Identifier of the root tree this occurrence belongs to.
    pub fn root_id(&self) -> u64 {
        self.root_id
    }

    /// Depth-first preorder offset from the root. The root itself is 0.
    pub fn child_id(&self) -> usize {
        self.child_id
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.root_id, self.child_id)
    }
}

/// Position metadata carried by an occurrence alongside its raw node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeMetadata {
    pub(crate) id: NodeId,
    pub(crate) index_in_parent: usize,
}

impl NodeMetadata {
    /// Metadata for a fresh root. Draws one identifier from the process-wide
    /// counter.
    pub(crate) fn new_root() -> Self {
        Self {
            id: NodeId {
                root_id: counter::next(),
                child_id: 0,
            },
            index_in_parent: 0,
        }
    }

    /// Metadata for the first child of `parent`: preorder offset is the
    /// parent's plus one.
    pub(crate) fn first_child(parent: &NodeMetadata) -> Self {
        Self {
            id: NodeId {
                root_id: parent.id.root_id,
                child_id: parent.id.child_id + 1,
            },
            index_in_parent: 0,
        }
    }

    /// Metadata for the sibling after `previous`, whose subtree occupies
    /// `previous_subtree_count` preorder slots.
    pub(crate) fn next_sibling(previous: &NodeMetadata, previous_subtree_count: usize) -> Self {
        Self {
            id: NodeId {
                root_id: previous.id.root_id,
                child_id: previous.id.child_id + previous_subtree_count,
            },
            index_in_parent: previous.index_in_parent + 1,
        }
    }

    /// Metadata for the last child of `parent`. The last child's offset is
    /// the end of the parent's subtree minus the child's own subtree, which
    /// is the mirror of [`NodeMetadata::next_sibling`].
    pub(crate) fn last_child(
        parent: &NodeMetadata,
        parent_subtree_count: usize,
        last_child_subtree_count: usize,
        child_count: usize,
    ) -> Self {
        Self {
            id: NodeId {
                root_id: parent.id.root_id,
                child_id: parent.id.child_id + parent_subtree_count - last_child_subtree_count,
            },
            index_in_parent: child_count - 1,
        }
    }

    /// Metadata for the sibling before `next`, given that sibling's subtree
    /// size.
    pub(crate) fn previous_sibling(next: &NodeMetadata, subtree_count: usize) -> Self {
        Self {
            id: NodeId {
                root_id: next.id.root_id,
                child_id: next.id.child_id - subtree_count,
            },
            index_in_parent: next.index_in_parent - 1,
        }
    }
}
