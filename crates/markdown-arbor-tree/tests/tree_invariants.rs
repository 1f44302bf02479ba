//! Cross-cutting invariants of the shared tree: identity stability across
//! repeated lookups, structural sharing on edit, subtree counting, the
//! structural-equality relation, and the concurrent root-id allocator.

use std::rc::Rc;
use std::sync::mpsc;
use std::thread;

use markdown_arbor_tree::typed::{Document, Heading, List, ListItem, Paragraph, Text};
use markdown_arbor_tree::{MarkupKind, MarkupNode, PathStep, dump_structure};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn paragraph(text: &str) -> MarkupNode {
    Paragraph::new([Text::new(text).into_markup()]).into_markup()
}

/// Document with three top-level blocks, the middle one a two-item list.
fn sample_document() -> Document {
    Document::new([
        Heading::new(1, [Text::new("Title").into_markup()]).into_markup(),
        List::new(
            false,
            None,
            [
                ListItem::new(None, [paragraph("first item")]),
                ListItem::new(None, [paragraph("second item")]),
            ],
        )
        .into_markup(),
        paragraph("closing paragraph"),
    ])
}

#[test]
fn identity_is_stable_across_repeated_lookups() {
    let doc = sample_document();
    let node = doc.as_markup();

    let path = [
        (1, Some(MarkupKind::List)),
        (0, Some(MarkupKind::ListItem)),
        (0, Some(MarkupKind::Paragraph)),
    ];
    let once = node.child_through_path(&path).unwrap();
    let twice = node.child_through_path(&path).unwrap();
    assert!(once.is_identical_to(&twice));

    // the same position reached by iteration carries the same identity
    let via_iteration = node
        .child_at(1)
        .unwrap()
        .children()
        .next()
        .unwrap()
        .child_at(0)
        .unwrap();
    assert!(once.is_identical_to(&via_iteration));
}

#[test]
fn distinct_positions_never_share_an_identity() {
    let doc = sample_document();
    let node = doc.as_markup();

    let mut ids = Vec::new();
    fn collect(node: &MarkupNode, ids: &mut Vec<markdown_arbor_tree::NodeId>) {
        ids.push(node.id());
        for child in node.children() {
            collect(&child, ids);
        }
    }
    collect(node, &mut ids);

    assert_eq!(ids.len(), node.raw().subtree_count());
    let mut deduplicated = ids.clone();
    deduplicated.sort_by_key(|id| (id.root_id(), id.child_id()));
    deduplicated.dedup();
    assert_eq!(deduplicated.len(), ids.len());
}

#[test]
fn editing_a_leaf_shares_every_sibling_subtree() {
    let doc = sample_document();
    let node = doc.as_markup();
    let heading_raw = node.child_at(0).unwrap().raw().clone();
    let second_item_raw = node
        .child_at(1)
        .unwrap()
        .child_at(1)
        .unwrap()
        .raw()
        .clone();

    // edit the text of the first list item
    let mut text = Text::try_from(
        node.child_through_path(&[(1, None), (0, None), (0, None), (0, None)])
            .unwrap(),
    )
    .unwrap();
    text.set_content("edited item");
    let new_doc = text.as_markup().root();

    // subtrees off the edited path are the same allocations as before
    assert!(Rc::ptr_eq(new_doc.child_at(0).unwrap().raw(), &heading_raw));
    assert!(Rc::ptr_eq(
        new_doc.child_at(1).unwrap().child_at(1).unwrap().raw(),
        &second_item_raw
    ));
    // the edited path was rebuilt
    assert!(!Rc::ptr_eq(
        new_doc.child_at(1).unwrap().raw(),
        node.child_at(1).unwrap().raw()
    ));
    // and the original tree still reads the old text
    let original_text = Text::try_from(
        node.child_through_path(&[(1, None), (0, None), (0, None), (0, None)])
            .unwrap(),
    )
    .unwrap();
    assert_eq!(original_text.content(), "first item");
}

#[test]
fn edited_ancestors_lose_their_ranges_and_identity() {
    let doc = sample_document();
    let node = doc.as_markup();
    let mut text = Text::try_from(
        node.child_through_path(&[(2, None), (0, None)]).unwrap(),
    )
    .unwrap();
    text.set_content("changed");
    let new_doc = text.as_markup().root();

    assert!(!new_doc.is_identical_to(node));
    assert_ne!(new_doc.id().root_id(), node.id().root_id());
    assert!(new_doc.range().is_none());
}

#[test]
fn subtree_counts_agree_with_a_recursive_walk() {
    fn check(node: &MarkupNode) {
        let raw = node.raw();
        assert_eq!(raw.child_count(), raw.children().len());
        assert_eq!(
            raw.subtree_count(),
            1 + raw
                .children()
                .iter()
                .map(|child| child.subtree_count())
                .sum::<usize>()
        );
        for child in node.children() {
            check(&child);
        }
    }
    check(sample_document().as_markup());
}

#[test]
fn same_structure_holds_for_independently_built_trees() {
    let a = sample_document();
    let b = sample_document();

    assert!(a.as_markup().has_same_structure(a.as_markup()));
    assert!(a.as_markup().has_same_structure(b.as_markup()));
    assert!(b.as_markup().has_same_structure(a.as_markup()));
    // identities still differ: equality of structure is not sameness
    assert!(!a.as_markup().is_identical_to(b.as_markup()));
}

#[test]
fn same_structure_breaks_on_a_single_leaf_change() {
    let a = sample_document();

    // one text leaf differs
    let changed_text = Document::new([
        Heading::new(1, [Text::new("Title").into_markup()]).into_markup(),
        List::new(
            false,
            None,
            [
                ListItem::new(None, [paragraph("first item")]),
                ListItem::new(None, [paragraph("second item")]),
            ],
        )
        .into_markup(),
        paragraph("different closing"),
    ]);
    assert!(!a.as_markup().has_same_structure(changed_text.as_markup()));

    // one leaf changes kind
    let changed_kind = Document::new([
        Heading::new(2, [Text::new("Title").into_markup()]).into_markup(),
        List::new(
            false,
            None,
            [
                ListItem::new(None, [paragraph("first item")]),
                ListItem::new(None, [paragraph("second item")]),
            ],
        )
        .into_markup(),
        paragraph("closing paragraph"),
    ]);
    assert!(!a.as_markup().has_same_structure(changed_kind.as_markup()));
}

#[rstest]
#[case::index_past_the_end(&[(3, None)])]
#[case::wrong_kind_at_first_step(&[(0, Some(MarkupKind::Paragraph))])]
#[case::wrong_kind_mid_path(&[(1, Some(MarkupKind::List)), (0, Some(MarkupKind::Heading))])]
#[case::descent_below_a_leaf(&[(0, None), (0, None), (0, None)])]
fn path_lookup_fails_closed(#[case] path: &[PathStep]) {
    let doc = sample_document();
    assert!(doc.as_markup().child_through_path(path).is_none());
}

#[test]
fn dumped_outline_reflects_the_whole_tree() {
    let outline = dump_structure(sample_document().as_markup());
    let expected = [
        "Document",
        "  Heading level: 1",
        "    Text \"Title\"",
        "  List unordered",
        "    ListItem",
        "      Paragraph",
        "        Text \"first item\"",
        "    ListItem",
        "      Paragraph",
        "        Text \"second item\"",
        "  Paragraph",
        "    Text \"closing paragraph\"",
        "",
    ]
    .join("\n");
    assert_eq!(outline, expected);
}

#[test]
fn detaching_draws_a_fresh_root_each_time() {
    let doc = sample_document();
    let item = doc.as_markup().child_at(1).unwrap().child_at(0).unwrap();

    let first = item.detached_from_parent();
    let second = item.detached_from_parent();

    assert!(first.is_root() && second.is_root());
    assert_ne!(first.id().root_id(), second.id().root_id());
    assert!(!first.is_identical_to(&second));
    // detachment shares the raw subtree instead of copying it
    assert!(Rc::ptr_eq(first.raw(), item.raw()));
    assert!(first.has_same_structure(&item));
}

#[test]
fn concurrent_root_creation_never_duplicates_an_id() {
    const THREADS: usize = 8;
    const ROOTS_PER_THREAD: usize = 250;

    let (tx, rx) = mpsc::channel();
    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let tx = tx.clone();
        handles.push(thread::spawn(move || {
            // trees are thread-local; only the ids cross the channel
            for _ in 0..ROOTS_PER_THREAD {
                let root = Text::new("x").into_markup();
                tx.send(root.id().root_id()).unwrap();
            }
        }));
    }
    drop(tx);
    for handle in handles {
        handle.join().unwrap();
    }

    let ids: Vec<u64> = rx.iter().collect();
    assert_eq!(ids.len(), THREADS * ROOTS_PER_THREAD);
    let mut distinct = ids.clone();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(distinct.len(), THREADS * ROOTS_PER_THREAD);
}
