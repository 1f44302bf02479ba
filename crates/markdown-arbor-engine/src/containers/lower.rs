//! Lowering the finished container hierarchy to raw nodes.
//!
//! Line runs are where the two grammars meet: a run's lines are stripped of
//! up to the enclosing container's indentation adjustment, joined, and
//! parsed as an independent CommonMark document; the range adjuster then
//! restores every reported position to outer-document coordinates, and the
//! sub-document's top-level children are spliced into the parent; the
//! synthetic sub-document root itself is discarded.

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use log::trace;
use markdown_arbor_tree::{DirectiveArgumentText, RawNode, SourceRange};

use crate::adjust::RangeAdjuster;
use crate::bridge;
use crate::line::ParseLine;
use crate::options::ParseOptions;

use super::doxygen::DoxygenKind;
use super::ParseContainer;

/// Lowers the whole hierarchy into a document node whose range is the
/// union of everything observed below it.
pub(crate) fn lower_root(
    root: ParseContainer,
    options: &ParseOptions,
    source: &Option<Arc<PathBuf>>,
) -> Rc<RawNode> {
    let ParseContainer::Root { children } = root else {
        unreachable!("lowering always starts at the root container");
    };
    let mut total = None;
    let mut nodes = Vec::new();
    for child in children {
        nodes.extend(lower_container(child, options, source, 0, &mut total));
    }
    RawNode::document(total, nodes)
}

fn lower_container(
    container: ParseContainer,
    options: &ParseOptions,
    source: &Option<Arc<PathBuf>>,
    adjustment: usize,
    total: &mut Option<SourceRange>,
) -> Vec<Rc<RawNode>> {
    match container {
        ParseContainer::Root { .. } => {
            unreachable!("the root container never nests")
        }
        ParseContainer::LineRun { lines, .. } => {
            lower_line_run(lines, options, source, adjustment, total)
        }
        ParseContainer::BlockDirective(directive) => {
            vec![lower_directive(directive, options, source, total)]
        }
        ParseContainer::DoxygenCommand(command) => {
            vec![lower_doxygen(command, options, source, total)]
        }
    }
}

/// Sub-parses a run's lines and splices the resulting top-level nodes.
fn lower_line_run(
    lines: Vec<ParseLine>,
    options: &ParseOptions,
    source: &Option<Arc<PathBuf>>,
    adjustment: usize,
    total: &mut Option<SourceRange>,
) -> Vec<Rc<RawNode>> {
    let Some(first) = lines.first() else {
        return Vec::new();
    };
    let start_line = first.number();

    let mut logical = String::new();
    let mut trimmed_per_line = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let (text, trimmed) = line.trimmed_for_sub_parse(adjustment);
        if index > 0 {
            logical.push('\n');
        }
        logical.push_str(text);
        trimmed_per_line.push(trimmed);
    }

    trace!(
        "sub-parsing a {}-line run starting at line {start_line}",
        lines.len()
    );
    let sub_document = bridge::parse_commonmark(&logical, source.clone(), options);
    let mut adjuster = RangeAdjuster::new(start_line, trimmed_per_line);
    adjuster.adjust(&sub_document);
    if let Some(range) = adjuster.total_range() {
        SourceRange::accumulate(total, range);
    }
    sub_document.copy_children()
}

fn lower_directive(
    directive: super::PendingBlockDirective,
    options: &ParseOptions,
    source: &Option<Arc<PathBuf>>,
    total: &mut Option<SourceRange>,
) -> Rc<RawNode> {
    let adjustment = directive.indentation_adjustment();
    let (name, name_range, segments, range, children) = directive.into_parts();
    let mut range = Some(range);
    let mut nodes = Vec::new();
    for child in children {
        nodes.extend(lower_container(child, options, source, adjustment, &mut range));
    }
    if let Some(range) = &range {
        SourceRange::accumulate(total, range);
    }
    RawNode::block_directive(
        name,
        Some(name_range),
        DirectiveArgumentText { segments },
        range,
        nodes,
    )
}

/// A command lowers to its node kind wrapping one synthetic line run of the
/// captured description.
fn lower_doxygen(
    command: super::PendingDoxygenCommand,
    options: &ParseOptions,
    source: &Option<Arc<PathBuf>>,
    total: &mut Option<SourceRange>,
) -> Rc<RawNode> {
    let (kind, adjustment, lines, range) = command.into_parts();
    let mut range = Some(range);
    let children = lower_line_run(lines, options, source, adjustment, &mut range);
    if let Some(range) = &range {
        SourceRange::accumulate(total, range);
    }
    match kind {
        DoxygenKind::Discussion => RawNode::doxygen_discussion(range, children),
        DoxygenKind::Note => RawNode::doxygen_note(range, children),
        DoxygenKind::Abstract => RawNode::doxygen_abstract(range, children),
        DoxygenKind::Parameter { name } => RawNode::doxygen_parameter(name, range, children),
        DoxygenKind::Returns => RawNode::doxygen_returns(range, children),
    }
}
