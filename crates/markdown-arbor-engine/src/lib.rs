//! Parsing pipeline for markup documents.
//!
//! Two grammars layer over each other. A line-oriented container parser
//! segments the input into directive, Doxygen-command, and line-run
//! containers; each line run is then sub-parsed by the CommonMark core
//! (`pulldown-cmark`, with the GFM table/strikethrough/tasklist
//! extensions), its positions re-mapped back to outer-document
//! coordinates, and the results spliced into the final tree.
//!
//! Parsing arbitrary text never fails: malformed directive syntax degrades
//! into flatter markup, and problems inside directive argument lists are
//! reported as accumulated diagnostics (see [`arguments`]) rather than
//! errors.

mod adjust;
pub mod arguments;
mod bridge;
mod containers;
mod format;
mod line;
mod options;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use log::debug;
use markdown_arbor_tree::{MarkupNode, typed::Document};

pub use arguments::{
    ArgumentDiagnostic, ArgumentParse, DirectiveArgument, directive_arguments,
    parse_directive_arguments,
};
pub use format::to_markdown;
pub use options::ParseOptions;

use containers::ParseContainerStack;
use line::ParseLine;

/// Parses `text` into a document tree, recording `source` on every range.
pub fn parse_document(
    text: &str,
    source: Option<Arc<PathBuf>>,
    options: &ParseOptions,
) -> Document {
    debug!("parsing {} bytes of markup", text.len());
    let raw = if options.block_directives || options.minimal_doxygen {
        let mut stack = ParseContainerStack::new(*options, source.clone());
        for (index, line) in text.lines().enumerate() {
            stack.accept(ParseLine::new(line, index + 1, source.clone()));
        }
        stack.finish()
    } else {
        // neither custom layer is active: the whole input is one
        // CommonMark parse
        bridge::parse_commonmark(text, source, options)
    };
    Document::try_from(MarkupNode::new_root(raw))
        .expect("parsing always produces a document root")
}

/// Parses `text` with no source identifier.
pub fn parse_str(text: &str, options: &ParseOptions) -> Document {
    parse_document(text, None, options)
}

/// Reads and parses a file, recording its path as the source identifier.
pub fn parse_file(path: impl AsRef<Path>, options: &ParseOptions) -> anyhow::Result<Document> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_document(
        &text,
        Some(Arc::new(path.to_path_buf())),
        options,
    ))
}
