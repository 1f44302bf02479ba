//! The custom block-container layer.
//!
//! Input lines assemble into a hierarchy of four container kinds before any
//! CommonMark parsing happens: the root, runs of ordinary lines, block
//! directives, and Doxygen commands. The [`ParseContainerStack`] drives the
//! assembly line by line; lowering then turns the finished hierarchy into
//! raw nodes, handing each line run to the CommonMark core and re-mapping
//! the resulting positions.

mod directive;
mod doxygen;
mod lower;
mod stack;

pub(crate) use stack::ParseContainerStack;

use crate::line::ParseLine;

use directive::PendingBlockDirective;
use doxygen::PendingDoxygenCommand;

/// One container in the assembly hierarchy.
#[derive(Debug)]
pub(crate) enum ParseContainer {
    /// The top-level container; always present, never closed.
    Root { children: Vec<ParseContainer> },
    /// A run of consecutive lines destined for one CommonMark sub-parse,
    /// tracking whether its tail is inside an open code fence.
    LineRun {
        lines: Vec<ParseLine>,
        in_code_fence: bool,
    },
    /// An `@Name(arguments) { contents }` directive; holds child
    /// containers of its own.
    BlockDirective(PendingBlockDirective),
    /// A single-purpose `@command` annotation capturing raw lines.
    DoxygenCommand(PendingDoxygenCommand),
}

impl ParseContainer {
    /// A fresh line run seeded with `line`.
    fn line_run_from(line: ParseLine) -> ParseContainer {
        let in_code_fence = line.looks_like_code_fence();
        ParseContainer::LineRun {
            lines: vec![line],
            in_code_fence,
        }
    }
}
