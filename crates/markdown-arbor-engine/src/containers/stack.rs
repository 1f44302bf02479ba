//! Line-by-line container assembly.
//!
//! The stack holds the chain of currently open containers, root always at
//! the bottom. Each incoming line is dispatched through a fixed priority:
//! blank-line closing, Doxygen command opening, indentation bookkeeping,
//! implicit `}` closing, directive opening, and finally folding into the
//! current top. Lines that look like code (inside an open fence, opening a
//! fence, or indented four-plus columns past the current adjustment) are
//! never treated as directive or command syntax, which is what keeps
//! directive-looking text in example code verbatim.

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use log::trace;
use markdown_arbor_tree::RawNode;

use crate::line::ParseLine;
use crate::options::ParseOptions;

use super::directive::{DirectiveState, PendingBlockDirective};
use super::doxygen::PendingDoxygenCommand;
use super::{lower, ParseContainer};

pub(crate) struct ParseContainerStack {
    /// Open containers, root first. Only `Root` and accepting directives
    /// ever have something stacked on top of them.
    stack: Vec<ParseContainer>,
    options: ParseOptions,
    source: Option<Arc<PathBuf>>,
}

impl ParseContainerStack {
    pub(crate) fn new(options: ParseOptions, source: Option<Arc<PathBuf>>) -> Self {
        Self {
            stack: vec![ParseContainer::Root {
                children: Vec::new(),
            }],
            options,
            source,
        }
    }

    pub(crate) fn accept(&mut self, mut line: ParseLine) {
        // (1) a blank line ends a directive still parsing its own syntax,
        // and any doxygen command
        if line.is_blank() {
            let closes = match self.stack.last() {
                Some(ParseContainer::BlockDirective(d)) => !d.is_accepting_content(),
                Some(ParseContainer::DoxygenCommand(_)) => true,
                _ => false,
            };
            if closes {
                self.close_top();
            }
            // inside a run the blank still separates blocks for the
            // sub-parse
            if let Some(ParseContainer::LineRun { lines, .. }) = self.stack.last_mut() {
                lines.push(line);
            }
            return;
        }

        // (2) doxygen commands open only at top level, outside directive
        // contents and code
        if self.options.minimal_doxygen
            && !self.inside_directive_contents()
            && !self.line_is_protected(&line)
        {
            if let Some(command) = PendingDoxygenCommand::try_open(&mut line) {
                trace!("doxygen command opens at line {}", line.number());
                if !matches!(self.stack.last(), Some(ParseContainer::Root { .. })) {
                    self.close_top();
                }
                self.stack.push(ParseContainer::DoxygenCommand(command));
                return;
            }
        }

        // (3) the first non-blank content line fixes a directive's inner
        // indentation
        let indentation = line.indentation_column_count();
        for container in &mut self.stack {
            if let ParseContainer::BlockDirective(directive) = container {
                if directive.is_accepting_content()
                    && directive.inner_indentation_column_count().is_none()
                {
                    directive.set_inner_indentation_column_count(indentation);
                }
            }
        }

        // (4) a leading `}` closes the nearest directive waiting for one,
        // along with every container stacked above it
        if !self.line_is_protected(&line) && self.inside_directive_contents() {
            let mut probe = line.clone();
            probe.skip_whitespace();
            if probe.peek() == Some('}') {
                probe.bump();
                let brace_end = probe.location();
                loop {
                    if let Some(ParseContainer::BlockDirective(directive)) = self.stack.last_mut()
                    {
                        if directive.is_accepting_content() {
                            trace!("`}}` closes directive at line {}", probe.number());
                            directive.close_with_brace(brace_end.clone());
                            self.close_top();
                            break;
                        }
                    }
                    self.close_top();
                }
                // whatever follows the brace starts over on its own
                probe.skip_whitespace();
                if !probe.is_blank() {
                    self.accept(probe);
                }
                return;
            }
        }

        // (5) block directives
        if self.options.block_directives && !self.line_is_protected(&line) {
            if let Some(directive) = PendingBlockDirective::try_open(&mut line) {
                trace!("directive opens at line {}", line.number());
                // find a home: nest under an accepting directive, or close
                // whatever else is open and become its sibling
                loop {
                    match self.stack.last() {
                        Some(ParseContainer::Root { .. }) => break,
                        Some(ParseContainer::BlockDirective(d)) if d.is_accepting_content() => {
                            break
                        }
                        _ => self.close_top(),
                    }
                }
                let finished = directive.state() == DirectiveState::Done;
                self.stack.push(ParseContainer::BlockDirective(directive));
                if finished {
                    self.close_top();
                }
                return;
            }
        }

        // (6) fold into the current top
        enum Fold {
            OpenRun,
            CloseTop,
            Redispatch,
        }
        let fold = match self.stack.last_mut() {
            Some(ParseContainer::LineRun {
                lines,
                in_code_fence,
            }) => {
                if line.looks_like_code_fence() {
                    *in_code_fence = !*in_code_fence;
                }
                lines.push(line);
                return;
            }
            Some(ParseContainer::DoxygenCommand(command)) => {
                command.push_line(line);
                return;
            }
            Some(ParseContainer::BlockDirective(directive)) => {
                if directive.is_accepting_content() {
                    Fold::OpenRun
                } else if directive.accept_line(&mut line) {
                    if directive.state() == DirectiveState::Done {
                        Fold::CloseTop
                    } else {
                        return;
                    }
                } else {
                    Fold::Redispatch
                }
            }
            Some(ParseContainer::Root { .. }) => Fold::OpenRun,
            None => unreachable!("the root container is never popped"),
        };
        match fold {
            Fold::OpenRun => self.stack.push(ParseContainer::line_run_from(line)),
            Fold::CloseTop => self.close_top(),
            Fold::Redispatch => {
                // the directive was already complete; it closes and the
                // line starts over as its sibling
                self.close_top();
                self.accept(line);
            }
        }
    }

    /// Closes everything still open and lowers the hierarchy.
    pub(crate) fn finish(mut self) -> Rc<RawNode> {
        while self.stack.len() > 1 {
            self.close_top();
        }
        let root = self.stack.pop().expect("the root container");
        lower::lower_root(root, &self.options, &self.source)
    }

    /// Pops the top container into its parent's children. A directive that
    /// surrendered trailing text re-dispatches it afterwards.
    fn close_top(&mut self) {
        debug_assert!(self.stack.len() > 1, "the root container is never closed");
        let mut closed = self.stack.pop().expect("non-root container");
        let pending = match &mut closed {
            ParseContainer::BlockDirective(directive) => directive.take_pending_line(),
            _ => None,
        };
        match self.stack.last_mut() {
            Some(ParseContainer::Root { children }) => children.push(closed),
            Some(ParseContainer::BlockDirective(directive)) => directive.push_child(closed),
            _ => unreachable!("runs and commands never hold children"),
        }
        if let Some(pending) = pending {
            self.accept(pending);
        }
    }

    /// True when any open directive has its brace-delimited contents open.
    fn inside_directive_contents(&self) -> bool {
        self.stack.iter().any(|container| {
            matches!(container, ParseContainer::BlockDirective(d) if d.is_accepting_content())
        })
    }

    /// A line inside an open code fence, opening a fence itself, or
    /// indented four-plus columns past the current adjustment is code as
    /// far as directive syntax is concerned.
    fn line_is_protected(&self, line: &ParseLine) -> bool {
        if matches!(
            self.stack.last(),
            Some(ParseContainer::LineRun {
                in_code_fence: true,
                ..
            })
        ) {
            return true;
        }
        line.looks_like_code_fence()
            || line.indentation_column_count() >= self.indentation_adjustment() + 4
    }

    /// The innermost open directive's indentation adjustment, or zero at
    /// top level.
    fn indentation_adjustment(&self) -> usize {
        self.stack
            .iter()
            .rev()
            .find_map(|container| match container {
                ParseContainer::BlockDirective(d) => Some(d.indentation_adjustment()),
                _ => None,
            })
            .unwrap_or(0)
    }
}
