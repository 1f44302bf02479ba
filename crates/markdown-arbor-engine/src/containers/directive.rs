//! The `@Name(arguments) { contents }` state machine.
//!
//! A pending directive advances through its states as lines are offered to
//! it, consuming characters through each line's cursor. Punctuation is
//! optional at two points (the argument list and the brace-delimited
//! contents), so `@Name`, `@Name(args)`, `@Name { ... }`, and the full form
//! all resolve. A directive whose contents never open finishes immediately;
//! whatever trailing text follows it on the line is surrendered back to the
//! caller as a pending line rather than swallowed.

use markdown_arbor_tree::{DirectiveArgumentTextSegment, SourceLocation, SourceRange};

use crate::line::ParseLine;

use super::ParseContainer;

/// Where a pending directive is in its grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirectiveState {
    /// Expecting the optional `(` that opens the argument list.
    ArgumentsStart,
    /// Accumulating argument text until an unescaped, unquoted `)`.
    ArgumentsText,
    /// Expecting the `)` that closes the argument list.
    ArgumentsEnd,
    /// Expecting the optional `{` that opens the contents.
    ContentsStart,
    /// Consuming same-line content directly after the `{`.
    Contents,
    /// Contents are open across lines; waiting for the closing `}`.
    ContentsEnd,
    /// Fully parsed; no further line can belong to this directive.
    Done,
}

#[derive(Debug)]
pub(crate) struct PendingBlockDirective {
    name: String,
    name_range: SourceRange,
    state: DirectiveState,
    argument_segments: Vec<DirectiveArgumentTextSegment>,
    /// Column of the `@` sign.
    at_indentation_column_count: usize,
    /// Indentation of the first non-blank content line, fixed lazily.
    inner_indentation_column_count: Option<usize>,
    range: SourceRange,
    children: Vec<ParseContainer>,
    /// Text that followed the directive on its final line but is not part
    /// of it.
    pending_line: Option<ParseLine>,
}

impl PendingBlockDirective {
    /// Tries to open a directive at the line's cursor: optional whitespace,
    /// `@`, then a non-empty name. On match the rest of the line is run
    /// through the state machine; on mismatch the cursor is restored.
    pub(crate) fn try_open(line: &mut ParseLine) -> Option<PendingBlockDirective> {
        let saved = line.cursor();
        let at_indentation = line.indentation_column_count();
        line.skip_whitespace();
        if line.peek() != Some('@') {
            line.restore(saved);
            return None;
        }
        let at_location = line.location();
        line.bump();
        let name_bytes = line.eat_while(|ch| ch.is_alphanumeric() || ch == '_');
        if name_bytes.is_empty() {
            line.restore(saved);
            return None;
        }
        let name = line.text()[name_bytes.clone()].to_string();
        let name_range = line.range_of(name_bytes);

        let mut directive = PendingBlockDirective {
            name,
            range: SourceRange::new(at_location, name_range.end.clone()),
            name_range,
            state: DirectiveState::ArgumentsStart,
            argument_segments: Vec::new(),
            at_indentation_column_count: at_indentation,
            inner_indentation_column_count: None,
            children: Vec::new(),
            pending_line: None,
        };
        directive.continue_parsing(line);
        Some(directive)
    }

    /// Offers a continuation line to a directive still parsing its own
    /// syntax. Returns `false` if the directive is already done and the
    /// line belongs to whatever comes after it.
    pub(crate) fn accept_line(&mut self, line: &mut ParseLine) -> bool {
        if self.state == DirectiveState::Done {
            return false;
        }
        self.continue_parsing(line);
        true
    }

    /// Runs the state machine over the line's remainder until the line is
    /// exhausted or the machine has to wait for the next line.
    fn continue_parsing(&mut self, line: &mut ParseLine) {
        loop {
            match self.state {
                DirectiveState::ArgumentsStart => {
                    line.skip_whitespace();
                    match line.peek() {
                        None => {
                            self.extend_range_to(line.location());
                            return;
                        }
                        Some('(') => {
                            line.bump();
                            self.state = DirectiveState::ArgumentsText;
                        }
                        Some(_) => self.state = DirectiveState::ContentsStart,
                    }
                }
                DirectiveState::ArgumentsText => {
                    if self.scan_argument_text(line) {
                        self.state = DirectiveState::ArgumentsEnd;
                    } else {
                        // line ran out mid-list; the next line continues it
                        self.extend_range_to(line.location());
                        return;
                    }
                }
                DirectiveState::ArgumentsEnd => {
                    debug_assert_eq!(line.peek(), Some(')'));
                    line.bump();
                    self.extend_range_to(line.location());
                    self.state = DirectiveState::ContentsStart;
                }
                DirectiveState::ContentsStart => {
                    line.skip_whitespace();
                    match line.peek() {
                        None => {
                            // a `{` may still arrive on a later line
                            return;
                        }
                        Some('{') => {
                            line.bump();
                            self.extend_range_to(line.location());
                            self.state = DirectiveState::Contents;
                        }
                        Some(_) => {
                            // no contents: the directive is complete and the
                            // rest of the line is not part of it
                            self.state = DirectiveState::Done;
                            self.pending_line = Some(line.clone());
                            return;
                        }
                    }
                }
                DirectiveState::Contents => {
                    line.skip_whitespace();
                    if line.is_at_end() {
                        self.state = DirectiveState::ContentsEnd;
                        return;
                    }
                    self.consume_single_line_contents(line);
                    return;
                }
                DirectiveState::ContentsEnd | DirectiveState::Done => return,
            }
        }
    }

    /// Content sits on the opening line itself. If the line's trimmed end
    /// is a `}`, the text before it is the directive's whole content and
    /// the directive finishes here; otherwise the remainder is the first
    /// content line of a still-open directive.
    fn consume_single_line_contents(&mut self, line: &mut ParseLine) {
        let rest = line.rest();
        let trimmed = rest.trim_end();
        if trimmed.ends_with('}') {
            let content = trimmed[..trimmed.len() - 1].trim_end();
            if !content.is_empty() {
                let content_end = line.cursor() + content.len();
                let mut content_line =
                    ParseLine::new(&line.text()[..content_end], line.number(), line.source());
                content_line.restore(line.cursor());
                self.children.push(ParseContainer::line_run_from(content_line));
            }
            let brace_end = line.cursor() + trimmed.len();
            self.extend_range_to(line.location_at(brace_end));
            self.state = DirectiveState::Done;
        } else {
            self.children.push(ParseContainer::line_run_from(line.clone()));
            self.extend_range_to(line.end_location());
            self.state = DirectiveState::ContentsEnd;
        }
    }

    /// Consumes argument text up to an unescaped, unquoted `)` and records
    /// the consumed span as one segment. Returns whether the `)` was found
    /// (it is left unconsumed for the `ArgumentsEnd` state).
    fn scan_argument_text(&mut self, line: &mut ParseLine) -> bool {
        let start = line.cursor();
        let mut in_quotes = false;
        let mut escaped = false;
        let mut found_close = false;
        while let Some(ch) = line.peek() {
            if escaped {
                escaped = false;
                line.bump();
                continue;
            }
            match ch {
                '\\' => {
                    escaped = true;
                    line.bump();
                }
                '"' => {
                    in_quotes = !in_quotes;
                    line.bump();
                }
                ')' if !in_quotes => {
                    found_close = true;
                    break;
                }
                _ => {
                    line.bump();
                }
            }
        }
        let end = line.cursor();
        if end > start {
            self.argument_segments.push(DirectiveArgumentTextSegment {
                untrimmed_text: line.text()[..end].to_string(),
                parse_index: start,
                range: Some(line.range_of(start..end)),
            });
        }
        found_close
    }

    pub(crate) fn state(&self) -> DirectiveState {
        self.state
    }

    /// True while the brace-delimited contents are open and child
    /// containers may still arrive.
    pub(crate) fn is_accepting_content(&self) -> bool {
        matches!(
            self.state,
            DirectiveState::Contents | DirectiveState::ContentsEnd
        )
    }

    /// The closing `}` was consumed by the caller at `brace_end`.
    pub(crate) fn close_with_brace(&mut self, brace_end: SourceLocation) {
        self.extend_range_to(brace_end);
        self.state = DirectiveState::Done;
    }

    pub(crate) fn inner_indentation_column_count(&self) -> Option<usize> {
        self.inner_indentation_column_count
    }

    pub(crate) fn set_inner_indentation_column_count(&mut self, columns: usize) {
        self.inner_indentation_column_count = Some(columns);
    }

    /// Columns stripped from content lines before sub-parsing: the inner
    /// indentation when one was observed, else the `@` sign's own column.
    pub(crate) fn indentation_adjustment(&self) -> usize {
        self.inner_indentation_column_count
            .unwrap_or(self.at_indentation_column_count)
    }

    pub(crate) fn push_child(&mut self, child: ParseContainer) {
        self.children.push(child);
    }

    pub(crate) fn take_pending_line(&mut self) -> Option<ParseLine> {
        self.pending_line.take()
    }

    fn extend_range_to(&mut self, end: SourceLocation) {
        if self.range.end.is_before(&end) {
            self.range.end = end;
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        String,
        SourceRange,
        Vec<DirectiveArgumentTextSegment>,
        SourceRange,
        Vec<ParseContainer>,
    ) {
        (
            self.name,
            self.name_range,
            self.argument_segments,
            self.range,
            self.children,
        )
    }
}
