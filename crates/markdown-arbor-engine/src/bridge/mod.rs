//! CommonMark core parse over `pulldown-cmark`.
//!
//! The bridge folds the pulldown event stream into raw nodes through an
//! explicit container stack: `Start` pushes a frame, `End` pops it, builds
//! the node, and attaches it to the enclosing frame. Offsets from the event
//! iterator translate to line/column ranges through a [`LineIndex`].
//!
//! GFM tables, strikethrough, and task lists are always on; smart
//! punctuation follows the options. Tables are reshaped on the way through:
//! pulldown emits a head and a flat run of rows, which fold into the
//! head-then-body form the tree requires.

mod line_index;

use std::ops::Range;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use log::trace;
use markdown_arbor_tree::{Checkbox, ColumnAlignment, RawNode, SourceRange};
use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd,
};

use crate::options::ParseOptions;

pub(crate) use line_index::LineIndex;

/// Parses `text` as a standalone CommonMark+GFM document into a raw
/// document node. Every node carries a best-effort range in `text`'s own
/// coordinates; sub-parse callers re-map those through the range adjuster.
pub(crate) fn parse_commonmark(
    text: &str,
    source: Option<Arc<PathBuf>>,
    options: &ParseOptions,
) -> Rc<RawNode> {
    let mut flags = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    if options.smart_punctuation {
        flags |= Options::ENABLE_SMART_PUNCTUATION;
    }
    trace!("commonmark sub-parse of {} bytes", text.len());

    let mut builder = TreeBuilder {
        text,
        line_index: LineIndex::new(text),
        source,
        symbol_links: options.symbol_links,
        stack: vec![Frame::new(FrameData::Document, None)],
    };
    for (event, bytes) in Parser::new_ext(text, flags).into_offset_iter() {
        builder.handle(event, bytes);
    }
    builder.finish()
}

struct Frame {
    data: FrameData,
    range: Option<SourceRange>,
    children: Vec<Rc<RawNode>>,
}

impl Frame {
    fn new(data: FrameData, range: Option<SourceRange>) -> Self {
        Self {
            data,
            range,
            children: Vec::new(),
        }
    }
}

enum FrameData {
    Document,
    BlockQuote,
    Paragraph,
    Heading { level: u32 },
    CodeBlock { language: Option<String>, content: String },
    HtmlBlock { html: String },
    List { ordered: bool, start: Option<u64> },
    ListItem { checkbox: Option<Checkbox> },
    Table { alignments: Vec<ColumnAlignment>, head: Option<Rc<RawNode>>, rows: Vec<Rc<RawNode>> },
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { destination: Option<String>, title: Option<String> },
    Image { source: Option<String>, title: Option<String> },
}

struct TreeBuilder<'a> {
    text: &'a str,
    line_index: LineIndex,
    source: Option<Arc<PathBuf>>,
    symbol_links: bool,
    stack: Vec<Frame>,
}

impl TreeBuilder<'_> {
    fn range(&self, bytes: Range<usize>) -> SourceRange {
        self.line_index.range(bytes, &self.source)
    }

    fn top(&mut self) -> &mut Frame {
        self.stack
            .last_mut()
            .expect("the document frame is never popped mid-parse")
    }

    fn push(&mut self, data: FrameData, bytes: Range<usize>) {
        let range = self.range(bytes);
        self.stack.push(Frame::new(data, Some(range)));
    }

    fn attach(&mut self, node: Rc<RawNode>) {
        self.top().children.push(node);
    }

    fn handle(&mut self, event: Event<'_>, bytes: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, bytes),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match &mut self.top().data {
                FrameData::CodeBlock { content, .. } => content.push_str(&text),
                FrameData::HtmlBlock { html } => html.push_str(&text),
                _ => {
                    let range = self.range(bytes);
                    self.attach(RawNode::text(text.to_string(), Some(range)));
                }
            },
            Event::Code(code) => {
                let range = self.range(bytes.clone());
                // the event range covers the delimiters, so the source tells
                // a double-backtick span apart from a single-backtick one
                let node = if self.symbol_links && self.text[bytes].starts_with("``") {
                    RawNode::symbol_link(Some(code.to_string()), Some(range))
                } else {
                    RawNode::inline_code(code.to_string(), Some(range))
                };
                self.attach(node);
            }
            Event::Html(html) => match &mut self.top().data {
                FrameData::HtmlBlock { html: block } => block.push_str(&html),
                _ => {
                    let range = self.range(bytes);
                    self.attach(RawNode::html_block(html.to_string(), Some(range)));
                }
            },
            Event::InlineHtml(html) => {
                let range = self.range(bytes);
                self.attach(RawNode::inline_html(html.to_string(), Some(range)));
            }
            Event::SoftBreak => {
                let range = self.range(bytes);
                self.attach(RawNode::soft_break(Some(range)));
            }
            Event::HardBreak => {
                let range = self.range(bytes);
                self.attach(RawNode::line_break(Some(range)));
            }
            Event::Rule => {
                let range = self.range(bytes);
                self.attach(RawNode::thematic_break(Some(range)));
            }
            Event::TaskListMarker(checked) => {
                let state = if checked {
                    Checkbox::Checked
                } else {
                    Checkbox::Unchecked
                };
                for frame in self.stack.iter_mut().rev() {
                    if let FrameData::ListItem { checkbox } = &mut frame.data {
                        *checkbox = Some(state);
                        break;
                    }
                }
            }
            // footnotes, math, and metadata blocks are never enabled
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>, bytes: Range<usize>) {
        let data = match tag {
            Tag::Paragraph => FrameData::Paragraph,
            Tag::Heading { level, .. } => FrameData::Heading {
                level: level as u32,
            },
            Tag::BlockQuote(_) => FrameData::BlockQuote,
            Tag::CodeBlock(kind) => FrameData::CodeBlock {
                language: match kind {
                    CodeBlockKind::Fenced(info) if !info.is_empty() => Some(info.to_string()),
                    _ => None,
                },
                content: String::new(),
            },
            Tag::HtmlBlock => FrameData::HtmlBlock {
                html: String::new(),
            },
            Tag::List(start) => FrameData::List {
                ordered: start.is_some(),
                start,
            },
            Tag::Item => FrameData::ListItem { checkbox: None },
            Tag::Table(alignments) => FrameData::Table {
                alignments: alignments.iter().map(|a| column_alignment(*a)).collect(),
                head: None,
                rows: Vec::new(),
            },
            Tag::TableHead => FrameData::TableHead,
            Tag::TableRow => FrameData::TableRow,
            Tag::TableCell => FrameData::TableCell,
            Tag::Emphasis => FrameData::Emphasis,
            Tag::Strong => FrameData::Strong,
            Tag::Strikethrough => FrameData::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => FrameData::Link {
                destination: non_empty(dest_url.to_string()),
                title: non_empty(title.to_string()),
            },
            Tag::Image {
                dest_url, title, ..
            } => FrameData::Image {
                source: non_empty(dest_url.to_string()),
                title: non_empty(title.to_string()),
            },
            // definition lists, footnotes, metadata: never enabled
            _ => return,
        };
        self.push(data, bytes);
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::CodeBlock
            | TagEnd::HtmlBlock
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::Table
            | TagEnd::TableHead
            | TagEnd::TableRow
            | TagEnd::TableCell
            | TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::Image => self.pop(),
            _ => {}
        }
    }

    fn pop(&mut self) {
        let frame = self
            .stack
            .pop()
            .expect("every End event matches a Start frame");
        let Frame {
            data,
            range,
            children,
        } = frame;

        let node = match data {
            FrameData::Document => {
                unreachable!("the document frame is only popped by finish")
            }
            FrameData::Paragraph => RawNode::paragraph(range, children),
            FrameData::Heading { level } => RawNode::heading(level, range, children),
            FrameData::BlockQuote => RawNode::block_quote(range, children),
            FrameData::CodeBlock { language, content } => {
                RawNode::code_block(language, content, range)
            }
            FrameData::HtmlBlock { html } => RawNode::html_block(html, range),
            FrameData::List { ordered, start } => RawNode::list(ordered, start, range, children),
            FrameData::ListItem { checkbox } => RawNode::list_item(checkbox, range, children),
            FrameData::Table {
                alignments,
                head,
                rows,
            } => {
                let head = head.unwrap_or_else(|| RawNode::table_head(None, Vec::new()));
                let body_range = rows
                    .iter()
                    .filter_map(|row| row.parsed_range())
                    .reduce(|total, next| total.widened_to(&next));
                let body = RawNode::table_body(body_range, rows);
                RawNode::table(alignments, range, vec![head, body])
            }
            FrameData::TableHead => RawNode::table_head(range, children),
            FrameData::TableRow => RawNode::table_row(range, children),
            FrameData::TableCell => RawNode::table_cell(1, 1, range, children),
            FrameData::Emphasis => RawNode::emphasis(range, children),
            FrameData::Strong => RawNode::strong(range, children),
            FrameData::Strikethrough => RawNode::strikethrough(range, children),
            FrameData::Link { destination, title } => {
                RawNode::link(destination, title, range, children)
            }
            FrameData::Image { source, title } => RawNode::image(source, title, range, children),
        };

        // table parts route to the table frame, not the child list
        if let Some(Frame {
            data: FrameData::Table { head, rows, .. },
            ..
        }) = self.stack.last_mut()
        {
            match node.kind() {
                markdown_arbor_tree::MarkupKind::TableHead => {
                    *head = Some(node);
                    return;
                }
                markdown_arbor_tree::MarkupKind::TableRow => {
                    rows.push(node);
                    return;
                }
                _ => {}
            }
        }
        self.attach(node);
    }

    fn finish(mut self) -> Rc<RawNode> {
        assert_eq!(self.stack.len(), 1, "unbalanced event stream");
        let document = self.stack.pop().expect("document frame");
        let range = document
            .children
            .iter()
            .filter_map(|child| child.parsed_range())
            .reduce(|total, next| total.widened_to(&next));
        RawNode::document(range, document.children)
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

fn column_alignment(alignment: Alignment) -> ColumnAlignment {
    match alignment {
        Alignment::None => ColumnAlignment::Unspecified,
        Alignment::Left => ColumnAlignment::Left,
        Alignment::Center => ColumnAlignment::Center,
        Alignment::Right => ColumnAlignment::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_arbor_tree::{MarkupKind, RawData};

    fn parse(text: &str) -> Rc<RawNode> {
        parse_commonmark(text, None, &ParseOptions::new())
    }

    fn parse_with(text: &str, options: ParseOptions) -> Rc<RawNode> {
        parse_commonmark(text, None, &options)
    }

    #[test]
    fn paragraph_with_range() {
        let doc = parse("hello world");
        assert_eq!(doc.child_count(), 1);
        let paragraph = doc.child(0).unwrap();
        assert_eq!(paragraph.kind(), MarkupKind::Paragraph);
        let range = paragraph.parsed_range().unwrap();
        assert_eq!((range.start.line, range.start.column), (1, 1));
        assert_eq!((range.end.line, range.end.column), (1, 12));
    }

    #[test]
    fn heading_levels() {
        let doc = parse("## Two\n\n### Three");
        assert!(matches!(
            doc.child(0).unwrap().data(),
            RawData::Heading { level: 2 }
        ));
        assert!(matches!(
            doc.child(1).unwrap().data(),
            RawData::Heading { level: 3 }
        ));
    }

    #[test]
    fn fenced_code_keeps_language_and_content() {
        let doc = parse("```rust\nlet x = 1;\n```");
        match doc.child(0).unwrap().data() {
            RawData::CodeBlock { language, content } => {
                assert_eq!(language.as_deref(), Some("rust"));
                assert_eq!(content, "let x = 1;\n");
            }
            other => panic!("expected a code block, got {other:?}"),
        }
    }

    #[test]
    fn nested_list_shape() {
        let doc = parse("- a\n  - b\n- c");
        let list = doc.child(0).unwrap();
        assert_eq!(list.kind(), MarkupKind::List);
        assert_eq!(list.child_count(), 2);
        let first = list.child(0).unwrap();
        // tight item: inline text, then the nested list
        assert_eq!(first.child(0).unwrap().kind(), MarkupKind::Text);
        assert_eq!(first.child(1).unwrap().kind(), MarkupKind::List);
    }

    #[test]
    fn ordered_list_start_index() {
        let doc = parse("3. three\n4. four");
        assert!(matches!(
            doc.child(0).unwrap().data(),
            RawData::List {
                ordered: true,
                start: Some(3)
            }
        ));
    }

    #[test]
    fn task_list_checkboxes() {
        let doc = parse("- [x] done\n- [ ] open\n- plain");
        let list = doc.child(0).unwrap();
        let checkbox = |index: usize| match list.child(index).unwrap().data() {
            RawData::ListItem { checkbox } => *checkbox,
            _ => unreachable!(),
        };
        assert_eq!(checkbox(0), Some(Checkbox::Checked));
        assert_eq!(checkbox(1), Some(Checkbox::Unchecked));
        assert_eq!(checkbox(2), None);
    }

    #[test]
    fn table_becomes_head_and_body() {
        let doc = parse("| a | b |\n|:--|--:|\n| 1 | 2 |\n| 3 | 4 |");
        let table = doc.child(0).unwrap();
        assert_eq!(table.kind(), MarkupKind::Table);
        match table.data() {
            RawData::Table { column_alignments } => {
                assert_eq!(
                    column_alignments,
                    &[ColumnAlignment::Left, ColumnAlignment::Right]
                );
            }
            _ => unreachable!(),
        }
        let head = table.child(0).unwrap();
        assert_eq!(head.kind(), MarkupKind::TableHead);
        assert_eq!(head.child_count(), 2);
        let body = table.child(1).unwrap();
        assert_eq!(body.kind(), MarkupKind::TableBody);
        assert_eq!(body.child_count(), 2);
        assert_eq!(body.child(0).unwrap().kind(), MarkupKind::TableRow);
    }

    #[test]
    fn strikethrough_is_parsed() {
        let doc = parse("~~gone~~");
        let paragraph = doc.child(0).unwrap();
        assert_eq!(
            paragraph.child(0).unwrap().kind(),
            MarkupKind::Strikethrough
        );
    }

    #[test]
    fn single_backtick_stays_inline_code() {
        let options = ParseOptions::new().symbol_links(true);
        let doc = parse_with("a `code` span", options);
        let paragraph = doc.child(0).unwrap();
        assert_eq!(paragraph.child(1).unwrap().kind(), MarkupKind::InlineCode);
    }

    #[test]
    fn double_backtick_promotes_to_symbol_link() {
        let options = ParseOptions::new().symbol_links(true);
        let doc = parse_with("see ``Rope.append(_:)`` here", options);
        let paragraph = doc.child(0).unwrap();
        let link = paragraph.child(1).unwrap();
        assert_eq!(link.kind(), MarkupKind::SymbolLink);
        assert!(matches!(
            link.data(),
            RawData::SymbolLink { destination: Some(d) } if d == "Rope.append(_:)"
        ));
    }

    #[test]
    fn double_backtick_without_option_is_code() {
        let doc = parse("see ``Rope.append(_:)`` here");
        let paragraph = doc.child(0).unwrap();
        assert_eq!(paragraph.child(1).unwrap().kind(), MarkupKind::InlineCode);
    }

    #[test]
    fn link_payload() {
        let doc = parse("[text](https://example.com \"Title\")");
        let link = doc.child(0).unwrap().child(0).unwrap();
        assert!(matches!(
            link.data(),
            RawData::Link { destination: Some(d), title: Some(t) }
                if d == "https://example.com" && t == "Title"
        ));
    }

    #[test]
    fn block_quote_nests() {
        let doc = parse("> quoted\n>\n> ```\n> code\n> ```");
        let quote = doc.child(0).unwrap();
        assert_eq!(quote.kind(), MarkupKind::BlockQuote);
        assert_eq!(quote.child(0).unwrap().kind(), MarkupKind::Paragraph);
        assert_eq!(quote.child(1).unwrap().kind(), MarkupKind::CodeBlock);
    }

    #[test]
    fn multi_line_ranges() {
        let doc = parse("first\n\n- item one\n- item two");
        let list = doc.child(1).unwrap();
        let range = list.parsed_range().unwrap();
        assert_eq!(range.start.line, 3);
        assert_eq!(range.end.line, 4);
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let doc = parse("");
        assert_eq!(doc.kind(), MarkupKind::Document);
        assert_eq!(doc.child_count(), 0);
        assert!(doc.parsed_range().is_none());
    }
}
