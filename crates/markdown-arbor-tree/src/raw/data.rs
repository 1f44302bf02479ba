//! Kind-specific payloads carried by raw nodes.

use serde::Serialize;

use crate::kind::MarkupKind;
use crate::source::SourceRange;

/// Task-list state of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Checkbox {
    Checked,
    Unchecked,
}

/// Column alignment of a table, as written in the delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnAlignment {
    Unspecified,
    Left,
    Center,
    Right,
}

/// One line's worth of directive argument text.
///
/// `untrimmed_text` is the original line from its start up to the end of the
/// argument region, so `parse_index` and the recorded range can reconstruct
/// exact columns without re-scanning the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveArgumentTextSegment {
    /// Line text from column 1 through the end of the argument region.
    pub untrimmed_text: String,
    /// Byte offset into `untrimmed_text` where argument parsing starts.
    pub parse_index: usize,
    /// Source range of the argument region, when parsed from a document.
    pub range: Option<SourceRange>,
}

impl DirectiveArgumentTextSegment {
    /// The portion of the line that is actually argument text.
    pub fn text(&self) -> &str {
        &self.untrimmed_text[self.parse_index..]
    }
}

/// The raw argument text of a block directive, one segment per source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveArgumentText {
    pub segments: Vec<DirectiveArgumentTextSegment>,
}

impl DirectiveArgumentText {
    /// A single detached segment, for building directives programmatically.
    /// The range pretends the text sits at line 1, column 1 so argument
    /// diagnostics always have a location to point at.
    pub fn from_text(text: &str) -> Self {
        use crate::source::SourceLocation;
        let range = SourceRange::new(
            SourceLocation::new(1, 1, None),
            SourceLocation::new(1, text.len() + 1, None),
        );
        Self {
            segments: vec![DirectiveArgumentTextSegment {
                untrimmed_text: text.to_string(),
                parse_index: 0,
                range: Some(range),
            }],
        }
    }

    /// True when no segment carries any argument text.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.text().trim().is_empty())
    }

    /// Segment texts trimmed and joined with single spaces. This is the
    /// normalized form used for structural comparison and formatting, so a
    /// directive whose arguments were split across lines compares equal to
    /// its single-line rendering.
    pub fn joined_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text().trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The discriminated payload of a raw node: its kind plus the fields
/// specific to that kind. Children live on the node, not here.
#[derive(Debug, Clone)]
pub enum RawData {
    Document,
    BlockQuote,
    CodeBlock {
        /// Info string of a fenced block (`rust` in ```` ```rust ````).
        language: Option<String>,
        content: String,
    },
    Heading {
        level: u32,
    },
    HtmlBlock {
        html: String,
    },
    List {
        ordered: bool,
        /// Starting index of an ordered list.
        start: Option<u64>,
    },
    ListItem {
        checkbox: Option<Checkbox>,
    },
    Paragraph,
    ThematicBreak,
    CustomBlock,
    BlockDirective {
        name: String,
        name_range: Option<SourceRange>,
        argument_text: DirectiveArgumentText,
    },
    Table {
        column_alignments: Vec<ColumnAlignment>,
    },
    TableHead,
    TableBody,
    TableRow,
    TableCell {
        colspan: u32,
        rowspan: u32,
    },
    Text {
        content: String,
    },
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        destination: Option<String>,
        title: Option<String>,
    },
    Image {
        source: Option<String>,
        title: Option<String>,
    },
    InlineCode {
        code: String,
    },
    SymbolLink {
        destination: Option<String>,
    },
    InlineHtml {
        html: String,
    },
    CustomInline {
        text: String,
    },
    LineBreak,
    SoftBreak,
    InlineAttributes {
        attributes: String,
    },
    DoxygenDiscussion,
    DoxygenNote,
    DoxygenAbstract,
    DoxygenParameter {
        name: String,
    },
    DoxygenReturns,
}

impl RawData {
    /// Total mapping from payload to kind.
    pub fn kind(&self) -> MarkupKind {
        match self {
            RawData::Document => MarkupKind::Document,
            RawData::BlockQuote => MarkupKind::BlockQuote,
            RawData::CodeBlock { .. } => MarkupKind::CodeBlock,
            RawData::Heading { .. } => MarkupKind::Heading,
            RawData::HtmlBlock { .. } => MarkupKind::HtmlBlock,
            RawData::List { .. } => MarkupKind::List,
            RawData::ListItem { .. } => MarkupKind::ListItem,
            RawData::Paragraph => MarkupKind::Paragraph,
            RawData::ThematicBreak => MarkupKind::ThematicBreak,
            RawData::CustomBlock => MarkupKind::CustomBlock,
            RawData::BlockDirective { .. } => MarkupKind::BlockDirective,
            RawData::Table { .. } => MarkupKind::Table,
            RawData::TableHead => MarkupKind::TableHead,
            RawData::TableBody => MarkupKind::TableBody,
            RawData::TableRow => MarkupKind::TableRow,
            RawData::TableCell { .. } => MarkupKind::TableCell,
            RawData::Text { .. } => MarkupKind::Text,
            RawData::Emphasis => MarkupKind::Emphasis,
            RawData::Strong => MarkupKind::Strong,
            RawData::Strikethrough => MarkupKind::Strikethrough,
            RawData::Link { .. } => MarkupKind::Link,
            RawData::Image { .. } => MarkupKind::Image,
            RawData::InlineCode { .. } => MarkupKind::InlineCode,
            RawData::SymbolLink { .. } => MarkupKind::SymbolLink,
            RawData::InlineHtml { .. } => MarkupKind::InlineHtml,
            RawData::CustomInline { .. } => MarkupKind::CustomInline,
            RawData::LineBreak => MarkupKind::LineBreak,
            RawData::SoftBreak => MarkupKind::SoftBreak,
            RawData::InlineAttributes { .. } => MarkupKind::InlineAttributes,
            RawData::DoxygenDiscussion => MarkupKind::DoxygenDiscussion,
            RawData::DoxygenNote => MarkupKind::DoxygenNote,
            RawData::DoxygenAbstract => MarkupKind::DoxygenAbstract,
            RawData::DoxygenParameter { .. } => MarkupKind::DoxygenParameter,
            RawData::DoxygenReturns => MarkupKind::DoxygenReturns,
        }
    }

    /// Payload equality for structural comparison. Ignores anything that
    /// records *where* the payload came from: name ranges, argument segment
    /// ranges and line splits. Directive argument text compares in its
    /// normalized joined form.
    pub(crate) fn matches(&self, other: &RawData) -> bool {
        use RawData::*;
        match (self, other) {
            (Document, Document)
            | (BlockQuote, BlockQuote)
            | (Paragraph, Paragraph)
            | (ThematicBreak, ThematicBreak)
            | (CustomBlock, CustomBlock)
            | (TableHead, TableHead)
            | (TableBody, TableBody)
            | (TableRow, TableRow)
            | (Emphasis, Emphasis)
            | (Strong, Strong)
            | (Strikethrough, Strikethrough)
            | (LineBreak, LineBreak)
            | (SoftBreak, SoftBreak)
            | (DoxygenDiscussion, DoxygenDiscussion)
            | (DoxygenNote, DoxygenNote)
            | (DoxygenAbstract, DoxygenAbstract)
            | (DoxygenReturns, DoxygenReturns) => true,
            (
                CodeBlock {
                    language: l1,
                    content: c1,
                },
                CodeBlock {
                    language: l2,
                    content: c2,
                },
            ) => l1 == l2 && c1 == c2,
            (Heading { level: a }, Heading { level: b }) => a == b,
            (HtmlBlock { html: a }, HtmlBlock { html: b }) => a == b,
            (
                List {
                    ordered: o1,
                    start: s1,
                },
                List {
                    ordered: o2,
                    start: s2,
                },
            ) => o1 == o2 && s1 == s2,
            (ListItem { checkbox: a }, ListItem { checkbox: b }) => a == b,
            (
                BlockDirective {
                    name: n1,
                    argument_text: a1,
                    ..
                },
                BlockDirective {
                    name: n2,
                    argument_text: a2,
                    ..
                },
            ) => n1 == n2 && a1.joined_text() == a2.joined_text(),
            (
                Table {
                    column_alignments: a,
                },
                Table {
                    column_alignments: b,
                },
            ) => a == b,
            (
                TableCell {
                    colspan: c1,
                    rowspan: r1,
                },
                TableCell {
                    colspan: c2,
                    rowspan: r2,
                },
            ) => c1 == c2 && r1 == r2,
            (Text { content: a }, Text { content: b }) => a == b,
            (
                Link {
                    destination: d1,
                    title: t1,
                },
                Link {
                    destination: d2,
                    title: t2,
                },
            ) => d1 == d2 && t1 == t2,
            (
                Image {
                    source: s1,
                    title: t1,
                },
                Image {
                    source: s2,
                    title: t2,
                },
            ) => s1 == s2 && t1 == t2,
            (InlineCode { code: a }, InlineCode { code: b }) => a == b,
            (SymbolLink { destination: a }, SymbolLink { destination: b }) => a == b,
            (InlineHtml { html: a }, InlineHtml { html: b }) => a == b,
            (CustomInline { text: a }, CustomInline { text: b }) => a == b,
            (InlineAttributes { attributes: a }, InlineAttributes { attributes: b }) => a == b,
            (DoxygenParameter { name: a }, DoxygenParameter { name: b }) => a == b,
            _ => false,
        }
    }
}
