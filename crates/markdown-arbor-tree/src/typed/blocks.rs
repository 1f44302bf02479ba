//! Typed views for block-level kinds.

use crate::kind::MarkupKind;
use crate::node::MarkupNode;
use crate::raw::{Checkbox, RawData, RawNode};

use super::{raw_children, typed_node};

typed_node! {
    /// The root of a parsed document.
    Document
}

impl Document {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> Document {
        Document(MarkupNode::new_root(RawNode::document(
            None,
            raw_children(children),
        )))
    }
}

typed_node! {
    /// A `>`-prefixed quotation block.
    BlockQuote
}

impl BlockQuote {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> BlockQuote {
        BlockQuote(MarkupNode::new_root(RawNode::block_quote(
            None,
            raw_children(children),
        )))
    }
}

typed_node! {
    /// A fenced or indented code block. Leaf: the code is payload, not
    /// children.
    CodeBlock
}

impl CodeBlock {
    pub fn new(language: Option<String>, content: impl Into<String>) -> CodeBlock {
        CodeBlock(MarkupNode::new_root(RawNode::code_block(
            language,
            content.into(),
            None,
        )))
    }

    pub fn language(&self) -> Option<&str> {
        match self.0.data() {
            RawData::CodeBlock { language, .. } => language.as_deref(),
            _ => unreachable!("code block view over a different kind"),
        }
    }

    pub fn content(&self) -> &str {
        match self.0.data() {
            RawData::CodeBlock { content, .. } => content,
            _ => unreachable!("code block view over a different kind"),
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        let language = self.language().map(str::to_string);
        let raw = self.0.raw().with_data(RawData::CodeBlock {
            language,
            content: content.into(),
        });
        self.0 = self.0.replacing_self(raw, false);
    }

    pub fn set_language(&mut self, language: Option<String>) {
        let content = self.content().to_string();
        let raw = self
            .0
            .raw()
            .with_data(RawData::CodeBlock { language, content });
        self.0 = self.0.replacing_self(raw, false);
    }
}

typed_node! {
    /// An ATX or setext heading with a level of 1 through 6.
    Heading
}

impl Heading {
    pub fn new(level: u32, children: impl IntoIterator<Item = MarkupNode>) -> Heading {
        Heading(MarkupNode::new_root(RawNode::heading(
            level,
            None,
            raw_children(children),
        )))
    }

    pub fn level(&self) -> u32 {
        match self.0.data() {
            RawData::Heading { level } => *level,
            _ => unreachable!("heading view over a different kind"),
        }
    }

    pub fn set_level(&mut self, level: u32) {
        let raw = self.0.raw().with_data(RawData::Heading { level });
        self.0 = self.0.replacing_self(raw, false);
    }
}

typed_node! {
    /// A raw HTML block, stored verbatim.
    HtmlBlock
}

impl HtmlBlock {
    pub fn new(html: impl Into<String>) -> HtmlBlock {
        HtmlBlock(MarkupNode::new_root(RawNode::html_block(html.into(), None)))
    }

    pub fn html(&self) -> &str {
        match self.0.data() {
            RawData::HtmlBlock { html } => html,
            _ => unreachable!("html block view over a different kind"),
        }
    }
}

typed_node! {
    /// An ordered or unordered list. Children are always list items.
    List
}

impl List {
    pub fn new(
        ordered: bool,
        start: Option<u64>,
        items: impl IntoIterator<Item = ListItem>,
    ) -> List {
        let raws = items.into_iter().map(|i| i.into_markup().raw().clone()).collect();
        List(MarkupNode::new_root(RawNode::list(ordered, start, None, raws)))
    }

    pub fn is_ordered(&self) -> bool {
        match self.0.data() {
            RawData::List { ordered, .. } => *ordered,
            _ => unreachable!("list view over a different kind"),
        }
    }

    /// Starting index of an ordered list, `None` for unordered lists.
    pub fn start_index(&self) -> Option<u64> {
        match self.0.data() {
            RawData::List { start, .. } => *start,
            _ => unreachable!("list view over a different kind"),
        }
    }

    pub fn set_start_index(&mut self, start: Option<u64>) {
        let ordered = self.is_ordered();
        let raw = self.0.raw().with_data(RawData::List { ordered, start });
        self.0 = self.0.replacing_self(raw, false);
    }
}

typed_node! {
    /// One item of a list, optionally carrying a task checkbox.
    ListItem
}

impl ListItem {
    pub fn new(
        checkbox: Option<Checkbox>,
        children: impl IntoIterator<Item = MarkupNode>,
    ) -> ListItem {
        ListItem(MarkupNode::new_root(RawNode::list_item(
            checkbox,
            None,
            raw_children(children),
        )))
    }

    pub fn checkbox(&self) -> Option<Checkbox> {
        match self.0.data() {
            RawData::ListItem { checkbox } => *checkbox,
            _ => unreachable!("list item view over a different kind"),
        }
    }

    pub fn set_checkbox(&mut self, checkbox: Option<Checkbox>) {
        let raw = self.0.raw().with_data(RawData::ListItem { checkbox });
        self.0 = self.0.replacing_self(raw, false);
    }
}

typed_node! {
    /// A paragraph of inline content.
    Paragraph
}

impl Paragraph {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> Paragraph {
        Paragraph(MarkupNode::new_root(RawNode::paragraph(
            None,
            raw_children(children),
        )))
    }
}

typed_node! {
    /// A horizontal rule.
    ThematicBreak
}

impl ThematicBreak {
    pub fn new() -> ThematicBreak {
        ThematicBreak(MarkupNode::new_root(RawNode::thematic_break(None)))
    }
}

impl Default for ThematicBreak {
    fn default() -> Self {
        Self::new()
    }
}

typed_node! {
    /// An opaque block container for consumers layering their own
    /// constructs onto the tree. No source syntax produces it.
    CustomBlock
}

impl CustomBlock {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> CustomBlock {
        CustomBlock(MarkupNode::new_root(RawNode::custom_block(
            None,
            raw_children(children),
        )))
    }
}
