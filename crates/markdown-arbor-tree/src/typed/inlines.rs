//! Typed views for inline kinds.

use crate::kind::MarkupKind;
use crate::node::MarkupNode;
use crate::raw::{RawData, RawNode};

use super::{raw_children, typed_node};

typed_node! {
    /// Literal text.
    Text
}

impl Text {
    pub fn new(content: impl Into<String>) -> Text {
        Text(MarkupNode::new_root(RawNode::text(content.into(), None)))
    }

    pub fn content(&self) -> &str {
        match self.0.data() {
            RawData::Text { content } => content,
            _ => unreachable!("text view over a different kind"),
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        let raw = self.0.raw().with_data(RawData::Text {
            content: content.into(),
        });
        self.0 = self.0.replacing_self(raw, false);
    }
}

typed_node! {
    /// Emphasized (`*...*`) inline content.
    Emphasis
}

impl Emphasis {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> Emphasis {
        Emphasis(MarkupNode::new_root(RawNode::emphasis(
            None,
            raw_children(children),
        )))
    }
}

typed_node! {
    /// Strong (`**...**`) inline content.
    Strong
}

impl Strong {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> Strong {
        Strong(MarkupNode::new_root(RawNode::strong(
            None,
            raw_children(children),
        )))
    }
}

typed_node! {
    /// Struck-through (`~~...~~`) inline content.
    Strikethrough
}

impl Strikethrough {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> Strikethrough {
        Strikethrough(MarkupNode::new_root(RawNode::strikethrough(
            None,
            raw_children(children),
        )))
    }
}

typed_node! {
    /// A link with optional destination and title.
    Link
}

impl Link {
    pub fn new(
        destination: Option<String>,
        title: Option<String>,
        children: impl IntoIterator<Item = MarkupNode>,
    ) -> Link {
        Link(MarkupNode::new_root(RawNode::link(
            destination,
            title,
            None,
            raw_children(children),
        )))
    }

    pub fn destination(&self) -> Option<&str> {
        match self.0.data() {
            RawData::Link { destination, .. } => destination.as_deref(),
            _ => unreachable!("link view over a different kind"),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self.0.data() {
            RawData::Link { title, .. } => title.as_deref(),
            _ => unreachable!("link view over a different kind"),
        }
    }

    pub fn set_destination(&mut self, destination: Option<String>) {
        let title = self.title().map(str::to_string);
        let raw = self
            .0
            .raw()
            .with_data(RawData::Link { destination, title });
        self.0 = self.0.replacing_self(raw, false);
    }
}

typed_node! {
    /// An image with optional source and title.
    Image
}

impl Image {
    pub fn new(
        source: Option<String>,
        title: Option<String>,
        children: impl IntoIterator<Item = MarkupNode>,
    ) -> Image {
        Image(MarkupNode::new_root(RawNode::image(
            source,
            title,
            None,
            raw_children(children),
        )))
    }

    pub fn source(&self) -> Option<&str> {
        match self.0.data() {
            RawData::Image { source, .. } => source.as_deref(),
            _ => unreachable!("image view over a different kind"),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self.0.data() {
            RawData::Image { title, .. } => title.as_deref(),
            _ => unreachable!("image view over a different kind"),
        }
    }
}

typed_node! {
    /// An inline code span.
    InlineCode
}

impl InlineCode {
    pub fn new(code: impl Into<String>) -> InlineCode {
        InlineCode(MarkupNode::new_root(RawNode::inline_code(code.into(), None)))
    }

    pub fn code(&self) -> &str {
        match self.0.data() {
            RawData::InlineCode { code } => code,
            _ => unreachable!("inline code view over a different kind"),
        }
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        let raw = self
            .0
            .raw()
            .with_data(RawData::InlineCode { code: code.into() });
        self.0 = self.0.replacing_self(raw, false);
    }
}

typed_node! {
    /// A double-backtick code span promoted to a symbol reference.
    SymbolLink
}

impl SymbolLink {
    pub fn new(destination: Option<String>) -> SymbolLink {
        SymbolLink(MarkupNode::new_root(RawNode::symbol_link(destination, None)))
    }

    pub fn destination(&self) -> Option<&str> {
        match self.0.data() {
            RawData::SymbolLink { destination } => destination.as_deref(),
            _ => unreachable!("symbol link view over a different kind"),
        }
    }

    pub fn set_destination(&mut self, destination: Option<String>) {
        let raw = self.0.raw().with_data(RawData::SymbolLink { destination });
        self.0 = self.0.replacing_self(raw, false);
    }
}

typed_node! {
    /// Raw inline HTML, stored verbatim.
    InlineHtml
}

impl InlineHtml {
    pub fn new(html: impl Into<String>) -> InlineHtml {
        InlineHtml(MarkupNode::new_root(RawNode::inline_html(html.into(), None)))
    }

    pub fn html(&self) -> &str {
        match self.0.data() {
            RawData::InlineHtml { html } => html,
            _ => unreachable!("inline html view over a different kind"),
        }
    }
}

typed_node! {
    /// An opaque inline for consumer-defined constructs. No source syntax
    /// produces it.
    CustomInline
}

impl CustomInline {
    pub fn new(text: impl Into<String>) -> CustomInline {
        CustomInline(MarkupNode::new_root(RawNode::custom_inline(
            text.into(),
            None,
        )))
    }

    pub fn text(&self) -> &str {
        match self.0.data() {
            RawData::CustomInline { text } => text,
            _ => unreachable!("custom inline view over a different kind"),
        }
    }
}

typed_node! {
    /// A hard line break.
    LineBreak
}

impl LineBreak {
    pub fn new() -> LineBreak {
        LineBreak(MarkupNode::new_root(RawNode::line_break(None)))
    }
}

impl Default for LineBreak {
    fn default() -> Self {
        Self::new()
    }
}

typed_node! {
    /// A soft line break.
    SoftBreak
}

impl SoftBreak {
    pub fn new() -> SoftBreak {
        SoftBreak(MarkupNode::new_root(RawNode::soft_break(None)))
    }
}

impl Default for SoftBreak {
    fn default() -> Self {
        Self::new()
    }
}

typed_node! {
    /// Inline content tagged with an attribute string.
    InlineAttributes
}

impl InlineAttributes {
    pub fn new(
        attributes: impl Into<String>,
        children: impl IntoIterator<Item = MarkupNode>,
    ) -> InlineAttributes {
        InlineAttributes(MarkupNode::new_root(RawNode::inline_attributes(
            attributes.into(),
            None,
            raw_children(children),
        )))
    }

    pub fn attributes(&self) -> &str {
        match self.0.data() {
            RawData::InlineAttributes { attributes } => attributes,
            _ => unreachable!("inline attributes view over a different kind"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_edit() {
        let mut text = Text::new("before");
        assert_eq!(text.content(), "before");
        text.set_content("after");
        assert_eq!(text.content(), "after");
    }

    #[test]
    fn link_payload() {
        let link = Link::new(
            Some("https://example.com".to_string()),
            None,
            [Text::new("here").into_markup()],
        );
        assert_eq!(link.destination(), Some("https://example.com"));
        assert_eq!(link.title(), None);
        assert_eq!(link.as_markup().child_count(), 1);
    }

    #[test]
    fn symbol_link_is_distinct_from_inline_code() {
        let symbol = SymbolLink::new(Some("Rope.append".to_string()));
        assert_eq!(symbol.as_markup().kind(), MarkupKind::SymbolLink);
        assert!(InlineCode::try_from(symbol.into_markup()).is_err());
    }
}
