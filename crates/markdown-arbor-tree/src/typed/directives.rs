//! Typed views for block directives and Doxygen-style commands.

use crate::kind::MarkupKind;
use crate::node::MarkupNode;
use crate::raw::{DirectiveArgumentText, RawData, RawNode};
use crate::source::SourceRange;

use super::{raw_children, typed_node};

typed_node! {
    /// A custom `@Name(arguments) { content }` block layered on top of the
    /// CommonMark grammar.
    BlockDirective
}

impl BlockDirective {
    pub fn new(
        name: impl Into<String>,
        argument_text: DirectiveArgumentText,
        children: impl IntoIterator<Item = MarkupNode>,
    ) -> BlockDirective {
        BlockDirective(MarkupNode::new_root(RawNode::block_directive(
            name.into(),
            None,
            argument_text,
            None,
            raw_children(children),
        )))
    }

    pub fn name(&self) -> &str {
        match self.0.data() {
            RawData::BlockDirective { name, .. } => name,
            _ => unreachable!("directive view over a different kind"),
        }
    }

    /// Where the directive's name appeared in the source, when parsed.
    pub fn name_range(&self) -> Option<&SourceRange> {
        match self.0.data() {
            RawData::BlockDirective { name_range, .. } => name_range.as_ref(),
            _ => unreachable!("directive view over a different kind"),
        }
    }

    /// The raw argument region, one segment per source line.
    pub fn argument_text(&self) -> &DirectiveArgumentText {
        match self.0.data() {
            RawData::BlockDirective { argument_text, .. } => argument_text,
            _ => unreachable!("directive view over a different kind"),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let argument_text = self.argument_text().clone();
        let raw = self.0.raw().with_data(RawData::BlockDirective {
            name: name.into(),
            name_range: None,
            argument_text,
        });
        self.0 = self.0.replacing_self(raw, false);
    }

    pub fn set_argument_text(&mut self, argument_text: DirectiveArgumentText) {
        let name = self.name().to_string();
        let raw = self.0.raw().with_data(RawData::BlockDirective {
            name,
            name_range: None,
            argument_text,
        });
        self.0 = self.0.replacing_self(raw, false);
    }
}

typed_node! {
    /// An `@discussion` command's captured description.
    DoxygenDiscussion
}

impl DoxygenDiscussion {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> DoxygenDiscussion {
        DoxygenDiscussion(MarkupNode::new_root(RawNode::doxygen_discussion(
            None,
            raw_children(children),
        )))
    }
}

typed_node! {
    /// An `@note` command's captured description.
    DoxygenNote
}

impl DoxygenNote {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> DoxygenNote {
        DoxygenNote(MarkupNode::new_root(RawNode::doxygen_note(
            None,
            raw_children(children),
        )))
    }
}

typed_node! {
    /// An `@abstract` (or `@brief`) command's captured description.
    DoxygenAbstract
}

impl DoxygenAbstract {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> DoxygenAbstract {
        DoxygenAbstract(MarkupNode::new_root(RawNode::doxygen_abstract(
            None,
            raw_children(children),
        )))
    }
}

typed_node! {
    /// An `@param name` command: the named parameter plus its description.
    DoxygenParameter
}

impl DoxygenParameter {
    pub fn new(
        name: impl Into<String>,
        children: impl IntoIterator<Item = MarkupNode>,
    ) -> DoxygenParameter {
        DoxygenParameter(MarkupNode::new_root(RawNode::doxygen_parameter(
            name.into(),
            None,
            raw_children(children),
        )))
    }

    pub fn name(&self) -> &str {
        match self.0.data() {
            RawData::DoxygenParameter { name } => name,
            _ => unreachable!("parameter view over a different kind"),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let raw = self
            .0
            .raw()
            .with_data(RawData::DoxygenParameter { name: name.into() });
        self.0 = self.0.replacing_self(raw, false);
    }
}

typed_node! {
    /// An `@returns` command's captured description.
    DoxygenReturns
}

impl DoxygenReturns {
    pub fn new(children: impl IntoIterator<Item = MarkupNode>) -> DoxygenReturns {
        DoxygenReturns(MarkupNode::new_root(RawNode::doxygen_returns(
            None,
            raw_children(children),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::{Paragraph, Text};

    #[test]
    fn directive_payload() {
        let directive = BlockDirective::new(
            "Snippet",
            DirectiveArgumentText::from_text("path: \"example.rs\""),
            [Paragraph::new([Text::new("body").into_markup()]).into_markup()],
        );
        assert_eq!(directive.name(), "Snippet");
        assert!(directive.name_range().is_none());
        assert_eq!(
            directive.argument_text().joined_text(),
            "path: \"example.rs\""
        );
        assert_eq!(directive.as_markup().child_count(), 1);
        assert_eq!(directive.as_markup().kind(), MarkupKind::BlockDirective);
    }

    #[test]
    fn parameter_rename() {
        let mut param = DoxygenParameter::new("index", []);
        assert_eq!(param.name(), "index");
        param.set_name("offset");
        assert_eq!(param.name(), "offset");
    }
}
