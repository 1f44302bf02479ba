//! Plain markdown serialization of a markup tree.
//!
//! A visitor-driven printer producing CommonMark plus the directive and
//! Doxygen forms this crate parses. It aims for a clean, conventional
//! rendition whose re-parse is structurally equal to the input tree; it
//! does not try to reproduce the original source byte-for-byte.

use markdown_arbor_tree::{
    Checkbox, ColumnAlignment, MarkupKind, MarkupNode, MarkupVisitor, typed,
};

/// Serializes `node` (usually a document) back to markdown text.
pub fn to_markdown(node: &MarkupNode) -> String {
    let mut text = MarkdownWriter.visit(node);
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

struct MarkdownWriter;

impl MarkdownWriter {
    fn blocks(&mut self, node: &MarkupNode) -> Vec<String> {
        node.children().map(|child| self.visit(&child)).collect()
    }

    fn inlines(&mut self, node: &MarkupNode) -> String {
        node.children().map(|child| self.visit(&child)).collect()
    }

    fn doxygen(&mut self, word: &str, node: &MarkupNode) -> String {
        // description blocks join without blank lines: a blank would end
        // the command's capture on re-parse
        let description = self.blocks(node).join("\n");
        if description.is_empty() {
            format!("@{word}")
        } else {
            format!("@{word} {description}")
        }
    }
}

fn is_inline(kind: MarkupKind) -> bool {
    matches!(
        kind,
        MarkupKind::Text
            | MarkupKind::Emphasis
            | MarkupKind::Strong
            | MarkupKind::Strikethrough
            | MarkupKind::Link
            | MarkupKind::Image
            | MarkupKind::InlineCode
            | MarkupKind::SymbolLink
            | MarkupKind::InlineHtml
            | MarkupKind::CustomInline
            | MarkupKind::LineBreak
            | MarkupKind::SoftBreak
            | MarkupKind::InlineAttributes
    )
}

fn prefix_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_continuation(text: &str, indent: &str) -> String {
    let mut lines = text.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(indent);
        }
        out.push_str(line);
    }
    out
}

/// A fence long enough that the content cannot close it early.
fn fence_for(content: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for ch in content.chars() {
        if ch == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

impl MarkupVisitor for MarkdownWriter {
    type Result = String;

    fn visit_default(&mut self, node: &MarkupNode) -> String {
        self.blocks(node).join("\n\n")
    }

    fn visit_paragraph(&mut self, view: &typed::Paragraph) -> String {
        self.inlines(view.as_markup())
    }

    fn visit_heading(&mut self, view: &typed::Heading) -> String {
        let marker = "#".repeat(view.level() as usize);
        format!("{marker} {}", self.inlines(view.as_markup()))
    }

    fn visit_block_quote(&mut self, view: &typed::BlockQuote) -> String {
        let inner = self.blocks(view.as_markup()).join("\n\n");
        prefix_lines(&inner, "> ")
    }

    fn visit_code_block(&mut self, view: &typed::CodeBlock) -> String {
        let content = view.content();
        let fence = fence_for(content);
        let language = view.language().unwrap_or_default();
        let body = content.strip_suffix('\n').unwrap_or(content);
        format!("{fence}{language}\n{body}\n{fence}")
    }

    fn visit_html_block(&mut self, view: &typed::HtmlBlock) -> String {
        view.html().trim_end_matches('\n').to_string()
    }

    fn visit_thematic_break(&mut self, _view: &typed::ThematicBreak) -> String {
        "---".to_string()
    }

    fn visit_list(&mut self, view: &typed::List) -> String {
        let node = view.as_markup();
        // a list prints loose (blank lines between items) when any item
        // holds paragraph-level content, so looseness survives a re-parse
        let loose = node.children().any(|item| {
            item.children()
                .any(|child| child.kind() == MarkupKind::Paragraph)
        });
        let mut index = view.start_index().unwrap_or(1);
        let mut items = Vec::new();
        for item in node.children() {
            let view = typed::ListItem::try_from(item).expect("lists hold only list items");
            items.push(self.list_item(&view, view.as_markup(), index));
            index += 1;
        }
        items.join(if loose { "\n\n" } else { "\n" })
    }

    fn visit_table(&mut self, view: &typed::Table) -> String {
        let alignments = view.column_alignments().to_vec();
        let mut out = String::new();
        let head_cells: Vec<String> = view
            .head()
            .as_markup()
            .children()
            .map(|cell| self.inlines(&cell))
            .collect();
        out.push_str(&row_text(&head_cells));
        out.push('\n');
        out.push_str(&delimiter_row(&alignments));
        for row in view.body().as_markup().children() {
            let cells: Vec<String> = row.children().map(|cell| self.inlines(&cell)).collect();
            out.push('\n');
            out.push_str(&row_text(&cells));
        }
        out
    }

    fn visit_block_directive(&mut self, view: &typed::BlockDirective) -> String {
        let mut header = format!("@{}", view.name());
        let arguments = view.argument_text().joined_text();
        if !arguments.is_empty() {
            header.push_str(&format!("({arguments})"));
        }
        let contents = self.blocks(view.as_markup()).join("\n\n");
        if contents.is_empty() {
            header
        } else {
            format!("{header} {{\n{}\n}}", prefix_lines(&contents, "    "))
        }
    }

    fn visit_doxygen_discussion(&mut self, view: &typed::DoxygenDiscussion) -> String {
        self.doxygen("discussion", view.as_markup())
    }

    fn visit_doxygen_note(&mut self, view: &typed::DoxygenNote) -> String {
        self.doxygen("note", view.as_markup())
    }

    fn visit_doxygen_abstract(&mut self, view: &typed::DoxygenAbstract) -> String {
        self.doxygen("abstract", view.as_markup())
    }

    fn visit_doxygen_parameter(&mut self, view: &typed::DoxygenParameter) -> String {
        let word = format!("param {}", view.name());
        self.doxygen(&word, view.as_markup())
    }

    fn visit_doxygen_returns(&mut self, view: &typed::DoxygenReturns) -> String {
        self.doxygen("returns", view.as_markup())
    }

    fn visit_text(&mut self, view: &typed::Text) -> String {
        view.content().to_string()
    }

    fn visit_emphasis(&mut self, view: &typed::Emphasis) -> String {
        format!("*{}*", self.inlines(view.as_markup()))
    }

    fn visit_strong(&mut self, view: &typed::Strong) -> String {
        format!("**{}**", self.inlines(view.as_markup()))
    }

    fn visit_strikethrough(&mut self, view: &typed::Strikethrough) -> String {
        format!("~~{}~~", self.inlines(view.as_markup()))
    }

    fn visit_link(&mut self, view: &typed::Link) -> String {
        let text = self.inlines(view.as_markup());
        let destination = view.destination().unwrap_or_default();
        match view.title() {
            Some(title) => format!("[{text}]({destination} \"{title}\")"),
            None => format!("[{text}]({destination})"),
        }
    }

    fn visit_image(&mut self, view: &typed::Image) -> String {
        let text = self.inlines(view.as_markup());
        let source = view.source().unwrap_or_default();
        match view.title() {
            Some(title) => format!("![{text}]({source} \"{title}\")"),
            None => format!("![{text}]({source})"),
        }
    }

    fn visit_inline_code(&mut self, view: &typed::InlineCode) -> String {
        format!("`{}`", view.code())
    }

    fn visit_symbol_link(&mut self, view: &typed::SymbolLink) -> String {
        format!("``{}``", view.destination().unwrap_or_default())
    }

    fn visit_inline_html(&mut self, view: &typed::InlineHtml) -> String {
        view.html().to_string()
    }

    fn visit_custom_inline(&mut self, view: &typed::CustomInline) -> String {
        view.text().to_string()
    }

    fn visit_line_break(&mut self, _view: &typed::LineBreak) -> String {
        "\\\n".to_string()
    }

    fn visit_soft_break(&mut self, _view: &typed::SoftBreak) -> String {
        "\n".to_string()
    }

    fn visit_inline_attributes(&mut self, view: &typed::InlineAttributes) -> String {
        // no source syntax round-trips these; print the inline content
        self.inlines(view.as_markup())
    }
}

impl MarkdownWriter {
    fn list_item(&mut self, view: &typed::ListItem, node: &MarkupNode, index: u64) -> String {
        let ordered = node
            .parent()
            .is_some_and(|list| matches!(list.data(), markdown_arbor_tree::RawData::List { ordered: true, .. }));
        let mut marker = if ordered {
            format!("{index}. ")
        } else {
            "- ".to_string()
        };
        match view.checkbox() {
            Some(Checkbox::Checked) => marker.push_str("[x] "),
            Some(Checkbox::Unchecked) => marker.push_str("[ ] "),
            None => {}
        }
        let indent = " ".repeat(marker.len());

        // group consecutive inlines into one chunk; block children stand
        // alone
        let mut chunks: Vec<(bool, String)> = Vec::new();
        let mut inline_run = String::new();
        for child in node.children() {
            if is_inline(child.kind()) {
                inline_run.push_str(&self.visit(&child));
            } else {
                if !inline_run.is_empty() {
                    chunks.push((false, std::mem::take(&mut inline_run)));
                }
                chunks.push((child.kind() == MarkupKind::List, self.visit(&child)));
            }
        }
        if !inline_run.is_empty() {
            chunks.push((false, inline_run));
        }

        let mut body = String::new();
        for (position, (is_list, chunk)) in chunks.iter().enumerate() {
            if position > 0 {
                // a nested list attaches directly below its lead-in line
                body.push_str(if *is_list { "\n" } else { "\n\n" });
            }
            body.push_str(chunk);
        }
        format!("{marker}{}", indent_continuation(&body, &indent))
    }
}

fn row_text(cells: &[String]) -> String {
    let mut out = String::from("|");
    for cell in cells {
        out.push_str(&format!(" {cell} |"));
    }
    out
}

fn delimiter_row(alignments: &[ColumnAlignment]) -> String {
    let mut out = String::from("|");
    for alignment in alignments {
        let marker = match alignment {
            ColumnAlignment::Unspecified => "---",
            ColumnAlignment::Left => ":--",
            ColumnAlignment::Center => ":-:",
            ColumnAlignment::Right => "--:",
        };
        out.push_str(&format!(" {marker} |"));
    }
    out
}
