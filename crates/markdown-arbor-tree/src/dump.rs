//! Debug outline of a tree's structure.

use crate::node::MarkupNode;
use crate::raw::RawData;
use crate::visit::MarkupWalker;

/// Renders an indented outline of `node`'s subtree: one line per node with
/// its kind, a payload summary, and the parsed range when one is recorded.
/// Intended for tests and diagnostics, not for machine consumption.
pub fn dump_structure(node: &MarkupNode) -> String {
    let mut dumper = Dumper {
        out: String::new(),
        depth: 0,
    };
    dumper.walk(node);
    dumper.out
}

struct Dumper {
    out: String,
    depth: usize,
}

impl Dumper {
    fn describe(&self, node: &MarkupNode) -> String {
        let mut line = node.kind().name().to_string();
        if let Some(summary) = payload_summary(node.data()) {
            line.push(' ');
            line.push_str(&summary);
        }
        if let Some(range) = node.range() {
            line.push_str(&format!(" <{range}>"));
        }
        line
    }
}

impl MarkupWalker for Dumper {
    fn visit_default(&mut self, node: &MarkupNode) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(&self.describe(node));
        self.out.push('\n');
        self.depth += 1;
        self.descend_into(node);
        self.depth -= 1;
    }
}

fn quoted(text: &str) -> String {
    // keep dumps single-line even for multi-line payloads
    format!("{:?}", text)
}

fn payload_summary(data: &RawData) -> Option<String> {
    match data {
        RawData::CodeBlock { language, content } => Some(match language {
            Some(language) => format!("{} {}", language, quoted(content)),
            None => quoted(content),
        }),
        RawData::Heading { level } => Some(format!("level: {level}")),
        RawData::HtmlBlock { html } => Some(quoted(html)),
        RawData::List { ordered, start } => Some(match (ordered, start) {
            (true, Some(start)) => format!("ordered from {start}"),
            (true, None) => "ordered".to_string(),
            (false, _) => "unordered".to_string(),
        }),
        RawData::ListItem { checkbox: Some(c) } => Some(format!("{c:?}")),
        RawData::BlockDirective {
            name,
            argument_text,
            ..
        } => {
            let arguments = argument_text.joined_text();
            Some(if arguments.is_empty() {
                format!("@{name}")
            } else {
                format!("@{name}({arguments})")
            })
        }
        RawData::TableCell { colspan, rowspan } if *colspan != 1 || *rowspan != 1 => {
            Some(format!("{colspan}x{rowspan}"))
        }
        RawData::Text { content } => Some(quoted(content)),
        RawData::Link { destination, .. } => destination.as_deref().map(quoted),
        RawData::Image { source, .. } => source.as_deref().map(quoted),
        RawData::InlineCode { code } => Some(quoted(code)),
        RawData::SymbolLink { destination } => destination.as_deref().map(quoted),
        RawData::InlineHtml { html } => Some(quoted(html)),
        RawData::CustomInline { text } => Some(quoted(text)),
        RawData::InlineAttributes { attributes } => Some(quoted(attributes)),
        RawData::DoxygenParameter { name } => Some(name.clone()),
        _ => None,
    }
}
