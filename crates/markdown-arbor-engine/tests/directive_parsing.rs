//! End-to-end parses of the custom container layer: source ranges restored
//! through indentation stripping, argument diagnostics, code-fence
//! suppression, and the tolerance guarantees for malformed syntax.

use markdown_arbor_engine::{
    ArgumentDiagnostic, ParseOptions, directive_arguments, parse_directive_arguments, parse_str,
};
use markdown_arbor_tree::typed::BlockDirective;
use markdown_arbor_tree::{MarkupKind, MarkupNode};
use rstest::rstest;

fn directives() -> ParseOptions {
    ParseOptions::new().block_directives(true)
}

fn first_directive(text: &str) -> BlockDirective {
    let doc = parse_str(text, &directives());
    let node = doc
        .as_markup()
        .child_at(0)
        .unwrap_or_else(|| panic!("no top-level node in {text:?}"));
    BlockDirective::try_from(node).expect("first node is a directive")
}

#[test]
fn sub_parsed_ranges_come_back_in_document_coordinates() {
    let doc = parse_str("@Outer {\n  - A\n  - *B*\n}", &directives());
    let directive = doc.as_markup().child_at(0).unwrap();
    assert_eq!(directive.kind(), MarkupKind::BlockDirective);

    // the directive spans from the @ through the closing brace
    let range = directive.range().unwrap();
    assert_eq!((range.start.line, range.start.column), (1, 1));
    assert_eq!((range.end.line, range.end.column), (4, 2));

    // list items keep their original lines and columns, not the stripped
    // sub-parse's line 1
    let list = directive.child_at(0).unwrap();
    assert_eq!(list.kind(), MarkupKind::List);
    let item_a = list.child_at(0).unwrap();
    let a_range = item_a.range().unwrap();
    assert_eq!((a_range.start.line, a_range.start.column), (2, 3));

    let item_b = list.child_at(1).unwrap();
    let b_range = item_b.range().unwrap();
    assert_eq!((b_range.start.line, b_range.start.column), (3, 3));

    // the emphasis sits two columns into its item
    let emphasis = item_b.child_at(0).unwrap();
    assert_eq!(emphasis.kind(), MarkupKind::Emphasis);
    let e_range = emphasis.range().unwrap();
    assert_eq!((e_range.start.line, e_range.start.column), (3, 5));
}

#[test]
fn labeled_argument_parses_without_diagnostics() {
    let directive = first_directive("@Outer(x: 1)");
    let parse = parse_directive_arguments(directive.argument_text());
    assert!(parse.diagnostics.is_empty());
    assert_eq!(parse.arguments.len(), 1);
    assert_eq!(parse.arguments[0].name, "x");
    assert_eq!(parse.arguments[0].value, "1");
    // positions point into the original document line
    let name_range = parse.arguments[0].name_range.as_ref().unwrap();
    assert_eq!((name_range.start.line, name_range.start.column), (1, 8));
}

#[test]
fn missing_colons_are_reported_after_each_bare_name() {
    let directive = first_directive("@Outer(x 1, y 2)");
    let parse = parse_directive_arguments(directive.argument_text());
    assert_eq!(parse.arguments.len(), 2);
    assert_eq!(parse.arguments[0].name, "x");
    assert_eq!(parse.arguments[0].value, "1");
    assert_eq!(parse.arguments[1].name, "y");
    assert_eq!(parse.arguments[1].value, "2");

    let columns: Vec<usize> = parse
        .diagnostics
        .iter()
        .map(|diagnostic| match diagnostic {
            ArgumentDiagnostic::MissingExpectedCharacter {
                expected: ':',
                location: Some(location),
            } => location.column,
            other => panic!("unexpected diagnostic {other:?}"),
        })
        .collect();
    // immediately after `x` (column 8) and `y` (column 13)
    assert_eq!(columns, [9, 14]);
}

#[test]
fn unlabeled_argument_keeps_an_empty_name() {
    let directive = first_directive("@Outer(unlabeledArgumentValue)");
    let parse = parse_directive_arguments(directive.argument_text());
    assert!(parse.diagnostics.is_empty());
    assert_eq!(parse.arguments.len(), 1);
    assert_eq!(parse.arguments[0].name, "");
    assert!(parse.arguments[0].name_range.is_none());
    assert_eq!(parse.arguments[0].value, "unlabeledArgumentValue");
}

#[rstest]
#[case::empty_parens("@Outer()")]
#[case::no_parens("@Outer")]
fn absent_arguments_leave_the_text_empty(#[case] input: &str) {
    let directive = first_directive(input);
    assert!(directive.argument_text().is_empty());
    assert!(directive_arguments(directive.argument_text()).is_empty());
}

#[test]
fn duplicate_names_report_both_occurrences() {
    let directive = first_directive("@Outer(x: 1, x: 2)");
    let parse = parse_directive_arguments(directive.argument_text());
    assert_eq!(parse.arguments.len(), 2);
    match &parse.diagnostics[..] {
        [ArgumentDiagnostic::DuplicateArgument {
            name,
            first: Some(first),
            duplicate: Some(duplicate),
        }] => {
            assert_eq!(name, "x");
            assert!(first.start.column < duplicate.start.column);
        }
        other => panic!("unexpected diagnostics {other:?}"),
    }
}

#[test]
fn fenced_code_never_opens_or_closes_directives() {
    let doc = parse_str("@Outer {\n```\n@notADirective\n}\n```\n}", &directives());
    let node = doc.as_markup();
    assert_eq!(node.child_count(), 1);

    let directive = node.child_at(0).unwrap();
    assert_eq!(directive.kind(), MarkupKind::BlockDirective);
    assert_eq!(directive.child_count(), 1);

    let code = directive.child_at(0).unwrap();
    assert_eq!(code.kind(), MarkupKind::CodeBlock);
    match code.data() {
        markdown_arbor_tree::RawData::CodeBlock { content, .. } => {
            assert_eq!(content, "@notADirective\n}\n");
        }
        other => panic!("expected a code block, got {other:?}"),
    }
}

#[test]
fn four_column_indentation_protects_directive_lookalikes() {
    let doc = parse_str("paragraph\n\n    @NotReal(x: 1)", &directives());
    let kinds: Vec<MarkupKind> = doc.as_markup().children().map(|c| c.kind()).collect();
    assert_eq!(kinds, [MarkupKind::Paragraph, MarkupKind::CodeBlock]);
}

#[test]
fn one_brace_closes_directives_and_restarts_trailing_text() {
    let doc = parse_str("@Outer {\ninside\n} trailing words", &directives());
    let kinds: Vec<MarkupKind> = doc.as_markup().children().map(|c| c.kind()).collect();
    assert_eq!(kinds, [MarkupKind::BlockDirective, MarkupKind::Paragraph]);
}

#[test]
fn doxygen_prefixes_are_interchangeable() {
    let options = ParseOptions::new().minimal_doxygen(true);
    let at = parse_str(
        "@param first the first value\n@param second the second value\n@discussion overall notes",
        &options,
    );
    let backslash = parse_str(
        "\\param first the first value\n\\param second the second value\n\\discussion overall notes",
        &options,
    );
    assert!(at.as_markup().has_same_structure(backslash.as_markup()));

    let kinds: Vec<MarkupKind> = at.as_markup().children().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        [
            MarkupKind::DoxygenParameter,
            MarkupKind::DoxygenParameter,
            MarkupKind::DoxygenDiscussion
        ]
    );
}

/// Malformed directive syntax flattens into ordinary markup or an
/// unclosed-but-present directive; it never fails the parse.
#[rstest]
#[case::bare_at("@")]
#[case::unclosed_arguments("@Outer(x: 1")]
#[case::unclosed_contents("@Outer {\nstill open")]
#[case::stray_brace("}")]
#[case::brace_after_text("text\n}")]
#[case::nested_unclosed("@A {\n@B {\n@C {")]
fn malformed_syntax_still_yields_a_document(#[case] input: &str) {
    let doc = parse_str(input, &directives());
    assert_eq!(doc.as_markup().kind(), MarkupKind::Document);
}

#[test]
fn directive_name_location_is_recorded() {
    let directive = first_directive("@Snippet(path: \"x.rs\")");
    assert_eq!(directive.name(), "Snippet");
    let name_range = directive.name_range().unwrap();
    assert_eq!((name_range.start.line, name_range.start.column), (1, 2));
    assert_eq!(name_range.end.column, 9);
}

fn collect_kinds(node: &MarkupNode, kinds: &mut Vec<MarkupKind>) {
    kinds.push(node.kind());
    for child in node.children() {
        collect_kinds(&child, kinds);
    }
}

#[test]
fn directives_nest_and_lower_recursively() {
    let doc = parse_str(
        "@Outer(style: wide) {\n  lead-in text\n  @Inner {\n    deep text\n  }\n}",
        &directives(),
    );
    let mut kinds = Vec::new();
    collect_kinds(doc.as_markup(), &mut kinds);
    assert_eq!(
        kinds,
        [
            MarkupKind::Document,
            MarkupKind::BlockDirective,
            MarkupKind::Paragraph,
            MarkupKind::Text,
            MarkupKind::BlockDirective,
            MarkupKind::Paragraph,
            MarkupKind::Text,
        ]
    );
}
