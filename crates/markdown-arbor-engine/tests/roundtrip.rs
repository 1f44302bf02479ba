//! Formatting a parsed tree and re-parsing the output must reproduce the
//! original structure. The formatter does not chase byte-for-byte output,
//! so the comparison is structural: kinds, payloads, and child shapes.

use markdown_arbor_engine::{ParseOptions, parse_str, to_markdown};
use markdown_arbor_tree::dump_structure;
use rstest::rstest;

fn assert_roundtrip(input: &str, options: &ParseOptions) {
    let parsed = parse_str(input, options);
    let formatted = to_markdown(parsed.as_markup());
    let reparsed = parse_str(&formatted, options);
    // ranges differ between the two parses, so the comparison is the
    // structural relation; the outlines are only for the failure message
    assert!(
        parsed.as_markup().has_same_structure(reparsed.as_markup()),
        "structure diverged after formatting {input:?} as {formatted:?}\nparsed:\n{}\nreparsed:\n{}",
        dump_structure(parsed.as_markup()),
        dump_structure(reparsed.as_markup()),
    );
}

#[rstest]
#[case::heading_and_paragraph("# Title\n\nBody text.")]
#[case::block_quote_two_paragraphs("> quoted line\n>\n> second paragraph")]
#[case::thematic_break("before\n\n---\n\nafter")]
#[case::emphasis_nest("plain *emphasis* **strong** ~~struck~~ `code`")]
#[case::link_with_title("[text](https://example.com \"Title\")")]
#[case::hard_break("first line\\\nsecond line")]
fn commonmark_blocks_roundtrip(#[case] input: &str) {
    assert_roundtrip(input, &ParseOptions::new());
}

#[rstest]
#[case::one_level("- one\n- two")]
#[case::two_levels("- one\n  - nested")]
#[case::four_levels("- one\n  - two\n    - three\n      - four")]
#[case::loose("- first\n\n- second")]
#[case::ordered_from_three("3. three\n4. four")]
#[case::task_list("- [x] done\n- [ ] open")]
fn lists_roundtrip(#[case] input: &str) {
    assert_roundtrip(input, &ParseOptions::new());
}

#[rstest]
#[case::plain_fence("```\ncode line\n```")]
#[case::language_fence("```rust\nlet x = 1;\n```")]
#[case::fence_in_quote("> ```rust\n> let x = 1;\n> ```")]
#[case::quote_in_list("- item\n\n  > quoted inside")]
fn code_and_nesting_roundtrip(#[case] input: &str) {
    assert_roundtrip(input, &ParseOptions::new());
}

#[test]
fn tables_roundtrip() {
    assert_roundtrip(
        "| a | b | c |\n| :-- | :-: | --: |\n| 1 | 2 | 3 |\n| 4 | 5 | 6 |",
        &ParseOptions::new(),
    );
}

#[rstest]
#[case::name_only("@Marker")]
#[case::arguments_only("@Image(source: diagram.png, alt: overview)")]
#[case::brace_contents("@Outer {\n  A paragraph inside.\n}")]
#[case::nested("@Outer {\n  lead-in\n  @Inner {\n    deep\n  }\n}")]
#[case::list_content("@Outer {\n  - A\n  - *B*\n}")]
#[case::arguments_split_across_lines("@Outer(x: 1,\n       y: 2) {\n  content\n}")]
fn directives_roundtrip(#[case] input: &str) {
    let options = ParseOptions::new().block_directives(true);
    assert_roundtrip(input, &options);
}

#[rstest]
#[case::discussion("@discussion A longer explanation.")]
#[case::bare_discussion("@discussion")]
#[case::parameter("@param index the position to insert at")]
#[case::multi_line("@returns a sum\ncarried over two lines")]
#[case::stacked("@param a first\n@param b second\n@returns their sum")]
fn doxygen_commands_roundtrip(#[case] input: &str) {
    let options = ParseOptions::new().minimal_doxygen(true);
    assert_roundtrip(input, &options);
}

#[test]
fn symbol_links_roundtrip() {
    let options = ParseOptions::new().symbol_links(true);
    assert_roundtrip("see ``Node.children`` for details", &options);
}

#[test]
fn mixed_document_roundtrips() {
    let options = ParseOptions::new()
        .block_directives(true)
        .minimal_doxygen(true);
    assert_roundtrip(
        "# Overview\n\n@Metadata(version: 2) {\n  - supported\n  - stable\n}\n\nClosing words.",
        &options,
    );
}
