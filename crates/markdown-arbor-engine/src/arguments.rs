//! Name-value argument lists of block directives.
//!
//! Argument text is whatever sat between a directive's parentheses, kept
//! verbatim (one segment per source line) on the directive node. This
//! module parses that text into `name: value` pairs on demand. Parsing is
//! tolerant: problems are collected as typed diagnostics alongside the
//! best-effort argument list, and never abort; a malformed list still
//! yields every argument that could be recovered.

use thiserror::Error;

use markdown_arbor_tree::{DirectiveArgumentText, SourceLocation, SourceRange};

/// One parsed `name: value` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveArgument {
    /// Empty for an unlabeled argument (`@Name(value)`).
    pub name: String,
    /// Where the name appeared; `None` for unlabeled arguments or text
    /// without recorded positions.
    pub name_range: Option<SourceRange>,
    pub value: String,
    pub value_range: Option<SourceRange>,
}

/// A problem found while parsing argument text. Diagnostics accompany the
/// recovered arguments; they are never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentDiagnostic {
    #[error("duplicate argument `{name}`")]
    DuplicateArgument {
        name: String,
        first: Option<SourceRange>,
        duplicate: Option<SourceRange>,
    },
    #[error("expected `{expected}`")]
    MissingExpectedCharacter {
        expected: char,
        location: Option<SourceLocation>,
    },
    #[error("unexpected `{found}`")]
    UnexpectedCharacter {
        found: char,
        location: Option<SourceLocation>,
    },
}

/// Result of parsing a directive's argument text.
#[derive(Debug, Clone, Default)]
pub struct ArgumentParse {
    pub arguments: Vec<DirectiveArgument>,
    pub diagnostics: Vec<ArgumentDiagnostic>,
}

/// Parses `text` into arguments plus whatever diagnostics came up.
pub fn parse_directive_arguments(text: &DirectiveArgumentText) -> ArgumentParse {
    let mut scanner = Scanner::new(text);
    let mut parse = ArgumentParse::default();
    let mut seen: Vec<(String, Option<SourceRange>)> = Vec::new();

    loop {
        scanner.skip_whitespace();
        if scanner.is_at_end() {
            break;
        }
        if scanner.peek() == Some(',') {
            parse.diagnostics.push(ArgumentDiagnostic::UnexpectedCharacter {
                found: ',',
                location: scanner.location(),
            });
            scanner.bump();
            continue;
        }

        let first = scanner.literal(&mut parse.diagnostics);
        if first.text.is_empty() {
            // something that can start neither a name nor a value, e.g. a
            // stray `:`; skip it and resynchronize
            if let Some(found) = scanner.peek() {
                parse.diagnostics.push(ArgumentDiagnostic::UnexpectedCharacter {
                    found,
                    location: scanner.location(),
                });
                scanner.bump();
                scanner.skip_to_boundary();
            }
            continue;
        }

        let after_name = scanner.location();
        scanner.skip_whitespace();
        let argument = match scanner.peek() {
            Some(':') => {
                scanner.bump();
                scanner.skip_whitespace();
                let value = scanner.literal(&mut parse.diagnostics);
                DirectiveArgument {
                    name: first.text,
                    name_range: first.range,
                    value: value.text,
                    value_range: value.range,
                }
            }
            Some(ch) if ch != ',' => {
                // a second literal right after the first: the `:` between a
                // name and its value is missing
                parse.diagnostics.push(ArgumentDiagnostic::MissingExpectedCharacter {
                    expected: ':',
                    location: after_name,
                });
                let value = scanner.literal(&mut parse.diagnostics);
                DirectiveArgument {
                    name: first.text,
                    name_range: first.range,
                    value: value.text,
                    value_range: value.range,
                }
            }
            _ => DirectiveArgument {
                name: String::new(),
                name_range: None,
                value: first.text,
                value_range: first.range,
            },
        };

        if !argument.name.is_empty() {
            match seen.iter().find(|(name, _)| *name == argument.name) {
                Some((_, first_range)) => {
                    parse.diagnostics.push(ArgumentDiagnostic::DuplicateArgument {
                        name: argument.name.clone(),
                        first: first_range.clone(),
                        duplicate: argument.name_range.clone(),
                    });
                }
                None => seen.push((argument.name.clone(), argument.name_range.clone())),
            }
        }
        parse.arguments.push(argument);

        scanner.skip_whitespace();
        match scanner.peek() {
            None => break,
            Some(',') => {
                scanner.bump();
            }
            Some(found) => {
                parse.diagnostics.push(ArgumentDiagnostic::UnexpectedCharacter {
                    found,
                    location: scanner.location(),
                });
                scanner.skip_to_boundary();
            }
        }
    }
    parse
}

/// Parses `text` and discards the diagnostics, for callers that only want
/// whatever arguments could be recovered.
pub fn directive_arguments(text: &DirectiveArgumentText) -> Vec<DirectiveArgument> {
    parse_directive_arguments(text).arguments
}

struct PositionedChar {
    ch: char,
    location: Option<SourceLocation>,
}

/// A cursor over argument text flattened to one positioned character
/// sequence. Segments from separate source lines are joined with an
/// unpositioned space, so a list split across lines parses as one list.
struct Scanner {
    chars: Vec<PositionedChar>,
    index: usize,
}

struct Literal {
    text: String,
    range: Option<SourceRange>,
}

impl Scanner {
    fn new(text: &DirectiveArgumentText) -> Self {
        let mut chars = Vec::new();
        for (i, segment) in text.segments.iter().enumerate() {
            if i > 0 {
                chars.push(PositionedChar {
                    ch: ' ',
                    location: None,
                });
            }
            let base = segment.range.as_ref().map(|r| r.start.clone());
            for (offset, ch) in segment.text().char_indices() {
                let location = base.as_ref().map(|b| {
                    SourceLocation::new(b.line, b.column + offset, b.source.clone())
                });
                chars.push(PositionedChar { ch, location });
            }
        }
        Self { chars, index: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).map(|c| c.ch)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.index += 1;
        Some(ch)
    }

    /// Location of the next character, or one past the final character at
    /// the end of the text.
    fn location(&self) -> Option<SourceLocation> {
        match self.chars.get(self.index) {
            Some(c) => c.location.clone(),
            None => self.chars.last().and_then(|c| {
                c.location.clone().map(|l| {
                    SourceLocation::new(l.line, l.column + c.ch.len_utf8(), l.source)
                })
            }),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.index += 1;
        }
    }

    /// Recovery: skips ahead to just past the next comma, or to the end.
    fn skip_to_boundary(&mut self) {
        while let Some(ch) = self.bump() {
            if ch == ',' {
                break;
            }
        }
    }

    /// Scans a quoted or bare literal. Returns an empty literal without
    /// consuming anything if the next character cannot start one.
    fn literal(&mut self, diagnostics: &mut Vec<ArgumentDiagnostic>) -> Literal {
        if self.peek() == Some('"') {
            return self.quoted_literal(diagnostics);
        }
        let start = self.location();
        let mut text = String::new();
        let mut end = None;
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || matches!(ch, ',' | ':' | '"') {
                break;
            }
            text.push(ch);
            self.index += 1;
            end = self.location();
        }
        let range = match (start, end) {
            (Some(start), Some(end)) if !text.is_empty() => Some(SourceRange::new(start, end)),
            _ => None,
        };
        Literal { text, range }
    }

    fn quoted_literal(&mut self, diagnostics: &mut Vec<ArgumentDiagnostic>) -> Literal {
        let start = self.location();
        self.bump(); // opening quote
        let mut text = String::new();
        let mut closed = false;
        while let Some(ch) = self.bump() {
            match ch {
                '"' => {
                    closed = true;
                    break;
                }
                '\\' => {
                    // an escape keeps the next character literal; a trailing
                    // backslash is kept as-is
                    match self.bump() {
                        Some(escaped) => text.push(escaped),
                        None => text.push('\\'),
                    }
                }
                _ => text.push(ch),
            }
        }
        if !closed {
            diagnostics.push(ArgumentDiagnostic::MissingExpectedCharacter {
                expected: '"',
                location: self.location(),
            });
        }
        let end = self.location();
        let range = match (start, end) {
            (Some(start), Some(end)) => Some(SourceRange::new(start, end)),
            _ => None,
        };
        Literal { text, range }
    }
}
