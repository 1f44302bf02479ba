//! Minimal Doxygen-style command recognition.
//!
//! A closed set of single-purpose commands, introduced by `@` or `\`:
//! `discussion`, `note`, `brief`/`abstract`, `param <name>`, and
//! `return`/`returns`/`result`. A command captures the rest of its opening
//! line plus subsequent non-blank lines as its description; it closes on a
//! blank line, on the next recognized command or directive, or at the end
//! of input. Commands have no nested containers.

use markdown_arbor_tree::SourceRange;

use crate::line::ParseLine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DoxygenKind {
    Discussion,
    Note,
    Abstract,
    Parameter { name: String },
    Returns,
}

#[derive(Debug)]
pub(crate) struct PendingDoxygenCommand {
    kind: DoxygenKind,
    at_indentation_column_count: usize,
    /// Description fragments: the remainder of the opening line (when
    /// non-blank) and every captured continuation line.
    lines: Vec<ParseLine>,
    range: SourceRange,
}

impl PendingDoxygenCommand {
    /// Tries to recognize a command at the line's cursor. On mismatch the
    /// cursor is restored and the line is untouched.
    pub(crate) fn try_open(line: &mut ParseLine) -> Option<PendingDoxygenCommand> {
        let saved = line.cursor();
        let at_indentation = line.indentation_column_count();
        line.skip_whitespace();
        if !matches!(line.peek(), Some('@') | Some('\\')) {
            line.restore(saved);
            return None;
        }
        let start_location = line.location();
        line.bump();
        let word_bytes = line.eat_while(|ch| ch.is_alphanumeric());
        let word = line.text()[word_bytes].to_string();
        let kind = match word.as_str() {
            "discussion" => DoxygenKind::Discussion,
            "note" => DoxygenKind::Note,
            "brief" | "abstract" => DoxygenKind::Abstract,
            "return" | "returns" | "result" => DoxygenKind::Returns,
            "param" => {
                line.skip_whitespace();
                let name_bytes = line.eat_while(|ch| !ch.is_whitespace());
                if name_bytes.is_empty() {
                    // `@param` with no parameter name is not a command
                    line.restore(saved);
                    return None;
                }
                let name = line.text()[name_bytes].to_string();
                DoxygenKind::Parameter { name }
            }
            _ => {
                line.restore(saved);
                return None;
            }
        };

        line.skip_whitespace();
        let mut command = PendingDoxygenCommand {
            kind,
            at_indentation_column_count: at_indentation,
            lines: Vec::new(),
            range: SourceRange::new(start_location, line.location()),
        };
        if !line.is_blank() {
            command.push_line(line.clone());
        }
        Some(command)
    }

    pub(crate) fn push_line(&mut self, line: ParseLine) {
        let end = line.end_location();
        if self.range.end.is_before(&end) {
            self.range.end = end;
        }
        self.lines.push(line);
    }

    pub(crate) fn into_parts(self) -> (DoxygenKind, usize, Vec<ParseLine>, SourceRange) {
        (
            self.kind,
            self.at_indentation_column_count,
            self.lines,
            self.range,
        )
    }
}
