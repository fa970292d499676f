//! Human-readable rendering of `ErrorRecord`s via `ariadne`, the same tool
//! and pattern `styx_tree::diagnostic::ParseError::build_report` uses.
//!
//! `ErrorRecord` only carries a 1-based line number (spec §4.2), not a byte
//! span — the Reporter throws the span away once it's resolved to a line,
//! since that's what the spec's record shape calls for. Rendering therefore
//! highlights the whole source line rather than the originating token's
//! exact columns.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::condition::Level;
use crate::record::ErrorRecord;

impl ErrorRecord {
    /// Render this record with ariadne, returning the formatted report.
    pub fn render(&self, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{self}"))
    }

    pub fn write_report<W: std::io::Write>(&self, source: &str, writer: W) {
        let range = line_byte_range(source, self.line);
        let kind = match self.level {
            Level::Warning => ReportKind::Warning,
            Level::Error | Level::Fatal => ReportKind::Error,
        };

        let mut builder = Report::build(kind, (self.file.as_str(), range.clone()))
            .with_message(&self.message)
            .with_label(
                Label::new((self.file.as_str(), range))
                    .with_message(self.condition.tag())
                    .with_color(Color::Red),
            );

        if let Some(cross_line) = self.cross_reference_line {
            let cross_range = line_byte_range(source, cross_line);
            builder = builder.with_label(
                Label::new((self.file.as_str(), cross_range))
                    .with_message(self.cross_reference_key.as_deref().unwrap_or("see also"))
                    .with_color(Color::Blue),
            );
        }

        let _ = builder.finish().write((self.file.as_str(), Source::from(source)), writer);
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} at line {}", self.condition.tag(), self.message, self.line)
    }
}

impl std::error::Error for ErrorRecord {}

/// The byte range of 1-based `line` within `source`, or an empty range at
/// the start of the document when `line` is `0` ("position unknown").
fn line_byte_range(source: &str, line: u32) -> std::ops::Range<usize> {
    if line == 0 {
        return 0..0;
    }
    let mut offset = 0usize;
    for (i, l) in source.split('\n').enumerate() {
        let start = offset;
        let end = start + l.len();
        if i as u32 + 1 == line {
            return start..end;
        }
        offset = end + 1;
    }
    let len = source.len();
    len..len
}
