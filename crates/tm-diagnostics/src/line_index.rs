//! Byte offset → 1-based line number translation (spec §4.2).

use tm_json::Offset;

/// Precomputed `\n` positions for one document's source bytes, so offset →
/// line lookups are a binary search rather than a rescan per call.
#[derive(Debug, Clone)]
pub struct LineIndex {
    newlines: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let newlines = source
            .bytes()
            .enumerate()
            .filter_map(|(i, b)| (b == b'\n').then_some(i as u32))
            .collect();
        LineIndex { newlines }
    }

    /// The 1-based line number containing `offset`, or `0` if the offset is
    /// unknown (spec §8: "or 0 for position unknown").
    pub fn line_of(&self, offset: Offset) -> u32 {
        match offset.byte_pos() {
            None => 0,
            Some(pos) => self.newlines.partition_point(|&nl| nl < pos) as u32 + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_offset_is_line_zero() {
        let idx = LineIndex::new("a\nb\nc");
        assert_eq!(idx.line_of(Offset::unknown()), 0);
    }

    #[test]
    fn first_line_is_one() {
        let idx = LineIndex::new("abc\ndef");
        assert_eq!(idx.line_of(Offset::at(0)), 1);
        assert_eq!(idx.line_of(Offset::at(3)), 1);
    }

    #[test]
    fn offsets_after_newline_are_the_next_line() {
        let idx = LineIndex::new("abc\ndef\nghi");
        assert_eq!(idx.line_of(Offset::at(4)), 2);
        assert_eq!(idx.line_of(Offset::at(8)), 3);
    }
}
