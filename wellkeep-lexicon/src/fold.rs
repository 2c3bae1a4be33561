//! Case folding with a map back to the unfolded text.
//!
//! Every char is replaced by its full lower-case form, which may differ in
//! UTF-8 width (`K` KELVIN SIGN becomes a one-byte `k`) or in char count
//! (`İ` becomes `i\u{307}`). [`FoldedText`] records, for each folded byte,
//! the byte span of the source char it came from, so matches found in the
//! folded text can be reported against the caller's text.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

/// Lower-cases a whole string.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// A folded string plus the source span of each of its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedText {
    text: String,
    sources: Vec<Range<usize>>,
}

impl FoldedText {
    pub fn new(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut sources = Vec::with_capacity(source.len());
        for (start, c) in source.char_indices() {
            let span = start..start + c.len_utf8();
            for lower in c.to_lowercase() {
                text.push(lower);
                sources.extend(core::iter::repeat(span.clone()).take(lower.len_utf8()));
            }
        }
        Self { text, sources }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Maps a non-empty byte range of the folded text onto the source text.
    ///
    /// The result always covers whole source chars, so a match that ends
    /// inside a char's expansion still includes that char.
    pub fn source_range(&self, folded: Range<usize>) -> Range<usize> {
        debug_assert!(folded.start < folded.end && folded.end <= self.sources.len());
        self.sources[folded.start].start..self.sources[folded.end - 1].end
    }
}
