use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use daachorse::{DoubleArrayAhoCorasick, DoubleArrayAhoCorasickBuilder, MatchKind};

use crate::fold::{fold_case, FoldedText};

/// Error raised when the automaton cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconError {
    pub message: String,
}

impl fmt::Display for LexiconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to build keyword automaton: {}", self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LexiconError {}

/// A single keyword hit, as a byte range into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch {
    pub start: usize,
    pub end: usize,
    /// Index into [`Lexicon::words`].
    pub index: usize,
}

/// A case-insensitive keyword set backed by a leftmost-longest Aho-Corasick automaton.
///
/// Words are folded with [`fold_case`], de-duplicated and stripped of blanks
/// before the automaton is built. An empty lexicon matches nothing.
pub struct Lexicon {
    words: Vec<String>,
    automaton: Option<DoubleArrayAhoCorasick<u32>>,
}

impl fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexicon")
            .field("words", &self.words)
            .field("automaton", &"<DoubleArrayAhoCorasick>")
            .finish()
    }
}

impl Lexicon {
    pub fn new<I, S>(words: I) -> Result<Self, LexiconError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut folded = Vec::new();
        for word in words {
            let word = fold_case(word.as_ref().trim());
            if !word.is_empty() && seen.insert(word.clone()) {
                folded.push(word);
            }
        }

        if folded.is_empty() {
            return Ok(Self { words: folded, automaton: None });
        }

        let automaton = DoubleArrayAhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&folded)
            .map_err(|e| LexiconError { message: e.to_string() })?;

        Ok(Self { words: folded, automaton: Some(automaton) })
    }

    /// The folded words, in insertion order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Non-overlapping matches, leftmost-longest, in text order.
    ///
    /// Ranges are widened to whole chars of `text`.
    pub fn find_iter(&self, text: &str) -> impl Iterator<Item = KeywordMatch> {
        let mut found = Vec::new();
        if let Some(automaton) = &self.automaton {
            let folded = FoldedText::new(text);
            let mut last_end = 0;
            for m in automaton.leftmost_find_iter(folded.as_str()) {
                let range = folded.source_range(m.start()..m.end());
                // Two hits inside one expanded char would overlap once widened.
                if range.start < last_end {
                    continue;
                }
                last_end = range.end;
                found.push(KeywordMatch {
                    start: range.start,
                    end: range.end,
                    index: m.value() as usize,
                });
            }
        }
        found.into_iter()
    }

    pub fn contains_any(&self, text: &str) -> bool {
        self.find_iter(text).next().is_some()
    }

    /// Replaces every match with one `mask` per char of the matched text.
    pub fn mask(&self, text: &str, mask: char) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last_end = 0;
        for m in self.find_iter(text) {
            out.push_str(&text[last_end..m.start]);
            let width = text[m.start..m.end].chars().count();
            out.extend(core::iter::repeat(mask).take(width));
            last_end = m.end;
        }
        out.push_str(&text[last_end..]);
        out
    }
}
