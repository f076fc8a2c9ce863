//! Flattened text content with character addressing
//!
//! All offsets exposed here count Unicode scalar values, not bytes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Anything the anchoring engine can search: it only needs flattened text.
pub trait AnchorRoot {
    fn text_index(&self) -> &TextIndex;
}

/// A concrete range in a root's flattened text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedRange {
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// The text covered by the range
    pub text: String,
}

impl ResolvedRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Flattened text of a document root plus a char-to-byte offset table
#[derive(Debug, Clone)]
pub struct TextIndex {
    text: String,
    /// Byte offset of every char, followed by `text.len()`
    boundaries: Vec<usize>,
    fingerprint: u64,
}

impl TextIndex {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut boundaries: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
        boundaries.push(text.len());

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);

        Self {
            fingerprint: hasher.finish(),
            text,
            boundaries,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Hash of the text content; changes whenever the content changes
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Text of `[start, end)`, or `None` when out of bounds or inverted
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end {
            return None;
        }
        let from = *self.boundaries.get(start)?;
        let to = *self.boundaries.get(end)?;
        Some(&self.text[from..to])
    }

    /// Everything before `offset` (clamped to the text length)
    pub fn before(&self, offset: usize) -> &str {
        &self.text[..self.byte_offset(offset)]
    }

    /// Everything from `offset` on (clamped to the text length)
    pub fn after(&self, offset: usize) -> &str {
        &self.text[self.byte_offset(offset)..]
    }

    /// Build a non-empty range, or `None` if `[start, end)` is empty, inverted
    /// or out of bounds.
    pub fn range(&self, start: usize, end: usize) -> Option<ResolvedRange> {
        if start >= end {
            return None;
        }
        let text = self.slice(start, end)?;
        Some(ResolvedRange {
            start,
            end,
            text: text.to_string(),
        })
    }

    /// Every occurrence of `needle`, overlapping ones included, as char offsets
    pub fn occurrences<'a>(&'a self, needle: &'a str) -> Occurrences<'a> {
        Occurrences {
            index: self,
            needle,
            byte_pos: 0,
        }
    }

    fn byte_offset(&self, char_offset: usize) -> usize {
        self.boundaries
            .get(char_offset)
            .copied()
            .unwrap_or(self.text.len())
    }

    fn char_offset(&self, byte_offset: usize) -> usize {
        match self.boundaries.binary_search(&byte_offset) {
            Ok(idx) | Err(idx) => idx,
        }
    }
}

impl AnchorRoot for TextIndex {
    fn text_index(&self) -> &TextIndex {
        self
    }
}

/// Iterator over occurrences of a needle, see [`TextIndex::occurrences`]
pub struct Occurrences<'a> {
    index: &'a TextIndex,
    needle: &'a str,
    byte_pos: usize,
}

impl Iterator for Occurrences<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let haystack = self.index.as_str();
        if self.needle.is_empty() || self.byte_pos > haystack.len() {
            return None;
        }

        let found = self.byte_pos + haystack[self.byte_pos..].find(self.needle)?;
        let step = haystack[found..].chars().next().map_or(1, char::len_utf8);
        self.byte_pos = found + step;

        Some(self.index.char_offset(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_addressing() {
        let index = TextIndex::new("héllo wörld");
        assert_eq!(index.len(), 11);
        assert_eq!(index.slice(6, 11), Some("wörld"));
        assert_eq!(index.slice(0, 12), None);
        assert_eq!(index.slice(5, 4), None);
        assert_eq!(index.before(2), "hé");
        assert_eq!(index.after(9), "ld");
    }

    #[test]
    fn test_range_requires_non_empty() {
        let index = TextIndex::new("abc");
        assert!(index.range(1, 1).is_none());
        assert!(index.range(2, 1).is_none());
        assert!(index.range(0, 4).is_none());
        assert_eq!(index.range(0, 3).unwrap().text, "abc");
    }

    #[test]
    fn test_occurrences_overlap() {
        let index = TextIndex::new("aaaa");
        let found: Vec<usize> = index.occurrences("aa").collect();
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn test_occurrences_report_char_offsets() {
        let index = TextIndex::new("ñandú y ñandú");
        let found: Vec<usize> = index.occurrences("ñandú").collect();
        assert_eq!(found, vec![0, 8]);
    }

    #[test]
    fn test_empty_needle_finds_nothing() {
        let index = TextIndex::new("abc");
        assert_eq!(index.occurrences("").count(), 0);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        assert_eq!(
            TextIndex::new("same").fingerprint(),
            TextIndex::new("same").fingerprint()
        );
        assert_ne!(
            TextIndex::new("same").fingerprint(),
            TextIndex::new("different").fingerprint()
        );
    }
}
