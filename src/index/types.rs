//! Types for the paragraph index
//!
//! Defines the paragraph table (offset -> paragraph metadata), index
//! metadata, and the on-disk header layout for the suffix array file.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Offset into the flattened corpus buffer.
///
/// The corpus is bounded to `u32::MAX` bytes; this matches the suffix
/// array entry width and keeps the index at 4 bytes per suffix.
pub type TextPosition = u32;

/// Suffix array entry - position in the flattened corpus
pub type SuffixEntry = u32;

/// Magic number for index files
pub const INDEX_MAGIC: u32 = 0x50464958; // "XIFP" little-endian on disk

/// Current version of the index format
pub const INDEX_VERSION: u32 = 1;

/// Sentinel byte separating paragraphs in the flattened corpus.
/// 0x03 (ETX) never appears in the filtered token stream.
pub const SENTINEL_BYTE: u8 = 0x03;

/// A paragraph of the source corpus with its provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paragraph {
    /// Source article identifier (file stem)
    pub article: String,
    /// Section heading the paragraph appeared under, if any
    pub section: Option<String>,
    /// The original, unfiltered paragraph text
    pub text: String,
    /// Keywords that form this paragraph's slice of the search buffer
    pub keywords: Vec<String>,
}

/// Mapping from buffer offsets to paragraph records.
///
/// Offsets are strictly ascending; paragraph `i` owns the byte range
/// from `offsets[i]` up to `offsets[i + 1]` (or the end of the buffer).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParagraphTable {
    offsets: Vec<TextPosition>,
    paragraphs: Vec<Paragraph>,
}

impl ParagraphTable {
    /// Append a paragraph starting at `offset`.
    ///
    /// Offsets must be pushed in strictly ascending order; the invariant
    /// is re-checked wholesale by [`ParagraphTable::validate`].
    pub fn push(&mut self, offset: TextPosition, paragraph: Paragraph) {
        self.offsets.push(offset);
        self.paragraphs.push(paragraph);
    }

    /// Find the paragraph owning buffer position `pos`: the one with the
    /// greatest start offset `<= pos`. Returns `None` for positions before
    /// the first paragraph.
    pub fn locate(&self, pos: TextPosition) -> Option<(TextPosition, &Paragraph)> {
        let idx = self.offsets.partition_point(|&o| o <= pos);
        if idx == 0 {
            return None;
        }
        Some((self.offsets[idx - 1], &self.paragraphs[idx - 1]))
    }

    /// Look up a paragraph by its exact start offset.
    pub fn by_offset(&self, offset: TextPosition) -> Option<&Paragraph> {
        let idx = self.offsets.binary_search(&offset).ok()?;
        Some(&self.paragraphs[idx])
    }

    pub fn offsets(&self) -> &[TextPosition] {
        &self.offsets
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Check structural invariants: offsets strictly ascending, within the
    /// buffer, and paired one-to-one with paragraph records.
    pub fn validate(&self, buffer_len: usize) -> Result<()> {
        if self.offsets.len() != self.paragraphs.len() {
            bail!(
                "paragraph table corrupt: {} offsets vs {} paragraphs",
                self.offsets.len(),
                self.paragraphs.len()
            );
        }
        for pair in self.offsets.windows(2) {
            if pair[0] >= pair[1] {
                bail!(
                    "paragraph offsets not strictly ascending: {} then {}",
                    pair[0],
                    pair[1]
                );
            }
        }
        if let Some(&last) = self.offsets.last() {
            if last as usize >= buffer_len {
                bail!(
                    "paragraph offset {} beyond buffer length {}",
                    last,
                    buffer_len
                );
            }
        }
        Ok(())
    }
}

/// Index metadata stored in meta.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexMeta {
    /// Size of the flattened corpus buffer in bytes
    pub buffer_size: u64,
    /// Number of suffixes (equals buffer_size)
    pub suffix_count: u64,
    /// Number of indexed paragraphs
    pub paragraph_count: u64,
    /// Number of source articles
    pub article_count: u64,
    /// Number of distinct keywords in the corpus
    pub keyword_count: u64,
}

/// Header for sa.bin
#[derive(Debug, Clone, Copy)]
pub struct SuffixArrayHeader {
    /// Magic number (INDEX_MAGIC)
    pub magic: u32,
    /// Version number
    pub version: u32,
    /// Number of suffix entries
    pub suffix_count: u64,
    /// Flags (reserved for future use)
    pub flags: u32,
}

impl SuffixArrayHeader {
    /// Size of header in bytes
    pub const SIZE: usize = 4 + 4 + 8 + 4; // 20 bytes

    pub fn new(suffix_count: u64) -> Self {
        Self {
            magic: INDEX_MAGIC,
            version: INDEX_VERSION,
            suffix_count,
            flags: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Paragraph {
        Paragraph {
            article: "a".into(),
            section: None,
            text: text.into(),
            keywords: Vec::new(),
        }
    }

    #[test]
    fn test_locate_picks_greatest_offset() {
        let mut table = ParagraphTable::default();
        table.push(0, para("first"));
        table.push(23, para("second"));

        assert_eq!(table.locate(0).unwrap().0, 0);
        assert_eq!(table.locate(22).unwrap().0, 0);
        assert_eq!(table.locate(23).unwrap().0, 23);
        assert_eq!(table.locate(100).unwrap().0, 23);
    }

    #[test]
    fn test_locate_before_first_offset() {
        let mut table = ParagraphTable::default();
        table.push(10, para("late start"));
        assert!(table.locate(5).is_none());
    }

    #[test]
    fn test_by_offset_exact_only() {
        let mut table = ParagraphTable::default();
        table.push(0, para("first"));
        table.push(23, para("second"));

        assert_eq!(table.by_offset(23).unwrap().text, "second");
        assert!(table.by_offset(22).is_none());
    }

    #[test]
    fn test_validate_rejects_unsorted_offsets() {
        let mut table = ParagraphTable::default();
        table.push(10, para("a"));
        table.push(10, para("b"));
        assert!(table.validate(100).is_err());
    }

    #[test]
    fn test_validate_rejects_offset_past_buffer() {
        let mut table = ParagraphTable::default();
        table.push(50, para("a"));
        assert!(table.validate(40).is_err());
    }

    #[test]
    fn test_validate_empty_table() {
        let table = ParagraphTable::default();
        assert!(table.validate(0).is_ok());
    }
}
