//! Paragraph search engine
//!
//! [`Searcher`] owns the flattened corpus buffer, its suffix array, the
//! FM-index tables, and the paragraph table. Everything is immutable after
//! construction, so concurrent read-only queries need no locking and
//! multi-keyword searches fan out with rayon.
//!
//! A query runs in three steps: backward search over the FM-index for the
//! candidate suffix-array interval, mandatory byte-for-byte verification of
//! every candidate against the real buffer (the cyclic BWT convention makes
//! the interval a necessary condition only), then mapping verified
//! positions to their owning paragraphs.

use crate::index::fm::FmIndex;
use crate::index::suffix_array::suffix_array;
use crate::index::types::{Paragraph, ParagraphTable, SuffixEntry, TextPosition};
use anyhow::{Result, bail};
use memmap2::Mmap;
use rayon::prelude::*;
use roaring::RoaringBitmap;
use std::path::Path;

/// Corpus buffer storage: owned when built in-process, memory-mapped when
/// loaded from disk.
pub enum TextStore {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl TextStore {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            TextStore::Owned(v) => v,
            TextStore::Mapped(m) => m,
        }
    }
}

/// A matched paragraph. `offset` is the paragraph's start offset in the
/// buffer, which doubles as its stable identity for set operations.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub offset: TextPosition,
    pub paragraph: &'a Paragraph,
}

/// Read-only search engine over a built index.
pub struct Searcher {
    text: TextStore,
    sa: Vec<SuffixEntry>,
    fm: FmIndex,
    paragraphs: ParagraphTable,
}

impl Searcher {
    /// Build an engine from an in-memory buffer and paragraph table,
    /// constructing the suffix array and FM tables from scratch.
    pub fn build(text: Vec<u8>, paragraphs: ParagraphTable) -> Result<Self> {
        if text.len() > u32::MAX as usize {
            bail!("corpus buffer exceeds u32::MAX bytes ({})", text.len());
        }
        paragraphs.validate(text.len())?;

        let sa = suffix_array(&text);
        let fm = FmIndex::new(&text, &sa);
        Ok(Self {
            text: TextStore::Owned(text),
            sa,
            fm,
            paragraphs,
        })
    }

    /// Assemble an engine from already-validated parts (the index loader).
    /// FM tables are always recomputed; they are never persisted.
    pub(crate) fn from_validated(
        text: TextStore,
        sa: Vec<SuffixEntry>,
        paragraphs: ParagraphTable,
    ) -> Self {
        let fm = FmIndex::new(text.as_bytes(), &sa);
        Self {
            text,
            sa,
            fm,
            paragraphs,
        }
    }

    /// Load an engine from a persisted index directory.
    pub fn open(index_dir: &Path) -> Result<Self> {
        crate::index::reader::open(index_dir)
    }

    pub fn buffer(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn suffix_array(&self) -> &[SuffixEntry] {
        &self.sa
    }

    pub fn paragraphs(&self) -> &ParagraphTable {
        &self.paragraphs
    }

    /// Find every paragraph containing `keyword` as a raw byte substring.
    ///
    /// Results are deduplicated by paragraph, in first-seen order of the
    /// suffix-array interval scan. Matching is byte-exact; normalization
    /// (lower-casing, UTF-8 encoding) is the caller's responsibility.
    ///
    /// An absent keyword returns an empty vec, never an error. An empty
    /// keyword matches the full interval and therefore every paragraph;
    /// callers are expected to reject it beforehand.
    pub fn search(&self, keyword: &[u8]) -> Vec<Hit<'_>> {
        let text = self.text.as_bytes();
        let mut seen = RoaringBitmap::new();
        let mut hits = Vec::new();

        for i in self.fm.range_for(keyword) {
            let pos = self.sa[i] as usize;

            // Verification against the real buffer is mandatory: the
            // backward-search interval can include cyclic false positives.
            if text.len() - pos < keyword.len() || &text[pos..pos + keyword.len()] != keyword {
                continue;
            }

            let Some((offset, paragraph)) = self.paragraphs.locate(pos as TextPosition) else {
                continue;
            };
            if seen.insert(offset) {
                hits.push(Hit { offset, paragraph });
            }
        }

        hits
    }

    /// AND-search: paragraphs containing *every* keyword.
    ///
    /// Composed from [`Searcher::search`]: per-keyword hit sets are
    /// intersected by paragraph offset and the result is emitted in
    /// ascending offset order. Zero keywords is a caller error; a keyword
    /// with no matches simply empties the intersection.
    pub fn search_all<K>(&self, keywords: &[K]) -> Result<Vec<Hit<'_>>>
    where
        K: AsRef<[u8]> + Sync,
    {
        if keywords.is_empty() {
            bail!("search_all requires at least one keyword");
        }

        let sets: Vec<RoaringBitmap> = keywords
            .par_iter()
            .map(|kw| self.search(kw.as_ref()).iter().map(|h| h.offset).collect())
            .collect();

        let mut iter = sets.into_iter();
        let Some(mut common) = iter.next() else {
            return Ok(Vec::new());
        };
        for set in iter {
            common &= set;
            if common.is_empty() {
                break;
            }
        }

        // RoaringBitmap iterates ascending, which gives the documented
        // deterministic offset order.
        Ok(common
            .iter()
            .filter_map(|offset| {
                self.paragraphs
                    .by_offset(offset)
                    .map(|paragraph| Hit { offset, paragraph })
            })
            .collect())
    }
}
