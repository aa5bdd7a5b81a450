//! BWT / FM-index tables
//!
//! Derives the Burrows-Wheeler transform of the corpus buffer from its
//! suffix array, then builds the two tables backward search needs:
//!
//! - `C`: for each byte value, how many buffer bytes are strictly smaller
//!   (a dense `[u32; 256]`, indexed directly by byte).
//! - `Occ`: rank of a byte within a BWT prefix, `occ(c, i)` = occurrences
//!   of `c` in `bwt[..i]`. Stored as absolute checkpoints every
//!   [`OCC_SAMPLE`] positions per symbol present in the corpus, with the
//!   remainder counted from the BWT block itself. Memory is
//!   O(sigma * N / OCC_SAMPLE) instead of the O(sigma * N) of full
//!   prefix-sum rows, while the prefix-sum contract is unchanged.
//!
//! The BWT uses the cyclic convention (`bwt[i] = text[sa[i] - 1]`, last
//! byte of the buffer when `sa[i] == 0`). Without a terminating sentinel
//! the resulting interval is a necessary condition only; the search layer
//! verifies every candidate against the real buffer.

use super::types::SuffixEntry;
use std::ops::Range;

/// Rank checkpoint spacing, in BWT positions.
pub const OCC_SAMPLE: usize = 128;

const NO_SYM: u16 = u16::MAX;

/// FM-index over a corpus buffer: BWT plus rank/count tables.
///
/// Immutable once built; queries take `&self` only.
pub struct FmIndex {
    bwt: Vec<u8>,
    /// C[c] = number of buffer bytes strictly less than c
    c: [u32; 256],
    /// Total occurrences of each byte in the buffer
    counts: [u32; 256],
    /// Byte -> dense symbol id, NO_SYM for absent bytes
    sym_of: [u16; 256],
    sym_count: usize,
    /// Block-major rank checkpoints: `checkpoints[block * sym_count + sym]`
    /// = occurrences of `sym` in `bwt[..block * OCC_SAMPLE]`
    checkpoints: Vec<u32>,
}

impl FmIndex {
    /// Build the tables from a buffer and its suffix array.
    ///
    /// `sa` must be the suffix array of `text` (same length); the loader
    /// validates that before calling.
    pub fn new(text: &[u8], sa: &[SuffixEntry]) -> Self {
        debug_assert_eq!(text.len(), sa.len());
        let n = text.len();

        let mut bwt = Vec::with_capacity(n);
        for &pos in sa {
            if pos == 0 {
                bwt.push(text[n - 1]);
            } else {
                bwt.push(text[pos as usize - 1]);
            }
        }

        let mut counts = [0u32; 256];
        for &b in text {
            counts[b as usize] += 1;
        }

        let mut c = [0u32; 256];
        let mut sym_of = [NO_SYM; 256];
        let mut sym_count = 0usize;
        let mut total = 0u32;
        for byte in 0..256 {
            c[byte] = total;
            total += counts[byte];
            if counts[byte] > 0 {
                sym_of[byte] = sym_count as u16;
                sym_count += 1;
            }
        }

        // One checkpoint row per block start, plus a trailing row when the
        // final block is exactly full (occ(c, n) must still hit a row).
        let mut checkpoints = Vec::with_capacity((n / OCC_SAMPLE + 1) * sym_count);
        let mut running = vec![0u32; sym_count];
        for (i, &b) in bwt.iter().enumerate() {
            if i % OCC_SAMPLE == 0 {
                checkpoints.extend_from_slice(&running);
            }
            running[sym_of[b as usize] as usize] += 1;
        }
        if n % OCC_SAMPLE == 0 {
            checkpoints.extend_from_slice(&running);
        }

        Self {
            bwt,
            c,
            counts,
            sym_of,
            sym_count,
            checkpoints,
        }
    }

    /// Number of indexed positions (buffer length).
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    /// Total occurrences of byte `c` in the buffer.
    pub fn count_of(&self, c: u8) -> u32 {
        self.counts[c as usize]
    }

    /// Rank query: occurrences of `c` in `bwt[..i]`.
    pub fn occ(&self, c: u8, i: usize) -> u32 {
        if self.counts[c as usize] == 0 {
            return 0;
        }
        let sym = self.sym_of[c as usize] as usize;
        let block = i / OCC_SAMPLE;
        let base = self.checkpoints[block * self.sym_count + sym];
        let rest = memchr::memchr_iter(c, &self.bwt[block * OCC_SAMPLE..i]).count();
        base + rest as u32
    }

    /// Backward search: the half-open suffix-array interval whose suffixes
    /// may start with `pattern`.
    ///
    /// The empty pattern maps to the whole array. A byte absent from the
    /// corpus short-circuits to the empty interval, as does any step that
    /// degenerates; once empty the interval stays empty.
    pub fn range_for(&self, pattern: &[u8]) -> Range<usize> {
        let n = self.bwt.len();
        let Some((&last, prefix)) = pattern.split_last() else {
            return 0..n;
        };

        if self.counts[last as usize] == 0 {
            return 0..0;
        }
        let mut lo = self.c[last as usize] as usize;
        let mut hi = lo + self.counts[last as usize] as usize;

        for &b in prefix.iter().rev() {
            if lo >= hi || self.counts[b as usize] == 0 {
                return 0..0;
            }
            let base = self.c[b as usize] as usize;
            lo = base + self.occ(b, lo) as usize;
            hi = base + self.occ(b, hi) as usize;
        }

        if lo >= hi { 0..0 } else { lo..hi }
    }
}
