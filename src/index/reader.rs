//! Index loader
//!
//! Opens a persisted index directory and reconstructs a [`Searcher`].
//! Loading is all-or-nothing: any structural inconsistency (bad magic or
//! version, suffix array / buffer size mismatch, a suffix array that is
//! not a permutation of `[0, N)`, non-ascending paragraph offsets) fails
//! the load outright. There is no degraded or partial index.
//!
//! The corpus buffer is memory-mapped; the suffix array is decoded and
//! validated into memory, and the FM-index tables are recomputed from
//! both.

use super::types::{INDEX_MAGIC, INDEX_VERSION, IndexMeta, ParagraphTable, SuffixArrayHeader, SuffixEntry};
use super::{CORPUS_FILE, META_FILE, PARAGRAPHS_FILE, SA_FILE};
use crate::search::{Searcher, TextStore};
use anyhow::{Context, Result, bail};
use memmap2::Mmap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a searcher from an index directory.
pub fn open(index_dir: &Path) -> Result<Searcher> {
    let corpus_path = index_dir.join(CORPUS_FILE);
    let text_file = File::open(&corpus_path)
        .with_context(|| format!("failed to open {}", corpus_path.display()))?;
    let text_mmap = unsafe { Mmap::map(&text_file)? };
    let n = text_mmap.len();

    if n > u32::MAX as usize {
        bail!("corpus buffer exceeds u32::MAX bytes ({n})");
    }

    let sa = read_suffix_array(&index_dir.join(SA_FILE), n)?;
    validate_permutation(&sa, n)?;

    let paragraphs_path = index_dir.join(PARAGRAPHS_FILE);
    let paragraphs_file = File::open(&paragraphs_path)
        .with_context(|| format!("failed to open {}", paragraphs_path.display()))?;
    let paragraphs: ParagraphTable = serde_json::from_reader(BufReader::new(paragraphs_file))
        .context("failed to parse paragraph table")?;
    paragraphs.validate(n)?;

    Ok(Searcher::from_validated(
        TextStore::Mapped(text_mmap),
        sa,
        paragraphs,
    ))
}

/// Read index metadata without loading the index itself.
pub fn read_meta(index_dir: &Path) -> Result<IndexMeta> {
    let path = index_dir.join(META_FILE);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).context("failed to parse index metadata")
}

fn read_suffix_array(path: &Path, buffer_len: usize) -> Result<Vec<SuffixEntry>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file)? };

    if mmap.len() < SuffixArrayHeader::SIZE {
        bail!("invalid sa.bin: file too small");
    }

    let magic = u32::from_le_bytes(mmap[0..4].try_into()?);
    if magic != INDEX_MAGIC {
        bail!("invalid sa.bin: bad magic number {magic:#010x}");
    }
    let version = u32::from_le_bytes(mmap[4..8].try_into()?);
    if version != INDEX_VERSION {
        bail!("unsupported sa.bin version: {version}");
    }
    let suffix_count = u64::from_le_bytes(mmap[8..16].try_into()?);

    if suffix_count != buffer_len as u64 {
        bail!("suffix count {suffix_count} does not match corpus size {buffer_len}");
    }
    let expected = SuffixArrayHeader::SIZE + suffix_count as usize * size_of::<SuffixEntry>();
    if mmap.len() != expected {
        bail!(
            "invalid sa.bin: expected {expected} bytes, found {}",
            mmap.len()
        );
    }

    let mut sa = Vec::with_capacity(suffix_count as usize);
    for chunk in mmap[SuffixArrayHeader::SIZE..].chunks_exact(size_of::<SuffixEntry>()) {
        sa.push(SuffixEntry::from_le_bytes(chunk.try_into()?));
    }
    Ok(sa)
}

/// The suffix array must be a permutation of `[0, N)`.
fn validate_permutation(sa: &[SuffixEntry], n: usize) -> Result<()> {
    let mut seen = vec![false; n];
    for &entry in sa {
        let pos = entry as usize;
        if pos >= n {
            bail!("suffix array entry {pos} out of range for buffer of {n} bytes");
        }
        if seen[pos] {
            bail!("suffix array is not a permutation: duplicate entry {pos}");
        }
        seen[pos] = true;
    }
    Ok(())
}
