//! Index writer
//!
//! Writes the built index to a directory: the flattened corpus, the
//! suffix array in a headered little-endian format, and the paragraph
//! table and metadata as JSON. The FM-index tables are never persisted;
//! the loader recomputes them.

use super::types::{IndexMeta, ParagraphTable, SuffixArrayHeader, SuffixEntry};
use super::{CORPUS_FILE, META_FILE, PARAGRAPHS_FILE, SA_FILE};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct IndexWriter;

impl IndexWriter {
    /// Write all index files into `index_dir`, creating it if needed.
    pub fn write(
        index_dir: &Path,
        buffer: &[u8],
        sa: &[SuffixEntry],
        paragraphs: &ParagraphTable,
        meta: &IndexMeta,
    ) -> Result<()> {
        fs::create_dir_all(index_dir)
            .with_context(|| format!("failed to create index dir {}", index_dir.display()))?;

        Self::write_corpus(index_dir, buffer)?;
        Self::write_suffix_array(index_dir, sa)?;
        Self::write_paragraphs(index_dir, paragraphs)?;
        Self::write_meta(index_dir, meta)?;

        Ok(())
    }

    fn write_corpus(index_dir: &Path, buffer: &[u8]) -> Result<()> {
        let path = index_dir.join(CORPUS_FILE);
        let mut file = BufWriter::with_capacity(65536, File::create(&path)?);
        file.write_all(buffer)?;
        file.flush()?;
        Ok(())
    }

    fn write_suffix_array(index_dir: &Path, sa: &[SuffixEntry]) -> Result<()> {
        let path = index_dir.join(SA_FILE);
        let mut file = BufWriter::with_capacity(65536, File::create(&path)?);

        let header = SuffixArrayHeader::new(sa.len() as u64);
        file.write_all(&header.magic.to_le_bytes())?;
        file.write_all(&header.version.to_le_bytes())?;
        file.write_all(&header.suffix_count.to_le_bytes())?;
        file.write_all(&header.flags.to_le_bytes())?;

        // Batch entries to keep syscall counts down.
        let mut batch = Vec::with_capacity(4 * 1024);
        for &entry in sa {
            batch.extend_from_slice(&entry.to_le_bytes());
            if batch.len() >= 4 * 1024 {
                file.write_all(&batch)?;
                batch.clear();
            }
        }
        if !batch.is_empty() {
            file.write_all(&batch)?;
        }

        file.flush()?;
        Ok(())
    }

    fn write_paragraphs(index_dir: &Path, paragraphs: &ParagraphTable) -> Result<()> {
        let path = index_dir.join(PARAGRAPHS_FILE);
        let file = BufWriter::with_capacity(65536, File::create(&path)?);
        serde_json::to_writer(file, paragraphs).context("failed to serialize paragraph table")?;
        Ok(())
    }

    fn write_meta(index_dir: &Path, meta: &IndexMeta) -> Result<()> {
        let path = index_dir.join(META_FILE);
        let content = serde_json::to_string_pretty(meta)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::{INDEX_MAGIC, Paragraph};
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_all_files() {
        let dir = tempdir().unwrap();
        let index_dir = dir.path().join("idx");

        let buffer = b"hello world\x03".to_vec();
        let sa = crate::index::suffix_array::suffix_array(&buffer);
        let mut paragraphs = ParagraphTable::default();
        paragraphs.push(
            0,
            Paragraph {
                article: "a".into(),
                section: None,
                text: "hello world".into(),
                keywords: vec!["hello".into(), "world".into()],
            },
        );
        let meta = IndexMeta {
            buffer_size: buffer.len() as u64,
            suffix_count: sa.len() as u64,
            paragraph_count: 1,
            article_count: 1,
            keyword_count: 2,
        };

        IndexWriter::write(&index_dir, &buffer, &sa, &paragraphs, &meta).unwrap();

        assert!(index_dir.join(CORPUS_FILE).exists());
        assert!(index_dir.join(SA_FILE).exists());
        assert!(index_dir.join(PARAGRAPHS_FILE).exists());
        assert!(index_dir.join(META_FILE).exists());

        let corpus = std::fs::read(index_dir.join(CORPUS_FILE)).unwrap();
        assert_eq!(corpus, buffer);

        let sa_data = std::fs::read(index_dir.join(SA_FILE)).unwrap();
        let magic = u32::from_le_bytes(sa_data[0..4].try_into().unwrap());
        assert_eq!(magic, INDEX_MAGIC);
        assert_eq!(
            sa_data.len(),
            SuffixArrayHeader::SIZE + sa.len() * size_of::<SuffixEntry>()
        );
    }
}
