//! Corpus flattening
//!
//! Reads every article, extracts paragraphs and their keyword streams in
//! parallel, then lays the filtered streams out in one buffer separated
//! by the sentinel byte, recording each paragraph's start offset.

use super::extract::{self, RawParagraph};
use super::keywords::KeywordExtractor;
use crate::index::types::{Paragraph, ParagraphTable, SENTINEL_BYTE, TextPosition};
use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::path::Path;

/// Output of corpus assembly: everything index construction needs.
pub struct AssembledCorpus {
    /// Flattened filtered-keyword streams, sentinel-separated
    pub buffer: Vec<u8>,
    /// Offset -> paragraph metadata
    pub paragraphs: ParagraphTable,
    /// Distinct keywords across the corpus, sorted
    pub keyword_set: Vec<String>,
    /// Number of article files that contributed paragraphs
    pub article_count: usize,
}

/// Assemble the corpus under `corpus_dir`.
///
/// Article files are processed in parallel; the flatten step is
/// sequential so offsets are assigned in sorted-file, in-file order.
pub fn assemble(corpus_dir: &Path) -> Result<AssembledCorpus> {
    let files = extract::collect_article_files(corpus_dir)?;
    if files.is_empty() {
        bail!("no .txt article files under {}", corpus_dir.display());
    }

    let per_file: Vec<Vec<(RawParagraph, Vec<String>)>> = files
        .par_iter()
        .map(|path| {
            let extractor = KeywordExtractor::new();
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let article = extract::article_name(path);
            Ok(extract::extract_paragraphs(&article, &contents)
                .into_iter()
                .map(|p| {
                    let keywords = extractor.extract(&p.text);
                    (p, keywords)
                })
                .collect())
        })
        .collect::<Result<_>>()?;

    let extractor = KeywordExtractor::new();
    let mut buffer = Vec::new();
    let mut table = ParagraphTable::default();
    let mut keyword_set: FxHashSet<String> = FxHashSet::default();
    let mut articles_used: FxHashSet<String> = FxHashSet::default();

    for paragraphs in per_file {
        for (raw, keywords) in paragraphs {
            let filtered = extractor.filtered_text(&keywords);
            if filtered.is_empty() {
                continue;
            }

            let offset = buffer.len();
            if offset > u32::MAX as usize {
                bail!("corpus buffer exceeds u32::MAX bytes");
            }

            buffer.extend_from_slice(filtered.as_bytes());
            buffer.push(SENTINEL_BYTE);

            keyword_set.extend(keywords.iter().cloned());
            articles_used.insert(raw.article.clone());
            table.push(
                offset as TextPosition,
                Paragraph {
                    article: raw.article,
                    section: raw.section,
                    text: raw.text,
                    keywords,
                },
            );
        }
    }

    let mut keyword_set: Vec<String> = keyword_set.into_iter().collect();
    keyword_set.sort();

    Ok(AssembledCorpus {
        buffer,
        paragraphs: table,
        keyword_set,
        article_count: articles_used.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_corpus(dir: &Path) {
        fs::write(
            dir.join("bach.txt"),
            "## Leipzig\nBach composed the Mass in B Minor in Leipzig around 1749, late in life.\n",
        )
        .unwrap();
        fs::write(
            dir.join("mozart.txt"),
            "Mozart was born in Salzburg in 1756 and toured Europe as a child prodigy.\nshort\n",
        )
        .unwrap();
    }

    #[test]
    fn test_assemble_layout() {
        let dir = tempdir().unwrap();
        write_corpus(dir.path());

        let corpus = assemble(dir.path()).unwrap();

        assert_eq!(corpus.paragraphs.len(), 2);
        assert_eq!(corpus.article_count, 2);

        // Sorted file order: bach before mozart.
        let paras = corpus.paragraphs.paragraphs();
        assert_eq!(paras[0].article, "bach");
        assert_eq!(paras[0].section.as_deref(), Some("Leipzig"));
        assert_eq!(paras[1].article, "mozart");

        // One sentinel per paragraph, and the buffer ends with one.
        let sentinels = corpus.buffer.iter().filter(|&&b| b == SENTINEL_BYTE).count();
        assert_eq!(sentinels, 2);
        assert_eq!(corpus.buffer.last(), Some(&SENTINEL_BYTE));

        // Offsets ascend and point at the paragraphs' filtered streams.
        assert!(corpus.paragraphs.validate(corpus.buffer.len()).is_ok());
        let offsets = corpus.paragraphs.offsets();
        assert_eq!(offsets[0], 0);
        assert!(offsets[1] > 0);
    }

    #[test]
    fn test_assembled_buffer_is_searchable_stream() {
        let dir = tempdir().unwrap();
        write_corpus(dir.path());

        let corpus = assemble(dir.path()).unwrap();
        let text = String::from_utf8(corpus.buffer.clone()).unwrap();

        assert!(text.contains("1756"));
        assert!(text.contains("salzburg"));
        // Stopwords never reach the buffer.
        assert!(!text.contains(" the "));
    }

    #[test]
    fn test_keyword_set_sorted_distinct() {
        let dir = tempdir().unwrap();
        write_corpus(dir.path());

        let corpus = assemble(dir.path()).unwrap();
        let mut sorted = corpus.keyword_set.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(corpus.keyword_set, sorted);
        assert!(corpus.keyword_set.contains(&"salzburg".to_string()));
    }

    #[test]
    fn test_empty_corpus_dir_fails() {
        let dir = tempdir().unwrap();
        assert!(assemble(dir.path()).is_err());
    }
}
