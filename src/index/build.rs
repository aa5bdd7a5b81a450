//! Index build pipeline
//!
//! Assembles the corpus, constructs the suffix array and search engine,
//! writes the persistent index, and trains the phrase model alongside it.

use super::types::IndexMeta;
use super::writer::IndexWriter;
use crate::corpus;
use crate::index::PHRASES_FILE;
use crate::markov::PhraseChain;
use crate::search::Searcher;
use crate::utils::progress::{ProgressBar, ProgressStyle};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Sentence-window order of the phrase model built next to the index.
const PHRASE_ORDER: usize = 2;

/// Build (or rebuild, with `force`) the index for `corpus_dir` into
/// `index_dir`. `silent` suppresses the phase spinners.
pub fn build_index(corpus_dir: &Path, index_dir: &Path, force: bool, silent: bool) -> Result<()> {
    let corpus_dir = corpus_dir
        .canonicalize()
        .with_context(|| format!("invalid corpus path {}", corpus_dir.display()))?;

    if force && index_dir.exists() {
        fs::remove_dir_all(index_dir).context("failed to remove existing index")?;
    }

    let spinner = phase_spinner(silent, "Assembling corpus...");
    let assembled = corpus::assemble(&corpus_dir)?;
    finish(
        &spinner,
        format!(
            "Assembled {} paragraphs from {} articles ({} bytes)",
            assembled.paragraphs.len(),
            assembled.article_count,
            assembled.buffer.len()
        ),
    );

    let spinner = phase_spinner(silent, "Building suffix array and FM tables...");
    let meta = IndexMeta {
        buffer_size: assembled.buffer.len() as u64,
        suffix_count: assembled.buffer.len() as u64,
        paragraph_count: assembled.paragraphs.len() as u64,
        article_count: assembled.article_count as u64,
        keyword_count: assembled.keyword_set.len() as u64,
    };
    let searcher = Searcher::build(assembled.buffer, assembled.paragraphs)?;
    finish(&spinner, format!("Indexed {} suffixes", meta.suffix_count));

    let spinner = phase_spinner(silent, "Writing index...");
    IndexWriter::write(
        index_dir,
        searcher.buffer(),
        searcher.suffix_array(),
        searcher.paragraphs(),
        &meta,
    )?;

    let chain = PhraseChain::build(
        searcher.paragraphs().paragraphs().iter().map(|p| p.text.as_str()),
        PHRASE_ORDER,
    );
    chain.save(&index_dir.join(PHRASES_FILE))?;
    finish(&spinner, format!("Index written to {}", index_dir.display()));

    Ok(())
}

fn phase_spinner(silent: bool, message: &'static str) -> Option<ProgressBar> {
    if silent {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    Some(spinner)
}

fn finish(spinner: &Option<ProgressBar>, message: String) {
    if let Some(spinner) = spinner {
        spinner.finish_with_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::reader;
    use tempfile::tempdir;

    #[test]
    fn test_build_and_reopen() {
        let corpus = tempdir().unwrap();
        std::fs::write(
            corpus.path().join("bach.txt"),
            "Bach spent his final decades in Leipzig writing sacred cantatas weekly.\n",
        )
        .unwrap();

        let index = tempdir().unwrap();
        let index_dir = index.path().join("idx");
        build_index(corpus.path(), &index_dir, false, true).unwrap();

        let meta = reader::read_meta(&index_dir).unwrap();
        assert_eq!(meta.paragraph_count, 1);
        assert_eq!(meta.article_count, 1);

        let searcher = Searcher::open(&index_dir).unwrap();
        let hits = searcher.search(b"leipzig");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].paragraph.article, "bach");

        assert!(index_dir.join(PHRASES_FILE).exists());
    }

    #[test]
    fn test_force_rebuild_replaces_index() {
        let corpus = tempdir().unwrap();
        std::fs::write(
            corpus.path().join("a.txt"),
            "A paragraph with enough characters to be extracted and indexed properly.\n",
        )
        .unwrap();

        let index = tempdir().unwrap();
        let index_dir = index.path().join("idx");
        build_index(corpus.path(), &index_dir, false, true).unwrap();
        std::fs::write(index_dir.join("stale.tmp"), "x").unwrap();

        build_index(corpus.path(), &index_dir, true, true).unwrap();
        assert!(!index_dir.join("stale.tmp").exists());
        assert!(Searcher::open(&index_dir).is_ok());
    }
}
