//! Integration tests running the full pipeline: corpus directory on disk,
//! index build, reopen from the written files, then keyword queries.

use pfi::index::build::build_index;
use pfi::index::{PHRASES_FILE, reader};
use pfi::markov::PhraseChain;
use pfi::search::Searcher;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_corpus(dir: &TempDir) {
    fs::write(
        dir.path().join("bach.txt"),
        "## Early life\n\
         Johann Sebastian Bach was born in Eisenach in 1685 into a family of musicians.\n\
         ## Leipzig\n\
         Bach moved to Leipzig in 1723 and led the Thomanerchor. He wrote weekly cantatas there. He died in Leipzig in 1750.\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("mozart.txt"),
        "Wolfgang Amadeus Mozart was born in Salzburg in 1756 and toured Europe as a child prodigy.\n\
         Mozart settled in Vienna in 1781 where he wrote his most famous operas.\n",
    )
    .unwrap();
}

fn build_fixture() -> (TempDir, TempDir, PathBuf) {
    let corpus = TempDir::new().unwrap();
    write_corpus(&corpus);

    let index_root = TempDir::new().unwrap();
    let index_dir = index_root.path().join("idx");
    build_index(corpus.path(), &index_dir, false, true).unwrap();

    (corpus, index_root, index_dir)
}

#[test]
fn build_then_search_single_keyword() {
    let (_corpus, _index_root, index_dir) = build_fixture();
    let searcher = Searcher::open(&index_dir).unwrap();

    let hits = searcher.search(b"salzburg");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].paragraph.article, "mozart");
    assert!(hits[0].paragraph.text.contains("Salzburg"));
}

#[test]
fn search_all_intersects_across_keywords() {
    let (_corpus, _index_root, index_dir) = build_fixture();
    let searcher = Searcher::open(&index_dir).unwrap();

    // "1723" and "leipzig" only co-occur in Bach's Leipzig paragraph.
    let hits = searcher
        .search_all(&["1723".to_string(), "leipzig".to_string()])
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].paragraph.article, "bach");
    assert_eq!(hits[0].paragraph.section.as_deref(), Some("Leipzig"));
}

#[test]
fn search_all_no_common_paragraph() {
    let (_corpus, _index_root, index_dir) = build_fixture();
    let searcher = Searcher::open(&index_dir).unwrap();

    let hits = searcher
        .search_all(&["salzburg".to_string(), "leipzig".to_string()])
        .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn absent_keyword_finds_nothing() {
    let (_corpus, _index_root, index_dir) = build_fixture();
    let searcher = Searcher::open(&index_dir).unwrap();
    assert!(searcher.search(b"beethoven").is_empty());
}

#[test]
fn stopwords_are_not_searchable() {
    let (_corpus, _index_root, index_dir) = build_fixture();
    let searcher = Searcher::open(&index_dir).unwrap();
    // "the" is filtered at assembly; it never appears as a token.
    assert!(searcher.search(b" the ").is_empty());
}

#[test]
fn metadata_matches_corpus() {
    let (_corpus, _index_root, index_dir) = build_fixture();
    let meta = reader::read_meta(&index_dir).unwrap();

    assert_eq!(meta.article_count, 2);
    assert_eq!(meta.paragraph_count, 4);
    assert_eq!(meta.buffer_size, meta.suffix_count);
    assert!(meta.keyword_count > 0);
}

#[test]
fn phrase_model_written_and_usable() {
    let (_corpus, _index_root, index_dir) = build_fixture();
    let chain = PhraseChain::load(&index_dir.join(PHRASES_FILE)).unwrap();

    // The Leipzig paragraph has three sentences, enough for one window.
    assert!(!chain.is_empty());

    let mut rng = rand::rng();
    let phrase = chain.generate(&[], 2, &mut rng).unwrap();
    assert!(!phrase.is_empty());
}

#[test]
fn rebuild_with_force_still_searches() {
    let corpus = TempDir::new().unwrap();
    write_corpus(&corpus);

    let index_root = TempDir::new().unwrap();
    let index_dir = index_root.path().join("idx");
    build_index(corpus.path(), &index_dir, false, true).unwrap();
    build_index(corpus.path(), &index_dir, true, true).unwrap();

    let searcher = Searcher::open(&index_dir).unwrap();
    assert_eq!(searcher.search(b"vienna").len(), 1);
}
