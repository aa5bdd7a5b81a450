//! # PFI - Paragraph Full-text Index
//!
//! PFI is a full-text search engine for fixed text corpora (e.g. a set of
//! encyclopedia articles). It indexes the corpus once into a suffix array
//! plus FM-index and answers keyword queries with exact paragraph-level
//! results, without rescanning the text.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`corpus`] - Corpus assembly (paragraph extraction, keyword filtering)
//! - [`index`] - Suffix array and FM-index construction, persistence, stats
//! - [`search`] - Backward search with verification and multi-keyword AND
//! - [`markov`] - Sentence-level phrase generation trained on the corpus
//! - [`output`] - Terminal result formatting with keyword highlighting
//! - [`utils`] - App data directories and progress reporting
//!
//! ## Quick Start
//!
//! ```ignore
//! use pfi::search::Searcher;
//! use std::path::Path;
//!
//! let searcher = Searcher::open(Path::new("/path/to/index"))?;
//! for hit in searcher.search_all(&["bach", "leipzig"])? {
//!     println!("{}: {}", hit.paragraph.article, hit.paragraph.text);
//! }
//! ```
//!
//! ## How search works
//!
//! The corpus buffer is a concatenation of per-paragraph keyword streams,
//! each terminated by a sentinel byte. A suffix array over that buffer
//! feeds a Burrows-Wheeler transform with checkpointed rank tables;
//! keyword lookup is a backward search over the pattern, and every
//! candidate interval is verified against the real buffer before its
//! positions are mapped back to paragraphs.

pub mod corpus;
pub mod index;
pub mod markov;
pub mod output;
pub mod search;
pub mod utils;
