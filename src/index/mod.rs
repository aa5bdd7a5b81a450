//! Index construction, persistence, and loading.

pub mod build;
pub mod fm;
pub mod reader;
pub mod stats;
pub mod suffix_array;
pub mod types;
pub mod writer;

pub use types::*;

/// Flattened corpus buffer
pub const CORPUS_FILE: &str = "corpus.bin";
/// Suffix array (header + little-endian u32 entries)
pub const SA_FILE: &str = "sa.bin";
/// Paragraph table
pub const PARAGRAPHS_FILE: &str = "paragraphs.json";
/// Index statistics
pub const META_FILE: &str = "meta.json";
/// Markov phrase model
pub const PHRASES_FILE: &str = "phrases.json";
