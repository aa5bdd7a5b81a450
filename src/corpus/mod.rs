//! Corpus assembly
//!
//! Turns a directory of plain-text article files into the structures the
//! index is built from: a flattened byte buffer of filtered keyword
//! streams separated by a sentinel byte, plus the paragraph table mapping
//! buffer offsets back to article, section, original text, and keywords.

pub mod assembler;
pub mod extract;
pub mod keywords;

pub use assembler::{AssembledCorpus, assemble};
pub use extract::{RawParagraph, extract_paragraphs};
pub use keywords::KeywordExtractor;
