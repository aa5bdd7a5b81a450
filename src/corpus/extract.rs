//! Paragraph extraction from article text files
//!
//! Each `.txt` file is one article. Lines starting with `## ` set the
//! current section heading; other lines are candidate paragraphs. Short
//! lines (under [`MIN_PARAGRAPH_CHARS`]) are skipped as navigation
//! fragments, captions, and similar noise.

use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Minimum paragraph length in characters; shorter lines are noise.
pub const MIN_PARAGRAPH_CHARS: usize = 40;

/// A paragraph as extracted from an article file, before keyword
/// filtering.
#[derive(Debug, Clone)]
pub struct RawParagraph {
    pub article: String,
    pub section: Option<String>,
    pub text: String,
}

/// Collect the article files under `corpus_dir`, sorted for a
/// deterministic buffer layout.
pub fn collect_article_files(corpus_dir: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(corpus_dir)
        .hidden(true)
        .git_ignore(true)
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("txt"))
        .collect();

    files.sort();
    Ok(files)
}

/// Split an article's contents into paragraphs, tracking `## ` section
/// headings.
pub fn extract_paragraphs(article: &str, contents: &str) -> Vec<RawParagraph> {
    let mut section: Option<String> = None;
    let mut paragraphs = Vec::new();

    for line in contents.lines() {
        let line = line.trim();

        if let Some(heading) = line.strip_prefix("##") {
            let heading = heading.trim_start_matches('#').trim();
            section = if heading.is_empty() {
                None
            } else {
                Some(heading.to_string())
            };
            continue;
        }

        if line.chars().count() < MIN_PARAGRAPH_CHARS {
            continue;
        }

        paragraphs.push(RawParagraph {
            article: article.to_string(),
            section: section.clone(),
            text: line.to_string(),
        });
    }

    paragraphs
}

/// Article identifier for a file: its stem.
pub fn article_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}
