//! Index statistics reporting

use super::reader;
use super::{CORPUS_FILE, SA_FILE};
use anyhow::Result;
use std::path::Path;

/// Print statistics for the index at `index_dir`.
pub fn show_stats(index_dir: &Path) -> Result<()> {
    let meta = reader::read_meta(index_dir)?;

    println!("Index: {}", index_dir.display());
    println!("  Articles:    {}", meta.article_count);
    println!("  Paragraphs:  {}", meta.paragraph_count);
    println!("  Keywords:    {}", meta.keyword_count);
    println!("  Buffer size: {}", format_size(meta.buffer_size));
    println!("  Suffixes:    {}", meta.suffix_count);

    let corpus_size = file_size(&index_dir.join(CORPUS_FILE));
    let sa_size = file_size(&index_dir.join(SA_FILE));
    println!("  On disk:     {} (suffix array {})",
        format_size(corpus_size + sa_size),
        format_size(sa_size),
    );

    Ok(())
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
