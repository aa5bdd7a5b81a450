//! Output formatting for paragraph search results

use crate::search::Hit;
use regex::Regex;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Longest snippet printed when no sentence contains the keyword.
const SNIPPET_CHARS: usize = 200;

/// Print paragraph hits with the matched keywords highlighted.
///
/// `full` prints whole paragraphs; otherwise one sentence per hit. `limit`
/// of 0 means unlimited.
pub fn print_hits(hits: &[Hit], keywords: &[String], full: bool, limit: usize, color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    if hits.is_empty() {
        writeln!(stdout, "No matches.")?;
        return Ok(());
    }

    let highlight = highlight_regex(keywords);
    let shown = if limit == 0 { hits.len() } else { hits.len().min(limit) };

    for hit in &hits[..shown] {
        // Article/section header
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        match &hit.paragraph.section {
            Some(section) => writeln!(stdout, "{} / {}", hit.paragraph.article, section)?,
            None => writeln!(stdout, "{}", hit.paragraph.article)?,
        }
        stdout.reset()?;

        let text = if full {
            hit.paragraph.text.as_str()
        } else {
            snippet(&hit.paragraph.text, keywords)
        };
        print_highlighted(&mut stdout, text, highlight.as_ref())?;
        writeln!(stdout)?;
    }

    if shown < hits.len() {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        writeln!(stdout, "... and {} more", hits.len() - shown)?;
        stdout.reset()?;
    }

    Ok(())
}

/// One case-insensitive alternation over all keywords, or `None` when no
/// keyword survives escaping.
fn highlight_regex(keywords: &[String]) -> Option<Regex> {
    let parts: Vec<String> = keywords
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| regex::escape(k))
        .collect();
    if parts.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", parts.join("|"))).ok()
}

fn print_highlighted(stdout: &mut StandardStream, text: &str, highlight: Option<&Regex>) -> io::Result<()> {
    let Some(re) = highlight else {
        return writeln!(stdout, "{text}");
    };

    let mut last = 0;
    for m in re.find_iter(text) {
        write!(stdout, "{}", &text[last..m.start()])?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(stdout, "{}", m.as_str())?;
        stdout.reset()?;
        last = m.end();
    }
    writeln!(stdout, "{}", &text[last..])?;

    Ok(())
}

/// The first sentence of `text` mentioning any keyword, or a truncated
/// leading snippet when none does.
///
/// Matching is case-insensitive in `text` itself; lowercasing a copy and
/// reusing its byte offsets would drift whenever lowering changes a
/// character's length.
fn snippet<'a>(text: &'a str, keywords: &[String]) -> &'a str {
    for keyword in keywords {
        if keyword.is_empty() {
            continue;
        }
        let Ok(re) = Regex::new(&format!("(?i){}", regex::escape(keyword))) else {
            continue;
        };
        if let Some(m) = re.find(text) {
            let start = sentence_start(text, m.start());
            let end = sentence_end(text, m.start());
            return text[start..end].trim();
        }
    }

    // No sentence match: leading snippet, cut at a char boundary.
    let mut end = text.len().min(SNIPPET_CHARS);
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    text[..end].trim()
}

fn sentence_start(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut start = pos;
    while start > 0 {
        if matches!(bytes[start - 1], b'.' | b'!' | b'?') {
            break;
        }
        start -= 1;
    }
    start
}

fn sentence_end(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut end = pos;
    while end < bytes.len() {
        if matches!(bytes[end], b'.' | b'!' | b'?') {
            return end + 1;
        }
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Bach was born in Eisenach. He moved to Leipzig in 1723. He died there.";

    #[test]
    fn test_snippet_finds_sentence() {
        let s = snippet(TEXT, &["leipzig".to_string()]);
        assert_eq!(s, "He moved to Leipzig in 1723.");
    }

    #[test]
    fn test_snippet_first_keyword_wins() {
        let s = snippet(TEXT, &["died".to_string(), "eisenach".to_string()]);
        assert_eq!(s, "He died there.");
    }

    #[test]
    fn test_snippet_with_multibyte_lowercasing() {
        // Each U+0130 grows by a byte when lowered, so offsets taken from
        // a lowercased copy drift past this sentence's period and select
        // the next sentence instead.
        let text = "İİİİ at the Met. Vienna premiere followed.";
        let s = snippet(text, &["met".to_string()]);
        assert_eq!(s, "İİİİ at the Met.");
    }

    #[test]
    fn test_snippet_fallback_truncates() {
        let long = "word ".repeat(100);
        let s = snippet(&long, &["absent".to_string()]);
        assert!(s.len() <= SNIPPET_CHARS);
    }

    #[test]
    fn test_snippet_fallback_char_boundary() {
        let long = "é".repeat(300);
        let s = snippet(&long, &["absent".to_string()]);
        assert!(long.starts_with(s));
    }

    #[test]
    fn test_highlight_regex_case_insensitive() {
        let re = highlight_regex(&["leipzig".to_string()]).unwrap();
        assert!(re.is_match("Leipzig"));
    }

    #[test]
    fn test_highlight_regex_escapes_metachars() {
        let re = highlight_regex(&["a.b".to_string()]).unwrap();
        assert!(re.is_match("a.b"));
        assert!(!re.is_match("axb"));
    }

    #[test]
    fn test_highlight_regex_empty() {
        assert!(highlight_regex(&[]).is_none());
        assert!(highlight_regex(&[String::new()]).is_none());
    }
}
