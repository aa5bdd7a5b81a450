//! Keyword extraction
//!
//! Builds the searchable token stream for a paragraph. Three sources,
//! mirroring what matters for lookup in encyclopedic text:
//!
//! 1. standalone 4-digit numbers (years),
//! 2. capitalized phrases of up to six words (titles, names of works),
//!    lowered,
//! 3. plain word tokens, lowered, with stopwords and single characters
//!    dropped.
//!
//! Keywords are deduplicated in first-seen order so the flattened buffer
//! is deterministic for a given corpus.

use regex::Regex;
use rustc_hash::FxHashSet;

/// Common English stopwords plus question words; none of these carry
/// search value on their own.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "while",
    "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
    // question words
    "what", "which", "who", "whom", "whose", "when", "where", "why", "how",
];

/// Extracts the keyword stream for paragraphs. Construct once and reuse;
/// the regexes are compiled in `new`.
pub struct KeywordExtractor {
    year_re: Regex,
    phrase_re: Regex,
    token_re: Regex,
    stopwords: FxHashSet<&'static str>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self {
            // Standalone 4-digit numbers.
            year_re: Regex::new(r"\b\d{4}\b").expect("static regex"),
            // Runs of capitalized words, up to six.
            phrase_re: Regex::new(r"[A-Z][a-z]*(?:\s+[A-Z][a-z0-9]*){0,5}").expect("static regex"),
            // Word tokens; interior hyphens allowed.
            token_re: Regex::new(r"[A-Za-z0-9]+(?:-[A-Za-z0-9]+)*").expect("static regex"),
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Extract the keyword list for one paragraph, lowered and
    /// deduplicated in first-seen order.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut keywords = Vec::new();
        let mut add = |kw: String| {
            if seen.insert(kw.clone()) {
                keywords.push(kw);
            }
        };

        for m in self.year_re.find_iter(text) {
            add(m.as_str().to_string());
        }

        for m in self.phrase_re.find_iter(text) {
            let phrase = m.as_str().trim();
            if phrase.split_whitespace().count() <= 6 {
                add(phrase.to_lowercase());
            }
        }

        for m in self.token_re.find_iter(text) {
            let token = m.as_str().to_lowercase();
            if token.chars().count() > 1 && !self.stopwords.contains(token.as_str()) {
                add(token);
            }
        }

        keywords
    }

    /// The flattened, space-joined form of [`KeywordExtractor::extract`]:
    /// this is the paragraph's slice of the search buffer.
    pub fn filtered_text(&self, keywords: &[String]) -> String {
        keywords.join(" ")
    }
}
