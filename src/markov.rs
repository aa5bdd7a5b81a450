//! Sentence-level phrase generation
//!
//! A small order-k lookup table over consecutive sentences of the corpus:
//! each window of `order` sentences maps to the sentences observed to
//! follow it. Generation seeds from a window mentioning a prompt keyword
//! when one exists, then walks the table. This sits next to the search
//! index for contrast (retrieval vs. generation); it is deliberately not
//! an index structure.

use anyhow::{Context, Result, bail};
use rand::Rng;
use rand::seq::IndexedRandom;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// One transition: `key` (a window of `order` sentences) to the sentences
/// seen after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub key: Vec<String>,
    pub next: Vec<String>,
}

/// Serialized form of the phrase model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhraseModel {
    pub order: usize,
    pub transitions: Vec<Transition>,
}

/// In-memory phrase chain with a key lookup index.
pub struct PhraseChain {
    model: PhraseModel,
    by_key: FxHashMap<Vec<String>, usize>,
}

impl PhraseChain {
    /// Train a chain of the given order over paragraph texts. Windows
    /// never cross paragraph boundaries.
    pub fn build<'a>(texts: impl Iterator<Item = &'a str>, order: usize) -> Self {
        let order = order.max(1);
        let mut table: FxHashMap<Vec<String>, Vec<String>> = FxHashMap::default();
        let mut key_order: Vec<Vec<String>> = Vec::new();

        for text in texts {
            let sentences = split_sentences(text);
            if sentences.len() <= order {
                continue;
            }
            for window in sentences.windows(order + 1) {
                let key = window[..order].to_vec();
                let next = window[order].clone();
                match table.get_mut(&key) {
                    Some(nexts) => nexts.push(next),
                    None => {
                        key_order.push(key.clone());
                        table.insert(key, vec![next]);
                    }
                }
            }
        }

        // Deterministic transition order (first-seen) for stable output
        // files across runs.
        let transitions: Vec<Transition> = key_order
            .into_iter()
            .filter_map(|key| {
                table.remove(&key).map(|next| Transition {
                    key,
                    next,
                })
            })
            .collect();

        Self::from_model(PhraseModel { order, transitions })
    }

    pub fn from_model(model: PhraseModel) -> Self {
        let by_key = model
            .transitions
            .iter()
            .enumerate()
            .map(|(i, t)| (t.key.clone(), i))
            .collect();
        Self { model, by_key }
    }

    pub fn is_empty(&self) -> bool {
        self.model.transitions.is_empty()
    }

    pub fn order(&self) -> usize {
        self.model.order
    }

    /// Generate a phrase of up to `length` chained sentences beyond the
    /// seed window. Prompt keywords (already lowercased) bias the seed:
    /// a random window mentioning any of them is preferred. Returns
    /// `None` for an empty model.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        prompt: &[String],
        length: usize,
        rng: &mut R,
    ) -> Option<String> {
        let transitions = &self.model.transitions;
        if transitions.is_empty() {
            return None;
        }

        let matching: Vec<&Transition> = if prompt.is_empty() {
            Vec::new()
        } else {
            transitions
                .iter()
                .filter(|t| {
                    t.key.iter().any(|sentence| {
                        let lower = sentence.to_lowercase();
                        prompt.iter().any(|word| lower.contains(word.as_str()))
                    })
                })
                .collect()
        };

        let start = match matching.choose(rng) {
            Some(&t) => t,
            None => transitions.choose(rng)?,
        };

        let mut output: Vec<String> = start.key.clone();
        for _ in 0..length {
            let tail = output[output.len() - self.model.order..].to_vec();
            let Some(&idx) = self.by_key.get(&tail) else {
                break;
            };
            let Some(next) = self.model.transitions[idx].next.choose(rng) else {
                break;
            };
            output.push(next.clone());
        }

        Some(output.join(" "))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(file, &self.model).context("failed to serialize phrase model")?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open phrase model {}", path.display()))?;
        let model: PhraseModel =
            serde_json::from_reader(BufReader::new(file)).context("failed to parse phrase model")?;

        // The walk in `generate` slices windows of exactly `order`
        // sentences; a key of any other length must not get that far.
        if model.order == 0 {
            bail!("phrase model corrupt: order is zero");
        }
        if let Some(t) = model.transitions.iter().find(|t| t.key.len() != model.order) {
            bail!(
                "phrase model corrupt: key of {} sentences, expected {}",
                t.key.len(),
                model.order
            );
        }

        Ok(Self::from_model(model))
    }
}

/// Split text into sentences on `.`, `!`, `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        if matches!(b, b'.' | b'!' | b'?')
            && bytes.get(i + 1).is_none_or(|&next| next.is_ascii_whitespace())
        {
            let sentence = text[start..=i].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = i + 1;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TEXT: &str = "Bach was born in Eisenach. He moved to Leipzig in 1723. \
        He led the Thomanerchor there. He wrote weekly cantatas. He died in 1750.";

    #[test]
    fn test_split_sentences() {
        let s = split_sentences("One sentence. Another one! A third? Trailing words");
        assert_eq!(s.len(), 4);
        assert_eq!(s[0], "One sentence.");
        assert_eq!(s[3], "Trailing words");
    }

    #[test]
    fn test_split_does_not_break_inside_numbers() {
        let s = split_sentences("Opus 3.14 is not real. Truly.");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_build_transitions() {
        let chain = PhraseChain::build([TEXT].into_iter(), 2);
        assert!(!chain.is_empty());
        assert_eq!(chain.order(), 2);
        // 5 sentences, order 2: 3 windows.
        assert_eq!(chain.model.transitions.len(), 3);

        let first = &chain.model.transitions[0];
        assert_eq!(first.key[0], "Bach was born in Eisenach.");
        assert_eq!(first.next, vec!["He led the Thomanerchor there.".to_string()]);
    }

    #[test]
    fn test_generate_walks_chain() {
        let chain = PhraseChain::build([TEXT].into_iter(), 2);
        let mut rng = StdRng::seed_from_u64(7);
        let phrase = chain.generate(&[], 3, &mut rng).unwrap();
        // Seed window plus at least one chained sentence.
        assert!(phrase.split(". ").count() >= 2);
    }

    #[test]
    fn test_generate_prefers_prompt_match() {
        let chain = PhraseChain::build([TEXT].into_iter(), 2);
        let mut rng = StdRng::seed_from_u64(7);
        let phrase = chain
            .generate(&["leipzig".to_string()], 2, &mut rng)
            .unwrap();
        assert!(phrase.to_lowercase().contains("leipzig"));
    }

    #[test]
    fn test_generate_empty_model() {
        let chain = PhraseChain::build(std::iter::empty(), 2);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(chain.generate(&[], 3, &mut rng).is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let chain = PhraseChain::build([TEXT].into_iter(), 2);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phrases.json");

        chain.save(&path).unwrap();
        let loaded = PhraseChain::load(&path).unwrap();

        assert_eq!(loaded.order(), 2);
        assert_eq!(loaded.model.transitions.len(), chain.model.transitions.len());
    }

    #[test]
    fn test_load_rejects_mismatched_key_length() {
        let model = PhraseModel {
            order: 2,
            transitions: vec![Transition {
                key: vec!["Only one sentence in the key.".to_string()],
                next: vec!["Whatever follows.".to_string()],
            }],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phrases.json");
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();

        let err = PhraseChain::load(&path).err().expect("load must fail");
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn test_load_rejects_zero_order() {
        let model = PhraseModel {
            order: 0,
            transitions: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phrases.json");
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();

        assert!(PhraseChain::load(&path).is_err());
    }

    #[test]
    fn test_short_paragraphs_skipped() {
        let chain = PhraseChain::build(["Only one sentence here."].into_iter(), 2);
        assert!(chain.is_empty());
    }
}
