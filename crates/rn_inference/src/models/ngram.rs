use std::collections::HashMap;
use std::fmt;
use rn_core::{KeywordExtractor, Result};
use unicode_segmentation::UnicodeSegmentation;
use super::stop_words::is_stop_word;

const MIN_NGRAM: usize = 2;
const MAX_NGRAM: usize = 3;

/// Local key phrase extractor over 2- and 3-word n-grams.
///
/// Stop words are removed before n-grams are formed, so a phrase may span
/// a dropped word ("results *of the* vote" yields "results vote"). Each
/// candidate is scored by how often it occurs times the summed document
/// frequency of its words; equal scores keep first-occurrence order.
#[derive(Default)]
pub struct NgramExtractor;

impl fmt::Debug for NgramExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NgramExtractor")
            .field("ngram_range", &(MIN_NGRAM, MAX_NGRAM))
            .finish()
    }
}

impl NgramExtractor {
    pub fn new() -> Self {
        Self
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| {
                let word = word.to_lowercase();
                match word.strip_suffix("'s").or_else(|| word.strip_suffix("’s")) {
                    Some(stem) => stem.to_string(),
                    None => word,
                }
            })
            .filter(|word| word.chars().count() >= 2)
            .filter(|word| word.chars().any(char::is_alphanumeric))
            .filter(|word| !is_stop_word(word))
            .collect()
    }

    pub fn rank(text: &str, max_keywords: usize) -> Vec<String> {
        if max_keywords == 0 {
            return Vec::new();
        }

        let tokens = Self::tokenize(text);
        if tokens.len() < MIN_NGRAM {
            return tokens.into_iter().take(max_keywords).collect();
        }

        let mut word_freq: HashMap<&str, usize> = HashMap::new();
        for token in &tokens {
            *word_freq.entry(token.as_str()).or_insert(0) += 1;
        }

        // (phrase, occurrences, summed word frequency) in first-seen order
        let mut candidates: Vec<(String, usize, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for start in 0..tokens.len() {
            for n in MIN_NGRAM..=MAX_NGRAM {
                let Some(window) = tokens.get(start..start + n) else {
                    break;
                };
                let phrase = window.join(" ");
                match index.get(&phrase) {
                    Some(&i) => candidates[i].1 += 1,
                    None => {
                        let weight = window.iter().map(|w| word_freq[w.as_str()]).sum();
                        index.insert(phrase.clone(), candidates.len());
                        candidates.push((phrase, 1, weight));
                    }
                }
            }
        }

        // stable sort keeps first-occurrence order for ties
        candidates.sort_by(|a, b| (b.1 * b.2).cmp(&(a.1 * a.2)));
        candidates
            .into_iter()
            .take(max_keywords)
            .map(|(phrase, _, _)| phrase)
            .collect()
    }
}

#[async_trait::async_trait]
impl KeywordExtractor for NgramExtractor {
    fn name(&self) -> &str {
        "ngram"
    }

    async fn extract(&self, text: &str, max_keywords: usize) -> Result<Vec<String>> {
        let keywords = Self::rank(text, max_keywords);
        tracing::debug!("Extracted keywords: {:?}", keywords);
        Ok(keywords)
    }
}
