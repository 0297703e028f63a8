//! Keyword frequency ranking
//!
//! Ranks the nouns of a text by occurrence count. Ties keep the order in
//! which the nouns were first seen, so the output is deterministic for a
//! given input.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::tokenizer::{NounExtractor, TokenizerError};

/// Nouns must be longer than this many characters
pub const DEFAULT_MIN_LENGTH: usize = 1;

/// Number of keywords kept per round
pub const DEFAULT_TOP_N: usize = 20;

/// Ranks nouns in a text by frequency
#[derive(Clone)]
pub struct KeywordRanker {
    extractor: Arc<dyn NounExtractor>,
}

impl KeywordRanker {
    pub fn new(extractor: Arc<dyn NounExtractor>) -> Self {
        Self { extractor }
    }

    /// Return the `top_n` most frequent nouns longer than `min_length` characters
    pub fn rank(
        &self,
        text: &str,
        min_length: usize,
        top_n: usize,
    ) -> Result<Vec<String>, TokenizerError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let nouns = self.extractor.nouns(text)?;

        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for noun in nouns {
            let noun = noun.trim();
            if noun.chars().count() <= min_length {
                continue;
            }
            *counts.entry(noun.to_string()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        // Stable sort: equal counts keep first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(top_n);

        debug!(
            "Ranked {} nouns: {:?}",
            ranked.len(),
            ranked.iter().take(5).collect::<Vec<_>>()
        );

        Ok(ranked.into_iter().map(|(noun, _)| noun).collect())
    }
}
