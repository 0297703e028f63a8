//! Noun extraction
//!
//! The ranker depends only on [`NounExtractor`]; any morphological analyzer
//! can be plugged in behind it. [`HangulNounExtractor`] is a dictionary-free
//! extractor for Korean news text: it splits on non-word characters, drops
//! predicate forms and strips trailing particles from what remains.

use thiserror::Error;

/// Errors raised when text cannot be tokenized at all
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("Input too large: {size} bytes (limit {limit})")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Analyzer failed: {0}")]
    Analyzer(String),
}

/// Extracts noun tokens from raw text
pub trait NounExtractor: Send + Sync {
    /// Nouns in order of appearance, repeated once per occurrence
    fn nouns(&self, text: &str) -> Result<Vec<String>, TokenizerError>;
}

/// Default input limit (1 MiB)
const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Trailing particles, longest first so compound forms win
const PARTICLES: &[&str] = &[
    "에서부터", "으로부터", "에게서", "한테서", "이라는", "에서는", "에서도", "으로는",
    "으로도", "이라고", "까지", "부터", "에서", "에게", "한테", "으로", "처럼", "보다",
    "라는", "라고", "와의", "과의", "에는", "에도", "로는", "이나", "의", "은", "는", "이",
    "가", "을", "를", "에", "와", "과", "도", "만", "로", "께",
];

/// Predicate endings that mark a token as a verb or adjective form
const PREDICATE_ENDINGS: &[&str] = &[
    "습니다", "했다", "한다", "된다", "됐다", "있다", "없다", "였다", "었다", "았다",
    "하는", "되는", "있는", "없는", "했던", "하고", "했고", "하며", "해서", "하여", "하면",
    "되면", "하기", "되기",
];

/// Function words that survive particle stripping but carry no topic
const STOP_WORDS: &[&str] = &[
    "그리고", "하지만", "그러나", "또한", "이번", "지난", "관련", "대한", "대해", "위해",
    "통해", "따르면", "위한", "가운데", "이후", "이날", "현재",
];

/// Dictionary-free noun extractor for Korean text
#[derive(Debug, Clone)]
pub struct HangulNounExtractor {
    max_input_bytes: usize,
}

impl Default for HangulNounExtractor {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl HangulNounExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    fn noun_of(token: &str) -> Option<String> {
        if token.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if !token.chars().any(is_hangul) {
            return Some(token.to_string());
        }
        if token.ends_with('다') || PREDICATE_ENDINGS.iter().any(|e| token.ends_with(e)) {
            return None;
        }

        let stem = strip_particle(token);
        if STOP_WORDS.contains(&stem) {
            return None;
        }
        Some(stem.to_string())
    }
}

impl NounExtractor for HangulNounExtractor {
    fn nouns(&self, text: &str) -> Result<Vec<String>, TokenizerError> {
        if text.len() > self.max_input_bytes {
            return Err(TokenizerError::InputTooLarge {
                size: text.len(),
                limit: self.max_input_bytes,
            });
        }

        Ok(text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .filter_map(Self::noun_of)
            .collect())
    }
}

fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Strip one trailing particle, keeping at least two characters of stem
fn strip_particle(token: &str) -> &str {
    for particle in PARTICLES {
        if let Some(stem) = token.strip_suffix(particle) {
            if stem.chars().count() >= 2 {
                return stem;
            }
        }
    }
    token
}
