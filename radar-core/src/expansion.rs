//! Keyword expansion trace types
//!
//! A run starts from a seed keyword set (depth 0) and derives one keyword set
//! per completed round. The trace is append-only and never holds more than
//! `depth + 1` entries.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RadarError;

/// Smallest accepted expansion depth
pub const MIN_DEPTH: usize = 1;

/// Largest accepted expansion depth
pub const MAX_DEPTH: usize = 5;

/// Number of expansion rounds to run, validated to `MIN_DEPTH..=MAX_DEPTH`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Depth(usize);

impl Depth {
    pub fn new(rounds: usize) -> Result<Self, RadarError> {
        if (MIN_DEPTH..=MAX_DEPTH).contains(&rounds) {
            Ok(Self(rounds))
        } else {
            Err(RadarError::invalid_parameter(format!(
                "depth must be between {} and {}, got {}",
                MIN_DEPTH, MAX_DEPTH, rounds
            )))
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<usize> for Depth {
    type Error = RadarError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Depth::new(value)
    }
}

impl From<Depth> for usize {
    fn from(depth: Depth) -> Self {
        depth.0
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keyword sets recorded per depth index (0 = seed)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthHistory(BTreeMap<usize, Vec<String>>);

impl DepthHistory {
    /// Start a history from the seed keyword set
    pub fn seeded(seed: Vec<String>) -> Self {
        let mut levels = BTreeMap::new();
        levels.insert(0, seed);
        Self(levels)
    }

    /// Record the keyword set derived at `depth`.
    ///
    /// Entries are written once and in order: `depth` must be the next
    /// unwritten index.
    pub fn record(&mut self, depth: usize, keywords: Vec<String>) -> Result<(), RadarError> {
        if depth != self.0.len() {
            return Err(RadarError::internal(format!(
                "depth {} recorded out of order (next expected {})",
                depth,
                self.0.len()
            )));
        }
        self.0.insert(depth, keywords);
        Ok(())
    }

    pub fn get(&self, depth: usize) -> Option<&[String]> {
        self.0.get(&depth).map(Vec::as_slice)
    }

    /// Seed keyword set
    pub fn seed(&self) -> Option<&[String]> {
        self.get(0)
    }

    /// Deepest recorded keyword set
    pub fn latest(&self) -> Option<(usize, &[String])> {
        self.0
            .iter()
            .next_back()
            .map(|(depth, keywords)| (*depth, keywords.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.0
            .iter()
            .map(|(depth, keywords)| (*depth, keywords.as_slice()))
    }
}

/// Why an expansion run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every requested round completed
    DepthExhausted,
    /// No articles were found for any keyword in `round`
    EmptyAggregate { round: usize },
    /// The ranker produced no qualifying nouns in `round`
    NoKeywords { round: usize },
    /// The tokenizer could not process the aggregate text of `round`
    TokenizerFailed { round: usize },
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::DepthExhausted => write!(f, "depth exhausted"),
            TerminationReason::EmptyAggregate { round } => {
                write!(f, "no articles in round {}", round)
            }
            TerminationReason::NoKeywords { round } => {
                write!(f, "no keywords produced in round {}", round)
            }
            TerminationReason::TokenizerFailed { round } => {
                write!(f, "tokenizer failed in round {}", round)
            }
        }
    }
}

/// Progress of a single expansion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionState {
    Seeded,
    Expanding { round: usize },
    Terminated(TerminationReason),
}

/// Outcome of an expansion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionResult {
    /// Keyword set from the last completed depth
    pub final_keywords: Vec<String>,
    /// Keyword set per depth, seed included
    #[serde(rename = "all_depth_results")]
    pub history: DepthHistory,
    /// Why the run stopped
    pub termination: TerminationReason,
}
