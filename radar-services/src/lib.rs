//! Business logic services for the disaster news radar
//!
//! This crate provides the keyword expansion engine and the services around
//! it: noun extraction, frequency ranking, request pacing, article archival
//! and the scheduled trigger.

pub mod expansion;
pub mod news_archive;
pub mod ranker;
pub mod rate_limiter;
pub mod scheduler;
pub mod tokenizer;

pub use expansion::{aggregate_batches, ExpansionConfig, ExpansionEngine, ExpansionError, KeywordBatch};
pub use news_archive::{ArchiveError, NewsArchive};
pub use ranker::{KeywordRanker, DEFAULT_MIN_LENGTH, DEFAULT_TOP_N};
pub use rate_limiter::{RateLimitedSource, RateLimiter, RateLimiterStats};
pub use scheduler::{AnalysisScheduleConfig, AnalysisScheduler, DISASTER_SEED_KEYWORDS};
pub use tokenizer::{HangulNounExtractor, NounExtractor, TokenizerError};
