//! Core types for the disaster news keyword radar
//!
//! This crate defines the shared data structures used across the radar,
//! including articles, search parameters and the keyword expansion trace.

pub mod error;
pub mod expansion;
pub mod news;

pub use error::{RadarError, RadarResult};
pub use expansion::{
    Depth, DepthHistory, ExpansionResult, ExpansionState, TerminationReason, MAX_DEPTH, MIN_DEPTH,
};
pub use news::{Article, NewsSearchParams, SortOrder};
