//! News search clients for keyword harvesting
//!
//! This crate provides the article source used by the keyword expansion
//! engine:
//! - Naver: news search via the Naver Open API (primary)
//! - `ArticleSource`: the capability the engine depends on, so any provider
//!   (or a test double) can stand in

pub mod error;
pub mod html;
pub mod naver;
pub mod source;
pub mod types;

pub use error::NewsError;
pub use html::strip_html;
pub use naver::{NaverCredentials, NaverNewsClient};
pub use source::ArticleSource;
pub use types::{NaverNewsItem, NaverSearchResponse};
