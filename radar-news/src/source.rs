//! Article source capability consumed by the expansion engine

use std::sync::Arc;

use async_trait::async_trait;

use radar_core::{Article, NewsSearchParams};

use crate::error::NewsError;

/// A provider that returns articles for a search query
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Check that the source can be used at all (credentials, endpoint).
    ///
    /// Performs no network I/O.
    fn ensure_configured(&self) -> Result<(), NewsError>;

    /// Search for articles matching `params`
    async fn search(&self, params: &NewsSearchParams) -> Result<Vec<Article>, NewsError>;
}

#[async_trait]
impl<S: ArticleSource + ?Sized> ArticleSource for Arc<S> {
    fn ensure_configured(&self) -> Result<(), NewsError> {
        (**self).ensure_configured()
    }

    async fn search(&self, params: &NewsSearchParams) -> Result<Vec<Article>, NewsError> {
        (**self).search(params).await
    }
}
