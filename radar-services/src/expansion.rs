//! Recursive keyword expansion
//!
//! Each round searches news for every keyword in the current set, joins the
//! titles and descriptions into one text, and ranks its nouns to form the next
//! keyword set. Rounds run strictly in sequence; a run stops after the
//! requested depth or as soon as a round finds no articles.

use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use radar_core::{
    Article, Depth, DepthHistory, ExpansionResult, ExpansionState, NewsSearchParams, SortOrder,
    TerminationReason,
};
use radar_news::{ArticleSource, NewsError};

use crate::ranker::{KeywordRanker, DEFAULT_MIN_LENGTH, DEFAULT_TOP_N};
use crate::tokenizer::NounExtractor;

/// Errors that abort an expansion run
#[derive(Debug, Error)]
pub enum ExpansionError {
    /// The article source is not usable (e.g. missing credentials)
    #[error("Configuration error: {0}")]
    Config(#[source] NewsError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration for ExpansionEngine
#[derive(Debug, Clone)]
pub struct ExpansionConfig {
    /// Articles requested per keyword
    pub page_size: u32,
    /// Offset of the first article requested
    pub start: u32,
    /// Result ordering for each search
    pub sort: SortOrder,
    /// Nouns must be longer than this many characters
    pub min_noun_length: usize,
    /// Keywords kept per round
    pub top_n: usize,
    /// Fetch the keywords of a round concurrently
    pub concurrent_fetch: bool,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            start: 1,
            sort: SortOrder::Date,
            min_noun_length: DEFAULT_MIN_LENGTH,
            top_n: DEFAULT_TOP_N,
            concurrent_fetch: false,
        }
    }
}

/// Articles fetched for one keyword of a round
#[derive(Debug, Clone)]
pub struct KeywordBatch {
    /// Position of the keyword in the round's keyword set
    pub index: usize,
    pub keyword: String,
    pub articles: Vec<Article>,
}

/// Join the articles of a round into one text.
///
/// Batches are ordered by keyword index first, so the text does not depend on
/// the order in which fetches completed.
pub fn aggregate_batches(mut batches: Vec<KeywordBatch>) -> String {
    batches.sort_by_key(|batch| batch.index);

    let mut text = String::new();
    for article in batches.iter().flat_map(|batch| &batch.articles) {
        text.push_str(&article.title);
        text.push(' ');
        text.push_str(&article.description);
        text.push(' ');
    }
    text
}

/// Drives fetch → aggregate → rank rounds over an article source
pub struct ExpansionEngine {
    source: Arc<dyn ArticleSource>,
    ranker: KeywordRanker,
    config: ExpansionConfig,
}

impl ExpansionEngine {
    /// Create a new engine with default config
    pub fn new(source: Arc<dyn ArticleSource>, extractor: Arc<dyn NounExtractor>) -> Self {
        Self::with_config(source, extractor, ExpansionConfig::default())
    }

    /// Create a new engine with custom config
    pub fn with_config(
        source: Arc<dyn ArticleSource>,
        extractor: Arc<dyn NounExtractor>,
        config: ExpansionConfig,
    ) -> Self {
        Self {
            source,
            ranker: KeywordRanker::new(extractor),
            config,
        }
    }

    /// Expand `seed` for up to `depth` rounds.
    ///
    /// Only a misconfigured source is an error; it is detected before any
    /// search is made. Everything else shortens the run instead.
    #[instrument(skip_all, fields(seed_len = seed.len(), depth = %depth))]
    pub async fn expand(
        &self,
        seed: Vec<String>,
        depth: Depth,
    ) -> Result<ExpansionResult, ExpansionError> {
        self.source
            .ensure_configured()
            .map_err(ExpansionError::Config)?;

        let mut history = DepthHistory::seeded(seed.clone());
        let mut current = seed;
        let mut state = ExpansionState::Seeded;
        debug!(?state, keywords = ?current, "Expansion seeded");

        for round in 1..=depth.get() {
            state = ExpansionState::Expanding { round };
            info!(round, keywords = ?current, "Starting expansion round");

            let batches = self.fetch_round(round, &current).await;
            let article_count: usize = batches.iter().map(|b| b.articles.len()).sum();
            let text = aggregate_batches(batches);

            // Articles with blank title and description count as no articles
            if text.trim().is_empty() {
                info!(round, "No articles found for any keyword, stopping");
                state = ExpansionState::Terminated(TerminationReason::EmptyAggregate { round });
                break;
            }

            let next = match self
                .ranker
                .rank(&text, self.config.min_noun_length, self.config.top_n)
            {
                Ok(next) => next,
                Err(e) => {
                    warn!(round, "Tokenizer could not process round text: {}", e);
                    state =
                        ExpansionState::Terminated(TerminationReason::TokenizerFailed { round });
                    break;
                }
            };

            if next.is_empty() {
                info!(round, articles = article_count, "No keywords produced, stopping");
                state = ExpansionState::Terminated(TerminationReason::NoKeywords { round });
                break;
            }

            info!(
                round,
                articles = article_count,
                keywords = ?next,
                "Expansion round complete"
            );

            history
                .record(round, next.clone())
                .map_err(|e| ExpansionError::Internal(e.to_string()))?;
            current = next;
        }

        let termination = match state {
            ExpansionState::Terminated(reason) => reason,
            _ => TerminationReason::DepthExhausted,
        };

        info!(
            depths = history.len(),
            %termination,
            final_keywords = ?current,
            "Expansion finished"
        );

        Ok(ExpansionResult {
            final_keywords: current,
            history,
            termination,
        })
    }

    /// Fetch articles for every keyword of a round.
    ///
    /// A failed keyword yields an empty batch; the round continues.
    async fn fetch_round(&self, round: usize, keywords: &[String]) -> Vec<KeywordBatch> {
        if self.config.concurrent_fetch {
            let fetches = keywords
                .iter()
                .enumerate()
                .map(|(index, keyword)| self.fetch_keyword(round, index, keyword));
            join_all(fetches).await
        } else {
            let mut batches = Vec::with_capacity(keywords.len());
            for (index, keyword) in keywords.iter().enumerate() {
                batches.push(self.fetch_keyword(round, index, keyword).await);
            }
            batches
        }
    }

    async fn fetch_keyword(&self, round: usize, index: usize, keyword: &str) -> KeywordBatch {
        let params = NewsSearchParams::new(keyword)
            .with_display(self.config.page_size)
            .with_start(self.config.start)
            .with_sort(self.config.sort);

        let articles = match self.source.search(&params).await {
            Ok(articles) => {
                info!(round, keyword, articles = articles.len(), "Fetched articles");
                for article in &articles {
                    debug!(
                        round,
                        keyword,
                        title = %article.title,
                        description = %article.description,
                        "Article seen"
                    );
                }
                articles
            }
            Err(e) => {
                warn!(round, keyword, "Failed to fetch articles: {}", e);
                Vec::new()
            }
        };

        KeywordBatch {
            index,
            keyword: keyword.to_string(),
            articles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::tokenizer::{HangulNounExtractor, TokenizerError};

    /// Scripted article source: responses keyed by query, with call counting
    #[derive(Default)]
    struct MockSource {
        configured: bool,
        responses: HashMap<String, Vec<Article>>,
        failing: Vec<String>,
        delays_ms: HashMap<String, u64>,
        calls: AtomicUsize,
        queries: Mutex<Vec<NewsSearchParams>>,
    }

    impl MockSource {
        fn configured() -> Self {
            Self {
                configured: true,
                ..Self::default()
            }
        }

        fn respond(mut self, query: &str, articles: Vec<Article>) -> Self {
            self.responses.insert(query.to_string(), articles);
            self
        }

        fn fail(mut self, query: &str) -> Self {
            self.failing.push(query.to_string());
            self
        }

        fn delay(mut self, query: &str, ms: u64) -> Self {
            self.delays_ms.insert(query.to_string(), ms);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ArticleSource for MockSource {
        fn ensure_configured(&self) -> Result<(), NewsError> {
            if self.configured {
                Ok(())
            } else {
                Err(NewsError::MissingCredentials("test".to_string()))
            }
        }

        async fn search(&self, params: &NewsSearchParams) -> Result<Vec<Article>, NewsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(params.clone());

            if let Some(ms) = self.delays_ms.get(&params.query) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.failing.contains(&params.query) {
                return Err(NewsError::ApiError {
                    status: 500,
                    message: "upstream down".to_string(),
                });
            }
            Ok(self
                .responses
                .get(&params.query)
                .cloned()
                .unwrap_or_default())
        }
    }

    struct FailingExtractor;

    impl NounExtractor for FailingExtractor {
        fn nouns(&self, _text: &str) -> Result<Vec<String>, TokenizerError> {
            Err(TokenizerError::Analyzer("dictionary unavailable".to_string()))
        }
    }

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn article(title: &str, description: &str) -> Article {
        Article::new(title, description, format!("https://news.example.kr/{}", title))
    }

    fn engine(source: Arc<MockSource>) -> ExpansionEngine {
        ExpansionEngine::new(source, Arc::new(HangulNounExtractor::new()))
    }

    fn depth(rounds: usize) -> Depth {
        Depth::new(rounds).unwrap()
    }

    #[tokio::test]
    async fn test_single_round_ranks_nouns() {
        let source = Arc::new(
            MockSource::configured().respond("지진", vec![article("지진 발생", "오늘 지진 경보")]),
        );
        let result = engine(source.clone())
            .expand(words(&["지진"]), depth(1))
            .await
            .unwrap();

        assert_eq!(result.history.len(), 2);
        assert_eq!(result.history.seed().unwrap(), words(&["지진"]).as_slice());
        assert_eq!(
            result.history.get(1).unwrap(),
            words(&["지진", "발생", "오늘", "경보"]).as_slice()
        );
        assert_eq!(result.final_keywords[0], "지진");
        assert_eq!(result.termination, TerminationReason::DepthExhausted);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_search_parameters_are_fixed() {
        let source = Arc::new(MockSource::configured());
        engine(source.clone())
            .expand(words(&["태풍"]), depth(1))
            .await
            .unwrap();

        let queries = source.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].query, "태풍");
        assert_eq!(queries[0].display, 10);
        assert_eq!(queries[0].start, 1);
        assert_eq!(queries[0].sort, SortOrder::Date);
    }

    #[tokio::test]
    async fn test_empty_round_terminates_early() {
        let source = Arc::new(MockSource::configured());
        let result = engine(source.clone())
            .expand(words(&["A", "B"]), depth(2))
            .await
            .unwrap();

        assert_eq!(result.history.len(), 1);
        assert!(result.history.get(1).is_none());
        assert_eq!(result.final_keywords, words(&["A", "B"]));
        assert_eq!(
            result.termination,
            TerminationReason::EmptyAggregate { round: 1 }
        );
        // Round 2 never ran
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_blank_articles_count_as_empty_round() {
        let source = Arc::new(
            MockSource::configured()
                .respond("A", vec![article("", "")])
                .respond("B", vec![Article::new(" ", "\t", "https://news.example.kr/b")]),
        );
        let result = engine(source.clone())
            .expand(words(&["A", "B"]), depth(3))
            .await
            .unwrap();

        assert_eq!(result.history.len(), 1);
        assert_eq!(result.final_keywords, words(&["A", "B"]));
        assert_eq!(
            result.termination,
            TerminationReason::EmptyAggregate { round: 1 }
        );
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_repeating_keyword_sets_do_not_halt() {
        let source = Arc::new(
            MockSource::configured().respond("홍수", vec![article("홍수 피해", "하천 범람 피해")]),
        );
        let result = engine(source)
            .expand(words(&["홍수"]), depth(3))
            .await
            .unwrap();

        // Round 1 derives [피해, 홍수, 하천, 범람]; only "홍수" has articles after
        // that, so every later round derives the same set.
        assert_eq!(result.history.len(), 4);
        assert_eq!(
            result.history.get(1).unwrap(),
            words(&["피해", "홍수", "하천", "범람"]).as_slice()
        );
        assert_eq!(result.history.get(1), result.history.get(3));
        assert_eq!(result.termination, TerminationReason::DepthExhausted);
    }

    #[tokio::test]
    async fn test_terminates_when_derived_keywords_find_nothing() {
        let source = Arc::new(
            MockSource::configured().respond("폭염", vec![article("열대야 지속", "온열질환 주의")]),
        );
        let result = engine(source.clone())
            .expand(words(&["폭염"]), depth(3))
            .await
            .unwrap();

        assert_eq!(result.history.len(), 2);
        assert_eq!(
            result.final_keywords,
            result.history.get(1).unwrap().to_vec()
        );
        assert_eq!(
            result.termination,
            TerminationReason::EmptyAggregate { round: 2 }
        );
        // 1 call in round 1, one per derived keyword in round 2
        assert_eq!(source.calls(), 1 + result.final_keywords.len());
    }

    #[tokio::test]
    async fn test_keyword_failure_is_not_fatal() {
        let source = Arc::new(
            MockSource::configured()
                .fail("지진")
                .respond("해일", vec![article("해일 경보", "해안 대피")]),
        );
        let result = engine(source.clone())
            .expand(words(&["지진", "해일"]), depth(1))
            .await
            .unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(
            result.history.get(1).unwrap(),
            words(&["해일", "경보", "해안", "대피"]).as_slice()
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_fetching() {
        let source = Arc::new(MockSource::default().respond("지진", vec![article("지진", "")]));
        let err = engine(source.clone())
            .expand(words(&["지진"]), depth(2))
            .await
            .unwrap_err();

        assert!(matches!(err, ExpansionError::Config(_)));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_tokenizer_failure_keeps_history() {
        let source = Arc::new(
            MockSource::configured().respond("지진", vec![article("지진 발생", "경보")]),
        );
        let engine = ExpansionEngine::new(source, Arc::new(FailingExtractor));
        let result = engine.expand(words(&["지진"]), depth(2)).await.unwrap();

        assert_eq!(result.history.len(), 1);
        assert_eq!(result.final_keywords, words(&["지진"]));
        assert_eq!(
            result.termination,
            TerminationReason::TokenizerFailed { round: 1 }
        );
    }

    #[tokio::test]
    async fn test_no_qualifying_nouns_terminates() {
        let source = Arc::new(MockSource::configured().respond("비", vec![article("비", "눈 옴")]));
        let result = engine(source)
            .expand(words(&["비"]), depth(2))
            .await
            .unwrap();

        assert_eq!(result.history.len(), 1);
        assert_eq!(result.termination, TerminationReason::NoKeywords { round: 1 });
    }

    #[tokio::test]
    async fn test_history_bounded_by_depth() {
        let source = Arc::new(
            MockSource::configured()
                .respond("지진", vec![article("지진 경보", "지진 대피")])
                .respond("경보", vec![article("경보 발령", "지진 경보")])
                .respond("대피", vec![article("대피소 안내", "지진 대피")]),
        );
        for rounds in 1..=5 {
            let result = engine(source.clone())
                .expand(words(&["지진"]), depth(rounds))
                .await
                .unwrap();
            assert!(result.history.len() <= rounds + 1);
            assert_eq!(result.history.seed().unwrap(), words(&["지진"]).as_slice());
        }
    }

    #[tokio::test]
    async fn test_concurrent_fetch_matches_sequential() {
        let build = || {
            Arc::new(
                MockSource::configured()
                    .respond("지진", vec![article("지진 여진", "여진 계속")])
                    .respond("태풍", vec![article("태풍 북상", "강풍 주의")])
                    .respond("호우", vec![article("호우 특보", "침수 우려")])
                    // First keyword finishes last
                    .delay("지진", 40)
                    .delay("태풍", 20),
            )
        };
        let seed = words(&["지진", "태풍", "호우"]);

        let sequential = engine(build())
            .expand(seed.clone(), depth(1))
            .await
            .unwrap();

        let config = ExpansionConfig {
            concurrent_fetch: true,
            ..ExpansionConfig::default()
        };
        let concurrent = ExpansionEngine::with_config(
            build(),
            Arc::new(HangulNounExtractor::new()),
            config,
        )
        .expand(seed, depth(1))
        .await
        .unwrap();

        assert_eq!(sequential, concurrent);
        assert_eq!(concurrent.final_keywords[0], "여진");
    }

    #[test]
    fn test_aggregate_independent_of_arrival_order() {
        let batches = vec![
            KeywordBatch {
                index: 0,
                keyword: "지진".to_string(),
                articles: vec![article("지진 발생", "오늘 지진 경보")],
            },
            KeywordBatch {
                index: 1,
                keyword: "태풍".to_string(),
                articles: vec![article("태풍 북상", "강풍"), article("태풍 소멸", "")],
            },
            KeywordBatch {
                index: 2,
                keyword: "호우".to_string(),
                articles: Vec::new(),
            },
        ];
        let mut arrived = batches.clone();
        arrived.reverse();
        arrived.swap(0, 1);

        let ordered = aggregate_batches(batches);
        assert_eq!(ordered, aggregate_batches(arrived));
        assert_eq!(ordered, "지진 발생 오늘 지진 경보 태풍 북상 강풍 태풍 소멸  ");
    }
}
