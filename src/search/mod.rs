use crate::data_models::SearchResult;

pub mod classifier;
pub mod dedup;
pub mod enricher;
pub mod fetcher;
pub mod ranker;

pub use fetcher::{GoogleSearchProvider, RawItem, SearchProvider};
pub use ranker::ScoreWeights;

/// Ranked output never exceeds this many results.
pub const MAX_RESULTS: usize = 10;

/// Enrichment fan-out cap. Each task only touches its own record, so this
/// bounds task count, not correctness.
pub const MAX_CONCURRENT_ENRICHMENTS: usize = 8;

const QUERY_EXPANSION: &str = "tutorial OR guide OR documentation OR course";

/// Curated substitute results for one topic keyword.
#[derive(Debug, Clone)]
pub struct TopicResources {
    pub topic: String,
    pub resources: Vec<SearchResult>,
}

/// Immutable configuration tables for one pipeline instance: the trusted
/// domain allow-list, the topic fallback table, and the ranking weights.
/// Injected at construction so tests can substitute their own.
#[derive(Debug, Clone)]
pub struct SearchTables {
    pub trusted_domains: Vec<String>,
    pub topic_resources: Vec<TopicResources>,
    pub weights: ScoreWeights,
    pub max_results: usize,
}

impl Default for SearchTables {
    fn default() -> Self {
        SearchTables {
            trusted_domains: fetcher::TRUSTED_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            topic_resources: fetcher::curated_topic_resources(),
            weights: ScoreWeights::default(),
            max_results: MAX_RESULTS,
        }
    }
}

impl SearchTables {
    /// Case-insensitive substring match against the allow-list. Anything
    /// failing this is dropped before entering the pipeline.
    pub fn is_trusted(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        self.trusted_domains.iter().any(|d| url.contains(d.as_str()))
    }

    /// Static substitute results used when the live provider yields nothing.
    /// Topic lookup is a case-insensitive substring match; no topic match
    /// yields two generic course-directory entries.
    pub fn fallback_results(&self, query: &str) -> Vec<SearchResult> {
        let query_lower = query.to_lowercase();
        for entry in &self.topic_resources {
            if query_lower.contains(entry.topic.as_str()) {
                return entry.resources.clone();
            }
        }
        fetcher::directory_fallbacks(query)
    }
}

/// The result scoring and enrichment pipeline:
/// query -> fetch -> relevance filter -> classify -> enrich -> dedup -> rank.
pub struct SearchPipeline<P> {
    provider: P,
    tables: SearchTables,
}

impl<P: SearchProvider> SearchPipeline<P> {
    pub fn new(provider: P, tables: SearchTables) -> Self {
        Self { provider, tables }
    }

    pub fn tables(&self) -> &SearchTables {
        &self.tables
    }

    /// Runs the full pipeline for one query. Fails soft: a provider error or
    /// an empty item set falls back to the curated tables, so callers never
    /// observe an error state.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let expanded = format!("{query} {QUERY_EXPANSION}");

        let items = match self.provider.search(&expanded).await {
            Ok(items) => items,
            Err(e) => {
                log::warn!("search provider failed for {query:?}, using fallback: {e:#}");
                return self.tables.fallback_results(query);
            }
        };

        if items.is_empty() {
            log::warn!("no provider results for {query:?}, using fallback");
            return self.tables.fallback_results(query);
        }

        let results: Vec<SearchResult> = items
            .into_iter()
            .filter(|item| self.tables.is_trusted(&item.link))
            .map(classifier::classify_item)
            .collect();

        let results = enricher::enrich_all(results, MAX_CONCURRENT_ENRICHMENTS).await;
        let results = dedup::deduplicate(results);
        ranker::rank(results, &self.tables.weights, self.tables.max_results)
    }
}
