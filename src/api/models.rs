use serde::{Deserialize, Serialize};

use crate::data_models::{ChatDoc, NewsArticle, SearchResult};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewsRequest {
    pub topic: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
    pub references: Vec<SearchResult>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub content: String,
    pub articles: Vec<NewsArticle>,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryMeta {
    pub query: String,
    pub results_count: usize,
    pub sources: Vec<String>,
    pub query_time: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub content: String,
    pub references: Vec<SearchResult>,
    pub articles: Vec<NewsArticle>,
    pub metadata: HistoryMeta,
    pub created_at: String,
}

impl From<ChatDoc> for HistoryEntry {
    fn from(doc: ChatDoc) -> Self {
        HistoryEntry {
            id: doc.id.to_hex(),
            content: doc.response.content,
            references: doc.response.references,
            articles: doc.response.articles,
            metadata: HistoryMeta {
                query: doc.query,
                results_count: doc.metadata.results_count,
                sources: doc.metadata.sources,
                query_time: doc.metadata.query_time,
            },
            created_at: doc
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}
