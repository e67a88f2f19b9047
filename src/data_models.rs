use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Documentation,
    Tutorial,
    Course,
    Article,
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Id,
    En,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualityIndicators {
    pub has_code: bool,
    pub has_examples: bool,
    pub is_interactive: bool,
    pub is_comprehensive: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResultMetadata {
    pub language: Language,
    pub readability_score: f64,
    pub quality_indicators: QualityIndicators,
    pub timestamp: DateTime<Utc>,
}

impl Default for ResultMetadata {
    fn default() -> Self {
        ResultMetadata {
            language: Language::En,
            // Results that never reach the enricher score as average readers.
            readability_score: 3.0,
            quality_indicators: QualityIndicators::default(),
            timestamp: Utc::now(),
        }
    }
}

/// One candidate resource flowing through the search pipeline. Created per
/// raw provider item, mutated in place by the enrichment stages, and handed
/// to the summarizer. Never persisted on its own; the chat turn that
/// references it is.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub relevance_score: f64,
    pub metadata: ResultMetadata,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub published_at: String,
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChatResponseDoc {
    pub content: String,
    #[serde(default)]
    pub references: Vec<SearchResult>,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatTurnMeta {
    pub results_count: usize,
    pub sources: Vec<String>,
    pub query_time: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: String,
    pub session_id: String,
    pub query: String,
    pub response: ChatResponseDoc,
    pub metadata: ChatTurnMeta,
    pub created_at: bson::DateTime,
}

impl ChatDoc {
    pub fn new(
        user_id: String,
        session_id: String,
        query: String,
        response: ChatResponseDoc,
    ) -> ChatDoc {
        let sources = response
            .articles
            .iter()
            .map(|a| a.source.clone())
            .filter(|s| !s.is_empty())
            .collect();
        let results_count = response.references.len() + response.articles.len();
        ChatDoc {
            id: ObjectId::new(),
            user_id,
            session_id,
            query,
            response,
            metadata: ChatTurnMeta {
                results_count,
                sources,
                query_time: Utc::now().to_rfc3339(),
            },
            created_at: bson::DateTime::now(),
        }
    }
}
