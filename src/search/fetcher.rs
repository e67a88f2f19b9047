use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::config::CONFIG;
use crate::data_models::{
    ContentType, Difficulty, Language, QualityIndicators, ResultMetadata, SearchResult,
};

use super::TopicResources;

pub(crate) const CSE_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Hosts allowed to appear in ranked output. Fallback results bypass this
/// list by construction.
pub const TRUSTED_DOMAINS: [&str; 20] = [
    "developer.mozilla.org",
    "w3schools.com",
    "github.com",
    "stackoverflow.com",
    "medium.com",
    "dev.to",
    "freecodecamp.org",
    "coursera.org",
    "udemy.com",
    "edx.org",
    "dicoding.com",
    "codepolitan.com",
    "docs.microsoft.com",
    "tutorialspoint.com",
    "geeksforgeeks.org",
    "guru99.com",
    "javatpoint.com",
    "programiz.com",
    "petanikode.com",
    "belajarpython.com",
];

/// One raw item as returned by the search provider, before any scoring.
#[derive(Debug, Clone)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Boundary seam to the external search API. Production injects
/// [`GoogleSearchProvider`]; tests inject stubs.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<RawItem>>;
}

pub struct GoogleSearchProvider {
    client: reqwest::Client,
    api_key: String,
    cse_id: String,
}

impl GoogleSearchProvider {
    pub fn new() -> Self {
        Self::with_credentials(CONFIG.google_api_key.clone(), CONFIG.google_cse_id.clone())
    }

    pub fn with_credentials(api_key: String, cse_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            cse_id,
        }
    }
}

impl Default for GoogleSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<RawItem>> {
        let response = self
            .client
            .get(CSE_ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query),
            ])
            .send()
            .await
            .context("custom search request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("custom search returned status {}", response.status());
        }

        let body: CseResponse = response
            .json()
            .await
            .context("failed to parse custom search response")?;

        // Items without a link are useless downstream; missing title/snippet
        // are tolerated as empty.
        Ok(body
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| {
                let link = item.link?;
                Some(RawItem {
                    title: item.title.unwrap_or_default(),
                    link,
                    snippet: item.snippet.unwrap_or_default(),
                })
            })
            .collect())
    }
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct CseResponse {
    pub items: Option<Vec<CseItem>>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct CseItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
    #[serde(rename = "displayLink")]
    pub display_link: Option<String>,
    pub pagemap: Option<CsePagemap>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct CsePagemap {
    pub metatags: Option<Vec<HashMap<String, serde_json::Value>>>,
    pub cse_image: Option<Vec<CseImage>>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct CseImage {
    pub src: Option<String>,
}

fn curated_result(
    title: &str,
    url: &str,
    description: String,
    content_type: ContentType,
    difficulty: Difficulty,
    readability_score: f64,
    quality_indicators: QualityIndicators,
) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        url: url.to_string(),
        description,
        content_type,
        difficulty,
        relevance_score: 0.0,
        metadata: ResultMetadata {
            language: Language::En,
            readability_score,
            quality_indicators,
            timestamp: Utc::now(),
        },
    }
}

const ALL_INDICATORS: QualityIndicators = QualityIndicators {
    has_code: true,
    has_examples: true,
    is_interactive: true,
    is_comprehensive: true,
};

/// Curated resources for common programming topics, used when the live
/// provider yields nothing.
pub fn curated_topic_resources() -> Vec<TopicResources> {
    vec![
        TopicResources {
            topic: "web development".to_string(),
            resources: vec![
                curated_result(
                    "MDN Web Docs - Learn web development",
                    "https://developer.mozilla.org/en-US/docs/Learn",
                    "Tutorial lengkap pengembangan web dari Mozilla".to_string(),
                    ContentType::Documentation,
                    Difficulty::Beginner,
                    2.0,
                    ALL_INDICATORS,
                ),
                curated_result(
                    "W3Schools - Web Tutorials",
                    "https://www.w3schools.com",
                    "Tutorial interaktif untuk HTML, CSS, JavaScript, dan lainnya".to_string(),
                    ContentType::Tutorial,
                    Difficulty::Beginner,
                    1.5,
                    ALL_INDICATORS,
                ),
            ],
        },
        TopicResources {
            topic: "javascript".to_string(),
            resources: vec![curated_result(
                "Modern JavaScript Tutorial",
                "https://javascript.info",
                "Panduan JavaScript modern dengan penjelasan mendalam".to_string(),
                ContentType::Tutorial,
                Difficulty::Intermediate,
                2.5,
                ALL_INDICATORS,
            )],
        },
        TopicResources {
            topic: "python".to_string(),
            resources: vec![curated_result(
                "Python Documentation",
                "https://docs.python.org/3/",
                "Dokumentasi resmi Python dengan tutorial lengkap".to_string(),
                ContentType::Documentation,
                Difficulty::Intermediate,
                3.0,
                QualityIndicators {
                    has_code: true,
                    has_examples: true,
                    is_interactive: false,
                    is_comprehensive: true,
                },
            )],
        },
    ]
}

/// Generic course-directory entries returned when no curated topic matches.
pub fn directory_fallbacks(query: &str) -> Vec<SearchResult> {
    let directory_indicators = QualityIndicators {
        has_code: false,
        has_examples: true,
        is_interactive: true,
        is_comprehensive: true,
    };
    vec![
        curated_result(
            "Coursera - Online Learning",
            "https://www.coursera.org/search",
            format!("Temukan kursus online terbaik tentang {query}"),
            ContentType::Course,
            Difficulty::Beginner,
            2.0,
            directory_indicators,
        ),
        curated_result(
            "edX - Free Online Courses",
            "https://www.edx.org",
            format!("Pelajari {query} dari universitas terbaik dunia"),
            ContentType::Course,
            Difficulty::Intermediate,
            2.0,
            directory_indicators,
        ),
    ]
}
