use anyhow::{Context, Result};
use chrono::Utc;

use crate::config::CONFIG;
use crate::data_models::NewsArticle;
use crate::search::fetcher::{CSE_ENDPOINT, CseItem, CseResponse};

/// Fetches recent news through the same search API as the learning pipeline,
/// restricted to the last 24 hours and sorted by date. Unlike the learning
/// search there is no curated fallback here; failures surface to the caller.
pub struct NewsService {
    client: reqwest::Client,
    api_key: String,
    cse_id: String,
}

const NEWS_RESULT_COUNT: &str = "5";

impl NewsService {
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

    pub async fn fetch_topic_news(&self, topic: &str) -> Result<Vec<NewsArticle>> {
        let query = format!("{topic} berita");
        let response = self
            .client
            .get(CSE_ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query.as_str()),
                ("num", NEWS_RESULT_COUNT),
                ("dateRestrict", "d1"),
                ("sort", "date"),
            ])
            .send()
            .await
            .context("news search request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("news search returned status {}", response.status());
        }

        let body: CseResponse = response
            .json()
            .await
            .context("failed to parse news search response")?;

        Ok(body
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(article_from_item)
            .collect())
    }
}

impl Default for NewsService {
    fn default() -> Self {
        Self::new()
    }
}

fn article_from_item(item: CseItem) -> Option<NewsArticle> {
    let link = item.link?;

    let published_at = item
        .pagemap
        .as_ref()
        .and_then(|p| p.metatags.as_ref())
        .and_then(|tags| tags.first())
        .and_then(|tags| tags.get("article:published_time"))
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let image_url = item
        .pagemap
        .as_ref()
        .and_then(|p| p.cse_image.as_ref())
        .and_then(|images| images.first())
        .and_then(|image| image.src.clone());

    Some(NewsArticle {
        title: item.title.unwrap_or_default(),
        description: item.snippet.unwrap_or_default(),
        url: link,
        source: item.display_link.unwrap_or_default(),
        published_at,
        image_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fetcher::{CseImage, CsePagemap};
    use std::collections::HashMap;

    #[test]
    fn test_article_mapping_reads_pagemap() {
        let mut metatags = HashMap::new();
        metatags.insert(
            "article:published_time".to_string(),
            serde_json::json!("2025-06-01T08:00:00Z"),
        );
        let item = CseItem {
            title: Some("Berita teknologi hari ini".to_string()),
            link: Some("https://news.example.com/artikel".to_string()),
            snippet: Some("Ringkasan singkat".to_string()),
            display_link: Some("news.example.com".to_string()),
            pagemap: Some(CsePagemap {
                metatags: Some(vec![metatags]),
                cse_image: Some(vec![CseImage {
                    src: Some("https://news.example.com/img.jpg".to_string()),
                }]),
            }),
        };

        let article = article_from_item(item).unwrap();
        assert_eq!(article.source, "news.example.com");
        assert_eq!(article.published_at, "2025-06-01T08:00:00Z");
        assert_eq!(
            article.image_url.as_deref(),
            Some("https://news.example.com/img.jpg")
        );
    }

    #[test]
    fn test_article_mapping_tolerates_missing_fields() {
        let item = CseItem {
            title: None,
            link: Some("https://news.example.com/artikel".to_string()),
            snippet: None,
            display_link: None,
            pagemap: None,
        };
        let article = article_from_item(item).unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.description, "");
        assert!(article.image_url.is_none());
        // Missing publish time falls back to a freshly stamped time.
        assert!(!article.published_at.is_empty());
    }

    #[test]
    fn test_items_without_link_are_dropped() {
        let item = CseItem {
            title: Some("tanpa tautan".to_string()),
            link: None,
            snippet: None,
            display_link: None,
            pagemap: None,
        };
        assert!(article_from_item(item).is_none());
    }
}
