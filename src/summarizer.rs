use serde::Deserialize;
use thiserror::Error;

use crate::config::CONFIG;
use crate::data_models::{NewsArticle, SearchResult};

pub const MODEL: &str = "meta-llama/llama-4-maverick:free";

const APP_REFERER: &str = "https://learning-chatbot.com";

const NO_NEWS_MESSAGE: &str = "Tidak ada berita yang ditemukan untuk topik ini.";

const LEARNING_SYSTEM_PROMPT: &str = r#"Kamu adalah asisten pembelajaran yang ramah dan membantu.
Berikan jawaban yang terstruktur dengan format berikut dalam Bahasa Indonesia yang mudah dipahami:

👋 Mulai dengan sapaan yang ramah dan personal.

### Penjelasan Utama
- Jelaskan konsep dengan bahasa yang sederhana
- Sertakan contoh konkret yang relevan
- Bagi menjadi poin-poin yang mudah diikuti
- Gunakan analogi jika membantu pemahaman

### Sumber Belajar
- Link artikel/dokumentasi resmi (format: [Judul](link))
- Video pembelajaran terpilih dengan deskripsi singkat
- Rekomendasi kursus online yang relevan
- Repository kode contoh jika ada

### Langkah Selanjutnya
- Topik-topik lanjutan yang sebaiknya dipelajari
- Project latihan yang disarankan
- Tips implementasi praktis

Gunakan markdown untuk format yang rapi dan jelas. Sertakan emoji yang relevan untuk meningkatkan keterbacaan. Pastikan setiap respons bersifat personal dan memotivasi pembelajaran."#;

const NEWS_SYSTEM_PROMPT: &str = r#"Kamu adalah asisten yang ahli dalam merangkum berita. Berikan rangkuman yang informatif dan objektif menggunakan format markdown berikut:

# [Topik Utama]

## Ringkasan Utama
[Paragraf singkat yang merangkum inti dari semua berita]

## Poin-Poin Penting
[Daftar bullet point dari informasi penting]

## Detail Berita
### [Subtopik 1]
- [Detail poin 1]
- [Detail poin 2]

### [Subtopik 2]
- [Detail poin 1]
- [Detail poin 2]

## Konteks
- [Informasi tambahan yang relevan]
- [Implikasi atau dampak]

> **Catatan**: Rangkuman ini dibuat berdasarkan berita dari berbagai sumber tepercaya."#;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarizer request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("summarizer returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("summarizer response malformed: {0}")]
    Malformed(&'static str),
}

/// Client for the hosted chat-completions endpoint. The core hands it a
/// newline-joined reference block plus the original query; whatever text
/// comes back is passed through without structural validation.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new() -> Self {
        Self::with_endpoint(
            CONFIG.openrouter_base_url.clone(),
            CONFIG.openrouter_api_key.clone(),
        )
    }

    pub fn with_endpoint(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    async fn chat(
        &self,
        title: &str,
        system: &str,
        user: &str,
        temperature: f64,
        max_tokens: u32,
        top_p: Option<f64>,
    ) -> Result<String, SummarizeError> {
        let mut body = serde_json::json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": temperature,
            "max_tokens": max_tokens,
        });
        if let Some(top_p) = top_p {
            body["top_p"] = serde_json::json!(top_p);
        }

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", APP_REFERER)
            .header("X-Title", title)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Status { status, body });
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .ok_or(SummarizeError::Malformed("choices array is empty"))?
            .message
            .content
            .ok_or(SummarizeError::Malformed("message content missing"))?;

        let content = content.trim();
        if content.is_empty() {
            return Err(SummarizeError::Malformed("message content empty"));
        }
        Ok(content.to_string())
    }

    /// Learning-assistant summarization over the ranked reference block.
    /// Errors surface to the API layer, which degrades to an apology message.
    pub async fn generate_learning_response(
        &self,
        query: &str,
        references: &str,
    ) -> Result<String, SummarizeError> {
        let user = format!(
            "Berikut adalah beberapa referensi yang relevan:\n\n{references}\n\nBerdasarkan referensi tersebut, tolong bantu saya belajar tentang: {}",
            query.trim().to_lowercase()
        );
        self.chat("Learning Assistant", LEARNING_SYSTEM_PROMPT, &user, 0.8, 2000, Some(0.95))
            .await
    }

    /// News summarization. Never fails: an LLM error falls back to a locally
    /// rendered digest, and an empty article list short-circuits without a
    /// request.
    pub async fn summarize_news(&self, articles: &[NewsArticle]) -> String {
        if articles.is_empty() {
            return NO_NEWS_MESSAGE.to_string();
        }

        let user = format!(
            "Tolong rangkum berita-berita berikut ini menggunakan format yang ditentukan:\n\n{}",
            news_block(articles)
        );
        match self
            .chat("News AI Chatbot", NEWS_SYSTEM_PROMPT, &user, 0.7, 1000, None)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                log::error!("news summarization failed, rendering local digest: {e:#}");
                fallback_news_summary(articles)
            }
        }
    }
}

impl Default for LlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Deserialize, Default)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Newline-joined `title + description` block handed to the summarizer.
pub fn search_content_block(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}\n{}", r.title, r.description))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn news_block(articles: &[NewsArticle]) -> String {
    articles
        .iter()
        .map(|a| {
            format!(
                "Judul: {}\nDeskripsi: {}\nSumber: {}\n",
                a.title, a.description, a.source
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Locally rendered markdown digest used when the LLM is unavailable.
pub fn fallback_news_summary(articles: &[NewsArticle]) -> String {
    let Some(first) = articles.first() else {
        return "Tidak ada berita yang ditemukan.".to_string();
    };

    let related = articles
        .iter()
        .skip(1)
        .map(|article| {
            let description = if article.description.is_empty() {
                "Tidak ada deskripsi tersedia."
            } else {
                article.description.as_str()
            };
            format!(
                "### {}\n{}\n\n> *Sumber: {}*",
                article.title, description, article.source
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "# Rangkuman Berita Terkini\n\n## Berita Utama\n**{}**\n\n{}\n\n> *Sumber: {}*\n\n## Berita Terkait\n{}\n\n---\n*Rangkuman ini dibuat secara otomatis dari sumber-sumber berita terpercaya.*",
        first.title, first.description, first.source, related
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_models::{ContentType, Difficulty, ResultMetadata};

    fn article(title: &str, description: &str, source: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            description: description.to_string(),
            url: "https://news.example.com/a".to_string(),
            source: source.to_string(),
            published_at: "2025-06-01T08:00:00Z".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_search_content_block_joins_title_and_description() {
        let results = vec![
            SearchResult {
                title: "Satu".to_string(),
                url: "https://example.com/1".to_string(),
                description: "pertama".to_string(),
                content_type: ContentType::Other,
                difficulty: Difficulty::Beginner,
                relevance_score: 0.0,
                metadata: ResultMetadata::default(),
            },
            SearchResult {
                title: "Dua".to_string(),
                url: "https://example.com/2".to_string(),
                description: "kedua".to_string(),
                content_type: ContentType::Other,
                difficulty: Difficulty::Beginner,
                relevance_score: 0.0,
                metadata: ResultMetadata::default(),
            },
        ];
        assert_eq!(
            search_content_block(&results),
            "Satu\npertama\n\nDua\nkedua"
        );
    }

    #[test]
    fn test_fallback_summary_renders_headline_and_related() {
        let articles = vec![
            article("Utama", "Isi utama", "sumber-a"),
            article("Terkait", "", "sumber-b"),
        ];
        let digest = fallback_news_summary(&articles);
        assert!(digest.starts_with("# Rangkuman Berita Terkini"));
        assert!(digest.contains("**Utama**"));
        assert!(digest.contains("> *Sumber: sumber-a*"));
        assert!(digest.contains("### Terkait"));
        assert!(digest.contains("Tidak ada deskripsi tersedia."));
        assert!(digest.contains("> *Sumber: sumber-b*"));
    }

    #[test]
    fn test_fallback_summary_empty_articles() {
        assert_eq!(
            fallback_news_summary(&[]),
            "Tidak ada berita yang ditemukan."
        );
    }
}
