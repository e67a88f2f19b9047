use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::Semaphore;

use crate::data_models::{Language, QualityIndicators, SearchResult};

/// Common Indonesian words counted for language detection.
static INDONESIAN_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(yang|dan|atau|dengan|untuk|di|ke|dari|dalam|ini|itu|juga|sudah|saya|anda|bisa|ada|akan|saat|serta|para|pada|sebuah|tersebut)\b",
    )
    .unwrap()
});

/// Match count must exceed this for a text to register as Indonesian. Fixed
/// constant, not proportional to text length, so short texts stay `en`.
const INDONESIAN_THRESHOLD: usize = 5;

static SENTENCE_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

static CODE_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(code|coding|program|script|function|class|method)\b").unwrap()
});

static EXAMPLE_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(example|sample|demo|tutorial|guide)\b").unwrap());

static INTERACTIVE_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(interactive|hands-on|practice|exercise|quiz)\b").unwrap());

/// Descriptions longer than this (in characters) count as comprehensive.
const COMPREHENSIVE_MIN_CHARS: usize = 200;

pub fn detect_language(text: &str) -> Language {
    if INDONESIAN_WORDS.find_iter(text).count() > INDONESIAN_THRESHOLD {
        Language::Id
    } else {
        Language::En
    }
}

/// Average words per sentence divided by 20, clamped to [1, 5]. Lower means
/// easier reading. Splitting on `[.!?]+` yields at least one segment, so a
/// text without delimiters counts as a single sentence.
pub fn readability_score(text: &str) -> f64 {
    let words = text.split_whitespace().count() as f64;
    let sentences = SENTENCE_DELIMITERS.split(text).count() as f64;
    ((words / sentences) / 20.0).clamp(1.0, 5.0)
}

pub fn quality_indicators(description: &str) -> QualityIndicators {
    QualityIndicators {
        has_code: CODE_WORDS.is_match(description),
        has_examples: EXAMPLE_WORDS.is_match(description),
        is_interactive: INTERACTIVE_WORDS.is_match(description),
        is_comprehensive: description.chars().count() > COMPREHENSIVE_MIN_CHARS,
    }
}

/// Fills in the heuristic metadata for one result. Pure per-record work.
pub fn enrich(result: &mut SearchResult) {
    let combined = format!("{} {}", result.title, result.description);
    result.metadata.language = detect_language(&combined);
    result.metadata.readability_score = readability_score(&result.description);
    result.metadata.quality_indicators = quality_indicators(&result.description);
    result.metadata.timestamp = Utc::now();
}

/// Enriches all results concurrently under a semaphore. Each task writes
/// only its own record; encounter order is preserved in the returned list.
pub async fn enrich_all(results: Vec<SearchResult>, max_concurrent: usize) -> Vec<SearchResult> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent));
    let handles: Vec<_> = results
        .into_iter()
        .map(|mut result| {
            let semaphore = semaphore.clone();
            tokio::spawn(async move {
                let _permit = semaphore.acquire().await.unwrap();
                enrich(&mut result);
                result
            })
        })
        .collect();

    let mut enriched = Vec::with_capacity(handles.len());
    for handle in handles {
        enriched.push(handle.await.unwrap());
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_models::{ContentType, Difficulty, ResultMetadata};

    #[test]
    fn test_detect_language_requires_more_than_threshold() {
        // Exactly five Indonesian words is still English.
        assert_eq!(detect_language("yang dan atau dengan untuk"), Language::En);
        // Six crosses the threshold.
        assert_eq!(
            detect_language("yang dan atau dengan untuk dari"),
            Language::Id
        );
    }

    #[test]
    fn test_detect_language_short_text_stays_english() {
        assert_eq!(detect_language("belajar dan praktek"), Language::En);
        assert_eq!(detect_language(""), Language::En);
    }

    #[test]
    fn test_detect_language_is_word_bounded() {
        // "diagram" contains "di" but must not count as a match.
        assert_eq!(
            detect_language("diagram keyboard adalah initial database item"),
            Language::En
        );
    }

    #[test]
    fn test_readability_clamped_low() {
        // One word, one sentence: 1/20 clamps up to 1.0.
        assert_eq!(readability_score("Hello."), 1.0);
        assert_eq!(readability_score(""), 1.0);
    }

    #[test]
    fn test_readability_clamped_high() {
        let long_sentence = "word ".repeat(300);
        assert_eq!(readability_score(&long_sentence), 5.0);
    }

    #[test]
    fn test_readability_no_delimiter_is_one_sentence() {
        // 40 words, no delimiter: 40 / 1 / 20 = 2.0
        let text = "word ".repeat(40);
        assert_eq!(readability_score(text.trim()), 2.0);
    }

    #[test]
    fn test_quality_indicators_sample_description() {
        let description = "This is a simple tutorial with code examples, hands-on exercises.";
        let indicators = quality_indicators(description);
        assert!(indicators.has_code);
        assert!(indicators.has_examples);
        assert!(indicators.is_interactive);
        assert!(!indicators.is_comprehensive); // under 200 characters
    }

    #[test]
    fn test_comprehensive_requires_strictly_more_than_200() {
        let exactly = "a".repeat(200);
        assert!(!quality_indicators(&exactly).is_comprehensive);
        let over = "a".repeat(201);
        assert!(quality_indicators(&over).is_comprehensive);
    }

    fn bare_result(title: &str, description: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            url: "https://example.com".to_string(),
            description: description.to_string(),
            content_type: ContentType::Other,
            difficulty: Difficulty::Beginner,
            relevance_score: 0.0,
            metadata: ResultMetadata::default(),
        }
    }

    #[tokio::test]
    async fn test_enrich_all_preserves_order_and_fills_metadata() {
        let results = vec![
            bare_result("First", "An interactive practice quiz with code."),
            bare_result("Second", "Plain text"),
            bare_result("Third", "A guide with sample snippets"),
        ];
        let enriched = enrich_all(results, 2).await;

        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched[0].title, "First");
        assert_eq!(enriched[1].title, "Second");
        assert_eq!(enriched[2].title, "Third");

        assert!(enriched[0].metadata.quality_indicators.is_interactive);
        assert!(!enriched[1].metadata.quality_indicators.has_examples);
        assert!(enriched[2].metadata.quality_indicators.has_examples);
        for result in &enriched {
            assert!(result.metadata.readability_score >= 1.0);
            assert!(result.metadata.readability_score <= 5.0);
        }
    }
}
