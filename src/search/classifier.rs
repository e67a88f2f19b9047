use once_cell::sync::Lazy;
use regex::Regex;

use crate::data_models::{ContentType, Difficulty, ResultMetadata, SearchResult};

use super::fetcher::RawItem;

static COURSE_PLATFORMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"udemy|coursera|edx|dicoding").unwrap());

static BLOG_PLATFORMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"medium\.com|dev\.to|hashnode\.com").unwrap());

static EXPLICIT_ADVANCED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(advanced|expert|lanjut|ahli|kompleks|advanced-level)\b").unwrap());

static EXPLICIT_INTERMEDIATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(intermediate|menengah|medium|moderate|intermediate-level)\b").unwrap()
});

static EXPLICIT_BEGINNER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(beginner|pemula|basic|dasar|start|fundamental|beginner-level)\b").unwrap()
});

static COMPLEXITY_ADVANCED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(optimization|architecture|scale|security|advanced|expert|complex)\b").unwrap()
});

static COMPLEXITY_INTERMEDIATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(implementation|integration|practice|develop|build|create)\b").unwrap()
});

/// Derives the content type from title and URL markers. Rules run in a fixed
/// priority order and the first match wins; swapping the order changes
/// classification outcomes.
pub fn categorize_content(title: &str, url: &str) -> ContentType {
    let url = url.to_lowercase();
    let title = title.to_lowercase();

    if url.contains("docs.")
        || url.contains("/docs/")
        || url.contains("documentation")
        || title.contains("documentation")
        || title.contains("reference")
        || title.contains("docs")
    {
        return ContentType::Documentation;
    }

    if url.contains("tutorial")
        || url.contains("guide")
        || url.contains("learn")
        || title.contains("tutorial")
        || title.contains("guide")
        || title.contains("how to")
    {
        return ContentType::Tutorial;
    }

    if url.contains("course")
        || url.contains("class")
        || url.contains("bootcamp")
        || COURSE_PLATFORMS.is_match(&url)
    {
        return ContentType::Course;
    }

    if url.contains("blog") || url.contains("article") || BLOG_PLATFORMS.is_match(&url) {
        return ContentType::Article;
    }

    ContentType::Other
}

/// Assesses difficulty from explicit vocabulary first (advanced beats
/// intermediate beats beginner), then falls back to complexity keywords in
/// the same priority order. Defaults to beginner.
pub fn assess_difficulty(title: &str, description: &str) -> Difficulty {
    let text = format!("{title} {description}").to_lowercase();

    if EXPLICIT_ADVANCED.is_match(&text) {
        return Difficulty::Advanced;
    }
    if EXPLICIT_INTERMEDIATE.is_match(&text) {
        return Difficulty::Intermediate;
    }
    if EXPLICIT_BEGINNER.is_match(&text) {
        return Difficulty::Beginner;
    }

    if COMPLEXITY_ADVANCED.is_match(&text) {
        return Difficulty::Advanced;
    }
    if COMPLEXITY_INTERMEDIATE.is_match(&text) {
        return Difficulty::Intermediate;
    }
    Difficulty::Beginner
}

/// Builds a [`SearchResult`] from one raw provider item: classification
/// happens here, enrichment fills the rest of the metadata later.
pub fn classify_item(item: RawItem) -> SearchResult {
    let content_type = categorize_content(&item.title, &item.link);
    let difficulty = assess_difficulty(&item.title, &item.snippet);
    SearchResult {
        title: item.title,
        url: item.link,
        description: item.snippet,
        content_type,
        difficulty,
        relevance_score: 0.0,
        metadata: ResultMetadata::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod categorize {
        use super::*;

        #[test]
        fn test_documentation_markers() {
            assert_eq!(
                categorize_content("Python Reference", "https://docs.python.org/3/"),
                ContentType::Documentation
            );
            assert_eq!(
                categorize_content("API documentation", "https://example.dev/api"),
                ContentType::Documentation
            );
        }

        #[test]
        fn test_documentation_beats_tutorial() {
            // Both bands match; documentation is checked first.
            assert_eq!(
                categorize_content("Tutorial", "https://site.com/docs/tutorial"),
                ContentType::Documentation
            );
        }

        #[test]
        fn test_tutorial_markers() {
            assert_eq!(
                categorize_content("How to center a div", "https://site.dev/css"),
                ContentType::Tutorial
            );
            assert_eq!(
                categorize_content("CSS Grid", "https://site.dev/learn/css"),
                ContentType::Tutorial
            );
        }

        #[test]
        fn test_course_platforms() {
            assert_eq!(
                categorize_content("Rust for Rustaceans", "https://www.udemy.com/rust"),
                ContentType::Course
            );
            assert_eq!(
                categorize_content("Machine Bootcamp", "https://site.dev/bootcamp/ml"),
                ContentType::Course
            );
        }

        #[test]
        fn test_article_platforms() {
            assert_eq!(
                categorize_content("Notes on lifetimes", "https://dev.to/someone/lifetimes"),
                ContentType::Article
            );
            assert_eq!(
                categorize_content("My year in Rust", "https://site.dev/blog/2025"),
                ContentType::Article
            );
        }

        #[test]
        fn test_no_markers_is_other() {
            assert_eq!(
                categorize_content("Hello", "https://example.com/hello"),
                ContentType::Other
            );
        }
    }

    mod difficulty {
        use super::*;

        #[test]
        fn test_explicit_vocabulary_priority() {
            // Advanced outranks the other explicit bands.
            assert_eq!(
                assess_difficulty("Advanced beginner guide", ""),
                Difficulty::Advanced
            );
            assert_eq!(
                assess_difficulty("Belajar tingkat menengah", ""),
                Difficulty::Intermediate
            );
            assert_eq!(
                assess_difficulty("Dasar pemrograman untuk pemula", ""),
                Difficulty::Beginner
            );
        }

        #[test]
        fn test_explicit_advanced_wins_over_complexity_fallback() {
            // "advanced" in the title decides before the complexity keywords
            // ("introduction", "simple") are ever consulted.
            assert_eq!(
                assess_difficulty("Advanced topics", "A simple introduction"),
                Difficulty::Advanced
            );
        }

        #[test]
        fn test_complexity_fallback_bands() {
            assert_eq!(
                assess_difficulty("Query optimization deep dive", ""),
                Difficulty::Advanced
            );
            assert_eq!(
                assess_difficulty("Build a REST service", ""),
                Difficulty::Intermediate
            );
        }

        #[test]
        fn test_defaults_to_beginner() {
            assert_eq!(assess_difficulty("Hello world", ""), Difficulty::Beginner);
        }

        #[test]
        fn test_matching_is_word_bounded() {
            // "classy" must not trigger the intermediate "class" band, and
            // "created" must not trigger "create".
            assert_eq!(
                assess_difficulty("A classy created thing", ""),
                Difficulty::Beginner
            );
        }
    }

    #[test]
    fn test_classify_item_fills_both_axes() {
        let item = RawItem {
            title: "Rust Tutorial for Beginners".to_string(),
            link: "https://www.programiz.com/rust".to_string(),
            snippet: "Learn Rust step by step".to_string(),
        };
        let result = classify_item(item);
        assert_eq!(result.content_type, ContentType::Tutorial);
        assert_eq!(result.difficulty, Difficulty::Beginner);
        assert_eq!(result.relevance_score, 0.0);
    }
}
