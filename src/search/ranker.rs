use std::cmp::Ordering;

use crate::data_models::{Difficulty, Language, SearchResult};

/// Composite quality-score weights. Fixed configuration; the constants carry
/// no derivation and re-deriving them would change observable ranking order.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub beginner_bonus: f64,
    pub intermediate_bonus: f64,
    pub interactive_bonus: f64,
    pub examples_bonus: f64,
    pub comprehensive_bonus: f64,
    pub language_match_bonus: f64,
    pub readability_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            beginner_bonus: 0.3,
            intermediate_bonus: 0.2,
            interactive_bonus: 0.5,
            examples_bonus: 0.4,
            comprehensive_bonus: 0.3,
            language_match_bonus: 0.2,
            readability_penalty: 0.1,
        }
    }
}

/// Scalar ranking heuristic: base relevance plus difficulty, interactivity,
/// examples, comprehensiveness and language bonuses, minus a readability
/// penalty.
pub fn quality_score(result: &SearchResult, weights: &ScoreWeights) -> f64 {
    let mut score = result.relevance_score;

    score += match result.difficulty {
        Difficulty::Beginner => weights.beginner_bonus,
        Difficulty::Intermediate => weights.intermediate_bonus,
        Difficulty::Advanced => 0.0,
    };

    let indicators = &result.metadata.quality_indicators;
    if indicators.is_interactive {
        score += weights.interactive_bonus;
    }
    if indicators.has_examples {
        score += weights.examples_bonus;
    }
    if indicators.is_comprehensive {
        score += weights.comprehensive_bonus;
    }

    if result.metadata.language == Language::Id {
        score += weights.language_match_bonus;
    }

    score - result.metadata.readability_score * weights.readability_penalty
}

/// Sorts descending by quality score and truncates. The sort is stable, so
/// ties keep encounter order and re-ranking a ranked list is a no-op.
pub fn rank(
    mut results: Vec<SearchResult>,
    weights: &ScoreWeights,
    max_results: usize,
) -> Vec<SearchResult> {
    results.sort_by(|a, b| {
        quality_score(b, weights)
            .partial_cmp(&quality_score(a, weights))
            .unwrap_or(Ordering::Equal)
    });
    results.truncate(max_results);
    results
}
