//! Match scoring and best-food selection across ranked search queries.
//!
//! The weights are tuned empirically; changing them silently changes
//! ranking behavior, so they stay as the literal constants below.

use tracing::warn;

use super::client::{FdcError, FoodDataSource};
use super::types::{DataTier, FoodMatch, MatchConfidence};

pub const WORD_COVERAGE_BONUS: f64 = 60.0;
pub const PHRASE_BONUS: f64 = 20.0;
pub const MISSING_WORD_PENALTY: f64 = 25.0;
pub const EXACT_DESCRIPTION_BONUS: f64 = 25.0;
pub const RAW_TOKEN_BONUS: f64 = 5.0;
pub const PROCESSED_PENALTY: f64 = 15.0;
pub const MISSING_CALORIES_PENALTY: f64 = 30.0;

const SIGNIFICANT_WORD_LEN: usize = 3;

/// Description markers for processed or compound-dish foods, penalized
/// unless the query itself asks for them.
const PROCESSED_INDICATORS: &[&str] = &[
    "with",
    "breaded",
    "battered",
    "canned",
    "seasoned",
    "sweetened",
    "flavored",
    "frozen meal",
    "fast food",
    "restaurant",
    "snack",
    "casserole",
    "sandwich",
    "pizza",
    "soup",
    "salad",
    "dish",
];

/// Items where missing caloric data is expected rather than suspicious.
const SEASONING_WATER_CLASS: &[&str] = &[
    "salt",
    "pepper",
    "water",
    "spice",
    "seasoning",
    "herb",
    "extract",
    "vinegar",
    "tea",
    "coffee",
    "baking soda",
    "baking powder",
];

fn words_of(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Weighted match score in [0, 100] for one candidate against the query
/// that found it (`search_query`) and the ingredient it stands in for
/// (`original_query`).
pub fn score_match(food: &FoodMatch, original_query: &str, search_query: &str) -> f64 {
    let desc_lower = food.description.to_lowercase();
    let desc_words = words_of(&desc_lower);
    let query_lower = search_query.to_lowercase();
    let query_words = words_of(&query_lower);
    let original_lower = original_query.to_lowercase();

    let significant: Vec<String> = query_words
        .iter()
        .filter(|w| w.len() >= SIGNIFICANT_WORD_LEN)
        .cloned()
        .collect();

    let mut score = 0.0;

    if !significant.is_empty() {
        let missing = significant
            .iter()
            .filter(|w| !desc_words.contains(w))
            .count();
        if missing == 0 {
            score += WORD_COVERAGE_BONUS;
            if desc_lower.contains(query_lower.trim()) {
                score += PHRASE_BONUS;
            }
        } else {
            score -= MISSING_WORD_PENALTY * missing as f64;
        }
    }

    if desc_lower.trim() == query_lower.trim() {
        score += EXACT_DESCRIPTION_BONUS;
    }

    score += food.data_type.score_bonus();

    let wants_raw = query_words.iter().any(|w| w == "raw");
    let wants_cooked = original_lower.contains("cooked");
    if desc_words.iter().any(|w| w == "raw") && !wants_raw && !wants_cooked {
        score += RAW_TOKEN_BONUS;
    }

    for indicator in PROCESSED_INDICATORS {
        if desc_lower.contains(indicator)
            && !query_lower.contains(indicator)
            && !original_lower.contains(indicator)
        {
            score -= PROCESSED_PENALTY;
        }
    }

    if food.nutrients.calories == 0.0 {
        let exempt = SEASONING_WATER_CLASS
            .iter()
            .any(|cls| original_lower.contains(cls) || desc_lower.contains(cls));
        if !exempt {
            score -= MISSING_CALORIES_PENALTY;
        }
    }

    score.clamp(0.0, 100.0)
}

#[derive(Debug, Clone)]
pub struct FindFoodOptions {
    pub data_types: Vec<DataTier>,
    pub page_size: u32,
}

impl Default for FindFoodOptions {
    fn default() -> Self {
        Self {
            // Quality tiers first; Branded is only consulted by the
            // total-miss retry.
            data_types: vec![DataTier::Foundation, DataTier::SrLegacy, DataTier::Survey],
            page_size: 10,
        }
    }
}

async fn best_across_queries(
    source: &dyn FoodDataSource,
    name: &str,
    queries: &[String],
    data_types: &[DataTier],
    page_size: u32,
) -> Result<Option<FoodMatch>, FdcError> {
    let mut best: Option<(f64, FoodMatch)> = None;
    for query in queries {
        let foods = match source.search(query, data_types, page_size).await {
            Ok(foods) => foods,
            Err(FdcError::MissingApiKey(key)) => return Err(FdcError::MissingApiKey(key)),
            Err(err) => {
                // A single failed lookup is skipped, not fatal.
                warn!(query = %query, error = %err, "nutrition search failed; skipping query");
                continue;
            }
        };
        for food in foods {
            let score = score_match(&food, name, query);
            let better = match &best {
                Some((best_score, _)) => score > *best_score,
                None => true,
            };
            if better {
                best = Some((score, food));
            }
        }
    }
    Ok(best.map(|(score, mut food)| {
        food.match_score = score;
        food.confidence = MatchConfidence::from_score(score);
        food
    }))
}

/// Find the single best reference food for an ingredient across its ranked
/// search queries. On a total miss the search is retried against the
/// lowest-quality data tier before giving up.
pub async fn find_food(
    source: &dyn FoodDataSource,
    name: &str,
    queries: &[String],
    options: &FindFoodOptions,
) -> Result<Option<FoodMatch>, FdcError> {
    if let Some(found) =
        best_across_queries(source, name, queries, &options.data_types, options.page_size).await?
    {
        return Ok(Some(found));
    }
    if !options.data_types.contains(&DataTier::Branded) {
        warn!(name, "no match in quality tiers; retrying against branded data");
        return best_across_queries(
            source,
            name,
            queries,
            &[DataTier::Branded],
            options.page_size,
        )
        .await;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::MacroVector;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn food(description: &str, tier: DataTier, calories: f64) -> FoodMatch {
        FoodMatch {
            id: 1,
            description: description.to_string(),
            data_type: tier,
            nutrients: MacroVector {
                calories,
                ..Default::default()
            },
            portions: Vec::new(),
            match_score: 0.0,
            confidence: MatchConfidence::Low,
        }
    }

    #[test]
    fn test_all_words_present_beats_partial() {
        let full = food("Chicken, breast, raw", DataTier::SrLegacy, 120.0);
        let partial = food("Chicken, thigh, raw", DataTier::SrLegacy, 150.0);
        let full_score = score_match(&full, "chicken breast", "chicken breast");
        let partial_score = score_match(&partial, "chicken breast", "chicken breast");
        assert!(full_score > partial_score);
    }

    #[test]
    fn test_contiguous_phrase_bonus() {
        let phrase = food("chicken breast grilled", DataTier::SrLegacy, 150.0);
        let scattered = food("breast of chicken grilled", DataTier::SrLegacy, 150.0);
        let a = score_match(&phrase, "chicken breast", "chicken breast");
        let b = score_match(&scattered, "chicken breast", "chicken breast");
        assert_eq!(a - b, PHRASE_BONUS);
    }

    #[test]
    fn test_exact_description_bonus() {
        let exact = food("butter", DataTier::SrLegacy, 717.0);
        let close = food("butter salted", DataTier::SrLegacy, 717.0);
        assert!(
            score_match(&exact, "butter", "butter") > score_match(&close, "butter", "butter")
        );
    }

    #[test]
    fn test_data_tier_preference() {
        let foundation = food("spinach leaves", DataTier::Foundation, 23.0);
        let branded = food("spinach leaves", DataTier::Branded, 23.0);
        let diff = score_match(&foundation, "spinach", "spinach")
            - score_match(&branded, "spinach", "spinach");
        assert_eq!(diff, 16.0);
    }

    #[test]
    fn test_raw_bonus_unless_cooked_wanted() {
        let raw = food("carrots baby raw", DataTier::SrLegacy, 41.0);
        let plain = food("carrots baby", DataTier::SrLegacy, 41.0);
        assert_eq!(
            score_match(&raw, "carrots", "carrots") - score_match(&plain, "carrots", "carrots"),
            RAW_TOKEN_BONUS
        );
        // Explicitly cooked queries get no raw bonus.
        assert_eq!(
            score_match(&raw, "cooked carrots", "carrots"),
            score_match(&plain, "cooked carrots", "carrots")
        );
    }

    #[test]
    fn test_processed_penalty_unless_requested() {
        let plain = food("chicken breast", DataTier::SrLegacy, 165.0);
        let dish = food("chicken breast with rice", DataTier::SrLegacy, 180.0);
        assert!(
            score_match(&plain, "chicken breast", "chicken breast")
                > score_match(&dish, "chicken breast", "chicken breast")
        );
        // Asking for the compound form cancels the penalty.
        let asked = score_match(&dish, "chicken breast with rice", "chicken breast with rice");
        assert!(asked >= score_match(&plain, "chicken breast with rice", "chicken breast with rice"));
    }

    #[test]
    fn test_missing_calories_penalized_except_seasonings() {
        let zero_cal = food("paprika powder", DataTier::SrLegacy, 0.0);
        let with_cal = food("paprika powder", DataTier::SrLegacy, 282.0);
        assert_eq!(
            score_match(&with_cal, "paprika powder", "paprika powder")
                - score_match(&zero_cal, "paprika powder", "paprika powder"),
            MISSING_CALORIES_PENALTY
        );

        let water = food("water bottled", DataTier::SrLegacy, 0.0);
        let scored = score_match(&water, "water", "water");
        // No missing-calorie penalty for the water class.
        assert!(scored >= WORD_COVERAGE_BONUS);
    }

    #[test]
    fn test_score_clamped_to_range() {
        let awful = food(
            "frozen meal snack dish with soup",
            DataTier::Branded,
            0.0,
        );
        let score = score_match(&awful, "quinoa", "quinoa");
        assert_eq!(score, 0.0);

        let perfect = food("chicken breast raw", DataTier::Foundation, 165.0);
        let score = score_match(&perfect, "chicken breast raw", "chicken breast raw");
        assert!(score <= 100.0);
    }

    /// Stub source with canned per-(query, tier-set) responses.
    struct StubSource {
        responses: HashMap<(String, String), Vec<FoodMatch>>,
    }

    impl StubSource {
        fn tier_key(data_types: &[DataTier]) -> String {
            data_types
                .iter()
                .map(|t| t.api_name())
                .collect::<Vec<_>>()
                .join("+")
        }
    }

    #[async_trait]
    impl FoodDataSource for StubSource {
        fn has_credential(&self) -> bool {
            true
        }

        async fn search(
            &self,
            query: &str,
            data_types: &[DataTier],
            _page_size: u32,
        ) -> Result<Vec<FoodMatch>, FdcError> {
            Ok(self
                .responses
                .get(&(query.to_string(), Self::tier_key(data_types)))
                .cloned()
                .unwrap_or_default())
        }

        async fn get_details(&self, _id: u64) -> Result<FoodMatch, FdcError> {
            Err(FdcError::ApiError {
                status: reqwest::StatusCode::NOT_FOUND,
                error_body: "not stubbed".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_find_food_takes_best_across_queries() {
        let options = FindFoodOptions::default();
        let tier_key = StubSource::tier_key(&options.data_types);
        let mut responses = HashMap::new();
        responses.insert(
            ("chicken breast".to_string(), tier_key.clone()),
            vec![food("chicken breast with rice dish", DataTier::Survey, 180.0)],
        );
        responses.insert(
            ("chicken breast raw".to_string(), tier_key),
            vec![food("chicken breast raw", DataTier::Foundation, 165.0)],
        );
        let source = StubSource { responses };

        let queries = vec![
            "chicken breast".to_string(),
            "chicken breast raw".to_string(),
        ];
        let found = find_food(&source, "chicken breast", &queries, &options)
            .await
            .expect("no transport error")
            .expect("a match");
        assert_eq!(found.description, "chicken breast raw");
        assert_eq!(found.confidence, MatchConfidence::High);
        assert!(found.match_score >= 70.0);
    }

    #[tokio::test]
    async fn test_find_food_retries_branded_on_total_miss() {
        let mut responses = HashMap::new();
        responses.insert(
            ("protein bar".to_string(), "Branded".to_string()),
            vec![food("protein bar chocolate", DataTier::Branded, 400.0)],
        );
        let source = StubSource { responses };

        let found = find_food(
            &source,
            "protein bar",
            &["protein bar".to_string()],
            &FindFoodOptions::default(),
        )
        .await
        .expect("no transport error")
        .expect("branded fallback match");
        assert_eq!(found.data_type, DataTier::Branded);
    }

    #[tokio::test]
    async fn test_find_food_none_when_nothing_matches() {
        let source = StubSource {
            responses: HashMap::new(),
        };
        let found = find_food(
            &source,
            "unobtainium",
            &["unobtainium".to_string()],
            &FindFoodOptions::default(),
        )
        .await
        .expect("no transport error");
        assert!(found.is_none());
    }
}
