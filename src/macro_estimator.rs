use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::conversion::density::{resolve_grams, Confidence};
use crate::conversion::yields::{
    apply_retention, detect_cooking_method, get_yield_factor, YieldDirection,
};
use crate::fdc::client::{FdcError, FoodDataSource, FDC_API_KEY_ENV_VAR};
use crate::fdc::matcher::{find_food, FindFoodOptions};
use crate::fdc::types::FoodMatch;
use crate::normalizer::{normalize_ingredient, CookedState, ParsedIngredient, Unit};
use crate::recipe::{MacroVector, Recipe};

/// Warn when stated calories drift more than this from the Atwater-derived
/// value. Tunable heuristic, not a correctness bound.
pub const CALORIE_CHECK_TOLERANCE: f64 = 0.10;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IngredientContribution {
    pub parsed: ParsedIngredient,
    pub grams: Option<f64>,
    pub macros: MacroVector,
    pub fdc_match: Option<FoodMatch>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MacroEstimate {
    pub totals: MacroVector,
    pub per_serving: MacroVector,
    pub servings: u32,
    pub ingredients: Vec<IngredientContribution>,
    pub assumptions: Vec<String>,
    pub warnings: Vec<String>,
}

impl MacroEstimate {
    /// Per-serving macros contributed by one ingredient.
    pub fn per_serving_for(&self, index: usize) -> MacroVector {
        let servings = self.servings.max(1) as f64;
        self.ingredients
            .get(index)
            .map(|c| c.macros.scale(1.0 / servings))
            .unwrap_or_default()
    }
}

/// Estimate total and per-serving macros for a recipe.
///
/// Fatal only when the nutrition service credential is missing; every other
/// problem degrades to a warning on the returned estimate.
pub async fn estimate_macros(
    source: &dyn FoodDataSource,
    recipe: &Recipe,
    normalized: Option<Vec<ParsedIngredient>>,
) -> Result<MacroEstimate> {
    if !source.has_credential() {
        return Err(FdcError::MissingApiKey(FDC_API_KEY_ENV_VAR.to_string()).into());
    }

    let steps_text = if recipe.steps.is_empty() {
        None
    } else {
        Some(recipe.steps.join(" "))
    };

    let parsed_ingredients = normalized.unwrap_or_else(|| {
        recipe
            .ingredients
            .iter()
            .map(|ing| normalize_ingredient(&ing.line(), steps_text.as_deref()))
            .collect()
    });

    let mut totals = MacroVector::default();
    let mut contributions = Vec::with_capacity(parsed_ingredients.len());
    let mut assumptions = Vec::new();
    let mut warnings = Vec::new();
    let options = FindFoodOptions::default();

    for parsed in parsed_ingredients {
        let food = find_food(source, &parsed.name, &parsed.search_queries, &options).await?;

        let Some(quantity) = parsed.quantity else {
            warnings.push(format!(
                "could not parse a quantity for '{}'; excluded from totals",
                parsed.original
            ));
            contributions.push(IngredientContribution {
                parsed,
                grams: None,
                macros: MacroVector::default(),
                fdc_match: food,
            });
            continue;
        };

        // Count-style amounts can borrow a per-unit weight from the matched
        // food's portion data, which lives on the details record.
        let is_countish = parsed.unit.map(|u| u.is_count()).unwrap_or(true);
        let food = match (&food, is_countish) {
            (Some(found), true) => match source.get_details(found.id).await {
                Ok(mut detail) => {
                    detail.match_score = found.match_score;
                    detail.confidence = found.confidence;
                    Some(detail)
                }
                Err(err) => {
                    debug!(id = found.id, error = %err, "details fetch failed; using search record");
                    food
                }
            },
            _ => food,
        };

        let portion_hint = food.as_ref().and_then(|f| {
            let unit_word = parsed.unit.unwrap_or(Unit::Piece).as_str();
            f.portion_grams_for(unit_word)
                .or_else(|| f.portions.first().map(|p| p.grams_per_unit))
        });

        let resolution = resolve_grams(
            quantity,
            parsed.unit,
            &parsed.name,
            food.as_ref().map(|f| f.description.as_str()),
            portion_hint,
        );
        warnings.extend(resolution.warnings.iter().cloned());

        let mut grams = resolution.grams;

        let Some(food) = food else {
            warnings.push(format!(
                "no nutrition match for '{}'; excluded from totals",
                parsed.original
            ));
            contributions.push(IngredientContribution {
                parsed,
                grams: Some(grams),
                macros: MacroVector::default(),
                fdc_match: None,
            });
            continue;
        };

        // Cooked/raw mismatch between the parsed state and the matched
        // reference description adjusts the gram weight, and cooking losses
        // scale the nutrients.
        let desc_lower = food.description.to_lowercase();
        let method = detect_cooking_method(&parsed.original)
            .or_else(|| steps_text.as_deref().and_then(detect_cooking_method));
        let mut macros_scale_method = None;
        if parsed.cooked_state == CookedState::Cooked && desc_lower.contains("raw") {
            let yield_res = get_yield_factor(&parsed.name, method, YieldDirection::CookedToRaw);
            grams *= yield_res.factor;
            if let Some(note) = yield_res.note {
                warnings.push(note);
            }
            assumptions.push(format!(
                "converted cooked weight of '{}' to a raw-equivalent {:.0} g",
                parsed.name, grams
            ));
            macros_scale_method = method;
        } else if parsed.cooked_state == CookedState::Raw && desc_lower.contains("cooked") {
            let yield_res = get_yield_factor(&parsed.name, method, YieldDirection::RawToCooked);
            grams *= yield_res.factor;
            if let Some(note) = yield_res.note {
                warnings.push(note);
            }
            assumptions.push(format!(
                "converted raw weight of '{}' to a cooked-equivalent {:.0} g",
                parsed.name, grams
            ));
        }

        let mut macros = food.nutrients.scale(grams / 100.0);
        if let Some(method) = macros_scale_method {
            let (adjusted, note) = apply_retention(&macros, method);
            macros = adjusted;
            if let Some(note) = note {
                assumptions.push(format!("{}: {}", parsed.name, note));
            }
        }

        assumptions.push(format!(
            "{}: {:.0} g ({} {}), matched '{}' ({:?} confidence)",
            parsed.original,
            grams,
            quantity,
            parsed
                .unit
                .map(|u| u.as_str())
                .unwrap_or("unit"),
            food.description,
            food.confidence,
        ));
        if resolution.confidence >= Confidence::Low {
            debug!(
                ingredient = %parsed.name,
                source = ?resolution.source,
                "low-confidence gram resolution"
            );
        }

        totals.accumulate(&macros);
        contributions.push(IngredientContribution {
            parsed,
            grams: Some(grams),
            macros,
            fdc_match: Some(food),
        });
    }

    let servings = recipe.servings.max(1);
    let per_serving = totals.scale(1.0 / servings as f64);

    // Atwater cross-check on the aggregate.
    let derived = totals.protein * 4.0 + totals.carbs * 4.0 + totals.fat * 9.0;
    if totals.calories > 0.0 {
        let deviation = (derived - totals.calories).abs() / totals.calories;
        if deviation > CALORIE_CHECK_TOLERANCE {
            warnings.push(format!(
                "macro-derived calories ({derived:.0}) deviate {:.0}% from summed calories ({:.0})",
                deviation * 100.0,
                totals.calories
            ));
        }
    }

    if !warnings.is_empty() {
        warn!(count = warnings.len(), "macro estimate produced warnings");
    }

    Ok(MacroEstimate {
        totals,
        per_serving,
        servings,
        ingredients: contributions,
        assumptions,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdc::types::{DataTier, FoodPortion, MatchConfidence};
    use crate::recipe::RecipeIngredient;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubSource {
        foods: HashMap<&'static str, FoodMatch>,
        credential: bool,
    }

    impl StubSource {
        fn with(foods: Vec<(&'static str, FoodMatch)>) -> Self {
            Self {
                foods: foods.into_iter().collect(),
                credential: true,
            }
        }
    }

    #[async_trait]
    impl FoodDataSource for StubSource {
        fn has_credential(&self) -> bool {
            self.credential
        }

        async fn search(
            &self,
            query: &str,
            _data_types: &[DataTier],
            _page_size: u32,
        ) -> Result<Vec<FoodMatch>, FdcError> {
            Ok(self
                .foods
                .iter()
                .filter(|(key, _)| query.split_whitespace().all(|w| key.contains(w)))
                .map(|(_, food)| food.clone())
                .collect())
        }

        async fn get_details(&self, id: u64) -> Result<FoodMatch, FdcError> {
            self.foods
                .values()
                .find(|f| f.id == id)
                .cloned()
                .ok_or(FdcError::ApiError {
                    status: reqwest::StatusCode::NOT_FOUND,
                    error_body: "not stubbed".to_string(),
                })
        }
    }

    fn chicken_breast_raw() -> FoodMatch {
        FoodMatch {
            id: 100,
            description: "chicken breast raw".to_string(),
            data_type: DataTier::Foundation,
            nutrients: MacroVector {
                calories: 165.0,
                protein: 31.0,
                carbs: 0.0,
                fat: 3.6,
                fiber: 0.0,
                sodium: 74.0,
            },
            portions: vec![FoodPortion {
                description: "1 piece".to_string(),
                amount: 1.0,
                gram_weight: 174.0,
                grams_per_unit: 174.0,
            }],
            match_score: 0.0,
            confidence: MatchConfidence::Low,
        }
    }

    fn single_ingredient_recipe(quantity: &str, name: &str, servings: u32) -> Recipe {
        Recipe {
            title: "test".to_string(),
            ingredients: vec![RecipeIngredient {
                name: name.to_string(),
                quantity: Some(quantity.to_string()),
            }],
            servings,
            steps: vec![],
        }
    }

    #[tokio::test]
    async fn test_estimate_scales_per_100g() {
        let source = StubSource::with(vec![("chicken breast raw", chicken_breast_raw())]);
        let recipe = single_ingredient_recipe("200 g", "chicken breast", 1);
        let estimate = estimate_macros(&source, &recipe, None).await.unwrap();

        assert!((estimate.per_serving.calories - 330.0).abs() < 0.5);
        assert!((estimate.per_serving.protein - 62.0).abs() < 0.5);
        assert_eq!(estimate.per_serving.carbs, 0.0);
        assert!((estimate.per_serving.fat - 7.2).abs() < 0.1);
        assert!(!estimate.assumptions.is_empty());
    }

    #[tokio::test]
    async fn test_servings_divide_totals() {
        let source = StubSource::with(vec![("chicken breast raw", chicken_breast_raw())]);
        let recipe = single_ingredient_recipe("200 g", "chicken breast", 4);
        let estimate = estimate_macros(&source, &recipe, None).await.unwrap();
        assert!((estimate.totals.calories - 330.0).abs() < 0.5);
        assert!((estimate.per_serving.calories - 82.5).abs() < 0.5);
    }

    #[tokio::test]
    async fn test_zero_servings_treated_as_one() {
        let source = StubSource::with(vec![("chicken breast raw", chicken_breast_raw())]);
        let recipe = single_ingredient_recipe("200 g", "chicken breast", 0);
        let estimate = estimate_macros(&source, &recipe, None).await.unwrap();
        assert_eq!(estimate.servings, 1);
        assert!((estimate.per_serving.calories - 330.0).abs() < 0.5);
    }

    #[tokio::test]
    async fn test_missing_credential_is_fatal() {
        let mut source = StubSource::with(vec![]);
        source.credential = false;
        let recipe = single_ingredient_recipe("200 g", "chicken breast", 1);
        let result = estimate_macros(&source, &recipe, None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unmatched_ingredient_warns_not_drops() {
        let source = StubSource::with(vec![("chicken breast raw", chicken_breast_raw())]);
        let recipe = Recipe {
            title: "test".to_string(),
            ingredients: vec![
                RecipeIngredient {
                    name: "chicken breast".to_string(),
                    quantity: Some("200 g".to_string()),
                },
                RecipeIngredient {
                    name: "unobtainium".to_string(),
                    quantity: Some("50 g".to_string()),
                },
            ],
            servings: 1,
            steps: vec![],
        };
        let estimate = estimate_macros(&source, &recipe, None).await.unwrap();
        assert!((estimate.totals.calories - 330.0).abs() < 0.5);
        assert!(estimate
            .warnings
            .iter()
            .any(|w| w.contains("unobtainium")));
        assert_eq!(estimate.ingredients.len(), 2);
    }

    #[tokio::test]
    async fn test_unparsable_quantity_warns() {
        let source = StubSource::with(vec![("chicken breast raw", chicken_breast_raw())]);
        let recipe = Recipe {
            title: "test".to_string(),
            ingredients: vec![RecipeIngredient {
                name: "salt to taste".to_string(),
                quantity: None,
            }],
            servings: 1,
            steps: vec![],
        };
        let estimate = estimate_macros(&source, &recipe, None).await.unwrap();
        assert!(estimate.warnings.iter().any(|w| w.contains("quantity")));
        assert_eq!(estimate.ingredients[0].grams, None);
        assert_eq!(estimate.totals.calories, 0.0);
    }

    #[tokio::test]
    async fn test_cooked_ingredient_against_raw_reference_shrinks_grams() {
        let source = StubSource::with(vec![("chicken breast raw", chicken_breast_raw())]);
        let recipe = single_ingredient_recipe("200 g", "grilled chicken breast", 1);
        let estimate = estimate_macros(&source, &recipe, None).await.unwrap();
        // 200 g cooked is more than 200 g of raw input: weight converts by
        // the inverse grilled yield (0.70), then grilling retention trims
        // the macros.
        let grams = estimate.ingredients[0].grams.unwrap();
        assert!((grams - 200.0 / 0.70).abs() < 0.5);
        let expected_protein = 31.0 * (grams / 100.0) * 0.95;
        assert!((estimate.totals.protein - expected_protein).abs() < 0.5);
    }

    #[tokio::test]
    async fn test_count_unit_uses_reference_portion() {
        let source = StubSource::with(vec![("chicken breast raw", chicken_breast_raw())]);
        let recipe = single_ingredient_recipe("2", "chicken breast", 1);
        let estimate = estimate_macros(&source, &recipe, None).await.unwrap();
        // Density table has a per-piece weight for chicken breast (174 g),
        // so two pieces weigh 348 g.
        assert!((estimate.ingredients[0].grams.unwrap() - 348.0).abs() < 0.5);
    }
}
