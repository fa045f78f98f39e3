use crate::recipe::MacroVector;
use serde::{Deserialize, Serialize};

/// Reference-data quality tiers, best first. The priority order feeds the
/// match-score bonus and the low-quality retry in `find_food`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DataTier {
    Foundation,
    SrLegacy,
    Survey,
    Branded,
}

impl DataTier {
    pub fn api_name(&self) -> &'static str {
        match self {
            DataTier::Foundation => "Foundation",
            DataTier::SrLegacy => "SR Legacy",
            DataTier::Survey => "Survey (FNDDS)",
            DataTier::Branded => "Branded",
        }
    }

    pub fn from_api_name(name: &str) -> Option<Self> {
        match name {
            "Foundation" => Some(DataTier::Foundation),
            "SR Legacy" => Some(DataTier::SrLegacy),
            "Survey (FNDDS)" => Some(DataTier::Survey),
            "Branded" => Some(DataTier::Branded),
            _ => None,
        }
    }

    /// Match-score bonus for the tier, up to +16 for the best data.
    pub fn score_bonus(&self) -> f64 {
        match self {
            DataTier::Foundation => 16.0,
            DataTier::SrLegacy => 12.0,
            DataTier::Survey => 8.0,
            DataTier::Branded => 0.0,
        }
    }

    /// Default tier set queried when the caller does not restrict them.
    pub fn default_set() -> Vec<DataTier> {
        vec![
            DataTier::Foundation,
            DataTier::SrLegacy,
            DataTier::Survey,
            DataTier::Branded,
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    High,
    Medium,
    Low,
}

impl MatchConfidence {
    /// Thresholds 70/50 over the winning match score.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            MatchConfidence::High
        } else if score >= 50.0 {
            MatchConfidence::Medium
        } else {
            MatchConfidence::Low
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodPortion {
    pub description: String,
    pub amount: f64,
    pub gram_weight: f64,
    /// Gram weight of a single unit of this portion (`gram_weight / amount`).
    pub grams_per_unit: f64,
}

/// One matched reference food. Nutrients are per 100 g.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodMatch {
    pub id: u64,
    pub description: String,
    pub data_type: DataTier,
    pub nutrients: MacroVector,
    #[serde(default)]
    pub portions: Vec<FoodPortion>,
    #[serde(default)]
    pub match_score: f64,
    pub confidence: MatchConfidence,
}

impl FoodMatch {
    /// First portion whose description mentions the given unit word.
    pub fn portion_grams_for(&self, unit_word: &str) -> Option<f64> {
        self.portions
            .iter()
            .find(|p| p.description.to_lowercase().contains(unit_word))
            .map(|p| p.grams_per_unit)
    }
}

// --- Wire types for the reference service ---

/// Nutrient numbers used by the FoodData Central API.
pub const NUTRIENT_ID_ENERGY_KCAL: u64 = 1008;
pub const NUTRIENT_ID_PROTEIN: u64 = 1003;
pub const NUTRIENT_ID_CARBS: u64 = 1005;
pub const NUTRIENT_ID_FAT: u64 = 1004;
pub const NUTRIENT_ID_FIBER: u64 = 1079;
pub const NUTRIENT_ID_SODIUM: u64 = 1093;

#[derive(Debug, Deserialize, Clone)]
pub struct FoodSearchResponse {
    #[serde(default)]
    pub foods: Vec<FoodSearchItem>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearchItem {
    pub fdc_id: u64,
    pub description: String,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<AbridgedFoodNutrient>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AbridgedFoodNutrient {
    pub nutrient_id: u64,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetailsResponse {
    pub fdc_id: u64,
    pub description: String,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrientDetail>,
    #[serde(default)]
    pub food_portions: Vec<ApiFoodPortion>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FoodNutrientDetail {
    pub nutrient: NutrientRef,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NutrientRef {
    pub id: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiFoodPortion {
    #[serde(default)]
    pub portion_description: Option<String>,
    #[serde(default)]
    pub modifier: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    pub gram_weight: f64,
}

impl FoodSearchItem {
    pub fn macros_per_100g(&self) -> MacroVector {
        let mut macros = MacroVector::default();
        for nutrient in &self.food_nutrients {
            let value = nutrient.value.unwrap_or(0.0);
            match nutrient.nutrient_id {
                NUTRIENT_ID_ENERGY_KCAL => macros.calories = value,
                NUTRIENT_ID_PROTEIN => macros.protein = value,
                NUTRIENT_ID_CARBS => macros.carbs = value,
                NUTRIENT_ID_FAT => macros.fat = value,
                NUTRIENT_ID_FIBER => macros.fiber = value,
                NUTRIENT_ID_SODIUM => macros.sodium = value,
                _ => {}
            }
        }
        macros
    }

    pub fn into_food_match(self) -> FoodMatch {
        let nutrients = self.macros_per_100g();
        let data_type = self
            .data_type
            .as_deref()
            .and_then(DataTier::from_api_name)
            .unwrap_or(DataTier::Branded);
        FoodMatch {
            id: self.fdc_id,
            description: self.description,
            data_type,
            nutrients,
            portions: Vec::new(),
            match_score: 0.0,
            confidence: MatchConfidence::Low,
        }
    }
}

impl FoodDetailsResponse {
    pub fn into_food_match(self) -> FoodMatch {
        let mut nutrients = MacroVector::default();
        for detail in &self.food_nutrients {
            let value = detail.amount.unwrap_or(0.0);
            match detail.nutrient.id {
                NUTRIENT_ID_ENERGY_KCAL => nutrients.calories = value,
                NUTRIENT_ID_PROTEIN => nutrients.protein = value,
                NUTRIENT_ID_CARBS => nutrients.carbs = value,
                NUTRIENT_ID_FAT => nutrients.fat = value,
                NUTRIENT_ID_FIBER => nutrients.fiber = value,
                NUTRIENT_ID_SODIUM => nutrients.sodium = value,
                _ => {}
            }
        }
        let portions = self
            .food_portions
            .into_iter()
            .map(|p| {
                let amount = p.amount.unwrap_or(1.0).max(1e-9);
                let description = p
                    .portion_description
                    .or(p.modifier)
                    .unwrap_or_else(|| "unit".to_string());
                FoodPortion {
                    description,
                    amount,
                    gram_weight: p.gram_weight,
                    grams_per_unit: p.gram_weight / amount,
                }
            })
            .collect();
        let data_type = self
            .data_type
            .as_deref()
            .and_then(DataTier::from_api_name)
            .unwrap_or(DataTier::Branded);
        FoodMatch {
            id: self.fdc_id,
            description: self.description,
            data_type,
            nutrients,
            portions,
            match_score: 0.0,
            confidence: MatchConfidence::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(MatchConfidence::from_score(85.0), MatchConfidence::High);
        assert_eq!(MatchConfidence::from_score(70.0), MatchConfidence::High);
        assert_eq!(MatchConfidence::from_score(69.9), MatchConfidence::Medium);
        assert_eq!(MatchConfidence::from_score(50.0), MatchConfidence::Medium);
        assert_eq!(MatchConfidence::from_score(49.9), MatchConfidence::Low);
    }

    #[test]
    fn test_tier_bonus_ladder() {
        assert_eq!(DataTier::Foundation.score_bonus(), 16.0);
        assert!(DataTier::Foundation.score_bonus() > DataTier::SrLegacy.score_bonus());
        assert!(DataTier::SrLegacy.score_bonus() > DataTier::Survey.score_bonus());
        assert_eq!(DataTier::Branded.score_bonus(), 0.0);
    }

    #[test]
    fn test_search_item_macro_extraction() {
        let item = FoodSearchItem {
            fdc_id: 1,
            description: "Chicken, broiler, breast, raw".to_string(),
            data_type: Some("SR Legacy".to_string()),
            food_nutrients: vec![
                AbridgedFoodNutrient { nutrient_id: NUTRIENT_ID_ENERGY_KCAL, value: Some(165.0) },
                AbridgedFoodNutrient { nutrient_id: NUTRIENT_ID_PROTEIN, value: Some(31.0) },
                AbridgedFoodNutrient { nutrient_id: NUTRIENT_ID_FAT, value: Some(3.6) },
                AbridgedFoodNutrient { nutrient_id: 9999, value: Some(42.0) },
                AbridgedFoodNutrient { nutrient_id: NUTRIENT_ID_CARBS, value: None },
            ],
        };
        let macros = item.macros_per_100g();
        assert_eq!(macros.calories, 165.0);
        assert_eq!(macros.protein, 31.0);
        assert_eq!(macros.fat, 3.6);
        // Missing values come through as zero, not as an absent field.
        assert_eq!(macros.carbs, 0.0);
    }

    #[test]
    fn test_details_portions_grams_per_unit() {
        let details = FoodDetailsResponse {
            fdc_id: 7,
            description: "Egg, whole, raw".to_string(),
            data_type: Some("Foundation".to_string()),
            food_nutrients: vec![],
            food_portions: vec![ApiFoodPortion {
                portion_description: Some("1 large".to_string()),
                modifier: None,
                amount: Some(1.0),
                gram_weight: 50.3,
            }],
        };
        let matched = details.into_food_match();
        assert_eq!(matched.portions.len(), 1);
        assert!((matched.portions[0].grams_per_unit - 50.3).abs() < 1e-9);
        assert_eq!(matched.portion_grams_for("large"), Some(50.3));
    }
}
