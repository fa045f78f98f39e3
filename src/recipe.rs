use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Input recipe shape consumed by the estimator and the substitution engine.
/// Ingredient lines arrive as free text split into a name and an optional
/// quantity string (e.g. `quantity: "200 g"`, `name: "chicken breast"`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Recipe {
    #[serde(alias = "recipe_title")]
    pub title: String,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub steps: Vec<String>,
}

fn default_servings() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
}

impl RecipeIngredient {
    /// Reassemble the original ingredient line for parsing.
    pub fn line(&self) -> String {
        match &self.quantity {
            Some(q) if !q.trim().is_empty() => format!("{} {}", q.trim(), self.name.trim()),
            _ => self.name.trim().to_string(),
        }
    }
}

/// Macro-nutrient vector. Components are grams (calories in kcal, sodium in
/// mg); a missing value from the reference data is stored as 0.0, never as
/// a null that could poison downstream sums. Deltas reuse the same shape
/// with signed components.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct MacroVector {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sodium: f64,
}

impl MacroVector {
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
            fiber: self.fiber * factor,
            sodium: self.sodium * factor,
        }
    }

    pub fn accumulate(&mut self, other: &Self) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fat += other.fat;
        self.fiber += other.fiber;
        self.sodium += other.sodium;
    }

    /// Signed component-wise difference `self - other`.
    pub fn delta_from(&self, other: &Self) -> Self {
        Self {
            calories: self.calories - other.calories,
            protein: self.protein - other.protein,
            carbs: self.carbs - other.carbs,
            fat: self.fat - other.fat,
            fiber: self.fiber - other.fiber,
            sodium: self.sodium - other.sodium,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.calories == 0.0
            && self.protein == 0.0
            && self.carbs == 0.0
            && self.fat == 0.0
            && self.fiber == 0.0
            && self.sodium == 0.0
    }
}

/// Caloric/macro goal driving the substitution fit function.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum GoalType {
    Bulk,
    LeanBulk,
    Cut,
    /// Unrecognized goal strings land here and score neutrally.
    Other,
}

impl From<String> for GoalType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "bulk" => GoalType::Bulk,
            "lean_bulk" => GoalType::LeanBulk,
            "cut" => GoalType::Cut,
            _ => GoalType::Other,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DietStyle {
    #[default]
    Omnivore,
    Vegetarian,
    Pescatarian,
    Vegan,
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum MedicalCondition {
    Celiac,
    Diabetes,
    Hypertension,
    HighCholesterol,
    KidneyDisease,
}

/// Dietary constraints supplied by the caller. Read-only for the engine.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UserContext {
    #[serde(default)]
    pub allergens: BTreeSet<String>,
    #[serde(default)]
    pub diet_style: DietStyle,
    /// Free-text comma/space separated terms the user never wants to see.
    #[serde(default)]
    pub avoid_list: String,
    #[serde(default)]
    pub conditions: BTreeSet<MedicalCondition>,
}

impl UserContext {
    /// Lowercased avoid-list terms, split on commas and semicolons.
    pub fn avoid_terms(&self) -> Vec<String> {
        self.avoid_list
            .split([',', ';'])
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn has_allergen(&self, tag: &str) -> bool {
        self.allergens.iter().any(|a| a.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_line_rebuild() {
        let ing = RecipeIngredient {
            name: "chicken breast".to_string(),
            quantity: Some("200 g".to_string()),
        };
        assert_eq!(ing.line(), "200 g chicken breast");

        let bare = RecipeIngredient {
            name: "salt".to_string(),
            quantity: None,
        };
        assert_eq!(bare.line(), "salt");
    }

    #[test]
    fn test_macro_vector_scale_and_accumulate() {
        let per_100g = MacroVector {
            calories: 165.0,
            protein: 31.0,
            carbs: 0.0,
            fat: 3.6,
            fiber: 0.0,
            sodium: 74.0,
        };
        let scaled = per_100g.scale(2.0);
        assert_eq!(scaled.calories, 330.0);
        assert_eq!(scaled.protein, 62.0);

        let mut total = MacroVector::default();
        total.accumulate(&scaled);
        total.accumulate(&per_100g);
        assert_eq!(total.calories, 495.0);
        assert_eq!(total.fat, 3.6 * 3.0);
    }

    #[test]
    fn test_unknown_goal_deserializes_to_other() {
        let goal: GoalType = serde_json::from_str("\"recomp\"").unwrap();
        assert_eq!(goal, GoalType::Other);
        let goal: GoalType = serde_json::from_str("\"lean_bulk\"").unwrap();
        assert_eq!(goal, GoalType::LeanBulk);
    }

    #[test]
    fn test_avoid_terms_split() {
        let ctx = UserContext {
            avoid_list: "Tofu, blue cheese;  anchovies".to_string(),
            ..Default::default()
        };
        assert_eq!(ctx.avoid_terms(), vec!["tofu", "blue cheese", "anchovies"]);
    }
}
