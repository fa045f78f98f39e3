//! Hard filters over substitution candidates: allergens, diet style,
//! free-text avoid terms, and medical-condition denylists. A rejected
//! candidate never reaches scoring.

use super::catalog::CatalogEntry;
use crate::recipe::{DietStyle, MedicalCondition, UserContext};

/// Keyword denylists per medical condition, matched against candidate
/// name and lookup query.
pub const CONDITION_DENYLISTS: &[(MedicalCondition, &[&str])] = &[
    (
        MedicalCondition::Celiac,
        &["wheat", "gluten", "seitan", "barley", "rye", "couscous", "pasta", "bread", "flour"],
    ),
    (
        MedicalCondition::Diabetes,
        &["sugar", "honey", "syrup", "sweetened", "agave", "candy", "dessert"],
    ),
    (
        MedicalCondition::Hypertension,
        &["salt", "soy sauce", "bacon", "ham", "cured", "pickled", "feta", "processed"],
    ),
    (
        MedicalCondition::HighCholesterol,
        &["butter", "lard", "bacon", "sausage", "heavy cream", "coconut oil", "egg yolk"],
    ),
    (
        MedicalCondition::KidneyDisease,
        &["salt", "soy sauce", "banana", "potato", "avocado", "tomato"],
    ),
];

fn diet_compatible(entry: &CatalogEntry, diet: DietStyle) -> bool {
    match diet {
        DietStyle::Omnivore => true,
        DietStyle::Vegetarian => entry.vegetarian,
        DietStyle::Pescatarian => entry.pescatarian,
        DietStyle::Vegan => entry.vegan,
    }
}

/// Why a candidate is excluded for this user, or `None` if it survives.
pub fn rejection_reason(
    entry: &CatalogEntry,
    original_name: &str,
    ctx: &UserContext,
) -> Option<String> {
    // Declared allergen tags against the user's allergen set. The
    // gluten_optional tag only bites for users who list gluten.
    for allergen in entry.allergens {
        if ctx.has_allergen(allergen) {
            return Some(format!("contains declared allergen '{allergen}'"));
        }
    }
    if entry.gluten_optional && ctx.has_allergen("gluten") {
        return Some("may contain gluten depending on preparation".to_string());
    }

    if !diet_compatible(entry, ctx.diet_style) {
        return Some(format!(
            "not compatible with {:?} diet",
            ctx.diet_style
        ));
    }

    let name_lower = entry.name.to_lowercase();
    let query_lower = entry.query.to_lowercase();
    for term in ctx.avoid_terms() {
        if name_lower.contains(&term) || query_lower.contains(&term) {
            return Some(format!("matches avoid-list term '{term}'"));
        }
    }

    for (condition, denied) in CONDITION_DENYLISTS {
        if ctx.conditions.contains(condition) {
            for keyword in *denied {
                if name_lower.contains(keyword) || query_lower.contains(keyword) {
                    return Some(format!(
                        "not suitable for {condition:?} (matches '{keyword}')"
                    ));
                }
            }
        }
    }

    if name_lower.trim() == original_name.trim().to_lowercase() {
        return Some("identical to the original ingredient".to_string());
    }

    None
}
