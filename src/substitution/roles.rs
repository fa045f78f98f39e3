//! Culinary role inference: what function an ingredient serves in the dish,
//! from name keywords and from its macro shape.

use crate::recipe::MacroVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    LeanProtein,
    FattyProtein,
    Poultry,
    RedMeat,
    Seafood,
    PlantProtein,
    Egg,
    Dairy,
    Cheese,
    FatOil,
    CarbBase,
    Legume,
    Vegetable,
    Fruit,
    Sweetener,
    Nut,
}

const ROLE_KEYWORDS: &[(&str, &[Role])] = &[
    ("chicken", &[Role::Poultry, Role::LeanProtein]),
    ("turkey", &[Role::Poultry, Role::LeanProtein]),
    ("duck", &[Role::Poultry, Role::FattyProtein]),
    ("beef", &[Role::RedMeat]),
    ("steak", &[Role::RedMeat]),
    ("pork", &[Role::RedMeat]),
    ("lamb", &[Role::RedMeat]),
    ("bacon", &[Role::RedMeat, Role::FattyProtein]),
    ("salmon", &[Role::Seafood, Role::FattyProtein]),
    ("tuna", &[Role::Seafood, Role::LeanProtein]),
    ("cod", &[Role::Seafood, Role::LeanProtein]),
    ("tilapia", &[Role::Seafood, Role::LeanProtein]),
    ("shrimp", &[Role::Seafood, Role::LeanProtein]),
    ("fish", &[Role::Seafood]),
    ("tofu", &[Role::PlantProtein]),
    ("tempeh", &[Role::PlantProtein]),
    ("seitan", &[Role::PlantProtein]),
    ("lentil", &[Role::Legume, Role::PlantProtein]),
    ("chickpea", &[Role::Legume, Role::PlantProtein]),
    ("bean", &[Role::Legume, Role::PlantProtein]),
    ("edamame", &[Role::Legume, Role::PlantProtein]),
    ("egg", &[Role::Egg]),
    ("milk", &[Role::Dairy]),
    ("yogurt", &[Role::Dairy]),
    ("cream", &[Role::Dairy, Role::FatOil]),
    ("cheese", &[Role::Cheese, Role::Dairy]),
    ("butter", &[Role::FatOil, Role::Dairy]),
    ("oil", &[Role::FatOil]),
    ("lard", &[Role::FatOil]),
    ("avocado", &[Role::FatOil, Role::Fruit]),
    ("rice", &[Role::CarbBase]),
    ("pasta", &[Role::CarbBase]),
    ("noodle", &[Role::CarbBase]),
    ("bread", &[Role::CarbBase]),
    ("tortilla", &[Role::CarbBase]),
    ("potato", &[Role::CarbBase, Role::Vegetable]),
    ("quinoa", &[Role::CarbBase]),
    ("couscous", &[Role::CarbBase]),
    ("oat", &[Role::CarbBase]),
    ("flour", &[Role::CarbBase]),
    ("sugar", &[Role::Sweetener]),
    ("honey", &[Role::Sweetener]),
    ("syrup", &[Role::Sweetener]),
    ("almond", &[Role::Nut]),
    ("walnut", &[Role::Nut]),
    ("cashew", &[Role::Nut]),
    ("peanut", &[Role::Nut]),
    ("pecan", &[Role::Nut]),
    ("spinach", &[Role::Vegetable]),
    ("broccoli", &[Role::Vegetable]),
    ("zucchini", &[Role::Vegetable]),
    ("carrot", &[Role::Vegetable]),
    ("pepper", &[Role::Vegetable]),
    ("onion", &[Role::Vegetable]),
    ("mushroom", &[Role::Vegetable]),
    ("cauliflower", &[Role::Vegetable, Role::CarbBase]),
    ("banana", &[Role::Fruit]),
    ("apple", &[Role::Fruit]),
    ("berr", &[Role::Fruit]),
    ("mango", &[Role::Fruit]),
];

/// Macro-shape thresholds, applied to the ingredient's per-serving
/// contribution.
pub const SHAPE_PROTEIN_MIN_G: f64 = 15.0;
pub const SHAPE_LEAN_FAT_MAX_G: f64 = 8.0;
pub const SHAPE_FAT_MIN_G: f64 = 10.0;
pub const SHAPE_FAT_PROTEIN_MAX_G: f64 = 8.0;
pub const SHAPE_CARB_MIN_G: f64 = 20.0;
pub const SHAPE_CARB_PROTEIN_MAX_G: f64 = 10.0;

/// Infer roles from name keywords plus macro shape. The result is ordered
/// and deduplicated, so downstream candidate generation is deterministic.
pub fn infer_roles(name: &str, per_serving: Option<&MacroVector>) -> Vec<Role> {
    let lower = name.to_lowercase();
    let mut roles = BTreeSet::new();

    for (keyword, tagged) in ROLE_KEYWORDS {
        if lower.contains(keyword) {
            roles.extend(tagged.iter().copied());
        }
    }

    if let Some(macros) = per_serving {
        if macros.protein >= SHAPE_PROTEIN_MIN_G {
            if macros.fat <= SHAPE_LEAN_FAT_MAX_G {
                roles.insert(Role::LeanProtein);
            } else {
                roles.insert(Role::FattyProtein);
            }
        }
        if macros.fat >= SHAPE_FAT_MIN_G && macros.protein < SHAPE_FAT_PROTEIN_MAX_G {
            roles.insert(Role::FatOil);
        }
        if macros.carbs >= SHAPE_CARB_MIN_G && macros.protein < SHAPE_CARB_PROTEIN_MAX_G {
            roles.insert(Role::CarbBase);
        }
    }

    roles.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_roles() {
        let roles = infer_roles("chicken breast", None);
        assert!(roles.contains(&Role::Poultry));
        assert!(roles.contains(&Role::LeanProtein));
    }

    #[test]
    fn test_macro_shape_lean_protein() {
        let macros = MacroVector {
            protein: 31.0,
            fat: 3.6,
            ..Default::default()
        };
        let roles = infer_roles("mystery fillet", Some(&macros));
        assert!(roles.contains(&Role::LeanProtein));
        assert!(!roles.contains(&Role::FattyProtein));
    }

    #[test]
    fn test_macro_shape_fatty_protein() {
        let macros = MacroVector {
            protein: 20.0,
            fat: 13.0,
            ..Default::default()
        };
        let roles = infer_roles("mystery cut", Some(&macros));
        assert!(roles.contains(&Role::FattyProtein));
        assert!(!roles.contains(&Role::LeanProtein));
    }

    #[test]
    fn test_macro_shape_fat_and_carb() {
        let fat = MacroVector {
            fat: 14.0,
            protein: 0.0,
            ..Default::default()
        };
        assert!(infer_roles("blend", Some(&fat)).contains(&Role::FatOil));

        let carb = MacroVector {
            carbs: 45.0,
            protein: 4.0,
            ..Default::default()
        };
        assert!(infer_roles("blend", Some(&carb)).contains(&Role::CarbBase));
    }

    #[test]
    fn test_no_roles_for_unknown_seasoning() {
        let macros = MacroVector::default();
        assert!(infer_roles("smoked paprika", Some(&macros)).is_empty());
    }

    #[test]
    fn test_roles_are_sorted_and_unique() {
        let roles = infer_roles("chicken and chicken", None);
        let mut sorted = roles.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(roles, sorted);
    }
}
