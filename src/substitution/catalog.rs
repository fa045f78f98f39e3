//! Substitution candidate catalog.
//!
//! A versioned constant table: every candidate carries its roles, declared
//! allergen tags, diet compatibility, and 1-5 taste/texture/commonness
//! ratings used by the scorer. `query` is the nutrition-lookup string.

use super::roles::Role;

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub query: &'static str,
    pub roles: &'static [Role],
    pub allergens: &'static [&'static str],
    /// Contains gluten only in some preparations; excluded only for users
    /// who actually list gluten as an allergen.
    pub gluten_optional: bool,
    pub vegan: bool,
    pub vegetarian: bool,
    pub pescatarian: bool,
    pub taste: u8,
    pub texture: u8,
    pub commonness: u8,
    pub caution: Option<&'static str>,
}

const E: CatalogEntry = CatalogEntry {
    id: "",
    name: "",
    query: "",
    roles: &[],
    allergens: &[],
    gluten_optional: false,
    vegan: false,
    vegetarian: false,
    pescatarian: false,
    taste: 3,
    texture: 3,
    commonness: 3,
    caution: None,
};

pub const CATALOG: &[CatalogEntry] = &[
    // Poultry and lean meats
    CatalogEntry { id: "chicken_breast", name: "chicken breast", query: "chicken breast raw", roles: &[Role::Poultry, Role::LeanProtein], pescatarian: false, taste: 4, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "turkey_breast", name: "turkey breast", query: "turkey breast raw", roles: &[Role::Poultry, Role::LeanProtein], taste: 4, texture: 4, commonness: 4, ..E },
    CatalogEntry { id: "chicken_thigh", name: "chicken thighs", query: "chicken thigh raw", roles: &[Role::Poultry, Role::FattyProtein], taste: 5, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "ground_turkey", name: "lean ground turkey", query: "ground turkey raw", roles: &[Role::Poultry, Role::LeanProtein, Role::RedMeat], taste: 3, texture: 4, commonness: 4, ..E },
    CatalogEntry { id: "lean_ground_beef", name: "extra lean ground beef", query: "ground beef 95 lean raw", roles: &[Role::RedMeat, Role::LeanProtein], taste: 4, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "sirloin", name: "sirloin steak", query: "beef sirloin raw", roles: &[Role::RedMeat], taste: 5, texture: 4, commonness: 4, ..E },
    CatalogEntry { id: "pork_tenderloin", name: "pork tenderloin", query: "pork tenderloin raw", roles: &[Role::RedMeat, Role::LeanProtein], taste: 4, texture: 4, commonness: 3, ..E },
    // Seafood
    CatalogEntry { id: "salmon", name: "salmon fillet", query: "salmon atlantic raw", roles: &[Role::Seafood, Role::FattyProtein], allergens: &["fish"], pescatarian: true, taste: 5, texture: 4, commonness: 4, ..E },
    CatalogEntry { id: "cod", name: "cod fillet", query: "cod atlantic raw", roles: &[Role::Seafood, Role::LeanProtein], allergens: &["fish"], pescatarian: true, taste: 3, texture: 3, commonness: 3, ..E },
    CatalogEntry { id: "tilapia", name: "tilapia fillet", query: "tilapia raw", roles: &[Role::Seafood, Role::LeanProtein], allergens: &["fish"], pescatarian: true, taste: 3, texture: 3, commonness: 4, ..E },
    CatalogEntry { id: "canned_tuna", name: "canned tuna in water", query: "tuna canned water", roles: &[Role::Seafood, Role::LeanProtein], allergens: &["fish"], pescatarian: true, taste: 3, texture: 3, commonness: 5, ..E },
    CatalogEntry { id: "shrimp", name: "shrimp", query: "shrimp raw", roles: &[Role::Seafood, Role::LeanProtein], allergens: &["shellfish"], pescatarian: true, taste: 4, texture: 4, commonness: 4, ..E },
    // Plant proteins
    CatalogEntry { id: "tofu_firm", name: "firm tofu", query: "tofu firm", roles: &[Role::PlantProtein, Role::LeanProtein], allergens: &["soy"], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 4, ..E },
    CatalogEntry { id: "tempeh", name: "tempeh", query: "tempeh", roles: &[Role::PlantProtein], allergens: &["soy"], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 4, commonness: 2, ..E },
    CatalogEntry { id: "seitan", name: "seitan", query: "seitan", roles: &[Role::PlantProtein, Role::LeanProtein], allergens: &["gluten"], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 4, commonness: 2, ..E },
    CatalogEntry { id: "lentils", name: "lentils", query: "lentils cooked", roles: &[Role::Legume, Role::PlantProtein], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 4, ..E },
    CatalogEntry { id: "chickpeas", name: "chickpeas", query: "chickpeas cooked", roles: &[Role::Legume, Role::PlantProtein], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 3, commonness: 4, ..E },
    CatalogEntry { id: "black_beans", name: "black beans", query: "black beans cooked", roles: &[Role::Legume, Role::PlantProtein], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 3, commonness: 4, ..E },
    CatalogEntry { id: "edamame", name: "edamame", query: "edamame", roles: &[Role::Legume, Role::PlantProtein], allergens: &["soy"], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 3, ..E },
    // Eggs and dairy proteins
    CatalogEntry { id: "egg_whites", name: "egg whites", query: "egg white raw", roles: &[Role::Egg, Role::LeanProtein], allergens: &["eggs"], vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 5, ..E },
    CatalogEntry { id: "whole_eggs", name: "whole eggs", query: "egg whole raw", roles: &[Role::Egg], allergens: &["eggs"], vegetarian: true, pescatarian: true, taste: 4, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "greek_yogurt", name: "nonfat greek yogurt", query: "greek yogurt nonfat", roles: &[Role::Dairy, Role::LeanProtein], allergens: &["dairy"], vegetarian: true, pescatarian: true, taste: 4, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "cottage_cheese", name: "low-fat cottage cheese", query: "cottage cheese lowfat", roles: &[Role::Dairy, Role::Cheese, Role::LeanProtein], allergens: &["dairy"], vegetarian: true, pescatarian: true, taste: 3, texture: 2, commonness: 4, ..E },
    // Carb bases
    CatalogEntry { id: "white_rice", name: "white rice", query: "rice white cooked", roles: &[Role::CarbBase], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "brown_rice", name: "brown rice", query: "rice brown cooked", roles: &[Role::CarbBase], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 5, ..E },
    CatalogEntry { id: "quinoa", name: "quinoa", query: "quinoa cooked", roles: &[Role::CarbBase, Role::PlantProtein], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 4, ..E },
    CatalogEntry { id: "cauliflower_rice", name: "cauliflower rice", query: "cauliflower raw", roles: &[Role::CarbBase, Role::Vegetable], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 2, commonness: 3, ..E },
    CatalogEntry { id: "sweet_potato", name: "sweet potato", query: "sweet potato raw", roles: &[Role::CarbBase, Role::Vegetable], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "whole_wheat_pasta", name: "whole wheat pasta", query: "pasta whole wheat dry", roles: &[Role::CarbBase], allergens: &["gluten"], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 4, ..E },
    CatalogEntry { id: "zucchini_noodles", name: "zucchini noodles", query: "zucchini raw", roles: &[Role::CarbBase, Role::Vegetable], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 2, commonness: 3, ..E },
    CatalogEntry { id: "rolled_oats", name: "rolled oats", query: "oats rolled dry", roles: &[Role::CarbBase], gluten_optional: true, vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 5, ..E },
    CatalogEntry { id: "whole_wheat_bread", name: "whole wheat bread", query: "bread whole wheat", roles: &[Role::CarbBase], allergens: &["gluten"], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 4, commonness: 5, ..E },
    // Fats
    CatalogEntry { id: "olive_oil", name: "olive oil", query: "olive oil", roles: &[Role::FatOil], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 5, commonness: 5, ..E },
    CatalogEntry { id: "avocado", name: "avocado", query: "avocado raw", roles: &[Role::FatOil, Role::Fruit], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 3, commonness: 5, ..E },
    CatalogEntry { id: "butter", name: "butter", query: "butter salted", roles: &[Role::FatOil, Role::Dairy], allergens: &["dairy"], vegetarian: true, pescatarian: true, taste: 5, texture: 5, commonness: 5, caution: Some("high in saturated fat"), ..E },
    CatalogEntry { id: "coconut_oil", name: "coconut oil", query: "coconut oil", roles: &[Role::FatOil], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 4, commonness: 4, caution: Some("high in saturated fat"), ..E },
    CatalogEntry { id: "peanut_butter", name: "peanut butter", query: "peanut butter smooth", roles: &[Role::FatOil, Role::Nut], allergens: &["peanuts"], vegan: true, vegetarian: true, pescatarian: true, taste: 5, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "almond_butter", name: "almond butter", query: "almond butter plain", roles: &[Role::FatOil, Role::Nut], allergens: &["tree nuts"], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 4, commonness: 3, ..E },
    // Dairy and alternatives
    CatalogEntry { id: "skim_milk", name: "skim milk", query: "milk nonfat", roles: &[Role::Dairy], allergens: &["dairy"], vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 5, ..E },
    CatalogEntry { id: "almond_milk", name: "unsweetened almond milk", query: "almond milk unsweetened", roles: &[Role::Dairy], allergens: &["tree nuts"], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 4, ..E },
    CatalogEntry { id: "soy_milk", name: "soy milk", query: "soy milk unsweetened", roles: &[Role::Dairy], allergens: &["soy"], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 4, ..E },
    CatalogEntry { id: "oat_milk", name: "oat milk", query: "oat milk unsweetened", roles: &[Role::Dairy], gluten_optional: true, vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 4, commonness: 4, ..E },
    CatalogEntry { id: "part_skim_mozzarella", name: "part-skim mozzarella", query: "mozzarella part skim", roles: &[Role::Cheese, Role::Dairy], allergens: &["dairy"], vegetarian: true, pescatarian: true, taste: 4, texture: 4, commonness: 4, ..E },
    CatalogEntry { id: "feta", name: "feta cheese", query: "feta cheese", roles: &[Role::Cheese, Role::Dairy], allergens: &["dairy"], vegetarian: true, pescatarian: true, taste: 4, texture: 3, commonness: 4, caution: Some("high in sodium"), ..E },
    // Sweeteners
    CatalogEntry { id: "honey", name: "honey", query: "honey", roles: &[Role::Sweetener], vegetarian: true, pescatarian: true, taste: 5, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "maple_syrup", name: "maple syrup", query: "maple syrup", roles: &[Role::Sweetener], vegan: true, vegetarian: true, pescatarian: true, taste: 5, texture: 4, commonness: 4, ..E },
    CatalogEntry { id: "stevia", name: "stevia", query: "stevia sweetener", roles: &[Role::Sweetener], vegan: true, vegetarian: true, pescatarian: true, taste: 2, texture: 3, commonness: 3, ..E },
    // Nuts and seeds
    CatalogEntry { id: "almonds", name: "almonds", query: "almonds raw", roles: &[Role::Nut], allergens: &["tree nuts"], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "walnuts", name: "walnuts", query: "walnuts raw", roles: &[Role::Nut], allergens: &["tree nuts"], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 3, commonness: 4, ..E },
    CatalogEntry { id: "pumpkin_seeds", name: "pumpkin seeds", query: "pumpkin seeds", roles: &[Role::Nut], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 4, commonness: 3, ..E },
    // Vegetables
    CatalogEntry { id: "spinach", name: "spinach", query: "spinach raw", roles: &[Role::Vegetable], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 3, commonness: 5, ..E },
    CatalogEntry { id: "broccoli", name: "broccoli", query: "broccoli raw", roles: &[Role::Vegetable], vegan: true, vegetarian: true, pescatarian: true, taste: 3, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "bell_pepper", name: "bell pepper", query: "bell pepper raw", roles: &[Role::Vegetable], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 4, commonness: 5, ..E },
    CatalogEntry { id: "mushrooms", name: "mushrooms", query: "mushrooms white raw", roles: &[Role::Vegetable], vegan: true, vegetarian: true, pescatarian: true, taste: 4, texture: 3, commonness: 5, ..E },
];

/// All catalog entries tagged with the given role, in table order.
pub fn candidates_for_role(role: Role) -> impl Iterator<Item = &'static CatalogEntry> {
    CATALOG.iter().filter(move |e| e.roles.contains(&role))
}
