//! Quantity/unit-to-gram conversion.
//!
//! Densities are per-ingredient grams for one cup / tbsp / tsp, with
//! optional count weights (per piece, clove, size class). Lookup walks
//! exact name, exact reference description, partial match, category
//! keywords, and finally a water-like default.

use crate::normalizer::Unit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
    VeryLow,
    Failed,
}

/// Which lookup tier produced the gram weight.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GramSource {
    WeightUnit,
    ExactName,
    ReferenceDescription,
    PartialName,
    Category,
    WaterDefault,
    CountField,
    ReferencePortion,
    TablespoonFallback,
    FixedFallback,
    Failed,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GramResolution {
    pub grams: f64,
    pub confidence: Confidence,
    pub source: GramSource,
    pub warnings: Vec<String>,
}

/// Fixed gram multipliers for weight units. These bypass density entirely.
const WEIGHT_MULTIPLIERS: &[(Unit, f64)] = &[
    (Unit::Gram, 1.0),
    (Unit::Kilogram, 1000.0),
    (Unit::Milligram, 0.001),
    (Unit::Ounce, 28.3495),
    (Unit::Pound, 453.592),
];

const ML_PER_CUP: f64 = 236.588;
const ML_PER_FL_OZ: f64 = 29.5735;

/// Last-resort weight for a unit we cannot interpret at all.
const FIXED_FALLBACK_GRAMS: f64 = 15.0;

#[derive(Debug, Clone, Copy)]
pub struct DensityEntry {
    pub name: &'static str,
    pub grams_per_cup: Option<f64>,
    pub grams_per_tbsp: Option<f64>,
    pub grams_per_tsp: Option<f64>,
    pub grams_per_piece: Option<f64>,
    pub grams_per_clove: Option<f64>,
    pub grams_large: Option<f64>,
    pub grams_medium: Option<f64>,
    pub grams_small: Option<f64>,
    pub grams_per_slice: Option<f64>,
    pub grams_per_can: Option<f64>,
}

const EMPTY: DensityEntry = DensityEntry {
    name: "",
    grams_per_cup: None,
    grams_per_tbsp: None,
    grams_per_tsp: None,
    grams_per_piece: None,
    grams_per_clove: None,
    grams_large: None,
    grams_medium: None,
    grams_small: None,
    grams_per_slice: None,
    grams_per_can: None,
};

/// Per-ingredient densities. Cup weights from USDA FoodData Central
/// household measures; count weights are typical retail sizes.
pub const DENSITY_TABLE: &[DensityEntry] = &[
    DensityEntry { name: "flour", grams_per_cup: Some(125.0), ..EMPTY },
    DensityEntry { name: "all-purpose flour", grams_per_cup: Some(125.0), ..EMPTY },
    DensityEntry { name: "whole wheat flour", grams_per_cup: Some(120.0), ..EMPTY },
    DensityEntry { name: "sugar", grams_per_cup: Some(200.0), grams_per_tbsp: Some(12.5), ..EMPTY },
    DensityEntry { name: "brown sugar", grams_per_cup: Some(220.0), ..EMPTY },
    DensityEntry { name: "powdered sugar", grams_per_cup: Some(120.0), ..EMPTY },
    DensityEntry { name: "butter", grams_per_cup: Some(227.0), grams_per_tbsp: Some(14.2), ..EMPTY },
    DensityEntry { name: "olive oil", grams_per_cup: Some(216.0), grams_per_tbsp: Some(13.5), ..EMPTY },
    DensityEntry { name: "vegetable oil", grams_per_cup: Some(218.0), grams_per_tbsp: Some(13.6), ..EMPTY },
    DensityEntry { name: "coconut oil", grams_per_cup: Some(218.0), grams_per_tbsp: Some(13.6), ..EMPTY },
    DensityEntry { name: "milk", grams_per_cup: Some(244.0), grams_per_tbsp: Some(15.3), ..EMPTY },
    DensityEntry { name: "water", grams_per_cup: Some(236.6), grams_per_tbsp: Some(14.8), grams_per_tsp: Some(4.9), ..EMPTY },
    DensityEntry { name: "honey", grams_per_cup: Some(339.0), grams_per_tbsp: Some(21.0), ..EMPTY },
    DensityEntry { name: "maple syrup", grams_per_cup: Some(322.0), grams_per_tbsp: Some(20.0), ..EMPTY },
    DensityEntry { name: "rice white", grams_per_cup: Some(185.0), ..EMPTY },
    DensityEntry { name: "white rice", grams_per_cup: Some(185.0), ..EMPTY },
    DensityEntry { name: "brown rice", grams_per_cup: Some(190.0), ..EMPTY },
    DensityEntry { name: "quinoa", grams_per_cup: Some(170.0), ..EMPTY },
    DensityEntry { name: "rolled oats", grams_per_cup: Some(90.0), ..EMPTY },
    DensityEntry { name: "oats", grams_per_cup: Some(90.0), ..EMPTY },
    DensityEntry { name: "pasta", grams_per_cup: Some(100.0), ..EMPTY },
    DensityEntry { name: "couscous", grams_per_cup: Some(173.0), ..EMPTY },
    DensityEntry { name: "lentils", grams_per_cup: Some(192.0), ..EMPTY },
    DensityEntry { name: "chickpeas", grams_per_cup: Some(164.0), grams_per_can: Some(400.0), ..EMPTY },
    DensityEntry { name: "black beans", grams_per_cup: Some(172.0), grams_per_can: Some(400.0), ..EMPTY },
    DensityEntry { name: "greek yogurt", grams_per_cup: Some(245.0), ..EMPTY },
    DensityEntry { name: "yogurt", grams_per_cup: Some(245.0), ..EMPTY },
    DensityEntry { name: "cottage cheese", grams_per_cup: Some(226.0), ..EMPTY },
    DensityEntry { name: "cheddar cheese", grams_per_cup: Some(113.0), grams_per_slice: Some(28.0), ..EMPTY },
    DensityEntry { name: "mozzarella", grams_per_cup: Some(112.0), grams_per_slice: Some(28.0), ..EMPTY },
    DensityEntry { name: "parmesan", grams_per_cup: Some(100.0), grams_per_tbsp: Some(6.3), ..EMPTY },
    DensityEntry { name: "peanut butter", grams_per_cup: Some(258.0), grams_per_tbsp: Some(16.0), ..EMPTY },
    DensityEntry { name: "almond butter", grams_per_cup: Some(256.0), grams_per_tbsp: Some(16.0), ..EMPTY },
    DensityEntry { name: "soy sauce", grams_per_cup: Some(255.0), grams_per_tbsp: Some(16.0), ..EMPTY },
    DensityEntry { name: "salt", grams_per_cup: Some(292.0), grams_per_tbsp: Some(18.25), grams_per_tsp: Some(6.0), ..EMPTY },
    DensityEntry { name: "baking powder", grams_per_tsp: Some(4.6), ..EMPTY },
    DensityEntry { name: "baking soda", grams_per_tsp: Some(4.8), ..EMPTY },
    DensityEntry { name: "cocoa powder", grams_per_cup: Some(85.0), grams_per_tbsp: Some(5.3), ..EMPTY },
    DensityEntry { name: "almonds", grams_per_cup: Some(143.0), ..EMPTY },
    DensityEntry { name: "walnuts", grams_per_cup: Some(117.0), ..EMPTY },
    DensityEntry { name: "spinach", grams_per_cup: Some(30.0), ..EMPTY },
    DensityEntry { name: "broccoli", grams_per_cup: Some(91.0), ..EMPTY },
    DensityEntry { name: "tofu", grams_per_cup: Some(252.0), ..EMPTY },
    DensityEntry { name: "egg", grams_large: Some(50.0), grams_medium: Some(44.0), grams_small: Some(38.0), grams_per_piece: Some(50.0), ..EMPTY },
    DensityEntry { name: "eggs", grams_large: Some(50.0), grams_medium: Some(44.0), grams_small: Some(38.0), grams_per_piece: Some(50.0), ..EMPTY },
    DensityEntry { name: "garlic", grams_per_clove: Some(3.0), grams_per_tsp: Some(2.8), ..EMPTY },
    DensityEntry { name: "onion", grams_large: Some(150.0), grams_medium: Some(110.0), grams_small: Some(70.0), grams_per_piece: Some(110.0), grams_per_cup: Some(160.0), ..EMPTY },
    DensityEntry { name: "tomato", grams_large: Some(182.0), grams_medium: Some(123.0), grams_small: Some(91.0), grams_per_piece: Some(123.0), grams_per_can: Some(400.0), ..EMPTY },
    DensityEntry { name: "potato", grams_large: Some(300.0), grams_medium: Some(213.0), grams_small: Some(140.0), grams_per_piece: Some(213.0), ..EMPTY },
    DensityEntry { name: "sweet potato", grams_large: Some(180.0), grams_medium: Some(130.0), grams_small: Some(100.0), grams_per_piece: Some(130.0), ..EMPTY },
    DensityEntry { name: "carrot", grams_large: Some(72.0), grams_medium: Some(61.0), grams_small: Some(50.0), grams_per_piece: Some(61.0), grams_per_cup: Some(128.0), ..EMPTY },
    DensityEntry { name: "banana", grams_large: Some(136.0), grams_medium: Some(118.0), grams_small: Some(101.0), grams_per_piece: Some(118.0), ..EMPTY },
    DensityEntry { name: "apple", grams_large: Some(223.0), grams_medium: Some(182.0), grams_small: Some(149.0), grams_per_piece: Some(182.0), ..EMPTY },
    DensityEntry { name: "avocado", grams_large: Some(201.0), grams_medium: Some(150.0), grams_small: Some(136.0), grams_per_piece: Some(150.0), ..EMPTY },
    DensityEntry { name: "lemon", grams_medium: Some(58.0), grams_per_piece: Some(58.0), grams_per_tbsp: Some(15.0), ..EMPTY },
    DensityEntry { name: "chicken breast", grams_large: Some(220.0), grams_medium: Some(174.0), grams_small: Some(130.0), grams_per_piece: Some(174.0), ..EMPTY },
    DensityEntry { name: "chicken thigh", grams_per_piece: Some(110.0), ..EMPTY },
    DensityEntry { name: "bacon", grams_per_slice: Some(12.0), ..EMPTY },
    DensityEntry { name: "bread", grams_per_slice: Some(28.0), ..EMPTY },
    DensityEntry { name: "tortilla", grams_per_piece: Some(49.0), ..EMPTY },
];

/// Category fallback densities keyed by name/description keywords, checked
/// in order after per-ingredient lookups miss.
struct CategoryDensity {
    keywords: &'static [&'static str],
    grams_per_cup: f64,
}

const CATEGORY_TABLE: &[CategoryDensity] = &[
    CategoryDensity { keywords: &["flour", "starch"], grams_per_cup: 120.0 },
    CategoryDensity { keywords: &["sugar", "sweetener"], grams_per_cup: 200.0 },
    CategoryDensity { keywords: &["oil", "fat", "shortening", "lard"], grams_per_cup: 216.0 },
    CategoryDensity { keywords: &["syrup", "honey", "molasses"], grams_per_cup: 330.0 },
    CategoryDensity { keywords: &["milk", "juice", "broth", "stock", "cream", "sauce", "vinegar", "wine"], grams_per_cup: 240.0 },
    CategoryDensity { keywords: &["spinach", "lettuce", "kale", "arugula", "greens", "herb", "cilantro", "parsley", "basil"], grams_per_cup: 40.0 },
    CategoryDensity { keywords: &["rice", "grain", "oat", "quinoa", "barley", "pasta", "noodle", "cereal"], grams_per_cup: 180.0 },
    CategoryDensity { keywords: &["bean", "lentil", "pea", "legume", "chickpea"], grams_per_cup: 180.0 },
    CategoryDensity { keywords: &["nut", "almond", "walnut", "pecan", "cashew", "seed"], grams_per_cup: 130.0 },
    CategoryDensity { keywords: &["cheese"], grams_per_cup: 110.0 },
    CategoryDensity { keywords: &["chicken", "beef", "pork", "turkey", "fish", "salmon", "meat", "shrimp"], grams_per_cup: 225.0 },
    CategoryDensity { keywords: &["berry", "berries", "fruit", "mango", "pineapple", "grape"], grams_per_cup: 150.0 },
    CategoryDensity { keywords: &["vegetable", "pepper", "onion", "carrot", "celery", "zucchini", "squash", "mushroom", "corn"], grams_per_cup: 130.0 },
    CategoryDensity { keywords: &["powder", "spice", "seasoning"], grams_per_cup: 110.0 },
];

/// Water-like absolute default, used when every lookup tier misses.
const DEFAULT_DENSITY: DensityEntry = DensityEntry {
    name: "water-like default",
    grams_per_cup: Some(ML_PER_CUP),
    grams_per_tbsp: Some(14.8),
    grams_per_tsp: Some(4.9),
    ..EMPTY
};

/// Whole-word phrase containment, either direction. Plain substring checks
/// misfire on short names ("veggie" contains "egg").
fn word_phrase_match(a: &str, b: &str) -> bool {
    fn contains(haystack: &str, needle: &str) -> bool {
        let h: Vec<&str> = haystack.split_whitespace().collect();
        let n: Vec<&str> = needle.split_whitespace().collect();
        !n.is_empty() && n.len() <= h.len() && h.windows(n.len()).any(|w| w == n.as_slice())
    }
    contains(a, b) || contains(b, a)
}

fn find_entry(name: &str, reference_desc: Option<&str>) -> Option<(&'static DensityEntry, GramSource)> {
    let name = name.trim().to_lowercase();
    if let Some(entry) = DENSITY_TABLE.iter().find(|e| e.name == name) {
        return Some((entry, GramSource::ExactName));
    }
    if let Some(desc) = reference_desc {
        let desc = desc.trim().to_lowercase();
        if let Some(entry) = DENSITY_TABLE.iter().find(|e| e.name == desc) {
            return Some((entry, GramSource::ReferenceDescription));
        }
    }
    if let Some(entry) = DENSITY_TABLE
        .iter()
        .find(|e| word_phrase_match(&name, e.name))
    {
        return Some((entry, GramSource::PartialName));
    }
    if let Some(desc) = reference_desc {
        let desc = desc.trim().to_lowercase();
        if let Some(entry) = DENSITY_TABLE
            .iter()
            .find(|e| word_phrase_match(&desc, e.name))
        {
            return Some((entry, GramSource::PartialName));
        }
    }
    None
}

fn find_category(name: &str, reference_desc: Option<&str>) -> Option<&'static CategoryDensity> {
    let haystack = match reference_desc {
        Some(desc) => format!("{} {}", name, desc).to_lowercase(),
        None => name.to_lowercase(),
    };
    CATEGORY_TABLE
        .iter()
        .find(|c| c.keywords.iter().any(|k| haystack.contains(k)))
}

impl DensityEntry {
    fn cup(&self) -> Option<f64> {
        self.grams_per_cup
            .or(self.grams_per_tbsp.map(|t| t * 16.0))
            .or(self.grams_per_tsp.map(|t| t * 48.0))
    }

    fn tbsp(&self) -> Option<f64> {
        self.grams_per_tbsp
            .or(self.grams_per_cup.map(|c| c / 16.0))
            .or(self.grams_per_tsp.map(|t| t * 3.0))
    }

    fn tsp(&self) -> Option<f64> {
        self.grams_per_tsp
            .or(self.grams_per_tbsp.map(|t| t / 3.0))
            .or(self.grams_per_cup.map(|c| c / 48.0))
    }

    fn count_grams(&self, unit: Unit) -> Option<f64> {
        match unit {
            Unit::Clove => self.grams_per_clove.or(self.grams_per_piece),
            Unit::Large => self.grams_large.or(self.grams_per_piece),
            Unit::Medium => self.grams_medium.or(self.grams_per_piece),
            Unit::Small => self.grams_small.or(self.grams_per_piece),
            Unit::Slice => self.grams_per_slice.or(self.grams_per_piece),
            Unit::Can => self.grams_per_can,
            Unit::Piece => self.grams_per_piece,
            _ => None,
        }
    }

    fn volume_grams(&self, quantity: f64, unit: Unit) -> Option<f64> {
        match unit {
            Unit::Cup => Some(quantity * self.cup()?),
            Unit::Tbsp => Some(quantity * self.tbsp()?),
            Unit::Tsp => Some(quantity * self.tsp()?),
            Unit::Pint => Some(quantity * 2.0 * self.cup()?),
            Unit::Quart => Some(quantity * 4.0 * self.cup()?),
            Unit::Gallon => Some(quantity * 16.0 * self.cup()?),
            Unit::Ml => Some(quantity / ML_PER_CUP * self.cup()?),
            Unit::L => Some(quantity * 1000.0 / ML_PER_CUP * self.cup()?),
            Unit::FlOz => Some(quantity * ML_PER_FL_OZ / ML_PER_CUP * self.cup()?),
            Unit::Pinch => Some(quantity * self.tsp()? / 16.0),
            Unit::Dash => Some(quantity * self.tsp()? / 8.0),
            _ => None,
        }
    }
}

fn tier_confidence(source: GramSource) -> Confidence {
    match source {
        GramSource::WeightUnit => Confidence::High,
        GramSource::ExactName | GramSource::ReferenceDescription => Confidence::High,
        GramSource::PartialName => Confidence::Medium,
        GramSource::Category => Confidence::Low,
        GramSource::WaterDefault => Confidence::Low,
        GramSource::CountField => Confidence::High,
        GramSource::ReferencePortion => Confidence::Medium,
        GramSource::TablespoonFallback => Confidence::Low,
        GramSource::FixedFallback => Confidence::VeryLow,
        GramSource::Failed => Confidence::Failed,
    }
}

/// Resolve a (quantity, unit, name) triple to grams.
///
/// `reference_desc` is the matched nutrition-reference description, used as
/// a secondary lookup key. `portion_grams_per_unit` is a per-unit gram
/// weight taken from the matched food's portion data, consulted for count
/// units when the density table has no count field.
pub fn resolve_grams(
    quantity: f64,
    unit: Option<Unit>,
    name: &str,
    reference_desc: Option<&str>,
    portion_grams_per_unit: Option<f64>,
) -> GramResolution {
    let mut warnings = Vec::new();

    // Weight units convert directly and never consult the density table.
    if let Some(unit) = unit {
        if let Some((_, mult)) = WEIGHT_MULTIPLIERS.iter().find(|(u, _)| *u == unit) {
            return GramResolution {
                grams: quantity * mult,
                confidence: Confidence::High,
                source: GramSource::WeightUnit,
                warnings,
            };
        }
    }

    let entry = find_entry(name, reference_desc);

    // Count-style units: per-ingredient count fields, then reference
    // portions, then the generic fallback chain.
    let is_countish = unit.map(|u| u.is_count()).unwrap_or(true);
    if is_countish {
        let count_unit = unit.unwrap_or(Unit::Piece);
        if let Some((e, tier)) = entry {
            if let Some(per_unit) = e.count_grams(count_unit) {
                return GramResolution {
                    grams: quantity * per_unit,
                    confidence: tier_confidence(tier),
                    source: GramSource::CountField,
                    warnings,
                };
            }
        }
        if let Some(per_unit) = portion_grams_per_unit {
            warnings.push(format!(
                "used reference portion weight of {per_unit:.0} g per {} for '{name}'",
                count_unit.as_str()
            ));
            return GramResolution {
                grams: quantity * per_unit,
                confidence: Confidence::Medium,
                source: GramSource::ReferencePortion,
                warnings,
            };
        }
        // No count data anywhere: tablespoon density, then a flat guess.
        if let Some((e, _)) = entry {
            if let Some(tbsp) = e.tbsp() {
                warnings.push(format!(
                    "no per-unit weight for '{name}'; approximated one {} as a tablespoon ({tbsp:.1} g)",
                    count_unit.as_str()
                ));
                return GramResolution {
                    grams: quantity * tbsp,
                    confidence: Confidence::Low,
                    source: GramSource::TablespoonFallback,
                    warnings,
                };
            }
        }
        warnings.push(format!(
            "no weight data for '{name}' per {}; assumed {FIXED_FALLBACK_GRAMS} g per unit",
            count_unit.as_str()
        ));
        return GramResolution {
            grams: quantity * FIXED_FALLBACK_GRAMS,
            confidence: Confidence::VeryLow,
            source: GramSource::FixedFallback,
            warnings,
        };
    }

    // Volume units through the density tiers. The count path above already
    // consumed the unitless case.
    let Some(unit) = unit else {
        warnings.push(format!(
            "no usable unit for '{name}'; assumed {FIXED_FALLBACK_GRAMS} g per unit"
        ));
        return GramResolution {
            grams: quantity * FIXED_FALLBACK_GRAMS,
            confidence: Confidence::VeryLow,
            source: GramSource::FixedFallback,
            warnings,
        };
    };
    if let Some((e, tier)) = entry {
        if let Some(grams) = e.volume_grams(quantity, unit) {
            return GramResolution {
                grams,
                confidence: tier_confidence(tier),
                source: tier,
                warnings,
            };
        }
    }
    if let Some(category) = find_category(name, reference_desc) {
        let entry = DensityEntry {
            name: "category",
            grams_per_cup: Some(category.grams_per_cup),
            ..EMPTY
        };
        if let Some(grams) = entry.volume_grams(quantity, unit) {
            warnings.push(format!(
                "no density entry for '{name}'; used category density ({:.0} g/cup)",
                category.grams_per_cup
            ));
            return GramResolution {
                grams,
                confidence: Confidence::Low,
                source: GramSource::Category,
                warnings,
            };
        }
    }
    match DEFAULT_DENSITY.volume_grams(quantity, unit) {
        Some(grams) => {
            warnings.push(format!(
                "no density data for '{name}'; assumed water-like density"
            ));
            GramResolution {
                grams,
                confidence: Confidence::Low,
                source: GramSource::WaterDefault,
                warnings,
            }
        }
        None => {
            warnings.push(format!(
                "could not interpret unit '{}' for '{name}'; assumed {FIXED_FALLBACK_GRAMS} g per unit",
                unit.as_str()
            ));
            GramResolution {
                grams: quantity * FIXED_FALLBACK_GRAMS,
                confidence: Confidence::VeryLow,
                source: GramSource::FixedFallback,
                warnings,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_units_exact_multipliers() {
        let res = resolve_grams(2.0, Some(Unit::Pound), "chicken breast", None, None);
        assert_eq!(res.grams, 907.184);
        assert_eq!(res.confidence, Confidence::High);
        assert_eq!(res.source, GramSource::WeightUnit);
        assert!(res.warnings.is_empty());

        let res = resolve_grams(200.0, Some(Unit::Gram), "anything", None, None);
        assert_eq!(res.grams, 200.0);

        let res = resolve_grams(3.0, Some(Unit::Ounce), "cheese", None, None);
        assert_eq!(res.grams, 3.0 * 28.3495);

        let res = resolve_grams(0.5, Some(Unit::Kilogram), "flour", None, None);
        assert_eq!(res.grams, 500.0);
    }

    #[test]
    fn test_exact_density_matches() {
        let res = resolve_grams(2.0, Some(Unit::Cup), "rice white", None, None);
        assert_eq!(res.grams, 370.0);
        assert_eq!(res.source, GramSource::ExactName);
        assert_eq!(res.confidence, Confidence::High);

        let res = resolve_grams(1.0, Some(Unit::Tbsp), "butter", None, None);
        assert_eq!(res.grams, 14.2);
    }

    #[test]
    fn test_reference_description_match() {
        let res = resolve_grams(1.0, Some(Unit::Cup), "uncommon grain blend", Some("quinoa"), None);
        assert_eq!(res.grams, 170.0);
        assert_eq!(res.source, GramSource::ReferenceDescription);
    }

    #[test]
    fn test_partial_match() {
        let res = resolve_grams(1.0, Some(Unit::Cup), "organic rolled oats", None, None);
        assert_eq!(res.grams, 90.0);
        assert_eq!(res.source, GramSource::PartialName);
        assert_eq!(res.confidence, Confidence::Medium);
    }

    #[test]
    fn test_category_fallback_warns() {
        let res = resolve_grams(1.0, Some(Unit::Cup), "teff", None, None);
        // "teff" has no entry; no category keyword matches either, so this
        // lands on the water default.
        assert_eq!(res.source, GramSource::WaterDefault);
        assert!(!res.warnings.is_empty());

        let res = resolve_grams(1.0, Some(Unit::Cup), "hazelnut pieces", None, None);
        assert_eq!(res.source, GramSource::Category);
        assert_eq!(res.grams, 130.0);
        assert_eq!(res.confidence, Confidence::Low);
        assert!(!res.warnings.is_empty());
    }

    #[test]
    fn test_count_units() {
        let res = resolve_grams(2.0, Some(Unit::Clove), "garlic", None, None);
        assert_eq!(res.grams, 6.0);
        assert_eq!(res.source, GramSource::CountField);

        let res = resolve_grams(3.0, Some(Unit::Large), "eggs", None, None);
        assert_eq!(res.grams, 150.0);

        let res = resolve_grams(1.0, Some(Unit::Medium), "onion", None, None);
        assert_eq!(res.grams, 110.0);
    }

    #[test]
    fn test_unitless_count_uses_piece_weight() {
        let res = resolve_grams(2.0, None, "banana", None, None);
        assert_eq!(res.grams, 236.0);
        assert_eq!(res.source, GramSource::CountField);
    }

    #[test]
    fn test_count_falls_back_to_reference_portion() {
        let res = resolve_grams(2.0, Some(Unit::Piece), "veggie patty", None, Some(71.0));
        assert_eq!(res.grams, 142.0);
        assert_eq!(res.source, GramSource::ReferencePortion);
        assert_eq!(res.confidence, Confidence::Medium);
        assert!(!res.warnings.is_empty());
    }

    #[test]
    fn test_fixed_fallback_is_very_low() {
        let res = resolve_grams(2.0, Some(Unit::Piece), "mystery item", None, None);
        assert_eq!(res.grams, 30.0);
        assert_eq!(res.confidence, Confidence::VeryLow);
        assert_eq!(res.source, GramSource::FixedFallback);
        assert!(!res.warnings.is_empty());
    }

    #[test]
    fn test_ml_conversion_via_cup_density() {
        let res = resolve_grams(ML_PER_CUP, Some(Unit::Ml), "water", None, None);
        assert!((res.grams - 236.6).abs() < 1e-9);
    }

    #[test]
    fn test_water_default_for_unknown_liquid() {
        let res = resolve_grams(1.0, Some(Unit::Cup), "dragonfruit nectar", None, None);
        // "fruit" keyword matches the fruit category.
        assert_eq!(res.source, GramSource::Category);
        assert_eq!(res.grams, 150.0);
    }
}
