//! Raw/cooked weight yields and cooking-loss nutrient retention.
//!
//! Yield factors are cooked-weight over raw-weight for an ingredient under
//! a cooking method. Retention factors scale macro totals for losses (or
//! gains, for fat absorbed while frying).

use crate::conversion::density::Confidence;
use crate::recipe::MacroVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum YieldDirection {
    RawToCooked,
    CookedToRaw,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct YieldResolution {
    pub factor: f64,
    pub confidence: Confidence,
    pub note: Option<String>,
}

pub struct YieldEntry {
    pub name: &'static str,
    /// (method keyword, cooked/raw weight ratio)
    pub methods: &'static [(&'static str, f64)],
    pub default_factor: f64,
}

const PROTEIN_YIELDS: &[YieldEntry] = &[
    YieldEntry { name: "chicken breast", methods: &[("grilled", 0.70), ("boiled", 0.75), ("roasted", 0.72), ("baked", 0.72)], default_factor: 0.73 },
    YieldEntry { name: "chicken thigh", methods: &[("grilled", 0.72), ("roasted", 0.74)], default_factor: 0.73 },
    YieldEntry { name: "ground beef", methods: &[("fried", 0.73), ("grilled", 0.72)], default_factor: 0.74 },
    YieldEntry { name: "beef steak", methods: &[("grilled", 0.75), ("fried", 0.73)], default_factor: 0.75 },
    YieldEntry { name: "pork chop", methods: &[("grilled", 0.74), ("roasted", 0.76)], default_factor: 0.75 },
    YieldEntry { name: "salmon", methods: &[("baked", 0.85), ("grilled", 0.82), ("poached", 0.88)], default_factor: 0.84 },
    YieldEntry { name: "white fish", methods: &[("baked", 0.85), ("steamed", 0.88)], default_factor: 0.86 },
    YieldEntry { name: "shrimp", methods: &[("boiled", 0.78), ("grilled", 0.75)], default_factor: 0.78 },
    YieldEntry { name: "tofu", methods: &[("fried", 0.85), ("baked", 0.88)], default_factor: 0.90 },
    YieldEntry { name: "egg", methods: &[("boiled", 0.97), ("fried", 0.95)], default_factor: 0.96 },
];

const GRAIN_YIELDS: &[YieldEntry] = &[
    YieldEntry { name: "white rice", methods: &[("boiled", 2.85), ("steamed", 2.8)], default_factor: 2.8 },
    YieldEntry { name: "rice white", methods: &[("boiled", 2.85), ("steamed", 2.8)], default_factor: 2.8 },
    YieldEntry { name: "brown rice", methods: &[("boiled", 2.6)], default_factor: 2.5 },
    YieldEntry { name: "quinoa", methods: &[("boiled", 2.7)], default_factor: 2.7 },
    YieldEntry { name: "pasta", methods: &[("boiled", 2.4)], default_factor: 2.4 },
    YieldEntry { name: "couscous", methods: &[("steamed", 2.25)], default_factor: 2.25 },
    YieldEntry { name: "oats", methods: &[("boiled", 2.5)], default_factor: 2.5 },
    YieldEntry { name: "barley", methods: &[("boiled", 3.0)], default_factor: 3.0 },
];

const LEGUME_YIELDS: &[YieldEntry] = &[
    YieldEntry { name: "lentils", methods: &[("boiled", 2.5)], default_factor: 2.5 },
    YieldEntry { name: "chickpeas", methods: &[("boiled", 2.2)], default_factor: 2.2 },
    YieldEntry { name: "black beans", methods: &[("boiled", 2.3)], default_factor: 2.3 },
    YieldEntry { name: "kidney beans", methods: &[("boiled", 2.3)], default_factor: 2.3 },
    YieldEntry { name: "split peas", methods: &[("boiled", 2.4)], default_factor: 2.4 },
];

const VEGETABLE_YIELDS: &[YieldEntry] = &[
    YieldEntry { name: "spinach", methods: &[("sauteed", 0.60), ("boiled", 0.65), ("steamed", 0.70)], default_factor: 0.65 },
    YieldEntry { name: "kale", methods: &[("sauteed", 0.60), ("boiled", 0.70)], default_factor: 0.65 },
    YieldEntry { name: "mushrooms", methods: &[("sauteed", 0.55), ("roasted", 0.60)], default_factor: 0.60 },
    YieldEntry { name: "onion", methods: &[("sauteed", 0.60), ("fried", 0.55)], default_factor: 0.70 },
    YieldEntry { name: "broccoli", methods: &[("steamed", 0.90), ("boiled", 0.95), ("roasted", 0.80)], default_factor: 0.90 },
    YieldEntry { name: "carrot", methods: &[("boiled", 0.92), ("roasted", 0.80)], default_factor: 0.90 },
    YieldEntry { name: "potato", methods: &[("boiled", 0.97), ("baked", 0.80), ("roasted", 0.75)], default_factor: 0.90 },
    YieldEntry { name: "zucchini", methods: &[("sauteed", 0.65), ("grilled", 0.70)], default_factor: 0.70 },
    YieldEntry { name: "bell pepper", methods: &[("sauteed", 0.70), ("roasted", 0.75)], default_factor: 0.75 },
    YieldEntry { name: "cauliflower", methods: &[("steamed", 0.90), ("roasted", 0.78)], default_factor: 0.88 },
];

const YIELD_TABLES: &[&[YieldEntry]] = &[
    PROTEIN_YIELDS,
    GRAIN_YIELDS,
    LEGUME_YIELDS,
    VEGETABLE_YIELDS,
];

/// Per-method macro retention. Vitamins lose far more than macros do; the
/// macro factors stay close to 1.0, with frying fat above it from absorbed
/// oil.
pub struct RetentionEntry {
    pub method: &'static str,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sodium: f64,
}

pub const RETENTION_TABLE: &[RetentionEntry] = &[
    RetentionEntry { method: "boiled", calories: 0.93, protein: 0.95, carbs: 0.95, fat: 0.90, fiber: 1.0, sodium: 0.70 },
    RetentionEntry { method: "steamed", calories: 0.98, protein: 1.0, carbs: 1.0, fat: 1.0, fiber: 1.0, sodium: 0.95 },
    RetentionEntry { method: "grilled", calories: 0.94, protein: 0.95, carbs: 1.0, fat: 0.85, fiber: 1.0, sodium: 1.0 },
    RetentionEntry { method: "roasted", calories: 0.95, protein: 0.95, carbs: 1.0, fat: 0.90, fiber: 1.0, sodium: 1.0 },
    RetentionEntry { method: "baked", calories: 0.95, protein: 0.95, carbs: 1.0, fat: 0.90, fiber: 1.0, sodium: 1.0 },
    RetentionEntry { method: "fried", calories: 1.08, protein: 0.95, carbs: 0.98, fat: 1.15, fiber: 1.0, sodium: 1.0 },
    RetentionEntry { method: "sauteed", calories: 1.05, protein: 0.95, carbs: 0.98, fat: 1.10, fiber: 1.0, sodium: 1.0 },
    RetentionEntry { method: "poached", calories: 0.94, protein: 0.95, carbs: 0.98, fat: 0.92, fiber: 1.0, sodium: 0.85 },
];

/// Methods recognized in free text, most specific first.
const METHOD_KEYWORDS: &[&str] = &[
    "sauteed", "sautéed", "grilled", "roasted", "boiled", "steamed", "baked",
    "fried", "poached", "broiled", "braised",
];

/// Pick the first cooking-method keyword present in the text.
pub fn detect_cooking_method(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    METHOD_KEYWORDS
        .iter()
        .find(|m| lower.contains(**m))
        .map(|m| match *m {
            "sautéed" => "sauteed",
            other => other,
        })
}

fn name_matches(entry_name: &str, name: &str) -> bool {
    name.contains(entry_name) || entry_name.contains(name)
}

/// Yield factor for an ingredient under a cooking method. A miss is a
/// neutral 1.0 with a note, never an error.
pub fn get_yield_factor(
    name: &str,
    method: Option<&str>,
    direction: YieldDirection,
) -> YieldResolution {
    let name = name.trim().to_lowercase();
    for table in YIELD_TABLES {
        if let Some(entry) = table.iter().find(|e| name_matches(e.name, &name)) {
            let (factor, note) = match method {
                Some(m) => {
                    let m = m.to_lowercase();
                    match entry.methods.iter().find(|(key, _)| m.contains(key)) {
                        Some((_, f)) => (*f, None),
                        None => (
                            entry.default_factor,
                            Some(format!(
                                "no yield factor for '{}' with method '{m}'; used its default",
                                entry.name
                            )),
                        ),
                    }
                }
                None => (entry.default_factor, None),
            };
            let factor = match direction {
                YieldDirection::RawToCooked => factor,
                YieldDirection::CookedToRaw => 1.0 / factor,
            };
            return YieldResolution {
                factor,
                confidence: Confidence::High,
                note,
            };
        }
    }
    YieldResolution {
        factor: 1.0,
        confidence: Confidence::Low,
        note: Some(format!(
            "no yield data for '{name}'; assumed cooked and raw weights are equal"
        )),
    }
}

/// Apply per-method macro retention to a nutrient total.
pub fn apply_retention(macros: &MacroVector, method: &str) -> (MacroVector, Option<String>) {
    let method = method.to_lowercase();
    match RETENTION_TABLE.iter().find(|e| method.contains(e.method)) {
        Some(entry) => {
            let adjusted = MacroVector {
                calories: macros.calories * entry.calories,
                protein: macros.protein * entry.protein,
                carbs: macros.carbs * entry.carbs,
                fat: macros.fat * entry.fat,
                fiber: macros.fiber * entry.fiber,
                sodium: macros.sodium * entry.sodium,
            };
            (
                adjusted,
                Some(format!("applied {} retention factors", entry.method)),
            )
        }
        None => (*macros, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_specific_factor() {
        let res = get_yield_factor("chicken breast", Some("grilled"), YieldDirection::RawToCooked);
        assert_eq!(res.factor, 0.70);
        assert_eq!(res.confidence, Confidence::High);
        assert!(res.note.is_none());
    }

    #[test]
    fn test_default_factor_when_method_unknown() {
        let res = get_yield_factor("chicken breast", Some("microwaved"), YieldDirection::RawToCooked);
        assert_eq!(res.factor, 0.73);
        assert!(res.note.is_some());
    }

    #[test]
    fn test_cooked_to_raw_is_inverse() {
        for (name, method) in [
            ("chicken breast", Some("grilled")),
            ("white rice", Some("boiled")),
            ("spinach", Some("sauteed")),
            ("lentils", None),
        ] {
            let forward = get_yield_factor(name, method, YieldDirection::RawToCooked).factor;
            let backward = get_yield_factor(name, method, YieldDirection::CookedToRaw).factor;
            assert!(
                (forward * backward - 1.0).abs() < 1e-12,
                "{name}: {forward} * {backward} != 1"
            );
        }
    }

    #[test]
    fn test_round_trip_grams() {
        let grams = 200.0_f64;
        let raw = grams * get_yield_factor("white rice", Some("boiled"), YieldDirection::CookedToRaw).factor;
        let back = raw * get_yield_factor("white rice", Some("boiled"), YieldDirection::RawToCooked).factor;
        assert!(((back - grams) / grams).abs() < 1e-6);
    }

    #[test]
    fn test_substring_match_either_direction() {
        // Query longer than entry name.
        let res = get_yield_factor("boneless chicken breast fillets", None, YieldDirection::RawToCooked);
        assert_eq!(res.factor, 0.73);
        // Entry name longer than query.
        let res = get_yield_factor("chickpeas", Some("boiled"), YieldDirection::RawToCooked);
        assert_eq!(res.factor, 2.2);
    }

    #[test]
    fn test_miss_is_neutral_not_error() {
        let res = get_yield_factor("dragonfruit", Some("boiled"), YieldDirection::RawToCooked);
        assert_eq!(res.factor, 1.0);
        assert_eq!(res.confidence, Confidence::Low);
        assert!(res.note.is_some());
    }

    #[test]
    fn test_frying_increases_fat() {
        let macros = MacroVector {
            calories: 100.0,
            protein: 10.0,
            carbs: 10.0,
            fat: 10.0,
            fiber: 2.0,
            sodium: 100.0,
        };
        let (adjusted, note) = apply_retention(&macros, "fried");
        assert!(adjusted.fat > macros.fat);
        assert!((adjusted.fat - 11.5).abs() < 1e-9);
        assert!(note.is_some());
    }

    #[test]
    fn test_boiling_leaches_sodium() {
        let macros = MacroVector {
            sodium: 100.0,
            ..Default::default()
        };
        let (adjusted, _) = apply_retention(&macros, "boiled");
        assert!((adjusted.sodium - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_method_retention_is_identity() {
        let macros = MacroVector {
            calories: 100.0,
            ..Default::default()
        };
        let (adjusted, note) = apply_retention(&macros, "pickled");
        assert_eq!(adjusted, macros);
        assert!(note.is_none());
    }
}
