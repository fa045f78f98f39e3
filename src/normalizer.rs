use serde::{Deserialize, Serialize};

/// Canonical unit tokens recognized by the quantity parser. Anything else in
/// the source text is treated as unitless and resolved by fallback tiers.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Cup,
    Tbsp,
    Tsp,
    FlOz,
    Ml,
    L,
    Pint,
    Quart,
    Gallon,
    Gram,
    Kilogram,
    Milligram,
    Ounce,
    Pound,
    Clove,
    Piece,
    Slice,
    Can,
    Large,
    Medium,
    Small,
    Pinch,
    Dash,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Cup => "cup",
            Unit::Tbsp => "tbsp",
            Unit::Tsp => "tsp",
            Unit::FlOz => "fl oz",
            Unit::Ml => "ml",
            Unit::L => "l",
            Unit::Pint => "pint",
            Unit::Quart => "quart",
            Unit::Gallon => "gallon",
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milligram => "mg",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
            Unit::Clove => "clove",
            Unit::Piece => "piece",
            Unit::Slice => "slice",
            Unit::Can => "can",
            Unit::Large => "large",
            Unit::Medium => "medium",
            Unit::Small => "small",
            Unit::Pinch => "pinch",
            Unit::Dash => "dash",
        }
    }

    pub fn is_weight(&self) -> bool {
        matches!(
            self,
            Unit::Gram | Unit::Kilogram | Unit::Milligram | Unit::Ounce | Unit::Pound
        )
    }

    pub fn is_count(&self) -> bool {
        matches!(
            self,
            Unit::Clove
                | Unit::Piece
                | Unit::Slice
                | Unit::Can
                | Unit::Large
                | Unit::Medium
                | Unit::Small
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CookedState {
    Raw,
    Cooked,
    #[default]
    Unknown,
}

/// One parsed ingredient line. Built once by [`normalize_ingredient`] and
/// immutable afterward.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ParsedIngredient {
    pub original: String,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
    pub name: String,
    pub search_queries: Vec<String>,
    pub cooked_state: CookedState,
}

const UNIT_ALIASES: &[(&str, Unit)] = &[
    ("cup", Unit::Cup),
    ("cups", Unit::Cup),
    ("c", Unit::Cup),
    ("tablespoon", Unit::Tbsp),
    ("tablespoons", Unit::Tbsp),
    ("tbsp", Unit::Tbsp),
    ("tbsps", Unit::Tbsp),
    ("tbs", Unit::Tbsp),
    ("teaspoon", Unit::Tsp),
    ("teaspoons", Unit::Tsp),
    ("tsp", Unit::Tsp),
    ("tsps", Unit::Tsp),
    ("ml", Unit::Ml),
    ("milliliter", Unit::Ml),
    ("milliliters", Unit::Ml),
    ("millilitre", Unit::Ml),
    ("millilitres", Unit::Ml),
    ("l", Unit::L),
    ("liter", Unit::L),
    ("liters", Unit::L),
    ("litre", Unit::L),
    ("litres", Unit::L),
    ("pint", Unit::Pint),
    ("pints", Unit::Pint),
    ("pt", Unit::Pint),
    ("quart", Unit::Quart),
    ("quarts", Unit::Quart),
    ("qt", Unit::Quart),
    ("gallon", Unit::Gallon),
    ("gallons", Unit::Gallon),
    ("g", Unit::Gram),
    ("gram", Unit::Gram),
    ("grams", Unit::Gram),
    ("gr", Unit::Gram),
    ("kg", Unit::Kilogram),
    ("kilogram", Unit::Kilogram),
    ("kilograms", Unit::Kilogram),
    ("mg", Unit::Milligram),
    ("milligram", Unit::Milligram),
    ("milligrams", Unit::Milligram),
    ("oz", Unit::Ounce),
    ("ounce", Unit::Ounce),
    ("ounces", Unit::Ounce),
    ("lb", Unit::Pound),
    ("lbs", Unit::Pound),
    ("pound", Unit::Pound),
    ("pounds", Unit::Pound),
    ("clove", Unit::Clove),
    ("cloves", Unit::Clove),
    ("piece", Unit::Piece),
    ("pieces", Unit::Piece),
    ("slice", Unit::Slice),
    ("slices", Unit::Slice),
    ("can", Unit::Can),
    ("cans", Unit::Can),
    ("large", Unit::Large),
    ("medium", Unit::Medium),
    ("small", Unit::Small),
    ("pinch", Unit::Pinch),
    ("pinches", Unit::Pinch),
    ("dash", Unit::Dash),
    ("dashes", Unit::Dash),
];

/// Cooking-method descriptors stripped from names and used for cooked-state
/// detection.
const COOKING_METHOD_WORDS: &[&str] = &[
    "cooked",
    "boiled",
    "baked",
    "grilled",
    "fried",
    "pan-fried",
    "deep-fried",
    "roasted",
    "steamed",
    "sauteed",
    "sautéed",
    "poached",
    "broiled",
    "braised",
    "seared",
    "simmered",
    "toasted",
    "smoked",
];

const RAW_KEYWORDS: &[&str] = &["raw", "uncooked"];

/// Filler descriptors that never change what a food *is*.
const FILLER_WORDS: &[&str] = &[
    "fresh",
    "freshly",
    "finely",
    "coarsely",
    "thinly",
    "roughly",
    "lightly",
    "chopped",
    "diced",
    "minced",
    "sliced",
    "grated",
    "shredded",
    "peeled",
    "crushed",
    "rinsed",
    "drained",
    "trimmed",
    "pitted",
    "halved",
    "quartered",
    "cubed",
    "softened",
    "melted",
    "chilled",
    "beaten",
    "sifted",
    "packed",
    "heaping",
    "level",
    "optional",
    "divided",
    "organic",
    "boneless",
    "skinless",
    "of",
];

/// Phrases removed wholesale before tokenizing.
const FILLER_PHRASES: &[&str] = &[
    "to taste",
    "for garnish",
    "for serving",
    "as needed",
    "at room temperature",
    "room temperature",
    "plus more",
    "or so",
];

/// Parenthetical contents matching any of these drop the whole group;
/// other parentheticals keep their contents as plain words.
const DROPPED_PARENTHETICAL_MARKERS: &[&str] = &[
    "optional",
    "divided",
    "garnish",
    "to taste",
    "about",
    "approx",
    "plus more",
    "for serving",
    "as needed",
];

/// Known-better search aliases, tried before the cleaned name itself.
const QUERY_ALIASES: &[(&str, &str)] = &[
    ("scallion", "green onion"),
    ("scallions", "green onions"),
    ("spring onion", "green onion"),
    ("spring onions", "green onions"),
    ("coriander", "cilantro"),
    ("coriander leaves", "cilantro"),
    ("garbanzo beans", "chickpeas"),
    ("aubergine", "eggplant"),
    ("courgette", "zucchini"),
    ("caster sugar", "granulated sugar"),
    ("icing sugar", "powdered sugar"),
    ("bicarbonate of soda", "baking soda"),
    ("corn starch", "cornstarch"),
    ("mange tout", "snow peas"),
    ("rocket", "arugula"),
    ("capsicum", "bell pepper"),
    ("prawns", "shrimp"),
    ("mince", "ground beef"),
    ("beef mince", "ground beef"),
    ("porridge oats", "rolled oats"),
];

const VULGAR_FRACTIONS: &[(char, &str)] = &[
    ('¼', " 1/4"),
    ('½', " 1/2"),
    ('¾', " 3/4"),
    ('⅓', " 1/3"),
    ('⅔', " 2/3"),
    ('⅛', " 1/8"),
    ('⅜', " 3/8"),
    ('⅝', " 5/8"),
    ('⅞', " 7/8"),
];

fn fold_vulgar_fractions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match VULGAR_FRACTIONS.iter().find(|(c, _)| *c == ch) {
            Some((_, ascii)) => out.push_str(ascii),
            None => out.push(ch),
        }
    }
    out
}

/// Parse a single numeric token: integer, decimal, or `a/b` fraction.
fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    if let Some((num, den)) = token.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(num / den);
    }
    token.parse().ok()
}

/// Parse a leading quantity from the token stream. Returns the value and the
/// number of tokens consumed. Supports `2`, `2.5`, `1/2`, `1 1/2`, `1-2`.
fn parse_quantity(tokens: &[&str]) -> (Option<f64>, usize) {
    let Some(first) = tokens.first() else {
        return (None, 0);
    };
    // Range `a-b` resolves to the arithmetic mean.
    for sep in ['-', '–'] {
        if let Some((lo, hi)) = first.split_once(sep) {
            if let (Some(lo), Some(hi)) = (parse_number(lo), parse_number(hi)) {
                return (Some((lo + hi) / 2.0), 1);
            }
        }
    }
    let Some(value) = parse_number(first) else {
        return (None, 0);
    };
    // Mixed number: whole part followed by a fraction token (`1 1/2`).
    if value.fract() == 0.0 {
        if let Some(second) = tokens.get(1) {
            if second.contains('/') {
                if let Some(frac) = parse_number(second) {
                    return (Some(value + frac), 2);
                }
            }
        }
    }
    (Some(value), 1)
}

pub(crate) fn lookup_unit(token: &str) -> Option<Unit> {
    let token = token.trim_end_matches('.').to_lowercase();
    UNIT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, unit)| *unit)
}

/// Resolve parentheticals: drop groups matching the marker list, keep the
/// contents of the rest as plain words.
fn resolve_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(')') else {
            // Unbalanced paren: keep the tail as-is.
            out.push_str(after);
            rest = "";
            break;
        };
        let inner = &after[..close];
        let inner_lower = inner.to_lowercase();
        if !DROPPED_PARENTHETICAL_MARKERS
            .iter()
            .any(|m| inner_lower.contains(m))
        {
            out.push(' ');
            out.push_str(inner);
        }
        out.push(' ');
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn is_brand_marker(token: &str) -> bool {
    token.contains('®') || token.contains('™') || token == "brand"
}

/// Clean the post-quantity text down to a canonical lowercase name.
fn clean_name(text: &str) -> String {
    let mut text = resolve_parentheticals(text).to_lowercase();
    for phrase in FILLER_PHRASES {
        text = text.replace(phrase, " ");
    }
    let words: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-'))
        .filter(|w| !w.is_empty())
        .filter(|w| !is_brand_marker(w))
        .filter(|w| !FILLER_WORDS.contains(w))
        .filter(|w| !COOKING_METHOD_WORDS.contains(w))
        .filter(|w| !RAW_KEYWORDS.contains(w))
        // Embedded amounts ("(400 g)" parentheticals and the like) are
        // measurement noise, not part of the name.
        .filter(|w| parse_number(w).is_none())
        .filter(|w| lookup_unit(w).is_none())
        .collect();
    words.join(" ")
}

fn contains_keyword(text: &str, keywords: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric() && c != '-')
        .any(|w| keywords.contains(&w))
}

/// Detect cooked/raw state from the ingredient line, falling back to the
/// recipe step text.
fn detect_cooked_state(original: &str, step_text: Option<&str>) -> CookedState {
    let lower = original.to_lowercase();
    if contains_keyword(&lower, RAW_KEYWORDS) {
        return CookedState::Raw;
    }
    if contains_keyword(&lower, COOKING_METHOD_WORDS) {
        return CookedState::Cooked;
    }
    if let Some(steps) = step_text {
        let steps = steps.to_lowercase();
        if contains_keyword(&steps, COOKING_METHOD_WORDS) {
            return CookedState::Cooked;
        }
    }
    CookedState::Unknown
}

/// Ranked nutrition-lookup queries for a cleaned name, five at most.
fn build_search_queries(name: &str) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();
    let mut push = |q: String| {
        if !q.is_empty() && !queries.contains(&q) && queries.len() < 5 {
            queries.push(q);
        }
    };

    if let Some((_, alias)) = QUERY_ALIASES.iter().find(|(from, _)| *from == name) {
        push(alias.to_string());
    }
    push(name.to_string());
    push(format!("{name} raw"));

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() >= 2 {
        push(words[..words.len() - 1].join(" "));
    }
    if let Some(first) = words.first() {
        if first.len() >= 4 {
            push((*first).to_string());
        }
    }
    queries
}

/// Parse one raw ingredient line. Never fails: unparsable quantities come
/// back as `None` and the name falls back to the cleaned full line.
pub fn normalize_ingredient(line: &str, step_text: Option<&str>) -> ParsedIngredient {
    let original = line.trim().to_string();
    let folded = fold_vulgar_fractions(&original);
    let tokens: Vec<&str> = folded.split_whitespace().collect();

    let (quantity, consumed) = parse_quantity(&tokens);
    let mut rest = &tokens[consumed..];

    let mut unit = None;
    if let Some(first) = rest.first() {
        // Two-token volume unit.
        if (first.eq_ignore_ascii_case("fl") || first.eq_ignore_ascii_case("fluid"))
            && rest
                .get(1)
                .is_some_and(|t| lookup_unit(t) == Some(Unit::Ounce))
        {
            unit = Some(Unit::FlOz);
            rest = &rest[2..];
        } else if let Some(found) = lookup_unit(first) {
            unit = Some(found);
            rest = &rest[1..];
        }
    }

    let mut name = clean_name(&rest.join(" "));
    if name.is_empty() {
        name = clean_name(&folded);
    }
    if name.is_empty() {
        name = original.to_lowercase();
    }

    let search_queries = build_search_queries(&name);
    let cooked_state = detect_cooked_state(&original, step_text);

    ParsedIngredient {
        original,
        quantity,
        unit,
        name,
        search_queries,
        cooked_state,
    }
}
