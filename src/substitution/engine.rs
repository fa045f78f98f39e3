//! Substitution plan builder: per-ingredient role inference, candidate
//! generation and filtering, and concurrent goal-fit scoring with a
//! bounded number of in-flight nutrition lookups.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::catalog::{candidates_for_role, CatalogEntry};
use super::filters::rejection_reason;
use super::goals::compute_goal_fit;
use super::roles::{infer_roles, Role};
use crate::fdc::cache::TtlCache;
use crate::fdc::client::FoodDataSource;
use crate::fdc::matcher::{find_food, FindFoodOptions};
use crate::fdc::types::{FoodMatch, MatchConfidence};
use crate::macro_estimator::{estimate_macros, MacroEstimate};
use crate::normalizer::ParsedIngredient;
use crate::recipe::{GoalType, MacroVector, Recipe, UserContext};

/// Scoring weight split. Tuned numbers; do not rebalance casually.
pub const TASTE_TEXTURE_WEIGHT: f64 = 0.45;
pub const COMMONNESS_WEIGHT: f64 = 0.20;
pub const GOAL_FIT_WEIGHT: f64 = 0.30;
pub const SAFETY_WEIGHT: f64 = 0.05;

/// Safety score for candidates carrying any declared allergen tag.
pub const ALLERGEN_SAFETY_SCORE: f64 = 0.8;

pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 6;
pub const TOP_CANDIDATES_PER_INGREDIENT: usize = 3;

/// Ingredients below this total caloric contribution are never substituted.
pub const SKIP_CALORIE_THRESHOLD_KCAL: f64 = 5.0;

/// Negligible-impact items skipped outright.
const SKIP_KEYWORDS: &[&str] = &[
    "salt",
    "pepper",
    "water",
    "baking soda",
    "baking powder",
    "yeast",
    "vanilla",
    "cinnamon",
    "nutmeg",
    "oregano",
    "basil",
    "thyme",
    "rosemary",
    "cumin",
    "paprika",
    "bay leaf",
    "vinegar",
    "spice",
    "seasoning",
    "herbs",
];

const CANDIDATE_CACHE_CAPACITY: usize = 500;
const CANDIDATE_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubstitutionCandidate {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub swap_grams: f64,
    pub macro_per_swap: MacroVector,
    pub macro_delta: MacroVector,
    pub taste_score: u8,
    pub texture_score: u8,
    pub commonness: u8,
    /// Goal fit rescaled to [0, 100].
    pub goal_fit_score: f64,
    pub score: f64,
    pub caution: Option<String>,
    pub fdc_match: Option<FoodMatch>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IngredientPlan {
    pub name: String,
    pub original: String,
    pub roles: Vec<Role>,
    pub base_grams: f64,
    pub base_macros: MacroVector,
    pub fdc_match: Option<FoodMatch>,
    pub candidates: Vec<SubstitutionCandidate>,
    pub notes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubstitutionPlan {
    pub ingredients: Vec<IngredientPlan>,
    pub warnings: Vec<String>,
    pub assumptions: Vec<String>,
    pub confidence: MatchConfidence,
}

impl SubstitutionPlan {
    fn empty_with_warning(warning: String) -> Self {
        Self {
            ingredients: Vec::new(),
            warnings: vec![warning],
            assumptions: Vec::new(),
            confidence: MatchConfidence::Low,
        }
    }
}

pub struct SubstitutionEngine {
    source: Arc<dyn FoodDataSource>,
    max_concurrent_lookups: usize,
    candidate_cache: Arc<TtlCache<String, FoodMatch>>,
}

impl SubstitutionEngine {
    pub fn new(source: Arc<dyn FoodDataSource>) -> Self {
        Self {
            source,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            candidate_cache: Arc::new(TtlCache::new(
                CANDIDATE_CACHE_CAPACITY,
                CANDIDATE_CACHE_TTL,
            )),
        }
    }

    pub fn with_max_concurrent_lookups(mut self, limit: usize) -> Self {
        self.max_concurrent_lookups = limit.max(1);
        self
    }

    /// Drop the candidate-food cache. Exposed for test isolation.
    pub fn clear_cache(&self) {
        self.candidate_cache.clear();
    }

    /// Build a ranked substitution plan for the recipe under a goal.
    ///
    /// Never fails: a missing credential or a failed estimate degrades to
    /// an empty plan carrying a warning.
    pub async fn build_substitution_plan(
        &self,
        recipe: &Recipe,
        goal: GoalType,
        ctx: &UserContext,
        estimate: Option<&MacroEstimate>,
    ) -> SubstitutionPlan {
        if !self.source.has_credential() {
            return SubstitutionPlan::empty_with_warning(
                "nutrition service credential missing; substitution analysis skipped".to_string(),
            );
        }

        let computed;
        let estimate = match estimate {
            Some(existing) => existing,
            None => match estimate_macros(self.source.as_ref(), recipe, None).await {
                Ok(fresh) => {
                    computed = fresh;
                    &computed
                }
                Err(err) => {
                    return SubstitutionPlan::empty_with_warning(format!(
                        "macro estimation failed: {err}; substitution analysis skipped"
                    ));
                }
            },
        };

        let mut plans = Vec::new();
        let mut warnings = estimate.warnings.clone();
        let mut assumptions = Vec::new();
        let servings = estimate.servings.max(1) as f64;

        for (index, contribution) in estimate.ingredients.iter().enumerate() {
            let parsed = &contribution.parsed;
            let mut notes = Vec::new();

            if let Some(reason) = skip_reason(parsed, &contribution.macros) {
                notes.push(reason);
                plans.push(IngredientPlan {
                    name: parsed.name.clone(),
                    original: parsed.original.clone(),
                    roles: Vec::new(),
                    base_grams: contribution.grams.unwrap_or(0.0),
                    base_macros: contribution.macros,
                    fdc_match: contribution.fdc_match.clone(),
                    candidates: Vec::new(),
                    notes,
                });
                continue;
            }

            if contribution.fdc_match.is_none() {
                notes.push(format!(
                    "no nutrition match for '{}'; substitution analysis skipped",
                    parsed.name
                ));
                plans.push(IngredientPlan {
                    name: parsed.name.clone(),
                    original: parsed.original.clone(),
                    roles: Vec::new(),
                    base_grams: contribution.grams.unwrap_or(0.0),
                    base_macros: contribution.macros,
                    fdc_match: None,
                    candidates: Vec::new(),
                    notes,
                });
                continue;
            }

            let per_serving = estimate.per_serving_for(index);
            let roles = infer_roles(&parsed.name, Some(&per_serving));
            if roles.is_empty() {
                notes.push(format!("no culinary role inferred for '{}'", parsed.name));
                plans.push(IngredientPlan {
                    name: parsed.name.clone(),
                    original: parsed.original.clone(),
                    roles,
                    base_grams: contribution.grams.unwrap_or(0.0),
                    base_macros: contribution.macros,
                    fdc_match: contribution.fdc_match.clone(),
                    candidates: Vec::new(),
                    notes,
                });
                continue;
            }

            // Candidates for every inferred role, first role wins on overlap.
            let mut entries: Vec<(Role, &'static CatalogEntry)> = Vec::new();
            for role in &roles {
                for entry in candidates_for_role(*role) {
                    if !entries.iter().any(|(_, e)| e.id == entry.id) {
                        entries.push((*role, entry));
                    }
                }
            }

            let mut accepted: Vec<(Role, &'static CatalogEntry)> = Vec::new();
            for (role, entry) in entries {
                match rejection_reason(entry, &parsed.name, ctx) {
                    Some(reason) => {
                        debug!(candidate = entry.id, %reason, "candidate filtered out");
                    }
                    None => accepted.push((role, entry)),
                }
            }

            let base_grams_per_serving = contribution.grams.unwrap_or(0.0) / servings;
            let candidates = self
                .score_candidates(accepted, base_grams_per_serving, per_serving, goal)
                .await;

            assumptions.push(format!(
                "substitutions for '{}' assume a {:.0} g per-serving swap",
                parsed.name, base_grams_per_serving
            ));

            plans.push(IngredientPlan {
                name: parsed.name.clone(),
                original: parsed.original.clone(),
                roles,
                base_grams: contribution.grams.unwrap_or(0.0),
                base_macros: contribution.macros,
                fdc_match: contribution.fdc_match.clone(),
                candidates,
                notes,
            });
        }

        let matched = estimate
            .ingredients
            .iter()
            .filter(|c| c.fdc_match.is_some())
            .count();
        let confidence = plan_confidence(matched, estimate.ingredients.len());

        warnings.dedup();
        SubstitutionPlan {
            ingredients: plans,
            warnings,
            assumptions,
            confidence,
        }
    }

    /// Score the accepted candidates with bounded lookup concurrency.
    /// Tasks are admitted in submission order and results are collected by
    /// submission index, so completion order never changes the output.
    async fn score_candidates(
        &self,
        accepted: Vec<(Role, &'static CatalogEntry)>,
        swap_grams: f64,
        base_macros: MacroVector,
        goal: GoalType,
    ) -> Vec<SubstitutionCandidate> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_lookups));
        let mut handles = Vec::with_capacity(accepted.len());

        for (role, entry) in accepted {
            let semaphore = semaphore.clone();
            let source = self.source.clone();
            let cache = self.candidate_cache.clone();
            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return None,
                };
                score_one(source.as_ref(), &cache, role, entry, swap_grams, &base_macros, goal)
                    .await
            }));
        }

        let mut candidates = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(Some(candidate)) => candidates.push(candidate),
                Ok(None) => {}
                Err(err) => warn!(error = %err, "candidate scoring task panicked"),
            }
        }

        // Deterministic ranking: score descending, id as tiebreaker.
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        candidates.truncate(TOP_CANDIDATES_PER_INGREDIENT);
        candidates
    }
}

fn plan_confidence(matched: usize, total: usize) -> MatchConfidence {
    if total == 0 || matched == total {
        MatchConfidence::High
    } else if matched * 2 >= total {
        MatchConfidence::Medium
    } else {
        MatchConfidence::Low
    }
}

/// Negligible-impact check: keyword denylist or a tiny caloric contribution.
fn skip_reason(parsed: &ParsedIngredient, macros: &MacroVector) -> Option<String> {
    let lower = parsed.name.to_lowercase();
    for keyword in SKIP_KEYWORDS {
        if lower.contains(keyword) {
            return Some(format!(
                "'{}' is a negligible-impact item; left as-is",
                parsed.name
            ));
        }
    }
    if !macros.is_zero() && macros.calories <= SKIP_CALORIE_THRESHOLD_KCAL {
        return Some(format!(
            "'{}' contributes {:.1} kcal; left as-is",
            parsed.name, macros.calories
        ));
    }
    None
}

async fn score_one(
    source: &dyn FoodDataSource,
    cache: &TtlCache<String, FoodMatch>,
    role: Role,
    entry: &'static CatalogEntry,
    swap_grams: f64,
    base_macros: &MacroVector,
    goal: GoalType,
) -> Option<SubstitutionCandidate> {
    let cache_key = entry.query.to_string();
    let food = match cache.get(&cache_key) {
        Some(cached) => Some(cached),
        None => {
            let queries = vec![entry.query.to_string(), entry.name.to_string()];
            match find_food(source, entry.name, &queries, &FindFoodOptions::default()).await {
                Ok(Some(found)) => {
                    cache.insert(cache_key, found.clone());
                    Some(found)
                }
                Ok(None) => None,
                Err(err) => {
                    warn!(candidate = entry.id, error = %err, "candidate lookup failed; skipping");
                    return None;
                }
            }
        }
    };

    let food = match food {
        Some(food) => food,
        None => {
            debug!(candidate = entry.id, "no nutrition data for candidate; skipping");
            return None;
        }
    };

    let macro_per_swap = food.nutrients.scale(swap_grams / 100.0);
    let macro_delta = macro_per_swap.delta_from(base_macros);
    let goal_fit = compute_goal_fit(&macro_delta, goal);

    let taste_texture = f64::from(entry.taste + entry.texture) / 10.0;
    let commonness_score = f64::from(entry.commonness) / 5.0;
    let safety_score = if entry.allergens.is_empty() {
        1.0
    } else {
        ALLERGEN_SAFETY_SCORE
    };
    let score = TASTE_TEXTURE_WEIGHT * taste_texture
        + COMMONNESS_WEIGHT * commonness_score
        + GOAL_FIT_WEIGHT * goal_fit
        + SAFETY_WEIGHT * safety_score;

    Some(SubstitutionCandidate {
        id: entry.id.to_string(),
        name: entry.name.to_string(),
        role,
        swap_grams,
        macro_per_swap,
        macro_delta,
        taste_score: entry.taste,
        texture_score: entry.texture,
        commonness: entry.commonness,
        goal_fit_score: goal_fit * 100.0,
        score,
        caution: entry.caution.map(str::to_string),
        fdc_match: Some(food),
    })
}
