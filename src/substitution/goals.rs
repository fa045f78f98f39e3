//! Goal configuration and the macro-fit function.
//!
//! Target magnitudes and weights are tuned numbers; they are kept as the
//! literal constants below so ranking behavior stays stable.

use crate::recipe::{GoalType, MacroVector};

/// Per-goal target bands: the gram/kcal scales that normalize a macro delta.
pub struct GoalBands {
    pub calorie_step: f64,
    pub protein_step: f64,
    pub fat_step: f64,
    pub carb_step: f64,
    /// Calorie band for lean-gain style goals (low, high).
    pub calorie_band: (f64, f64),
}

pub const BULK_BANDS: GoalBands = GoalBands {
    calorie_step: 250.0,
    protein_step: 12.0,
    fat_step: 8.0,
    carb_step: 0.0,
    calorie_band: (0.0, 0.0),
};

pub const LEAN_BULK_BANDS: GoalBands = GoalBands {
    calorie_step: 0.0,
    protein_step: 12.0,
    fat_step: 10.0,
    carb_step: 0.0,
    calorie_band: (75.0, 200.0),
};

pub const CUT_BANDS: GoalBands = GoalBands {
    calorie_step: 180.0,
    protein_step: 8.0,
    fat_step: 10.0,
    carb_step: 25.0,
    calorie_band: (0.0, 0.0),
};

/// Protein deltas above this never trip the cut goal's protein guard.
pub const CUT_PROTEIN_FLOOR: f64 = -3.0;

/// Score for goal types the fit function knows nothing about.
pub const NEUTRAL_GOAL_FIT: f64 = 0.3;

/// 0 for non-positive x, else x/t capped at 1.
fn pos_norm(x: f64, t: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else {
        (x / t).clamp(0.0, 1.0)
    }
}

/// 0 for non-negative x, else |x|/t capped at 1.
fn neg_norm(x: f64, t: f64) -> f64 {
    if x >= 0.0 {
        0.0
    } else {
        (x.abs() / t).clamp(0.0, 1.0)
    }
}

/// 0 below zero, 1 above `hi`, linear between `lo` and `hi`.
fn band_norm(x: f64, lo: f64, hi: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else if x >= hi {
        1.0
    } else {
        ((x - lo) / (hi - lo)).clamp(0.0, 1.0)
    }
}

/// How well a macro delta serves a goal, in [0, 1].
pub fn compute_goal_fit(delta: &MacroVector, goal: GoalType) -> f64 {
    let fit = match goal {
        GoalType::Bulk => {
            let b = &BULK_BANDS;
            0.45 * pos_norm(delta.calories, b.calorie_step)
                + 0.40 * pos_norm(delta.protein, b.protein_step)
                + 0.15 * pos_norm(delta.fat, b.fat_step)
        }
        GoalType::LeanBulk => {
            let b = &LEAN_BULK_BANDS;
            0.45 * pos_norm(delta.protein, b.protein_step)
                + 0.35 * band_norm(delta.calories, b.calorie_band.0, b.calorie_band.1)
                + 0.20 * (1.0 - 0.5 * neg_norm(delta.fat, b.fat_step))
        }
        GoalType::Cut => {
            let b = &CUT_BANDS;
            let protein_guard = if delta.protein >= CUT_PROTEIN_FLOOR {
                1.0
            } else {
                1.0 - neg_norm(delta.protein, b.protein_step)
            };
            0.40 * neg_norm(delta.calories, b.calorie_step)
                + 0.25 * neg_norm(delta.fat, b.fat_step)
                + 0.20 * protein_guard
                + 0.15 * neg_norm(delta.carbs, b.carb_step)
        }
        GoalType::Other => NEUTRAL_GOAL_FIT,
    };
    fit.clamp(0.0, 1.0)
}
