pub mod cli;
pub mod conversion;
pub mod fdc;
pub mod macro_estimator;
pub mod normalizer;
pub mod recipe;
pub mod substitution;

pub use macro_estimator::{estimate_macros, MacroEstimate};
pub use substitution::{SubstitutionEngine, SubstitutionPlan};
