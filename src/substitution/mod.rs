pub mod catalog;
pub mod engine;
pub mod filters;
pub mod goals;
pub mod roles;

pub use engine::{SubstitutionCandidate, SubstitutionEngine, SubstitutionPlan};
pub use goals::compute_goal_fit;
pub use roles::Role;
