pub mod density;
pub mod yields;

pub use density::{resolve_grams, Confidence, GramResolution, GramSource};
pub use yields::{apply_retention, detect_cooking_method, get_yield_factor, YieldDirection};
