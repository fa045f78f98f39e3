pub mod cache;
pub mod client;
pub mod matcher;
pub mod types;

pub use cache::TtlCache;
pub use client::{FdcClient, FdcError, FoodDataSource, FDC_API_KEY_ENV_VAR};
pub use matcher::{find_food, score_match, FindFoodOptions};
pub use types::{DataTier, FoodMatch, FoodPortion, MatchConfidence};
