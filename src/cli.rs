use clap::Parser;

use crate::recipe::{DietStyle, GoalType, MedicalCondition};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the recipe JSON file
    #[arg(short, long)]
    pub recipe_file: String,

    /// Goal type for substitution suggestions; omit to estimate macros only
    #[arg(short, long, value_enum)]
    pub goal: Option<GoalType>,

    /// Allergens to exclude (comma separated, e.g. "fish,tree nuts")
    #[arg(long, value_delimiter = ',')]
    pub allergens: Vec<String>,

    /// Diet style constraint
    #[arg(long, value_enum, default_value = "omnivore")]
    pub diet: DietStyle,

    /// Free-text avoid list (comma separated)
    #[arg(long, default_value = "")]
    pub avoid: String,

    /// Medical conditions to respect
    #[arg(long, value_enum, value_delimiter = ',')]
    pub conditions: Vec<MedicalCondition>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
