use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use macroswap::cli::parse_args;
use macroswap::estimate_macros;
use macroswap::fdc::FdcClient;
use macroswap::recipe::{Recipe, UserContext};
use macroswap::SubstitutionEngine;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli_args = parse_args();

    let recipe_content = fs::read_to_string(&cli_args.recipe_file)
        .await
        .with_context(|| format!("Failed to read recipe file '{}'", cli_args.recipe_file))?;
    let recipe: Recipe = serde_json::from_str(&recipe_content)
        .with_context(|| format!("Failed to parse recipe JSON from '{}'", cli_args.recipe_file))?;
    info!(title = %recipe.title, ingredients = recipe.ingredients.len(), "recipe loaded");

    let client = Arc::new(FdcClient::from_env().context("Failed to build nutrition client")?);

    let estimate = estimate_macros(client.as_ref(), &recipe, None)
        .await
        .context("Macro estimation failed")?;

    let mut output = serde_json::json!({ "estimate": estimate });

    if let Some(goal) = cli_args.goal {
        let ctx = UserContext {
            allergens: cli_args
                .allergens
                .iter()
                .map(|a| a.trim().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect::<BTreeSet<_>>(),
            diet_style: cli_args.diet,
            avoid_list: cli_args.avoid.clone(),
            conditions: cli_args.conditions.iter().copied().collect(),
        };
        let engine = SubstitutionEngine::new(client);
        let plan = engine
            .build_substitution_plan(&recipe, goal, &ctx, Some(&estimate))
            .await;
        output["substitution_plan"] = serde_json::to_value(&plan)?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
