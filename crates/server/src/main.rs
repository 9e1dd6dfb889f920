//! Simple test harness for the recommendation orchestrator.
//!
//! This binary runs one request end to end against the configured dataset:
//!
//! ```text
//! server <identity> [limit]
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use pipeline::PreferenceSet;
use server::{Config, RecommendationOrchestrator};
use sources::EmbeddingSimilarityEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info,server=debug,sources=debug,pipeline=debug")
        .init();

    info!("Starting repository recommendation test harness");

    let config = Config::from_env().context("Invalid configuration")?;
    let mut args = std::env::args().skip(1);
    let identity = args.next().context("usage: server <identity> [limit]")?;
    let limit = match args.next() {
        Some(raw) => raw.parse().context("limit must be a positive integer")?,
        None => config.default_limit,
    };

    let orchestrator =
        RecommendationOrchestrator::from_config(&config, Arc::new(EmbeddingSimilarityEngine::new()));

    info!("Getting recommendations for {} (limit: {})", identity, limit);
    let recommendations = orchestrator
        .recommend(&identity, &PreferenceSet::default(), limit)
        .await?;

    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} (stars: {}, last updated: {}, learning support: {}) {}",
            rank + 1,
            rec.name,
            rec.stars,
            rec.formatted_date(),
            rec.learning_support_label(),
            rec.url
        );
    }

    Ok(())
}
