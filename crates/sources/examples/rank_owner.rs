//! Example: Rank repositories for an owner
//!
//! Run with: cargo run --package sources --example rank_owner -- <owner>
//!
//! This example shows how to:
//! 1. Load the repository dataset
//! 2. Build the owner profile
//! 3. Rank with each combination of motivations
//! 4. Display the results

use data_loader::Dataset;
use pipeline::{translate, MotivationTag, PreferenceSet, RankingEngine};
use sources::{build_owner_profile, EmbeddingSimilarityEngine};
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== Repository Ranking Example ===\n");

    println!("Loading repository dataset...");
    let start = Instant::now();
    let dataset = Dataset::load_from_files(Path::new("data/repos"))?;
    println!("Loaded dataset in {:?}\n", start.elapsed());

    let owner = std::env::args().nth(1).unwrap_or_else(|| "octo".to_string());
    let profile = build_owner_profile(&dataset.relationships, &owner)?;
    println!("Target owner: {}", profile.owner);
    println!("  Linked repositories: {}", profile.owned_entities.len());
    println!("  Embedding dimension: {}\n", profile.centroid.len());

    let engine = EmbeddingSimilarityEngine::new();
    let variants = [
        ("no motivations", PreferenceSet::empty()),
        ("learning", PreferenceSet::empty().with(MotivationTag::Learning)),
        ("networking", PreferenceSet::empty().with(MotivationTag::Networking)),
        ("both", PreferenceSet::default()),
    ];

    for (label, prefs) in variants {
        let start = Instant::now();
        let ranked = engine.rank(
            &owner,
            &dataset.catalog,
            &dataset.relationships,
            &translate(&prefs),
            5,
        )?;
        println!("Top 5 ({}) in {:?}:", label, start.elapsed());
        for (i, entry) in ranked.iter().enumerate() {
            if let Some(record) = dataset.catalog.get(entry.entity_id) {
                println!("  {}. {}/{} ({} stars)", i + 1, entry.owner_id, record.name, record.stars);
            }
        }
        println!();
    }

    Ok(())
}
