//! Load a dataset directory and report on what came out of it.
//!
//! Run with: cargo run --package data-loader --example benchmark_load -- [data_dir]

use data_loader::{DatasetSource, DirectorySource};
use std::collections::HashMap;
use std::time::Instant;

fn main() -> data_loader::Result<()> {
    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "data/repos".to_string());
    let source = DirectorySource::new(data_dir);

    println!("Loading from {}...", source.describe());
    let start = Instant::now();
    let dataset = source.load()?;
    let elapsed = start.elapsed();

    let (entities, rows, owners) = dataset.counts();
    println!("Loaded in {:?}", elapsed);
    println!("  {} repositories, {} relationship rows, {} owners", entities, rows, owners);
    println!(
        "  {:.0} rows/second",
        (entities + rows) as f64 / elapsed.as_secs_f64()
    );

    let dimension = dataset.relationships.rows().first().map(|r| r.embedding.len());
    match dimension {
        Some(dim) => println!("  Embedding dimension: {}", dim),
        None => println!("  No relationship rows; nobody can be recommended to"),
    }

    // Owners with the most relationship rows dominate ranking cost
    let mut per_owner: HashMap<&str, usize> = HashMap::new();
    for row in dataset.relationships.rows() {
        *per_owner.entry(row.owner_user.as_str()).or_default() += 1;
    }
    let mut busiest: Vec<(&str, usize)> = per_owner.into_iter().collect();
    busiest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    println!("\nBusiest owners:");
    for (owner, count) in busiest.iter().take(5) {
        println!("  {:<24} {} rows", owner, count);
    }

    let supported = dataset
        .catalog
        .records()
        .iter()
        .filter(|r| r.has_wiki || r.has_discussions)
        .count();
    let described = dataset
        .catalog
        .records()
        .iter()
        .filter(|r| r.description.is_some())
        .count();
    println!("\nCatalog:");
    println!("  With learning support: {}/{}", supported, entities);
    println!("  With a description:    {}/{}", described, entities);

    Ok(())
}
