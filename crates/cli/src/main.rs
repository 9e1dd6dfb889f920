use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Dataset, EntityRecord};
use pipeline::{EnrichedRecord, PreferenceSet};
use rand::seq::IndexedRandom;
use server::{Config, RecommendError, RecommendationOrchestrator};
use sources::EmbeddingSimilarityEngine;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

/// repo-recs - GitHub repository recommendations
#[derive(Parser)]
#[command(name = "repo-recs")]
#[command(about = "Recommend repositories to contribute to, based on your motivations", long_about = None)]
struct Cli {
    /// Dataset directory (overrides REPO_RECS_DATA_DIR)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Host used for repository links (overrides REPO_RECS_LINK_HOST)
    #[arg(long, global = true)]
    link_host: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get repository recommendations for a user
    Recommend {
        /// Username to get recommendations for
        #[arg(long)]
        user: String,

        /// Motivation for joining a project ("learning", "networking"); repeatable.
        /// Defaults to all motivations.
        #[arg(long = "motivation")]
        motivations: Vec<String>,

        /// Deselect every motivation
        #[arg(long, conflicts_with = "motivations")]
        no_motivations: bool,

        /// Number of recommendations to return (defaults to REPO_RECS_LIMIT)
        #[arg(long)]
        limit: Option<usize>,

        /// Print the records as JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// Show what the dataset knows about a user
    User {
        /// Username to display
        #[arg(long)]
        user: String,
    },

    /// Search for repositories by name
    Search {
        /// Name to search for (case-insensitive substring match)
        #[arg(long)]
        name: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(host) = cli.link_host {
        config
            .set_link_host(&host)
            .context("Invalid --link-host")?;
    }
    debug!("Using configuration {:?}", config);

    let orchestrator =
        RecommendationOrchestrator::from_config(&config, Arc::new(EmbeddingSimilarityEngine::new()));

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user,
            motivations,
            no_motivations,
            limit,
            json,
        } => {
            let prefs = if no_motivations {
                PreferenceSet::empty()
            } else if motivations.is_empty() {
                PreferenceSet::default()
            } else {
                PreferenceSet::from_labels(motivations.iter().map(String::as_str))
            };
            let limit = limit.unwrap_or(config.default_limit);
            handle_recommend(&orchestrator, &user, &prefs, limit, json).await?
        }
        Commands::User { user } => handle_user(&orchestrator, &user).await?,
        Commands::Search { name } => handle_search(&orchestrator, &name).await?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(orchestrator, requests, concurrent).await?,
    }

    Ok(())
}

/// Load the dataset, reporting how long it took
async fn load_dataset(orchestrator: &RecommendationOrchestrator) -> Result<Arc<Dataset>> {
    println!("Fetching repository dataset...");
    let start = Instant::now();
    let dataset = orchestrator
        .dataset()
        .await
        .context("Failed to load repository dataset")?;
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());
    Ok(dataset)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    user: &str,
    prefs: &PreferenceSet,
    limit: usize,
    json: bool,
) -> Result<()> {
    if !json {
        load_dataset(orchestrator).await?;
    }

    match orchestrator.recommend(user, prefs, limit).await {
        Ok(recommendations) if json => {
            println!("{}", serde_json::to_string_pretty(&recommendations)?);
            Ok(())
        }
        Ok(recommendations) => {
            print_recommendations(&recommendations);
            Ok(())
        }
        Err(err) if err.is_validation() => {
            eprintln!("{} {}", "✗".red(), corrective_message(&err));
            std::process::exit(2);
        }
        Err(err) => Err(anyhow::Error::new(err).context("Failed to generate recommendations")),
    }
}

/// What the user should do about a validation error
fn corrective_message(err: &RecommendError) -> String {
    match err {
        RecommendError::UserNotFound { identity } => format!(
            "User '{}' not found in the dataset. Please enter a valid username.",
            identity
        ),
        RecommendError::InvalidLimit => "Please ask for at least one recommendation.".to_string(),
        other => other.to_string(),
    }
}

/// Handle the 'user' command
async fn handle_user(orchestrator: &RecommendationOrchestrator, user: &str) -> Result<()> {
    let dataset = load_dataset(orchestrator).await?;

    println!("{}", format!("User: {}", user).bold().blue());

    if !dataset.relationships.contains_owner(user) {
        println!(
            "{}Not in the relationship table; recommendations are unavailable",
            "• ".red()
        );
    } else {
        let linked = dataset.relationships.rows_for_owner(user).count();
        println!("{}Linked repositories: {}", "• ".green(), linked);
    }

    // Repositories the catalog lists under this owner
    let mut owned: Vec<&EntityRecord> = dataset
        .catalog
        .records()
        .iter()
        .filter(|record| record.owner_user == user)
        .collect();
    owned.sort_by(|a, b| b.stars.cmp(&a.stars).then_with(|| a.id.cmp(&b.id)));

    let total_stars: u64 = owned.iter().map(|r| r.stars as u64).sum();
    println!("{}Owned repositories: {}", "• ".cyan(), owned.len());
    println!("{}Stars across owned repositories: {}", "• ".cyan(), total_stars);

    for record in owned.iter().take(10) {
        println!(
            "  - {} ({} stars, last pushed {})",
            record.name,
            record.stars,
            record.date_pushed.date()
        );
    }
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(orchestrator: &RecommendationOrchestrator, name: &str) -> Result<()> {
    let dataset = load_dataset(orchestrator).await?;
    let needle = name.to_lowercase();

    // (relevance, record): 0 for exact name matches, 1 for substring matches
    let mut matches: Vec<(u8, &EntityRecord)> = dataset
        .catalog
        .records()
        .iter()
        .filter_map(|record| {
            let haystack = record.name.to_lowercase();
            if haystack == needle {
                Some((0, record))
            } else if haystack.contains(&needle) {
                Some((1, record))
            } else {
                None
            }
        })
        .collect();

    // Exact matches first, then by stars
    matches.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| b.1.stars.cmp(&a.1.stars))
            .then_with(|| a.1.id.cmp(&b.1.id))
    });

    println!("{}", format!("Search results for '{}':", name).bold().blue());
    for (_, record) in matches.iter().take(20) {
        println!(
            "{}: {}/{} ({} stars) {}",
            record.id,
            record.owner_user,
            record.name,
            record.stars,
            record.description.as_deref().unwrap_or("")
        );
    }
    if matches.is_empty() {
        println!("No repositories matched.");
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: RecommendationOrchestrator,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("requests must be greater than zero"));
    }

    let dataset = load_dataset(&orchestrator).await?;
    let owners: Vec<String> = dataset.relationships.owners().map(str::to_string).collect();
    if owners.is_empty() {
        return Err(anyhow!("Dataset has no users to benchmark with"));
    }

    // Pick random users from the relationship table
    let users: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| owners.choose(&mut rng).cloned())
            .collect()
    };

    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = vec![];
    for user in users {
        let orchestrator = orchestrator.clone();
        let permits = Arc::clone(&permits);
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            orchestrator
                .recommend(&user, &PreferenceSet::default(), 10)
                .await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = wall_clock.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / (timings.len() as u32);
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Render recommendations as cards
fn print_recommendations(recommendations: &[EnrichedRecord]) {
    println!("{}", "Recommendations".bold().blue());
    if recommendations.is_empty() {
        println!("No recommendations for this user.");
        return;
    }

    for (index, rec) in recommendations.iter().enumerate() {
        let support = if rec.learning_support {
            rec.learning_support_label().green()
        } else {
            rec.learning_support_label().red()
        };

        println!();
        println!("{}. {}", (index + 1).to_string().green(), rec.name.bold());
        if let Some(description) = &rec.description {
            println!("   {}", description);
        }
        println!("   ⭐ received: {}", rec.stars);
        println!("   Last updated: {}", rec.formatted_date());
        println!("   Learning support: {}", support);
        println!("   {}", rec.url.cyan());
    }
}
