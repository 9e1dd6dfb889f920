//! # Recommendation Orchestrator
//!
//! This module coordinates one recommendation request:
//! 1. Get the dataset from the session cache (loading it on first use)
//! 2. Check the identity exists in the relationship table
//! 3. Translate motivations into ranking weights
//! 4. Rank on the blocking pool
//! 5. Enrich ranked ids into display-ready records, in ranking order
//!
//! Nothing is retried here. Load and engine failures go straight back to the
//! caller as `RecommendError`.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};

use data_loader::{Dataset, DirectorySource};
use pipeline::{
    EnrichedRecord, Enricher, PreferenceSet, RankedEntry, RankingEngine, WeightParams, translate,
};

use crate::cache::DatasetCache;
use crate::config::Config;
use crate::error::RecommendError;

/// Main orchestrator that coordinates a recommendation request.
///
/// Cloning is cheap and clones share the same cache, so one orchestrator per
/// session can be handed to every request handler.
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    cache: Arc<DatasetCache>,
    engine: Arc<dyn RankingEngine>,
    enricher: Enricher,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator around an existing cache and engine
    pub fn new(cache: Arc<DatasetCache>, engine: Arc<dyn RankingEngine>) -> Self {
        Self {
            cache,
            engine,
            enricher: Enricher::default(),
        }
    }

    /// Create an orchestrator that loads from `config.data_dir`
    pub fn from_config(config: &Config, engine: Arc<dyn RankingEngine>) -> Self {
        let source = Arc::new(DirectorySource::new(config.data_dir.clone()));
        Self::new(Arc::new(DatasetCache::new(source)), engine)
            .with_link_host(config.link_host.clone())
    }

    /// Use a different host for repository links (default: github.com)
    pub fn with_link_host(mut self, host: impl Into<String>) -> Self {
        self.enricher = Enricher::new(host);
        self
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// The session's dataset, loading it if needed
    pub async fn dataset(&self) -> Result<Arc<Dataset>, RecommendError> {
        Ok(self.cache.get_or_load().await?)
    }

    /// Main entry point: recommend repositories for an identity
    ///
    /// # Arguments
    /// * `identity` - Owner login, matched exactly against the relationship table
    /// * `selected` - Motivations picked by the user
    /// * `limit` - Maximum number of recommendations (must be positive)
    ///
    /// # Returns
    /// Enriched records in the ranking engine's order
    #[instrument(skip(self, selected))]
    pub async fn recommend(
        &self,
        identity: &str,
        selected: &PreferenceSet,
        limit: usize,
    ) -> Result<Vec<EnrichedRecord>, RecommendError> {
        let start_time = Instant::now();

        if limit == 0 {
            return Err(RecommendError::InvalidLimit);
        }

        let dataset = self.dataset().await?;
        Self::validate_identity(&dataset, identity)?;

        let weights = translate(selected);
        debug!(
            "Weights for {}: supportive_env={}, activity={}",
            identity, weights.supportive_env_weight, weights.activity_weight
        );

        let ranked = self.rank(Arc::clone(&dataset), identity, weights, limit).await?;
        let records = self.enrich(&ranked, &dataset)?;

        info!(
            "Recommended {} repositories for {} in {:.2?}",
            records.len(),
            identity,
            start_time.elapsed()
        );
        Ok(records)
    }

    /// Reject identities with no relationship rows before the engine sees them
    fn validate_identity(dataset: &Dataset, identity: &str) -> Result<(), RecommendError> {
        if dataset.relationships.contains_owner(identity) {
            Ok(())
        } else {
            info!("Identity {} not found in relationship table", identity);
            Err(RecommendError::UserNotFound {
                identity: identity.to_string(),
            })
        }
    }

    /// Run the engine on the blocking pool and hold it to its contract
    async fn rank(
        &self,
        dataset: Arc<Dataset>,
        identity: &str,
        weights: WeightParams,
        limit: usize,
    ) -> Result<Vec<RankedEntry>, RecommendError> {
        let engine = Arc::clone(&self.engine);
        let owned_identity = identity.to_string();

        let ranked = tokio::task::spawn_blocking(move || {
            engine.rank(
                &owned_identity,
                &dataset.catalog,
                &dataset.relationships,
                &weights,
                limit,
            )
        })
        .await
        .map_err(|e| RecommendError::RankingEngine(anyhow::Error::new(e).context("Ranking task panicked")))?
        .map_err(RecommendError::RankingEngine)?;

        Ok(self.enforce_contract(ranked, limit))
    }

    /// Drop duplicate ids and anything past `limit`, keeping the engine's order
    fn enforce_contract(&self, ranked: Vec<RankedEntry>, limit: usize) -> Vec<RankedEntry> {
        let returned = ranked.len();
        let mut seen = HashSet::with_capacity(returned);
        let mut kept: Vec<RankedEntry> = ranked
            .into_iter()
            .filter(|entry| seen.insert(entry.entity_id))
            .collect();

        if kept.len() != returned {
            warn!(
                "{} returned {} duplicate repositories",
                self.engine.name(),
                returned - kept.len()
            );
        }
        if kept.len() > limit {
            warn!(
                "{} returned {} repositories for limit {}",
                self.engine.name(),
                kept.len(),
                limit
            );
            kept.truncate(limit);
        }
        kept
    }

    fn enrich(
        &self,
        ranked: &[RankedEntry],
        dataset: &Dataset,
    ) -> Result<Vec<EnrichedRecord>, RecommendError> {
        self.enricher
            .enrich(ranked, &dataset.catalog)
            .map_err(|missing| {
                error!(
                    entity_id = missing.entity_id,
                    rank = missing.rank,
                    engine = self.engine.name(),
                    "Ranking engine returned a repository missing from the catalog"
                );
                RecommendError::DataConsistency {
                    entity_id: missing.entity_id,
                }
            })
    }
}
