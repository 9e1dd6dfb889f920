//! Embedding similarity engine
//!
//! Reference `RankingEngine`: ranks repositories by how close their
//! embedding is to the owner's profile, nudged by the preference weights.
//!
//! ## Algorithm
//! 1. Build the owner profile (centroid embedding + owned repositories)
//! 2. For every catalog repository with an embedding that the owner doesn't
//!    already own, score:
//!    `cosine(centroid, embedding) + signal_scale * (supportive_env_weight * supportive + activity_weight * activity)`
//!    - supportive = half for a wiki, half for discussions
//!    - activity = half recency (exponential decay from the newest push in
//!      the catalog), half popularity (log stars over log max stars)
//! 3. Sort by score descending, ties by ascending id, and keep `limit`

use crate::owner_profile::build_owner_profile;
use anyhow::Result;
use chrono::NaiveDateTime;
use data_loader::{EntityCatalog, EntityId, EntityRecord, RelationshipTable};
use pipeline::{RankedEntry, RankingEngine, WeightParams};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

const SECONDS_PER_DAY: f32 = 86_400.0;

/// Ranks repositories by embedding similarity plus preference-weighted signals
#[derive(Debug, Clone)]
pub struct EmbeddingSimilarityEngine {
    /// How much the preference signals can move a score relative to similarity
    signal_scale: f32,

    /// Days after which the recency signal halves
    recency_half_life_days: f32,
}

impl EmbeddingSimilarityEngine {
    pub fn new() -> Self {
        Self {
            signal_scale: 0.25,
            recency_half_life_days: 180.0,
        }
    }

    /// Configure the preference signal scale (default: 0.25)
    pub fn with_signal_scale(mut self, scale: f32) -> Self {
        self.signal_scale = scale;
        self
    }

    /// Configure the recency half-life in days (default: 180)
    pub fn with_recency_half_life_days(mut self, days: f32) -> Self {
        self.recency_half_life_days = days;
        self
    }

    fn supportive_signal(record: &EntityRecord) -> f32 {
        0.5 * record.has_wiki as u8 as f32 + 0.5 * record.has_discussions as u8 as f32
    }

    fn activity_signal(&self, record: &EntityRecord, bounds: &CatalogBounds) -> f32 {
        let age_days = (bounds.newest_push - record.date_pushed).num_seconds().max(0) as f32
            / SECONDS_PER_DAY;
        let recency = 0.5f32.powf(age_days / self.recency_half_life_days);

        let popularity = if bounds.max_stars == 0 {
            0.0
        } else {
            (1.0 + record.stars as f32).ln() / (1.0 + bounds.max_stars as f32).ln()
        };

        0.5 * recency + 0.5 * popularity
    }
}

impl Default for EmbeddingSimilarityEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog-wide reference points for the activity signal
struct CatalogBounds {
    newest_push: NaiveDateTime,
    max_stars: u32,
}

impl CatalogBounds {
    fn from_catalog(catalog: &EntityCatalog) -> Option<Self> {
        let newest_push = catalog.records().iter().map(|r| r.date_pushed).max()?;
        let max_stars = catalog.records().iter().map(|r| r.stars).max().unwrap_or(0);
        Some(Self {
            newest_push,
            max_stars,
        })
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

impl RankingEngine for EmbeddingSimilarityEngine {
    fn name(&self) -> &str {
        "EmbeddingSimilarityEngine"
    }

    #[instrument(skip(self, catalog, relationships, weights), fields(engine = "embedding_similarity"))]
    fn rank(
        &self,
        identity: &str,
        catalog: &EntityCatalog,
        relationships: &RelationshipTable,
        weights: &WeightParams,
        limit: usize,
    ) -> Result<Vec<RankedEntry>> {
        let profile = build_owner_profile(relationships, identity)?;
        let Some(bounds) = CatalogBounds::from_catalog(catalog) else {
            return Ok(Vec::new());
        };

        // First row wins when several owners share a repository
        let mut embeddings: HashMap<EntityId, &[f32]> = HashMap::new();
        for row in relationships.rows() {
            embeddings
                .entry(row.entity_id)
                .or_insert(row.embedding.as_slice());
        }

        let mut scored: Vec<(&EntityRecord, f32)> = catalog
            .records()
            .par_iter()
            .filter(|record| !profile.owned_entities.contains(&record.id))
            .filter_map(|record| {
                let embedding = embeddings.get(&record.id)?;
                let similarity = cosine_similarity(&profile.centroid, embedding);
                let signals = weights.supportive_env_weight * Self::supportive_signal(record)
                    + weights.activity_weight * self.activity_signal(record, &bounds);
                Some((record, similarity + self.signal_scale * signals))
            })
            .collect();

        debug!(
            "Scored {} candidates for {} (owned: {})",
            scored.len(),
            identity,
            profile.owned_entities.len()
        );

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(record, _)| RankedEntry::new(record.id, record.owner_user.clone()))
            .collect())
    }
}
