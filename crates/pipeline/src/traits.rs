//! Core traits for the recommendation pipeline.
//!
//! This module defines the RankingEngine trait: the seam between the request
//! orchestrator and whatever model actually scores repositories.

use anyhow::Result;
use data_loader::{EntityCatalog, EntityId, OwnerId, RelationshipTable};
use serde::{Deserialize, Serialize};

use crate::preferences::WeightParams;

/// One ranked result: a repository and the owner it should be linked under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankedEntry {
    pub entity_id: EntityId,
    pub owner_id: OwnerId,
}

impl RankedEntry {
    pub fn new(entity_id: EntityId, owner_id: impl Into<OwnerId>) -> Self {
        Self {
            entity_id,
            owner_id: owner_id.into(),
        }
    }
}

/// Core trait for ranking repositories for an identity.
///
/// ## Contract
/// - `identity` is present in `relationships`; callers check this first
/// - the result has at most `limit` entries and no duplicate entity ids
/// - the result is ordered by descending relevance; callers don't re-sort
///
/// `Send + Sync` lets one engine serve concurrent requests.
pub trait RankingEngine: Send + Sync {
    /// Returns the name of this engine (for logging/debugging)
    fn name(&self) -> &str;

    fn rank(
        &self,
        identity: &str,
        catalog: &EntityCatalog,
        relationships: &RelationshipTable,
        weights: &WeightParams,
        limit: usize,
    ) -> Result<Vec<RankedEntry>>;
}
