//! Helper functions to build an OwnerProfile from the relationship table
//!
//! The profile gathers what the ranking engine needs about one owner up
//! front, so scoring doesn't keep going back to the table.

use anyhow::{anyhow, Result};
use data_loader::{EntityId, OwnerId, RelationshipTable};
use std::collections::HashSet;

/// Everything the engine knows about the identity it ranks for
#[derive(Debug, Clone)]
pub struct OwnerProfile {
    pub owner: OwnerId,
    /// Repositories already linked to this owner; never recommended back
    pub owned_entities: HashSet<EntityId>,
    /// Mean of the owner's embeddings
    pub centroid: Vec<f32>,
}

/// Build an OwnerProfile for `owner`
///
/// Fails if the owner has no relationship rows.
pub fn build_owner_profile(relationships: &RelationshipTable, owner: &str) -> Result<OwnerProfile> {
    let mut rows = relationships.rows_for_owner(owner).peekable();
    if rows.peek().is_none() {
        return Err(anyhow!("Owner {} not found", owner));
    }

    let mut owned_entities = HashSet::new();
    let mut sum: Vec<f32> = Vec::new();
    let mut count = 0usize;

    for row in rows {
        owned_entities.insert(row.entity_id);

        if sum.is_empty() {
            sum = vec![0.0; row.embedding.len()];
        }
        for (acc, value) in sum.iter_mut().zip(&row.embedding) {
            *acc += value;
        }
        count += 1;
    }

    let centroid = sum.into_iter().map(|v| v / count as f32).collect();

    Ok(OwnerProfile {
        owner: owner.to_string(),
        owned_entities,
        centroid,
    })
}
