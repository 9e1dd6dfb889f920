//! Core domain types for the repository dataset.
//!
//! Two tables make up a dataset:
//! - the entity catalog (one row per repository, with display metadata)
//! - the relationship table (one row per owner/repository pair, carrying the
//!   embedding consumed by the ranking engine)
//!
//! Both are immutable after load. Lookups go through indices built once when
//! the tables are constructed instead of scanning rows per query.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a repository in the catalog
pub type EntityId = u64;

/// Identity of a user/owner (the GitHub login in the source data)
pub type OwnerId = String;

// =============================================================================
// Entity Catalog
// =============================================================================

/// A single repository row of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub name: String,
    pub owner_user: OwnerId,
    /// `None` when the source row had an empty description
    pub description: Option<String>,
    pub date_pushed: NaiveDateTime,
    pub stars: u32,
    pub has_wiki: bool,
    pub has_discussions: bool,
}

/// Ordered collection of repositories with an id index.
///
/// Load order is preserved in `records`; `by_id` maps an id to its position.
#[derive(Debug, Default)]
pub struct EntityCatalog {
    pub(crate) records: Vec<EntityRecord>,
    pub(crate) by_id: HashMap<EntityId, usize>,
}

impl EntityCatalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a repository by ID
    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.by_id.get(&id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// All records in load order
    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a record, returning `false` if the id was already present.
    ///
    /// A rejected duplicate leaves the catalog unchanged.
    pub fn insert(&mut self, record: EntityRecord) -> bool {
        if self.by_id.contains_key(&record.id) {
            return false;
        }
        self.by_id.insert(record.id, self.records.len());
        self.records.push(record);
        true
    }
}

// =============================================================================
// Relationship Table
// =============================================================================

/// One (owner, repository) pair with its feature embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRow {
    pub owner_user: OwnerId,
    pub entity_id: EntityId,
    pub embedding: Vec<f32>,
}

/// Relationship rows with an owner index.
///
/// The orchestrator only ever asks whether an owner is present; the rows
/// themselves belong to the ranking engine.
#[derive(Debug, Default)]
pub struct RelationshipTable {
    pub(crate) rows: Vec<RelationshipRow>,
    pub(crate) by_owner: HashMap<OwnerId, Vec<usize>>,
}

impl RelationshipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `owner` appears in at least one row (exact match)
    pub fn contains_owner(&self, owner: &str) -> bool {
        self.by_owner.contains_key(owner)
    }

    /// All rows belonging to an owner, in load order
    ///
    /// Returns an empty iterator for unknown owners.
    pub fn rows_for_owner<'a>(&'a self, owner: &str) -> impl Iterator<Item = &'a RelationshipRow> {
        self.by_owner
            .get(owner)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&pos| &self.rows[pos])
    }

    pub fn rows(&self) -> &[RelationshipRow] {
        &self.rows
    }

    /// Distinct owners, unordered
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.by_owner.keys().map(|k| k.as_str())
    }

    pub fn owner_count(&self) -> usize {
        self.by_owner.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn insert(&mut self, row: RelationshipRow) {
        self.by_owner
            .entry(row.owner_user.clone())
            .or_default()
            .push(self.rows.len());
        self.rows.push(row);
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Both tables, loaded together.
///
/// A `Dataset` only exists once both tables parsed and validated, so there is
/// no such thing as a half-loaded dataset.
#[derive(Debug, Default)]
pub struct Dataset {
    pub catalog: EntityCatalog,
    pub relationships: RelationshipTable,
}

impl Dataset {
    /// Get counts for debugging/validation: (entities, relationship rows, owners)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.catalog.len(),
            self.relationships.len(),
            self.relationships.owner_count(),
        )
    }
}
