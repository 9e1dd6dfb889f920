//! Result enrichment.
//!
//! Joins ranked ids back into the catalog and derives the display fields:
//! - calendar date of the last push (time of day dropped)
//! - learning-support flag (`has_wiki || has_discussions`)
//! - canonical link `https://<host>/<owner>/<name>`
//!
//! Output order always equals ranking order.

use chrono::NaiveDate;
use data_loader::{EntityCatalog, EntityId, EntityRecord, OwnerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::RankedEntry;

/// Host used for repository links unless configured otherwise
pub const DEFAULT_LINK_HOST: &str = "github.com";

/// Display format for `last_pushed`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A ranked id had no catalog row
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ranked repository {entity_id} (rank {rank}) is not in the catalog")]
pub struct MissingEntity {
    pub entity_id: EntityId,
    /// 0-based position in the ranked result
    pub rank: usize,
}

/// A display-ready recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub entity_id: EntityId,
    pub name: String,
    /// Owner the link points at, as returned by the ranking engine
    pub owner: OwnerId,
    pub description: Option<String>,
    pub last_pushed: NaiveDate,
    pub stars: u32,
    pub learning_support: bool,
    pub url: String,
}

impl EnrichedRecord {
    /// Build the record for one ranked entry and its catalog row
    pub fn from_parts(entry: &RankedEntry, record: &EntityRecord, link_host: &str) -> Self {
        Self {
            entity_id: record.id,
            name: record.name.clone(),
            owner: entry.owner_id.clone(),
            description: record.description.clone(),
            last_pushed: record.date_pushed.date(),
            stars: record.stars,
            learning_support: record.has_wiki || record.has_discussions,
            url: repository_url(link_host, &entry.owner_id, &record.name),
        }
    }

    /// `last_pushed` as YYYY-MM-DD
    pub fn formatted_date(&self) -> String {
        self.last_pushed.format(DATE_FORMAT).to_string()
    }

    pub fn learning_support_label(&self) -> &'static str {
        if self.learning_support { "Available" } else { "Unavailable" }
    }
}

pub fn repository_url(host: &str, owner: &str, name: &str) -> String {
    format!("https://{}/{}/{}", host.trim_end_matches('/'), owner, name)
}

/// Turns ranked ids into display-ready records
#[derive(Debug, Clone)]
pub struct Enricher {
    link_host: String,
}

impl Enricher {
    pub fn new(link_host: impl Into<String>) -> Self {
        Self {
            link_host: link_host.into(),
        }
    }

    pub fn link_host(&self) -> &str {
        &self.link_host
    }

    /// Enrich every entry, in order.
    ///
    /// Stops at the first id missing from the catalog. Missing ids are a data
    /// defect, so they are reported instead of skipped.
    pub fn enrich(
        &self,
        ranked: &[RankedEntry],
        catalog: &EntityCatalog,
    ) -> Result<Vec<EnrichedRecord>, MissingEntity> {
        ranked
            .iter()
            .enumerate()
            .map(|(rank, entry)| {
                catalog
                    .get(entry.entity_id)
                    .map(|record| EnrichedRecord::from_parts(entry, record, &self.link_host))
                    .ok_or(MissingEntity {
                        entity_id: entry.entity_id,
                        rank,
                    })
            })
            .collect()
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_HOST)
    }
}
