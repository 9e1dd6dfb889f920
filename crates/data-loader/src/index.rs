//! Dataset building and indexing logic.
//!
//! Builds a `Dataset` from parsed rows:
//! - primary catalog with its id index
//! - relationship table with its owner index
//! - integrity checks across the two tables

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info};

/// File name of the entity catalog inside a dataset directory
pub const REPOS_FILE: &str = "repos.dat";

/// File name of the relationship table inside a dataset directory
pub const RELATIONSHIPS_FILE: &str = "relationships.dat";

impl Dataset {
    /// Load both tables from a directory.
    ///
    /// Steps:
    /// 1. Parse repos.dat and relationships.dat in parallel
    /// 2. Build the catalog and relationship indices
    /// 3. Validate cross-table integrity
    ///
    /// Either both tables load and validate, or an error is returned.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading repository dataset from {:?}", data_dir);

        let repos_path = data_dir.join(REPOS_FILE);
        let relationships_path = data_dir.join(RELATIONSHIPS_FILE);

        let (records, rows) = rayon::join(
            || parser::parse_repos(&repos_path),
            || parser::parse_relationships(&relationships_path),
        );
        let records = records?;
        let rows = rows?;

        info!(
            "Parsed {} repositories and {} relationship rows",
            records.len(),
            rows.len()
        );

        let dataset = Self::from_parts(records, rows)?;

        debug!("Dataset successfully built and validated");
        Ok(dataset)
    }

    /// Build and validate a dataset from already-parsed rows
    pub fn from_parts(records: Vec<EntityRecord>, rows: Vec<RelationshipRow>) -> Result<Self> {
        let mut catalog = EntityCatalog::new();
        for record in records {
            let id = record.id;
            if !catalog.insert(record) {
                return Err(DataLoadError::ValidationError(format!(
                    "duplicate repository id {}",
                    id
                )));
            }
        }

        let mut relationships = RelationshipTable::new();
        for row in rows {
            relationships.insert(row);
        }

        let dataset = Dataset {
            catalog,
            relationships,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - every relationship row references a repository in the catalog
    /// - every embedding is non-empty and has the same dimension
    pub fn validate(&self) -> Result<()> {
        let mut dimension: Option<usize> = None;

        for row in self.relationships.rows() {
            if !self.catalog.contains(row.entity_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Repository".to_string(),
                    id: row.entity_id,
                });
            }

            if row.embedding.is_empty() {
                return Err(DataLoadError::InvalidValue {
                    field: "embedding".to_string(),
                    value: format!("empty for {}/{}", row.owner_user, row.entity_id),
                });
            }

            match dimension {
                None => dimension = Some(row.embedding.len()),
                Some(dim) if dim != row.embedding.len() => {
                    return Err(DataLoadError::ValidationError(format!(
                        "embedding dimension mismatch for {}/{}: expected {}, found {}",
                        row.owner_user,
                        row.entity_id,
                        dim,
                        row.embedding.len()
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
