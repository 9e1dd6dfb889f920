//! # Data Loader Crate
//!
//! This crate handles loading and indexing the repository dataset that backs
//! recommendations.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (EntityRecord, RelationshipRow, EntityCatalog, RelationshipTable, Dataset)
//! - **parser**: Parse .dat files into Rust structs
//! - **index**: Build indices and validate cross-table integrity
//! - **source**: The `DatasetSource` load interface and its directory implementation
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_files(Path::new("data/repos"))?;
//!
//! let repo = dataset.catalog.get(42).unwrap();
//! let known = dataset.relationships.contains_owner("octo");
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod source;
pub mod types;

pub use error::{DataLoadError, Result};
pub use index::{RELATIONSHIPS_FILE, REPOS_FILE};
pub use source::{DatasetSource, DirectorySource};
pub use types::{
    Dataset, EntityCatalog, EntityId, EntityRecord, OwnerId, RelationshipRow, RelationshipTable,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_record(id: EntityId) -> EntityRecord {
        EntityRecord {
            id,
            name: "alpha".to_string(),
            owner_user: "octo".to_string(),
            description: Some("demo".to_string()),
            date_pushed: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            stars: 5,
            has_wiki: true,
            has_discussions: false,
        }
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::default();
        assert_eq!(dataset.counts(), (0, 0, 0));
        assert!(dataset.catalog.is_empty());
        assert!(dataset.relationships.is_empty());
    }

    #[test]
    fn test_catalog_insert_and_get() {
        let mut catalog = EntityCatalog::new();
        assert!(catalog.insert(sample_record(42)));

        let retrieved = catalog.get(42).unwrap();
        assert_eq!(retrieved.name, "alpha");
        assert_eq!(retrieved.stars, 5);
    }

    #[test]
    fn test_catalog_rejects_duplicate_id() {
        let mut catalog = EntityCatalog::new();
        assert!(catalog.insert(sample_record(42)));

        let mut dup = sample_record(42);
        dup.name = "other".to_string();
        assert!(!catalog.insert(dup));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(42).unwrap().name, "alpha");
    }

    #[test]
    fn test_catalog_preserves_load_order() {
        let mut catalog = EntityCatalog::new();
        for id in [5, 1, 3] {
            catalog.insert(sample_record(id));
        }
        let ids: Vec<_> = catalog.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 1, 3]);
    }

    #[test]
    fn test_relationship_membership_is_exact() {
        let mut table = RelationshipTable::new();
        table.insert(RelationshipRow {
            owner_user: "octo".to_string(),
            entity_id: 42,
            embedding: vec![1.0],
        });

        assert!(table.contains_owner("octo"));
        assert!(!table.contains_owner("Octo"));
        assert!(!table.contains_owner(" octo"));
        assert_eq!(table.rows_for_owner("ghost").count(), 0);
    }

    #[test]
    fn test_empty_queries() {
        let dataset = Dataset::default();

        assert!(dataset.catalog.get(999).is_none());
        assert!(!dataset.relationships.contains_owner("ghost"));
        assert_eq!(dataset.relationships.owners().count(), 0);
    }
}
