//! # Sources Crate
//!
//! Ranking engines that plug into the orchestrator through
//! `pipeline::RankingEngine`.
//!
//! ## Components
//!
//! ### Owner Profile
//! Aggregates an owner's relationship rows once per request:
//! - repositories the owner is already linked to
//! - the centroid of the owner's embeddings
//!
//! ### Embedding Similarity Engine
//! Reference engine for running the orchestrator without an external model:
//! - cosine similarity between the owner centroid and each repository
//! - supportive-environment signal (wiki, discussions), weighted by `Learning`
//! - activity signal (recent pushes, stars), weighted by `Networking`
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::EmbeddingSimilarityEngine;
//! use pipeline::{translate, PreferenceSet, RankingEngine};
//!
//! let engine = EmbeddingSimilarityEngine::new();
//! let weights = translate(&PreferenceSet::default());
//! let ranked = engine.rank("octo", &dataset.catalog, &dataset.relationships, &weights, 10)?;
//! ```

pub mod owner_profile;
pub mod similarity;

pub use owner_profile::{OwnerProfile, build_owner_profile};
pub use similarity::EmbeddingSimilarityEngine;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use data_loader::{Dataset, EntityRecord, RelationshipRow};
    use pipeline::{MotivationTag, PreferenceSet, RankingEngine, translate};
    use std::collections::HashSet;

    fn record(id: u64, owner: &str, day: u32, stars: u32, wiki: bool, discussions: bool) -> EntityRecord {
        EntityRecord {
            id,
            name: format!("repo-{}", id),
            owner_user: owner.to_string(),
            description: None,
            date_pushed: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            stars,
            has_wiki: wiki,
            has_discussions: discussions,
        }
    }

    fn row(owner: &str, entity_id: u64, embedding: [f32; 2]) -> RelationshipRow {
        RelationshipRow {
            owner_user: owner.to_string(),
            entity_id,
            embedding: embedding.to_vec(),
        }
    }

    /// octo owns repo 1; repos 2..=5 belong to other owners with varying
    /// similarity and signals
    fn create_test_dataset() -> Dataset {
        Dataset::from_parts(
            vec![
                record(1, "octo", 1, 10, false, false),
                record(2, "a", 1, 0, false, false),
                record(3, "b", 1, 0, true, true),
                record(4, "c", 31, 500, false, false),
                record(5, "d", 1, 0, false, false),
            ],
            vec![
                row("octo", 1, [1.0, 0.0]),
                row("a", 2, [1.0, 0.05]),
                row("b", 3, [1.0, 0.3]),
                row("c", 4, [1.0, 0.3]),
                row("d", 5, [0.0, 1.0]),
            ],
        )
        .unwrap()
    }

    fn ranked_ids(dataset: &Dataset, prefs: &PreferenceSet, limit: usize) -> Vec<u64> {
        EmbeddingSimilarityEngine::new()
            .rank(
                "octo",
                &dataset.catalog,
                &dataset.relationships,
                &translate(prefs),
                limit,
            )
            .unwrap()
            .into_iter()
            .map(|e| e.entity_id)
            .collect()
    }

    #[test]
    fn test_excludes_owned_repositories() {
        let dataset = create_test_dataset();
        let ids = ranked_ids(&dataset, &PreferenceSet::default(), 10);

        assert!(!ids.contains(&1));
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_respects_limit_without_duplicates() {
        let dataset = create_test_dataset();
        for limit in 0..6 {
            let ids = ranked_ids(&dataset, &PreferenceSet::default(), limit);
            assert!(ids.len() <= limit);
            let unique: HashSet<_> = ids.iter().collect();
            assert_eq!(unique.len(), ids.len());
        }
    }

    #[test]
    fn test_similarity_only_without_preferences() {
        let dataset = create_test_dataset();
        let ids = ranked_ids(&dataset, &PreferenceSet::empty(), 10);

        // 3 and 4 have identical embeddings, so the tie goes to the lower id
        assert_eq!(ids, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_learning_favours_supportive_repositories() {
        let dataset = create_test_dataset();
        let ids = ranked_ids(&dataset, &PreferenceSet::empty().with(MotivationTag::Learning), 10);

        // Wiki + discussions lifts repo 3 above the closer repo 2
        assert_eq!(ids[0], 3);
    }

    #[test]
    fn test_networking_favours_active_repositories() {
        let dataset = create_test_dataset();
        let ids = ranked_ids(&dataset, &PreferenceSet::empty().with(MotivationTag::Networking), 10);

        // Newest push and most stars lift repo 4 to the top
        assert_eq!(ids[0], 4);
    }

    #[test]
    fn test_ranked_owner_comes_from_catalog() {
        let dataset = create_test_dataset();
        let ranked = EmbeddingSimilarityEngine::new()
            .rank(
                "octo",
                &dataset.catalog,
                &dataset.relationships,
                &translate(&PreferenceSet::default()),
                10,
            )
            .unwrap();

        for entry in ranked {
            let record = dataset.catalog.get(entry.entity_id).unwrap();
            assert_eq!(entry.owner_id, record.owner_user);
        }
    }

    #[test]
    fn test_unknown_identity_is_an_error() {
        let dataset = create_test_dataset();
        let result = EmbeddingSimilarityEngine::new().rank(
            "ghost",
            &dataset.catalog,
            &dataset.relationships,
            &translate(&PreferenceSet::default()),
            10,
        );
        assert!(result.is_err());
    }
}
