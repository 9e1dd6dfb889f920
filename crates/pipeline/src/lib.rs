//! Pipeline stages between a recommendation request and its rendered result.
//!
//! This crate provides:
//! - RankingEngine trait, the seam to whatever model scores repositories
//! - Preference translation from motivations to ranking weights
//! - Enrichment of ranked ids into display-ready records
//!
//! ## Architecture
//! A request flows through the stages in order:
//! 1. `translate` turns the selected motivations into `WeightParams`
//! 2. a `RankingEngine` returns ordered `RankedEntry` values
//! 3. `Enricher` joins them back into the catalog
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{translate, Enricher, PreferenceSet};
//!
//! let weights = translate(&PreferenceSet::default());
//! let ranked = engine.rank("octo", &dataset.catalog, &dataset.relationships, &weights, 10)?;
//! let records = Enricher::default().enrich(&ranked, &dataset.catalog)?;
//! ```

pub mod enrich;
pub mod preferences;
pub mod traits;

// Re-export main types
pub use enrich::{DEFAULT_LINK_HOST, EnrichedRecord, Enricher, MissingEntity};
pub use preferences::{MotivationTag, PreferenceSet, WeightParams, translate};
pub use traits::{RankedEntry, RankingEngine};
