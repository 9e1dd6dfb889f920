//! Error types for recommendation requests.
//!
//! Validation errors (`UserNotFound`, `InvalidLimit`) are the caller's to
//! fix. Everything else is an infrastructure failure or a data defect, and a
//! front end should show a generic failure for those.

use std::sync::Arc;

use data_loader::{DataLoadError, EntityId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendError {
    /// The identity has no rows in the relationship table
    #[error("User {identity} not found in the dataset")]
    UserNotFound { identity: String },

    /// A request asked for zero recommendations
    #[error("Recommendation limit must be greater than zero")]
    InvalidLimit,

    /// The dataset could not be loaded; retrying the request retries the load.
    /// Shared with every request that waited on the same failed load.
    #[error("Failed to load dataset")]
    DataLoad(#[from] Arc<DataLoadError>),

    /// The ranking engine returned a repository the catalog doesn't have
    #[error("Ranked repository {entity_id} is missing from the catalog")]
    DataConsistency { entity_id: EntityId },

    #[error("Ranking engine failed")]
    RankingEngine(#[source] anyhow::Error),
}

impl From<DataLoadError> for RecommendError {
    fn from(err: DataLoadError) -> Self {
        RecommendError::DataLoad(Arc::new(err))
    }
}

impl RecommendError {
    /// Whether the caller can fix this by changing the request
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RecommendError::UserNotFound { .. } | RecommendError::InvalidLimit
        )
    }
}
