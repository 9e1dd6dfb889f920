//! Server crate for the repository recommendation service.
//!
//! This crate contains the orchestrator that turns a recommendation request
//! into an ordered list of display-ready records, plus the session-scoped
//! dataset cache it depends on.

pub mod cache;
pub mod config;
pub mod error;
pub mod orchestrator;

pub use cache::DatasetCache;
pub use config::{Config, ConfigError};
pub use error::RecommendError;
pub use orchestrator::RecommendationOrchestrator;
