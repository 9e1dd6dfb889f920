//! Preference translation.
//!
//! Users pick qualitative motivations for joining a project; the ranking
//! engine wants numeric weights. Each known motivation maps to exactly one
//! coefficient: 1.0 when selected, 0.0 otherwise.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Motivations a user can select
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotivationTag {
    /// Wants a supportive environment to learn in
    Learning,
    /// Wants an active project to network in
    Networking,
}

impl MotivationTag {
    /// Every tag the translator knows about
    pub const ALL: [MotivationTag; 2] = [MotivationTag::Learning, MotivationTag::Networking];

    /// The label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            MotivationTag::Learning => "Learning",
            MotivationTag::Networking => "Networking with others",
        }
    }

    /// Parse a user-facing label, case-insensitively.
    ///
    /// Returns `None` for labels this version doesn't know.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "learning" => Some(MotivationTag::Learning),
            "networking" | "networking with others" => Some(MotivationTag::Networking),
            _ => None,
        }
    }
}

impl fmt::Display for MotivationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The set of motivations selected for one request.
///
/// Defaults to every known tag, matching the front end's initial selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceSet {
    tags: HashSet<MotivationTag>,
}

impl PreferenceSet {
    /// No motivations selected
    pub fn empty() -> Self {
        Self {
            tags: HashSet::new(),
        }
    }

    /// Build from user-facing labels, skipping any that aren't recognised
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let tags = labels
            .into_iter()
            .filter_map(|label| {
                let tag = MotivationTag::from_label(label);
                if tag.is_none() {
                    debug!("Ignoring unknown motivation label '{}'", label);
                }
                tag
            })
            .collect();
        Self { tags }
    }

    pub fn with(mut self, tag: MotivationTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn contains(&self, tag: MotivationTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MotivationTag> {
        self.tags.iter()
    }
}

impl Default for PreferenceSet {
    fn default() -> Self {
        MotivationTag::ALL.into_iter().collect()
    }
}

impl FromIterator<MotivationTag> for PreferenceSet {
    fn from_iter<I: IntoIterator<Item = MotivationTag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

/// Numeric weights consumed by the ranking engine.
///
/// Each field is in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightParams {
    /// Weight of supportive-environment signals (wiki, discussions). Driven by `Learning`.
    pub supportive_env_weight: f32,
    /// Weight of activity signals (recent pushes, stars). Driven by `Networking`.
    pub activity_weight: f32,
}

impl WeightParams {
    /// The coefficient that a given tag controls
    pub fn weight(&self, tag: MotivationTag) -> f32 {
        match tag {
            MotivationTag::Learning => self.supportive_env_weight,
            MotivationTag::Networking => self.activity_weight,
        }
    }
}

/// Translate selected motivations into ranking weights
pub fn translate(selected: &PreferenceSet) -> WeightParams {
    let coefficient = |tag: MotivationTag| -> f32 { if selected.contains(tag) { 1.0 } else { 0.0 } };

    WeightParams {
        supportive_env_weight: coefficient(MotivationTag::Learning),
        activity_weight: coefficient(MotivationTag::Networking),
    }
}
