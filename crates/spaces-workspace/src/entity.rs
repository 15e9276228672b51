//! Entity names and the [`Entity`] trait
//!
//! The workspace holds a fixed, closed set of analytical entities. Every
//! command declares which of them it touches by [`EntityName`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of one workspace entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityName {
    Configuration,
    Correlations,
    Evaluations,
    GroupedData,
    Individuals,
    Rivalry,
    Scores,
    Settings,
    Similarities,
    Target,
    Uncertainty,
}

impl EntityName {
    /// Every entity, in lexical order
    pub const ALL: [EntityName; 11] = [
        Self::Configuration,
        Self::Correlations,
        Self::Evaluations,
        Self::GroupedData,
        Self::Individuals,
        Self::Rivalry,
        Self::Scores,
        Self::Settings,
        Self::Similarities,
        Self::Target,
        Self::Uncertainty,
    ];

    /// Snake case name used in logs, scripts and messages
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Correlations => "correlations",
            Self::Evaluations => "evaluations",
            Self::GroupedData => "grouped_data",
            Self::Individuals => "individuals",
            Self::Rivalry => "rivalry",
            Self::Scores => "scores",
            Self::Settings => "settings",
            Self::Similarities => "similarities",
            Self::Target => "target",
            Self::Uncertainty => "uncertainty",
        }
    }

    /// Human readable name ("grouped data")
    #[must_use]
    pub fn display_name(self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no entity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown workspace entity: {0}")]
pub struct UnknownEntity(pub String);

impl FromStr for EntityName {
    type Err = UnknownEntity;

    /// Accepts `grouped_data`, `grouped data` and `Grouped data`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(' ', "_");
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == normalized)
            .ok_or_else(|| UnknownEntity(s.to_string()))
    }
}

/// A workspace entity
pub trait Entity: Clone + PartialEq + fmt::Debug {
    /// Name of this entity in the workspace
    const NAME: EntityName;

    /// Whether the entity holds no meaningful data
    fn is_empty(&self) -> bool;
}
