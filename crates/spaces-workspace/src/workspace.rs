//! The single live workspace
//!
//! [`Workspace`] owns exactly one instance of every entity. Snapshots copy
//! entities out as [`EntityState`] values and write them back by value, so a
//! captured state never aliases the live one.

use crate::entity::{Entity, EntityName};
use crate::geometry::{Configuration, GroupedData, Scores, Target};
use crate::matrices::{Correlations, Evaluations, Individuals, Similarities};
use crate::rivalry::Rivalry;
use crate::settings::Settings;
use crate::uncertainty::Uncertainty;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deep copy of one entity
#[derive(Debug, Clone, PartialEq)]
pub enum EntityState {
    Configuration(Configuration),
    Correlations(Correlations),
    Evaluations(Evaluations),
    GroupedData(GroupedData),
    Individuals(Individuals),
    Rivalry(Rivalry),
    Scores(Scores),
    Settings(Settings),
    Similarities(Similarities),
    Target(Target),
    Uncertainty(Uncertainty),
}

impl EntityState {
    /// Which entity this state belongs to
    #[must_use]
    pub fn name(&self) -> EntityName {
        match self {
            Self::Configuration(_) => EntityName::Configuration,
            Self::Correlations(_) => EntityName::Correlations,
            Self::Evaluations(_) => EntityName::Evaluations,
            Self::GroupedData(_) => EntityName::GroupedData,
            Self::Individuals(_) => EntityName::Individuals,
            Self::Rivalry(_) => EntityName::Rivalry,
            Self::Scores(_) => EntityName::Scores,
            Self::Settings(_) => EntityName::Settings,
            Self::Similarities(_) => EntityName::Similarities,
            Self::Target(_) => EntityName::Target,
            Self::Uncertainty(_) => EntityName::Uncertainty,
        }
    }

    /// Whether the captured entity was empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Configuration(e) => e.is_empty(),
            Self::Correlations(e) => e.is_empty(),
            Self::Evaluations(e) => e.is_empty(),
            Self::GroupedData(e) => e.is_empty(),
            Self::Individuals(e) => e.is_empty(),
            Self::Rivalry(e) => e.is_empty(),
            Self::Scores(e) => e.is_empty(),
            Self::Settings(e) => e.is_empty(),
            Self::Similarities(e) => e.is_empty(),
            Self::Target(e) => e.is_empty(),
            Self::Uncertainty(e) => e.is_empty(),
        }
    }
}

/// Data a command needs before it can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Configuration,
    Correlations,
    Distances,
    Evaluations,
    GroupedData,
    Individuals,
    ReferencePoints,
    SampleDesign,
    SampleRepetitions,
    SampleSolutions,
    Scores,
    Similarities,
    Target,
}

impl Requirement {
    /// Phrase used in precondition messages
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Configuration => "an active configuration",
            Self::Correlations => "correlations",
            Self::Distances => "inter-point distances",
            Self::Evaluations => "evaluations",
            Self::GroupedData => "grouped data",
            Self::Individuals => "individual data",
            Self::ReferencePoints => "reference points",
            Self::SampleDesign => "a sample design",
            Self::SampleRepetitions => "sample repetitions",
            Self::SampleSolutions => "sample solutions",
            Self::Scores => "scores",
            Self::Similarities => "similarities",
            Self::Target => "a target",
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Every analytical entity of the session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workspace {
    configuration: Configuration,
    correlations: Correlations,
    evaluations: Evaluations,
    grouped_data: GroupedData,
    individuals: Individuals,
    rivalry: Rivalry,
    scores: Scores,
    settings: Settings,
    similarities: Similarities,
    target: Target,
    uncertainty: Uncertainty,
}

macro_rules! accessors {
    ($($field:ident, $field_mut:ident: $ty:ty;)*) => {
        $(
            #[inline]
            #[must_use]
            pub fn $field(&self) -> &$ty {
                &self.$field
            }

            #[inline]
            pub fn $field_mut(&mut self) -> &mut $ty {
                &mut self.$field
            }
        )*
    };
}

impl Workspace {
    /// Create a workspace with every entity empty and default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    accessors! {
        configuration, configuration_mut: Configuration;
        correlations, correlations_mut: Correlations;
        evaluations, evaluations_mut: Evaluations;
        grouped_data, grouped_data_mut: GroupedData;
        individuals, individuals_mut: Individuals;
        rivalry, rivalry_mut: Rivalry;
        scores, scores_mut: Scores;
        settings, settings_mut: Settings;
        similarities, similarities_mut: Similarities;
        target, target_mut: Target;
        uncertainty, uncertainty_mut: Uncertainty;
    }

    /// Whether the named entity holds no data
    #[must_use]
    pub fn is_empty(&self, name: EntityName) -> bool {
        match name {
            EntityName::Configuration => self.configuration.is_empty(),
            EntityName::Correlations => self.correlations.is_empty(),
            EntityName::Evaluations => self.evaluations.is_empty(),
            EntityName::GroupedData => self.grouped_data.is_empty(),
            EntityName::Individuals => self.individuals.is_empty(),
            EntityName::Rivalry => self.rivalry.is_empty(),
            EntityName::Scores => self.scores.is_empty(),
            EntityName::Settings => self.settings.is_empty(),
            EntityName::Similarities => self.similarities.is_empty(),
            EntityName::Target => self.target.is_empty(),
            EntityName::Uncertainty => self.uncertainty.is_empty(),
        }
    }

    /// Reset the named entity to its empty value
    ///
    /// Settings reset to their defaults.
    pub fn clear(&mut self, name: EntityName) {
        self.restore(Self::default().capture(name));
    }

    /// Deep copy of the named entity
    #[must_use]
    pub fn capture(&self, name: EntityName) -> EntityState {
        match name {
            EntityName::Configuration => EntityState::Configuration(self.configuration.clone()),
            EntityName::Correlations => EntityState::Correlations(self.correlations.clone()),
            EntityName::Evaluations => EntityState::Evaluations(self.evaluations.clone()),
            EntityName::GroupedData => EntityState::GroupedData(self.grouped_data.clone()),
            EntityName::Individuals => EntityState::Individuals(self.individuals.clone()),
            EntityName::Rivalry => EntityState::Rivalry(self.rivalry.clone()),
            EntityName::Scores => EntityState::Scores(self.scores.clone()),
            EntityName::Settings => EntityState::Settings(self.settings.clone()),
            EntityName::Similarities => EntityState::Similarities(self.similarities.clone()),
            EntityName::Target => EntityState::Target(self.target.clone()),
            EntityName::Uncertainty => EntityState::Uncertainty(self.uncertainty.clone()),
        }
    }

    /// Overwrite the live entity with a captured state
    pub fn restore(&mut self, state: EntityState) {
        match state {
            EntityState::Configuration(e) => self.configuration = e,
            EntityState::Correlations(e) => self.correlations = e,
            EntityState::Evaluations(e) => self.evaluations = e,
            EntityState::GroupedData(e) => self.grouped_data = e,
            EntityState::Individuals(e) => self.individuals = e,
            EntityState::Rivalry(e) => self.rivalry = e,
            EntityState::Scores(e) => self.scores = e,
            EntityState::Settings(e) => self.settings = e,
            EntityState::Similarities(e) => self.similarities = e,
            EntityState::Target(e) => self.target = e,
            EntityState::Uncertainty(e) => self.uncertainty = e,
        }
    }

    /// Whether the workspace currently meets a requirement
    #[must_use]
    pub fn satisfies(&self, requirement: Requirement) -> bool {
        match requirement {
            Requirement::Configuration => !self.configuration.is_empty(),
            Requirement::Correlations => !self.correlations.is_empty(),
            Requirement::Distances => self.configuration.has_distances(),
            Requirement::Evaluations => !self.evaluations.is_empty(),
            Requirement::GroupedData => !self.grouped_data.is_empty(),
            Requirement::Individuals => !self.individuals.is_empty(),
            Requirement::ReferencePoints => self.rivalry.has_reference_points(),
            Requirement::SampleDesign => self.uncertainty.has_sample_design(),
            Requirement::SampleRepetitions => self.uncertainty.has_sample_repetitions(),
            Requirement::SampleSolutions => self.uncertainty.has_sample_solutions(),
            Requirement::Scores => !self.scores.is_empty(),
            Requirement::Similarities => !self.similarities.is_empty(),
            Requirement::Target => !self.target.is_empty(),
        }
    }

    /// Names of the entities that currently hold data
    #[must_use]
    pub fn populated(&self) -> Vec<EntityName> {
        EntityName::ALL
            .into_iter()
            .filter(|name| *name != EntityName::Settings && !self.is_empty(*name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PointSet;

    fn configuration() -> Configuration {
        Configuration::from_points(
            PointSet::new(
                vec!["First".into(), "Second".into()],
                vec!["Fi".into(), "Se".into()],
                vec!["Point one".into(), "Point two".into()],
                vec!["P1".into(), "P2".into()],
                vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            )
            .unwrap(),
        )
    }

    #[test]
    fn new_workspace_is_empty() {
        let workspace = Workspace::new();
        for name in EntityName::ALL {
            assert_eq!(workspace.is_empty(name), name != EntityName::Settings);
        }
        assert!(workspace.populated().is_empty());
    }

    #[test]
    fn captured_state_does_not_alias_live_entity() {
        let mut workspace = Workspace::new();
        *workspace.configuration_mut() = configuration();
        let state = workspace.capture(EntityName::Configuration);

        workspace
            .configuration_mut()
            .points
            .coords
            .map_column(0, |v| v + 10.0);
        assert_ne!(state, workspace.capture(EntityName::Configuration));

        workspace.restore(state.clone());
        assert_eq!(workspace.capture(EntityName::Configuration), state);
    }

    #[test]
    fn restoring_empty_state_clears_entity() {
        let mut workspace = Workspace::new();
        let empty = workspace.capture(EntityName::Configuration);
        assert!(empty.is_empty());

        *workspace.configuration_mut() = configuration();
        assert!(workspace.satisfies(Requirement::Configuration));
        assert!(workspace.satisfies(Requirement::Distances));

        workspace.restore(empty);
        assert!(workspace.is_empty(EntityName::Configuration));
        assert!(!workspace.satisfies(Requirement::Distances));
    }

    #[test]
    fn clear_resets_settings_to_defaults() {
        let mut workspace = Workspace::new();
        workspace.settings_mut().decimals = 5;
        workspace.clear(EntityName::Settings);
        assert_eq!(workspace.settings(), &Settings::default());
    }

    #[test]
    fn state_names_match_capture() {
        let workspace = Workspace::new();
        for name in EntityName::ALL {
            assert_eq!(workspace.capture(name).name(), name);
        }
    }
}
