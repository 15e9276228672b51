//! Command snapshots
//!
//! A [`CommandState`] holds deep copies of the entities one command touches,
//! taken before the command changes anything, plus the command's identity
//! and bound parameters. Restoring writes the copies back by value.

use chrono::{DateTime, Utc};
use spaces_registry::{Classification, CommandKind, Descriptor, Params};
use spaces_workspace::{EntityName, EntityState, Workspace};
use std::collections::BTreeMap;
use std::fmt;

/// Snapshot of the entities one command touched
#[derive(Debug, Clone, PartialEq)]
pub struct CommandState {
    command: CommandKind,
    classification: Classification,
    params: Params,
    created_at: DateTime<Utc>,
    entities: BTreeMap<EntityName, EntityState>,
}

impl CommandState {
    /// Capture the named entities from the live workspace
    #[must_use]
    pub fn capture(
        workspace: &Workspace,
        entities: impl IntoIterator<Item = EntityName>,
        descriptor: &Descriptor,
        params: &Params,
    ) -> Self {
        let entities: BTreeMap<_, _> = entities
            .into_iter()
            .map(|name| (name, workspace.capture(name)))
            .collect();
        tracing::debug!(
            command = descriptor.name,
            entities = entities.len(),
            "captured snapshot"
        );
        Self {
            command: descriptor.kind,
            classification: descriptor.classification,
            params: params.clone(),
            created_at: Utc::now(),
            entities,
        }
    }

    /// Add an entity found to be affected after capture
    ///
    /// Returns `false` if the entity was already captured.
    pub fn include(&mut self, workspace: &Workspace, name: EntityName) -> bool {
        if self.entities.contains_key(&name) {
            return false;
        }
        self.entities.insert(name, workspace.capture(name));
        true
    }

    /// Fresh snapshot of the same entities and metadata from current state
    #[must_use]
    pub fn recapture(&self, workspace: &Workspace) -> Self {
        Self {
            command: self.command,
            classification: self.classification,
            params: self.params.clone(),
            created_at: Utc::now(),
            entities: self
                .entities
                .keys()
                .map(|name| (*name, workspace.capture(*name)))
                .collect(),
        }
    }

    /// Write every captured entity back into the workspace
    pub fn restore(self, workspace: &mut Workspace) -> RestoredEntities {
        let names: Vec<EntityName> = self.entities.keys().copied().collect();
        for state in self.entities.into_values() {
            workspace.restore(state);
        }
        tracing::debug!(command = self.command.name(), restored = names.len(), "restored snapshot");
        RestoredEntities {
            command: Some(self.command),
            names,
        }
    }

    #[inline]
    #[must_use]
    pub fn command(&self) -> CommandKind {
        self.command
    }

    #[inline]
    #[must_use]
    pub fn classification(&self) -> Classification {
        self.classification
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[inline]
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Captured state of one entity
    #[inline]
    #[must_use]
    pub fn entity(&self, name: EntityName) -> Option<&EntityState> {
        self.entities.get(&name)
    }

    /// Names of the captured entities, in order
    pub fn entity_names(&self) -> impl Iterator<Item = EntityName> + '_ {
        self.entities.keys().copied()
    }

    /// Emptiness of each captured entity at capture time
    #[must_use]
    pub fn prior_emptiness(&self) -> Vec<(EntityName, bool)> {
        self.entities
            .iter()
            .map(|(name, state)| (*name, state.is_empty()))
            .collect()
    }
}

/// Entities written back by a restore
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct RestoredEntities {
    #[serde(skip)]
    command: Option<CommandKind>,
    names: Vec<EntityName>,
}

impl RestoredEntities {
    #[inline]
    #[must_use]
    pub fn names(&self) -> &[EntityName] {
        &self.names
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Command whose snapshot was restored
    #[inline]
    #[must_use]
    pub fn command(&self) -> Option<CommandKind> {
        self.command
    }
}

impl fmt::Display for RestoredEntities {
    /// "configuration, rivalry" or "nothing"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.names.is_empty() {
            return f.write_str("nothing");
        }
        let names: Vec<String> = self.names.iter().map(|n| n.display_name()).collect();
        f.write_str(&names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spaces_workspace::{Configuration, PointSet};

    fn load(workspace: &mut Workspace, x: f64) {
        *workspace.configuration_mut() = Configuration::from_points(
            PointSet::new(
                vec!["One".into(), "Two".into()],
                vec!["O".into(), "T".into()],
                vec!["a".into(), "b".into()],
                vec!["a".into(), "b".into()],
                vec![vec![x, 0.0], vec![0.0, x]],
            )
            .unwrap(),
        );
    }

    fn rotate() -> &'static Descriptor {
        CommandKind::Rotate.descriptor()
    }

    #[test]
    fn restore_returns_workspace_to_capture() {
        let mut workspace = Workspace::new();
        load(&mut workspace, 1.0);
        let before = workspace.clone();
        let snapshot = CommandState::capture(
            &workspace,
            rotate().touches.fixed().iter().copied(),
            rotate(),
            &Params::new().with("degrees", 90.0),
        );
        load(&mut workspace, 7.0);
        workspace.scores_mut().score_1_name = "changed".into();

        let restored = snapshot.restore(&mut workspace);
        assert_eq!(workspace, before);
        assert_eq!(
            restored.names(),
            &[EntityName::Configuration, EntityName::Rivalry, EntityName::Scores]
        );
        assert_eq!(restored.to_string(), "configuration, rivalry, scores");
    }

    #[test]
    fn recapture_keeps_entity_set_and_metadata() {
        let mut workspace = Workspace::new();
        let snapshot = CommandState::capture(
            &workspace,
            [EntityName::Configuration],
            rotate(),
            &Params::new(),
        );
        load(&mut workspace, 2.0);
        let fresh = snapshot.recapture(&workspace);
        assert_eq!(fresh.command(), CommandKind::Rotate);
        assert_eq!(
            fresh.entity_names().collect::<Vec<_>>(),
            vec![EntityName::Configuration]
        );
        assert!(snapshot.entity(EntityName::Configuration).unwrap().is_empty());
        assert!(!fresh.entity(EntityName::Configuration).unwrap().is_empty());
    }

    #[test]
    fn include_adds_once() {
        let workspace = Workspace::new();
        let mut snapshot =
            CommandState::capture(&workspace, [EntityName::Target], rotate(), &Params::new());
        assert!(snapshot.include(&workspace, EntityName::Configuration));
        assert!(!snapshot.include(&workspace, EntityName::Target));
        assert_eq!(
            snapshot.prior_emptiness(),
            vec![(EntityName::Configuration, true), (EntityName::Target, true)]
        );
    }
}
