//! The command engine
//!
//! [`Engine`] owns the workspace, the undo/redo stacks and the session
//! history, and drives every invocation through the same phase sequence:
//!
//! ```text
//! Initialized -> InProgress -> PreconditionsChecked -> ParametersBound
//!   -> SnapshotCaptured -> ExternalRead -> Validated -> Applied
//!   -> Presented -> Completed
//! ```
//!
//! Passive and script commands skip the snapshot and go straight from
//! `ParametersBound` to `Applied`. Any failure between `SnapshotCaptured`
//! and `Applied`, including a panic in a collaborator, restores the snapshot
//! before it is reported. The snapshot is committed before the presenter
//! runs; a presenter panic fails the invocation with `Aborted` and leaves the
//! change on the undo stack.

use crate::binding;
use crate::collaborators::{
    AnalysisBackend, ConflictChoice, NoPrompter, NullPresenter, Presenter, Prompter,
    UnsupportedBackend,
};
use crate::commands::{self, CommandContext};
use crate::config::{ConflictPolicy, EngineConfig, MixedEmptyPolicy};
use crate::error::{CommandError, FailureKind};
use crate::history::{RecordId, SessionHistory, UndoRedoStacks};
use crate::phase::{Phase, PhaseTracker};
use crate::preconditions;
use crate::script;
use crate::snapshot::{CommandState, RestoredEntities};
use crate::validator::{ConsistencyValidator, DimensionalValidator};
use serde::Serialize;
use spaces_registry::{metadata, Classification, CommandKind, Descriptor, Params, Registry, TouchSet};
use spaces_workspace::{EntityName, Workspace};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Outcome of one invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    /// Canonical command name, or the name as typed when it is unknown
    pub command: String,
    pub success: bool,
    /// Entities written back by undo, redo or rollback
    pub restored_entities: RestoredEntities,
    /// Command output on success, the error text on failure
    pub message: String,
    /// Set exactly when `success` is false
    pub failure: Option<FailureKind>,
    /// Phases visited, ending in `Completed`, `Aborted` or `RolledBack`
    pub phases: Vec<Phase>,
}

impl ExecutionResult {
    /// Whether the failure restored a snapshot
    #[inline]
    #[must_use]
    pub fn rolled_back(&self) -> bool {
        self.phases.last() == Some(&Phase::RolledBack)
    }
}

/// Command execution engine
pub struct Engine {
    workspace: Workspace,
    stacks: UndoRedoStacks,
    history: SessionHistory,
    config: EngineConfig,
    validator: Box<dyn ConsistencyValidator>,
    prompter: Box<dyn Prompter>,
    presenter: Box<dyn Presenter>,
    backend: Box<dyn AnalysisBackend>,
    /// Nesting of scripts currently running
    pub(crate) script_depth: usize,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("populated", &self.workspace.populated())
            .field("undo_depth", &self.stacks.undo_depth())
            .field("redo_depth", &self.stacks.redo_depth())
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine with an empty workspace and default collaborators
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            workspace: Workspace::new(),
            stacks: UndoRedoStacks::new().with_max_depth(config.max_undo_depth),
            history: SessionHistory::new(),
            config,
            validator: Box::new(DimensionalValidator),
            prompter: Box::new(NoPrompter),
            presenter: Box::new(NullPresenter),
            backend: Box::new(UnsupportedBackend),
            script_depth: 0,
        }
    }

    /// With starting workspace
    #[must_use]
    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = workspace;
        self
    }

    /// With consistency validator for phase 7
    #[must_use]
    pub fn with_validator(mut self, validator: impl ConsistencyValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// With prompter for missing parameters and conflicts
    #[must_use]
    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    /// With presenter
    #[must_use]
    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Box::new(presenter);
        self
    }

    /// With numerical backend for the analysis commands
    #[must_use]
    pub fn with_backend(mut self, backend: impl AnalysisBackend + 'static) -> Self {
        self.backend = Box::new(backend);
        self
    }

    /// Live workspace
    #[inline]
    #[must_use]
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Configuration the engine was built with
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Every invocation so far, including failed ones
    #[inline]
    #[must_use]
    pub fn session_history(&self) -> &SessionHistory {
        &self.history
    }

    /// Undo and redo stacks
    #[inline]
    #[must_use]
    pub fn stacks(&self) -> &UndoRedoStacks {
        &self.stacks
    }

    /// Whether [`Engine::undo`] has anything to restore
    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.stacks.can_undo()
    }

    /// Whether [`Engine::redo`] has anything to reapply
    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.stacks.can_redo()
    }

    /// Script reproducing the completed commands of this session
    #[must_use]
    pub fn generate_script(&self) -> String {
        script::generate(&self.history)
    }

    /// Execute a command by name
    pub fn execute(&mut self, name: &str, params: &Params, interactive: bool) -> ExecutionResult {
        match Registry::global().lookup(name) {
            Some(kind) => self.execute_kind(kind, params, interactive),
            None => {
                let error = CommandError::UnknownCommand(name.to_string());
                tracing::warn!(command = name, "unknown command");
                let mut tracker = PhaseTracker::new();
                tracker.fail();
                failed(name.to_string(), &error, RestoredEntities::default(), tracker)
            }
        }
    }

    /// Execute a command
    pub fn execute_kind(&mut self, kind: CommandKind, params: &Params, interactive: bool) -> ExecutionResult {
        let descriptor = kind.descriptor();
        if descriptor.touches == TouchSet::History {
            return if kind == CommandKind::Undo {
                self.undo()
            } else {
                self.redo()
            };
        }

        let mut tracker = PhaseTracker::new();
        if descriptor.classification == Classification::InteractiveOnly && !interactive {
            let error = CommandError::InteractiveOnly {
                command: descriptor.name,
            };
            tracing::warn!(command = descriptor.name, "interactive-only command rejected");
            tracker.fail();
            return failed(descriptor.name.to_string(), &error, RestoredEntities::default(), tracker);
        }

        tracing::info!(command = descriptor.name, interactive, "executing");
        let record = self.history.begin(kind, params);
        let mut restored = RestoredEntities::default();
        match self.run(descriptor, params, interactive, &mut tracker, record, &mut restored) {
            Ok(message) => match tracker.advance(Phase::Completed) {
                Ok(()) => {
                    let mut message =
                        message.unwrap_or_else(|| format!("{} completed", descriptor.name));
                    if self.history.verbose() {
                        if let Some(explanation) = metadata::explanation(descriptor.name) {
                            message = format!("{explanation}\n{message}");
                        }
                    }
                    self.history.complete(record);
                    tracing::info!(command = descriptor.name, "completed");
                    ExecutionResult {
                        command: descriptor.name.to_string(),
                        success: true,
                        restored_entities: restored,
                        message,
                        failure: None,
                        phases: tracker.into_phases(),
                    }
                }
                Err(error) => {
                    self.fail(descriptor, record, &CommandError::from(error), restored, tracker)
                }
            },
            Err(error) => self.fail(descriptor, record, &error, restored, tracker),
        }
    }

    fn fail(
        &mut self,
        descriptor: &Descriptor,
        record: RecordId,
        error: &CommandError,
        restored: RestoredEntities,
        mut tracker: PhaseTracker,
    ) -> ExecutionResult {
        tracker.fail();
        self.history.fail(record, error.to_string());
        if tracker.current() == Phase::RolledBack {
            tracing::warn!(command = descriptor.name, restored = %restored, error = %error, "rolled back");
        } else {
            tracing::info!(command = descriptor.name, error = %error, "aborted");
        }
        failed(descriptor.name.to_string(), error, restored, tracker)
    }

    fn run(
        &mut self,
        descriptor: &'static Descriptor,
        supplied: &Params,
        interactive: bool,
        tracker: &mut PhaseTracker,
        record: RecordId,
        restored: &mut RestoredEntities,
    ) -> Result<Option<String>, CommandError> {
        let kind = descriptor.kind;
        tracker.advance(Phase::InProgress)?;

        preconditions::check_requirements(descriptor, &self.workspace)?;
        preconditions::check_limitations(kind, &self.workspace)?;
        tracker.advance(Phase::PreconditionsChecked)?;

        let params = binding::bind(descriptor, supplied, interactive, self.prompter.as_mut())?;
        self.history.bind_params(record, &params);
        tracker.advance(Phase::ParametersBound)?;

        if !descriptor.classification.captures_state() {
            let message = catch_unwind(AssertUnwindSafe(|| self.apply_stateless(kind, &params)))
                .unwrap_or_else(|payload| {
                    Err(CommandError::Internal(panic_message(payload.as_ref())))
                })?;
            tracker.advance(Phase::Applied)?;
            self.present(kind)?;
            tracker.advance(Phase::Presented)?;
            return Ok(message);
        }

        let touched = descriptor.resolve_touches(&params)?;
        let mut snapshot = CommandState::capture(&self.workspace, touched, descriptor, &params);
        tracker.advance(Phase::SnapshotCaptured)?;

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.run_body(kind, &params, &mut snapshot, interactive, &mut *tracker)
        }))
        .unwrap_or_else(|payload| Err(CommandError::Internal(panic_message(payload.as_ref()))));

        match outcome {
            Ok(message) => {
                self.stacks.commit(snapshot);
                self.present(kind)?;
                tracker.advance(Phase::Presented)?;
                Ok(message)
            }
            Err(error) => {
                *restored = snapshot.restore(&mut self.workspace);
                Err(error)
            }
        }
    }

    /// Phase 9, with presenter panics turned into errors
    fn present(&mut self, kind: CommandKind) -> Result<(), CommandError> {
        catch_unwind(AssertUnwindSafe(|| self.presenter.present(kind, &self.workspace))).map_err(
            |payload| {
                CommandError::Internal(format!(
                    "presenting {kind} failed: {}",
                    panic_message(payload.as_ref())
                ))
            },
        )
    }

    /// Phases 6 to 8 of an active command
    fn run_body(
        &mut self,
        kind: CommandKind,
        params: &Params,
        snapshot: &mut CommandState,
        interactive: bool,
        tracker: &mut PhaseTracker,
    ) -> Result<Option<String>, CommandError> {
        let mut ctx = CommandContext {
            workspace: &mut self.workspace,
            params,
            config: &self.config,
            backend: self.backend.as_mut(),
        };
        commands::read_external(kind, &mut ctx)?;
        tracker.advance(Phase::ExternalRead)?;

        self.resolve_conflicts(kind, snapshot, interactive)?;
        tracker.advance(Phase::Validated)?;

        let mut ctx = CommandContext {
            workspace: &mut self.workspace,
            params,
            config: &self.config,
            backend: self.backend.as_mut(),
        };
        let message = commands::apply(kind, &mut ctx)?;
        tracker.advance(Phase::Applied)?;
        Ok(message)
    }

    /// Phase 7: validate new data and apply the conflict policy
    fn resolve_conflicts(
        &mut self,
        kind: CommandKind,
        snapshot: &mut CommandState,
        interactive: bool,
    ) -> Result<(), CommandError> {
        let conflicts = self.validator.validate(kind, &self.workspace);
        if conflicts.is_empty() {
            return Ok(());
        }

        let policy = match self.config.conflict_policy {
            ConflictPolicy::Ask if !interactive => ConflictPolicy::Rollback,
            ConflictPolicy::Ask => {
                let prior = snapshot.prior_emptiness();
                let all_empty = prior.iter().all(|(_, empty)| *empty);
                let any_empty = prior.iter().any(|(_, empty)| *empty);
                if all_empty
                    || (any_empty && self.config.mixed_empty_policy == MixedEmptyPolicy::Rollback)
                {
                    ConflictPolicy::Rollback
                } else {
                    ConflictPolicy::Ask
                }
            }
            policy => policy,
        };

        let abandoned: Vec<EntityName> = match policy {
            ConflictPolicy::Rollback => return Err(CommandError::Consistency { conflicts }),
            ConflictPolicy::AbandonExisting => conflicts.iter().map(|c| c.existing).collect(),
            ConflictPolicy::Ask => {
                let mut abandoned = Vec::new();
                for conflict in &conflicts {
                    match self.prompter.resolve_conflict(conflict) {
                        ConflictChoice::AbandonExisting => abandoned.push(conflict.existing),
                        ConflictChoice::Ignore => {}
                        ConflictChoice::KeepExisting => {
                            return Err(CommandError::Consistency {
                                conflicts: conflicts.clone(),
                            })
                        }
                    }
                }
                abandoned
            }
        };

        for name in abandoned {
            snapshot.include(&self.workspace, name);
            self.workspace.clear(name);
            tracing::info!(command = kind.name(), abandoned = %name, "existing data abandoned");
        }
        Ok(())
    }

    /// Body of passive and script commands
    fn apply_stateless(&mut self, kind: CommandKind, params: &Params) -> Result<Option<String>, CommandError> {
        match kind {
            CommandKind::OpenScript => {
                let path = self.config.resolve_path(params.text("file")?);
                let report = self
                    .run_script_file(&path)
                    .map_err(|e| CommandError::Script(e.to_string()))?;
                Ok(Some(report.to_string()))
            }
            CommandKind::SaveScript => {
                let path = self.config.resolve_path(params.text("file")?);
                std::fs::write(&path, self.generate_script())
                    .map_err(|source| CommandError::Io { path: path.clone(), source })?;
                Ok(Some(format!("Script saved to {}", path.display())))
            }
            CommandKind::ViewScript => Ok(Some(self.generate_script())),
            CommandKind::History => Ok(Some(self.describe_history())),
            CommandKind::Status => Ok(Some(self.describe_status())),
            _ => {
                let mut ctx = CommandContext {
                    workspace: &mut self.workspace,
                    params,
                    config: &self.config,
                    backend: self.backend.as_mut(),
                };
                commands::apply(kind, &mut ctx)
            }
        }
    }

    fn describe_history(&self) -> String {
        self.history
            .records()
            .iter()
            .map(|record| {
                let status = match &record.status {
                    crate::history::CommandStatus::InProgress => "in progress".to_string(),
                    crate::history::CommandStatus::Completed => "completed".to_string(),
                    crate::history::CommandStatus::Failed(reason) => format!("failed: {reason}"),
                };
                format!(
                    "{:>4}  {}  {} {}  [{status}]",
                    record.sequence + 1,
                    record.started_at.format("%H:%M:%S"),
                    record.command,
                    record.params
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn describe_status(&self) -> String {
        let populated: Vec<String> = self
            .workspace
            .populated()
            .into_iter()
            .map(EntityName::display_name)
            .collect();
        format!(
            "Active: {}\nUndo depth: {}\nRedo depth: {}",
            if populated.is_empty() {
                "nothing".to_string()
            } else {
                populated.join(", ")
            },
            self.stacks.undo_depth(),
            self.stacks.redo_depth()
        )
    }

    /// Restore the state before the most recent undoable command
    pub fn undo(&mut self) -> ExecutionResult {
        self.step_history(CommandKind::Undo)
    }

    /// Reapply the most recently undone command
    pub fn redo(&mut self) -> ExecutionResult {
        self.step_history(CommandKind::Redo)
    }

    fn step_history(&mut self, kind: CommandKind) -> ExecutionResult {
        let descriptor = kind.descriptor();
        let mut tracker = PhaseTracker::new();
        let record = self.history.begin(kind, &Params::new());
        match self.swap_stacks(kind, &mut tracker) {
            Ok((undone, restored)) => {
                self.history.complete(record);
                tracing::info!(command = kind.name(), target = undone.name(), restored = %restored, "history step");
                ExecutionResult {
                    command: kind.name().to_string(),
                    success: true,
                    message: format!("{kind} {undone}: restored {restored}"),
                    restored_entities: restored,
                    failure: None,
                    phases: tracker.into_phases(),
                }
            }
            Err(error) => self.fail(descriptor, record, &error, RestoredEntities::default(), tracker),
        }
    }

    /// Pop one stack, push the current state of the same entities onto the
    /// other and restore the popped snapshot
    fn swap_stacks(
        &mut self,
        kind: CommandKind,
        tracker: &mut PhaseTracker,
    ) -> Result<(CommandKind, RestoredEntities), CommandError> {
        tracker.advance(Phase::InProgress)?;
        let popped = if kind == CommandKind::Undo {
            self.stacks.pop_undo().ok_or(CommandError::NothingToUndo)?
        } else {
            self.stacks.pop_redo().ok_or(CommandError::NothingToRedo)?
        };
        tracker.advance(Phase::PreconditionsChecked)?;
        tracker.advance(Phase::ParametersBound)?;

        let fresh = popped.recapture(&self.workspace);
        if kind == CommandKind::Undo {
            self.stacks.push_redo(fresh);
        } else {
            self.stacks.push_undo(fresh);
        }
        let command = popped.command();
        let restored = popped.restore(&mut self.workspace);
        tracker.advance(Phase::Applied)?;

        self.present(kind)?;
        tracker.advance(Phase::Presented)?;
        tracker.advance(Phase::Completed)?;
        Ok((command, restored))
    }
}

fn failed(
    command: String,
    error: &CommandError,
    restored: RestoredEntities,
    tracker: PhaseTracker,
) -> ExecutionResult {
    ExecutionResult {
        command,
        success: false,
        restored_entities: restored,
        message: error.to_string(),
        failure: Some(error.kind()),
        phases: tracker.into_phases(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "command panicked".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spaces_workspace::{Configuration, PointSet};

    fn engine() -> Engine {
        let mut workspace = Workspace::new();
        *workspace.configuration_mut() = Configuration::from_points(
            PointSet::new(
                vec!["x".into(), "y".into()],
                vec!["x".into(), "y".into()],
                vec!["a".into(), "b".into()],
                vec!["a".into(), "b".into()],
                vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            )
            .unwrap(),
        );
        Engine::default().with_workspace(workspace)
    }

    #[test]
    fn active_command_visits_every_phase() {
        let mut engine = engine();
        let result = engine.execute("Rotate", &Params::new().with("degrees", 10.0), false);
        assert!(result.success, "{}", result.message);
        assert_eq!(
            result.phases,
            vec![
                Phase::Initialized,
                Phase::InProgress,
                Phase::PreconditionsChecked,
                Phase::ParametersBound,
                Phase::SnapshotCaptured,
                Phase::ExternalRead,
                Phase::Validated,
                Phase::Applied,
                Phase::Presented,
                Phase::Completed,
            ]
        );
        assert!(engine.can_undo());
    }

    #[test]
    fn passive_command_skips_snapshot() {
        let mut engine = engine();
        let result = engine.execute("Status", &Params::new(), false);
        assert!(result.success);
        assert!(!result.phases.contains(&Phase::SnapshotCaptured));
        assert!(result.message.starts_with("Active: configuration"));
        assert!(!engine.can_undo());
        assert_eq!(engine.session_history().len(), 1);
    }

    #[test]
    fn unknown_command_fails_without_history() {
        let mut engine = engine();
        let result = engine.execute("Teleport", &Params::new(), true);
        assert_eq!(result.failure, Some(FailureKind::UnknownCommand));
        assert!(engine.session_history().is_empty());
    }

    #[test]
    fn interactive_only_is_rejected_from_scripts() {
        let mut engine = engine();
        let result = engine.execute("Create", &Params::new(), false);
        assert_eq!(result.failure, Some(FailureKind::InteractiveOnly));
        assert_eq!(result.phases, vec![Phase::Initialized, Phase::Aborted]);
        assert!(engine.session_history().is_empty());
    }

    #[test]
    fn precondition_failure_aborts_before_snapshot() {
        let mut engine = Engine::default();
        let result = engine.execute("Center", &Params::new(), false);
        assert_eq!(result.failure, Some(FailureKind::Precondition));
        assert_eq!(result.phases.last(), Some(&Phase::Aborted));
        assert!(!result.rolled_back());
        assert_eq!(
            engine.session_history().records()[0].status,
            crate::history::CommandStatus::Failed("Center needs an active configuration".into())
        );
    }

    #[test]
    fn unsupported_analysis_rolls_back() {
        let mut engine = engine();
        let before = engine.workspace().clone();
        let result = engine.execute("Varimax", &Params::new(), false);
        assert_eq!(result.failure, Some(FailureKind::Analysis));
        assert!(result.rolled_back());
        assert_eq!(engine.workspace(), &before);
        assert!(!engine.can_undo());
    }

    #[test]
    fn verbose_output_includes_the_explanation() {
        let mut engine = engine();
        let explanation = "Moves the configuration so every dimension has a mean of zero.";

        let result = engine.execute("Center", &Params::new(), false);
        assert_eq!(result.message, "Center completed");

        assert!(engine.execute("Verbose", &Params::new(), false).success);
        let result = engine.execute("Center", &Params::new(), false);
        assert_eq!(result.message, format!("{explanation}\nCenter completed"));

        assert!(engine.execute("Terse", &Params::new(), false).success);
        let result = engine.execute("Center", &Params::new(), false);
        assert_eq!(result.message, "Center completed");
    }

    #[test]
    fn undo_routes_through_execute() {
        let mut engine = engine();
        let result = engine.execute("Undo", &Params::new(), false);
        assert_eq!(result.failure, Some(FailureKind::NothingToUndo));

        engine.execute("Center", &Params::new(), false);
        let result = engine.execute("Undo", &Params::new(), false);
        assert!(result.success);
        assert_eq!(result.message, "Undo Center: restored configuration, rivalry, scores");
        assert!(engine.can_redo());
    }
}
