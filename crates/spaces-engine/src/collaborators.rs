//! External collaborators of the engine
//!
//! The engine never talks to a user, draws a plot or runs a numerical
//! algorithm itself. It calls out through these traits:
//! - [`Prompter`]: supplies missing parameters and resolves conflicts
//! - [`Presenter`]: shows the result of a completed command
//! - [`AnalysisBackend`]: runs the algorithmic commands
//!
//! Each trait has a do-nothing default used by scripted runs and tests.

use crate::validator::Conflict;
use spaces_registry::{ClusterSource, CommandKind, Descriptor, ParamSpec, ParamValue};
use spaces_workspace::Workspace;

/// User's answer to a data conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Clear the existing entity and keep the new data
    AbandonExisting,
    /// Keep the existing entity and abandon the command
    KeepExisting,
    /// Accept the inconsistency
    Ignore,
}

/// Interactive source of parameter values and decisions
pub trait Prompter {
    /// Ask for a required parameter the caller did not supply
    ///
    /// `None` means the user dismissed the request.
    fn request_parameter(&mut self, command: &Descriptor, spec: &ParamSpec) -> Option<ParamValue>;

    /// Ask how to resolve a conflict between new and existing data
    fn resolve_conflict(&mut self, conflict: &Conflict) -> ConflictChoice;
}

/// Prompter that never answers
///
/// Parameter requests are dismissed and conflicts keep the existing data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompter;

impl Prompter for NoPrompter {
    fn request_parameter(&mut self, _command: &Descriptor, _spec: &ParamSpec) -> Option<ParamValue> {
        None
    }

    fn resolve_conflict(&mut self, _conflict: &Conflict) -> ConflictChoice {
        ConflictChoice::KeepExisting
    }
}

/// Consumer of completed commands (plots, tables, status lines)
///
/// Presenters read the workspace; they never mutate it.
pub trait Presenter {
    fn present(&mut self, command: CommandKind, workspace: &Workspace);
}

/// Presenter that shows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _command: CommandKind, _workspace: &Workspace) {}
}

/// Numerical backend errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// Backend does not implement the analysis
    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),

    /// Analysis ran and failed
    #[error("{0}")]
    Failed(String),
}

/// Numerical algorithms behind the analytical commands
///
/// Each method reads its inputs from the workspace and writes its results
/// back into the entities its command touches. Every method defaults to
/// [`AnalysisError::Unsupported`].
///
/// # Contract
/// A method may only write the entities its command's descriptor declares;
/// the undo snapshot holds nothing else. After each call the engine compares
/// every other entity with its state before the call. A change there is put
/// back and the command fails with an internal error and rolls back.
#[allow(unused_variables)]
pub trait AnalysisBackend {
    /// Cluster the rows of `source` into `n_clusters` groups
    fn cluster(
        &mut self,
        workspace: &mut Workspace,
        source: ClusterSource,
        n_clusters: usize,
    ) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("Cluster"))
    }

    /// Fit the active configuration to the target
    fn compare(&mut self, workspace: &mut Workspace) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("Compare"))
    }

    /// Factor analysis of the evaluations
    fn factor_analysis(
        &mut self,
        workspace: &mut Workspace,
        n_factors: usize,
        machine_learning: bool,
    ) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("Factor analysis"))
    }

    fn principal_components(
        &mut self,
        workspace: &mut Workspace,
        n_components: usize,
    ) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("Principal components"))
    }

    /// Similarities derived from evaluations
    fn line_of_sight(&mut self, workspace: &mut Workspace) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("Line of sight"))
    }

    /// Multidimensional scaling of the similarities
    fn mds(
        &mut self,
        workspace: &mut Workspace,
        n_components: usize,
        use_metric: bool,
    ) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("MDS"))
    }

    fn varimax(&mut self, workspace: &mut Workspace) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("Varimax"))
    }

    /// Draw a sample design over the evaluators
    fn sample_design(
        &mut self,
        workspace: &mut Workspace,
        probability_of_inclusion: f64,
        nrepetitions: usize,
    ) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("Sample designer"))
    }

    fn sample_repetitions(&mut self, workspace: &mut Workspace) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("Sample repetitions"))
    }

    /// Solve every sample repetition against the target
    fn uncertainty(&mut self, workspace: &mut Workspace) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("Uncertainty"))
    }

    fn score_individuals(&mut self, workspace: &mut Workspace) -> Result<(), AnalysisError> {
        Err(AnalysisError::Unsupported("Score individuals"))
    }
}

/// Backend without any algorithms
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBackend;

impl AnalysisBackend for UnsupportedBackend {}
