//! Error types for command execution
//!
//! Provides the error taxonomy of the execution protocol:
//! - precondition and limitation failures (nothing was captured)
//! - parameter failures (missing, mistyped, out of range, cancelled)
//! - consistency failures (new data conflicts with existing data)
//! - external read failures
//! - analysis failures from the numerical backend
//! - history failures (nothing to undo or redo)

use crate::collaborators::AnalysisError;
use crate::phase::PhaseError;
use crate::validator::Conflict;
use serde::Serialize;
use spaces_registry::ParamError;
use spaces_workspace::{ReadError, Requirement};
use std::fmt;
use std::path::PathBuf;

/// Failure of one command invocation
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Name not in the registry
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Interactive-only command issued from a script
    #[error("{command} is only available interactively")]
    InteractiveOnly { command: &'static str },

    /// Required data is missing
    #[error("{command} needs {requirement}")]
    Precondition {
        command: &'static str,
        requirement: Requirement,
    },

    /// Data present but unsuitable for the command
    #[error("{command}: {reason}")]
    Limitation {
        command: &'static str,
        reason: String,
    },

    /// Parameter missing, mistyped or invalid
    #[error("parameter error: {0}")]
    Parameter(#[from] ParamError),

    /// New data conflicts with existing data
    #[error("inconsistent with existing data: {}", describe_conflicts(.conflicts))]
    Consistency { conflicts: Vec<Conflict> },

    /// External file could not be read
    #[error("read failed: {0}")]
    ExternalRead(#[from] ReadError),

    /// Numerical backend failed
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Undo stack is empty
    #[error("nothing to undo")]
    NothingToUndo,

    /// Redo stack is empty
    #[error("nothing to redo")]
    NothingToRedo,

    /// Script could not be run to completion
    #[error("script failed: {0}")]
    Script(String),

    /// File could not be written
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Protocol violated
    #[error("phase error: {0}")]
    Phase(#[from] PhaseError),

    /// A collaborator panicked
    #[error("internal error: {0}")]
    Internal(String),
}

fn describe_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CommandError {
    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnknownCommand(_) => FailureKind::UnknownCommand,
            Self::InteractiveOnly { .. } => FailureKind::InteractiveOnly,
            Self::Precondition { .. } | Self::Limitation { .. } => FailureKind::Precondition,
            Self::Parameter(_) => FailureKind::Parameter,
            Self::Consistency { .. } => FailureKind::Consistency,
            Self::ExternalRead(_) => FailureKind::ExternalRead,
            Self::Analysis(_) => FailureKind::Analysis,
            Self::NothingToUndo => FailureKind::NothingToUndo,
            Self::NothingToRedo => FailureKind::NothingToRedo,
            Self::Script(_) => FailureKind::Script,
            Self::Io { .. } => FailureKind::Io,
            Self::Phase(_) | Self::Internal(_) => FailureKind::Internal,
        }
    }
}

/// Coarse classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnknownCommand,
    InteractiveOnly,
    Precondition,
    Parameter,
    Consistency,
    ExternalRead,
    Analysis,
    NothingToUndo,
    NothingToRedo,
    Script,
    Io,
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnknownCommand => "unknown command",
            Self::InteractiveOnly => "interactive only",
            Self::Precondition => "precondition",
            Self::Parameter => "parameter",
            Self::Consistency => "consistency",
            Self::ExternalRead => "external read",
            Self::Analysis => "analysis",
            Self::NothingToUndo => "nothing to undo",
            Self::NothingToRedo => "nothing to redo",
            Self::Script => "script",
            Self::Io => "io",
            Self::Internal => "internal",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_message_names_requirement() {
        let err = CommandError::Precondition {
            command: "Rotate",
            requirement: Requirement::Configuration,
        };
        assert_eq!(err.to_string(), "Rotate needs an active configuration");
        assert_eq!(err.kind(), FailureKind::Precondition);
    }

    #[test]
    fn read_errors_convert() {
        let err: CommandError = ReadError::Empty {
            path: PathBuf::from("a.txt"),
        }
        .into();
        assert_eq!(err.kind(), FailureKind::ExternalRead);
    }

    #[test]
    fn parameter_errors_convert() {
        let err: CommandError = ParamError::invalid("degrees", "too large").into();
        assert_eq!(err.kind(), FailureKind::Parameter);
        assert!(err.to_string().contains("degrees"));
    }
}
