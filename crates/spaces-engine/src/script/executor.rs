//! Script execution
//!
//! Each script command runs through the full protocol with
//! `interactive = false`. The first failing command halts the script; the
//! commands before it stay applied and undoable.

use super::parser::{parse_line, parse_script, resolve_command, ParseError, ScriptLine};
use crate::binding;
use crate::collaborators::NoPrompter;
use crate::config::ScriptValidation;
use crate::engine::{Engine, ExecutionResult};
use crate::error::FailureKind;
use serde::Serialize;
use spaces_registry::{Classification, CommandKind};
use std::fmt;
use std::path::{Path, PathBuf};

/// Script failures
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("line {line}: {command} is only available interactively")]
    InteractiveOnly { line: usize, command: &'static str },

    /// Parameters rejected while checking the whole script
    #[error("line {line}: {reason}")]
    Invalid { line: usize, reason: String },

    /// A command failed while running
    #[error("line {line}: {command} failed ({failure}): {reason}")]
    Failed {
        line: usize,
        command: String,
        failure: FailureKind,
        reason: String,
        /// Commands completed before the failure
        completed: usize,
    },

    #[error("cannot read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scripts nested deeper than {0} levels")]
    TooDeep(usize),
}

impl ScriptError {
    /// Line the error refers to, if any
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse(err) => Some(err.line()),
            Self::InteractiveOnly { line, .. }
            | Self::Invalid { line, .. }
            | Self::Failed { line, .. } => Some(*line),
            Self::Io { .. } | Self::TooDeep(_) => None,
        }
    }
}

/// Result of one script command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptStep {
    pub line: usize,
    pub result: ExecutionResult,
}

/// Results of a completed script
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScriptReport {
    pub steps: Vec<ScriptStep>,
}

impl ScriptReport {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for ScriptReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ran {} command", self.steps.len())?;
        if self.steps.len() != 1 {
            f.write_str("s")?;
        }
        Ok(())
    }
}

/// Parse a script and check every line without running anything
///
/// Rejects interactive-only commands and parameters that could not bind
/// without a prompt.
///
/// # Errors
/// Returns the first [`ScriptError`] found.
pub fn check_script(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let lines = parse_script(text)?;
    for line in &lines {
        check_line(line)?;
    }
    Ok(lines)
}

/// Resolve every command name and reject interactive-only commands,
/// leaving parameters unparsed
///
/// # Errors
/// Returns the first unknown or interactive-only command.
pub fn check_command_names(text: &str) -> Result<usize, ScriptError> {
    let mut commands = 0;
    for (index, raw) in text.lines().enumerate() {
        if let Some(kind) = resolve_command(raw, index + 1)? {
            ensure_scriptable(kind, index + 1)?;
            commands += 1;
        }
    }
    Ok(commands)
}

fn ensure_scriptable(kind: CommandKind, line: usize) -> Result<(), ScriptError> {
    let descriptor = kind.descriptor();
    if descriptor.classification == Classification::InteractiveOnly {
        return Err(ScriptError::InteractiveOnly {
            line,
            command: descriptor.name,
        });
    }
    Ok(())
}

fn check_line(line: &ScriptLine) -> Result<(), ScriptError> {
    let descriptor = line.kind.descriptor();
    ensure_scriptable(line.kind, line.line)?;
    binding::bind(descriptor, &line.params, false, &mut NoPrompter).map_err(|e| {
        ScriptError::Invalid {
            line: line.line,
            reason: e.to_string(),
        }
    })?;
    Ok(())
}

impl Engine {
    /// Run script text
    ///
    /// # Errors
    /// Returns [`ScriptError`] for syntax errors, checking failures and the
    /// first command that fails.
    pub fn run_script(&mut self, text: &str) -> Result<ScriptReport, ScriptError> {
        let limit = self.config().max_script_depth;
        if self.script_depth >= limit {
            return Err(ScriptError::TooDeep(limit));
        }
        self.script_depth += 1;
        let outcome = match self.config().script_validation {
            ScriptValidation::CommandNames => {
                check_command_names(text).and_then(|_| self.run_line_by_line(text))
            }
            ScriptValidation::WholeScript => self.run_checked(text),
            ScriptValidation::LineByLine => self.run_line_by_line(text),
        };
        self.script_depth -= 1;

        match &outcome {
            Ok(report) => tracing::info!(commands = report.len(), "script completed"),
            Err(error) => tracing::warn!(error = %error, "script halted"),
        }
        outcome
    }

    /// Read and run a script file
    ///
    /// # Errors
    /// Returns [`ScriptError::Io`] when the file cannot be read, otherwise as
    /// [`Engine::run_script`].
    pub fn run_script_file(&mut self, path: &Path) -> Result<ScriptReport, ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "running script");
        self.run_script(&text)
    }

    fn run_checked(&mut self, text: &str) -> Result<ScriptReport, ScriptError> {
        let lines = check_script(text)?;
        let mut report = ScriptReport::default();
        for line in lines {
            self.run_step(line, &mut report)?;
        }
        Ok(report)
    }

    fn run_line_by_line(&mut self, text: &str) -> Result<ScriptReport, ScriptError> {
        let mut report = ScriptReport::default();
        for (index, raw) in text.lines().enumerate() {
            let Some(line) = parse_line(raw, index + 1)? else {
                continue;
            };
            ensure_scriptable(line.kind, line.line)?;
            self.run_step(line, &mut report)?;
        }
        Ok(report)
    }

    fn run_step(&mut self, line: ScriptLine, report: &mut ScriptReport) -> Result<(), ScriptError> {
        tracing::debug!(line = line.line, command = line.kind.name(), "script step");
        let result = self.execute_kind(line.kind, &line.params, false);
        if !result.success {
            return Err(ScriptError::Failed {
                line: line.line,
                command: result.command,
                failure: result.failure.unwrap_or(FailureKind::Internal),
                reason: result.message,
                completed: report.len(),
            });
        }
        report.steps.push(ScriptStep {
            line: line.line,
            result,
        });
        Ok(())
    }
}
