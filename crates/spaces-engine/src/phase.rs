//! Execution phases
//!
//! Every invocation walks a fixed sequence of phases. The transition table
//! below is the only place the order is defined; [`PhaseTracker`] refuses any
//! step it does not allow.

use serde::Serialize;

/// Phase of one command invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Initialized,
    /// Recorded in session history as in progress
    InProgress,
    PreconditionsChecked,
    ParametersBound,
    SnapshotCaptured,
    /// External data read into the live entity
    ExternalRead,
    Validated,
    /// Domain effect applied
    Applied,
    Presented,
    Completed,
    /// Failed without restoring a snapshot
    Aborted,
    /// Failed and the snapshot was restored
    RolledBack,
}

/// Illegal phase transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal phase transition {from:?} -> {to:?}")]
pub struct PhaseError {
    pub from: Phase,
    pub to: Phase,
}

/// Phases reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: Phase) -> &'static [Phase] {
    use Phase::*;
    match from {
        Initialized => &[InProgress, Aborted],
        InProgress => &[PreconditionsChecked, Aborted],
        PreconditionsChecked => &[ParametersBound, Aborted],
        // passive and script commands skip the snapshot
        ParametersBound => &[SnapshotCaptured, Applied, Aborted],
        SnapshotCaptured => &[ExternalRead, RolledBack],
        ExternalRead => &[Validated, RolledBack],
        Validated => &[Applied, RolledBack],
        // the change is already committed when presentation fails
        Applied => &[Presented, Aborted],
        Presented => &[Completed],
        Completed | Aborted | RolledBack => &[],
    }
}

/// Validate a phase transition
///
/// # Errors
/// Returns [`PhaseError`] when `to` is not reachable from `from`.
pub fn validate_transition(from: Phase, to: Phase) -> Result<(), PhaseError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(PhaseError { from, to })
    }
}

/// Records the phases one invocation passes through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTracker {
    visited: Vec<Phase>,
}

impl PhaseTracker {
    /// Start at [`Phase::Initialized`]
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            visited: vec![Phase::Initialized],
        }
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn current(&self) -> Phase {
        self.visited.last().copied().unwrap_or(Phase::Initialized)
    }

    /// Move to the next phase
    ///
    /// # Errors
    /// Returns [`PhaseError`] for transitions the table does not allow.
    pub fn advance(&mut self, to: Phase) -> Result<(), PhaseError> {
        validate_transition(self.current(), to)?;
        tracing::trace!(from = ?self.current(), ?to, "phase");
        self.visited.push(to);
        Ok(())
    }

    /// Terminate a failed invocation
    ///
    /// Ends in [`Phase::RolledBack`] when a snapshot was taken and
    /// [`Phase::Aborted`] otherwise.
    pub fn fail(&mut self) {
        for terminal in [Phase::RolledBack, Phase::Aborted] {
            if self.advance(terminal).is_ok() {
                return;
            }
        }
    }

    /// Phases visited so far
    #[inline]
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.visited
    }

    #[inline]
    #[must_use]
    pub fn into_phases(self) -> Vec<Phase> {
        self.visited
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_command_path_is_allowed() {
        let mut tracker = PhaseTracker::new();
        for phase in [
            Phase::InProgress,
            Phase::PreconditionsChecked,
            Phase::ParametersBound,
            Phase::SnapshotCaptured,
            Phase::ExternalRead,
            Phase::Validated,
            Phase::Applied,
            Phase::Presented,
            Phase::Completed,
        ] {
            tracker.advance(phase).unwrap();
        }
        assert_eq!(tracker.current(), Phase::Completed);
        assert!(tracker.advance(Phase::InProgress).is_err());
    }

    #[test]
    fn snapshot_cannot_be_skipped_after_it_starts() {
        assert!(validate_transition(Phase::SnapshotCaptured, Phase::Applied).is_err());
        assert!(validate_transition(Phase::SnapshotCaptured, Phase::Aborted).is_err());
    }

    #[test]
    fn fail_picks_the_right_terminal() {
        let mut before = PhaseTracker::new();
        before.advance(Phase::InProgress).unwrap();
        before.fail();
        assert_eq!(before.current(), Phase::Aborted);

        let mut after = PhaseTracker::new();
        for phase in [
            Phase::InProgress,
            Phase::PreconditionsChecked,
            Phase::ParametersBound,
            Phase::SnapshotCaptured,
        ] {
            after.advance(phase).unwrap();
        }
        after.fail();
        assert_eq!(after.current(), Phase::RolledBack);
    }
}
