//! Undo/redo stacks and session history
//!
//! - [`UndoRedoStacks`]: two LIFO stacks of [`CommandState`]; every new
//!   active command clears the redo stack
//! - [`SessionHistory`]: ordered record of every invocation, used for the
//!   History view and script generation

use crate::snapshot::CommandState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use spaces_registry::{CommandKind, Params};
use std::collections::VecDeque;

/// Undo and redo stacks
#[derive(Debug, Clone, Default)]
pub struct UndoRedoStacks {
    undo: VecDeque<CommandState>,
    redo: Vec<CommandState>,
    /// Maximum undo entries; 0 means unbounded
    max_depth: usize,
}

impl UndoRedoStacks {
    /// Create unbounded stacks
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With undo depth limit; the oldest entries are dropped first
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Record a new command: push onto undo and clear redo
    pub fn commit(&mut self, state: CommandState) {
        self.push_undo(state);
        self.clear_redo();
    }

    /// Push onto undo without touching redo
    pub fn push_undo(&mut self, state: CommandState) {
        self.undo.push_back(state);
        if self.max_depth > 0 {
            while self.undo.len() > self.max_depth {
                if let Some(dropped) = self.undo.pop_front() {
                    tracing::debug!(command = dropped.command().name(), "undo history trimmed");
                }
            }
        }
    }

    #[inline]
    pub fn pop_undo(&mut self) -> Option<CommandState> {
        self.undo.pop_back()
    }

    #[inline]
    #[must_use]
    pub fn peek_undo(&self) -> Option<&CommandState> {
        self.undo.back()
    }

    #[inline]
    pub fn clear_undo(&mut self) {
        self.undo.clear();
    }

    #[inline]
    pub fn push_redo(&mut self, state: CommandState) {
        self.redo.push(state);
    }

    #[inline]
    pub fn pop_redo(&mut self) -> Option<CommandState> {
        self.redo.pop()
    }

    #[inline]
    #[must_use]
    pub fn peek_redo(&self) -> Option<&CommandState> {
        self.redo.last()
    }

    #[inline]
    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[inline]
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

/// Outcome of a recorded invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum CommandStatus {
    InProgress,
    Completed,
    Failed(String),
}

/// One invocation in the session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub sequence: usize,
    pub command: CommandKind,
    pub params: Params,
    pub status: CommandStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == CommandStatus::Completed
    }
}

/// Handle to a record started with [`SessionHistory::begin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(usize);

/// Every invocation of the session, in order
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    records: Vec<SessionRecord>,
}

impl SessionHistory {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an invocation as in progress
    pub fn begin(&mut self, command: CommandKind, params: &Params) -> RecordId {
        let sequence = self.records.len();
        self.records.push(SessionRecord {
            sequence,
            command,
            params: params.clone(),
            status: CommandStatus::InProgress,
            started_at: Utc::now(),
            finished_at: None,
        });
        RecordId(sequence)
    }

    /// Replace the recorded parameters with the bound ones
    pub fn bind_params(&mut self, id: RecordId, params: &Params) {
        if let Some(record) = self.records.get_mut(id.0) {
            record.params = params.clone();
        }
    }

    /// Mark an invocation completed
    pub fn complete(&mut self, id: RecordId) {
        self.finish(id, CommandStatus::Completed);
    }

    /// Mark an invocation failed
    pub fn fail(&mut self, id: RecordId, reason: impl Into<String>) {
        self.finish(id, CommandStatus::Failed(reason.into()));
    }

    fn finish(&mut self, id: RecordId, status: CommandStatus) {
        if let Some(record) = self.records.get_mut(id.0) {
            record.status = status;
            record.finished_at = Some(Utc::now());
        }
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    /// Records that finished successfully
    pub fn completed(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter().filter(|r| r.is_completed())
    }

    /// Whether the most recent Terse or Verbose that did not fail was Verbose
    ///
    /// An in-progress record counts, so Verbose explains itself.
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.records
            .iter()
            .rev()
            .filter(|r| !matches!(r.status, CommandStatus::Failed(_)))
            .find_map(|r| match r.command {
                CommandKind::Verbose => Some(true),
                CommandKind::Terse => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
