//! Command classification and touch sets

use spaces_workspace::EntityName;
use std::fmt;

/// How a command interacts with workspace state and history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Mutates entities; snapshotted and undoable
    Active,
    /// Only presents; recorded in session history, never on the undo stack
    Passive,
    /// Operates on scripts; never snapshotted
    ScriptMeta,
    /// Active, but needs a human and cannot appear in scripts
    InteractiveOnly,
}

impl Classification {
    /// Whether executing the command captures a snapshot
    #[inline]
    #[must_use]
    pub const fn captures_state(self) -> bool {
        matches!(self, Self::Active | Self::InteractiveOnly)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Passive => "passive",
            Self::ScriptMeta => "script",
            Self::InteractiveOnly => "interactive_only",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities a command may modify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchSet {
    /// Fixed list known up front
    Entities(&'static [EntityName]),
    /// Resolved from parameters when the command runs
    Conditional,
    /// Undo and redo: operate on the stacks, not on entities
    History,
    /// Nothing is modified
    Nothing,
}

impl TouchSet {
    /// Fixed entities, if known up front
    #[inline]
    #[must_use]
    pub const fn fixed(self) -> &'static [EntityName] {
        match self {
            Self::Entities(entities) => entities,
            Self::Conditional | Self::History | Self::Nothing => &[],
        }
    }
}
