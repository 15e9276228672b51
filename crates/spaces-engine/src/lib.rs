//! Spaces command engine
//!
//! Runs named commands against a [`Workspace`](spaces_workspace::Workspace):
//! - [`Engine`]: the execution protocol, undo/redo and rollback
//! - [`CommandState`]: by-value snapshot of the entities one command touches
//! - [`UndoRedoStacks`] and [`SessionHistory`]: what can be undone and what ran
//! - [`ConsistencyValidator`]: conflicts between new and existing data
//! - [`script`]: parse, run and generate line-oriented scripts
//!
//! # Example
//!
//! ```
//! use spaces_engine::{Engine, EngineConfig};
//! use spaces_registry::Params;
//!
//! let mut engine = Engine::new(EngineConfig::new());
//! let result = engine.execute("Status", &Params::new(), false);
//! assert!(result.success);
//! assert!(!engine.can_undo());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod binding;
pub mod collaborators;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod phase;
pub mod preconditions;
pub mod script;
pub mod snapshot;
pub mod validator;

pub use collaborators::{
    AnalysisBackend, AnalysisError, ConflictChoice, NoPrompter, NullPresenter, Presenter, Prompter,
    UnsupportedBackend,
};
pub use config::{ConfigError, ConflictPolicy, EngineConfig, MixedEmptyPolicy, ScriptValidation};
pub use engine::{Engine, ExecutionResult};
pub use error::{CommandError, FailureKind};
pub use history::{CommandStatus, SessionHistory, SessionRecord, UndoRedoStacks};
pub use phase::{Phase, PhaseError, PhaseTracker};
pub use script::{ParseError, ScriptError, ScriptReport};
pub use snapshot::{CommandState, RestoredEntities};
pub use validator::{Conflict, ConflictAspect, ConsistencyValidator, DimensionalValidator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
