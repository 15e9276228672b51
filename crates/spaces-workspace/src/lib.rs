//! Spaces workspace entities
//!
//! The analytical state of a Spaces session:
//! - [`Workspace`]: single owner of every entity
//! - entity records ([`Configuration`], [`Similarities`], [`Settings`], ...)
//! - [`EntityState`]: deep copy of one entity, used by snapshots
//! - [`Requirement`]: data a command needs before it runs
//! - [`readers`]: parsers for the external data files
//!
//! # Example
//! ```
//! use spaces_workspace::{EntityName, Workspace};
//!
//! let workspace = Workspace::new();
//! assert!(workspace.is_empty(EntityName::Configuration));
//! assert!(!workspace.is_empty(EntityName::Settings));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod entity;
pub mod geometry;
pub mod matrices;
pub mod readers;
pub mod rivalry;
pub mod settings;
pub mod table;
pub mod uncertainty;
pub mod workspace;

pub use entity::{Entity, EntityName, UnknownEntity};
pub use geometry::{Configuration, GroupedData, PointSet, Scores, Target};
pub use matrices::{Correlations, Evaluations, Individuals, Similarities, SimilarityMatrix, ValueType};
pub use readers::ReadError;
pub use rivalry::{Line, PlanePoint, ReferencePoint, Rivalry, SegmentShares};
pub use settings::{PresentationLayer, Settings};
pub use table::{LowerTriangle, Table, TableError};
pub use uncertainty::Uncertainty;
pub use workspace::{EntityState, Requirement, Workspace};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
