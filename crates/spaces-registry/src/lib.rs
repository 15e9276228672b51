//! Spaces command registry
//!
//! The closed, read-only catalogue of commands:
//! - [`CommandKind`]: every command as a closed enum
//! - [`Descriptor`]: classification, touched entities, parameter schema and requirements
//! - [`Registry`]: O(1) lookup by name and by kind, lexical enumeration, longest-prefix matching
//! - [`Params`], [`ParamValue`], [`ParamSpec`]: parameter values and schema
//! - [`metadata`]: menu and help tables keyed by command name

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod classification;
pub mod command;
pub mod metadata;
pub mod params;
pub mod registry;

pub use classification::{Classification, TouchSet};
pub use command::{ClusterSource, CommandKind, Descriptor};
pub use params::{DefaultValue, ParamError, ParamSpec, ParamType, ParamValue, Params};
pub use registry::Registry;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
