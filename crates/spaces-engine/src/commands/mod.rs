//! Command bodies
//!
//! A body is split along the protocol phases that may touch state:
//! - [`read_external`]: phase 6, reads external data into the live entity
//! - [`apply`]: phase 8, the command's domain effect
//!
//! Bodies only ever mutate the entities their descriptor declares; the engine
//! has captured exactly those before either function runs.

mod analysis;
mod load;
mod manage;
mod report;
mod transform;

pub use report::{render_table, render_triangle};

use crate::collaborators::AnalysisBackend;
use crate::config::EngineConfig;
use crate::error::CommandError;
use spaces_registry::{Classification, CommandKind, Params};
use spaces_workspace::Workspace;

/// Everything a body may use
pub struct CommandContext<'a> {
    pub workspace: &'a mut Workspace,
    pub params: &'a Params,
    pub config: &'a EngineConfig,
    pub backend: &'a mut dyn AnalysisBackend,
}

/// Phase 6: read external data straight into the live entity
///
/// # Errors
/// Returns [`CommandError::ExternalRead`] when the file cannot be read.
pub fn read_external(kind: CommandKind, ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
    if kind.loads().is_some() {
        load::read(kind, ctx)?;
    }
    Ok(())
}

/// Phase 8: apply the command's effect
///
/// Returns an optional message for the caller.
///
/// # Errors
/// Returns [`CommandError`] for invalid parameters and backend failures.
pub fn apply(kind: CommandKind, ctx: &mut CommandContext<'_>) -> Result<Option<String>, CommandError> {
    use CommandKind as K;
    match kind {
        _ if kind.loads().is_some() => load::derive(kind, ctx).map(|()| None),
        K::Center | K::Rotate | K::Move | K::Invert | K::Rescale => {
            transform::apply(kind, ctx).map(|()| None)
        }
        K::Cluster
        | K::Compare
        | K::FactorAnalysis
        | K::FactorAnalysisMachineLearning
        | K::LineOfSight
        | K::Mds
        | K::PrincipalComponents
        | K::SampleDesigner
        | K::SampleRepetitions
        | K::ScoreIndividuals
        | K::Uncertainty
        | K::Varimax => analysis::apply(kind, ctx).map(|()| None),
        _ if kind.descriptor().classification == Classification::Passive => {
            Ok(report::describe(kind, ctx.workspace))
        }
        _ => manage::apply(kind, ctx).map(|()| None),
    }
}
