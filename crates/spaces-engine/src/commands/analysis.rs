//! Algorithmic commands, delegated to the analysis backend

use super::CommandContext;
use crate::collaborators::AnalysisBackend;
use crate::error::CommandError;
use spaces_registry::{ClusterSource, CommandKind, ParamError, Params};
use spaces_workspace::{EntityName, EntityState, Workspace};
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};

fn count(params: &Params, name: &str) -> Result<usize, ParamError> {
    let value = params.integer(name)?;
    usize::try_from(value).map_err(|_| ParamError::invalid(name, format!("{value} is not a count")))
}

/// Copies of every entity the command does not declare
fn untouched(
    kind: CommandKind,
    params: &Params,
    workspace: &Workspace,
) -> Result<Vec<EntityState>, CommandError> {
    let touched = kind.descriptor().resolve_touches(params)?;
    Ok(EntityName::ALL
        .into_iter()
        .filter(|name| !touched.contains(name))
        .map(|name| workspace.capture(name))
        .collect())
}

/// Put back any undeclared entity the backend wrote
fn ensure_untouched(
    kind: CommandKind,
    before: Vec<EntityState>,
    workspace: &mut Workspace,
) -> Result<(), CommandError> {
    let mut first_changed = None;
    for state in before {
        let name = state.name();
        if workspace.capture(name) != state {
            tracing::error!(command = kind.name(), entity = %name, "analysis backend wrote an undeclared entity");
            workspace.restore(state);
            first_changed.get_or_insert(name);
        }
    }
    match first_changed {
        None => Ok(()),
        Some(name) => Err(CommandError::Internal(format!(
            "analysis backend changed {name}, which {kind} does not touch"
        ))),
    }
}

pub(super) fn apply(kind: CommandKind, ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
    let params = ctx.params;
    let workspace = &mut *ctx.workspace;
    let backend = &mut *ctx.backend;
    let before = untouched(kind, params, workspace)?;
    tracing::debug!(command = kind.name(), "delegating to analysis backend");
    let outcome = catch_unwind(AssertUnwindSafe(|| delegate(kind, params, workspace, backend)));
    let guarded = ensure_untouched(kind, before, workspace);
    let outcome = outcome.unwrap_or_else(|payload| resume_unwind(payload));
    guarded?;
    outcome?;

    // results that move the configuration must keep its derived values current
    if matches!(
        kind,
        CommandKind::Compare
            | CommandKind::FactorAnalysis
            | CommandKind::FactorAnalysisMachineLearning
            | CommandKind::Mds
            | CommandKind::PrincipalComponents
            | CommandKind::Varimax
    ) {
        let (hor, vert) = (workspace.settings().hor_dim, workspace.settings().vert_dim);
        workspace.configuration_mut().refresh_derived(hor, vert);
    }
    Ok(())
}

fn delegate(
    kind: CommandKind,
    params: &Params,
    workspace: &mut Workspace,
    backend: &mut dyn AnalysisBackend,
) -> Result<(), CommandError> {
    match kind {
        CommandKind::Cluster => {
            let source = ClusterSource::parse(params.text("data_source")?)?;
            backend.cluster(workspace, source, count(params, "n_clusters")?)?;
        }
        CommandKind::Compare => backend.compare(workspace)?,
        CommandKind::FactorAnalysis => {
            backend.factor_analysis(workspace, count(params, "n_factors")?, false)?;
        }
        CommandKind::FactorAnalysisMachineLearning => {
            backend.factor_analysis(workspace, count(params, "n_components")?, true)?;
        }
        CommandKind::LineOfSight => backend.line_of_sight(workspace)?,
        CommandKind::Mds => {
            backend.mds(
                workspace,
                count(params, "n_components")?,
                params.boolean("use_metric")?,
            )?;
        }
        CommandKind::PrincipalComponents => {
            backend.principal_components(workspace, count(params, "n_components")?)?;
        }
        CommandKind::SampleDesigner => {
            backend.sample_design(
                workspace,
                params.float("probability_of_inclusion")?,
                count(params, "nrepetitions")?,
            )?;
        }
        CommandKind::SampleRepetitions => backend.sample_repetitions(workspace)?,
        CommandKind::ScoreIndividuals => backend.score_individuals(workspace)?,
        CommandKind::Uncertainty => backend.uncertainty(workspace)?,
        CommandKind::Varimax => backend.varimax(workspace)?,
        _ => {}
    }
    Ok(())
}
