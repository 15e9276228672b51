//! Loaders: commands that establish an entity from an external file

use super::CommandContext;
use crate::collaborators::AnalysisError;
use crate::error::CommandError;
use spaces_registry::{CommandKind, ParamError};
use spaces_workspace::readers;
use spaces_workspace::{Configuration, Correlations, Similarities, SimilarityMatrix, ValueType};

/// Read the file named by the `file` parameter into the live entity
pub(super) fn read(kind: CommandKind, ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
    let path = ctx.config.resolve_path(ctx.params.text("file")?);
    tracing::debug!(command = kind.name(), path = %path.display(), "reading external data");
    let workspace = &mut *ctx.workspace;
    match kind {
        CommandKind::Configuration => {
            *workspace.configuration_mut() = Configuration::from_points(readers::read_point_set(&path)?);
        }
        CommandKind::Target => {
            workspace.target_mut().points = readers::read_point_set(&path)?;
        }
        CommandKind::Similarities => {
            let value_type: ValueType = ctx
                .params
                .text("value_type")?
                .parse()
                .map_err(|reason: String| ParamError::invalid("value_type", reason))?;
            let matrix = SimilarityMatrix::new(readers::read_lower_triangle(&path)?, value_type);
            *workspace.similarities_mut() = Similarities::from_matrix(matrix);
        }
        CommandKind::Correlations => {
            *workspace.correlations_mut() = Correlations {
                matrix: readers::read_lower_triangle(&path)?,
            };
        }
        CommandKind::Evaluations => {
            *workspace.evaluations_mut() = readers::read_evaluations(&path)?;
        }
        CommandKind::Individuals => {
            *workspace.individuals_mut() = readers::read_individuals(&path)?;
        }
        CommandKind::GroupedData => {
            *workspace.grouped_data_mut() = readers::read_grouped_data(&path)?;
        }
        CommandKind::OpenScores => {
            *workspace.scores_mut() = readers::read_scores(&path)?;
        }
        CommandKind::OpenSampleDesign => {
            let design = readers::read_csv_table(&path)?;
            workspace.uncertainty_mut().set_sample_design(design);
        }
        CommandKind::OpenSampleRepetitions => {
            workspace.uncertainty_mut().sample_repetitions = readers::read_csv_table(&path)?;
        }
        CommandKind::OpenSampleSolutions => {
            workspace.uncertainty_mut().sample_solutions = readers::read_csv_table(&path)?;
        }
        _ => {}
    }
    Ok(())
}

/// Derive dependent values once the loaded data has been validated
pub(super) fn derive(kind: CommandKind, ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
    let workspace = &mut *ctx.workspace;
    match kind {
        CommandKind::Configuration => {
            let (hor, vert) = (workspace.settings().hor_dim, workspace.settings().vert_dim);
            workspace.configuration_mut().refresh_derived(hor, vert);
        }
        CommandKind::Evaluations => {
            let correlations = workspace
                .evaluations()
                .item_correlations()
                .map_err(|e| AnalysisError::Failed(e.to_string()))?;
            *workspace.correlations_mut() = correlations;
        }
        _ => {}
    }
    Ok(())
}
