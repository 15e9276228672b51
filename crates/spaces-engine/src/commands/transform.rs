//! Geometric transforms of the active configuration
//!
//! Every transform is a per-point map over coordinate rows. It is applied to
//! the configuration, to scores positioned in the same space and to the
//! rivalry's reference points, so the three stay aligned.

use super::CommandContext;
use crate::error::CommandError;
use spaces_registry::{CommandKind, ParamError};
use spaces_workspace::{PlanePoint, Workspace};

pub(super) fn apply(kind: CommandKind, ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
    let params = ctx.params;
    let workspace = &mut *ctx.workspace;
    let points = &workspace.configuration().points;
    let ndim = points.ndim();

    match kind {
        CommandKind::Center => {
            let means = points.coords.column_means();
            transform(workspace, |row| {
                for (value, mean) in row.iter_mut().zip(&means) {
                    *value -= mean;
                }
            });
        }
        CommandKind::Rotate => {
            let radians = params.float("degrees")?.to_radians();
            let (sin, cos) = radians.sin_cos();
            let (hor, vert) = plane(workspace)?;
            transform(workspace, |row| {
                let (x, y) = (row[hor], row[vert]);
                row[hor] = x * cos - y * sin;
                row[vert] = x * sin + y * cos;
            });
        }
        CommandKind::Move => {
            let key = params.text("dimension")?;
            let dim = points
                .dim_index(key)
                .ok_or_else(|| ParamError::invalid("dimension", format!("no dimension named '{key}'")))?;
            let distance = params.float("distance")?;
            transform(workspace, |row| row[dim] += distance);
        }
        CommandKind::Invert => {
            let dims = params
                .list("dimensions")?
                .iter()
                .map(|key| {
                    points.dim_index(key).ok_or_else(|| {
                        ParamError::invalid("dimensions", format!("no dimension named '{key}'"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            transform(workspace, |row| {
                for dim in &dims {
                    row[*dim] = -row[*dim];
                }
            });
        }
        CommandKind::Rescale => {
            let factors = params.numbers("factors")?;
            let factors = match factors.len() {
                1 => vec![factors[0]; ndim],
                n if n == ndim => factors,
                n => {
                    return Err(ParamError::invalid(
                        "factors",
                        format!("expected 1 or {ndim} factors, found {n}"),
                    )
                    .into())
                }
            };
            transform(workspace, |row| {
                for (value, factor) in row.iter_mut().zip(&factors) {
                    *value *= factor;
                }
            });
        }
        _ => {}
    }
    Ok(())
}

/// Indices of the displayed plane, checked against the configuration
fn plane(workspace: &Workspace) -> Result<(usize, usize), ParamError> {
    let settings = workspace.settings();
    let ndim = workspace.configuration().points.ndim();
    if settings.hor_dim >= ndim || settings.vert_dim >= ndim || settings.hor_dim == settings.vert_dim {
        return Err(ParamError::invalid(
            "plane",
            format!(
                "plane ({}, {}) does not fit a {ndim}-dimensional configuration",
                settings.hor_dim, settings.vert_dim
            ),
        ));
    }
    Ok((settings.hor_dim, settings.vert_dim))
}

/// Apply a row map to every positioned entity and refresh derived values
fn transform(workspace: &mut Workspace, f: impl Fn(&mut [f64])) {
    let (hor, vert) = (workspace.settings().hor_dim, workspace.settings().vert_dim);
    let ndim = workspace.configuration().points.ndim();

    let configuration = workspace.configuration_mut();
    configuration.points.coords.map_rows(&f);
    configuration.refresh_derived(hor, vert);

    let scores = workspace.scores_mut();
    if !scores.scores.is_empty() && scores.ndim() == ndim {
        scores.scores.map_rows(&f);
    }

    let points = workspace.configuration().points.clone();
    let rivalry = workspace.rivalry_mut();
    for rival in [&mut rivalry.rival_a, &mut rivalry.rival_b].into_iter().flatten() {
        rival.position = PlanePoint::new(
            points.coordinate(rival.index, hor).unwrap_or_default(),
            points.coordinate(rival.index, vert).unwrap_or_default(),
        );
    }
    rivalry.refresh_lines();
}
