//! Workspace management: reference points, deactivation, settings and the
//! interactive builders

use super::CommandContext;
use crate::error::CommandError;
use spaces_registry::{CommandKind, ParamError, Params};
use spaces_workspace::readers::item_label;
use spaces_workspace::{
    Configuration, EntityName, GroupedData, PlanePoint, PointSet, PresentationLayer,
    ReferencePoint, Table, Workspace,
};

pub(super) fn apply(kind: CommandKind, ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
    let params = ctx.params;
    let workspace = &mut *ctx.workspace;
    match kind {
        CommandKind::ReferencePoints => reference_points(workspace, params)?,
        CommandKind::Deactivate => {
            for item in params.list("items")? {
                let name: EntityName = item
                    .parse()
                    .map_err(|e: spaces_workspace::UnknownEntity| ParamError::invalid("items", e.to_string()))?;
                workspace.clear(name);
            }
        }
        CommandKind::Create => create(workspace, params)?,
        CommandKind::NewGroupedData => new_grouped_data(workspace, params)?,
        _ => settings(kind, workspace, params)?,
    }
    Ok(())
}

fn reference_points(workspace: &mut Workspace, params: &Params) -> Result<(), ParamError> {
    let contest = params.list("contest")?;
    let [a, b] = contest else {
        return Err(ParamError::invalid(
            "contest",
            format!("expected two reference points, found {}", contest.len()),
        ));
    };
    let (hor, vert) = (workspace.settings().hor_dim, workspace.settings().vert_dim);
    let points = &workspace.configuration().points;
    let rival = |key: &str| {
        let index = points
            .point_index(key)
            .ok_or_else(|| ParamError::invalid("contest", format!("no point named '{key}'")))?;
        Ok::<_, ParamError>(ReferencePoint {
            index,
            name: points.point_names[index].clone(),
            label: points.point_labels[index].clone(),
            position: PlanePoint::new(
                points.coordinate(index, hor).unwrap_or_default(),
                points.coordinate(index, vert).unwrap_or_default(),
            ),
        })
    };
    let (rival_a, rival_b) = (rival(a)?, rival(b)?);
    if rival_a.index == rival_b.index {
        return Err(ParamError::invalid("contest", "reference points must differ"));
    }
    workspace.rivalry_mut().set_reference_points(rival_a, rival_b);
    Ok(())
}

fn dimension_index(workspace: &Workspace, key: &str) -> Result<usize, ParamError> {
    workspace
        .configuration()
        .points
        .dim_index(key)
        .ok_or_else(|| ParamError::invalid("plane", format!("no dimension named '{key}'")))
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn settings(kind: CommandKind, workspace: &mut Workspace, params: &Params) -> Result<(), ParamError> {
    match kind {
        CommandKind::SettingsPlane => {
            let plane = params.list("plane")?;
            let [hor, vert] = plane else {
                return Err(ParamError::invalid(
                    "plane",
                    format!("expected two dimensions, found {}", plane.len()),
                ));
            };
            let (hor, vert) = (dimension_index(workspace, hor)?, dimension_index(workspace, vert)?);
            if hor == vert {
                return Err(ParamError::invalid("plane", "dimensions must differ"));
            }
            let settings = workspace.settings_mut();
            settings.hor_dim = hor;
            settings.vert_dim = vert;
        }
        CommandKind::SettingsDisplaySizing => {
            let settings = workspace.settings_mut();
            settings.axis_extra = params.float("axis_extra")?;
            settings.displacement = params.float("displacement")?;
            settings.point_size = params.integer("point_size")?;
        }
        CommandKind::SettingsLayoutOptions => {
            let settings = workspace.settings_mut();
            settings.max_cols = params.integer("max_cols")?;
            settings.width = params.integer("width")?;
            settings.decimals = params.integer("decimals")?;
        }
        CommandKind::SettingsPlotSettings => {
            let settings = workspace.settings_mut();
            settings.show_bisector = params.boolean("bisector")?;
            settings.show_connector = params.boolean("connector")?;
            settings.show_reference_points = params.boolean("reference_points")?;
            settings.show_just_reference_points = params.boolean("just_reference_points")?;
        }
        CommandKind::SettingsPresentationLayer => {
            let layer: PresentationLayer = params
                .text("layer")?
                .parse()
                .map_err(|reason: String| ParamError::invalid("layer", reason))?;
            workspace.settings_mut().presentation_layer = layer;
        }
        CommandKind::SettingsSegmentSizing => {
            let settings = workspace.settings_mut();
            settings.battleground_size = params.integer("battleground")?;
            settings.core_tolerance = params.integer("core")?;
        }
        CommandKind::SettingsVectorSizing => {
            let settings = workspace.settings_mut();
            settings.vector_head_width = params.float("vector_head_width")?;
            settings.vector_width = params.float("vector_width")?;
        }
        _ => {}
    }
    Ok(())
}

/// Split a flat coordinate list into rows of `width`
fn rows_of(values: Vec<f64>, rows: usize, width: usize) -> Result<Vec<Vec<f64>>, ParamError> {
    if values.len() != rows * width {
        return Err(ParamError::invalid(
            "coordinates",
            format!("expected {} values, found {}", rows * width, values.len()),
        ));
    }
    Ok(values.chunks(width.max(1)).map(<[f64]>::to_vec).collect())
}

fn create(workspace: &mut Workspace, params: &Params) -> Result<(), ParamError> {
    let dim_names = params.list("dim_names")?.to_vec();
    let point_names = params.list("point_names")?.to_vec();
    if dim_names.is_empty() || point_names.is_empty() {
        return Err(ParamError::invalid("dim_names", "needs at least one dimension and one point"));
    }
    let rows = rows_of(params.numbers("coordinates")?, point_names.len(), dim_names.len())?;
    let dim_labels = dim_names.iter().map(|n| item_label(n)).collect();
    let point_labels = point_names.iter().map(|n| item_label(n)).collect();
    let points = PointSet::new(dim_names, dim_labels, point_names, point_labels, rows)
        .map_err(|e| ParamError::invalid("coordinates", e.to_string()))?;

    let mut configuration = Configuration::from_points(points);
    configuration.refresh_derived(workspace.settings().hor_dim, workspace.settings().vert_dim);
    *workspace.configuration_mut() = configuration;
    Ok(())
}

fn new_grouped_data(workspace: &mut Workspace, params: &Params) -> Result<(), ParamError> {
    let points = &workspace.configuration().points;
    let (dim_names, dim_labels) = (points.dim_names.clone(), points.dim_labels.clone());
    let group_names = params.list("group_names")?.to_vec();
    if group_names.is_empty() {
        return Err(ParamError::invalid("group_names", "needs at least one group"));
    }
    let rows = rows_of(params.numbers("coordinates")?, group_names.len(), dim_names.len())?;
    let group_labels: Vec<String> = group_names.iter().map(|n| item_label(n)).collect();
    let coords = Table::new(group_labels.clone(), dim_labels.clone(), rows)
        .map_err(|e| ParamError::invalid("coordinates", e.to_string()))?;

    *workspace.grouped_data_mut() = GroupedData {
        grouping_var: params.text("grouping_var")?.to_string(),
        group_codes: (1..).take(group_names.len()).collect(),
        group_names,
        group_labels,
        dim_names,
        dim_labels,
        coords,
    };
    Ok(())
}
