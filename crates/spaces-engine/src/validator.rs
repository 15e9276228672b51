//! Cross-entity consistency checks
//!
//! After a command establishes new data, the data must agree with what is
//! already loaded. Entities share two facets: the points they describe and
//! the dimensions they are positioned on. Two entities carrying the same
//! facet conflict when the counts or names differ.

use serde::Serialize;
use spaces_registry::CommandKind;
use spaces_workspace::{EntityName, Workspace};
use std::fmt;

/// Facet on which two entities disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictAspect {
    Points,
    Dimensions,
}

impl fmt::Display for ConflictAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Points => "points",
            Self::Dimensions => "dimensions",
        })
    }
}

/// New data disagrees with an existing entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    /// Entity the command established
    pub new: EntityName,
    /// Entity already in the workspace
    pub existing: EntityName,
    pub aspect: ConflictAspect,
    pub detail: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} do not match {} ({})",
            self.new.display_name(),
            self.aspect,
            self.existing.display_name(),
            self.detail
        )
    }
}

/// Checks new data against existing data
pub trait ConsistencyValidator {
    /// Conflicts introduced by `command`, which has just written its data
    fn validate(&self, command: CommandKind, workspace: &Workspace) -> Vec<Conflict>;
}

/// Compares point and dimension names between entities
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionalValidator;

/// Entity whose data `command` establishes, if any
#[must_use]
pub fn established_by(command: CommandKind) -> Option<EntityName> {
    match command {
        CommandKind::Create => Some(EntityName::Configuration),
        CommandKind::NewGroupedData => Some(EntityName::GroupedData),
        // uncertainty files carry no comparable facet
        CommandKind::OpenSampleDesign
        | CommandKind::OpenSampleRepetitions
        | CommandKind::OpenSampleSolutions => None,
        other => other.loads(),
    }
}

fn points(workspace: &Workspace, name: EntityName) -> Option<&[String]> {
    match name {
        EntityName::Configuration => Some(workspace.configuration().points.point_names.as_slice()),
        EntityName::Target => Some(workspace.target().points.point_names.as_slice()),
        EntityName::Similarities => Some(workspace.similarities().active.matrix.item_names()),
        EntityName::Correlations => Some(workspace.correlations().matrix.item_names()),
        EntityName::Evaluations => Some(workspace.evaluations().item_names.as_slice()),
        _ => None,
    }
}

fn dimensions(workspace: &Workspace, name: EntityName) -> Option<&[String]> {
    match name {
        EntityName::Configuration => Some(workspace.configuration().points.dim_names.as_slice()),
        EntityName::Target => Some(workspace.target().points.dim_names.as_slice()),
        EntityName::GroupedData => Some(workspace.grouped_data().dim_names.as_slice()),
        EntityName::Scores => Some(workspace.scores().dim_names.as_slice()),
        _ => None,
    }
}

fn compare(
    new: EntityName,
    existing: EntityName,
    aspect: ConflictAspect,
    new_names: &[String],
    existing_names: &[String],
) -> Option<Conflict> {
    if new_names == existing_names {
        return None;
    }
    let detail = if new_names.len() == existing_names.len() {
        let (a, b) = new_names
            .iter()
            .zip(existing_names)
            .find(|(a, b)| a != b)
            .map_or((String::new(), String::new()), |(a, b)| (a.clone(), b.clone()));
        format!("'{a}' where '{b}' was expected")
    } else {
        format!("{} {aspect} against {}", new_names.len(), existing_names.len())
    };
    Some(Conflict {
        new,
        existing,
        aspect,
        detail,
    })
}

impl ConsistencyValidator for DimensionalValidator {
    fn validate(&self, command: CommandKind, workspace: &Workspace) -> Vec<Conflict> {
        let Some(new) = established_by(command) else {
            return Vec::new();
        };
        if workspace.is_empty(new) {
            return Vec::new();
        }
        let touched = command.descriptor().touches.fixed();
        let mut conflicts = Vec::new();

        for existing in EntityName::ALL {
            if existing == new || touched.contains(&existing) || workspace.is_empty(existing) {
                continue;
            }
            let facets = [
                (ConflictAspect::Points, points(workspace, new), points(workspace, existing)),
                (
                    ConflictAspect::Dimensions,
                    dimensions(workspace, new),
                    dimensions(workspace, existing),
                ),
            ];
            // one conflict per pair is enough to decide
            if let Some(conflict) = facets.into_iter().find_map(|(aspect, a, b)| {
                compare(new, existing, aspect, a?, b?)
            }) {
                conflicts.push(conflict);
            }
        }
        if !conflicts.is_empty() {
            tracing::debug!(command = command.name(), conflicts = conflicts.len(), "consistency conflicts");
        }
        conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spaces_workspace::{Configuration, PointSet, Scores, Table, Target};

    fn points_named(names: &[&str], dims: &[&str]) -> PointSet {
        let names: Vec<String> = names.iter().map(ToString::to_string).collect();
        let dims: Vec<String> = dims.iter().map(ToString::to_string).collect();
        let rows = vec![vec![0.0; dims.len()]; names.len()];
        PointSet::new(dims.clone(), dims, names.clone(), names, rows).unwrap()
    }

    #[test]
    fn matching_target_is_consistent() {
        let mut workspace = Workspace::new();
        *workspace.configuration_mut() =
            Configuration::from_points(points_named(&["a", "b"], &["x", "y"]));
        workspace.target_mut().points = points_named(&["a", "b"], &["x", "y"]);
        assert!(DimensionalValidator
            .validate(CommandKind::Target, &workspace)
            .is_empty());
    }

    #[test]
    fn renamed_point_conflicts() {
        let mut workspace = Workspace::new();
        *workspace.configuration_mut() =
            Configuration::from_points(points_named(&["a", "b"], &["x", "y"]));
        *workspace.target_mut() = Target {
            points: points_named(&["a", "c"], &["x", "y"]),
        };
        let conflicts = DimensionalValidator.validate(CommandKind::Target, &workspace);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].existing, EntityName::Configuration);
        assert_eq!(conflicts[0].aspect, ConflictAspect::Points);
        assert_eq!(
            conflicts[0].to_string(),
            "target points do not match configuration ('c' where 'b' was expected)"
        );
    }

    #[test]
    fn dimension_count_conflicts_with_scores() {
        let mut workspace = Workspace::new();
        *workspace.scores_mut() = Scores::from_table(
            vec!["x".into()],
            vec!["x".into()],
            Table::new(vec!["r1".into()], vec!["x".into()], vec![vec![1.0]]).unwrap(),
        );
        *workspace.configuration_mut() =
            Configuration::from_points(points_named(&["a", "b"], &["x", "y"]));
        let conflicts = DimensionalValidator.validate(CommandKind::Configuration, &workspace);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].aspect, ConflictAspect::Dimensions);
        assert_eq!(conflicts[0].detail, "2 dimensions against 1");
    }

    #[test]
    fn transforms_are_never_checked() {
        let mut workspace = Workspace::new();
        *workspace.configuration_mut() =
            Configuration::from_points(points_named(&["a"], &["x"]));
        workspace.target_mut().points = points_named(&["z"], &["w"]);
        assert!(DimensionalValidator.validate(CommandKind::Rotate, &workspace).is_empty());
        assert_eq!(established_by(CommandKind::Create), Some(EntityName::Configuration));
    }
}
