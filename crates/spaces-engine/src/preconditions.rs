//! Precondition and limitation checks
//!
//! Both run before any snapshot exists, so a failure leaves nothing to roll
//! back.

use crate::error::CommandError;
use spaces_registry::{CommandKind, Descriptor};
use spaces_workspace::Workspace;

/// Check that every entity the command needs holds data
///
/// # Errors
/// Returns [`CommandError::Precondition`] naming the first unmet requirement.
pub fn check_requirements(descriptor: &Descriptor, workspace: &Workspace) -> Result<(), CommandError> {
    match descriptor
        .requires
        .iter()
        .find(|requirement| !workspace.satisfies(**requirement))
    {
        Some(requirement) => Err(CommandError::Precondition {
            command: descriptor.name,
            requirement: *requirement,
        }),
        None => Ok(()),
    }
}

/// Check data shape limitations of specific commands
///
/// # Errors
/// Returns [`CommandError::Limitation`] when data is present but unusable.
pub fn check_limitations(kind: CommandKind, workspace: &Workspace) -> Result<(), CommandError> {
    let limitation = |reason: String| {
        Err(CommandError::Limitation {
            command: kind.name(),
            reason,
        })
    };
    let points = &workspace.configuration().points;
    match kind {
        CommandKind::Alike | CommandKind::StressContribution | CommandKind::Shepard => {
            let nitems = workspace.similarities().nitems();
            if nitems != points.npoint() {
                return limitation(format!(
                    "configuration has {} points but similarities have {nitems} items",
                    points.npoint()
                ));
            }
        }
        CommandKind::Compare => {
            let target = &workspace.target().points;
            if target.npoint() != points.npoint() || target.ndim() != points.ndim() {
                return limitation(format!(
                    "target is {}x{} but configuration is {}x{}",
                    target.npoint(),
                    target.ndim(),
                    points.npoint(),
                    points.ndim()
                ));
            }
        }
        CommandKind::Rotate | CommandKind::Varimax if points.ndim() < 2 => {
            return limitation("needs at least two dimensions".to_string());
        }
        CommandKind::ReferencePoints if points.npoint() < 2 => {
            return limitation("needs at least two points".to_string());
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use spaces_workspace::{Configuration, PointSet, Requirement};

    fn one_dimension() -> Workspace {
        let mut workspace = Workspace::new();
        *workspace.configuration_mut() = Configuration::from_points(
            PointSet::new(
                vec!["x".into()],
                vec!["x".into()],
                vec!["a".into(), "b".into()],
                vec!["a".into(), "b".into()],
                vec![vec![1.0], vec![2.0]],
            )
            .unwrap(),
        );
        workspace
    }

    #[test]
    fn missing_configuration_is_reported() {
        let err = check_requirements(CommandKind::Center.descriptor(), &Workspace::new()).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Precondition {
                command: "Center",
                requirement: Requirement::Configuration
            }
        ));
    }

    #[test]
    fn first_unmet_requirement_wins() {
        let err = check_requirements(CommandKind::Joint.descriptor(), &one_dimension()).unwrap_err();
        assert_eq!(err.to_string(), "Joint needs scores");
    }

    #[test]
    fn rotate_needs_two_dimensions() {
        let workspace = one_dimension();
        assert!(check_requirements(CommandKind::Rotate.descriptor(), &workspace).is_ok());
        let err = check_limitations(CommandKind::Rotate, &workspace).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Precondition);
        assert!(check_limitations(CommandKind::Center, &workspace).is_ok());
    }

    #[test]
    fn alike_needs_matching_item_count() {
        let err = check_limitations(CommandKind::Alike, &one_dimension()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Alike: configuration has 2 points but similarities have 0 items"
        );
    }
}
