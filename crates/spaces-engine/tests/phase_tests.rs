use spaces_engine::phase::{allowed_transitions, validate_transition};
use spaces_engine::{Engine, Phase, PhaseTracker};
use spaces_registry::Params;
use spaces_test_utils::workspace_with_configuration;
use proptest::prelude::*;

fn any_phase() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::Initialized),
        Just(Phase::InProgress),
        Just(Phase::PreconditionsChecked),
        Just(Phase::ParametersBound),
        Just(Phase::SnapshotCaptured),
        Just(Phase::ExternalRead),
        Just(Phase::Validated),
        Just(Phase::Applied),
        Just(Phase::Presented),
        Just(Phase::Completed),
        Just(Phase::Aborted),
        Just(Phase::RolledBack),
    ]
}

#[test]
fn test_snapshot_phases() {
    assert!(validate_transition(Phase::ParametersBound, Phase::SnapshotCaptured).is_ok());
    assert!(validate_transition(Phase::SnapshotCaptured, Phase::ExternalRead).is_ok());
    assert!(validate_transition(Phase::Validated, Phase::RolledBack).is_ok());

    // nothing to roll back before the snapshot, nothing to abort after it
    assert!(validate_transition(Phase::ParametersBound, Phase::RolledBack).is_err());
    assert!(validate_transition(Phase::SnapshotCaptured, Phase::Aborted).is_err());
}

#[test]
fn test_applied_fails_without_rollback() {
    assert_eq!(allowed_transitions(Phase::Applied), &[Phase::Presented, Phase::Aborted]);
    assert!(validate_transition(Phase::Applied, Phase::RolledBack).is_err());
    assert_eq!(allowed_transitions(Phase::Presented), &[Phase::Completed]);
}

#[test]
fn test_engine_phases_follow_table() {
    let mut engine =
        Engine::default().with_workspace(workspace_with_configuration(&[&[1.0, 0.0], &[0.0, 1.0]]));
    let runs = [
        engine.execute("Rotate", &Params::new().with("degrees", 15.0), false),
        engine.execute("Rotate", &Params::new(), false),
        engine.execute("Print configuration", &Params::new(), false),
        engine.undo(),
        engine.redo(),
        engine.execute("Frobnicate", &Params::new(), false),
    ];
    for result in runs {
        assert_eq!(result.phases.first(), Some(&Phase::Initialized));
        for pair in result.phases.windows(2) {
            assert!(
                validate_transition(pair[0], pair[1]).is_ok(),
                "{}: {:?}",
                result.command,
                result.phases
            );
        }
        let last = result.phases.last().copied();
        if result.success {
            assert_eq!(last, Some(Phase::Completed));
        } else {
            assert!(matches!(last, Some(Phase::Aborted | Phase::RolledBack)));
        }
    }
}

proptest! {
    #[test]
    fn prop_validate_agrees_with_allowed(from in any_phase(), to in any_phase()) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }

    #[test]
    fn prop_terminal_phases_are_final(to in any_phase()) {
        for terminal in [Phase::Completed, Phase::Aborted, Phase::RolledBack] {
            prop_assert!(validate_transition(terminal, to).is_err());
        }
    }

    #[test]
    fn prop_tracker_fail_always_terminates(steps in proptest::collection::vec(any_phase(), 0..12)) {
        let mut tracker = PhaseTracker::new();
        for step in steps {
            let _ = tracker.advance(step);
        }
        let before = tracker.current();
        tracker.fail();
        let after = tracker.current();
        if allowed_transitions(before).is_empty() {
            prop_assert_eq!(before, after);
        } else if allowed_transitions(before).contains(&Phase::RolledBack)
            || allowed_transitions(before).contains(&Phase::Aborted)
        {
            prop_assert!(matches!(after, Phase::RolledBack | Phase::Aborted));
        }
    }
}
