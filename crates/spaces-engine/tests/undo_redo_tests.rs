use pretty_assertions::assert_eq;
use spaces_engine::{Engine, EngineConfig, FailureKind, Phase};
use spaces_registry::Params;
use spaces_test_utils::{workspace_with_configuration, Fixtures, CONFIGURATION, TARGET};
use spaces_workspace::EntityName;

fn engine(fixtures: &Fixtures) -> Engine {
    Engine::new(EngineConfig::new().with_data_dir(fixtures.path()))
}

fn load(file: &str) -> Params {
    Params::new().with("file", file)
}

#[test]
fn load_undo_redo_scenario() {
    let fixtures = Fixtures::new();
    fixtures.write("A.txt", CONFIGURATION);
    fixtures.write("B.txt", TARGET);
    let mut engine = engine(&fixtures);
    assert!(engine.workspace().is_empty(EntityName::Configuration));

    let result = engine.execute("Configuration", &load("A.txt"), false);
    assert!(result.success, "{}", result.message);
    assert!(!engine.workspace().is_empty(EntityName::Configuration));
    assert_eq!(engine.stacks().undo_depth(), 1);
    let state_a = engine.workspace().configuration().clone();

    let result = engine.execute("Configuration", &load("B.txt"), false);
    assert!(result.success, "{}", result.message);
    assert_eq!(engine.stacks().undo_depth(), 2);
    assert_eq!(engine.stacks().redo_depth(), 0);
    let state_b = engine.workspace().configuration().clone();
    assert_ne!(state_a, state_b);

    let result = engine.undo();
    assert!(result.success);
    assert_eq!(engine.workspace().configuration(), &state_a);
    assert_eq!(engine.stacks().redo_depth(), 1);
    assert_eq!(result.restored_entities.names(), &[EntityName::Configuration]);

    let result = engine.redo();
    assert!(result.success);
    assert_eq!(engine.workspace().configuration(), &state_b);
    assert_eq!(engine.stacks().undo_depth(), 2);
    assert_eq!(engine.stacks().redo_depth(), 0);
}

#[test]
fn undo_back_to_empty_and_redo_again() {
    let fixtures = Fixtures::standard();
    let mut engine = engine(&fixtures);
    let empty = engine.workspace().clone();

    engine.execute("Configuration", &load("configuration.txt"), false);
    let loaded = engine.workspace().clone();

    assert!(engine.undo().success);
    assert_eq!(engine.workspace(), &empty);
    assert!(!engine.can_undo());

    assert!(engine.redo().success);
    assert_eq!(engine.workspace(), &loaded);
    assert!(!engine.can_redo());
}

#[test]
fn new_command_clears_redo() {
    let mut engine = Engine::default().with_workspace(workspace_with_configuration(&[
        &[1.0, 0.0],
        &[0.0, 2.0],
    ]));
    engine.execute("Rotate", &Params::new().with("degrees", 30.0), false);
    engine.execute("Center", &Params::new(), false);
    engine.undo();
    assert!(engine.can_redo());

    engine.execute("Rotate", &Params::new().with("degrees", 10.0), false);
    assert!(!engine.can_redo());
    assert_eq!(engine.stacks().undo_depth(), 2);
}

#[test]
fn failed_and_passive_commands_leave_stacks_alone() {
    let mut engine = Engine::default().with_workspace(workspace_with_configuration(&[
        &[1.0, 0.0],
        &[0.0, 2.0],
    ]));
    engine.execute("Center", &Params::new(), false);
    engine.undo();

    let result = engine.execute("Rotate", &Params::new().with("degrees", 900.0), false);
    assert_eq!(result.failure, Some(FailureKind::Parameter));
    let result = engine.execute("Print configuration", &Params::new(), false);
    assert!(result.success);

    assert_eq!(engine.stacks().undo_depth(), 0);
    assert_eq!(engine.stacks().redo_depth(), 1);
}

#[test]
fn empty_stacks_report_nothing_to_do() {
    let mut engine = Engine::default();
    let result = engine.undo();
    assert_eq!(result.failure, Some(FailureKind::NothingToUndo));
    assert_eq!(result.message, "nothing to undo");
    assert_eq!(result.phases.last(), Some(&Phase::Aborted));

    let result = engine.execute("Redo", &Params::new(), false);
    assert_eq!(result.failure, Some(FailureKind::NothingToRedo));
    assert_eq!(engine.session_history().len(), 2);
}

#[test]
fn undo_depth_is_bounded() {
    let mut engine = Engine::new(EngineConfig::new().with_max_undo_depth(2))
        .with_workspace(workspace_with_configuration(&[&[1.0, 0.0], &[0.0, 2.0]]));
    for degrees in [10.0, 20.0, 30.0] {
        engine.execute("Rotate", &Params::new().with("degrees", degrees), false);
    }
    assert_eq!(engine.stacks().undo_depth(), 2);
    assert!(engine.undo().success);
    assert!(engine.undo().success);
    assert!(!engine.undo().success);
}

#[test]
fn undo_restores_every_touched_entity() {
    let fixtures = Fixtures::standard();
    let mut engine = engine(&fixtures);
    engine.execute("Configuration", &load("configuration.txt"), false);
    let result = engine.execute(
        "Reference points",
        &Params::new().with("contest", &["Alpha", "Gamma"][..]),
        false,
    );
    assert!(result.success, "{}", result.message);
    let before = engine.workspace().clone();

    engine.execute("Rotate", &Params::new().with("degrees", 45.0), false);
    assert_ne!(engine.workspace().rivalry(), before.rivalry());

    let result = engine.undo();
    assert_eq!(
        result.restored_entities.to_string(),
        "configuration, rivalry, scores"
    );
    assert_eq!(engine.workspace(), &before);
}

#[test]
fn settings_changes_are_undoable() {
    let fixtures = Fixtures::standard();
    let mut engine = engine(&fixtures);
    engine.execute("Configuration", &load("configuration.txt"), false);
    let result = engine.execute(
        "Settings - plane",
        &Params::new().with("plane", &["Up-Down", "Left-Right"][..]),
        false,
    );
    assert!(result.success, "{}", result.message);
    assert_eq!(engine.workspace().settings().hor_dim, 1);

    engine.undo();
    assert_eq!(engine.workspace().settings().hor_dim, 0);
}

#[test]
fn deactivate_is_undoable() {
    let fixtures = Fixtures::standard();
    let mut engine = engine(&fixtures);
    engine.execute("Configuration", &load("configuration.txt"), false);
    engine.execute("Target", &load("target.txt"), false);
    let before = engine.workspace().clone();

    let result = engine.execute(
        "Deactivate",
        &Params::new().with("items", &["Target"][..]),
        false,
    );
    assert!(result.success, "{}", result.message);
    assert!(engine.workspace().is_empty(EntityName::Target));
    assert!(!engine.workspace().is_empty(EntityName::Configuration));

    engine.undo();
    assert_eq!(engine.workspace(), &before);
}
