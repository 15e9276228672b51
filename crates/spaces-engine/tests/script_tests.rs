use pretty_assertions::assert_eq;
use spaces_engine::script::{parse_script, ParseError};
use spaces_engine::{
    CommandStatus, Engine, EngineConfig, FailureKind, ScriptError, ScriptValidation,
};
use spaces_registry::{CommandKind, Params};
use spaces_test_utils::{workspace_with_configuration, Fixtures};

fn configured() -> Engine {
    Engine::default().with_workspace(workspace_with_configuration(&[
        &[1.0, 0.0],
        &[0.0, 2.0],
        &[-1.0, 1.0],
    ]))
}

#[test]
fn parse_failure_halts_after_earlier_lines_ran() {
    let mut engine = configured();
    let start = engine.workspace().clone();

    let err = engine
        .run_script("Rotate degrees=45\nCenter\nRotate degrees=\nAbout\n")
        .unwrap_err();
    assert_eq!(err.line(), Some(3));
    assert!(matches!(err, ScriptError::Parse(ParseError::Malformed { line: 3, .. })));

    // About on line 4 never ran
    let commands: Vec<CommandKind> = engine
        .session_history()
        .records()
        .iter()
        .map(|r| r.command)
        .collect();
    assert_eq!(commands, vec![CommandKind::Rotate, CommandKind::Center]);
    assert_eq!(engine.stacks().undo_depth(), 2);

    let after_rotate = {
        let mut engine = configured();
        engine.execute("Rotate", &Params::new().with("degrees", 45.0), false);
        engine.workspace().clone()
    };
    assert!(engine.undo().success);
    assert_eq!(engine.workspace(), &after_rotate);
    assert!(engine.undo().success);
    assert_eq!(engine.workspace(), &start);
}

#[test]
fn unknown_command_fails_before_anything_runs() {
    let mut engine = configured();
    let err = engine
        .run_script("Rotate degrees=45\n\nFrobnicate everything\n")
        .unwrap_err();
    assert!(matches!(
        err,
        ScriptError::Parse(ParseError::UnknownCommand { line: 3, .. })
    ));
    assert!(engine.session_history().is_empty());
    assert!(!engine.can_undo());
}

#[test]
fn interactive_only_commands_are_rejected_up_front() {
    let mut engine = configured();
    let err = engine
        .run_script("Center\nNew grouped data grouping_var=Party\n")
        .unwrap_err();
    assert!(matches!(err, ScriptError::InteractiveOnly { line: 2, .. }));
    assert!(engine.session_history().is_empty());
}

#[test]
fn whole_script_validation_checks_parameters_first() {
    let config = EngineConfig::new().with_script_validation(ScriptValidation::WholeScript);
    let mut engine = Engine::new(config).with_workspace(workspace_with_configuration(&[
        &[1.0, 0.0],
        &[0.0, 2.0],
    ]));
    let err = engine.run_script("Center\nRotate degrees=999\n").unwrap_err();
    assert!(matches!(err, ScriptError::Invalid { line: 2, .. }), "{err}");
    assert!(engine.session_history().is_empty());
}

#[test]
fn line_by_line_runs_until_an_unknown_command() {
    let config = EngineConfig::new().with_script_validation(ScriptValidation::LineByLine);
    let mut engine = Engine::new(config).with_workspace(workspace_with_configuration(&[
        &[1.0, 0.0],
        &[0.0, 2.0],
    ]));
    let err = engine.run_script("Center\nFrobnicate\n").unwrap_err();
    assert_eq!(err.line(), Some(2));
    assert_eq!(engine.stacks().undo_depth(), 1);
}

#[test]
fn failing_command_stops_the_script() {
    let mut engine = configured();
    let err = engine
        .run_script("Center\nVarimax\nRotate degrees=10\n")
        .unwrap_err();
    match err {
        ScriptError::Failed {
            line,
            command,
            failure,
            completed,
            ..
        } => {
            assert_eq!(line, 2);
            assert_eq!(command, "Varimax");
            assert_eq!(failure, FailureKind::Analysis);
            assert_eq!(completed, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    let statuses: Vec<&CommandStatus> = engine
        .session_history()
        .records()
        .iter()
        .map(|r| &r.status)
        .collect();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0], &CommandStatus::Completed);
    assert!(matches!(statuses[1], CommandStatus::Failed(_)));
    assert_eq!(engine.stacks().undo_depth(), 1);
}

#[test]
fn scripts_never_prompt_for_missing_parameters() {
    let mut engine = configured();
    let err = engine.run_script("Rotate\n").unwrap_err();
    assert!(matches!(
        err,
        ScriptError::Failed {
            failure: FailureKind::Parameter,
            ..
        }
    ));
}

fn interactive_session(fixtures: &Fixtures) -> Engine {
    let mut engine = Engine::new(EngineConfig::new().with_data_dir(fixtures.path()));
    let steps: Vec<(&str, Params)> = vec![
        ("Configuration", Params::new().with("file", "configuration.txt")),
        ("Rotate", Params::new().with("degrees", 30_i64)),
        ("Center", Params::new()),
        ("Rotate", Params::new().with("degrees", 90.0)),
        ("Undo", Params::new()),
        (
            "Move",
            Params::new().with("dimension", "Left-Right").with("distance", 0.25),
        ),
        ("Invert", Params::new().with("dimensions", &["Up-Down"][..])),
        ("Rescale", Params::new().with("factors", &["2", "0.5"][..])),
        (
            "Reference points",
            Params::new().with("contest", &["Alpha", "Beta"][..]),
        ),
        ("Target", Params::new().with("file", "target.txt")),
        ("Print configuration", Params::new()),
        ("View script", Params::new()),
    ];
    for (name, params) in steps {
        let result = engine.execute(name, &params, true);
        assert!(result.success, "{name}: {}", result.message);
    }
    // failed commands are left out of the script
    let result = engine.execute("Rotate", &Params::new().with("degrees", 720.0), true);
    assert!(!result.success);
    engine
}

#[test]
fn generated_script_reproduces_the_session() {
    let fixtures = Fixtures::standard();
    let original = interactive_session(&fixtures);
    let script = original.generate_script();

    assert!(script.starts_with("# Spaces script"));
    assert!(!script.contains("View script"));
    assert!(!script.contains("720"));
    assert!(script.contains("Rotate degrees=30.0\n"));
    assert!(script.contains("Configuration file=\"configuration.txt\"\n"));

    let mut replay = Engine::new(EngineConfig::new().with_data_dir(fixtures.path()));
    let report = replay.run_script(&script).unwrap();
    assert_eq!(report.len(), 11);
    assert_eq!(replay.workspace(), original.workspace());
}

#[test]
fn generated_lines_parse_back_to_recorded_parameters() {
    let fixtures = Fixtures::standard();
    let engine = interactive_session(&fixtures);
    let parsed = parse_script(&engine.generate_script()).unwrap();
    let recorded: Vec<(CommandKind, Params)> = engine
        .session_history()
        .completed()
        .filter(|r| r.command != CommandKind::ViewScript)
        .map(|r| (r.command, r.params.clone()))
        .collect();
    let reparsed: Vec<(CommandKind, Params)> =
        parsed.into_iter().map(|l| (l.kind, l.params)).collect();
    assert_eq!(reparsed.len(), recorded.len());
    for ((kind_a, params_a), (kind_b, params_b)) in recorded.iter().zip(&reparsed) {
        assert_eq!(kind_a, kind_b);
        // bare integers parse as integers; binding widens them again
        let descriptor = kind_a.descriptor();
        for (name, value) in params_a.iter() {
            let spec = descriptor.param(name).unwrap();
            let reparsed = spec.coerce(params_b.get(name).unwrap().clone()).unwrap();
            assert_eq!(&reparsed, value, "{kind_a} {name}");
        }
    }
}

#[test]
fn save_and_open_script_round_trip() {
    let fixtures = Fixtures::standard();
    let mut original = interactive_session(&fixtures);
    let result = original.execute(
        "Save script",
        &Params::new().with("file", "session.txt"),
        false,
    );
    assert!(result.success, "{}", result.message);
    let saved = std::fs::read_to_string(fixtures.path().join("session.txt")).unwrap();
    assert!(saved.contains("Reference points contest=[\"Alpha\", \"Beta\"]"));

    let mut replay = Engine::new(EngineConfig::new().with_data_dir(fixtures.path()));
    let result = replay.execute(
        "Open script",
        &Params::new().with("file", "session.txt"),
        false,
    );
    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "ran 11 commands");
    assert_eq!(replay.workspace(), original.workspace());
    // the script's commands are individually undoable
    assert_eq!(replay.stacks().undo_depth(), 8);
}

#[test]
fn self_opening_script_is_bounded() {
    let fixtures = Fixtures::standard();
    fixtures.write("loop.txt", "Open script file=\"loop.txt\"\n");
    let mut engine = Engine::new(EngineConfig::new().with_data_dir(fixtures.path()));
    let result = engine.execute(
        "Open script",
        &Params::new().with("file", "loop.txt"),
        false,
    );
    assert_eq!(result.failure, Some(FailureKind::Script));
    assert!(result.message.contains("nested deeper than 4 levels"));

    // depth is unwound after the failure
    assert!(engine.run_script("About\n").is_ok());
}

#[test]
fn missing_script_file_is_reported() {
    let fixtures = Fixtures::new();
    let mut engine = Engine::default();
    let err = engine
        .run_script_file(&fixtures.path().join("absent.txt"))
        .unwrap_err();
    assert!(matches!(err, ScriptError::Io { .. }));
    assert_eq!(err.line(), None);
}
