//! Script generation from session history

use crate::history::SessionHistory;
use chrono::{SecondsFormat, Utc};
use spaces_registry::{Classification, CommandKind, Params};

/// Script line for one command
///
/// Parsing the line yields the same command and parameters.
#[must_use]
pub fn format_line(kind: CommandKind, params: &Params) -> String {
    if params.is_empty() {
        kind.name().to_string()
    } else {
        format!("{} {params}", kind.name())
    }
}

/// Script reproducing the completed commands of a session
///
/// Script commands are left out and interactive-only commands are kept as
/// comments, since a script cannot run them.
#[must_use]
pub fn generate(history: &SessionHistory) -> String {
    let header = [
        "# Spaces script".to_string(),
        format!("# Generated {}", Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        format!("# spaces-engine {}", crate::VERSION),
    ];
    let body = history.completed().filter_map(|record| {
        let line = format_line(record.command, &record.params);
        match record.command.descriptor().classification {
            Classification::ScriptMeta => None,
            Classification::InteractiveOnly => Some(format!("# interactive only: {line}")),
            Classification::Active | Classification::Passive => Some(line),
        }
    });
    header.into_iter().chain(body).map(|line| line + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parser::parse_script;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_params_as_literals() {
        let params = Params::new()
            .with("file", "my \"best\" data.txt")
            .with("value_type", "similarities");
        assert_eq!(
            format_line(CommandKind::Similarities, &params),
            r#"Similarities file="my \"best\" data.txt" value_type="similarities""#
        );
        assert_eq!(format_line(CommandKind::Center, &Params::new()), "Center");
    }

    #[test]
    fn skips_failed_and_script_commands() {
        let mut history = SessionHistory::new();
        let id = history.begin(CommandKind::Rotate, &Params::new().with("degrees", 90.0));
        history.complete(id);
        let id = history.begin(CommandKind::Center, &Params::new());
        history.fail(id, "needs an active configuration");
        let id = history.begin(CommandKind::SaveScript, &Params::new().with("file", "s.txt"));
        history.complete(id);
        let id = history.begin(
            CommandKind::Create,
            &Params::new().with("dim_names", &["x"][..]),
        );
        history.complete(id);

        let script = generate(&history);
        let body: Vec<&str> = script.lines().filter(|l| !l.starts_with("# ")).collect();
        assert_eq!(body, vec!["Rotate degrees=90.0"]);
        assert!(script.contains("# interactive only: Create dim_names=[\"x\"]"));
        assert!(script.starts_with("# Spaces script\n# Generated "));

        let parsed = parse_script(&script).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].kind, CommandKind::Rotate);
        assert_eq!(parsed[0].line, 4);
    }

    #[test]
    fn multi_line_text_stays_on_one_script_line() {
        let mut history = SessionHistory::new();
        let id = history.begin(
            CommandKind::Configuration,
            &Params::new().with("file", "a\nb\tc.txt"),
        );
        history.complete(id);
        let id = history.begin(CommandKind::Center, &Params::new());
        history.complete(id);

        let script = generate(&history);
        assert_eq!(script.lines().count(), 5);
        let parsed = parse_script(&script).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].params.text("file"), Ok("a\nb\tc.txt"));
        assert_eq!(parsed[1].kind, CommandKind::Center);
    }
}
