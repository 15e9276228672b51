use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use spaces_engine::script::check_script;
use spaces_engine::{Engine, EngineConfig, Presenter, ScriptReport};
use spaces_registry::{metadata, CommandKind, Registry};
use spaces_workspace::Workspace;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("spaces")
        .version(spaces_engine::VERSION)
        .about("Run, check and list Spaces command scripts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level (overrides RUST_LOG)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Write logs as JSON lines"),
        )
        .subcommand(
            Command::new("run")
                .about("Run a script against a fresh workspace")
                .arg(
                    Arg::new("script")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Script file to run"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Engine configuration (TOML)"),
                )
                .arg(
                    Arg::new("data-dir")
                        .long("data-dir")
                        .value_parser(value_parser!(PathBuf))
                        .help("Base directory for relative file parameters (default: the script's directory)"),
                )
                .arg(
                    Arg::new("save-history")
                        .long("save-history")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the session as a script when done"),
                )
                .arg(
                    Arg::new("dump")
                        .long("dump")
                        .action(ArgAction::SetTrue)
                        .help("Print the per-command results as JSON"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse and check a script without running it")
                .arg(
                    Arg::new("script")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Script file to check"),
                ),
        )
        .subcommand(
            Command::new("commands")
                .about("List every command the engine knows")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Logs what each completed command left populated
struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, command: CommandKind, workspace: &Workspace) {
        let populated: Vec<String> = workspace
            .populated()
            .into_iter()
            .map(|name| name.display_name())
            .collect();
        tracing::debug!(%command, populated = %populated.join(", "), "presented");
    }
}

fn path_arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    match args.get_one::<PathBuf>(name) {
        Some(path) => Ok(path),
        None => bail!("missing <{name}>"),
    }
}

fn engine_config(args: &ArgMatches, script: &Path) -> Result<EngineConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => EngineConfig::new(),
    };
    if let Some(dir) = args.get_one::<PathBuf>("data-dir") {
        config = config.with_data_dir(dir);
    } else if config.data_dir.is_none() {
        if let Some(parent) = script.parent().filter(|p| !p.as_os_str().is_empty()) {
            config = config.with_data_dir(parent);
        }
    }
    Ok(config)
}

fn print_report(report: &ScriptReport) {
    for step in &report.steps {
        let message = step.result.message.trim_end();
        if message.is_empty() {
            println!("{:>4}  {}", step.line, step.result.command);
        } else {
            println!("{:>4}  {}: {}", step.line, step.result.command, message);
        }
    }
}

/// Returns whether the script ran to the end
fn run(args: &ArgMatches) -> Result<bool> {
    let script = path_arg(args, "script")?;
    let config = engine_config(args, script)?;
    let mut engine = Engine::new(config).with_presenter(LogPresenter);

    let outcome = engine.run_script_file(script);
    match &outcome {
        Ok(report) => {
            print_report(report);
            if args.get_flag("dump") {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
        }
        Err(error) => eprintln!("{}: {error}", script.display()),
    }

    if let Some(path) = args.get_one::<PathBuf>("save-history") {
        std::fs::write(path, engine.generate_script())
            .with_context(|| format!("writing session script {}", path.display()))?;
        tracing::info!(path = %path.display(), "session script saved");
    }

    let populated: Vec<String> = engine
        .workspace()
        .populated()
        .into_iter()
        .map(|name| name.display_name())
        .collect();
    println!(
        "Populated: {}",
        if populated.is_empty() {
            "nothing".to_string()
        } else {
            populated.join(", ")
        }
    );
    Ok(outcome.is_ok())
}

fn check(args: &ArgMatches) -> Result<bool> {
    let script = path_arg(args, "script")?;
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("reading script {}", script.display()))?;
    match check_script(&text) {
        Ok(lines) => {
            println!("{}: {} command(s) OK", script.display(), lines.len());
            Ok(true)
        }
        Err(error) => {
            println!("{}: {error}", script.display());
            Ok(false)
        }
    }
}

fn commands_json() -> serde_json::Value {
    let commands: Vec<serde_json::Value> = Registry::global()
        .iter()
        .map(|descriptor| {
            serde_json::json!({
                "name": descriptor.name,
                "classification": descriptor.classification.as_str(),
                "menu": metadata::menu_of(descriptor.name),
                "params": descriptor.params.iter().map(|p| p.name).collect::<Vec<_>>(),
                "explanation": metadata::explanation(descriptor.name),
            })
        })
        .collect();
    serde_json::Value::Array(commands)
}

fn commands(args: &ArgMatches) -> Result<bool> {
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&commands_json())?);
        return Ok(true);
    }
    for descriptor in Registry::global().iter() {
        println!(
            "{:<36} {:<18} {}",
            descriptor.name,
            descriptor.classification.as_str(),
            metadata::menu_of(descriptor.name).unwrap_or("-")
        );
    }
    Ok(true)
}

fn dispatch(matches: &ArgMatches) -> Result<bool> {
    match matches.subcommand() {
        Some(("run", args)) => run(args),
        Some(("check", args)) => check(args),
        Some(("commands", args)) => commands(args),
        Some((other, _)) => bail!("unknown subcommand {other}"),
        None => bail!("no subcommand given"),
    }
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"), matches.get_flag("log-json"));

    let code = match dispatch(&matches) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spaces_test_utils::Fixtures;

    fn matches(args: &[&str]) -> ArgMatches {
        cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn run_requires_a_script() {
        assert!(cli().try_get_matches_from(["spaces", "run"]).is_err());
        assert!(cli().try_get_matches_from(["spaces"]).is_err());
    }

    #[test]
    fn data_dir_defaults_to_script_directory() {
        let fixtures = Fixtures::standard();
        let script = fixtures.write("session.txt", "About\n");
        let args = matches(&["spaces", "run", script.to_str().unwrap()]);
        let (_, run_args) = args.subcommand().unwrap();
        let config = engine_config(run_args, &script).unwrap();
        assert_eq!(config.data_dir.as_deref(), Some(fixtures.path()));
    }

    #[test]
    fn run_saves_the_session_script() {
        let fixtures = Fixtures::standard();
        let script = fixtures.write(
            "session.txt",
            "Configuration file=\"configuration.txt\"\nRotate degrees=30\nCenter\n",
        );
        let saved = fixtures.path().join("saved.txt");
        let args = matches(&[
            "spaces",
            "run",
            script.to_str().unwrap(),
            "--save-history",
            saved.to_str().unwrap(),
        ]);
        assert!(dispatch(&args).unwrap());

        let text = std::fs::read_to_string(&saved).unwrap();
        let body: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(
            body,
            vec![
                "Configuration file=\"configuration.txt\"",
                "Rotate degrees=30.0",
                "Center"
            ]
        );
    }

    #[test]
    fn failing_script_reports_false() {
        let fixtures = Fixtures::standard();
        let script = fixtures.write("bad.txt", "Configuration file=\"configuration.txt\"\nVarimax\n");
        let args = matches(&["spaces", "run", script.to_str().unwrap()]);
        assert!(!dispatch(&args).unwrap());
    }

    #[test]
    fn check_reports_without_running() {
        let fixtures = Fixtures::new();
        let good = fixtures.write("good.txt", "# setup\nRotate degrees=10\n");
        let bad = fixtures.write("bad.txt", "Create dim_names=[x]\n");
        assert!(dispatch(&matches(&["spaces", "check", good.to_str().unwrap()])).unwrap());
        assert!(!dispatch(&matches(&["spaces", "check", bad.to_str().unwrap()])).unwrap());
    }

    #[test]
    fn missing_script_is_an_error() {
        let fixtures = Fixtures::new();
        let absent = fixtures.path().join("absent.txt");
        let args = matches(&["spaces", "check", absent.to_str().unwrap()]);
        assert!(dispatch(&args).is_err());
    }

    #[test]
    fn command_listing_covers_the_registry() {
        let listing = commands_json();
        let entries = listing.as_array().unwrap();
        assert_eq!(entries.len(), Registry::global().len());
        let rotate = entries.iter().find(|e| e["name"] == "Rotate").unwrap();
        assert_eq!(rotate["classification"], "active");
        assert_eq!(rotate["params"], serde_json::json!(["degrees"]));
    }
}
