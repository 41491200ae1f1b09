use std::fs;

use clap::Parser;
use cmdwire_cli::{build_application, CliConfig, Cli};
use cmdwire_console::{BufferedOutput, FAILURE, SUCCESS};
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> (i32, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut output = BufferedOutput::new();
    let code = cli.execute(&mut output).unwrap();
    (code, output.fetch())
}

#[test]
fn test_lists_commands_without_config() {
    let (code, text) = run_cli(&["cmdwire"]);

    assert_eq!(code, SUCCESS);
    assert!(text.starts_with("UNKNOWN UNKNOWN\n\nAvailable commands:\n"));
    assert!(text.contains("  di:parameters"));
    assert!(text.contains("  commands-debug"));
}

#[test]
fn test_parameters_from_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cmdwire.yaml");
    fs::write(
        &path,
        "console:\n  name: Demo\n  version: 1.0.0\nparameters:\n  debugMode: true\n  appDir: /app\n",
    )
    .unwrap();

    let config = path.to_str().unwrap();
    let (code, text) = run_cli(&["cmdwire", "--config", config, "di:parameters"]);
    assert_eq!(code, SUCCESS);
    assert_eq!(text, "  debugMode: true\n  appDir: /app\n\n");

    let (_, text) = run_cli(&["cmdwire", "-c", config, "list"]);
    assert!(text.starts_with("Demo 1.0.0\n"));
}

#[test]
fn test_export_disabled_from_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cmdwire.json");
    fs::write(
        &path,
        r#"{"parameters": {"debugMode": true}, "export_parameters": false}"#,
    )
    .unwrap();

    let (code, text) = run_cli(&["cmdwire", "--config", path.to_str().unwrap(), "di:parameters"]);
    assert_eq!(code, FAILURE);
    assert!(text.contains("'di > parameters > backup' to 'true'"));
}

#[test]
fn test_unknown_command_exits_with_failure() {
    let (code, text) = run_cli(&["cmdwire", "nope"]);

    assert_eq!(code, FAILURE);
    assert_eq!(text, "Command \"nope\" is not defined.\n");
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cmdwire.yaml");
    fs::write(&path, "console:\n  discovery:\n    tag: ''\n").unwrap();

    let cli = Cli::try_parse_from(["cmdwire", "--config", path.to_str().unwrap()]).unwrap();
    let error = cli.execute(&mut BufferedOutput::new()).unwrap_err();
    assert!(format!("{:#}", error).contains("Tag name is empty."));
}

#[test]
fn test_build_application_from_default_config() {
    let application = build_application(CliConfig::default()).unwrap();

    assert_eq!(application.name(), "UNKNOWN");
    assert!(application.has("di:parameters"));
    assert!(application.has("commands-debug"));
}
