use std::io::Write;
use std::process::{Command, Output};

const SCHEMA: &str = r#"{
    "name": "tool",
    "args": [
        {"name": "verbose", "short": "v", "long": "verbose", "type": "switch", "max": 2},
        {"name": "output", "short": "o", "long": "output", "type": "option", "required": true},
        {"name": "input", "type": "value", "value_name": "FILE", "max": 2}
    ]
}"#;

fn argstream(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_argstream"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run argstream")
}

fn stdout_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("event line is JSON"))
        .collect()
}

#[test]
fn test_read_prints_events() {
    let output = argstream(&[
        "read", "--config", SCHEMA, "--", "-vv", "--output", "out.txt", "a.txt",
    ]);
    assert!(output.status.success(), "{:?}", output);

    let events = stdout_lines(&output);
    assert_eq!(events.len(), 4);
    assert_eq!(events[0]["id"], "verbose");
    assert_eq!(events[0]["state"], "StackedSwitch");
    assert_eq!(events[2]["id"], "output");
    assert_eq!(events[2]["content"], "out.txt");
    assert_eq!(events[2]["state"], "LongOption");
    assert_eq!(events[3]["id"], "input");
    assert_eq!(events[3]["state"], "Value");
}

#[test]
fn test_read_stops_at_first_error() {
    let output = argstream(&["read", "--config", SCHEMA, "--", "-x", "--nope"]);
    assert!(!output.status.success());

    let events = stdout_lines(&output);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["state"], "ShortUnrecognized");
    assert_eq!(events[0]["content"], "Unrecognized short argument: -x");
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 input error(s)"));
}

#[test]
fn test_read_keep_going_reports_every_error() {
    let output = argstream(&[
        "read",
        "--config",
        SCHEMA,
        "--keep-going",
        "--",
        "-x",
        "-o",
        "a",
        "--nope",
    ]);
    assert!(!output.status.success());

    let events = stdout_lines(&output);
    assert_eq!(events.len(), 3);
    assert_eq!(events[2]["state"], "LongUnrecognized");
    assert!(String::from_utf8_lossy(&output.stderr).contains("2 input error(s)"));
}

#[test]
fn test_read_reports_missing_required() {
    let output = argstream(&["read", "--config", SCHEMA, "--", "-v"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing required argument(s): output"));
}

#[test]
fn test_read_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SCHEMA.as_bytes()).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let output = argstream(&["read", "--config-file", &path, "--", "-o", "x", "--", "-v"]);
    assert!(output.status.success(), "{:?}", output);

    let events = stdout_lines(&output);
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["id"], "input");
    assert_eq!(events[1]["content"], "-v");
}

#[test]
fn test_describe_lists_arguments_in_order() {
    let output = argstream(&["describe", "--config", SCHEMA]);
    assert!(output.status.success(), "{:?}", output);

    let described: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = described
        .as_array()
        .unwrap()
        .iter()
        .map(|arg| arg["id"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["verbose", "output", "input"]);
    assert_eq!(described[0]["kind"], "switch");
    assert_eq!(described[1]["min"], 1);
    assert_eq!(described[2]["value_name"], "FILE");
}

#[test]
fn test_invalid_schema_fails() {
    let output = argstream(&[
        "describe",
        "--config",
        r#"{"args":[{"name":"a","long":"x","type":"switch"}]}"#,
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid schema"));
}
