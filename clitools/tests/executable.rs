use std::io::Write;
use std::process::{Command, Output};

fn clitools() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_clitools"));
    command.env_remove("CLI_TOOL").env_remove("CLI_TOOL_CONFIG");
    command
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn selected_tool_success_exits_zero() {
    let output = clitools()
        .env("CLI_TOOL", "echo")
        .args(["hello", "two words"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello two words\n");
}

#[test]
fn unset_selection_exits_one_with_listing() {
    let output = clitools().output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("I don't know which tool to run"));
    assert!(stderr.contains("This is a list of all available tools:"));
}

#[test]
fn unknown_tool_exits_one() {
    let output = clitools().env("CLI_TOOL", "no-such-tool").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("I don't know how to run tool 'no-such-tool'"));
}

#[test]
fn configuration_file_can_exclude_a_tool() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(config, r#"{{ "filters": [{{ "include": false, "name": "echo" }}] }}"#).unwrap();

    let output = clitools()
        .env("CLI_TOOL", "echo")
        .env("CLI_TOOL_CONFIG", config.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("I don't know how to run tool 'echo'"));
}

#[test]
fn broken_configuration_is_reported_as_error() {
    let output = clitools()
        .env("CLI_TOOL", "echo")
        .env("CLI_TOOL_CONFIG", "/nonexistent/clitools.json")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to load configuration"));
}

#[cfg(unix)]
#[test]
fn non_utf8_argument_is_reported_not_panicked() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let output = clitools()
        .env("CLI_TOOL", "echo")
        .arg(OsString::from_vec(vec![0xff]))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("argument 1 is not valid UTF-8"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"));
}

#[cfg(unix)]
#[test]
fn non_unicode_selection_is_reported_as_unknown_tool() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let output = clitools()
        .env("CLI_TOOL", OsString::from_vec(vec![b'x', 0xff]))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("I don't know how to run tool 'x\u{fffd}'"), "stderr: {stderr}");
}
