use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use clitools::cli_tool;
use clitools::config::{DEFAULT_SELECTION_KEY, MapEnvironment, loader};
use clitools::registry::{CliTool, DispatchError, ToolDispatcher, ToolFault};

#[cli_tool(crate = clitools::registry)]
#[derive(Default)]
struct Checksum;

impl CliTool for Checksum {
    fn name(&self) -> &str {
        "checksum"
    }

    fn description(&self) -> &str {
        "Succeeds only when asked to verify"
    }

    fn run_main(&self, args: &[String]) -> Result<bool, ToolFault> {
        Ok(args == ["--verify", "file.bin"])
    }
}

#[cli_tool(crate = clitools::registry)]
#[derive(Default)]
struct ArchiveDeprecated;

impl CliTool for ArchiveDeprecated {
    fn name(&self) -> &str {
        "archive"
    }

    fn description(&self) -> &str {
        "Legacy archiver"
    }

    fn run_main(&self, _args: &[String]) -> Result<bool, ToolFault> {
        Ok(true)
    }
}

#[cli_tool(crate = clitools::registry)]
#[derive(Default)]
struct ReportV1;

#[cli_tool(crate = clitools::registry)]
#[derive(Default)]
struct ReportV2;

impl CliTool for ReportV1 {
    fn name(&self) -> &str {
        "report"
    }

    fn description(&self) -> &str {
        "First report generator"
    }

    fn run_main(&self, _args: &[String]) -> Result<bool, ToolFault> {
        Ok(true)
    }
}

impl CliTool for ReportV2 {
    fn name(&self) -> &str {
        "report"
    }

    fn description(&self) -> &str {
        "Second report generator"
    }

    fn run_main(&self, _args: &[String]) -> Result<bool, ToolFault> {
        Ok(true)
    }
}

#[cli_tool(crate = clitools::registry)]
#[derive(Default)]
struct Explode;

impl CliTool for Explode {
    fn name(&self) -> &str {
        "explode"
    }

    fn description(&self) -> &str {
        "Faults on every run"
    }

    fn run_main(&self, _args: &[String]) -> Result<bool, ToolFault> {
        anyhow::bail!("unrecoverable")
    }
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn names(dispatcher: &mut ToolDispatcher) -> Vec<String> {
    dispatcher
        .list()
        .into_iter()
        .map(|info| info.name().to_owned())
        .collect()
}

#[test]
fn link_time_registrations_are_discovered() {
    let mut dispatcher = ToolDispatcher::default();
    let names = names(&mut dispatcher);
    for expected in ["archive", "checksum", "explode", "report"] {
        assert!(names.iter().any(|name| name == expected), "missing {expected}");
    }
}

#[test]
fn duplicate_names_keep_one_tool_and_record_collision() {
    let mut dispatcher = ToolDispatcher::default();
    let winner = dispatcher.lookup("report").expect("report registered");
    let collisions = dispatcher.collisions().to_vec();

    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].name(), "report");
    assert_eq!(collisions[0].shadowing(), winner.type_name());
    assert_ne!(collisions[0].shadowed(), collisions[0].shadowing());
    assert_eq!(
        dispatcher.list().iter().filter(|info| info.name() == "report").count(),
        1
    );
}

#[test]
fn excluding_one_report_resolves_collision() {
    let mut dispatcher = ToolDispatcher::default();
    dispatcher.add_type_regex_exclude(".*::ReportV1").unwrap();

    let tool = dispatcher.lookup("report").expect("report registered");
    assert!(tool.type_name().ends_with("ReportV2"));
    assert!(dispatcher.collisions().is_empty());
}

#[test]
fn include_then_exclude_by_type() {
    let mut dispatcher = ToolDispatcher::default();
    dispatcher.add_name_regex_include("a.*|c.*").unwrap();
    dispatcher.add_type_regex_exclude(".*Deprecated").unwrap();
    assert_eq!(names(&mut dispatcher), ["checksum"]);
}

#[test]
fn environment_selects_and_forwards_arguments() {
    let mut dispatcher = ToolDispatcher::default();
    let env = MapEnvironment::new().with(DEFAULT_SELECTION_KEY, "checksum");

    assert!(dispatcher.run(&env, &args(&["--verify", "file.bin"])).unwrap());
    assert!(!dispatcher.run(&env, &args(&["file.bin"])).unwrap());
}

#[test]
fn filtered_tool_is_unknown() {
    let captured = Captured::default();
    let mut dispatcher = ToolDispatcher::default().with_diagnostics(captured.clone());
    dispatcher.add_name_regex_exclude("checksum").unwrap();

    assert!(!dispatcher.run_tool("checksum", &[]).unwrap());

    let text = captured.text();
    assert!(text.contains("I don't know how to run tool 'checksum'"));
    assert!(text.contains("   archive  Legacy archiver\n"));
    assert!(!text.contains("checksum  "));
}

#[test]
fn missing_selection_fails_without_running() {
    let captured = Captured::default();
    let mut dispatcher = ToolDispatcher::default().with_diagnostics(captured.clone());

    assert!(!dispatcher.run(&MapEnvironment::new(), &[]).unwrap());
    assert!(captured.text().contains("'CLI_TOOL'"));
}

#[test]
fn tool_faults_reach_the_caller() {
    let mut dispatcher = ToolDispatcher::default();
    let err = dispatcher.run_tool("explode", &[]).expect_err("fault");
    let Some(fault) = err.fault() else {
        panic!("expected tool fault, got {err}");
    };
    assert_eq!(fault.to_string(), "unrecoverable");
    assert!(matches!(err, DispatchError::Tool { .. }));
}

#[test]
fn json_configuration_drives_filters_and_selection() {
    let config = loader::from_json_str(
        r#"{
            "selection_key": "PICK",
            "filters": [
                { "include": true, "name": "archive|checksum|explode|report" },
                { "include": false, "type_name": ".*Deprecated" },
                { "include": false, "name": "report|explode" }
            ]
        }"#,
    )
    .unwrap();

    let mut dispatcher = ToolDispatcher::default();
    dispatcher.apply_config(&config).unwrap();
    assert_eq!(names(&mut dispatcher), ["checksum"]);

    let env = MapEnvironment::new().with("PICK", "checksum");
    assert!(dispatcher.run(&env, &args(&["--verify", "file.bin"])).unwrap());
}
