use flowplug::codec;
use flowplug::console::ScriptedConsole;
use flowplug::core::{ConfigurationMap, NodeError};
use flowplug::engine::{LifecycleState, SourceRunner};
use flowplug::nodes::manual_source::{EntryPort, NUMBER_PORT, TICK_PORT};
use flowplug::nodes::ManualSource;

fn source(console: &ScriptedConsole, configuration: ConfigurationMap) -> SourceRunner<ManualSource> {
    let mut runner = SourceRunner::new("manual", ManualSource::new(console.clone()));
    runner.initialize(&configuration).unwrap();
    runner
}

#[test]
fn test_two_empty_lines_emit_a_tick() {
    let console = ScriptedConsole::new(["", ""]);
    let mut runner = source(&console, ConfigurationMap::new());

    let outputs = runner.run().unwrap();

    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].port_id, TICK_PORT);
    assert_eq!(outputs[0].data.len(), 1);
    assert_eq!(console.remaining(), 0);
    assert!(runner.state().unwrap().is_launched());
}

#[test]
fn test_launch_banner_is_shown_once() {
    let console = ScriptedConsole::new(["", "", ""]);
    let mut runner = source(&console, ConfigurationMap::new());

    runner.run().unwrap();
    runner.run().unwrap();

    let banners = console
        .written()
        .iter()
        .filter(|line| line.contains("WAITING FOR USER INPUT"))
        .count();
    assert_eq!(banners, 1);
    assert_eq!(runner.state().unwrap().emitted(), 2);
}

#[test]
fn test_number_line_is_encoded_little_endian() {
    let console = ScriptedConsole::new(["42"]);
    let configuration = ConfigurationMap::new()
        .with("launch_prompt", "false")
        .with("port", "number");
    let mut runner = source(&console, configuration);

    let outputs = runner.run().unwrap();

    assert_eq!(outputs[0].port_id, NUMBER_PORT);
    assert_eq!(outputs[0].data, codec::encode(42u64));
}

#[test]
fn test_malformed_line_is_rejected_and_not_fatal() {
    let console = ScriptedConsole::new(["-3", " 7 "]);
    let configuration = ConfigurationMap::new()
        .with("launch_prompt", "false")
        .with("port", "number");
    let mut runner = source(&console, configuration);

    let err = runner.run().unwrap_err();
    assert!(matches!(err, NodeError::ExternalInput(_)));
    assert!(!err.is_fatal());
    assert_eq!(runner.lifecycle(), LifecycleState::Initialized);

    let outputs = runner.run().unwrap();
    assert_eq!(codec::decode::<u64>(outputs[0].data.as_bytes()).unwrap(), 7);
    assert_eq!(runner.state().unwrap().emitted(), 1);
}

#[test]
fn test_exhausted_console_closes_input() {
    let console = ScriptedConsole::new([""]);
    let mut runner = source(&console, ConfigurationMap::new());

    let err = runner.run().unwrap_err();
    assert!(matches!(err, NodeError::InputClosed));
    assert!(err.is_fatal());
}

#[test]
fn test_run_before_initialize_is_rejected() {
    let console = ScriptedConsole::new(["", ""]);
    let mut runner = SourceRunner::new("manual", ManualSource::new(console.clone()));

    let err = runner.run().unwrap_err();
    assert!(matches!(err, NodeError::ContractViolation(_)));
    assert_eq!(console.remaining(), 2);
}

#[test]
fn test_invalid_launch_prompt_setting() {
    let console = ScriptedConsole::default();
    let mut runner = SourceRunner::new("manual", ManualSource::new(console));

    let err = runner
        .initialize(&ConfigurationMap::new().with("launch_prompt", "maybe"))
        .unwrap_err();
    assert!(matches!(err, NodeError::Configuration { ref key, .. } if key == "launch_prompt"));
}

#[test]
fn test_tick_source_only_emits_ticks() {
    let console = ScriptedConsole::new(["", "5", ""]);
    let mut runner = source(&console, ConfigurationMap::new());

    let err = runner.run().unwrap_err();
    assert!(matches!(err, NodeError::ExternalInput(_)));

    let outputs = runner.run().unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].port_id, TICK_PORT);
    assert_eq!(runner.state().unwrap().port(), EntryPort::Tick);
}

#[test]
fn test_number_source_rejects_empty_line() {
    let console = ScriptedConsole::new(["", "", "9"]);
    let mut runner = source(&console, ConfigurationMap::new().with("port", "number"));

    assert!(matches!(runner.run().unwrap_err(), NodeError::ExternalInput(_)));

    let outputs = runner.run().unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].port_id, NUMBER_PORT);
    assert_eq!(outputs[0].data, codec::encode(9u64));
}

#[test]
fn test_unknown_port_setting() {
    let console = ScriptedConsole::default();
    let mut runner = SourceRunner::new("manual", ManualSource::new(console));

    let err = runner
        .initialize(&ConfigurationMap::new().with("port", "count"))
        .unwrap_err();
    assert!(matches!(err, NodeError::Configuration { ref key, .. } if key == "port"));
}

#[test]
fn test_entry_parsing() {
    assert_eq!(EntryPort::Tick.parse("").unwrap().as_bytes(), &[1]);
    assert_eq!(EntryPort::Tick.parse("   ").unwrap().as_bytes(), &[1]);
    assert!(EntryPort::Tick.parse("1").is_err());
    assert_eq!(
        EntryPort::Number.parse("18446744073709551615").unwrap(),
        codec::encode(u64::MAX)
    );
    assert!(EntryPort::Number.parse("18446744073709551616").is_err());
    assert!(EntryPort::Number.parse("four").is_err());
    assert_eq!("number".parse::<EntryPort>().unwrap(), EntryPort::Number);
}
