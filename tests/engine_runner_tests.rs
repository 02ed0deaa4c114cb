use flowplug::codec;
use flowplug::core::{ConfigurationMap, NodeError, Token};
use flowplug::engine::{LifecycleState, OperatorRunner, SinkRunner};
use flowplug::nodes::{ConsoleSink, CounterOperator};
use flowplug::console::ScriptedConsole;

fn is_contract_violation(err: &NodeError) -> bool {
    matches!(err, NodeError::ContractViolation(_))
}

#[test]
fn test_run_without_gate_is_rejected() {
    let mut runner = OperatorRunner::new("counter", CounterOperator::new());
    runner.initialize(&ConfigurationMap::new()).unwrap();

    let err = runner.run().unwrap_err();
    assert!(is_contract_violation(&err));
    assert_eq!(runner.state().unwrap().count(), 0);
}

#[test]
fn test_run_after_vetoed_gate_is_rejected() {
    let mut runner = OperatorRunner::new("counter", CounterOperator::new());
    runner.initialize(&ConfigurationMap::new()).unwrap();

    assert!(!runner.gate(vec![Token::pending("tick")]).unwrap());
    assert!(is_contract_violation(&runner.run().unwrap_err()));
}

#[test]
fn test_gate_before_initialize_is_rejected() {
    let mut runner = OperatorRunner::new("counter", CounterOperator::new());

    let err = runner.gate(vec![Token::ready("tick", vec![1u8])]).unwrap_err();
    assert!(is_contract_violation(&err));
    assert_eq!(runner.lifecycle(), LifecycleState::Uninitialized);
}

#[test]
fn test_double_initialize_is_rejected() {
    let mut runner = OperatorRunner::new("counter", CounterOperator::new());
    runner.initialize(&ConfigurationMap::new()).unwrap();

    let err = runner.initialize(&ConfigurationMap::new()).unwrap_err();
    assert!(is_contract_violation(&err));
}

#[test]
fn test_second_gate_before_run_is_rejected() {
    let mut runner = OperatorRunner::new("counter", CounterOperator::new());
    runner.initialize(&ConfigurationMap::new()).unwrap();

    assert!(runner.gate(vec![Token::ready("tick", vec![1u8])]).unwrap());
    let err = runner.gate(vec![Token::ready("tick", vec![1u8])]).unwrap_err();
    assert!(is_contract_violation(&err));

    // The admitted run is still due.
    runner.run().unwrap();
    assert_eq!(runner.state().unwrap().count(), 1);
}

#[test]
fn test_declared_ports_validate_tokens() {
    let mut runner = OperatorRunner::new("counter", CounterOperator::new()).with_inputs(["tick"]);
    runner.initialize(&ConfigurationMap::new()).unwrap();

    let undeclared = runner.gate(vec![Token::ready("tock", vec![1u8])]).unwrap_err();
    assert!(is_contract_violation(&undeclared));

    let missing = runner.gate(vec![]).unwrap_err();
    assert!(is_contract_violation(&missing));

    let duplicate = runner
        .gate(vec![Token::ready("tick", vec![1u8]), Token::pending("tick")])
        .unwrap_err();
    assert!(is_contract_violation(&duplicate));

    assert!(runner.gate(vec![Token::ready("tick", vec![1u8])]).unwrap());
}

#[test]
fn test_counter_reports_n_after_n_cycles() {
    let mut runner = OperatorRunner::new("counter", CounterOperator::new());
    runner.initialize(&ConfigurationMap::new()).unwrap();

    for n in 1..=5u64 {
        let outputs = runner
            .cycle(vec![Token::ready("tick", vec![1u8])])
            .unwrap()
            .unwrap();
        assert_eq!(codec::decode::<u64>(outputs[0].data.as_bytes()).unwrap(), n);
        assert_eq!(runner.state().unwrap().count(), n);
    }
    assert_eq!(runner.context().cycle, 5);
}

#[test]
fn test_counter_start_and_saturation() {
    let configuration = ConfigurationMap::new().with("start", u64::MAX.to_string());
    let mut runner = OperatorRunner::new("counter", CounterOperator::new());
    runner.initialize(&configuration).unwrap();

    runner.cycle(vec![Token::ready("tick", vec![1u8])]).unwrap();
    assert_eq!(runner.state().unwrap().count(), u64::MAX);
}

#[test]
fn test_counter_rejects_malformed_start() {
    let configuration = ConfigurationMap::new().with("start", "ten");
    let mut runner = OperatorRunner::new("counter", CounterOperator::new());

    let err = runner.initialize(&configuration).unwrap_err();
    assert!(matches!(err, NodeError::Configuration { ref key, .. } if key == "start"));
    assert_eq!(runner.lifecycle(), LifecycleState::Uninitialized);
}

#[test]
fn test_instances_do_not_share_state() {
    let mut first = OperatorRunner::new("first", CounterOperator::new());
    let mut second = OperatorRunner::new("second", CounterOperator::new());
    first.initialize(&ConfigurationMap::new()).unwrap();
    second.initialize(&ConfigurationMap::new()).unwrap();

    first.cycle(vec![Token::ready("tick", vec![1u8])]).unwrap();
    first.cycle(vec![Token::ready("tick", vec![1u8])]).unwrap();

    assert_eq!(first.state().unwrap().count(), 2);
    assert_eq!(second.state().unwrap().count(), 0);
}

#[test]
fn test_sink_runner_contract() {
    let console = ScriptedConsole::default();
    let mut runner = SinkRunner::new("display", ConsoleSink::new(console.clone()));
    runner.initialize(&ConfigurationMap::new()).unwrap();

    assert!(is_contract_violation(&runner.run().unwrap_err()));
    assert!(!runner.cycle(vec![Token::pending("fizz")]).unwrap());
    assert!(console.written().is_empty());
}
