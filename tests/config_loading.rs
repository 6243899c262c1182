//! Loading widget configs from disk.

use std::io::Write;

use microsim::prelude::*;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_sliding_window_and_play() {
    let file = write_config(
        r"
widget:
  title: Max Sum Window
playback:
  interval_ms: 100
  autoplay: true
scenario:
  type: sliding_window
  data: [2, 1, 5, 1, 3, 2]
  k: 3
",
    );

    let config = MicrosimConfig::load(file.path()).unwrap();
    let mut controller = config.into_controller().unwrap();
    assert_eq!(controller.mode(), PlaybackMode::Auto);
    assert_eq!(controller.frame().title, "Max Sum Window");

    let mut now = 0;
    while controller.mode() == PlaybackMode::Auto {
        controller.on_frame(now);
        now += 50;
    }
    let state = controller.sequencer().current_state();
    assert!(state.is_terminal());
    assert_eq!(state.last_record().and_then(|r| r.int("max_sum")), Some(9));
}

#[test]
fn load_every_scenario_type() {
    let scenarios = [
        "type: binary_search\n  values: [1, 3, 5]\n  target: 3",
        "type: linear_search\n  values: [4, 2]\n  target: 2",
        "type: sliding_window\n  data: [1, 2, 3]\n  k: 2",
        "type: sorting\n  values: [3, 1, 2]\n  algorithm: merge",
        "type: sorting\n  values: [3, 1, 2]",
        "type: factorial\n  n: 4",
    ];

    for body in scenarios {
        let file = write_config(&format!("scenario:\n  {body}\n"));
        let config = MicrosimConfig::load(file.path()).unwrap();
        assert!(config.scenario.length() > 0, "{body}");
    }
}

#[test]
fn saved_config_loads_back() {
    let config = MicrosimConfig::builder()
        .title("Call Stack")
        .interval_ms(750)
        .scenario(FactorialTrace::new(3))
        .build();

    let file = write_config(&config.to_yaml().unwrap());
    assert_eq!(MicrosimConfig::load(file.path()).unwrap(), config);
}

#[test]
fn rejected_scenario_reports_reason() {
    let file = write_config("scenario:\n  type: sliding_window\n  data: [1, 2]\n  k: 5\n");
    let err = MicrosimConfig::load(file.path()).unwrap_err();
    match err {
        SimError::InvalidScenario { scenario, reason } => {
            assert_eq!(scenario, "sliding_window");
            assert!(reason.contains("k=5"));
        }
        other => panic!("expected InvalidScenario, got {other}"),
    }
}

#[test]
fn unknown_scenario_type_is_a_parse_error() {
    let file = write_config("scenario:\n  type: bubble_sort\n  values: [1]\n");
    let err = MicrosimConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, SimError::YamlParse(_)));
}

#[test]
fn misspelled_scenario_key_is_a_parse_error() {
    let file = write_config("scenario:\n  type: sorting\n  values: [3, 1]\n  algoritm: merge\n");
    let err = MicrosimConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, SimError::YamlParse(_)));
}
