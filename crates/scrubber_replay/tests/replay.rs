//! Replay integration tests
//!
//! Runs the bundled scenario files and checks what the transcript records.

use std::path::{Path, PathBuf};

use scrubber_core::{GesturePhase, ScrubberState};
use scrubber_replay::{ListSpec, ReplayError, Scenario, ScenarioRunner, ScenarioStep};

fn scenario_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

fn scenario(steps: Vec<ScenarioStep>) -> Scenario {
    Scenario {
        name: Some("inline".to_string()),
        config: Default::default(),
        list: ListSpec::uniform(3, 10),
        steps,
    }
}

#[test]
fn test_bundled_toml_scenario_passes() {
    let scenario = Scenario::from_path(&scenario_path("scrub_and_hide.toml")).unwrap();
    let report = ScenarioRunner::run_scenario(&scenario).unwrap();

    assert!(report.passed(), "{report}");
    assert_eq!(report.transcript.len(), scenario.steps.len());
    assert_eq!(report.assertions_passed(&scenario), 10);
}

#[test]
fn test_bundled_json_scenario_passes() {
    let scenario = Scenario::from_path(&scenario_path("tv_layout.json")).unwrap();
    let report = ScenarioRunner::run_scenario(&scenario).unwrap();
    assert!(report.passed(), "{report}");
}

#[test]
fn test_first_failure_stops_the_run() {
    let scenario = scenario(vec![
        ScenarioStep::ScrollTo { offset: 100.0 },
        ScenarioStep::AssertState {
            state: ScrubberState::Hidden,
        },
        ScenarioStep::AssertTitle {
            title: "never checked".to_string(),
        },
    ]);
    let report = ScenarioRunner::run_scenario(&scenario).unwrap();

    let failure = report.failure.as_ref().unwrap();
    assert_eq!(failure.step, 1);
    assert_eq!(failure.message, "expected state Hidden, found Scrolling");
    assert_eq!(report.transcript.len(), 2);
    assert!(report.to_string().contains("FAILED at step 1"));
}

#[test]
fn test_transcript_records_commands_and_notifications() {
    let scenario = scenario(vec![
        ScenarioStep::ScrollTo { offset: 0.0 },
        ScenarioStep::Gesture {
            phase: GesturePhase::Begin,
            y: 21.0,
            x: None,
        },
        ScenarioStep::Gesture {
            phase: GesturePhase::Change,
            y: 279.0,
            x: None,
        },
        ScenarioStep::Gesture {
            phase: GesturePhase::End,
            y: 279.0,
            x: None,
        },
    ]);
    let report = ScenarioRunner::run_scenario(&scenario).unwrap();
    assert!(report.passed());

    let begin = &report.transcript[1];
    assert_eq!(begin.state, ScrubberState::Scrubbing);
    assert!(begin
        .events
        .contains(&"delegate: started scrubbing".to_string()));

    let change = &report.transcript[2];
    assert!((change.offset - 645.0).abs() < 0.01);
    assert!(change
        .events
        .contains(&"host: set content offset 645.0".to_string()));

    let end = &report.transcript[3];
    assert_eq!(end.state, ScrubberState::Scrolling);
    assert!(end
        .events
        .contains(&"delegate: stopped scrubbing".to_string()));
    assert!(!end.events.iter().any(|e| e.starts_with("host:")));
}

#[test]
fn test_gesture_outside_hit_zone_leaves_no_trace() {
    let scenario = scenario(vec![
        ScenarioStep::ScrollTo { offset: 0.0 },
        ScenarioStep::Gesture {
            phase: GesturePhase::Begin,
            y: 21.0,
            x: Some(10.0),
        },
        ScenarioStep::AssertState {
            state: ScrubberState::Scrolling,
        },
    ]);
    let report = ScenarioRunner::run_scenario(&scenario).unwrap();

    assert!(report.passed(), "{report}");
    assert!(report.transcript[1].events.is_empty());
}

#[test]
fn test_report_serializes_to_json() {
    let scenario = scenario(vec![ScenarioStep::ScrollTo { offset: 0.0 }]);
    let report = ScenarioRunner::run_scenario(&scenario).unwrap();

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["name"], "inline");
    assert_eq!(json["transcript"][0]["state"], "scrolling");
    assert_eq!(json["transcript"][0]["title"], "SECTION 0");
    assert!(json["failure"].is_null());
    assert!(json["transcript"][0].get("failure").is_none());
}

#[test]
fn test_invalid_config_is_an_error() {
    let mut scenario = scenario(Vec::new());
    scenario.config.auto_hide_delay = 0.0;
    assert!(matches!(
        ScenarioRunner::run_scenario(&scenario),
        Err(ReplayError::Config(_))
    ));
}
