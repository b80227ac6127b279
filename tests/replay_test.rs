// Integration tests for the replay engine: generated sequences applied to a
// presentation store must reconstruct the run faithfully

use looplens::engine::generator::StepGenerator;
use looplens::engine::step::MicroStep;
use looplens::presets;
use looplens::replay::store::VisualizerState;
use looplens::replay::{ReplayError, Replayer};
use std::thread;
use std::time::Duration;

fn steps_for(source: &str) -> Vec<MicroStep> {
    StepGenerator::new()
        .generate(source)
        .expect("step generation should succeed")
}

#[test]
fn test_full_replay_reconstructs_console_and_settles() {
    let preset = presets::find("basic-timeout").expect("preset exists");
    let steps = steps_for(preset.code);
    let expected_console: Vec<String> = steps
        .iter()
        .filter_map(|step| match step {
            MicroStep::ConsoleOutput { message } => Some(message.clone()),
            _ => None,
        })
        .collect();

    let mut replayer = Replayer::new(steps);
    let mut state = VisualizerState::new();
    replayer.run(&mut state, 0).expect("replay should finish");

    assert!(replayer.is_done());
    assert_eq!(state.console, expected_console);
    assert!(state.is_settled(), "all queues must drain by the end");
    assert!(state.web_apis.is_empty());
    assert!(state.highlighted_line.is_some());
}

#[test]
fn test_interval_registration_survives_full_replay() {
    let steps = steps_for("setInterval(() => console.log('tick'), 250);");
    let mut replayer = Replayer::new(steps);
    let mut state = VisualizerState::new();
    replayer.run(&mut state, 0).expect("replay should finish");

    assert_eq!(state.web_apis.len(), 1);
    assert!(state.web_apis[0].name.starts_with("setInterval"));
    assert_eq!(state.web_apis[0].delay, 250);
    assert!(state.console.is_empty());
}

#[test]
fn test_manual_stepping_visits_every_step_once() {
    let steps = steps_for("console.log('a');\nconsole.log('b');");
    let total = steps.len();
    let mut replayer = Replayer::new(steps);
    let mut state = VisualizerState::new();

    let mut visited = 0;
    while replayer.advance(&mut state).is_some() {
        visited += 1;
    }
    assert_eq!(visited, total);
    assert!(replayer.is_done());
    assert_eq!(state.console, vec!["a", "b"]);
}

#[test]
fn test_restart_resets_store_and_position() {
    let steps = steps_for("console.log('once');");
    let mut replayer = Replayer::new(steps);
    let mut state = VisualizerState::new();
    replayer.run(&mut state, 0).expect("replay should finish");
    assert!(!state.console.is_empty());

    replayer.restart(&mut state);
    assert_eq!(replayer.position(), 0);
    assert!(state.console.is_empty());
    assert!(state.highlighted_line.is_none());

    replayer.run(&mut state, 0).expect("replay should finish again");
    assert_eq!(state.console, vec!["once"]);
}

#[test]
fn test_stop_interrupts_a_run() {
    let steps = steps_for("console.log('never shown');");
    let mut replayer = Replayer::new(steps);
    let mut state = VisualizerState::new();

    replayer.controls().stop();
    let result = replayer.run(&mut state, 0);
    assert_eq!(result, Err(ReplayError::Interrupted));
    assert!(state.console.is_empty());
}

#[test]
fn test_pause_holds_between_steps_and_stop_while_paused_interrupts() {
    let steps = steps_for("console.log('a');\nconsole.log('b');");
    let mut replayer = Replayer::new(steps);
    let controls = replayer.controls();

    controls.pause();
    let handle = thread::spawn(move || {
        let mut state = VisualizerState::new();
        let result = replayer.run(&mut state, 0);
        (replayer, state, result)
    });

    // Wait for the run to take the running guard, then let it sit in the
    // pause loop for a few poll cycles
    for _ in 0..100 {
        if controls.is_running() {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    thread::sleep(Duration::from_millis(120));
    controls.stop();

    let (replayer, state, result) = handle.join().expect("replay thread panicked");
    assert_eq!(result, Err(ReplayError::Interrupted));
    assert_eq!(replayer.position(), 0, "a paused run must not advance");
    assert!(state.console.is_empty());
    assert!(!controls.is_running());
}

#[test]
fn test_resume_after_pause_completes_the_run() {
    let steps = steps_for("console.log('done');");
    let mut replayer = Replayer::new(steps);
    let controls = replayer.controls();

    controls.pause();
    let handle = thread::spawn(move || {
        let mut state = VisualizerState::new();
        let result = replayer.run(&mut state, 0);
        (state, result)
    });

    thread::sleep(Duration::from_millis(120));
    controls.resume();

    let (state, result) = handle.join().expect("replay thread panicked");
    assert_eq!(result, Ok(()));
    assert_eq!(state.console, vec!["done"]);
}

#[test]
fn test_replay_is_deterministic_across_runs() {
    let preset = presets::find("promise-vs-timeout").expect("preset exists");
    let steps = steps_for(preset.code);

    let mut first = VisualizerState::new();
    let mut replayer = Replayer::new(steps.clone());
    replayer.run(&mut first, 0).expect("first run");

    let mut second = VisualizerState::new();
    replayer.restart(&mut second);
    replayer.run(&mut second, 0).expect("second run");

    assert_eq!(first.console, second.console);
    assert_eq!(first.highlighted_line, second.highlighted_line);
}
