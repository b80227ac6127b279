//! Replay engine
//!
//! A generated step sequence is inert data; the [`Replayer`] drains it into
//! a [`PresentationStore`] at a configurable pace. [`Replayer::advance`]
//! applies a single step (manual stepping), [`Replayer::run`] plays the rest
//! of the sequence with per-step delays scaled by the speed setting.
//!
//! Control lives in [`ReplayControls`], a handle another thread (the input
//! loop) can share: pause and stop are plain flags polled between steps, and
//! `running` is a compare-exchange guard so the sequence can never be drained
//! twice concurrently.

pub mod store;

use crate::engine::step::MicroStep;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use store::PresentationStore;

/// Baseline per-step delay; `speed_ms` scales durations relative to this
pub const BASE_SPEED_MS: u64 = 500;

/// How often a paused run re-checks its flags
const PAUSE_POLL_MS: u64 = 50;

/// Replay failures
#[derive(Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// Another `run` already holds the running guard
    AlreadyRunning,
    /// Stop was requested before the sequence finished
    Interrupted,
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::AlreadyRunning => write!(f, "replay already in progress"),
            ReplayError::Interrupted => write!(f, "replay stopped before completion"),
        }
    }
}

impl std::error::Error for ReplayError {}

/// Shared replay flags; clone the `Arc` into whichever thread drives input
#[derive(Debug, Default)]
pub struct ReplayControls {
    paused: AtomicBool,
    stopped: AtomicBool,
    running: AtomicBool,
}

impl ReplayControls {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Take the running guard; false if someone else holds it
    fn try_start(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn finish(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Clear pause/stop ahead of a fresh run
    pub fn clear(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.stopped.store(false, Ordering::SeqCst);
    }
}

/// Drains a step sequence into a presentation store
pub struct Replayer {
    steps: Vec<MicroStep>,
    position: usize,
    controls: Arc<ReplayControls>,
}

impl Replayer {
    pub fn new(steps: Vec<MicroStep>) -> Self {
        Replayer {
            steps,
            position: 0,
            controls: ReplayControls::new(),
        }
    }

    /// Handle for pausing/stopping from another thread
    pub fn controls(&self) -> Arc<ReplayControls> {
        Arc::clone(&self.controls)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.steps.len()
    }

    /// The step `advance` would apply next
    pub fn peek(&self) -> Option<&MicroStep> {
        self.steps.get(self.position)
    }

    /// Apply the next step to the store. Returns the applied step, or `None`
    /// when the sequence is exhausted.
    pub fn advance<S: PresentationStore>(&mut self, store: &mut S) -> Option<&MicroStep> {
        if self.position >= self.steps.len() {
            return None;
        }
        let index = self.position;
        self.position += 1;
        let step = &self.steps[index];
        store.apply(step);
        Some(step)
    }

    /// Rewind to the beginning and clear the store
    pub fn restart<S: PresentationStore>(&mut self, store: &mut S) {
        self.position = 0;
        self.controls.clear();
        store.reset();
    }

    /// Play the remaining steps into the store, sleeping each step's nominal
    /// duration scaled by `speed_ms` (500 is 1x). Pausing holds between
    /// steps; stop aborts with [`ReplayError::Interrupted`]. A second
    /// concurrent `run` against the same controls is refused.
    pub fn run<S: PresentationStore>(
        &mut self,
        store: &mut S,
        speed_ms: u64,
    ) -> Result<(), ReplayError> {
        if !self.controls.try_start() {
            return Err(ReplayError::AlreadyRunning);
        }
        let result = self.run_inner(store, speed_ms);
        self.controls.finish();
        result
    }

    fn run_inner<S: PresentationStore>(
        &mut self,
        store: &mut S,
        speed_ms: u64,
    ) -> Result<(), ReplayError> {
        while !self.is_done() {
            while self.controls.is_paused() {
                if self.controls.is_stopped() {
                    return Err(ReplayError::Interrupted);
                }
                thread::sleep(Duration::from_millis(PAUSE_POLL_MS));
            }
            if self.controls.is_stopped() {
                return Err(ReplayError::Interrupted);
            }

            let Some(step) = self.advance(store) else {
                break;
            };
            let delay = step.duration_ms() * speed_ms / BASE_SPEED_MS;
            thread::sleep(Duration::from_millis(delay));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::store::VisualizerState;
    use super::*;

    fn sample_steps() -> Vec<MicroStep> {
        vec![
            MicroStep::HighlightLine { line: 1 },
            MicroStep::ConsoleOutput {
                message: "A".to_string(),
            },
            MicroStep::ConsoleOutput {
                message: "B".to_string(),
            },
        ]
    }

    #[test]
    fn test_advance_applies_steps_in_order() {
        let mut replayer = Replayer::new(sample_steps());
        let mut state = VisualizerState::new();
        while replayer.advance(&mut state).is_some() {}
        assert_eq!(state.console, vec!["A", "B"]);
        assert_eq!(state.highlighted_line, Some(1));
        assert!(replayer.is_done());
    }

    #[test]
    fn test_empty_sequence_is_done_immediately() {
        let mut replayer = Replayer::new(Vec::new());
        assert!(replayer.is_empty());
        assert!(replayer.is_done());
        let mut state = VisualizerState::new();
        assert!(replayer.advance(&mut state).is_none());
    }

    #[test]
    fn test_restart_clears_store_and_position() {
        let mut replayer = Replayer::new(sample_steps());
        let mut state = VisualizerState::new();
        while replayer.advance(&mut state).is_some() {}
        replayer.restart(&mut state);
        assert_eq!(replayer.position(), 0);
        assert!(state.console.is_empty());
    }

    #[test]
    fn test_run_refused_while_running() {
        let replayer = Replayer::new(sample_steps());
        let controls = replayer.controls();
        assert!(controls.try_start());
        let mut replayer = replayer;
        let mut state = VisualizerState::new();
        assert_eq!(
            replayer.run(&mut state, 0),
            Err(ReplayError::AlreadyRunning)
        );
    }

    #[test]
    fn test_stop_interrupts_run() {
        let mut replayer = Replayer::new(sample_steps());
        let controls = replayer.controls();
        controls.stop();
        let mut state = VisualizerState::new();
        assert_eq!(replayer.run(&mut state, 0), Err(ReplayError::Interrupted));
        assert!(!controls.is_running());
    }
}
