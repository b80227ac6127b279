//! Presentation state fed by the replay engine
//!
//! [`PresentationStore`] is the seam between replay and display: the replayer
//! only knows how to hand steps to a store, and the store decides what a
//! highlight or a queue movement looks like. [`VisualizerState`] is the
//! plain in-memory implementation the TUI renders from; tests drive it
//! directly to observe replayed sequences.

use crate::engine::step::{MicroStep, StepId};

/// A queue entry as displayed: id plus a human-readable label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: StepId,
    pub name: String,
}

/// A Web-API registration as displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebApiEntry {
    pub id: StepId,
    pub name: String,
    pub delay: u64,
}

/// Mutations the replay engine performs against a display surface
pub trait PresentationStore {
    fn set_highlight(&mut self, line: usize);
    fn push_frame(&mut self, name: String);
    fn pop_frame(&mut self);
    fn append_console(&mut self, message: String);
    fn webapi_add(&mut self, entry: WebApiEntry);
    fn webapi_remove(&mut self, id: StepId);
    fn task_add(&mut self, entry: QueueEntry);
    fn task_remove(&mut self, id: StepId);
    fn microtask_add(&mut self, entry: QueueEntry);
    fn microtask_remove(&mut self);
    fn raf_add(&mut self, entry: QueueEntry);
    fn raf_remove(&mut self, id: StepId);
    fn reset(&mut self);

    /// Apply one micro-step by routing it to the matching mutator
    fn apply(&mut self, step: &MicroStep) {
        match step {
            MicroStep::HighlightLine { line } => self.set_highlight(*line),
            MicroStep::StackPush { name } => self.push_frame(name.clone()),
            MicroStep::StackPop => self.pop_frame(),
            MicroStep::ConsoleOutput { message } => self.append_console(message.clone()),
            MicroStep::WebApiAdd { id, name, delay } => self.webapi_add(WebApiEntry {
                id: *id,
                name: name.clone(),
                delay: *delay,
            }),
            MicroStep::WebApiRemove { id } => self.webapi_remove(*id),
            MicroStep::TaskAdd { id, name } => self.task_add(QueueEntry {
                id: *id,
                name: name.clone(),
            }),
            MicroStep::TaskRemove { id } => self.task_remove(*id),
            MicroStep::MicrotaskAdd { id, name } => self.microtask_add(QueueEntry {
                id: *id,
                name: name.clone(),
            }),
            MicroStep::MicrotaskRemove => self.microtask_remove(),
            MicroStep::RafAdd { id, name } => self.raf_add(QueueEntry {
                id: *id,
                name: name.clone(),
            }),
            MicroStep::RafRemove { id } => self.raf_remove(*id),
        }
    }
}

/// In-memory visualizer state: one field per display pane
#[derive(Debug, Clone, Default)]
pub struct VisualizerState {
    pub highlighted_line: Option<usize>,
    pub call_stack: Vec<String>,
    pub console: Vec<String>,
    pub web_apis: Vec<WebApiEntry>,
    pub task_queue: Vec<QueueEntry>,
    pub microtask_queue: Vec<QueueEntry>,
    pub raf_queue: Vec<QueueEntry>,
}

impl VisualizerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every queue and the call stack have emptied out
    pub fn is_settled(&self) -> bool {
        self.call_stack.is_empty()
            && self.task_queue.is_empty()
            && self.microtask_queue.is_empty()
            && self.raf_queue.is_empty()
    }
}

impl PresentationStore for VisualizerState {
    fn set_highlight(&mut self, line: usize) {
        self.highlighted_line = Some(line);
    }

    fn push_frame(&mut self, name: String) {
        self.call_stack.push(name);
    }

    fn pop_frame(&mut self) {
        self.call_stack.pop();
    }

    fn append_console(&mut self, message: String) {
        self.console.push(message);
    }

    fn webapi_add(&mut self, entry: WebApiEntry) {
        self.web_apis.push(entry);
    }

    fn webapi_remove(&mut self, id: StepId) {
        self.web_apis.retain(|entry| entry.id != id);
    }

    fn task_add(&mut self, entry: QueueEntry) {
        self.task_queue.push(entry);
    }

    fn task_remove(&mut self, id: StepId) {
        self.task_queue.retain(|entry| entry.id != id);
    }

    fn microtask_add(&mut self, entry: QueueEntry) {
        self.microtask_queue.push(entry);
    }

    fn microtask_remove(&mut self) {
        if !self.microtask_queue.is_empty() {
            self.microtask_queue.remove(0);
        }
    }

    fn raf_add(&mut self, entry: QueueEntry) {
        self.raf_queue.push(entry);
    }

    fn raf_remove(&mut self, id: StepId) {
        self.raf_queue.retain(|entry| entry.id != id);
    }

    fn reset(&mut self) {
        *self = VisualizerState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_routes_queue_movement() {
        let mut state = VisualizerState::new();
        state.apply(&MicroStep::WebApiAdd {
            id: 0,
            name: "setTimeout (100ms)".to_string(),
            delay: 100,
        });
        state.apply(&MicroStep::WebApiRemove { id: 0 });
        state.apply(&MicroStep::TaskAdd {
            id: 0,
            name: "setTimeout callback".to_string(),
        });
        state.apply(&MicroStep::TaskRemove { id: 0 });
        assert!(state.is_settled());
        assert!(state.web_apis.is_empty());
    }

    #[test]
    fn test_microtask_queue_is_fifo() {
        let mut state = VisualizerState::new();
        state.apply(&MicroStep::MicrotaskAdd {
            id: 0,
            name: "Promise.then".to_string(),
        });
        state.apply(&MicroStep::MicrotaskAdd {
            id: 1,
            name: "Promise.then".to_string(),
        });
        state.apply(&MicroStep::MicrotaskRemove);
        assert_eq!(state.microtask_queue.len(), 1);
        assert_eq!(state.microtask_queue[0].id, 1);
    }
}
