//! Replayable micro-steps
//!
//! A [`MicroStep`] is one atomic unit of visible effect — a single stack push,
//! one console line, one queue movement. The generator emits them in the
//! exact order the simulated runtime would make them visible; the replay
//! engine applies them to a presentation store one at a time.
//!
//! Each step carries only the payload needed to replay it, plus a nominal
//! duration used for pacing and nothing else.

/// Identifier shared between a Web-API registration and its queue entries
pub type StepId = u32;

/// One atomic, replayable unit of visible effect
#[derive(Debug, Clone, PartialEq)]
pub enum MicroStep {
    /// Move the source highlight to a line
    HighlightLine { line: usize },
    /// Push a frame onto the call stack
    StackPush { name: String },
    /// Pop the top call-stack frame
    StackPop,
    /// Append a line to the console
    ConsoleOutput { message: String },
    /// Register a timer/frame callback with the Web APIs
    WebApiAdd { id: StepId, name: String, delay: u64 },
    /// Remove a registration from the Web APIs
    WebApiRemove { id: StepId },
    /// Enqueue a callback on the task (macrotask) queue
    TaskAdd { id: StepId, name: String },
    /// The event loop picks a task off the queue
    TaskRemove { id: StepId },
    /// Enqueue a continuation on the microtask queue
    MicrotaskAdd { id: StepId, name: String },
    /// The front microtask is picked up
    MicrotaskRemove,
    /// Move a frame callback onto the animation-frame queue
    RafAdd { id: StepId, name: String },
    /// A frame callback is picked up
    RafRemove { id: StepId },
}

impl MicroStep {
    /// Nominal duration in milliseconds, scaled by the replay speed multiplier
    pub fn duration_ms(&self) -> u64 {
        match self {
            MicroStep::HighlightLine { .. } => 400,
            MicroStep::StackPush { .. } => 300,
            MicroStep::StackPop => 300,
            MicroStep::ConsoleOutput { .. } => 200,
            MicroStep::WebApiAdd { .. } => 300,
            MicroStep::WebApiRemove { .. } => 200,
            MicroStep::TaskAdd { .. } => 300,
            MicroStep::TaskRemove { .. } => 200,
            MicroStep::MicrotaskAdd { .. } => 300,
            MicroStep::MicrotaskRemove => 200,
            MicroStep::RafAdd { .. } => 300,
            MicroStep::RafRemove { .. } => 200,
        }
    }
}
