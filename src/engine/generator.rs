//! Step generator: the scheduling engine
//!
//! [`StepGenerator`] owns all execution state for one run — the scope chain,
//! the function registry, id counters, the accumulated step sequence, and the
//! deferred-work lists. One generation is wholly synchronous and
//! deterministic: the program body is walked first, then deferred work is
//! linearized into the final order.
//!
//! # Pipeline
//!
//! ```text
//! parse → synchronous walk → drain microtasks → drain animation frames → drain tasks
//! ```
//!
//! Ordering guarantees:
//! - every synchronous-phase step precedes every microtask step, which
//!   precede animation-frame steps, which precede task steps;
//! - microtasks drain by current-length-at-iteration, so a microtask enqueued
//!   mid-drain runs later in the same drain (true queue semantics);
//! - pending timers run ascending by declared delay, stable on ties;
//! - after each task, newly enqueued microtasks drain before the next task
//!   (microtask checkpoint).

use crate::engine::errors::GenerateError;
use crate::engine::limits::{MAX_CODE_LENGTH, MAX_MICROTASKS, MAX_STEPS};
use crate::engine::scope::Scope;
use crate::engine::step::MicroStep;
use crate::engine::value::FunctionValue;
use crate::parser::ast::Node;
use crate::parser::parse::Parser;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Settled state of a promise chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    Fulfilled,
    Rejected,
}

/// What kind of continuation a deferred microtask carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicrotaskKind {
    Then,
    Catch,
    AwaitContinuation,
}

impl MicrotaskKind {
    /// Name shown in the microtask queue pane
    pub fn display_name(&self) -> &'static str {
        match self {
            MicrotaskKind::Then => "Promise.then",
            MicrotaskKind::Catch => "Promise.catch",
            MicrotaskKind::AwaitContinuation => "await continuation",
        }
    }
}

/// The deferred work a microtask runs when drained
#[derive(Debug, Clone)]
pub enum MicrotaskWork {
    /// A `.then`/`.catch` callback function node
    Callback(Node),
    /// Remaining statements of a suspended block (`await` continuation)
    Continuation(Vec<Node>),
    /// Nothing to run; the queue movement itself is the visible effect
    None,
}

/// A promise continuation waiting for the microtask drain.
/// Created by handlers, consumed exactly once by the scheduler.
#[derive(Debug, Clone)]
pub struct DeferredMicrotask {
    pub id: u32,
    pub kind: MicrotaskKind,
    pub work: MicrotaskWork,
    pub scope: Scope,
    pub state: PromiseState,
}

/// Which timer construct registered a deferred callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Timeout,
    Interval,
    Raf,
}

/// A timer/frame callback waiting in the Web APIs
#[derive(Debug, Clone)]
pub struct DeferredCallback {
    pub id: u32,
    pub kind: TimerKind,
    pub delay: u64,
    pub callback: Option<Node>,
    pub scope: Scope,
}

/// The scheduling engine for one program run
pub struct StepGenerator {
    /// Current scope; handlers swap this when entering function bodies
    pub(crate) scope: Scope,

    /// Registered function declarations (name -> definition with closure)
    pub(crate) functions: FxHashMap<String, Rc<FunctionValue>>,

    /// The accumulated micro-step sequence
    pub(crate) steps: Vec<MicroStep>,

    /// Pending promise continuations
    pub(crate) deferred_microtasks: Vec<DeferredMicrotask>,

    /// Pending timer/frame callbacks
    pub(crate) deferred_callbacks: Vec<DeferredCallback>,

    /// Counter for timer/frame ids
    timer_ids: u32,

    /// Counter for microtask ids
    microtask_ids: u32,

    /// Microtasks processed so far this generation (hard cap)
    microtasks_processed: usize,

    /// Current user-function call depth (recursion guard)
    pub(crate) call_depth: usize,
}

impl StepGenerator {
    pub fn new() -> Self {
        StepGenerator {
            scope: Scope::new(),
            functions: FxHashMap::default(),
            steps: Vec::new(),
            deferred_microtasks: Vec::new(),
            deferred_callbacks: Vec::new(),
            timer_ids: 0,
            microtask_ids: 0,
            microtasks_processed: 0,
            call_depth: 0,
        }
    }

    /// Reset to a pristine state; a subsequent run is independent of any prior run
    pub fn reset(&mut self) {
        self.scope = Scope::new();
        self.functions.clear();
        self.steps.clear();
        self.deferred_microtasks.clear();
        self.deferred_callbacks.clear();
        self.timer_ids = 0;
        self.microtask_ids = 0;
        self.microtasks_processed = 0;
        self.call_depth = 0;
    }

    /// Generate the full micro-step sequence for a source program
    pub fn generate(&mut self, source: &str) -> Result<Vec<MicroStep>, GenerateError> {
        self.reset();

        if source.len() > MAX_CODE_LENGTH {
            return Err(GenerateError::CodeTooLong {
                length: source.len(),
                limit: MAX_CODE_LENGTH,
            });
        }

        // Parser failures degrade to a generic syntax error
        let program = Parser::new(source)
            .and_then(|mut p| p.parse_program())
            .map_err(|_| GenerateError::Syntax)?;

        // Synchronous walk: handlers fire here and populate the deferred lists
        self.run_block(&program.body)?;

        // Microtasks first (higher priority than the task queue)
        self.drain_microtasks()?;

        // Animation frames run between microtasks and tasks
        self.drain_animation_frames()?;

        // Finally the task queue
        self.drain_tasks()?;

        self.check_step_budget()?;
        Ok(self.steps.clone())
    }

    // ===== Step bookkeeping =====

    pub(crate) fn push_step(&mut self, step: MicroStep) {
        self.steps.push(step);
    }

    pub(crate) fn check_step_budget(&self) -> Result<(), GenerateError> {
        if self.steps.len() > MAX_STEPS {
            Err(GenerateError::StepLimitExceeded { limit: MAX_STEPS })
        } else {
            Ok(())
        }
    }

    pub(crate) fn next_timer_id(&mut self) -> u32 {
        let id = self.timer_ids;
        self.timer_ids += 1;
        id
    }

    pub(crate) fn next_microtask_id(&mut self) -> u32 {
        let id = self.microtask_ids;
        self.microtask_ids += 1;
        id
    }

    // ===== Continuations =====

    /// Enqueue an empty await continuation capturing the current scope.
    /// Enclosing blocks and loops extend it as `Suspend` propagates upward.
    pub(crate) fn begin_continuation(&mut self) {
        let id = self.next_microtask_id();
        self.deferred_microtasks.push(DeferredMicrotask {
            id,
            kind: MicrotaskKind::AwaitContinuation,
            work: MicrotaskWork::Continuation(Vec::new()),
            scope: self.scope.clone(),
            state: PromiseState::Fulfilled,
        });
    }

    /// Append deferred statements to the most recent await continuation
    pub(crate) fn extend_continuation(&mut self, stmts: &[Node]) {
        if let Some(task) = self
            .deferred_microtasks
            .iter_mut()
            .rev()
            .find(|t| t.kind == MicrotaskKind::AwaitContinuation)
        {
            if let MicrotaskWork::Continuation(body) = &mut task.work {
                body.extend_from_slice(stmts);
            }
        }
    }

    // ===== Drain phases =====

    /// Process deferred microtasks by current length at iteration time: an
    /// entry enqueued during processing is visited later in the same loop.
    pub(crate) fn drain_microtasks(&mut self) -> Result<(), GenerateError> {
        let mut index = 0;
        while index < self.deferred_microtasks.len() {
            if self.microtasks_processed >= MAX_MICROTASKS {
                return Err(GenerateError::MicrotaskLimitExceeded {
                    limit: MAX_MICROTASKS,
                });
            }
            self.microtasks_processed += 1;

            let task = self.deferred_microtasks[index].clone();
            index += 1;

            self.push_step(MicroStep::MicrotaskAdd {
                id: task.id,
                name: task.kind.display_name().to_string(),
            });
            self.push_step(MicroStep::MicrotaskRemove);
            self.run_microtask(&task)?;
            self.check_step_budget()?;
        }
        self.deferred_microtasks.clear();
        Ok(())
    }

    /// Execute one drained microtask under its captured scope
    fn run_microtask(&mut self, task: &DeferredMicrotask) -> Result<(), GenerateError> {
        match &task.work {
            MicrotaskWork::None => Ok(()),
            MicrotaskWork::Callback(node) => self.run_deferred_callback(node, &task.scope),
            MicrotaskWork::Continuation(stmts) => {
                let caller_scope = self.scope.clone();
                self.scope = task.scope.clone();
                let result = self.run_block(stmts);
                self.scope = caller_scope;
                // Return ends the continuation; Suspend already enqueued its successor
                result.map(|_| ())
            }
        }
    }

    /// Move each registered frame callback from the Web APIs to the RAF queue
    /// and execute it once, in registration order.
    fn drain_animation_frames(&mut self) -> Result<(), GenerateError> {
        let mut rest = Vec::new();
        let mut frames = Vec::new();
        for cb in self.deferred_callbacks.drain(..) {
            if cb.kind == TimerKind::Raf {
                frames.push(cb);
            } else {
                rest.push(cb);
            }
        }
        self.deferred_callbacks = rest;

        for frame in frames {
            self.push_step(MicroStep::WebApiRemove { id: frame.id });
            self.push_step(MicroStep::RafAdd {
                id: frame.id,
                name: "rAF callback".to_string(),
            });
            self.push_step(MicroStep::RafRemove { id: frame.id });
            if let Some(callback) = &frame.callback {
                self.run_deferred_callback(callback, &frame.scope)?;
            }
            self.drain_microtasks()?;
            self.check_step_budget()?;
        }
        Ok(())
    }

    /// Run pending timeouts ascending by declared delay (stable on ties),
    /// with a microtask checkpoint after each one. Timers registered while a
    /// task runs join the pool under the same rule. `setInterval`
    /// registrations are visualized but never executed; they stay behind in
    /// the Web APIs.
    fn drain_tasks(&mut self) -> Result<(), GenerateError> {
        loop {
            let next = self
                .deferred_callbacks
                .iter()
                .enumerate()
                .filter(|(_, cb)| cb.kind == TimerKind::Timeout)
                .min_by_key(|(index, cb)| (cb.delay, *index))
                .map(|(index, _)| index);

            let Some(index) = next else { break };
            let task = self.deferred_callbacks.remove(index);

            self.push_step(MicroStep::WebApiRemove { id: task.id });
            self.push_step(MicroStep::TaskAdd {
                id: task.id,
                name: "setTimeout callback".to_string(),
            });
            self.push_step(MicroStep::TaskRemove { id: task.id });

            if let Some(callback) = &task.callback {
                self.run_deferred_callback(callback, &task.scope)?;
            }

            // Microtask checkpoint: promise work enqueued by this task runs
            // before the next task is picked up
            self.drain_microtasks()?;
            self.check_step_budget()?;
        }
        Ok(())
    }
}

impl Default for StepGenerator {
    fn default() -> Self {
        Self::new()
    }
}
