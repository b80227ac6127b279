//! Step-generation engine
//!
//! The engine turns a parsed program into a deterministic sequence of
//! [`MicroStep`](step::MicroStep)s modeling a single-threaded event loop:
//! synchronous execution first, then pending microtasks, animation frames,
//! and timed tasks, linearized in that order. Nothing here performs real
//! I/O or waits; time only exists in the replayed output.

pub mod errors;
pub mod eval;
pub mod generator;
pub mod handlers;
pub mod limits;
pub mod scope;
pub mod step;
pub mod value;
