//! # Introduction
//!
//! LoopLens parses a subset of JavaScript and, instead of executing it
//! directly, generates a deterministic sequence of micro-steps reproducing
//! how a browser's event loop would schedule it: synchronous code first,
//! then microtasks, animation frames, and timed tasks. The sequence is then
//! replayed at a configurable pace through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → StepGenerator → MicroSteps → Replayer → TUI
//! ```
//!
//! 1. [`parser`] — tokenises the source and builds an AST.
//! 2. [`engine`] — walks the AST and linearizes all deferred work into one
//!    [`engine::step::MicroStep`] sequence via
//!    [`engine::generator::StepGenerator`].
//! 3. [`replay`] — drains the sequence into a
//!    [`replay::store::PresentationStore`], one step at a time or paced.
//! 4. [`presets`] — the built-in example programs.
//! 5. [`ui`] — ratatui-based TUI; not part of the stable library API.
//!
//! ## Supported JavaScript subset
//!
//! Declarations: `let`/`const`/`var` (single declarator), `function`,
//! `async function`, arrow functions. Control flow: `if/else`, `for`,
//! `return`, `await`. Built-ins: `console.log`, `setTimeout`, `setInterval`,
//! `requestAnimationFrame`, `Promise.resolve/reject/all`, `.then`/`.catch`.

pub mod engine;
pub mod parser;
pub mod presets;
pub mod replay;
pub mod ui;
