// Guard rails for step generation

/// Maximum accepted source length in characters
pub const MAX_CODE_LENGTH: usize = 50_000;

/// Maximum number of generated micro-steps per run
pub const MAX_STEPS: usize = 10_000;

/// Maximum iterations of a single `for` loop before it is cut short
pub const MAX_LOOP_ITERATIONS: usize = 1_000;

/// Maximum microtasks processed per generation (nested-microtask divergence guard)
pub const MAX_MICROTASKS: usize = 1_000;

/// Maximum hops when walking a promise chain to its root call
pub const MAX_CHAIN_HOPS: usize = 20;

/// Maximum user-function call depth during generation
pub const MAX_CALL_DEPTH: usize = 200;
