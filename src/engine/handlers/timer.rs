//! Timer registrations: `setTimeout`, `setInterval`, `requestAnimationFrame`
//!
//! Registration is the visible part here: a brief stack frame and a Web-API
//! entry. Execution of timeout and frame callbacks belongs to the drain
//! phases in the generator; `setInterval` is registration-only and its entry
//! persists in the Web APIs for the whole run.

use crate::engine::errors::GenerateError;
use crate::engine::generator::{DeferredCallback, StepGenerator, TimerKind};
use crate::engine::step::MicroStep;
use crate::engine::value::Value;
use crate::parser::ast::Node;

impl StepGenerator {
    pub(crate) fn handle_set_timeout(&mut self, args: &[Node]) -> Result<Value, GenerateError> {
        let delay = self.delay_from_args(args);
        let id = self.next_timer_id();

        self.push_step(MicroStep::StackPush {
            name: format!("setTimeout(fn, {delay})"),
        });
        self.push_step(MicroStep::WebApiAdd {
            id,
            name: format!("setTimeout ({delay}ms)"),
            delay,
        });
        self.push_step(MicroStep::StackPop);

        self.deferred_callbacks.push(DeferredCallback {
            id,
            kind: TimerKind::Timeout,
            delay,
            callback: args.first().cloned(),
            scope: self.scope.clone(),
        });
        Ok(Value::Number(id as f64))
    }

    pub(crate) fn handle_set_interval(&mut self, args: &[Node]) -> Result<Value, GenerateError> {
        let delay = self.delay_from_args(args);
        let id = self.next_timer_id();

        self.push_step(MicroStep::StackPush {
            name: format!("setInterval(fn, {delay})"),
        });
        self.push_step(MicroStep::WebApiAdd {
            id,
            name: format!("setInterval ({delay}ms)"),
            delay,
        });
        self.push_step(MicroStep::StackPop);

        // No DeferredCallback: the interval's body is never expanded
        Ok(Value::Number(id as f64))
    }

    pub(crate) fn handle_animation_frame(&mut self, args: &[Node]) -> Result<Value, GenerateError> {
        let id = self.next_timer_id();

        self.push_step(MicroStep::StackPush {
            name: "requestAnimationFrame(fn)".to_string(),
        });
        self.push_step(MicroStep::WebApiAdd {
            id,
            name: "requestAnimationFrame".to_string(),
            delay: 0,
        });
        self.push_step(MicroStep::StackPop);

        self.deferred_callbacks.push(DeferredCallback {
            id,
            kind: TimerKind::Raf,
            delay: 0,
            callback: args.first().cloned(),
            scope: self.scope.clone(),
        });
        Ok(Value::Number(id as f64))
    }

    /// Declared delay from the second argument. Only a number literal counts;
    /// anything else degrades to `0`.
    fn delay_from_args(&self, args: &[Node]) -> u64 {
        match args.get(1) {
            Some(Node::NumberLiteral(value, _)) if *value >= 0.0 => *value as u64,
            _ => 0,
        }
    }
}
