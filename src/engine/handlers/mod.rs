//! Per-construct call handlers
//!
//! Every call expression routes through [`classify`] into a closed
//! [`CallKind`], then dispatches to the matching handler. The handlers live
//! in sibling files as `impl StepGenerator` blocks: timers, promise chains,
//! user functions, and console output. Unrecognized calls degrade to a
//! no-op; the enclosing statement's highlight is their only visible step.

pub mod console;
pub mod function;
pub mod promise;
pub mod timer;

use crate::engine::errors::GenerateError;
use crate::engine::generator::StepGenerator;
use crate::engine::value::Value;
use crate::parser::ast::Node;

/// Which settle constructor a `Promise.*` call names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettleKind {
    Resolve,
    Reject,
    All,
}

/// Which chain branch a `.then`/`.catch` call attaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BranchKind {
    Then,
    Catch,
}

/// Recognized call shapes. Dispatch is a closed match over this set; any
/// other callee falls into [`CallKind::Unrecognized`].
#[derive(Debug)]
pub(crate) enum CallKind<'a> {
    ConsoleLog,
    SetTimeout,
    SetInterval,
    AnimationFrame,
    Settle(SettleKind),
    Branch { object: &'a Node, branch: BranchKind },
    User(&'a str),
    Unrecognized,
}

/// Classify a callee node into a recognized call shape
pub(crate) fn classify(callee: &Node) -> CallKind<'_> {
    match callee {
        Node::Identifier(name, _) => match name.as_str() {
            "setTimeout" => CallKind::SetTimeout,
            "setInterval" => CallKind::SetInterval,
            "requestAnimationFrame" => CallKind::AnimationFrame,
            name => CallKind::User(name),
        },
        Node::Member {
            object, property, ..
        } => {
            let object = object.as_ref();
            if let Node::Identifier(base, _) = object {
                match (base.as_str(), property.as_str()) {
                    ("console", "log") => return CallKind::ConsoleLog,
                    ("Promise", "resolve") => return CallKind::Settle(SettleKind::Resolve),
                    ("Promise", "reject") => return CallKind::Settle(SettleKind::Reject),
                    ("Promise", "all") => return CallKind::Settle(SettleKind::All),
                    _ => {}
                }
            }
            match property.as_str() {
                "then" => CallKind::Branch {
                    object,
                    branch: BranchKind::Then,
                },
                "catch" => CallKind::Branch {
                    object,
                    branch: BranchKind::Catch,
                },
                _ => CallKind::Unrecognized,
            }
        }
        _ => CallKind::Unrecognized,
    }
}

impl StepGenerator {
    /// Dispatch a call expression to its handler
    pub(crate) fn handle_call(&mut self, node: &Node) -> Result<Value, GenerateError> {
        let Node::Call { callee, args, .. } = node else {
            return Ok(Value::Undefined);
        };
        match classify(callee) {
            CallKind::ConsoleLog => self.handle_console_log(args),
            CallKind::SetTimeout => self.handle_set_timeout(args),
            CallKind::SetInterval => self.handle_set_interval(args),
            CallKind::AnimationFrame => self.handle_animation_frame(args),
            CallKind::Settle(kind) => self.handle_promise_settle(kind, args),
            CallKind::Branch { object, branch } => {
                self.handle_promise_branch(object, branch, args)
            }
            CallKind::User(name) => self.handle_user_call(name, args),
            CallKind::Unrecognized => Ok(Value::Undefined),
        }
    }
}
