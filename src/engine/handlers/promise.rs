//! Promise chains: `Promise.resolve`/`reject`/`all` and `.then`/`.catch`
//!
//! No promise objects exist at runtime. A chain's settled state is inferred
//! syntactically by walking the callee chain down to the root constructor
//! (bounded hop count); a branch only enqueues work when it matches that
//! state. A `.then` on a rejected chain and a `.catch` on a fulfilled one are
//! complete no-ops, modeling promise short-circuiting.

use crate::engine::errors::GenerateError;
use crate::engine::generator::{
    DeferredMicrotask, MicrotaskKind, MicrotaskWork, PromiseState, StepGenerator,
};
use crate::engine::handlers::{classify, BranchKind, CallKind, SettleKind};
use crate::engine::limits::MAX_CHAIN_HOPS;
use crate::engine::step::MicroStep;
use crate::engine::value::Value;
use crate::parser::ast::Node;

impl StepGenerator {
    /// A standalone settle call: visible stack blip, args evaluated, and a
    /// no-op microtask so the queue movement shows up during the drain.
    pub(crate) fn handle_promise_settle(
        &mut self,
        kind: SettleKind,
        args: &[Node],
    ) -> Result<Value, GenerateError> {
        let first = self.eval_settle_args(args)?;

        let label = match kind {
            SettleKind::Resolve => "Promise.resolve()",
            SettleKind::Reject => "Promise.reject()",
            SettleKind::All => "Promise.all()",
        };
        self.push_step(MicroStep::StackPush {
            name: label.to_string(),
        });
        self.push_step(MicroStep::StackPop);

        let id = self.next_microtask_id();
        self.deferred_microtasks.push(DeferredMicrotask {
            id,
            kind: MicrotaskKind::Then,
            work: MicrotaskWork::None,
            scope: self.scope.clone(),
            state: match kind {
                SettleKind::Reject => PromiseState::Rejected,
                SettleKind::Resolve | SettleKind::All => PromiseState::Fulfilled,
            },
        });

        // The settled value is the first argument (awaits observe it)
        Ok(first)
    }

    /// A `.then`/`.catch` attachment. The object chain is processed first
    /// (left to right), so inner branches enqueue before outer ones.
    pub(crate) fn handle_promise_branch(
        &mut self,
        object: &Node,
        branch: BranchKind,
        args: &[Node],
    ) -> Result<Value, GenerateError> {
        self.eval_chain_object(object)?;

        let state = infer_chain_state(object);
        let fires = matches!(
            (branch, state),
            (BranchKind::Then, PromiseState::Fulfilled)
                | (BranchKind::Catch, PromiseState::Rejected)
        );
        if !fires {
            return Ok(Value::Undefined);
        }

        let (label, kind) = match branch {
            BranchKind::Then => ("Promise.then()", MicrotaskKind::Then),
            BranchKind::Catch => ("Promise.catch()", MicrotaskKind::Catch),
        };
        self.push_step(MicroStep::StackPush {
            name: label.to_string(),
        });
        self.push_step(MicroStep::StackPop);

        let id = self.next_microtask_id();
        let work = match args.first() {
            Some(callback) => MicrotaskWork::Callback(callback.clone()),
            None => MicrotaskWork::None,
        };
        self.deferred_microtasks.push(DeferredMicrotask {
            id,
            kind,
            work,
            scope: self.scope.clone(),
            state,
        });
        Ok(Value::Undefined)
    }

    /// Process the receiver of a branch call. Inner branches recurse through
    /// the normal dispatch; a root settle call only has its arguments
    /// evaluated here, without the standalone no-op microtask (its visible
    /// effect is the branch being attached to it).
    fn eval_chain_object(&mut self, object: &Node) -> Result<(), GenerateError> {
        if let Node::Call { callee, args, .. } = object {
            match classify(callee) {
                CallKind::Settle(_) => {
                    self.eval_settle_args(args)?;
                    return Ok(());
                }
                CallKind::Branch { object, branch } => {
                    self.handle_promise_branch(object, branch, args)?;
                    return Ok(());
                }
                _ => {}
            }
        }
        self.evaluate(object)?;
        Ok(())
    }

    /// Evaluate settle-call arguments for their side effects; returns the
    /// first argument's value (`Promise.all` array elements run through the
    /// array literal's own evaluation).
    fn eval_settle_args(&mut self, args: &[Node]) -> Result<Value, GenerateError> {
        let mut first = Value::Undefined;
        for (index, arg) in args.iter().enumerate() {
            let value = self.evaluate(arg)?;
            if index == 0 {
                first = value;
            }
        }
        Ok(first)
    }
}

/// Walk a branch receiver down to its root promise-producing call and infer
/// the settled state a branch at this position observes. Bounded to
/// [`MAX_CHAIN_HOPS`]; an unrecognizable or over-deep chain defaults to
/// fulfilled.
pub(crate) fn infer_chain_state(object: &Node) -> PromiseState {
    // Walk toward the root, remembering branch hops nearest-first
    let mut branches = Vec::new();
    let mut root = PromiseState::Fulfilled;
    let mut current = object;
    for _ in 0..MAX_CHAIN_HOPS {
        let Node::Call { callee, .. } = current else {
            break;
        };
        match classify(callee) {
            CallKind::Settle(SettleKind::Reject) => {
                root = PromiseState::Rejected;
                break;
            }
            CallKind::Settle(_) => break,
            CallKind::Branch { object, branch } => {
                branches.push(branch);
                current = object;
            }
            _ => {
                // Some other call produced the receiver; step into its callee
                // object if it has one, otherwise give up
                let Node::Member { object, .. } = callee.as_ref() else {
                    break;
                };
                current = object;
            }
        }
    }

    // Fold outward from the root. A catch on a rejection handles it, so
    // everything downstream observes fulfilled; a non-matching branch passes
    // the state through unchanged.
    let mut state = root;
    for branch in branches.into_iter().rev() {
        if matches!((branch, state), (BranchKind::Catch, PromiseState::Rejected)) {
            state = PromiseState::Fulfilled;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn receiver_of(source: &str) -> Node {
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();
        let Node::ExpressionStatement { expr, .. } = &program.body[0] else {
            panic!("expected expression statement");
        };
        let Node::Call { callee, .. } = expr.as_ref() else {
            panic!("expected call");
        };
        let Node::Member { object, .. } = callee.as_ref() else {
            panic!("expected member callee");
        };
        object.as_ref().clone()
    }

    #[test]
    fn test_resolve_chain_is_fulfilled() {
        let object = receiver_of("Promise.resolve().then(() => {});");
        assert_eq!(infer_chain_state(&object), PromiseState::Fulfilled);
    }

    #[test]
    fn test_reject_chain_stays_rejected_through_then() {
        let object = receiver_of("Promise.reject().then(() => {}).catch(() => {});");
        assert_eq!(infer_chain_state(&object), PromiseState::Rejected);
    }

    #[test]
    fn test_catch_recovers_rejection() {
        let object = receiver_of("Promise.reject().catch(() => {}).then(() => {});");
        assert_eq!(infer_chain_state(&object), PromiseState::Fulfilled);
    }
}
