//! User-defined functions: registration, calls, and deferred callbacks
//!
//! Calls show up as a call-stack frame named with a shallow rendering of the
//! argument list. The body runs under a fresh child of the function's
//! defining scope (lexical capture); a body that suspends on `await` is
//! absorbed here: the frame pops, the call yields `undefined`, and the
//! packaged continuation waits for the microtask drain.

use crate::engine::errors::GenerateError;
use crate::engine::eval::Flow;
use crate::engine::generator::StepGenerator;
use crate::engine::limits::MAX_CALL_DEPTH;
use crate::engine::scope::Scope;
use crate::engine::step::MicroStep;
use crate::engine::value::{FunctionBody, FunctionValue, Value};
use crate::parser::ast::{ArrowBody, Node};
use std::rc::Rc;

impl StepGenerator {
    /// Register a function declaration in the current scope's registry
    pub(crate) fn register_function(&mut self, node: &Node) {
        let Node::FunctionDecl {
            name,
            params,
            body,
            is_async,
            location,
        } = node
        else {
            return;
        };
        self.push_step(MicroStep::HighlightLine {
            line: location.line,
        });
        self.functions.insert(
            name.clone(),
            Rc::new(FunctionValue {
                name: name.clone(),
                params: params.clone(),
                body: FunctionBody::Block(body.clone()),
                is_async: *is_async,
                scope: self.scope.clone(),
            }),
        );
    }

    /// Call a function by bare name: registry first, then closures in scope.
    /// An unknown name is a no-op.
    pub(crate) fn handle_user_call(
        &mut self,
        name: &str,
        args: &[Node],
    ) -> Result<Value, GenerateError> {
        let func = match self.functions.get(name).cloned() {
            Some(func) => func,
            None => match self.scope.get(name) {
                Value::Closure(func) => func,
                _ => return Ok(Value::Undefined),
            },
        };

        let display = display_call(name, args);
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg)?);
        }

        self.push_step(MicroStep::StackPush { name: display });
        let result = self.execute_function_body(&func, values);
        self.push_step(MicroStep::StackPop);
        result
    }

    /// Run a callable's body under a child of its defining scope with the
    /// given argument values bound to its parameters. A suspended body is
    /// absorbed: the caller proceeds and the call evaluates to `undefined`.
    pub(crate) fn execute_function_body(
        &mut self,
        func: &Rc<FunctionValue>,
        args: Vec<Value>,
    ) -> Result<Value, GenerateError> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(GenerateError::Analysis {
                message: "Maximum call stack size exceeded".to_string(),
            });
        }
        self.call_depth += 1;

        let caller_scope = self.scope.clone();
        self.scope = func.scope.child();
        for (index, param) in func.params.iter().enumerate() {
            let value = args.get(index).cloned().unwrap_or_default();
            self.scope.set(param, value);
        }

        let result = match &func.body {
            FunctionBody::Block(stmts) => match self.run_block(stmts) {
                Ok(Flow::Return(value)) => Ok(value),
                Ok(Flow::Normal) | Ok(Flow::Suspend) => Ok(Value::Undefined),
                Err(err) => Err(err),
            },
            FunctionBody::Expr(expr) => self.evaluate(expr),
        };

        self.scope = caller_scope;
        self.call_depth -= 1;
        result
    }

    /// Execute a deferred callback node (timer callback, frame callback, or
    /// `.then`/`.catch` argument) under its captured scope.
    pub(crate) fn run_deferred_callback(
        &mut self,
        node: &Node,
        scope: &Scope,
    ) -> Result<(), GenerateError> {
        match node {
            // Arrow bodies inline into the step stream; their statements
            // carry their own highlights
            Node::ArrowFunction { params, body, .. } => {
                let caller_scope = self.scope.clone();
                self.scope = scope.child();
                for param in params {
                    self.scope.set(param, Value::Undefined);
                }
                let result = match body {
                    ArrowBody::Block(stmts) => self.run_block(stmts).map(|_| ()),
                    ArrowBody::Expr(expr) => {
                        self.push_step(MicroStep::HighlightLine {
                            line: expr.location().line,
                        });
                        self.evaluate(expr).map(|_| ())
                    }
                };
                self.scope = caller_scope;
                result
            }

            // A named callback gets a proper frame
            Node::Identifier(name, location) => {
                let func = match self.functions.get(name).cloned() {
                    Some(func) => func,
                    None => match scope.get(name) {
                        Value::Closure(func) => func,
                        _ => return Ok(()),
                    },
                };
                self.push_step(MicroStep::HighlightLine {
                    line: location.line,
                });
                self.push_step(MicroStep::StackPush {
                    name: format!("{name}()"),
                });
                let result = self.execute_function_body(&func, Vec::new());
                self.push_step(MicroStep::StackPop);
                result.map(|_| ())
            }

            // Anything else evaluates under the captured scope
            other => {
                let caller_scope = self.scope.clone();
                self.scope = scope.clone();
                let result = self.evaluate(other).map(|_| ());
                self.scope = caller_scope;
                result
            }
        }
    }
}

/// Shallow argument rendering for call-stack frame names: literals appear
/// as written, identifiers by name, anything else as `...`
fn display_call(name: &str, args: &[Node]) -> String {
    if args.is_empty() {
        return format!("{name}()");
    }
    let rendered: Vec<String> = args
        .iter()
        .map(|arg| match arg {
            Node::NumberLiteral(value, _) => Value::Number(*value).to_string(),
            Node::StringLiteral(value, _) => format!("'{value}'"),
            Node::BoolLiteral(value, _) => value.to_string(),
            Node::Identifier(name, _) => name.clone(),
            _ => "...".to_string(),
        })
        .collect();
    format!("{name}({})", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::SourceLocation;

    #[test]
    fn test_display_call_renders_shallow_args() {
        let loc = SourceLocation::new(1, 1);
        let args = vec![
            Node::StringLiteral("Alice".to_string(), loc),
            Node::NumberLiteral(3.0, loc),
            Node::Identifier("count".to_string(), loc),
        ];
        assert_eq!(display_call("greet", &args), "greet('Alice', 3, count)");
        assert_eq!(display_call("tick", &[]), "tick()");
    }
}
