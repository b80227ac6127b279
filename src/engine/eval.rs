//! Statement and expression evaluation
//!
//! The walking half of [`StepGenerator`](crate::engine::generator::StepGenerator):
//! statements run under a [`Flow`] discipline so that `return` and `await`
//! both unwind cleanly. An `await` does not block — it packages the remaining
//! statements of every enclosing block into the pending continuation and
//! propagates [`Flow::Suspend`] upward, so the rest of the function becomes a
//! microtask.

use crate::engine::errors::GenerateError;
use crate::engine::generator::StepGenerator;
use crate::engine::limits::MAX_LOOP_ITERATIONS;
use crate::engine::step::MicroStep;
use crate::engine::value::{FunctionBody, FunctionValue, Value};
use crate::parser::ast::{ArrowBody, BinOp, Node, UpdateOp};
use std::rc::Rc;

/// How a statement finished
#[derive(Debug, Clone)]
pub(crate) enum Flow {
    /// Fell through to the next statement
    Normal,
    /// Hit `return`; carries the returned value
    Return(Value),
    /// Hit `await`; the remaining work is already queued as a microtask
    Suspend,
}

impl StepGenerator {
    /// Run a statement list. On `Suspend`, the untouched trailing statements
    /// are appended to the just-created continuation before unwinding, so
    /// each enclosing block contributes its own remainder.
    pub(crate) fn run_block(&mut self, stmts: &[Node]) -> Result<Flow, GenerateError> {
        for (index, stmt) in stmts.iter().enumerate() {
            match self.run_statement(stmt)? {
                Flow::Normal => {}
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Suspend => {
                    self.extend_continuation(&stmts[index + 1..]);
                    return Ok(Flow::Suspend);
                }
            }
        }
        Ok(Flow::Normal)
    }

    pub(crate) fn run_statement(&mut self, stmt: &Node) -> Result<Flow, GenerateError> {
        self.check_step_budget()?;
        match stmt {
            Node::Block { body, .. } => self.run_block(body),

            Node::FunctionDecl { .. } => {
                self.register_function(stmt);
                Ok(Flow::Normal)
            }

            Node::VarDecl {
                name,
                init,
                location,
            } => {
                self.push_step(MicroStep::HighlightLine {
                    line: location.line,
                });
                match init {
                    Some(node) => {
                        if let Node::Await { expr, .. } = node.as_ref() {
                            // Bind the awaited value first, then suspend: the
                            // continuation sees `name` already in scope
                            let value = self.evaluate(expr)?;
                            self.scope.set(name, value);
                            self.begin_continuation();
                            return Ok(Flow::Suspend);
                        }
                        let value = self.evaluate(node)?;
                        self.scope.set(name, value);
                    }
                    None => self.scope.set(name, Value::Undefined),
                }
                Ok(Flow::Normal)
            }

            Node::ExpressionStatement { expr, location } => {
                self.push_step(MicroStep::HighlightLine {
                    line: location.line,
                });
                if let Node::Await { expr: inner, .. } = expr.as_ref() {
                    self.evaluate(inner)?;
                    self.begin_continuation();
                    return Ok(Flow::Suspend);
                }
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Node::If {
                condition,
                then_branch,
                else_branch,
                location,
            } => {
                self.push_step(MicroStep::HighlightLine {
                    line: location.line,
                });
                let test = self.evaluate(condition)?;
                if test.is_truthy() {
                    self.run_block(then_branch)
                } else if let Some(branch) = else_branch {
                    self.run_block(branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Node::For { .. } => self.run_for(stmt),

            Node::Return { expr, location } => {
                self.push_step(MicroStep::HighlightLine {
                    line: location.line,
                });
                let result = match expr {
                    Some(node) => self.evaluate(node)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(result))
            }

            // Bare expression reached as a statement (defensive; the parser
            // wraps these in ExpressionStatement)
            other => {
                self.evaluate(other)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Classic three-part `for` loop with a hard iteration cap. Suspension
    /// mid-body repackages the loop itself: the continuation gets the update
    /// expression followed by a clone of the loop with its init stripped, so
    /// iteration resumes where it left off.
    fn run_for(&mut self, stmt: &Node) -> Result<Flow, GenerateError> {
        let Node::For {
            init,
            condition,
            update,
            body,
            location,
        } = stmt
        else {
            return Ok(Flow::Normal);
        };

        if let Some(node) = init {
            self.run_statement(node)?;
        }

        let mut iterations = 0;
        loop {
            if iterations >= MAX_LOOP_ITERATIONS {
                self.push_step(MicroStep::ConsoleOutput {
                    message: format!(
                        "Loop exceeded maximum iterations ({MAX_LOOP_ITERATIONS})"
                    ),
                });
                return Ok(Flow::Normal);
            }
            iterations += 1;

            if let Some(node) = condition {
                self.push_step(MicroStep::HighlightLine {
                    line: location.line,
                });
                if !self.evaluate(node)?.is_truthy() {
                    return Ok(Flow::Normal);
                }
            }

            match self.run_block(body)? {
                Flow::Normal => {}
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Suspend => {
                    // Resume point: run the update, then re-enter the loop
                    let mut remainder = Vec::new();
                    if let Some(node) = update {
                        remainder.push(Node::ExpressionStatement {
                            expr: node.clone(),
                            location: *location,
                        });
                    }
                    remainder.push(Node::For {
                        init: None,
                        condition: condition.clone(),
                        update: update.clone(),
                        body: body.clone(),
                        location: *location,
                    });
                    self.extend_continuation(&remainder);
                    return Ok(Flow::Suspend);
                }
            }

            if let Some(node) = update {
                self.evaluate(node)?;
            }
        }
    }

    // ===== Expressions =====

    pub(crate) fn evaluate(&mut self, node: &Node) -> Result<Value, GenerateError> {
        match node {
            Node::NumberLiteral(value, _) => Ok(Value::Number(*value)),
            Node::StringLiteral(value, _) => Ok(Value::Str(value.clone())),
            Node::BoolLiteral(value, _) => Ok(Value::Bool(*value)),

            Node::TemplateLiteral { quasis, exprs, .. } => {
                let mut out = String::new();
                for (index, quasi) in quasis.iter().enumerate() {
                    out.push_str(quasi);
                    if let Some(expr) = exprs.get(index) {
                        out.push_str(&self.evaluate(expr)?.to_string());
                    }
                }
                Ok(Value::Str(out))
            }

            // Arrays carry no value of their own here; elements still run
            // for their side effects (Promise.all arguments and the like)
            Node::ArrayLiteral { elements, .. } => {
                for element in elements {
                    self.evaluate(element)?;
                }
                Ok(Value::Undefined)
            }

            Node::Identifier(name, _) => {
                if let Some(func) = self.functions.get(name) {
                    return Ok(Value::Closure(Rc::clone(func)));
                }
                Ok(self.scope.get(name))
            }

            Node::Binary {
                op, left, right, ..
            } => self.eval_binary(*op, left, right),

            Node::Assignment {
                name, op, value, ..
            } => {
                let rhs = self.evaluate(value)?;
                let result = match op {
                    Some(binop) => combine(*binop, &self.scope.get(name), &rhs),
                    None => rhs,
                };
                self.scope.set(name, result.clone());
                Ok(result)
            }

            Node::Update {
                op, prefix, name, ..
            } => {
                let old = self.scope.get(name).as_number();
                let new = match op {
                    UpdateOp::Inc => old + 1.0,
                    UpdateOp::Dec => old - 1.0,
                };
                self.scope.set(name, Value::Number(new));
                Ok(Value::Number(if *prefix { new } else { old }))
            }

            Node::Call { .. } => self.handle_call(node),

            Node::ArrowFunction {
                params,
                body,
                is_async,
                ..
            } => {
                let func_body = match body {
                    ArrowBody::Block(stmts) => FunctionBody::Block(stmts.clone()),
                    ArrowBody::Expr(expr) => FunctionBody::Expr(expr.clone()),
                };
                Ok(Value::Closure(Rc::new(FunctionValue {
                    name: String::new(),
                    params: params.clone(),
                    body: func_body,
                    is_async: *is_async,
                    scope: self.scope.clone(),
                })))
            }

            // Nested `await` acts as a pass-through; suspension only happens
            // at statement level
            Node::Await { expr, .. } => self.evaluate(expr),

            _ => Ok(Value::Undefined),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        left: &Node,
        right: &Node,
    ) -> Result<Value, GenerateError> {
        // Short-circuit forms return the deciding operand itself
        match op {
            BinOp::And => {
                let lhs = self.evaluate(left)?;
                if !lhs.is_truthy() {
                    return Ok(lhs);
                }
                return self.evaluate(right);
            }
            BinOp::Or => {
                let lhs = self.evaluate(left)?;
                if lhs.is_truthy() {
                    return Ok(lhs);
                }
                return self.evaluate(right);
            }
            _ => {}
        }

        let lhs = self.evaluate(left)?;
        let rhs = self.evaluate(right)?;
        Ok(combine(op, &lhs, &rhs))
    }
}

/// Apply a binary operator to two already-evaluated values
pub(crate) fn combine(op: BinOp, lhs: &Value, rhs: &Value) -> Value {
    match op {
        BinOp::Add => {
            // String on either side turns `+` into concatenation
            if matches!(lhs, Value::Str(_)) || matches!(rhs, Value::Str(_)) {
                Value::Str(format!("{lhs}{rhs}"))
            } else {
                Value::Number(lhs.as_number() + rhs.as_number())
            }
        }
        BinOp::Sub => Value::Number(lhs.as_number() - rhs.as_number()),
        BinOp::Mul => Value::Number(lhs.as_number() * rhs.as_number()),
        BinOp::Div => Value::Number(lhs.as_number() / rhs.as_number()),
        BinOp::Mod => Value::Number(lhs.as_number() % rhs.as_number()),
        BinOp::Eq => Value::Bool(lhs.loose_eq(rhs)),
        BinOp::Ne => Value::Bool(!lhs.loose_eq(rhs)),
        BinOp::StrictEq => Value::Bool(lhs.strict_eq(rhs)),
        BinOp::StrictNe => Value::Bool(!lhs.strict_eq(rhs)),
        BinOp::Lt => Value::Bool(lhs.as_number() < rhs.as_number()),
        BinOp::Le => Value::Bool(lhs.as_number() <= rhs.as_number()),
        BinOp::Gt => Value::Bool(lhs.as_number() > rhs.as_number()),
        BinOp::Ge => Value::Bool(lhs.as_number() >= rhs.as_number()),
        // And/Or handled before evaluation; unreachable here but total
        BinOp::And | BinOp::Or => Value::Bool(lhs.is_truthy() && rhs.is_truthy()),
    }
}
