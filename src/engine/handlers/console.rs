//! `console.log`: a stack blip and a console-output step
//!
//! Arguments are rendered with a deliberately shallow strategy: literals and
//! in-scope identifiers resolve to their values, simple binaries and
//! templates are computed, and anything deeper prints a placeholder rather
//! than dragging arbitrary evaluation into the log line.

use crate::engine::errors::GenerateError;
use crate::engine::generator::StepGenerator;
use crate::engine::step::MicroStep;
use crate::engine::value::Value;
use crate::parser::ast::Node;

impl StepGenerator {
    pub(crate) fn handle_console_log(&mut self, args: &[Node]) -> Result<Value, GenerateError> {
        let mut parts = Vec::with_capacity(args.len());
        for arg in args {
            parts.push(self.stringify_log_arg(arg)?);
        }
        let message = parts.join(" ");

        self.push_step(MicroStep::StackPush {
            name: format!("console.log({message})"),
        });
        self.push_step(MicroStep::ConsoleOutput {
            message: message.clone(),
        });
        self.push_step(MicroStep::StackPop);
        Ok(Value::Undefined)
    }

    fn stringify_log_arg(&mut self, arg: &Node) -> Result<String, GenerateError> {
        Ok(match arg {
            Node::NumberLiteral(value, _) => Value::Number(*value).to_string(),
            Node::StringLiteral(value, _) => value.clone(),
            Node::BoolLiteral(value, _) => value.to_string(),

            // An identifier not bound anywhere prints its own name
            Node::Identifier(name, _) => {
                if self.scope.has(name) || self.functions.contains_key(name) {
                    self.evaluate(arg)?.to_string()
                } else {
                    name.clone()
                }
            }

            Node::Binary { .. } => self.evaluate(arg)?.to_string(),

            Node::TemplateLiteral { quasis, exprs, .. } => {
                let mut out = String::new();
                for (index, quasi) in quasis.iter().enumerate() {
                    out.push_str(quasi);
                    if let Some(expr) = exprs.get(index) {
                        match expr {
                            Node::Identifier(_, _)
                            | Node::NumberLiteral(_, _)
                            | Node::StringLiteral(_, _)
                            | Node::BoolLiteral(_, _)
                            | Node::Binary { .. }
                            | Node::Update { .. } => {
                                out.push_str(&self.stringify_log_arg(expr)?);
                            }
                            _ => out.push_str("[expr]"),
                        }
                    }
                }
                out
            }

            Node::Update { .. } => self.evaluate(arg)?.to_string(),

            _ => "[complex expression]".to_string(),
        })
    }
}
