//! Expression parsing implementation
//!
//! This module handles parsing of expressions using precedence climbing for
//! binary operators and recursive descent for other expression forms.
//!
//! # Supported Expressions
//!
//! - Literals: numbers, strings, booleans, template literals, array literals
//! - Identifiers
//! - Binary operators: arithmetic, comparison (loose and strict), logical
//! - Assignment (plain and compound) to identifiers
//! - Update: `++`/`--`, prefix and postfix
//! - Postfix: member access `.name`, calls `(...)`
//! - Arrow functions (block-bodied and expression-bodied), `async` variants
//! - `await`
//!
//! Arrow functions are detected by token lookahead (identifier or balanced
//! parenthesis group followed by `=>`) rather than backtracking, so parse
//! errors keep accurate locations.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Node, ParseError> {
        self.parse_assignment()
    }

    /// Parse arrow functions, assignment, or fall through to binary operators
    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        if self.is_arrow_ahead() {
            return self.parse_arrow_function();
        }

        let expr = self.parse_logical_or()?;

        // Assignment targets are plain identifiers in this subset
        let loc = self.current_location();
        let compound = if self.match_token(&Token::Eq(loc)) {
            Some(None)
        } else if self.match_token(&Token::PlusEq(loc)) {
            Some(Some(BinOp::Add))
        } else if self.match_token(&Token::MinusEq(loc)) {
            Some(Some(BinOp::Sub))
        } else if self.match_token(&Token::StarEq(loc)) {
            Some(Some(BinOp::Mul))
        } else if self.match_token(&Token::SlashEq(loc)) {
            Some(Some(BinOp::Div))
        } else {
            None
        };

        if let Some(op) = compound {
            let name = match expr {
                Node::Identifier(name, _) => name,
                other => {
                    return Err(ParseError {
                        message: "Invalid assignment target".to_string(),
                        location: other.location(),
                    });
                }
            };
            let value = Box::new(self.parse_assignment()?);
            return Ok(Node::Assignment {
                name,
                op,
                value,
                location: loc,
            });
        }

        Ok(expr)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.match_token(&Token::OrOr(self.current_location())) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_logical_and()?);
            left = Node::Binary {
                op: BinOp::Or,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&Token::AndAnd(self.current_location())) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_equality()?);
            left = Node::Binary {
                op: BinOp::And,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse equality (== != === !==)
    fn parse_equality(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::EqEqEq(loc)) {
                BinOp::StrictEq
            } else if self.match_token(&Token::NotEqEq(loc)) {
                BinOp::StrictNe
            } else if self.match_token(&Token::EqEq(loc)) {
                BinOp::Eq
            } else if self.match_token(&Token::NotEq(loc)) {
                BinOp::Ne
            } else {
                break;
            };

            let right = Box::new(self.parse_relational()?);
            left = Node::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Le(loc)) {
                BinOp::Le
            } else if self.match_token(&Token::Ge(loc)) {
                BinOp::Ge
            } else if self.match_token(&Token::Lt(loc)) {
                BinOp::Lt
            } else if self.match_token(&Token::Gt(loc)) {
                BinOp::Gt
            } else {
                break;
            };

            let right = Box::new(self.parse_additive()?);
            left = Node::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Plus(loc)) {
                BinOp::Add
            } else if self.match_token(&Token::Minus(loc)) {
                BinOp::Sub
            } else {
                break;
            };

            let right = Box::new(self.parse_multiplicative()?);
            left = Node::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Star(loc)) {
                BinOp::Mul
            } else if self.match_token(&Token::Slash(loc)) {
                BinOp::Div
            } else if self.match_token(&Token::Percent(loc)) {
                BinOp::Mod
            } else {
                break;
            };

            let right = Box::new(self.parse_unary()?);
            left = Node::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse unary prefix forms: `await`, `-x`, `!x`, `++x`, `--x`
    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::Await(loc)) {
            let expr = Box::new(self.parse_unary()?);
            return Ok(Node::Await {
                expr,
                location: loc,
            });
        }

        if self.match_token(&Token::Minus(loc)) {
            // Negation encoded as `0 - x`; the subset has no dedicated unary node
            let operand = Box::new(self.parse_unary()?);
            return Ok(Node::Binary {
                op: BinOp::Sub,
                left: Box::new(Node::NumberLiteral(0.0, loc)),
                right: operand,
                location: loc,
            });
        }

        if self.match_token(&Token::Bang(loc)) {
            // `!x` encoded as `x == false`
            let operand = Box::new(self.parse_unary()?);
            return Ok(Node::Binary {
                op: BinOp::Eq,
                left: operand,
                right: Box::new(Node::BoolLiteral(false, loc)),
                location: loc,
            });
        }

        let prefix_op = if self.match_token(&Token::PlusPlus(loc)) {
            Some(UpdateOp::Inc)
        } else if self.match_token(&Token::MinusMinus(loc)) {
            Some(UpdateOp::Dec)
        } else {
            None
        };
        if let Some(op) = prefix_op {
            let name = self.expect_identifier()?;
            return Ok(Node::Update {
                op,
                prefix: true,
                name,
                location: loc,
            });
        }

        self.parse_postfix()
    }

    /// Parse postfix forms: member access, calls, `x++`, `x--`
    fn parse_postfix(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();

            if self.match_token(&Token::Dot(loc)) {
                let property = self.expect_identifier()?;
                expr = Node::Member {
                    object: Box::new(expr),
                    property,
                    location: loc,
                };
            } else if self.match_token(&Token::LParen(loc)) {
                let args = self.parse_argument_list()?;
                let call_loc = expr_call_location(&expr, loc);
                expr = Node::Call {
                    callee: Box::new(expr),
                    args,
                    location: call_loc,
                };
            } else if self.check(&Token::PlusPlus(loc)) || self.check(&Token::MinusMinus(loc)) {
                let name = match &expr {
                    Node::Identifier(name, _) => name.clone(),
                    other => {
                        return Err(ParseError {
                            message: "Invalid update target".to_string(),
                            location: other.location(),
                        });
                    }
                };
                let op = if self.match_token(&Token::PlusPlus(loc)) {
                    UpdateOp::Inc
                } else {
                    self.advance();
                    UpdateOp::Dec
                };
                expr = Node::Update {
                    op,
                    prefix: false,
                    name,
                    location: loc,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse comma-separated call arguments up to and including ')'
    fn parse_argument_list(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut args = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }
        self.expect_rparen("after call arguments")?;
        Ok(args)
    }

    /// Parse primary expressions: literals, identifiers, groups, arrays
    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::Number(n, _) => {
                self.advance();
                Ok(Node::NumberLiteral(n, loc))
            }
            Token::Str(s, _) => {
                self.advance();
                Ok(Node::StringLiteral(s, loc))
            }
            Token::Template { quasis, exprs, .. } => {
                self.advance();
                let mut parsed = Vec::with_capacity(exprs.len());
                for raw in &exprs {
                    parsed.push(Self::parse_expression_source(raw).map_err(|e| ParseError {
                        message: format!("In template placeholder: {}", e.message),
                        location: loc,
                    })?);
                }
                Ok(Node::TemplateLiteral {
                    quasis,
                    exprs: parsed,
                    location: loc,
                })
            }
            Token::True(_) => {
                self.advance();
                Ok(Node::BoolLiteral(true, loc))
            }
            Token::False(_) => {
                self.advance();
                Ok(Node::BoolLiteral(false, loc))
            }
            Token::Ident(name, _) => {
                self.advance();
                Ok(Node::Identifier(name, loc))
            }
            Token::Function(_) => {
                self.advance();
                self.parse_function_expression(false, loc)
            }
            Token::Async(_) if matches!(self.peek_ahead(1), Some(Token::Function(_))) => {
                self.advance();
                self.advance();
                self.parse_function_expression(true, loc)
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after parenthesized expression")?;
                Ok(expr)
            }
            Token::LBracket(_) => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(&Token::RBracket(self.current_location())) {
                    loop {
                        elements.push(self.parse_expression()?);
                        if !self.match_token(&Token::Comma(self.current_location())) {
                            break;
                        }
                    }
                }
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after array elements",
                )?;
                Ok(Node::ArrayLiteral {
                    elements,
                    location: loc,
                })
            }
            other => Err(ParseError {
                message: format!("Unexpected {}", other),
                location: loc,
            }),
        }
    }

    /// Parse a `function` expression after its keyword(s). An optional name
    /// is accepted and discarded; the value behaves like a block-bodied
    /// arrow function.
    fn parse_function_expression(
        &mut self,
        is_async: bool,
        loc: SourceLocation,
    ) -> Result<Node, ParseError> {
        if let Token::Ident(_, _) = self.peek_token() {
            self.advance();
        }
        self.expect_lparen("after 'function'")?;
        let params = self.parse_param_list()?;
        let body = ArrowBody::Block(self.parse_block_body()?);
        Ok(Node::ArrowFunction {
            params,
            body,
            is_async,
            location: loc,
        })
    }

    // ===== Arrow function detection and parsing =====

    /// Lookahead test: does an arrow function start at the current position?
    fn is_arrow_ahead(&self) -> bool {
        let mut offset = 0;
        if matches!(self.peek(), Token::Async(_)) {
            offset = 1;
        }

        match self.peek_ahead(offset) {
            Some(Token::Ident(_, _)) => {
                matches!(self.peek_ahead(offset + 1), Some(Token::FatArrow(_)))
            }
            Some(Token::LParen(_)) => {
                // Scan to the matching ')' and check for '=>'
                let mut depth = 0usize;
                let mut i = offset;
                loop {
                    match self.peek_ahead(i) {
                        Some(Token::LParen(_)) => depth += 1,
                        Some(Token::RParen(_)) => {
                            depth -= 1;
                            if depth == 0 {
                                return matches!(
                                    self.peek_ahead(i + 1),
                                    Some(Token::FatArrow(_))
                                );
                            }
                        }
                        Some(Token::Eof(_)) | None => return false,
                        _ => {}
                    }
                    i += 1;
                }
            }
            _ => false,
        }
    }

    /// Parse an arrow function; caller has verified the `=>` lookahead
    fn parse_arrow_function(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();
        let is_async = self.match_token(&Token::Async(loc));

        let params = if self.match_token(&Token::LParen(self.current_location())) {
            self.parse_param_list()?
        } else {
            vec![self.expect_identifier()?]
        };

        self.expect_token(
            &Token::FatArrow(self.current_location()),
            "Expected '=>' in arrow function",
        )?;

        let body = if self.check(&Token::LBrace(self.current_location())) {
            ArrowBody::Block(self.parse_block_body()?)
        } else {
            ArrowBody::Expr(Box::new(self.parse_assignment()?))
        };

        Ok(Node::ArrowFunction {
            params,
            body,
            is_async,
            location: loc,
        })
    }
}

/// Calls report the callee's location so highlights land on the call line
fn expr_call_location(callee: &Node, fallback: SourceLocation) -> SourceLocation {
    match callee {
        Node::Call { .. } => fallback,
        other => other.location(),
    }
}
