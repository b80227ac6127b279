//! Statement parsing implementation
//!
//! Handles declarations (`let`/`const`/`var`, `function`), control flow
//! (`if`/`else`, `for`, `return`), standalone blocks, and expression
//! statements. Semicolons are consumed when present but never required,
//! which keeps pasted snippets from failing on style differences.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a single statement
    pub(crate) fn parse_statement(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::Let(_) | Token::Const(_) | Token::Var(_) => self.parse_var_decl(),
            Token::Function(_) => self.parse_function_decl(false),
            Token::Async(_) if matches!(self.peek_ahead(1), Some(Token::Function(_))) => {
                self.advance(); // consume 'async'
                self.parse_function_decl(true)
            }
            Token::If(_) => self.parse_if_statement(),
            Token::For(_) => self.parse_for_statement(),
            Token::Return(_) => self.parse_return_statement(),
            Token::LBrace(_) => {
                let body = self.parse_block_body()?;
                Ok(Node::Block { body, location: loc })
            }
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon();
                Ok(Node::ExpressionStatement {
                    expr: Box::new(expr),
                    location: loc,
                })
            }
        }
    }

    /// Parse `{ stmt* }` and return the inner statement list
    pub(crate) fn parse_block_body(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect_lbrace("to open block")?;
        let mut body = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }
        self.expect_token(
            &Token::RBrace(self.current_location()),
            "Expected '}' to close block",
        )?;
        Ok(body)
    }

    /// Parse the body of an `if`/`for` branch: a braced block or one statement
    fn parse_branch(&mut self) -> Result<Vec<Node>, ParseError> {
        if self.check(&Token::LBrace(self.current_location())) {
            self.parse_block_body()
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }

    /// Parse `let`/`const`/`var` with a single declarator
    fn parse_var_decl(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume the declaration keyword
        let name = self.expect_identifier()?;

        let init = if self.match_token(&Token::Eq(self.current_location())) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        self.consume_semicolon();
        Ok(Node::VarDecl {
            name,
            init,
            location: loc,
        })
    }

    /// Parse `function name(params) { body }`
    fn parse_function_decl(&mut self, is_async: bool) -> Result<Node, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'function'
        let name = self.expect_identifier()?;

        self.expect_lparen("after function name")?;
        let params = self.parse_param_list()?;
        let body = self.parse_block_body()?;

        Ok(Node::FunctionDecl {
            name,
            params,
            body,
            is_async,
            location: loc,
        })
    }

    /// Parse a comma-separated identifier list up to and including ')'
    pub(crate) fn parse_param_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut params = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                params.push(self.expect_identifier()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }
        self.expect_rparen("after parameter list")?;
        Ok(params)
    }

    fn parse_if_statement(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'if'
        self.expect_lparen("after 'if'")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_branch()?;
        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            Some(self.parse_branch()?)
        } else {
            None
        };

        Ok(Node::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    fn parse_for_statement(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'for'
        self.expect_lparen("after 'for'")?;

        let init = if self.check(&Token::Semicolon(self.current_location())) {
            self.advance();
            None
        } else {
            // parse_var_decl / expression statement both consume the ';'
            let stmt = match self.peek_token() {
                Token::Let(_) | Token::Const(_) | Token::Var(_) => self.parse_var_decl()?,
                _ => {
                    let expr = self.parse_expression()?;
                    self.expect_token(
                        &Token::Semicolon(self.current_location()),
                        "Expected ';' after for-loop initializer",
                    )?;
                    Node::ExpressionStatement {
                        expr: Box::new(expr),
                        location: loc,
                    }
                }
            };
            Some(Box::new(stmt))
        };

        let condition = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            "Expected ';' after for-loop condition",
        )?;

        let update = if self.check(&Token::RParen(self.current_location())) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect_rparen("after for-loop clauses")?;

        let body = self.parse_branch()?;

        Ok(Node::For {
            init,
            condition,
            update,
            body,
            location: loc,
        })
    }

    fn parse_return_statement(&mut self) -> Result<Node, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'return'

        let expr = if self.check(&Token::Semicolon(self.current_location()))
            || self.check(&Token::RBrace(self.current_location()))
            || self.is_at_end()
        {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        self.consume_semicolon();
        Ok(Node::Return {
            expr,
            location: loc,
        })
    }
}
