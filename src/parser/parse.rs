//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: Parsing statements (declarations, if, for, return, blocks)
//! - `expressions`: Parsing expressions with precedence climbing
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use std::fmt;

/// Parser error type
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the JavaScript subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self { tokens, position: 0 })
    }

    /// Parse the entire program (top-level statements)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            let stmt = self.parse_statement()?;
            program.body.push(stmt);
        }

        Ok(program)
    }

    /// Parse a standalone expression source (used for template placeholders)
    pub(crate) fn parse_expression_source(source: &str) -> Result<Node, ParseError> {
        let mut parser = Parser::new(source)?;
        let expr = parser.parse_expression()?;
        if !parser.is_at_end() {
            return Err(ParseError {
                message: format!("Unexpected {} after expression", parser.peek()),
                location: parser.current_location(),
            });
        }
        Ok(expr)
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if std::mem::discriminant(&self.peek_token()) == std::mem::discriminant(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(&self.peek_token()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_token(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position - 1]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError {
                message: format!("Expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }

    /// Consume a trailing semicolon if present (semicolons are optional)
    pub(crate) fn consume_semicolon(&mut self) {
        self.match_token(&Token::Semicolon(self.current_location()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        let mut parser = Parser::new(source).expect("lexing failed");
        parser.parse_program().expect("parsing failed")
    }

    #[test]
    fn test_parse_var_decl() {
        let program = parse("let x = 1 + 2 * 3;");
        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Node::VarDecl { name, init, .. } => {
                assert_eq!(name, "x");
                assert!(init.is_some());
            }
            other => panic!("Expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_decl() {
        let program = parse("function greet(name) { console.log(name); }");
        match &program.body[0] {
            Node::FunctionDecl {
                name,
                params,
                body,
                is_async,
                ..
            } => {
                assert_eq!(name, "greet");
                assert_eq!(params, &vec!["name".to_string()]);
                assert_eq!(body.len(), 1);
                assert!(!is_async);
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_async_function_with_await() {
        let program = parse(
            r#"
            async function fetchData() {
              const data = await Promise.resolve('Data');
              console.log(data);
            }
            "#,
        );
        match &program.body[0] {
            Node::FunctionDecl { is_async, body, .. } => {
                assert!(is_async);
                match &body[0] {
                    Node::VarDecl { init: Some(init), .. } => {
                        assert!(matches!(**init, Node::Await { .. }));
                    }
                    other => panic!("Expected awaited declaration, got {:?}", other),
                }
            }
            other => panic!("Expected async function, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_arrow_callback() {
        let program = parse("setTimeout(() => { console.log('hi'); }, 1000);");
        match &program.body[0] {
            Node::ExpressionStatement { expr, .. } => match &**expr {
                Node::Call { args, .. } => {
                    assert_eq!(args.len(), 2);
                    assert!(matches!(args[0], Node::ArrowFunction { .. }));
                    assert!(matches!(args[1], Node::NumberLiteral(n, _) if n == 1000.0));
                }
                other => panic!("Expected call, got {:?}", other),
            },
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_expression_arrow_body() {
        let program = parse("const f = x => x + 1;");
        match &program.body[0] {
            Node::VarDecl { init: Some(init), .. } => match &**init {
                Node::ArrowFunction { params, body, .. } => {
                    assert_eq!(params, &vec!["x".to_string()]);
                    assert!(matches!(body, ArrowBody::Expr(_)));
                }
                other => panic!("Expected arrow function, got {:?}", other),
            },
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_promise_chain() {
        let program = parse("Promise.resolve().then(() => {}).catch(() => {});");
        match &program.body[0] {
            Node::ExpressionStatement { expr, .. } => match &**expr {
                Node::Call { callee, .. } => match &**callee {
                    Node::Member { property, .. } => assert_eq!(property, "catch"),
                    other => panic!("Expected member callee, got {:?}", other),
                },
                other => panic!("Expected call, got {:?}", other),
            },
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_for_loop() {
        let program = parse("for (let i = 0; i < 3; i++) { console.log(i); }");
        match &program.body[0] {
            Node::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                assert!(init.is_some());
                assert!(condition.is_some());
                assert!(matches!(update.as_deref(), Some(Node::Update { .. })));
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_template_literal() {
        let program = parse("console.log(`Count: ${count}`);");
        match &program.body[0] {
            Node::ExpressionStatement { expr, .. } => match &**expr {
                Node::Call { args, .. } => match &args[0] {
                    Node::TemplateLiteral { quasis, exprs, .. } => {
                        assert_eq!(quasis.len(), 2);
                        assert_eq!(exprs.len(), 1);
                        assert!(matches!(exprs[0], Node::Identifier(ref n, _) if n == "count"));
                    }
                    other => panic!("Expected template literal, got {:?}", other),
                },
                other => panic!("Expected call, got {:?}", other),
            },
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_reports_location() {
        let mut parser = Parser::new("let = 5;").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert_eq!(err.location.line, 1);
    }
}
