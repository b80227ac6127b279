//! Lexer, parser, and AST for the JavaScript subset
//!
//! This module converts source text into the [`ast::Program`] consumed by the
//! step generator:
//! - [`lexer`]: tokenizes the source (template literals lexed whole)
//! - [`ast`]: node definitions with per-node source locations
//! - [`parse`]: the [`parse::Parser`] struct and entry point
//! - [`statements`] / [`expressions`]: recursive descent split across
//!   `impl Parser` blocks
//!
//! The rest of the crate treats parsing as opaque: the generator maps any
//! [`parse::ParseError`] to a generic syntax error so parser internals are
//! never echoed to end users.

pub mod ast;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod statements;
