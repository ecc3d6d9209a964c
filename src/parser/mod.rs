//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. Expressions are parsed by precedence
//! climbing over the operator table, statements by recursive descent.
//!
//! - Statement parsing (declarations, assignments, control flow)
//! - Expression parsing (binary ops, function calls, literals)
//! - Top-level parsing with resynchronisation after syntax errors

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
