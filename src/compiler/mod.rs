//! Code generation module for the compiler.
//!
//! This module lowers the AST into LLVM IR. It handles:
//!
//! - The generation context (module, builder, symbol table, passes)
//! - Lowering of expressions to values
//! - Lowering of statements with explicit block termination tracking
//! - Prototypes, extern declarations and function definitions
//! - JIT evaluation of top-level expressions

pub mod compiler;
pub mod expr;
pub mod function;
pub mod stmt;

#[cfg(test)]
mod tests;
