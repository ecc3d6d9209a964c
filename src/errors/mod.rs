//! Error types and error handling for the compiler.
//!
//! Every parsing and lowering step reports failure through the single
//! `Error` type defined here. Each error carries:
//!
//! - The specific failure (`ErrorImpl`)
//! - The source position it was detected at
//! - Its category: syntax, semantic or backend (`ErrorKind`)
//!
//! Errors never abort the whole compilation; the driver reports them and
//! continues with the next top-level construct.

pub mod errors;
