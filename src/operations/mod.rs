//! Operator table.
//!
//! Maps operator spellings to their precedence and lowering behaviour.
//! Binary/comparison operators and assignment operators live in two
//! disjoint tables that are queried independently.

pub mod operations;

#[cfg(test)]
mod tests;
