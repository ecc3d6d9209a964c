use crate::{operations::operations::Operation, Span};

use super::ast::Expr;

// LITERALS

/// Number Expression
/// A numeric literal. All values are 64-bit floats.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberExpr {
    pub value: f64,
    pub span: Span,
}

/// Variable Expression
/// A reference to a named storage slot.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpr {
    pub name: String,
    pub span: Span,
}

// COMPLEX

/// Binary Expression
/// The operation is resolved from the operator table while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operation: &'static Operation,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Call Expression
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}
