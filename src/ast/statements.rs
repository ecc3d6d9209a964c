use crate::{operations::operations::AssignOperation, Span};

use super::ast::{Block, Expr, Stmt};

/// Expression Statement
/// An expression evaluated for its effect; the value is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

/// Assignment Statement
/// `identifier <op> value` where `<op>` comes from the assignment table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    pub identifier: String,
    pub operation: &'static AssignOperation,
    pub value: Expr,
    pub span: Span,
}

/// One `if`/`elif` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBranch {
    pub condition: Expr,
    pub body: Block,
}

/// Conditional Statement
/// An `if` arm, any number of `elif` arms and an optional `else` body.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalStmt {
    pub branches: Vec<ConditionalBranch>,
    pub else_body: Option<Block>,
    pub span: Span,
}

/// While Statement
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

/// For Statement
/// The initialization and update clauses are full statements.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub initialization: Box<Stmt>,
    pub condition: Expr,
    pub update: Box<Stmt>,
    pub body: Block,
    pub span: Span,
}

/// Variable Declaration Statement
/// Without an assigned value the slot starts at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub assigned_value: Option<Expr>,
    pub span: Span,
}

/// Return Statement
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}
