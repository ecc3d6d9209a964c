use std::fmt::{self, Display};

use crate::Span;

use super::{
    expressions::{BinaryExpr, CallExpr, NumberExpr, VariableExpr},
    statements::{
        AssignmentStmt, ConditionalStmt, ExpressionStmt, ForStmt, ReturnStmt, VarDeclStmt,
        WhileStmt,
    },
};

/// Expression
///
/// Every expression lowers to a value and never terminates a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(NumberExpr),
    Variable(VariableExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Number(expr) => &expr.span,
            Expr::Variable(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
        }
    }
}

/// Renders the expression as a fully parenthesised prefix form, e.g. `(+ 1 (* 2 3))`.
impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(expr) => write!(f, "{}", expr.value),
            Expr::Variable(expr) => write!(f, "{}", expr.name),
            Expr::Binary(expr) => write!(
                f,
                "({} {} {})",
                expr.operation.symbol, expr.left, expr.right
            ),
            Expr::Call(expr) => {
                write!(f, "{}(", expr.callee)?;
                for (index, argument) in expr.arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Statement
///
/// Anything that may appear in a block body. Expressions are statements too.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(ExpressionStmt),
    Assignment(AssignmentStmt),
    Conditional(ConditionalStmt),
    While(WhileStmt),
    For(ForStmt),
    Declaration(VarDeclStmt),
    Return(ReturnStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::Assignment(stmt) => &stmt.span,
            Stmt::Conditional(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::Declaration(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
        }
    }
}

/// Ordered statements of one `{ ... }` body.
pub type Block = Vec<Stmt>;

struct BlockDisplay<'a>(&'a [Stmt]);

impl Display for BlockDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, stmt) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", stmt)?;
        }
        write!(f, "}}")
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expression(stmt) => write!(f, "{}", stmt.expression),
            Stmt::Assignment(stmt) => write!(
                f,
                "({} {} {})",
                stmt.operation.symbol, stmt.identifier, stmt.value
            ),
            Stmt::Conditional(stmt) => {
                write!(f, "(if")?;
                for branch in stmt.branches.iter() {
                    write!(f, " {} {}", branch.condition, BlockDisplay(&branch.body))?;
                }
                if let Some(else_body) = &stmt.else_body {
                    write!(f, " else {}", BlockDisplay(else_body))?;
                }
                write!(f, ")")
            }
            Stmt::While(stmt) => write!(
                f,
                "(while {} {})",
                stmt.condition,
                BlockDisplay(&stmt.body)
            ),
            Stmt::For(stmt) => write!(
                f,
                "(for {} {} {} {})",
                stmt.initialization,
                stmt.condition,
                stmt.update,
                BlockDisplay(&stmt.body)
            ),
            Stmt::Declaration(stmt) => match &stmt.assigned_value {
                Some(value) => write!(f, "(let {} {})", stmt.identifier, value),
                None => write!(f, "(let {})", stmt.identifier),
            },
            Stmt::Return(stmt) => write!(f, "(ret {})", stmt.value),
        }
    }
}

pub(crate) fn display_block(body: &[Stmt]) -> String {
    BlockDisplay(body).to_string()
}
