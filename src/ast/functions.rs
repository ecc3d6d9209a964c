use std::fmt::{self, Display};

use crate::Span;

use super::ast::{display_block, Block};

/// Prototype
/// A function's name and parameter names. Every parameter and the return
/// value are 64-bit floats, so the arity is the whole signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub parameters: Vec<String>,
    pub span: Span,
}

impl Prototype {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// Function
/// Owns its prototype and every statement of its body.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub prototype: Prototype,
    pub body: Block,
    pub span: Span,
}

impl Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.parameters.join(", "))
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(fn {} {})", self.prototype, display_block(&self.body))
    }
}

/// A top-level construct as produced by [`crate::parser::parser::parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Definition(Function),
    Extern(Prototype),
}

impl Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Definition(function) => write!(f, "{}", function),
            Item::Extern(prototype) => write!(f, "(extern {})", prototype),
        }
    }
}
