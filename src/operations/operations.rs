use std::{collections::HashMap, fmt::Debug};

use inkwell::{
    builder::BuilderError,
    values::{FloatValue, PointerValue},
    FloatPredicate,
};
use lazy_static::lazy_static;

use crate::{compiler::compiler::Compiler, errors::errors::Error};

/// Lowers `lhs <op> rhs` for two already-lowered operands.
pub type LowerFn = for<'ctx> fn(
    &Compiler<'ctx>,
    FloatValue<'ctx>,
    FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError>;

/// Lowers `slot <op>= rhs`, storing into the slot and yielding the stored value.
pub type AssignFn = for<'ctx> fn(
    &Compiler<'ctx>,
    PointerValue<'ctx>,
    FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError>;

/// A binary or comparison operator. Higher precedence binds tighter.
#[derive(Clone, Copy)]
pub struct Operation {
    pub symbol: &'static str,
    pub precedence: u8,
    lowering: LowerFn,
}

impl Operation {
    pub fn apply<'ctx>(
        &self,
        compiler: &Compiler<'ctx>,
        lhs: FloatValue<'ctx>,
        rhs: FloatValue<'ctx>,
    ) -> Result<FloatValue<'ctx>, Error> {
        Ok((self.lowering)(compiler, lhs, rhs)?)
    }
}

impl Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Operation({}, {})", self.symbol, self.precedence)
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

/// An operator whose left operand must be a storage slot.
#[derive(Clone, Copy)]
pub struct AssignOperation {
    pub symbol: &'static str,
    pub precedence: u8,
    lowering: AssignFn,
}

impl AssignOperation {
    pub fn apply<'ctx>(
        &self,
        compiler: &Compiler<'ctx>,
        slot: PointerValue<'ctx>,
        rhs: FloatValue<'ctx>,
    ) -> Result<FloatValue<'ctx>, Error> {
        Ok((self.lowering)(compiler, slot, rhs)?)
    }
}

impl Debug for AssignOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AssignOperation({})", self.symbol)
    }
}

impl PartialEq for AssignOperation {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

lazy_static! {
    static ref BINARY_OPERATIONS: HashMap<&'static str, Operation> = {
        let mut map = HashMap::new();
        let mut insert = |symbol: &'static str, precedence: u8, lowering: LowerFn| {
            map.insert(symbol, Operation { symbol, precedence, lowering });
        };

        insert("==", 1, equal);
        insert("!=", 1, not_equal);

        insert("<", 2, less);
        insert(">", 2, greater);
        insert("<=", 2, less_equal);
        insert(">=", 2, greater_equal);

        insert("+", 3, add);
        insert("-", 3, subtract);

        insert("*", 4, multiply);
        insert("/", 4, divide);
        insert("%", 4, remainder);

        map
    };

    static ref ASSIGNMENT_OPERATIONS: HashMap<&'static str, AssignOperation> = {
        let mut map = HashMap::new();
        let mut insert = |symbol: &'static str, lowering: AssignFn| {
            map.insert(symbol, AssignOperation { symbol, precedence: 0, lowering });
        };

        insert("=", assign);
        insert("+=", add_assign);
        insert("-=", subtract_assign);
        insert("*=", multiply_assign);
        insert("/=", divide_assign);
        insert("%=", remainder_assign);

        map
    };
}

/// Looks up a binary or comparison operator.
///
/// `None` is not an error: the parser treats it as the end of the expression.
pub fn binary_operation(symbol: &str) -> Option<&'static Operation> {
    BINARY_OPERATIONS.get(symbol)
}

pub fn assignment_operation(symbol: &str) -> Option<&'static AssignOperation> {
    ASSIGNMENT_OPERATIONS.get(symbol)
}

// ARITHMETIC

fn add<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compiler.builder.build_float_add(lhs, rhs, "addtmp")
}

fn subtract<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compiler.builder.build_float_sub(lhs, rhs, "subtmp")
}

fn multiply<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compiler.builder.build_float_mul(lhs, rhs, "multmp")
}

fn divide<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compiler.builder.build_float_div(lhs, rhs, "divtmp")
}

fn remainder<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compiler.builder.build_float_rem(lhs, rhs, "remtmp")
}

// COMPARISON

/// Comparisons yield 1.0 or 0.0 so they can be used as ordinary values.
fn compare<'ctx>(
    compiler: &Compiler<'ctx>,
    predicate: FloatPredicate,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    let comparison = compiler
        .builder
        .build_float_compare(predicate, lhs, rhs, "cmptmp")?;

    compiler
        .builder
        .build_unsigned_int_to_float(comparison, compiler.context.f64_type(), "booltmp")
}

fn less<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compare(compiler, FloatPredicate::ULT, lhs, rhs)
}

fn greater<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compare(compiler, FloatPredicate::UGT, lhs, rhs)
}

fn less_equal<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compare(compiler, FloatPredicate::ULE, lhs, rhs)
}

fn greater_equal<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compare(compiler, FloatPredicate::UGE, lhs, rhs)
}

fn equal<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compare(compiler, FloatPredicate::UEQ, lhs, rhs)
}

fn not_equal<'ctx>(
    compiler: &Compiler<'ctx>,
    lhs: FloatValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compare(compiler, FloatPredicate::UNE, lhs, rhs)
}

// ASSIGNMENT

fn assign<'ctx>(
    compiler: &Compiler<'ctx>,
    slot: PointerValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    compiler.builder.build_store(slot, rhs)?;
    Ok(rhs)
}

fn update<'ctx>(
    compiler: &Compiler<'ctx>,
    slot: PointerValue<'ctx>,
    rhs: FloatValue<'ctx>,
    operation: LowerFn,
) -> Result<FloatValue<'ctx>, BuilderError> {
    let current = compiler.builder.build_load(slot, "loadtmp")?.into_float_value();
    let result = operation(compiler, current, rhs)?;
    compiler.builder.build_store(slot, result)?;
    Ok(result)
}

fn add_assign<'ctx>(
    compiler: &Compiler<'ctx>,
    slot: PointerValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    update(compiler, slot, rhs, add)
}

fn subtract_assign<'ctx>(
    compiler: &Compiler<'ctx>,
    slot: PointerValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    update(compiler, slot, rhs, subtract)
}

fn multiply_assign<'ctx>(
    compiler: &Compiler<'ctx>,
    slot: PointerValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    update(compiler, slot, rhs, multiply)
}

fn divide_assign<'ctx>(
    compiler: &Compiler<'ctx>,
    slot: PointerValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    update(compiler, slot, rhs, divide)
}

fn remainder_assign<'ctx>(
    compiler: &Compiler<'ctx>,
    slot: PointerValue<'ctx>,
    rhs: FloatValue<'ctx>,
) -> Result<FloatValue<'ctx>, BuilderError> {
    update(compiler, slot, rhs, remainder)
}
