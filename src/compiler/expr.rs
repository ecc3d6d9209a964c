use inkwell::values::{BasicMetadataValueEnum, FloatValue};

use crate::{
    ast::{
        ast::Expr,
        expressions::{CallExpr, VariableExpr},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::compiler::Compiler;

/// Generates LLVM IR for the given expression and returns its value.
pub fn gen_expression<'ctx>(
    compiler: &Compiler<'ctx>,
    expression: &Expr,
) -> Result<FloatValue<'ctx>, Error> {
    match expression {
        Expr::Number(number) => Ok(compiler.context.f64_type().const_float(number.value)),
        Expr::Variable(variable) => gen_variable(compiler, variable),
        Expr::Binary(binary) => {
            let left = gen_expression(compiler, &binary.left)?;
            let right = gen_expression(compiler, &binary.right)?;

            binary.operation.apply(compiler, left, right)
        }
        Expr::Call(call) => gen_call(compiler, call),
    }
}

/// Variables always live in a slot; reading one is a load.
fn gen_variable<'ctx>(
    compiler: &Compiler<'ctx>,
    variable: &VariableExpr,
) -> Result<FloatValue<'ctx>, Error> {
    let alloca = compiler.named_allocas.get(&variable.name).ok_or_else(|| {
        Error::new(
            ErrorImpl::VariableNotDeclared {
                variable: variable.name.clone(),
            },
            variable.span.start.clone(),
        )
    })?;

    Ok(compiler
        .builder
        .build_load(*alloca, &variable.name)?
        .into_float_value())
}

fn gen_call<'ctx>(compiler: &Compiler<'ctx>, call: &CallExpr) -> Result<FloatValue<'ctx>, Error> {
    let function = compiler.module.get_function(&call.callee).ok_or_else(|| {
        Error::new(
            ErrorImpl::FunctionNotDeclared {
                function: call.callee.clone(),
            },
            call.span.start.clone(),
        )
    })?;

    let expected = function.count_params() as usize;
    let received = call.arguments.len();
    if received > expected {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments { expected, received },
            call.span.start.clone(),
        ));
    } else if received < expected {
        return Err(Error::new(
            ErrorImpl::MissingArguments { expected, received },
            call.span.start.clone(),
        ));
    }

    let mut arguments: Vec<BasicMetadataValueEnum<'ctx>> = Vec::with_capacity(received);
    for argument in call.arguments.iter() {
        arguments.push(gen_expression(compiler, argument)?.into());
    }

    compiler
        .builder
        .build_call(function, &arguments, "calltmp")?
        .try_as_basic_value()
        .left()
        .map(|value| value.into_float_value())
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::BuilderFailure {
                    message: format!("call to `{}` produced no value", call.callee),
                },
                call.span.start.clone(),
            )
        })
}
