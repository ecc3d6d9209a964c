use std::collections::HashSet;

use inkwell::{
    module::Linkage,
    types::BasicMetadataTypeEnum,
    values::FunctionValue,
};

use crate::{
    ast::functions::{Function, Prototype},
    errors::errors::{Error, ErrorImpl},
};

use super::{
    compiler::{Compiler, GenStatus},
    stmt::gen_block,
};

fn check_parameters(prototype: &Prototype) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for parameter in prototype.parameters.iter() {
        if !seen.insert(parameter.as_str()) {
            return Err(Error::new(
                ErrorImpl::DuplicateParameter {
                    function: prototype.name.clone(),
                    parameter: parameter.clone(),
                },
                prototype.span.start.clone(),
            ));
        }
    }

    Ok(())
}

fn conflicting_declaration(prototype: &Prototype, function: FunctionValue) -> Error {
    Error::new(
        ErrorImpl::ConflictingDeclaration {
            function: prototype.name.clone(),
            expected: function.count_params() as usize,
            received: prototype.arity(),
        },
        prototype.span.start.clone(),
    )
}

fn name_parameters(function: FunctionValue, prototype: &Prototype) {
    for (parameter, name) in function.get_param_iter().zip(prototype.parameters.iter()) {
        parameter.into_float_value().set_name(name);
    }
}

/// Declares `double name(double, ...)` in the module.
pub fn gen_prototype<'ctx>(
    compiler: &Compiler<'ctx>,
    prototype: &Prototype,
) -> Result<FunctionValue<'ctx>, Error> {
    check_parameters(prototype)?;

    let f64_type = compiler.context.f64_type();
    let parameter_types: Vec<BasicMetadataTypeEnum<'ctx>> =
        vec![f64_type.into(); prototype.arity()];
    let function_type = f64_type.fn_type(&parameter_types, false);

    let function = compiler
        .module
        .add_function(&prototype.name, function_type, Some(Linkage::External));
    name_parameters(function, prototype);

    Ok(function)
}

/// Declares an external function, reusing a matching earlier declaration.
pub fn gen_extern<'ctx>(
    compiler: &Compiler<'ctx>,
    prototype: &Prototype,
) -> Result<FunctionValue<'ctx>, Error> {
    check_parameters(prototype)?;

    match compiler.module.get_function(&prototype.name) {
        Some(existing) if existing.count_params() as usize == prototype.arity() => Ok(existing),
        Some(existing) => Err(conflicting_declaration(prototype, existing)),
        None => gen_prototype(compiler, prototype),
    }
}

/// Lowers a function definition into the module.
///
/// On any failure the partially built function is discarded and the module
/// is left as it was before the definition.
pub fn gen_function<'ctx>(
    compiler: &mut Compiler<'ctx>,
    function: &Function,
) -> Result<FunctionValue<'ctx>, Error> {
    let prototype = &function.prototype;
    check_parameters(prototype)?;

    let (function_value, declared_before) = match compiler.module.get_function(&prototype.name)
    {
        Some(existing) => {
            if existing.count_basic_blocks() > 0 {
                return Err(Error::new(
                    ErrorImpl::FunctionAlreadyDeclared {
                        function: prototype.name.clone(),
                    },
                    prototype.span.start.clone(),
                ));
            }
            if existing.count_params() as usize != prototype.arity() {
                return Err(conflicting_declaration(prototype, existing));
            }

            name_parameters(existing, prototype);
            (existing, true)
        }
        None => (gen_prototype(compiler, prototype)?, false),
    };

    if let Err(error) = gen_function_body(compiler, function_value, function) {
        compiler.discard_function(function_value, declared_before);
        return Err(error);
    }

    if !function_value.verify(true) {
        compiler.discard_function(function_value, declared_before);
        return Err(Error::new(
            ErrorImpl::VerificationFailed {
                function: prototype.name.clone(),
            },
            prototype.span.start.clone(),
        ));
    }

    compiler.run_passes(function_value);

    Ok(function_value)
}

/// Builds the entry block, parameter slots and body of an already declared
/// function. `GenStatus::Ok` means the body fell through to the implicit
/// `ret 0.0`.
pub(crate) fn gen_function_body<'ctx>(
    compiler: &mut Compiler<'ctx>,
    function_value: FunctionValue<'ctx>,
    function: &Function,
) -> Result<GenStatus, Error> {
    let entry = compiler.context.append_basic_block(function_value, "entry");
    compiler.builder.position_at_end(entry);

    // Parameters are mutable, so each one is copied into its own slot.
    compiler.named_allocas.clear();
    for (parameter, name) in function_value
        .get_param_iter()
        .zip(function.prototype.parameters.iter())
    {
        let alloca = compiler.create_entry_block_alloca(name)?;
        compiler.builder.build_store(alloca, parameter)?;
        compiler.named_allocas.insert(name.clone(), alloca);
    }

    let status = gen_block(compiler, &function.body)?;
    if status == GenStatus::Ok {
        compiler
            .builder
            .build_return(Some(&compiler.context.f64_type().const_zero()))?;
    }

    Ok(status)
}
