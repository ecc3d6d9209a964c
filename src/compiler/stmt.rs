use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::{AssignmentStmt, ConditionalStmt, VarDeclStmt},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    compiler::{Compiler, GenStatus},
    expr::gen_expression,
};

/// Generates LLVM IR for one statement.
///
/// `Terminated` means the statement ended the current block with a return;
/// callers must not emit anything else into that block.
pub fn gen_statement<'ctx>(
    compiler: &mut Compiler<'ctx>,
    statement: &Stmt,
) -> Result<GenStatus, Error> {
    match statement {
        Stmt::Expression(expression_stmt) => {
            gen_expression(compiler, &expression_stmt.expression)?;
            Ok(GenStatus::Ok)
        }
        Stmt::Assignment(assignment) => gen_assignment(compiler, assignment),
        Stmt::Conditional(conditional) => gen_conditional(compiler, conditional),
        Stmt::While(while_stmt) => gen_loop(compiler, &while_stmt.condition, None, &while_stmt.body),
        Stmt::For(for_stmt) => {
            if gen_statement(compiler, &for_stmt.initialization)? == GenStatus::Terminated {
                return Ok(GenStatus::Terminated);
            }

            gen_loop(
                compiler,
                &for_stmt.condition,
                Some(for_stmt.update.as_ref()),
                &for_stmt.body,
            )
        }
        Stmt::Declaration(declaration) => gen_declaration(compiler, declaration),
        Stmt::Return(return_stmt) => {
            let value = gen_expression(compiler, &return_stmt.value)?;
            compiler.builder.build_return(Some(&value))?;

            Ok(GenStatus::Terminated)
        }
    }
}

/// Lowers statements in order, stopping at the first one that terminates.
pub fn gen_block<'ctx>(compiler: &mut Compiler<'ctx>, body: &[Stmt]) -> Result<GenStatus, Error> {
    for statement in body.iter() {
        if gen_statement(compiler, statement)? == GenStatus::Terminated {
            return Ok(GenStatus::Terminated);
        }
    }

    Ok(GenStatus::Ok)
}

fn gen_declaration<'ctx>(
    compiler: &mut Compiler<'ctx>,
    declaration: &VarDeclStmt,
) -> Result<GenStatus, Error> {
    if compiler.named_allocas.contains_key(&declaration.identifier) {
        return Err(Error::new(
            ErrorImpl::VariableAlreadyDeclared {
                variable: declaration.identifier.clone(),
            },
            declaration.span.start.clone(),
        ));
    }

    // The initializer cannot see the variable it initializes.
    let value = match &declaration.assigned_value {
        Some(value) => gen_expression(compiler, value)?,
        None => compiler.context.f64_type().const_zero(),
    };

    let alloca = compiler.create_entry_block_alloca(&declaration.identifier)?;
    compiler.builder.build_store(alloca, value)?;
    compiler
        .named_allocas
        .insert(declaration.identifier.clone(), alloca);

    Ok(GenStatus::Ok)
}

fn gen_assignment<'ctx>(
    compiler: &mut Compiler<'ctx>,
    assignment: &AssignmentStmt,
) -> Result<GenStatus, Error> {
    let alloca = *compiler
        .named_allocas
        .get(&assignment.identifier)
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: assignment.identifier.clone(),
                },
                assignment.span.start.clone(),
            )
        })?;

    let value = gen_expression(compiler, &assignment.value)?;
    assignment.operation.apply(compiler, alloca, value)?;

    Ok(GenStatus::Ok)
}

/// Lowers an `if`/`elif`/`else` chain.
///
/// Each condition gets a `then` block and a `check` block holding the next
/// test; the last `check` block is the else branch. Branches that fall
/// through jump to a shared `merge` block, which is dropped again when every
/// branch returned.
fn gen_conditional<'ctx>(
    compiler: &mut Compiler<'ctx>,
    conditional: &ConditionalStmt,
) -> Result<GenStatus, Error> {
    let function = compiler.current_function()?;
    let merge_block = compiler.context.append_basic_block(function, "merge");
    let mut merge_reachable = false;

    for branch in conditional.branches.iter() {
        let condition = gen_expression(compiler, &branch.condition)?;
        let test = compiler.build_truth_test(condition, "ifcond")?;

        let then_block = compiler.context.append_basic_block(function, "then");
        let check_block = compiler.context.append_basic_block(function, "check");
        compiler
            .builder
            .build_conditional_branch(test, then_block, check_block)?;

        compiler.builder.position_at_end(then_block);
        if gen_block(compiler, &branch.body)? == GenStatus::Ok {
            compiler
                .builder
                .build_unconditional_branch(merge_block)?;
            merge_reachable = true;
        }

        compiler.builder.position_at_end(check_block);
    }

    let else_status = match &conditional.else_body {
        Some(else_body) => gen_block(compiler, else_body)?,
        None => GenStatus::Ok,
    };
    if else_status == GenStatus::Ok {
        compiler
            .builder
            .build_unconditional_branch(merge_block)?;
        merge_reachable = true;
    }

    if !merge_reachable {
        unsafe { merge_block.delete() }.map_err(|_| {
            Error::new(
                ErrorImpl::BuilderFailure {
                    message: String::from("could not remove unreachable merge block"),
                },
                conditional.span.start.clone(),
            )
        })?;
        return Ok(GenStatus::Terminated);
    }

    compiler.move_to_end(merge_block)?;
    compiler.builder.position_at_end(merge_block);

    Ok(GenStatus::Ok)
}

/// Lowers `while` and `for` loops.
///
/// The condition is lowered into its own block and re-evaluated on every
/// iteration. The update statement, if any, runs after a body that falls
/// through.
fn gen_loop<'ctx>(
    compiler: &mut Compiler<'ctx>,
    condition: &Expr,
    update: Option<&Stmt>,
    body: &[Stmt],
) -> Result<GenStatus, Error> {
    let function = compiler.current_function()?;
    let condition_block = compiler.context.append_basic_block(function, "loopcond");
    let body_block = compiler.context.append_basic_block(function, "loop");
    let after_block = compiler.context.append_basic_block(function, "afterloop");

    compiler
        .builder
        .build_unconditional_branch(condition_block)?;
    compiler.builder.position_at_end(condition_block);

    let value = gen_expression(compiler, condition)?;
    let test = compiler.build_truth_test(value, "looptest")?;
    compiler
        .builder
        .build_conditional_branch(test, body_block, after_block)?;

    compiler.builder.position_at_end(body_block);
    if gen_block(compiler, body)? == GenStatus::Ok {
        let status = match update {
            Some(update) => gen_statement(compiler, update)?,
            None => GenStatus::Ok,
        };

        if status == GenStatus::Ok {
            compiler
                .builder
                .build_unconditional_branch(condition_block)?;
        }
    }

    compiler.move_to_end(after_block)?;
    compiler.builder.position_at_end(after_block);

    Ok(GenStatus::Ok)
}
