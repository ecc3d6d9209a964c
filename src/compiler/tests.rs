//! Unit tests for lowering.
//!
//! Bodies are lowered into hand-built functions where the block layout
//! needs to be inspected before any optimisation pass runs.

use std::rc::Rc;

use inkwell::{context::Context, values::FunctionValue};

use crate::{
    ast::functions::{Function, Item},
    errors::errors::{Error, ErrorImpl, ErrorKind},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

use super::{
    compiler::{compile, Compiler, GenStatus},
    function::{gen_extern, gen_function, gen_function_body, gen_prototype},
};

fn items(source: &str) -> Vec<Item> {
    let tokens = tokenize(source.to_string(), Some("test.bvr".to_string())).unwrap();
    parse(tokens, Rc::new("test.bvr".to_string())).unwrap()
}

fn definition(source: &str) -> Function {
    match items(source).remove(0) {
        Item::Definition(function) => function,
        Item::Extern(prototype) => panic!("expected a definition, got extern {}", prototype),
    }
}

/// Lowers a body without verification or passes.
fn lower_body<'ctx>(
    compiler: &mut Compiler<'ctx>,
    source: &str,
) -> (FunctionValue<'ctx>, GenStatus) {
    let function = definition(source);
    let function_value = gen_prototype(compiler, &function.prototype).unwrap();
    let status = gen_function_body(compiler, function_value, &function).unwrap();

    (function_value, status)
}

fn block_names(function: FunctionValue) -> Vec<String> {
    function
        .get_basic_blocks()
        .iter()
        .map(|block| block.get_name().to_str().unwrap().to_string())
        .collect()
}

fn define(compiler: &mut Compiler, source: &str) -> Result<(), Error> {
    for item in items(source) {
        match item {
            Item::Definition(function) => {
                gen_function(compiler, &function)?;
            }
            Item::Extern(prototype) => {
                gen_extern(compiler, &prototype)?;
            }
        }
    }
    Ok(())
}

#[test]
fn test_conditional_all_branches_return() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let (function, status) = lower_body(
        &mut compiler,
        "fn f(a) { if a < 1 { ret 1 } elif a < 2 { ret 2 } else { ret 3 } }",
    );

    assert_eq!(status, GenStatus::Terminated);
    assert!(!block_names(function)
        .iter()
        .any(|name| name.starts_with("merge")));
    assert!(function.verify(false));
}

#[test]
fn test_conditional_fall_through_keeps_merge() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let (function, status) = lower_body(
        &mut compiler,
        "fn f(a) { if a < 1 { ret 1 } else { a = 2 } ret a }",
    );

    let names = block_names(function);
    assert_eq!(status, GenStatus::Terminated);
    assert_eq!(names.last().map(String::as_str), Some("merge"));
    assert!(function.verify(false));
}

#[test]
fn test_conditional_without_else_falls_through() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let (function, status) = lower_body(&mut compiler, "fn f(a) { if a { ret 1 } }");

    assert_eq!(status, GenStatus::Ok);
    assert!(block_names(function).contains(&"merge".to_string()));
    assert!(function.verify(false));
}

#[test]
fn test_statements_after_return_are_skipped() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let (function, status) = lower_body(&mut compiler, "fn f() { ret 1 ret undefined }");

    assert_eq!(status, GenStatus::Terminated);
    assert_eq!(function.count_basic_blocks(), 1);
    assert!(function.verify(false));
}

#[test]
fn test_loop_blocks() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let (function, status) = lower_body(
        &mut compiler,
        "fn f(n) { let total for let i = 0; i < n; i += 1 { total += i } ret total }",
    );

    let names = block_names(function);
    assert_eq!(status, GenStatus::Terminated);
    assert_eq!(names, vec!["entry", "loopcond", "loop", "afterloop"]);
    assert!(function.verify(false));
}

#[test]
fn test_slots_live_in_entry_block() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let (function, _) = lower_body(
        &mut compiler,
        "fn f(a) { while a > 0 { let b = a a -= 1 } ret a }",
    );

    let entry = function.get_first_basic_block().unwrap();
    let mut allocas = 0;
    let mut instruction = entry.get_first_instruction();
    while let Some(current) = instruction {
        if current.get_opcode() == inkwell::values::InstructionOpcode::Alloca {
            allocas += 1;
        }
        instruction = current.get_next_instruction();
    }

    assert_eq!(allocas, 2);
}

#[test]
fn test_slots_are_zeroed_in_entry_block() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let (function, _) = lower_body(&mut compiler, "fn f(a) { if a { let x = 5 } ret x }");

    let entry = function.get_first_basic_block().unwrap();
    let mut stores = 0;
    let mut instruction = entry.get_first_instruction();
    while let Some(current) = instruction {
        if current.get_opcode() == inkwell::values::InstructionOpcode::Store {
            stores += 1;
        }
        instruction = current.get_next_instruction();
    }

    // Two zero stores plus the parameter copy.
    assert_eq!(stores, 3);
    assert!(function.verify(false));
}

#[test]
fn test_unknown_variable_removes_function() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let error = define(&mut compiler, "fn f() { ret z }").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Semantic);
    assert_eq!(error.to_string(), "unknown variable \"z\"");
    assert!(compiler.module.get_function("f").is_none());
}

#[test]
fn test_variable_redeclaration() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let error = define(&mut compiler, "fn f() { let x let x ret x }").unwrap_err();

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableAlreadyDeclared { variable } if variable == "x"
    ));
}

#[test]
fn test_parameter_cannot_be_redeclared() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let error = define(&mut compiler, "fn f(a) { let a = 1 ret a }").unwrap_err();

    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
}

#[test]
fn test_call_arity() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");
    define(&mut compiler, "fn g() { ret 1 } fn h(a, b) { ret a + b }").unwrap();

    let error = define(&mut compiler, "fn f() { ret g(1) }").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedArguments {
            expected: 0,
            received: 1
        }
    );

    let error = define(&mut compiler, "fn f() { ret h(1) }").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MissingArguments {
            expected: 2,
            received: 1
        }
    );

    assert!(compiler.module.get_function("f").is_none());
}

#[test]
fn test_unknown_function() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let error = define(&mut compiler, "fn f() { ret g() }").unwrap_err();

    assert_eq!(error.get_error_name(), "FunctionNotDeclared");
}

#[test]
fn test_redefinition_keeps_first_body() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");
    define(&mut compiler, "fn f() { ret 1 }").unwrap();

    let error = define(&mut compiler, "fn f(a) { ret a }").unwrap_err();

    assert_eq!(error.get_error_name(), "FunctionAlreadyDeclared");
    let function = compiler.module.get_function("f").unwrap();
    assert_eq!(function.count_params(), 0);
    assert!(function.count_basic_blocks() > 0);
}

#[test]
fn test_duplicate_parameters() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    let error = define(&mut compiler, "fn f(a, a) { ret a }").unwrap_err();

    assert_eq!(error.get_error_name(), "DuplicateParameter");
    assert!(compiler.module.get_function("f").is_none());
}

#[test]
fn test_extern_declarations() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    define(&mut compiler, "extern sin(x) extern sin(y)").unwrap();
    assert!(compiler.print_ir().contains("declare double @sin(double"));

    let error = define(&mut compiler, "extern sin(x, y)").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::ConflictingDeclaration {
            expected: 1,
            received: 2,
            ..
        }
    ));

    let error = define(&mut compiler, "fn sin() { ret 0 }").unwrap_err();
    assert_eq!(error.get_error_name(), "ConflictingDeclaration");
}

#[test]
fn test_failed_definition_keeps_extern_declaration() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");
    define(&mut compiler, "extern f(x) fn g(x) { ret f(x) }").unwrap();

    assert!(define(&mut compiler, "fn f(x) { if x { ret y } ret x }").is_err());
    let declaration = compiler.module.get_function("f").unwrap();
    assert_eq!(declaration.count_basic_blocks(), 0);
    assert_eq!(declaration.count_params(), 1);

    define(&mut compiler, "fn f(x) { ret x * 2 }").unwrap();
    assert!(compiler.module.verify().is_ok());
}

#[test]
fn test_definition_ir() {
    let context = Context::create();
    let mut compiler = Compiler::new(&context, "test");

    define(&mut compiler, "fn add(a, b) { ret a + b }").unwrap();

    let ir = compiler.print_ir();
    assert!(ir.contains("define double @add(double %a, double %b)"));
    assert!(ir.contains("fadd"));
}

#[test]
fn test_compile_records_top_level() {
    let context = Context::create();
    let source = "fn f() { ret 1 } f() ; g() ; 2 * 3".to_string();
    let tokens = tokenize(source, Some("test.bvr".to_string())).unwrap();

    let (compiler, errors) = compile(tokens, Rc::new("test.bvr".to_string()), &context);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "FunctionNotDeclared");
    assert_eq!(compiler.top_level, vec!["__top_level_0", "__top_level_2"]);
    assert!(compiler.module.get_function("__top_level_1").is_none());
}
