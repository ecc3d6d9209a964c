//! Main compiler module.
//!
//! This module contains the Compiler structure, the generation context
//! shared by every lowering function. It owns the LLVM module and builder,
//! the function-wide symbol table, the function pass manager and the list
//! of top-level functions waiting to be evaluated.

use std::{collections::HashMap, path::Path, rc::Rc};

use inkwell::{
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    execution_engine::ExecutionEngine,
    module::Module,
    passes::PassManager,
    targets::{InitializationConfig, Target},
    values::{FloatValue, FunctionValue, IntValue, PointerValue},
    FloatPredicate, OptimizationLevel,
};

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
    parser::parser::{Parser, ParserStatus},
    Position,
};

/// Outcome of lowering a statement that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenStatus {
    /// Control falls through to the next statement
    Ok,
    /// Control left the block through a return
    Terminated,
}

type TopLevelFn = unsafe extern "C" fn() -> f64;

/// The generation context that holds the state of the compilation process.
///
/// # Type Parameters
///
/// * `'ctx` - Lifetime of the LLVM context
pub struct Compiler<'ctx> {
    /// Function-level optimisation passes. Must be dropped before the module.
    fpm: PassManager<FunctionValue<'ctx>>,

    /// Map of variable names to their storage slots in the current function
    pub named_allocas: HashMap<String, PointerValue<'ctx>>,
    /// Names of the lowered top-level functions, in source order
    pub top_level: Vec<String>,

    /// Reference to the LLVM context
    pub context: &'ctx Context,
    /// The LLVM module being built
    pub module: Module<'ctx>,
    /// The LLVM IR builder
    pub builder: Builder<'ctx>,
}

impl<'ctx> Compiler<'ctx> {
    /// Creates a new Compiler with an empty module named `module_name`.
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        let module = context.create_module(module_name);

        let fpm = PassManager::create(&module);
        fpm.add_instruction_combining_pass();
        fpm.add_reassociate_pass(); // Reorder expressions to enable better optimizations
        fpm.add_gvn_pass(); // Eliminate redundant calculations
        fpm.add_cfg_simplification_pass(); // Simplify the control flow graph
        fpm.add_promote_memory_to_register_pass(); // Promote stack slots to registers
        fpm.initialize();

        Compiler {
            fpm,
            named_allocas: HashMap::new(),
            top_level: Vec::new(),
            module,
            builder: context.create_builder(),
            context,
        }
    }

    /// Runs the function pass manager over a verified function.
    pub fn run_passes(&self, function: FunctionValue<'ctx>) {
        self.fpm.run_on(&function);
    }

    /// Saves the textual IR of the module to a file.
    pub fn save_module_to_file(&self, output_file: &Path) -> Result<(), Error> {
        self.module.print_to_file(output_file).map_err(|message| {
            Error::new(
                ErrorImpl::OutputFailure {
                    message: message.to_string(),
                },
                Position::null(),
            )
        })
    }

    /// Returns the textual IR of the module.
    pub fn print_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Returns the function that owns the builder's insertion block.
    pub fn current_function(&self) -> Result<FunctionValue<'ctx>, Error> {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_parent())
            .ok_or_else(|| builder_failure("builder is not positioned inside a function"))
    }

    /// Allocates a `double` slot at the top of the current function's entry
    /// block and initialises it to `0.0` there.
    ///
    /// Keeping every slot in the entry block lets mem2reg promote them. Reads
    /// on paths that skip the declaration see the zero.
    pub fn create_entry_block_alloca(&self, name: &str) -> Result<PointerValue<'ctx>, Error> {
        let function = self.current_function()?;
        let entry = function
            .get_first_basic_block()
            .ok_or_else(|| builder_failure("function has no entry block"))?;

        let builder = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(instruction) => builder.position_before(&instruction),
            None => builder.position_at_end(entry),
        }

        let f64_type = self.context.f64_type();
        let alloca = builder.build_alloca(f64_type, name)?;
        builder.build_store(alloca, f64_type.const_zero())?;

        Ok(alloca)
    }

    /// Nonzero is true.
    pub fn build_truth_test(
        &self,
        value: FloatValue<'ctx>,
        name: &str,
    ) -> Result<IntValue<'ctx>, Error> {
        Ok(self.builder.build_float_compare(
            FloatPredicate::ONE,
            value,
            self.context.f64_type().const_zero(),
            name,
        )?)
    }

    /// Moves `block` after the last block of its function.
    pub fn move_to_end(&self, block: BasicBlock<'ctx>) -> Result<(), Error> {
        let last = block
            .get_parent()
            .and_then(|function| function.get_last_basic_block())
            .ok_or_else(|| builder_failure("block is not attached to a function"))?;

        if last != block {
            block
                .move_after(last)
                .map_err(|_| builder_failure("could not reorder basic block"))?;
        }

        Ok(())
    }

    /// Throws away a function whose lowering failed.
    ///
    /// A function created for this definition is removed from the module.
    /// A previously declared one loses its body but stays as a declaration,
    /// so earlier calls to it remain valid.
    pub fn discard_function(&mut self, function: FunctionValue<'ctx>, keep_declaration: bool) {
        self.named_allocas.clear();
        self.builder.clear_insertion_position();

        if !keep_declaration {
            unsafe { function.delete() };
            return;
        }

        // Only entry-block slots are used across blocks, so erasing back to
        // front leaves no dangling uses.
        let blocks = function.get_basic_blocks();
        for block in blocks.iter().rev() {
            while let Some(instruction) = block.get_last_instruction() {
                instruction.erase_from_basic_block();
            }
        }
        for block in blocks {
            if unsafe { block.delete() }.is_err() {
                break;
            }
        }
    }

    /// JIT-compiles the module and calls every recorded top-level function.
    ///
    /// An execution engine takes over the module, so this can be called once
    /// per compiler.
    pub fn evaluate_top_level(&self) -> Result<Vec<(String, f64)>, Error> {
        Target::initialize_native(&InitializationConfig::default()).map_err(execution_failure)?;
        ExecutionEngine::link_in_mc_jit();

        let engine = self
            .module
            .create_jit_execution_engine(OptimizationLevel::None)
            .map_err(|message| execution_failure(message.to_string()))?;

        let mut results = Vec::with_capacity(self.top_level.len());
        for name in self.top_level.iter() {
            let function = unsafe { engine.get_function::<TopLevelFn>(name) }
                .map_err(|error| execution_failure(format!("{}: {:?}", name, error)))?;

            results.push((name.clone(), unsafe { function.call() }));
        }

        Ok(results)
    }
}

fn builder_failure(message: &str) -> Error {
    Error::new(
        ErrorImpl::BuilderFailure {
            message: String::from(message),
        },
        Position::null(),
    )
}

fn execution_failure(message: String) -> Error {
    Error::new(ErrorImpl::ExecutionFailure { message }, Position::null())
}

/// Parses and lowers a whole token stream, one top-level construct at a time.
///
/// A failing construct is reported and skipped; compilation continues with
/// the next one.
///
/// # Returns
///
/// The compiler holding the finished module, and every error encountered.
pub fn compile<'ctx>(
    tokens: Vec<Token>,
    file: Rc<String>,
    context: &'ctx Context,
) -> (Compiler<'ctx>, Vec<Error>) {
    let mut compiler = Compiler::new(context, &file);
    let mut parser = Parser::new(tokens, file);
    let mut errors = vec![];

    loop {
        match parser.parse_outer(&mut compiler) {
            ParserStatus::Ok(_) => {}
            ParserStatus::End => break,
            ParserStatus::Error(error) => errors.push(error),
        }
    }

    (compiler, errors)
}
