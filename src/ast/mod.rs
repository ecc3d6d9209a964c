/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The closed expression and statement enums
/// - expressions: Definitions for the expression kinds
/// - statements: Definitions for the statement kinds
/// - functions: Prototypes and function definitions
pub mod ast;
pub mod expressions;
pub mod functions;
pub mod statements;
