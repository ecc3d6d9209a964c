use std::fmt::Display;

use inkwell::builder::BuilderError;
use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorKind::Syntax,
            ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::FunctionNotDeclared { .. }
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::MissingArguments { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::DuplicateParameter { .. }
            | ErrorImpl::ConflictingDeclaration { .. } => ErrorKind::Semantic,
            ErrorImpl::VerificationFailed { .. }
            | ErrorImpl::BuilderFailure { .. }
            | ErrorImpl::ExecutionFailure { .. }
            | ErrorImpl::OutputFailure { .. } => ErrorKind::Backend,
        }
    }

    pub fn is_syntax_error(&self) -> bool {
        self.kind() == ErrorKind::Syntax
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::DuplicateParameter { .. } => "DuplicateParameter",
            ErrorImpl::ConflictingDeclaration { .. } => "ConflictingDeclaration",
            ErrorImpl::VerificationFailed { .. } => "VerificationFailed",
            ErrorImpl::BuilderFailure { .. } => "BuilderFailure",
            ErrorImpl::ExecutionFailure { .. } => "ExecutionFailure",
            ErrorImpl::OutputFailure { .. } => "OutputFailure",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, expected digits with at most one `.`",
                token
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", variable))
            }
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::FunctionNotDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` not declared", function))
            }
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` cannot be redefined", function))
            }
            ErrorImpl::DuplicateParameter { function, parameter } => ErrorTip::Suggestion(
                format!("Parameter `{}` appears twice in `{}`", parameter, function),
            ),
            ErrorImpl::ConflictingDeclaration {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Function `{}` was declared with {} parameters, found {}",
                function, expected, received
            )),
            ErrorImpl::VerificationFailed { function } => ErrorTip::Suggestion(format!(
                "Generated code for `{}` failed verification",
                function
            )),
            ErrorImpl::BuilderFailure { message }
            | ErrorImpl::ExecutionFailure { message }
            | ErrorImpl::OutputFailure { message } => ErrorTip::Suggestion(message.clone()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl From<BuilderError> for Error {
    fn from(error: BuilderError) -> Self {
        Error::new(
            ErrorImpl::BuilderFailure {
                message: format!("{:?}", error),
            },
            Position::null(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Semantic,
    Backend,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("unknown variable {variable:?}")]
    VariableNotDeclared { variable: String },
    #[error("unknown function {function:?}")]
    FunctionNotDeclared { function: String },
    #[error("incorrect argument count: expected {expected}, received {received}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("incorrect argument count: expected {expected}, received {received}")]
    MissingArguments { expected: usize, received: usize },
    #[error("cannot redefine function {function:?}")]
    FunctionAlreadyDeclared { function: String },
    #[error("duplicate parameter {parameter:?} in function {function:?}")]
    DuplicateParameter { function: String, parameter: String },
    #[error("function {function:?} declared with {expected} parameters, found {received}")]
    ConflictingDeclaration {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("function {function:?} failed verification")]
    VerificationFailed { function: String },
    #[error("backend failure: {message}")]
    BuilderFailure { message: String },
    #[error("execution failure: {message}")]
    ExecutionFailure { message: String },
    #[error("output failure: {message}")]
    OutputFailure { message: String },
}
