//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the top-level driver
//! loop. Each top-level construct is parsed and then handed straight to the
//! compiler, so no AST outlives the construct it came from.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for primary expressions

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::functions::Item,
    compiler::{
        compiler::Compiler,
        function::{gen_extern, gen_function},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    operations::operations::{binary_operation, Operation},
    Position, Span,
};

use super::{
    lookups::{create_token_lookups, NUDHandler, NUDLookup, StmtHandler, StmtLookup},
    stmt::{parse_definition, parse_extern, parse_top_level},
};

/// What a successful call to [`Parser::parse_outer`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Lowered {
    /// A function definition, by name
    Definition(String),
    /// An extern declaration, by name
    Extern(String),
    /// A wrapped top-level statement, by its synthetic function name
    TopLevel(String),
    /// A stray `;` between constructs
    Empty,
}

#[derive(Debug)]
pub enum ParserStatus {
    Ok(Lowered),
    End,
    Error(Error),
}

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and the lookup tables for parsing
/// statements and primary expressions. Binary operators are resolved
/// through the operator table instead of a token lookup.
pub struct Parser {
    /// The list of tokens to parse, always ending in EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (primary) expression handlers
    nud_lookup: NUDLookup,
    /// Counter for naming top-level functions
    current_id: u32,
}

impl Parser {
    /// Creates a new Parser with its lookup tables registered.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Source file name, used for the EOF position if the stream lacks one
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span {
                    start: end.clone(),
                    end,
                },
            });
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            current_id: 0,
        };
        create_token_lookups(&mut parser);
        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the token after the current one, if any.
    pub fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    /// Advances to the next token and returns the previous token.
    /// The trailing EOF token is never advanced past.
    pub fn advance(&mut self) -> &Token {
        let previous = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[previous]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an `UnexpectedTokenDetailed` error at the current token.
    pub fn detailed_error(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: String::from(message),
            },
            self.get_position(),
        )
    }

    /// Consumes a `;` if one is present.
    pub fn skip_semicolon(&mut self) {
        if self.current_token_kind() == TokenKind::Semicolon {
            self.advance();
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns the binary operation spelled by the current token, if any.
    ///
    /// Anything that is not a known binary operator ends the expression.
    pub fn current_operation(&self) -> Option<&'static Operation> {
        let token = self.current_token();
        if token.kind != TokenKind::Operator {
            return None;
        }
        binary_operation(&token.value)
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Registers a null denotation (primary) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Advances the internal ID counter and returns the previous value.
    pub fn advance_id(&mut self) -> u32 {
        let id = self.current_id;
        self.current_id += 1;
        id
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Discards the construct that started at token `start`.
    ///
    /// A definition is skipped up to its matching `}`. Any other construct
    /// ends just past a `;` or `}` outside braces. Scanning always stops
    /// before the next `fn` or `extern`, or at end of input.
    pub fn synchronize(&mut self, start: usize) {
        let in_definition = self.tokens[start].kind == TokenKind::Fn;
        let mut depth = 0usize;

        self.pos = start;
        while self.has_tokens() {
            match self.current_token_kind() {
                TokenKind::Fn | TokenKind::Extern if self.pos != start => return,
                TokenKind::OpenCurly => depth += 1,
                TokenKind::CloseCurly => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::Semicolon if depth == 0 && !in_definition => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Parses one top-level construct and lowers it immediately.
    ///
    /// Syntax errors resynchronise the token stream so the next call starts
    /// at a fresh construct. Semantic and backend errors leave the stream
    /// where parsing finished.
    pub fn parse_outer(&mut self, compiler: &mut Compiler) -> ParserStatus {
        let start = self.pos;

        let result = match self.current_token_kind() {
            TokenKind::EOF => return ParserStatus::End,
            TokenKind::Semicolon => {
                self.advance();
                Ok(Lowered::Empty)
            }
            TokenKind::Fn => parse_definition(self).and_then(|function| {
                gen_function(compiler, &function)?;
                Ok(Lowered::Definition(function.prototype.name))
            }),
            TokenKind::Extern => parse_extern(self).and_then(|prototype| {
                gen_extern(compiler, &prototype)?;
                Ok(Lowered::Extern(prototype.name))
            }),
            _ => parse_top_level(self).and_then(|function| {
                gen_function(compiler, &function)?;
                compiler.top_level.push(function.prototype.name.clone());
                Ok(Lowered::TopLevel(function.prototype.name))
            }),
        };

        match result {
            Ok(lowered) => ParserStatus::Ok(lowered),
            Err(error) => {
                if error.is_syntax_error() {
                    self.synchronize(start);
                }
                ParserStatus::Error(error)
            }
        }
    }
}

/// Parses a whole token stream without lowering, for inspection and tests.
///
/// Stops at the first syntax error.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Vec<Item>, Error> {
    let mut parser = Parser::new(tokens, file);
    let mut items = vec![];

    while parser.has_tokens() {
        match parser.current_token_kind() {
            TokenKind::Semicolon => {
                parser.advance();
            }
            TokenKind::Fn => items.push(Item::Definition(parse_definition(&mut parser)?)),
            TokenKind::Extern => items.push(Item::Extern(parse_extern(&mut parser)?)),
            _ => items.push(Item::Definition(parse_top_level(&mut parser)?)),
        }
    }

    Ok(items)
}
