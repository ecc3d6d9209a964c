use crate::{
    ast::{
        ast::{Block, Stmt},
        functions::{Function, Prototype},
        statements::{
            AssignmentStmt, ConditionalBranch, ConditionalStmt, ExpressionStmt, ForStmt,
            ReturnStmt, VarDeclStmt, WhileStmt,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    operations::operations::assignment_operation,
    parser::expr::parse_expr,
    Span,
};

use super::parser::Parser;

/// Parses one line of a block body.
///
/// Keywords dispatch through the statement lookup. An identifier directly
/// followed by an assignment operator is an assignment; anything else is an
/// expression statement.
pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return handler(parser);
    }

    if parser.current_token_kind() == TokenKind::Identifier {
        let is_assignment = parser.peek_token().is_some_and(|token| {
            token.kind == TokenKind::Operator && assignment_operation(&token.value).is_some()
        });
        if is_assignment {
            return parse_assignment_stmt(parser);
        }
    }

    let expression = parse_expr(parser)?;
    parser.skip_semicolon();

    Ok(Stmt::Expression(ExpressionStmt {
        span: expression.get_span().clone(),
        expression,
    }))
}

pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let identifier = parser.advance().clone();
    let operator = parser.advance().clone();

    let operation = match assignment_operation(&operator.value) {
        Some(operation) => operation,
        None => return Err(parser.detailed_error("expected an assignment operator")),
    };

    let value = parse_expr(parser)?;
    parser.skip_semicolon();

    Ok(Stmt::Assignment(AssignmentStmt {
        span: Span {
            start: identifier.span.start,
            end: value.get_span().end.clone(),
        },
        identifier: identifier.value,
        operation,
        value,
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let error = parser.detailed_error("expected identifier during variable declaration");
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let assigned_value = if parser.current_token_kind() == TokenKind::Operator
        && parser.current_token().value == "="
    {
        parser.advance();
        Some(parse_expr(parser)?)
    } else {
        None
    };

    let end = match &assigned_value {
        Some(value) => value.get_span().end.clone(),
        None => identifier.span.end.clone(),
    };
    parser.skip_semicolon();

    Ok(Stmt::Declaration(VarDeclStmt {
        identifier: identifier.value,
        assigned_value,
        span: Span { start, end },
    }))
}

pub fn parse_conditional_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let mut branches = vec![ConditionalBranch {
        condition: parse_expr(parser)?,
        body: parse_block(parser)?,
    }];

    while parser.current_token_kind() == TokenKind::Elif {
        parser.advance();
        branches.push(ConditionalBranch {
            condition: parse_expr(parser)?,
            body: parse_block(parser)?,
        });
    }

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_block(parser)?)
    } else {
        None
    };

    Ok(Stmt::Conditional(ConditionalStmt {
        branches,
        else_body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

/// `for <stmt> <expr> ; <stmt> { ... }`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let initialization = parse_stmt(parser)?;
    let condition = parse_expr(parser)?;

    let error = parser.detailed_error("expected ';' after loop condition");
    parser.expect_error(TokenKind::Semicolon, Some(error))?;

    let update = parse_stmt(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::For(ForStmt {
        initialization: Box::new(initialization),
        condition,
        update: Box::new(update),
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = parse_expr(parser)?;
    parser.skip_semicolon();

    Ok(Stmt::Return(ReturnStmt {
        span: Span {
            start,
            end: value.get_span().end.clone(),
        },
        value,
    }))
}

pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let error = parser.detailed_error("expected '{'");
    parser.expect_error(TokenKind::OpenCurly, Some(error))?;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.detailed_error("expected '}' before end of input"));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(statements)
}

/// `name(a, b, ...)`
pub fn parse_prototype(parser: &mut Parser) -> Result<Prototype, Error> {
    let error = parser.detailed_error("expected function name in prototype");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let error = parser.detailed_error("expected '(' in prototype");
    parser.expect_error(TokenKind::OpenParen, Some(error))?;

    let mut parameters = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let error = parser.detailed_error("unexpected token in prototype");
            parameters.push(parser.expect_error(TokenKind::Identifier, Some(error))?.value);

            match parser.current_token_kind() {
                TokenKind::Comma => {
                    parser.advance();
                }
                TokenKind::CloseParen => break,
                _ => return Err(parser.detailed_error("unexpected token in prototype")),
            }
        }
    }

    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    Ok(Prototype {
        name: name.value,
        parameters,
        span: Span {
            start: name.span.start,
            end,
        },
    })
}

pub fn parse_definition(parser: &mut Parser) -> Result<Function, Error> {
    let start = parser.advance().span.start.clone();

    let prototype = parse_prototype(parser)?;
    let body = parse_block(parser)?;

    Ok(Function {
        prototype,
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}

pub fn parse_extern(parser: &mut Parser) -> Result<Prototype, Error> {
    parser.advance();
    parse_prototype(parser)
}

/// Wraps a single top-level statement into a parameterless function.
///
/// A bare expression becomes `ret <expression>` so the function yields it.
pub fn parse_top_level(parser: &mut Parser) -> Result<Function, Error> {
    let stmt = parse_stmt(parser)?;
    let span = stmt.get_span().clone();

    let stmt = match stmt {
        Stmt::Expression(ExpressionStmt { expression, span }) => Stmt::Return(ReturnStmt {
            value: expression,
            span,
        }),
        stmt => stmt,
    };

    Ok(Function {
        prototype: Prototype {
            name: format!("__top_level_{}", parser.advance_id()),
            parameters: vec![],
            span: span.clone(),
        },
        body: vec![stmt],
        span,
    })
}
