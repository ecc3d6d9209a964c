use crate::{
    ast::{
        ast::Expr,
        expressions::{BinaryExpr, CallExpr, NumberExpr, VariableExpr},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::parser::Parser;

/// Parses a full expression: one primary followed by any operator chain.
pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let left = parse_primary_expr(parser)?;
    parse_op_rhs(parser, 0, left)
}

/// Dispatches on the current token to a registered primary handler.
pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token_kind = parser.current_token_kind();
    if let Some(handler) = parser.get_nud_lookup().get(&token_kind).copied() {
        return handler(parser);
    }

    Err(match token_kind {
        TokenKind::EOF => parser.detailed_error("unexpected end of input in expression"),
        TokenKind::If | TokenKind::While | TokenKind::For | TokenKind::Let => {
            parser.detailed_error("statement used where an expression was expected")
        }
        TokenKind::Return => parser.detailed_error("'ret' cannot be used inside an expression"),
        TokenKind::Elif | TokenKind::Else => {
            parser.detailed_error("'elif' or 'else' without a preceding 'if'")
        }
        TokenKind::Fn | TokenKind::Extern => {
            parser.detailed_error("functions can only be declared at the top level")
        }
        _ => Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ),
    })
}

/// Precedence climbing over the binary operator table.
///
/// Stops as soon as the current token is not a binary operator or binds
/// looser than `min_precedence`. Equal precedence associates to the left;
/// only a strictly tighter operator is absorbed into the right operand.
pub fn parse_op_rhs(parser: &mut Parser, min_precedence: u8, mut left: Expr) -> Result<Expr, Error> {
    loop {
        let operation = match parser.current_operation() {
            Some(operation) if operation.precedence >= min_precedence => operation,
            _ => return Ok(left),
        };
        parser.advance();

        let mut right = parse_primary_expr(parser)?;

        if let Some(next) = parser.current_operation() {
            if next.precedence > operation.precedence {
                right = parse_op_rhs(parser, operation.precedence + 1, right)?;
            }
        }

        left = Expr::Binary(BinaryExpr {
            span: Span {
                start: left.get_span().start.clone(),
                end: right.get_span().end.clone(),
            },
            left: Box::new(left),
            operation,
            right: Box::new(right),
        });
    }
}

pub fn parse_number_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let result = parser.current_token().value.parse::<f64>();
    match result {
        Ok(value) => Ok(Expr::Number(NumberExpr {
            value,
            span: parser.advance().span.clone(),
        })),
        Err(_) => Err(Error::new(
            ErrorImpl::NumberParseError {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        )),
    }
}

/// A bare name is a variable reference unless a `(` follows, which makes it a call.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let identifier = parser.advance().clone();

    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(Expr::Variable(VariableExpr {
            name: identifier.value,
            span: identifier.span,
        }));
    }

    parser.advance();

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser)?);

            match parser.current_token_kind() {
                TokenKind::CloseParen => break,
                TokenKind::Comma => {
                    parser.advance();
                }
                _ => {
                    return Err(parser.detailed_error("expected ')' or ',' in argument list"));
                }
            }
        }
    }

    let end = parser.advance().span.end.clone();

    Ok(Expr::Call(CallExpr {
        callee: identifier.value,
        arguments,
        span: Span {
            start: identifier.span.start,
            end,
        },
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser)?;

    let error = parser.detailed_error("expected ')'");
    parser.expect_error(TokenKind::CloseParen, Some(error))?;

    Ok(expr)
}
