//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs:
//! - Operator precedence and associativity
//! - Calls, grouping and literals
//! - Statements inside function bodies
//! - Prototypes, externs and top-level wrapping
//! - Syntax errors and resynchronisation

use std::rc::Rc;

use crate::{
    ast::functions::Item,
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::TokenKind},
};

use super::{
    expr::parse_expr,
    parser::{parse, Parser},
    stmt::{parse_definition, parse_stmt},
};

fn parser_for(source: &str) -> Parser {
    let tokens = tokenize(source.to_string(), Some("test.bvr".to_string())).unwrap();
    Parser::new(tokens, Rc::new("test.bvr".to_string()))
}

fn expression(source: &str) -> String {
    let mut parser = parser_for(source);
    parse_expr(&mut parser).unwrap().to_string()
}

fn items(source: &str) -> Vec<String> {
    let tokens = tokenize(source.to_string(), Some("test.bvr".to_string())).unwrap();
    parse(tokens, Rc::new("test.bvr".to_string()))
        .unwrap()
        .iter()
        .map(|item| item.to_string())
        .collect()
}

fn parse_error(source: &str) -> Error {
    let tokens = tokenize(source.to_string(), Some("test.bvr".to_string())).unwrap();
    parse(tokens, Rc::new("test.bvr".to_string())).unwrap_err()
}

fn detailed_message(error: &Error) -> String {
    match error.get_internal_error() {
        ErrorImpl::UnexpectedTokenDetailed { message, .. } => message.clone(),
        other => panic!("expected a detailed syntax error, got {:?}", other),
    }
}

#[test]
fn test_parse_multiplication_binds_tighter() {
    assert_eq!(expression("1+2*3"), "(+ 1 (* 2 3))");
    assert_eq!(expression("1*2+3"), "(+ (* 1 2) 3)");
}

#[test]
fn test_parse_equal_precedence_is_left_associative() {
    assert_eq!(expression("8-4-2"), "(- (- 8 4) 2)");
    assert_eq!(expression("16/4/2"), "(/ (/ 16 4) 2)");
}

#[test]
fn test_parse_mixed_precedence_chain() {
    assert_eq!(expression("1 - 2 * 3 - 4"), "(- (- 1 (* 2 3)) 4)");
    assert_eq!(expression("a < b + 1 == c"), "(== (< a (+ b 1)) c)");
    assert_eq!(expression("x % 2 != 0"), "(!= (% x 2) 0)");
}

#[test]
fn test_parse_grouping() {
    assert_eq!(expression("(1+2)*3"), "(* (+ 1 2) 3)");
    assert_eq!(expression("x-(y)"), "(- x y)");
}

#[test]
fn test_parse_grouping_missing_close() {
    let mut parser = parser_for("(1 + 2");
    let error = parse_expr(&mut parser).unwrap_err();
    assert_eq!(detailed_message(&error), "expected ')'");
}

#[test]
fn test_parse_calls() {
    assert_eq!(expression("f()"), "f()");
    assert_eq!(expression("f(1, x+2)"), "f(1, (+ x 2))");
    assert_eq!(expression("f(g(1)) * 2"), "(* f(g(1)) 2)");
}

#[test]
fn test_parse_call_missing_separator() {
    let mut parser = parser_for("f(1 2)");
    let error = parse_expr(&mut parser).unwrap_err();
    assert_eq!(detailed_message(&error), "expected ')' or ',' in argument list");
}

#[test]
fn test_parse_decimal_numbers() {
    assert_eq!(expression("2.5"), "2.5");
    assert_eq!(expression(".5 + 1."), "(+ 0.5 1)");
}

#[test]
fn test_parse_malformed_number() {
    let mut parser = parser_for("1.2.3");
    let error = parse_expr(&mut parser).unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::NumberParseError { token } if token == "1.2.3"
    ));
}

#[test]
fn test_parse_unknown_operator_ends_expression() {
    let mut parser = parser_for("1 ! 2");
    assert_eq!(parse_expr(&mut parser).unwrap().to_string(), "1");
    assert_eq!(parser.current_token_kind(), TokenKind::Operator);
    assert_eq!(parser.current_token().value, "!");
}

#[test]
fn test_parse_function_body() {
    let source = "fn f(a, b) {
        let x = a
        x += b
        if x > 1 { ret x } elif x < 0 { ret 0 } else { x = 1 }
        ret x
    }";

    assert_eq!(
        items(source),
        vec!["(fn f(a, b) {(let x a) (+= x b) (if (> x 1) {(ret x)} (< x 0) {(ret 0)} else {(= x 1)}) (ret x)})"]
    );
}

#[test]
fn test_parse_loops() {
    let source = "fn g(n) {
        let total;
        for let i = 0; i < n; i += 1 { total += i; }
        while total > 10 { total -= 10 }
        ret total;
    }";

    assert_eq!(
        items(source),
        vec!["(fn g(n) {(let total) (for (let i 0) (< i n) (+= i 1) {(+= total i)}) (while (> total 10) {(-= total 10)}) (ret total)})"]
    );
}

#[test]
fn test_parse_for_missing_semicolon() {
    let error = parse_error("fn f() { for let i = 0; i < 3 i += 1 { } }");
    assert_eq!(detailed_message(&error), "expected ';' after loop condition");
}

#[test]
fn test_parse_externs() {
    let tokens = tokenize(
        "extern sin(x); extern atan2(y, x)".to_string(),
        Some("test.bvr".to_string()),
    )
    .unwrap();
    let parsed = parse(tokens, Rc::new("test.bvr".to_string())).unwrap();

    assert_eq!(parsed.len(), 2);
    match &parsed[1] {
        Item::Extern(prototype) => {
            assert_eq!(prototype.name, "atan2");
            assert_eq!(prototype.parameters, vec!["y", "x"]);
            assert_eq!(prototype.arity(), 2);
        }
        other => panic!("expected an extern, got {}", other),
    }
}

#[test]
fn test_parse_prototype_rejects_non_identifiers() {
    let error = parse_error("fn f(a, 1) { }");
    assert_eq!(detailed_message(&error), "unexpected token in prototype");

    let error = parse_error("fn f(a,) { }");
    assert_eq!(detailed_message(&error), "unexpected token in prototype");

    let error = parse_error("fn f(a b) { }");
    assert_eq!(detailed_message(&error), "unexpected token in prototype");
}

#[test]
fn test_parse_block_unterminated() {
    let error = parse_error("fn f() { ret 1");
    assert_eq!(detailed_message(&error), "expected '}' before end of input");
}

#[test]
fn test_parse_else_without_if() {
    let error = parse_error("fn f() { else { } }");
    assert_eq!(
        detailed_message(&error),
        "'elif' or 'else' without a preceding 'if'"
    );
}

#[test]
fn test_parse_top_level_wrapping() {
    assert_eq!(
        items("1 + 2; x = 3; ; 4"),
        vec![
            "(fn __top_level_0() {(ret (+ 1 2))})",
            "(fn __top_level_1() {(= x 3)})",
            "(fn __top_level_2() {(ret 4)})",
        ]
    );
}

#[test]
fn test_parse_error_position() {
    let error = parse_error("fn f() {\n  ret )\n}");
    assert!(error.is_syntax_error());
    assert_eq!(error.get_position().0, 15);
}

#[test]
fn test_synchronize_skips_to_next_definition() {
    let mut parser = parser_for("fn bad( { } fn good() { ret 7 }");
    assert!(parse_definition(&mut parser).is_err());

    parser.synchronize(0);
    assert_eq!(parser.current_token_kind(), TokenKind::Fn);

    let good = parse_definition(&mut parser).unwrap();
    assert_eq!(good.to_string(), "(fn good() {(ret 7)})");
    assert!(!parser.has_tokens());
}

#[test]
fn test_synchronize_stops_past_semicolon() {
    let mut parser = parser_for("1 + ) 2; 3");
    assert!(parse_expr(&mut parser).is_err());

    parser.synchronize(0);
    assert_eq!(parser.current_token_kind(), TokenKind::Number);
    assert_eq!(parser.current_token().value, "3");
}

#[test]
fn test_synchronize_skips_whole_definition_body() {
    let mut parser = parser_for("fn f() { ret 1 + ; if 1 { ret 2; } ret 99 } 5");
    assert!(parse_definition(&mut parser).is_err());

    parser.synchronize(0);
    assert_eq!(parser.current_token_kind(), TokenKind::Number);
    assert_eq!(parser.current_token().value, "5");
}

#[test]
fn test_synchronize_stops_at_next_definition_in_unterminated_body() {
    let mut parser = parser_for("fn f() { let = 2; fn g() { ret 1 }");
    assert!(parse_definition(&mut parser).is_err());

    parser.synchronize(0);
    assert_eq!(parser.current_token_kind(), TokenKind::Fn);
    assert_eq!(parser.peek_token().unwrap().value, "g");
}

#[test]
fn test_synchronize_skips_block_of_top_level_statement() {
    let mut parser = parser_for("while 1 { x = ; y = 2 } 3");
    assert!(parse_stmt(&mut parser).is_err());

    parser.synchronize(0);
    assert_eq!(parser.current_token().value, "3");
}
