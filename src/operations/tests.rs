use super::operations::{assignment_operation, binary_operation};

#[test]
fn test_binary_precedence_levels() {
    let precedence = |symbol: &str| binary_operation(symbol).unwrap().precedence;

    assert_eq!(precedence("=="), 1);
    assert_eq!(precedence("!="), 1);
    assert_eq!(precedence("<"), 2);
    assert_eq!(precedence(">="), 2);
    assert_eq!(precedence("+"), 3);
    assert_eq!(precedence("-"), 3);
    assert_eq!(precedence("*"), 4);
    assert_eq!(precedence("/"), 4);
    assert_eq!(precedence("%"), 4);
}

#[test]
fn test_unknown_spelling_is_absent() {
    assert!(binary_operation("**").is_none());
    assert!(binary_operation("").is_none());
    assert!(assignment_operation("==").is_none());
}

#[test]
fn test_tables_are_disjoint() {
    for symbol in ["=", "+=", "-=", "*=", "/=", "%="] {
        assert!(assignment_operation(symbol).is_some(), "{}", symbol);
        assert!(binary_operation(symbol).is_none(), "{}", symbol);
    }

    for symbol in ["+", "-", "*", "/", "%", "<", ">", "<=", ">=", "==", "!="] {
        assert!(binary_operation(symbol).is_some(), "{}", symbol);
        assert!(assignment_operation(symbol).is_none(), "{}", symbol);
    }
}

#[test]
fn test_lookup_returns_matching_symbol() {
    assert_eq!(binary_operation("<=").unwrap().symbol, "<=");
    assert_eq!(assignment_operation("%=").unwrap().symbol, "%=");
    assert_eq!(assignment_operation("=").unwrap().precedence, 0);
}
