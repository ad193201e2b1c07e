// Expression evaluator and symbol table tests

use gama::error::ErrorKind;
use gama::evaluator::{evaluate_str, integer_power};
use gama::{Evaluator, Lexer, Limits, Mode, SymbolError, SymbolTable, TokenCursor};

fn eval(source: &str) -> i64 {
    evaluate_str(source, &SymbolTable::new(8)).unwrap()
}

#[test]
fn precedence_ladder() {
    let cases = [
        ("1 + 2 * 3", 7),
        ("1 + 2 * 3 ^ 2", 19),
        ("(1 + 2) * 3", 9),
        ("2 * 3 % 4", 2),
        ("8 / 2 * 4", 16),
        ("1 + 2 < 4", 1),
        ("1 + 2 > 4", 0),
        ("5 - 2 == 3", 1),
        ("-3 + 5", 2),
        ("4 - -1", 5),
        ("-(2 + 3)", -5),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), expected, "{}", source);
    }
}

#[test]
fn binary_levels_are_left_associative() {
    assert_eq!(eval("20 - 5 - 5"), 10);
    assert_eq!(eval("64 / 4 / 2"), 8);
    assert_eq!(eval("2 ^ 2 ^ 3"), 64);
    assert_eq!(eval("3 == 3 == 1"), 1);
    assert_eq!(eval("1 < 0 < 1"), 1);
}

#[test]
fn unary_minus_applies_before_power() {
    assert_eq!(eval("-2 ^ 2"), 4);
    assert_eq!(eval("-2 ^ 3"), -8);
}

#[test]
fn arithmetic_wraps() {
    assert_eq!(eval("9223372036854775807 + 1"), i64::MIN);
    assert_eq!(eval("2 ^ 64"), 0);
}

#[test]
fn negative_exponents_truncate() {
    assert_eq!(integer_power(2, -1), Some(0));
    assert_eq!(integer_power(-5, -2), Some(0));
    assert_eq!(integer_power(1, -3), Some(1));
    assert_eq!(integer_power(-1, -3), Some(-1));
    assert_eq!(integer_power(-1, -4), Some(1));
    assert_eq!(integer_power(0, -1), None);
}

#[test]
fn small_powers() {
    assert_eq!(integer_power(3, 0), Some(1));
    assert_eq!(integer_power(0, 0), Some(1));
    assert_eq!(integer_power(3, 4), Some(81));
    assert_eq!(integer_power(-2, 5), Some(-32));
}

#[test]
fn division_and_modulo_by_zero() {
    let symbols = SymbolTable::new(8);
    let error = evaluate_str("1 / (2 - 2)", &symbols).unwrap_err();
    assert_eq!(error.kind, ErrorKind::RuntimeError);
    assert_eq!(error.message, "Division by zero");

    let error = evaluate_str("1 % 0", &symbols).unwrap_err();
    assert_eq!(error.message, "Modulo by zero");
}

#[test]
fn reads_variables() {
    let mut symbols = SymbolTable::new(8);
    symbols.set("x", 6).unwrap();
    symbols.declare("y").unwrap();

    assert_eq!(evaluate_str("x * x + 1", &symbols).unwrap(), 37);

    let error = evaluate_str("y + 1", &symbols).unwrap_err();
    assert!(error.message.contains("used before it is assigned"));

    let error = evaluate_str("z", &symbols).unwrap_err();
    assert!(error.message.contains("not declared"));
}

#[test]
fn trailing_tokens_are_rejected() {
    let error = evaluate_str("1 2", &SymbolTable::new(8)).unwrap_err();
    assert_eq!(error.kind, ErrorKind::SyntaxError);
}

#[test]
fn skip_mode_consumes_without_effects() {
    let tokens = Lexer::new("missing / 0 + 1 ; rest", Limits::default())
        .scan_tokens()
        .unwrap();
    let mut cursor = TokenCursor::new(tokens);
    let symbols = SymbolTable::new(8);

    let value = Evaluator::new(&mut cursor, &symbols, Mode::Skip)
        .expression()
        .unwrap();
    assert_eq!(value, 0);
    assert_eq!(cursor.peek().lexeme, ";");
}

#[test]
fn skip_mode_still_checks_syntax() {
    let tokens = Lexer::new("1 + * 2", Limits::default())
        .scan_tokens()
        .unwrap();
    let mut cursor = TokenCursor::new(tokens);
    let symbols = SymbolTable::new(8);

    let error = Evaluator::new(&mut cursor, &symbols, Mode::Skip)
        .expression()
        .unwrap_err();
    assert_eq!(error.message, "Expected expression after '+', found '*'");
}

#[test]
fn declare_is_idempotent() {
    let mut symbols = SymbolTable::new(2);
    let first = symbols.declare("a").unwrap();
    symbols.set("a", 4).unwrap();
    assert_eq!(symbols.declare("a").unwrap(), first);
    assert_eq!(symbols.get("a").unwrap(), 4);
    assert_eq!(symbols.len(), 1);
}

#[test]
fn capacity_only_limits_new_names() {
    let mut symbols = SymbolTable::new(1);
    symbols.set("a", 1).unwrap();
    symbols.set("a", 2).unwrap();
    assert_eq!(
        symbols.declare("b"),
        Err(SymbolError::TooManyVariables {
            name: "b".to_string(),
            limit: 1
        })
    );
}

#[test]
fn undefine_keeps_the_slot() {
    let mut symbols = SymbolTable::new(4);
    symbols.set("a", 9).unwrap();
    let idx = symbols.lookup("a").unwrap();
    symbols.undefine(idx);

    assert_eq!(
        symbols.get("a"),
        Err(SymbolError::Uninitialized("a".to_string()))
    );
    assert!(!symbols.symbol("a").unwrap().defined);
    assert_eq!(symbols.len(), 1);
}
