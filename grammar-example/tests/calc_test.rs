use grammar_example::calc::Calculator;
use rstest::{fixture, rstest};

#[fixture]
fn calculator() -> Calculator {
    Calculator::new().unwrap()
}

#[rstest]
#[case("42", 42.0)]
#[case("  42  ", 42.0)]
#[case("3 + 4", 7.0)]
#[case("3 + 4 * 5", 23.0)]
#[case("2 * 3 + 4", 10.0)]
#[case("10 - 4 - 3", 3.0)]
#[case("(1 + 2) * 3", 9.0)]
#[case("((2))", 2.0)]
#[case("2 ^ 3 ^ 2", 512.0)]
#[case("-5 + 10 / 4", -2.5)]
#[case("1.5 * (2 - -2)", 6.0)]
#[case("1\n+\t2", 3.0)]
fn test_evaluates(calculator: Calculator, #[case] input: &str, #[case] expected: f64) {
    let value = calculator.evaluate(input).unwrap().unwrap();
    assert!(
        (value - expected).abs() < 1e-9,
        "{input:?} evaluated to {value}, expected {expected}"
    );
}

#[rstest]
fn test_missing_operand_is_reported_at_the_operand(calculator: Calculator) {
    let error = calculator.evaluate("1 + * 2").unwrap_err();
    let syntax = error.as_syntax().unwrap();
    assert_eq!(syntax.index, 4);
    assert_eq!(syntax.found.as_deref(), Some("'*'"));
    assert_eq!(syntax.expected.as_deref(), Some("an alternation"));
}

#[rstest]
fn test_unclosed_parenthesis(calculator: Calculator) {
    let error = calculator.evaluate("(1 + 2").unwrap_err();
    let syntax = error.as_syntax().unwrap();
    assert_eq!(syntax.index, 6);
    assert_eq!(syntax.found.as_deref(), Some("end of input"));
    assert_eq!(syntax.expected.as_deref(), Some("\")\""));
}

#[rstest]
fn test_division_by_zero_is_rejected(calculator: Calculator) {
    let error = calculator.evaluate("8 / (4 - 4)").unwrap_err();
    let syntax = error.as_syntax().unwrap();
    assert_eq!(syntax.expected.as_deref(), Some("a semantic qualification"));
    assert_eq!(syntax.index, 0);
}

#[rstest]
fn test_trailing_input(calculator: Calculator) {
    let error = calculator.evaluate("1 2").unwrap_err();
    let syntax = error.as_syntax().unwrap();
    assert_eq!(syntax.index, 2);
    assert_eq!(syntax.expected.as_deref(), Some("end of input"));
    assert_eq!(
        error.to_string(),
        "syntax error, found '2', expected end of input, at line 1, column 3 (index 2)"
    );
}

#[rstest]
fn test_empty_input(calculator: Calculator) {
    assert!(calculator.evaluate("").is_err());
    assert!(calculator.evaluate("   ").is_err());
}

#[rstest]
fn test_calculator_is_reusable(calculator: Calculator) {
    let first = calculator.evaluate("1 + 2").unwrap();
    assert!(calculator.evaluate("1 +").is_err());
    assert_eq!(calculator.evaluate("1 + 2").unwrap(), first);
}
