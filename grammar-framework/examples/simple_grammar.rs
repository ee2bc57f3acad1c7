//! Minimal grammar example.
//!
//! Demonstrates the grammar-framework workflow:
//! 1. Define the value type the grammar produces.
//! 2. Build rules out of literals, ranges and combinators.
//! 3. Attach semantic actions with `qualify`.
//! 4. Run the parser over text.
//!
//! The example parses simple arithmetic expressions with two numbers and one operator.

use grammar_framework::{alt, Item, MatchResult, MatchValue, Parser, Rule, TextSource};

// ============================================================================
// Value definition
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SimpleExpr {
    /// Raw text read by a leaf.
    Text(String),
    /// Numeric literal.
    Number(i32),
    /// Binary operation (lhs, operator, rhs).
    Binary {
        op: Op,
        left: Box<SimpleExpr>,
        right: Box<SimpleExpr>,
    },
    /// Values collected by a sequence or a repetition.
    List(Vec<SimpleExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
}

impl MatchValue<TextSource> for SimpleExpr {
    fn from_item(item: Item<TextSource>) -> Self {
        match item {
            Item::Element(ch) => SimpleExpr::Text(ch.to_string()),
            Item::Slice(slice) => SimpleExpr::Text(slice.to_string()),
        }
    }

    fn from_list(values: Vec<Self>) -> Self {
        SimpleExpr::List(values)
    }
}

impl SimpleExpr {
    fn text(&self) -> String {
        match self {
            SimpleExpr::Text(text) => text.clone(),
            SimpleExpr::List(values) => values.iter().map(SimpleExpr::text).collect(),
            _ => String::new(),
        }
    }
}

// ============================================================================
// Grammar rules
// ============================================================================

type SimpleRule = Rule<TextSource, SimpleExpr>;

/// Parses numeric literals.
fn number() -> SimpleRule {
    let digit: SimpleRule = ('0'..='9').into();
    digit.many1().qualify(|value| {
        value
            .and_then(|value| value.text().parse().ok())
            .map(SimpleExpr::Number)
            .into()
    })
}

/// Parses the operator between the two operands.
fn operator() -> SimpleRule {
    let plus = SimpleRule::from("+").map(|_| SimpleExpr::Text("+".into()));
    let minus = SimpleRule::from("-").map(|_| SimpleExpr::Text("-".into()));
    alt([plus, minus])
}

/// Parses expressions of the shape `number op number`.
fn binary() -> SimpleRule {
    // Spaces are matched but contribute no value.
    let spaces = SimpleRule::from(" ").many().qualify(|_| MatchResult::Empty);
    let rule = number() + spaces.clone() + operator() + spaces + number();
    rule.qualify(|value| match value {
        Some(SimpleExpr::List(parts)) => match parts.as_slice() {
            [left, op, right] => {
                let op = if op.text() == "+" { Op::Add } else { Op::Subtract };
                MatchResult::Value(SimpleExpr::Binary {
                    op,
                    left: Box::new(left.clone()),
                    right: Box::new(right.clone()),
                })
            }
            _ => MatchResult::NoMatch,
        },
        _ => MatchResult::NoMatch,
    })
}

fn main() {
    let parser = Parser::new(alt([binary(), number()]));

    for input in ["42", "1 + 2", "10-3", "7 *"] {
        match parser.parse_complete(input) {
            Ok(result) => println!("{input:>8} => {:?}", result.into_value()),
            Err(error) => println!("{input:>8} => {error}"),
        }
    }
}
