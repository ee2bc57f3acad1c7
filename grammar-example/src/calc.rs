//! Calculator grammar.
//!
//! Supported syntax:
//! - numbers (integers and decimals)
//! - `+`, `-`, `*`, `/` with the usual precedence, left associative
//! - `^`, right associative and binding tighter than `*`
//! - parentheses and unary minus
//!
//! Precedence is expressed by layering rules (expression, term, power,
//! primary) and recursion is closed with a [`Pass`]. After an operator the
//! grammar flushes: an operand must follow, so a bad operand is reported
//! where it occurs instead of backtracking to the operator.

use grammar_framework::{
    alt, flush, Item, MatchResult, MatchValue, Parser, Pass, Result, Rule, Set, TextSource,
};

/// Values produced by the calculator grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Calc {
    /// Raw text read by a leaf, or an operator.
    Text(String),
    Number(f64),
    List(Vec<Calc>),
}

impl MatchValue<TextSource> for Calc {
    fn from_item(item: Item<TextSource>) -> Self {
        match item {
            Item::Element(ch) => Calc::Text(ch.to_string()),
            Item::Slice(slice) => Calc::Text(slice.to_string()),
        }
    }

    fn from_list(values: Vec<Self>) -> Self {
        Calc::List(values)
    }
}

impl Calc {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Calc::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Concatenated text of every `Text` in the value.
    fn text(&self) -> String {
        match self {
            Calc::Text(text) => text.clone(),
            Calc::Number(_) => String::new(),
            Calc::List(values) => values.iter().map(Calc::text).collect(),
        }
    }

    /// Every non-list value, depth first.
    fn leaves(self, out: &mut Vec<Calc>) {
        match self {
            Calc::List(values) => values.into_iter().for_each(|value| value.leaves(out)),
            leaf => out.push(leaf),
        }
    }

    /// Unwraps a list holding exactly one value.
    fn single(self) -> Calc {
        match self {
            Calc::List(values) => match <[Calc; 1]>::try_from(values) {
                Ok([value]) => value,
                Err(values) => Calc::List(values),
            },
            value => value,
        }
    }
}

type CalcRule = Rule<TextSource, Calc>;

fn whitespace() -> CalcRule {
    Rule::new(Set::chars(" \t\r\n"))
        .many()
        .qualify(|_| MatchResult::Empty)
}

/// `rule` followed by optional whitespace.
fn lexeme(rule: CalcRule) -> CalcRule {
    (rule + whitespace()).map(Calc::single)
}

/// A token that only shapes the input and contributes no value.
fn punct(text: &str) -> CalcRule {
    lexeme(text.into()).qualify(|_| MatchResult::Empty)
}

fn number() -> CalcRule {
    let digits = CalcRule::from('0'..='9').many1();
    let literal = digits.clone() + (CalcRule::from(".") + digits).optional();
    lexeme(literal.filter_map(|value| value.text().parse().ok().map(Calc::Number)))
}

fn apply(op: &str, lhs: f64, rhs: f64) -> Option<f64> {
    match op {
        "+" => Some(lhs + rhs),
        "-" => Some(lhs - rhs),
        "*" => Some(lhs * rhs),
        "/" if rhs != 0.0 => Some(lhs / rhs),
        _ => None,
    }
}

/// Folds `operand (op operand)*` from the left. Division by zero rejects the match.
fn fold_left(value: Option<Calc>) -> MatchResult<Calc> {
    let mut leaves = Vec::new();
    if let Some(value) = value {
        value.leaves(&mut leaves);
    }
    let mut leaves = leaves.into_iter();
    let Some(Calc::Number(mut acc)) = leaves.next() else {
        return MatchResult::NoMatch;
    };
    while let Some(op) = leaves.next() {
        let (Calc::Text(op), Some(Calc::Number(rhs))) = (op, leaves.next()) else {
            return MatchResult::NoMatch;
        };
        match apply(&op, acc, rhs) {
            Some(result) => acc = result,
            None => return MatchResult::NoMatch,
        }
    }
    MatchResult::Value(Calc::Number(acc))
}

/// Folds `operand (^ operand)*` from the right.
fn fold_power(value: Option<Calc>) -> MatchResult<Calc> {
    let mut leaves = Vec::new();
    if let Some(value) = value {
        value.leaves(&mut leaves);
    }
    let operands: Option<Vec<f64>> = leaves.iter().map(Calc::as_number).collect();
    operands
        .and_then(|operands| operands.into_iter().rev().reduce(|exp, base| base.powf(exp)))
        .map(Calc::Number)
        .into()
}

/// Builds the grammar: optional leading whitespace, then one expression.
pub fn grammar() -> Result<CalcRule> {
    let expression = Pass::<TextSource, Calc>::new();
    let primary = Pass::<TextSource, Calc>::new();

    let operator = |ops: &str| lexeme(alt(ops.chars().map(CalcRule::from)));
    let parens = punct("(") + expression.rule() + punct(")");
    let negated = (punct("-") + primary.rule()).map(|value| match value.single() {
        Calc::Number(n) => Calc::Number(-n),
        other => other,
    });
    let primary = primary.define(alt([number(), parens.map(Calc::single), negated]))?;

    let power = (primary.clone() + (punct("^") + flush() + primary).many()).qualify(fold_power);
    let term = (power.clone() + (operator("*/") + flush() + power).many()).qualify(fold_left);
    let expression =
        expression.define((term.clone() + (operator("+-") + flush() + term).many()).qualify(fold_left))?;

    Ok((whitespace() + expression).map(Calc::single))
}

/// Evaluates arithmetic expressions.
#[derive(Debug, Clone)]
pub struct Calculator {
    parser: Parser<TextSource, Calc>,
}

impl Calculator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: Parser::new(grammar()?),
        })
    }

    /// Evaluates `input`, which must hold exactly one expression.
    pub fn evaluate(&self, input: &str) -> Result<Option<f64>> {
        let result = self.parser.parse_complete(input)?;
        Ok(result.value().and_then(Calc::as_number))
    }
}
