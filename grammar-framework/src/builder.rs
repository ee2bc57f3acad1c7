//! Grammar-building conveniences.
//!
//! Literal values become terms only through explicit conversions (`From`
//! impls and [`term`]); the operators below accept anything convertible:
//!
//! - `a + b` sequence (extends `a` if it already is a sequence)
//! - `a | b` ordered choice (extends `a` if it already is an alternation)
//! - `a * m` repetition, `m` a count or a range
//! - `!a` negative lookahead

use crate::combinator::{
    Alternation, Code, Multiplier, Negative, Positive, Qualify, Repeat, Sequence,
};
use crate::error::Result;
use crate::leaf::{Any, Atom, EndOfInput, Fail, Flush, Null, NullSequence, Verbatim};
use crate::result::{MatchResult, MatchValue};
use crate::source::{Source, TextSource};
use crate::stream::Stream;
use crate::term::Rule;
use std::ops::{Add, BitOr, Mul, Not, RangeInclusive};

impl<S, V> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    /// Matches empty where `self` would match, without consuming.
    pub fn positive(&self) -> Self {
        Rule::new(Positive::new(self.clone()))
    }

    /// Matches empty where `self` would not match, without consuming.
    pub fn negative(&self) -> Self {
        Rule::new(Negative::new(self.clone()))
    }

    pub fn repeat<M: Into<Multiplier>>(&self, multiplier: M) -> Self {
        Rule::new(Repeat::new(self.clone(), multiplier))
    }

    pub fn optional(&self) -> Self {
        self.repeat(0..=1)
    }

    pub fn many(&self) -> Self {
        self.repeat(0..)
    }

    pub fn many1(&self) -> Self {
        self.repeat(1..)
    }

    pub fn qualify<F>(&self, action: F) -> Self
    where
        F: Fn(Option<V>) -> MatchResult<V> + Send + Sync + 'static,
    {
        Rule::new(Qualify::new(self.clone(), action))
    }

    /// Transforms the value of a match; valueless matches pass through.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(V) -> V + Send + Sync + 'static,
    {
        self.qualify(move |value| match value {
            Some(value) => MatchResult::Value(f(value)),
            None => MatchResult::Empty,
        })
    }

    /// Transforms the value of a match, rejecting it when `f` returns `None`.
    /// Valueless matches are rejected.
    pub fn filter_map<F>(&self, f: F) -> Self
    where
        F: Fn(V) -> Option<V> + Send + Sync + 'static,
    {
        self.qualify(move |value| value.and_then(&f).into())
    }
}

/// Converts a literal (or an existing rule) into a rule.
pub fn term<S, V, T>(value: T) -> Rule<S, V>
where
    S: Source,
    T: Into<Rule<S, V>>,
{
    value.into()
}

pub fn seq<S, V, I>(items: I) -> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
    I: IntoIterator,
    I::Item: Into<Rule<S, V>>,
{
    Rule::new(Sequence::new(items.into_iter().map(Into::into)))
}

pub fn alt<S, V, I>(branches: I) -> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
    I: IntoIterator,
    I::Item: Into<Rule<S, V>>,
{
    Rule::new(Alternation::new(branches.into_iter().map(Into::into)))
}

pub fn verbatim<S, V>(pattern: S::Slice) -> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    Rule::new(Verbatim::new(pattern))
}

pub fn any<S, V>() -> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    Rule::new(Any::new())
}

pub fn eof<S, V>() -> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    Rule::new(EndOfInput)
}

pub fn flush<S, V>() -> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    Rule::new(Flush)
}

pub fn fail<S, V>() -> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    Rule::new(Fail)
}

pub fn null<S, V>() -> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    Rule::new(Null)
}

pub fn nulls<S, V>() -> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    Rule::new(NullSequence)
}

pub fn code<S, V, D, F>(description: D, action: F) -> Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
    D: Into<String>,
    F: Fn(&mut Stream<S>, &[V]) -> Result<MatchResult<V>> + Send + Sync + 'static,
{
    Rule::new(Code::new(description, action))
}

impl<V: MatchValue<TextSource>> From<&str> for Rule<TextSource, V> {
    fn from(pattern: &str) -> Self {
        Rule::new(Verbatim::text(pattern))
    }
}

impl<V: MatchValue<TextSource>> From<String> for Rule<TextSource, V> {
    fn from(pattern: String) -> Self {
        Rule::new(Verbatim::text(&pattern))
    }
}

impl<V: MatchValue<TextSource>> From<char> for Rule<TextSource, V> {
    fn from(ch: char) -> Self {
        Rule::new(Verbatim::text(ch.encode_utf8(&mut [0; 4])))
    }
}

impl<V: MatchValue<TextSource>> From<RangeInclusive<char>> for Rule<TextSource, V> {
    fn from(range: RangeInclusive<char>) -> Self {
        Rule::new(Atom::range(range))
    }
}

impl<S, V, R> Add<R> for Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
    R: Into<Rule<S, V>>,
{
    type Output = Rule<S, V>;

    fn add(self, rhs: R) -> Rule<S, V> {
        let items = self.term().sequence_items().map(<[_]>::to_vec);
        let mut items = items.unwrap_or_else(|| vec![self]);
        items.push(rhs.into());
        Rule::new(Sequence::new(items))
    }
}

impl<S, V, R> BitOr<R> for Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
    R: Into<Rule<S, V>>,
{
    type Output = Rule<S, V>;

    fn bitor(self, rhs: R) -> Rule<S, V> {
        let branches = self.term().alternatives().map(<[_]>::to_vec);
        let mut branches = branches.unwrap_or_else(|| vec![self]);
        branches.push(rhs.into());
        Rule::new(Alternation::new(branches))
    }
}

impl<S, V, M> Mul<M> for Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
    M: Into<Multiplier>,
{
    type Output = Rule<S, V>;

    fn mul(self, multiplier: M) -> Rule<S, V> {
        self.repeat(multiplier)
    }
}

impl<S, V> Not for Rule<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    type Output = Rule<S, V>;

    fn not(self) -> Rule<S, V> {
        self.negative()
    }
}

impl<V: MatchValue<TextSource>> Add<Rule<TextSource, V>> for &str {
    type Output = Rule<TextSource, V>;

    fn add(self, rhs: Rule<TextSource, V>) -> Rule<TextSource, V> {
        Rule::<TextSource, V>::from(self) + rhs
    }
}

impl<V: MatchValue<TextSource>> BitOr<Rule<TextSource, V>> for &str {
    type Output = Rule<TextSource, V>;

    fn bitor(self, rhs: Rule<TextSource, V>) -> Rule<TextSource, V> {
        Rule::<TextSource, V>::from(self) | rhs
    }
}
