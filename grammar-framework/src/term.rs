use crate::error::Result;
use crate::result::MatchResult;
use crate::source::Source;
use crate::stream::Stream;
use std::fmt;
use std::sync::{Arc, Weak};

/// A node of a grammar: a reusable matching rule.
///
/// Terms are immutable once built and are shared read-only between parses,
/// hence the `Send + Sync` bound. `Ok(MatchResult::NoMatch)` is the soft
/// failure channel; `Err` is a hard failure that ends the parse.
pub trait Term<S: Source, V>: Send + Sync + fmt::Debug {
    /// Matches the term at the current stream position.
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>>;

    /// Describes what the term expects, for error messages.
    fn describe(&self) -> String;

    /// The items of a sequence, so that `a + b + c` builds one flat sequence.
    fn sequence_items(&self) -> Option<&[Rule<S, V>]> {
        None
    }

    /// The branches of an alternation, so that `a | b | c` builds one flat alternation.
    fn alternatives(&self) -> Option<&[Rule<S, V>]> {
        None
    }
}

/// Shared handle to a term; grammars are composed out of rules.
pub struct Rule<S: Source, V> {
    term: Arc<dyn Term<S, V>>,
}

impl<S: Source, V> Rule<S, V> {
    pub fn new<T>(term: T) -> Self
    where
        T: Term<S, V> + 'static,
    {
        Self {
            term: Arc::new(term),
        }
    }

    pub(crate) fn from_term(term: Arc<dyn Term<S, V>>) -> Self {
        Self { term }
    }

    /// A handle that does not keep the term alive.
    pub(crate) fn downgrade(&self) -> Weak<dyn Term<S, V>> {
        Arc::downgrade(&self.term)
    }

    pub fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        self.term.matches(stream)
    }

    pub fn describe(&self) -> String {
        self.term.describe()
    }

    pub fn term(&self) -> &dyn Term<S, V> {
        &*self.term
    }

    /// Returns true if both handles point at the same term.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.term, &other.term)
    }
}

impl<S: Source, V> Clone for Rule<S, V> {
    fn clone(&self) -> Self {
        Self {
            term: Arc::clone(&self.term),
        }
    }
}

impl<S: Source, V> fmt::Debug for Rule<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.term.fmt(f)
    }
}
