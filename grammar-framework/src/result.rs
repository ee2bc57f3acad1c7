use crate::source::{Item, Source, TextSource};
use std::fmt;

/// The outcome of matching a term at the current stream position.
///
/// `NoMatch` says nothing about where the stream was left; rewinding is the
/// job of the enclosing speculative region, not of the term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<V> {
    /// The term did not match.
    NoMatch,
    /// The term matched but contributes no value.
    Empty,
    /// The term matched and contributes a value.
    Value(V),
}

impl<V> MatchResult<V> {
    /// Returns true for `Empty` and `Value`.
    pub fn is_match(&self) -> bool {
        !matches!(self, MatchResult::NoMatch)
    }

    /// Returns the contributed value, if any.
    pub fn value(&self) -> Option<&V> {
        match self {
            MatchResult::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the result and returns the contributed value, if any.
    pub fn into_value(self) -> Option<V> {
        match self {
            MatchResult::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Maps the contributed value, keeping `NoMatch` and `Empty` as they are.
    pub fn map<U, F>(self, f: F) -> MatchResult<U>
    where
        F: FnOnce(V) -> U,
    {
        match self {
            MatchResult::NoMatch => MatchResult::NoMatch,
            MatchResult::Empty => MatchResult::Empty,
            MatchResult::Value(value) => MatchResult::Value(f(value)),
        }
    }
}

impl<V> From<Option<V>> for MatchResult<V> {
    fn from(value: Option<V>) -> Self {
        value.map_or(MatchResult::NoMatch, MatchResult::Value)
    }
}

impl<V> From<bool> for MatchResult<V> {
    fn from(matched: bool) -> Self {
        if matched {
            MatchResult::Empty
        } else {
            MatchResult::NoMatch
        }
    }
}

/// A value type that grammar terms can produce.
///
/// Every term in one grammar produces the same `V`. Leaves build it from
/// what they read; sequences and repetitions build it from their children's
/// values. Semantic actions are free to return any other shape of `V`.
pub trait MatchValue<S: Source>: Clone + fmt::Debug + Send + Sync + 'static {
    /// Builds a value from a raw read.
    fn from_item(item: Item<S>) -> Self;

    /// Builds a value from an ordered list of child values.
    fn from_list(values: Vec<Self>) -> Self;
}

/// Generic value type: what was read, or a list of such values.
pub enum Value<S: Source> {
    /// A single element read with `Selector::Element`.
    Element(S::Element),
    /// A run of elements read with a length or terminator selector.
    Slice(S::Slice),
    /// The values of a sequence or repetition, in match order.
    List(Vec<Value<S>>),
}

impl<S: Source> Value<S> {
    /// Returns the element, if this is an `Element`.
    pub fn as_element(&self) -> Option<&S::Element> {
        match self {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the slice, if this is a `Slice`.
    pub fn as_slice(&self) -> Option<&S::Slice> {
        match self {
            Value::Slice(slice) => Some(slice),
            _ => None,
        }
    }

    /// Returns the children, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value<S>]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }
}

impl Value<TextSource> {
    /// Concatenates every character and slice in the value, depth first.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        self.push_text(&mut text);
        text
    }

    fn push_text(&self, text: &mut String) {
        match self {
            Value::Element(ch) => text.push(*ch),
            Value::Slice(slice) => text.push_str(slice),
            Value::List(values) => values.iter().for_each(|value| value.push_text(text)),
        }
    }
}

impl<S: Source> MatchValue<S> for Value<S> {
    fn from_item(item: Item<S>) -> Self {
        match item {
            Item::Element(element) => Value::Element(element),
            Item::Slice(slice) => Value::Slice(slice),
        }
    }

    fn from_list(values: Vec<Self>) -> Self {
        Value::List(values)
    }
}

impl<S: Source> Clone for Value<S> {
    fn clone(&self) -> Self {
        match self {
            Value::Element(element) => Value::Element(element.clone()),
            Value::Slice(slice) => Value::Slice(slice.clone()),
            Value::List(values) => Value::List(values.clone()),
        }
    }
}

impl<S: Source> PartialEq for Value<S> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Element(a), Value::Element(b)) => a == b,
            (Value::Slice(a), Value::Slice(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl<S: Source> fmt::Debug for Value<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Element(element) => f.debug_tuple("Element").field(element).finish(),
            Value::Slice(slice) => f.debug_tuple("Slice").field(slice).finish(),
            Value::List(values) => f.debug_list().entries(values).finish(),
        }
    }
}

/// Wraps collected child values: an empty collection is a valueless match.
pub(crate) fn collect<S, V>(values: Vec<V>) -> MatchResult<V>
where
    S: Source,
    V: MatchValue<S>,
{
    if values.is_empty() {
        MatchResult::Empty
    } else {
        MatchResult::Value(V::from_list(values))
    }
}
