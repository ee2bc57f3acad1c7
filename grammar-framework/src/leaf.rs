//! Terms that read directly from the stream.
//!
//! Every leaf reads first and tests afterwards, so a failed leaf has already
//! advanced the stream; undoing that is up to the enclosing speculative
//! region. When the test fails outside speculation the leaf raises a
//! located error naming what it found and what it expected.

use crate::error::Result;
use crate::result::{MatchResult, MatchValue};
use crate::source::{Item, Selector, Source, TextSource};
use crate::stream::Stream;
use crate::term::Term;
use common_framework::TextSlice;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::RangeInclusive;
use std::sync::Arc;

type Predicate<S> = Arc<dyn Fn(&Item<S>) -> bool + Send + Sync>;

fn found<S: Source>(item: &Option<Item<S>>) -> String {
    item.as_ref()
        .map_or_else(|| "end of input".to_string(), |item| format!("{item:?}"))
}

/// Turns a leaf's verdict into a result. An accepted absence (end of input)
/// is a valueless match.
fn conclude<S, V, F>(
    stream: &Stream<S>,
    start: usize,
    item: Option<Item<S>>,
    matched: bool,
    expected: F,
) -> Result<MatchResult<V>>
where
    S: Source,
    V: MatchValue<S>,
    F: FnOnce() -> String,
{
    if matched {
        return Ok(item.map_or(MatchResult::Empty, |item| {
            MatchResult::Value(V::from_item(item))
        }));
    }
    stream.reject(start, || (Some(found(&item)), Some(expected())))
}

/// Matches an exact run of elements.
pub struct Verbatim<S: Source, V> {
    pattern: S::Slice,
    invert: bool,
    _value: PhantomData<fn() -> V>,
}

impl<S: Source, V> Verbatim<S, V> {
    pub fn new(pattern: S::Slice) -> Self {
        Self {
            pattern,
            invert: false,
            _value: PhantomData,
        }
    }

    /// Matches any run of the same length except the pattern.
    pub fn invert(mut self) -> Self {
        self.invert = !self.invert;
        self
    }

    pub fn pattern(&self) -> &S::Slice {
        &self.pattern
    }
}

impl<V> Verbatim<TextSource, V> {
    pub fn text(pattern: &str) -> Self {
        Self::new(TextSlice::from(pattern))
    }
}

impl<S, V> Term<S, V> for Verbatim<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        let item = stream.read(&Selector::Length(S::pattern_len(&self.pattern)));
        // End of input never matches, inverted or not.
        let matched = match &item {
            Some(Item::Slice(slice)) => (*slice == self.pattern) != self.invert,
            _ => false,
        };
        conclude(stream, start, item, matched, || self.describe())
    }

    fn describe(&self) -> String {
        if self.invert {
            format!("anything but {:?}", self.pattern)
        } else {
            format!("{:?}", self.pattern)
        }
    }
}

impl<S: Source, V> fmt::Debug for Verbatim<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verbatim")
            .field("pattern", &self.pattern)
            .field("invert", &self.invert)
            .finish()
    }
}

/// Matches a read that satisfies a predicate.
pub struct Atom<S: Source, V> {
    description: String,
    predicate: Predicate<S>,
    selector: Selector<S>,
    invert: bool,
    _value: PhantomData<fn() -> V>,
}

impl<S: Source, V> Atom<S, V> {
    pub fn new<D, P>(description: D, predicate: P) -> Self
    where
        D: Into<String>,
        P: Fn(&Item<S>) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Arc::new(predicate),
            selector: Selector::Element,
            invert: false,
            _value: PhantomData,
        }
    }

    /// Tests single elements only; slices never satisfy the predicate.
    pub fn element<D, P>(description: D, predicate: P) -> Self
    where
        D: Into<String>,
        P: Fn(&S::Element) -> bool + Send + Sync + 'static,
    {
        Self::new(description, move |item: &Item<S>| match item {
            Item::Element(element) => predicate(element),
            Item::Slice(_) => false,
        })
    }

    /// Matches one element inside `range`.
    pub fn range(range: RangeInclusive<S::Element>) -> Self
    where
        S::Element: PartialOrd,
    {
        let description = format!("{:?}..={:?}", range.start(), range.end());
        Self::element(description, move |element| range.contains(element))
    }

    /// Sets how much input one match reads.
    pub fn with_selector(mut self, selector: Selector<S>) -> Self {
        self.selector = selector;
        self
    }

    /// Reads `length` elements per match.
    pub fn with_length(self, length: usize) -> Self {
        self.with_selector(Selector::Length(length))
    }

    pub fn invert(mut self) -> Self {
        self.invert = !self.invert;
        self
    }
}

impl<V> Atom<TextSource, V> {
    /// Matches one character in a class such as `char::is_alphabetic`.
    pub fn class<D, P>(description: D, predicate: P) -> Self
    where
        D: Into<String>,
        P: Fn(char) -> bool + Send + Sync + 'static,
    {
        Self::element(description, move |ch: &char| predicate(*ch))
    }

    /// Matches a read whose whole text matches `pattern`.
    #[cfg(feature = "regex")]
    pub fn regex(pattern: &str) -> std::result::Result<Self, regex::Error> {
        let anchored = regex::Regex::new(&format!(r"\A(?:{pattern})\z"))?;
        Ok(Self::new(format!("/{pattern}/"), move |item: &Item<TextSource>| {
            match item {
                Item::Element(ch) => anchored.is_match(ch.encode_utf8(&mut [0; 4])),
                Item::Slice(slice) => anchored.is_match(slice),
            }
        }))
    }
}

impl<S, V> Term<S, V> for Atom<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        let item = stream.read(&self.selector);
        let tested = item.as_ref().is_some_and(|item| (self.predicate)(item));
        conclude(stream, start, item, tested != self.invert, || self.describe())
    }

    fn describe(&self) -> String {
        if self.invert {
            format!("anything but {}", self.description)
        } else {
            self.description.clone()
        }
    }
}

impl<S: Source, V> fmt::Debug for Atom<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atom")
            .field("description", &self.description)
            .field("selector", &self.selector)
            .field("invert", &self.invert)
            .finish()
    }
}

/// Matches a read that is a member of a collection.
pub struct Set<S: Source, V> {
    members: Vec<Item<S>>,
    selector: Selector<S>,
    invert: bool,
    _value: PhantomData<fn() -> V>,
}

impl<S: Source, V> Set<S, V> {
    pub fn new<I>(members: I) -> Self
    where
        I: IntoIterator<Item = Item<S>>,
    {
        Self {
            members: members.into_iter().collect(),
            selector: Selector::Element,
            invert: false,
            _value: PhantomData,
        }
    }

    pub fn elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = S::Element>,
    {
        Self::new(elements.into_iter().map(Item::Element))
    }

    /// Sets how much input one match reads.
    pub fn with_selector(mut self, selector: Selector<S>) -> Self {
        self.selector = selector;
        self
    }

    /// Reads `length` elements per match.
    pub fn with_length(self, length: usize) -> Self {
        self.with_selector(Selector::Length(length))
    }

    pub fn invert(mut self) -> Self {
        self.invert = !self.invert;
        self
    }
}

impl<V> Set<TextSource, V> {
    /// One character out of `chars`.
    pub fn chars(chars: &str) -> Self {
        Self::elements(chars.chars())
    }
}

impl<S, V> Term<S, V> for Set<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        let item = stream.read(&self.selector);
        let member = item
            .as_ref()
            .is_some_and(|item| self.members.contains(item));
        conclude(stream, start, item, member != self.invert, || self.describe())
    }

    fn describe(&self) -> String {
        let prefix = if self.invert { "none of" } else { "one of" };
        format!("{prefix} these: {:?}", self.members)
    }
}

impl<S: Source, V> fmt::Debug for Set<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Set")
            .field("members", &self.members)
            .field("selector", &self.selector)
            .field("invert", &self.invert)
            .finish()
    }
}

/// Matches a read that is a key of a table, optionally translating it.
///
/// A key mapped to `None` keeps the read item as the value; a key mapped to
/// `Some(v)` replaces it with `v`.
pub struct Lookup<S: Source, V> {
    table: HashMap<Item<S>, Option<V>>,
    selector: Selector<S>,
    invert: bool,
}

impl<S, V> Lookup<S, V>
where
    S: Source,
    S::Element: Hash + Eq,
    S::Slice: Hash + Eq,
{
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Item<S>, Option<V>)>,
    {
        Self {
            table: entries.into_iter().collect(),
            selector: Selector::Element,
            invert: false,
        }
    }

    /// Single-element keys, each translated to its value.
    pub fn translate<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S::Element, V)>,
    {
        Self::new(
            entries
                .into_iter()
                .map(|(key, value)| (Item::Element(key), Some(value))),
        )
    }

    /// Sets how much input one match reads.
    pub fn with_selector(mut self, selector: Selector<S>) -> Self {
        self.selector = selector;
        self
    }

    /// Reads `length` elements per match.
    pub fn with_length(self, length: usize) -> Self {
        self.with_selector(Selector::Length(length))
    }

    pub fn invert(mut self) -> Self {
        self.invert = !self.invert;
        self
    }
}

impl<S, V> Term<S, V> for Lookup<S, V>
where
    S: Source,
    S::Element: Hash + Eq,
    S::Slice: Hash + Eq,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        let item = stream.read(&self.selector);
        let entry = item.as_ref().and_then(|item| self.table.get(item));
        match (entry, self.invert) {
            (Some(Some(translation)), false) => Ok(MatchResult::Value(translation.clone())),
            (entry, invert) => {
                let matched = entry.is_some() != invert;
                conclude(stream, start, item, matched, || self.describe())
            }
        }
    }

    fn describe(&self) -> String {
        let mut keys: Vec<String> = self.table.keys().map(|key| format!("{key:?}")).collect();
        keys.sort();
        let prefix = if self.invert { "none of" } else { "one of" };
        format!("{prefix} these: [{}]", keys.join(", "))
    }
}

impl<S: Source, V: fmt::Debug> fmt::Debug for Lookup<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookup")
            .field("entries", &self.table.len())
            .field("selector", &self.selector)
            .field("invert", &self.invert)
            .finish()
    }
}

/// Matches whatever is read. The inverted form never matches.
pub struct Any<S: Source, V> {
    selector: Selector<S>,
    invert: bool,
    _value: PhantomData<fn() -> V>,
}

impl<S: Source, V> Any<S, V> {
    pub fn new() -> Self {
        Self {
            selector: Selector::Element,
            invert: false,
            _value: PhantomData,
        }
    }

    /// Sets how much input one match reads.
    pub fn with_selector(mut self, selector: Selector<S>) -> Self {
        self.selector = selector;
        self
    }

    /// Reads `length` elements per match.
    pub fn with_length(self, length: usize) -> Self {
        self.with_selector(Selector::Length(length))
    }

    pub fn invert(mut self) -> Self {
        self.invert = !self.invert;
        self
    }
}

impl<S: Source, V> Default for Any<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, V> Term<S, V> for Any<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        let item = stream.read(&self.selector);
        let matched = !self.invert && item.is_some();
        conclude(stream, start, item, matched, || self.describe())
    }

    fn describe(&self) -> String {
        if self.invert { "nothing" } else { "anything" }.to_string()
    }
}

impl<S: Source, V> fmt::Debug for Any<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Any")
            .field("selector", &self.selector)
            .field("invert", &self.invert)
            .finish()
    }
}

/// Commits every open speculative region; always matches empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flush;

impl<S: Source, V> Term<S, V> for Flush {
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        stream.flush();
        Ok(MatchResult::Empty)
    }

    fn describe(&self) -> String {
        "a flush".to_string()
    }
}

/// Never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fail;

impl<S: Source, V> Term<S, V> for Fail {
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let position = stream.position();
        stream.reject(position, || (None, Some(Term::<S, V>::describe(self))))
    }

    fn describe(&self) -> String {
        "nothing (explicit failure)".to_string()
    }
}

/// Always matches empty without consuming anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Null;

impl<S: Source, V> Term<S, V> for Null {
    fn matches(&self, _stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        Ok(MatchResult::Empty)
    }

    fn describe(&self) -> String {
        "nothing".to_string()
    }
}

/// Always matches an empty list without consuming anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSequence;

impl<S, V> Term<S, V> for NullSequence
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, _stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        Ok(MatchResult::Value(V::from_list(Vec::new())))
    }

    fn describe(&self) -> String {
        "an empty sequence".to_string()
    }
}

/// Matches only at the end of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndOfInput;

impl<S: Source, V> Term<S, V> for EndOfInput {
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        match stream.read(&Selector::Element) {
            None => Ok(MatchResult::Empty),
            Some(item) => stream.reject(start, || {
                (Some(format!("{item:?}")), Some("end of input".to_string()))
            }),
        }
    }

    fn describe(&self) -> String {
        "end of input".to_string()
    }
}
