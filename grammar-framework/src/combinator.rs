//! Terms that compose other terms.

use crate::error::{Error, Result};
use crate::result::{collect, MatchResult, MatchValue};
use crate::source::Source;
use crate::stream::Stream;
use crate::term::{Rule, Term};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};
use std::sync::{Arc, OnceLock, Weak};

type QualifyAction<V> = Arc<dyn Fn(Option<V>, &[V]) -> MatchResult<V> + Send + Sync>;
type CodeAction<S, V> = Arc<dyn Fn(&mut Stream<S>, &[V]) -> Result<MatchResult<V>> + Send + Sync>;

/// Matches its items one after another.
///
/// Does not speculate: when an item fails, the partial consumption stays
/// for the enclosing region to rewind.
#[derive(Debug)]
pub struct Sequence<S: Source, V> {
    items: Vec<Rule<S, V>>,
}

impl<S: Source, V> Sequence<S, V> {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Rule<S, V>>,
    {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

impl<S, V> Term<S, V> for Sequence<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let mut values = Vec::new();
        for item in &self.items {
            match item.matches(stream)? {
                MatchResult::NoMatch => return Ok(MatchResult::NoMatch),
                MatchResult::Empty => {}
                MatchResult::Value(value) => values.push(value),
            }
        }
        Ok(collect(values))
    }

    fn describe(&self) -> String {
        match self.items.first() {
            Some(first) => format!("a sequence starting with {}", first.describe()),
            None => "an empty sequence".to_string(),
        }
    }

    fn sequence_items(&self) -> Option<&[Rule<S, V>]> {
        Some(&self.items)
    }
}

/// Ordered choice: the first branch that matches wins.
#[derive(Debug)]
pub struct Alternation<S: Source, V> {
    branches: Vec<Rule<S, V>>,
}

impl<S: Source, V> Alternation<S, V> {
    pub fn new<I>(branches: I) -> Self
    where
        I: IntoIterator<Item = Rule<S, V>>,
    {
        Self {
            branches: branches.into_iter().collect(),
        }
    }
}

impl<S, V> Term<S, V> for Alternation<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        for branch in &self.branches {
            let result = stream.speculate(|stream| branch.matches(stream))?;
            if result.is_match() {
                return Ok(result);
            }
        }
        stream.reject(start, || {
            (Some(stream.describe_next()), Some(self.describe()))
        })
    }

    fn describe(&self) -> String {
        "an alternation".to_string()
    }

    fn alternatives(&self) -> Option<&[Rule<S, V>]> {
        Some(&self.branches)
    }
}

/// How many times a [`Repeat`] matches.
///
/// `demand(count)` answers, given `count` matches so far: `Greater` when
/// another match is required, `Equal` when another match is optional and
/// `Less` when matching must stop.
#[derive(Clone)]
pub enum Multiplier {
    Exactly(usize),
    Between { min: usize, max: Option<usize> },
    Custom(Arc<dyn Fn(usize) -> Ordering + Send + Sync>),
}

impl Multiplier {
    pub fn custom<F>(rule: F) -> Self
    where
        F: Fn(usize) -> Ordering + Send + Sync + 'static,
    {
        Multiplier::Custom(Arc::new(rule))
    }

    pub fn demand(&self, count: usize) -> Ordering {
        match self {
            Multiplier::Custom(rule) => rule(count),
            _ => match self.compare(count + 1) {
                // The next match is allowed; it is required if we are still short of the minimum.
                Ordering::Equal => self.compare(count),
                ordering => ordering,
            },
        }
    }

    // The target compared against a match count.
    fn compare(&self, count: usize) -> Ordering {
        match self {
            Multiplier::Exactly(n) => n.cmp(&count),
            Multiplier::Between { min, max } => {
                if count < *min {
                    Ordering::Greater
                } else if max.is_some_and(|max| count > max) {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            }
            Multiplier::Custom(rule) => rule(count),
        }
    }
}

impl fmt::Debug for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Multiplier::Exactly(n) => write!(f, "{n}"),
            Multiplier::Between { min, max: None } => write!(f, "{min}.."),
            Multiplier::Between {
                min,
                max: Some(max),
            } => write!(f, "{min}..={max}"),
            Multiplier::Custom(_) => f.write_str("custom"),
        }
    }
}

impl From<usize> for Multiplier {
    fn from(n: usize) -> Self {
        Multiplier::Exactly(n)
    }
}

impl From<Range<usize>> for Multiplier {
    fn from(range: Range<usize>) -> Self {
        Multiplier::Between {
            min: range.start,
            max: Some(range.end.saturating_sub(1)),
        }
    }
}

impl From<RangeInclusive<usize>> for Multiplier {
    fn from(range: RangeInclusive<usize>) -> Self {
        Multiplier::Between {
            min: *range.start(),
            max: Some(*range.end()),
        }
    }
}

impl From<RangeFrom<usize>> for Multiplier {
    fn from(range: RangeFrom<usize>) -> Self {
        Multiplier::Between {
            min: range.start,
            max: None,
        }
    }
}

impl From<RangeTo<usize>> for Multiplier {
    fn from(range: RangeTo<usize>) -> Self {
        Multiplier::Between {
            min: 0,
            max: Some(range.end.saturating_sub(1)),
        }
    }
}

impl From<RangeToInclusive<usize>> for Multiplier {
    fn from(range: RangeToInclusive<usize>) -> Self {
        Multiplier::Between {
            min: 0,
            max: Some(range.end),
        }
    }
}

impl From<RangeFull> for Multiplier {
    fn from(_: RangeFull) -> Self {
        Multiplier::Between { min: 0, max: None }
    }
}

/// Matches a term repeatedly as directed by a [`Multiplier`].
///
/// Required matches run directly; optional ones speculate and end the
/// repetition on failure. Repeating a term that can match without
/// consuming input under an unbounded multiplier never terminates.
#[derive(Debug)]
pub struct Repeat<S: Source, V> {
    item: Rule<S, V>,
    multiplier: Multiplier,
}

impl<S: Source, V> Repeat<S, V> {
    pub fn new<M: Into<Multiplier>>(item: Rule<S, V>, multiplier: M) -> Self {
        Self {
            item,
            multiplier: multiplier.into(),
        }
    }
}

impl<S, V> Term<S, V> for Repeat<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let mut values = Vec::new();
        let mut count = 0;
        loop {
            let result = match self.multiplier.demand(count) {
                Ordering::Less => break,
                Ordering::Greater => match self.item.matches(stream)? {
                    MatchResult::NoMatch => return Ok(MatchResult::NoMatch),
                    result => result,
                },
                Ordering::Equal => match stream.speculate(|stream| self.item.matches(stream))? {
                    MatchResult::NoMatch => break,
                    result => result,
                },
            };
            count += 1;
            if let MatchResult::Value(value) = result {
                values.push(value);
            }
        }
        Ok(collect(values))
    }

    fn describe(&self) -> String {
        format!("{} repeated {:?} times", self.item.describe(), self.multiplier)
    }
}

/// Shared body of the two syntactic predicates: runs `item` speculatively,
/// always rewinds, and reports whether it matched.
fn lookahead<S, V>(item: &Rule<S, V>, stream: &mut Stream<S>) -> Result<bool>
where
    S: Source,
    V: MatchValue<S>,
{
    let mut matched = false;
    stream.speculate(|stream| {
        matched = item.matches(stream)?.is_match();
        Ok(MatchResult::<V>::NoMatch)
    })?;
    Ok(matched)
}

/// Positive syntactic predicate: matches empty iff its term matches here.
/// Never consumes input.
#[derive(Debug)]
pub struct Positive<S: Source, V> {
    item: Rule<S, V>,
}

impl<S: Source, V> Positive<S, V> {
    pub fn new(item: Rule<S, V>) -> Self {
        Self { item }
    }
}

impl<S, V> Term<S, V> for Positive<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        if lookahead(&self.item, stream)? {
            return Ok(MatchResult::Empty);
        }
        stream.reject(start, || {
            (Some(stream.describe_next()), Some(self.describe()))
        })
    }

    fn describe(&self) -> String {
        format!("a positive syntactic predicate ({})", self.item.describe())
    }
}

/// Negative syntactic predicate: matches empty iff its term does not match
/// here. Never consumes input.
#[derive(Debug)]
pub struct Negative<S: Source, V> {
    item: Rule<S, V>,
}

impl<S: Source, V> Negative<S, V> {
    pub fn new(item: Rule<S, V>) -> Self {
        Self { item }
    }
}

impl<S, V> Term<S, V> for Negative<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        if !lookahead(&self.item, stream)? {
            return Ok(MatchResult::Empty);
        }
        stream.reject(start, || {
            (Some(stream.describe_next()), Some(self.describe()))
        })
    }

    fn describe(&self) -> String {
        format!("a negative syntactic predicate ({})", self.item.describe())
    }
}

/// Passes a successful match through a semantic action.
///
/// The action receives the value (`None` for a valueless match) and any
/// bound arguments. Returning `NoMatch` rejects the input exactly as if the
/// term itself had failed; anything else becomes the result.
pub struct Qualify<S: Source, V> {
    item: Rule<S, V>,
    action: QualifyAction<V>,
    args: Vec<V>,
}

impl<S: Source, V> Qualify<S, V> {
    pub fn new<F>(item: Rule<S, V>, action: F) -> Self
    where
        F: Fn(Option<V>) -> MatchResult<V> + Send + Sync + 'static,
    {
        Self::with_args(item, move |value, _args: &[V]| action(value))
    }

    pub fn with_args<F>(item: Rule<S, V>, action: F) -> Self
    where
        F: Fn(Option<V>, &[V]) -> MatchResult<V> + Send + Sync + 'static,
    {
        Self {
            item,
            action: Arc::new(action),
            args: Vec::new(),
        }
    }

    /// Returns a copy sharing the same action with `args` appended to the bound arguments.
    pub fn bind<I>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Clone,
    {
        Self {
            item: self.item.clone(),
            action: Arc::clone(&self.action),
            args: self.args.iter().cloned().chain(args).collect(),
        }
    }
}

impl<S, V> Term<S, V> for Qualify<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        let value = match self.item.matches(stream)? {
            MatchResult::NoMatch => return Ok(MatchResult::NoMatch),
            MatchResult::Empty => None,
            MatchResult::Value(value) => Some(value),
        };
        // Kept only when a rejection would become a hard error.
        let witness = (!stream.has_open_speculation()).then(|| value.clone());
        match (self.action)(value, &self.args) {
            MatchResult::NoMatch => stream.reject(start, || {
                (
                    witness.map(|value| format!("{value:?}")),
                    Some("a semantic qualification".to_string()),
                )
            }),
            result => Ok(result),
        }
    }

    fn describe(&self) -> String {
        format!("{} (qualified)", self.item.describe())
    }
}

impl<S: Source, V: fmt::Debug> fmt::Debug for Qualify<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Qualify")
            .field("item", &self.item)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// A fully custom term: the action reads the stream itself.
///
/// The action decides between `Empty` and `Value`; `NoMatch` follows the
/// same soft/hard rule as any other failure.
pub struct Code<S: Source, V> {
    description: String,
    action: CodeAction<S, V>,
    args: Vec<V>,
}

impl<S: Source, V> Code<S, V> {
    pub fn new<D, F>(description: D, action: F) -> Self
    where
        D: Into<String>,
        F: Fn(&mut Stream<S>, &[V]) -> Result<MatchResult<V>> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            action: Arc::new(action),
            args: Vec::new(),
        }
    }

    /// Returns a copy sharing the same action with `args` appended to the bound arguments.
    pub fn bind<I>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Clone,
    {
        Self {
            description: self.description.clone(),
            action: Arc::clone(&self.action),
            args: self.args.iter().cloned().chain(args).collect(),
        }
    }
}

impl<S, V> Term<S, V> for Code<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        let start = stream.position();
        match (self.action)(stream, &self.args)? {
            MatchResult::NoMatch => stream.reject(start, || {
                (Some(stream.describe_next()), Some(self.describe()))
            }),
            result => Ok(result),
        }
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

impl<S: Source, V: fmt::Debug> fmt::Debug for Code<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Code")
            .field("description", &self.description)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// A forward reference, used to close recursive grammars.
///
/// Clones share one slot. The slot is written once while the grammar is
/// built; until then the reference matches empty.
///
/// The slot does not own its target. [`Pass::define`] hands the target
/// back, and that handle (or a rule built from it) is what keeps the
/// grammar alive. References through the `Pass` are back edges only, so a
/// recursive grammar is freed once its last outside handle is dropped.
/// Matching a reference whose target is gone is `Error::PassDropped`.
pub struct Pass<S: Source, V> {
    slot: Arc<OnceLock<Weak<dyn Term<S, V>>>>,
}

impl<S: Source, V> Pass<S, V> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(OnceLock::new()),
        }
    }

    /// Points the reference at `rule` and returns `rule`, which owns the target.
    ///
    /// Fails if the reference already points somewhere.
    pub fn define(&self, rule: Rule<S, V>) -> Result<Rule<S, V>> {
        self.slot
            .set(rule.downgrade())
            .map_err(|_| Error::PassRedefined)?;
        Ok(rule)
    }

    /// Returns true once [`Pass::define`] has been called.
    pub fn is_defined(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The target, if it is defined and still alive.
    pub fn target(&self) -> Option<Rule<S, V>> {
        self.slot.get().and_then(Weak::upgrade).map(Rule::from_term)
    }
}

impl<S, V> Pass<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    /// A rule that matches through this reference.
    pub fn rule(&self) -> Rule<S, V> {
        Rule::new(self.clone())
    }
}

impl<S: Source, V> Clone for Pass<S, V> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<S: Source, V> Default for Pass<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, V> Term<S, V> for Pass<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    fn matches(&self, stream: &mut Stream<S>) -> Result<MatchResult<V>> {
        match self.slot.get() {
            Some(target) => match target.upgrade() {
                Some(term) => term.matches(stream),
                None => Err(Error::PassDropped),
            },
            None => Ok(MatchResult::Empty),
        }
    }

    // Does not follow the reference: the target usually contains this term.
    fn describe(&self) -> String {
        "a forward reference".to_string()
    }
}

impl<S: Source, V> fmt::Debug for Pass<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pass")
            .field("defined", &self.is_defined())
            .finish()
    }
}
