use common_framework::{Position, TextSlice};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Random-access input for a [`Stream`](crate::Stream).
///
/// Indices are element indices, not byte offsets. The stream never reads
/// past `len()`, so implementations may assume `index < len()` in
/// `element` and `start <= end <= len()` in `slice`.
pub trait Source: fmt::Debug + Send + Sync + 'static {
    /// A single input element (a character, a token).
    type Element: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// A run of consecutive elements.
    type Slice: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns true if the source has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index`.
    fn element(&self, index: usize) -> Option<Self::Element>;

    /// Returns the elements in `start..end`.
    fn slice(&self, start: usize, end: usize) -> Self::Slice;

    /// Returns the index where the next occurrence of `pattern` at or after `from` starts.
    fn find(&self, pattern: &Self::Slice, from: usize) -> Option<usize>;

    /// Returns the number of elements in `pattern`.
    fn pattern_len(pattern: &Self::Slice) -> usize;

    /// Maps an index to a position for diagnostics.
    fn position(&self, index: usize) -> Position {
        Position::at(1, index + 1, index)
    }

    /// Describes `index` for diagnostics.
    fn location(&self, index: usize) -> String {
        format!("index {} of {}", index, self.len())
    }
}

/// What a single read returns: one element, or a run of elements.
pub enum Item<S: Source> {
    Element(S::Element),
    Slice(S::Slice),
}

impl<S: Source> Clone for Item<S> {
    fn clone(&self) -> Self {
        match self {
            Item::Element(element) => Item::Element(element.clone()),
            Item::Slice(slice) => Item::Slice(slice.clone()),
        }
    }
}

impl<S: Source> PartialEq for Item<S> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::Element(a), Item::Element(b)) => a == b,
            (Item::Slice(a), Item::Slice(b)) => a == b,
            _ => false,
        }
    }
}

impl<S> Eq for Item<S>
where
    S: Source,
    S::Element: Eq,
    S::Slice: Eq,
{
}

impl<S> Hash for Item<S>
where
    S: Source,
    S::Element: Hash,
    S::Slice: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Item::Element(element) => {
                state.write_u8(0);
                element.hash(state);
            }
            Item::Slice(slice) => {
                state.write_u8(1);
                slice.hash(state);
            }
        }
    }
}

impl<S: Source> fmt::Debug for Item<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Element(element) => element.fmt(f),
            Item::Slice(slice) => slice.fmt(f),
        }
    }
}

/// How much a single read takes from the input.
pub enum Selector<S: Source> {
    /// One element.
    Element,
    /// Up to `n` elements, as a slice.
    Length(usize),
    /// Everything up to and including the next occurrence of the pattern,
    /// or the rest of the input if it never occurs.
    Until(S::Slice),
}

impl<S: Source> Clone for Selector<S> {
    fn clone(&self) -> Self {
        match self {
            Selector::Element => Selector::Element,
            Selector::Length(n) => Selector::Length(*n),
            Selector::Until(pattern) => Selector::Until(pattern.clone()),
        }
    }
}

impl<S: Source> fmt::Debug for Selector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Element => f.write_str("Element"),
            Selector::Length(n) => f.debug_tuple("Length").field(n).finish(),
            Selector::Until(pattern) => f.debug_tuple("Until").field(pattern).finish(),
        }
    }
}

impl<S: Source> Default for Selector<S> {
    fn default() -> Self {
        Selector::Element
    }
}

/// Text input addressed by character index.
#[derive(Debug, Clone)]
pub struct TextSource {
    text: Arc<str>,
    // Byte offset of every character, plus the total length.
    offsets: Arc<[usize]>,
}

impl TextSource {
    pub fn new<S: Into<String>>(input: S) -> Self {
        let owned = input.into();
        let offsets: Vec<usize> = owned
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(owned.len()))
            .collect();
        Self {
            text: Arc::from(owned),
            offsets: Arc::from(offsets),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.offsets[index.min(self.len())]
    }

    fn char_index(&self, byte_offset: usize) -> usize {
        self.offsets
            .binary_search(&byte_offset)
            .unwrap_or_else(|insert_at| insert_at)
    }
}

impl From<&str> for TextSource {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

impl From<String> for TextSource {
    fn from(input: String) -> Self {
        Self::new(input)
    }
}

impl Source for TextSource {
    type Element = char;
    type Slice = TextSlice;

    fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    fn element(&self, index: usize) -> Option<char> {
        if index >= self.len() {
            return None;
        }
        self.text[self.byte_offset(index)..].chars().next()
    }

    fn slice(&self, start: usize, end: usize) -> TextSlice {
        let end = end.min(self.len());
        let start = start.min(end);
        TextSlice::new(
            Arc::clone(&self.text),
            self.byte_offset(start),
            self.byte_offset(end),
        )
    }

    fn find(&self, pattern: &TextSlice, from: usize) -> Option<usize> {
        let from_byte = self.byte_offset(from);
        self.text[from_byte..]
            .find(&**pattern)
            .map(|at| self.char_index(from_byte + at))
    }

    fn pattern_len(pattern: &TextSlice) -> usize {
        pattern.char_len()
    }

    fn position(&self, index: usize) -> Position {
        let end = self.byte_offset(index);
        self.text[..end]
            .chars()
            .fold(Position::new(), |position, ch| position.step(ch))
    }

    fn location(&self, index: usize) -> String {
        format!("{} (index {})", self.position(index), index)
    }
}

/// Token input: any array of comparable elements.
#[derive(Debug)]
pub struct TokenSource<T> {
    tokens: Arc<[T]>,
}

impl<T> TokenSource<T> {
    pub fn new<I: Into<Arc<[T]>>>(tokens: I) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }
}

impl<T> Clone for TokenSource<T> {
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<T> From<Vec<T>> for TokenSource<T> {
    fn from(tokens: Vec<T>) -> Self {
        Self::new(tokens)
    }
}

impl<T> Source for TokenSource<T>
where
    T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    type Element = T;
    type Slice = Vec<T>;

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn element(&self, index: usize) -> Option<T> {
        self.tokens.get(index).cloned()
    }

    fn slice(&self, start: usize, end: usize) -> Vec<T> {
        let end = end.min(self.tokens.len());
        self.tokens[start.min(end)..end].to_vec()
    }

    fn find(&self, pattern: &Vec<T>, from: usize) -> Option<usize> {
        (from..=self.tokens.len()).find(|&index| self.tokens[index..].starts_with(pattern))
    }

    fn pattern_len(pattern: &Vec<T>) -> usize {
        pattern.len()
    }
}
