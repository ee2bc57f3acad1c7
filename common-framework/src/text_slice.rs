use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, Range};
use std::sync::Arc;

/// Text read from an input, or a text pattern.
///
/// Reads share the input's `Arc<str>` and only record a byte range, so
/// slicing never copies. Patterns built from literals own a buffer of their
/// own. Equality and hashing look at the text only, so a read compares
/// equal to a pattern with the same text. Derefs to `str`.
#[derive(Clone)]
pub struct TextSlice {
    text: Arc<str>,
    bytes: Range<usize>,
}

impl TextSlice {
    /// Slices `text` by byte range. The range must lie on character boundaries.
    pub fn new(text: Arc<str>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= text.len());
        debug_assert!(text.is_char_boundary(start) && text.is_char_boundary(end));
        Self {
            text,
            bytes: start..end,
        }
    }

    /// Number of characters, which is how text inputs are indexed.
    pub fn char_len(&self) -> usize {
        self.chars().count()
    }

    /// Byte range inside the text the slice was read from.
    pub fn byte_range(&self) -> Range<usize> {
        self.bytes.clone()
    }
}

impl From<Arc<str>> for TextSlice {
    fn from(text: Arc<str>) -> Self {
        let end = text.len();
        Self::new(text, 0, end)
    }
}

impl From<&str> for TextSlice {
    fn from(text: &str) -> Self {
        Self::from(Arc::<str>::from(text))
    }
}

impl From<String> for TextSlice {
    fn from(text: String) -> Self {
        Self::from(Arc::<str>::from(text))
    }
}

impl Deref for TextSlice {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text[self.bytes.clone()]
    }
}

impl AsRef<str> for TextSlice {
    fn as_ref(&self) -> &str {
        self
    }
}

impl fmt::Display for TextSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl fmt::Debug for TextSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl PartialEq for TextSlice {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl Eq for TextSlice {}

impl PartialEq<&str> for TextSlice {
    fn eq(&self, other: &&str) -> bool {
        &**self == *other
    }
}

impl PartialEq<TextSlice> for &str {
    fn eq(&self, other: &TextSlice) -> bool {
        *self == &**other
    }
}

impl Hash for TextSlice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_shares_the_input() {
        let input: Arc<str> = Arc::from("hello world");
        let slice = TextSlice::new(Arc::clone(&input), 6, 11);
        assert_eq!(slice, "world");
        assert_eq!(slice.byte_range(), 6..11);
        assert_eq!(Arc::strong_count(&input), 2);
    }

    #[test]
    fn test_equality_ignores_buffer_identity() {
        let read = TextSlice::new(Arc::from("xabcx"), 1, 4);
        let pattern = TextSlice::from("abc");
        assert_eq!(read, pattern);
        assert_eq!("abc", read);
    }

    #[test]
    fn test_char_len_counts_characters() {
        let slice = TextSlice::from("héllo");
        assert_eq!(slice.char_len(), 5);
        assert_eq!(slice.len(), 6);
    }

    #[test]
    fn test_debug_quotes_text() {
        assert_eq!(format!("{:?}", TextSlice::from("a\"b")), "\"a\\\"b\"");
        assert_eq!(TextSlice::from("a\"b").to_string(), "a\"b");
    }
}
