use common_framework::Position;

/// A located, terminal parse failure.
///
/// Raised when a term fails with no enclosing speculative region left to
/// try something else.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error{}", details(.found, .expected, .location))]
pub struct SyntaxError {
    /// Element index the failing term started at.
    pub index: usize,
    pub position: Position,
    /// Human-readable description of `index` in its source.
    pub location: String,
    /// What was actually read, if anything.
    pub found: Option<String>,
    /// What the failing term wanted.
    pub expected: Option<String>,
}

fn details(found: &Option<String>, expected: &Option<String>, location: &str) -> String {
    let mut text = String::new();
    if let Some(found) = found {
        text.push_str(", found ");
        text.push_str(found);
    }
    if let Some(expected) = expected {
        text.push_str(", expected ");
        text.push_str(expected);
    }
    text.push_str(", at ");
    text.push_str(location);
    text
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A speculative region failed after input it would have to rewind over
    /// was flushed. This is a bug in the grammar, never a parse failure.
    #[error("cannot rewind to index {start}: input was flushed (failed at index {position})")]
    RewindPastFlush { start: usize, position: usize },

    #[error("forward reference is already defined")]
    PassRedefined,

    /// A forward reference was matched after every owner of its target was dropped.
    #[error("forward reference target was dropped")]
    PassDropped,
}

impl Error {
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Error::Syntax(error) => Some(error),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
