use crate::error::{Error, Result, SyntaxError};
use crate::result::MatchResult;
use crate::source::{Item, Selector, Source};
use common_framework::{Checkpoint, Position};
use log::{debug, trace};

/// Backtracking cursor over a [`Source`].
///
/// Besides the read position the stream tracks a single speculative floor:
/// the earliest start among the speculative regions that are currently open
/// and have not been flushed. A stream is created per parse and must not be
/// shared between parses.
#[derive(Debug)]
pub struct Stream<S: Source> {
    source: S,
    position: usize,
    floor: Option<usize>,
    reads: usize,
}

impl<S: Source> Stream<S> {
    /// Creates a stream at the start of `source` with no open speculation.
    pub fn new(source: S) -> Self {
        Self {
            source,
            position: 0,
            floor: None,
            reads: 0,
        }
    }

    /// Returns the input being read.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the current element index.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns true once every element has been read.
    pub fn is_eof(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Returns how many reads have been performed, rewound ones included.
    ///
    /// The engine has no step limit of its own; callers that need to bound
    /// backtracking work can check this from a `Code` term.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Returns the next element without advancing.
    pub fn peek(&self) -> Option<S::Element> {
        self.source.element(self.position)
    }

    /// Reads from the current position and advances past what was read.
    ///
    /// Returns `None` when the stream is already at the end of input.
    pub fn read(&mut self, selector: &Selector<S>) -> Option<Item<S>> {
        let len = self.source.len();
        if self.position >= len {
            return None;
        }
        self.reads += 1;

        let start = self.position;
        let end = match selector {
            Selector::Element => {
                let element = self.source.element(start)?;
                self.position += 1;
                return Some(Item::Element(element));
            }
            Selector::Length(n) => start.saturating_add(*n).min(len),
            Selector::Until(pattern) => match self.source.find(pattern, start) {
                Some(at) => (at + S::pattern_len(pattern)).min(len),
                None => len,
            },
        };
        self.position = end;
        Some(Item::Slice(self.source.slice(start, end)))
    }

    /// Creates a checkpoint of the current position and speculative floor.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.position, self.floor)
    }

    /// Runs `body` inside a speculative region.
    ///
    /// A soft failure rewinds the stream to where the region started. If the
    /// input was flushed since the region opened, rewinding is impossible
    /// and `Error::RewindPastFlush` is returned instead. Hard errors from
    /// `body` propagate after the region is closed, leaving the position
    /// where the error happened.
    pub fn speculate<V, F>(&mut self, body: F) -> Result<MatchResult<V>>
    where
        F: FnOnce(&mut Self) -> Result<MatchResult<V>>,
    {
        let checkpoint = self.checkpoint();
        let start = checkpoint.index();
        if self.floor.map_or(true, |floor| start < floor) {
            self.floor = Some(start);
        }
        trace!("speculate: open at {start}");

        let result = match body(self) {
            Ok(result) => result,
            Err(error) => {
                if self.floor.is_some_and(|floor| floor <= start) {
                    self.floor = checkpoint.floor();
                }
                return Err(error);
            }
        };

        match self.floor {
            Some(floor) if floor <= start => self.floor = checkpoint.floor(),
            _ if !result.is_match() => {
                return Err(Error::RewindPastFlush {
                    start,
                    position: self.position,
                });
            }
            // Flushed inside the region: the commitment extends to every enclosing region.
            _ => {}
        }

        if !result.is_match() {
            trace!("speculate: rewind {} -> {start}", self.position);
            self.position = start;
        }
        Ok(result)
    }

    /// Commits every open speculative region.
    ///
    /// No region open at this point may rewind afterwards; regions opened
    /// later speculate from their own start only.
    pub fn flush(&mut self) {
        debug!("flush at {} (floor was {:?})", self.position, self.floor);
        self.floor = None;
    }

    /// Returns true if a failure here can still be recovered by backtracking.
    pub fn has_open_speculation(&self) -> bool {
        self.floor.is_some()
    }

    /// Describes the current position for diagnostics.
    pub fn location(&self) -> String {
        self.source.location(self.position)
    }

    /// Returns the line and column of the current position.
    pub fn location_position(&self) -> Position {
        self.source.position(self.position)
    }

    /// Reports a failure of a term that started at `at`.
    ///
    /// Under open speculation this is a silent `NoMatch`. Otherwise nobody
    /// is left to retry, so it becomes a located [`SyntaxError`]; `describe`
    /// supplies the found and expected texts and only runs in that case.
    pub fn reject<V, F>(&self, at: usize, describe: F) -> Result<MatchResult<V>>
    where
        F: FnOnce() -> (Option<String>, Option<String>),
    {
        if self.has_open_speculation() {
            return Ok(MatchResult::NoMatch);
        }
        let (found, expected) = describe();
        Err(SyntaxError {
            index: at,
            position: self.source.position(at),
            location: self.source.location(at),
            found,
            expected,
        }
        .into())
    }

    /// Describes the next element, for the `found` part of an error.
    pub fn describe_next(&self) -> String {
        self.peek()
            .map_or_else(|| "end of input".to_string(), |element| format!("{element:?}"))
    }
}
