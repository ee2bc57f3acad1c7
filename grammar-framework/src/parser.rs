use crate::error::Result;
use crate::leaf::EndOfInput;
use crate::result::{MatchResult, MatchValue};
use crate::source::Source;
use crate::stream::Stream;
use crate::term::{Rule, Term};
use log::{debug, warn};

/// Runs a grammar over inputs.
///
/// Every call matches on a fresh [`Stream`], so one parser can serve any
/// number of parses, concurrently from several threads.
#[derive(Debug, Clone)]
pub struct Parser<S: Source, V> {
    root: Rule<S, V>,
}

impl<S, V> Parser<S, V>
where
    S: Source,
    V: MatchValue<S>,
{
    /// Creates a parser for the grammar rooted at `root`.
    pub fn new(root: Rule<S, V>) -> Self {
        Self { root }
    }

    /// Returns the root rule.
    pub fn root(&self) -> &Rule<S, V> {
        &self.root
    }

    /// Matches the root once from the start of `source`.
    ///
    /// The root runs outside any speculative region, so a failure anywhere
    /// that no alternative can absorb is returned as an error. Trailing
    /// input is left unread.
    pub fn parse<I: Into<S>>(&self, source: I) -> Result<MatchResult<V>> {
        let mut stream = Stream::new(source.into());
        debug!("parse: {} elements", stream.source().len());
        let result = self.root.matches(&mut stream)?;
        debug!("parse: stopped at {}", stream.position());
        Ok(result)
    }

    /// Like [`parse`](Self::parse), but the root must consume the whole input.
    pub fn parse_complete<I: Into<S>>(&self, source: I) -> Result<MatchResult<V>> {
        let mut stream = Stream::new(source.into());
        let result = self.root.matches(&mut stream)?;
        if result.is_match() && !Term::<S, V>::matches(&EndOfInput, &mut stream)?.is_match() {
            return Ok(MatchResult::NoMatch);
        }
        Ok(result)
    }

    /// Matches the root repeatedly until the input is exhausted and returns
    /// the values produced.
    ///
    /// Stops early, with a warning, when a match makes no progress or the
    /// root does not match.
    pub fn parse_all<I: Into<S>>(&self, source: I) -> Result<Vec<V>> {
        let mut stream = Stream::new(source.into());
        let mut values = Vec::new();
        while !stream.is_eof() {
            let before = stream.position();
            let result = self.root.matches(&mut stream)?;
            if stream.position() == before {
                warn!("parse_all: no progress at index {before}");
                break;
            }
            match result {
                MatchResult::NoMatch => {
                    warn!("parse_all: no match at index {before}");
                    break;
                }
                MatchResult::Empty => {}
                MatchResult::Value(value) => values.push(value),
            }
        }
        Ok(values)
    }
}
