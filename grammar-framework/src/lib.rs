//! Grammar Framework
//!
//! Backtracking (PEG-style) grammar combinators over any random-access
//! input. A grammar is a tree of immutable [`Rule`]s; matching threads a
//! single [`Stream`] through it. Failures under an open speculative region
//! are silent and rewound; failures outside one are located errors.

pub mod builder;
pub mod combinator;
pub mod error;
pub mod leaf;
pub mod parser;
pub mod result;
pub mod source;
pub mod stream;
pub mod term;

pub use builder::{alt, any, code, eof, fail, flush, null, nulls, seq, term, verbatim};
pub use combinator::{
    Alternation, Code, Multiplier, Negative, Pass, Positive, Qualify, Repeat, Sequence,
};
pub use common_framework::{Checkpoint, Position, TextSlice};
pub use error::{Error, Result, SyntaxError};
pub use leaf::{Any, Atom, EndOfInput, Fail, Flush, Lookup, Null, NullSequence, Set, Verbatim};
pub use parser::Parser;
pub use result::{MatchResult, MatchValue, Value};
pub use source::{Item, Selector, Source, TextSource, TokenSource};
pub use stream::Stream;
pub use term::{Rule, Term};
