//! Common Framework
//!
//! Primitives shared by the grammar engine and the grammars built on it:
//! source positions, shared text slices and cursor checkpoints.

pub mod checkpoint;
pub mod position;
pub mod text_slice;

pub use checkpoint::Checkpoint;
pub use position::Position;
pub use text_slice::TextSlice;
