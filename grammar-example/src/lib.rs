//! Grammars built on grammar-framework.
//!
//! - [`calc`]: a recursive arithmetic calculator over text.
//! - [`keyvalue`]: a settings file, tokenized by one grammar over text and
//!   read by a second grammar over the resulting token array.

pub mod calc;
pub mod keyvalue;
