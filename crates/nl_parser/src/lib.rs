//! Parsing and printing for nslocal.
//!
//! Wraps the standard SWC parser and code generator. The transform only
//! needs four things from here: parse text into a module, keep the comments
//! and source map around, and render the (possibly mutated) module back to
//! text.

pub mod emit;
pub mod error;
pub mod parse;

pub use emit::print_module;
pub use error::{EmitError, ParseError};
pub use parse::{parse_source, syntax_for, ParseResult};
