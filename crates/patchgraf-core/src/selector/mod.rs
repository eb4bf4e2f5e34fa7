//! Predicate selectors: `[?cond (&&|\|\|) cond ...]`.
//!
//! This is the one piece of the grammar with real parsing complexity — see
//! [`parser`] for the lexing/parsing and [`eval`] for evaluation against a
//! candidate node.

mod eval;
mod parser;

pub use eval::evaluate;
pub use parser::{Comparator, Condition, LogicalOp, ParsedSelector, SelectorParseError, parse};
