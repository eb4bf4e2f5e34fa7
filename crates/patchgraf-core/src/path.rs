//! Compiles a textual path (the wire `path` field of an [`Operation`](crate::Operation))
//! into a sequence of [`PathSegment`]s the resolver can walk.

use crate::pointer::unescape_token;
use crate::selector::{self, ParsedSelector, SelectorParseError};

/// One component of a compiled path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A concrete reference token (already unescaped).
    Literal(String),
    /// `*` — expands to all immediate children.
    Wildcard,
    /// `[?...]` — expands to children satisfying the predicate.
    Predicate(ParsedSelector),
}

/// A path failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathCompileError {
    /// The path did not start with `/` and was not empty, or a `[?...]`
    /// segment was never closed.
    Malformed(String),
    /// A `[?...]` segment's body has the wrong overall shape.
    MalformedSelector(String),
    /// A `[?...]` segment's condition chunk has no recognised comparator.
    MalformedCondition(String),
}

impl From<SelectorParseError> for PathCompileError {
    fn from(e: SelectorParseError) -> Self {
        match e {
            SelectorParseError::Structural(body) => PathCompileError::MalformedSelector(body),
            SelectorParseError::Condition(chunk) => PathCompileError::MalformedCondition(chunk),
        }
    }
}

/// Compiles `text` into a sequence of segments.
///
/// # Errors
///
/// See [`PathCompileError`].
pub fn compile(text: &str) -> Result<Vec<PathSegment>, PathCompileError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    if !text.starts_with('/') {
        return Err(PathCompileError::Malformed(text.to_string()));
    }

    text[1..].split('/').map(compile_segment).collect()
}

fn compile_segment(raw: &str) -> Result<PathSegment, PathCompileError> {
    if raw == "*" {
        return Ok(PathSegment::Wildcard);
    }
    if raw.starts_with("[?") {
        if !raw.ends_with(']') {
            return Err(PathCompileError::Malformed(format!(
                "unterminated selector segment '{raw}'"
            )));
        }
        let body = &raw[2..raw.len() - 1];
        let selector = selector::parse(body)?;
        return Ok(PathSegment::Predicate(selector));
    }
    Ok(PathSegment::Literal(unescape_token(raw)))
}
