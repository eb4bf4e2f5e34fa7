//! Walks a compiled path against a concrete document, expanding `*` and
//! `[?...]` segments into an ordered set of concrete pointers (§4.3).

use crate::path::PathSegment;
use crate::pointer::Pointer;
use crate::selector;
use crate::value::Value;

/// A segment needed to traverse through a pointer that addresses nothing, or
/// a predicate's `=~` literal failed to compile.
#[derive(Debug)]
pub enum ResolveError {
    /// A `*` or `[?...]` segment needed to enumerate the children of this
    /// pointer, but it doesn't address an existing location. Plain literal
    /// segments never trigger this — existence for those is checked only at
    /// application time.
    MissingIntermediate(Pointer),
    /// A `=~` condition's literal failed to compile as a regular expression.
    InvalidRegex(regex::Error),
}

/// Looks up the node addressed by `pointer` within `root`, if any.
#[must_use]
pub fn node_at<'a>(root: &'a Value, pointer: &Pointer) -> Option<&'a Value> {
    let mut current = root;
    for token in pointer.tokens() {
        current = match current {
            Value::Object(_) => current.get(token)?,
            Value::Array(items) => items.get(token.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolves `segments` against `document`, returning every concrete pointer
/// they expand to.
///
/// Literal segments extend every current pointer unconditionally. Wildcard
/// and predicate segments need the node they're expanding to already exist;
/// a non-container node simply contributes no children (not an error), but
/// a wholly missing node is a [`ResolveError::MissingIntermediate`].
///
/// # Errors
///
/// See [`ResolveError`].
pub fn resolve(segments: &[PathSegment], document: &Value) -> Result<Vec<Pointer>, ResolveError> {
    let mut pointers = vec![Pointer::root()];

    for segment in segments {
        pointers = match segment {
            PathSegment::Literal(token) => pointers
                .into_iter()
                .map(|p| p.child(token.clone()))
                .collect(),
            PathSegment::Wildcard => {
                let mut next = Vec::new();
                for pointer in pointers {
                    let node = node_at(document, &pointer)
                        .ok_or_else(|| ResolveError::MissingIntermediate(pointer.clone()))?;
                    for key in node.child_keys() {
                        next.push(pointer.child(key));
                    }
                }
                next
            }
            PathSegment::Predicate(parsed) => {
                let mut next = Vec::new();
                for pointer in pointers {
                    let node = node_at(document, &pointer)
                        .ok_or_else(|| ResolveError::MissingIntermediate(pointer.clone()))?;
                    for key in node.child_keys() {
                        let child_pointer = pointer.child(key);
                        let child = node_at(document, &child_pointer)
                            .expect("child_keys() only yields existing children");
                        if selector::evaluate(parsed, child).map_err(ResolveError::InvalidRegex)? {
                            next.push(child_pointer);
                        }
                    }
                }
                next
            }
        };
    }

    Ok(pointers)
}
