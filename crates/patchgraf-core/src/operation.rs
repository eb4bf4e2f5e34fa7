//! Applies a single RFC 6902 operation at a concrete, resolved pointer
//! (§4.5), and the ordering rule for operations that resolved to more than
//! one pointer.

use std::cmp::Ordering;

use crate::pointer::{APPEND, Pointer};
use crate::value::Value;

/// The four operation kinds the engine executes. `move`/`copy` are rejected
/// by the patch processor before reaching this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Inserts or overwrites a value.
    Add,
    /// Deletes an existing value.
    Remove,
    /// Overwrites an existing value.
    Replace,
    /// Asserts an existing value's structural equality to an expected one.
    Test,
}

/// A single resolved-pointer application failed.
#[derive(Debug)]
pub enum ApplyError {
    /// An intermediate object key was missing, or an array index was out of
    /// range.
    NotFound(String),
    /// Traversal hit a non-container where one was required, or an index
    /// addressed a non-array (or a key addressed a non-object).
    TypeError(String),
    /// A `test` found a value that didn't structurally match.
    TestFailed,
}

/// Reorders resolved pointers so array mutations can't invalidate later
/// indices mid-operation (§4.5). Pointers are grouped by their parent prefix:
/// within a group whose last token is an array index, `Remove` applies
/// descending and `Add` applies ascending. Pointers in different groups, or
/// whose last token isn't a plain index (`-`, an object key), keep their
/// resolver-assigned relative order — `sort_by` is stable, so a comparator
/// that returns `Equal` across groups leaves them untouched.
#[must_use]
pub fn reorder_for_application(kind: OperationKind, mut pointers: Vec<Pointer>) -> Vec<Pointer> {
    match kind {
        OperationKind::Remove => {
            pointers.sort_by(|a, b| compare_same_array(a, b).map_or(Ordering::Equal, Ordering::reverse));
            pointers
        }
        OperationKind::Add => {
            pointers.sort_by(|a, b| compare_same_array(a, b).unwrap_or(Ordering::Equal));
            pointers
        }
        OperationKind::Replace | OperationKind::Test => pointers,
    }
}

/// `Some(ordering)` of the trailing indices if `a` and `b` share a parent
/// prefix and both end in a plain numeric index; `None` otherwise.
fn compare_same_array(a: &Pointer, b: &Pointer) -> Option<Ordering> {
    let (prefix_a, last_a) = a.split_last()?;
    let (prefix_b, last_b) = b.split_last()?;
    if prefix_a != prefix_b {
        return None;
    }
    let index_a: usize = last_a.parse().ok()?;
    let index_b: usize = last_b.parse().ok()?;
    Some(index_a.cmp(&index_b))
}

fn navigate_parent<'a>(node: &'a Value, prefix: &[String]) -> Result<&'a Value, ApplyError> {
    let mut current = node;
    for token in prefix {
        current = match current {
            Value::Object(_) => current
                .get(token)
                .ok_or_else(|| ApplyError::NotFound(format!("missing object key '{token}'")))?,
            Value::Array(items) => {
                let index = parse_index(token)?;
                items
                    .get(index)
                    .ok_or_else(|| ApplyError::NotFound(format!("index {index} out of range")))?
            }
            _ => {
                return Err(ApplyError::TypeError(
                    "cannot traverse through a non-container".to_string(),
                ));
            }
        };
    }
    Ok(current)
}

fn navigate_parent_mut<'a>(
    node: &'a mut Value,
    prefix: &[String],
) -> Result<&'a mut Value, ApplyError> {
    let mut current = node;
    for token in prefix {
        current = match current {
            Value::Object(members) => {
                let idx = members
                    .iter()
                    .position(|(k, _)| k == token)
                    .ok_or_else(|| ApplyError::NotFound(format!("missing object key '{token}'")))?;
                &mut members[idx].1
            }
            Value::Array(items) => {
                let index = parse_index(token)?;
                if index >= items.len() {
                    return Err(ApplyError::NotFound(format!("index {index} out of range")));
                }
                &mut items[index]
            }
            _ => {
                return Err(ApplyError::TypeError(
                    "cannot traverse through a non-container".to_string(),
                ));
            }
        };
    }
    Ok(current)
}

fn parse_index(token: &str) -> Result<usize, ApplyError> {
    token
        .parse()
        .map_err(|_| ApplyError::TypeError(format!("'{token}' is not a valid array index")))
}

/// Inserts or overwrites `value` at `pointer` (§4.5 Add).
///
/// # Errors
///
/// See [`ApplyError`].
pub fn apply_add(working: &mut Value, pointer: &Pointer, value: Value) -> Result<(), ApplyError> {
    let Some((prefix, last)) = pointer.split_last() else {
        *working = value;
        return Ok(());
    };
    match navigate_parent_mut(working, prefix)? {
        Value::Object(members) => {
            if let Some(slot) = members.iter_mut().find(|(k, _)| k == last) {
                slot.1 = value;
            } else {
                members.push((last.to_string(), value));
            }
            Ok(())
        }
        Value::Array(items) if last == APPEND => {
            items.push(value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(last)?;
            if index > items.len() {
                return Err(ApplyError::NotFound(format!("index {index} out of range")));
            }
            items.insert(index, value);
            Ok(())
        }
        _ => Err(ApplyError::TypeError(
            "add target's parent is neither an object nor an array".to_string(),
        )),
    }
}

/// Deletes the value at `pointer` (§4.5 Remove).
///
/// # Errors
///
/// See [`ApplyError`].
pub fn apply_remove(working: &mut Value, pointer: &Pointer) -> Result<(), ApplyError> {
    let Some((prefix, last)) = pointer.split_last() else {
        return Err(ApplyError::TypeError(
            "cannot remove the document root".to_string(),
        ));
    };
    match navigate_parent_mut(working, prefix)? {
        Value::Object(members) => {
            let idx = members
                .iter()
                .position(|(k, _)| k == last)
                .ok_or_else(|| ApplyError::NotFound(format!("missing object key '{last}'")))?;
            members.remove(idx);
            Ok(())
        }
        Value::Array(_) if last == APPEND => Err(ApplyError::TypeError(
            "'-' is not a valid remove target".to_string(),
        )),
        Value::Array(items) => {
            let index = parse_index(last)?;
            if index >= items.len() {
                return Err(ApplyError::NotFound(format!("index {index} out of range")));
            }
            items.remove(index);
            Ok(())
        }
        _ => Err(ApplyError::TypeError(
            "remove target's parent is neither an object nor an array".to_string(),
        )),
    }
}

/// Overwrites the value at `pointer` (§4.5 Replace).
///
/// # Errors
///
/// See [`ApplyError`].
pub fn apply_replace(
    working: &mut Value,
    pointer: &Pointer,
    value: Value,
) -> Result<(), ApplyError> {
    let Some((prefix, last)) = pointer.split_last() else {
        *working = value;
        return Ok(());
    };
    match navigate_parent_mut(working, prefix)? {
        Value::Object(members) => {
            let slot = members
                .iter_mut()
                .find(|(k, _)| k == last)
                .ok_or_else(|| ApplyError::NotFound(format!("missing object key '{last}'")))?;
            slot.1 = value;
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(last)?;
            if index >= items.len() {
                return Err(ApplyError::NotFound(format!("index {index} out of range")));
            }
            items[index] = value;
            Ok(())
        }
        _ => Err(ApplyError::TypeError(
            "replace target's parent is neither an object nor an array".to_string(),
        )),
    }
}

/// Asserts the value at `pointer` structurally equals `expected` (§4.5 Test).
///
/// # Errors
///
/// See [`ApplyError`].
pub fn apply_test(working: &Value, pointer: &Pointer, expected: &Value) -> Result<(), ApplyError> {
    let Some((prefix, last)) = pointer.split_last() else {
        return if working.structural_eq(expected) {
            Ok(())
        } else {
            Err(ApplyError::TestFailed)
        };
    };
    let actual = match navigate_parent(working, prefix)? {
        parent @ Value::Object(_) => parent
            .get(last)
            .ok_or_else(|| ApplyError::NotFound(format!("missing object key '{last}'")))?,
        Value::Array(items) => {
            let index = parse_index(last)?;
            items
                .get(index)
                .ok_or_else(|| ApplyError::NotFound(format!("index {index} out of range")))?
        }
        _ => {
            return Err(ApplyError::TypeError(
                "test target's parent is neither an object nor an array".to_string(),
            ));
        }
    };
    if actual.structural_eq(expected) {
        Ok(())
    } else {
        Err(ApplyError::TestFailed)
    }
}
