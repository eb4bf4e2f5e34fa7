//! Top-level patch processor (§4.6): compiles, resolves, reorders, and
//! applies every operation against a deep-cloned working copy.

use serde::Deserialize;

use crate::error::{EngineError, EngineResult, OpContext};
use crate::operation::{self, ApplyError, OperationKind};
use crate::path::{self, PathCompileError};
use crate::pointer::Pointer;
use crate::resolver::{self, ResolveError};
use crate::value::Value;

/// One element of the patch wire format (§6.1).
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    /// `"add"`, `"remove"`, `"replace"`, or `"test"`.
    pub op: String,
    /// The uncompiled path text.
    pub path: String,
    /// Required for `add`/`replace`/`test`; must be absent for `remove`.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// An ordered sequence of [`Operation`]s.
pub type Patch = Vec<Operation>;

/// Applies `patch` to `document`, returning the transformed document.
///
/// All-or-nothing: `document` is deep-cloned into a working copy before any
/// operation runs; if any operation fails, that error is returned and the
/// working copy is simply dropped, leaving the original untouched.
///
/// # Errors
///
/// See [`EngineError`].
pub fn apply(document: &serde_json::Value, patch: &Patch) -> EngineResult<serde_json::Value> {
    let mut working = Value::from(document);

    for (index, op) in patch.iter().enumerate() {
        apply_one(&mut working, index, op)?;
    }

    Ok(working.into())
}

/// Resolves `path_text` against `document_json` without applying anything,
/// for diagnostics (§6.3). Returns the textual form of every resolved
/// pointer, in application order.
///
/// # Errors
///
/// See [`EngineError`].
pub fn resolve(document_json: &serde_json::Value, path_text: &str) -> EngineResult<Vec<String>> {
    let context = OpContext {
        index: 0,
        path: path_text.to_string(),
    };
    let document = Value::from(document_json);
    let segments = path::compile(path_text).map_err(|e| compile_error(context.clone(), e))?;
    let pointers =
        resolver::resolve(&segments, &document).map_err(|e| resolve_error(context, e))?;
    Ok(pointers.iter().map(Pointer::to_text).collect())
}

fn apply_one(working: &mut Value, index: usize, op: &Operation) -> EngineResult<()> {
    let context = OpContext {
        index,
        path: op.path.clone(),
    };

    let kind = match op.op.as_str() {
        "add" => OperationKind::Add,
        "remove" => OperationKind::Remove,
        "replace" => OperationKind::Replace,
        "test" => OperationKind::Test,
        other => {
            return Err(EngineError::UnsupportedOperation {
                context,
                op: other.to_string(),
            });
        }
    };

    let value_required = !matches!(kind, OperationKind::Remove);
    match (&op.value, value_required) {
        (None, true) => {
            return Err(EngineError::InvalidValueShape {
                context,
                detail: format!("'{}' requires a value", op.op),
            });
        }
        (Some(_), false) => {
            return Err(EngineError::InvalidValueShape {
                context,
                detail: "'remove' must not carry a value".to_string(),
            });
        }
        _ => {}
    }

    let segments = path::compile(&op.path).map_err(|e| compile_error(context.clone(), e))?;
    let pointers =
        resolver::resolve(&segments, working).map_err(|e| resolve_error(context.clone(), e))?;
    let pointers = operation::reorder_for_application(kind, pointers);

    if pointers.is_empty() {
        tracing::trace!(index, op = op.op.as_str(), "operation resolved to zero pointers");
    } else {
        tracing::debug!(
            index,
            op = op.op.as_str(),
            resolved = pointers.len(),
            "processed operation"
        );
    }

    for pointer in &pointers {
        apply_at(working, kind, pointer, op.value.as_ref(), &context)?;
    }

    Ok(())
}

fn apply_at(
    working: &mut Value,
    kind: OperationKind,
    pointer: &Pointer,
    value: Option<&serde_json::Value>,
    context: &OpContext,
) -> EngineResult<()> {
    let result = match kind {
        OperationKind::Add => operation::apply_add(working, pointer, value_of(value)),
        OperationKind::Remove => operation::apply_remove(working, pointer),
        OperationKind::Replace => operation::apply_replace(working, pointer, value_of(value)),
        OperationKind::Test => operation::apply_test(working, pointer, &value_of(value)),
    };
    result.map_err(|e| apply_error(context.clone(), pointer, e))
}

fn value_of(value: Option<&serde_json::Value>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

fn compile_error(context: OpContext, error: PathCompileError) -> EngineError {
    match error {
        PathCompileError::Malformed(detail) => EngineError::MalformedPath { context, detail },
        PathCompileError::MalformedSelector(detail) => {
            EngineError::MalformedSelector { context, detail }
        }
        PathCompileError::MalformedCondition(chunk) => {
            EngineError::MalformedCondition { context, chunk }
        }
    }
}

fn resolve_error(context: OpContext, error: ResolveError) -> EngineError {
    match error {
        ResolveError::MissingIntermediate(pointer) => EngineError::PathNotFound {
            context,
            detail: format!("no value at '{}'", pointer.to_text()),
        },
        ResolveError::InvalidRegex(source) => EngineError::InvalidRegex { context, source },
    }
}

fn apply_error(context: OpContext, pointer: &Pointer, error: ApplyError) -> EngineError {
    match error {
        ApplyError::NotFound(detail) => EngineError::PathNotFound { context, detail },
        ApplyError::TypeError(detail) => EngineError::PathTypeError { context, detail },
        ApplyError::TestFailed => EngineError::TestFailed {
            context,
            pointer: pointer.to_text(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_patch(json: serde_json::Value) -> Patch {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn simple_replace() {
        let doc = json!({"a": {"b": 1}});
        let patch = parse_patch(json!([{"op": "replace", "path": "/a/b", "value": 2}]));
        assert_eq!(apply(&doc, &patch).unwrap(), json!({"a": {"b": 2}}));
    }

    #[test]
    fn append_to_array() {
        let doc = json!({"xs": [1, 2]});
        let patch = parse_patch(json!([{"op": "add", "path": "/xs/-", "value": 3}]));
        assert_eq!(apply(&doc, &patch).unwrap(), json!({"xs": [1, 2, 3]}));
    }

    #[test]
    fn selector_replace_on_panels() {
        let doc = json!({"panels": [
            {"type": "row", "title": "r1"},
            {"type": "graph", "title": "g1"},
            {"type": "row", "title": "r2"}
        ]});
        let patch = parse_patch(json!([
            {"op": "replace", "path": "/panels/[?type=='row']/title", "value": "X"}
        ]));
        assert_eq!(
            apply(&doc, &patch).unwrap(),
            json!({"panels": [
                {"type": "row", "title": "X"},
                {"type": "graph", "title": "g1"},
                {"type": "row", "title": "X"}
            ]})
        );
    }

    #[test]
    fn selector_remove_on_array() {
        let doc = json!({"panels": [
            {"type": "row", "title": "r1"},
            {"type": "graph", "title": "g1"},
            {"type": "row", "title": "r2"}
        ]});
        let patch = parse_patch(json!([
            {"op": "remove", "path": "/panels/[?type=='graph']"}
        ]));
        assert_eq!(
            apply(&doc, &patch).unwrap(),
            json!({"panels": [
                {"type": "row", "title": "r1"},
                {"type": "row", "title": "r2"}
            ]})
        );
    }

    #[test]
    fn wildcard_replace() {
        let doc = json!({"panels": [
            {"type": "row", "title": "r1"},
            {"type": "graph", "title": "g1"},
            {"type": "row", "title": "r2"}
        ]});
        let patch = parse_patch(json!([
            {"op": "replace", "path": "/panels/*/title", "value": "Z"}
        ]));
        let result = apply(&doc, &patch).unwrap();
        for panel in result["panels"].as_array().unwrap() {
            assert_eq!(panel["title"], "Z");
        }
    }

    #[test]
    fn failed_test_aborts_and_leaves_input_untouched() {
        let doc = json!({"a": 1, "b": 2});
        let patch = parse_patch(json!([
            {"op": "replace", "path": "/a", "value": 9},
            {"op": "test", "path": "/b", "value": 99}
        ]));
        let err = apply(&doc, &patch).unwrap_err();
        assert!(matches!(err, EngineError::TestFailed { .. }));
        assert_eq!(doc, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn empty_patch_is_identity() {
        let doc = json!({"a": [1, 2, {"b": true}]});
        let patch = parse_patch(json!([]));
        assert_eq!(apply(&doc, &patch).unwrap(), doc);
    }

    #[test]
    fn add_then_remove_is_identity() {
        let doc = json!({"a": {}});
        let patch = parse_patch(json!([
            {"op": "add", "path": "/a/k", "value": 1},
            {"op": "remove", "path": "/a/k"}
        ]));
        assert_eq!(apply(&doc, &patch).unwrap(), doc);
    }

    #[test]
    fn remove_with_selector_preserves_surviving_order() {
        let doc = json!({"xs": [
            {"keep": true, "n": 1},
            {"keep": false, "n": 2},
            {"keep": true, "n": 3},
            {"keep": false, "n": 4},
            {"keep": true, "n": 5}
        ]});
        let patch = parse_patch(json!([
            {"op": "remove", "path": "/xs/[?keep=='false']"}
        ]));
        let result = apply(&doc, &patch).unwrap();
        let ns: Vec<_> = result["xs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["n"].clone())
            .collect();
        assert_eq!(ns, vec![json!(1), json!(3), json!(5)]);
    }

    #[test]
    fn unsupported_verb_is_rejected() {
        let doc = json!({"a": 1});
        let patch = parse_patch(json!([{"op": "move", "path": "/a", "value": 1}]));
        assert!(matches!(
            apply(&doc, &patch).unwrap_err(),
            EngineError::UnsupportedOperation { .. }
        ));
    }

    #[test]
    fn remove_with_value_is_invalid_shape() {
        let doc = json!({"a": 1});
        let patch = parse_patch(json!([{"op": "remove", "path": "/a", "value": 1}]));
        assert!(matches!(
            apply(&doc, &patch).unwrap_err(),
            EngineError::InvalidValueShape { .. }
        ));
    }

    #[test]
    fn resolve_reports_pointer_text() {
        let doc = json!({"a": {"b": 1, "c": 2}});
        let pointers = resolve(&doc, "/a/*").unwrap();
        assert_eq!(pointers, vec!["/a/b", "/a/c"]);
    }
}
