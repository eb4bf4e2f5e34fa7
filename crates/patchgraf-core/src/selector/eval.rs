//! Evaluates a [`ParsedSelector`] against a candidate node.

use crate::value::Value;

use super::parser::{Comparator, Condition, LogicalOp, ParsedSelector};

/// Evaluates `selector` against `candidate`.
///
/// Non-`Object` candidates always evaluate to `false` — predicates address
/// named fields, so anything else can't satisfy one (§4.4).
///
/// # Errors
///
/// Returns the underlying [`regex::Error`] if a `=~` condition's literal
/// fails to compile as a regular expression.
pub fn evaluate(selector: &ParsedSelector, candidate: &Value) -> Result<bool, regex::Error> {
    if !matches!(candidate, Value::Object(_)) {
        return Ok(false);
    }

    let mut result = evaluate_single(candidate, &selector.first)?;
    for (op, condition) in &selector.rest {
        let next = evaluate_single(candidate, condition)?;
        result = match op {
            LogicalOp::And => result && next,
            LogicalOp::Or => result || next,
        };
    }
    Ok(result)
}

fn evaluate_single(candidate: &Value, condition: &Condition) -> Result<bool, regex::Error> {
    let Some(field) = candidate.get(&condition.key) else {
        return Ok(false);
    };
    let Some(text) = field.coerce_to_text() else {
        return Ok(false);
    };

    Ok(match condition.comparator {
        Comparator::Eq => text == condition.literal,
        Comparator::Ne => text != condition.literal,
        Comparator::In => text.contains(&condition.literal),
        Comparator::Regex => {
            // Anchored at the start only, matching Python's `re.match`.
            let pattern = format!("^(?:{})", condition.literal);
            regex::Regex::new(&pattern)?.is_match(&text)
        }
    })
}
