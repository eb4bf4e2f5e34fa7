//! Lexes and parses a predicate body into a [`ParsedSelector`].

use std::fmt;

/// A condition's comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `==` — textual equality.
    Eq,
    /// `!=` — textual inequality.
    Ne,
    /// `=~` — start-anchored regex match.
    Regex,
    /// ` in ` — substring containment.
    In,
}

/// A single `key OP literal` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// The object field name to test.
    pub key: String,
    /// The comparator.
    pub comparator: Comparator,
    /// The (already quote-stripped) literal to compare against.
    pub literal: String,
}

/// `&&` / `||`, combined strictly left-to-right (§4.4) — no precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `&&`
    And,
    /// `||`
    Or,
}

/// A non-empty flat sequence alternating [`Condition`] and [`LogicalOp`],
/// always beginning and ending with a `Condition` (invariant 3 in §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    pub(crate) first: Condition,
    pub(crate) rest: Vec<(LogicalOp, Condition)>,
}

impl ParsedSelector {
    /// Iterates conditions in order: the leading condition, then each
    /// `(operator, condition)` pair.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, c)| c))
    }
}

/// A predicate body failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorParseError {
    /// The body's overall shape is wrong — doesn't alternate condition/
    /// operator/condition/..., or is empty.
    Structural(String),
    /// A single condition chunk has no recognised comparator.
    Condition(String),
}

impl fmt::Display for SelectorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorParseError::Structural(body) => write!(f, "malformed selector: '{body}'"),
            SelectorParseError::Condition(chunk) => {
                write!(f, "condition has no recognised comparator: '{chunk}'")
            }
        }
    }
}

/// Parses the body of a `[?...]` segment (brackets and `?` already removed).
///
/// # Errors
///
/// Returns [`SelectorParseError::Structural`] if the body doesn't alternate
/// condition/operator/condition/...; [`SelectorParseError::Condition`] if
/// any chunk has no recognised comparator.
pub fn parse(body: &str) -> Result<ParsedSelector, SelectorParseError> {
    let chunks = split_logical(body);
    let mut chunks = chunks.into_iter();

    let Some(Term::Chunk(first_chunk)) = chunks.next() else {
        return Err(SelectorParseError::Structural(body.to_string()));
    };
    let first = parse_condition(&first_chunk)?;

    let mut rest = Vec::new();
    loop {
        match chunks.next() {
            None => break,
            Some(Term::Op(op)) => {
                let Some(Term::Chunk(chunk)) = chunks.next() else {
                    return Err(SelectorParseError::Structural(body.to_string()));
                };
                rest.push((op, parse_condition(&chunk)?));
            }
            Some(Term::Chunk(_)) => {
                return Err(SelectorParseError::Structural(body.to_string()));
            }
        }
    }

    Ok(ParsedSelector { first, rest })
}

enum Term {
    Chunk(String),
    Op(LogicalOp),
}

/// Splits on whitespace-surrounded `&&`/`||`, preserving their order,
/// mirroring `re.split(r'\s*(&&|\|\|)\s*', selector)`.
fn split_logical(body: &str) -> Vec<Term> {
    let mut terms = Vec::new();
    let mut rest = body;
    loop {
        match find_next_op(rest) {
            Some((pos, op, op_len)) => {
                terms.push(Term::Chunk(rest[..pos].trim_end().to_string()));
                terms.push(Term::Op(op));
                rest = rest[pos + op_len..].trim_start();
            }
            None => {
                terms.push(Term::Chunk(rest.to_string()));
                break;
            }
        }
    }
    terms
}

fn find_next_op(s: &str) -> Option<(usize, LogicalOp, usize)> {
    let and_pos = s.find("&&");
    let or_pos = s.find("||");
    match (and_pos, or_pos) {
        (Some(a), Some(o)) if a < o => Some((a, LogicalOp::And, 2)),
        (Some(_), Some(o)) => Some((o, LogicalOp::Or, 2)),
        (Some(a), None) => Some((a, LogicalOp::And, 2)),
        (None, Some(o)) => Some((o, LogicalOp::Or, 2)),
        (None, None) => None,
    }
}

const COMPARATORS: &[(&str, Comparator)] = &[
    ("==", Comparator::Eq),
    ("!=", Comparator::Ne),
    ("=~", Comparator::Regex),
];

/// Finds the comparator occupying the earliest position in `chunk`, not the
/// first comparator *kind* tried — the literal half of a condition may
/// itself contain `==`/`!=`/`=~` text (e.g. `name=~'A==B'`), and since the
/// key never contains comparator characters, the real operator is always
/// whichever candidate starts first.
fn parse_condition(chunk: &str) -> Result<Condition, SelectorParseError> {
    let mut earliest: Option<(usize, usize, Comparator)> = None;
    for (text, comparator) in COMPARATORS {
        if let Some(idx) = chunk.find(text) {
            if earliest.is_none_or(|(e_idx, ..)| idx < e_idx) {
                earliest = Some((idx, text.len(), *comparator));
            }
        }
    }
    if let Some(idx) = chunk.find(" in ") {
        if earliest.is_none_or(|(e_idx, ..)| idx < e_idx) {
            earliest = Some((idx, " in ".len(), Comparator::In));
        }
    }

    let Some((idx, len, comparator)) = earliest else {
        return Err(SelectorParseError::Condition(chunk.trim().to_string()));
    };
    let key = chunk[..idx].trim().to_string();
    let literal = strip_quotes(chunk[idx + len..].trim());
    Ok(Condition {
        key,
        comparator,
        literal,
    })
}

fn strip_quotes(s: &str) -> String {
    let mut chars = s.chars();
    match (chars.next(), chars.next_back()) {
        (Some(a @ ('\'' | '"')), Some(b)) if a == b && s.len() >= 2 => {
            s[1..s.len() - 1].to_string()
        }
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_condition() {
        let sel = parse("type=='row'").unwrap();
        assert_eq!(sel.first.key, "type");
        assert_eq!(sel.first.comparator, Comparator::Eq);
        assert_eq!(sel.first.literal, "row");
        assert!(sel.rest.is_empty());
    }

    #[test]
    fn parses_double_quoted_literal() {
        let sel = parse("type==\"row\"").unwrap();
        assert_eq!(sel.first.literal, "row");
    }

    #[test]
    fn parses_and_chain_left_to_right() {
        let sel = parse("type=='row' && title=='x' && id!='3'").unwrap();
        assert_eq!(sel.rest.len(), 2);
        assert_eq!(sel.rest[0].0, LogicalOp::And);
        assert_eq!(sel.rest[1].1.comparator, Comparator::Ne);
    }

    #[test]
    fn parses_or_and_in_and_regex() {
        let sel = parse("a=~'^foo' || b in 'haystack'").unwrap();
        assert_eq!(sel.first.comparator, Comparator::Regex);
        assert_eq!(sel.rest[0].0, LogicalOp::Or);
        assert_eq!(sel.rest[0].1.comparator, Comparator::In);
    }

    #[test]
    fn rejects_chunk_without_comparator() {
        assert!(parse("type").is_err());
        assert!(parse("type=='row' && bogus").is_err());
    }

    #[test]
    fn unquoted_literal_is_kept_verbatim() {
        let sel = parse("count==3").unwrap();
        assert_eq!(sel.first.literal, "3");
    }

    #[test]
    fn comparator_lookalike_inside_literal_does_not_hijack_the_operator() {
        let sel = parse("name=~'A==B'").unwrap();
        assert_eq!(sel.first.key, "name");
        assert_eq!(sel.first.comparator, Comparator::Regex);
        assert_eq!(sel.first.literal, "A==B");
    }
}
