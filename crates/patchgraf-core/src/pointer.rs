//! JSON Pointer (RFC 6901) reference-token parsing and escaping.
//!
//! A [`Pointer`] is the compiled, already-unescaped form. The escape
//! placeholders `~0` and `~1` only ever exist in the textual form — once
//! parsed, a token is just a plain string, possibly containing literal `~`
//! or `/` characters (invariant 1 in §3 of the spec).

use std::fmt;

/// The `-` reference token, meaningful only as the last component of an
/// `add` target addressing an array (append).
pub const APPEND: &str = "-";

/// A parsed JSON Pointer: an ordered sequence of unescaped reference tokens.
///
/// The empty sequence denotes the document root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pointer(Vec<String>);

/// A pointer's text did not begin with `/` and was not empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerParseError(pub String);

impl fmt::Display for PointerParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path must start with '/' or be empty, got '{}'", self.0)
    }
}

impl Pointer {
    /// The root pointer (zero tokens).
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Builds a pointer directly from already-unescaped tokens.
    #[must_use]
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    /// Parses the textual form of a JSON Pointer.
    ///
    /// # Errors
    ///
    /// Returns [`PointerParseError`] if `text` is non-empty and does not
    /// start with `/`.
    pub fn parse(text: &str) -> Result<Self, PointerParseError> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        if !text.starts_with('/') {
            return Err(PointerParseError(text.to_string()));
        }
        let tokens = text[1..].split('/').map(unescape_token).collect();
        Ok(Self(tokens))
    }

    /// The pointer's tokens, in order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// `true` for the root pointer.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits into `(parent_tokens, last_token)`. `None` for the root
    /// pointer, which has no parent/last split.
    #[must_use]
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        let (last, prefix) = self.0.split_last()?;
        Some((prefix, last.as_str()))
    }

    /// Returns a new pointer with `token` appended.
    #[must_use]
    pub fn child(&self, token: impl Into<String>) -> Self {
        let mut tokens = self.0.clone();
        tokens.push(token.into());
        Self(tokens)
    }

    /// Renders back to JSON Pointer textual form, re-escaping `~` and `/`.
    #[must_use]
    pub fn to_text(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for token in &self.0 {
            out.push('/');
            out.push_str(&escape_token(token));
        }
        out
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

pub(crate) fn unescape_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.peek() {
                Some('0') => {
                    out.push('~');
                    chars.next();
                }
                Some('1') => {
                    out.push('/');
                    chars.next();
                }
                _ => out.push('~'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_token(token: &str) -> String {
    // Order matters: escape '~' before introducing new '~' sequences for '/'.
    token.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_escapes() {
        let p = Pointer::parse("/a/b~1c/~0d").unwrap();
        assert_eq!(p.tokens(), &["a", "b/c", "~d"]);
    }

    #[test]
    fn empty_text_is_root() {
        assert_eq!(Pointer::parse("").unwrap(), Pointer::root());
    }

    #[test]
    fn rejects_text_without_leading_slash() {
        assert!(Pointer::parse("a/b").is_err());
    }

    #[test]
    fn join_round_trips_escapes() {
        for text in ["/a/b~1c/~0d", "", "/foo", "/~0~1"] {
            let p = Pointer::parse(text).unwrap();
            assert_eq!(p.to_text(), text);
        }
    }

    #[test]
    fn split_last_is_none_for_root() {
        assert!(Pointer::root().split_last().is_none());
    }

    #[test]
    fn split_last_separates_parent_and_token() {
        let p = Pointer::parse("/a/b/c").unwrap();
        let (prefix, last) = p.split_last().unwrap();
        assert_eq!(prefix, &["a".to_string(), "b".to_string()]);
        assert_eq!(last, "c");
    }
}
