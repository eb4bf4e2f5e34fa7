//! Error taxonomy for the patch engine.

use std::fmt;

/// Identifies which operation in a [`Patch`](crate::Patch) a failure belongs to.
///
/// Always present: every error the engine returns can be traced back to the
/// operation index that was being processed, and the textual path it was
/// processing, even when the failure happened deep inside path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpContext {
    /// Zero-based index of the operation within the patch.
    pub index: usize,
    /// The operation's original, uncompiled path text.
    pub path: String,
}

impl fmt::Display for OpContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation {} (path '{}')", self.index, self.path)
    }
}

/// Exhaustive error taxonomy for [`crate::apply`] and [`crate::resolve`].
///
/// Every variant carries an [`OpContext`] so callers can report which
/// operation failed; `resolve` (which has no operation index) uses index `0`.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum EngineError {
    /// The path does not begin with `/` and is not empty, or a `[?...]`
    /// segment is unterminated.
    #[display("malformed path at {context}: {detail}")]
    MalformedPath {
        /// Operation context.
        context: OpContext,
        /// Human-readable detail.
        detail: String,
    },

    /// A predicate body failed to parse into a [`crate::ParsedSelector`].
    #[display("malformed selector at {context}: {detail}")]
    MalformedSelector {
        /// Operation context.
        context: OpContext,
        /// Human-readable detail.
        detail: String,
    },

    /// A single condition chunk had no recognised comparator.
    #[display("malformed condition at {context}: '{chunk}' has no recognised comparator")]
    MalformedCondition {
        /// Operation context.
        context: OpContext,
        /// The offending chunk.
        chunk: String,
    },

    /// A regular-expression comparator (`=~`) failed to compile.
    #[display("invalid regex at {context}: {source}")]
    InvalidRegex {
        /// Operation context.
        context: OpContext,
        /// The underlying compilation error.
        source: regex::Error,
    },

    /// An intermediate object key was missing, or an array index was out of
    /// range, during traversal.
    #[display("path not found at {context}: {detail}")]
    PathNotFound {
        /// Operation context.
        context: OpContext,
        /// Human-readable detail (the missing key or out-of-range index).
        detail: String,
    },

    /// Traversal hit a non-container where a container was required, or an
    /// operation addressed an array with a non-index token (or vice versa).
    #[display("path type error at {context}: {detail}")]
    PathTypeError {
        /// Operation context.
        context: OpContext,
        /// Human-readable detail.
        detail: String,
    },

    /// A `test` operation's actual value did not equal the expected value.
    #[display("test failed at {context}: pointer '{pointer}'")]
    TestFailed {
        /// Operation context.
        context: OpContext,
        /// The resolved pointer that was tested.
        pointer: String,
    },

    /// `op` was `move`, `copy`, or any other unrecognised verb.
    #[display("unsupported operation at {context}: '{op}'")]
    UnsupportedOperation {
        /// Operation context.
        context: OpContext,
        /// The unrecognised or rejected verb.
        op: String,
    },

    /// `value` was missing where required (`add`/`replace`/`test`) or
    /// present where forbidden (`remove`).
    #[display("invalid value shape at {context}: {detail}")]
    InvalidValueShape {
        /// Operation context.
        context: OpContext,
        /// Human-readable detail.
        detail: String,
    },
}

impl EngineError {
    /// The operation context every variant carries.
    #[must_use]
    pub fn context(&self) -> &OpContext {
        match self {
            Self::MalformedPath { context, .. }
            | Self::MalformedSelector { context, .. }
            | Self::MalformedCondition { context, .. }
            | Self::InvalidRegex { context, .. }
            | Self::PathNotFound { context, .. }
            | Self::PathTypeError { context, .. }
            | Self::TestFailed { context, .. }
            | Self::UnsupportedOperation { context, .. }
            | Self::InvalidValueShape { context, .. } => context,
        }
    }
}

/// Convenience alias for results produced by the engine.
pub type EngineResult<T> = Result<T, EngineError>;
