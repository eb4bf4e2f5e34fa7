//! Top-level CLI error taxonomy, in the teacher's `derive_more`-derived style.

/// Everything that can make the CLI exit non-zero.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum CliError {
    /// A required flag was missing or a flag's value failed to parse.
    #[display("usage error: {_0}")]
    #[from(skip)]
    Usage(String),

    /// The patch argument was neither a readable file nor valid JSON.
    #[display("could not load patch from '{path}': {detail}")]
    #[from(skip)]
    PatchUnreadable {
        /// The `--patch` argument as given.
        path: String,
        /// Human-readable detail.
        detail: String,
    },

    /// The patch file's JSON didn't deserialize into patch operations.
    PatchMalformed(serde_json::Error),

    /// The patch engine rejected an operation.
    Engine(patchgraf_core::EngineError),

    /// Talking to Grafana failed.
    Client(patchgraf_client::ClientError),

    /// Grafana returned a response shaped unlike what the command expects.
    #[display("unexpected response shape: {_0}")]
    #[from(skip)]
    UnexpectedResponse(String),
}

impl CliError {
    /// The process exit code this error should produce (§11).
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::PatchUnreadable { .. }
            | CliError::PatchMalformed(_)
            | CliError::Engine(_)
            | CliError::Client(_)
            | CliError::UnexpectedResponse(_) => 1,
        }
    }
}
