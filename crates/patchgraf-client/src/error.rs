//! Error taxonomy for [`crate::GrafanaClient`], in the teacher's
//! `derive_more`-derived style (`client/error.rs::ApiClientError`).

use crate::credentials::CredentialsError;

/// Everything that can go wrong talking to a Grafana instance.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ClientError {
    /// The underlying HTTP request failed (network, TLS, timeout).
    Reqwest(reqwest::Error),

    /// A base URL or request URL failed to parse.
    UrlParse(url::ParseError),

    /// No usable credentials were available.
    Credentials(CredentialsError),

    /// The server responded with a non-2xx status.
    #[display("grafana returned {code}: {body}")]
    #[from(skip)]
    Status {
        /// The HTTP status code.
        code: u16,
        /// The raw response body, for diagnostics.
        body: String,
    },

    /// The client builder was missing a required setting (base URL or
    /// credentials).
    #[display("incomplete client configuration: {_0}")]
    #[from(skip)]
    Incomplete(String),
}
