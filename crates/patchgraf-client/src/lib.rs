//! A thin async client over the subset of the Grafana HTTP API that
//! `patchgraf-cli` needs: fetching and saving dashboards and datasources.
//!
//! Deliberately shallow: it has no opinion on dashboard or datasource
//! shape, and passes `serde_json::Value` bodies straight through to
//! [`patchgraf_core`].

mod client;
mod credentials;
mod error;

pub use client::{GrafanaClient, GrafanaClientBuilder};
pub use credentials::{Credentials, CredentialsError, SecureString};
pub use error::ClientError;
