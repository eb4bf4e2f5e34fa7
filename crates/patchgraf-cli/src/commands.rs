//! Subcommand implementations, grounded in `migrafana/src/cli/main.py`'s
//! `dashboard`, `datasource`, and `ls_datasources` commands.

use patchgraf_client::{Credentials, GrafanaClient};

use crate::cli::TargetArgs;
use crate::error::CliError;
use crate::patchfile;

fn client_for(url: &str, credentials: &Credentials) -> Result<GrafanaClient, CliError> {
    Ok(GrafanaClient::builder()
        .base_url(url)?
        .credentials(credentials.clone())
        .build()?)
}

/// `patchgraf dashboard` (`main.py::dashboard`): fetch, patch the
/// `dashboard` sub-object, push to `--dest`.
///
/// # Errors
///
/// See [`CliError`].
pub async fn dashboard(target: TargetArgs, credentials: &Credentials) -> Result<(), CliError> {
    let patch = patchfile::load(&target.patch)?;
    let source = client_for(&target.src, credentials)?;

    tracing::info!(uid = target.uid.as_str(), src = target.src.as_str(), "fetching dashboard");
    let mut envelope = source.get_dashboard(&target.uid).await?;
    if !envelope.is_object() {
        return Err(CliError::UnexpectedResponse(format!(
            "dashboard envelope for '{}' was not a JSON object",
            target.uid
        )));
    }
    let inner = envelope
        .get("dashboard")
        .cloned()
        .unwrap_or_else(|| envelope.clone());
    let updated = patchgraf_core::apply(&inner, &patch)?;
    envelope["dashboard"] = updated;

    tracing::info!(uid = target.uid.as_str(), dest = target.dest.as_str(), "pushing patched dashboard");
    let destination = client_for(&target.dest, credentials)?;
    destination.update_dashboard(envelope).await?;
    Ok(())
}

/// `patchgraf datasource` (`main.py::datasource`): fetch, patch, push to
/// `--dest`.
///
/// # Errors
///
/// See [`CliError`].
pub async fn datasource(target: TargetArgs, credentials: &Credentials) -> Result<(), CliError> {
    let patch = patchfile::load(&target.patch)?;
    let source = client_for(&target.src, credentials)?;

    tracing::info!(uid = target.uid.as_str(), src = target.src.as_str(), "fetching datasource");
    let current = source.get_datasource(&target.uid).await?;
    let updated = patchgraf_core::apply(&current, &patch)?;

    tracing::info!(uid = target.uid.as_str(), dest = target.dest.as_str(), "pushing patched datasource");
    let destination = client_for(&target.dest, credentials)?;
    destination.update_datasource(&target.uid, updated).await?;
    Ok(())
}

/// `patchgraf ls-datasources` (`main.py::ls_datasources`): list datasources,
/// pretty-printed to stdout.
///
/// # Errors
///
/// See [`CliError`].
pub async fn list_datasources(src: &str, credentials: &Credentials) -> Result<(), CliError> {
    let client = client_for(src, credentials)?;
    tracing::info!(src, "listing datasources");
    let datasources = client.list_datasources().await?;
    let rendered = serde_json::to_string_pretty(&datasources)
        .unwrap_or_else(|_| "[]".to_string());
    println!("{rendered}");
    Ok(())
}
