//! Thin async wrapper over the Grafana HTTP API, following
//! `ApiClientBuilder`'s builder shape (`client/builder.rs`).

use reqwest::RequestBuilder;
use url::Url;

use crate::credentials::Credentials;
use crate::error::ClientError;

/// Builds a [`GrafanaClient`].
#[derive(Debug, Default)]
pub struct GrafanaClientBuilder {
    base_url: Option<Url>,
    credentials: Option<Credentials>,
}

impl GrafanaClientBuilder {
    /// Sets the Grafana instance's base URL.
    ///
    /// A trailing `/` is appended if missing — `Url::join` drops the last
    /// path segment of a base lacking one (`https://host/grafana` + `api/x`
    /// resolves to `https://host/api/x`, silently losing `/grafana`), which
    /// would otherwise misroute every request against a Grafana instance
    /// mounted under a sub-path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UrlParse`] if `url` doesn't parse.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self, ClientError> {
        let mut parsed = Url::parse(url.as_ref())?;
        if !parsed.path().ends_with('/') {
            parsed.set_path(&format!("{}/", parsed.path()));
        }
        self.base_url = Some(parsed);
        Ok(self)
    }

    /// Sets the credentials used to authorize every request.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Credentials`] if no credentials were set, or
    /// [`ClientError::UrlParse`] if no base URL was set (via
    /// [`GrafanaClientBuilder::base_url`]).
    pub fn build(self) -> Result<GrafanaClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Incomplete("base_url was never set".to_string()))?;
        let credentials = self
            .credentials
            .ok_or_else(|| ClientError::Incomplete("credentials were never set".to_string()))?;
        Ok(GrafanaClient {
            http: reqwest::Client::new(),
            base_url,
            credentials,
        })
    }
}

/// A thin, authenticated wrapper around the Grafana HTTP API.
///
/// Passes bodies through as `serde_json::Value` untouched — it has no
/// opinion on dashboard or datasource shape, matching `patchgraf-core`'s own
/// stance that the engine doesn't know what a "panel" is.
#[derive(Debug, Clone)]
pub struct GrafanaClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl GrafanaClient {
    /// Starts building a client.
    #[must_use]
    pub fn builder() -> GrafanaClientBuilder {
        GrafanaClientBuilder::default()
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::ApiToken(token) => builder.bearer_auth(token.expose()),
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose()))
            }
        }
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url.join(path).map_err(ClientError::UrlParse)
    }

    async fn send_json(&self, builder: RequestBuilder) -> Result<serde_json::Value, ClientError> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "grafana request failed");
            return Err(ClientError::Status {
                code: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// `GET /api/dashboards/uid/{uid}` (`core/api/dashboard.py::get_by_uid`).
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn get_dashboard(&self, uid: &str) -> Result<serde_json::Value, ClientError> {
        tracing::debug!(uid, "fetching dashboard");
        let url = self.url(&format!("api/dashboards/uid/{uid}"))?;
        self.send_json(self.http.get(url)).await
    }

    /// `POST /api/dashboards/db` (`core/api/dashboard.py::update`). `body`
    /// must be the full dashboard save payload (`{"dashboard": ..., "overwrite": true, ...}`).
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn update_dashboard(
        &self,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ClientError> {
        tracing::debug!("updating dashboard");
        let url = self.url("api/dashboards/db")?;
        self.send_json(self.http.post(url).json(&body)).await
    }

    /// `GET /api/search?type=dash-db` (`core/api/dashboard.py::get_all`).
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn list_dashboards(&self) -> Result<Vec<serde_json::Value>, ClientError> {
        tracing::debug!("listing dashboards");
        let url = self.url("api/search?type=dash-db")?;
        let value = self.send_json(self.http.get(url)).await?;
        as_array(value)
    }

    /// `GET /api/datasources/uid/{uid}` (`core/api/datasource.py::get_datasource`).
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn get_datasource(&self, uid: &str) -> Result<serde_json::Value, ClientError> {
        tracing::debug!(uid, "fetching datasource");
        let url = self.url(&format!("api/datasources/uid/{uid}"))?;
        self.send_json(self.http.get(url)).await
    }

    /// `PUT /api/datasources/uid/{uid}` (`core/api/datasource.py::update_datasource`).
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn update_datasource(
        &self,
        uid: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ClientError> {
        tracing::debug!(uid, "updating datasource");
        let url = self.url(&format!("api/datasources/uid/{uid}"))?;
        self.send_json(self.http.put(url).json(&body)).await
    }

    /// `GET /api/datasources` (`core/api/datasource.py::list_datasources`).
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn list_datasources(&self) -> Result<Vec<serde_json::Value>, ClientError> {
        tracing::debug!("listing datasources");
        let url = self.url("api/datasources")?;
        let value = self.send_json(self.http.get(url)).await?;
        as_array(value)
    }
}

fn as_array(value: serde_json::Value) -> Result<Vec<serde_json::Value>, ClientError> {
    match value {
        serde_json::Value::Array(items) => Ok(items),
        other => Ok(vec![other]),
    }
}
