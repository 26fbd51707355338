//! HTTP access to the annotation server.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use labelui_config::EndpointsConfig;
use labelui_types::{Credentials, Destination, GlobalConfiguration, ProjectSettings};

use crate::collaborators::{AuthFut, AuthService, ConfigurationSource, ServiceFut};
use crate::error::{AuthError, ServiceError};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Session-aware client for one annotation server.
///
/// Cookies set by the server (the session cookie in particular) are kept for
/// the lifetime of the backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
    endpoints: EndpointsConfig,
}

impl HttpBackend {
    pub fn new(base_url: &str, endpoints: EndpointsConfig) -> Result<Self, ServiceError> {
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/'))).map_err(|source| {
            ServiceError::InvalidUrl {
                path: base_url.to_string(),
                source,
            }
        })?;
        let client = Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|source| ServiceError::Transport {
                url: base.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            base,
            endpoints,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an endpoint path against the base URL, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|source| ServiceError::InvalidUrl {
                path: path.to_string(),
                source,
            })
    }

    pub fn destination_url(&self, destination: Destination) -> Result<Url, ServiceError> {
        match destination {
            Destination::Entry => self.endpoint(&self.endpoints.entry),
            Destination::Logout => self.endpoint(&self.endpoints.logout),
        }
    }

    /// Fetch up to `limit` items of the next batch as raw JSON.
    pub async fn next_batch(&self, limit: usize) -> Result<serde_json::Value, ServiceError> {
        let url = self.endpoint(&self.endpoints.next_batch)?;
        let body = serde_json::json!({ "limit": limit });
        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        decode(&url, require_success(&url, response)?).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        decode(&url, require_success(&url, response)?).await
    }

    async fn check_login(&self) -> Result<(), AuthError> {
        let url = self.endpoint(&self.endpoints.login_check)?;
        let response = self
            .client
            .post(url.clone())
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        authorized(response)
    }

    async fn submit_login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let url = self.endpoint(&self.endpoints.login)?;
        let form = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let response = self
            .client
            .post(url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        authorized(response)
    }
}

fn transport(url: &Url, source: reqwest::Error) -> ServiceError {
    ServiceError::Transport {
        url: url.to_string(),
        source,
    }
}

fn require_success(url: &Url, response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!(%url, status = status.as_u16(), "Request rejected");
        Err(ServiceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

fn authorized(response: Response) -> Result<(), AuthError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(AuthError::Unauthorized {
            status: status.as_u16(),
        })
    }
}

async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, ServiceError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| transport(url, source))?;
    serde_json::from_slice(&bytes).map_err(|source| ServiceError::Decode {
        url: url.to_string(),
        source,
    })
}

impl AuthService for HttpBackend {
    fn probe(&self) -> AuthFut<'_> {
        Box::pin(self.check_login())
    }

    fn login<'a>(&'a self, credentials: &'a Credentials) -> AuthFut<'a> {
        Box::pin(self.submit_login(credentials))
    }
}

impl ConfigurationSource for HttpBackend {
    fn load_configuration(&self) -> ServiceFut<'_, GlobalConfiguration> {
        Box::pin(self.get_json(&self.endpoints.configuration))
    }

    fn project_settings(&self) -> ServiceFut<'_, ProjectSettings> {
        Box::pin(self.get_json(&self.endpoints.project_settings))
    }
}
