//! HTTP session provider.
//!
//! A [`Session`] is an authenticated HTTP context bound to one Grafana
//! endpoint: a cookie-carrying client plus the server base URL. It is
//! established once per invocation, threaded through every subsequent call,
//! and dropped when the invocation ends.
//!
//! The login response status is deliberately not checked. If authentication
//! failed, the first real operation fails with whatever status the server
//! returns, and the reconciler reports that verbatim.

use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::error::ProviderError;

/// The status/body pair produced by every Grafana API call.
///
/// Operations never interpret the response themselves; they hand it to the
/// reconciler, which maps the status code onto an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// The HTTP status code of the call.
    pub status: StatusCode,
    /// The raw response body.
    pub body: String,
}

impl ApiResponse {
    /// Drain a reqwest response into a status/body pair.
    pub(crate) async fn read(resp: reqwest::Response) -> Result<Self, ProviderError> {
        let status = resp.status();
        let body = resp.text().await?;
        Ok(Self { status, body })
    }

    /// Parse the body as JSON, if it is JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    user: &'a str,
    password: &'a str,
}

/// An authenticated HTTP context bound to one Grafana endpoint.
pub struct Session {
    client: Client,
    base_url: String,
}

impl Session {
    /// Establish a session by logging into the Grafana endpoint.
    ///
    /// Sends one POST to `{base}/login` with the credentials as a JSON body.
    /// The session cookie Grafana sets on that response is kept in the
    /// client's cookie store and sent on every subsequent call.
    ///
    /// The login status is not validated here; downstream calls fail
    /// naturally if authentication did not succeed.
    pub async fn establish(
        base_url: impl Into<String>,
        user: &str,
        password: &str,
    ) -> Result<Self, ProviderError> {
        let mut base = base_url.into();
        while base.ends_with('/') {
            base.pop();
        }

        let client = Client::builder().cookie_store(true).build()?;

        debug!(endpoint = %base, user = %user, "Establishing session");
        client
            .post(format!("{}/login", base))
            .json(&LoginRequest { user, password })
            .send()
            .await?;

        Ok(Self {
            client,
            base_url: base,
        })
    }

    /// The base URL this session is bound to (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Issue a GET request to an API path relative to the base URL.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ProviderError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        ApiResponse::read(resp).await
    }

    /// Issue a POST request with a JSON body.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ProviderError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let resp = self.client.post(url).json(body).send().await?;
        ApiResponse::read(resp).await
    }

    /// Issue a PUT request with a JSON body.
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ProviderError> {
        let url = self.url(path);
        debug!(%url, "PUT");
        let resp = self.client.put(url).json(body).send().await?;
        ApiResponse::read(resp).await
    }

    /// Issue a DELETE request to an API path relative to the base URL.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ProviderError> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        let resp = self
            .client
            .delete(url)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        ApiResponse::read(resp).await
    }
}
