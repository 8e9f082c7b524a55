//! # API Client
//!
//! Typed HTTP client for the inventory API plus the pieces a front end needs
//! around it: form validation, alert/loading hooks, text rendering and the
//! downloadable report.

pub mod api;
pub mod render;
pub mod report;
pub mod ui;
pub mod validation;

use std::time::Duration;

use reqwest::{
    Client, Method,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use url::Url;

pub use api::{InventarioApi, ProductosApi};
pub use ui::{AlertKind, ClientUi, TerminalUi};

/// Message reported for every transport-level failure
pub const NETWORK_ERROR_MESSAGE: &str =
    "Error de conexión. Verifica que el servidor esté ejecutándose.";

/// Default base URL of the API
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Default per-request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Errors surfaced by [`ApiClient`]
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, timeout or any other transport failure
    #[error("Error de conexión. Verifica que el servidor esté ejecutándose.")]
    Network(#[source] reqwest::Error),
    /// Non-2xx response; `message` is the server's message when it sent one
    #[error("{message}")]
    Api { status: u16, message: String },
    /// Response body was not the expected JSON
    #[error("Respuesta inválida del servidor: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("URL inválida: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// JSON-over-HTTP client bound to one API base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Creates a client for `base_url` with the given request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Url::parse(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Creates a client with the default timeout
    pub fn with_default_timeout(base_url: &str) -> Result<Self, ClientError> {
        Self::new(base_url, Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.request(Method::GET, endpoint, None::<&()>).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, endpoint, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.request(Method::DELETE, endpoint, None::<&()>).await
    }

    async fn request<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = Url::parse(&format!("{}{}", self.base_url, endpoint))?;
        tracing::debug!(%method, %url, "Making request");

        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "API request failed");
            ClientError::Network(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ClientError::Network)?;
        let parsed = serde_json::from_slice::<Value>(&bytes);

        if !status.is_success() {
            let message = parsed
                .ok()
                .as_ref()
                .and_then(|data| data.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Error {}", status.as_u16()));
            tracing::debug!(status = status.as_u16(), %message, "API returned an error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data = parsed.map_err(ClientError::Decode)?;
        serde_json::from_value(data).map_err(ClientError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = ApiClient::with_default_timeout("not a url").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::with_default_timeout("http://localhost:3001/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_error_messages() {
        let err = ClientError::Api {
            status: 404,
            message: "Producto con ID 7 no encontrado".to_string(),
        };
        assert_eq!(err.to_string(), "Producto con ID 7 no encontrado");
    }
}
