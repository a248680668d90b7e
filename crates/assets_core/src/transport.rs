//! The request-response seam between commands and the assets API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    error::AssetError,
    protocol::{ApiRequest, ApiResponse, Method, RequestBody},
};
use tracing::debug;
use url::Url;

use crate::config::AssetsSettings;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one exchange. Only network-level failures are `Err`; HTTP error
    /// statuses come back as an `ApiResponse` for the caller to classify.
    async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, AssetError>;
}

pub struct ReqwestTransport {
    http: Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid api base url '{base_url}'"))?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &AssetsSettings) -> Result<Self> {
        Self::new(&settings.api_base_url, settings.request_timeout())
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, AssetError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| AssetError::network(format!("invalid request path: {e}")))?;
        debug!(method = %request.method, %url, "sending assets api request");

        let mut builder = self
            .http
            .request(Self::method(request.method), url)
            .query(&request.query);
        builder = match request.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::File(file)) => {
                let mut part = Part::bytes(file.bytes).file_name(file.name);
                if let Some(mime_type) = file.mime_type {
                    part = part
                        .mime_str(&mime_type)
                        .map_err(|e| AssetError::network(e.to_string()))?;
                }
                builder.multipart(Form::new().part("file", part))
            }
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| AssetError::network(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AssetError::network(e.to_string()))?;

        Ok(ApiResponse::new(status, parse_body(&bytes)))
    }
}

/// Non-JSON bodies (e.g. an HTML error page) are kept as a string.
fn parse_body(bytes: &[u8]) -> serde_json::Value {
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
