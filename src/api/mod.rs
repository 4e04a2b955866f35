//! REST API client.
//!
//! [`ApiClient`] wraps a `reqwest::Client` with the configured base URL and
//! maps every non-success response to a [`ClientError`]. Endpoint groups live
//! in the submodules.

mod curated;
mod lookups;
mod notes;

use std::path::PathBuf;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::errors::{ClientError, Result};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Client for the advising REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    download_dir: PathBuf,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| ClientError::Config(format!("Invalid API key: {}", e)))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let base_url = Url::parse(config.api_base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::Config(format!("Invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "API base URL cannot take a path: {}",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            download_dir: config.download_dir.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Endpoint URL with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and fail on any non-success status.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_status(status, &body);
        if status.is_server_error() {
            tracing::error!("{} {}", response_context(&err), status);
        } else {
            tracing::warn!("{} {}", response_context(&err), status);
        }
        Err(err)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url(segments);
        tracing::debug!("GET {}", url.path());
        self.json(self.http.get(url)).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let url = self.url(segments);
        tracing::debug!("POST {}", url.path());
        self.json(self.http.post(url).json(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url(segments);
        tracing::debug!("POST {}", url.path());
        self.json(self.http.post(url)).await
    }

    async fn post_multipart<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        form: Form,
    ) -> Result<T> {
        let url = self.url(segments);
        tracing::debug!("POST {} (multipart)", url.path());
        self.json(self.http.post(url).multipart(form)).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url(segments);
        tracing::debug!("DELETE {}", url.path());
        self.json(self.http.delete(url)).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<()> {
        let url = self.url(segments);
        tracing::debug!("DELETE {}", url.path());
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

fn response_context(err: &ClientError) -> String {
    format!("Request failed ({}): {}", err.error_code(), err.message())
}
