//! Single-attempt JSON-over-HTTP client with gzip and a request timeout.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use civicfix_core::errors::UpstreamError;

/// Longest body excerpt carried in errors and logs.
const MAX_BODY_EXCERPT: usize = 2_048;

/// Configuration for one upstream service.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Service name used in errors and logs.
    pub service: String,
    /// Base URL, without a trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpClientConfig {
    pub fn new(service: &str, base_url: &str, timeout: Duration) -> Self {
        Self {
            service: service.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

/// Thin wrapper over a pooled `reqwest::Client`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e| UpstreamError::Unreachable {
                service: config.service.clone(),
                reason: format!("client build failed: {e}"),
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn service(&self) -> &str {
        &self.config.service
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.config.base_url.clone()
        } else {
            format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
        }
    }

    /// POST a JSON body and parse a JSON response.
    pub async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, UpstreamError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(request).await
    }

    /// GET with query parameters and parse a JSON response.
    pub async fn get_json<Resp>(&self, path: &str, query: &[(&str, String)]) -> Result<Resp, UpstreamError>
    where
        Resp: DeserializeOwned,
    {
        let request = self.client.get(self.url(path)).query(query);
        self.execute(request).await
    }

    /// POST with one extra header, e.g. an API key.
    pub async fn post_json_with_header<Req, Resp>(
        &self,
        path: &str,
        header: (&str, &str),
        body: &Req,
    ) -> Result<Resp, UpstreamError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.url(path))
            .header(header.0, header.1)
            .json(body);
        self.execute(request).await
    }

    async fn execute<Resp: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Resp, UpstreamError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        parse_body(&self.config.service, status, &body)
    }

    fn transport_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout {
                service: self.config.service.clone(),
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else {
            UpstreamError::Unreachable {
                service: self.config.service.clone(),
                reason: err.to_string(),
            }
        }
    }
}

/// Map a raw HTTP response to a typed payload. Non-2xx becomes
/// `Status`; a 2xx body that does not match the schema becomes
/// `InvalidResponse` and is logged in full for offline inspection.
pub fn parse_body<Resp: DeserializeOwned>(
    service: &str,
    status: u16,
    body: &str,
) -> Result<Resp, UpstreamError> {
    if !(200..300).contains(&status) {
        return Err(UpstreamError::Status {
            service: service.to_string(),
            status,
            body: excerpt(body),
        });
    }
    serde_json::from_str(body).map_err(|e| {
        warn!(service, error = %e, raw_body = %body, "upstream returned a payload that does not match its schema");
        UpstreamError::InvalidResponse {
            service: service.to_string(),
            reason: e.to_string(),
        }
    })
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
