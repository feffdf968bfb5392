//! HTTP client for communicating with the Gobii API.
//!
//! Every request carries the `X-Api-Key` and `Content-Type: application/json`
//! headers, is traced to the verbose channel, and fails with
//! [`ApiError::HttpStatus`] when the server answers with a non-success status.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Settings;
use crate::error::ApiError;
use crate::output::Output;
use crate::util::is_json_string;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Transport timeout. Longer than the largest server-side wait.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(960);

/// Body previews in verbose traces are cut at this many characters.
const BODY_PREVIEW_LIMIT: usize = 1000;

/// Per-request options. Defaults to a bodiless GET.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    /// Already serialized request body.
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// A fully buffered response.
#[derive(Debug)]
pub struct ApiResponse {
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|source| ApiError::Decode {
            url: self.url.to_string(),
            source,
        })
    }

    fn is_json(&self) -> bool {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"))
    }
}

/// HTTP client for the Gobii API.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    api_key: String,
    out: Output,
}

impl ApiClient {
    /// Create a client from the normalized settings.
    pub fn new(settings: &Settings, out: Output) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("gobii-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            out,
        })
    }

    /// Resolve an endpoint such as `agents/browser-use` against the base URL.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|source| ApiError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    /// Perform an authenticated request and fail on a non-success status.
    ///
    /// The `X-Api-Key` and `Content-Type` headers always win over caller headers.
    pub async fn base_fetch(
        &self,
        endpoint: &str,
        mut options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint_url(endpoint)?;
        self.out.verbose(format!("Fetching: {}", url));

        let mut key = HeaderValue::from_str(&self.api_key).map_err(|_| ApiError::InvalidApiKey)?;
        key.set_sensitive(true);
        options.headers.insert(API_KEY_HEADER, key);
        options
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self.debug_fetch(url, options).await?;

        if !response.is_ok() {
            return Err(ApiError::HttpStatus {
                status: response.status.as_u16(),
                body: response.text(),
            });
        }

        Ok(response)
    }

    /// Send a request, tracing it before and after to the verbose channel.
    ///
    /// Tracing never changes the outcome: transport errors propagate unchanged
    /// and any status is returned as-is.
    pub async fn debug_fetch(
        &self,
        url: Url,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let RequestOptions {
            method,
            headers,
            body,
        } = options;

        if self.out.is_verbose() {
            self.out.verbose("--- FETCH DEBUG ---");
            self.out.verbose(format!("URL: {}", url));
            self.out.verbose(format!("Method: {}", method));
            self.out.verbose(format!("Headers: {}", format_headers(&headers)));
            if let Some(body) = &body {
                self.out.verbose(format!("Body: {}", preview(&pretty_if_json(body))));
            }
        }

        tracing::debug!(%method, %url, "sending request");
        let started = Instant::now();

        let mut request = self.http.request(method, url.clone()).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let transport_err = |source: reqwest::Error| ApiError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(err) => {
                self.out.verbose(format!("Request failed: {}", err));
                self.out.verbose("--- END FETCH DEBUG ---");
                tracing::debug!(%url, error = %err, "request failed");
                return Err(transport_err(err));
            }
        };

        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(transport_err)?;

        tracing::debug!(
            %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "received response"
        );

        let response = ApiResponse {
            url,
            status,
            headers: resp_headers,
            body: bytes.to_vec(),
        };

        if self.out.is_verbose() {
            self.trace_response(&response);
        }

        Ok(response)
    }

    fn trace_response(&self, response: &ApiResponse) {
        self.out.verbose(format!("Status: {}", response.status));
        self.out.verbose("Response Headers:");
        for (name, value) in &response.headers {
            self.out.verbose(format!(
                "  {}: {}",
                name,
                value.to_str().unwrap_or("<binary>")
            ));
        }
        if response.is_json() {
            self.out.verbose(format!(
                "Response JSON: {}",
                preview(&pretty_if_json(&response.text()))
            ));
        } else {
            self.out
                .verbose(format!("Response Text: {}", preview(&response.text())));
        }
        self.out.verbose("--- END FETCH DEBUG ---");
    }

    /// [`Self::base_fetch`] followed by JSON decoding of the body.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.base_fetch(endpoint, options).await?.json()
    }

    /// Like [`Self::fetch_json`] but always POSTs. The body must already be
    /// serialized.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let options = RequestOptions {
            method: Method::POST,
            ..options
        };
        self.fetch_json(endpoint, options).await
    }

    /// Report whether the request succeeded. Never returns an error; failures
    /// are logged and collapse to `false`.
    pub async fn fetch_success(&self, endpoint: &str, options: RequestOptions) -> bool {
        match self.base_fetch(endpoint, options).await {
            Ok(response) => response.is_ok(),
            Err(err) => {
                tracing::warn!(endpoint, status = ?err.status(), error = %err, "request did not succeed");
                self.out.error(format!("Error fetching: {}", endpoint));
                self.out.error(&err);
                false
            }
        }
    }
}

/// Pretty-print JSON objects and arrays; anything else is returned as-is.
fn pretty_if_json(body: &str) -> String {
    if !is_json_string(body) {
        return body.to_string();
    }
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| body.to_string())
}

fn format_headers(headers: &HeaderMap) -> String {
    let parts: Vec<String> = headers
        .iter()
        .map(|(name, value)| {
            let shown = if name.as_str() == API_KEY_HEADER {
                mask_secret(value.to_str().unwrap_or_default())
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            format!("{}: {}", name, shown)
        })
        .collect();
    format!("{{{}}}", parts.join(", "))
}

/// Hide all but the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

/// Cut a body down to [`BODY_PREVIEW_LIMIT`] characters.
pub fn preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_LIMIT) {
        Some((idx, _)) => format!("{}... [truncated]", &body[..idx]),
        None => body.to_string(),
    }
}
