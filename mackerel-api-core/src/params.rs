//! Invocation parameters and the HTTP method set accepted by the Mackerel API.

use crate::error::ApiError;

/// Default base URL for the Mackerel REST API.
pub const DEFAULT_SERVER_URL: &str = "https://api.mackerelio.com";

/// Supported HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Connect,
    Patch,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Patch => "PATCH",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "CONNECT" => Ok(HttpMethod::Connect),
            "PATCH" => Ok(HttpMethod::Patch),
            _ => Err(()),
        }
    }
}

/// Parameters for a single API invocation.
///
/// `Default` points at the stock Mackerel endpoint with TLS verification on;
/// fill in `api_key` and either `path` or `url` before calling
/// [`crate::action::run`].
#[derive(Debug, Clone)]
pub struct ApiParams {
    /// Base URL of the API server. Must contain `//` when set.
    pub server_url: Option<String>,
    /// Mackerel API key, sent raw in the `X-Api-Key` header.
    pub api_key: Option<String>,
    /// HTTP method name; case-insensitive, defaults to GET.
    pub http_method: Option<String>,
    /// Endpoint path relative to `server_url`, e.g. `api/v0/org`.
    pub path: Option<String>,
    /// Full endpoint URL, used when `server_url` + `path` don't apply.
    /// Must contain `//` when set.
    pub url: Option<String>,
    /// Structured request payload; defaults to an empty mapping.
    pub body: Option<serde_json::Value>,
    /// Verbatim payload; wins over `body` when present.
    pub raw_body: Option<String>,
    /// Header overrides, merged over the defaults in order.
    pub headers: Vec<(String, String)>,
    /// Verify the server certificate. Turning this off accepts self-signed
    /// or otherwise invalid certificates.
    pub tls_verify: bool,
    /// Request timeout in seconds; no timeout when absent.
    pub timeout: Option<u64>,
}

impl Default for ApiParams {
    fn default() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            api_key: None,
            http_method: None,
            path: None,
            url: None,
            body: None,
            raw_body: None,
            headers: Vec::new(),
            tls_verify: true,
            timeout: None,
        }
    }
}

impl ApiParams {
    /// Check the fields the host would have verified before dispatch,
    /// returning a `Configuration` error for the first invalid one.
    pub fn validate(&self) -> Result<(), ApiError> {
        match &self.api_key {
            Some(key) if !key.is_empty() => {}
            _ => {
                return Err(ApiError::Configuration(
                    "no API key supplied (set `api_key`)".to_string(),
                ))
            }
        }
        if let Some(server_url) = &self.server_url {
            if !server_url.contains("//") {
                return Err(ApiError::Configuration(format!(
                    "please include the protocol in the server URL, e.g. https://api.mackerelio.com, got '{}'",
                    server_url
                )));
            }
        }
        if let Some(url) = &self.url {
            if !url.contains("//") {
                return Err(ApiError::Configuration(format!(
                    "please include the protocol in the URL, got '{}'",
                    url
                )));
            }
        }
        Ok(())
    }

    /// Resolve the configured HTTP method, defaulting to GET.
    pub fn method(&self) -> Result<HttpMethod, ApiError> {
        match &self.http_method {
            None => Ok(HttpMethod::Get),
            Some(name) => name.parse().map_err(|()| {
                ApiError::Configuration(format!("unrecognized HTTP method: {}", name))
            }),
        }
    }
}
