//! Orchestration: build the request, call the endpoint, classify the
//! response, dispatch failures.

use std::collections::HashMap;

use colored::Colorize;
use serde_json::Value;

use crate::client::{EndpointClient, EndpointRequest};
use crate::error::ApiError;
use crate::params::ApiParams;
use crate::request;

/// Output key for the HTTP status code of the last call.
pub const OUTPUT_STATUS_CODE: &str = "MACKEREL_API_STATUS_CODE";
/// Output key for the raw response body of the last call.
pub const OUTPUT_RESPONSE: &str = "MACKEREL_API_RESPONSE";
/// Output key for the parsed JSON of the last call.
pub const OUTPUT_JSON: &str = "MACKEREL_API_JSON";

/// Composed outcome of a call: status code, raw body, parsed JSON.
///
/// `json` is always present; it falls back to an empty mapping when the body
/// is absent or unparseable.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    pub json: Value,
}

impl ApiResponse {
    fn compose(status: u16, body: String) -> Self {
        let json = request::parse_json(&body).unwrap_or_else(|| Value::Object(Default::default()));
        Self { status, body, json }
    }

    /// Whether the status falls in the success class (200-299).
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Render the response under the three well-known output keys, for
    /// downstream steps that read key-value outputs.
    pub fn outputs(&self) -> Vec<(String, String)> {
        vec![
            (OUTPUT_STATUS_CODE.to_string(), self.status.to_string()),
            (OUTPUT_RESPONSE.to_string(), self.body.clone()),
            (OUTPUT_JSON.to_string(), self.json.to_string()),
        ]
    }
}

/// Key under which a failure handler is registered: an exact status code,
/// or any code without an exact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKey {
    Code(u16),
    Wildcard,
}

/// Failure handlers keyed by status code, with an optional wildcard
/// fallback. Supplied fresh per invocation, never persisted. Handlers
/// receive the composed response; their return value is ignored and the
/// dispatched response is returned to the caller either way.
#[derive(Default)]
pub struct ErrorHandlers<'a> {
    handlers: HashMap<StatusKey, Box<dyn FnMut(&ApiResponse) + 'a>>,
}

impl<'a> ErrorHandlers<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one status code.
    pub fn on(&mut self, status: u16, handler: impl FnMut(&ApiResponse) + 'a) {
        self.handlers.insert(StatusKey::Code(status), Box::new(handler));
    }

    /// Register a fallback handler for any status without an exact match.
    pub fn on_any(&mut self, handler: impl FnMut(&ApiResponse) + 'a) {
        self.handlers.insert(StatusKey::Wildcard, Box::new(handler));
    }

    /// Dispatch `response` to its handler, exact status first, then the
    /// wildcard. Returns whether a handler ran.
    fn dispatch(&mut self, response: &ApiResponse) -> bool {
        let key = if self.handlers.contains_key(&StatusKey::Code(response.status)) {
            StatusKey::Code(response.status)
        } else {
            StatusKey::Wildcard
        };
        match self.handlers.get_mut(&key) {
            Some(handler) => {
                handler(response);
                true
            }
            None => false,
        }
    }
}

/// Call one Mackerel API endpoint and classify the outcome.
///
/// Builds URL, headers and body from `params`, issues the request through
/// `client`, then: a 2xx status invokes `on_success` exactly once (when
/// supplied) and returns the composed response; any other status dispatches
/// to `handlers` and returns the same composed response if a handler ran,
/// else fails with [`ApiError::Endpoint`]. Configuration and validation
/// problems fail before any network activity.
pub fn run<C: EndpointClient>(
    client: &C,
    params: &ApiParams,
    handlers: &mut ErrorHandlers<'_>,
    on_success: Option<&mut dyn FnMut(&ApiResponse)>,
    verbose: bool,
) -> Result<ApiResponse, ApiError> {
    params.validate()?;

    let method = params.method()?;
    let url = request::build_url(
        params.server_url.as_deref(),
        params.path.as_deref(),
        params.url.as_deref(),
    )?;
    let headers = request::build_headers(params.api_key.as_deref(), &params.headers);
    let body = request::build_body(params.body.as_ref(), params.raw_body.as_deref())?;

    if verbose {
        println!("{}", format!("{} : {}", method, url).dimmed());
        for (name, value) in request::redact_headers(&headers) {
            println!("  {}: {}", name.dimmed(), value);
        }
    }

    let raw = client.call(&EndpointRequest {
        method,
        url: url.clone(),
        headers: headers.clone(),
        body: Some(body),
        tls_verify: params.tls_verify,
        timeout: params.timeout,
    })?;

    let response = ApiResponse::compose(raw.status, raw.body);
    if response.is_success() {
        if let Some(callback) = on_success {
            callback(&response);
        }
        return Ok(response);
    }

    if handlers.dispatch(&response) {
        return Ok(response);
    }

    Err(ApiError::Endpoint {
        method,
        url,
        headers: request::redact_headers(&headers),
        status: response.status,
        body: response.body,
    })
}
