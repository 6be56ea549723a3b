use std::time::Duration;

use mackerel_api_core::client::{EndpointClient, EndpointRequest, RawResponse};
use mackerel_api_core::error::TransportError;
use mackerel_api_core::params::HttpMethod;

/// A default endpoint client using the `reqwest` blocking client.
///
/// The underlying client is built per call: TLS verification and timeout are
/// per-request settings here, and an invocation issues exactly one request.
pub struct ReqwestClient;

impl ReqwestClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointClient for ReqwestClient {
    fn call(&self, request: &EndpointRequest) -> Result<RawResponse, TransportError> {
        let client = reqwest::blocking::Client::builder()
            // follow redirects, e.g. when an endpoint moves
            .redirect(reqwest::redirect::Policy::limited(10))
            // accepts self-signed certificates when tls_verify is off
            .danger_accept_invalid_certs(!request.tls_verify)
            // None also clears the blocking client's 30s default
            .timeout(request.timeout.map(Duration::from_secs))
            .build()
            .map_err(|e| TransportError(format!("failed to build HTTP client: {}", e)))?;

        let mut builder = match request.method {
            HttpMethod::Get => client.get(&request.url),
            HttpMethod::Post => client.post(&request.url),
            HttpMethod::Put => client.put(&request.url),
            HttpMethod::Delete => client.delete(&request.url),
            HttpMethod::Head => client.head(&request.url),
            HttpMethod::Connect => client.request(reqwest::Method::CONNECT, &request.url),
            HttpMethod::Patch => client.patch(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|e| TransportError(format!("request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError(format!("failed to read response body: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}
