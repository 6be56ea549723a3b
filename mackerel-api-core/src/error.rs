//! Error taxonomy for a single API invocation.

use crate::params::HttpMethod;

/// A network-level failure reported by the endpoint client: connection
/// refused, DNS, TLS, timeout. Surfaced as-is, never retried.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Everything that can go wrong in one invocation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or contradictory input: no URL derivable, unrecognized HTTP
    /// method, invalid parameter. Raised before any network activity.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request body is neither a structured value nor valid JSON text.
    /// Raised before any network activity.
    #[error("invalid request body: {0}")]
    Validation(String),

    /// Transport failure during the call.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The endpoint answered with a non-success status and no handler was
    /// registered for it. `headers` are stored already redacted, so the
    /// formatted message never leaks the API key.
    #[error("{method} {url} returned status {status} (headers: {}): {body}", format_headers(.headers))]
    Endpoint {
        method: HttpMethod,
        url: String,
        headers: Vec<(String, String)>,
        status: u16,
        body: String,
    },
}

fn format_headers(headers: &[(String, String)]) -> String {
    headers
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}
