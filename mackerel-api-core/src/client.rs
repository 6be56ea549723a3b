use crate::error::TransportError;
use crate::params::HttpMethod;

/// A fully built request, ready for dispatch.
#[derive(Debug, Clone)]
pub struct EndpointRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// When false the client must accept invalid certificates. A security
    /// escape hatch for self-signed test servers, not a default.
    pub tls_verify: bool,
    /// Timeout in seconds; no timeout when absent.
    pub timeout: Option<u64>,
}

/// Raw outcome of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// A generic interface to issue one HTTP request.
/// Your application can implement this trait and pass it to `action::run`
/// to decouple the call from any specific HTTP library. Implementations
/// must follow redirects themselves rather than surfacing 3xx responses.
pub trait EndpointClient {
    fn call(&self, request: &EndpointRequest) -> Result<RawResponse, TransportError>;
}
