use mackerel_api_core::action::{self, ApiResponse, ErrorHandlers};
use mackerel_api_core::client::{EndpointClient, EndpointRequest, RawResponse};
use mackerel_api_core::error::TransportError;
use mackerel_api_core::params::ApiParams;

/// A simple mock client for demonstration.
/// It doesn't actually make HTTP requests, but returns canned responses.
pub struct DemoMockClient;

impl EndpointClient for DemoMockClient {
    fn call(&self, request: &EndpointRequest) -> Result<RawResponse, TransportError> {
        println!(
            ">>> [MOCK] Intercepted a {} request to '{}'",
            request.method, request.url
        );

        Ok(RawResponse {
            status: 200,
            body: r#"{"name": "demo-org"}"#.to_string(),
        })
    }
}

fn main() {
    let params = ApiParams {
        api_key: Some("demo-key".to_string()),
        path: Some("api/v0/org".to_string()),
        ..ApiParams::default()
    };

    let mut handlers = ErrorHandlers::new();
    handlers.on(404, |response: &ApiResponse| {
        println!("organization not found: {}", response.body);
    });

    let mut announce = |response: &ApiResponse| {
        println!("organization name: {}", response.json["name"]);
    };

    match action::run(
        &DemoMockClient,
        &params,
        &mut handlers,
        Some(&mut announce),
        true,
    ) {
        Ok(response) => {
            for (key, value) in response.outputs() {
                println!("{}={}", key, value);
            }
        }
        Err(e) => eprintln!("call failed: {}", e),
    }
}
