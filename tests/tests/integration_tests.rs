use std::cell::Cell;
use std::sync::Mutex;

use mackerel_api_core::action::{self, ApiResponse, ErrorHandlers};
use mackerel_api_core::client::{EndpointClient, EndpointRequest, RawResponse};
use mackerel_api_core::error::TransportError;
use mackerel_api_core::params::{ApiParams, HttpMethod};

struct MockClient {
    status: u16,
    body: &'static str,
    last_request: Mutex<Option<EndpointRequest>>,
}

impl MockClient {
    fn returning(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            last_request: Mutex::new(None),
        }
    }

    fn last_request(&self) -> EndpointRequest {
        self.last_request
            .lock()
            .unwrap()
            .clone()
            .expect("no request was issued")
    }
}

impl EndpointClient for MockClient {
    fn call(&self, request: &EndpointRequest) -> Result<RawResponse, TransportError> {
        let mut last = self.last_request.lock().unwrap();
        *last = Some(request.clone());
        Ok(RawResponse {
            status: self.status,
            body: self.body.to_string(),
        })
    }
}

fn org_params() -> ApiParams {
    ApiParams {
        api_key: Some("secret123".to_string()),
        path: Some("api/v0/org".to_string()),
        ..ApiParams::default()
    }
}

fn header_value(headers: &[(String, String)], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|(existing, _)| existing == name)
        .map(|(_, value)| value.clone())
}

#[test]
fn test_success_composes_response_and_runs_continuation() {
    let client = MockClient::returning(200, r#"{"name":"org"}"#);
    let mut handlers = ErrorHandlers::new();
    let continuations = Cell::new(0);
    let mut on_success = |response: &ApiResponse| {
        continuations.set(continuations.get() + 1);
        assert_eq!(response.status, 200);
        assert_eq!(response.json["name"], "org");
    };

    let response = action::run(
        &client,
        &org_params(),
        &mut handlers,
        Some(&mut on_success),
        false,
    )
    .expect("a 2xx response should succeed");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"{"name":"org"}"#);
    assert_eq!(response.json["name"], "org");
    assert_eq!(continuations.get(), 1);
}

#[test]
fn test_request_carries_built_url_headers_and_defaults() {
    let client = MockClient::returning(200, "{}");

    action::run(
        &client,
        &org_params(),
        &mut ErrorHandlers::new(),
        None,
        false,
    )
    .unwrap();

    let request = client.last_request();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url, "https://api.mackerelio.com/api/v0/org");
    assert_eq!(request.body.as_deref(), Some("{}"));
    assert!(request.tls_verify);
    assert_eq!(request.timeout, None);
    assert_eq!(
        header_value(&request.headers, "User-Agent").as_deref(),
        Some("mackerel-api")
    );
    assert_eq!(
        header_value(&request.headers, "Content-Type").as_deref(),
        Some("application/json")
    );
    assert_eq!(
        header_value(&request.headers, "X-Api-Key").as_deref(),
        Some("secret123")
    );
}

#[test]
fn test_overrides_method_and_raw_body_reach_the_wire() {
    let client = MockClient::returning(201, "{}");
    let params = ApiParams {
        http_method: Some("post".to_string()),
        raw_body: Some(r#"{"Foo":"foo","Bar":"bar"}"#.to_string()),
        headers: vec![
            ("User-Agent".to_string(), "custom-agent".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ],
        ..org_params()
    };

    let response = action::run(&client, &params, &mut ErrorHandlers::new(), None, false).unwrap();
    assert_eq!(response.status, 201);

    let request = client.last_request();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.body.as_deref(), Some(r#"{"Foo":"foo","Bar":"bar"}"#));
    assert_eq!(
        header_value(&request.headers, "User-Agent").as_deref(),
        Some("custom-agent")
    );
    assert_eq!(
        header_value(&request.headers, "Accept").as_deref(),
        Some("application/json")
    );
}

#[test]
fn test_full_url_fallback_when_no_path() {
    let client = MockClient::returning(200, "[]");
    let params = ApiParams {
        path: None,
        url: Some("https://kcps-mackerel.io/api/v0/services".to_string()),
        ..org_params()
    };

    let response = action::run(&client, &params, &mut ErrorHandlers::new(), None, false).unwrap();
    assert_eq!(response.json, serde_json::json!([]));

    let request = client.last_request();
    assert_eq!(request.url, "https://kcps-mackerel.io/api/v0/services");
}

#[test]
fn test_tls_verify_and_timeout_propagate() {
    let client = MockClient::returning(200, "{}");
    let params = ApiParams {
        tls_verify: false,
        timeout: Some(30),
        ..org_params()
    };

    action::run(&client, &params, &mut ErrorHandlers::new(), None, false).unwrap();

    let request = client.last_request();
    assert!(!request.tls_verify);
    assert_eq!(request.timeout, Some(30));
}

#[test]
fn test_empty_body_yields_empty_json_mapping() {
    let client = MockClient::returning(204, "");
    let response = action::run(
        &client,
        &org_params(),
        &mut ErrorHandlers::new(),
        None,
        false,
    )
    .unwrap();

    assert_eq!(response.status, 204);
    assert_eq!(response.body, "");
    assert_eq!(response.json, serde_json::json!({}));
}
