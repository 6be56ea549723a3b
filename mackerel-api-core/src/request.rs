//! Pure request-construction helpers: URL assembly, header assembly, body
//! normalization, best-effort JSON parsing.

use serde_json::Value;

use crate::error::ApiError;

/// User-Agent advertised on every request.
pub const USER_AGENT: &str = "mackerel-api";

/// Placeholder substituted for the API key in logs and error output.
pub const REDACTED: &str = "*******";

/// Join `server_url` and `path` when both are present, else fall back to the
/// full `url`. The join always produces exactly one separator between the
/// two parts.
pub fn build_url(
    server_url: Option<&str>,
    path: Option<&str>,
    url: Option<&str>,
) -> Result<String, ApiError> {
    match (server_url, path) {
        (Some(server_url), Some(path)) if !server_url.is_empty() && !path.is_empty() => {
            Ok(format!(
                "{}/{}",
                server_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ))
        }
        _ => match url {
            Some(url) if !url.is_empty() => Ok(url.to_string()),
            _ => Err(ApiError::Configuration(
                "please provide either `server_url` (e.g. https://api.mackerelio.com) and `path`, or a full `url` for the Mackerel API endpoint".to_string(),
            )),
        },
    }
}

/// Default header set plus the auth header, with caller overrides merged on
/// top. An override replaces a colliding entry in place; keys compare
/// case-sensitively, as supplied. Header names and values are not validated.
pub fn build_headers(
    api_key: Option<&str>,
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut headers = vec![
        ("User-Agent".to_string(), USER_AGENT.to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ];
    if let Some(key) = api_key {
        headers.push(("X-Api-Key".to_string(), key.to_string()));
    }
    for (name, value) in overrides {
        match headers.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = value.clone(),
            None => headers.push((name.clone(), value.clone())),
        }
    }
    headers
}

/// Normalize the request body to the string that goes on the wire.
///
/// A raw body passes through verbatim (binary/file-upload payloads). A
/// structured value serializes to JSON text. A string value must itself be
/// valid JSON and passes through unchanged. An unset body is an empty
/// mapping, `"{}"`.
pub fn build_body(body: Option<&Value>, raw_body: Option<&str>) -> Result<String, ApiError> {
    if let Some(raw) = raw_body {
        return Ok(raw.to_string());
    }
    match body {
        None => Ok("{}".to_string()),
        Some(Value::String(text)) => {
            if parse_json(text).is_some() {
                Ok(text.clone())
            } else {
                Err(ApiError::Validation(
                    "please provide valid JSON, or a structured value, as the request body"
                        .to_string(),
                ))
            }
        }
        // Mappings and lists serialize to their JSON text; bare scalars
        // already are their own JSON text.
        Some(value) => Ok(value.to_string()),
    }
}

/// Best-effort JSON parse. Malformed or empty input yields `None` rather
/// than an error: a non-JSON body on an otherwise fine response is benign.
pub fn parse_json(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// Copy of `headers` with the API key masked, safe to log or to format into
/// an error message.
pub fn redact_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case("x-api-key") {
                (name.clone(), REDACTED.to_string())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}
