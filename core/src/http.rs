//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! `VantageClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network; a `Transport` (or any other host)
//! executes the round-trip in between. Every request to the query endpoint is
//! a `GET`, so the request carries only the URL and headers.

/// Value sent for both `Content-Type` and `Accept`. Content negotiation is
/// driven by the `datatype` query parameter, not by these headers.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A `GET` request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Full URL including the query string and the trailing `apikey`.
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// Parsers take it by value, so the body is consumed exactly once.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
    }
}

pub(crate) fn json_headers() -> Vec<(String, String)> {
    vec![
        ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
        ("Accept".to_string(), JSON_CONTENT_TYPE.to_string()),
    ]
}
