//! HTTP transport types for the host-does-IO pattern.
//!
//! These describe requests and responses as plain data. `PokeApiClient`
//! builds `HttpRequest` values and parses `HttpResponse` values; executing the
//! request is left to `fetch::PokeApi` (or to a test harness).

/// HTTP method for a request. The upstream API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
