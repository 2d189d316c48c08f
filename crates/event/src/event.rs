//! The gateway-delivered request event.
//!
//! A managed gateway (reverse proxy, load balancer, serverless front end)
//! hands the application an already-parsed request event: method, target,
//! headers, cookies, and the raw body bytes. This crate does not parse the
//! gateway's wire format; the collaborator that does builds an
//! [`HttpRequestEvent`] through the consuming setters and hands it to
//! [`assemble`](crate::assemble).

use crate::form::{self, FormMap};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Version, header};
use std::collections::HashMap;

/// An immutable HTTP request event as delivered by the gateway.
#[derive(Debug, Clone)]
pub struct HttpRequestEvent {
    method: Method,
    uri: String,
    query_string: String,
    version: Version,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
    body: Bytes,
}

impl HttpRequestEvent {
    /// Creates an event for `method` and the request target `uri`.
    ///
    /// The remaining fields default to an empty query string, HTTP/1.1, no
    /// headers, no cookies, and an empty body; populate them with the
    /// consuming setters.
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            query_string: String::new(),
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            cookies: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Sets the raw query string (without the leading `?`).
    #[must_use]
    pub fn query_string(mut self, query_string: impl Into<String>) -> Self {
        self.query_string = query_string.into();
        self
    }

    /// Sets the protocol version.
    #[must_use]
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Adds one header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds one cookie.
    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Sets the raw body bytes.
    #[must_use]
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request target URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The raw query string.
    pub fn raw_query_string(&self) -> &str {
        &self.query_string
    }

    /// The protocol version.
    pub fn protocol_version(&self) -> Version {
        self.version
    }

    /// The request headers. Lookup is case-insensitive.
    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request cookies.
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    /// The raw body bytes.
    pub fn raw_body(&self) -> &Bytes {
        &self.body
    }

    /// The declared content type, read from the `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// The query string decoded into a nested parameter tree.
    ///
    /// Bracket-notation keys nest exactly as form field names do, so
    /// `?tags[]=x&tags[]=y` yields a two-entry sequence under `tags`.
    pub fn query_parameters(&self) -> FormMap<String> {
        form::decode_urlencoded(self.query_string.as_bytes())
    }
}
