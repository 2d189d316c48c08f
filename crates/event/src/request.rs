//! Request assembly.
//!
//! [`assemble`] combines the scalar metadata of an [`HttpRequestEvent`] with
//! the decoded body trees into one immutable [`AssembledRequest`]. Ambient
//! process state the request records (wall-clock time, document root, the
//! temp directory for uploads) is passed in explicitly through
//! [`ServerContext`] so assembly stays a pure function of its inputs.

use crate::error::DecodeError;
use crate::event::HttpRequestEvent;
use crate::form::{FormMap, UploadedFile, decode_body};
use http::{HeaderMap, Method, Version, header};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

/// Request-scoped environment passed to [`assemble`].
///
/// Carries the values a request records about its environment instead of
/// reading them from process globals.
#[derive(Debug, Clone)]
pub struct ServerContext {
    request_time: SystemTime,
    document_root: PathBuf,
    temp_dir: PathBuf,
}

impl ServerContext {
    /// Creates a context from the moment the request was received, the
    /// serving document root, and the directory for spooled uploads.
    pub fn new(
        request_time: SystemTime,
        document_root: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self { request_time, document_root: document_root.into(), temp_dir: temp_dir.into() }
    }

    /// When the request was received.
    pub fn request_time(&self) -> SystemTime {
        self.request_time
    }

    /// The serving document root.
    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    /// Directory that receives spooled upload files.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }
}

/// Server and environment metadata recorded on an assembled request.
#[derive(Debug, Clone)]
pub struct ServerParams {
    protocol: Version,
    method: Method,
    request_time: u64,
    request_time_float: f64,
    query_string: String,
    document_root: PathBuf,
    request_uri: String,
    host: Option<String>,
}

impl ServerParams {
    /// The protocol version.
    pub fn protocol(&self) -> Version {
        self.protocol
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request time as whole seconds since the Unix epoch.
    pub fn request_time(&self) -> u64 {
        self.request_time
    }

    /// Request time as fractional seconds since the Unix epoch.
    pub fn request_time_float(&self) -> f64 {
        self.request_time_float
    }

    /// The raw query string.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// The serving document root.
    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    /// The request target URI.
    pub fn request_uri(&self) -> &str {
        &self.request_uri
    }

    /// The `Host` header value, when the event carried one.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

/// A canonical, fully populated HTTP request.
///
/// Immutable once assembled: accessors only, no mutation. Any modified
/// variant must be a newly assembled value.
#[derive(Debug)]
pub struct AssembledRequest {
    method: Method,
    uri: String,
    version: Version,
    headers: HeaderMap,
    server: ServerParams,
    cookies: HashMap<String, String>,
    query: FormMap<String>,
    files: FormMap<UploadedFile>,
    fields: Option<FormMap<String>>,
}

impl AssembledRequest {
    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request target URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The protocol version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Server and environment metadata.
    pub fn server_params(&self) -> &ServerParams {
        &self.server
    }

    /// The request cookies.
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    /// Query parameters as a nested tree.
    pub fn query_parameters(&self) -> &FormMap<String> {
        &self.query
    }

    /// Uploaded files as a nested tree of field path to [`UploadedFile`].
    pub fn uploaded_files(&self) -> &FormMap<UploadedFile> {
        &self.files
    }

    /// Parsed body fields, when the body was a form.
    pub fn parsed_body(&self) -> Option<&FormMap<String>> {
        self.fields.as_ref()
    }
}

/// Assembles a canonical request from a gateway event.
///
/// Copies the event's scalar metadata, decodes the body into uploaded files
/// and parsed fields, and records server params from `ctx`.
///
/// # Errors
///
/// Propagates the body decoder's temporary-storage fault; there are no other
/// error conditions.
pub fn assemble(event: &HttpRequestEvent, ctx: &ServerContext) -> Result<AssembledRequest, DecodeError> {
    trace!(method = %event.method(), uri = event.uri(), "assembling request");

    let (files, fields) =
        decode_body(event.raw_body(), event.content_type(), event.method(), ctx.temp_dir())?.into_parts();

    let since_epoch = ctx.request_time().duration_since(UNIX_EPOCH).unwrap_or_default();
    let host = event
        .header_map()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let server = ServerParams {
        protocol: event.protocol_version(),
        method: event.method().clone(),
        request_time: since_epoch.as_secs(),
        request_time_float: since_epoch.as_secs_f64(),
        query_string: event.raw_query_string().to_owned(),
        document_root: ctx.document_root().to_owned(),
        request_uri: event.uri().to_owned(),
        host,
    };

    Ok(AssembledRequest {
        method: event.method().clone(),
        uri: event.uri().to_owned(),
        version: event.protocol_version(),
        headers: event.header_map().clone(),
        server,
        cookies: event.cookies().clone(),
        query: event.query_parameters(),
        files,
        fields,
    })
}
