//! Minimal MIME multipart document parser.
//!
//! Splits a `multipart/form-data` body into its parts and classifies each
//! part as a file (it declares a `filename`) or a plain field. Per-part
//! headers are parsed with `httparse`; only `Content-Disposition` and
//! `Content-Type` are interpreted.
//!
//! The parser is deliberately lenient: a body that does not contain a
//! well-formed sequence of boundary-delimited parts yields `None` rather
//! than an error, since a non-multipart body under a multipart content type
//! is "nothing parsed", not a fault. Individual parts with unparseable
//! headers or no field name are skipped without aborting the document.

use bytes::Bytes;
use httparse::Status;
use std::str;
use tracing::trace;

/// Maximum number of headers accepted on a single part.
const MAX_PART_HEADERS: usize = 8;

/// A parsed multipart document: the ordered list of its parts.
#[derive(Debug)]
pub struct MultipartDocument {
    parts: Vec<MultipartPart>,
}

/// One part of a multipart document.
#[derive(Debug)]
pub struct MultipartPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    body: Bytes,
}

impl MultipartDocument {
    /// Parses `body` as a multipart document delimited by `boundary`.
    ///
    /// Returns `None` when the body is not a genuine multipart document
    /// (no opening delimiter, or broken part framing).
    pub fn parse(boundary: &str, body: &[u8]) -> Option<Self> {
        let dash_boundary = format!("--{boundary}");
        let close_pattern = format!("\r\n--{boundary}");

        // skip the preamble, position just past the opening delimiter
        let start = find(body, dash_boundary.as_bytes())? + dash_boundary.len();
        let mut rest = &body[start..];

        let mut parts = Vec::new();
        loop {
            if rest.starts_with(b"--") {
                // closing delimiter, the epilogue is ignored
                break;
            }
            let after = rest.strip_prefix(b"\r\n")?;

            let header_end = find(after, b"\r\n\r\n")?;
            let (raw_headers, remainder) = after.split_at(header_end + 4);

            let body_end = find(remainder, close_pattern.as_bytes())?;
            match MultipartPart::parse(raw_headers, &remainder[..body_end]) {
                Some(part) => parts.push(part),
                None => trace!("skipping multipart part without a usable name"),
            }

            rest = &remainder[body_end + 2 + dash_boundary.len()..];
        }

        Some(Self { parts })
    }

    /// The document's parts, in document order.
    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }
}

impl MultipartPart {
    /// Parses one part from its raw header block and body bytes.
    ///
    /// Returns `None` when the headers cannot be parsed or carry no
    /// `Content-Disposition` name.
    fn parse(raw_headers: &[u8], body: &[u8]) -> Option<Self> {
        let mut storage = [httparse::EMPTY_HEADER; MAX_PART_HEADERS];
        let headers = match httparse::parse_headers(raw_headers, &mut storage) {
            Ok(Status::Complete((_, headers))) => headers,
            _ => return None,
        };

        let mut name = None;
        let mut filename = None;
        let mut content_type = None;
        for header in headers {
            if header.name.eq_ignore_ascii_case("content-disposition") {
                let value = str::from_utf8(header.value).ok()?;
                name = disposition_param(value, "name");
                filename = disposition_param(value, "filename");
            } else if header.name.eq_ignore_ascii_case("content-type") {
                content_type = str::from_utf8(header.value).ok().map(str::to_owned);
            }
        }

        Some(Self { name: name?, filename, content_type, body: Bytes::copy_from_slice(body) })
    }

    /// The part's field name from its `Content-Disposition` header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The filename declared in `Content-Disposition`, if any.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The part's own `Content-Type` header value, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The part's raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// A part that declares a filename is a file upload.
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }
}

/// Extracts a `Content-Disposition` parameter such as `name` or `filename`.
fn disposition_param(header: &str, param: &str) -> Option<String> {
    for item in header.split(';') {
        let Some((key, value)) = item.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case(param) {
            return Some(value.trim().trim_matches('"').to_owned());
        }
    }
    None
}

/// First occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
