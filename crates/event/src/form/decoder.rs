//! Request body decoding.
//!
//! Given raw body bytes, the declared content type, and the HTTP method,
//! [`decode_body`] decides whether the body is an urlencoded form, a
//! multipart form, or opaque, and produces the uploaded-files tree and the
//! parsed-fields tree. Only `POST` bodies with a content type are decoded;
//! everything else is left unparsed by design.

use crate::error::DecodeError;
use crate::form::multipart::MultipartDocument;
use crate::form::{self, FormMap, UploadedFile};
use bytes::Bytes;
use http::Method;
use mime::Mime;
use std::path::Path;
use tracing::{debug, trace};

/// The outcome of decoding one request body.
///
/// `fields` is `None` when the body was left unparsed (non-form method,
/// missing content type, or unsupported shape), and an empty map when a
/// genuine form simply carried no fields.
#[derive(Debug)]
pub struct DecodedBody {
    files: FormMap<UploadedFile>,
    fields: Option<FormMap<String>>,
}

impl DecodedBody {
    fn unparsed() -> Self {
        Self { files: FormMap::new(), fields: None }
    }

    /// The uploaded-files tree. Empty unless the body was a multipart form
    /// with file parts.
    pub fn files(&self) -> &FormMap<UploadedFile> {
        &self.files
    }

    /// The parsed-fields tree, when the body was a form.
    pub fn fields(&self) -> Option<&FormMap<String>> {
        self.fields.as_ref()
    }

    /// Consumes the result into its `(files, fields)` parts.
    pub fn into_parts(self) -> (FormMap<UploadedFile>, Option<FormMap<String>>) {
        (self.files, self.fields)
    }
}

/// Decodes a request body into uploaded files and parsed fields.
///
/// Uploaded file parts are spooled under `temp_dir`; the spooled files
/// outlive the returned value and are never cleaned up by this crate.
///
/// # Errors
///
/// The only fatal condition is a temporary-storage fault while persisting a
/// file part. No partial result is returned in that case.
pub fn decode_body(
    body: &Bytes,
    content_type: Option<&str>,
    method: &Method,
    temp_dir: &Path,
) -> Result<DecodedBody, DecodeError> {
    let Some(content_type) = content_type else {
        trace!("no content type, body left unparsed");
        return Ok(DecodedBody::unparsed());
    };
    if method != Method::POST {
        trace!(%method, "not a form-submitting method, body left unparsed");
        return Ok(DecodedBody::unparsed());
    }

    if content_type == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
        return Ok(DecodedBody {
            files: FormMap::new(),
            fields: Some(decode_urlencoded(body)),
        });
    }

    let Some(boundary) = multipart_boundary(content_type) else {
        trace!(content_type, "unsupported content type, body left unparsed");
        return Ok(DecodedBody::unparsed());
    };
    let Some(document) = MultipartDocument::parse(&boundary, body) else {
        trace!("document is not genuinely multipart, body left unparsed");
        return Ok(DecodedBody::unparsed());
    };

    let mut files = FormMap::new();
    let mut fields = FormMap::new();
    for part in document.parts() {
        if part.is_file() {
            let file = UploadedFile::spool(
                part.body(),
                part.filename().map(str::to_owned),
                part.content_type().map(str::to_owned),
                temp_dir,
            )?;
            form::insert(&mut files, part.name(), file);
        } else {
            let text = String::from_utf8_lossy(part.body()).into_owned();
            form::insert(&mut fields, part.name(), text);
        }
    }

    debug!(files = files.len(), fields = fields.len(), "decoded multipart body");
    Ok(DecodedBody { files, fields: Some(fields) })
}

/// Decodes an urlencoded byte string into a fields tree.
///
/// Pairs are folded through the bracket-key inserter so nested names like
/// `tags[]` build the same trees as multipart field names. An undecodable
/// body yields an empty map, never an error.
pub(crate) fn decode_urlencoded(body: &[u8]) -> FormMap<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).unwrap_or_default();

    let mut fields = FormMap::new();
    for (key, value) in pairs {
        form::insert(&mut fields, &key, value);
    }
    fields
}

/// Extracts the boundary parameter from a `multipart/*` content type.
fn multipart_boundary(content_type: &str) -> Option<String> {
    let mime: Mime = content_type.parse().ok()?;
    if mime.type_() != mime::MULTIPART {
        return None;
    }
    mime.get_param(mime::BOUNDARY).map(|b| b.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormValue;
    use std::path::PathBuf;

    fn temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn text_leaf<'m>(map: &'m FormMap<String>, key: &str) -> Option<&'m str> {
        map.get(key).and_then(FormValue::as_leaf).map(String::as_str)
    }

    #[test]
    fn urlencoded_post_is_decoded() {
        let dir = temp_dir();
        let body = Bytes::from_static(b"name=Alice&tags[]=x&tags[]=y");

        let decoded = decode_body(
            &body,
            Some("application/x-www-form-urlencoded"),
            &Method::POST,
            dir.path(),
        )
        .unwrap();

        assert!(decoded.files().is_empty());
        let fields = decoded.fields().unwrap();
        assert_eq!(text_leaf(fields, "name"), Some("Alice"));

        let tags = fields.get("tags").and_then(FormValue::as_list).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].as_leaf().map(String::as_str), Some("x"));
        assert_eq!(tags[1].as_leaf().map(String::as_str), Some("y"));
    }

    #[test]
    fn urlencoded_values_are_percent_decoded() {
        let dir = temp_dir();
        let body = Bytes::from_static(b"greeting=hello%20world&a%5Bb%5D=nested");

        let decoded = decode_body(
            &body,
            Some("application/x-www-form-urlencoded"),
            &Method::POST,
            dir.path(),
        )
        .unwrap();

        let fields = decoded.fields().unwrap();
        assert_eq!(text_leaf(fields, "greeting"), Some("hello world"));

        // percent-encoded brackets decode before key-path parsing
        let a = fields.get("a").and_then(FormValue::as_map).unwrap();
        assert_eq!(a.get("b").and_then(FormValue::as_leaf).map(String::as_str), Some("nested"));
    }

    #[test]
    fn non_post_method_is_not_decoded() {
        let dir = temp_dir();
        let body = Bytes::from_static(b"name=Alice");

        let decoded = decode_body(
            &body,
            Some("application/x-www-form-urlencoded"),
            &Method::GET,
            dir.path(),
        )
        .unwrap();

        assert!(decoded.files().is_empty());
        assert!(decoded.fields().is_none());
    }

    #[test]
    fn missing_content_type_is_not_decoded() {
        let dir = temp_dir();
        let body = Bytes::from_static(b"name=Alice");

        let decoded = decode_body(&body, None, &Method::POST, dir.path()).unwrap();

        assert!(decoded.files().is_empty());
        assert!(decoded.fields().is_none());
    }

    #[test]
    fn unsupported_content_type_yields_nothing() {
        let dir = temp_dir();
        let body = Bytes::from_static(b"{\"name\":\"Alice\"}");

        let decoded = decode_body(&body, Some("application/json"), &Method::POST, dir.path()).unwrap();

        assert!(decoded.files().is_empty());
        assert!(decoded.fields().is_none());
    }

    #[test]
    fn multipart_content_type_with_plain_body_yields_nothing() {
        let dir = temp_dir();
        let body = Bytes::from_static(b"this is not a multipart document");

        let decoded = decode_body(
            &body,
            Some("multipart/form-data; boundary=delim"),
            &Method::POST,
            dir.path(),
        )
        .unwrap();

        assert!(decoded.files().is_empty());
        assert!(decoded.fields().is_none());
    }

    #[test]
    fn multipart_file_and_field_in_one_call() {
        let dir = temp_dir();
        let body = Bytes::from_static(
            concat!(
                "--delim\r\n",
                "Content-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\n",
                "Content-Type: image/png\r\n",
                "\r\n",
                "PNGDATA\r\n",
                "--delim\r\n",
                "Content-Disposition: form-data; name=\"bio\"\r\n",
                "\r\n",
                "rustacean\r\n",
                "--delim--\r\n",
            )
            .as_bytes(),
        );

        let decoded = decode_body(
            &body,
            Some("multipart/form-data; boundary=delim"),
            &Method::POST,
            dir.path(),
        )
        .unwrap();

        let avatar = decoded.files().get("avatar").and_then(FormValue::as_leaf).unwrap();
        assert_eq!(avatar.filename(), Some("me.png"));
        assert_eq!(avatar.content_type(), Some("image/png"));
        assert_eq!(avatar.size(), 7);
        assert_eq!(std::fs::read(avatar.path()).unwrap(), b"PNGDATA");

        let fields = decoded.fields().unwrap();
        assert_eq!(text_leaf(fields, "bio"), Some("rustacean"));
    }

    #[test]
    fn multipart_duplicate_field_last_write_wins() {
        let dir = temp_dir();
        let body = Bytes::from_static(
            concat!(
                "--delim\r\n",
                "Content-Disposition: form-data; name=\"note\"\r\n",
                "\r\n",
                "first\r\n",
                "--delim\r\n",
                "Content-Disposition: form-data; name=\"note\"\r\n",
                "\r\n",
                "second\r\n",
                "--delim--\r\n",
            )
            .as_bytes(),
        );

        let decoded = decode_body(
            &body,
            Some("multipart/form-data; boundary=delim"),
            &Method::POST,
            dir.path(),
        )
        .unwrap();

        assert_eq!(text_leaf(decoded.fields().unwrap(), "note"), Some("second"));
    }

    #[test]
    fn multipart_bracket_keys_nest_files() {
        let dir = temp_dir();
        let body = Bytes::from_static(
            concat!(
                "--delim\r\n",
                "Content-Disposition: form-data; name=\"docs[scans][]\"; filename=\"one.pdf\"\r\n",
                "\r\n",
                "PDF1\r\n",
                "--delim\r\n",
                "Content-Disposition: form-data; name=\"docs[scans][]\"; filename=\"two.pdf\"\r\n",
                "\r\n",
                "PDF2\r\n",
                "--delim--\r\n",
            )
            .as_bytes(),
        );

        let decoded = decode_body(
            &body,
            Some("multipart/form-data; boundary=delim"),
            &Method::POST,
            dir.path(),
        )
        .unwrap();

        let scans = decoded
            .files()
            .get("docs")
            .and_then(FormValue::as_map)
            .and_then(|m| m.get("scans"))
            .and_then(FormValue::as_list)
            .unwrap();
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0].as_leaf().unwrap().filename(), Some("one.pdf"));
        assert_eq!(scans[1].as_leaf().unwrap().filename(), Some("two.pdf"));
    }

    #[test]
    fn temp_storage_fault_aborts_decoding() {
        let body = Bytes::from_static(
            concat!(
                "--delim\r\n",
                "Content-Disposition: form-data; name=\"file\"; filename=\"a\"\r\n",
                "\r\n",
                "DATA\r\n",
                "--delim--\r\n",
            )
            .as_bytes(),
        );

        let missing = PathBuf::from("/nonexistent/surely/missing");
        let result = decode_body(
            &body,
            Some("multipart/form-data; boundary=delim"),
            &Method::POST,
            &missing,
        );

        assert!(matches!(result, Err(DecodeError::TempStorage { .. })));
    }

    #[test]
    fn multipart_with_no_file_parts_has_empty_files() {
        let dir = temp_dir();
        let body = Bytes::from_static(
            concat!(
                "--delim\r\n",
                "Content-Disposition: form-data; name=\"only\"\r\n",
                "\r\n",
                "field\r\n",
                "--delim--\r\n",
            )
            .as_bytes(),
        );

        let decoded = decode_body(
            &body,
            Some("multipart/form-data; boundary=delim"),
            &Method::POST,
            dir.path(),
        )
        .unwrap();

        assert!(decoded.files().is_empty());
        assert_eq!(decoded.fields().map(FormMap::len), Some(1));
    }

    #[test]
    fn empty_urlencoded_body_yields_empty_fields() {
        let fields = decode_urlencoded(b"");
        assert!(fields.is_empty());
    }
}
