//! Convert managed-gateway HTTP events into canonical requests
//!
//! A managed gateway (API gateway, reverse proxy, load balancer front end)
//! delivers requests as pre-parsed events rather than raw sockets. This
//! crate turns such an event into a fully populated, immutable request
//! value: it decodes the body according to the declared content type,
//! separates uploaded files from scalar form fields, and reconstructs
//! nested bracket-notation field names (`a[b][c][]`) into nested trees.
//!
//! # Features
//!
//! - Urlencoded and `multipart/form-data` body decoding for `POST` requests
//! - Bracket-notation field names built into nested file and field trees
//! - Uploaded files spooled to uniquely named temporary files
//! - Best-effort field capture: malformed field keys degrade to flat
//!   verbatim keys instead of failing the request
//! - Explicit request-scoped environment ([`ServerContext`]) instead of
//!   ambient process globals
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use gateway_event::{HttpRequestEvent, ServerContext, assemble};
//! use http::{HeaderValue, Method, header};
//! use std::time::SystemTime;
//! use tracing::Level;
//! use tracing_subscriber::FmtSubscriber;
//!
//! // Initialize logging
//! let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//! let _ = tracing::subscriber::set_global_default(subscriber);
//!
//! // The collaborator parsing the gateway's wire format builds the event
//! let event = HttpRequestEvent::new(Method::POST, "/submit")
//!     .header(
//!         header::CONTENT_TYPE,
//!         HeaderValue::from_static("application/x-www-form-urlencoded"),
//!     )
//!     .header(header::HOST, HeaderValue::from_static("example.com"))
//!     .body(Bytes::from_static(b"name=Alice&tags[]=x&tags[]=y"));
//!
//! let ctx = ServerContext::new(SystemTime::now(), "/srv/www", std::env::temp_dir());
//! let request = assemble(&event, &ctx).expect("temporary storage is writable");
//!
//! let fields = request.parsed_body().expect("a form body was decoded");
//! assert_eq!(fields.len(), 2);
//! assert_eq!(request.server_params().host(), Some("example.com"));
//! ```

pub mod form;

mod event;
pub use event::HttpRequestEvent;

mod request;
pub use request::AssembledRequest;
pub use request::ServerContext;
pub use request::ServerParams;
pub use request::assemble;

mod error;
pub use error::DecodeError;
