//! Form body interpretation.
//!
//! This module is the decoding core of the crate. It turns the raw body of a
//! gateway event into two nested trees: the uploaded files and the scalar
//! form fields.
//!
//! # Architecture
//!
//! - **Containers** ([`value`]): the [`FormValue`] tagged union and the
//!   insertion-ordered [`FormMap`].
//! - **Key paths** ([`key_path`]): bracket-notation parsing and the
//!   [`insert`] operation that builds nested trees from flat field names.
//! - **Multipart parsing** ([`multipart`]): boundary splitting and part
//!   classification for `multipart/form-data` bodies.
//! - **Uploads** ([`upload`]): spooling file parts to temporary storage as
//!   [`UploadedFile`] values.
//! - **Decoding** ([`decoder`]): [`decode_body`] ties the pieces together,
//!   choosing the urlencoded, multipart, or unparsed branch.

mod value;
pub use value::FormMap;
pub use value::FormValue;
pub use value::Iter;

mod key_path;
pub use key_path::insert;

mod upload;
pub use upload::UploadedFile;

mod decoder;
pub use decoder::DecodedBody;
pub use decoder::decode_body;
pub(crate) use decoder::decode_urlencoded;

mod multipart;
