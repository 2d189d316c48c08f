use std::io;
use thiserror::Error;

/// Errors surfaced while decoding a gateway event body.
///
/// Malformed field keys and unsupported body shapes are recovered locally and
/// never reach this type; the only fatal condition is the temporary-storage
/// fault raised while persisting an uploaded file.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unable to persist uploaded file to temporary storage: {source}")]
    TempStorage {
        #[from]
        source: io::Error,
    },
}

impl DecodeError {
    pub fn temp_storage<E: Into<io::Error>>(e: E) -> Self {
        Self::TempStorage { source: e.into() }
    }
}
