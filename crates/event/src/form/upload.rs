//! Uploaded file handling.
//!
//! File parts of a multipart body are spooled to uniquely named files under
//! the caller-provided temporary directory. The spooled file is persisted
//! rather than deleted on drop: its backing storage must outlive the
//! assembled request, and cleanup of the temporary area is an operational
//! concern outside this crate.

use crate::error::DecodeError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::debug;

/// Filename prefix for spooled upload files.
const SPOOL_PREFIX: &str = "upload-";

/// A file part extracted from a multipart body.
///
/// Holds the part's declared filename and MIME type together with the
/// location and size of the spooled content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    path: PathBuf,
    size: u64,
    filename: Option<String>,
    content_type: Option<String>,
}

impl UploadedFile {
    /// Writes `content` to a fresh uniquely named file under `temp_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TempStorage`] when the temporary file cannot be
    /// created, written, or persisted. This is an infrastructure fault and
    /// aborts the whole decode operation.
    pub(crate) fn spool(
        content: &[u8],
        filename: Option<String>,
        content_type: Option<String>,
        temp_dir: &Path,
    ) -> Result<Self, DecodeError> {
        let mut file = Builder::new().prefix(SPOOL_PREFIX).tempfile_in(temp_dir)?;
        file.write_all(content)?;
        // keep the file on disk, it must outlive the request
        let (_, path) = file.keep().map_err(|e| DecodeError::temp_storage(e.error))?;

        debug!(path = %path.display(), size = content.len(), "spooled uploaded file");

        Ok(Self { path, size: content.len() as u64, filename, content_type })
    }

    /// Path of the spooled content on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the stored content in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Filename declared by the client, if any.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// MIME type declared by the client, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}
