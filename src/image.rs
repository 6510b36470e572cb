//! Image selection and validation.
//!
//! A [`SelectedFile`] is what the user picked or dropped; [`ImagePayload`] is
//! the validated, base64-encoded form that travels to the API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::path::Path;

use crate::error::ValidationError;

/// Largest accepted image, in bytes (5 MB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// A file as chosen by the user, before validation.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    ///
    /// Type and size are checked against metadata before the bytes are read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let unreadable = |e: std::io::Error| ValidationError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        let size = tokio::fs::metadata(path).await.map_err(unreadable)?.len();
        check(&mime_type, size)?;

        let bytes = tokio::fs::read(path).await.map_err(unreadable)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// MIME must be `image/*` and size at most [`MAX_IMAGE_BYTES`].
pub fn check(mime_type: &str, size: u64) -> Result<(), ValidationError> {
    if !mime_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage {
            mime_type: mime_type.to_string(),
        });
    }
    if size > MAX_IMAGE_BYTES {
        return Err(ValidationError::TooLarge { size });
    }
    Ok(())
}

/// Validated image, ready to be inlined into a request.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    name: String,
    mime_type: String,
    size: u64,
    data: String,
}

impl ImagePayload {
    pub fn from_file(file: SelectedFile) -> Result<Self, ValidationError> {
        let size = file.size();
        check(&file.mime_type, size)?;
        Ok(Self {
            data: STANDARD.encode(&file.bytes),
            name: file.name,
            mime_type: file.mime_type,
            size,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size of the original bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Base64 (standard alphabet, padded).
    pub fn base64(&self) -> &str {
        &self.data
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .finish()
    }
}
