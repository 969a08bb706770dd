//! Menu image uploads.
//!
//! Images are identified by their leading bytes, not the client-declared
//! content type, and stored under a random file name so uploads can never
//! overwrite each other or escape the upload directory.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// URL prefix uploads are served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Errors that can occur while accepting an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("an image file is required in the 'image' field")]
    MissingFile,

    #[error("uploaded file is empty")]
    EmptyFile,

    #[error("image must be a JPEG, PNG, WebP or GIF file")]
    UnsupportedType,

    #[error("image must be at most {max} bytes")]
    TooLarge { max: usize },

    #[error("malformed upload: {0}")]
    Malformed(String),

    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Whether the error is the client's fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageKind {
    /// Identify an image from its magic bytes.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
            Some(Self::Webp)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }
}

/// Writes validated images into the upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    #[must_use]
    pub const fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self { dir, max_bytes }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validate an image and write it under a fresh file name.
    ///
    /// Returns the public URL of the stored file.
    ///
    /// # Errors
    ///
    /// Returns a client error for empty, oversized or unsupported files, and
    /// `UploadError::Io` if the file cannot be written.
    pub async fn store(
        &self,
        declared_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                max: self.max_bytes,
            });
        }

        let kind = ImageKind::sniff(bytes).ok_or(UploadError::UnsupportedType)?;
        if let Some(declared) = declared_type
            && declared != kind.mime_type()
            && !(kind == ImageKind::Jpeg && declared == "image/jpg")
        {
            return Err(UploadError::UnsupportedType);
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let file_name = format!("{}.{}", Uuid::new_v4(), kind.extension());
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        tracing::info!(file = %file_name, size = bytes.len(), "Stored uploaded image");
        Ok(format!("{UPLOADS_URL_PREFIX}/{file_name}"))
    }
}
