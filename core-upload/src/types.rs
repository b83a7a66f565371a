//! Intake queue domain types

use bytes::Bytes;
use core_imaging::NormalizedImage;

/// Lifecycle of a queued photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoStatus {
    /// Staged, ready for upload
    Pending,
    /// Being normalized by the transcode pipeline
    Converting,
    /// Submitted to the remote store
    Uploading,
    /// Uploaded successfully; about to leave the queue
    Done,
    /// Normalization or upload failed; stays queued for a repeat submission
    Error,
}

impl PhotoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Converting => "converting",
            Self::Uploading => "uploading",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Whether the photo has settled (uploaded or failed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl std::fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A captured photo handed to the intake queue
#[derive(Debug, Clone)]
pub struct SourcePhoto {
    /// Raw captured bytes
    pub data: Bytes,
    /// Extension of the captured file, without the dot
    pub extension: String,
}

impl SourcePhoto {
    pub fn new(data: impl Into<Bytes>, extension: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            extension: extension.into(),
        }
    }
}

/// A photo staged for upload
///
/// Owned exclusively by the intake queue. The preview handle and the source
/// bytes are released by drop when the photo is removed or leaves the queue
/// after a successful upload.
#[derive(Debug, Clone)]
pub struct IntakePhoto {
    /// Raw captured bytes
    pub source: Bytes,
    /// User-editable name, without extension; defaults to the next free
    /// integer
    pub display_name: String,
    /// Extension of the captured file, without the dot
    pub original_extension: String,
    /// Current lifecycle status
    pub status: PhotoStatus,
    /// Pipeline output, present once normalization succeeded
    pub normalized: Option<NormalizedImage>,
    /// In-memory preview payload for the presentation layer
    pub preview: Option<Bytes>,
    /// Failure message when `status == Error`
    pub error: Option<String>,
}

impl IntakePhoto {
    /// The extension the uploaded file will carry
    pub fn effective_extension(&self) -> &str {
        match &self.normalized {
            Some(normalized) => normalized.effective_extension(&self.original_extension),
            None => &self.original_extension,
        }
    }

    /// The filename that goes on the wire
    pub fn wire_name(&self) -> String {
        let trimmed = self.display_name.trim();
        let extension = self.effective_extension();
        if extension.is_empty() {
            trimmed.to_string()
        } else {
            format!("{}.{}", trimmed, extension)
        }
    }
}
