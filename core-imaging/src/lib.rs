//! # Photo Transcode Pipeline
//!
//! Normalizes arbitrary captured images into size-bounded JPEG payloads for
//! the text-safe upload transport.
//!
//! ## Overview
//!
//! - Pass-through for already-small JPEG/PNG inputs (idempotent)
//! - Magic-byte format sniffing, JPEG transcode for everything else
//! - Raster-surface pixel cap before any further processing
//! - Linear rescale computed against the encoded JPEG size
//! - Bounded quality ladder that accepts the floor result
//!
//! Failures are scoped to a single photo and never abort siblings.

pub mod error;
pub mod transcode;

pub use error::{ImagingError, Result};
pub use transcode::{
    detect_format, NormalizedImage, SourceFormat, TranscodeConfig, TranscodePipeline,
};
