//! Photo normalization pipeline
//!
//! Turns an arbitrary captured image into a size-bounded JPEG payload that
//! fits the remote request limit once base64-encoded (4/3 expansion applied
//! before the ceiling). Oversized rasters are downscaled before encoding to
//! stay inside the raster-surface limits of constrained devices.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Cursor;
use tracing::{debug, warn};

use crate::error::{ImagingError, Result};

/// Transcode pipeline configuration
///
/// Defaults keep a 3 MiB binary payload, which stays under a 4 MiB request
/// body after base64 expansion.
#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    /// Binary payload ceiling in bytes
    pub max_payload_bytes: usize,
    /// Maximum pixel count before a pre-decode downscale is forced
    pub max_pixels: u64,
    /// JPEG quality for the first encode (0-100)
    pub initial_quality: u8,
    /// Quality decrement per ladder step
    pub quality_step: u8,
    /// Lowest quality the ladder will accept
    pub quality_floor: u8,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 3 * 1024 * 1024,
            max_pixels: 16_000_000,
            initial_quality: 92,
            quality_step: 10,
            quality_floor: 50,
        }
    }
}

/// Raster formats recognized by magic-byte sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Bmp,
    Tiff,
    /// Camera-native HEIF/HEIC container
    Heic,
}

impl SourceFormat {
    /// Whether the transport accepts this format without transcoding
    fn is_transmittable(&self) -> bool {
        matches!(self, SourceFormat::Jpeg | SourceFormat::Png)
    }
}

/// Detects the image format from magic bytes
///
/// Returns `None` when the data matches no known raster container.
pub fn detect_format(data: &[u8]) -> Option<SourceFormat> {
    if data.len() < 12 {
        return None;
    }

    match &data[0..4] {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, _] => Some(SourceFormat::Jpeg),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47] => Some(SourceFormat::Png),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38] => Some(SourceFormat::Gif),
        // WEBP: 52 49 46 46 ... 57 45 42 50
        [0x52, 0x49, 0x46, 0x46] if &data[8..12] == b"WEBP" => Some(SourceFormat::WebP),
        // BMP: 42 4D
        [0x42, 0x4D, _, _] => Some(SourceFormat::Bmp),
        // TIFF: II*\0 or MM\0*
        [0x49, 0x49, 0x2A, 0x00] | [0x4D, 0x4D, 0x00, 0x2A] => Some(SourceFormat::Tiff),
        // HEIF family: ....ftyp with a heif brand
        _ if &data[4..8] == b"ftyp"
            && (&data[8..12] == b"heic"
                || &data[8..12] == b"heix"
                || &data[8..12] == b"hevc"
                || &data[8..12] == b"mif1") =>
        {
            Some(SourceFormat::Heic)
        }
        _ => None,
    }
}

/// Result of running a photo through the pipeline
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// Final payload bytes
    pub data: Bytes,
    /// Whether the pipeline altered format or size; drives the effective
    /// extension of the uploaded file
    pub altered: bool,
    /// JPEG quality of the final encode, `None` on pass-through
    pub quality: Option<u8>,
}

impl NormalizedImage {
    /// The extension the uploaded file should carry.
    ///
    /// The transcoded extension whenever the pipeline altered the photo,
    /// otherwise the original one.
    pub fn effective_extension<'a>(&self, original: &'a str) -> &'a str {
        if self.altered {
            "jpg"
        } else {
            original
        }
    }
}

/// Photo normalization pipeline
///
/// `normalize` is a pure CPU-bound function; async callers run it on a
/// blocking pool.
#[derive(Debug, Clone, Default)]
pub struct TranscodePipeline {
    config: TranscodeConfig,
}

impl TranscodePipeline {
    pub fn new(config: TranscodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranscodeConfig {
        &self.config
    }

    /// Normalize a captured image into a size-bounded JPEG payload.
    ///
    /// Already-small JPEG/PNG inputs pass through unchanged, which also makes
    /// the pipeline idempotent: re-applying it to its own output is a no-op.
    ///
    /// # Errors
    ///
    /// Decode and encode failures are scoped to this single photo; callers
    /// must not let them abort sibling photos.
    pub fn normalize(&self, data: &[u8]) -> Result<NormalizedImage> {
        let format = detect_format(data);

        if data.len() <= self.config.max_payload_bytes
            && format.map(|f| f.is_transmittable()).unwrap_or(false)
        {
            debug!(bytes = data.len(), "Photo already transmittable, passing through");
            return Ok(NormalizedImage {
                data: Bytes::copy_from_slice(data),
                altered: false,
                quality: None,
            });
        }

        if format == Some(SourceFormat::Heic) {
            // No HEIF decoder is available; surface a per-photo error
            return Err(ImagingError::UnsupportedFormat(
                "HEIC container cannot be decoded on this device".to_string(),
            ));
        }

        let img = image::load_from_memory(data)
            .map_err(|e| ImagingError::Decode(format!("Failed to load image: {}", e)))?;

        let img = self.cap_pixels(img);

        let mut encoded = self.encode_jpeg(&img, self.config.initial_quality)?;
        if encoded.len() <= self.config.max_payload_bytes {
            return Ok(NormalizedImage {
                data: Bytes::from(encoded),
                altered: true,
                quality: Some(self.config.initial_quality),
            });
        }

        // Linear rescale against the encoded JPEG size; the original byte
        // count would over- or under-shoot because JPEG compression ratios
        // are non-linear.
        let scale =
            (self.config.max_payload_bytes as f64 / encoded.len() as f64).sqrt();
        let img = if scale < 1.0 {
            let new_w = ((img.width() as f64 * scale) as u32).max(1);
            let new_h = ((img.height() as f64 * scale) as u32).max(1);
            debug!(new_w, new_h, "Rescaling photo toward the payload ceiling");
            img.resize(new_w, new_h, FilterType::Lanczos3)
        } else {
            img
        };
        encoded = self.encode_jpeg(&img, self.config.initial_quality)?;

        // Quality ladder: fixed decrements down to the floor, accepting the
        // floor result even if still over; never loops indefinitely.
        let mut quality = self.config.initial_quality;
        while encoded.len() > self.config.max_payload_bytes && quality > self.config.quality_floor
        {
            quality = quality
                .saturating_sub(self.config.quality_step)
                .max(self.config.quality_floor);
            encoded = self.encode_jpeg(&img, quality)?;
        }

        if encoded.len() > self.config.max_payload_bytes {
            warn!(
                bytes = encoded.len(),
                quality, "Photo still over the payload ceiling at the quality floor"
            );
        }

        Ok(NormalizedImage {
            data: Bytes::from(encoded),
            altered: true,
            quality: Some(quality),
        })
    }

    /// Downscale so the pixel count stays inside the raster-surface bound
    fn cap_pixels(&self, img: DynamicImage) -> DynamicImage {
        let pixels = img.width() as u64 * img.height() as u64;
        if pixels <= self.config.max_pixels {
            return img;
        }

        let scale = (self.config.max_pixels as f64 / pixels as f64).sqrt();
        let new_w = ((img.width() as f64 * scale) as u32).max(1);
        let new_h = ((img.height() as f64 * scale) as u32).max(1);
        debug!(
            pixels,
            new_w, new_h, "Downscaling photo under the raster-surface bound"
        );
        img.resize(new_w, new_h, FilterType::Lanczos3)
    }

    fn encode_jpeg(&self, img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut binding = Cursor::new(&mut buffer);
        let encoder = JpegEncoder::new_with_quality(&mut binding, quality);
        img.write_with_encoder(encoder)
            .map_err(|e| ImagingError::Encode(format!("JPEG encode failed: {}", e)))?;
        Ok(buffer)
    }
}
