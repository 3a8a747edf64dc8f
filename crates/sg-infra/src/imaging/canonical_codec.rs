use std::io::Cursor;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use sg_core::ports::{CanonicalImage, ImageCodecPort};
use tracing::debug;

const FALLBACK_EXTENSION: &str = "png";

/// Formats this build can encode.
const ENCODABLE: [ImageFormat; 6] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::Gif,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

/// Decodes clipboard images and re-encodes them with fixed encoder settings.
pub struct CanonicalImageCodec;

impl CanonicalImageCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CanonicalImageCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCodecPort for CanonicalImageCodec {
    fn canonicalize(&self, bytes: &[u8], preferred_extension: &str) -> Result<CanonicalImage> {
        let decoded = image::load_from_memory(bytes).context("decode image bytes")?;

        let target = ImageFormat::from_extension(preferred_extension)
            .filter(|format| ENCODABLE.contains(format));

        if let Some(format) = target.filter(|f| *f != ImageFormat::Png) {
            match encode(&decoded, format) {
                Ok(bytes) => {
                    return Ok(CanonicalImage {
                        bytes,
                        extension: preferred_extension.to_ascii_lowercase(),
                    })
                }
                Err(err) => {
                    debug!(
                        extension = preferred_extension,
                        error = %err,
                        "Encoder rejected image, falling back to png"
                    );
                }
            }
        }

        Ok(CanonicalImage {
            bytes: encode(&decoded, ImageFormat::Png)?,
            extension: FALLBACK_EXTENSION.to_string(),
        })
    }
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let result = match format {
        // JPEG has no alpha channel.
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8())
            .write_to(&mut Cursor::new(&mut out), format),
        _ => DynamicImage::ImageRgba8(image.to_rgba8())
            .write_to(&mut Cursor::new(&mut out), format),
    };
    result.with_context(|| format!("encode image as {:?}", format))?;
    Ok(out)
}
