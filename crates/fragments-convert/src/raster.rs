//! Raster image transcoding between PNG, JPEG, WebP, GIF and AVIF.
//!
//! The source is decoded with its declared codec and re-encoded with the
//! target codec. PNG, WebP (lossless) and GIF keep exact pixels; JPEG drops
//! the alpha channel; AVIF is lossy. AVIF is encoded with rav1e and decoded
//! with dav1d.

use std::io::Cursor;

use fragments_types::{Extension, MediaType};
use image::{DynamicImage, ImageFormat};

use crate::engine::Converted;
use crate::error::{ConvertError, ConvertResult};

/// Transcode an image into the codec named by `target`.
pub fn convert(source: MediaType, target: Extension, data: &[u8]) -> ConvertResult<Converted> {
    let target_type = target.media_type();
    let (Some(input), Some(output)) = (codec(source), codec(target_type)) else {
        return Err(ConvertError::Unsupported { from: source, to: target });
    };

    let decoded = image::load_from_memory_with_format(data, input).map_err(|e| {
        ConvertError::Image {
            media_type: source,
            reason: e.to_string(),
        }
    })?;
    let encoded = encode(prepare(decoded, output), output).map_err(|e| ConvertError::Image {
        media_type: target_type,
        reason: e.to_string(),
    })?;
    tracing::debug!(%source, target = %target_type, bytes = encoded.len(), "image transcoded");
    Ok(Converted::new(target_type, encoded))
}

fn codec(media_type: MediaType) -> Option<ImageFormat> {
    match media_type {
        MediaType::ImagePng => Some(ImageFormat::Png),
        MediaType::ImageJpeg => Some(ImageFormat::Jpeg),
        MediaType::ImageWebp => Some(ImageFormat::WebP),
        MediaType::ImageGif => Some(ImageFormat::Gif),
        MediaType::ImageAvif => Some(ImageFormat::Avif),
        _ => None,
    }
}

/// Convert pixels into a layout the target encoder accepts.
fn prepare(image: DynamicImage, output: ImageFormat) -> DynamicImage {
    match output {
        ImageFormat::Png => image,
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}

fn encode(image: DynamicImage, output: ImageFormat) -> image::ImageResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, output)?;
    Ok(out.into_inner())
}
