//! Camera still processing: mirroring and encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{imageops, DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

use crate::models::config::CaptureFormat;
use crate::models::error::RestyleError;
use crate::models::image_models::EncodedImage;

/// Mirror a raw sensor frame so it matches the selfie preview the user saw.
pub fn mirror_horizontally(frame: &RgbaImage) -> RgbaImage {
    imageops::flip_horizontal(frame)
}

/// Encode a frame at its native resolution.
pub fn encode_frame(frame: &RgbaImage, format: CaptureFormat) -> Result<EncodedImage, RestyleError> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(RestyleError::CameraUnavailable("camera produced an empty frame".into()));
    }

    let mut buf = Cursor::new(Vec::new());
    match format {
        CaptureFormat::Jpeg { quality } => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgba8(frame.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut buf, quality)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| RestyleError::Decode(format!("jpeg encoding failed: {}", e)))?;
        }
        CaptureFormat::Png => {
            PngEncoder::new(&mut buf)
                .write_image(frame.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| RestyleError::Decode(format!("png encoding failed: {}", e)))?;
        }
    }

    Ok(EncodedImage::new(buf.into_inner(), format.media_type()))
}

/// Mirror then encode; the full still-capture path.
pub fn process_capture(frame: &RgbaImage, format: CaptureFormat) -> Result<EncodedImage, RestyleError> {
    encode_frame(&mirror_horizontally(frame), format)
}
