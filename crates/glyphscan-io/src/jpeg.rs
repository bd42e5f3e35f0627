//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate and writes them with
//! `jpeg-encoder`. Grayscale decodes to a gray buffer, color to planar RGB.

use crate::{IoError, IoResult};
use glyphscan_core::{PixelBuffer, PixelFormat};
use std::io::{Read, Write};

/// Default quality used by [`write_jpeg`].
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<PixelBuffer> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::decode("JPEG", e))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::decode("JPEG", "header missing after decode"))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let buf = match info.pixel_format {
        jpeg_decoder::PixelFormat::L8 => PixelBuffer::from_gray(width, height, pixels)?,
        jpeg_decoder::PixelFormat::L16 => {
            // big-endian samples; keep the high byte
            let data = pixels.chunks_exact(2).map(|s| s[0]).collect();
            PixelBuffer::from_gray(width, height, data)?
        }
        jpeg_decoder::PixelFormat::RGB24 => {
            PixelBuffer::from_rgb_interleaved(width, height, &pixels)?
        }
        jpeg_decoder::PixelFormat::CMYK32 => {
            let rgb: Vec<u8> = pixels
                .chunks_exact(4)
                .flat_map(|p| {
                    let k = 255 - p[3] as u32;
                    [
                        ((255 - p[0] as u32) * k / 255) as u8,
                        ((255 - p[1] as u32) * k / 255) as u8,
                        ((255 - p[2] as u32) * k / 255) as u8,
                    ]
                })
                .collect();
            PixelBuffer::from_rgb_interleaved(width, height, &rgb)?
        }
        #[allow(unreachable_patterns)]
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };

    Ok(buf)
}

/// Write a buffer as baseline JPEG.
///
/// # Errors
///
/// Returns [`IoError::Encode`] when a side exceeds 65535 pixels.
pub fn write_jpeg<W: Write>(buf: &PixelBuffer, writer: W, quality: u8) -> IoResult<()> {
    let too_large = |side: u32| IoError::encode("JPEG", format!("side {side} exceeds 65535"));
    let width = u16::try_from(buf.width()).map_err(|_| too_large(buf.width()))?;
    let height = u16::try_from(buf.height()).map_err(|_| too_large(buf.height()))?;

    let color_type = match buf.format() {
        PixelFormat::Gray => jpeg_encoder::ColorType::Luma,
        PixelFormat::Rgb => jpeg_encoder::ColorType::Rgb,
    };

    let encoder = jpeg_encoder::Encoder::new(writer, quality);
    encoder
        .encode(&buf.to_interleaved(), width, height, color_type)
        .map_err(|e| IoError::encode("JPEG", e))
}
