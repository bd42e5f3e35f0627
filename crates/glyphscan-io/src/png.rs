//! PNG image format support
//!
//! Decoding expands palettes and low bit depths to 8-bit samples.
//! Grayscale (with or without alpha) becomes a gray buffer; everything
//! else becomes planar RGB. Alpha is dropped and 16-bit samples keep
//! their high byte.

use crate::{IoError, IoResult};
use glyphscan_core::{PixelBuffer, PixelFormat};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<PixelBuffer> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::decode("PNG", e))?;

    let width = reader.info().width;
    let height = reader.info().height;
    let (color_type, bit_depth) = reader.output_color_type();

    let samples = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "indexed PNG was not expanded".to_string(),
            ));
        }
    };
    let bytes_per_sample = match bit_depth {
        BitDepth::Eight => 1,
        BitDepth::Sixteen => 2,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG bit depth after expansion: {:?}",
                other
            )));
        }
    };

    // Read image data
    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::decode("PNG", "output buffer size overflows"))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::decode("PNG", e))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let stride = samples * bytes_per_sample;

    let format = if samples <= 2 {
        PixelFormat::Gray
    } else {
        PixelFormat::Rgb
    };
    let mut out = PixelBuffer::new(width, height, format)?;
    let plane = out.plane_len();
    let out_data = out.data_mut();

    for y in 0..height as usize {
        let row = &data[y * bytes_per_row..];
        for x in 0..width as usize {
            let px = &row[x * stride..];
            let dst = y * width as usize + x;
            match format {
                PixelFormat::Gray => out_data[dst] = px[0],
                PixelFormat::Rgb => {
                    out_data[dst] = px[0];
                    out_data[plane + dst] = px[bytes_per_sample];
                    out_data[2 * plane + dst] = px[2 * bytes_per_sample];
                }
            }
        }
    }

    Ok(out)
}

/// Write a PNG image
///
/// Gray buffers are stored as 8-bit grayscale, RGB buffers as 8-bit RGB.
pub fn write_png<W: Write>(buf: &PixelBuffer, writer: W) -> IoResult<()> {
    let color_type = match buf.format() {
        PixelFormat::Gray => ColorType::Grayscale,
        PixelFormat::Rgb => ColorType::Rgb,
    };

    let mut encoder = Encoder::new(writer, buf.width(), buf.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::encode("PNG", e))?;

    writer
        .write_image_data(&buf.to_interleaved())
        .map_err(|e| IoError::encode("PNG", e))?;
    writer
        .finish()
        .map_err(|e| IoError::encode("PNG", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_png_roundtrip_gray() {
        let buf = PixelBuffer::from_gray(3, 2, vec![0, 50, 100, 150, 200, 255]).unwrap();
        let mut bytes = Vec::new();
        write_png(&buf, &mut bytes).unwrap();
        let back = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(back, buf);
    }

    #[test]
    fn test_png_roundtrip_rgb() {
        let buf =
            PixelBuffer::from_rgb_planes(2, 1, &[255, 0], &[0, 128], &[10, 20]).unwrap();
        let mut bytes = Vec::new();
        write_png(&buf, &mut bytes).unwrap();
        let back = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(back, buf);
    }

    #[test]
    fn test_png_garbage() {
        assert!(read_png(Cursor::new(vec![0u8; 16])).is_err());
    }
}
