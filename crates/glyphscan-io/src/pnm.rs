//! PNM (Portable Any Map) format support
//!
//! Reads and writes PGM (P5 binary) and PPM (P6 binary). Header comments
//! are skipped. Samples with a maxval other than 255 are rescaled to
//! 8 bits; 16-bit samples are big-endian per the format.

use crate::{IoError, IoResult};
use glyphscan_core::{PixelBuffer, PixelFormat};
use std::io::{BufRead, Read, Write};

fn read_byte<R: BufRead>(reader: &mut R) -> IoResult<Option<u8>> {
    let mut b = [0u8; 1];
    match reader.read(&mut b)? {
        0 => Ok(None),
        _ => Ok(Some(b[0])),
    }
}

/// Read the next whitespace-delimited header token, skipping `#` comments.
fn read_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    loop {
        let Some(b) = read_byte(reader)? else {
            break;
        };
        if b == b'#' && token.is_empty() {
            let mut line = Vec::new();
            reader.read_until(b'\n', &mut line)?;
            continue;
        }
        if b.is_ascii_whitespace() {
            if token.is_empty() {
                continue;
            }
            break;
        }
        token.push(b as char);
    }
    if token.is_empty() {
        return Err(IoError::InvalidData("truncated PNM header".to_string()));
    }
    Ok(token)
}

fn read_number<R: BufRead>(reader: &mut R, what: &str) -> IoResult<u32> {
    let token = read_token(reader)?;
    token
        .parse()
        .map_err(|_| IoError::InvalidData(format!("bad PNM {}: {:?}", what, token)))
}

/// Read a PNM image (P5/P6) from a reader.
///
/// # Arguments
/// * `reader` - A buffered reader positioned at the `P5`/`P6` magic
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<PixelBuffer> {
    let magic = read_token(&mut reader)?;
    let format = match magic.as_str() {
        "P5" => PixelFormat::Gray,
        "P6" => PixelFormat::Rgb,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM variant {} not supported",
                other
            )));
        }
    };
    let width = read_number(&mut reader, "width")?;
    let height = read_number(&mut reader, "height")?;
    let maxval = read_number(&mut reader, "maxval")?;
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!("bad PNM maxval: {}", maxval)));
    }
    // read_token consumed the single whitespace byte after maxval

    let channels = format.channels();
    let bytes_per_sample = if maxval > 255 { 2 } else { 1 };
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels * bytes_per_sample))
        .ok_or_else(|| {
            IoError::InvalidData(format!("PNM dimensions too large: {}x{}", width, height))
        })?;
    // the header is untrusted; grow with the data actually present
    let mut raw = Vec::new();
    reader.take(expected as u64).read_to_end(&mut raw)?;
    if raw.len() < expected {
        return Err(IoError::InvalidData(format!(
            "truncated PNM raster: {} of {} bytes",
            raw.len(),
            expected
        )));
    }

    let samples: Vec<u8> = if bytes_per_sample == 2 {
        raw.chunks_exact(2)
            .map(|s| (u16::from_be_bytes([s[0], s[1]]) as u32 * 255 / maxval) as u8)
            .collect()
    } else if maxval != 255 {
        raw.iter()
            .map(|&v| ((v as u32).min(maxval) * 255 / maxval) as u8)
            .collect()
    } else {
        raw
    };

    let buf = match format {
        PixelFormat::Gray => PixelBuffer::from_gray(width, height, samples)?,
        PixelFormat::Rgb => PixelBuffer::from_rgb_interleaved(width, height, &samples)?,
    };
    Ok(buf)
}

/// Write a buffer as binary PNM to a writer.
///
/// Chooses P5 for gray and P6 for RGB buffers.
///
/// # Arguments
/// * `buf`    - The image to encode
/// * `writer` - Destination writer
pub fn write_pnm<W: Write>(buf: &PixelBuffer, mut writer: W) -> IoResult<()> {
    let magic = match buf.format() {
        PixelFormat::Gray => "P5",
        PixelFormat::Rgb => "P6",
    };
    write!(writer, "{}\n{} {}\n255\n", magic, buf.width(), buf.height())?;
    writer.write_all(&buf.to_interleaved())?;
    writer.flush()?;
    Ok(())
}
