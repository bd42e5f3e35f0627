//! glyphscan-io - Image decode/encode boundary
//!
//! Everything that touches image files lives here so the processing
//! crates only ever see [`PixelBuffer`]s.
//!
//! | Format | Read | Write | Feature |
//! |--------|------|-------|---------|
//! | PNG    | yes  | yes   | `png-format` |
//! | JPEG   | yes  | yes   | `jpeg` |
//! | PNM (P5/P6) | yes | yes | `pnm` |
//!
//! [`FileSource`] and [`FileSink`] implement the core
//! [`ImageSource`]/[`ImageSink`] traits on top of these functions.

mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use glyphscan_core::{ImageSink, ImageSource, PixelBuffer};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

/// Read an image file, sniffing the format from its header.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let data = std::fs::read(path.as_ref())?;
    let buf = read_image_from_bytes(&data)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        width = buf.width(),
        height = buf.height(),
        format = ?buf.format(),
        "read image"
    );
    Ok(buf)
}

/// Decode an in-memory image, sniffing the format from its header.
pub fn read_image_from_bytes(data: &[u8]) -> IoResult<PixelBuffer> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(data, format)
}

/// Decode an in-memory image of a known format.
pub fn read_image_format(data: &[u8], format: ImageFormat) -> IoResult<PixelBuffer> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(data),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(data),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            other
        ))),
    }
}

/// Encode an image into a writer.
pub fn write_image_to<W: Write>(buf: &PixelBuffer, writer: W, format: ImageFormat) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(buf, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(buf, writer, jpeg::DEFAULT_JPEG_QUALITY),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(buf, writer),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            other
        ))),
    }
}

/// Encode an image into a byte vector.
pub fn write_image_to_bytes(buf: &PixelBuffer, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    write_image_to(buf, &mut out, format)?;
    Ok(out)
}

/// Write an image file in the given format.
pub fn write_image<P: AsRef<Path>>(
    buf: &PixelBuffer,
    path: P,
    format: ImageFormat,
) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_image_to(buf, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Reads an image from a fixed path every time it is asked.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileSource {
    type Error = IoError;

    fn acquire(&mut self) -> IoResult<PixelBuffer> {
        let file = File::open(&self.path)?;
        let mut data = Vec::new();
        std::io::Read::read_to_end(&mut BufReader::new(file), &mut data)?;
        read_image_from_bytes(&data)
    }
}

/// Writes each stored image to a numbered file in a directory.
///
/// Files are named `{stem}.{index:03}.{ext}` starting at index 0.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    stem: String,
    format: ImageFormat,
    next: usize,
}

impl FileSink {
    pub fn new<P: Into<PathBuf>>(dir: P, stem: &str, format: ImageFormat) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.to_string(),
            format,
            next: 0,
        }
    }

    /// Path the next stored image will be written to.
    pub fn next_path(&self) -> PathBuf {
        self.dir.join(format!(
            "{}.{:03}.{}",
            self.stem,
            self.next,
            self.format.extension()
        ))
    }
}

impl ImageSink for FileSink {
    type Error = IoError;

    fn store(&mut self, image: &PixelBuffer) -> IoResult<()> {
        let path = self.next_path();
        write_image(image, &path, self.format)?;
        self.next += 1;
        Ok(())
    }
}
