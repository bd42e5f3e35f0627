//! Image acquisition and persistence boundary
//!
//! The processing crates never decode files themselves. They receive a
//! [`PixelBuffer`] from an [`ImageSource`] and hand results to an
//! [`ImageSink`]. Concrete file-backed implementations live in
//! `glyphscan-io`.

use crate::pixel::PixelBuffer;

/// Something that can produce a pixel buffer.
pub trait ImageSource {
    /// Error produced when acquisition fails.
    type Error: std::error::Error;

    fn acquire(&mut self) -> Result<PixelBuffer, Self::Error>;
}

/// Something that can persist a pixel buffer.
pub trait ImageSink {
    type Error: std::error::Error;

    fn store(&mut self, image: &PixelBuffer) -> Result<(), Self::Error>;
}

/// An in-memory source that yields a clone of the same buffer every time.
#[derive(Debug, Clone)]
pub struct MemorySource(pub PixelBuffer);

impl ImageSource for MemorySource {
    type Error = std::convert::Infallible;

    fn acquire(&mut self) -> Result<PixelBuffer, Self::Error> {
        Ok(self.0.clone())
    }
}

/// An in-memory sink that keeps everything it receives.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub images: Vec<PixelBuffer>,
}

impl ImageSink for MemorySink {
    type Error = std::convert::Infallible;

    fn store(&mut self, image: &PixelBuffer) -> Result<(), Self::Error> {
        self.images.push(image.clone());
        Ok(())
    }
}
