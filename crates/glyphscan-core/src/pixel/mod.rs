//! Owned pixel buffers and borrowed gray views
//!
//! [`PixelBuffer`] owns either a single 8-bit intensity plane or three
//! planes (red, green, blue) stored one after another. Every plane is
//! row-major with length `width * height`.
//!
//! Borrowing is explicit: [`PixelBuffer::view`] hands out a read-only
//! [`GrayView`], and [`GrayView::to_buffer`] clones it into a new owned
//! buffer. There is no shared mutable aliasing between the two.

pub mod arith;
pub mod clip;
pub mod compare;
pub mod convert;

pub use arith::ArithOp;

use crate::error::{Error, Result};

/// Layout of the samples in a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One 8-bit intensity plane
    Gray,
    /// Three 8-bit planes in red, green, blue order
    Rgb,
}

impl PixelFormat {
    /// Number of planes for this format.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
        }
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    Ok(width as usize * height as usize)
}

/// An owned 8-bit raster, grayscale or planar RGB.
///
/// # Invariants
///
/// * `width > 0` and `height > 0`
/// * `data.len() == width * height * format.channels()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either side is zero.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let plane = check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            format,
            data: vec![0; plane * format.channels()],
        })
    }

    /// Take ownership of a grayscale plane.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `data.len() != width * height`.
    pub fn from_gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let plane = check_dimensions(width, height)?;
        if data.len() != plane {
            return Err(Error::BufferSizeMismatch {
                expected: plane,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format: PixelFormat::Gray,
            data,
        })
    }

    /// Build an RGB buffer from three separate planes.
    pub fn from_rgb_planes(
        width: u32,
        height: u32,
        red: &[u8],
        green: &[u8],
        blue: &[u8],
    ) -> Result<Self> {
        let plane = check_dimensions(width, height)?;
        for p in [red, green, blue] {
            if p.len() != plane {
                return Err(Error::BufferSizeMismatch {
                    expected: plane,
                    actual: p.len(),
                });
            }
        }
        let mut data = Vec::with_capacity(plane * 3);
        data.extend_from_slice(red);
        data.extend_from_slice(green);
        data.extend_from_slice(blue);
        Ok(Self {
            width,
            height,
            format: PixelFormat::Rgb,
            data,
        })
    }

    /// Build an RGB buffer from interleaved `RGBRGB...` samples.
    pub fn from_rgb_interleaved(width: u32, height: u32, samples: &[u8]) -> Result<Self> {
        let plane = check_dimensions(width, height)?;
        if samples.len() != plane * 3 {
            return Err(Error::BufferSizeMismatch {
                expected: plane * 3,
                actual: samples.len(),
            });
        }
        let mut data = vec![0u8; plane * 3];
        for (i, px) in samples.chunks_exact(3).enumerate() {
            data[i] = px[0];
            data[plane + i] = px[1];
            data[2 * plane + i] = px[2];
        }
        Ok(Self {
            width,
            height,
            format: PixelFormat::Rgb,
            data,
        })
    }

    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Number of pixels in one plane.
    #[inline]
    pub fn plane_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when both buffers have the same width and height.
    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// All samples, plane after plane.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its samples.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Borrow one plane.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= self.channels()`.
    pub fn plane(&self, channel: usize) -> &[u8] {
        let n = self.plane_len();
        &self.data[channel * n..(channel + 1) * n]
    }

    /// Mutably borrow one plane.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= self.channels()`.
    pub fn plane_mut(&mut self, channel: usize) -> &mut [u8] {
        let n = self.plane_len();
        &mut self.data[channel * n..(channel + 1) * n]
    }

    /// Iterate over the planes.
    pub fn planes(&self) -> std::slice::Chunks<'_, u8> {
        self.data.chunks(self.plane_len())
    }

    /// Read the first-plane sample at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.get_channel(0, x, y)
    }

    /// Read a sample of the given plane.
    pub fn get_channel(&self, channel: usize, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height || channel >= self.channels() {
            return None;
        }
        let idx = channel * self.plane_len() + y as usize * self.width as usize + x as usize;
        Some(self.data[idx])
    }

    /// Write a first-plane sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when `(x, y)` lies outside the image.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        self.set_channel(0, x, y, value)
    }

    pub fn set_channel(&mut self, channel: usize, x: u32, y: u32, value: u8) -> Result<()> {
        if x >= self.width || y >= self.height || channel >= self.channels() {
            let len = self.data.len();
            return Err(Error::IndexOutOfBounds {
                index: channel * self.plane_len()
                    + y as usize * self.width as usize
                    + x as usize,
                len,
            });
        }
        let idx = channel * self.plane_len() + y as usize * self.width as usize + x as usize;
        self.data[idx] = value;
        Ok(())
    }

    /// Zero every sample.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Samples in `RGBRGB...` order (or the gray plane unchanged).
    pub fn to_interleaved(&self) -> Vec<u8> {
        match self.format {
            PixelFormat::Gray => self.data.clone(),
            PixelFormat::Rgb => {
                let n = self.plane_len();
                let mut out = Vec::with_capacity(n * 3);
                for i in 0..n {
                    out.push(self.data[i]);
                    out.push(self.data[n + i]);
                    out.push(self.data[2 * n + i]);
                }
                out
            }
        }
    }

    /// Borrow the grayscale plane as a read-only view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for RGB buffers; convert with
    /// [`PixelBuffer::to_gray`] first.
    pub fn view(&self) -> Result<GrayView<'_>> {
        if self.format != PixelFormat::Gray {
            return Err(Error::UnsupportedFormat {
                expected: "gray",
                actual: self.format,
            });
        }
        Ok(GrayView {
            width: self.width,
            height: self.height,
            data: &self.data,
        })
    }
}

/// A read-only grayscale raster borrowed from somewhere else.
#[derive(Debug, Clone, Copy)]
pub struct GrayView<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> GrayView<'a> {
    /// Borrow a row-major slice as a gray raster.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        let plane = check_dimensions(width, height)?;
        if data.len() != plane {
            return Err(Error::BufferSizeMismatch {
                expected: plane,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }

    /// Clone the viewed samples into a new owned buffer.
    pub fn to_buffer(&self) -> PixelBuffer {
        PixelBuffer {
            width: self.width,
            height: self.height,
            format: PixelFormat::Gray,
            data: self.data.to_vec(),
        }
    }
}
