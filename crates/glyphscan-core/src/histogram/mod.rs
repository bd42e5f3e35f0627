//! Intensity histograms
//!
//! A [`Histogram`] holds per-intensity bin counts of a grayscale image
//! together with scalar statistics derived in the same pass. It is built
//! once by [`Histogram::from_buffer`] and is immutable afterwards, except
//! for [`Histogram::normalize`] which rescales the bins to frequencies
//! exactly once.
//!
//! # See also
//!
//! [`serial`] for the on-disk format.

pub mod serial;

use crate::error::Result;
use crate::pixel::PixelBuffer;

/// Number of bins for an 8-bit image.
pub const DEFAULT_NUM_BINS: usize = 256;

/// Bin counts plus derived statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<f32>,
    normalized: bool,
    /// Populated bin with the smallest count (earliest on ties)
    pub min_bin: usize,
    /// Populated bin with the largest count (earliest on ties)
    pub max_bin: usize,
    pub min_count: f32,
    pub max_count: f32,
    /// First bin where the running count exceeds half the pixel count
    pub median_bin: usize,
    /// Bin whose count is the median of all bin counts
    pub median_count_bin: usize,
    pub total_pixels: u64,
    pub total_intensity: u64,
    pub min_intensity: f64,
    pub max_intensity: f64,
    pub mean_intensity: f64,
    pub median_intensity: f64,
    /// Population standard deviation of the intensities
    pub intensity_stdev: f64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::with_bins(vec![0.0; DEFAULT_NUM_BINS])
    }
}

impl Histogram {
    /// Wrap raw bin values without deriving any statistics.
    ///
    /// Used for histograms restored from disk, where only the bins are
    /// persisted. Such histograms report `total_pixels == 0` and are never
    /// rescaled by [`Histogram::normalize`].
    pub fn with_bins(bins: Vec<f32>) -> Self {
        Self {
            bins,
            normalized: false,
            min_bin: 0,
            max_bin: 0,
            min_count: 0.0,
            max_count: 0.0,
            median_bin: 0,
            median_count_bin: 0,
            total_pixels: 0,
            total_intensity: 0,
            min_intensity: 0.0,
            max_intensity: 0.0,
            mean_intensity: 0.0,
            median_intensity: 0.0,
            intensity_stdev: 0.0,
        }
    }

    /// Compute the histogram of the gray plane of `image`.
    ///
    /// RGB input is converted to luminance first.
    ///
    /// The bins and the intensity total come from a pass over the pixels;
    /// everything else comes from a single pass over the bins, including
    /// the sum of squares used for the standard deviation.
    pub fn from_buffer(image: &PixelBuffer) -> Self {
        let gray;
        let data = if image.channels() == 1 {
            image.data()
        } else {
            gray = image.to_gray();
            gray.data()
        };
        Self::from_samples(data)
    }

    fn from_samples(data: &[u8]) -> Self {
        let mut hist = Self::default();
        let length = data.len() as u64;

        for &v in data {
            hist.bins[v as usize] += 1.0;
            hist.total_intensity += v as u64;
        }
        hist.total_pixels = length;
        if length == 0 {
            return hist;
        }
        hist.mean_intensity = hist.total_intensity as f64 / length as f64;

        let half = length / 2;
        let mut running = 0u64;
        let mut median: Option<usize> = None;
        let mut min_count = f32::MAX;
        let mut max_count = f32::MIN;
        let mut min_intensity = None;
        let mut max_intensity = 0usize;
        let mut total_square = 0.0f64;

        for (i, &count) in hist.bins.iter().enumerate() {
            if count == 0.0 {
                continue;
            }
            if count < min_count {
                min_count = count;
                hist.min_bin = i;
            }
            if count > max_count {
                max_count = count;
                hist.max_bin = i;
            }
            min_intensity.get_or_insert(i);
            max_intensity = i;
            total_square += count as f64 * (i * i) as f64;
            if median.is_none() {
                running += count as u64;
                if running > half {
                    median = Some(i);
                }
            }
        }

        hist.min_count = min_count;
        hist.max_count = max_count;
        hist.min_intensity = min_intensity.unwrap_or(0) as f64;
        hist.max_intensity = max_intensity as f64;
        hist.median_bin = median.unwrap_or(0);
        hist.median_intensity = hist.median_bin as f64;

        let n = length as f64;
        let mean = hist.mean_intensity;
        let square_dev = n * mean * mean - 2.0 * mean * hist.total_intensity as f64 + total_square;
        hist.intensity_stdev = (square_dev.max(0.0) / n).sqrt();

        let mut order: Vec<usize> = (0..hist.bins.len()).collect();
        order.sort_by(|&a, &b| hist.bins[a].total_cmp(&hist.bins[b]));
        hist.median_count_bin = order[(order.len() - 1) / 2];

        hist
    }

    /// Compute and normalize in one step.
    pub fn normalized(image: &PixelBuffer) -> Self {
        let mut hist = Self::from_buffer(image);
        hist.normalize();
        hist
    }

    /// Divide every bin by the pixel count so the bins sum to 1.
    ///
    /// Returns `false` and leaves the bins untouched when the histogram was
    /// already normalized or carries no pixel count.
    pub fn normalize(&mut self) -> bool {
        if self.normalized || self.total_pixels == 0 {
            return false;
        }
        let total = self.total_pixels as f32;
        for b in &mut self.bins {
            *b /= total;
        }
        self.normalized = true;
        true
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Bin-wise mean of several histograms.
    ///
    /// Histograms with fewer bins contribute zero to the missing bins.
    /// Returns `None` for an empty slice.
    pub fn average(hists: &[Histogram]) -> Option<Histogram> {
        if hists.is_empty() {
            return None;
        }
        let num_bins = hists.iter().map(Histogram::num_bins).max().unwrap_or(0);
        let mut sum = vec![0.0f32; num_bins];
        for h in hists {
            for (acc, &b) in sum.iter_mut().zip(&h.bins) {
                *acc += b;
            }
        }
        let n = hists.len() as f32;
        for b in &mut sum {
            *b /= n;
        }
        Some(Histogram::with_bins(sum))
    }

    /// Sum of absolute bin differences over the bins both histograms share.
    pub fn l1_distance(&self, other: &Histogram) -> f64 {
        self.bins
            .iter()
            .zip(&other.bins)
            .map(|(&a, &b)| (a as f64 - b as f64).abs())
            .sum()
    }
}

/// Compute a histogram, returning an error for RGB input that cannot be
/// viewed as gray.
///
/// # See also
///
/// [`Histogram::from_buffer`], which converts RGB instead of failing.
pub fn gray_histogram(image: &PixelBuffer) -> Result<Histogram> {
    let view = image.view()?;
    Ok(Histogram::from_samples(view.data()))
}
