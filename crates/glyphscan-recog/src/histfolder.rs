//! Histogram folder utilities
//!
//! Batch helpers over a directory: compute the normalized histogram of
//! every decodable image, or load every decodable histogram file. Entries
//! that fail are logged and skipped; an unusable folder yields an empty
//! list.

use crate::error::RecogResult;
use crate::golden::list_files;
use glyphscan_core::Histogram;
use std::path::{Path, PathBuf};

/// Normalized histograms of every image in `dir`, in file name order.
///
/// # Errors
///
/// Returns an error only when the directory cannot be listed.
pub fn calc_folder<P: AsRef<Path>>(dir: P) -> RecogResult<Vec<(PathBuf, Histogram)>> {
    let mut out = Vec::new();
    for path in list_files(dir.as_ref())? {
        match glyphscan_io::read_image(&path) {
            Ok(image) => out.push((path, Histogram::normalized(&image))),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping image"),
        }
    }
    tracing::debug!(count = out.len(), "computed folder histograms");
    Ok(out)
}

/// Every histogram file in `dir` that loads, in file name order.
///
/// # Errors
///
/// Returns an error only when the directory cannot be listed.
pub fn load_folder<P: AsRef<Path>>(dir: P) -> RecogResult<Vec<(PathBuf, Histogram)>> {
    let mut out = Vec::new();
    for path in list_files(dir.as_ref())? {
        match Histogram::load(&path) {
            Ok(hist) => out.push((path, hist)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping histogram"),
        }
    }
    tracing::debug!(count = out.len(), "loaded folder histograms");
    Ok(out)
}

/// Bin-wise mean of every histogram in `dir`; `None` when none loads.
pub fn average_folder<P: AsRef<Path>>(dir: P) -> RecogResult<Option<Histogram>> {
    let hists: Vec<Histogram> = load_folder(dir)?.into_iter().map(|(_, h)| h).collect();
    Ok(Histogram::average(&hists))
}
