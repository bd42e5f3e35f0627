//! Regression test parameters and checks

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use glyphscan_core::PixelBuffer;
use glyphscan_io::ImageFormat;
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Run the checks only (default)
    #[default]
    Compare,
    /// Also write intermediate images to the regout directory
    Display,
}

impl RegTestMode {
    /// Read `REGTEST_MODE`; anything but `display` means compare.
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE") {
            Ok(v) if v.eq_ignore_ascii_case("display") => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// State of one regression test.
///
/// Every check and every written image takes the next index, so a
/// failure message like `detect_split_reg #4` points at the fourth
/// call in the test body.
#[derive(Debug)]
pub struct RegParams {
    /// Name of the test (e.g. "conncomp_fixed")
    pub test_name: String,
    pub mode: RegTestMode,
    index: usize,
    failures: Vec<String>,
}

impl RegParams {
    /// Start a test, reading the mode from the environment.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();
        eprintln!("\n==== {}_reg ({:?}) ====", test_name, mode);
        Self {
            test_name: test_name.to_string(),
            mode,
            index: 0,
            failures: Vec::new(),
        }
    }

    /// Index of the most recent check
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    /// Bump the index and record `detail` when `ok` is false.
    fn check(&mut self, ok: bool, detail: impl FnOnce() -> String) -> bool {
        self.index += 1;
        if !ok {
            let msg = format!("{}_reg #{}: {}", self.test_name, self.index, detail());
            eprintln!("{}", msg);
            self.failures.push(msg);
        }
        ok
    }

    /// Check that `actual` is within `delta` of `expected`.
    ///
    /// NaN on either side always fails.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        let diff = (expected - actual).abs();
        self.check(diff <= delta, || {
            format!("expected {expected}, got {actual} (diff {diff}, allowed {delta})")
        })
    }

    /// Check a boolean outcome.
    pub fn compare_flag(&mut self, expected: bool, actual: bool) -> bool {
        self.check(expected == actual, || format!("expected {expected}, got {actual}"))
    }

    /// Check that two buffers agree in size, format and every sample.
    ///
    /// The first differing sample is reported as channel and `(x, y)`.
    pub fn compare_buffers(&mut self, expected: &PixelBuffer, actual: &PixelBuffer) -> bool {
        if !expected.same_size(actual) || expected.format() != actual.format() {
            return self.check(false, || {
                format!(
                    "buffer shape {}x{} {:?} vs {}x{} {:?}",
                    expected.width(),
                    expected.height(),
                    expected.format(),
                    actual.width(),
                    actual.height(),
                    actual.format()
                )
            });
        }

        let first_diff = expected
            .data()
            .iter()
            .zip(actual.data())
            .position(|(a, b)| a != b);
        self.check(first_diff.is_none(), || {
            let pos = first_diff.unwrap_or_default();
            let plane = expected.plane_len();
            let w = expected.width() as usize;
            let offset = pos % plane;
            format!(
                "buffers differ at channel {} ({}, {})",
                pos / plane,
                offset % w,
                offset / w
            )
        })
    }

    /// Check that two byte strings are identical.
    pub fn compare_strings(&mut self, expected: &[u8], actual: &[u8]) -> bool {
        self.check(expected == actual, || {
            format!(
                "expected {:?} ({} bytes), got {:?} ({} bytes)",
                String::from_utf8_lossy(expected),
                expected.len(),
                String::from_utf8_lossy(actual),
                actual.len()
            )
        })
    }

    /// Write `buf` to the regout directory in display mode.
    ///
    /// The index advances in both modes so file names line up with the
    /// check numbers.
    pub fn write_buffer(&mut self, buf: &PixelBuffer, format: ImageFormat) -> TestResult<()> {
        self.index += 1;
        if !self.display() {
            return Ok(());
        }

        let dir = regout_dir();
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!(
            "{}.{:02}.{}",
            self.test_name,
            self.index,
            format.extension()
        ));
        glyphscan_io::write_image(buf, &path, format).map_err(|e| TestError::ImageWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        eprintln!("wrote {}", path.display());
        Ok(())
    }

    /// Print the summary and return whether every check passed.
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            eprintln!("ok: {}_reg ({} checks)", self.test_name, self.index);
            return true;
        }
        eprintln!("FAILED: {}_reg", self.test_name);
        for failure in &self.failures {
            eprintln!("  {}", failure);
        }
        false
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert_eq!(rp.index(), 1);
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.compare_values(0.0, f64::NAN, 1.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 2);
        assert!(rp.failures()[1].starts_with("test_reg #2"));
    }

    #[test]
    fn test_compare_flag() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_flag(true, true));
        assert!(!rp.compare_flag(false, true));
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_buffers_reports_mismatch() {
        let mut rp = RegParams::new("test");
        let a = PixelBuffer::from_gray(2, 2, vec![0, 0, 0, 0]).unwrap();
        let mut b = a.clone();
        assert!(rp.compare_buffers(&a, &b));
        b.set(1, 1, 9).unwrap();
        assert!(!rp.compare_buffers(&a, &b));
        assert!(rp.failures()[0].contains("(1, 1)"));
    }

    #[test]
    fn test_compare_strings() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_strings(b"AB", b"AB"));
        assert!(!rp.compare_strings(b"AB", b"BA"));
        assert!(!rp.cleanup());
    }
}
