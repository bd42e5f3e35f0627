//! glyphscan-test - Regression test harness for glyphscan
//!
//! [`RegParams`] numbers every check of a test and collects failures so a
//! test reports all of them at once. `REGTEST_MODE=display` additionally
//! writes intermediate images to [`regout_dir`].
//!
//! ```ignore
//! use glyphscan_test::{RegParams, synth};
//!
//! let mut rp = RegParams::new("conncomp");
//! let (mask, stride) = synth::mask_from_ascii(&["#.#", "..."]);
//! rp.compare_values(2.0, labeling.num_clusters as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! No binary fixtures are shipped; [`synth`] builds the images tests need.

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use std::path::PathBuf;

/// Directory for display-mode images.
///
/// `REGTEST_OUTDIR` overrides the default `target/regout` under the
/// workspace root.
pub fn regout_dir() -> PathBuf {
    match std::env::var_os("REGTEST_OUTDIR") {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/regout"),
    }
}
