//! glyphscan-recog - Glyph recognition for glyphscan
//!
//! This crate provides:
//!
//! - **Golden sets**: Reference glyph templates loaded from a folder
//! - **Solver**: Preprocessing, detection and template classification
//! - **Histogram folders**: Batch histogram computation and loading
//!
//! # Quick Start
//!
//! ```no_run
//! use glyphscan_recog::{GoldenSet, Solver, SolverOptions};
//!
//! let golden = GoldenSet::load_dir("golden").unwrap();
//! let solver = Solver::new(golden, SolverOptions::default());
//! let image = glyphscan_io::read_image("captcha.png").unwrap();
//! println!("{}", solver.solve(&image).unwrap().text);
//! ```
//!
//! # Modules
//!
//! - [`golden`]: Golden templates and sets
//! - [`solver`]: The glyph solver
//! - [`histfolder`]: Folder-level histogram helpers

mod error;
pub mod golden;
pub mod histfolder;
pub mod solver;

pub use error::{RecogError, RecogResult};

pub use golden::{GoldenSet, GoldenTemplate};
pub use glyphscan_region::GOLDEN_THRESHOLD;
pub use solver::{Classification, ClusterMatch, Solver, SolverOptions};

// Re-export core for convenience
pub use glyphscan_core;
