//! glyphscan-filter - Neighborhood filtering
//!
//! Provides the order-statistic (rank) filter used to thicken strokes
//! before component labeling, together with min, max and median
//! convenience wrappers.

pub mod error;
pub mod rank;

pub use error::{FilterError, FilterResult};
pub use rank::{RankFilter, max_filter, median_filter, min_filter, rank_filter};
