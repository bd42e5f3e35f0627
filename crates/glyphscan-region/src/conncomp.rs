//! Distance-tolerant connected component analysis
//!
//! Foreground pixels of a boolean mask are grouped into clusters where two
//! pixels belong together if a chain of steps no longer than a connection
//! distance `D` links them. `D = 1` gives 4-connectivity and
//! `D = sqrt(2) + eps` gives 8-connectivity; larger values bridge gaps.
//!
//! The labeling works on row runs rather than pixels:
//!
//! 1. Each row is cut into runs. Foreground pixels closer than `D` along
//!    the row join the same run.
//! 2. Each run is compared with the runs of the `floor(D)` rows above it.
//!    For a row offset `d` the columns of the older run are widened by
//!    `floor(sqrt(D^2 - d^2))` on both sides before the overlap test.
//!    A ring of per-row run ranges avoids rescanning older rows.
//! 3. A run inherits the label of the first overlapping predecessor. When
//!    a later predecessor carries a different label, the pair is recorded
//!    as an equivalence.
//! 4. Equivalences are merged by threading permutation cycles, then every
//!    cycle is numbered from 1 in order of its smallest label.

use crate::error::{RegionError, RegionResult};
use std::collections::HashSet;

/// A horizontal span of foreground pixels on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    row: usize,
    start: usize,
    end: usize,
}

/// First/last run index of one row inside the sliding window.
#[derive(Debug, Clone, Copy, Default)]
struct RowRuns {
    first: Option<usize>,
    last: Option<usize>,
}

/// Ring buffer of [`RowRuns`] covering the current row and the `depth`
/// rows above it. Slot `depth` is the current row, slot `depth - d` is the
/// row `d` above.
struct RunWindow {
    slots: Vec<RowRuns>,
    head: usize,
}

impl RunWindow {
    fn new(depth: usize) -> Self {
        Self {
            slots: vec![RowRuns::default(); depth + 1],
            head: 0,
        }
    }

    fn reset(&mut self) {
        self.head = 0;
        self.slots.fill(RowRuns::default());
    }

    fn slot(&self, i: usize) -> RowRuns {
        self.slots[(self.head + i) % self.slots.len()]
    }

    fn slot_mut(&mut self, i: usize) -> &mut RowRuns {
        let n = self.slots.len();
        &mut self.slots[(self.head + i) % n]
    }

    /// Shift the window down by `rows`, clearing the slots that wrap around.
    fn advance(&mut self, rows: usize) {
        let n = self.slots.len();
        for _ in 0..rows.min(n) {
            self.slots[self.head] = RowRuns::default();
            self.head = (self.head + 1) % n;
        }
    }
}

/// Recorded label equivalences, deduplicated regardless of pair order.
#[derive(Debug, Default)]
struct Equivalences {
    pairs: Vec<(usize, usize)>,
    seen: HashSet<(usize, usize)>,
}

impl Equivalences {
    fn record(&mut self, k: usize, p: usize) {
        let key = (k.min(p), k.max(p));
        if self.seen.insert(key) {
            self.pairs.push((k, p));
        }
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Map every provisional label `1..=num_labels` to a compact id.
    ///
    /// Returns the map (index 0 maps to 0) and the number of distinct ids.
    fn resolve(&self, num_labels: usize) -> (Vec<usize>, usize) {
        let mut permut: Vec<usize> = (0..=num_labels).collect();

        // Swapping two successors splices their cycles together, unless
        // they already share a cycle.
        for &(k, p) in &self.pairs {
            let mut search = p;
            loop {
                search = permut[search];
                if search == p || search == k {
                    break;
                }
            }
            if search == p {
                permut.swap(k, p);
            }
        }

        // Number each cycle at its smallest member; already-numbered
        // members hold an id no larger than their own label.
        let mut count = 0;
        for i in 1..=num_labels {
            if i <= permut[i] {
                count += 1;
                let mut current = i;
                while permut[current] != i {
                    let next = permut[current];
                    permut[current] = count;
                    current = next;
                }
                permut[current] = count;
            }
        }

        (permut, count)
    }
}

/// Result of labeling a mask.
///
/// `xs`, `ys` and `labels` are parallel and list the foreground pixels in
/// row-major scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labeling {
    /// Number of distinct clusters
    pub num_clusters: usize,
    pub xs: Vec<u32>,
    pub ys: Vec<u32>,
    /// 1-based cluster id per point; 0 only when labeling was skipped
    pub labels: Vec<u32>,
}

impl Labeling {
    /// Number of foreground points.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Point count per cluster, indexed by `label - 1`.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.num_clusters];
        for &l in &self.labels {
            if l >= 1 && (l as usize) <= self.num_clusters {
                sizes[l as usize - 1] += 1;
            }
        }
        sizes
    }

    /// Coordinates of the points carrying `label`.
    pub fn points_of(&self, label: u32) -> Vec<(u32, u32)> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == label)
            .map(|(i, _)| (self.xs[i], self.ys[i]))
            .collect()
    }
}

/// Connected component labeler with a fixed connection distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentLabeler {
    distance: f64,
}

impl ComponentLabeler {
    /// Create a labeler.
    ///
    /// A distance below 1 (or NaN) is accepted; [`ComponentLabeler::label`]
    /// then reports the foreground points with no clusters.
    pub fn new(distance: f64) -> Self {
        Self { distance }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Label the foreground of a row-major mask.
    ///
    /// # Arguments
    ///
    /// * `mask` - Foreground flags, `stride` per row
    /// * `stride` - Row length
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidParameters`] when `stride` is zero or
    /// does not divide `mask.len()`.
    pub fn label(&self, mask: &[bool], stride: usize) -> RegionResult<Labeling> {
        if stride == 0 {
            return Err(RegionError::InvalidParameters(
                "mask stride must be positive".to_string(),
            ));
        }
        if mask.len() % stride != 0 {
            return Err(RegionError::InvalidParameters(format!(
                "mask length {} is not a multiple of stride {}",
                mask.len(),
                stride
            )));
        }
        let rows = mask.len() / stride;

        let mut labeling = Labeling::default();
        for (i, _) in mask.iter().enumerate().filter(|&(_, &v)| v) {
            labeling.xs.push((i % stride) as u32);
            labeling.ys.push((i / stride) as u32);
        }
        labeling.labels = vec![0; labeling.xs.len()];

        if !(self.distance >= 1.0) || labeling.is_empty() {
            return Ok(labeling);
        }

        let (runs, point_runs) = self.extract_runs(mask, stride);
        let depth = (self.distance.floor() as usize).min(rows);
        let (run_labels, num_provisional, equivalences) = self.label_runs(&runs, depth, stride);

        let (canonical, num_clusters) = equivalences.resolve(num_provisional);
        for (label, &run) in labeling.labels.iter_mut().zip(&point_runs) {
            *label = canonical[run_labels[run]] as u32;
        }
        labeling.num_clusters = num_clusters;

        tracing::debug!(
            points = labeling.len(),
            runs = runs.len(),
            provisional = num_provisional,
            equivalences = equivalences.len(),
            clusters = num_clusters,
            "labeled mask"
        );
        Ok(labeling)
    }

    /// Cut each row into runs, merging pixels whose column gap is within
    /// the connection distance. Also returns the run index of every
    /// foreground point in scan order.
    fn extract_runs(&self, mask: &[bool], stride: usize) -> (Vec<Run>, Vec<usize>) {
        let mut runs: Vec<Run> = Vec::new();
        let mut point_runs = Vec::new();

        for (row, cols) in mask.chunks(stride).enumerate() {
            let mut last_col: Option<usize> = None;
            for (col, _) in cols.iter().enumerate().filter(|&(_, &v)| v) {
                match last_col {
                    Some(prev) if (col - prev) as f64 <= self.distance => {
                        if let Some(run) = runs.last_mut() {
                            run.end = col;
                        }
                    }
                    _ => runs.push(Run {
                        row,
                        start: col,
                        end: col,
                    }),
                }
                point_runs.push(runs.len() - 1);
                last_col = Some(col);
            }
        }

        (runs, point_runs)
    }

    /// Assign provisional labels to runs and collect equivalences.
    fn label_runs(
        &self,
        runs: &[Run],
        depth: usize,
        stride: usize,
    ) -> (Vec<usize>, usize, Equivalences) {
        // slack[d - 1]: horizontal tolerance for a run d rows above
        let d2 = self.distance * self.distance;
        let slack: Vec<i64> = (1..=depth)
            .map(|d| {
                let s = (d2 - (d * d) as f64).max(0.0).sqrt().floor();
                s.min(stride as f64) as i64
            })
            .collect();

        let mut labels = vec![0usize; runs.len()];
        let mut next_label = 0;
        let mut equivalences = Equivalences::default();
        let mut window = RunWindow::new(depth);
        let mut last_row: Option<usize> = None;

        for (k, run) in runs.iter().enumerate() {
            let delta = match last_row {
                Some(r) => run.row - r,
                None => run.row + 1,
            };

            if delta > depth {
                // new block: nothing above is close enough
                window.reset();
                window.slot_mut(depth).first = Some(k);
                last_row = Some(run.row);
            } else {
                if delta > 0 {
                    window.slot_mut(depth).last = k.checked_sub(1);
                    window.advance(delta);
                    window.slot_mut(depth).first = Some(k);
                    last_row = Some(run.row);
                }

                for i in 0..depth {
                    let RowRuns {
                        first: Some(first),
                        last: Some(last),
                    } = window.slot(i)
                    else {
                        continue;
                    };
                    let off = slack[depth - 1 - i];
                    let (start, end) = (run.start as i64, run.end as i64);

                    for p in first..=last {
                        let start_p = runs[p].start as i64 - off;
                        let end_p = runs[p].end as i64 + off;
                        if start_p > end {
                            break;
                        }
                        if start_p <= end && start <= end_p {
                            if labels[k] == 0 {
                                labels[k] = labels[p];
                            } else if labels[k] != labels[p] {
                                equivalences.record(labels[k], labels[p]);
                            }
                        }
                    }
                }
            }

            if labels[k] == 0 {
                next_label += 1;
                labels[k] = next_label;
            }
        }

        (labels, next_label, equivalences)
    }
}

/// Label a mask with the given connection distance.
///
/// Convenience wrapper for [`ComponentLabeler::label`].
pub fn label_components(mask: &[bool], stride: usize, distance: f64) -> RegionResult<Labeling> {
    ComponentLabeler::new(distance).label(mask, stride)
}
