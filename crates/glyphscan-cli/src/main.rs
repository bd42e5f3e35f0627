//! glyphscan CLI - read glyph strings from images.

use clap::{Args, Parser, Subcommand};
use glyphscan_core::Histogram;
use glyphscan_recog::{GoldenSet, Solver, SolverOptions};
use glyphscan_region::DetectorOptions;
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "glyphscan")]
#[command(about = "Detect and recognize captcha glyphs")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the glyph string of an image.
    Solve {
        /// Folder of golden template images.
        #[arg(long)]
        golden: PathBuf,

        /// Path to the input image.
        image: PathBuf,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// List the glyph clusters found in an image.
    Detect {
        /// Path to the input image.
        image: PathBuf,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Print the normalized gray histogram of an image.
    Histogram {
        /// Path to the input image.
        image: PathBuf,

        /// Write the histogram to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Detection overrides shared by `solve` and `detect`.
#[derive(Args, Debug, Clone)]
struct Tuning {
    /// Minimum intensity of a glyph pixel after preprocessing.
    #[arg(long, default_value_t = 10)]
    threshold: u8,

    /// Clusters with fewer points are discarded.
    #[arg(long, default_value_t = 50)]
    min_points: usize,

    /// Clusters longer than this are split in two.
    #[arg(long, default_value_t = 32.0)]
    split_size: f64,

    /// Side of the max filter applied before detection.
    #[arg(long, default_value_t = 3)]
    filter_size: u32,
}

impl Tuning {
    fn to_options(&self) -> SolverOptions {
        SolverOptions::default()
            .with_filter_size(self.filter_size)
            .with_detector(
                DetectorOptions::default()
                    .with_threshold(self.threshold)
                    .with_min_points(self.min_points)
                    .with_split_size(self.split_size),
            )
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Solve {
            golden,
            image,
            tuning,
        } => run_solve(&golden, &image, &tuning),
        Commands::Detect { image, tuning } => run_detect(&image, &tuning),
        Commands::Histogram { image, out } => run_histogram(&image, out.as_deref()),
    }
}

fn load_image(path: &Path) -> CliResult<glyphscan_core::PixelBuffer> {
    tracing::info!("Loading image: {}", path.display());
    glyphscan_io::read_image(path).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", path.display(), e).into()
    })
}

// ── solve ──────────────────────────────────────────────────────────────

fn run_solve(golden_dir: &Path, image_path: &Path, tuning: &Tuning) -> CliResult<()> {
    let golden = GoldenSet::load_dir(golden_dir)?;
    tracing::info!("Loaded {} golden templates", golden.len());
    if golden.is_empty() {
        tracing::warn!("No usable templates in {}", golden_dir.display());
    }

    let image = load_image(image_path)?;
    let solver = Solver::new(golden, tuning.to_options());
    let result = solver.solve(&image)?;

    for (i, m) in result.matches.iter().enumerate() {
        tracing::debug!(
            "glyph {}: {:?} (id {}) difference {:.4} at {} degrees",
            i,
            m.class_name,
            m.class_id,
            m.difference,
            m.angle
        );
    }
    println!("{}", result.text);
    Ok(())
}

// ── detect ─────────────────────────────────────────────────────────────

fn run_detect(image_path: &Path, tuning: &Tuning) -> CliResult<()> {
    let image = load_image(image_path)?;
    tracing::info!("Image size: {}x{}", image.width(), image.height());

    let solver = Solver::new(GoldenSet::new(), tuning.to_options());
    let preprocessed = solver.preprocess(&image)?;
    let detection = solver.detect_objects(&preprocessed)?;

    println!("{} glyphs", detection.len());
    for (i, cluster) in detection.clusters.iter().enumerate() {
        let bounds = cluster.oriented_bounds();
        let (cx, cy) = detection.centers[i];
        println!(
            "  {:2}: {:4} points  center ({}, {})  x {}..{}  angle {}  size {:.1}x{:.1}",
            i,
            cluster.len(),
            cx,
            cy,
            cluster.x_min(),
            cluster.x_max(),
            bounds.angle,
            bounds.size_x,
            bounds.size_y
        );
    }
    Ok(())
}

// ── histogram ──────────────────────────────────────────────────────────

fn run_histogram(image_path: &Path, out: Option<&Path>) -> CliResult<()> {
    let image = load_image(image_path)?;
    let hist = Histogram::normalized(&image);

    println!("pixels:    {}", hist.total_pixels);
    println!("intensity: min {} max {}", hist.min_intensity, hist.max_intensity);
    println!(
        "           mean {:.3} median {} stdev {:.3}",
        hist.mean_intensity, hist.median_intensity, hist.intensity_stdev
    );
    println!("max bin:   {} ({:.4})", hist.max_bin, hist.bins()[hist.max_bin]);

    if let Some(out) = out {
        hist.save(out)?;
        tracing::info!("Histogram written to {}", out.display());
    }
    Ok(())
}
