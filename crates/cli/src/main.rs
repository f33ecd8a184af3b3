//! PointGrid CLI - interpolation of rasterized point files

mod batch;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pointgrid_algorithms::pipeline::{Completeness, InterpolationConfig, InterpolationPipeline, Method};
use pointgrid_colormap::{auto_params, save_png, ColorScheme};
use pointgrid_core::io::{read_points, PointReadOptions};
use pointgrid_core::{rasterize, Grid, RasterizeParams};

use batch::{print_summary, run_batch, RunConfig};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "pointgrid")]
#[command(author, version, about = "Upscale and gap-fill gridded point data", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpolate every file of the complete and incomplete input directories
    Run(RunArgs),
    /// Show information about a point file and the grid it forms
    Info {
        /// Input point file (.csv, .txt, .xyz, .geojson)
        input: PathBuf,
        /// Field holding the sample value
        #[arg(short, long, default_value = "Z")]
        z_field: String,
    },
    /// Apply one method to one point file
    Interpolate {
        /// Input point file
        input: PathBuf,
        /// Output PNG file
        output: PathBuf,
        /// Method: thiessen, bilinear, idw
        #[arg(short, long)]
        method: Method,
        /// Field holding the sample value
        #[arg(short, long, default_value = "Z")]
        z_field: String,
        /// Upscaling factor (Thiessen, Bilinear)
        #[arg(short, long, default_value = "7")]
        factor: usize,
        /// Number of neighbors (IDW)
        #[arg(short, long, default_value = "4")]
        k_neighbors: usize,
        /// Distance power (IDW)
        #[arg(short, long, default_value = "2.0")]
        power: f64,
        /// Color scheme: viridis, grayscale
        #[arg(short, long, default_value = "viridis")]
        scheme: ColorScheme,
        /// Append a color ramp legend
        #[arg(long)]
        legend: bool,
    },
}

/// Options of the batch run; each one set here overrides the config file
#[derive(Args)]
struct RunArgs {
    /// JSON run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory of complete-grid inputs
    #[arg(long)]
    complete_dir: Option<PathBuf>,
    /// Directory of incomplete-grid inputs
    #[arg(long)]
    incomplete_dir: Option<PathBuf>,
    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Upscaling factor for Thiessen and Bilinear
    #[arg(short, long)]
    factor: Option<usize>,
    /// Number of neighbors for IDW
    #[arg(short, long)]
    k_neighbors: Option<usize>,
    /// Distance power for IDW
    #[arg(short, long)]
    power: Option<f64>,
    /// Field holding the sample value
    #[arg(short, long)]
    z_field: Option<String>,
    /// Coordinate merge tolerance when rasterizing
    #[arg(long)]
    tolerance: Option<f64>,
    /// Color scheme: viridis, grayscale
    #[arg(short, long)]
    scheme: Option<ColorScheme>,
    /// Fixed color range for every image, as MIN,MAX
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    range: Option<(f64, f64)>,
    /// Append a color ramp legend to every image
    #[arg(long)]
    legend: bool,
    /// Also write a GeoTIFF next to every image
    #[arg(long)]
    geotiff: bool,
}

impl RunArgs {
    fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        if self.complete_dir.is_some() {
            config.complete_dir = self.complete_dir;
        }
        if self.incomplete_dir.is_some() {
            config.incomplete_dir = self.incomplete_dir;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(factor) = self.factor {
            config.interpolation.factor = factor;
        }
        if let Some(k) = self.k_neighbors {
            config.interpolation.k_neighbors = k;
        }
        if let Some(power) = self.power {
            config.interpolation.power = power;
        }
        if let Some(z_field) = self.z_field {
            config.points.z_field = z_field;
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(scheme) = self.scheme {
            config.scheme = scheme;
        }
        if self.range.is_some() {
            config.range = self.range;
        }
        config.legend |= self.legend;
        config.geotiff |= self.geotiff;

        Ok(config)
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn parse_range(s: &str) -> std::result::Result<(f64, f64), String> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("'{}': {}", v.trim(), e))
    };
    Ok((parse(lo)?, parse(hi)?))
}

fn read_grid(path: &Path, z_field: &str) -> Result<(usize, Grid)> {
    let pb = spinner("Reading points...");
    let options = PointReadOptions {
        z_field: z_field.to_string(),
        ..Default::default()
    };
    let points = read_points(path, &options).context("Failed to read points")?;
    let grid = rasterize(&points, &RasterizeParams::default()).context("Failed to rasterize")?;
    pb.finish_and_clear();
    info!("Input: {} points -> {} x {} grid", points.len(), grid.cols(), grid.rows());
    Ok((points.len(), grid))
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => {
            let config = args.into_config()?;
            let start = Instant::now();
            let summary = run_batch(&config, true)?;
            print_summary(&summary, &config.output);
            println!("  Processing time: {:.2?}", start.elapsed());

            if summary.is_total_failure() {
                bail!("All {} input(s) failed", summary.failed.len());
            }
        }

        Commands::Info { input, z_field } => {
            let (count, grid) = read_grid(&input, &z_field)?;
            let (width, height) = grid.dimensions();
            let bounds = grid.bounds();
            let stats = grid.statistics();
            let class = Completeness::of(&grid);

            println!("File: {}", input.display());
            println!("Points: {}", count);
            println!("Grid: {} x {} ({} cells)", width, height, grid.len());
            println!("Cell size: {}", grid.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            let methods: Vec<&str> = class.methods().iter().map(Method::name).collect();
            println!("Completeness: {} (methods: {})", class, methods.join(", "));
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Known cells: {} ({:.1}%)",
                stats.known_count,
                100.0 * stats.known_count as f64 / grid.len() as f64
            );
        }

        Commands::Interpolate {
            input,
            output,
            method,
            z_field,
            factor,
            k_neighbors,
            power,
            scheme,
            legend,
        } => {
            let pipeline = InterpolationPipeline::new(InterpolationConfig {
                factor,
                k_neighbors,
                power,
            })
            .context("Invalid interpolation parameters")?;

            let (_, grid) = read_grid(&input, &z_field)?;
            let start = Instant::now();
            let result = pipeline
                .apply(method, &grid)
                .with_context(|| format!("{} interpolation failed", method))?;
            let elapsed = start.elapsed();

            let mut params = auto_params(&grid, scheme);
            params.legend = legend;
            if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
            save_png(&result, &params, &output).context("Failed to write output")?;
            done(method.name(), &output, elapsed);
        }
    }

    Ok(())
}
