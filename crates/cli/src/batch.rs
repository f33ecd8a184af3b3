//! Batch run over the complete and incomplete input directories

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pointgrid_algorithms::pipeline::{
    BatchInput, BatchSummary, Completeness, InterpolationConfig, InterpolationPipeline,
    InterpolationResult,
};
use pointgrid_colormap::{save_png, ColorScheme, ColormapParams};
use pointgrid_core::io::{discover_inputs, read_points, source_id, write_geotiff, PointReadOptions};
use pointgrid_core::{rasterize, Grid, RasterizeParams};

/// Everything a batch run needs. Loadable from JSON; missing keys take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory of inputs expected to rasterize to complete grids
    pub complete_dir: Option<PathBuf>,
    /// Directory of inputs expected to rasterize to grids with gaps
    pub incomplete_dir: Option<PathBuf>,
    /// Root of the output tree (`<output>/<method>/<source>_<method>.png`)
    pub output: PathBuf,
    pub points: PointReadOptions,
    /// Coordinate merge tolerance for rasterization
    pub tolerance: f64,
    pub interpolation: InterpolationConfig,
    pub scheme: ColorScheme,
    /// Fixed color range for the whole run; per input when absent
    pub range: Option<(f64, f64)>,
    pub legend: bool,
    /// Also write a GeoTIFF next to every PNG
    pub geotiff: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            complete_dir: Some(PathBuf::from("data/complete")),
            incomplete_dir: Some(PathBuf::from("data/incomplete")),
            output: PathBuf::from("output"),
            points: PointReadOptions::default(),
            tolerance: 0.0,
            interpolation: InterpolationConfig::default(),
            scheme: ColorScheme::default(),
            range: None,
            legend: false,
            geotiff: false,
        }
    }
}

impl RunConfig {
    /// Read a JSON run configuration.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Check the settings that apply to every input.
    pub fn validate(&self) -> Result<()> {
        self.interpolation
            .validate()
            .context("Invalid interpolation parameters")?;
        if let Some((lo, hi)) = self.range {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                bail!("Invalid color range {}..{}: need finite MIN < MAX", lo, hi);
            }
        }
        if !(self.tolerance >= 0.0 && self.tolerance.is_finite()) {
            bail!("Invalid tolerance {}: must be finite and >= 0", self.tolerance);
        }
        Ok(())
    }
}

/// Read a point file and rasterize it.
pub fn load_grid(
    path: &Path,
    points: &PointReadOptions,
    tolerance: f64,
) -> pointgrid_core::Result<Grid> {
    let set = read_points(path, points)?;
    rasterize(&set, &RasterizeParams { tolerance })
}

/// Where a result is written with the given extension.
///
/// The name is assembled whole; source ids may contain dots.
pub fn output_path(output: &Path, result: &InterpolationResult, extension: &str) -> PathBuf {
    let slug = result.method.slug();
    output
        .join(slug)
        .join(format!("{}_{}.{}", result.source, slug, extension))
}

fn collect_inputs(config: &RunConfig) -> Result<Vec<BatchInput<PathBuf>>> {
    let dirs = [
        (&config.complete_dir, Completeness::Complete),
        (&config.incomplete_dir, Completeness::Incomplete),
    ];

    let mut inputs = Vec::new();
    for (dir, class) in dirs {
        let Some(dir) = dir else { continue };
        if !dir.is_dir() {
            warn!("Input directory {} not found, skipping", dir.display());
            continue;
        }
        let files = discover_inputs(dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?;
        info!("{}: {} {} input(s)", dir.display(), files.len(), class);
        inputs.extend(files.into_iter().map(|path| BatchInput {
            source: source_id(&path),
            expected: Some(class),
            payload: path,
        }));
    }
    Ok(inputs)
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        pb.set_style(style);
    }
    pb
}

/// Run the whole batch.
///
/// Configuration problems abort before any input is read; per-input
/// failures end up in the returned summary.
pub fn run_batch(config: &RunConfig, show_progress: bool) -> Result<BatchSummary> {
    config.validate()?;
    let pipeline = InterpolationPipeline::new(config.interpolation)?;

    let inputs = collect_inputs(config)?;
    if inputs.is_empty() {
        warn!("No input files found");
        return Ok(BatchSummary::default());
    }

    fs::create_dir_all(&config.output)
        .with_context(|| format!("Failed to create {}", config.output.display()))?;

    let pb = progress_bar(inputs.len(), show_progress);
    // Color range of the input being processed, shared by all its methods
    let source_range = Cell::new(None);

    let summary = pipeline.run(
        inputs,
        |path: &PathBuf| {
            pb.set_message(source_id(path));
            pb.inc(1);
            let grid = load_grid(path, &config.points, config.tolerance)?;
            source_range.set(grid.value_range());
            Ok(grid)
        },
        |result: &InterpolationResult| {
            let (min, max) = config
                .range
                .or_else(|| source_range.get())
                .unwrap_or((0.0, 1.0));
            let mut params = ColormapParams::with_range(config.scheme, min, max);
            params.legend = config.legend;
            if min == max {
                params.max = min + 1.0;
            }

            let png = output_path(&config.output, result, "png");
            if let Some(dir) = png.parent() {
                fs::create_dir_all(dir)?;
            }
            save_png(&result.grid, &params, &png)?;
            if config.geotiff {
                write_geotiff(&result.grid, output_path(&config.output, result, "tif"))?;
            }
            Ok(())
        },
    );

    pb.finish_and_clear();
    Ok(summary)
}

/// Print the end-of-run report.
pub fn print_summary(summary: &BatchSummary, output: &Path) {
    println!(
        "Processed {} input(s): {} succeeded, {} failed",
        summary.total(),
        summary.succeeded.len(),
        summary.failed.len()
    );
    for failure in &summary.failed {
        println!("  [FAILED] {}", failure);
    }
    if !summary.succeeded.is_empty() {
        println!("Images saved under: {}", output.display());
    }
}
