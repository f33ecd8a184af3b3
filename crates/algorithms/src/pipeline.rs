//! Method dispatch and batch processing
//!
//! Each input grid moves through `Loaded -> {Upscaling | Filling} -> Rendered`.
//! The interpolation branch is chosen by inspecting the grid: complete grids
//! are upscaled with both Thiessen and Bilinear, incomplete grids are filled
//! with IDW. A failure at any stage aborts that input only.

use std::fmt;
use std::str::FromStr;

use pointgrid_core::{Error, Grid, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::interpolation::{bilinear_upscale, idw_fill, thiessen_upscale, IdwParams, UpscaleParams};

/// Global interpolation settings for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Upscaling factor for Thiessen and Bilinear (>= 1)
    pub factor: usize,
    /// Neighbor count for IDW (>= 1)
    pub k_neighbors: usize,
    /// IDW power (> 0)
    pub power: f64,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            factor: 7,
            k_neighbors: 4,
            power: 2.0,
        }
    }
}

impl InterpolationConfig {
    /// Check every parameter; errors here are fatal for the whole run.
    pub fn validate(&self) -> Result<()> {
        if self.factor < 1 {
            return Err(Error::invalid_input("factor", self.factor, "must be >= 1"));
        }
        self.idw_params().validate()
    }

    pub fn upscale_params(&self) -> UpscaleParams {
        UpscaleParams {
            factor: self.factor,
        }
    }

    pub fn idw_params(&self) -> IdwParams {
        IdwParams {
            k_neighbors: self.k_neighbors,
            power: self.power,
        }
    }
}

/// Interpolation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Thiessen,
    Bilinear,
    Idw,
}

impl Method {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Thiessen => "Thiessen",
            Method::Bilinear => "Bilinear",
            Method::Idw => "IDW",
        }
    }

    /// Lowercase identifier, used for output directories and file suffixes.
    pub fn slug(&self) -> &'static str {
        match self {
            Method::Thiessen => "thiessen",
            Method::Bilinear => "bilinear",
            Method::Idw => "idw",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "thiessen" | "nearest" | "nn" => Ok(Method::Thiessen),
            "bilinear" | "linear" => Ok(Method::Bilinear),
            "idw" => Ok(Method::Idw),
            _ => Err(Error::invalid_input(
                "method",
                s,
                "use thiessen, bilinear or idw",
            )),
        }
    }
}

/// Completeness class of a grid, the sole dispatch criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completeness {
    Complete,
    Incomplete,
}

impl Completeness {
    pub fn of(grid: &Grid) -> Self {
        if grid.is_complete() {
            Completeness::Complete
        } else {
            Completeness::Incomplete
        }
    }

    /// Methods applied to grids of this class
    pub fn methods(self) -> &'static [Method] {
        match self {
            Completeness::Complete => &[Method::Thiessen, Method::Bilinear],
            Completeness::Incomplete => &[Method::Idw],
        }
    }
}

impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completeness::Complete => f.write_str("complete"),
            Completeness::Incomplete => f.write_str("incomplete"),
        }
    }
}

/// One interpolated grid, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationResult {
    /// Identifier of the input the grid came from
    pub source: String,
    pub method: Method,
    pub grid: Grid,
}

/// Processing stage of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Interpolate(Method),
    Render(Method),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => f.write_str("load"),
            Stage::Interpolate(m) => write!(f, "{} interpolation", m),
            Stage::Render(m) => write!(f, "{} rendering", m),
        }
    }
}

/// A failed input with the stage that failed
#[derive(Debug)]
pub struct InputFailure {
    pub source: String,
    pub stage: Stage,
    pub error: Error,
}

impl fmt::Display for InputFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} failed: {}", self.source, self.stage, self.error)
    }
}

/// An input queued for batch processing
#[derive(Debug, Clone)]
pub struct BatchInput<T> {
    /// Identifier reported in logs and used to name outputs
    pub source: String,
    /// Class implied by where the input was found, checked against the grid
    pub expected: Option<Completeness>,
    /// Whatever the loader needs to produce the grid (typically a path)
    pub payload: T,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Inputs processed through every stage, with the methods applied
    pub succeeded: Vec<(String, Vec<Method>)>,
    pub failed: Vec<InputFailure>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True when inputs were attempted and none succeeded
    pub fn is_total_failure(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

/// Dispatches grids to interpolators and isolates per-input failures.
#[derive(Debug, Clone)]
pub struct InterpolationPipeline {
    config: InterpolationConfig,
}

impl InterpolationPipeline {
    /// Create a pipeline; an invalid configuration is rejected here, before
    /// any input is touched.
    pub fn new(config: InterpolationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    /// Apply one method to a grid.
    pub fn apply(&self, method: Method, grid: &Grid) -> Result<Grid> {
        match method {
            Method::Thiessen => thiessen_upscale(grid, self.config.upscale_params()),
            Method::Bilinear => bilinear_upscale(grid, self.config.upscale_params()),
            Method::Idw => idw_fill(grid, self.config.idw_params()),
        }
    }

    /// Interpolate a grid with every method its completeness calls for.
    pub fn interpolate(&self, source: &str, grid: &Grid) -> Result<Vec<InterpolationResult>> {
        self.interpolate_staged(source, grid).map_err(|(_, e)| e)
    }

    fn interpolate_staged(
        &self,
        source: &str,
        grid: &Grid,
    ) -> std::result::Result<Vec<InterpolationResult>, (Stage, Error)> {
        let class = Completeness::of(grid);
        debug!("{}: {} grid, {} x {}", source, class, grid.cols(), grid.rows());

        class
            .methods()
            .iter()
            .map(|&method| {
                self.apply(method, grid)
                    .map(|out| InterpolationResult {
                        source: source.to_string(),
                        method,
                        grid: out,
                    })
                    .map_err(|e| (Stage::Interpolate(method), e))
            })
            .collect()
    }

    /// Run one input through load, interpolation and rendering.
    ///
    /// All interpolations finish before the first render, so a failing
    /// method leaves no partial output behind.
    pub fn process<L, S>(
        &self,
        source: &str,
        expected: Option<Completeness>,
        load: L,
        sink: &mut S,
    ) -> std::result::Result<Vec<Method>, InputFailure>
    where
        L: FnOnce() -> Result<Grid>,
        S: FnMut(&InterpolationResult) -> Result<()>,
    {
        let fail = |stage: Stage, error: Error| InputFailure {
            source: source.to_string(),
            stage,
            error,
        };

        let grid = load().map_err(|e| fail(Stage::Load, e))?;

        let class = Completeness::of(&grid);
        if let Some(expected) = expected {
            if expected != class {
                warn!(
                    "{}: found among {} inputs but the grid is {}; using {}",
                    source,
                    expected,
                    class,
                    method_list(class.methods())
                );
            }
        }

        let results = self
            .interpolate_staged(source, &grid)
            .map_err(|(stage, e)| fail(stage, e))?;

        for result in &results {
            sink(result).map_err(|e| fail(Stage::Render(result.method), e))?;
        }

        Ok(results.iter().map(|r| r.method).collect())
    }

    /// Process a batch of inputs one after another.
    ///
    /// Failures are logged and collected; they never stop the batch.
    pub fn run<T, I, L, S>(&self, inputs: I, mut load: L, mut sink: S) -> BatchSummary
    where
        I: IntoIterator<Item = BatchInput<T>>,
        L: FnMut(&T) -> Result<Grid>,
        S: FnMut(&InterpolationResult) -> Result<()>,
    {
        let mut summary = BatchSummary::default();

        for input in inputs {
            let outcome = self.process(
                &input.source,
                input.expected,
                || load(&input.payload),
                &mut sink,
            );
            match outcome {
                Ok(methods) => {
                    info!("[OK] {}: {}", input.source, method_list(&methods));
                    summary.succeeded.push((input.source, methods));
                }
                Err(failure) => {
                    error!("[FAILED] {}", failure);
                    summary.failed.push(failure);
                }
            }
        }

        summary
    }
}

fn method_list(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::name)
        .collect::<Vec<_>>()
        .join(" & ")
}
