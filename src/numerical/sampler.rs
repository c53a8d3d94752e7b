//! Fixed-resolution sampling of a formula over [min_x, max_x].
//!
//! The grapher, the tangent and the integral all read the same `SampleSet`, so their
//! precision is tied to the one resolution used here (`PLOT_INTERVALS` by default).
//! A `SampleSet` is always rebuilt as a whole and swapped in by its owner.
use crate::symbolic::expression::Expression;
use crate::symbolic::symbolic_engine::EvalError;
use log::{debug, info};
use nalgebra::DVector;
use rayon::prelude::*;
use std::fmt;
use std::time::Instant;

/// number of intervals between samples, PLOT_INTERVALS + 1 points
pub const PLOT_INTERVALS: usize = 5000;

/// Errors of the operations that build or read a `SampleSet`.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    /// min_x >= max_x or a bound is not finite
    DegenerateDomain { min_x: f64, max_x: f64 },
    ZeroResolution,
    Evaluation(EvalError),
    /// fewer than two samples
    NotReady,
    IndexOutOfRange { index: usize, len: usize },
    /// the function is undefined (NaN) inside the requested range
    Gap { x: f64 },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SampleError::DegenerateDomain { min_x, max_x } => {
                write!(f, "Degenerate domain [{}, {}]", min_x, max_x)
            }
            SampleError::ZeroResolution => write!(f, "Resolution must be at least 1"),
            SampleError::Evaluation(e) => write!(f, "Evaluation failed: {}", e),
            SampleError::NotReady => write!(f, "Not enough samples"),
            SampleError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for {} samples", index, len)
            }
            SampleError::Gap { x } => write!(f, "Function undefined at x = {}", x),
        }
    }
}

impl std::error::Error for SampleError {}

impl From<EvalError> for SampleError {
    fn from(e: EvalError) -> Self {
        SampleError::Evaluation(e)
    }
}

/// Ordered (x, y) samples, x increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    x: DVector<f64>,
    y: DVector<f64>,
}

impl SampleSet {
    pub fn from_points(points: &[(f64, f64)]) -> SampleSet {
        let x = DVector::from_iterator(points.len(), points.iter().map(|p| p.0));
        let y = DVector::from_iterator(points.len(), points.iter().map(|p| p.1));
        SampleSet { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// at least two samples: something can be plotted or integrated
    pub fn is_ready(&self) -> bool {
        self.len() >= 2
    }

    pub fn xs(&self) -> &[f64] {
        self.x.as_slice()
    }

    pub fn ys(&self) -> &[f64] {
        self.y.as_slice()
    }

    pub fn point(&self, index: usize) -> Result<(f64, f64), SampleError> {
        if index >= self.len() {
            return Err(SampleError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok((self.x[index], self.y[index]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    pub fn min_x(&self) -> Option<f64> {
        self.xs().first().copied()
    }

    pub fn max_x(&self) -> Option<f64> {
        self.xs().last().copied()
    }

    /// number of undefined (NaN) samples
    pub fn gaps(&self) -> usize {
        self.y.iter().filter(|y| y.is_nan()).count()
    }

    /// Position-proportional index of `x`: `floor((x - min_x) * intervals / range)`,
    /// clamped to the valid index range. Exact for uniformly spaced samples.
    pub fn index_of(&self, x: f64) -> Result<usize, SampleError> {
        let (min_x, max_x) = self.domain()?;
        let intervals = (self.len() - 1) as f64;
        let position = ((x - min_x) * intervals / (max_x - min_x)).floor();
        let index = position.clamp(0.0, intervals) as usize;
        Ok(index)
    }

    /// First index whose x is not less than `x` (binary search on the sorted abscissae).
    pub fn lower_bound(&self, x: f64) -> usize {
        self.xs().partition_point(|&xi| xi < x)
    }

    /// Linear interpolation of y at `x`, clamped to the sampled domain.
    pub fn y_at(&self, x: f64) -> Result<f64, SampleError> {
        let (min_x, max_x) = self.domain()?;
        let x = x.clamp(min_x, max_x);
        let upper = self.lower_bound(x).clamp(1, self.len() - 1);
        let (x0, y0) = (self.x[upper - 1], self.y[upper - 1]);
        let (x1, y1) = (self.x[upper], self.y[upper]);
        let y = if x1 == x0 {
            y0
        } else {
            y0 + (y1 - y0) * (x - x0) / (x1 - x0)
        };
        if y.is_nan() {
            return Err(SampleError::Gap { x });
        }
        Ok(y)
    }

    /// first and last abscissae; an error if fewer than two samples
    pub fn domain(&self) -> Result<(f64, f64), SampleError> {
        if !self.is_ready() {
            return Err(SampleError::NotReady);
        }
        Ok((self.x[0], self.x[self.len() - 1]))
    }
}

fn check_domain(min_x: f64, max_x: f64, resolution: usize) -> Result<(), SampleError> {
    if resolution == 0 {
        return Err(SampleError::ZeroResolution);
    }
    if !(min_x.is_finite() && max_x.is_finite() && min_x < max_x) {
        return Err(SampleError::DegenerateDomain { min_x, max_x });
    }
    Ok(())
}

fn abscissa(min_x: f64, max_x: f64, k: usize, resolution: usize) -> f64 {
    min_x + (max_x - min_x) * k as f64 / resolution as f64
}

/// NaN results become gaps in the sample set; any other evaluation error aborts.
fn ordinate(expression: &Expression, x: f64) -> Result<f64, SampleError> {
    match expression.evaluate_at(x) {
        Ok(y) => Ok(y),
        Err(EvalError::NotANumber { .. }) => Ok(f64::NAN),
        Err(e) => Err(e.into()),
    }
}

/// Samples `expression` at `resolution + 1` evenly spaced points of [min_x, max_x]:
/// x_k = min_x + (max_x - min_x) * k / resolution.
pub fn sample(
    expression: &Expression,
    min_x: f64,
    max_x: f64,
    resolution: usize,
) -> Result<SampleSet, SampleError> {
    check_domain(min_x, max_x, resolution)?;
    let start = Instant::now();
    let mut x = DVector::zeros(resolution + 1);
    let mut y = DVector::zeros(resolution + 1);
    for k in 0..=resolution {
        let xk = abscissa(min_x, max_x, k, resolution);
        x[k] = xk;
        y[k] = ordinate(expression, xk)?;
    }
    let samples = SampleSet { x, y };
    debug!(
        "sampled '{}' on [{}, {}] with {} points in {:?}, {} gaps",
        expression.text(),
        min_x,
        max_x,
        resolution + 1,
        start.elapsed(),
        samples.gaps()
    );
    Ok(samples)
}

/// Same result as `sample`, points evaluated on the rayon thread pool.
///
/// Safe because `Expression::evaluate_at` takes the variable value as an argument
/// and the compiled closure holds no mutable state.
pub fn sample_par(
    expression: &Expression,
    min_x: f64,
    max_x: f64,
    resolution: usize,
) -> Result<SampleSet, SampleError> {
    check_domain(min_x, max_x, resolution)?;
    let start = Instant::now();
    let points = (0..=resolution)
        .into_par_iter()
        .map(|k| {
            let xk = abscissa(min_x, max_x, k, resolution);
            ordinate(expression, xk).map(|yk| (xk, yk))
        })
        .collect::<Result<Vec<(f64, f64)>, SampleError>>()?;
    info!(
        "parallel sampling of {} points took {:?}",
        points.len(),
        start.elapsed()
    );
    Ok(SampleSet::from_points(&points))
}
