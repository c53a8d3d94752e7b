//! Trapezoidal definite integral over a `SampleSet`.
//!
//! The integral reads the same samples the grapher plots, so its precision is the
//! sampling resolution. Bounds outside the sampled domain are clamped to it.
use crate::numerical::sampler::{SampleError, SampleSet};
use log::debug;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationError {
    /// the sample set holds fewer than two points
    NotReady,
    /// a bound is NaN
    InvalidBound,
    /// the function is undefined (NaN) inside the selected range
    Gap { x: f64 },
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntegrationError::NotReady => write!(f, "No function data to integrate"),
            IntegrationError::InvalidBound => write!(f, "Integration bound is not a number"),
            IntegrationError::Gap { x } => write!(f, "Function undefined at x = {} in the selected range", x),
        }
    }
}

impl std::error::Error for IntegrationError {}

impl From<SampleError> for IntegrationError {
    fn from(e: SampleError) -> Self {
        match e {
            SampleError::Gap { x } => IntegrationError::Gap { x },
            _ => IntegrationError::NotReady,
        }
    }
}

fn ordered_bounds(samples: &SampleSet, from: f64, to: f64) -> Result<(f64, f64), IntegrationError> {
    if from.is_nan() || to.is_nan() {
        return Err(IntegrationError::InvalidBound);
    }
    let (min_x, max_x) = samples.domain()?;
    let low = from.min(to).clamp(min_x, max_x);
    let high = from.max(to).clamp(min_x, max_x);
    Ok((low, high))
}

/// sum of trapezoids over the half-open interval range [first, last)
fn trapezoids(samples: &SampleSet, first: usize, last: usize) -> Result<f64, IntegrationError> {
    let x = samples.xs();
    let y = samples.ys();
    let mut area = 0.0;
    for k in first..last {
        if y[k].is_nan() {
            return Err(IntegrationError::Gap { x: x[k] });
        }
        if y[k + 1].is_nan() {
            return Err(IntegrationError::Gap { x: x[k + 1] });
        }
        area += (y[k] + y[k + 1]) * (x[k + 1] - x[k]) / 2.0;
    }
    Ok(area)
}

fn signed(area: f64, from: f64, to: f64) -> f64 {
    if from > to { -area } else { area }
}

/// Signed integral of the sampled function from `from` to `to`.
///
/// Index bounds are found by position: `index_of(min(from, to))` to `index_of(max(from, to))`,
/// and the trapezoids between them are summed. The result is negated when `from > to`.
pub fn integrate(samples: &SampleSet, from: f64, to: f64) -> Result<f64, IntegrationError> {
    let (low, high) = ordered_bounds(samples, from, to)?;
    let first = samples.index_of(low)?;
    let last = samples.index_of(high)?;
    let area = trapezoids(samples, first, last)?;
    debug!(
        "integral over [{}, {}] uses samples {}..{}: {}",
        low, high, first, last, area
    );
    Ok(signed(area, from, to))
}

/// Same as `integrate`, bounds located by binary search on the sorted abscissae.
/// Works for non-uniform samples; agrees with `integrate` on uniform ones.
pub fn integrate_sorted(samples: &SampleSet, from: f64, to: f64) -> Result<f64, IntegrationError> {
    let (low, high) = ordered_bounds(samples, from, to)?;
    let last_index = samples.len() - 1;
    // the lower bound index of an abscissa that is not a sample point is one past the
    // sample preceding it, step back to cover the same trapezoids as `integrate`
    let locate = |x: f64| {
        let index = samples.lower_bound(x).min(last_index);
        if samples.xs()[index] > x && index > 0 {
            index - 1
        } else {
            index
        }
    };
    let first = locate(low);
    let last = locate(high);
    let area = trapezoids(samples, first, last)?;
    Ok(signed(area, from, to))
}
