//! Affine mapping between function space (x, y) and the pixel rectangle of a plot.
//!
//!   px = (x - min_x) * (width - 1) / (max_x - min_x) + origin_x
//!   py = height - (y - min_y) * (height - 1) / (max_y - min_y) + origin_y
//!
//! Pixel y grows downwards. A `GraphInfo` exists only for a non-empty x range and a rectangle
//! of at least 2x2 pixels, so neither formula can divide by zero. A flat y range (constant
//! function) is mapped as [y - 0.5, y + 0.5].
use crate::numerical::sampler::SampleSet;
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphError {
    DegenerateRange { min_x: f64, max_x: f64 },
    RectTooSmall { width: f64, height: f64 },
    /// no finite sample to take bounds from
    NoFiniteValues,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GraphError::DegenerateRange { min_x, max_x } => {
                write!(f, "Cannot map the range [{}, {}]", min_x, max_x)
            }
            GraphError::RectTooSmall { width, height } => {
                write!(f, "Plot area {}x{} is too small", width, height)
            }
            GraphError::NoFiniteValues => write!(f, "Function has no finite value to plot"),
        }
    }
}

impl std::error::Error for GraphError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    pub fn new(origin_x: f64, origin_y: f64, width: f64, height: f64) -> PlotRect {
        PlotRect {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.origin_x
            && px <= self.origin_x + self.width
            && py >= self.origin_y
            && py <= self.origin_y + self.height
    }
}

impl Default for PlotRect {
    fn default() -> Self {
        PlotRect::new(0.0, 0.0, 630.0, 400.0)
    }
}

/// min/max of the sampled x and of the finite sampled y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl DisplayBounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> DisplayBounds {
        DisplayBounds {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// None for an empty set or a set without a finite y
    pub fn from_samples(samples: &SampleSet) -> Option<DisplayBounds> {
        let (min_x, max_x) = samples
            .xs()
            .iter()
            .copied()
            .filter(|x| x.is_finite())
            .minmax()
            .into_option()?;
        let (min_y, max_y) = samples
            .ys()
            .iter()
            .copied()
            .filter(|y| y.is_finite())
            .minmax()
            .into_option()?;
        Some(DisplayBounds::new(min_x, max_x, min_y, max_y))
    }

    pub fn is_ready(&self) -> bool {
        self.min_x < self.max_x && self.min_y <= self.max_y && self.max_y.is_finite() && self.min_y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphInfo {
    bounds: DisplayBounds,
    rect: PlotRect,
    /// y range used by the mapping, widened when the bounds are flat
    low_y: f64,
    high_y: f64,
}

impl GraphInfo {
    pub fn new(bounds: DisplayBounds, rect: PlotRect) -> Result<GraphInfo, GraphError> {
        if !(bounds.min_x.is_finite() && bounds.max_x.is_finite() && bounds.min_x < bounds.max_x) {
            return Err(GraphError::DegenerateRange {
                min_x: bounds.min_x,
                max_x: bounds.max_x,
            });
        }
        if !(bounds.min_y.is_finite() && bounds.max_y.is_finite() && bounds.min_y <= bounds.max_y) {
            return Err(GraphError::NoFiniteValues);
        }
        if !(rect.width >= 2.0 && rect.height >= 2.0) {
            return Err(GraphError::RectTooSmall {
                width: rect.width,
                height: rect.height,
            });
        }
        let (low_y, high_y) = if bounds.min_y < bounds.max_y {
            (bounds.min_y, bounds.max_y)
        } else {
            (bounds.min_y - 0.5, bounds.max_y + 0.5)
        };
        Ok(GraphInfo {
            bounds,
            rect,
            low_y,
            high_y,
        })
    }

    /// Bounds taken from `samples`.
    pub fn build(samples: &SampleSet, rect: PlotRect) -> Result<GraphInfo, GraphError> {
        let bounds = DisplayBounds::from_samples(samples).ok_or(GraphError::NoFiniteValues)?;
        GraphInfo::new(bounds, rect)
    }

    pub fn with_rect(&self, rect: PlotRect) -> Result<GraphInfo, GraphError> {
        GraphInfo::new(self.bounds, rect)
    }

    pub fn bounds(&self) -> &DisplayBounds {
        &self.bounds
    }

    pub fn rect(&self) -> &PlotRect {
        &self.rect
    }

    pub fn scale_x(&self, x: f64) -> f64 {
        (x - self.bounds.min_x) * (self.rect.width - 1.0) / (self.bounds.max_x - self.bounds.min_x)
            + self.rect.origin_x
    }

    pub fn scale_y(&self, y: f64) -> f64 {
        self.rect.height - (y - self.low_y) * (self.rect.height - 1.0) / (self.high_y - self.low_y)
            + self.rect.origin_y
    }

    pub fn unscale_x(&self, px: f64) -> f64 {
        (px - self.rect.origin_x) * (self.bounds.max_x - self.bounds.min_x) / (self.rect.width - 1.0)
            + self.bounds.min_x
    }

    pub fn unscale_y(&self, py: f64) -> f64 {
        (self.rect.height + self.rect.origin_y - py) * (self.high_y - self.low_y) / (self.rect.height - 1.0)
            + self.low_y
    }

    /// function space to pixels
    pub fn scale(&self, x: f64, y: f64) -> (f64, f64) {
        (self.scale_x(x), self.scale_y(y))
    }

    /// pixels to function space
    pub fn unscale(&self, px: f64, py: f64) -> (f64, f64) {
        (self.unscale_x(px), self.unscale_y(py))
    }

    pub fn contains_pixel(&self, px: f64, py: f64) -> bool {
        self.rect.contains(px, py)
    }

    /// `count` evenly spaced x values from min_x to max_x, for axis labels
    pub fn tick_values(&self, count: usize) -> Vec<f64> {
        ticks(self.bounds.min_x, self.bounds.max_x, count)
    }

    pub fn tick_values_y(&self, count: usize) -> Vec<f64> {
        ticks(self.low_y, self.high_y, count)
    }

    /// Pixel polyline of the samples, split at undefined or infinite values.
    pub fn polylines(&self, samples: &SampleSet) -> Vec<Vec<(f64, f64)>> {
        let mut lines = Vec::new();
        let mut current = Vec::new();
        for (x, y) in samples.iter() {
            if y.is_finite() {
                current.push(self.scale(x, y));
            } else if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

fn ticks(low: f64, high: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![(low + high) / 2.0],
        _ => (0..count)
            .map(|k| low + (high - low) * k as f64 / (count - 1) as f64)
            .collect(),
    }
}
