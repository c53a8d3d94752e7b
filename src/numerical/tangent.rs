use crate::numerical::sampler::{SampleError, SampleSet};

/// Tangent line to the sampled curve at one sample point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tangent {
    pub x: f64,
    pub y: f64,
    pub slope: f64,
    /// unit vector along the tangent, pointing towards increasing x
    pub direction: (f64, f64),
}

impl Tangent {
    fn from_slope(x: f64, y: f64, slope: f64) -> Tangent {
        let norm = (1.0 + slope * slope).sqrt();
        let direction = if slope.is_infinite() {
            (0.0, slope.signum())
        } else {
            (1.0 / norm, slope / norm)
        };
        Tangent {
            x,
            y,
            slope,
            direction,
        }
    }

    /// endpoints of the tangent segment of `length` centred on the touching point
    pub fn segment(&self, length: f64) -> ((f64, f64), (f64, f64)) {
        let half = length / 2.0;
        let (dx, dy) = self.direction;
        (
            (self.x - half * dx, self.y - half * dy),
            (self.x + half * dx, self.y + half * dy),
        )
    }

    /// y of the tangent line at `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.y + self.slope * (x - self.x)
    }
}

/// Tangent at sample `index` from the forward difference with the next sample;
/// the last sample uses the backward difference.
pub fn tangent_at(samples: &SampleSet, index: usize) -> Result<Tangent, SampleError> {
    if !samples.is_ready() {
        return Err(SampleError::NotReady);
    }
    let (x, y) = samples.point(index)?;
    let (neighbour_x, neighbour_y) = if index + 1 < samples.len() {
        samples.point(index + 1)?
    } else {
        samples.point(index - 1)?
    };
    if y.is_nan() {
        return Err(SampleError::Gap { x });
    }
    if neighbour_y.is_nan() {
        return Err(SampleError::Gap { x: neighbour_x });
    }
    let slope = (neighbour_y - y) / (neighbour_x - x);
    Ok(Tangent::from_slope(x, y, slope))
}

/// Tangent at the sample nearest below `x` (position-proportional lookup).
pub fn tangent_at_x(samples: &SampleSet, x: f64) -> Result<Tangent, SampleError> {
    let index = samples.index_of(x)?;
    tangent_at(samples, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::sampler::sample;
    use crate::symbolic::expression::Expression;
    use approx::assert_relative_eq;

    #[test]
    fn test_tangent_of_parabola() {
        let samples = sample(&Expression::from_formula("x^2").unwrap(), -1.0, 1.0, 2000).unwrap();
        let tangent = tangent_at_x(&samples, 0.5).unwrap();
        assert_relative_eq!(tangent.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(tangent.y, 0.25, epsilon = 1e-12);
        // forward difference: 2x + h
        assert_relative_eq!(tangent.slope, 1.0, epsilon = 2e-3);
    }

    #[test]
    fn test_last_sample_uses_backward_difference() {
        let samples = SampleSet::from_points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 3.0)]);
        assert_relative_eq!(tangent_at(&samples, 0).unwrap().slope, 1.0);
        assert_relative_eq!(tangent_at(&samples, 2).unwrap().slope, 2.0);
    }

    #[test]
    fn test_segment_has_requested_length() {
        let samples = SampleSet::from_points(&[(0.0, 1.0), (1.0, 4.0)]);
        let tangent = tangent_at(&samples, 0).unwrap();
        let ((x0, y0), (x1, y1)) = tangent.segment(2.0);
        assert_relative_eq!(((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt(), 2.0, epsilon = 1e-12);
        assert_relative_eq!((y1 - y0) / (x1 - x0), 3.0, epsilon = 1e-12);
        assert_relative_eq!(tangent.value_at(2.0), 7.0);
    }

    #[test]
    fn test_errors() {
        let samples = SampleSet::from_points(&[(0.0, 1.0), (1.0, f64::NAN)]);
        assert_eq!(tangent_at(&samples, 0), Err(SampleError::Gap { x: 1.0 }));
        assert_eq!(
            tangent_at(&samples, 5),
            Err(SampleError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            tangent_at(&SampleSet::from_points(&[(0.0, 1.0)]), 0),
            Err(SampleError::NotReady)
        );
    }
}
