/// n-th order linear ODE with variable coefficients
///
///   y^(n) + a_{n-1}(x) y^(n-1) + ... + a_0(x) y = b(x)
///
/// solved by reduction to the first order system v_k = y^(k):
///   v_k' = v_{k+1}                          k = 0..n-2
///   v_{n-1}' = b(x) - sum a_k(x) v_k
/// and explicit Euler marching from the boundary point, first backward to min_x, then forward
/// to max_x. Local error is O(dx) and there is no step control: stiff equations or large steps
/// diverge visibly.
///
/// Each coefficient is its own `Expression` evaluated at the loop-local x; no variable cell is
/// shared between them.
use crate::numerical::sampler::SampleSet;
use crate::symbolic::expression::{Expression, ExpressionError};
use crate::symbolic::symbolic_engine::EvalError;
use log::{info, warn};
use nalgebra::DVector;
use std::fmt;
use std::fmt::Display;
use std::time::Instant;

pub const MAX_ODE_DEGREE: usize = 10;
pub const ODE_MAX_STEPS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub enum OdeError {
    InvalidDegree { degree: usize, max: usize },
    /// index of a coefficient a_k that is not a valid expression (or does not exist)
    InvalidCoefficient(usize),
    InvalidForcing,
    /// min_x >= max_x
    EmptyDomain { min_x: f64, max_x: f64 },
    NonPositiveStep(f64),
    BoundaryOutsideDomain { boundary_x: f64, min_x: f64, max_x: f64 },
    BoundaryValuesLength { expected: usize, found: usize },
    TooManySteps { steps: usize, max: usize },
    Evaluation(EvalError),
}

impl fmt::Display for OdeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OdeError::InvalidDegree { degree, max } => {
                write!(f, "Degree {} is not in 1..={}", degree, max)
            }
            OdeError::InvalidCoefficient(k) => write!(f, "Coefficient a_{} is not valid", k),
            OdeError::InvalidForcing => write!(f, "Right hand side b(x) is not valid"),
            OdeError::EmptyDomain { min_x, max_x } => {
                write!(f, "Empty domain: min {} is not below max {}", min_x, max_x)
            }
            OdeError::NonPositiveStep(dx) => write!(f, "Step must be positive, got {}", dx),
            OdeError::BoundaryOutsideDomain {
                boundary_x,
                min_x,
                max_x,
            } => write!(
                f,
                "Boundary point {} is outside [{}, {}]",
                boundary_x, min_x, max_x
            ),
            OdeError::BoundaryValuesLength { expected, found } => {
                write!(f, "Expected {} boundary values, got {}", expected, found)
            }
            OdeError::TooManySteps { steps, max } => {
                write!(f, "{} steps needed, at most {} allowed", steps, max)
            }
            OdeError::Evaluation(e) => write!(f, "Evaluation failed: {}", e),
        }
    }
}

impl std::error::Error for OdeError {}

impl From<EvalError> for OdeError {
    fn from(e: EvalError) -> Self {
        OdeError::Evaluation(e)
    }
}

fn zero_expression() -> Expression {
    Expression::constant("x", 0.0)
}

#[derive(Debug, Clone)]
pub struct LinearODE {
    degree: usize,
    coefficients: Vec<Expression>,
    forcing: Expression,
    boundary_x: f64,
    boundary_values: DVector<f64>,
    min_x: f64,
    max_x: f64,
    dx: f64,
    max_degree: usize,
    max_steps: usize,
}

impl Display for LinearODE {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y^({})", self.degree)?;
        for (k, a) in self.coefficients.iter().enumerate().rev() {
            write!(f, " + ({})*y^({})", a.text(), k)?;
        }
        write!(
            f,
            " = {}, y^(k)({}) = {:?}, x in [{}, {}], dx = {}",
            self.forcing.text(),
            self.boundary_x,
            self.boundary_values.as_slice(),
            self.min_x,
            self.max_x,
            self.dx
        )
    }
}

impl Default for LinearODE {
    fn default() -> Self {
        LinearODE::new()
    }
}

impl LinearODE {
    /// y' = 0, y(0) = 0 on [-1, 1] with dx = 1e-3
    pub fn new() -> LinearODE {
        LinearODE {
            degree: 1,
            coefficients: vec![zero_expression()],
            forcing: zero_expression(),
            boundary_x: 0.0,
            boundary_values: DVector::zeros(1),
            min_x: -1.0,
            max_x: 1.0,
            dx: 1e-3,
            max_degree: MAX_ODE_DEGREE,
            max_steps: ODE_MAX_STEPS,
        }
    }

    pub fn with_limits(mut self, max_degree: usize, max_steps: usize) -> Self {
        self.max_degree = max_degree;
        self.max_steps = max_steps;
        self
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Resizes coefficients and boundary values; new entries are `0`, existing ones are kept.
    pub fn set_degree(&mut self, degree: usize) -> Result<(), OdeError> {
        if degree == 0 || degree > self.max_degree {
            return Err(OdeError::InvalidDegree {
                degree,
                max: self.max_degree,
            });
        }
        self.coefficients.resize_with(degree, zero_expression);
        self.boundary_values = self.boundary_values.clone().resize_vertically(degree, 0.0);
        self.degree = degree;
        Ok(())
    }

    /// Sets and commits a_k(x). An invalid text marks the coefficient invalid and blocks solving.
    pub fn set_coefficient(&mut self, k: usize, text: &str) -> Result<(), OdeError> {
        let coefficient = self
            .coefficients
            .get_mut(k)
            .ok_or(OdeError::InvalidCoefficient(k))?;
        coefficient.set_text(text);
        coefficient.commit().map_err(|e: ExpressionError| {
            warn!("a_{}(x) = '{}' rejected: {}", k, text, e);
            OdeError::InvalidCoefficient(k)
        })
    }

    pub fn coefficient(&self, k: usize) -> Option<&Expression> {
        self.coefficients.get(k)
    }

    /// Sets and commits b(x).
    pub fn set_forcing(&mut self, text: &str) -> Result<(), OdeError> {
        self.forcing.set_text(text);
        self.forcing.commit().map_err(|e| {
            warn!("b(x) = '{}' rejected: {}", text, e);
            OdeError::InvalidForcing
        })
    }

    pub fn forcing(&self) -> &Expression {
        &self.forcing
    }

    pub fn set_boundary_x(&mut self, boundary_x: f64) {
        self.boundary_x = boundary_x;
    }

    /// y^(k)(boundary_x) = value
    pub fn set_boundary_value(&mut self, k: usize, value: f64) -> Result<(), OdeError> {
        if k >= self.degree {
            return Err(OdeError::BoundaryValuesLength {
                expected: self.degree,
                found: k + 1,
            });
        }
        self.boundary_values[k] = value;
        Ok(())
    }

    pub fn set_boundary_values(&mut self, values: DVector<f64>) -> Result<(), OdeError> {
        if values.len() != self.degree {
            return Err(OdeError::BoundaryValuesLength {
                expected: self.degree,
                found: values.len(),
            });
        }
        self.boundary_values = values;
        Ok(())
    }

    pub fn boundary_values(&self) -> &DVector<f64> {
        &self.boundary_values
    }

    pub fn set_domain(&mut self, min_x: f64, max_x: f64) {
        self.min_x = min_x;
        self.max_x = max_x;
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min_x, self.max_x)
    }

    pub fn set_step(&mut self, dx: f64) {
        self.dx = dx;
    }

    pub fn step(&self) -> f64 {
        self.dx
    }

    /// First reason the system cannot be solved, if any.
    pub fn validate(&self) -> Result<(), OdeError> {
        for (k, a) in self.coefficients.iter().enumerate() {
            if !a.is_valid() {
                return Err(OdeError::InvalidCoefficient(k));
            }
        }
        if !self.forcing.is_valid() {
            return Err(OdeError::InvalidForcing);
        }
        if !(self.min_x < self.max_x) {
            return Err(OdeError::EmptyDomain {
                min_x: self.min_x,
                max_x: self.max_x,
            });
        }
        if !(self.dx > 0.0) || !self.dx.is_finite() {
            return Err(OdeError::NonPositiveStep(self.dx));
        }
        if !(self.min_x <= self.boundary_x && self.boundary_x <= self.max_x) {
            return Err(OdeError::BoundaryOutsideDomain {
                boundary_x: self.boundary_x,
                min_x: self.min_x,
                max_x: self.max_x,
            });
        }
        let steps = ((self.max_x - self.min_x) / self.dx).ceil();
        if steps > self.max_steps as f64 {
            return Err(OdeError::TooManySteps {
                steps: steps.min(usize::MAX as f64) as usize,
                max: self.max_steps,
            });
        }
        Ok(())
    }

    /// whether the solve action is available
    pub fn can_solve(&self) -> bool {
        self.validate().is_ok()
    }

    /// dv/dx at (x, v), every component from the current v
    fn derivative(&self, x: f64, v: &DVector<f64>) -> Result<DVector<f64>, OdeError> {
        let n = self.degree;
        let mut dv = DVector::zeros(n);
        for k in 0..n - 1 {
            dv[k] = v[k + 1];
        }
        let mut highest = self.forcing.evaluate_at(x)?;
        for (k, a) in self.coefficients.iter().enumerate() {
            highest -= a.evaluate_at(x)? * v[k];
        }
        dv[n - 1] = highest;
        Ok(dv)
    }

    /// Euler march from the boundary point to `end` with signed step `h`.
    /// The last step is shortened to land on `end` exactly. The boundary point itself is
    /// not included.
    fn march(&self, end: f64, h: f64) -> Result<Vec<(f64, f64)>, OdeError> {
        let tolerance = 1e-12 * (self.max_x - self.min_x);
        let mut points = Vec::new();
        let mut x = self.boundary_x;
        let mut v = self.boundary_values.clone();
        let mut i = 0usize;
        while (end - x).abs() > tolerance {
            let remaining = end - x;
            let last = remaining.abs() <= h.abs();
            let step = if last { remaining } else { h };
            let dv = self.derivative(x, &v)?;
            v += dv * step;
            i += 1;
            // x from the step count, not by accumulation
            x = if last {
                end
            } else {
                self.boundary_x + i as f64 * h
            };
            if (end - x).abs() <= tolerance {
                x = end;
            }
            points.push((x, v[0]));
        }
        Ok(points)
    }

    /// Solution y(x) over [min_x, max_x], increasing x, passing through (boundary_x, y(boundary_x)).
    pub fn solve(&self) -> Result<SampleSet, OdeError> {
        self.validate()?;
        info!("solving {}", self);
        let start = Instant::now();
        let backward = self.march(self.min_x, -self.dx)?;
        let forward = self.march(self.max_x, self.dx)?;
        let mut points = Vec::with_capacity(backward.len() + forward.len() + 1);
        points.extend(backward.iter().rev());
        points.push((self.boundary_x, self.boundary_values[0]));
        points.extend(forward.iter());
        let duration = start.elapsed();
        info!(
            "{} backward and {} forward steps, solved in {} milliseconds",
            backward.len(),
            forward.len(),
            duration.as_millis()
        );
        Ok(SampleSet::from_points(&points))
    }
}
