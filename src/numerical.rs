/// # Sampler
/// fixed resolution (x, y) samples of a formula over [min_x, max_x]
///# Example
/// ```
/// use GraphAnalyze::symbolic::expression::Expression;
/// use GraphAnalyze::numerical::sampler::sample;
/// let f = Expression::from_formula("x^2 + x + 1").unwrap();
/// let samples = sample(&f, -1.0, 1.0, 1000).unwrap();
/// assert_eq!(samples.len(), 1001);
/// assert!((samples.ys()[500] - 1.0).abs() < 1e-12);
/// ```
pub mod sampler;
/// trapezoidal integral over a sample set, signed by the order of the bounds
///# Example
/// ```
/// use GraphAnalyze::symbolic::expression::Expression;
/// use GraphAnalyze::numerical::{integration::integrate, sampler::sample};
/// let samples = sample(&Expression::from_formula("x").unwrap(), 0.0, 1.0, 1000).unwrap();
/// assert!((integrate(&samples, 0.0, 1.0).unwrap() - 0.5).abs() < 1e-12);
/// assert!((integrate(&samples, 1.0, 0.0).unwrap() + 0.5).abs() < 1e-12);
/// ```
pub mod integration;
/// tangent line at a sample point
pub mod tangent;
/// # Linear ODE
/// n-th order linear ODE with variable coefficients, reduced to a first order system and
/// solved by explicit Euler from a boundary point in both directions
///# Example
/// ```
/// use GraphAnalyze::numerical::linear_ODE::LinearODE;
/// use nalgebra::DVector;
/// // y'' + y = 0, y(0) = 0, y'(0) = 1
/// let mut ode = LinearODE::new();
/// ode.set_degree(2).unwrap();
/// ode.set_coefficient(0, "1").unwrap();
/// ode.set_boundary_values(DVector::from_vec(vec![0.0, 1.0])).unwrap();
/// ode.set_domain(-1.0, 1.0);
/// ode.set_step(1e-4);
/// let solution = ode.solve().unwrap();
/// assert!((solution.y_at(1.0).unwrap() - 1.0_f64.sin()).abs() < 1e-3);
/// ```
pub mod linear_ODE;
mod linear_ODE_tests;
