/////////////////////////////TESTS////////////////////////////////////////////////////
/*
linear ODE tests:
trivial y' = 0
exponential decay (degree 1 with a coefficient)
harmonic oscillator (degree 2)
forcing only
backward march
exact boundary point and domain ends
one Euler step updates every derivative from the same state
highest degree
validation errors
*/

#[cfg(test)]
mod tests {
    use crate::numerical::linear_ODE::{LinearODE, MAX_ODE_DEGREE, OdeError};
    use crate::symbolic::symbolic_engine::EvalError;
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    fn ode(degree: usize, min_x: f64, max_x: f64, dx: f64) -> LinearODE {
        let mut ode = LinearODE::new();
        ode.set_degree(degree).unwrap();
        ode.set_domain(min_x, max_x);
        ode.set_step(dx);
        ode
    }

    #[test]
    fn test_constant_solution() {
        let mut ode = ode(1, -1.0, 1.0, 1e-3);
        ode.set_boundary_value(0, 1.0).unwrap();
        let solution = ode.solve().unwrap();
        assert_eq!(solution.len(), 2001);
        for (_, y) in solution.iter() {
            assert_relative_eq!(y, 1.0);
        }
    }

    #[test]
    fn test_exponential_decay() {
        // y' + y = 0, y(0) = 1
        let mut ode = ode(1, 0.0, 1.0, 1e-4);
        ode.set_coefficient(0, "1").unwrap();
        ode.set_boundary_value(0, 1.0).unwrap();
        let solution = ode.solve().unwrap();
        assert_relative_eq!(solution.max_x().unwrap(), 1.0);
        assert_relative_eq!(solution.ys()[solution.len() - 1], (-1.0_f64).exp(), epsilon = 1e-4);
    }

    #[test]
    fn test_harmonic_oscillator() {
        // y'' + y = 0, y(0) = 0, y'(0) = 1 gives sin(x)
        let mut ode = ode(2, 0.0, 1.0, 1e-4);
        ode.set_coefficient(0, "1").unwrap();
        ode.set_boundary_values(DVector::from_vec(vec![0.0, 1.0])).unwrap();
        let solution = ode.solve().unwrap();
        for &x in &[0.25, 0.5, 1.0] {
            assert_relative_eq!(solution.y_at(x).unwrap(), x.sin(), epsilon = 1e-3);
        }
    }

    #[test]
    fn test_forcing_only() {
        // y' = 2x, y(0) = 0 gives x^2
        let mut ode = ode(1, 0.0, 2.0, 1e-4);
        ode.set_forcing("2*x").unwrap();
        let solution = ode.solve().unwrap();
        assert_relative_eq!(solution.y_at(1.0).unwrap(), 1.0, epsilon = 1e-3);
        assert_relative_eq!(solution.y_at(2.0).unwrap(), 4.0, epsilon = 1e-3);
    }

    #[test]
    fn test_backward_march() {
        // y' = y, y(0) = 1, solved towards -1
        let mut ode = ode(1, -1.0, 0.0, 1e-4);
        ode.set_coefficient(0, "-1").unwrap();
        ode.set_boundary_value(0, 1.0).unwrap();
        let solution = ode.solve().unwrap();
        assert_relative_eq!(solution.min_x().unwrap(), -1.0);
        assert_relative_eq!(solution.ys()[0], (-1.0_f64).exp(), epsilon = 1e-4);
        assert_relative_eq!(solution.ys()[solution.len() - 1], 1.0);
    }

    #[test]
    fn test_boundary_point_is_exact() {
        let mut ode = ode(2, -1.0, 1.0, 0.003);
        ode.set_coefficient(0, "x^2").unwrap();
        ode.set_coefficient(1, "sin(x)").unwrap();
        ode.set_forcing("exp(x)").unwrap();
        ode.set_boundary_x(0.3337);
        ode.set_boundary_values(DVector::from_vec(vec![2.5, -1.0])).unwrap();
        let solution = ode.solve().unwrap();
        let boundary = solution
            .iter()
            .find(|(x, _)| *x == 0.3337)
            .expect("boundary point is a sample");
        assert_eq!(boundary.1, 2.5);
        assert_eq!(solution.min_x(), Some(-1.0));
        assert_eq!(solution.max_x(), Some(1.0));
        assert!(solution.xs().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_linear_solution_is_exact() {
        // y'' = 0, y(0) = 1, y'(0) = 2
        let mut ode = ode(2, 0.0, 1.0, 0.25);
        ode.set_boundary_values(DVector::from_vec(vec![1.0, 2.0])).unwrap();
        let solution = ode.solve().unwrap();
        assert_eq!(solution.xs(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        for (x, y) in solution.iter() {
            assert_relative_eq!(y, 1.0 + 2.0 * x, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_boundary_at_domain_end() {
        let mut ode = ode(1, 0.0, 1.0, 0.25);
        ode.set_boundary_x(1.0);
        ode.set_boundary_value(0, 3.0).unwrap();
        let solution = ode.solve().unwrap();
        assert_eq!(solution.len(), 5);
        assert_eq!(solution.ys()[4], 3.0);
    }

    #[test]
    fn test_set_degree_keeps_existing_entries() {
        let mut ode = LinearODE::new();
        ode.set_coefficient(0, "x").unwrap();
        ode.set_boundary_value(0, 4.0).unwrap();
        ode.set_degree(3).unwrap();
        assert_eq!(ode.coefficient(0).unwrap().text(), "x");
        assert_eq!(ode.coefficient(2).unwrap().text(), "0");
        assert_eq!(ode.boundary_values().as_slice(), &[4.0, 0.0, 0.0]);
        ode.set_degree(1).unwrap();
        assert!(ode.coefficient(1).is_none());
        assert_eq!(
            ode.set_degree(11),
            Err(OdeError::InvalidDegree { degree: 11, max: 10 })
        );
        assert!(ode.set_degree(0).is_err());
    }

    #[test]
    fn test_invalid_coefficient_blocks_solving() {
        let mut ode = LinearODE::new();
        assert_eq!(ode.set_coefficient(0, "sin("), Err(OdeError::InvalidCoefficient(0)));
        assert!(!ode.can_solve());
        assert_eq!(ode.solve().unwrap_err(), OdeError::InvalidCoefficient(0));
        ode.set_coefficient(0, "cos(x)").unwrap();
        assert!(ode.can_solve());
        assert_eq!(ode.set_coefficient(4, "x"), Err(OdeError::InvalidCoefficient(4)));
        assert_eq!(ode.set_forcing("x + y"), Err(OdeError::InvalidForcing));
        assert_eq!(ode.validate(), Err(OdeError::InvalidForcing));
    }

    #[test]
    fn test_domain_errors() {
        let mut ode = LinearODE::new();
        ode.set_domain(1.0, 1.0);
        assert!(matches!(ode.validate(), Err(OdeError::EmptyDomain { .. })));
        ode.set_domain(-1.0, 1.0);
        ode.set_step(0.0);
        assert_eq!(ode.validate(), Err(OdeError::NonPositiveStep(0.0)));
        ode.set_step(1e-3);
        ode.set_boundary_x(2.0);
        assert!(matches!(
            ode.validate(),
            Err(OdeError::BoundaryOutsideDomain { .. })
        ));
        ode.set_boundary_x(0.0);
        ode.set_step(1e-9);
        assert!(matches!(ode.validate(), Err(OdeError::TooManySteps { .. })));
        assert!(
            ode.set_boundary_values(DVector::from_vec(vec![1.0, 2.0]))
                .is_err()
        );
    }

    #[test]
    fn test_nan_coefficient_stops_solving() {
        let mut ode = ode(1, -1.0, 1.0, 0.01);
        ode.set_coefficient(0, "sqrt(x)").unwrap();
        assert!(matches!(
            ode.solve(),
            Err(OdeError::Evaluation(EvalError::NotANumber { .. }))
        ));
    }

    #[test]
    fn test_euler_steps_use_current_state() {
        // y'' + y = 0, y(0) = 1, y'(0) = 2, two steps of 0.5
        // step 1: v = (1 + 0.5*2, 2 - 0.5*1) = (2, 1.5)
        // step 2: y = 2 + 0.5*1.5 = 2.75
        // updating y first and reusing it for y' would give 2.5, the reverse order 1.75 after one step
        let mut ode = ode(2, 0.0, 1.0, 0.5);
        ode.set_boundary_x(0.0);
        ode.set_coefficient(0, "1").unwrap();
        ode.set_boundary_values(DVector::from_vec(vec![1.0, 2.0])).unwrap();
        let solution = ode.solve().unwrap();
        assert_eq!(solution.len(), 3);
        assert_eq!(solution.xs(), &[0.0, 0.5, 1.0]);
        assert_eq!(solution.ys(), &[1.0, 2.0, 2.75]);
    }

    #[test]
    fn test_highest_degree() {
        // y^(10) = 0 with every derivative equal to 1 at x = 0: y = sum of x^k / k!, k = 0..9
        let mut ode = ode(MAX_ODE_DEGREE, -1.0, 1.0, 1e-4);
        ode.set_boundary_x(0.0);
        ode.set_boundary_values(DVector::from_element(MAX_ODE_DEGREE, 1.0))
            .unwrap();
        let solution = ode.solve().unwrap();
        assert_eq!(solution.len(), 20001);
        let exact = |x: f64| {
            let mut term = 1.0;
            let mut sum = 1.0;
            for k in 1..MAX_ODE_DEGREE {
                term *= x / k as f64;
                sum += term;
            }
            sum
        };
        for &x in &[-1.0, -0.5, 0.0, 0.5, 1.0] {
            assert_relative_eq!(solution.y_at(x).unwrap(), exact(x), epsilon = 1e-3);
        }
        assert!(ode.set_degree(MAX_ODE_DEGREE + 1).is_err());
    }
}
