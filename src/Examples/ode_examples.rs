#![allow(non_snake_case)]

use crate::config::GraphAnalyzeConfig;
use crate::graph::diff_eq_module::DiffEqModule;
use crate::numerical::linear_ODE::LinearODE;
use nalgebra::DVector;

#[allow(dead_code)]
pub fn ode_examples(example: usize) {
    match example {
        0 => {
            // y'' + y = 0, y(0) = 0, y'(0) = 1 on [-pi, pi]
            let mut ode = LinearODE::new();
            ode.set_degree(2).unwrap();
            ode.set_coefficient(0, "1").unwrap();
            ode.set_boundary_values(DVector::from_vec(vec![0.0, 1.0])).unwrap();
            ode.set_domain(-std::f64::consts::PI, std::f64::consts::PI);
            ode.set_step(1e-4);
            println!("{}", ode);
            let solution = ode.solve().unwrap();
            for x in [-3.0, -1.5, 0.0, 1.5, 3.0] {
                println!("y({}) = {:.5}, sin = {:.5}", x, solution.y_at(x).unwrap(), f64::sin(x));
            }
        }
        1 => {
            // third order with variable coefficients and forcing, boundary inside the domain
            // y''' + x*y'' - y = cos(x)
            let mut module = DiffEqModule::from_config(&GraphAnalyzeConfig::default());
            let ode = module.ode_mut();
            ode.set_degree(3).unwrap();
            ode.set_coefficient(0, "-1").unwrap();
            ode.set_coefficient(2, "x").unwrap();
            ode.set_forcing("cos(x)").unwrap();
            ode.set_boundary_x(0.25);
            ode.set_boundary_values(DVector::from_vec(vec![1.0, 0.0, -1.0])).unwrap();
            ode.set_step(1e-3);
            let points = module.solve().unwrap().len();
            println!("solution with {} points", points);
            let graph = module.graph().unwrap();
            println!("y range [{}, {}]", graph.bounds().min_y, graph.bounds().max_y);
        }
        2 => {
            // the solve button is inert while a coefficient is invalid
            let mut ode = LinearODE::new();
            let rejected = ode.set_coefficient(0, "sin(");
            println!("{:?}, can solve: {}", rejected, ode.can_solve());
            ode.set_coefficient(0, "sin(x)").unwrap();
            println!("can solve: {}", ode.can_solve());
        }
        _ => {
            println!("example not found");
        }
    }
}
