#![allow(non_snake_case)]

use crate::probability::binomial::{binomial_coefficient, binomial_pmf, factorial};
use crate::probability::proba_tree::{ProbabilityModel, next_path_code};
use nalgebra::DVector;

#[allow(dead_code)]
pub fn proba_examples(example: usize) {
    match example {
        0 => {
            // three outcomes, three draws
            let mut model = ProbabilityModel::new(3, 3).unwrap();
            model
                .set_probabilities(DVector::from_vec(vec![0.5, 0.3, 0.2]))
                .unwrap();
            let table = model.paths_table().unwrap();
            println!("{}", table);
            let (values, labels) = model.branch_histogram().unwrap();
            println!("histogram: {} bars, first {} -> {}", values.len(), labels[0], values[0]);
            model.select_node("21").unwrap();
            for level in model.tree_levels().unwrap() {
                let line: Vec<String> = level
                    .iter()
                    .map(|node| {
                        let mark = if model.is_highlighted(&node.label) { "*" } else { "" };
                        format!("{}{}:{:.3}", mark, node.label, node.cumulative_probability)
                    })
                    .collect();
                println!("{}", line.join(" "));
            }
        }
        1 => {
            // binomial distribution of the first outcome
            let mut model = ProbabilityModel::new(2, 8).unwrap();
            model.set_probability(0, 0.3).unwrap();
            model.set_probability(1, 0.7).unwrap();
            let pmf = model.binomial().unwrap();
            println!("P(k) = {:?}, sum = {}", pmf.as_slice(), pmf.sum());
            println!("C(8, 3) = {}, 8! = {}", binomial_coefficient(8, 3).unwrap(), factorial(8).unwrap());
            println!("21! = {:?}", factorial(21));
            println!("{:?}", binomial_pmf(0.5, 4).unwrap().as_slice());
        }
        2 => {
            // counting path codes with two outcomes
            let mut code = 0;
            for _ in 0..10 {
                code = next_path_code(code, 2).unwrap();
                print!("{} ", code);
            }
            println!();
        }
        _ => {
            println!("example not found");
        }
    }
}
