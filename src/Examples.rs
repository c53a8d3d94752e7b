//! examples of usage of GraphAnalyze
/// formula, sampling, zoom, tangent and integral examples
pub mod grapher_examples;
/// linear ODE examples
pub mod ode_examples;
/// probability tree and binomial distribution examples
pub mod proba_examples;
