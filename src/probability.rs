/// factorial, binomial coefficient and binomial distribution, overflow checked
pub mod binomial;
/// # Probability tree
/// K outcomes repeated R times: every path with its probability, the tree level by level,
/// the histogram arrays and the selected node shared by the tree and the histogram
///# Example
/// ```
/// use GraphAnalyze::probability::proba_tree::ProbabilityModel;
/// use nalgebra::DVector;
/// let mut model = ProbabilityModel::new(2, 3).unwrap();
/// model.set_probabilities(DVector::from_vec(vec![0.3, 0.7])).unwrap();
/// let paths = model.enumerate_paths().unwrap();
/// assert_eq!(paths.len(), 8);
/// assert_eq!(paths[0].label, "111");
/// let total: f64 = paths.iter().map(|p| p.probability).sum();
/// assert!((total - 1.0).abs() < 1e-12);
/// model.select_node("21").unwrap();
/// assert!(model.is_highlighted("2"));
/// ```
pub mod proba_tree;
