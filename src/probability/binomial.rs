use log::debug;
use nalgebra::DVector;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ProbabilityError {
    FactorialOverflow(u32),
    BinomialOverflow { n: u32, k: u32 },
    PathCountOverflow { outcomes: usize, repetitions: usize },
    InvalidOutcomes { outcomes: usize, max: usize },
    InvalidRepetitions { repetitions: usize, max: usize },
    OutcomeIndex { index: usize, outcomes: usize },
    ProbabilityOutOfRange { index: usize, value: f64 },
    /// the probabilities do not sum to 1 within the tolerance
    SumNotOne { sum: f64 },
    LengthMismatch { expected: usize, found: usize },
    /// not a sequence of outcome digits 1..=K no longer than the repetition count
    InvalidPath(String),
}

impl fmt::Display for ProbabilityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProbabilityError::FactorialOverflow(n) => write!(f, "{}! does not fit in 64 bits", n),
            ProbabilityError::BinomialOverflow { n, k } => {
                write!(f, "C({}, {}) does not fit in 64 bits", n, k)
            }
            ProbabilityError::PathCountOverflow {
                outcomes,
                repetitions,
            } => write!(f, "{}^{} paths cannot be enumerated", outcomes, repetitions),
            ProbabilityError::InvalidOutcomes { outcomes, max } => {
                write!(f, "Outcome count {} is not in 1..={}", outcomes, max)
            }
            ProbabilityError::InvalidRepetitions { repetitions, max } => {
                write!(f, "Repetition count {} is not in 0..={}", repetitions, max)
            }
            ProbabilityError::OutcomeIndex { index, outcomes } => {
                write!(f, "Outcome {} does not exist, there are {} outcomes", index, outcomes)
            }
            ProbabilityError::ProbabilityOutOfRange { index, value } => {
                write!(f, "Probability of outcome {} is {}, not in [0, 1]", index + 1, value)
            }
            ProbabilityError::SumNotOne { sum } => {
                write!(f, "Probabilities sum to {} instead of 1", sum)
            }
            ProbabilityError::LengthMismatch { expected, found } => {
                write!(f, "Expected {} probabilities, got {}", expected, found)
            }
            ProbabilityError::InvalidPath(label) => write!(f, "Invalid path '{}'", label),
        }
    }
}

impl std::error::Error for ProbabilityError {}

/// n!, iterative; an error once the result leaves u64 (n > 20)
pub fn factorial(n: u32) -> Result<u64, ProbabilityError> {
    (1..=n as u64)
        .try_fold(1u64, |acc, k| acc.checked_mul(k))
        .ok_or(ProbabilityError::FactorialOverflow(n))
}

/// C(n, k) by the multiplicative formula, exact while the result fits in u64.
/// C(n, 0) = C(n, n) = 1 and C(n, k) = 0 for k > n.
pub fn binomial_coefficient(n: u32, k: u32) -> Result<u64, ProbabilityError> {
    if k > n {
        return Ok(0);
    }
    if k == 0 || k == n {
        return Ok(1);
    }
    let k_small = k.min(n - k) as u128;
    let n = n as u128;
    let mut result: u128 = 1;
    for i in 1..=k_small {
        // result is C(n - k_small + i - 1, i - 1) here, so the division is exact
        result = result * (n - k_small + i) / i;
        if result > u64::MAX as u128 {
            return Err(ProbabilityError::BinomialOverflow {
                n: n as u32,
                k,
            });
        }
    }
    Ok(result as u64)
}

/// P(i) = C(R, i) p^i (1 - p)^(R - i) for i = 0..=R
pub fn binomial_pmf(p: f64, repetitions: u32) -> Result<DVector<f64>, ProbabilityError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ProbabilityError::ProbabilityOutOfRange { index: 0, value: p });
    }
    let mut pmf = DVector::zeros(repetitions as usize + 1);
    for i in 0..=repetitions {
        let c = binomial_coefficient(repetitions, i)? as f64;
        pmf[i as usize] = c * p.powi(i as i32) * (1.0 - p).powi((repetitions - i) as i32);
    }
    debug!("binomial pmf p = {}, R = {}: {:?}", p, repetitions, pmf.as_slice());
    Ok(pmf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0).unwrap(), 1);
        assert_eq!(factorial(1).unwrap(), 1);
        assert_eq!(factorial(5).unwrap(), 120);
        assert_eq!(factorial(20).unwrap(), 2_432_902_008_176_640_000);
        assert_eq!(factorial(21), Err(ProbabilityError::FactorialOverflow(21)));
    }

    #[test]
    fn test_binomial_coefficient() {
        assert_eq!(binomial_coefficient(8, 0).unwrap(), 1);
        assert_eq!(binomial_coefficient(8, 8).unwrap(), 1);
        assert_eq!(binomial_coefficient(8, 3).unwrap(), 56);
        assert_eq!(binomial_coefficient(3, 5).unwrap(), 0);
        assert_eq!(binomial_coefficient(0, 0).unwrap(), 1);
        // beyond the reach of factorial-based formulas
        assert_eq!(binomial_coefficient(60, 30).unwrap(), 118_264_581_564_861_424);
        assert!(binomial_coefficient(100, 50).is_err());
    }

    #[test]
    fn test_coefficients_match_factorials() {
        for n in 0..=20u32 {
            for k in 0..=n {
                let expected = factorial(n).unwrap() / (factorial(k).unwrap() * factorial(n - k).unwrap());
                assert_eq!(binomial_coefficient(n, k).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_pmf_is_normalised() {
        for &p in &[0.0, 0.1, 0.25, 0.5, 0.9, 1.0] {
            for r in 0..=12 {
                let pmf = binomial_pmf(p, r).unwrap();
                assert_eq!(pmf.len(), r as usize + 1);
                assert_relative_eq!(pmf.sum(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_pmf_values() {
        let pmf = binomial_pmf(0.5, 2).unwrap();
        assert_relative_eq!(pmf[0], 0.25);
        assert_relative_eq!(pmf[1], 0.5);
        assert_relative_eq!(pmf[2], 0.25);
        assert!(binomial_pmf(1.5, 2).is_err());
    }
}
