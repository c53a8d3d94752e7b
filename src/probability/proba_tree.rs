//! Discrete probability tree: R repetitions of an experiment with K outcomes.
//!
//! A path (a sequence of R draws) is labelled by its outcome digits, `"213"` is outcome 2,
//! then 1, then 3. The same label read as a decimal number is the path code: codes are counted
//! by `next_path_code`, which skips every digit outside 1..=K, so K is at most 9.
use crate::probability::binomial::{ProbabilityError, binomial_pmf};
use log::{debug, info, warn};
use nalgebra::DVector;
use tabled::{builder::Builder, settings::Style};

pub const MAX_OUTCOMES: usize = 4;
/// outcome labels are single decimal digits
pub const OUTCOMES_HARD_CAP: usize = 9;
pub const MAX_REPETITIONS: usize = 8;
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Successor of a path code: the last digit is incremented, a digit above `outcomes` becomes 1
/// and carries to the left, a carry out of the first digit prepends a 1.
/// 0 (the empty path) is followed by 1. With two outcomes: 1, 2, 11, 12, 21, 22, 111, ...
pub fn next_path_code(code: u64, outcomes: usize) -> Result<u64, ProbabilityError> {
    if outcomes == 0 || outcomes > OUTCOMES_HARD_CAP {
        return Err(ProbabilityError::InvalidOutcomes {
            outcomes,
            max: OUTCOMES_HARD_CAP,
        });
    }
    if code == 0 {
        return Ok(1);
    }
    let mut digits = code_digits(code);
    if digits.iter().any(|&d| d == 0 || d as usize > outcomes) {
        return Err(ProbabilityError::InvalidPath(code.to_string()));
    }
    let mut i = digits.len();
    loop {
        if i == 0 {
            digits.insert(0, 1);
            break;
        }
        i -= 1;
        if (digits[i] as usize) < outcomes {
            digits[i] += 1;
            break;
        }
        digits[i] = 1;
    }
    digits_code(&digits).ok_or(ProbabilityError::InvalidPath(code.to_string()))
}

fn code_digits(code: u64) -> Vec<u8> {
    code.to_string().bytes().map(|b| b - b'0').collect()
}

fn digits_code(digits: &[u8]) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, &d| {
        acc.checked_mul(10)?.checked_add(d as u64)
    })
}

/// code of the first path of `length` draws: 11...1, 0 for the empty path
fn first_code(length: usize) -> Option<u64> {
    digits_code(&vec![1u8; length])
}

/// One complete path of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub code: u64,
    /// outcome digits, empty for zero repetitions
    pub label: String,
    pub probability: f64,
}

/// One node of the tree; the root is the node with the empty label at level 0.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub label: String,
    pub level: usize,
    /// probability of the last draw, 1 for the root
    pub branch_probability: f64,
    /// probability of reaching this node from the root
    pub cumulative_probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityLimits {
    pub max_outcomes: usize,
    pub max_repetitions: usize,
    pub tolerance: f64,
}

impl Default for ProbabilityLimits {
    fn default() -> Self {
        ProbabilityLimits {
            max_outcomes: MAX_OUTCOMES,
            max_repetitions: MAX_REPETITIONS,
            tolerance: PROBABILITY_TOLERANCE,
        }
    }
}

/// Outcome probabilities, repetition count and the node selected in the tree or histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityModel {
    outcomes: usize,
    repetitions: usize,
    probabilities: DVector<f64>,
    /// outcome counted by the binomial distribution
    selected_outcome: usize,
    selected_node: Option<String>,
    limits: ProbabilityLimits,
}

impl ProbabilityModel {
    /// `outcomes` equally likely outcomes repeated `repetitions` times
    pub fn new(outcomes: usize, repetitions: usize) -> Result<ProbabilityModel, ProbabilityError> {
        ProbabilityModel::with_limits(outcomes, repetitions, ProbabilityLimits::default())
    }

    pub fn with_limits(
        outcomes: usize,
        repetitions: usize,
        limits: ProbabilityLimits,
    ) -> Result<ProbabilityModel, ProbabilityError> {
        let mut model = ProbabilityModel::certain(limits);
        model.set_outcomes(outcomes)?;
        model.set_repetitions(repetitions)?;
        Ok(model)
    }

    /// one outcome of probability 1, no repetition
    pub fn certain(limits: ProbabilityLimits) -> ProbabilityModel {
        let limits = ProbabilityLimits {
            max_outcomes: limits.max_outcomes.min(OUTCOMES_HARD_CAP),
            ..limits
        };
        ProbabilityModel {
            outcomes: 1,
            repetitions: 0,
            probabilities: DVector::from_element(1, 1.0),
            selected_outcome: 0,
            selected_node: None,
            limits,
        }
    }

    pub fn outcomes(&self) -> usize {
        self.outcomes
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    pub fn probabilities(&self) -> &DVector<f64> {
        &self.probabilities
    }

    pub fn limits(&self) -> &ProbabilityLimits {
        &self.limits
    }

    /// Changes the outcome count and resets every probability to 1/K.
    pub fn set_outcomes(&mut self, outcomes: usize) -> Result<(), ProbabilityError> {
        if outcomes == 0 || outcomes > self.limits.max_outcomes {
            return Err(ProbabilityError::InvalidOutcomes {
                outcomes,
                max: self.limits.max_outcomes,
            });
        }
        self.outcomes = outcomes;
        self.probabilities = DVector::from_element(outcomes, 1.0 / outcomes as f64);
        if self.selected_outcome >= outcomes {
            self.selected_outcome = 0;
        }
        self.selected_node = None;
        Ok(())
    }

    pub fn set_repetitions(&mut self, repetitions: usize) -> Result<(), ProbabilityError> {
        if repetitions > self.limits.max_repetitions {
            return Err(ProbabilityError::InvalidRepetitions {
                repetitions,
                max: self.limits.max_repetitions,
            });
        }
        self.repetitions = repetitions;
        if self
            .selected_node
            .as_ref()
            .is_some_and(|label| label.len() > repetitions)
        {
            self.selected_node = None;
        }
        Ok(())
    }

    /// Stores the probability of outcome `index` (0 based) as typed; `validate` checks it later.
    pub fn set_probability(&mut self, index: usize, value: f64) -> Result<(), ProbabilityError> {
        if index >= self.outcomes {
            return Err(ProbabilityError::OutcomeIndex {
                index,
                outcomes: self.outcomes,
            });
        }
        self.probabilities[index] = value;
        Ok(())
    }

    pub fn set_probabilities(&mut self, probabilities: DVector<f64>) -> Result<(), ProbabilityError> {
        if probabilities.len() != self.outcomes {
            return Err(ProbabilityError::LengthMismatch {
                expected: self.outcomes,
                found: probabilities.len(),
            });
        }
        self.probabilities = probabilities;
        Ok(())
    }

    pub fn sum(&self) -> f64 {
        self.probabilities.sum()
    }

    /// Every probability in [0, 1] and their sum 1 within the tolerance.
    pub fn validate(&self) -> Result<(), ProbabilityError> {
        for (index, &value) in self.probabilities.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProbabilityError::ProbabilityOutOfRange { index, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > self.limits.tolerance {
            return Err(ProbabilityError::SumNotOne { sum });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn select_outcome(&mut self, index: usize) -> Result<(), ProbabilityError> {
        if index >= self.outcomes {
            return Err(ProbabilityError::OutcomeIndex {
                index,
                outcomes: self.outcomes,
            });
        }
        self.selected_outcome = index;
        Ok(())
    }

    pub fn selected_outcome(&self) -> usize {
        self.selected_outcome
    }

    /// Distribution of the number of times the selected outcome occurs in R repetitions.
    pub fn binomial(&self) -> Result<DVector<f64>, ProbabilityError> {
        self.validate()?;
        binomial_pmf(
            self.probabilities[self.selected_outcome],
            self.repetitions as u32,
        )
    }

    fn check_label(&self, label: &str, max_length: usize) -> Result<(), ProbabilityError> {
        let well_formed = label.len() <= max_length
            && label
                .chars()
                .all(|c| c.to_digit(10).is_some_and(|d| d >= 1 && d as usize <= self.outcomes));
        if well_formed {
            Ok(())
        } else {
            Err(ProbabilityError::InvalidPath(label.to_string()))
        }
    }

    /// Product of the probabilities along `label`; a prefix gives the probability of its node.
    pub fn path_probability(&self, label: &str) -> Result<f64, ProbabilityError> {
        self.check_label(label, self.repetitions)?;
        Ok(label
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| self.probabilities[d as usize - 1])
            .product())
    }

    /// codes of every node with `length` draws, in counting order
    fn codes(&self, length: usize) -> Result<Vec<u64>, ProbabilityError> {
        let overflow = ProbabilityError::PathCountOverflow {
            outcomes: self.outcomes,
            repetitions: length,
        };
        let count = u32::try_from(length)
            .ok()
            .and_then(|l| (self.outcomes as u64).checked_pow(l))
            .ok_or(overflow.clone())?;
        let mut code = first_code(length).ok_or(overflow)?;
        let mut codes = Vec::with_capacity(count as usize);
        for k in 0..count {
            codes.push(code);
            if k + 1 < count {
                code = next_path_code(code, self.outcomes)?;
            }
        }
        Ok(codes)
    }

    fn label_of(code: u64) -> String {
        if code == 0 { String::new() } else { code.to_string() }
    }

    /// All K^R paths with their probabilities, in counting order.
    pub fn enumerate_paths(&self) -> Result<Vec<Path>, ProbabilityError> {
        self.validate()?;
        let paths = self
            .codes(self.repetitions)?
            .into_iter()
            .map(|code| {
                let label = Self::label_of(code);
                let probability = self.path_probability(&label)?;
                Ok(Path {
                    code,
                    label,
                    probability,
                })
            })
            .collect::<Result<Vec<Path>, ProbabilityError>>()?;
        debug!(
            "{} paths for {} outcomes and {} repetitions",
            paths.len(),
            self.outcomes,
            self.repetitions
        );
        Ok(paths)
    }

    /// Nodes of the tree level by level, from the root (level 0) to the leaves (level R).
    pub fn tree_levels(&self) -> Result<Vec<Vec<TreeNode>>, ProbabilityError> {
        self.validate()?;
        (0..=self.repetitions)
            .map(|level| {
                self.codes(level)?
                    .into_iter()
                    .map(|code| {
                        let label = Self::label_of(code);
                        let branch_probability = label
                            .chars()
                            .last()
                            .and_then(|c| c.to_digit(10))
                            .map_or(1.0, |d| self.probabilities[d as usize - 1]);
                        let cumulative_probability = self.path_probability(&label)?;
                        Ok(TreeNode {
                            label,
                            level,
                            branch_probability,
                            cumulative_probability,
                        })
                    })
                    .collect::<Result<Vec<TreeNode>, ProbabilityError>>()
            })
            .collect()
    }

    /// Parallel arrays for the histogram: path probabilities and path codes.
    pub fn branch_histogram(&self) -> Result<(Vec<f64>, Vec<u64>), ProbabilityError> {
        Ok(self
            .enumerate_paths()?
            .into_iter()
            .map(|path| (path.probability, path.code))
            .unzip())
    }

    /// Selects a node (or complete path) by its label; written by the tree and by the histogram.
    pub fn select_node(&mut self, label: &str) -> Result<(), ProbabilityError> {
        if let Err(e) = self.check_label(label, self.repetitions) {
            warn!("selection '{}' rejected: {}", label, e);
            return Err(e);
        }
        self.selected_node = Some(label.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_node = None;
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.selected_node.as_deref()
    }

    /// Whether the node `label` lies on the selected path: `label` is a prefix of the selection.
    pub fn is_highlighted(&self, label: &str) -> bool {
        self.selected_node
            .as_deref()
            .is_some_and(|selected| selected.starts_with(label))
    }

    /// enumeration as a text table
    pub fn paths_table(&self) -> Result<String, ProbabilityError> {
        let paths = self.enumerate_paths()?;
        let mut builder = Builder::default();
        builder.push_record(["path".to_string(), "probability".to_string()]);
        for path in paths.iter() {
            builder.push_record([path.label.clone(), format!("{:.6}", path.probability)]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        let table = table.to_string();
        info!("\n{}", table);
        Ok(table)
    }
}
