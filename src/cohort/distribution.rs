//! Validated discrete probability distributions

use rand::distributions::WeightedIndex;
use rand::Rng;
use std::fmt;

/// Tolerance used when checking that probabilities sum to one
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Errors raised when a distribution table is malformed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistributionError {
    /// Table had no outcomes
    #[error("Distribution has no outcomes")]
    Empty,

    /// A weight was negative or not finite
    #[error("Invalid probability {0} (must be finite and non-negative)")]
    InvalidWeight(f64),

    /// Probabilities did not sum to 1.0
    #[error("Probabilities sum to {0}, expected 1.0")]
    BadSum(f64),

    /// An outcome appeared more than once
    #[error("Outcome {0} appears more than once")]
    DuplicateOutcome(String),

    /// A reallocation fraction was outside [0, 1]
    #[error("Reallocation fraction {0} is outside [0, 1]")]
    InvalidFraction(f64),
}

/// Probability distribution over a small set of outcomes
#[derive(Clone)]
pub struct Distribution<T> {
    outcomes: Vec<T>,
    probabilities: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl<T: fmt::Debug> fmt::Debug for Distribution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.outcomes.iter().zip(self.probabilities.iter()))
            .finish()
    }
}

impl<T: Copy + PartialEq + fmt::Debug> Distribution<T> {
    /// Build a distribution whose probabilities must already sum to 1.0
    pub fn new(entries: &[(T, f64)]) -> Result<Self, DistributionError> {
        let sum = Self::check_entries(entries)?;
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(DistributionError::BadSum(sum));
        }
        Self::build(entries)
    }

    /// Build a distribution from relative weights, normalising them
    pub fn from_weights(entries: &[(T, f64)]) -> Result<Self, DistributionError> {
        let sum = Self::check_entries(entries)?;
        if sum <= 0.0 {
            return Err(DistributionError::BadSum(sum));
        }
        let normalised: Vec<(T, f64)> = entries.iter().map(|(t, w)| (*t, w / sum)).collect();
        Self::build(&normalised)
    }

    /// Uniform distribution over the given outcomes
    pub fn uniform(outcomes: &[T]) -> Result<Self, DistributionError> {
        let entries: Vec<(T, f64)> = outcomes.iter().map(|o| (*o, 1.0)).collect();
        Self::from_weights(&entries)
    }

    fn check_entries(entries: &[(T, f64)]) -> Result<f64, DistributionError> {
        if entries.is_empty() {
            return Err(DistributionError::Empty);
        }
        for (i, (outcome, weight)) in entries.iter().enumerate() {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(DistributionError::InvalidWeight(*weight));
            }
            if entries[..i].iter().any(|(other, _)| other == outcome) {
                return Err(DistributionError::DuplicateOutcome(format!("{:?}", outcome)));
            }
        }
        Ok(entries.iter().map(|(_, w)| w).sum())
    }

    fn build(entries: &[(T, f64)]) -> Result<Self, DistributionError> {
        let outcomes: Vec<T> = entries.iter().map(|(t, _)| *t).collect();
        let probabilities: Vec<f64> = entries.iter().map(|(_, p)| *p).collect();
        let index = WeightedIndex::new(&probabilities)
            .map_err(|_| DistributionError::BadSum(probabilities.iter().sum()))?;
        Ok(Self { outcomes, probabilities, index })
    }

    /// Draw one outcome
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.outcomes[rng.sample(&self.index)]
    }

    /// Probability assigned to an outcome (zero when absent)
    pub fn probability(&self, outcome: T) -> f64 {
        self.outcomes
            .iter()
            .position(|o| *o == outcome)
            .map(|i| self.probabilities[i])
            .unwrap_or(0.0)
    }

    /// Sum of all probabilities
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Outcome/probability pairs in table order
    pub fn entries(&self) -> impl Iterator<Item = (T, f64)> + '_ {
        self.outcomes.iter().copied().zip(self.probabilities.iter().copied())
    }

    /// Move probability mass toward `target`.
    ///
    /// `migration` of the `source` outcome's mass and `cannibalization` of
    /// every other outcome's mass (excluding `target`) move to `target`,
    /// which is added to the table when absent. Total mass is unchanged.
    pub fn reallocate(
        &self,
        source: T,
        target: T,
        migration: f64,
        cannibalization: f64,
    ) -> Result<Self, DistributionError> {
        for fraction in [migration, cannibalization] {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(DistributionError::InvalidFraction(fraction));
            }
        }

        let mut entries: Vec<(T, f64)> = self.entries().collect();
        if !entries.iter().any(|(o, _)| *o == target) {
            entries.push((target, 0.0));
        }

        let mut moved = 0.0;
        for (outcome, probability) in entries.iter_mut() {
            if *outcome == target {
                continue;
            }
            let fraction = if *outcome == source { migration } else { cannibalization };
            let delta = *probability * fraction;
            *probability -= delta;
            moved += delta;
        }
        for (outcome, probability) in entries.iter_mut() {
            if *outcome == target {
                *probability += moved;
            }
        }

        Self::from_weights(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Colour {
        Red,
        Green,
        Blue,
    }

    #[test]
    fn test_new_rejects_bad_tables() {
        assert_eq!(Distribution::<Colour>::new(&[]).unwrap_err(), DistributionError::Empty);
        assert!(matches!(
            Distribution::new(&[(Colour::Red, 0.5), (Colour::Green, 0.4)]),
            Err(DistributionError::BadSum(_))
        ));
        assert!(matches!(
            Distribution::new(&[(Colour::Red, 1.5), (Colour::Green, -0.5)]),
            Err(DistributionError::InvalidWeight(_))
        ));
        assert!(matches!(
            Distribution::new(&[(Colour::Red, 0.5), (Colour::Red, 0.5)]),
            Err(DistributionError::DuplicateOutcome(_))
        ));
    }

    #[test]
    fn test_sampling_follows_probabilities() {
        let dist = Distribution::new(&[(Colour::Red, 0.7), (Colour::Green, 0.3)]).unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let reds = (0..10_000).filter(|_| dist.sample(&mut rng) == Colour::Red).count();
        assert!((6_700..7_300).contains(&reds), "got {} reds", reds);
    }

    #[test]
    fn test_reallocate_preserves_total() {
        let dist = Distribution::new(&[(Colour::Red, 0.5), (Colour::Green, 0.5)]).unwrap();
        let moved = dist.reallocate(Colour::Red, Colour::Blue, 0.4, 0.1).unwrap();
        assert!((moved.total() - 1.0).abs() < PROBABILITY_TOLERANCE);
        assert!((moved.probability(Colour::Red) - 0.3).abs() < 1e-9);
        assert!((moved.probability(Colour::Green) - 0.45).abs() < 1e-9);
        assert!((moved.probability(Colour::Blue) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_reallocate_rejects_bad_fraction() {
        let dist = Distribution::uniform(&[Colour::Red, Colour::Green]).unwrap();
        assert!(dist.reallocate(Colour::Red, Colour::Green, 1.2, 0.0).is_err());
    }
}
