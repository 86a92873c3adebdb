//! Hourly order targets

use serde::Serialize;

use crate::curve::IntensityCurve;
use crate::orders::state::RunState;

/// Whole order count for every scenario hour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPlan {
    counts: Vec<usize>,
    expected: Vec<f64>,
}

impl HourlyPlan {
    /// Counts from `rate × multiplier × intensity`, carrying fractional
    /// remainders forward through `state`
    pub fn build(curve: &IntensityCurve, hourly_rate: f64, intensity: f64, state: &mut RunState) -> Self {
        let expected: Vec<f64> = curve.values().iter().map(|m| hourly_rate * m * intensity).collect();
        let counts = expected.iter().map(|&target| state.next_count(target)).collect();
        Self { counts, expected }
    }

    /// Plan from explicit counts
    pub fn from_counts(counts: Vec<usize>) -> Self {
        let expected = counts.iter().map(|&c| c as f64).collect();
        Self { counts, expected }
    }

    /// Orders per hour
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Unrounded expected orders per hour
    pub fn expected(&self) -> &[f64] {
        &self.expected
    }

    /// Number of hours
    pub fn hours(&self) -> usize {
        self.counts.len()
    }

    /// Total planned orders
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Mean planned orders per hour
    pub fn mean(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        self.total() as f64 / self.counts.len() as f64
    }

    /// Split the hours into at most `parts` contiguous ranges of similar order volume
    pub fn partition(&self, parts: usize) -> Vec<std::ops::Range<usize>> {
        let parts = parts.max(1).min(self.counts.len().max(1));
        let total = self.total().max(1) as f64;
        let mut ranges = Vec::with_capacity(parts);
        let mut start = 0;
        let mut running = 0usize;
        for (hour, &count) in self.counts.iter().enumerate() {
            running += count;
            let boundary = total * (ranges.len() + 1) as f64 / parts as f64;
            let hours_left = self.counts.len() - hour - 1;
            let parts_left = parts - ranges.len() - 1;
            if ranges.len() + 1 < parts && (running as f64 >= boundary || hours_left == parts_left) {
                ranges.push(start..hour + 1);
                start = hour + 1;
            }
        }
        ranges.push(start..self.counts.len());
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_covers_every_hour() {
        let plan = HourlyPlan::from_counts(vec![5, 1, 1, 1, 8, 0, 2, 3]);
        for parts in 1..=10 {
            let ranges = plan.partition(parts);
            assert!(ranges.len() <= parts.min(8));
            assert_eq!(ranges.first().map(|r| r.start), Some(0));
            assert_eq!(ranges.last().map(|r| r.end), Some(8));
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert!(!pair[0].is_empty());
            }
        }
    }

    #[test]
    fn test_partition_balances_volume() {
        let plan = HourlyPlan::from_counts(vec![10; 12]);
        let ranges = plan.partition(3);
        assert_eq!(ranges, vec![0..4, 4..8, 8..12]);
    }
}
