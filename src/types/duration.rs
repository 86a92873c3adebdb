//! Compact duration expressions
//!
//! Scenario durations are written as a positive integer followed by a unit
//! letter: `h` for hours, `d` for days and `m` for months.
//!
//! `m` means a 30-day month, not a minute. Existing scenario files depend on
//! this reading (`"1m"` is a month-long run), so it is kept as-is.

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Hours in one month for the `m` unit
pub const HOURS_PER_MONTH: u32 = 30 * 24;

/// Longest accepted scenario, ten 365-day years
pub const MAX_DURATION_HOURS: usize = 10 * 365 * 24;

/// Unit letter of a duration expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    /// `h`
    Hours,
    /// `d`
    Days,
    /// `m`, a 30-day month
    Months,
}

impl DurationUnit {
    fn hours(&self) -> u32 {
        match self {
            DurationUnit::Hours => 1,
            DurationUnit::Days => 24,
            DurationUnit::Months => HOURS_PER_MONTH,
        }
    }

    fn suffix(&self) -> char {
        match self {
            DurationUnit::Hours => 'h',
            DurationUnit::Days => 'd',
            DurationUnit::Months => 'm',
        }
    }
}

/// Errors raised while parsing a duration expression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationParseError {
    /// Expression was empty
    #[error("Duration expression is empty")]
    Empty,

    /// Unit letter is not one of h, d, m
    #[error("Unknown duration unit '{unit}' in '{expression}' (expected h, d or m)")]
    UnknownUnit {
        /// The full expression
        expression: String,
        /// The unrecognised suffix
        unit: String,
    },

    /// Amount was missing or not a positive integer
    #[error("Invalid duration amount in '{0}' (expected a positive integer)")]
    InvalidAmount(String),

    /// Expression is longer than the supported maximum
    #[error("Duration '{0}' exceeds the maximum of {max} hours", max = MAX_DURATION_HOURS)]
    TooLong(String),
}

/// Parsed scenario duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioDuration {
    amount: u32,
    unit: DurationUnit,
}

impl ScenarioDuration {
    /// Duration of `amount` hours
    pub fn hours(amount: u32) -> Self {
        Self { amount, unit: DurationUnit::Hours }
    }

    /// Duration of `amount` days
    pub fn days(amount: u32) -> Self {
        Self { amount, unit: DurationUnit::Days }
    }

    /// Duration of `amount` 30-day months
    pub fn months(amount: u32) -> Self {
        Self { amount, unit: DurationUnit::Months }
    }

    /// Total length in whole hours
    pub fn total_hours(&self) -> usize {
        (self.amount as usize).saturating_mul(self.unit.hours() as usize)
    }

    /// Total length as a chrono duration, saturating at the largest representable span
    pub fn as_chrono(&self) -> Duration {
        let millis = i64::try_from(self.total_hours()).unwrap_or(i64::MAX).saturating_mul(3_600_000);
        Duration::milliseconds(millis)
    }

    /// Unit of the original expression
    pub fn unit(&self) -> DurationUnit {
        self.unit
    }
}

impl FromStr for ScenarioDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expression = s.trim();
        let unit_char = expression.chars().last().ok_or(DurationParseError::Empty)?;
        let digits = &expression[..expression.len() - unit_char.len_utf8()];

        let unit = match unit_char.to_ascii_lowercase() {
            'h' => DurationUnit::Hours,
            'd' => DurationUnit::Days,
            'm' => DurationUnit::Months,
            c if c.is_ascii_digit() => {
                return Err(DurationParseError::UnknownUnit {
                    expression: expression.to_string(),
                    unit: String::new(),
                })
            }
            _ => {
                return Err(DurationParseError::UnknownUnit {
                    expression: expression.to_string(),
                    unit: unit_char.to_string(),
                })
            }
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DurationParseError::InvalidAmount(expression.to_string()));
        }
        let amount: u32 = digits
            .parse()
            .map_err(|_| DurationParseError::InvalidAmount(expression.to_string()))?;
        if amount == 0 {
            return Err(DurationParseError::InvalidAmount(expression.to_string()));
        }

        let duration = Self { amount, unit };
        if duration.total_hours() > MAX_DURATION_HOURS {
            return Err(DurationParseError::TooLong(expression.to_string()));
        }
        Ok(duration)
    }
}

impl fmt::Display for ScenarioDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl Serialize for ScenarioDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScenarioDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!("4h".parse::<ScenarioDuration>().unwrap().total_hours(), 4);
        assert_eq!("14d".parse::<ScenarioDuration>().unwrap().total_hours(), 14 * 24);
        assert_eq!("1m".parse::<ScenarioDuration>().unwrap().total_hours(), 30 * 24);
        assert_eq!("6H".parse::<ScenarioDuration>().unwrap().total_hours(), 6);
    }

    #[test]
    fn test_month_is_not_minutes() {
        let duration: ScenarioDuration = "30m".parse().unwrap();
        assert_eq!(duration.unit(), DurationUnit::Months);
        assert_eq!(duration.as_chrono(), Duration::days(900));
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        assert!(matches!(
            "3w".parse::<ScenarioDuration>(),
            Err(DurationParseError::UnknownUnit { .. })
        ));
        assert!(matches!(
            "12".parse::<ScenarioDuration>(),
            Err(DurationParseError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn test_invalid_amounts_are_rejected() {
        assert_eq!("".parse::<ScenarioDuration>(), Err(DurationParseError::Empty));
        assert!(matches!("h".parse::<ScenarioDuration>(), Err(DurationParseError::InvalidAmount(_))));
        assert!(matches!("0d".parse::<ScenarioDuration>(), Err(DurationParseError::InvalidAmount(_))));
        assert!(matches!("-2d".parse::<ScenarioDuration>(), Err(DurationParseError::InvalidAmount(_))));
        assert!(matches!("1.5d".parse::<ScenarioDuration>(), Err(DurationParseError::InvalidAmount(_))));
    }

    #[test]
    fn test_oversized_durations_are_rejected() {
        assert!(matches!("5000000m".parse::<ScenarioDuration>(), Err(DurationParseError::TooLong(_))));
        assert!(matches!("3651d".parse::<ScenarioDuration>(), Err(DurationParseError::TooLong(_))));
        assert_eq!("3650d".parse::<ScenarioDuration>().unwrap().total_hours(), MAX_DURATION_HOURS);
        assert_eq!(ScenarioDuration::months(u32::MAX).as_chrono(), Duration::milliseconds(i64::MAX));
    }

    #[test]
    fn test_display_round_trip() {
        for expr in ["4h", "14d", "2m"] {
            let duration: ScenarioDuration = expr.parse().unwrap();
            assert_eq!(duration.to_string(), expr);
        }
    }
}
