//! Built-in scenario presets

/// Default preset when none is named on the command line
pub const DEFAULT_SCENARIO: &str = "baseline";

/// Name that selects a scenario file instead of a preset
pub const CUSTOM_SCENARIO: &str = "custom";

/// A built-in scenario: kind defaults plus run-level parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioPreset {
    /// Preset name, equal to its kind tag
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Duration expression
    pub duration: &'static str,
    /// Overall intensity multiplier
    pub intensity: f64,
    /// Baseline orders per hour, when it differs from the default
    pub orders_per_hour: Option<f64>,
    /// Baseline orders per day, when the preset is defined per day
    pub orders_per_day: Option<f64>,
    /// Customer population, when it differs from the default
    pub customers: Option<usize>,
}

/// Every built-in preset
pub const PRESETS: &[ScenarioPreset] = &[
    ScenarioPreset {
        name: "flash_sale",
        description: "Four-hour 70% off electronics sale with an exponential traffic spike",
        duration: "4h",
        intensity: 8.5,
        orders_per_hour: Some(1000.0),
        orders_per_day: None,
        customers: None,
    },
    ScenarioPreset {
        name: "returns_wave",
        description: "Post-holiday returns surge, triple return rate on electronics and clothing",
        duration: "14d",
        intensity: 1.2,
        orders_per_hour: None,
        orders_per_day: None,
        customers: None,
    },
    ScenarioPreset {
        name: "supply_disruption",
        description: "Primary electronics supplier offline, backups cover 60% of capacity",
        duration: "14d",
        intensity: 0.8,
        orders_per_hour: None,
        orders_per_day: None,
        customers: None,
    },
    ScenarioPreset {
        name: "payment_outage",
        description: "Two-hour payment gateway outage during peak traffic",
        duration: "6h",
        intensity: 1.5,
        orders_per_hour: None,
        orders_per_day: None,
        customers: None,
    },
    ScenarioPreset {
        name: "viral_moment",
        description: "TikTok-driven demand spike on a 500-unit skincare set",
        duration: "24h",
        intensity: 2.5,
        orders_per_hour: None,
        orders_per_day: None,
        customers: None,
    },
    ScenarioPreset {
        name: "customer_segments",
        description: "Six months of gen Z growth and behavioral shift",
        duration: "180d",
        intensity: 1.0,
        orders_per_hour: None,
        orders_per_day: None,
        customers: None,
    },
    ScenarioPreset {
        name: "seasonal_planning",
        description: "Back-to-school season with a 15% promotion",
        duration: "60d",
        intensity: 1.8,
        orders_per_hour: None,
        orders_per_day: None,
        customers: None,
    },
    ScenarioPreset {
        name: "multi_channel",
        description: "Mobile app launch pulling 35% of web shoppers",
        duration: "90d",
        intensity: 1.18,
        orders_per_hour: None,
        orders_per_day: None,
        customers: None,
    },
    ScenarioPreset {
        name: "baseline",
        description: "Thirty days of business as usual, 2500 orders per day",
        duration: "30d",
        intensity: 1.0,
        orders_per_hour: None,
        orders_per_day: Some(2500.0),
        customers: Some(10_000),
    },
];

/// Look up a preset by name (case-insensitive)
pub fn find_preset(name: &str) -> Option<&'static ScenarioPreset> {
    let name = name.trim().to_lowercase();
    PRESETS.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioKind;

    #[test]
    fn test_every_preset_has_a_kind() {
        assert_eq!(PRESETS.len(), ScenarioKind::TAGS.len());
        for preset in PRESETS {
            assert!(ScenarioKind::TAGS.contains(&preset.name), "{}", preset.name);
        }
    }

    #[test]
    fn test_find_preset() {
        assert_eq!(find_preset("Flash_Sale").map(|p| p.duration), Some("4h"));
        assert!(find_preset(CUSTOM_SCENARIO).is_none());
    }
}
