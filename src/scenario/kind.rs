//! Scenario kinds and their override schemas
//!
//! Each kind is a variant of the closed [`ScenarioKind`] set carrying its own
//! typed override block. The per-kind behavior (curve shape, campaign, entity
//! multipliers, cohort perturbation) is exposed through the
//! [`ScenarioProfile`] trait so downstream generators never branch on the
//! scenario name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::cohort::{ChannelMigration, CohortAdjustment};
use crate::curve::{CurveShape, SpikeShape};
use crate::reference::find_supplier;
use crate::scenario::error::{check_range, check_window_start, ScenarioValidationError, ValidationResult};
use crate::types::{CampaignType, Category, IssueCategory, SeasonalPattern, ShoppingChannel};

/// Campaign a scenario runs for its duration
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignPlan {
    /// Display name
    pub name: String,
    /// Campaign type
    pub campaign_type: CampaignType,
    /// Discount rate in [0, 1]
    pub discount_rate: f64,
    /// Categories the campaign applies to
    pub categories: Vec<Category>,
    /// Hours from scenario start during which the campaign is active
    pub active_hours: usize,
}

/// Product whose demand is boosted and whose inventory is capped
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedProduct {
    /// Product name
    pub name: String,
    /// Product category
    pub category: Category,
    /// Units available for the whole run
    pub inventory: u32,
    /// Share of order lines that ask for this product while it is in stock
    pub demand_share: f64,
}

/// Capacity restriction on one supplier's products
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyConstraint {
    /// Supplier name as listed in the supplier table
    pub supplier: String,
    /// Number of the supplier's SKUs that become inventory-capped
    pub affected_skus: usize,
    /// Fraction of normal supply still available from backup sources
    pub capacity_factor: f64,
    /// Hours during which the disruption is active
    pub window: Range<usize>,
}

/// Mix of issue categories for support tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueMix {
    /// Everyday mix led by delivery issues
    Standard,
    /// Refund and product issues dominate
    RefundHeavy,
    /// Payment and technical issues dominate
    PaymentHeavy,
}

impl IssueMix {
    /// Issue category weights (sum to 1.0)
    pub fn weights(&self) -> &'static [(IssueCategory, f64)] {
        match self {
            IssueMix::Standard => &[
                (IssueCategory::Delivery, 0.30),
                (IssueCategory::Product, 0.20),
                (IssueCategory::Refund, 0.15),
                (IssueCategory::Payment, 0.15),
                (IssueCategory::Technical, 0.10),
                (IssueCategory::Other, 0.10),
            ],
            IssueMix::RefundHeavy => &[
                (IssueCategory::Refund, 0.60),
                (IssueCategory::Product, 0.30),
                (IssueCategory::Other, 0.10),
            ],
            IssueMix::PaymentHeavy => &[
                (IssueCategory::Payment, 0.70),
                (IssueCategory::Technical, 0.20),
                (IssueCategory::Other, 0.10),
            ],
        }
    }
}

/// Return-rate and timing policy
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPolicy {
    /// Multiplier on the base return rate
    pub rate_multiplier: f64,
    /// Categories whose items are returned twice as often
    pub boosted_categories: Vec<Category>,
    /// Minimum days between delivery and return
    pub min_dwell_days: u32,
    /// Maximum days between delivery and return
    pub max_dwell_days: u32,
    /// Minimum processing days
    pub min_processing_days: u32,
    /// Maximum processing days
    pub max_processing_days: u32,
}

impl Default for ReturnPolicy {
    fn default() -> Self {
        Self {
            rate_multiplier: 1.0,
            boosted_categories: Vec::new(),
            min_dwell_days: 1,
            max_dwell_days: 14,
            min_processing_days: 3,
            max_processing_days: 7,
        }
    }
}

/// Behavior a scenario kind contributes to generation.
///
/// Hours are scenario-relative (hour 0 is the first hour of the run).
pub trait ScenarioProfile: fmt::Debug + Send + Sync {
    /// Stable kind tag
    fn tag(&self) -> &'static str;

    /// Check the override values
    fn validate(&self) -> ValidationResult<()> {
        Ok(())
    }

    /// Check that hour-based windows start inside a run of `total_hours`
    fn validate_window(&self, _total_hours: usize) -> ValidationResult<()> {
        Ok(())
    }

    /// Shaping function applied on top of the diurnal baseline
    fn curve_shape(&self, _total_hours: usize) -> CurveShape {
        CurveShape::steady()
    }

    /// Category that takes most of the product catalogue
    fn focus_category(&self) -> Option<Category> {
        None
    }

    /// Categories orders draw products from (empty means all)
    fn affected_categories(&self) -> Vec<Category> {
        Vec::new()
    }

    /// Campaign active during the scenario
    fn campaign(&self, _total_hours: usize) -> Option<CampaignPlan> {
        None
    }

    /// Perturbation of the cohort tables
    fn cohort_adjustment(&self) -> CohortAdjustment {
        CohortAdjustment::default()
    }

    /// Inventory-capped product with boosted demand
    fn featured_product(&self) -> Option<FeaturedProduct> {
        None
    }

    /// Supplier capacity restriction
    fn supply_constraint(&self, _total_hours: usize) -> Option<SupplyConstraint> {
        None
    }

    /// Whether `hour` falls inside a payment outage
    fn in_outage(&self, _hour: usize) -> bool {
        false
    }

    /// Forced payment failure rate for `hour`
    fn payment_failure_rate(&self, _hour: usize) -> Option<f64> {
        None
    }

    /// Multiplier on support ticket volume for `hour`
    fn ticket_multiplier(&self, _hour: usize) -> f64 {
        1.0
    }

    /// Multiplier on cart abandonment volume for `hour`
    fn abandonment_multiplier(&self, _hour: usize) -> f64 {
        1.0
    }

    /// Additive delivery-delay probability for `hour`
    fn delay_boost(&self, _hour: usize) -> f64 {
        0.0
    }

    /// Support issue mix for `hour`
    fn issue_mix(&self, _hour: usize) -> IssueMix {
        IssueMix::Standard
    }

    /// Return-rate and timing policy
    fn return_policy(&self) -> ReturnPolicy {
        ReturnPolicy::default()
    }
}

fn check_percent(field: &str, value: f64) -> ValidationResult<()> {
    check_range(field, value, 0.0, 100.0, "0-100")
}

fn title_case(s: &str) -> String {
    s.split(|c| c == '_' || c == ' ')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Steady-state business as usual
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaselineOverrides {}

impl ScenarioProfile for BaselineOverrides {
    fn tag(&self) -> &'static str {
        "baseline"
    }
}

/// Short, deep-discount sale on one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlashSaleOverrides {
    /// Discount percentage (0-100)
    pub discount_percent: f64,
    /// Category on sale
    pub category: Category,
    /// Length of the sale in hours
    pub event_hours: usize,
    /// Peak traffic multiplier
    pub peak_multiplier: f64,
    /// Hours to reach the peak
    pub ramp_hours: f64,
    /// Decay time after the peak, in hours
    pub decay_hours: f64,
    /// Traffic multiplier once the sale has ended
    pub after_event_multiplier: f64,
}

impl Default for FlashSaleOverrides {
    fn default() -> Self {
        Self {
            discount_percent: 70.0,
            category: Category::Electronics,
            event_hours: 4,
            peak_multiplier: 8.0,
            ramp_hours: 3.0,
            decay_hours: 2.0,
            after_event_multiplier: 0.5,
        }
    }
}

impl ScenarioProfile for FlashSaleOverrides {
    fn tag(&self) -> &'static str {
        "flash_sale"
    }

    fn validate(&self) -> ValidationResult<()> {
        check_percent("discount_percent", self.discount_percent)?;
        if self.event_hours == 0 {
            return Err(ScenarioValidationError::ZeroCount("event_hours".to_string()));
        }
        check_range("peak_multiplier", self.peak_multiplier, 1.0, 1_000.0, "1-1000")?;
        check_range("ramp_hours", self.ramp_hours, 0.0, 10_000.0, ">= 0")?;
        check_range("decay_hours", self.decay_hours, f64::MIN_POSITIVE, 10_000.0, "> 0")?;
        check_range("after_event_multiplier", self.after_event_multiplier, f64::MIN_POSITIVE, 1_000.0, "> 0")
    }

    fn curve_shape(&self, _total_hours: usize) -> CurveShape {
        CurveShape::Spike(SpikeShape {
            peak: self.peak_multiplier,
            ramp_hours: self.ramp_hours,
            decay_hours: self.decay_hours,
            event_hours: Some(self.event_hours),
            after_event: self.after_event_multiplier,
        })
    }

    fn focus_category(&self) -> Option<Category> {
        Some(self.category)
    }

    fn affected_categories(&self) -> Vec<Category> {
        vec![self.category]
    }

    fn campaign(&self, total_hours: usize) -> Option<CampaignPlan> {
        Some(CampaignPlan {
            name: format!("Flash Sale {} {}% Off", title_case(self.category.as_str()), self.discount_percent),
            campaign_type: CampaignType::FlashSale,
            discount_rate: self.discount_percent / 100.0,
            categories: vec![self.category],
            active_hours: total_hours,
        })
    }

    fn abandonment_multiplier(&self, _hour: usize) -> f64 {
        // urgency keeps shoppers in the funnel
        0.4
    }
}

/// Social-media driven demand spike on one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViralMomentOverrides {
    /// Name of the viral product
    pub product: String,
    /// Category of the viral product
    pub category: Category,
    /// Units of the viral product in stock
    pub inventory: u32,
    /// Platform where the product went viral
    pub platform: String,
    /// Strength of the viral effect
    pub viral_coefficient: f64,
    /// Length of the influencer campaign in hours
    pub campaign_hours: usize,
}

impl Default for ViralMomentOverrides {
    fn default() -> Self {
        Self {
            product: "skincare_set".to_string(),
            category: Category::Beauty,
            inventory: 500,
            platform: "tiktok".to_string(),
            viral_coefficient: 2.5,
            campaign_hours: 24,
        }
    }
}

impl ScenarioProfile for ViralMomentOverrides {
    fn tag(&self) -> &'static str {
        "viral_moment"
    }

    fn validate(&self) -> ValidationResult<()> {
        if self.product.trim().is_empty() {
            return Err(ScenarioValidationError::invalid_overrides(self.tag(), "product name is empty"));
        }
        if self.inventory == 0 {
            return Err(ScenarioValidationError::ZeroCount("inventory".to_string()));
        }
        check_range("viral_coefficient", self.viral_coefficient, f64::MIN_POSITIVE, 50.0, "0-50, exclusive of 0")
    }

    fn curve_shape(&self, _total_hours: usize) -> CurveShape {
        CurveShape::Spike(SpikeShape {
            peak: 1.0 + 4.0 * self.viral_coefficient,
            ramp_hours: 7.0,
            decay_hours: 6.0,
            event_hours: None,
            after_event: 1.0,
        })
    }

    fn focus_category(&self) -> Option<Category> {
        Some(self.category)
    }

    fn affected_categories(&self) -> Vec<Category> {
        vec![self.category]
    }

    fn campaign(&self, total_hours: usize) -> Option<CampaignPlan> {
        Some(CampaignPlan {
            name: format!("Viral {} Campaign", title_case(&self.platform)),
            campaign_type: CampaignType::Influencer,
            discount_rate: 0.0,
            categories: vec![self.category],
            active_hours: self.campaign_hours.min(total_hours),
        })
    }

    fn featured_product(&self) -> Option<FeaturedProduct> {
        Some(FeaturedProduct {
            name: self.product.clone(),
            category: self.category,
            inventory: self.inventory,
            demand_share: (0.2 * self.viral_coefficient).min(0.9),
        })
    }

    fn ticket_multiplier(&self, _hour: usize) -> f64 {
        // restock and order-status inquiries
        2.0
    }
}

/// Payment gateway outage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaymentOutageOverrides {
    /// First outage hour
    pub outage_start_hour: usize,
    /// Outage length in hours
    pub outage_hours: usize,
    /// Order volume lost during the outage (0-100, exclusive of 100)
    pub volume_drop_percent: f64,
    /// Payment failure rate during the outage
    pub payment_failure_rate: f64,
    /// Support ticket multiplier during the outage
    pub ticket_multiplier: f64,
    /// Cart abandonment multiplier during the outage
    pub abandonment_multiplier: f64,
}

impl Default for PaymentOutageOverrides {
    fn default() -> Self {
        Self {
            outage_start_hour: 1,
            outage_hours: 2,
            volume_drop_percent: 80.0,
            payment_failure_rate: 0.7,
            ticket_multiplier: 3.0,
            abandonment_multiplier: 3.5,
        }
    }
}

impl PaymentOutageOverrides {
    fn window(&self) -> Range<usize> {
        self.outage_start_hour..self.outage_start_hour.saturating_add(self.outage_hours)
    }
}

impl ScenarioProfile for PaymentOutageOverrides {
    fn tag(&self) -> &'static str {
        "payment_outage"
    }

    fn validate(&self) -> ValidationResult<()> {
        if self.outage_hours == 0 {
            return Err(ScenarioValidationError::ZeroCount("outage_hours".to_string()));
        }
        if !self.volume_drop_percent.is_finite()
            || self.volume_drop_percent < 0.0
            || self.volume_drop_percent >= 100.0
        {
            return Err(ScenarioValidationError::out_of_range(
                "volume_drop_percent",
                self.volume_drop_percent,
                "0-100, exclusive of 100",
            ));
        }
        check_range("payment_failure_rate", self.payment_failure_rate, 0.0, 1.0, "0.0-1.0")?;
        check_range("ticket_multiplier", self.ticket_multiplier, 0.0, 100.0, "0-100")?;
        check_range("abandonment_multiplier", self.abandonment_multiplier, 0.0, 100.0, "0-100")
    }

    fn validate_window(&self, total_hours: usize) -> ValidationResult<()> {
        check_window_start("outage_start_hour", self.outage_start_hour, total_hours)
    }

    fn curve_shape(&self, _total_hours: usize) -> CurveShape {
        CurveShape::Disruption { window: self.window(), factor: 1.0 - self.volume_drop_percent / 100.0 }
    }

    fn in_outage(&self, hour: usize) -> bool {
        self.window().contains(&hour)
    }

    fn payment_failure_rate(&self, hour: usize) -> Option<f64> {
        self.in_outage(hour).then_some(self.payment_failure_rate)
    }

    fn ticket_multiplier(&self, hour: usize) -> f64 {
        if self.in_outage(hour) {
            self.ticket_multiplier
        } else {
            1.0
        }
    }

    fn abandonment_multiplier(&self, hour: usize) -> f64 {
        if self.in_outage(hour) {
            self.abandonment_multiplier
        } else {
            1.0
        }
    }

    fn issue_mix(&self, hour: usize) -> IssueMix {
        if self.in_outage(hour) {
            IssueMix::PaymentHeavy
        } else {
            IssueMix::Standard
        }
    }
}

/// Loss of a primary supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupplyDisruptionOverrides {
    /// Disrupted supplier (name or slug such as `china_main`)
    pub supplier: String,
    /// Number of the supplier's SKUs that become inventory-capped
    pub affected_skus: usize,
    /// Share of normal capacity covered by backup suppliers (0-100)
    pub backup_capacity_percent: f64,
    /// First disrupted hour
    pub disruption_start_hour: usize,
    /// Disruption length in hours (until the end of the run when absent)
    pub disruption_hours: Option<usize>,
    /// Extra delivery-delay probability while disrupted
    pub delay_boost: f64,
}

impl Default for SupplyDisruptionOverrides {
    fn default() -> Self {
        Self {
            supplier: "China Main Electronics".to_string(),
            affected_skus: 35,
            backup_capacity_percent: 60.0,
            disruption_start_hour: 24,
            disruption_hours: None,
            delay_boost: 0.3,
        }
    }
}

impl SupplyDisruptionOverrides {
    fn window(&self, total_hours: usize) -> Range<usize> {
        let end = match self.disruption_hours {
            Some(hours) => self.disruption_start_hour.saturating_add(hours),
            None => total_hours,
        };
        self.disruption_start_hour..end.max(self.disruption_start_hour)
    }

    fn in_window(&self, hour: usize) -> bool {
        hour >= self.disruption_start_hour
            && self.disruption_hours.map_or(true, |h| hour < self.disruption_start_hour.saturating_add(h))
    }
}

impl ScenarioProfile for SupplyDisruptionOverrides {
    fn tag(&self) -> &'static str {
        "supply_disruption"
    }

    fn validate(&self) -> ValidationResult<()> {
        if find_supplier(&self.supplier).is_none() {
            return Err(ScenarioValidationError::UnknownSupplier(self.supplier.clone()));
        }
        if self.affected_skus == 0 {
            return Err(ScenarioValidationError::ZeroCount("affected_skus".to_string()));
        }
        if self.disruption_hours == Some(0) {
            return Err(ScenarioValidationError::ZeroCount("disruption_hours".to_string()));
        }
        check_range("backup_capacity_percent", self.backup_capacity_percent, 1.0, 100.0, "1-100")?;
        check_range("delay_boost", self.delay_boost, 0.0, 1.0, "0.0-1.0")
    }

    fn validate_window(&self, total_hours: usize) -> ValidationResult<()> {
        check_window_start("disruption_start_hour", self.disruption_start_hour, total_hours)
    }

    fn curve_shape(&self, total_hours: usize) -> CurveShape {
        CurveShape::Disruption {
            window: self.window(total_hours),
            factor: self.backup_capacity_percent / 100.0,
        }
    }

    fn supply_constraint(&self, total_hours: usize) -> Option<SupplyConstraint> {
        Some(SupplyConstraint {
            supplier: self.supplier.clone(),
            affected_skus: self.affected_skus,
            capacity_factor: self.backup_capacity_percent / 100.0,
            window: self.window(total_hours),
        })
    }

    fn delay_boost(&self, hour: usize) -> f64 {
        if self.in_window(hour) {
            self.delay_boost
        } else {
            0.0
        }
    }
}

/// Post-holiday surge of returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReturnsWaveOverrides {
    /// Multiplier on the base 8% return rate
    pub return_rate_multiplier: f64,
    /// Categories returned twice as often
    pub categories: Vec<Category>,
    /// Support ticket multiplier
    pub ticket_multiplier: f64,
    /// Maximum days between delivery and return
    pub max_dwell_days: u32,
    /// Minimum extra processing days on top of the base 3
    pub min_extra_processing_days: u32,
    /// Maximum extra processing days on top of the base 3
    pub max_extra_processing_days: u32,
}

impl Default for ReturnsWaveOverrides {
    fn default() -> Self {
        Self {
            return_rate_multiplier: 3.0,
            categories: vec![Category::Electronics, Category::Clothing],
            ticket_multiplier: 2.5,
            max_dwell_days: 21,
            min_extra_processing_days: 2,
            max_extra_processing_days: 10,
        }
    }
}

/// Upper bound on day-valued return policy overrides
const MAX_POLICY_DAYS: u32 = 365;

impl ScenarioProfile for ReturnsWaveOverrides {
    fn tag(&self) -> &'static str {
        "returns_wave"
    }

    fn validate(&self) -> ValidationResult<()> {
        check_range("return_rate_multiplier", self.return_rate_multiplier, 0.0, 12.5, "0-12.5")?;
        check_range("ticket_multiplier", self.ticket_multiplier, 0.0, 100.0, "0-100")?;
        if self.max_dwell_days == 0 {
            return Err(ScenarioValidationError::ZeroCount("max_dwell_days".to_string()));
        }
        for (field, days) in [
            ("max_dwell_days", self.max_dwell_days),
            ("max_extra_processing_days", self.max_extra_processing_days),
        ] {
            if days > MAX_POLICY_DAYS {
                return Err(ScenarioValidationError::out_of_range(field, f64::from(days), "at most 365 days"));
            }
        }
        if self.min_extra_processing_days > self.max_extra_processing_days {
            return Err(ScenarioValidationError::out_of_range(
                "min_extra_processing_days",
                self.min_extra_processing_days as f64,
                "<= max_extra_processing_days",
            ));
        }
        Ok(())
    }

    fn ticket_multiplier(&self, _hour: usize) -> f64 {
        self.ticket_multiplier
    }

    fn issue_mix(&self, _hour: usize) -> IssueMix {
        IssueMix::RefundHeavy
    }

    fn return_policy(&self) -> ReturnPolicy {
        ReturnPolicy {
            rate_multiplier: self.return_rate_multiplier,
            boosted_categories: self.categories.clone(),
            min_dwell_days: 1,
            max_dwell_days: self.max_dwell_days,
            min_processing_days: 3 + self.min_extra_processing_days,
            max_processing_days: 3 + self.max_extra_processing_days,
        }
    }
}

/// Seasonal demand planning window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeasonalPlanningOverrides {
    /// Season being planned for
    pub season: SeasonalPattern,
    /// Seasonal discount percentage (0-100)
    pub discount_percent: f64,
    /// Categories in the seasonal promotion
    pub categories: Vec<Category>,
    /// Campaign year used in the campaign name
    pub year: i32,
    /// Relative demand rise toward the middle of the season
    pub season_amplitude: f64,
}

impl Default for SeasonalPlanningOverrides {
    fn default() -> Self {
        Self {
            season: SeasonalPattern::BackToSchool,
            discount_percent: 15.0,
            categories: vec![Category::Electronics, Category::Clothing, Category::Books],
            year: 2024,
            season_amplitude: 0.15,
        }
    }
}

impl ScenarioProfile for SeasonalPlanningOverrides {
    fn tag(&self) -> &'static str {
        "seasonal_planning"
    }

    fn validate(&self) -> ValidationResult<()> {
        check_percent("discount_percent", self.discount_percent)?;
        check_range("season_amplitude", self.season_amplitude, 0.0, 0.9, "0.0-0.9")?;
        if self.categories.is_empty() {
            return Err(ScenarioValidationError::invalid_overrides(self.tag(), "categories is empty"));
        }
        Ok(())
    }

    fn curve_shape(&self, _total_hours: usize) -> CurveShape {
        CurveShape::Steady { weekly_amplitude: 0.08, period_amplitude: self.season_amplitude }
    }

    fn affected_categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    fn campaign(&self, total_hours: usize) -> Option<CampaignPlan> {
        Some(CampaignPlan {
            name: format!("{} {}", title_case(self.season.as_str()), self.year),
            campaign_type: CampaignType::Seasonal,
            discount_rate: self.discount_percent / 100.0,
            categories: self.categories.clone(),
            active_hours: total_hours,
        })
    }
}

/// Shift in the customer cohort mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomerSegmentsOverrides {
    /// Percentage points added to the gen Z population share
    pub gen_z_growth: f64,
    /// Whether gen Z also shops more often
    pub behavioral_shift: bool,
}

impl Default for CustomerSegmentsOverrides {
    fn default() -> Self {
        Self { gen_z_growth: 15.0, behavioral_shift: true }
    }
}

impl ScenarioProfile for CustomerSegmentsOverrides {
    fn tag(&self) -> &'static str {
        "customer_segments"
    }

    fn validate(&self) -> ValidationResult<()> {
        check_range("gen_z_growth", self.gen_z_growth, -28.0, 100.0, "-28 to 100 percentage points")
    }

    fn cohort_adjustment(&self) -> CohortAdjustment {
        CohortAdjustment {
            gen_z_share_boost: self.gen_z_growth / 100.0,
            gen_z_activity_boost: if self.behavioral_shift { 1.25 } else { 0.0 },
            migration: None,
        }
    }
}

/// Launch of a new shopping channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultiChannelOverrides {
    /// Newly launched channel
    pub new_channel: ShoppingChannel,
    /// Channel whose users migrate
    pub source_channel: ShoppingChannel,
    /// Share of the source channel that migrates (0-100)
    pub migration_rate: f64,
    /// Share of every other channel that is cannibalised (0-100)
    pub cannibalization: f64,
}

impl Default for MultiChannelOverrides {
    fn default() -> Self {
        Self {
            new_channel: ShoppingChannel::MobileApp,
            source_channel: ShoppingChannel::Web,
            migration_rate: 35.0,
            cannibalization: 15.0,
        }
    }
}

impl ScenarioProfile for MultiChannelOverrides {
    fn tag(&self) -> &'static str {
        "multi_channel"
    }

    fn validate(&self) -> ValidationResult<()> {
        check_percent("migration_rate", self.migration_rate)?;
        check_percent("cannibalization", self.cannibalization)?;
        if self.new_channel == self.source_channel {
            return Err(ScenarioValidationError::invalid_overrides(
                self.tag(),
                "new_channel and source_channel must differ",
            ));
        }
        Ok(())
    }

    fn cohort_adjustment(&self) -> CohortAdjustment {
        CohortAdjustment {
            migration: Some(ChannelMigration {
                source: self.source_channel,
                target: self.new_channel,
                migration: self.migration_rate / 100.0,
                cannibalization: self.cannibalization / 100.0,
            }),
            ..Default::default()
        }
    }
}

/// Closed set of scenario kinds, each with its override block
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioKind {
    /// Business as usual
    Baseline(BaselineOverrides),
    /// Flash sale
    FlashSale(FlashSaleOverrides),
    /// Viral product moment
    ViralMoment(ViralMomentOverrides),
    /// Payment gateway outage
    PaymentOutage(PaymentOutageOverrides),
    /// Supplier disruption
    SupplyDisruption(SupplyDisruptionOverrides),
    /// Returns wave
    ReturnsWave(ReturnsWaveOverrides),
    /// Seasonal planning
    SeasonalPlanning(SeasonalPlanningOverrides),
    /// Customer segment shift
    CustomerSegments(CustomerSegmentsOverrides),
    /// New channel launch
    MultiChannel(MultiChannelOverrides),
}

fn parse_overrides<T>(tag: &str, overrides: Option<&serde_json::Value>) -> ValidationResult<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    match overrides {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| ScenarioValidationError::invalid_overrides(tag, e.to_string())),
    }
}

impl ScenarioKind {
    /// Every kind tag
    pub const TAGS: &'static [&'static str] = &[
        "baseline",
        "flash_sale",
        "viral_moment",
        "payment_outage",
        "supply_disruption",
        "returns_wave",
        "seasonal_planning",
        "customer_segments",
        "multi_channel",
    ];

    /// Build a kind from its tag and optional JSON override block
    pub fn from_tag(tag: &str, overrides: Option<&serde_json::Value>) -> ValidationResult<Self> {
        let kind = match tag.trim().to_lowercase().as_str() {
            "baseline" => ScenarioKind::Baseline(parse_overrides(tag, overrides)?),
            "flash_sale" => ScenarioKind::FlashSale(parse_overrides(tag, overrides)?),
            "viral_moment" => ScenarioKind::ViralMoment(parse_overrides(tag, overrides)?),
            "payment_outage" => ScenarioKind::PaymentOutage(parse_overrides(tag, overrides)?),
            "supply_disruption" => ScenarioKind::SupplyDisruption(parse_overrides(tag, overrides)?),
            "returns_wave" => ScenarioKind::ReturnsWave(parse_overrides(tag, overrides)?),
            "seasonal_planning" => ScenarioKind::SeasonalPlanning(parse_overrides(tag, overrides)?),
            "customer_segments" => ScenarioKind::CustomerSegments(parse_overrides(tag, overrides)?),
            "multi_channel" => ScenarioKind::MultiChannel(parse_overrides(tag, overrides)?),
            _ => return Err(ScenarioValidationError::UnknownScenario(tag.to_string())),
        };
        Ok(kind)
    }

    /// Per-kind behavior
    pub fn profile(&self) -> &dyn ScenarioProfile {
        match self {
            ScenarioKind::Baseline(o) => o,
            ScenarioKind::FlashSale(o) => o,
            ScenarioKind::ViralMoment(o) => o,
            ScenarioKind::PaymentOutage(o) => o,
            ScenarioKind::SupplyDisruption(o) => o,
            ScenarioKind::ReturnsWave(o) => o,
            ScenarioKind::SeasonalPlanning(o) => o,
            ScenarioKind::CustomerSegments(o) => o,
            ScenarioKind::MultiChannel(o) => o,
        }
    }

    /// Stable kind tag
    pub fn tag(&self) -> &'static str {
        self.profile().tag()
    }

    /// Override block as JSON
    pub fn overrides_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            ScenarioKind::Baseline(o) => serde_json::to_value(o),
            ScenarioKind::FlashSale(o) => serde_json::to_value(o),
            ScenarioKind::ViralMoment(o) => serde_json::to_value(o),
            ScenarioKind::PaymentOutage(o) => serde_json::to_value(o),
            ScenarioKind::SupplyDisruption(o) => serde_json::to_value(o),
            ScenarioKind::ReturnsWave(o) => serde_json::to_value(o),
            ScenarioKind::SeasonalPlanning(o) => serde_json::to_value(o),
            ScenarioKind::CustomerSegments(o) => serde_json::to_value(o),
            ScenarioKind::MultiChannel(o) => serde_json::to_value(o),
        }
    }

    /// Set the discount of discount-driven kinds; returns false when the kind has none
    pub fn apply_discount(&mut self, percent: f64) -> bool {
        match self {
            ScenarioKind::FlashSale(o) => {
                o.discount_percent = percent;
                true
            }
            ScenarioKind::SeasonalPlanning(o) => {
                o.discount_percent = percent;
                true
            }
            _ => false,
        }
    }

    /// Set the category of category-driven kinds; returns false when the kind has none
    pub fn apply_category(&mut self, category: Category) -> bool {
        match self {
            ScenarioKind::FlashSale(o) => {
                o.category = category;
                true
            }
            ScenarioKind::ViralMoment(o) => {
                o.category = category;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_tag_builds_with_defaults() {
        for tag in ScenarioKind::TAGS {
            let kind = ScenarioKind::from_tag(tag, None).unwrap();
            assert_eq!(kind.tag(), *tag);
            kind.profile().validate().unwrap();
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert_eq!(
            ScenarioKind::from_tag("black_friday", None),
            Err(ScenarioValidationError::UnknownScenario("black_friday".to_string()))
        );
    }

    #[test]
    fn test_unknown_override_key_is_rejected() {
        let err = ScenarioKind::from_tag("flash_sale", Some(&json!({ "discount": 40 }))).unwrap_err();
        assert!(matches!(err, ScenarioValidationError::InvalidOverrides { .. }));
    }

    #[test]
    fn test_partial_overrides_keep_defaults() {
        let kind =
            ScenarioKind::from_tag("flash_sale", Some(&json!({ "discount_percent": 40 }))).unwrap();
        match kind {
            ScenarioKind::FlashSale(o) => {
                assert_eq!(o.discount_percent, 40.0);
                assert_eq!(o.category, Category::Electronics);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_negative_discount_fails_validation() {
        let kind =
            ScenarioKind::from_tag("flash_sale", Some(&json!({ "discount_percent": -5 }))).unwrap();
        assert!(matches!(
            kind.profile().validate(),
            Err(ScenarioValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_outage_window_effects() {
        let outage = PaymentOutageOverrides::default();
        assert!(!outage.in_outage(0));
        assert!(outage.in_outage(1) && outage.in_outage(2));
        assert!(!outage.in_outage(3));
        assert_eq!(outage.payment_failure_rate(1), Some(0.7));
        assert_eq!(outage.abandonment_multiplier(2), 3.5);
        assert_eq!(outage.ticket_multiplier(5), 1.0);
        assert_eq!(outage.issue_mix(1), IssueMix::PaymentHeavy);
    }

    #[test]
    fn test_unknown_supplier_fails_validation() {
        let kind = ScenarioKind::from_tag(
            "supply_disruption",
            Some(&json!({ "supplier": "Atlantis Widgets" })),
        )
        .unwrap();
        assert!(matches!(
            kind.profile().validate(),
            Err(ScenarioValidationError::UnknownSupplier(_))
        ));
        let slug = ScenarioKind::from_tag("supply_disruption", Some(&json!({ "supplier": "china_main" })))
            .unwrap();
        slug.profile().validate().unwrap();
    }

    #[test]
    fn test_issue_mixes_sum_to_one() {
        for mix in [IssueMix::Standard, IssueMix::RefundHeavy, IssueMix::PaymentHeavy] {
            let total: f64 = mix.weights().iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_overrides_json_round_trip() {
        let kind = ScenarioKind::from_tag("multi_channel", None).unwrap();
        let json = kind.overrides_json().unwrap();
        assert_eq!(ScenarioKind::from_tag("multi_channel", Some(&json)).unwrap(), kind);
    }
}
