//! Reference records created once per run
//!
//! Customers, suppliers, products and campaigns are generated before any
//! event and never change afterwards. Event generators refer to them by index
//! during generation and by identifier in the output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{
    AcquisitionChannel, CampaignId, CampaignType, Category, Cohort, CustomerId, LoyaltyTier, Money,
    PaymentMethod, ProductId, SeasonalPattern, ShoppingChannel, SupplierId, SupportChannel,
};

/// A customer and the preferences drawn for its cohort
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    /// Unique identifier
    pub customer_id: CustomerId,
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Home city
    pub city: String,
    /// Home state
    pub state: String,
    /// Account creation time (before the scenario starts)
    pub signup_ts: DateTime<Utc>,
    /// Generational cohort
    pub cohort: Cohort,
    /// How the customer was acquired
    pub acquisition_channel: AcquisitionChannel,
    /// Usual shopping channel
    pub preferred_channel: ShoppingChannel,
    /// Usual payment method
    pub preferred_payment: PaymentMethod,
    /// Usual support contact channel
    pub preferred_support: SupportChannel,
    /// Loyalty tier
    pub loyalty_tier: LoyaltyTier,
    /// Historical lifetime value
    pub lifetime_value: Money,
    /// Price sensitivity in [0, 1]
    pub price_sensitivity: f64,
}

/// A supplier of catalogue products
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Supplier {
    /// Unique identifier
    pub supplier_id: SupplierId,
    /// Supplier name
    pub name: String,
    /// Country of origin
    pub country: String,
    /// Typical lead time in days
    pub lead_time_days: u32,
    /// On-time delivery reliability in [0, 1]
    pub reliability_score: f64,
    /// Whether this is a primary supplier
    pub is_primary: bool,
    /// Share of capacity available as backup for other suppliers
    pub backup_capacity: f64,
}

/// A catalogue product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    /// Unique identifier
    pub product_id: ProductId,
    /// Stock keeping unit, category prefix plus catalogue index
    pub sku: String,
    /// Display name
    pub name: String,
    /// Top-level category
    pub category: Category,
    /// Subcategory within the category
    pub subcategory: String,
    /// Brand the product is sold under
    pub brand: String,
    /// List price
    pub price: Money,
    /// Unit cost
    pub cost: Money,
    /// Shipping weight in kilograms
    pub weight_kg: f64,
    /// Whether demand follows a seasonal pattern
    pub is_seasonal: bool,
    /// Seasonal pattern of the category
    pub seasonality_pattern: SeasonalPattern,
    /// Supplying company
    pub supplier_id: SupplierId,
    /// Units available for the whole run, when constrained
    pub inventory_cap: Option<u32>,
    /// Whether the product is the scenario's featured product
    pub featured: bool,
}

/// A marketing campaign tied to the scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campaign {
    /// Unique identifier
    pub campaign_id: CampaignId,
    /// Display name
    pub name: String,
    /// Campaign type
    pub campaign_type: CampaignType,
    /// Scenario the campaign belongs to
    pub scenario: String,
    /// Campaign start
    pub start_ts: DateTime<Utc>,
    /// Campaign end (exclusive)
    pub end_ts: DateTime<Utc>,
    /// Discount rate in [0, 1]
    pub discount_rate: f64,
    /// Categories the campaign applies to
    pub target_categories: Vec<Category>,
}

impl Campaign {
    /// Whether the campaign is running at `ts`
    pub fn is_active(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start_ts && ts < self.end_ts
    }

    /// Whether products of `category` qualify for the campaign
    pub fn applies_to(&self, category: Category) -> bool {
        self.target_categories.contains(&category)
    }
}

/// All reference tables of one run
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// Customers
    pub customers: Vec<Customer>,
    /// Suppliers
    pub suppliers: Vec<Supplier>,
    /// Products
    pub products: Vec<Product>,
    /// Campaigns
    pub campaigns: Vec<Campaign>,
}

impl ReferenceData {
    /// Whether there is anything to place orders against
    pub fn can_place_orders(&self) -> bool {
        !self.customers.is_empty() && !self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;

    #[test]
    fn test_campaign_window_is_end_exclusive() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let start = Utc.with_ymd_and_hms(2024, 11, 29, 0, 0, 0).unwrap();
        let campaign = Campaign {
            campaign_id: CampaignId::from_rng(&mut rng),
            name: "Flash Sale Electronics 70% Off".to_string(),
            campaign_type: CampaignType::FlashSale,
            scenario: "flash_sale".to_string(),
            start_ts: start,
            end_ts: start + Duration::hours(4),
            discount_rate: 0.7,
            target_categories: vec![Category::Electronics],
        };
        assert!(campaign.is_active(start));
        assert!(campaign.is_active(start + Duration::minutes(239)));
        assert!(!campaign.is_active(start + Duration::hours(4)));
        assert!(campaign.applies_to(Category::Electronics));
        assert!(!campaign.applies_to(Category::Books));
    }
}
