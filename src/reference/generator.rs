//! Reference data generation
//!
//! Builds the customer population, the supplier roster, the product catalogue
//! and the scenario's campaigns. Each table draws from its own seeded stream.

use chrono::Duration;
use fake::faker::address::en::{CityName, StateName};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Beta, Exp, LogNormal};
use tracing::{debug, info, instrument, warn};

use crate::cohort::{CohortBehaviorModel, Distribution};
use crate::orders::mean_units_per_order;
use crate::reference::records::{Campaign, Customer, Product, ReferenceData, Supplier};
use crate::reference::suppliers::{find_supplier, SUPPLIERS};
use crate::scenario::ScenarioConfig;
use crate::simulation::rng::{RngBank, StreamSlot};
use crate::simulation::{GenerationError, GenerationResult};
use crate::types::{
    CampaignId, Category, CustomerId, LoyaltyTier, Money, ProductId, SeasonalPattern, SupplierId,
};

/// Share of the catalogue taken by a focus category
pub const FOCUS_CATEGORY_SHARE: f64 = 0.6;

const SIGNUP_WINDOW_DAYS: i64 = 730;

/// Log-space mean and deviation of historical lifetime value
const LIFETIME_VALUE: (f64, f64) = (4.0, 1.0);

/// Mean shipping weight of a product in kilograms
const MEAN_WEIGHT_KG: f64 = 2.0;

const CATEGORY_WEIGHTS: &[(Category, f64)] = &[
    (Category::Electronics, 0.25),
    (Category::Clothing, 0.25),
    (Category::Home, 0.20),
    (Category::Beauty, 0.15),
    (Category::Books, 0.15),
];

const LOYALTY_WEIGHTS: &[(LoyaltyTier, f64)] = &[
    (LoyaltyTier::Bronze, 0.50),
    (LoyaltyTier::Silver, 0.30),
    (LoyaltyTier::Gold, 0.15),
    (LoyaltyTier::Platinum, 0.05),
];

const COLOURS: &[&str] = &[
    "Black", "White", "Silver", "Navy", "Crimson", "Olive", "Teal", "Coral", "Ivory", "Plum", "Amber", "Slate",
];

/// Log-normal price distribution for a category
fn price_distribution(category: Category) -> GenerationResult<LogNormal<f64>> {
    let (mu, sigma) = match category {
        Category::Electronics => (5.5, 0.8),
        Category::Clothing => (3.5, 0.6),
        _ => (4.0, 0.7),
    };
    LogNormal::new(mu, sigma)
        .map_err(|e| GenerationError::reference_data(format!("{} prices: {}", category, e)))
}

fn title_case(label: &str) -> String {
    label
        .split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generator for the reference tables of one run
#[derive(Debug)]
pub struct ReferenceGenerator<'a> {
    config: &'a ScenarioConfig,
    cohorts: &'a CohortBehaviorModel,
    bank: RngBank,
}

impl<'a> ReferenceGenerator<'a> {
    /// Create a generator for `config`
    pub fn new(config: &'a ScenarioConfig, cohorts: &'a CohortBehaviorModel, bank: RngBank) -> Self {
        Self { config, cohorts, bank }
    }

    /// Generate every reference table
    #[instrument(skip(self), fields(scenario = %self.config.name()))]
    pub fn generate(&self) -> GenerationResult<ReferenceData> {
        let customers = self.generate_customers()?;
        let suppliers = self.generate_suppliers();
        let products = self.generate_products(&suppliers)?;
        let campaigns = self.generate_campaigns();

        info!(
            "Generated reference data: {} customers, {} suppliers, {} products, {} campaigns",
            customers.len(),
            suppliers.len(),
            products.len(),
            campaigns.len()
        );

        Ok(ReferenceData { customers, suppliers, products, campaigns })
    }

    /// Generate the customer population
    pub fn generate_customers(&self) -> GenerationResult<Vec<Customer>> {
        let mut rng = self.bank.stream(StreamSlot::Customers);
        let loyalty = Distribution::new(LOYALTY_WEIGHTS)
            .map_err(|e| GenerationError::reference_data(format!("loyalty tiers: {}", e)))?;
        let lifetime_value = LogNormal::new(LIFETIME_VALUE.0, LIFETIME_VALUE.1)
            .map_err(|e| GenerationError::reference_data(format!("lifetime value: {}", e)))?;
        let start = self.config.start();
        let count = self.config.volume().customers;

        let mut customers = Vec::with_capacity(count);
        for _ in 0..count {
            let cohort = self.cohorts.population().sample(&mut rng);
            let profile = self.cohorts.profile(cohort);
            let (alpha, beta) = profile.price_sensitivity;
            let sensitivity = Beta::new(f64::from(alpha), f64::from(beta))
                .map_err(|e| GenerationError::reference_data(format!("{} price sensitivity: {}", cohort, e)))?;
            let signup_offset = rng.gen_range(1..=SIGNUP_WINDOW_DAYS * 86_400);

            customers.push(Customer {
                customer_id: CustomerId::from_rng(&mut rng),
                name: Name().fake_with_rng(&mut rng),
                email: SafeEmail().fake_with_rng(&mut rng),
                phone: PhoneNumber().fake_with_rng(&mut rng),
                city: CityName().fake_with_rng(&mut rng),
                state: StateName().fake_with_rng(&mut rng),
                signup_ts: start - Duration::seconds(signup_offset),
                cohort,
                acquisition_channel: profile.acquisition.sample(&mut rng),
                preferred_channel: profile.shopping.sample(&mut rng),
                preferred_payment: profile.payment.sample(&mut rng),
                preferred_support: profile.support.sample(&mut rng),
                loyalty_tier: loyalty.sample(&mut rng),
                lifetime_value: Money::from_amount(rng.sample(lifetime_value)),
                price_sensitivity: rng.sample(sensitivity),
            });
        }

        debug!("Generated {} customers", customers.len());
        Ok(customers)
    }

    /// Generate the fixed supplier roster
    pub fn generate_suppliers(&self) -> Vec<Supplier> {
        let mut rng = self.bank.stream(StreamSlot::Suppliers);
        SUPPLIERS
            .iter()
            .map(|profile| Supplier {
                supplier_id: SupplierId::from_rng(&mut rng),
                name: profile.name.to_string(),
                country: profile.country.to_string(),
                lead_time_days: profile.lead_time_days,
                reliability_score: profile.reliability,
                is_primary: profile.is_primary,
                backup_capacity: profile.backup_capacity,
            })
            .collect()
    }

    /// Generate the product catalogue, including featured and supply-capped products
    pub fn generate_products(&self, suppliers: &[Supplier]) -> GenerationResult<Vec<Product>> {
        if suppliers.is_empty() {
            return Err(GenerationError::reference_data("cannot build a catalogue without suppliers"));
        }

        let mut rng = self.bank.stream(StreamSlot::Products);
        let categories = Distribution::new(CATEGORY_WEIGHTS)
            .map_err(|e| GenerationError::reference_data(format!("category weights: {}", e)))?;
        let weight = Exp::new(1.0 / MEAN_WEIGHT_KG)
            .map_err(|e| GenerationError::reference_data(format!("product weight: {}", e)))?;
        let focus = self.config.focus_category();
        let count = self.config.volume().product_count;

        let mut products = Vec::with_capacity(count);
        for index in 0..count {
            let category = match focus {
                Some(category) if rng.gen_bool(FOCUS_CATEGORY_SHARE) => category,
                _ => categories.sample(&mut rng),
            };
            products.push(self.catalogue_product(&mut rng, index, category, suppliers, &weight)?);
        }

        if let Some(featured) = self.config.profile().featured_product() {
            // the featured product replaces the first catalogue slot
            if let Some(slot) = products.first_mut() {
                let subcategory = featured
                    .category
                    .subcategories()
                    .first()
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                slot.name = title_case(&featured.name);
                slot.category = featured.category;
                slot.subcategory = subcategory;
                slot.sku = format!("{}{:06}", featured.category.sku_prefix(), 0);
                slot.seasonality_pattern = featured.category.seasonality();
                slot.is_seasonal = slot.seasonality_pattern != SeasonalPattern::None;
                slot.inventory_cap = Some(featured.inventory);
                slot.featured = true;
                info!("Featured product '{}' capped at {} units", slot.name, featured.inventory);
            }
        }

        self.apply_supply_constraint(&mut products, suppliers)?;

        debug!("Generated {} products", products.len());
        Ok(products)
    }

    fn catalogue_product<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        index: usize,
        category: Category,
        suppliers: &[Supplier],
        weight: &Exp<f64>,
    ) -> GenerationResult<Product> {
        let subcategory = category.subcategories().choose(rng).copied().unwrap_or("general");
        let price = Money::from_amount(rng.sample(price_distribution(category)?)).max(Money::from_cents(99));
        let cost = price.scale(rng.gen_range(0.3..0.7));
        let colour = COLOURS.choose(rng).copied().unwrap_or("Black");
        let word: String = Word().fake_with_rng(rng);
        let supplier_index = rng.gen_range(0..suppliers.len());
        let seasonality = category.seasonality();
        // at least 10 g, two decimals
        let weight_kg = (rng.sample(weight).max(0.01) * 100.0).round() / 100.0;

        Ok(Product {
            product_id: ProductId::from_rng(rng),
            sku: format!("{}{:06}", category.sku_prefix(), index),
            name: format!("{} {} {}", title_case(subcategory), colour, title_case(&word)),
            category,
            subcategory: subcategory.to_string(),
            brand: CompanyName().fake_with_rng(rng),
            price,
            cost,
            weight_kg,
            is_seasonal: seasonality != SeasonalPattern::None,
            seasonality_pattern: seasonality,
            supplier_id: suppliers[supplier_index].supplier_id,
            inventory_cap: None,
            featured: false,
        })
    }

    /// Cap the first affected SKUs of a disrupted supplier
    fn apply_supply_constraint(&self, products: &mut [Product], suppliers: &[Supplier]) -> GenerationResult<()> {
        let total_hours = self.config.total_hours();
        let Some(constraint) = self.config.profile().supply_constraint(total_hours) else {
            return Ok(());
        };
        let (supplier_index, _) = find_supplier(&constraint.supplier).ok_or_else(|| {
            GenerationError::reference_data(format!("unknown supplier '{}'", constraint.supplier))
        })?;
        let supplier_id = suppliers
            .get(supplier_index)
            .map(|s| s.supplier_id)
            .ok_or_else(|| GenerationError::reference_data("supplier roster is incomplete"))?;

        // units each product would sell over the run without the disruption
        let expected_orders = self.config.volume().hourly_rate() * self.config.intensity() * total_hours as f64;
        let units_per_product = expected_orders * mean_units_per_order() / products.len().max(1) as f64;
        let window_hours = constraint.window.end.min(total_hours).saturating_sub(constraint.window.start);
        let unaffected_hours = total_hours.saturating_sub(window_hours);
        let supply_share = if total_hours == 0 {
            1.0
        } else {
            (unaffected_hours as f64 + window_hours as f64 * constraint.capacity_factor) / total_hours as f64
        };
        let cap = (units_per_product * supply_share).ceil().max(1.0) as u32;

        let mut capped = 0;
        for product in products.iter_mut().filter(|p| p.supplier_id == supplier_id && !p.featured) {
            if capped == constraint.affected_skus {
                break;
            }
            product.inventory_cap = Some(cap);
            capped += 1;
        }

        if capped < constraint.affected_skus {
            warn!(
                "Supplier '{}' supplies only {} products; {} SKUs requested",
                constraint.supplier, capped, constraint.affected_skus
            );
        }
        info!("Capped {} SKUs of '{}' at {} units each", capped, constraint.supplier, cap);
        Ok(())
    }

    /// Generate the scenario's campaigns
    pub fn generate_campaigns(&self) -> Vec<Campaign> {
        let mut rng = self.bank.stream(StreamSlot::Campaigns);
        let start = self.config.start();
        self.config
            .profile()
            .campaign(self.config.total_hours())
            .map(|plan| Campaign {
                campaign_id: CampaignId::from_rng(&mut rng),
                name: plan.name,
                campaign_type: plan.campaign_type,
                scenario: self.config.name().to_string(),
                start_ts: start,
                end_ts: start + Duration::hours(plan.active_hours as i64),
                discount_rate: plan.discount_rate,
                target_categories: plan.categories,
            })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioBuilder;
    use chrono::{TimeZone, Utc};

    fn config(preset: &str) -> ScenarioConfig {
        ScenarioBuilder::preset(preset)
            .unwrap()
            .customers(500)
            .product_count(300)
            .start(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
            .seed(42)
            .build()
            .unwrap()
    }

    fn generate(config: &ScenarioConfig) -> ReferenceData {
        let cohorts = CohortBehaviorModel::adjusted(&config.profile().cohort_adjustment()).unwrap();
        ReferenceGenerator::new(config, &cohorts, RngBank::new(config.seed())).generate().unwrap()
    }

    #[test]
    fn test_customers_sign_up_before_start() {
        let config = config("baseline");
        let data = generate(&config);
        assert_eq!(data.customers.len(), 500);
        let earliest = config.start() - Duration::days(SIGNUP_WINDOW_DAYS);
        for customer in &data.customers {
            assert!(customer.signup_ts < config.start());
            assert!(customer.signup_ts >= earliest);
            assert!((0.0..=1.0).contains(&customer.price_sensitivity));
        }
    }

    #[test]
    fn test_customer_contact_details_and_sensitivity() {
        let config = config("baseline");
        let cohorts = CohortBehaviorModel::adjusted(&config.profile().cohort_adjustment()).unwrap();
        let data = generate(&config);
        for customer in &data.customers {
            assert!(!customer.name.is_empty());
            assert!(customer.email.contains('@'));
            assert!(!customer.phone.is_empty() && !customer.city.is_empty() && !customer.state.is_empty());
        }

        for cohort in crate::types::Cohort::ALL {
            let draws: Vec<f64> =
                data.customers.iter().filter(|c| c.cohort == *cohort).map(|c| c.price_sensitivity).collect();
            if draws.len() < 50 {
                continue;
            }
            let (alpha, beta) = cohorts.profile(*cohort).price_sensitivity;
            let expected = f64::from(alpha) / f64::from(alpha + beta);
            let mean = draws.iter().sum::<f64>() / draws.len() as f64;
            assert!((mean - expected).abs() < 0.06, "{}: mean {} expected {}", cohort, mean, expected);
        }
    }

    #[test]
    fn test_products_have_brand_and_weight() {
        let config = config("baseline");
        let data = generate(&config);
        for product in &data.products {
            assert!(!product.brand.is_empty());
            assert!(product.weight_kg >= 0.01);
            assert!(product.name.starts_with(&title_case(&product.subcategory)));
        }
        let mean = data.products.iter().map(|p| p.weight_kg).sum::<f64>() / data.products.len() as f64;
        assert!((mean - MEAN_WEIGHT_KG).abs() < 0.5, "mean weight {}", mean);
    }

    #[test]
    fn test_products_reference_suppliers() {
        let config = config("baseline");
        let data = generate(&config);
        assert_eq!(data.suppliers.len(), SUPPLIERS.len());
        for product in &data.products {
            assert!(data.suppliers.iter().any(|s| s.supplier_id == product.supplier_id));
            assert!(product.cost < product.price);
            assert!(product.sku.starts_with(product.category.sku_prefix()));
            assert!(product.inventory_cap.is_none());
        }
        assert!(data.campaigns.is_empty());
    }

    #[test]
    fn test_flash_sale_focuses_catalogue() {
        let config = config("flash_sale");
        let data = generate(&config);
        let electronics = data.products.iter().filter(|p| p.category == Category::Electronics).count();
        // 60% focus share plus a quarter of the remainder
        assert!(electronics as f64 / data.products.len() as f64 > 0.55);
        assert_eq!(data.campaigns.len(), 1);
        assert_eq!(data.campaigns[0].discount_rate, 0.7);
        assert_eq!(data.campaigns[0].end_ts, config.end());
    }

    #[test]
    fn test_viral_moment_features_capped_product() {
        let config = config("viral_moment");
        let data = generate(&config);
        let featured: Vec<_> = data.products.iter().filter(|p| p.featured).collect();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].inventory_cap, Some(500));
        assert_eq!(featured[0].category, Category::Beauty);
    }

    #[test]
    fn test_supply_disruption_caps_supplier_skus() {
        let config = config("supply_disruption");
        let data = generate(&config);
        let china = data.suppliers[0].supplier_id;
        let capped: Vec<_> = data.products.iter().filter(|p| p.inventory_cap.is_some()).collect();
        assert!(!capped.is_empty() && capped.len() <= 35);
        assert!(capped.iter().all(|p| p.supplier_id == china));
    }

    #[test]
    fn test_same_seed_same_reference_data() {
        let config = config("seasonal_planning");
        let a = generate(&config);
        let b = generate(&config);
        assert_eq!(a.customers, b.customers);
        assert_eq!(a.products, b.products);
        assert_eq!(a.campaigns, b.campaigns);
    }
}
