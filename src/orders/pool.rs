//! Eligible product pool with hard inventory exclusion

use rand::Rng;
use tracing::{debug, warn};

use crate::orders::state::InventoryLedger;
use crate::reference::Product;
use crate::types::Category;

/// Products orders may draw from
///
/// Products whose inventory runs out are removed and never drawn again. When
/// the scenario's category filter leaves nothing in stock the pool falls back
/// to every uncapped product.
#[derive(Debug, Clone)]
pub struct ProductPool {
    eligible: Vec<usize>,
    position: Vec<Option<usize>>,
    fallback: Vec<usize>,
    featured: Option<(usize, f64)>,
    using_fallback: bool,
}

impl ProductPool {
    /// Pool over `products` restricted to `categories` (empty means all)
    pub fn new(products: &[Product], categories: &[Category], inventory: &InventoryLedger) -> Self {
        let matches = |p: &Product| categories.is_empty() || categories.contains(&p.category);
        let eligible: Vec<usize> = products
            .iter()
            .enumerate()
            .filter(|(i, p)| matches(p) && !p.featured && inventory.in_stock(*i))
            .map(|(i, _)| i)
            .collect();
        let fallback = products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.inventory_cap.is_none())
            .map(|(i, _)| i)
            .collect();

        let mut pool = Self {
            position: vec![None; products.len()],
            eligible: Vec::new(),
            fallback,
            featured: None,
            using_fallback: false,
        };
        pool.reset(eligible);
        pool
    }

    /// Give the featured product `index` a fixed share of draws while it is in stock
    pub fn with_featured(mut self, index: usize, demand_share: f64, inventory: &InventoryLedger) -> Self {
        if inventory.in_stock(index) {
            self.featured = Some((index, demand_share.clamp(0.0, 1.0)));
        }
        self
    }

    fn reset(&mut self, eligible: Vec<usize>) {
        self.position.iter_mut().for_each(|p| *p = None);
        for (slot, &product) in eligible.iter().enumerate() {
            if let Some(position) = self.position.get_mut(product) {
                *position = Some(slot);
            }
        }
        self.eligible = eligible;
    }

    /// Number of products currently drawable (featured product excluded)
    pub fn len(&self) -> usize {
        self.eligible.len()
    }

    /// Whether nothing can be drawn
    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty() && self.featured.is_none()
    }

    /// Draw a product index, or `None` when nothing is left in stock
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if let Some((index, share)) = self.featured {
            if rng.gen_bool(share) {
                return Some(index);
            }
        }
        if self.eligible.is_empty() {
            self.switch_to_fallback();
        }
        if self.eligible.is_empty() {
            return self.featured.map(|(index, _)| index);
        }
        let slot = rng.gen_range(0..self.eligible.len());
        Some(self.eligible[slot])
    }

    /// Remove a sold-out product from every future draw
    pub fn exclude(&mut self, product: usize) {
        if matches!(self.featured, Some((index, _)) if index == product) {
            debug!("Featured product {} sold out", product);
            self.featured = None;
            return;
        }
        let Some(slot) = self.position.get_mut(product).and_then(Option::take) else {
            return;
        };
        self.eligible.swap_remove(slot);
        if let Some(&moved) = self.eligible.get(slot) {
            if let Some(position) = self.position.get_mut(moved) {
                *position = Some(slot);
            }
        }
    }

    fn switch_to_fallback(&mut self) {
        if self.using_fallback {
            return;
        }
        warn!("Eligible products sold out; falling back to {} uncapped products", self.fallback.len());
        self.using_fallback = true;
        let fallback = std::mem::take(&mut self.fallback);
        self.reset(fallback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Money, ProductId, SeasonalPattern, SupplierId};
    use rand::SeedableRng;
    use uuid::Uuid;

    fn product(category: Category, cap: Option<u32>, featured: bool) -> Product {
        Product {
            product_id: ProductId(Uuid::nil()),
            sku: "EL000000".to_string(),
            name: "Test".to_string(),
            category,
            subcategory: "test".to_string(),
            brand: "Acme".to_string(),
            price: Money::from_cents(1000),
            cost: Money::from_cents(500),
            weight_kg: 1.0,
            is_seasonal: false,
            seasonality_pattern: SeasonalPattern::None,
            supplier_id: SupplierId(Uuid::nil()),
            inventory_cap: cap,
            featured,
        }
    }

    #[test]
    fn test_pool_respects_categories() {
        let products = vec![
            product(Category::Electronics, None, false),
            product(Category::Books, None, false),
            product(Category::Electronics, None, false),
        ];
        let inventory = InventoryLedger::from_products(&products);
        let mut pool = ProductPool::new(&products, &[Category::Electronics], &inventory);
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let drawn = pool.draw(&mut rng).unwrap();
            assert_ne!(drawn, 1);
        }
    }

    #[test]
    fn test_excluded_products_are_never_drawn() {
        let products = vec![
            product(Category::Beauty, Some(1), false),
            product(Category::Beauty, None, false),
            product(Category::Beauty, None, false),
        ];
        let inventory = InventoryLedger::from_products(&products);
        let mut pool = ProductPool::new(&products, &[], &inventory);
        pool.exclude(0);
        assert_eq!(pool.len(), 2);
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        for _ in 0..100 {
            assert_ne!(pool.draw(&mut rng), Some(0));
        }
    }

    #[test]
    fn test_fallback_when_category_sold_out() {
        let products = vec![product(Category::Beauty, Some(1), false), product(Category::Home, None, false)];
        let inventory = InventoryLedger::from_products(&products);
        let mut pool = ProductPool::new(&products, &[Category::Beauty], &inventory);
        pool.exclude(0);
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        assert_eq!(pool.draw(&mut rng), Some(1));
    }

    #[test]
    fn test_featured_product_share() {
        let products = vec![product(Category::Beauty, Some(500), true), product(Category::Beauty, None, false)];
        let inventory = InventoryLedger::from_products(&products);
        let mut pool = ProductPool::new(&products, &[Category::Beauty], &inventory).with_featured(0, 0.5, &inventory);
        let mut rng = rand::rngs::StdRng::seed_from_u64(4);
        let featured = (0..1000).filter(|_| pool.draw(&mut rng) == Some(0)).count();
        assert!((400..600).contains(&featured));
        pool.exclude(0);
        assert!((0..100).all(|_| pool.draw(&mut rng) == Some(1)));
    }
}
