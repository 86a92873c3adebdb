//! Carried run state: fractional order remainder and remaining inventory
//!
//! Both pieces of state are explicit values threaded through the hour loop.
//! For parallel runs the inventory is split into per-worker reservations and
//! reconciled after the workers finish.

use serde::{Deserialize, Serialize};

use crate::reference::Product;

/// Remaining units per product (`None` means unlimited)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLedger {
    remaining: Vec<Option<u32>>,
}

impl InventoryLedger {
    /// Ledger initialised from the products' inventory caps
    pub fn from_products(products: &[Product]) -> Self {
        Self { remaining: products.iter().map(|p| p.inventory_cap).collect() }
    }

    /// Remaining units of `product` (`None` means unlimited)
    pub fn remaining(&self, product: usize) -> Option<u32> {
        self.remaining.get(product).copied().flatten()
    }

    /// Whether `product` can still be sold
    pub fn in_stock(&self, product: usize) -> bool {
        match self.remaining.get(product) {
            Some(Some(units)) => *units > 0,
            Some(None) => true,
            None => false,
        }
    }

    /// Whether `product` has a cap
    pub fn is_capped(&self, product: usize) -> bool {
        matches!(self.remaining.get(product), Some(Some(_)))
    }

    /// Take up to `quantity` units; returns the units actually taken
    pub fn take(&mut self, product: usize, quantity: u32) -> u32 {
        match self.remaining.get_mut(product) {
            Some(Some(units)) => {
                let taken = quantity.min(*units);
                *units -= taken;
                taken
            }
            Some(None) => quantity,
            None => 0,
        }
    }

    /// Number of capped products
    pub fn capped_count(&self) -> usize {
        self.remaining.iter().filter(|r| r.is_some()).count()
    }

    /// Total units remaining across capped products
    pub fn capped_units(&self) -> u64 {
        self.remaining.iter().flatten().map(|&u| u as u64).sum()
    }

    /// Split into `workers` reservations; each gets an even share, the first
    /// workers absorb the remainder
    pub fn split(&self, workers: usize) -> Vec<InventoryLedger> {
        let workers = workers.max(1);
        (0..workers)
            .map(|worker| InventoryLedger {
                remaining: self
                    .remaining
                    .iter()
                    .map(|r| {
                        r.map(|units| {
                            let share = units / workers as u32;
                            let extra = u32::from((worker as u32) < units % workers as u32);
                            share + extra
                        })
                    })
                    .collect(),
            })
            .collect()
    }

    /// Fold worker reservations back in: subtract what each worker used
    pub fn reconcile(&mut self, reservations: &[InventoryLedger], leftovers: &[InventoryLedger]) {
        for (reserved, left) in reservations.iter().zip(leftovers) {
            for (product, slot) in self.remaining.iter_mut().enumerate() {
                if let Some(units) = slot {
                    let used = reserved.remaining(product).unwrap_or(0).saturating_sub(left.remaining(product).unwrap_or(0));
                    *units = units.saturating_sub(used);
                }
            }
        }
    }
}

/// Explicit state carried from hour to hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Fractional order count not yet emitted
    pub carry: f64,
    /// Remaining inventory
    pub inventory: InventoryLedger,
}

impl RunState {
    /// Fresh state for a catalogue
    pub fn new(products: &[Product]) -> Self {
        Self { carry: 0.0, inventory: InventoryLedger::from_products(products) }
    }

    /// Whole orders for an hour with expected volume `target`; the fractional
    /// part carries into the next hour
    pub fn next_count(&mut self, target: f64) -> usize {
        let wanted = target.max(0.0) + self.carry;
        let count = wanted.floor();
        self.carry = wanted - count;
        count as usize
    }
}
