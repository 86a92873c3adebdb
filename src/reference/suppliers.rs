//! Fixed supplier roster

/// Static description of one supplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupplierSpec {
    /// Supplier name
    pub name: &'static str,
    /// Country of origin
    pub country: &'static str,
    /// Typical lead time in days
    pub lead_time_days: u32,
    /// On-time delivery reliability
    pub reliability: f64,
    /// Whether this is a primary supplier
    pub is_primary: bool,
    /// Share of capacity available as backup
    pub backup_capacity: f64,
}

impl SupplierSpec {
    /// Lower-case, underscore-separated form of the name
    pub fn slug(&self) -> String {
        self.name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
    }
}

/// Every supplier in catalogue order
pub const SUPPLIERS: &[SupplierSpec] = &[
    SupplierSpec {
        name: "China Main Electronics",
        country: "China",
        lead_time_days: 14,
        reliability: 0.85,
        is_primary: true,
        backup_capacity: 0.30,
    },
    SupplierSpec {
        name: "India Textiles Co",
        country: "India",
        lead_time_days: 10,
        reliability: 0.92,
        is_primary: true,
        backup_capacity: 0.45,
    },
    SupplierSpec {
        name: "USA Local Supply",
        country: "USA",
        lead_time_days: 3,
        reliability: 0.98,
        is_primary: false,
        backup_capacity: 0.80,
    },
    SupplierSpec {
        name: "Vietnam Manufacturing",
        country: "Vietnam",
        lead_time_days: 12,
        reliability: 0.88,
        is_primary: false,
        backup_capacity: 0.50,
    },
    SupplierSpec {
        name: "Bangladesh Apparel",
        country: "Bangladesh",
        lead_time_days: 16,
        reliability: 0.82,
        is_primary: false,
        backup_capacity: 0.35,
    },
    SupplierSpec {
        name: "Mexico Backup",
        country: "Mexico",
        lead_time_days: 7,
        reliability: 0.90,
        is_primary: false,
        backup_capacity: 0.90,
    },
    SupplierSpec {
        name: "Germany Premium",
        country: "Germany",
        lead_time_days: 8,
        reliability: 0.96,
        is_primary: false,
        backup_capacity: 0.60,
    },
    SupplierSpec {
        name: "Taiwan Tech",
        country: "Taiwan",
        lead_time_days: 11,
        reliability: 0.89,
        is_primary: false,
        backup_capacity: 0.55,
    },
];

/// Look up a supplier by full name or by slug prefix (`china_main`), case-insensitively
pub fn find_supplier(name: &str) -> Option<(usize, &'static SupplierSpec)> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    let wanted_slug = wanted.split_whitespace().collect::<Vec<_>>().join("_");
    SUPPLIERS
        .iter()
        .enumerate()
        .find(|(_, s)| s.name.to_lowercase() == wanted)
        .or_else(|| SUPPLIERS.iter().enumerate().find(|(_, s)| s.slug().starts_with(&wanted_slug)))
}
