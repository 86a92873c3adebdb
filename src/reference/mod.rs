//! Reference populations: customers, suppliers, products and campaigns

pub mod generator;
pub mod records;
pub mod suppliers;

pub use generator::{ReferenceGenerator, FOCUS_CATEGORY_SHARE};
pub use records::{Campaign, Customer, Product, ReferenceData, Supplier};
pub use suppliers::{find_supplier, SupplierSpec, SUPPLIERS};
