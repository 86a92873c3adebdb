//! Enumeration types for the e-commerce generator
//!
//! This module contains the closed vocabularies used in generated records:
//! customer cohorts, product categories, channels, payment and fulfilment
//! states, support and return reasons, table names and output formats.
//!
//! Every enum serializes as its stable `snake_case` label, which is also what
//! `Display` prints and what `FromStr` accepts (case-insensitively).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// All variants in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable label used in output columns
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($label => Ok($name::$variant),)+
                    _ => Err(format!("Unknown {}: {}", $what, s)),
                }
            }
        }
    };
}

labelled_enum!(
    /// Generational customer cohort
    Cohort, "cohort" {
        /// Youngest cohort, mobile-first
        GenZ => "gen_z",
        /// Largest cohort
        Millennial => "millennial",
        /// Mixed web and mobile
        GenX => "gen_x",
        /// Oldest cohort, web and phone oriented
        Boomer => "boomer",
    }
);

labelled_enum!(
    /// Top-level product category
    Category, "category" {
        /// Phones, laptops and accessories
        Electronics => "electronics",
        /// Apparel and shoes
        Clothing => "clothing",
        /// Furniture, kitchen and garden
        Home => "home",
        /// Skincare, makeup and fragrance
        Beauty => "beauty",
        /// Printed and technical books
        Books => "books",
    }
);

impl Category {
    /// Subcategories offered within this category
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            Category::Electronics => &["smartphones", "laptops", "headphones", "tablets", "smart_watches"],
            Category::Clothing => &["shirts", "pants", "dresses", "shoes", "accessories"],
            Category::Home => &["furniture", "kitchen", "decor", "garden", "storage"],
            Category::Beauty => &["skincare", "makeup", "haircare", "fragrances", "tools"],
            Category::Books => &["fiction", "non_fiction", "textbooks", "children", "technical"],
        }
    }

    /// Two-letter SKU prefix
    pub fn sku_prefix(&self) -> &'static str {
        match self {
            Category::Electronics => "EL",
            Category::Clothing => "CL",
            Category::Home => "HO",
            Category::Beauty => "BE",
            Category::Books => "BO",
        }
    }

    /// Seasonal demand pattern attached to products of this category
    pub fn seasonality(&self) -> SeasonalPattern {
        match self {
            Category::Electronics => SeasonalPattern::Holiday,
            Category::Home => SeasonalPattern::Summer,
            Category::Books => SeasonalPattern::BackToSchool,
            Category::Clothing | Category::Beauty => SeasonalPattern::None,
        }
    }
}

labelled_enum!(
    /// Seasonal demand pattern of a product
    SeasonalPattern, "seasonal pattern" {
        /// No seasonality
        None => "none",
        /// Year-end holiday peak
        Holiday => "holiday",
        /// Summer peak
        Summer => "summer",
        /// August/September peak
        BackToSchool => "back_to_school",
    }
);

labelled_enum!(
    /// How a customer was first acquired
    AcquisitionChannel, "acquisition channel" {
        /// Unpaid search and discovery
        Organic => "organic",
        /// Paid social advertising
        PaidSocial => "paid_social",
        /// Creator partnerships
        Influencer => "influencer",
        /// Referred by another customer
        Referral => "referral",
        /// Typed the address directly
        Direct => "direct",
    }
);

labelled_enum!(
    /// Channel through which orders are placed
    ShoppingChannel, "shopping channel" {
        /// Desktop website
        Web => "web",
        /// Mobile browser
        MobileWeb => "mobile_web",
        /// Native mobile application
        MobileApp => "mobile_app",
    }
);

labelled_enum!(
    /// Payment method used for an order
    PaymentMethod, "payment method" {
        /// Credit or debit card
        Card => "card",
        /// Buy now, pay later
        Bnpl => "bnpl",
        /// Instant bank transfer
        Upi => "upi",
        /// Cash on delivery
        Cod => "cod",
    }
);

labelled_enum!(
    /// Payment authorisation result
    PaymentStatus, "payment status" {
        /// Authorised
        Success => "success",
        /// Declined or unavailable
        Failed => "failed",
    }
);

labelled_enum!(
    /// Reason a payment failed
    PaymentFailureReason, "payment failure reason" {
        /// Declined for lack of funds
        InsufficientFunds => "insufficient_funds",
        /// Card no longer valid
        ExpiredCard => "expired_card",
        /// Payment gateway unavailable
        GatewayDown => "gateway_down",
    }
);

labelled_enum!(
    /// Fulfilment state of an order at the end of the scenario window
    OrderStatus, "order status" {
        /// Paid, not yet shipped
        Processing => "processing",
        /// Handed to the carrier
        Shipped => "shipped",
        /// Received by the customer
        Delivered => "delivered",
        /// Cancelled before fulfilment
        Cancelled => "cancelled",
    }
);

labelled_enum!(
    /// Contact channel for customer support
    SupportChannel, "support channel" {
        /// Email
        Email => "email",
        /// Telephone
        Phone => "phone",
        /// Website or in-app chat
        Chat => "chat",
        /// WhatsApp messaging
        Whatsapp => "whatsapp",
        /// Public social media
        SocialMedia => "social_media",
    }
);

labelled_enum!(
    /// Top-level reason for a support ticket
    IssueCategory, "issue category" {
        /// Late, missing or damaged shipments
        Delivery => "delivery",
        /// Product defects and mismatches
        Product => "product",
        /// Refund and return handling
        Refund => "refund",
        /// Payment failures and billing
        Payment => "payment",
        /// Site or app problems
        Technical => "technical",
        /// Everything else
        Other => "other",
    }
);

impl IssueCategory {
    /// Subcategories recorded for this issue category
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            IssueCategory::Delivery => &["delayed_delivery", "missing_package", "damaged_in_shipping", "wrong_address"],
            IssueCategory::Product => &["defective", "wrong_item", "not_as_described", "quality_issue"],
            IssueCategory::Refund => &["refund_delay", "refund_amount", "return_process", "exchange"],
            IssueCategory::Payment => &["payment_failed", "double_charge", "refund_issue", "billing"],
            IssueCategory::Technical => &["app_crash", "website_slow", "login_issue", "checkout_error"],
            IssueCategory::Other => &["general_inquiry", "account_help", "policy_question", "complaint"],
        }
    }
}

labelled_enum!(
    /// Ticket severity
    Severity, "severity" {
        /// Informational
        Low => "low",
        /// Customer impacted
        Medium => "medium",
        /// Urgent
        High => "high",
    }
);

impl Severity {
    /// Resolution target in hours
    pub fn sla_target_hours(&self) -> f64 {
        match self {
            Severity::Low => 24.0,
            Severity::Medium => 8.0,
            Severity::High => 2.0,
        }
    }
}

labelled_enum!(
    /// Who handled a support ticket
    AgentType, "agent type" {
        /// Human agent
        Human => "human",
        /// Automated assistant
        Chatbot => "chatbot",
    }
);

labelled_enum!(
    /// Funnel stage at which a cart was abandoned
    AbandonStage, "abandon stage" {
        /// Items in cart, checkout not started
        Cart => "cart",
        /// Checkout form
        Checkout => "checkout",
        /// Payment step
        Payment => "payment",
    }
);

labelled_enum!(
    /// Stated or inferred reason for abandoning a cart
    AbandonReason, "abandon reason" {
        /// Shipping cost too high
        HighShipping => "high_shipping",
        /// Comparing prices elsewhere
        PriceShopping => "price_shopping",
        /// Preferred payment method unavailable
        NoPaymentMethod => "no_payment_method",
        /// Site too slow
        SlowSite => "slow_site",
        /// Payment attempt failed
        PaymentFailed => "payment_failed",
        /// Technical error during checkout
        TechnicalIssue => "technical_issue",
        /// Unspecified
        Other => "other",
    }
);

labelled_enum!(
    /// Reason given for returning an item
    ReturnReason, "return reason" {
        /// Clothing size mismatch
        WrongSize => "wrong_size",
        /// Item differs from listing
        NotAsDescribed => "not_as_described",
        /// Customer no longer wants it
        ChangedMind => "changed_mind",
        /// Item does not work
        Defective => "defective",
        /// Damaged by the carrier
        DamagedInShipping => "damaged_in_shipping",
    }
);

labelled_enum!(
    /// Processing state of a return
    ReturnStatus, "return status" {
        /// Customer opened the return
        Requested => "requested",
        /// Return accepted, item not received
        Approved => "approved",
        /// Item received and inspected
        Processed => "processed",
        /// Money returned to the customer
        Refunded => "refunded",
    }
);

labelled_enum!(
    /// Loyalty programme tier
    LoyaltyTier, "loyalty tier" {
        /// Entry tier
        Bronze => "bronze",
        /// Second tier
        Silver => "silver",
        /// Third tier
        Gold => "gold",
        /// Top tier
        Platinum => "platinum",
    }
);

labelled_enum!(
    /// Kind of marketing campaign
    CampaignType, "campaign type" {
        /// Short, deep discount event
        FlashSale => "flash_sale",
        /// Creator-driven promotion
        Influencer => "influencer",
        /// Seasonal promotion
        Seasonal => "seasonal",
    }
);

labelled_enum!(
    /// Output tables the engine can produce
    TableName, "table" {
        /// Customer reference table
        Customers => "customers",
        /// Supplier reference table
        Suppliers => "suppliers",
        /// Product catalogue
        Products => "products",
        /// Marketing campaigns
        Campaigns => "campaigns",
        /// Order headers
        Orders => "orders",
        /// Order lines
        OrderItems => "order_items",
        /// Support tickets
        SupportTickets => "support_tickets",
        /// Abandoned carts
        CartAbandonment => "cart_abandonment",
        /// Returned items
        Returns => "returns",
        /// Hourly system metrics
        SystemMetrics => "system_metrics",
    }
);

impl TableName {
    /// Whether the table is produced from the order stream
    pub fn requires_orders(&self) -> bool {
        matches!(
            self,
            TableName::SupportTickets
                | TableName::CartAbandonment
                | TableName::Returns
                | TableName::SystemMetrics
        )
    }

    /// Parse a comma-separated selection; `all` selects every table
    pub fn parse_selection(selection: &str) -> Result<Vec<TableName>, String> {
        if selection.trim().eq_ignore_ascii_case("all") {
            return Ok(TableName::ALL.to_vec());
        }
        let mut tables = Vec::new();
        for part in selection.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let table: TableName = part.parse()?;
            if !tables.contains(&table) {
                tables.push(table);
            }
        }
        if tables.is_empty() {
            return Err("Table selection is empty".to_string());
        }
        Ok(tables)
    }
}

labelled_enum!(
    /// Output formats for generated tables
    OutputFormat, "output format" {
        /// Comma-separated values with a header row
        Csv => "csv",
        /// One JSON object per line
        Jsonl => "jsonl",
    }
);

impl OutputFormat {
    /// File extension used for this format
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), *category);
        }
        for table in TableName::ALL {
            assert_eq!(table.to_string().parse::<TableName>().unwrap(), *table);
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Electronics".parse::<Category>().unwrap(), Category::Electronics);
        assert_eq!(" MOBILE_APP ".parse::<ShoppingChannel>().unwrap(), ShoppingChannel::MobileApp);
        assert!("toys".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_matches_display() {
        let json = serde_json::to_string(&PaymentFailureReason::GatewayDown).unwrap();
        assert_eq!(json, "\"gateway_down\"");
        let json = serde_json::to_string(&Cohort::GenZ).unwrap();
        assert_eq!(json, "\"gen_z\"");
    }

    #[test]
    fn test_table_selection() {
        assert_eq!(TableName::parse_selection("all").unwrap().len(), 10);
        let tables = TableName::parse_selection("orders, returns,orders").unwrap();
        assert_eq!(tables, vec![TableName::Orders, TableName::Returns]);
        assert!(TableName::parse_selection("orders,widgets").is_err());
        assert!(TableName::parse_selection(" , ").is_err());
    }

    #[test]
    fn test_subcategories_are_five_per_category() {
        for category in Category::ALL {
            assert_eq!(category.subcategories().len(), 5);
        }
    }
}
