//! Column dictionary
//!
//! Every table has a fixed column list. The CSV writer emits columns in this
//! order, and `--dictionary` writes the same list as JSON so downstream tools
//! do not have to infer types from the files.

use serde::Serialize;

use crate::types::TableName;

/// Logical type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Free text or a closed label
    String,
    /// Whole number
    Integer,
    /// Real number
    Float,
    /// Currency amount with two decimals
    Money,
    /// `true` / `false`
    Boolean,
    /// RFC 3339 UTC timestamp
    Timestamp,
    /// List of labels, `;`-separated in CSV
    List,
}

/// One column of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Column name, identical to the record field name
    pub name: &'static str,
    /// Logical type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Whether the column may be empty
    pub nullable: bool,
    /// Human-readable description
    pub description: &'static str,
}

/// Column list of one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    /// Table name
    pub table: TableName,
    /// What one row represents
    pub description: &'static str,
    /// Columns in output order
    pub columns: &'static [Column],
}

impl TableSchema {
    /// Column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in output order
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }
}

const fn col(name: &'static str, column_type: ColumnType, description: &'static str) -> Column {
    Column { name, column_type, nullable: false, description }
}

const fn opt(name: &'static str, column_type: ColumnType, description: &'static str) -> Column {
    Column { name, column_type, nullable: true, description }
}

use ColumnType::{Boolean, Float, Integer, List, Money, String as Text, Timestamp};

const CUSTOMERS: &[Column] = &[
    col("customer_id", Text, "Unique customer identifier (CUST_ prefix)"),
    col("name", Text, "Full name"),
    col("email", Text, "Contact email"),
    col("phone", Text, "Contact phone number"),
    col("city", Text, "Home city"),
    col("state", Text, "Home state"),
    col("signup_ts", Timestamp, "Account creation time, before the scenario starts"),
    col("cohort", Text, "Generational cohort"),
    col("acquisition_channel", Text, "How the customer was acquired"),
    col("preferred_channel", Text, "Usual shopping channel"),
    col("preferred_payment", Text, "Usual payment method"),
    col("preferred_support", Text, "Usual support contact channel"),
    col("loyalty_tier", Text, "Loyalty programme tier"),
    col("lifetime_value", Money, "Historical lifetime spend"),
    col("price_sensitivity", Float, "Price sensitivity in [0, 1]"),
];

const SUPPLIERS: &[Column] = &[
    col("supplier_id", Text, "Unique supplier identifier (SUP_ prefix)"),
    col("name", Text, "Supplier name"),
    col("country", Text, "Country of origin"),
    col("lead_time_days", Integer, "Typical lead time in days"),
    col("reliability_score", Float, "On-time delivery reliability in [0, 1]"),
    col("is_primary", Boolean, "Whether this is a primary supplier"),
    col("backup_capacity", Float, "Share of capacity available as backup"),
];

const PRODUCTS: &[Column] = &[
    col("product_id", Text, "Unique product identifier (PROD_ prefix)"),
    col("sku", Text, "Stock keeping unit"),
    col("name", Text, "Display name"),
    col("category", Text, "Top-level category"),
    col("subcategory", Text, "Subcategory within the category"),
    col("brand", Text, "Brand the product is sold under"),
    col("price", Money, "List price"),
    col("cost", Money, "Unit cost, below the list price"),
    col("weight_kg", Float, "Shipping weight in kilograms"),
    col("is_seasonal", Boolean, "Whether demand follows a seasonal pattern"),
    col("seasonality_pattern", Text, "Seasonal pattern of the category"),
    col("supplier_id", Text, "Supplying company"),
    opt("inventory_cap", Integer, "Units available for the whole run, when constrained"),
    col("featured", Boolean, "Whether this is the scenario's featured product"),
];

const CAMPAIGNS: &[Column] = &[
    col("campaign_id", Text, "Unique campaign identifier (CAMP_ prefix)"),
    col("name", Text, "Display name"),
    col("campaign_type", Text, "Campaign type"),
    col("scenario", Text, "Scenario the campaign belongs to"),
    col("start_ts", Timestamp, "Campaign start"),
    col("end_ts", Timestamp, "Campaign end (exclusive)"),
    col("discount_rate", Float, "Discount rate in [0, 1]"),
    col("target_categories", List, "Categories the discount applies to"),
];

const ORDERS: &[Column] = &[
    col("order_id", Text, "Unique order identifier (ORD_ prefix)"),
    col("customer_id", Text, "Ordering customer"),
    col("order_ts", Timestamp, "Time the order was placed"),
    col("channel", Text, "Shopping channel"),
    col("session_id", Text, "Browsing session that placed the order (SESS_ prefix)"),
    col("payment_method", Text, "Payment method"),
    col("payment_status", Text, "Payment outcome"),
    opt("payment_failure_reason", Text, "Why the payment failed"),
    opt("campaign_id", Text, "Campaign that discounted at least one line"),
    col("subtotal", Money, "Sum of line totals"),
    col("discount_amount", Money, "Sum of line discounts"),
    col("total", Money, "Amount charged: subtotal minus discount"),
    col("item_count", Integer, "Number of order lines"),
    col("status", Text, "Fulfilment state at the end of the scenario"),
    col("warehouse_id", Text, "Fulfilling warehouse (WH_01 to WH_05)"),
    opt("promised_delivery_ts", Timestamp, "Promised delivery time"),
    opt("delivered_ts", Timestamp, "Delivery time, for delivered orders"),
    col("is_delayed", Boolean, "Whether delivery misses the promised time"),
    col("delay_hours", Integer, "Hours by which delivery misses the promised time"),
];

const ORDER_ITEMS: &[Column] = &[
    col("order_item_id", Text, "Unique line identifier (ITEM_ prefix)"),
    col("order_id", Text, "Owning order"),
    col("product_id", Text, "Ordered product"),
    col("quantity", Integer, "Units ordered"),
    col("unit_price", Money, "Price per unit"),
    col("line_total", Money, "Quantity times unit price"),
    col("discount_amount", Money, "Campaign discount on the line"),
];

const SUPPORT_TICKETS: &[Column] = &[
    col("ticket_id", Text, "Unique ticket identifier (TKT_ prefix)"),
    col("customer_id", Text, "Customer who opened the ticket"),
    opt("order_id", Text, "Related order, placed before the ticket"),
    col("created_ts", Timestamp, "Time the ticket was opened"),
    col("channel", Text, "Support channel"),
    col("issue_category", Text, "Issue category"),
    col("issue_subcategory", Text, "Issue subcategory"),
    col("severity", Text, "Severity"),
    opt("first_response_ts", Timestamp, "First agent response, inside the scenario window"),
    opt("resolved_ts", Timestamp, "Resolution time, inside the scenario window"),
    col("sla_breach", Boolean, "Whether the first response missed its SLA"),
    col("sla_breach_hours", Integer, "Hours by which the SLA was missed"),
    opt("csat", Integer, "Satisfaction score 1-5, for resolved tickets"),
    col("agent_id", Text, "Handling agent or bot"),
    col("agent_type", Text, "Human agent or chatbot"),
    col("escalation_count", Integer, "Number of escalations"),
    opt("resolution_time_minutes", Integer, "Minutes from creation to resolution"),
];

const CART_ABANDONMENT: &[Column] = &[
    col("abandonment_id", Text, "Unique abandonment identifier (CART_ prefix)"),
    col("customer_id", Text, "Customer who abandoned the cart"),
    col("abandon_ts", Timestamp, "Time the cart was abandoned"),
    col("product_id", Text, "Main product in the cart"),
    col("channel", Text, "Shopping channel"),
    col("abandon_stage", Text, "Funnel stage at abandonment"),
    col("abandon_reason", Text, "Reason for abandonment"),
    col("items_count", Integer, "Items in the cart"),
    col("cart_value", Money, "Value of the cart"),
    col("recovered", Boolean, "Whether the cart was later recovered"),
];

const RETURNS: &[Column] = &[
    col("return_id", Text, "Unique return identifier (RET_ prefix)"),
    col("order_id", Text, "Delivered order the item belongs to"),
    col("order_item_id", Text, "Returned order line"),
    col("customer_id", Text, "Customer who placed the order"),
    col("product_id", Text, "Returned product"),
    col("return_reason", Text, "Reason for the return"),
    col("return_ts", Timestamp, "Time the return was requested"),
    opt("processed_ts", Timestamp, "Time the return was processed"),
    col("refund_amount", Money, "Refund, never above the line's net amount"),
    col("return_status", Text, "Return state at the end of the scenario"),
    col("processing_days", Integer, "Days between request and processing"),
];

const SYSTEM_METRICS: &[Column] = &[
    col("hour_ts", Timestamp, "Start of the hour"),
    col("order_count", Integer, "Orders placed"),
    col("ticket_count", Integer, "Support tickets opened"),
    col("abandonment_count", Integer, "Carts abandoned"),
    col("delayed_order_count", Integer, "Orders whose delivery is delayed"),
    col("load_factor", Float, "Orders relative to the baseline hourly rate"),
    col("error_rate", Float, "Share of requests failing"),
    col("payment_failure_rate", Float, "Share of orders whose payment failed"),
    col("cart_abandonment_rate", Float, "Abandoned carts as a share of checkout attempts"),
    col("site_load_time_s", Float, "Mean page load time in seconds"),
];

const SCHEMAS: &[TableSchema] = &[
    TableSchema { table: TableName::Customers, description: "One row per customer", columns: CUSTOMERS },
    TableSchema { table: TableName::Suppliers, description: "One row per supplier", columns: SUPPLIERS },
    TableSchema { table: TableName::Products, description: "One row per catalogue product", columns: PRODUCTS },
    TableSchema { table: TableName::Campaigns, description: "One row per campaign", columns: CAMPAIGNS },
    TableSchema { table: TableName::Orders, description: "One row per order", columns: ORDERS },
    TableSchema { table: TableName::OrderItems, description: "One row per order line", columns: ORDER_ITEMS },
    TableSchema {
        table: TableName::SupportTickets,
        description: "One row per support ticket",
        columns: SUPPORT_TICKETS,
    },
    TableSchema {
        table: TableName::CartAbandonment,
        description: "One row per abandoned cart",
        columns: CART_ABANDONMENT,
    },
    TableSchema { table: TableName::Returns, description: "One row per returned order line", columns: RETURNS },
    TableSchema {
        table: TableName::SystemMetrics,
        description: "One row per scenario hour",
        columns: SYSTEM_METRICS,
    },
];

/// Column list of `table`
pub fn schema(table: TableName) -> &'static TableSchema {
    // SCHEMAS follows TableName::ALL order
    &SCHEMAS[table as usize]
}

/// Column lists of the given tables, in the given order
pub fn dictionary(tables: &[TableName]) -> Vec<&'static TableSchema> {
    tables.iter().map(|t| schema(*t)).collect()
}
