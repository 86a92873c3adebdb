//! Generated tables handed from the engine to the writer

use serde::Serialize;
use serde_json::Value;

use crate::entities::{CartAbandonment, Return, SupportTicket, SystemMetric};
use crate::orders::{Order, OrderItem};
use crate::reference::{Campaign, Customer, Product, Supplier};
use crate::types::TableName;

/// Records of one generated table
#[derive(Debug, Clone, PartialEq)]
pub enum Table {
    /// Customers
    Customers(Vec<Customer>),
    /// Suppliers
    Suppliers(Vec<Supplier>),
    /// Products
    Products(Vec<Product>),
    /// Campaigns
    Campaigns(Vec<Campaign>),
    /// Orders
    Orders(Vec<Order>),
    /// Order lines
    OrderItems(Vec<OrderItem>),
    /// Support tickets
    SupportTickets(Vec<SupportTicket>),
    /// Abandoned carts
    CartAbandonment(Vec<CartAbandonment>),
    /// Returns
    Returns(Vec<Return>),
    /// Hourly system metrics
    SystemMetrics(Vec<SystemMetric>),
}

macro_rules! each_table {
    ($table:expr, $records:ident => $body:expr) => {
        match $table {
            Table::Customers($records) => $body,
            Table::Suppliers($records) => $body,
            Table::Products($records) => $body,
            Table::Campaigns($records) => $body,
            Table::Orders($records) => $body,
            Table::OrderItems($records) => $body,
            Table::SupportTickets($records) => $body,
            Table::CartAbandonment($records) => $body,
            Table::Returns($records) => $body,
            Table::SystemMetrics($records) => $body,
        }
    };
}

fn visit_records<T, F, E>(records: &[T], visit: &mut F) -> Result<(), E>
where
    T: Serialize,
    F: FnMut(Value) -> Result<(), E>,
    E: From<serde_json::Error>,
{
    for record in records {
        visit(serde_json::to_value(record)?)?;
    }
    Ok(())
}

impl Table {
    /// Empty table of the given kind
    pub fn empty(name: TableName) -> Self {
        match name {
            TableName::Customers => Table::Customers(Vec::new()),
            TableName::Suppliers => Table::Suppliers(Vec::new()),
            TableName::Products => Table::Products(Vec::new()),
            TableName::Campaigns => Table::Campaigns(Vec::new()),
            TableName::Orders => Table::Orders(Vec::new()),
            TableName::OrderItems => Table::OrderItems(Vec::new()),
            TableName::SupportTickets => Table::SupportTickets(Vec::new()),
            TableName::CartAbandonment => Table::CartAbandonment(Vec::new()),
            TableName::Returns => Table::Returns(Vec::new()),
            TableName::SystemMetrics => Table::SystemMetrics(Vec::new()),
        }
    }

    /// Table name
    pub fn name(&self) -> TableName {
        match self {
            Table::Customers(_) => TableName::Customers,
            Table::Suppliers(_) => TableName::Suppliers,
            Table::Products(_) => TableName::Products,
            Table::Campaigns(_) => TableName::Campaigns,
            Table::Orders(_) => TableName::Orders,
            Table::OrderItems(_) => TableName::OrderItems,
            Table::SupportTickets(_) => TableName::SupportTickets,
            Table::CartAbandonment(_) => TableName::CartAbandonment,
            Table::Returns(_) => TableName::Returns,
            Table::SystemMetrics(_) => TableName::SystemMetrics,
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        each_table!(self, records => records.len())
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit every record as a JSON object, in table order
    pub fn for_each_row<F, E>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(Value) -> Result<(), E>,
        E: From<serde_json::Error>,
    {
        each_table!(self, records => visit_records(records, &mut visit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tables_keep_their_name() {
        for name in TableName::ALL {
            let table = Table::empty(*name);
            assert_eq!(table.name(), *name);
            assert!(table.is_empty());
        }
    }
}
