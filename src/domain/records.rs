//! Exported records
//!
//! Rows are fetched already scoped and date-filtered by the row source and are
//! never modified afterwards. Every field is kept as the text the source
//! returned so the spreadsheet shows values verbatim.

use crate::domain::filter::ExportKind;
use serde::{Deserialize, Serialize};

/// One payment transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub name: String,
    pub consumer_name: String,
    /// Raw payment type code, may be empty
    pub payment_type: String,
    pub amount: String,
    pub status_code: String,
    pub meter_number: String,
    pub title: String,
    pub payment_gateway: String,
    pub created_at: String,
    pub token: String,
    pub unit_upi: String,
    pub unit_ap: String,
    pub unit_up: String,
    pub unit_upi_name: String,
    pub unit_ap_name: String,
    pub unit_up_name: String,
}

/// One customer record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub customer_id: String,
    pub name: String,
    pub consumer_name: String,
    pub energy_type: String,
    pub kwh: String,
    pub address: String,
    pub meter_no: String,
    pub meter_type: String,
    pub unit_upi: String,
    pub unit_upi_name: String,
    pub unit_ap: String,
    pub unit_ap_name: String,
    pub unit_up: String,
    pub unit_up_name: String,
    pub created_at: String,
}

/// Rows returned by one fetch, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSet {
    Transactions(Vec<TransactionRow>),
    Customers(Vec<CustomerRow>),
}

impl RowSet {
    /// Empty set of the given kind
    pub fn empty(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Transactions => RowSet::Transactions(Vec::new()),
            ExportKind::Customers => RowSet::Customers(Vec::new()),
        }
    }

    /// Kind of the rows in this set
    pub fn kind(&self) -> ExportKind {
        match self {
            RowSet::Transactions(_) => ExportKind::Transactions,
            RowSet::Customers(_) => ExportKind::Customers,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RowSet::Transactions(rows) => rows.len(),
            RowSet::Customers(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
