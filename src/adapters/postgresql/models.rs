//! Row mapping for PostgreSQL results
//!
//! Every exported column is selected as `text`, so mapping only has to deal
//! with NULLs, which become empty strings.

use crate::domain::{CustomerRow, RekapError, Result, TransactionRow};
use tokio_postgres::Row;

/// Selected columns of a customer query, in order
pub const CUSTOMER_COLUMNS: [&str; 15] = [
    "idpel",
    "name",
    "consumer_name",
    "energy_type",
    "kwh",
    "address",
    "meter_no",
    "meter_type",
    "unit_upi",
    "nama_unit_upi",
    "unit_ap",
    "nama_unit_ap",
    "unit_up",
    "nama_unit_up",
    "created_at",
];

fn text(row: &Row, column: &str) -> Result<String> {
    row.try_get::<_, Option<String>>(column)
        .map(Option::unwrap_or_default)
        .map_err(|e| RekapError::SourceFetch(format!("Failed to read column '{}': {}", column, e)))
}

/// Maps one result row to a [`TransactionRow`]
pub fn transaction_from_row(row: &Row) -> Result<TransactionRow> {
    Ok(TransactionRow {
        name: text(row, "name")?,
        consumer_name: text(row, "consumer_name")?,
        payment_type: text(row, "type")?,
        amount: text(row, "amount")?,
        status_code: text(row, "status_code")?,
        meter_number: text(row, "meter_number")?,
        title: text(row, "title")?,
        payment_gateway: text(row, "payment_gateway")?,
        created_at: text(row, "created_at")?,
        token: text(row, "token")?,
        unit_upi: text(row, "unit_upi")?,
        unit_ap: text(row, "unit_ap")?,
        unit_up: text(row, "unit_up")?,
        unit_upi_name: text(row, "nama_unit_upi")?,
        unit_ap_name: text(row, "nama_unit_ap")?,
        unit_up_name: text(row, "nama_unit_up")?,
    })
}

/// Maps one result row to a [`CustomerRow`]
pub fn customer_from_row(row: &Row) -> Result<CustomerRow> {
    Ok(CustomerRow {
        customer_id: text(row, "idpel")?,
        name: text(row, "name")?,
        consumer_name: text(row, "consumer_name")?,
        energy_type: text(row, "energy_type")?,
        kwh: text(row, "kwh")?,
        address: text(row, "address")?,
        meter_no: text(row, "meter_no")?,
        meter_type: text(row, "meter_type")?,
        unit_upi: text(row, "unit_upi")?,
        unit_upi_name: text(row, "nama_unit_upi")?,
        unit_ap: text(row, "unit_ap")?,
        unit_ap_name: text(row, "nama_unit_ap")?,
        unit_up: text(row, "unit_up")?,
        unit_up_name: text(row, "nama_unit_up")?,
        created_at: text(row, "created_at")?,
    })
}
