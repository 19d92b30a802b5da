//! Column mapping for exported records

use crate::domain::{CustomerRow, TransactionRow};

/// Value of one cell in a data row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Number(f64),
    Text(&'a str),
}

/// A record that can be laid out as one spreadsheet row
pub trait SheetRecord {
    /// Header captions, including the leading row-number column
    fn headers() -> &'static [&'static str];

    /// Cells for this record; `row_index` fills the row-number column
    fn cells(&self, row_index: u32) -> Vec<CellValue<'_>>;
}

/// Shown in the payment category column when the type code is empty
pub const EMPTY_PAYMENT_CATEGORY: &str = "-";

const TRANSACTION_HEADERS: [&str; 15] = [
    "No.",
    "Nama Akun",
    "Nama Pelanggan",
    "Type",
    "Amount",
    "Status Code",
    "ID Pel",
    "Pembayaran",
    "Kanal Pembayaran",
    "Jenis Pembayaran",
    "Tanggal Transaksi",
    "Token",
    "Unit UPI",
    "Unit AP",
    "Unit UP",
];

const CUSTOMER_HEADERS: [&str; 16] = [
    "No.",
    "ID PELANGGAN",
    "NAMA",
    "CONSUMER NAME",
    "TIPE ENERGI",
    "KWH",
    "ALAMAT",
    "METER NO",
    "TIPE METER",
    "UNIT UPI",
    "NAMA UNIT UPI",
    "UNIT AP",
    "NAMA UNIT AP",
    "UNIT UP",
    "NAMA UNIT UP",
    "CREATED AT",
];

impl TransactionRow {
    /// Payment category derived from the type code
    pub fn payment_category(&self) -> &str {
        if self.payment_type.is_empty() {
            EMPTY_PAYMENT_CATEGORY
        } else {
            &self.payment_type
        }
    }
}

impl SheetRecord for TransactionRow {
    fn headers() -> &'static [&'static str] {
        &TRANSACTION_HEADERS
    }

    fn cells(&self, row_index: u32) -> Vec<CellValue<'_>> {
        vec![
            CellValue::Number(f64::from(row_index)),
            CellValue::Text(&self.consumer_name),
            CellValue::Text(&self.name),
            CellValue::Text(&self.payment_type),
            CellValue::Text(&self.amount),
            CellValue::Text(&self.status_code),
            CellValue::Text(&self.meter_number),
            CellValue::Text(&self.title),
            CellValue::Text(&self.payment_gateway),
            CellValue::Text(self.payment_category()),
            CellValue::Text(&self.created_at),
            CellValue::Text(&self.token),
            CellValue::Text(&self.unit_upi_name),
            CellValue::Text(&self.unit_ap_name),
            CellValue::Text(&self.unit_up_name),
        ]
    }
}

impl SheetRecord for CustomerRow {
    fn headers() -> &'static [&'static str] {
        &CUSTOMER_HEADERS
    }

    fn cells(&self, row_index: u32) -> Vec<CellValue<'_>> {
        vec![
            CellValue::Number(f64::from(row_index)),
            CellValue::Text(&self.customer_id),
            CellValue::Text(&self.name),
            CellValue::Text(&self.consumer_name),
            CellValue::Text(&self.energy_type),
            CellValue::Text(&self.kwh),
            CellValue::Text(&self.address),
            CellValue::Text(&self.meter_no),
            CellValue::Text(&self.meter_type),
            CellValue::Text(&self.unit_upi),
            CellValue::Text(&self.unit_upi_name),
            CellValue::Text(&self.unit_ap),
            CellValue::Text(&self.unit_ap_name),
            CellValue::Text(&self.unit_up),
            CellValue::Text(&self.unit_up_name),
            CellValue::Text(&self.created_at),
        ]
    }
}
