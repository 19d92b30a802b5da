//! Spreadsheet generation
//!
//! - [`style`] - Header style, column layout and generator settings
//! - [`records`] - Column mapping for transaction and customer rows
//! - [`writer`] - Streaming single-file writer
//! - [`generator`] - Batching of row sets into numbered parts

pub mod generator;
pub mod records;
pub mod style;
pub mod writer;

pub use generator::SpreadsheetGenerator;
pub use records::{CellValue, SheetRecord};
pub use style::{ColumnLayout, HeaderStyle, SpreadsheetSettings};
pub use writer::SheetWriter;
