//! Domain models and types for Rekap.
//!
//! This module contains the core domain models, types, and business rules for Rekap.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Filters** ([`ExportFilter`], [`ExportScope`], [`DateRange`], [`ExportKind`])
//! - **Records** ([`TransactionRow`], [`CustomerRow`], [`RowSet`])
//! - **Hierarchy** ([`OrgNode`], [`OrgLevel`])
//! - **Output naming** ([`naming`])
//! - **Error types** ([`RekapError`], [`JobError`]) and the [`Result`] alias
//!
//! # Example
//!
//! ```rust
//! use rekap::domain::{DateRange, ExportFilter, ExportScope};
//!
//! # fn example() -> rekap::domain::Result<()> {
//! let dates = DateRange::parse("2025/01/01", "2025/01/31")?;
//! let filter = ExportFilter::new(ExportScope::Unit("52001".to_string()), dates);
//!
//! assert_eq!(filter.label(), "UNIT_52001_20250101_20250131");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod filter;
pub mod hierarchy;
pub mod naming;
pub mod records;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{JobError, RekapError};
pub use filter::{DateRange, ExportFilter, ExportKind, ExportScope, Pagination};
pub use hierarchy::{OrgLevel, OrgNode};
pub use records::{CustomerRow, RowSet, TransactionRow};
pub use result::Result;
