//! Export filters
//!
//! An [`ExportFilter`] scopes one export to a point in the organizational
//! hierarchy and an inclusive date range. The scope is an enum so at most one
//! of unit, area or region can ever be set.

use crate::domain::errors::RekapError;
use crate::domain::naming::normalize_label;
use crate::domain::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accepted input layouts for export dates
const DATE_LAYOUTS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];

/// Kind of record being exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// Payment transactions
    Transactions,
    /// Customer master records
    Customers,
}

impl ExportKind {
    /// Code embedded in spreadsheet filenames
    pub fn code(&self) -> &'static str {
        match self {
            ExportKind::Transactions => "TRANSAKSI",
            ExportKind::Customers => "PELANGGAN",
        }
    }

    /// Worksheet name used inside each generated file
    pub fn sheet_name(&self) -> &'static str {
        match self {
            ExportKind::Transactions => "Rekap Transaksi",
            ExportKind::Customers => "Rekap Pelanggan",
        }
    }
}

impl FromStr for ExportKind {
    type Err = RekapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "transactions" | "transaction" | "transaksi" => Ok(ExportKind::Transactions),
            "customers" | "customer" | "pelanggan" => Ok(ExportKind::Customers),
            other => Err(RekapError::Validation(format!(
                "Invalid export kind '{other}'. Must be one of: transactions, customers"
            ))),
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Transactions => write!(f, "transactions"),
            ExportKind::Customers => write!(f, "customers"),
        }
    }
}

/// Organizational scope of an export
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", content = "id", rename_all = "lowercase")]
pub enum ExportScope {
    /// Every unit in the organization
    National,
    /// A regional office; covers every sub-region it owns
    Regional(String),
    /// A region (induk)
    Region(String),
    /// An area within a region
    Area(String),
    /// A single service unit
    Unit(String),
}

impl ExportScope {
    /// Picks the scope from optional request keys.
    ///
    /// Precedence is unit > area > region > national; blank values count as
    /// absent.
    pub fn from_parts(unit: Option<&str>, area: Option<&str>, region: Option<&str>) -> Self {
        let present = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        if let Some(unit) = present(unit) {
            ExportScope::Unit(unit)
        } else if let Some(area) = present(area) {
            ExportScope::Area(area)
        } else if let Some(region) = present(region) {
            ExportScope::Region(region)
        } else {
            ExportScope::National
        }
    }

    /// Filename prefix for the scope level
    pub fn prefix(&self) -> &'static str {
        match self {
            ExportScope::National => "NASIONAL",
            ExportScope::Regional(_) => "REGIONAL",
            ExportScope::Region(_) => "INDUK",
            ExportScope::Area(_) => "AREA",
            ExportScope::Unit(_) => "UNIT",
        }
    }

    /// Identifier of the scoped node, `None` for national exports
    pub fn id(&self) -> Option<&str> {
        match self {
            ExportScope::National => None,
            ExportScope::Regional(id)
            | ExportScope::Region(id)
            | ExportScope::Area(id)
            | ExportScope::Unit(id) => Some(id),
        }
    }

    /// Builds the scope label used for output directories and archives,
    /// e.g. `UNIT_52001_20250101_20250131`
    pub fn label(&self, dates: &DateRange) -> String {
        match self.id() {
            Some(id) => format!(
                "{}_{}_{}",
                self.prefix(),
                normalize_label(id),
                dates.compact()
            ),
            None => format!("{}_{}", self.prefix(), dates.compact()),
        }
    }
}

/// Inclusive date range of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range
    ///
    /// # Errors
    ///
    /// Returns a validation error if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(RekapError::Validation(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two `YYYY/MM/DD` (or `YYYY-MM-DD`) strings
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// First day of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Dates with separators stripped, e.g. `20250101_20250131`
    pub fn compact(&self) -> String {
        format!(
            "{}_{}",
            self.start.format("%Y%m%d"),
            self.end.format("%Y%m%d")
        )
    }

    /// Timestamp window covering the whole range: start of the first day to
    /// the last second of the final day
    pub fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        let from = self.start.and_time(chrono::NaiveTime::MIN);
        let to = self
            .end
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| self.end.and_time(chrono::NaiveTime::MIN));
        (from, to)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..={}",
            self.start.format("%Y/%m/%d"),
            self.end.format("%Y/%m/%d")
        )
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(value, layout).ok())
        .ok_or_else(|| {
            RekapError::Validation(format!(
                "Invalid date '{value}'. Expected format YYYY/MM/DD"
            ))
        })
}

/// Optional row window for a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of rows, ignored when zero
    pub limit: u64,
    /// Rows to skip, ignored when zero
    pub offset: u64,
}

/// Filter passed to the row source for one export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFilter {
    /// Organizational scope
    pub scope: ExportScope,

    /// Inclusive date range
    pub dates: DateRange,

    /// Optional limit/offset window
    #[serde(default)]
    pub pagination: Option<Pagination>,

    /// Read from the secondary database instead of the primary one
    #[serde(default)]
    pub use_secondary: bool,
}

impl ExportFilter {
    /// Creates a filter reading the primary database without pagination
    pub fn new(scope: ExportScope, dates: DateRange) -> Self {
        Self {
            scope,
            dates,
            pagination: None,
            use_secondary: false,
        }
    }

    /// Sets the limit/offset window; zero values disable it
    pub fn with_pagination(mut self, limit: u64, offset: u64) -> Self {
        self.pagination = if limit == 0 && offset == 0 {
            None
        } else {
            Some(Pagination { limit, offset })
        };
        self
    }

    /// Selects the secondary database
    pub fn with_secondary(mut self, use_secondary: bool) -> Self {
        self.use_secondary = use_secondary;
        self
    }

    /// Returns the same filter narrowed to another scope
    pub fn rescoped(&self, scope: ExportScope) -> Self {
        Self {
            scope,
            ..self.clone()
        }
    }

    /// Scope label for this filter's output files
    pub fn label(&self) -> String {
        self.scope.label(&self.dates)
    }
}
