//! Header style and column layout
//!
//! Both are built once from [`SpreadsheetConfig`] and handed to every
//! writer, so no spreadsheet code reads configuration directly.

use crate::config::schema::{parse_hex_color, RekapConfig, SpreadsheetConfig};
use crate::domain::{ExportKind, RekapError, Result};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatPattern};
use std::path::PathBuf;

/// Style applied to the header row of every part
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderStyle {
    pub font_size: f64,
    pub font_color: u32,
    pub fill_color: u32,
    pub border_color: u32,
    pub row_height: f64,
}

impl HeaderStyle {
    /// Builds the style from configuration
    pub fn from_config(config: &SpreadsheetConfig) -> Result<Self> {
        let color = |value: &str| parse_hex_color(value).map_err(RekapError::Configuration);

        Ok(Self {
            font_size: config.header_font_size,
            font_color: color(&config.header_font_color)?,
            fill_color: color(&config.header_fill_color)?,
            border_color: color(&config.header_border_color)?,
            row_height: config.header_row_height,
        })
    }

    /// Cell format for header cells
    pub fn format(&self) -> Format {
        Format::new()
            .set_bold()
            .set_font_size(self.font_size)
            .set_font_color(self.font_color)
            .set_border(FormatBorder::Thin)
            .set_border_color(self.border_color)
            .set_pattern(FormatPattern::Solid)
            .set_background_color(self.fill_color)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
    }
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            font_color: 0x000000,
            fill_color: 0xE8F2A1,
            border_color: 0x000000,
            row_height: 30.0,
        }
    }
}

/// Fixed width applied to a contiguous range of columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    /// First column, 0-based
    pub first: u16,
    /// Last column, 0-based and inclusive
    pub last: u16,
    pub width: f64,
}

impl ColumnLayout {
    /// Layout from 1-based column numbers as written in configuration
    pub fn from_one_based(first: u16, last: u16, width: f64) -> Self {
        Self {
            first: first.saturating_sub(1),
            last: last.saturating_sub(1),
            width,
        }
    }
}

/// Everything a spreadsheet generator needs to lay out its parts
#[derive(Debug, Clone)]
pub struct SpreadsheetSettings {
    /// Maximum data rows per part
    pub batch_size: usize,
    /// Directory under which `<SCOPE>/` part directories are created
    pub output_root: PathBuf,
    pub header: HeaderStyle,
    pub transaction_columns: ColumnLayout,
    pub customer_columns: ColumnLayout,
}

impl SpreadsheetSettings {
    /// Builds the settings from the full configuration
    pub fn from_config(config: &RekapConfig) -> Result<Self> {
        let sheet = &config.spreadsheet;
        Ok(Self {
            batch_size: config.export.batch_size,
            output_root: PathBuf::from(&config.export.output_dir),
            header: HeaderStyle::from_config(sheet)?,
            transaction_columns: ColumnLayout::from_one_based(
                sheet.width_first_column,
                sheet.width_last_column,
                sheet.transaction_column_width,
            ),
            customer_columns: ColumnLayout::from_one_based(
                sheet.width_first_column,
                sheet.width_last_column,
                sheet.customer_column_width,
            ),
        })
    }

    /// Default layout rooted at `output_root`
    pub fn with_root(output_root: impl Into<PathBuf>) -> Self {
        Self {
            batch_size: 150_000,
            output_root: output_root.into(),
            header: HeaderStyle::default(),
            transaction_columns: ColumnLayout::from_one_based(2, 15, 25.0),
            customer_columns: ColumnLayout::from_one_based(2, 15, 26.0),
        }
    }

    /// Overrides the rows-per-part threshold
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Column layout for the given export kind
    pub fn columns(&self, kind: ExportKind) -> ColumnLayout {
        match kind {
            ExportKind::Transactions => self.transaction_columns,
            ExportKind::Customers => self.customer_columns,
        }
    }
}
