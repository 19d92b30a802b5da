//! Streaming spreadsheet writer
//!
//! Wraps a constant-memory worksheet: rows are flushed to a temporary file as
//! soon as a later row is written, so they must arrive in ascending order.

use super::records::CellValue;
use super::style::{ColumnLayout, HeaderStyle};
use crate::domain::{RekapError, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::fs::DirBuilder;
use std::path::Path;

/// Last 0-based row index accepted by the xlsx format
const MAX_ROW: u32 = 1_048_575;

/// Mode of directories created for spreadsheet parts
#[cfg(unix)]
const PART_DIR_MODE: u32 = 0o750;

/// Writes one spreadsheet file
pub struct SheetWriter {
    workbook: Workbook,
    header_format: Format,
    header_row_height: f64,
    header_written: bool,
    last_row: u32,
    rows_written: usize,
}

impl SheetWriter {
    /// Creates a workbook with a single streamed worksheet named `sheet_name`
    pub fn new(sheet_name: &str, style: &HeaderStyle) -> Result<Self> {
        let mut workbook = Workbook::new();
        workbook
            .add_worksheet_with_constant_memory()
            .set_name(sheet_name)?;

        Ok(Self {
            workbook,
            header_format: style.format(),
            header_row_height: style.row_height,
            header_written: false,
            last_row: 0,
            rows_written: 0,
        })
    }

    /// Writes the styled header into the first row and applies column widths
    pub fn write_header(&mut self, columns: &[&str], layout: &ColumnLayout) -> Result<()> {
        if self.header_written {
            return Err(RekapError::Write("header already written".to_string()));
        }

        let worksheet = self.workbook.worksheet_from_index(0)?;
        for col in layout.first..=layout.last {
            worksheet.set_column_width(col, layout.width)?;
        }
        worksheet.set_row_height(0, self.header_row_height)?;

        for (col, caption) in columns.iter().enumerate() {
            let col = u16::try_from(col)
                .map_err(|_| RekapError::Write(format!("too many columns: {}", columns.len())))?;
            worksheet.write_string_with_format(0, col, *caption, &self.header_format)?;
        }

        self.header_written = true;
        Ok(())
    }

    /// Writes one data row; `row_index` is 1-based and lands just below the
    /// header for `1`
    pub fn write_row(&mut self, row_index: u32, values: &[CellValue<'_>]) -> Result<()> {
        // rows below the header are flushed in constant-memory mode, so a late
        // header would be dropped
        if !self.header_written {
            return Err(RekapError::Write(
                "data row written before the header".to_string(),
            ));
        }
        if row_index == 0 || row_index > MAX_ROW {
            return Err(RekapError::Write(format!(
                "row index {row_index} out of range 1..={MAX_ROW}"
            )));
        }
        if row_index <= self.last_row {
            return Err(RekapError::Write(format!(
                "row index {row_index} is not after the last written row {}",
                self.last_row
            )));
        }

        let worksheet = self.workbook.worksheet_from_index(0)?;
        for (col, value) in values.iter().enumerate() {
            let col = u16::try_from(col)
                .map_err(|_| RekapError::Write(format!("too many columns: {}", values.len())))?;
            match value {
                CellValue::Number(n) => {
                    worksheet.write_number(row_index, col, *n)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row_index, col, *s)?;
                }
            }
        }

        self.last_row = row_index;
        self.rows_written += 1;
        Ok(())
    }

    /// Number of data rows written so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes and saves the workbook at `path`, creating its parent
    /// directory when missing. Returns the number of data rows.
    pub fn finalize(mut self, path: &Path) -> Result<usize> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                create_part_dir(parent)?;
            }
        }

        self.workbook.save(path)?;

        tracing::debug!(
            path = %path.display(),
            rows = self.rows_written,
            "Spreadsheet saved"
        );

        Ok(self.rows_written)
    }
}

fn create_part_dir(dir: &Path) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(PART_DIR_MODE);
    }

    builder.create(dir).map_err(|e| {
        RekapError::Write(format!(
            "failed to create directory {}: {}",
            dir.display(),
            e
        ))
    })
}
