//! Multi-part spreadsheet generation
//!
//! Splits a row set into batches and writes one file per batch under
//! `<output_root>/<label>/`.

use super::records::SheetRecord;
use super::style::SpreadsheetSettings;
use super::writer::SheetWriter;
use crate::core::export::batch::{plan_batches, Batch};
use crate::domain::naming::part_path;
use crate::domain::{ExportKind, RekapError, Result, RowSet};
use std::path::PathBuf;

/// Writes row sets as numbered spreadsheet parts
#[derive(Debug, Clone)]
pub struct SpreadsheetGenerator {
    settings: SpreadsheetSettings,
}

impl SpreadsheetGenerator {
    pub fn new(settings: SpreadsheetSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SpreadsheetSettings {
        &self.settings
    }

    /// Writes every part for `rows` and returns their paths in part order
    ///
    /// An empty row set still produces one header-only part.
    pub fn generate(&self, rows: &RowSet, label: &str) -> Result<Vec<PathBuf>> {
        match rows {
            RowSet::Transactions(records) => {
                self.generate_parts(ExportKind::Transactions, records, label)
            }
            RowSet::Customers(records) => {
                self.generate_parts(ExportKind::Customers, records, label)
            }
        }
    }

    fn generate_parts<R: SheetRecord>(
        &self,
        kind: ExportKind,
        records: &[R],
        label: &str,
    ) -> Result<Vec<PathBuf>> {
        let mut batches = plan_batches(records.len(), self.settings.batch_size)?;
        if batches.is_empty() {
            batches.push(Batch { start: 0, end: 0 });
        }

        let mut files = Vec::with_capacity(batches.len());

        for (index, batch) in batches.iter().enumerate() {
            let part = index + 1;
            let path = part_path(&self.settings.output_root, kind, label, part);

            tracing::info!(
                kind = %kind,
                part = part,
                rows = batch.len(),
                "Writing spreadsheet part"
            );

            let written = self.write_part(kind, &records[batch.range()], &path)?;

            tracing::info!(
                batch = part,
                rows = written,
                to = %path.display(),
                "Batch saved"
            );

            files.push(path);
        }

        Ok(files)
    }

    fn write_part<R: SheetRecord>(
        &self,
        kind: ExportKind,
        records: &[R],
        path: &std::path::Path,
    ) -> Result<usize> {
        let mut writer = SheetWriter::new(kind.sheet_name(), &self.settings.header)?;
        writer.write_header(R::headers(), &self.settings.columns(kind))?;

        for (i, record) in records.iter().enumerate() {
            let row_index = u32::try_from(i + 1).map_err(|_| {
                RekapError::Write(format!("part exceeds the row limit at row {}", i + 1))
            })?;
            writer.write_row(row_index, &record.cells(row_index))?;
        }

        writer.finalize(path)
    }
}
