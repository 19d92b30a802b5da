//! Batch planning for spreadsheet exports
//!
//! A fetched row set is split into contiguous, half-open ranges so that each
//! spreadsheet file stays under the configured row threshold.

use crate::domain::{RekapError, Result};
use std::ops::Range;

/// Contiguous range `[start, end)` of a row sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    /// Index of the first row, inclusive
    pub start: usize,
    /// Index past the last row
    pub end: usize,
}

impl Batch {
    /// Number of rows in the batch
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Range usable for slicing the row sequence
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits `total` rows into batches of at most `batch_size` rows
///
/// Returns `ceil(total / batch_size)` batches covering every index exactly
/// once, in order. An empty sequence yields no batches.
///
/// # Errors
///
/// Returns a validation error when `batch_size` is zero.
pub fn plan_batches(total: usize, batch_size: usize) -> Result<Vec<Batch>> {
    if batch_size == 0 {
        return Err(RekapError::Validation(
            "batch size must be greater than zero".to_string(),
        ));
    }

    let batches = (0..total)
        .step_by(batch_size)
        .map(|start| Batch {
            start,
            end: (start + batch_size).min(total),
        })
        .collect();

    Ok(batches)
}
