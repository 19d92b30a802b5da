//! Data source abstraction traits
//!
//! The export pipeline only talks to these traits, so tests can run it
//! against in-memory doubles and other backends can be added later.

use crate::domain::{ExportFilter, ExportKind, OrgNode, Result, RowSet};
use async_trait::async_trait;

/// Source of the records being exported
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetches every row matching `filter`, in source order
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::RekapError::SourceFetch`] when the query fails
    /// and [`crate::domain::RekapError::Database`] when no connection is
    /// available.
    async fn fetch_rows(&self, kind: ExportKind, filter: &ExportFilter) -> Result<RowSet>;

    /// Tests connectivity of the underlying store
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }
}

/// Source of the organizational tree used by bulk exports
#[async_trait]
pub trait HierarchyProvider: Send + Sync {
    /// Returns the full tree rooted at a single node
    async fn get_hierarchy(&self) -> Result<OrgNode>;
}
