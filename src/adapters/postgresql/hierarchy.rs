//! Organizational hierarchy from the unit tables
//!
//! Each level is read with one query and the tree is assembled in memory.
//! Rows whose parent is missing are logged and left out.

use super::client::PostgresClient;
use crate::adapters::traits::HierarchyProvider;
use crate::config::schema::SourceConfig;
use crate::domain::{OrgLevel, OrgNode, RekapError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_postgres::Row;

/// Name of the synthetic root that owns every region
pub const NATIONAL_ROOT_NAME: &str = "Nasional";

/// One row of a unit table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatUnit {
    pub code: String,
    pub name: String,
    /// Code of the owning node, `None` for regions
    pub parent: Option<String>,
}

impl FlatUnit {
    pub fn new(code: &str, name: &str, parent: Option<&str>) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            parent: parent.map(str::to_string),
        }
    }
}

/// Reads the hierarchy from the primary database
pub struct PostgresHierarchyProvider {
    client: Arc<PostgresClient>,
    relations: SourceConfig,
}

impl PostgresHierarchyProvider {
    pub fn new(client: Arc<PostgresClient>, relations: SourceConfig) -> Self {
        Self { client, relations }
    }

    async fn load(
        &self,
        relation: &str,
        code: &str,
        name: &str,
        parent: Option<&str>,
    ) -> Result<Vec<FlatUnit>> {
        let parent_column = parent
            .map(|p| format!("{p}::text"))
            .unwrap_or_else(|| "NULL::text".to_string());
        let sql = format!(
            "SELECT {code}::text AS code, {name}::text AS name, {parent_column} AS parent \
             FROM {relation} ORDER BY {code}"
        );

        let rows = self.client.query(&sql, &[]).await?;
        rows.iter().map(flat_from_row).collect()
    }
}

fn flat_from_row(row: &Row) -> Result<FlatUnit> {
    let read = |column: &str| {
        row.try_get::<_, Option<String>>(column).map_err(|e| {
            RekapError::SourceFetch(format!("Failed to read hierarchy column '{column}': {e}"))
        })
    };

    Ok(FlatUnit {
        code: read("code")?.unwrap_or_default(),
        name: read("name")?.unwrap_or_default(),
        parent: read("parent")?,
    })
}

#[async_trait]
impl HierarchyProvider for PostgresHierarchyProvider {
    async fn get_hierarchy(&self) -> Result<OrgNode> {
        let r = &self.relations;
        let regions = self
            .load(&r.region_relation, "id_regional", "nama_regional", None)
            .await?;
        let sub_regions = self
            .load(&r.sub_region_relation, "id_unit_upi", "nama_unit_upi", Some("id_regional"))
            .await?;
        let areas = self
            .load(&r.area_relation, "id_unit_ap", "nama_unit_ap", Some("id_unit_upi"))
            .await?;
        let units = self
            .load(&r.unit_relation, "id_unit_up", "nama_unit_up", Some("id_unit_ap"))
            .await?;

        let root = assemble(regions, sub_regions, areas, units);
        tracing::info!(nodes = root.node_count(), "Hierarchy loaded");
        Ok(root)
    }
}

/// Builds the tree from the four flat levels, keeping input order
///
/// A single region becomes the root. Otherwise the regions are placed under
/// a national node.
pub fn assemble(
    regions: Vec<FlatUnit>,
    sub_regions: Vec<FlatUnit>,
    areas: Vec<FlatUnit>,
    units: Vec<FlatUnit>,
) -> OrgNode {
    let areas = attach(OrgLevel::Area, areas, group(OrgLevel::Unit, units));
    let sub_regions = attach(OrgLevel::SubRegion, sub_regions, areas);
    let mut regions = attach(OrgLevel::Region, regions, sub_regions);

    let mut top = regions.remove(&None).unwrap_or_default();
    for (parent, orphans) in regions {
        tracing::warn!(
            parent = ?parent,
            count = orphans.len(),
            "Regions with unexpected parent skipped"
        );
    }

    if top.len() == 1 {
        if let Some(region) = top.pop() {
            return region;
        }
    }
    OrgNode::national(NATIONAL_ROOT_NAME).with_children(top)
}

type Children = HashMap<Option<String>, Vec<OrgNode>>;

fn group(level: OrgLevel, rows: Vec<FlatUnit>) -> Children {
    let mut grouped: Children = HashMap::new();
    for row in rows {
        grouped
            .entry(row.parent)
            .or_default()
            .push(OrgNode::new(level, row.code, row.name));
    }
    grouped
}

fn attach(level: OrgLevel, rows: Vec<FlatUnit>, mut children: Children) -> Children {
    let mut grouped: Children = HashMap::new();
    for row in rows {
        let kids = children.remove(&Some(row.code.clone())).unwrap_or_default();
        grouped
            .entry(row.parent)
            .or_default()
            .push(OrgNode::new(level, row.code, row.name).with_children(kids));
    }

    for (parent, orphans) in children {
        tracing::warn!(
            level = ?level,
            parent = ?parent,
            count = orphans.len(),
            "Hierarchy nodes without a known parent skipped"
        );
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_tree() {
        let root = assemble(
            vec![FlatUnit::new("R1", "Jawa", None)],
            vec![FlatUnit::new("51", "Jawa Barat", Some("R1"))],
            vec![
                FlatUnit::new("52000", "Bandung", Some("51")),
                FlatUnit::new("53000", "Bekasi", Some("51")),
            ],
            vec![
                FlatUnit::new("52001", "Kota", Some("52000")),
                FlatUnit::new("52002", "Utara", Some("52000")),
                FlatUnit::new("53001", "Bekasi Kota", Some("53000")),
            ],
        );

        assert_eq!(root.level, OrgLevel::Region);
        assert_eq!(root.node_count(), 7);

        let sub_region = &root.children[0];
        assert_eq!(sub_region.code, "51");
        assert_eq!(sub_region.children.len(), 2);
        assert_eq!(sub_region.children[0].code, "52000");
        assert_eq!(sub_region.children[0].children.len(), 2);
        assert_eq!(sub_region.children[1].children[0].level, OrgLevel::Unit);
    }

    #[test]
    fn test_orphans_are_skipped() {
        let root = assemble(
            vec![FlatUnit::new("R1", "Jawa", None)],
            vec![FlatUnit::new("51", "Jawa Barat", Some("R1"))],
            vec![FlatUnit::new("52000", "Bandung", Some("99"))],
            vec![FlatUnit::new("52001", "Kota", Some("52000"))],
        );

        assert_eq!(root.node_count(), 2);
    }

    #[test]
    fn test_several_regions_get_national_root() {
        let root = assemble(
            vec![
                FlatUnit::new("R1", "Jawa", None),
                FlatUnit::new("R2", "Sumatera", None),
            ],
            vec![],
            vec![],
            vec![],
        );

        assert_eq!(root.level, OrgLevel::National);
        assert_eq!(root.name, NATIONAL_ROOT_NAME);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].code, "R2");
    }

    #[test]
    fn test_empty_tables() {
        let root = assemble(vec![], vec![], vec![], vec![]);
        assert_eq!(root.level, OrgLevel::National);
        assert!(root.children.is_empty());
    }
}
