//! Organizational hierarchy
//!
//! The hierarchy is read-only input to the job builder: a region owns
//! sub-regions, a sub-region owns areas and an area owns units. Regions may
//! also own areas directly when a deployment has no sub-region layer. Trees
//! with several regions hang them under a single national root.

use crate::domain::filter::ExportScope;
use serde::{Deserialize, Serialize};

/// Level of a node in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgLevel {
    National,
    Region,
    SubRegion,
    Area,
    Unit,
}

impl OrgLevel {
    /// Export scope used for a node at this level
    pub fn scope(&self, code: &str) -> ExportScope {
        match self {
            OrgLevel::National => ExportScope::National,
            OrgLevel::Region => ExportScope::Regional(code.to_string()),
            OrgLevel::SubRegion => ExportScope::Region(code.to_string()),
            OrgLevel::Area => ExportScope::Area(code.to_string()),
            OrgLevel::Unit => ExportScope::Unit(code.to_string()),
        }
    }
}

/// One node of the organizational tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgNode {
    pub level: OrgLevel,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<OrgNode>,
}

impl OrgNode {
    /// Creates a childless node
    pub fn new(level: OrgLevel, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            level,
            code: code.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn national(name: impl Into<String>) -> Self {
        Self::new(OrgLevel::National, "", name)
    }

    pub fn region(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(OrgLevel::Region, code, name)
    }

    pub fn sub_region(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(OrgLevel::SubRegion, code, name)
    }

    pub fn area(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(OrgLevel::Area, code, name)
    }

    pub fn unit(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(OrgLevel::Unit, code, name)
    }

    /// Adds a child and returns the node
    pub fn with_child(mut self, child: OrgNode) -> Self {
        self.children.push(child);
        self
    }

    /// Adds several children and returns the node
    pub fn with_children(mut self, children: impl IntoIterator<Item = OrgNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(OrgNode::node_count).sum::<usize>()
    }
}
