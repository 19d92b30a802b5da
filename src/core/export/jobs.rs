//! Job building for bulk exports
//!
//! Flattens the organizational hierarchy into one export job per node, so the
//! dispatcher never needs to know about the tree.

use crate::domain::naming::normalize_label;
use crate::domain::{ExportFilter, OrgNode};

/// One unit of bulk work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    /// Normalized `"{code} {name}"` of the node
    pub filename: String,

    /// Base filter narrowed to the node's scope
    pub filter: ExportFilter,
}

/// Emits one job per node of `root`, depth-first with children in order
pub fn build_jobs(root: &OrgNode, base: &ExportFilter) -> Vec<ExportJob> {
    let mut jobs = Vec::with_capacity(root.node_count());
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        jobs.push(ExportJob {
            filename: normalize_label(&format!("{} {}", node.code, node.name)),
            filter: base.rescoped(node.level.scope(&node.code)),
        });

        stack.extend(node.children.iter().rev());
    }

    jobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateRange, ExportScope};

    fn base() -> ExportFilter {
        ExportFilter::new(
            ExportScope::National,
            DateRange::parse("2025/01/01", "2025/01/31").unwrap(),
        )
    }

    fn tree() -> OrgNode {
        OrgNode::region("R1", "Regional Jawa").with_child(
            OrgNode::sub_region("51", "Jawa Barat").with_children([
                OrgNode::area("52000", "Bandung").with_children([
                    OrgNode::unit("52001", "ULP Kota"),
                    OrgNode::unit("52002", "ULP Utara"),
                ]),
                OrgNode::area("53000", "Bekasi").with_child(OrgNode::unit("53001", "ULP Bekasi")),
            ]),
        )
    }

    #[test]
    fn test_one_job_per_node() {
        let tree = tree();
        let jobs = build_jobs(&tree, &base());
        assert_eq!(jobs.len(), tree.node_count());
        assert_eq!(jobs.len(), 7);
    }

    #[test]
    fn test_depth_first_order() {
        let names: Vec<String> = build_jobs(&tree(), &base())
            .into_iter()
            .map(|j| j.filename)
            .collect();
        assert_eq!(
            names,
            vec![
                "R1_REGIONAL_JAWA",
                "51_JAWA_BARAT",
                "52000_BANDUNG",
                "52001_ULP_KOTA",
                "52002_ULP_UTARA",
                "53000_BEKASI",
                "53001_ULP_BEKASI",
            ]
        );
    }

    #[test]
    fn test_scope_per_level() {
        let jobs = build_jobs(&tree(), &base());
        assert_eq!(jobs[0].filter.scope, ExportScope::Regional("R1".into()));
        assert_eq!(jobs[1].filter.scope, ExportScope::Region("51".into()));
        assert_eq!(jobs[2].filter.scope, ExportScope::Area("52000".into()));
        assert_eq!(jobs[3].filter.scope, ExportScope::Unit("52001".into()));
        assert!(jobs.iter().all(|j| j.filter.dates == base().dates));
    }

    #[test]
    fn test_single_node() {
        let jobs = build_jobs(&OrgNode::unit("1", "solo"), &base());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].filename, "1_SOLO");
    }
}
