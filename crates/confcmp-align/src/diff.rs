use confcmp_hierarchy::{HierarchyBuilder, HierarchyNode};
use confcmp_types::Configuration;
use serde::{Deserialize, Serialize};

use crate::align::{mark_differences, AlignmentReport};

/// Two marked hierarchies and the report of the alignment that marked them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HierarchyDiff {
    pub left: Vec<HierarchyNode>,
    pub right: Vec<HierarchyNode>,
    pub report: AlignmentReport,
}

impl HierarchyDiff {
    /// Returns `true` if neither side has a node without a counterpart.
    pub fn is_identical(&self) -> bool {
        self.report.is_identical()
    }
}

/// Build both hierarchies with `builder` and align them.
pub fn diff_configurations(
    left: &Configuration,
    right: &Configuration,
    builder: &HierarchyBuilder,
) -> HierarchyDiff {
    let mut left = builder.build(left);
    let mut right = builder.build(right);
    let report = mark_differences(&mut left, &mut right);
    HierarchyDiff {
        left,
        right,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn diff_of_configurations_keeps_both_trees() {
        let left = Configuration::from_json(json!({"A": {}, "B": {}, "C": {}})).unwrap();
        let right = Configuration::from_json(json!({"A": {}, "C": {}})).unwrap();
        let diff = diff_configurations(&left, &right, &HierarchyBuilder::new());

        assert!(!diff.is_identical());
        assert_eq!(diff.left.len(), 3);
        assert_eq!(diff.right.len(), 2);
        assert!(diff.left[1].marked);
        assert_eq!(diff.report.left_marked, vec!["B"]);
    }

    #[test]
    fn same_configuration_is_identical() {
        let conf = Configuration::from_json(json!({"Svc.Tool": {"x": 1}})).unwrap();
        let diff = diff_configurations(&conf, &conf, &HierarchyBuilder::new());
        assert!(diff.is_identical());
        assert_eq!(diff.report.sub_alignments, vec!["Svc"]);
    }
}
