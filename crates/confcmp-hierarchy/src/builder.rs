//! Reconstruction of the hierarchy implied by dotted component names.

use confcmp_types::{Configuration, NAME_SEPARATOR};
use indexmap::IndexMap;

use crate::node::{HierarchyNode, NodeKind};

/// Builds a tree of [`HierarchyNode`]s from a flat configuration.
///
/// `ToolSvc.ToolA.Sub` yields a `ToolSvc` group containing a `ToolA` group
/// containing a `Sub` leaf. Siblings keep the order in which they are
/// first seen, unless explicit positions were given, in which case every
/// sibling list is stably sorted by position.
#[derive(Clone, Debug, Default)]
pub struct HierarchyBuilder {
    positions: IndexMap<String, u32>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ordering key of the node at full dotted `path`.
    pub fn with_position(mut self, path: impl Into<String>, x_pos: u32) -> Self {
        self.positions.insert(path.into(), x_pos);
        self
    }

    /// Build the top-level sibling sequence for `config`.
    pub fn build(&self, config: &Configuration) -> Vec<HierarchyNode> {
        let mut roots: Vec<HierarchyNode> = Vec::new();

        for (name, properties) in config {
            let segments: Vec<&str> = name.split(NAME_SEPARATOR).collect();
            let last = segments.len() - 1;
            let mut level = &mut roots;

            for (depth, segment) in segments.iter().enumerate() {
                let path = segments[..=depth].join(".");
                let x_pos = self.position_of(&path, depth);
                let siblings = level;
                let index = match siblings.iter().position(|n| n.name == *segment) {
                    Some(index) => index,
                    None => {
                        siblings.push(if depth == last {
                            HierarchyNode::leaf(*segment, x_pos, properties.clone())
                        } else {
                            HierarchyNode::group(*segment, x_pos)
                        });
                        siblings.len() - 1
                    }
                };

                let node = &mut siblings[index];
                if depth == last {
                    node.properties = Some(properties.clone());
                } else if node.kind == NodeKind::Leaf {
                    // a component that is also the prefix of other components
                    node.kind = NodeKind::Group;
                }
                level = &mut siblings[index].children;
            }
        }

        if !self.positions.is_empty() {
            sort_by_position(&mut roots);
        }
        roots
    }

    fn position_of(&self, path: &str, depth: usize) -> u32 {
        self.positions
            .get(path)
            .copied()
            .unwrap_or_else(|| u32::try_from(depth).unwrap_or(u32::MAX))
    }
}

fn sort_by_position(nodes: &mut [HierarchyNode]) {
    nodes.sort_by_key(|n| n.x_pos);
    for node in nodes {
        sort_by_position(&mut node.children);
    }
}

/// Build the hierarchy of `config` with default ordering.
pub fn build_hierarchy(config: &Configuration) -> Vec<HierarchyNode> {
    HierarchyBuilder::new().build(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::find_node;
    use serde_json::{json, Value};

    fn config(value: Value) -> Configuration {
        Configuration::from_json(value).unwrap()
    }

    fn names(nodes: &[HierarchyNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn flat_names_become_top_level_leaves() {
        let tree = build_hierarchy(&config(json!({"A": {"X": "1"}, "B": {"Y": "2"}})));
        assert_eq!(names(&tree), vec!["A", "B"]);
        assert!(tree.iter().all(HierarchyNode::is_leaf));
        assert_eq!(tree[0].properties.as_ref().unwrap()["X"], json!("1"));
    }

    #[test]
    fn dotted_names_create_groups() {
        let tree = build_hierarchy(&config(json!({
            "ToolSvc.ToolA.Sub": {"p": 1},
            "ToolSvc.ToolB": {},
            "Alg": {}
        })));
        assert_eq!(names(&tree), vec!["ToolSvc", "Alg"]);

        let svc = &tree[0];
        assert!(svc.is_group());
        assert!(svc.properties.is_none());
        assert_eq!(svc.x_pos, 0);
        assert_eq!(names(&svc.children), vec!["ToolA", "ToolB"]);

        let sub = find_node(&tree, "ToolSvc.ToolA.Sub").unwrap();
        assert!(sub.is_leaf());
        assert_eq!(sub.x_pos, 2);
    }

    #[test]
    fn leaf_used_as_prefix_becomes_group_with_properties() {
        let tree = build_hierarchy(&config(json!({
            "Alg": {"Cut": 1},
            "Alg.Tool": {}
        })));
        let alg = &tree[0];
        assert!(alg.is_group());
        assert_eq!(alg.properties.as_ref().unwrap()["Cut"], json!(1));
        assert_eq!(names(&alg.children), vec!["Tool"]);
    }

    #[test]
    fn group_later_named_as_component_gets_properties() {
        let tree = build_hierarchy(&config(json!({
            "Alg.Tool": {},
            "Alg": {"Cut": 1}
        })));
        assert_eq!(tree.len(), 1);
        assert!(tree[0].is_group());
        assert_eq!(tree[0].properties.as_ref().unwrap()["Cut"], json!(1));
    }

    #[test]
    fn siblings_keep_first_seen_order() {
        let tree = build_hierarchy(&config(json!({
            "Top.C": {}, "Top.A": {}, "Other": {}, "Top.B": {}
        })));
        assert_eq!(names(&tree), vec!["Top", "Other"]);
        assert_eq!(names(&tree[0].children), vec!["C", "A", "B"]);
    }

    #[test]
    fn explicit_positions_reorder_siblings() {
        let tree = HierarchyBuilder::new()
            .with_position("Top.C", 9)
            .with_position("Top.A", 1)
            .build(&config(json!({"Top.C": {}, "Top.A": {}, "Top.B": {}})));
        // B keeps its default position (depth 1)
        assert_eq!(names(&tree[0].children), vec!["A", "B", "C"]);
        assert_eq!(tree[0].children[2].x_pos, 9);
    }

    #[test]
    fn empty_configuration_builds_empty_tree() {
        assert!(build_hierarchy(&Configuration::new()).is_empty());
    }
}
