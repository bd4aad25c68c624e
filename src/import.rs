use egui::Color32;
use petgraph::stable_graph::NodeIndex;
use serde::Deserialize;
use thiserror::Error;

use crate::decode::StateDesc;
use crate::graph::{StateTree, TreeBuilder};

/// Fill used when the producer supplied no parsable color.
pub const DEFAULT_NODE_COLOR: Color32 = Color32::from_rgb(70, 130, 180);

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid graph json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw node object as produced by the planning service: a recursive tree
/// with the predicate table attached to the root.
#[derive(Debug, Deserialize)]
struct RawNode {
    name: String,
    #[serde(default)]
    state: Option<StateDesc>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    children: Vec<RawNode>,
    #[serde(default)]
    predicates: Option<Vec<String>>,
}

/// Parses a graph JSON document into a [`StateTree`].
///
/// The whole node set is created in one batch with a fresh id counter; ids
/// follow pre-order document order, so the root always gets id 0.
pub fn import_tree_from_str(text: &str) -> Result<StateTree, ImportError> {
    let raw: RawNode = serde_json::from_str(text)?;
    let predicates = raw.predicates.clone().unwrap_or_default();

    let mut builder = TreeBuilder::new();
    let root = add_subtree(&mut builder, &raw, None);
    Ok(builder.build(root, predicates))
}

fn add_subtree(builder: &mut TreeBuilder, raw: &RawNode, parent: Option<NodeIndex>) -> NodeIndex {
    let color = raw
        .color
        .as_deref()
        .and_then(parse_css_hex)
        .unwrap_or(DEFAULT_NODE_COLOR);
    let state = raw.state.clone().unwrap_or_default();
    let idx = builder.add_state(raw.name.clone(), state, color);
    if let Some(parent) = parent {
        builder.add_transition(parent, idx, raw.action.clone());
    }
    for child in &raw.children {
        add_subtree(builder, child, Some(idx));
    }
    idx
}

/// Accepts `#rgb` and `#rrggbb`; anything else falls back to the default.
fn parse_css_hex(s: &str) -> Option<Color32> {
    let hex = s.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut c = [0u8; 3];
            for (i, ch) in hex.chars().enumerate() {
                let v = ch.to_digit(16)? as u8;
                c[i] = v << 4 | v;
            }
            Some(Color32::from_rgb(c[0], c[1], c[2]))
        }
        6 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            Some(Color32::from_rgb(
                (v >> 16) as u8,
                (v >> 8) as u8,
                v as u8,
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GOAL_NAME;

    const TWO_CHILD_GRAPH: &str = r##"{
        "name": "root",
        "state": "c",
        "color": "#888888",
        "predicates": ["p0", "p1", "p2", "p3"],
        "children": [
            {"name": "goal state", "state": "f", "action": "move a b", "color": "#ff0000"},
            {"name": "dead end", "state": ["p2"], "color": "#00f"}
        ]
    }"##;

    #[test]
    fn imports_nested_tree_with_predicates() {
        let tree = import_tree_from_str(TWO_CHILD_GRAPH).expect("should import");
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.predicates(), ["p0", "p1", "p2", "p3"]);

        let root = tree.root();
        assert_eq!(tree.node(root).unwrap().id(), 0);
        let children = tree.children(root);
        assert_eq!(children.len(), 2);

        let goal = children[0];
        assert_eq!(tree.node(goal).unwrap().name(), GOAL_NAME);
        assert_eq!(tree.node(goal).unwrap().color(), Color32::from_rgb(255, 0, 0));
        let edge = tree.edge_to(goal).and_then(|e| tree.edge(e)).unwrap();
        assert_eq!(edge.action(), Some("move a b"));
    }

    #[test]
    fn expanded_and_packed_states_coexist() {
        let tree = import_tree_from_str(TWO_CHILD_GRAPH).unwrap();
        let children = tree.children(tree.root());
        assert_eq!(tree.describe_state(children[0]).unwrap(), "p0\np1\np2\np3");
        assert_eq!(tree.describe_state(children[1]).unwrap(), "p2");
    }

    #[test]
    fn short_hex_color_expands() {
        let tree = import_tree_from_str(TWO_CHILD_GRAPH).unwrap();
        let dead_end = tree.children(tree.root())[1];
        assert_eq!(
            tree.node(dead_end).unwrap().color(),
            Color32::from_rgb(0, 0, 255)
        );
    }

    #[test]
    fn missing_color_gets_default() {
        let tree = import_tree_from_str(r#"{"name": "root"}"#).unwrap();
        assert_eq!(tree.node(tree.root()).unwrap().color(), DEFAULT_NODE_COLOR);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = import_tree_from_str("{not json").unwrap_err();
        assert!(err.to_string().contains("invalid graph json"));
    }
}
