use egui::Color32;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Directed;
use petgraph::Direction::{Incoming, Outgoing};

use crate::decode::{describe, DecodeError, StateDesc};
use crate::elements::{ActionEdge, StateNode, Visibility};

/// Display name the planner gives to goal nodes.
pub const GOAL_NAME: &str = "goal state";

/// The loaded search tree: one node per planning state, one edge per
/// (parent, child) transition, plus the root's predicate table used to
/// decode packed states.
///
/// Nodes and edges are created in one batch at load time and never removed;
/// stable indices double as drawing identity for the whole graph lifetime.
#[derive(Debug, Default)]
pub struct StateTree {
    g: StableGraph<StateNode, ActionEdge, Directed>,
    root: NodeIndex,
    predicates: Vec<String>,
    tree_height: usize,
}

impl StateTree {
    pub fn new(
        g: StableGraph<StateNode, ActionEdge, Directed>,
        root: NodeIndex,
        predicates: Vec<String>,
    ) -> Self {
        Self {
            g,
            root,
            predicates,
            tree_height: 0,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    /// Maximum visible depth seen so far. Monotonic: collapsing deep
    /// branches does not shrink it.
    pub fn tree_height(&self) -> usize {
        self.tree_height
    }

    pub fn raise_tree_height(&mut self, depth: usize) {
        if depth > self.tree_height {
            self.tree_height = depth;
        }
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&StateNode> {
        self.g.node_weight(idx)
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut StateNode> {
        self.g.node_weight_mut(idx)
    }

    pub fn edge(&self, idx: EdgeIndex) -> Option<&ActionEdge> {
        self.g.edge_weight(idx)
    }

    pub fn edge_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.g.edge_endpoints(idx)
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.g.neighbors_directed(idx, Incoming).next()
    }

    /// Children in insertion order. petgraph iterates neighbors most
    /// recent first, so the collected list is reversed.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.g.neighbors_directed(idx, Outgoing).collect();
        out.reverse();
        out
    }

    /// The edge leading into a node from its parent, if any.
    pub fn edge_to(&self, idx: NodeIndex) -> Option<EdgeIndex> {
        self.g.edges_directed(idx, Incoming).next().map(|e| e.id())
    }

    pub fn node_indices(&self) -> Vec<NodeIndex> {
        self.g.node_indices().collect()
    }

    /// Pre-order traversal of the currently visible subtree, with the depth
    /// of each node. Descent stops at collapsed nodes; their descendants
    /// stay in the graph but are not reported.
    pub fn visible_indices(&self) -> Vec<(NodeIndex, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            let Some(node) = self.node(idx) else { continue };
            out.push((idx, depth));
            if node.visibility() == Visibility::Expanded {
                for child in self.children(idx).into_iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
        out
    }

    /// Flips a node between expanded and collapsed. Children storage is
    /// untouched, so toggling twice restores the exact previous state.
    pub fn toggle(&mut self, idx: NodeIndex) {
        if self.children(idx).is_empty() {
            return;
        }
        if let Some(node) = self.node_mut(idx) {
            let flipped = match node.visibility() {
                Visibility::Expanded => Visibility::Collapsed,
                Visibility::Collapsed => Visibility::Expanded,
            };
            node.set_visibility(flipped);
        }
    }

    /// Walks up from every goal node flagging the path back to the root.
    /// The root itself is left unflagged. Flags are never cleared.
    pub fn mark_goal_paths(&mut self) {
        let goals: Vec<NodeIndex> = self
            .g
            .node_indices()
            .filter(|&idx| self.g[idx].name() == GOAL_NAME)
            .collect();
        for goal in goals {
            let mut cur = goal;
            while cur != self.root {
                self.g[cur].mark_on_goal_path();
                let Some(parent) = self.parent(cur) else { break };
                cur = parent;
            }
        }
    }

    /// Breadth histogram over the full tree, collapsed branches included:
    /// entry `d` is the number of nodes at depth `d`.
    pub fn level_widths(&self) -> Vec<usize> {
        let mut widths = vec![1usize];
        let mut stack = vec![(self.root, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            let children = self.children(idx);
            if children.is_empty() {
                continue;
            }
            if widths.len() <= depth + 1 {
                widths.push(children.len());
            } else {
                widths[depth + 1] += children.len();
            }
            for child in children {
                stack.push((child, depth + 1));
            }
        }
        widths
    }

    /// Decodes a node's state against the root's predicate table.
    pub fn describe_state(&self, idx: NodeIndex) -> Result<String, DecodeError> {
        match self.node(idx) {
            Some(node) => describe(node.state(), &self.predicates),
            None => Ok(String::new()),
        }
    }
}

/// Incrementally builds a [`StateTree`], assigning each node the next id
/// from a monotonic counter.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    g: StableGraph<StateNode, ActionEdge, Directed>,
    counter: usize,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, name: String, state: StateDesc, color: Color32) -> NodeIndex {
        let id = self.counter;
        self.counter += 1;
        self.g.add_node(StateNode::new(id, name, state, color))
    }

    pub fn add_transition(
        &mut self,
        parent: NodeIndex,
        child: NodeIndex,
        action: Option<String>,
    ) -> EdgeIndex {
        self.g.add_edge(parent, child, ActionEdge::new(action))
    }

    pub fn build(self, root: NodeIndex, predicates: Vec<String>) -> StateTree {
        StateTree::new(self.g, root, predicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_with_goal(depth: usize) -> StateTree {
        // root -> s1 -> ... -> goal at the given depth
        let mut b = TreeBuilder::new();
        let root = b.add_state("root".into(), StateDesc::default(), Color32::GRAY);
        let mut prev = root;
        for d in 1..=depth {
            let name = if d == depth {
                GOAL_NAME.to_string()
            } else {
                format!("s{d}")
            };
            let n = b.add_state(name, StateDesc::default(), Color32::GRAY);
            b.add_transition(prev, n, Some(format!("a{d}")));
            prev = n;
        }
        b.build(root, vec![])
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut b = TreeBuilder::new();
        let root = b.add_state("root".into(), StateDesc::default(), Color32::GRAY);
        let a = b.add_state("a".into(), StateDesc::default(), Color32::GRAY);
        let c = b.add_state("c".into(), StateDesc::default(), Color32::GRAY);
        b.add_transition(root, a, None);
        b.add_transition(root, c, None);
        let tree = b.build(root, vec![]);
        assert_eq!(tree.children(root), vec![a, c]);
    }

    #[test]
    fn goal_path_flags_goal_and_proper_ancestors_except_root() {
        let tree = {
            let mut t = chain_with_goal(3);
            t.mark_goal_paths();
            t
        };
        let flagged: Vec<&str> = tree
            .node_indices()
            .into_iter()
            .filter(|&i| tree.node(i).unwrap().on_goal_path())
            .map(|i| tree.node(i).unwrap().name())
            .collect();
        assert_eq!(flagged, vec!["s1", "s2", GOAL_NAME]);
    }

    #[test]
    fn goal_path_is_monotonic_across_passes() {
        let mut tree = chain_with_goal(2);
        tree.mark_goal_paths();
        tree.mark_goal_paths();
        let flagged = tree
            .node_indices()
            .into_iter()
            .filter(|&i| tree.node(i).unwrap().on_goal_path())
            .count();
        assert_eq!(flagged, 2);
    }

    #[test]
    fn toggle_is_a_bijection() {
        let mut tree = chain_with_goal(2);
        let root = tree.root();
        let before = tree.children(root);
        tree.toggle(root);
        assert!(tree.node(root).unwrap().is_collapsed());
        assert_eq!(tree.visible_indices().len(), 1);
        tree.toggle(root);
        assert!(!tree.node(root).unwrap().is_collapsed());
        assert_eq!(tree.children(root), before);
        assert_eq!(tree.visible_indices().len(), 3);
    }

    #[test]
    fn toggle_on_leaf_is_a_noop() {
        let mut tree = chain_with_goal(1);
        let goal = *tree
            .children(tree.root())
            .first()
            .expect("root has one child");
        tree.toggle(goal);
        assert!(!tree.node(goal).unwrap().is_collapsed());
    }

    #[test]
    fn level_widths_count_collapsed_branches() {
        let mut b = TreeBuilder::new();
        let root = b.add_state("root".into(), StateDesc::default(), Color32::GRAY);
        let mid = b.add_state("mid".into(), StateDesc::default(), Color32::GRAY);
        b.add_transition(root, mid, None);
        for i in 0..3 {
            let leaf = b.add_state(format!("leaf{i}"), StateDesc::default(), Color32::GRAY);
            b.add_transition(mid, leaf, None);
        }
        let mut tree = b.build(root, vec![]);
        tree.toggle(mid);
        assert_eq!(tree.level_widths(), vec![1, 1, 3]);
    }

    #[test]
    fn visible_traversal_stops_at_collapsed_nodes() {
        let mut tree = chain_with_goal(3);
        let s1 = *tree.children(tree.root()).first().unwrap();
        tree.toggle(s1);
        let visible: Vec<usize> = tree.visible_indices().iter().map(|&(_, d)| d).collect();
        assert_eq!(visible, vec![0, 1]);
    }
}
