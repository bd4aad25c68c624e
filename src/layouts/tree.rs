use std::collections::HashMap;

use egui::Pos2;
use petgraph::stable_graph::NodeIndex;

use crate::elements::Visibility;
use crate::graph::StateTree;
use crate::settings::SettingsStyle;

/// The two interchangeable projections of the tree diagram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Depth grows rightward, siblings spread vertically.
    #[default]
    Cartesian,
    /// Depth grows outward as radius, siblings spread over 360 degrees.
    Radial,
}

impl LayoutMode {
    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::Cartesian => LayoutMode::Radial,
            LayoutMode::Radial => LayoutMode::Cartesian,
        }
    }
}

/// Tidy-tree layout over the visible subtree.
///
/// Produces layout coordinates per node: `x` on the perpendicular axis
/// (degrees in radial mode), `y = depth * level_spacing` on the depth axis.
/// Recomputing for an unchanged tree yields identical coordinates; node
/// identity, visibility and goal-path flags are never touched.
#[derive(Debug)]
pub struct TreeLayout {
    mode: LayoutMode,
    extent: f32,
    level_spacing: f32,
}

impl TreeLayout {
    /// Sizes the layout for the given tree. The cartesian perpendicular
    /// extent follows the widest level of the full tree (collapsed branches
    /// included) so expanding nodes does not squash the diagram.
    pub fn new(mode: LayoutMode, style: &SettingsStyle, tree: &StateTree) -> Self {
        let extent = match mode {
            LayoutMode::Cartesian => {
                let widest = tree.level_widths().into_iter().max().unwrap_or(1);
                widest as f32 * style.breadth_scale
            }
            LayoutMode::Radial => 360.,
        };
        Self {
            mode,
            extent,
            level_spacing: style.level_spacing,
        }
    }

    /// Assigns coordinates to every visible node and raises the recorded
    /// tree height to the deepest visible level.
    pub fn apply(&self, tree: &mut StateTree) {
        let mut walk = FirstWalk {
            mode: self.mode,
            x: HashMap::new(),
            cursor: 0.,
            prev_leaf_parent: None,
            placed_leaf: false,
        };
        walk.visit(tree, tree.root(), 0);

        let max_x = walk.x.values().fold(0.0f32, |acc, &x| acc.max(x));
        let scale = if max_x > 0. { self.extent / max_x } else { 0. };

        let mut max_depth = 0;
        for (idx, depth) in tree.visible_indices() {
            max_depth = max_depth.max(depth);
            let x = walk.x.get(&idx).copied().unwrap_or_default();
            let x = if max_x > 0. { x * scale } else { self.extent / 2. };
            let y = depth as f32 * self.level_spacing;
            if let Some(node) = tree.node_mut(idx) {
                node.set_pos(Pos2::new(x, y));
            }
        }
        tree.raise_tree_height(max_depth);
    }
}

/// Cartesian: depth along the horizontal axis. Radial: polar point at
/// angle `x - 90` degrees and radius `y`.
pub fn project(mode: LayoutMode, pos: Pos2) -> Pos2 {
    match mode {
        LayoutMode::Cartesian => Pos2::new(pos.y, pos.x),
        LayoutMode::Radial => {
            let angle = (pos.x - 90.).to_radians();
            Pos2::new(pos.y * angle.cos(), pos.y * angle.sin())
        }
    }
}

struct FirstWalk {
    mode: LayoutMode,
    x: HashMap<NodeIndex, f32>,
    cursor: f32,
    prev_leaf_parent: Option<NodeIndex>,
    placed_leaf: bool,
}

impl FirstWalk {
    fn visit(&mut self, tree: &StateTree, idx: NodeIndex, depth: usize) {
        let children = match tree.node(idx) {
            Some(n) if n.visibility() == Visibility::Expanded => tree.children(idx),
            _ => Vec::new(),
        };

        if children.is_empty() {
            if self.placed_leaf {
                let parent = tree.parent(idx);
                let base = if parent == self.prev_leaf_parent { 1. } else { 2. };
                let sep = match self.mode {
                    LayoutMode::Cartesian => base,
                    LayoutMode::Radial => base / depth.max(1) as f32,
                };
                self.cursor += sep;
            }
            self.x.insert(idx, self.cursor);
            self.prev_leaf_parent = tree.parent(idx);
            self.placed_leaf = true;
            return;
        }

        for &child in &children {
            self.visit(tree, child, depth + 1);
        }

        // Parents sit centered over the span of their children.
        let first = self.x[&children[0]];
        let last = self.x[&children[children.len() - 1]];
        self.x.insert(idx, (first + last) / 2.);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::StateDesc;
    use crate::graph::TreeBuilder;
    use egui::Color32;

    fn fan_out(children: usize) -> StateTree {
        let mut b = TreeBuilder::new();
        let root = b.add_state("root".into(), StateDesc::default(), Color32::GRAY);
        for i in 0..children {
            let c = b.add_state(format!("c{i}"), StateDesc::default(), Color32::GRAY);
            b.add_transition(root, c, None);
        }
        b.build(root, vec![])
    }

    fn positions(tree: &StateTree) -> Vec<Pos2> {
        tree.visible_indices()
            .into_iter()
            .map(|(idx, _)| tree.node(idx).unwrap().pos())
            .collect()
    }

    #[test]
    fn depth_axis_uses_level_spacing() {
        let mut tree = fan_out(2);
        let style = SettingsStyle::default();
        TreeLayout::new(LayoutMode::Cartesian, &style, &tree).apply(&mut tree);
        for (idx, depth) in tree.visible_indices() {
            let y = tree.node(idx).unwrap().pos().y;
            assert_eq!(y, depth as f32 * style.level_spacing);
        }
        assert_eq!(tree.tree_height(), 1);
    }

    #[test]
    fn siblings_span_the_extent_and_parent_centers() {
        let mut tree = fan_out(3);
        let style = SettingsStyle::default();
        // Widest level has 3 nodes: extent = 150.
        TreeLayout::new(LayoutMode::Cartesian, &style, &tree).apply(&mut tree);
        let kids = tree.children(tree.root());
        let xs: Vec<f32> = kids
            .iter()
            .map(|&k| tree.node(k).unwrap().pos().x)
            .collect();
        assert_eq!(xs, vec![0., 75., 150.]);
        assert_eq!(tree.node(tree.root()).unwrap().pos().x, 75.);
    }

    #[test]
    fn single_node_centers_on_the_extent() {
        let mut tree = fan_out(0);
        let style = SettingsStyle::default();
        TreeLayout::new(LayoutMode::Cartesian, &style, &tree).apply(&mut tree);
        assert_eq!(tree.node(tree.root()).unwrap().pos(), Pos2::new(25., 0.));
    }

    #[test]
    fn recomputation_is_idempotent() {
        let mut tree = fan_out(4);
        let style = SettingsStyle::default();
        let layout = TreeLayout::new(LayoutMode::Radial, &style, &tree);
        layout.apply(&mut tree);
        let first = positions(&tree);
        layout.apply(&mut tree);
        assert_eq!(first, positions(&tree));
    }

    #[test]
    fn mode_switch_roundtrip_restores_coordinates() {
        let mut tree = fan_out(3);
        let style = SettingsStyle::default();
        TreeLayout::new(LayoutMode::Cartesian, &style, &tree).apply(&mut tree);
        let cartesian = positions(&tree);
        TreeLayout::new(LayoutMode::Radial, &style, &tree).apply(&mut tree);
        TreeLayout::new(LayoutMode::Cartesian, &style, &tree).apply(&mut tree);
        assert_eq!(cartesian, positions(&tree));
    }

    #[test]
    fn mode_switch_preserves_identity_and_visibility() {
        let mut tree = fan_out(2);
        let style = SettingsStyle::default();
        tree.toggle(tree.root());
        let ids: Vec<usize> = tree
            .node_indices()
            .into_iter()
            .map(|i| tree.node(i).unwrap().id())
            .collect();
        TreeLayout::new(LayoutMode::Radial, &style, &tree).apply(&mut tree);
        let ids_after: Vec<usize> = tree
            .node_indices()
            .into_iter()
            .map(|i| tree.node(i).unwrap().id())
            .collect();
        assert_eq!(ids, ids_after);
        assert!(tree.node(tree.root()).unwrap().is_collapsed());
    }

    #[test]
    fn radial_projection_places_root_at_origin() {
        let p = project(LayoutMode::Radial, Pos2::new(123., 0.));
        assert_eq!(p, Pos2::new(0., 0.));
    }

    #[test]
    fn cartesian_projection_swaps_axes() {
        let p = project(LayoutMode::Cartesian, Pos2::new(40., 130.));
        assert_eq!(p, Pos2::new(130., 40.));
    }
}
