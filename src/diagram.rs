use std::collections::{HashMap, HashSet};

use egui::{Color32, Pos2};
use petgraph::stable_graph::NodeIndex;

use crate::graph::StateTree;
use crate::helpers::{ease_in_out_cubic, lerp_pos};
use crate::layouts::{LayoutMode, TreeLayout};
use crate::settings::SettingsStyle;

/// App-driven actions the widget executes on its next frame, where the
/// viewport and frame clock are available.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshRequest {
    /// First render of a freshly loaded graph.
    Load,
    /// Flip between cartesian and radial projection.
    ToggleMode,
}

/// Ids touched by one reconciliation pass, in tree order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    pub entered: Vec<usize>,
    pub updated: Vec<usize>,
    pub exited: Vec<usize>,
}

/// A node leaving the drawing surface: it keeps animating toward the
/// trigger's position until its transition ends, then disappears.
#[derive(Clone, Debug)]
pub struct ExitGhost {
    pub color: Color32,
    pub on_goal_path: bool,
    pub node_from: Pos2,
    /// Previous (parent, child) layout positions of the edge leading in,
    /// if the node had a drawn parent.
    pub edge_from: Option<(Pos2, Pos2)>,
    pub to: Pos2,
    pub start: f64,
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    from: Pos2,
    to: Pos2,
    start: f64,
}

/// One loaded graph plus everything mutable the renderer needs between
/// passes: projection mode, per-node transitions and exit ghosts.
/// Instantiated once per load and discarded wholesale with it.
#[derive(Debug)]
pub struct Diagram {
    tree: StateTree,
    mode: LayoutMode,
    anims: HashMap<NodeIndex, Transition>,
    ghosts: Vec<ExitGhost>,
    pending: Option<RefreshRequest>,
}

impl Diagram {
    pub fn new(tree: StateTree) -> Self {
        Self {
            tree,
            mode: LayoutMode::default(),
            anims: HashMap::new(),
            ghosts: Vec::new(),
            pending: Some(RefreshRequest::Load),
        }
    }

    pub fn tree(&self) -> &StateTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut StateTree {
        &mut self.tree
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn flip_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn request(&mut self, req: RefreshRequest) {
        self.pending = Some(req);
    }

    pub fn take_request(&mut self) -> Option<RefreshRequest> {
        self.pending.take()
    }

    /// Seeds the origin entering nodes fan out from on the very first
    /// pass. The original diagram starts at the left middle of the view.
    pub fn seed_origin(&mut self, origin: Pos2) {
        let root = self.tree.root();
        if let Some(node) = self.tree.node_mut(root) {
            node.set_pos0(origin);
        }
    }

    /// One render pass triggered at `source`: recompute the layout, mark
    /// goal paths, then reconcile the drawing surface by node id.
    ///
    /// Nodes appearing this pass enter at the trigger's previous position;
    /// surviving nodes animate from their own previous position; nodes that
    /// disappeared become ghosts collapsing toward the trigger's new
    /// position. Previous positions are stashed afterwards.
    pub fn refresh(&mut self, source: NodeIndex, style: &SettingsStyle, now: f64) -> PassStats {
        TreeLayout::new(self.mode, style, &self.tree).apply(&mut self.tree);
        self.tree.mark_goal_paths();

        let src_prev = self.tree.node(source).map_or(Pos2::ZERO, |n| n.pos0());
        let src_new = self.tree.node(source).map_or(Pos2::ZERO, |n| n.pos());

        let visible: HashSet<NodeIndex> = self
            .tree
            .visible_indices()
            .into_iter()
            .map(|(idx, _)| idx)
            .collect();

        let mut stats = PassStats::default();
        for idx in self.tree.node_indices() {
            let visible_now = visible.contains(&idx);
            let Some(node) = self.tree.node(idx) else { continue };
            let (rendered, id) = (node.rendered(), node.id());

            match (rendered, visible_now) {
                (false, true) => {
                    self.anims.insert(
                        idx,
                        Transition {
                            from: src_prev,
                            to: node.pos(),
                            start: now,
                        },
                    );
                    stats.entered.push(id);
                    if let Some(n) = self.tree.node_mut(idx) {
                        n.set_rendered(true);
                    }
                }
                (true, true) => {
                    self.anims.insert(
                        idx,
                        Transition {
                            from: node.pos0(),
                            to: node.pos(),
                            start: now,
                        },
                    );
                    stats.updated.push(id);
                }
                (true, false) => {
                    let edge_from = self
                        .tree
                        .parent(idx)
                        .and_then(|p| self.tree.node(p))
                        .map(|p| (p.pos0(), node.pos0()));
                    self.ghosts.push(ExitGhost {
                        color: node.color(),
                        on_goal_path: node.on_goal_path(),
                        node_from: node.pos0(),
                        edge_from,
                        to: src_new,
                        start: now,
                    });
                    stats.exited.push(id);
                    self.anims.remove(&idx);
                    if let Some(n) = self.tree.node_mut(idx) {
                        n.set_rendered(false);
                    }
                }
                (false, false) => {
                    self.anims.remove(&idx);
                }
            }
        }

        // Stash current coordinates as the previous ones for the next pass.
        for &idx in &visible {
            if let Some(n) = self.tree.node_mut(idx) {
                n.stash_pos();
            }
        }

        stats.entered.sort_unstable();
        stats.updated.sort_unstable();
        stats.exited.sort_unstable();
        stats
    }

    /// Where a node is drawn at `now`, in layout coordinates.
    pub fn display_pos(&self, idx: NodeIndex, now: f64, style: &SettingsStyle) -> Pos2 {
        let settled = self.tree.node(idx).map_or(Pos2::ZERO, |n| n.pos());
        match self.anims.get(&idx) {
            Some(t) => {
                let frac = ((now - t.start) / style.transition_duration) as f32;
                lerp_pos(t.from, t.to, ease_in_out_cubic(frac))
            }
            None => settled,
        }
    }

    pub fn ghosts(&self) -> &[ExitGhost] {
        &self.ghosts
    }

    /// Drops ghosts whose exit transition has finished.
    pub fn prune_ghosts(&mut self, now: f64, style: &SettingsStyle) {
        self.ghosts
            .retain(|g| now - g.start < style.transition_duration);
    }

    /// Whether any transition is still in flight at `now`.
    pub fn animating(&self, now: f64, style: &SettingsStyle) -> bool {
        let live = |start: f64| now - start < style.transition_duration;
        self.anims.values().any(|t| live(t.start)) || self.ghosts.iter().any(|g| live(g.start))
    }
}
