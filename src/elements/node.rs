use egui::{Color32, Pos2};

use crate::decode::StateDesc;

/// Whether a node's descendants are currently shown.
///
/// Exactly one of the two applies at any time; the descendants themselves
/// always stay in the tree, only traversal stops at a collapsed node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Expanded,
    Collapsed,
}

/// One planning state of the loaded search tree.
#[derive(Clone, Debug)]
pub struct StateNode {
    /// Assigned once at build time, never reassigned. Sole join key for
    /// animation continuity across render passes.
    id: usize,
    name: String,
    state: StateDesc,
    color: Color32,

    visibility: Visibility,
    on_goal_path: bool,

    /// Layout coordinates of the current pass (x = perpendicular axis,
    /// y = depth axis).
    pos: Pos2,
    /// Coordinates stashed from the previous pass, used to seed entering
    /// and exiting transitions.
    pos0: Pos2,
    /// Present on the drawing surface after the last reconciliation.
    rendered: bool,
}

impl StateNode {
    pub fn new(id: usize, name: String, state: StateDesc, color: Color32) -> Self {
        Self {
            id,
            name,
            state,
            color,
            visibility: Visibility::Expanded,
            on_goal_path: false,
            pos: Pos2::ZERO,
            pos0: Pos2::ZERO,
            rendered: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &StateDesc {
        &self.state
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_collapsed(&self) -> bool {
        self.visibility == Visibility::Collapsed
    }

    pub fn set_visibility(&mut self, v: Visibility) {
        self.visibility = v;
    }

    pub fn on_goal_path(&self) -> bool {
        self.on_goal_path
    }

    /// Monotonic for the lifetime of the loaded graph; there is no unset.
    pub fn mark_on_goal_path(&mut self) {
        self.on_goal_path = true;
    }

    pub fn pos(&self) -> Pos2 {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Pos2) {
        self.pos = pos;
    }

    pub fn pos0(&self) -> Pos2 {
        self.pos0
    }

    pub fn stash_pos(&mut self) {
        self.pos0 = self.pos;
    }

    pub fn set_pos0(&mut self, pos: Pos2) {
        self.pos0 = pos;
    }

    pub fn rendered(&self) -> bool {
        self.rendered
    }

    pub fn set_rendered(&mut self, rendered: bool) {
        self.rendered = rendered;
    }
}
