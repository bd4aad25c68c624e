/// Weight of a parent -> child transition.
///
/// Everything else an edge displays (color, stroke width, goal-path
/// emphasis) is derived from the child node at draw time.
#[derive(Clone, Debug, Default)]
pub struct ActionEdge {
    action: Option<String>,
}

impl ActionEdge {
    pub fn new(action: Option<String>) -> Self {
        Self { action }
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}
