/// Visual constants of the diagram.
#[derive(Debug, Clone)]
pub struct SettingsStyle {
    /// Distance between depth levels; doubles as label width, like the
    /// original diagram.
    pub level_spacing: f32,

    /// Perpendicular units reserved per node when sizing the cartesian
    /// layout extent from the widest level.
    pub breadth_scale: f32,

    pub node_radius: f32,

    /// Stroke width of ordinary edges.
    pub edge_width: f32,

    /// Stroke width of edges on a root-to-goal path.
    pub goal_edge_width: f32,

    pub label_size: f32,

    /// Duration of enter/update/exit transitions, in seconds.
    pub transition_duration: f64,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self {
            level_spacing: 130.,
            breadth_scale: 50.,
            node_radius: 8.,
            edge_width: 1.5,
            goal_edge_width: 5.,
            label_size: 10.,
            transition_duration: 0.75,
        }
    }
}

/// Zoom and pan behaviour.
#[derive(Debug, Clone)]
pub struct SettingsNavigation {
    /// Zoom and pan
    pub zoom_and_pan: bool,

    /// Zoom step
    pub zoom_step: f32,

    /// Scale range the viewport is constrained to.
    pub min_zoom: f32,
    pub max_zoom: f32,

    /// Duration of the recentering animation, in seconds.
    pub center_duration: f64,
}

impl Default for SettingsNavigation {
    fn default() -> Self {
        Self {
            zoom_and_pan: true,
            zoom_step: 0.1,
            min_zoom: 0.05,
            max_zoom: 3.,
            center_duration: 0.75,
        }
    }
}
