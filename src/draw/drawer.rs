use egui::epaint::CubicBezierShape;
use egui::{Align2, Color32, FontId, Painter, Pos2, Stroke, Vec2};

use crate::diagram::Diagram;
use crate::helpers::lerp_pos;
use crate::layouts::{project, LayoutMode};
use crate::settings::SettingsStyle;

const COLLAPSED_STROKE: Color32 = Color32::from_rgb(0, 255, 0);

/// Resolved pan/zoom for the current frame, including the widget's screen
/// offset.
#[derive(Clone, Copy, Debug)]
pub struct ScreenTransform {
    pub zoom: f32,
    pub pan: Vec2,
}

impl ScreenTransform {
    pub fn to_screen(&self, canvas: Pos2) -> Pos2 {
        (canvas.to_vec2() * self.zoom + self.pan).to_pos2()
    }
}

/// Everything the drawer needs for one frame.
pub struct DrawContext<'a> {
    pub painter: &'a Painter,
    pub style: &'a SettingsStyle,
    pub transform: ScreenTransform,
    pub label_color: Color32,
    pub now: f64,
}

/// Control points of the axis-aligned cubic "diagonal" between two layout
/// positions: both control points sit at the mid-depth coordinate, so the
/// curve leaves and enters along the depth axis after projection.
pub fn diagonal(from: Pos2, to: Pos2, mode: LayoutMode) -> [Pos2; 4] {
    let mid = (from.y + to.y) / 2.;
    [
        project(mode, from),
        project(mode, Pos2::new(from.x, mid)),
        project(mode, Pos2::new(to.x, mid)),
        project(mode, to),
    ]
}

pub struct Drawer<'a> {
    diagram: &'a Diagram,
    ctx: &'a DrawContext<'a>,
}

impl<'a> Drawer<'a> {
    pub fn new(diagram: &'a Diagram, ctx: &'a DrawContext<'a>) -> Self {
        Self { diagram, ctx }
    }

    pub fn draw(&self) {
        self.draw_edges();
        self.draw_ghosts();
        self.draw_nodes();
    }

    fn edge_stroke(&self, color: Color32, on_goal_path: bool) -> Stroke {
        let width = if on_goal_path {
            self.ctx.style.goal_edge_width
        } else {
            self.ctx.style.edge_width
        };
        Stroke::new(width * self.ctx.transform.zoom, color)
    }

    fn draw_diagonal(&self, from: Pos2, to: Pos2, stroke: Stroke) {
        let points = diagonal(from, to, self.diagram.mode())
            .map(|p| self.ctx.transform.to_screen(p));
        self.ctx.painter.add(CubicBezierShape::from_points_stroke(
            points,
            false,
            Color32::TRANSPARENT,
            stroke,
        ));
    }

    fn draw_edges(&self) {
        let tree = self.diagram.tree();
        for (idx, _) in tree.visible_indices() {
            let Some(parent) = tree.parent(idx) else { continue };
            let Some(child) = tree.node(idx) else { continue };

            let from = self.diagram.display_pos(parent, self.ctx.now, self.ctx.style);
            let to = self.diagram.display_pos(idx, self.ctx.now, self.ctx.style);
            let stroke = self.edge_stroke(child.color(), child.on_goal_path());
            self.draw_diagonal(from, to, stroke);
        }
    }

    fn draw_ghosts(&self) {
        for ghost in self.diagram.ghosts() {
            let frac = ((self.ctx.now - ghost.start) / self.ctx.style.transition_duration) as f32;
            let t = crate::helpers::ease_in_out_cubic(frac);

            if let Some((edge_from, edge_to)) = ghost.edge_from {
                // Both endpoints collapse onto the trigger's position.
                let from = lerp_pos(edge_from, ghost.to, t);
                let to = lerp_pos(edge_to, ghost.to, t);
                let stroke = self.edge_stroke(ghost.color, ghost.on_goal_path);
                self.draw_diagonal(from, to, stroke);
            }

            let pos = lerp_pos(ghost.node_from, ghost.to, t);
            let screen = self
                .ctx
                .transform
                .to_screen(project(self.diagram.mode(), pos));
            self.ctx.painter.circle_filled(
                screen,
                self.ctx.style.node_radius * self.ctx.transform.zoom,
                ghost.color,
            );
        }
    }

    fn draw_nodes(&self) {
        let tree = self.diagram.tree();
        let zoom = self.ctx.transform.zoom;
        for (idx, _) in tree.visible_indices() {
            let Some(node) = tree.node(idx) else { continue };

            let pos = self.diagram.display_pos(idx, self.ctx.now, self.ctx.style);
            let screen = self
                .ctx
                .transform
                .to_screen(project(self.diagram.mode(), pos));

            let outline = if node.is_collapsed() {
                COLLAPSED_STROKE
            } else {
                Color32::BLACK
            };
            self.ctx
                .painter
                .circle_filled(screen, self.ctx.style.node_radius * zoom, node.color());
            self.ctx.painter.circle_stroke(
                screen,
                self.ctx.style.node_radius * zoom,
                Stroke::new(1.5 * zoom, outline),
            );

            // Labels anchor away from the side the children grow on.
            let has_children = !tree.children(idx).is_empty();
            let (offset, anchor) = if has_children {
                (Vec2::new(-10., -10.), Align2::RIGHT_CENTER)
            } else {
                (Vec2::new(10., -10.), Align2::LEFT_CENTER)
            };
            self.ctx.painter.text(
                screen + offset * zoom,
                anchor,
                node.name(),
                FontId::proportional(self.ctx.style.label_size * zoom),
                self.ctx.label_color,
            );
        }
    }
}
