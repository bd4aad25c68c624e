use egui::{Id, Pos2, Rect, Response, Sense, Ui, Widget};
use petgraph::stable_graph::NodeIndex;

use crate::diagram::{Diagram, RefreshRequest};
use crate::draw::{diagonal, DrawContext, Drawer, ScreenTransform};
use crate::layouts::project;
use crate::metadata::Metadata;
use crate::settings::{SettingsNavigation, SettingsStyle};

const TOOLTIP_ID: &str = "egui_statespace_tooltip";
const EDGE_HIT_DISTANCE: f32 = 6.;
const EDGE_SAMPLES: usize = 24;

/// Widget rendering a [`Diagram`] as an interactive collapsible tree.
///
/// It implements [`egui::Widget`] and can be used like any other widget.
/// Clicking a node collapses or expands its subtree and recenters the
/// viewport on it; hovering a node or an edge shows a tooltip with the
/// decoded state or the producing action; scroll zooms and drag pans.
pub struct StatespaceView<'a> {
    diagram: &'a mut Diagram,

    settings_style: SettingsStyle,
    settings_navigation: SettingsNavigation,
}

impl<'a> StatespaceView<'a> {
    pub fn new(diagram: &'a mut Diagram) -> Self {
        Self {
            diagram,
            settings_style: SettingsStyle::default(),
            settings_navigation: SettingsNavigation::default(),
        }
    }

    /// Modifies default style settings.
    pub fn with_styles(mut self, settings_style: &SettingsStyle) -> Self {
        self.settings_style = settings_style.clone();
        self
    }

    /// Modifies default behaviour of navigation settings.
    pub fn with_navigations(mut self, settings_navigation: &SettingsNavigation) -> Self {
        self.settings_navigation = settings_navigation.clone();
        self
    }

    /// Resets the stored pan/zoom transform. Call when loading a new graph.
    pub fn reset_metadata(ctx: &egui::Context) {
        Metadata::reset(ctx);
    }
}

impl Widget for &mut StatespaceView<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (resp, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let mut meta = Metadata::load(ui);
        let now = ui.input(|i| i.time);
        let rect = resp.rect;

        self.consume_request(&mut meta, rect, now);
        self.handle_click(&resp, &mut meta, rect, now);
        self.handle_hover(ui, &resp, &meta, rect, now);
        self.handle_navigation(ui, &resp, &mut meta, rect, now);

        self.diagram.prune_ghosts(now, &self.settings_style);

        let ctx = DrawContext {
            painter: &painter,
            style: &self.settings_style,
            transform: self.transform(&meta, rect, now),
            label_color: ui.visuals().text_color(),
            now,
        };
        Drawer::new(self.diagram, &ctx).draw();

        if self.diagram.animating(now, &self.settings_style) || meta.animating(now) {
            ui.ctx().request_repaint();
        }

        meta.save(ui);
        resp
    }
}

impl StatespaceView<'_> {
    fn transform(&self, meta: &Metadata, rect: Rect, now: f64) -> ScreenTransform {
        ScreenTransform {
            zoom: meta.zoom,
            pan: meta.pan(now) + rect.left_top().to_vec2(),
        }
    }

    /// Executes an app-driven load or mode flip now that the viewport
    /// geometry is known.
    fn consume_request(&mut self, meta: &mut Metadata, rect: Rect, now: f64) {
        let Some(req) = self.diagram.take_request() else {
            return;
        };
        match req {
            RefreshRequest::Load => {
                // New nodes fan out from the left middle of the view.
                self.diagram
                    .seed_origin(Pos2::new(rect.height() / 2., 0.));
            }
            RefreshRequest::ToggleMode => self.diagram.flip_mode(),
        }
        let root = self.diagram.tree().root();
        self.diagram.refresh(root, &self.settings_style, now);
        self.center_on(root, meta, rect, now);
        meta.first_frame = false;
    }

    fn handle_click(&mut self, resp: &Response, meta: &mut Metadata, rect: Rect, now: f64) {
        // A drag gesture never reports a click, so pan-then-release does
        // not toggle the node under the pointer.
        if !resp.clicked() {
            return;
        }
        let Some(pointer) = resp.hover_pos() else {
            return;
        };
        let transform = self.transform(meta, rect, now);
        if let Some(idx) = self.node_at(pointer, transform, now) {
            self.diagram.tree_mut().toggle(idx);
            self.diagram.refresh(idx, &self.settings_style, now);
            self.center_on(idx, meta, rect, now);
        }
    }

    fn handle_hover(&self, ui: &Ui, resp: &Response, meta: &Metadata, rect: Rect, now: f64) {
        let Some(pointer) = resp.hover_pos() else {
            return;
        };
        let transform = self.transform(meta, rect, now);

        if let Some(idx) = self.node_at(pointer, transform, now) {
            let tree = self.diagram.tree();
            let Some(node) = tree.node(idx) else { return };
            let description = match tree.describe_state(idx) {
                Ok(d) => d,
                Err(err) => err.to_string(),
            };
            egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), Id::new(TOOLTIP_ID), |ui| {
                ui.label(node.name());
                if !description.is_empty() {
                    ui.label(description);
                }
            });
        } else if let Some(idx) = self.edge_at(pointer, transform, now) {
            let tree = self.diagram.tree();
            let Some(parent) = tree.parent(idx) else { return };
            let action = tree
                .edge_to(idx)
                .and_then(|e| tree.edge(e))
                .and_then(|e| e.action().map(ToOwned::to_owned));
            let (Some(from), Some(to)) = (tree.node(parent), tree.node(idx)) else {
                return;
            };
            let pair = format!("{} \u{21d2} {}", from.name(), to.name());
            egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), Id::new(TOOLTIP_ID), |ui| {
                if let Some(action) = action {
                    ui.label(action);
                }
                ui.label(pair);
            });
        }
    }

    fn handle_navigation(
        &self,
        ui: &Ui,
        resp: &Response,
        meta: &mut Metadata,
        rect: Rect,
        now: f64,
    ) {
        if !self.settings_navigation.zoom_and_pan {
            return;
        }

        ui.input(|i| {
            let delta = i.zoom_delta();
            if delta == 1. {
                return;
            }
            let step = self.settings_navigation.zoom_step * (delta - 1.).signum();
            let center = i
                .pointer
                .hover_pos()
                .map_or_else(|| rect.center() - rect.left_top(), |p| p - rect.left_top())
                .to_pos2();
            meta.zoom_at(step, center, &self.settings_navigation, now);
        });

        if resp.dragged() {
            let pan = meta.pan(now) + resp.drag_delta();
            meta.set_pan(pan, now);
        }
    }

    /// Recenters the viewport on a node's just-stashed position, keeping
    /// the current scale, with an eased animation.
    fn center_on(&self, idx: NodeIndex, meta: &mut Metadata, rect: Rect, now: f64) {
        let Some(node) = self.diagram.tree().node(idx) else {
            return;
        };
        let canvas = project(self.diagram.mode(), node.pos0());
        let local = Rect::from_min_size(Pos2::ZERO, rect.size());
        meta.center_on(canvas, local, now, self.settings_navigation.center_duration);
    }

    fn node_at(&self, pointer: Pos2, transform: ScreenTransform, now: f64) -> Option<NodeIndex> {
        let tree = self.diagram.tree();
        let radius = (self.settings_style.node_radius * transform.zoom)
            .max(self.settings_style.node_radius);
        tree.visible_indices().into_iter().find_map(|(idx, _)| {
            let pos = self.diagram.display_pos(idx, now, &self.settings_style);
            let screen = transform.to_screen(project(self.diagram.mode(), pos));
            ((screen - pointer).length() <= radius).then_some(idx)
        })
    }

    fn edge_at(&self, pointer: Pos2, transform: ScreenTransform, now: f64) -> Option<NodeIndex> {
        let tree = self.diagram.tree();
        for (idx, _) in tree.visible_indices() {
            let Some(parent) = tree.parent(idx) else { continue };
            let from = self.diagram.display_pos(parent, now, &self.settings_style);
            let to = self.diagram.display_pos(idx, now, &self.settings_style);
            let points = diagonal(from, to, self.diagram.mode()).map(|p| transform.to_screen(p));
            let hit = (0..=EDGE_SAMPLES).any(|i| {
                let t = i as f32 / EDGE_SAMPLES as f32;
                (cubic_point(&points, t) - pointer).length() <= EDGE_HIT_DISTANCE
            });
            if hit {
                return Some(idx);
            }
        }
        None
    }
}

fn cubic_point(p: &[Pos2; 4], t: f32) -> Pos2 {
    let u = 1. - t;
    let w = [u * u * u, 3. * u * u * t, 3. * u * t * t, t * t * t];
    Pos2::new(
        w[0] * p[0].x + w[1] * p[1].x + w[2] * p[2].x + w[3] * p[3].x,
        w[0] * p[0].y + w[1] * p[1].y + w[2] * p[2].y + w[3] * p[3].y,
    )
}
