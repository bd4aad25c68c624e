use egui::{Id, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::helpers::ease_in_out_cubic;
use crate::settings::SettingsNavigation;

const KEY: &str = "egui_statespace_metadata";

/// An in-flight recentering animation. `start` is egui time in seconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct PanAnimation {
    from: Vec2,
    to: Vec2,
    start: f64,
    duration: f64,
}

/// Pan/zoom transform shared by the whole drawing surface, persisted in
/// egui memory between frames.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Metadata {
    /// Whether the frame is the first one
    pub first_frame: bool,
    /// Current zoom factor
    pub zoom: f32,
    /// Current pan offset (canvas -> widget-local screen coordinates)
    pan: Vec2,

    anim: Option<PanAnimation>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            first_frame: true,
            zoom: 1.,
            pan: Vec2::default(),
            anim: None,
        }
    }
}

impl Metadata {
    pub fn load(ui: &egui::Ui) -> Self {
        ui.data_mut(|data| {
            data.get_persisted::<Metadata>(Id::new(KEY))
                .unwrap_or_default()
        })
    }

    pub fn save(self, ui: &mut egui::Ui) {
        ui.data_mut(|data| {
            data.insert_persisted(Id::new(KEY), self);
        });
    }

    /// Drops the stored transform; the next frame starts from scratch.
    /// Called when a new graph replaces the current one.
    pub fn reset(ctx: &egui::Context) {
        ctx.data_mut(|data| {
            data.insert_persisted(Id::new(KEY), Metadata::default());
        });
    }

    /// The effective pan at the given time, following any recentering
    /// animation currently in flight.
    pub fn pan(&self, now: f64) -> Vec2 {
        match &self.anim {
            Some(a) => {
                let t = ((now - a.start) / a.duration) as f32;
                a.from + (a.to - a.from) * ease_in_out_cubic(t)
            }
            None => self.pan,
        }
    }

    pub fn animating(&self, now: f64) -> bool {
        self.anim
            .as_ref()
            .is_some_and(|a| now - a.start < a.duration)
    }

    /// Moves the pan immediately, cancelling any recentering animation.
    pub fn set_pan(&mut self, pan: Vec2, now: f64) {
        self.settle(now);
        self.pan = pan;
        self.anim = None;
    }

    /// Starts an eased pan towards a transform that puts `canvas_pos` at
    /// the center of `rect`, preserving the current scale.
    pub fn center_on(&mut self, canvas_pos: Pos2, rect: Rect, now: f64, duration: f64) {
        let from = self.pan(now);
        let to = rect.center().to_vec2() - rect.left_top().to_vec2() - canvas_pos.to_vec2() * self.zoom;
        self.pan = to;
        self.anim = Some(PanAnimation {
            from,
            to,
            start: now,
            duration,
        });
    }

    /// Zooms by `delta` keeping `zoom_center` (widget-local) fixed on
    /// screen, clamped to the configured scale range.
    pub fn zoom_at(
        &mut self,
        delta: f32,
        zoom_center: Pos2,
        nav: &SettingsNavigation,
        now: f64,
    ) {
        self.settle(now);
        let new_zoom = (self.zoom * (1. + delta)).clamp(nav.min_zoom, nav.max_zoom);
        if new_zoom == self.zoom {
            return;
        }

        let graph_center = (zoom_center.to_vec2() - self.pan) / self.zoom;
        self.pan += graph_center * self.zoom - graph_center * new_zoom;
        self.zoom = new_zoom;
        self.anim = None;
    }

    // Folds a finished or interrupted animation into the plain pan value.
    fn settle(&mut self, now: f64) {
        if self.anim.is_some() {
            self.pan = self.pan(now);
            self.anim = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_on_targets_viewport_center() {
        let mut m = Metadata::default();
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800., 600.));
        m.center_on(Pos2::new(100., 50.), rect, 0., 0.75);
        // After the animation the point must land at (400, 300).
        let pan = m.pan(10.);
        assert_eq!(Pos2::new(100., 50.) + pan, Pos2::new(400., 300.));
    }

    #[test]
    fn pan_eases_between_endpoints() {
        let mut m = Metadata::default();
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(100., 100.));
        m.set_pan(Vec2::ZERO, 0.);
        m.center_on(Pos2::ZERO, rect, 0., 1.);
        let halfway = m.pan(0.5);
        assert_eq!(halfway, Vec2::new(25., 25.));
        assert!(m.animating(0.5));
        assert!(!m.animating(2.));
    }

    #[test]
    fn zoom_is_clamped_to_scale_range() {
        let nav = SettingsNavigation::default();
        let mut m = Metadata::default();
        for _ in 0..100 {
            m.zoom_at(0.5, Pos2::ZERO, &nav, 0.);
        }
        assert_eq!(m.zoom, nav.max_zoom);
        for _ in 0..100 {
            m.zoom_at(-0.5, Pos2::ZERO, &nav, 0.);
        }
        assert_eq!(m.zoom, nav.min_zoom);
    }

    #[test]
    fn zoom_keeps_the_anchor_point_fixed() {
        let nav = SettingsNavigation::default();
        let mut m = Metadata::default();
        let anchor = Pos2::new(120., 80.);
        // Canvas point currently under the anchor.
        let canvas = (anchor.to_vec2() - m.pan(0.)) / m.zoom;
        m.zoom_at(0.1, anchor, &nav, 0.);
        let after = (canvas * m.zoom + m.pan(0.)).to_pos2();
        assert!((after - anchor).length() < 1e-3);
    }
}
