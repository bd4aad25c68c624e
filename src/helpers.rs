use egui::Pos2;

/// Symmetric cubic easing used by all diagram transitions.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0., 1.);
    if t < 0.5 {
        4. * t * t * t
    } else {
        let u = -2. * t + 2.;
        1. - u * u * u / 2.
    }
}

pub fn lerp_pos(from: Pos2, to: Pos2, t: f32) -> Pos2 {
    from + (to - from) * t
}
