//! 2D drawing surface abstraction
//!
//! Mirrors the Canvas2D path model: build a path, then fill or stroke it.
//! World passes run inside a `save`/`translate`/`restore` bracket.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

/// Linear RGBA color, each channel in `[0, 1]`
pub type Color = [f32; 4];

/// Fill paint
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
}

/// Gradient along the line `from -> to`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub from: Vec2,
    pub to: Vec2,
    /// `(offset in [0, 1], color)` in increasing offset order
    pub stops: Vec<(f32, Color)>,
}

impl LinearGradient {
    pub fn vertical(top: f32, bottom: f32, stops: &[(f32, Color)]) -> Self {
        Self {
            from: Vec2::new(0.0, top),
            to: Vec2::new(0.0, bottom),
            stops: stops.to_vec(),
        }
    }
}

/// Everything the render passes need from a drawing backend
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    /// Global opacity applied to subsequent draws
    fn set_alpha(&mut self, alpha: f32);

    fn clear(&mut self, size: Vec2);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint);

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Vec2);
    fn line_to(&mut self, p: Vec2);
    /// Clockwise (in screen space) arc from `start` to `end` radians
    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32);
    fn close_path(&mut self);

    fn fill(&mut self, paint: &Paint);
    fn stroke(&mut self, color: Color, width: f32);
    /// Text centered on `at`
    fn fill_text(&mut self, text: &str, at: Vec2, font: &str, color: Color);

    /// Start a new path holding a full circle
    fn circle(&mut self, center: Vec2, radius: f32) {
        self.begin_path();
        self.arc(center, radius, 0.0, TAU);
    }

    /// Start a new path holding a rounded rectangle
    fn round_rect(&mut self, origin: Vec2, size: Vec2, radius: f32) {
        let r = radius.min(size.x * 0.5).min(size.y * 0.5).max(0.0);
        let (x0, y0) = (origin.x, origin.y);
        let (x1, y1) = (origin.x + size.x, origin.y + size.y);

        self.begin_path();
        self.move_to(Vec2::new(x0 + r, y0));
        self.line_to(Vec2::new(x1 - r, y0));
        self.arc(Vec2::new(x1 - r, y0 + r), r, -FRAC_PI_2, 0.0);
        self.line_to(Vec2::new(x1, y1 - r));
        self.arc(Vec2::new(x1 - r, y1 - r), r, 0.0, FRAC_PI_2);
        self.line_to(Vec2::new(x0 + r, y1));
        self.arc(Vec2::new(x0 + r, y1 - r), r, FRAC_PI_2, PI);
        self.line_to(Vec2::new(x0, y0 + r));
        self.arc(Vec2::new(x0 + r, y0 + r), r, PI, PI + FRAC_PI_2);
        self.close_path();
    }
}

/// CSS `rgba()` string for a color
pub fn css_color(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({},{},{},{})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

/// Same color with a different alpha
#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recorder::{DrawCmd, DrawList};
    use crate::{rgb, rgba};

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(rgb(0x39ff14)), "rgba(57,255,20,1)");
        assert_eq!(css_color(rgba(0x000000, 0.08)), "rgba(0,0,0,0.08)");
        assert_eq!(css_color([2.0, -1.0, 0.5, 3.0]), "rgba(255,0,128,1)");
    }

    #[test]
    fn test_round_rect_path() {
        let mut list = DrawList::default();
        list.round_rect(Vec2::new(-11.0, -11.0), Vec2::new(22.0, 22.0), 3.0);
        let cmds = list.commands();
        assert_eq!(cmds[0], DrawCmd::BeginPath);
        assert_eq!(cmds[1], DrawCmd::MoveTo(Vec2::new(-8.0, -11.0)));
        assert_eq!(cmds.iter().filter(|c| matches!(c, DrawCmd::Arc { .. })).count(), 4);
        assert_eq!(cmds.last(), Some(&DrawCmd::ClosePath));
    }

    #[test]
    fn test_round_rect_radius_clamped() {
        let mut list = DrawList::default();
        list.round_rect(Vec2::ZERO, Vec2::new(4.0, 10.0), 9.0);
        assert!(list.commands().iter().all(|c| match c {
            DrawCmd::Arc { radius, .. } => *radius == 2.0,
            _ => true,
        }));
    }
}
