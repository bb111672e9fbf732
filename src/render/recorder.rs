//! Recording surface
//!
//! Captures every drawing call as a [`DrawCmd`]. Used to inspect frames in
//! tests and to count draw work in the headless runner.

use glam::Vec2;

use super::surface::{Color, Paint, Surface};

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Save,
    Restore,
    Translate(Vec2),
    SetAlpha(f32),
    Clear(Vec2),
    FillRect { origin: Vec2, size: Vec2, paint: Paint },
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    Arc { center: Vec2, radius: f32, start: f32, end: f32 },
    ClosePath,
    Fill(Paint),
    Stroke { color: Color, width: f32 },
    Text { text: String, at: Vec2, font: String, color: Color },
}

/// Display list of recorded commands
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCmd>,
    depth: usize,
}

impl DrawList {
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
        self.depth = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Current save/restore nesting
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of fill or stroke operations
    pub fn paint_ops(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Fill(_) | DrawCmd::Stroke { .. } | DrawCmd::FillRect { .. }))
            .count()
    }

    /// Points of every path that ended in a paint op, in order
    pub fn painted_paths(&self) -> Vec<(Vec<Vec2>, DrawCmd)> {
        let mut paths = Vec::new();
        let mut current = Vec::new();
        for cmd in &self.commands {
            match cmd {
                DrawCmd::BeginPath => current.clear(),
                DrawCmd::MoveTo(p) | DrawCmd::LineTo(p) => current.push(*p),
                DrawCmd::Arc { center, .. } => current.push(*center),
                DrawCmd::Fill(_) | DrawCmd::Stroke { .. } => {
                    paths.push((current.clone(), cmd.clone()));
                }
                _ => {}
            }
        }
        paths
    }
}

impl Surface for DrawList {
    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCmd::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCmd::Translate(offset));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCmd::SetAlpha(alpha));
    }

    fn clear(&mut self, size: Vec2) {
        self.commands.push(DrawCmd::Clear(size));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint) {
        self.commands.push(DrawCmd::FillRect {
            origin,
            size,
            paint: paint.clone(),
        });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCmd::BeginPath);
    }

    fn move_to(&mut self, p: Vec2) {
        self.commands.push(DrawCmd::MoveTo(p));
    }

    fn line_to(&mut self, p: Vec2) {
        self.commands.push(DrawCmd::LineTo(p));
    }

    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) {
        self.commands.push(DrawCmd::Arc {
            center,
            radius,
            start,
            end,
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCmd::ClosePath);
    }

    fn fill(&mut self, paint: &Paint) {
        self.commands.push(DrawCmd::Fill(paint.clone()));
    }

    fn stroke(&mut self, color: Color, width: f32) {
        self.commands.push(DrawCmd::Stroke { color, width });
    }

    fn fill_text(&mut self, text: &str, at: Vec2, font: &str, color: Color) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            at,
            font: font.to_string(),
            color,
        });
    }
}
