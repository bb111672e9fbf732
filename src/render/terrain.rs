//! Terrain surface pass (world space)
//!
//! Dirt fill down to the bottom of the view, grass strip, surface edge and
//! optional underground texture stripes, all over the visible samples only.

use glam::Vec2;

use super::surface::{Color, LinearGradient, Paint, Surface};
use crate::Viewport;
use crate::consts::{GRASS_DEPTH, GROUND_BASE};
use crate::sim::{Camera, SamplePoint, Terrain};
use crate::{rgb, rgba};

pub const DIRT_STOPS: [(f32, Color); 4] = [
    (0.0, rgb(0x8b6914)),
    (0.3, rgb(0x6b4e12)),
    (0.7, rgb(0x4a3510)),
    (1.0, rgb(0x2d1f08)),
];
pub const GRASS: Color = rgb(0x4a7c2e);
pub const SURFACE_EDGE: Color = rgb(0x2d5a1a);
pub const DIRT_STRIPE: Color = rgba(0x000000, 0.08);

/// Depth offsets (below the grass) of the texture stripes
pub const STRIPE_DEPTHS: [f32; 7] = [30.0, 70.0, 110.0, 150.0, 190.0, 230.0, 270.0];

/// Dirt shading, lighter near the surface
pub fn dirt_paint() -> Paint {
    Paint::LinearGradient(LinearGradient::vertical(
        GROUND_BASE - 150.0,
        GROUND_BASE + 200.0,
        &DIRT_STOPS,
    ))
}

/// Draw the visible terrain. No-op when no cached samples intersect the view.
pub fn draw_terrain(
    surface: &mut dyn Surface,
    terrain: &Terrain,
    camera: &Camera,
    viewport: Viewport,
    texture: bool,
) {
    let (left, right) = camera.visible_span(viewport);
    let Some(range) = terrain.visible_range(left, right) else {
        return;
    };
    let samples = &terrain.samples()[range];
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return;
    };
    let bottom = camera.pos.y + viewport.height;

    // Underground dirt
    trace_surface(surface, samples, 0.0);
    surface.line_to(Vec2::new(last.x, bottom));
    surface.line_to(Vec2::new(first.x, bottom));
    surface.close_path();
    surface.fill(&dirt_paint());

    // Grass strip: along the surface, back along the offset edge
    trace_surface(surface, samples, 0.0);
    for p in samples.iter().rev() {
        surface.line_to(Vec2::new(p.x, p.y + GRASS_DEPTH));
    }
    surface.close_path();
    surface.fill(&Paint::Solid(GRASS));

    // Surface edge
    trace_surface(surface, samples, 0.0);
    surface.stroke(SURFACE_EDGE, 2.0);

    if texture {
        for depth in STRIPE_DEPTHS {
            trace_surface(surface, samples, GRASS_DEPTH + depth);
            surface.stroke(DIRT_STRIPE, 1.0);
        }
    }
}

/// Begin a path following the samples, shifted down by `offset`
fn trace_surface(surface: &mut dyn Surface, samples: &[SamplePoint], offset: f32) {
    surface.begin_path();
    for (i, p) in samples.iter().enumerate() {
        let point = Vec2::new(p.x, p.y + offset);
        if i == 0 {
            surface.move_to(point);
        } else {
            surface.line_to(point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recorder::{DrawCmd, DrawList};

    fn camera_at(x: f32, y: f32) -> Camera {
        let mut camera = Camera::default();
        camera.pos = Vec2::new(x, y);
        camera
    }

    #[test]
    fn test_draws_three_paths_without_texture() {
        let terrain = Terrain::new();
        let mut list = DrawList::default();
        draw_terrain(&mut list, &terrain, &camera_at(600.0, 300.0), Viewport::new(800.0, 600.0), false);

        let paths = list.painted_paths();
        assert_eq!(paths.len(), 3);
        assert!(matches!(paths[0].1, DrawCmd::Fill(Paint::LinearGradient(_))));
        assert_eq!(paths[1].1, DrawCmd::Fill(Paint::Solid(GRASS)));
        assert_eq!(
            paths[2].1,
            DrawCmd::Stroke {
                color: SURFACE_EDGE,
                width: 2.0
            }
        );
    }

    #[test]
    fn test_paths_cover_visible_samples_only() {
        let terrain = Terrain::new();
        let mut list = DrawList::default();
        // Visible span 200..1800 -> sample indices 39..=361
        draw_terrain(&mut list, &terrain, &camera_at(600.0, 300.0), Viewport::new(800.0, 600.0), false);

        let paths = list.painted_paths();
        let edge = &paths[2].0;
        assert_eq!(edge.len(), 361 - 39 + 1);
        assert_eq!(edge[0], Vec2::new(195.0, terrain.samples()[39].y));
        assert_eq!(edge.last().unwrap().x, 1805.0);

        // Dirt closes at the bottom of the view
        let dirt = &paths[0].0;
        assert_eq!(dirt[dirt.len() - 1], Vec2::new(195.0, 900.0));
        assert_eq!(dirt[dirt.len() - 2], Vec2::new(1805.0, 900.0));

        // Grass returns along the surface offset by its depth
        let grass = &paths[1].0;
        assert_eq!(grass.len(), edge.len() * 2);
        assert_eq!(grass.last().unwrap().y, terrain.samples()[39].y + GRASS_DEPTH);
    }

    #[test]
    fn test_texture_stripes() {
        let terrain = Terrain::new();
        let mut list = DrawList::default();
        draw_terrain(&mut list, &terrain, &camera_at(600.0, 300.0), Viewport::new(800.0, 600.0), true);

        let paths = list.painted_paths();
        assert_eq!(paths.len(), 3 + STRIPE_DEPTHS.len());
        let first_stripe = &paths[3].0;
        assert_eq!(first_stripe[0].y, terrain.samples()[39].y + GRASS_DEPTH + 30.0);
    }

    #[test]
    fn test_no_samples_in_view_is_noop() {
        let terrain = Terrain::new();
        let mut list = DrawList::default();
        let far = terrain.generated_up_to() + 5000.0;
        draw_terrain(&mut list, &terrain, &camera_at(far, 300.0), Viewport::new(800.0, 600.0), true);
        assert!(list.is_empty());
    }
}
