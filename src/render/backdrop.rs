//! Screen-space backdrop: sky gradient, star field and parallax mountains
//!
//! Drawn before the camera transform. The mountain silhouettes are their own
//! low-amplitude sine sums of the scrolled camera X and never touch the
//! terrain cache.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::surface::{Color, LinearGradient, Paint, Surface, with_alpha};
use crate::Viewport;
use crate::rgb;

pub const SKY_STOPS: [(f32, Color); 3] = [
    (0.0, rgb(0x000510)),
    (0.4, rgb(0x061020)),
    (1.0, rgb(0x0a1628)),
];

/// Star layer seed; fixed so the sky is stable across resizes
pub const STAR_SEED: u64 = 42;
pub const STAR_COUNT: usize = 30;
pub const STAR_COLOR: Color = rgb(0xffffff);

/// One sine term of a silhouette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    pub freq: f32,
    pub phase: f32,
    pub amp: f32,
}

/// A mountain range scrolled at a fraction of the camera speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxLayer {
    /// Fraction of camera motion this layer follows
    pub scroll: f32,
    /// Screen-space spacing between silhouette points
    pub step: f32,
    /// Silhouette baseline as a fraction of view height
    pub baseline: f32,
    pub color: Color,
    pub waves: [Wave; 3],
}

impl ParallaxLayer {
    /// Silhouette height above the baseline at a screen X
    pub fn height_at(&self, screen_x: f32, camera_x: f32) -> f32 {
        let x = screen_x + camera_x * self.scroll;
        self.waves
            .iter()
            .map(|w| (x * w.freq + w.phase).sin() * w.amp)
            .sum()
    }
}

/// Far to near
pub const PARALLAX_LAYERS: [ParallaxLayer; 3] = [
    ParallaxLayer {
        scroll: 0.05,
        step: 50.0,
        baseline: 0.35,
        color: rgb(0x0d1520),
        waves: [
            Wave { freq: 0.0008, phase: 0.0, amp: 80.0 },
            Wave { freq: 0.0015, phase: 2.0, amp: 50.0 },
            Wave { freq: 0.003, phase: 5.0, amp: 25.0 },
        ],
    },
    ParallaxLayer {
        scroll: 0.12,
        step: 40.0,
        baseline: 0.45,
        color: rgb(0x111d2a),
        waves: [
            Wave { freq: 0.0012, phase: 0.0, amp: 60.0 },
            Wave { freq: 0.003, phase: 1.5, amp: 35.0 },
            Wave { freq: 0.005, phase: 3.0, amp: 15.0 },
        ],
    },
    ParallaxLayer {
        scroll: 0.25,
        step: 30.0,
        baseline: 0.55,
        color: rgb(0x1a2a18),
        waves: [
            Wave { freq: 0.002, phase: 0.0, amp: 40.0 },
            Wave { freq: 0.005, phase: 2.2, amp: 25.0 },
            Wave { freq: 0.01, phase: 4.0, amp: 10.0 },
        ],
    },
];

pub fn draw_sky(surface: &mut dyn Surface, viewport: Viewport) {
    let size = Vec2::new(viewport.width, viewport.height);
    surface.clear(size);
    let sky = LinearGradient::vertical(0.0, viewport.height * 0.8, &SKY_STOPS);
    surface.fill_rect(Vec2::ZERO, size, &Paint::LinearGradient(sky));
}

/// Draw the nearest `layers` mountain ranges, farthest first
pub fn draw_parallax(surface: &mut dyn Surface, camera_x: f32, viewport: Viewport, layers: usize) {
    let skip = PARALLAX_LAYERS.len().saturating_sub(layers);
    for layer in &PARALLAX_LAYERS[skip..] {
        let right = viewport.width + layer.step;
        let base = viewport.height * layer.baseline;

        surface.begin_path();
        surface.move_to(Vec2::new(0.0, viewport.height));
        let mut x = 0.0;
        while x <= right {
            surface.line_to(Vec2::new(x, base - layer.height_at(x, camera_x)));
            x += layer.step;
        }
        surface.line_to(Vec2::new(right, viewport.height));
        surface.close_path();
        surface.fill(&Paint::Solid(layer.color));
    }
}

/// A background star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Seeded star layer over the top half of the view
#[derive(Debug, Clone)]
pub struct StarField {
    seed: u64,
    viewport: Viewport,
    stars: Vec<Star>,
}

impl StarField {
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self {
            seed,
            viewport,
            stars: generate_stars(seed, viewport),
        }
    }

    /// Regenerate for a new viewport; same size keeps the same stars
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.stars = generate_stars(self.seed, viewport);
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for star in &self.stars {
            surface.circle(star.pos, star.radius);
            surface.fill(&Paint::Solid(with_alpha(STAR_COLOR, star.alpha)));
        }
    }
}

fn generate_stars(seed: u64, viewport: Viewport) -> Vec<Star> {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..STAR_COUNT)
        .map(|_| {
            let x = rng.random::<f32>() * viewport.width;
            let y = rng.random::<f32>() * viewport.height * 0.5;
            Star {
                pos: Vec2::new(x, y),
                radius: rng.random::<f32>() * 1.5 + 0.5,
                alpha: rng.random::<f32>() * 0.5 + 0.3,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recorder::{DrawCmd, DrawList};

    #[test]
    fn test_same_seed_same_stars() {
        let view = Viewport::new(1024.0, 768.0);
        let a = StarField::new(STAR_SEED, view);
        let b = StarField::new(STAR_SEED, view);
        assert_eq!(a.stars(), b.stars());
        assert_eq!(a.stars().len(), STAR_COUNT);
        assert_ne!(StarField::new(7, view).stars(), a.stars());
    }

    #[test]
    fn test_stars_stay_in_upper_half() {
        let view = Viewport::new(800.0, 600.0);
        let field = StarField::new(STAR_SEED, view);
        for star in field.stars() {
            assert!(star.pos.x >= 0.0 && star.pos.x < 800.0);
            assert!(star.pos.y >= 0.0 && star.pos.y < 300.0);
            assert!(star.radius >= 0.5 && star.radius < 2.0);
            assert!(star.alpha >= 0.3 && star.alpha < 0.8);
        }
    }

    #[test]
    fn test_resize_regenerates_only_on_change() {
        let mut field = StarField::new(STAR_SEED, Viewport::new(800.0, 600.0));
        let before = field.stars().to_vec();
        field.resize(Viewport::new(800.0, 600.0));
        assert_eq!(field.stars(), &before[..]);

        field.resize(Viewport::new(1600.0, 600.0));
        assert_ne!(field.stars(), &before[..]);
        // Same seed, so X simply scales with the width
        for (old, new) in before.iter().zip(field.stars()) {
            assert!((new.pos.x - old.pos.x * 2.0).abs() < 1e-2);
            assert_eq!(new.pos.y, old.pos.y);
        }
    }

    #[test]
    fn test_parallax_layers_scroll_independently() {
        let near = PARALLAX_LAYERS[2];
        let far = PARALLAX_LAYERS[0];
        // Moving the camera by 1000 shifts each layer by its own fraction
        assert!((near.height_at(0.0, 1000.0) - near.height_at(250.0, 0.0)).abs() < 1e-3);
        assert!((far.height_at(0.0, 1000.0) - far.height_at(50.0, 0.0)).abs() < 1e-3);
        assert!((near.height_at(0.0, 1000.0) - near.height_at(0.0, 0.0)).abs() > 1e-3);
    }

    #[test]
    fn test_parallax_draws_requested_layers() {
        let view = Viewport::new(800.0, 600.0);
        let mut list = DrawList::default();
        draw_parallax(&mut list, 1234.0, view, 3);
        let fills: Vec<_> = list
            .painted_paths()
            .into_iter()
            .map(|(_, cmd)| cmd)
            .collect();
        assert_eq!(
            fills,
            PARALLAX_LAYERS
                .iter()
                .map(|l| DrawCmd::Fill(Paint::Solid(l.color)))
                .collect::<Vec<_>>()
        );

        let mut near_only = DrawList::default();
        draw_parallax(&mut near_only, 1234.0, view, 1);
        let paths = near_only.painted_paths();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].1, DrawCmd::Fill(Paint::Solid(PARALLAX_LAYERS[2].color)));
        // Bottom-left anchor, 28 silhouette points (0..=830 step 30), bottom-right anchor
        assert_eq!(paths[0].0.len(), 1 + 28 + 1);
    }

    #[test]
    fn test_sky_fills_view() {
        let mut list = DrawList::default();
        draw_sky(&mut list, Viewport::new(640.0, 480.0));
        assert_eq!(list.commands()[0], DrawCmd::Clear(Vec2::new(640.0, 480.0)));
        assert!(matches!(
            &list.commands()[1],
            DrawCmd::FillRect { paint: Paint::LinearGradient(g), .. } if g.to.y == 384.0
        ));
    }
}
