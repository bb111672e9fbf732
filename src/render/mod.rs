//! Rendering
//!
//! Backend-agnostic: every pass draws through the [`Surface`] trait. The
//! browser frontend implements it over Canvas2D; tests and the headless
//! runner use the recording [`DrawList`].

pub mod backdrop;
pub mod fuel;
pub mod particles;
pub mod recorder;
pub mod surface;
pub mod terrain;

pub use backdrop::{PARALLAX_LAYERS, ParallaxLayer, STAR_SEED, Star, StarField, draw_parallax, draw_sky};
pub use fuel::draw_fuel;
pub use particles::draw_particles;
pub use recorder::{DrawCmd, DrawList};
pub use surface::{Color, LinearGradient, Paint, Surface, css_color, with_alpha};
pub use terrain::draw_terrain;

use crate::Viewport;
use crate::settings::Settings;
use crate::sim::Session;

/// Frame renderer; owns the screen-space state that outlives a frame
#[derive(Debug, Clone)]
pub struct Renderer {
    stars: StarField,
}

impl Renderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            stars: StarField::new(STAR_SEED, viewport),
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.stars.resize(viewport);
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    /// Draw one frame: backdrop in screen space, then the world pass under
    /// the camera transform
    pub fn draw(&mut self, surface: &mut dyn Surface, session: &Session, settings: &Settings) {
        let viewport = session.viewport();
        let camera = session.camera();
        let quality = settings.quality;

        self.stars.resize(viewport);

        draw_sky(surface, viewport);
        if quality.starfield_enabled() {
            self.stars.draw(surface);
        }
        draw_parallax(surface, camera.pos.x, viewport, quality.parallax_layers());

        surface.save();
        surface.translate(camera.world_offset(viewport));

        draw_terrain(surface, session.terrain(), camera, viewport, quality.dirt_texture());
        draw_fuel(surface, session.fuel(), settings.pickup_effects);
        if settings.particles {
            draw_particles(surface, session.particles());
        }

        surface.restore();
    }
}
