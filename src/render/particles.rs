//! Dust particle pass (world space)

use rand::Rng;

use super::surface::{Paint, Surface};
use crate::sim::ParticlePool;

/// Draw each particle as a filled circle faded by remaining life
pub fn draw_particles<R: Rng>(surface: &mut dyn Surface, pool: &ParticlePool<R>) {
    if pool.particles().is_empty() {
        return;
    }

    for p in pool.particles() {
        surface.set_alpha(pool.alpha_of(p));
        surface.circle(p.pos, p.radius);
        surface.fill(&Paint::Solid(p.color));
    }
    surface.set_alpha(1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recorder::{DrawCmd, DrawList};
    use crate::sim::VehicleState;
    use glam::Vec2;

    #[test]
    fn test_fades_and_restores_alpha() {
        let mut pool = ParticlePool::new(21);
        let vehicle = VehicleState {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::new(250.0, 0.0),
            angle: 0.0,
            grounded: true,
        };
        for _ in 0..10 {
            pool.update(0.016, &vehicle);
        }
        let count = pool.particles().len();
        assert!(count > 0);

        let mut list = DrawList::default();
        draw_particles(&mut list, &pool);

        let alphas: Vec<f32> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCmd::SetAlpha(a) => Some(*a),
                _ => None,
            })
            .collect();
        assert_eq!(alphas.len(), count + 1);
        assert!(alphas[..count].iter().all(|a| (0.0..=1.0).contains(a)));
        assert_eq!(alphas.last(), Some(&1.0));
        assert_eq!(list.paint_ops(), count);
    }

    #[test]
    fn test_empty_pool_draws_nothing() {
        let pool = ParticlePool::new(0);
        let mut list = DrawList::default();
        draw_particles(&mut list, &pool);
        assert!(list.is_empty());
    }
}
