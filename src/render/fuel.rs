//! Fuel can and pickup ring pass (world space)

use glam::Vec2;
use rand::Rng;

use super::surface::{Color, Paint, Surface, with_alpha};
use crate::sim::FuelSystem;
use crate::{rgb, rgba};

pub const CAN_GLOW: Color = rgba(0x39ff14, 0.15);
pub const CAN_BODY: Color = rgb(0x39ff14);
pub const CAN_LABEL: Color = rgb(0x000000);
pub const CAN_FONT: &str = "bold 12px \"Press Start 2P\", monospace";
pub const CAN_CORNER: f32 = 3.0;

/// Ring radius at the start of a pickup effect
pub const RING_START_RADIUS: f32 = 15.0;
/// Ring radius gained over the effect's lifetime
pub const RING_GROWTH: f32 = 30.0;

/// Ring radius and opacity at an elapsed fraction `t` of the effect
pub fn ring_at(t: f32) -> (f32, f32) {
    (RING_START_RADIUS + t * RING_GROWTH, 1.0 - t)
}

/// Draw uncollected cans and active pickup rings
pub fn draw_fuel<R: Rng>(surface: &mut dyn Surface, fuel: &FuelSystem<R>, pickup_effects: bool) {
    let size = fuel.tuning().can_size;

    for can in fuel.cans().iter().filter(|c| !c.collected) {
        surface.save();
        surface.translate(can.pos);

        // Glow: a plain circle behind the body
        surface.circle(Vec2::ZERO, size);
        surface.fill(&Paint::Solid(CAN_GLOW));

        surface.round_rect(Vec2::splat(-size * 0.5), Vec2::splat(size), CAN_CORNER);
        surface.fill(&Paint::Solid(CAN_BODY));

        surface.fill_text("F", Vec2::new(0.0, 1.0), CAN_FONT, CAN_LABEL);

        surface.restore();
    }

    if !pickup_effects {
        return;
    }

    let duration = fuel.tuning().collect_fx_duration;
    for effect in fuel.effects() {
        let (radius, alpha) = ring_at(effect.progress(duration));
        surface.circle(effect.pos, radius);
        surface.stroke(with_alpha(CAN_BODY, alpha), 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recorder::{DrawCmd, DrawList};
    use crate::sim::{FuelSystem, Terrain, VehicleState};

    fn parked_at(pos: Vec2) -> VehicleState {
        VehicleState {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            grounded: true,
        }
    }

    #[test]
    fn test_ring_shape() {
        assert_eq!(ring_at(0.0), (15.0, 1.0));
        assert_eq!(ring_at(0.5), (30.0, 0.5));
        assert_eq!(ring_at(1.0), (45.0, 0.0));
    }

    #[test]
    fn test_draws_uncollected_can() {
        let terrain = Terrain::new();
        let mut fuel = FuelSystem::new(1);
        fuel.update(0.0, &parked_at(Vec2::new(600.0, -10_000.0)), &terrain, 100.0);

        let mut list = DrawList::default();
        draw_fuel(&mut list, &fuel, true);

        let can = fuel.cans()[0];
        let cmds = list.commands();
        assert_eq!(cmds[0], DrawCmd::Save);
        assert_eq!(cmds[1], DrawCmd::Translate(can.pos));
        assert!(cmds.contains(&DrawCmd::Fill(Paint::Solid(CAN_GLOW))));
        assert!(cmds.contains(&DrawCmd::Fill(Paint::Solid(CAN_BODY))));
        assert!(cmds.iter().any(|c| matches!(c, DrawCmd::Text { text, .. } if text == "F")));
        assert_eq!(cmds.last(), Some(&DrawCmd::Restore));
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn test_collected_can_draws_ring_only() {
        let terrain = Terrain::new();
        let mut fuel = FuelSystem::new(1);
        let can_pos = Vec2::new(1000.0, terrain.height_at(1000.0) - 24.0);
        fuel.update(0.0, &parked_at(can_pos), &terrain, 100.0);
        fuel.update(0.15, &parked_at(can_pos), &terrain, 100.0);

        let mut list = DrawList::default();
        draw_fuel(&mut list, &fuel, true);

        let cmds = list.commands();
        assert!(!cmds.iter().any(|c| matches!(c, DrawCmd::Text { .. })));
        let ring = cmds
            .iter()
            .find_map(|c| match c {
                DrawCmd::Arc { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .unwrap();
        assert_eq!(ring.0, can_pos);
        assert!((ring.1 - 22.5).abs() < 1e-3);
        let alpha = cmds
            .iter()
            .find_map(|c| match c {
                DrawCmd::Stroke { color, .. } => Some(color[3]),
                _ => None,
            })
            .unwrap();
        assert!((alpha - 0.75).abs() < 1e-3);

        // Effects toggled off: nothing left to draw
        let mut quiet = DrawList::default();
        draw_fuel(&mut quiet, &fuel, false);
        assert!(quiet.is_empty());
    }
}
