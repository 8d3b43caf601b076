use std::f32::consts::PI;

use glam::Vec2;

use crate::color::Color;
use crate::rng::RandomSource;
use crate::surface::{DrawSurface, guarded, star_points, trace_polygon};

/// Ambient snowflake. Wraps to the top instead of expiring.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowParticle {
    pub position: Vec2,
    /// Fall speed in pixels per second.
    pub velocity: f32,
    pub size: f32,
    pub opacity: f32,
    pub drift: f32,
    bounds: Vec2,
}

impl SnowParticle {
    pub fn new(x: f32, y: f32, width: f32, height: f32, rng: &mut dyn RandomSource) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: rng.next_f32() * 4.0 + 2.0,
            velocity: rng.next_f32() * 50.0 + 25.0,
            drift: rng.next_f32() * 20.0 - 10.0,
            opacity: rng.next_f32() * 0.6 + 0.4,
            bounds: Vec2::new(width, height),
        }
    }

    pub fn update(&mut self, delta_time: f32, rng: &mut dyn RandomSource) {
        let t = delta_time / 1000.0;
        self.position.y += self.velocity * t;
        self.position.x += (self.position.y / 30.0).sin() * self.drift * t;

        if self.position.y > self.bounds.y {
            self.position.y = -10.0;
            self.position.x = rng.next_f32() * self.bounds.x;
        }
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, tint: Color) {
        guarded(surface, |s| {
            s.set_global_alpha(self.opacity);
            s.set_fill(tint.into());
            let points = star_points(
                (self.position.x, self.position.y),
                6,
                self.size,
                self.size * 0.5,
                -PI / 2.0,
            );
            trace_polygon(s, points);
            s.fill();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use crate::rng::{ScriptedRandom, SeededRandom};

    #[test]
    fn test_spawn_ranges() {
        let mut rng = SeededRandom::new(11);
        for _ in 0..200 {
            let flake = SnowParticle::new(0.0, 0.0, 100.0, 100.0, &mut rng);
            assert!((2.0..6.0).contains(&flake.size));
            assert!((25.0..75.0).contains(&flake.velocity));
            assert!((-10.0..10.0).contains(&flake.drift));
            assert!((0.4..1.0).contains(&flake.opacity));
        }
    }

    #[test]
    fn test_falls_then_wraps() {
        // speed 50, no drift
        let mut spawn = ScriptedRandom::new(vec![0.0, 0.5, 0.5, 0.0]);
        let mut flake = SnowParticle::new(10.0, 90.0, 200.0, 100.0, &mut spawn);

        let mut rng = ScriptedRandom::constant(0.25);
        flake.update(100.0, &mut rng);
        assert!((flake.position.y - 95.0).abs() < 1e-4);
        assert_eq!(flake.position.x, 10.0);

        flake.update(200.0, &mut rng);
        assert_eq!(flake.position.y, -10.0);
        assert_eq!(flake.position.x, 50.0);
    }

    #[test]
    fn test_render_uses_tint_and_opacity() {
        let mut rng = ScriptedRandom::constant(0.5);
        let flake = SnowParticle::new(0.0, 0.0, 10.0, 10.0, &mut rng);
        let mut surface = RecordingSurface::new(10.0, 10.0);
        flake.render(&mut surface, Color::CYAN);

        assert!(surface.commands().contains(&DrawCommand::SetFill(Color::CYAN.into())));
        let alpha = surface.commands().iter().find_map(|c| match c {
            DrawCommand::SetGlobalAlpha(a) => Some(*a),
            _ => None,
        });
        assert!((alpha.unwrap() - 0.7).abs() < 1e-5);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::LineTo(..))), 11);
    }
}
