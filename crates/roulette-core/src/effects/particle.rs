use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::color::Color;
use crate::particles::ConfettiPalette;
use crate::rng::RandomSource;
use crate::surface::{DrawSurface, guarded, star_points, trace_polygon};

use super::fade;

/// Confetti lifetime in milliseconds.
pub const PARTICLE_LIFETIME: f32 = 3000.0;

/// Half the edge of a confetti square and the outer radius of a star.
const PARTICLE_EXTENT: f32 = 10.0;

/// One piece of confetti launched upward from a burst point.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub force: Vec2,
    pub color: Color,
    elapsed: f32,
    rotation: f32,
    rotation_speed: f32,
    is_star: bool,
}

impl Particle {
    pub fn new(x: f32, y: f32, palette: ConfettiPalette, rng: &mut dyn RandomSource) -> Self {
        let magnitude = rng.next_f32() * 250.0;
        let angle = (90.0 * rng.next_f32() - 180.0).to_radians();
        let color = palette.pick(rng);
        let rotation = rng.next_f32() * TAU;
        let rotation_speed = (rng.next_f32() - 0.5) * 0.2;
        let is_star = rng.next_f32() > 0.5;

        Self {
            position: Vec2::new(x, y),
            force: Vec2::new(angle.cos(), angle.sin()) * magnitude,
            color,
            elapsed: 0.0,
            rotation,
            rotation_speed,
            is_star,
        }
    }

    pub fn update(&mut self, delta_time: f32) {
        self.elapsed += delta_time;
        self.position += self.force * (delta_time / 100.0);
        self.force.y += 10.0 * delta_time / 100.0;
        self.rotation += self.rotation_speed;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn is_star(&self) -> bool {
        self.is_star
    }

    pub fn is_destroyed(&self) -> bool {
        self.elapsed > PARTICLE_LIFETIME
    }

    pub fn opacity(&self) -> f32 {
        fade(self.elapsed, PARTICLE_LIFETIME)
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        guarded(surface, |s| {
            s.set_global_alpha(self.opacity());
            s.translate(self.position.x, self.position.y);
            s.rotate(self.rotation);
            s.set_fill(self.color.into());
            if self.is_star {
                let points = star_points(
                    (0.0, 0.0),
                    5,
                    PARTICLE_EXTENT,
                    PARTICLE_EXTENT * 0.4,
                    -PI / 2.0,
                );
                trace_polygon(s, points);
                s.fill();
            } else {
                let edge = PARTICLE_EXTENT * 2.0;
                s.fill_rect(-PARTICLE_EXTENT, -PARTICLE_EXTENT, edge, edge);
            }
        });
    }
}
