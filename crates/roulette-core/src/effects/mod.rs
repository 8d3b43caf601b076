//! Short-lived visual effects.
//!
//! Confetti and snow are screen-space and owned by the
//! [`ParticleManager`](crate::particles::ParticleManager). Skill bursts live
//! in world space inside the host's effect list and are drawn through the
//! [`Effect`] trait.

mod particle;
mod skill;
mod snow;

pub use particle::{PARTICLE_LIFETIME, Particle};
pub use skill::{SKILL_EFFECT_LIFETIME, SkillEffect};
pub use snow::SnowParticle;

use crate::surface::DrawSurface;
use crate::theme::ColorTheme;

/// A world-space effect drawn inside the camera transform.
pub trait Effect {
    /// Advances the effect by `delta_time` milliseconds.
    fn update(&mut self, delta_time: f32);

    /// `zoom` is the full world-to-pixel scale.
    fn render(&self, surface: &mut dyn DrawSurface, zoom: f32, theme: &ColorTheme);

    /// Destroyed effects are pruned by their owner and never drawn again.
    fn is_destroyed(&self) -> bool;
}

/// Quadratic fade from 1 to 0 over `lifetime`.
pub(crate) fn fade(elapsed: f32, lifetime: f32) -> f32 {
    let rate = elapsed / lifetime;
    (1.0 - rate * rate).max(0.0)
}
