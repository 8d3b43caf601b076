//! Screen-space particle pools: ambient snow and confetti bursts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::effects::{Particle, SnowParticle};
use crate::rng::{RandomSource, SeededRandom};
use crate::surface::DrawSurface;
use crate::theme::ColorTheme;

/// Pieces of confetti spawned by one [`ParticleManager::shot`].
pub const BURST_SIZE: usize = 200;

/// How confetti picks its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfettiPalette {
    /// Red, green, gold, white and blue.
    #[default]
    Festive,
    /// Any hue at 50% saturation and lightness.
    Rainbow,
}

impl ConfettiPalette {
    /// Draws one color, consuming exactly one random value.
    pub fn pick(self, rng: &mut dyn RandomSource) -> Color {
        let roll = rng.next_f32();
        match self {
            Self::Festive => {
                let colors = festive_colors();
                let index = ((roll * colors.len() as f32) as usize).min(colors.len() - 1);
                colors[index]
            }
            Self::Rainbow => Color::hsl(roll * 360.0, 50.0, 50.0),
        }
    }
}

fn festive_colors() -> [Color; 5] {
    [
        Color::hsl(0.0, 80.0, 50.0),
        Color::hsl(140.0, 60.0, 50.0),
        Color::hsl(45.0, 100.0, 50.0),
        Color::hsl(0.0, 0.0, 95.0),
        Color::hsl(210.0, 100.0, 60.0),
    ]
}

/// Owns the snow and confetti pools and the random source they spawn from.
pub struct ParticleManager {
    particles: Vec<Particle>,
    snow: Vec<SnowParticle>,
    is_snowing: bool,
    palette: ConfettiPalette,
    rng: Box<dyn RandomSource>,
}

impl fmt::Debug for ParticleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleManager")
            .field("particles", &self.particles.len())
            .field("snow", &self.snow.len())
            .field("is_snowing", &self.is_snowing)
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

impl Default for ParticleManager {
    fn default() -> Self {
        Self::new(Box::new(SeededRandom::from_entropy()))
    }
}

impl ParticleManager {
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Self {
            particles: Vec::new(),
            snow: Vec::new(),
            is_snowing: false,
            palette: ConfettiPalette::default(),
            rng,
        }
    }

    pub fn set_palette(&mut self, palette: ConfettiPalette) {
        self.palette = palette;
    }

    pub fn palette(&self) -> ConfettiPalette {
        self.palette
    }

    pub fn is_snowing(&self) -> bool {
        self.is_snowing
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn snow(&self) -> &[SnowParticle] {
        &self.snow
    }

    /// Replaces the snow pool with 50 to 74 flakes spread over the bounds.
    pub fn enable_snow(&mut self, width: f32, height: f32) {
        let count = (self.rng.next_f32() * 25.0) as usize + 50;
        let rng = self.rng.as_mut();
        self.snow = (0..count)
            .map(|_| {
                let x = rng.next_f32() * width;
                let y = rng.next_f32() * height;
                SnowParticle::new(x, y, width, height, rng)
            })
            .collect();
        self.is_snowing = true;
        tracing::info!("[particles] Snow enabled with {} flakes", count);
    }

    pub fn disable_snow(&mut self) {
        self.snow.clear();
        self.is_snowing = false;
        tracing::info!("[particles] Snow disabled");
    }

    /// Launches a confetti burst from (`x`, `y`) in screen pixels.
    pub fn shot(&mut self, x: f32, y: f32) {
        let palette = self.palette;
        let rng = self.rng.as_mut();
        self.particles
            .extend((0..BURST_SIZE).map(|_| Particle::new(x, y, palette, rng)));
        tracing::debug!("[particles] Burst at ({:.0}, {:.0})", x, y);
    }

    pub fn update(&mut self, delta_time: f32) {
        for particle in &mut self.particles {
            particle.update(delta_time);
        }
        self.particles.retain(|p| !p.is_destroyed());

        if self.is_snowing {
            let rng = self.rng.as_mut();
            for flake in &mut self.snow {
                flake.update(delta_time, rng);
            }
        }
    }

    /// Draws snow behind confetti. Expects an untransformed surface.
    pub fn render(&self, surface: &mut dyn DrawSurface, theme: &ColorTheme) {
        if self.is_snowing {
            let tint = theme.snow_color.unwrap_or(Color::WHITE);
            for flake in &self.snow {
                flake.render(surface, tint);
            }
        }

        for particle in self.particles.iter().filter(|p| !p.is_destroyed()) {
            particle.render(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use crate::rng::ScriptedRandom;

    #[test]
    fn test_snow_count_range() {
        for seed in 0..50 {
            let mut manager = ParticleManager::new(Box::new(SeededRandom::new(seed)));
            manager.enable_snow(800.0, 600.0);
            assert!((50..75).contains(&manager.snow().len()));
            assert!(manager.is_snowing());
            for flake in manager.snow() {
                assert!((0.0..800.0).contains(&flake.position.x));
                assert!((0.0..600.0).contains(&flake.position.y));
            }
        }
    }

    #[test]
    fn test_disable_snow_clears_pool() {
        let mut manager = ParticleManager::new(Box::new(SeededRandom::new(1)));
        manager.enable_snow(100.0, 100.0);
        manager.disable_snow();
        assert!(!manager.is_snowing());
        assert!(manager.snow().is_empty());

        let mut surface = RecordingSurface::new(100.0, 100.0);
        manager.render(&mut surface, &ColorTheme::christmas());
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_snow_never_expires() {
        let mut manager = ParticleManager::new(Box::new(SeededRandom::new(2)));
        manager.enable_snow(100.0, 100.0);
        let count = manager.snow().len();
        for _ in 0..500 {
            manager.update(100.0);
        }
        assert_eq!(manager.snow().len(), count);
        assert!(manager.snow().iter().all(|f| f.position.y <= 100.0));
    }

    #[test]
    fn test_burst_lifecycle() {
        let mut manager = ParticleManager::new(Box::new(SeededRandom::new(3)));
        manager.shot(400.0, 300.0);
        manager.shot(10.0, 10.0);
        assert_eq!(manager.particles().len(), 2 * BURST_SIZE);

        for _ in 0..30 {
            manager.update(100.0);
        }
        assert_eq!(manager.particles().len(), 2 * BURST_SIZE);

        manager.update(1.0);
        assert!(manager.particles().is_empty());
    }

    #[test]
    fn test_snow_drawn_before_confetti() {
        let mut manager = ParticleManager::new(Box::new(SeededRandom::new(4)));
        manager.shot(0.0, 0.0);
        manager.enable_snow(100.0, 100.0);

        let mut surface = RecordingSurface::new(100.0, 100.0);
        manager.render(&mut surface, &ColorTheme::christmas());

        let snow_tint = DrawCommand::SetFill(Color::WHITE.into());
        let first_snow = surface.commands().iter().position(|c| *c == snow_tint);
        let first_confetti = surface
            .commands()
            .iter()
            .position(|c| matches!(c, DrawCommand::Translate(..)));
        assert!(first_snow.unwrap() < first_confetti.unwrap());
    }

    #[test]
    fn test_palettes() {
        let mut rng = ScriptedRandom::new(vec![0.0, 0.45, 0.99]);
        assert_eq!(ConfettiPalette::Festive.pick(&mut rng), Color::hsl(0.0, 80.0, 50.0));
        assert_eq!(ConfettiPalette::Festive.pick(&mut rng), Color::hsl(45.0, 100.0, 50.0));
        assert_eq!(ConfettiPalette::Festive.pick(&mut rng), Color::hsl(210.0, 100.0, 60.0));

        let mut rng = ScriptedRandom::constant(0.5);
        assert_eq!(ConfettiPalette::Rainbow.pick(&mut rng), Color::hsl(180.0, 50.0, 50.0));

        let mut manager = ParticleManager::new(Box::new(ScriptedRandom::constant(0.5)));
        assert_eq!(manager.palette(), ConfettiPalette::Festive);
        manager.set_palette(ConfettiPalette::Rainbow);
        assert_eq!(manager.palette(), ConfettiPalette::Rainbow);
        manager.shot(0.0, 0.0);
        assert!(manager.particles().iter().all(|p| p.color == Color::hsl(180.0, 50.0, 50.0)));
    }
}
