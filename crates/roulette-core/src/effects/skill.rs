use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use crate::color::Color;
use crate::rng::RandomSource;
use crate::surface::{DrawSurface, guarded, trace_polygon};
use crate::theme::ColorTheme;

use super::{Effect, fade};

/// Skill burst lifetime in milliseconds.
pub const SKILL_EFFECT_LIFETIME: f32 = 500.0;

const SPARKLE_COUNT: usize = 12;
/// Ring radius reached at the end of the lifetime, in world units.
const MAX_RADIUS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sparkle {
    angle: f32,
    speed: f32,
}

/// Expanding ring with radiating sparkles, shown where a marble fired
/// its impact skill.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillEffect {
    position: Vec2,
    elapsed: f32,
    radius: f32,
    sparkles: Vec<Sparkle>,
}

impl SkillEffect {
    pub fn new(x: f32, y: f32, rng: &mut dyn RandomSource) -> Self {
        let sparkles = (0..SPARKLE_COUNT)
            .map(|i| Sparkle {
                angle: TAU / SPARKLE_COUNT as f32 * i as f32,
                speed: rng.next_f32() * 2.0 + 1.0,
            })
            .collect();
        Self {
            position: Vec2::new(x, y),
            elapsed: 0.0,
            radius: 0.0,
            sparkles,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.position.x, self.position.y)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Effect for SkillEffect {
    fn update(&mut self, delta_time: f32) {
        self.elapsed += delta_time;
        self.radius = self.elapsed / SKILL_EFFECT_LIFETIME * MAX_RADIUS;
    }

    fn render(&self, surface: &mut dyn DrawSurface, zoom: f32, theme: &ColorTheme) {
        guarded(surface, |s| {
            s.set_global_alpha(fade(self.elapsed, SKILL_EFFECT_LIFETIME));

            s.set_stroke(theme.skill_color.into());
            s.set_line_width(3.0 / zoom);
            s.set_shadow(theme.skill_color, 10.0);
            s.begin_path();
            s.arc(self.position.x, self.position.y, self.radius, 0.0, TAU);
            s.stroke();

            s.set_fill(theme.accent_glow.unwrap_or(Color::GOLD).into());
            let dist = self.radius * 0.8;
            let tip = 2.0 / zoom;
            for sparkle in &self.sparkles {
                let center = self.position + Vec2::from_angle(sparkle.angle) * dist * sparkle.speed;
                let points = (0..4).map(|i| {
                    let a = FRAC_PI_2 * i as f32 + sparkle.angle;
                    (center.x + a.cos() * tip, center.y + a.sin() * tip)
                });
                trace_polygon(s, points);
                s.fill();
            }
        });
    }

    fn is_destroyed(&self) -> bool {
        self.elapsed > SKILL_EFFECT_LIFETIME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use crate::rng::ScriptedRandom;

    #[test]
    fn test_ring_grows_and_expires() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut effect = SkillEffect::new(1.0, 2.0, &mut rng);

        effect.update(250.0);
        assert_eq!(effect.radius(), 5.0);
        assert!(!effect.is_destroyed());

        effect.update(250.0);
        assert_eq!(effect.radius(), 10.0);
        assert!(!effect.is_destroyed());

        effect.update(1.0);
        assert!(effect.is_destroyed());
    }

    #[test]
    fn test_sparkles_use_accent_or_gold() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut effect = SkillEffect::new(0.0, 0.0, &mut rng);
        effect.update(100.0);

        let mut surface = RecordingSurface::new(100.0, 100.0);
        effect.render(&mut surface, 10.0, &ColorTheme::dark());
        assert!(surface.commands().contains(&DrawCommand::SetFill(Color::GOLD.into())));
        assert!(surface.commands().contains(&DrawCommand::SetShadow(Color::WHITE, 10.0)));
        // ring stroke + one fill per sparkle
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Fill)), SPARKLE_COUNT);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Stroke)), 1);

        let mut theme = ColorTheme::dark();
        theme.accent_glow = Some(Color::RED);
        let mut surface = RecordingSurface::new(100.0, 100.0);
        effect.render(&mut surface, 10.0, &theme);
        assert!(surface.commands().contains(&DrawCommand::SetFill(Color::RED.into())));
    }
}
