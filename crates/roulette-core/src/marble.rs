//! Marble entity: skill cooldown, stuck detection and ornament rendering.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::camera::Viewport;
use crate::color::Color;
use crate::effects::SkillEffect;
use crate::physics::{MarblePhysics, MarblePose};
use crate::rng::RandomSource;
use crate::surface::{DrawSurface, Font, GradientStop, ImageId, Paint, guarded};
use crate::theme::ColorTheme;

/// Unique identifier for a marble (its race order).
pub type MarbleId = u32;

/// Milliseconds without movement before a marble gets shaken.
pub const STUCK_DELAY: f32 = 4000.0;

/// Squared distance below which a marble counts as not moving.
const STUCK_EPSILON_SQ: f32 = 0.000_01;

/// Duration of the impact flash in milliseconds.
pub const IMPACT_FLASH: f32 = 500.0;

/// Default marble diameter in world units.
pub const MARBLE_SIZE: f32 = 0.5;

/// Skill fired by a marble this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Skill {
    #[default]
    None,
    Impact,
}

/// Per-call drawing inputs for [`Marble::render`].
#[derive(Debug, Clone, Copy)]
pub struct MarbleRenderOptions<'a> {
    /// Full world-to-pixel scale.
    pub zoom: f32,
    /// Draw the winning-rank ring.
    pub outlined: bool,
    pub minimap: bool,
    pub skin: Option<ImageId>,
    pub viewport: Viewport,
    pub theme: &'a ColorTheme,
    pub use_skills: bool,
}

/// One race entrant.
///
/// Position and angle live in the physics engine and are read through
/// [`MarblePhysics`] by [`Marble::id`].
#[derive(Debug, Clone)]
pub struct Marble {
    pub id: MarbleId,
    pub name: String,
    pub size: f32,
    pub color: Color,
    pub hue: f32,
    pub weight: f32,
    pub skill: Skill,
    pub is_active: bool,
    /// Remaining impact flash in milliseconds.
    pub impact: f32,

    skill_rate: f32,
    cool_time: f32,
    max_cool_time: f32,
    stuck_time: f32,
    last_position: Vec2,
    float_offset: f32,
    float_phase: f32,
}

impl Marble {
    /// Creates marble `order` out of `max` and places its body on the
    /// starting grid (ten per line, later lines higher up).
    ///
    /// `weight` is clamped to `[0, 1]`.
    pub fn new(
        physics: &mut dyn MarblePhysics,
        order: u32,
        max: u32,
        name: Option<&str>,
        weight: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let weight = weight.clamp(0.0, 1.0);
        let max_cool_time = 1000.0 + (1.0 - weight) * 4000.0;
        let cool_time = max_cool_time * rng.next_f32();
        let float_phase = rng.next_f32() * TAU;

        let max_f = max.max(1) as f32;
        let hue = 360.0 / max_f * order as f32;

        let max_line = (max_f / 10.0).ceil();
        let line = (order / 10) as f32;
        let line_delta = -(max_line - 5.0).ceil().max(0.0);
        physics.create_marble(
            order,
            10.25 + (order % 10) as f32 * 0.6,
            max_line - line + line_delta,
        );

        Self {
            id: order,
            name: name.map_or_else(|| format!("M{order}"), str::to_string),
            size: MARBLE_SIZE,
            color: Color::hsl(hue, 100.0, 70.0),
            hue,
            weight,
            skill: Skill::None,
            is_active: false,
            impact: 0.0,
            skill_rate: 0.2 * weight,
            cool_time,
            max_cool_time,
            stuck_time: 0.0,
            last_position: Vec2::ZERO,
            float_offset: 0.0,
            float_phase,
        }
    }

    /// Live pose, or the origin when the engine has none for this id.
    pub fn position(&self, physics: &dyn MarblePhysics) -> MarblePose {
        physics.pose_or_default(self.id)
    }

    pub fn cool_time(&self) -> f32 {
        self.cool_time
    }

    pub fn max_cool_time(&self) -> f32 {
        self.max_cool_time
    }

    pub fn skill_rate(&self) -> f32 {
        self.skill_rate
    }

    pub fn stuck_time(&self) -> f32 {
        self.stuck_time
    }

    /// Idle bob applied to the drawn y coordinate.
    pub fn float_offset(&self) -> f32 {
        self.float_offset
    }

    pub fn update(
        &mut self,
        delta_time: f32,
        physics: &mut dyn MarblePhysics,
        use_skills: bool,
        rng: &mut dyn RandomSource,
    ) {
        let pose = physics.pose_or_default(self.id);
        let current = Vec2::new(pose.x, pose.y);

        if self.is_active && self.last_position.distance_squared(current) < STUCK_EPSILON_SQ {
            self.stuck_time += delta_time;
            if self.stuck_time > STUCK_DELAY {
                tracing::debug!("[marble] '{}' stuck, shaking", self.name);
                physics.shake_marble(self.id);
                self.stuck_time = 0.0;
            }
        } else {
            self.stuck_time = 0.0;
        }
        self.last_position = current;

        self.skill = Skill::None;
        if self.impact > 0.0 {
            self.impact = (self.impact - delta_time).max(0.0);
        }

        if self.is_active {
            self.float_offset = 0.0;
            if use_skills {
                self.update_skill(delta_time, rng);
            }
        } else {
            self.float_phase += delta_time / 1000.0;
            self.float_offset = (self.float_phase * 2.0).sin() * 0.05;
        }
    }

    fn update_skill(&mut self, delta_time: f32, rng: &mut dyn RandomSource) {
        if self.cool_time > 0.0 {
            self.cool_time -= delta_time;
        }

        if self.cool_time <= 0.0 {
            if rng.next_f32() < self.skill_rate {
                self.skill = Skill::Impact;
                tracing::debug!("[marble] '{}' fired impact", self.name);
            }
            self.cool_time = self.max_cool_time;
        }
    }

    /// Arms the impact flash and returns the burst to display when this
    /// frame's skill is [`Skill::Impact`].
    pub fn take_skill_effect(
        &mut self,
        physics: &dyn MarblePhysics,
        rng: &mut dyn RandomSource,
    ) -> Option<SkillEffect> {
        if self.skill != Skill::Impact {
            return None;
        }
        self.impact = IMPACT_FLASH;
        let pose = self.position(physics);
        Some(SkillEffect::new(pose.x, pose.y, rng))
    }

    pub fn render(
        &self,
        surface: &mut dyn DrawSurface,
        physics: &dyn MarblePhysics,
        opts: &MarbleRenderOptions<'_>,
    ) {
        let pose = self.position(physics);
        if !opts.minimap && !opts.viewport.contains(pose.x, pose.y, self.size) {
            return;
        }

        guarded(surface, |s| {
            if opts.minimap {
                s.set_fill(self.color.into());
                s.begin_path();
                s.arc(pose.x, pose.y + self.float_offset, self.size, 0.0, TAU);
                s.fill();
            } else {
                self.render_normal(s, pose, opts);
            }
        });
    }

    fn render_normal(
        &self,
        surface: &mut dyn DrawSurface,
        pose: MarblePose,
        opts: &MarbleRenderOptions<'_>,
    ) {
        let hs = self.size / 2.0;
        let y = pose.y + self.float_offset;

        if let Some(skin) = opts.skin {
            guarded(surface, |s| {
                s.translate(pose.x, pose.y);
                s.rotate(pose.angle);
                s.draw_image(skin, -hs, -hs, hs * 2.0, hs * 2.0);
            });
        } else {
            self.draw_ornament(surface, pose.x, y, hs, opts.theme);
        }

        surface.set_shadow(Color::TRANSPARENT, 0.0);
        self.draw_name(surface, pose.x, y, opts.zoom);

        if opts.outlined {
            surface.begin_path();
            surface.set_stroke(opts.theme.marble_winning_border.into());
            surface.set_line_width(2.0 / opts.zoom);
            surface.arc(pose.x, y, hs, 0.0, TAU);
            surface.stroke();
        }

        if opts.use_skills {
            let sweep = TAU * self.cool_time / self.max_cool_time;
            surface.set_stroke(opts.theme.cool_time_indicator.into());
            surface.set_line_width(1.0 / opts.zoom);
            surface.begin_path();
            surface.arc(pose.x, y, hs + 2.0 / opts.zoom, PI * 1.5, PI * 1.5 + sweep);
            surface.stroke();
        }
    }

    fn draw_ornament(
        &self,
        surface: &mut dyn DrawSurface,
        x: f32,
        y: f32,
        radius: f32,
        theme: &ColorTheme,
    ) {
        let flash = 25.0 * (self.impact / IMPACT_FLASH).min(1.0);
        surface.set_fill(Paint::Radial {
            inner_center: [x - radius * 0.3, y - radius * 0.3],
            inner_radius: radius * 0.1,
            outer_center: [x, y],
            outer_radius: radius,
            stops: vec![
                GradientStop::new(0.0, Color::hsl(self.hue, 100.0, 85.0)),
                GradientStop::new(0.5, Color::hsl(self.hue, 100.0, theme.marble_lightness + flash)),
                GradientStop::new(1.0, Color::hsl(self.hue, 80.0, 35.0)),
            ],
        });
        surface.begin_path();
        surface.arc(x, y, radius, 0.0, TAU);
        surface.fill();

        // cap
        surface.set_fill(Color::ANTIQUE_GOLD.into());
        surface.begin_path();
        surface.arc(x, y - radius, radius * 0.2, 0.0, TAU);
        surface.fill();

        // hook
        surface.set_stroke(Color::ANTIQUE_GOLD.into());
        surface.set_line_width(radius * 0.1);
        surface.begin_path();
        surface.move_to(x, y - radius);
        surface.line_to(x, y - radius * 1.3);
        surface.stroke();

        surface.set_fill(Color::WHITE.with_alpha(0.6).into());
        surface.begin_path();
        surface.ellipse(
            x - radius * 0.3,
            y - radius * 0.3,
            radius * 0.3,
            radius * 0.4,
            -PI / 4.0,
            0.0,
            TAU,
        );
        surface.fill();
    }

    /// Label drawn at a constant screen size regardless of zoom.
    fn draw_name(&self, surface: &mut dyn DrawSurface, x: f32, y: f32, zoom: f32) {
        guarded(surface, |s| {
            s.set_font(Font::pt(21.0).bold());
            s.set_stroke(Color::BLACK.into());
            s.set_line_width(3.0);
            s.set_fill(self.color.into());
            s.translate(x, y + 0.25);
            s.scale(1.0 / zoom, 1.0 / zoom);
            s.stroke_text(&self.name, 0.0, 0.0);
            s.fill_text(&self.name, 0.0, 0.0);
        });
    }
}
