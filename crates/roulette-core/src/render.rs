//! Frame composition.
//!
//! [`RouletteRenderer::render`] draws one frame in a fixed order: background,
//! the camera-space scene (stage entities, effects, marbles), screen-space UI
//! overlays, the particle pools and finally the winner panel.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use crate::camera::Camera;
use crate::color::Color;
use crate::effects::Effect;
use crate::marble::{Marble, MarbleRenderOptions};
use crate::options::selected_ranks;
use crate::particles::ParticleManager;
use crate::physics::MarblePhysics;
use crate::rng::RandomSource;
use crate::stage::{EntityShape, EntityState, StageDef};
use crate::surface::{
    DrawSurface, Font, ImageId, Paint, TextAlign, TextBaseline, guarded, star_points, trace_polygon,
};
use crate::theme::ColorTheme;

/// World-to-pixel scale at camera zoom 1.
pub const INITIAL_ZOOM: f32 = 55.0;

/// Reference canvas size the star field is laid out on.
pub const CANVAS_WIDTH: f32 = 1200.0;
pub const CANVAS_HEIGHT: f32 = 900.0;

const STAR_COUNT: usize = 100;

const WINNER_PANEL_HEADER: f32 = 120.0;
const WINNER_PANEL_CONTENT: f32 = 100.0;
const WINNER_FONT_MAX: f32 = 52.0;
const WINNER_FONT_MIN: f32 = 20.0;

/// A winner picked for display, with its 1-based finishing position.
#[derive(Debug, Clone, Copy)]
pub struct SelectedWinner<'a> {
    pub marble: &'a Marble,
    pub position: usize,
}

impl<'a> SelectedWinner<'a> {
    /// Picks the finishers at the given 0-indexed `ranks`, skipping ranks
    /// nobody has reached yet.
    pub fn from_ranks(finished: &'a [Marble], ranks: &[usize]) -> Vec<Self> {
        ranks
            .iter()
            .filter_map(|&rank| {
                finished.get(rank).map(|marble| Self {
                    marble,
                    position: rank + 1,
                })
            })
            .collect()
    }
}

/// Everything a frame reads. Built by the host loop after all updates ran.
pub struct RenderParameters<'a> {
    pub camera: &'a Camera,
    pub stage: &'a StageDef,
    pub entities: &'a [EntityState],
    /// Marbles still racing, in standings order.
    pub marbles: &'a [Marble],
    pub physics: &'a dyn MarblePhysics,
    pub winners: &'a [SelectedWinner<'a>],
    /// Every finisher so far, in finishing order.
    pub all_winners: Option<&'a [Marble]>,
    pub particle_manager: &'a ParticleManager,
    pub effects: &'a [Box<dyn Effect>],
    pub winner_rank: usize,
    pub winner_ranks: Option<&'a [usize]>,
    pub theme: &'a ColorTheme,
    /// Viewport size in pixels.
    pub size: (f32, f32),
    pub use_skills: bool,
}

impl RenderParameters<'_> {
    pub fn finished(&self) -> &[Marble] {
        self.all_winners.unwrap_or(&[])
    }

    /// Winning positions (0-indexed) to highlight this frame.
    pub fn selected_ranks(&self) -> Vec<usize> {
        selected_ranks(self.winner_rank, self.winner_ranks)
    }
}

/// A screen-space overlay drawn after the scene.
pub trait UiObject {
    /// Advances overlay state. Called once per frame before rendering.
    fn update(&mut self, delta_time: f32, params: &RenderParameters<'_>);

    fn render(
        &self,
        surface: &mut dyn DrawSurface,
        params: &RenderParameters<'_>,
        width: f32,
        height: f32,
    );
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Star {
    x: f32,
    y: f32,
    size: f32,
}

#[derive(Debug, Clone)]
pub struct RouletteRenderer {
    stars: Vec<Star>,
    skins: HashMap<String, ImageId>,
}

impl RouletteRenderer {
    /// Creates a renderer with its decorative star field laid out once.
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                x: rng.next_f32() * CANVAS_WIDTH,
                y: rng.next_f32() * CANVAS_HEIGHT,
                size: rng.next_f32() * 2.0 + 1.0,
            })
            .collect();
        Self {
            stars,
            skins: HashMap::new(),
        }
    }

    /// Draws `image` instead of the ornament for marbles named `name`.
    pub fn register_skin(&mut self, name: impl Into<String>, image: ImageId) {
        let name = name.into();
        tracing::debug!("[render] Skin registered for '{}'", name);
        self.skins.insert(name, image);
    }

    pub fn skin(&self, name: &str) -> Option<ImageId> {
        self.skins.get(name).copied()
    }

    pub fn render(
        &self,
        surface: &mut dyn DrawSurface,
        params: &RenderParameters<'_>,
        ui_objects: &[&dyn UiObject],
    ) {
        let width = surface.width();
        let height = surface.height();

        self.render_background(surface, params.theme, width, height);

        surface.save();
        surface.set_text_align(TextAlign::Left);
        surface.set_text_baseline(TextBaseline::Top);
        surface.set_font(Font::pt(0.4));
        surface.set_line_width(3.0 / (params.camera.zoom() + INITIAL_ZOOM));
        params.camera.render_scene(surface, width, height, |s| {
            draw_entities(s, params.entities, params.theme);
            Self::render_effects(s, params);
            self.render_marbles(s, params);
        });
        surface.restore();

        for ui in ui_objects {
            ui.render(surface, params, width, height);
        }
        params.particle_manager.render(surface, params.theme);
        Self::render_winner(surface, params, width, height);
    }

    fn render_background(
        &self,
        surface: &mut dyn DrawSurface,
        theme: &ColorTheme,
        width: f32,
        height: f32,
    ) {
        match &theme.background_gradient {
            Some(colors) if !colors.is_empty() => {
                surface.set_fill(Paint::linear_even([0.0, 0.0], [0.0, height], colors));
                surface.fill_rect(0.0, 0.0, width, height);
                guarded(surface, |s| {
                    s.set_fill(Color::WHITE.with_alpha(0.8).into());
                    for star in &self.stars {
                        s.begin_path();
                        s.arc(star.x, star.y, star.size, 0.0, TAU);
                        s.fill();
                    }
                });
            }
            _ => {
                surface.set_fill(theme.background.into());
                surface.fill_rect(0.0, 0.0, width, height);
            }
        }
    }

    fn render_effects(surface: &mut dyn DrawSurface, params: &RenderParameters<'_>) {
        let zoom = params.camera.zoom() * INITIAL_ZOOM;
        for effect in params.effects.iter().filter(|e| !e.is_destroyed()) {
            effect.render(surface, zoom, params.theme);
        }
    }

    fn render_marbles(&self, surface: &mut dyn DrawSurface, params: &RenderParameters<'_>) {
        let finished = params.finished().len();
        let selected = params.selected_ranks();
        let viewport = params.camera.viewport(params.size);

        for (i, marble) in params.marbles.iter().enumerate() {
            let opts = MarbleRenderOptions {
                zoom: viewport.zoom,
                outlined: selected.contains(&(i + finished)),
                minimap: false,
                skin: self.skin(&marble.name),
                viewport,
                theme: params.theme,
                use_skills: params.use_skills,
            };
            marble.render(surface, params.physics, &opts);
        }
    }

    fn render_winner(
        surface: &mut dyn DrawSurface,
        params: &RenderParameters<'_>,
        width: f32,
        height: f32,
    ) {
        let winners = params.winners;
        if winners.is_empty() {
            return;
        }
        let theme = params.theme;

        let names = winners
            .iter()
            .map(|w| format!("#{} {}", w.position, w.marble.name))
            .collect::<Vec<_>>()
            .join(", ");

        let panel_width = width * 0.7;
        let panel_height = WINNER_PANEL_HEADER + WINNER_PANEL_CONTENT;
        let panel_x = (width - panel_width) / 2.0;
        let panel_y = (height - panel_height) / 2.0;
        let center_x = panel_x + panel_width / 2.0;

        guarded(surface, |s| {
            if theme.accent_glow.is_some() {
                let tint = theme.winner_background.with_alpha(0.95);
                let paint =
                    Paint::linear_even([panel_x, panel_y], [panel_x, height], &[tint, tint]);
                s.set_fill(paint);
            } else {
                s.set_fill(theme.winner_background.into());
            }
            s.fill_rect(panel_x, panel_y, panel_width, panel_height);

            if let Some(glow) = theme.accent_glow {
                s.set_stroke(glow.into());
                s.set_line_width(3.0);
                s.set_shadow(glow, 15.0);
                s.stroke_rect(panel_x, panel_y, panel_width, panel_height);
                s.set_shadow(Color::TRANSPARENT, 0.0);

                draw_decorative_star(s, panel_x + 20.0, panel_y + 30.0);
                draw_decorative_star(s, panel_x + panel_width - 40.0, panel_y + 30.0);
            }

            let title = winner_title(winners.len(), theme.is_festive());
            s.set_fill(theme.accent_glow.unwrap_or(Color::GOLD).into());
            s.set_stroke(theme.winner_outline.into());
            s.set_font(Font::px(64.0).bold());
            s.set_text_align(TextAlign::Center);
            s.set_line_width(6.0);
            s.stroke_text(title, center_x, panel_y + 75.0);
            s.fill_text(title, center_x, panel_y + 75.0);
            s.set_shadow(Color::TRANSPARENT, 0.0);

            let font_size = fit_font_size(s, &names, panel_width - 80.0);
            s.set_line_width((font_size / 15.0).max(2.0));
            s.set_fill(Color::WHITE.into());
            s.set_stroke(Color::BLACK.into());
            let names_y = panel_y + WINNER_PANEL_HEADER + 55.0;
            s.stroke_text(&names, center_x, names_y);
            s.fill_text(&names, center_x, names_y);
        });
    }
}

/// Panel heading for `count` winners.
pub fn winner_title(count: usize, festive: bool) -> &'static str {
    match (count > 1, festive) {
        (true, true) => "🎄 Winners! 🎄",
        (true, false) => "Winners",
        (false, true) => "🎄 Winner! 🎄",
        (false, false) => "Winner",
    }
}

/// Sets the largest bold font (52 px down to 20 px, 2 px steps) at which
/// `text` fits `max_width`, and returns its size. Stops at the floor even
/// when the text still overflows.
pub fn fit_font_size(surface: &mut dyn DrawSurface, text: &str, max_width: f32) -> f32 {
    let mut size = WINNER_FONT_MAX;
    surface.set_font(Font::px(size).bold());
    while surface.measure_text(text) > max_width && size > WINNER_FONT_MIN {
        size -= 2.0;
        surface.set_font(Font::px(size).bold());
    }
    size
}

fn draw_decorative_star(surface: &mut dyn DrawSurface, x: f32, y: f32) {
    guarded(surface, |s| {
        s.set_fill(Color::GOLD.into());
        s.set_shadow(Color::GOLD, 10.0);
        trace_polygon(s, star_points((x, y), 5, 15.0, 7.0, -PI / 2.0));
        s.fill();
    });
}

/// Draws stage entities with per-shape theme styling, in slice order.
pub(crate) fn draw_entities(
    surface: &mut dyn DrawSurface,
    entities: &[EntityState],
    theme: &ColorTheme,
) {
    guarded(surface, |s| {
        for entity in entities {
            let style = theme.entity.for_kind(entity.shape.kind());
            guarded(s, |s| {
                s.translate(entity.x, entity.y);
                s.rotate(entity.angle);
                s.set_fill(entity.color.unwrap_or(style.fill).into());
                s.set_stroke(entity.color.unwrap_or(style.outline).into());
                s.set_shadow(
                    entity.bloom_color.or(entity.color).unwrap_or(style.bloom),
                    style.bloom_radius,
                );

                match &entity.shape {
                    EntityShape::Polyline { points } => {
                        if let Some((first, rest)) = points.split_first() {
                            s.begin_path();
                            s.move_to(first[0], first[1]);
                            for point in rest {
                                s.line_to(point[0], point[1]);
                            }
                            s.stroke();
                        }
                    }
                    EntityShape::Box {
                        width,
                        height,
                        rotation,
                    } => {
                        let w = width * 2.0;
                        let h = height * 2.0;
                        s.rotate(*rotation);
                        s.fill_rect(-w / 2.0, -h / 2.0, w, h);
                        s.stroke_rect(-w / 2.0, -h / 2.0, w, h);
                    }
                    EntityShape::Circle { radius } => {
                        s.begin_path();
                        s.arc(0.0, 0.0, *radius, 0.0, TAU);
                        s.stroke();
                    }
                }
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::SkillEffect;
    use crate::recording::{DrawCommand, RecordingSurface};
    use crate::rng::{ScriptedRandom, SeededRandom};
    use crate::test_utils::FrameFixture as Fixture;

    struct Banner;

    impl UiObject for Banner {
        fn update(&mut self, _delta_time: f32, _params: &RenderParameters<'_>) {}

        fn render(
            &self,
            surface: &mut dyn DrawSurface,
            _params: &RenderParameters<'_>,
            _width: f32,
            _height: f32,
        ) {
            surface.fill_text("banner", 0.0, 0.0);
        }
    }

    fn renderer() -> RouletteRenderer {
        RouletteRenderer::new(&mut SeededRandom::new(9))
    }

    fn position_of(surface: &RecordingSurface, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        surface.commands().iter().position(pred).unwrap()
    }

    #[test]
    fn test_star_field_generated_once() {
        let renderer = renderer();
        assert_eq!(renderer.stars.len(), STAR_COUNT);
        for star in &renderer.stars {
            assert!((0.0..CANVAS_WIDTH).contains(&star.x));
            assert!((0.0..CANVAS_HEIGHT).contains(&star.y));
            assert!((1.0..3.0).contains(&star.size));
        }

        let mut fx = Fixture::new(0, 0);
        fx.theme = ColorTheme::christmas();
        let mut first = RecordingSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let mut second = RecordingSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        renderer.render(&mut first, &fx.params(&[]), &[]);
        renderer.render(&mut second, &fx.params(&[]), &[]);
        assert_eq!(first.commands(), second.commands());
        assert_eq!(first.count(|c| matches!(c, DrawCommand::Arc { .. })), STAR_COUNT);
    }

    #[test]
    fn test_solid_background_has_no_stars() {
        let fx = Fixture::new(0, 0);
        let mut surface = RecordingSurface::new(640.0, 480.0);
        renderer().render(&mut surface, &fx.params(&[]), &[]);

        assert_eq!(surface.commands()[0], DrawCommand::SetFill(Color::BLACK.into()));
        assert_eq!(surface.commands()[1], DrawCommand::FillRect(0.0, 0.0, 640.0, 480.0));
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Arc { .. })), 0);
        assert_eq!(surface.save_depth(), 0);
    }

    #[test]
    fn test_layer_order() {
        let mut fx = Fixture::new(3, 0);
        fx.particles.shot(10.0, 10.0);
        let winners = [SelectedWinner {
            marble: &fx.marbles[0],
            position: 1,
        }];
        let params = fx.params(&winners);

        let mut surface = RecordingSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        renderer().render(&mut surface, &params, &[&Banner]);

        let marble_name =
            position_of(&surface, |c| *c == DrawCommand::FillText("M0".into(), 0.0, 0.0));
        let banner =
            position_of(&surface, |c| matches!(c, DrawCommand::FillText(t, ..) if t == "banner"));
        let confetti = position_of(&surface, |c| *c == DrawCommand::Translate(10.0, 10.0));
        let title =
            position_of(&surface, |c| matches!(c, DrawCommand::FillText(t, ..) if t == "Winner"));
        assert!(marble_name < banner);
        assert!(banner < confetti);
        assert!(confetti < title);
    }

    #[test]
    fn test_outline_follows_selected_ranks() {
        let mut fx = Fixture::new(4, 2);
        fx.ranks = vec![3, 5];
        let mut surface = RecordingSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        renderer().render(&mut surface, &fx.params(&[]), &[]);

        let border = DrawCommand::SetStroke(fx.theme.marble_winning_border.into());
        assert_eq!(surface.count(|c| *c == border), 2);
    }

    #[test]
    fn test_entity_styling_and_override() {
        let mut fx = Fixture::new(0, 0);
        let mut boxed = EntityState::new(
            1.0,
            2.0,
            EntityShape::Box {
                width: 0.5,
                height: 0.25,
                rotation: 0.3,
            },
        );
        boxed.color = Some(Color::RED);
        fx.entities = vec![
            boxed,
            EntityState::new(0.0, 0.0, EntityShape::Circle { radius: 2.0 }),
            EntityState::new(0.0, 0.0, EntityShape::Polyline { points: Vec::new() }),
        ];

        let mut surface = RecordingSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        draw_entities(&mut surface, &fx.entities, &fx.theme);
        let commands = surface.commands();

        assert!(commands.contains(&DrawCommand::SetFill(Color::RED.into())));
        assert!(commands.contains(&DrawCommand::SetShadow(Color::RED, 15.0)));
        assert!(commands.contains(&DrawCommand::Rotate(0.3)));
        assert!(commands.contains(&DrawCommand::FillRect(-0.5, -0.25, 1.0, 0.5)));
        assert!(commands.contains(&DrawCommand::SetStroke(Color::YELLOW.into())));
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Stroke)), 1);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::MoveTo(..))), 0);
        assert_eq!(surface.save_depth(), 0);
    }

    #[test]
    fn test_destroyed_effects_not_drawn() {
        let mut fx = Fixture::new(0, 0);
        let mut rng = ScriptedRandom::constant(0.5);
        let mut done = SkillEffect::new(0.0, 0.0, &mut rng);
        done.update(600.0);
        let mut live = SkillEffect::new(0.0, 0.0, &mut rng);
        live.update(100.0);
        fx.effects = vec![Box::new(done), Box::new(live)];

        let mut surface = RecordingSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        renderer().render(&mut surface, &fx.params(&[]), &[]);
        let white_glow = DrawCommand::SetShadow(Color::WHITE, 10.0);
        assert_eq!(surface.count(|c| *c == white_glow), 1);
    }

    #[test]
    fn test_skin_registry() {
        let mut renderer = renderer();
        renderer.register_skin("M1", ImageId(7));
        assert_eq!(renderer.skin("M1"), Some(ImageId(7)));

        let fx = Fixture::new(2, 0);
        let mut surface = RecordingSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        renderer.render(&mut surface, &fx.params(&[]), &[]);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::DrawImage(ImageId(7), ..))), 1);
    }

    #[test]
    fn test_winner_titles() {
        assert_eq!(winner_title(1, false), "Winner");
        assert_eq!(winner_title(3, false), "Winners");
        assert_eq!(winner_title(1, true), "🎄 Winner! 🎄");
        assert_eq!(winner_title(2, true), "🎄 Winners! 🎄");
    }

    #[test]
    fn test_festive_panel_decorations() {
        let mut fx = Fixture::new(2, 0);
        fx.theme = ColorTheme::christmas();
        let winners = [
            SelectedWinner {
                marble: &fx.marbles[0],
                position: 1,
            },
            SelectedWinner {
                marble: &fx.marbles[1],
                position: 2,
            },
        ];
        let mut surface = RecordingSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        renderer().render(&mut surface, &fx.params(&winners), &[]);

        let texts = surface.filled_texts();
        assert!(texts.contains(&"🎄 Winners! 🎄"));
        assert!(texts.contains(&"#1 M0, #2 M1"));
        assert!(surface.commands().contains(&DrawCommand::SetShadow(Color::GOLD, 15.0)));
        assert!(surface.commands().contains(&DrawCommand::StrokeRect(180.0, 340.0, 840.0, 220.0)));
    }

    #[test]
    fn test_font_shrink_terminates() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        assert_eq!(fit_font_size(&mut surface, "short", 1000.0), 52.0);

        // 10 chars at 0.6 em: 40 px measures 240, 42 px measures 252
        assert_eq!(fit_font_size(&mut surface, "0123456789", 241.0), 40.0);

        let long = "x".repeat(500);
        assert_eq!(fit_font_size(&mut surface, &long, 10.0), 20.0);
        assert_eq!(surface.current_font(), Font::px(20.0).bold());
    }
}
