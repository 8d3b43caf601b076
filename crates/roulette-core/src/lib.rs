//! Marble Roulette Core Library
//!
//! Simulation-side state and frame composition for a marble race.
//!
//! Every frame the host loop first calls `update` on marbles, effects, the
//! particle pool and the UI overlays, then hands a [`RenderParameters`] bundle
//! to [`RouletteRenderer::render`]. Positions are never owned here: they are
//! looked up through the [`MarblePhysics`] contract each time they are read.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod camera;
pub mod color;
pub mod effects;
pub mod error;
pub mod marble;
pub mod minimap;
pub mod options;
pub mod particles;
pub mod physics;
pub mod rank;
pub mod recording;
pub mod render;
pub mod rng;
pub mod stage;
pub mod surface;
pub mod theme;

#[cfg(test)]
pub(crate) mod test_utils;

pub use camera::{Camera, Viewport};
pub use color::Color;
pub use effects::{Effect, Particle, SkillEffect, SnowParticle};
pub use error::RouletteError;
pub use marble::{Marble, MarbleId, STUCK_DELAY, Skill};
pub use minimap::Minimap;
pub use options::RaceOptions;
pub use particles::{ConfettiPalette, ParticleManager};
pub use physics::{MarblePhysics, MarblePose, PHYSICS_DT, RapierMarblePhysics};
pub use rank::{Clipboard, RankRenderer};
pub use recording::{DrawCommand, RecordingSurface};
pub use render::{INITIAL_ZOOM, RenderParameters, RouletteRenderer, SelectedWinner, UiObject};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use stage::{EntityShape, EntityState, ShapeKind, StageDef};
pub use surface::{DrawSurface, Font, ImageId, Paint, TextAlign, TextBaseline};
pub use theme::{ColorTheme, ShapeColor, ThemeRegistry};
