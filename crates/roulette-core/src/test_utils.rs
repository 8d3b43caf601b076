//! Test utilities for headless simulation and render tests.
//!
//! Provides `FixedPhysics`, a [`MarblePhysics`] stub whose poses are set by
//! hand, so marble logic can be driven without a physics step, and
//! `FrameFixture`, which owns everything a [`RenderParameters`] borrows.

use std::collections::HashMap;

use crate::camera::Camera;
use crate::effects::Effect;
use crate::marble::{Marble, MarbleId};
use crate::particles::ParticleManager;
use crate::physics::{MarblePhysics, MarblePose};
use crate::render::{CANVAS_HEIGHT, CANVAS_WIDTH, RenderParameters, SelectedWinner};
use crate::rng::{ScriptedRandom, SeededRandom};
use crate::stage::{EntityState, StageDef};
use crate::theme::ColorTheme;

/// Physics stub with hand-placed poses.
///
/// `create_marble` records the request and places the marble there;
/// `shake_marble` only counts.
#[derive(Debug, Default)]
pub(crate) struct FixedPhysics {
    poses: HashMap<MarbleId, MarblePose>,
    shake_counts: HashMap<MarbleId, usize>,
    pub created: Vec<(MarbleId, f32, f32)>,
}

impl FixedPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pose(&mut self, id: MarbleId, x: f32, y: f32, angle: f32) {
        self.poses.insert(id, MarblePose::new(x, y, angle));
    }

    /// Number of shakes issued for `id`.
    pub fn shakes(&self, id: MarbleId) -> usize {
        self.shake_counts.get(&id).copied().unwrap_or(0)
    }
}

impl MarblePhysics for FixedPhysics {
    fn marble_position(&self, id: MarbleId) -> Option<MarblePose> {
        self.poses.get(&id).copied()
    }

    fn create_marble(&mut self, id: MarbleId, x: f32, y: f32) {
        self.created.push((id, x, y));
        self.poses.insert(id, MarblePose::new(x, y, 0.0));
    }

    fn shake_marble(&mut self, id: MarbleId) {
        *self.shake_counts.entry(id).or_default() += 1;
    }
}

/// Owned frame state for renderer and overlay tests.
///
/// Every marble sits at the origin, which the default camera sees.
pub(crate) struct FrameFixture {
    pub camera: Camera,
    pub stage: StageDef,
    pub entities: Vec<EntityState>,
    pub marbles: Vec<Marble>,
    pub finished: Vec<Marble>,
    pub physics: FixedPhysics,
    pub particles: ParticleManager,
    pub effects: Vec<Box<dyn Effect>>,
    pub theme: ColorTheme,
    pub ranks: Vec<usize>,
    pub size: (f32, f32),
}

impl FrameFixture {
    /// `finished` marbles (ids `0..finished`) followed by `racing` ones.
    pub fn new(racing: u32, finished: u32) -> Self {
        let mut physics = FixedPhysics::new();
        let mut rng = ScriptedRandom::constant(0.5);
        let total = racing + finished;
        let mut marbles: Vec<Marble> = (0..total)
            .map(|i| Marble::new(&mut physics, i, total, None, 1.0, &mut rng))
            .collect();
        for i in 0..total {
            physics.set_pose(i, 0.0, 0.0, 0.0);
        }
        let racing = marbles.split_off(finished as usize);
        Self {
            camera: Camera::new(),
            stage: StageDef::default(),
            entities: Vec::new(),
            marbles: racing,
            finished: marbles,
            physics,
            particles: ParticleManager::new(Box::new(SeededRandom::new(1))),
            effects: Vec::new(),
            theme: ColorTheme::dark(),
            ranks: vec![0],
            size: (CANVAS_WIDTH, CANVAS_HEIGHT),
        }
    }

    pub fn params<'a>(&'a self, winners: &'a [SelectedWinner<'a>]) -> RenderParameters<'a> {
        RenderParameters {
            camera: &self.camera,
            stage: &self.stage,
            entities: &self.entities,
            marbles: &self.marbles,
            physics: &self.physics,
            winners,
            all_winners: Some(&self.finished),
            particle_manager: &self.particles,
            effects: &self.effects,
            winner_rank: 0,
            winner_ranks: Some(&self.ranks),
            theme: &self.theme,
            size: self.size,
            use_skills: false,
        }
    }
}
