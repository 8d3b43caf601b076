//! Stage data received from the map layer.
//!
//! Map definitions themselves live outside this crate; only the pose and
//! shape of each entity at draw time cross the boundary.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Static description of the stage being raced on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDef {
    pub title: String,
    /// World y coordinate of the finish line.
    pub goal_y: f32,
    /// World y below which the camera zooms in on the leaders.
    #[serde(default)]
    pub zoom_y: Option<f32>,
}

impl Default for StageDef {
    fn default() -> Self {
        Self {
            title: String::new(),
            goal_y: 111.0,
            zoom_y: None,
        }
    }
}

/// Discriminant of [`EntityShape`], used to look styling up in a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Box,
    Circle,
    Polyline,
}

/// Shape of a stage entity in its local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityShape {
    Box {
        /// Half width.
        width: f32,
        /// Half height.
        height: f32,
        #[serde(default)]
        rotation: f32,
    },
    Circle {
        radius: f32,
    },
    Polyline {
        points: Vec<[f32; 2]>,
    },
}

impl EntityShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Box { .. } => ShapeKind::Box,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Polyline { .. } => ShapeKind::Polyline,
        }
    }
}

/// Pose and styling overrides of one stage entity for this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub angle: f32,
    pub shape: EntityShape,
    /// Replaces both theme fill and outline.
    #[serde(default)]
    pub color: Option<Color>,
    /// Replaces the theme glow color.
    #[serde(default)]
    pub bloom_color: Option<Color>,
}

impl EntityState {
    pub fn new(x: f32, y: f32, shape: EntityShape) -> Self {
        Self {
            x,
            y,
            angle: 0.0,
            shape,
            color: None,
            bloom_color: None,
        }
    }
}
