//! World-to-screen camera with smoothed follow.

use glam::Vec2;

use crate::render::INITIAL_ZOOM;
use crate::surface::DrawSurface;

/// Fraction of the remaining distance covered per 16 ms frame.
const EASE_PER_FRAME: f32 = 0.1;
const FRAME_MS: f32 = 16.0;

/// Visible world rectangle used for culling.
///
/// `zoom` is the full world-to-pixel scale (camera zoom times
/// [`INITIAL_ZOOM`]), `w`/`h` are the surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub zoom: f32,
}

impl Viewport {
    /// Whether an entity of `size` centered at (`x`, `y`) may be visible.
    ///
    /// The top edge is extended by half the entity size so marbles entering
    /// from above are not clipped early.
    pub fn contains(&self, x: f32, y: f32, size: f32) -> bool {
        let hw = self.w / self.zoom / 2.0;
        let hh = self.h / self.zoom / 2.0;
        let left = self.x - hw;
        let right = self.x + hw;
        let top = self.y - hh - size / 2.0;
        let bottom = self.y + hh;
        x >= left && x <= right && y >= top && y <= bottom
    }

    /// The visible rectangle as `(x, y, width, height)` in world units.
    pub fn world_rect(&self) -> (f32, f32, f32, f32) {
        let w = self.w / self.zoom;
        let h = self.h / self.zoom;
        (self.x - w / 2.0, self.y - h / 2.0, w, h)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec2,
    target_position: Vec2,
    zoom: f32,
    target_zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            target_position: Vec2::ZERO,
            zoom: 1.0,
            target_zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the camera immediately, dropping any pending follow.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        self.target_position = self.position;
    }

    /// Sets the point the camera eases toward.
    pub fn follow(&mut self, x: f32, y: f32) {
        self.target_position = Vec2::new(x, y);
    }

    /// Sets the zoom the camera eases toward. Non-positive values are ignored.
    pub fn zoom_to(&mut self, zoom: f32) {
        if zoom > 0.0 {
            self.target_zoom = zoom;
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom > 0.0 {
            self.zoom = zoom;
            self.target_zoom = zoom;
        }
    }

    pub fn update(&mut self, delta_time: f32) {
        let frames = (delta_time / FRAME_MS).max(0.0);
        let t = 1.0 - (1.0 - EASE_PER_FRAME).powf(frames);
        self.position = self.position.lerp(self.target_position, t);
        self.zoom += (self.target_zoom - self.zoom) * t;
    }

    /// Culling rectangle for a surface of `size` pixels.
    pub fn viewport(&self, size: (f32, f32)) -> Viewport {
        Viewport {
            x: self.position.x,
            y: self.position.y,
            w: size.0,
            h: size.1,
            zoom: self.zoom * INITIAL_ZOOM,
        }
    }

    /// Runs `draw` with the world transform applied, centered on the camera.
    pub fn render_scene<F>(&self, surface: &mut dyn DrawSurface, width: f32, height: f32, draw: F)
    where
        F: FnOnce(&mut dyn DrawSurface),
    {
        let scale = INITIAL_ZOOM * self.zoom;
        surface.save();
        surface.translate(width / 2.0, height / 2.0);
        surface.scale(scale, scale);
        surface.translate(-self.position.x, -self.position.y);
        draw(surface);
        surface.restore();
    }
}
