//! Immediate-mode 2D drawing contract.
//!
//! The renderer only talks to a [`DrawSurface`]. Any canvas-like backend that
//! offers paths, text, a transform stack, gradients and clipping can drive it.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Opaque handle to a preloaded image owned by the surface backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u32);

/// One color stop of a gradient (`offset` in `[0, 1]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Fill or stroke paint.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear {
        start: [f32; 2],
        end: [f32; 2],
        stops: Vec<GradientStop>,
    },
    Radial {
        inner_center: [f32; 2],
        inner_radius: f32,
        outer_center: [f32; 2],
        outer_radius: f32,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Linear gradient with evenly spaced stops.
    pub fn linear_even(start: [f32; 2], end: [f32; 2], colors: &[Color]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f32;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, color)| GradientStop::new(i as f32 / last, *color))
            .collect();
        Self::Linear { start, end, stops }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

/// Size unit of a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontUnit {
    Px,
    Pt,
}

/// Sans-serif font description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f32,
    pub unit: FontUnit,
    pub bold: bool,
}

impl Font {
    pub const fn px(size: f32) -> Self {
        Self {
            size,
            unit: FontUnit::Px,
            bold: false,
        }
    }

    pub const fn pt(size: f32) -> Self {
        Self {
            size,
            unit: FontUnit::Pt,
            bold: false,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Font size in CSS pixels.
    pub fn size_px(&self) -> f32 {
        match self.unit {
            FontUnit::Px => self.size,
            FontUnit::Pt => self.size * 4.0 / 3.0,
        }
    }

    /// CSS font shorthand, e.g. `bold 21pt sans-serif`.
    pub fn to_css(&self) -> String {
        let unit = match self.unit {
            FontUnit::Px => "px",
            FontUnit::Pt => "pt",
        };
        if self.bold {
            format!("bold {}{unit} sans-serif", self.size)
        } else {
            format!("{}{unit} sans-serif", self.size)
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::px(10.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    Middle,
    #[default]
    Alphabetic,
}

/// What the renderer needs from a 2D context.
///
/// All calls are infallible: a backend that can fail swallows the error, the
/// same way a canvas silently ignores a bad path.
pub trait DrawSurface {
    /// Surface width in pixels.
    fn width(&self) -> f32;
    /// Surface height in pixels.
    fn height(&self) -> f32;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    fn scale(&mut self, x: f32, y: f32);

    fn set_fill(&mut self, paint: Paint);
    fn set_stroke(&mut self, paint: Paint);
    fn set_line_width(&mut self, width: f32);
    fn set_global_alpha(&mut self, alpha: f32);
    /// Glow behind subsequent draws. A blur of 0 disables it.
    fn set_shadow(&mut self, color: Color, blur: f32);

    fn set_font(&mut self, font: Font);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32);
    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &mut self,
        x: f32,
        y: f32,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
    );
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    /// Intersects the clip region with the current path.
    fn clip(&mut self);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    fn stroke_text(&mut self, text: &str, x: f32, y: f32);
    /// Width of `text` in the current font, in current user units.
    fn measure_text(&mut self, text: &str) -> f32;

    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32);
}

/// Runs `draw` between `save` and `restore`.
pub fn guarded<S, F>(surface: &mut S, draw: F)
where
    S: DrawSurface + ?Sized,
    F: FnOnce(&mut S),
{
    surface.save();
    draw(surface);
    surface.restore();
}

/// Traces a closed polygon through `points` (does not fill or stroke).
pub fn trace_polygon<S>(surface: &mut S, points: impl IntoIterator<Item = (f32, f32)>)
where
    S: DrawSurface + ?Sized,
{
    surface.begin_path();
    for (i, (x, y)) in points.into_iter().enumerate() {
        if i == 0 {
            surface.move_to(x, y);
        } else {
            surface.line_to(x, y);
        }
    }
    surface.close_path();
}

/// Points of a star with `spikes` tips alternating between the two radii.
pub fn star_points(
    center: (f32, f32),
    spikes: usize,
    outer_radius: f32,
    inner_radius: f32,
    rotation: f32,
) -> Vec<(f32, f32)> {
    use std::f32::consts::PI;

    let step = PI / spikes as f32;
    (0..spikes * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            let angle = rotation + step * i as f32;
            (center.0 + angle.cos() * radius, center.1 + angle.sin() * radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_css() {
        assert_eq!(Font::pt(21.0).bold().to_css(), "bold 21pt sans-serif");
        assert_eq!(Font::px(52.0).to_css(), "52px sans-serif");
        assert!((Font::pt(12.0).size_px() - 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_linear_even_offsets() {
        let colors = [Color::RED, Color::WHITE, Color::BLACK];
        let paint = Paint::linear_even([0.0, 0.0], [0.0, 1.0], &colors);
        let Paint::Linear { stops, .. } = paint else {
            panic!("expected linear gradient");
        };
        let offsets: Vec<f32> = stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_star_points_alternate() {
        let points = star_points((0.0, 0.0), 5, 10.0, 4.0, 0.0);
        assert_eq!(points.len(), 10);
        let outer = (points[0].0.powi(2) + points[0].1.powi(2)).sqrt();
        let inner = (points[1].0.powi(2) + points[1].1.powi(2)).sqrt();
        assert!((outer - 10.0).abs() < 1e-4);
        assert!((inner - 4.0).abs() < 1e-4);
    }
}
