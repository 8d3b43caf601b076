//! Headless [`DrawSurface`] that records every call.
//!
//! Useful for rendering without a browser and for asserting on what a frame
//! drew. Text is measured with a fixed average glyph width.

use crate::color::Color;
use crate::surface::{DrawSurface, Font, ImageId, Paint, TextAlign, TextBaseline};

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.6;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    Scale(f32, f32),
    SetFill(Paint),
    SetStroke(Paint),
    SetLineWidth(f32),
    SetGlobalAlpha(f32),
    SetShadow(Color, f32),
    SetFont(Font),
    SetTextAlign(TextAlign),
    SetTextBaseline(TextBaseline),
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Arc {
        x: f32,
        y: f32,
        radius: f32,
        start: f32,
        end: f32,
    },
    Ellipse {
        x: f32,
        y: f32,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
    },
    Rect(f32, f32, f32, f32),
    ClosePath,
    Fill,
    Stroke,
    Clip,
    FillRect(f32, f32, f32, f32),
    StrokeRect(f32, f32, f32, f32),
    FillText(String, f32, f32),
    StrokeText(String, f32, f32),
    DrawImage(ImageId, f32, f32, f32, f32),
}

/// Surface that stores calls instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    font: Font,
    font_stack: Vec<Font>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            font: Font::default(),
            font_stack: Vec::new(),
        }
    }

    /// Resizes the surface, like resizing a canvas element.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops recorded commands, keeping size and font state.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Strings passed to `fill_text`, in draw order.
    pub fn filled_texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillText(text, _, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|cmd| pred(cmd)).count()
    }

    /// Current `save` nesting depth; 0 when every save was restored.
    pub fn save_depth(&self) -> usize {
        self.font_stack.len()
    }

    /// The font most recently set.
    pub fn current_font(&self) -> Font {
        self.font
    }

    fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn save(&mut self) {
        self.font_stack.push(self.font);
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(font) = self.font_stack.pop() {
            self.font = font;
        }
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::Translate(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.push(DrawCommand::Rotate(angle));
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::Scale(x, y));
    }

    fn set_fill(&mut self, paint: Paint) {
        self.push(DrawCommand::SetFill(paint));
    }

    fn set_stroke(&mut self, paint: Paint) {
        self.push(DrawCommand::SetStroke(paint));
    }

    fn set_line_width(&mut self, width: f32) {
        self.push(DrawCommand::SetLineWidth(width));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.push(DrawCommand::SetGlobalAlpha(alpha));
    }

    fn set_shadow(&mut self, color: Color, blur: f32) {
        self.push(DrawCommand::SetShadow(color, blur));
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
        self.push(DrawCommand::SetFont(font));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.push(DrawCommand::SetTextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.push(DrawCommand::SetTextBaseline(baseline));
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::LineTo(x, y));
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        self.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start,
            end,
        });
    }

    fn ellipse(
        &mut self,
        x: f32,
        y: f32,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
        _start_angle: f32,
        _end_angle: f32,
    ) {
        self.push(DrawCommand::Ellipse {
            x,
            y,
            radius_x,
            radius_y,
            rotation,
        });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::Rect(x, y, width, height));
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn clip(&mut self) {
        self.push(DrawCommand::Clip);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::FillRect(x, y, width, height));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::StrokeRect(x, y, width, height));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.push(DrawCommand::FillText(text.to_string(), x, y));
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        self.push(DrawCommand::StrokeText(text.to_string(), x, y));
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font.size_px() * GLYPH_WIDTH_RATIO
    }

    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::DrawImage(image, x, y, width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_uses_current_font() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.set_font(Font::px(10.0));
        assert!((surface.measure_text("abcd") - 24.0).abs() < 1e-4);

        surface.save();
        surface.set_font(Font::px(20.0));
        assert!((surface.measure_text("abcd") - 48.0).abs() < 1e-4);
        surface.restore();

        assert_eq!(surface.current_font(), Font::px(10.0));
        assert_eq!(surface.save_depth(), 0);
    }

    #[test]
    fn test_surface_reused_across_frames() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.set_font(Font::px(20.0));
        surface.fill_rect(0.0, 0.0, 100.0, 100.0);

        surface.clear();
        surface.resize(640.0, 480.0);
        assert!(surface.commands().is_empty());
        assert_eq!((surface.width(), surface.height()), (640.0, 480.0));
        assert_eq!(surface.current_font(), Font::px(20.0));
    }

    #[test]
    fn test_filled_texts_in_order() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.fill_text("a", 0.0, 0.0);
        surface.stroke_text("b", 0.0, 0.0);
        surface.fill_text("c", 0.0, 0.0);
        assert_eq!(surface.filled_texts(), vec!["a", "c"]);
    }
}
