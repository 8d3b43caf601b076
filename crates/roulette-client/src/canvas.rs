//! [`DrawSurface`] over a browser `CanvasRenderingContext2d`.

use std::collections::HashMap;

use roulette_core::surface::GradientStop;
use roulette_core::{Color, DrawSurface, Font, ImageId, Paint, TextAlign, TextBaseline};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::css;

/// Draws onto a 2D canvas context.
///
/// Canvas calls that can throw (transforms, arcs, text) are best effort: a
/// failing call is skipped and the frame continues.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: HashMap<ImageId, HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            images: HashMap::new(),
        })
    }

    /// Looks up a canvas element by DOM id.
    pub fn from_element_id(id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("no element '{id}'")))?
            .dyn_into::<HtmlCanvasElement>()?;
        Self::new(canvas)
    }

    /// Matches the backing store to the window size.
    pub fn fit_to_window(&self) {
        if let Some(window) = web_sys::window() {
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0) as u32;
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0) as u32;
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            tracing::info!("[canvas] Resized to {}x{}", w, h);
        }
    }

    /// Starts loading `src` and registers it under `id`. Drawing an image
    /// that has not finished loading is a no-op.
    pub fn load_image(&mut self, id: ImageId, src: &str) -> Result<(), JsValue> {
        let image = HtmlImageElement::new()?;
        image.set_src(src);
        self.images.insert(id, image);
        tracing::debug!("[canvas] Loading image {:?} from {}", id, src);
        Ok(())
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn gradient(&self, paint: &Paint) -> Option<CanvasGradient> {
        let (gradient, stops) = match paint {
            Paint::Solid(_) => return None,
            Paint::Linear { start, end, stops } => (
                self.ctx.create_linear_gradient(
                    f64::from(start[0]),
                    f64::from(start[1]),
                    f64::from(end[0]),
                    f64::from(end[1]),
                ),
                stops,
            ),
            Paint::Radial {
                inner_center,
                inner_radius,
                outer_center,
                outer_radius,
                stops,
            } => (
                self.ctx
                    .create_radial_gradient(
                        f64::from(inner_center[0]),
                        f64::from(inner_center[1]),
                        f64::from(*inner_radius),
                        f64::from(outer_center[0]),
                        f64::from(outer_center[1]),
                        f64::from(*outer_radius),
                    )
                    .ok()?,
                stops,
            ),
        };
        add_stops(&gradient, stops);
        Some(gradient)
    }
}

fn add_stops(gradient: &CanvasGradient, stops: &[GradientStop]) {
    for stop in stops {
        if gradient.add_color_stop(stop.offset, &stop.color.to_css()).is_err() {
            tracing::debug!("[canvas] Rejected gradient stop at {}", stop.offset);
        }
    }
}

fn css_color(paint: &Paint) -> Option<String> {
    match paint {
        Paint::Solid(color) => Some(color.to_css()),
        _ => None,
    }
}

impl DrawSurface for CanvasSurface {
    fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.ctx.translate(f64::from(x), f64::from(y)).ok();
    }

    fn rotate(&mut self, angle: f32) {
        self.ctx.rotate(f64::from(angle)).ok();
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.ctx.scale(f64::from(x), f64::from(y)).ok();
    }

    fn set_fill(&mut self, paint: Paint) {
        if let Some(color) = css_color(&paint) {
            self.ctx.set_fill_style_str(&color);
        } else if let Some(gradient) = self.gradient(&paint) {
            self.ctx.set_fill_style_canvas_gradient(&gradient);
        }
    }

    fn set_stroke(&mut self, paint: Paint) {
        if let Some(color) = css_color(&paint) {
            self.ctx.set_stroke_style_str(&color);
        } else if let Some(gradient) = self.gradient(&paint) {
            self.ctx.set_stroke_style_canvas_gradient(&gradient);
        }
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(f64::from(width));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(f64::from(alpha));
    }

    fn set_shadow(&mut self, color: Color, blur: f32) {
        self.ctx.set_shadow_color(&color.to_css());
        self.ctx.set_shadow_blur(f64::from(blur));
    }

    fn set_font(&mut self, font: Font) {
        self.ctx.set_font(&font.to_css());
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ctx.set_text_align(css::text_align(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ctx.set_text_baseline(css::text_baseline(baseline));
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(f64::from(x), f64::from(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(f64::from(x), f64::from(y));
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        self.ctx
            .arc(
                f64::from(x),
                f64::from(y),
                f64::from(radius),
                f64::from(start_angle),
                f64::from(end_angle),
            )
            .ok();
    }

    fn ellipse(
        &mut self,
        x: f32,
        y: f32,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
    ) {
        self.ctx
            .ellipse(
                f64::from(x),
                f64::from(y),
                f64::from(radius_x),
                f64::from(radius_y),
                f64::from(rotation),
                f64::from(start_angle),
                f64::from(end_angle),
            )
            .ok();
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx.rect(
            f64::from(x),
            f64::from(y),
            f64::from(width),
            f64::from(height),
        );
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn clip(&mut self) {
        self.ctx.clip();
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx.fill_rect(
            f64::from(x),
            f64::from(y),
            f64::from(width),
            f64::from(height),
        );
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx.stroke_rect(
            f64::from(x),
            f64::from(y),
            f64::from(width),
            f64::from(height),
        );
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.ctx.fill_text(text, f64::from(x), f64::from(y)).ok();
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        self.ctx.stroke_text(text, f64::from(x), f64::from(y)).ok();
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        self.ctx
            .measure_text(text)
            .map(|metrics| metrics.width() as f32)
            .unwrap_or(0.0)
    }

    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32) {
        let Some(element) = self.images.get(&image) else {
            return;
        };
        if !element.complete() {
            return;
        }
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                element,
                f64::from(x),
                f64::from(y),
                f64::from(width),
                f64::from(height),
            )
            .ok();
    }
}
