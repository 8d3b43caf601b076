//! Whole-stage overview drawn in the top-left corner.

use crate::marble::MarbleRenderOptions;
use crate::render::{RenderParameters, UiObject, draw_entities};
use crate::surface::{DrawSurface, guarded};

const MINIMAP_SCALE: f32 = 4.0;
const MINIMAP_OFFSET: f32 = 10.0;
/// Stage width in world units.
const STAGE_WIDTH: f32 = 26.0;

#[derive(Debug, Clone, Default)]
pub struct Minimap;

impl Minimap {
    pub fn new() -> Self {
        Self
    }
}

impl UiObject for Minimap {
    fn update(&mut self, _delta_time: f32, _params: &RenderParameters<'_>) {}

    fn render(
        &self,
        surface: &mut dyn DrawSurface,
        params: &RenderParameters<'_>,
        _width: f32,
        _height: f32,
    ) {
        let theme = params.theme;
        let viewport = params.camera.viewport(params.size);

        guarded(surface, |s| {
            s.translate(MINIMAP_OFFSET, MINIMAP_OFFSET);
            s.scale(MINIMAP_SCALE, MINIMAP_SCALE);
            s.set_line_width(1.0 / MINIMAP_SCALE);

            s.set_fill(theme.minimap_background.into());
            s.fill_rect(0.0, 0.0, STAGE_WIDTH, params.stage.goal_y);

            draw_entities(s, params.entities, theme);

            let opts = MarbleRenderOptions {
                zoom: viewport.zoom,
                outlined: false,
                minimap: true,
                skin: None,
                viewport,
                theme,
                use_skills: false,
            };
            for marble in params.finished().iter().chain(params.marbles) {
                marble.render(s, params.physics, &opts);
            }

            let (x, y, w, h) = viewport.world_rect();
            s.set_stroke(theme.minimap_viewport.into());
            s.set_line_width(1.0 / MINIMAP_SCALE);
            s.stroke_rect(x, y, w, h);
        });
    }
}
