//! Scrolling standings overlay.
//!
//! The list autoscrolls to keep the next finisher in view until the user
//! scrolls by hand, which holds the position for [`USER_SCROLL_HOLD`] ms.

use std::fmt;
use std::rc::Rc;

use crate::color::Color;
use crate::error::RouletteError;
use crate::render::{RenderParameters, UiObject};
use crate::surface::{DrawSurface, Font, TextAlign, guarded};

/// How long manual scrolling suppresses autoscroll, in milliseconds.
pub const USER_SCROLL_HOLD: f32 = 2000.0;

/// Message reported after the standings were copied.
pub const COPY_MESSAGE: &str = "The result has been copied";

const BASE_ROW_HEIGHT: f32 = 16.0;
const BASE_WIDTH: f32 = 1280.0;
const SCROLL_SMOOTHING_MS: f32 = 250.0;

/// Asynchronous text sink for the standings export.
///
/// Implementations call `done` once the write settles. They must not call it
/// re-entrantly from inside a borrow of the overlay.
pub trait Clipboard {
    fn write_text(&self, text: &str, done: Box<dyn FnOnce(Result<(), RouletteError>)>);
}

/// Standings captured on the last update, used by the export.
#[derive(Debug, Clone, Default, PartialEq)]
struct Standings {
    names: Vec<String>,
    finished: usize,
    selected: Vec<usize>,
}

pub struct RankRenderer {
    current_y: f32,
    target_y: f32,
    user_moved: f32,
    max_y: f32,
    row_height: f32,
    standings: Standings,
    message_handler: Option<Rc<dyn Fn(&str)>>,
    clipboard: Option<Rc<dyn Clipboard>>,
}

impl fmt::Debug for RankRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankRenderer")
            .field("current_y", &self.current_y)
            .field("target_y", &self.target_y)
            .field("user_moved", &self.user_moved)
            .field("max_y", &self.max_y)
            .field("standings", &self.standings)
            .finish_non_exhaustive()
    }
}

impl Default for RankRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RankRenderer {
    pub fn new() -> Self {
        Self {
            current_y: 0.0,
            target_y: 0.0,
            user_moved: 0.0,
            max_y: 0.0,
            row_height: BASE_ROW_HEIGHT,
            standings: Standings::default(),
            message_handler: None,
            clipboard: None,
        }
    }

    pub fn current_y(&self) -> f32 {
        self.current_y
    }

    pub fn target_y(&self) -> f32 {
        self.target_y
    }

    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Registers the callback that receives user-facing messages.
    pub fn on_message(&mut self, handler: Rc<dyn Fn(&str)>) {
        self.message_handler = Some(handler);
    }

    pub fn set_clipboard(&mut self, clipboard: Rc<dyn Clipboard>) {
        self.clipboard = Some(clipboard);
    }

    /// Scrolls by `delta_y` pixels and holds autoscroll off for a while.
    pub fn on_wheel(&mut self, delta_y: f32) {
        self.target_y = (self.target_y + delta_y).clamp(0.0, self.max_y);
        self.user_moved = USER_SCROLL_HOLD;
    }

    /// Copies the standings as a tab-separated table.
    pub fn on_double_click(&self) {
        let Some(clipboard) = &self.clipboard else {
            tracing::debug!("[rank] No clipboard available, skipping copy");
            return;
        };

        let handler = self.message_handler.clone();
        clipboard.write_text(
            &self.standings_tsv(),
            Box::new(move |result| match result {
                Ok(()) => {
                    if let Some(handler) = handler {
                        handler(COPY_MESSAGE);
                    }
                }
                Err(err) => tracing::warn!("[rank] Failed to copy standings: {}", err),
            }),
        );
    }

    /// `Rank`, `Name`, `Winner` rows for every entrant, finishers first.
    pub fn standings_tsv(&self) -> String {
        let mut lines = vec!["Rank\tName\tWinner".to_string()];
        lines.extend(self.standings.names.iter().enumerate().map(|(i, name)| {
            let mark = if self.standings.selected.contains(&i) { "☆" } else { "" };
            format!("{}\t{}\t{}", i + 1, name, mark)
        }));
        lines.join("\n")
    }

    fn refresh(&mut self, params: &RenderParameters<'_>) {
        let finished = params.finished();
        let total = finished.len() + params.marbles.len();

        self.row_height = BASE_ROW_HEIGHT * scale_for(params.size.0);
        self.max_y = ((total + 1) as f32 * self.row_height).max(0.0);
        self.standings = Standings {
            names: finished
                .iter()
                .chain(params.marbles)
                .map(|m| m.name.clone())
                .collect(),
            finished: finished.len(),
            selected: params.selected_ranks(),
        };
    }
}

fn scale_for(width: f32) -> f32 {
    (width / BASE_WIDTH).max(1.0)
}

impl UiObject for RankRenderer {
    fn update(&mut self, delta_time: f32, params: &RenderParameters<'_>) {
        self.refresh(params);

        if self.user_moved > 0.0 {
            self.user_moved -= delta_time;
        } else {
            self.target_y = self.standings.finished as f32 * self.row_height + self.row_height;
        }

        let step = (delta_time / SCROLL_SMOOTHING_MS).clamp(0.0, 1.0);
        self.current_y += (self.target_y - self.current_y) * step;
        if (self.current_y - self.target_y).abs() < 1.0 {
            self.current_y = self.target_y;
        }
    }

    fn render(
        &self,
        surface: &mut dyn DrawSurface,
        params: &RenderParameters<'_>,
        width: f32,
        height: f32,
    ) {
        let scale = scale_for(width);
        let row_height = BASE_ROW_HEIGHT * scale;
        let finished = params.finished();
        let racing = params.marbles;
        let total = finished.len() + racing.len();
        let selected = params.selected_ranks();
        let theme = params.theme;

        let start_x = width - 10.0 * scale;
        let start_y = (self.current_y - height / 2.0).max(-row_height);
        let clip_width = 200.0 * scale;
        let list_height = (total + 1) as f32 * row_height;
        let visible = |y: f32| y >= start_y && y <= start_y + height;

        guarded(surface, |s| {
            s.set_text_align(TextAlign::Right);
            s.set_font(Font::pt(10.0 * scale));
            s.set_fill(Color::GRAY.into());
            s.fill_text(&format!("{} / {}", finished.len(), total), start_x, row_height);

            s.begin_path();
            s.rect(width - clip_width, row_height + 2.0, clip_width, list_height);
            s.clip();
            s.translate(0.0, -start_y);
            if let Some(stroke) = theme.rank_stroke {
                s.set_stroke(stroke.into());
                s.set_line_width(scale);
            }

            let rows = finished.iter().chain(racing).enumerate();
            for (rank, marble) in rows {
                let y = rank as f32 * row_height;
                if rank == finished.len() {
                    s.set_font(Font::pt(10.0 * scale));
                } else if rank == 0 {
                    s.set_font(Font::pt(11.0 * scale).bold());
                }
                if !visible(y) {
                    continue;
                }

                let label = if rank < finished.len() {
                    let mark = if selected.contains(&rank) { '☆' } else { '\u{2714}' };
                    format!("{mark} {} #{}", marble.name, rank + 1)
                } else {
                    format!("{} #{}", marble.name, rank + 1)
                };
                let text_y = 20.0 * scale + y;
                s.set_fill(Color::hsl(marble.hue, 100.0, theme.marble_lightness).into());
                if theme.rank_stroke.is_some() {
                    s.stroke_text(&label, start_x, text_y);
                }
                s.fill_text(&label, start_x, text_y);
            }
        });
    }
}
