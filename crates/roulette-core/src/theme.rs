//! Color themes and the registry they are selected from by name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::RouletteError;
use crate::stage::ShapeKind;

/// Styling for one kind of stage shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub fill: Color,
    pub outline: Color,
    pub bloom: Color,
    pub bloom_radius: f32,
}

impl ShapeColor {
    pub const fn new(fill: Color, outline: Color, bloom: Color, bloom_radius: f32) -> Self {
        Self {
            fill,
            outline,
            bloom,
            bloom_radius,
        }
    }
}

/// Per-shape styling table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityColors {
    #[serde(rename = "box")]
    pub box_shape: ShapeColor,
    pub circle: ShapeColor,
    pub polyline: ShapeColor,
}

impl EntityColors {
    pub fn for_kind(&self, kind: ShapeKind) -> &ShapeColor {
        match kind {
            ShapeKind::Box => &self.box_shape,
            ShapeKind::Circle => &self.circle,
            ShapeKind::Polyline => &self.polyline,
        }
    }
}

/// Immutable styling bundle consumed by every render call of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTheme {
    pub background: Color,
    /// Lightness (percent) of the marble body mid-tone.
    pub marble_lightness: f32,
    pub marble_winning_border: Color,
    pub skill_color: Color,
    pub cool_time_indicator: Color,
    pub entity: EntityColors,
    #[serde(default)]
    pub rank_stroke: Option<Color>,
    pub minimap_background: Color,
    pub minimap_viewport: Color,
    pub winner_text: Color,
    pub winner_outline: Color,
    pub winner_background: Color,

    /// Top-to-bottom gradient replacing the solid background.
    #[serde(default)]
    pub background_gradient: Option<Vec<Color>>,
    #[serde(default)]
    pub glass_blur: Option<f32>,
    #[serde(default)]
    pub glass_opacity: Option<f32>,
    /// Festive glow color; its presence enables the decorated winner panel.
    #[serde(default)]
    pub accent_glow: Option<Color>,
    #[serde(default)]
    pub snow_color: Option<Color>,
}

impl ColorTheme {
    pub fn light() -> Self {
        Self {
            background: Color::rgb(238, 238, 238),
            marble_lightness: 50.0,
            marble_winning_border: Color::BLACK,
            skill_color: Color::rgb(102, 153, 204),
            cool_time_indicator: Color::rgb(153, 153, 153),
            entity: EntityColors {
                box_shape: ShapeColor::new(
                    Color::rgb(34, 111, 146),
                    Color::BLACK,
                    Color::CYAN,
                    0.0,
                ),
                circle: ShapeColor::new(
                    Color::YELLOW,
                    Color::rgb(237, 126, 17),
                    Color::YELLOW,
                    0.0,
                ),
                polyline: ShapeColor::new(Color::WHITE, Color::BLACK, Color::CYAN, 0.0),
            },
            rank_stroke: Some(Color::BLACK),
            minimap_background: Color::rgb(254, 254, 254),
            minimap_viewport: Color::rgb(102, 153, 204),
            winner_text: Color::rgb(204, 204, 204),
            winner_outline: Color::BLACK,
            winner_background: Color::WHITE.with_alpha(0.5),
            background_gradient: None,
            glass_blur: None,
            glass_opacity: None,
            accent_glow: None,
            snow_color: None,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::BLACK,
            marble_lightness: 75.0,
            marble_winning_border: Color::WHITE,
            skill_color: Color::WHITE,
            cool_time_indicator: Color::RED,
            entity: EntityColors {
                box_shape: ShapeColor::new(Color::CYAN, Color::CYAN, Color::CYAN, 15.0),
                circle: ShapeColor::new(Color::YELLOW, Color::YELLOW, Color::YELLOW, 15.0),
                polyline: ShapeColor::new(Color::WHITE, Color::WHITE, Color::CYAN, 15.0),
            },
            rank_stroke: None,
            minimap_background: Color::rgb(51, 51, 51),
            minimap_viewport: Color::WHITE,
            winner_text: Color::WHITE,
            winner_outline: Color::BLACK,
            winner_background: Color::BLACK.with_alpha(0.5),
            background_gradient: None,
            glass_blur: None,
            glass_opacity: None,
            accent_glow: None,
            snow_color: None,
        }
    }

    /// Winter theme: gradient sky, gold accents and snow.
    pub fn christmas() -> Self {
        let night = Color::rgb(10, 22, 40);
        let christmas_red = Color::rgb(196, 30, 58);
        let emerald = Color::rgb(80, 200, 120);
        Self {
            background: night,
            marble_lightness: 60.0,
            marble_winning_border: Color::GOLD,
            skill_color: Color::rgb(255, 107, 107),
            cool_time_indicator: emerald,
            entity: EntityColors {
                box_shape: ShapeColor::new(
                    christmas_red,
                    Color::GOLD,
                    Color::rgb(255, 107, 107),
                    20.0,
                ),
                circle: ShapeColor::new(emerald, Color::GOLD, Color::rgb(144, 238, 144), 20.0),
                polyline: ShapeColor::new(
                    Color::rgb(65, 105, 225),
                    Color::rgb(176, 196, 222),
                    Color::rgb(135, 206, 235),
                    15.0,
                ),
            },
            rank_stroke: Some(Color::GOLD),
            minimap_background: night.with_alpha(0.7),
            minimap_viewport: Color::GOLD,
            winner_text: Color::WHITE,
            winner_outline: Color::GOLD,
            winner_background: christmas_red.with_alpha(0.3),
            background_gradient: Some(vec![night, Color::rgb(26, 47, 74), Color::rgb(45, 69, 99)]),
            glass_blur: Some(10.0),
            glass_opacity: Some(0.2),
            accent_glow: Some(Color::GOLD),
            snow_color: Some(Color::WHITE),
        }
    }

    /// Whether the festive decorations (glow, stars) are enabled.
    pub fn is_festive(&self) -> bool {
        self.accent_glow.is_some()
    }

    /// Parses a theme from JSON.
    pub fn from_json(json: &str) -> Result<Self, RouletteError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Named themes the host can switch between frames.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: HashMap<String, ColorTheme>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ThemeRegistry {
    /// Registry pre-filled with `light`, `dark` and `christmas`.
    pub fn with_builtins() -> Self {
        let mut themes = HashMap::new();
        themes.insert("light".to_string(), ColorTheme::light());
        themes.insert("dark".to_string(), ColorTheme::dark());
        themes.insert("christmas".to_string(), ColorTheme::christmas());
        Self { themes }
    }

    /// Looks a theme up by name.
    pub fn get(&self, name: &str) -> Result<&ColorTheme, RouletteError> {
        self.themes
            .get(name)
            .ok_or_else(|| RouletteError::UnknownTheme(name.to_string()))
    }

    /// Adds or replaces a theme.
    pub fn insert(&mut self, name: impl Into<String>, theme: ColorTheme) {
        let name = name.into();
        tracing::info!("[theme] Registered theme '{}'", name);
        self.themes.insert(name, theme);
    }

    /// Parses a theme from JSON and registers it under `name`.
    pub fn load_json(&mut self, name: impl Into<String>, json: &str) -> Result<(), RouletteError> {
        let theme = ColorTheme::from_json(json)?;
        self.insert(name, theme);
        Ok(())
    }

    /// Registered theme names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_present() {
        let registry = ThemeRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["christmas", "dark", "light"]);
        assert!(registry.get("christmas").unwrap().is_festive());
        assert!(!registry.get("dark").unwrap().is_festive());
    }

    #[test]
    fn test_unknown_theme_is_error() {
        let registry = ThemeRegistry::with_builtins();
        let err = registry.get("halloween").unwrap_err();
        assert!(matches!(err, RouletteError::UnknownTheme(name) if name == "halloween"));
    }

    #[test]
    fn test_json_round_trip_registers() {
        let json = serde_json::to_string(&ColorTheme::light()).unwrap();
        let mut registry = ThemeRegistry::with_builtins();
        registry.load_json("custom", &json).unwrap();
        assert_eq!(registry.get("custom").unwrap(), &ColorTheme::light());
    }

    #[test]
    fn test_for_kind_dispatch() {
        let theme = ColorTheme::christmas();
        assert_eq!(theme.entity.for_kind(ShapeKind::Circle).bloom_radius, 20.0);
        assert_eq!(theme.entity.for_kind(ShapeKind::Polyline).bloom_radius, 15.0);
    }
}
