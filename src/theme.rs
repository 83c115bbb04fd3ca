use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_FAMILY: &str = "\"Inter\", -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, Helvetica, Arial, sans-serif";
pub const LUMINOSITY_THRESHOLD: f64 = 0.4;
pub const CORNER_RADIUS: f64 = 6.0;
pub const CORNER_SMOOTHING: f64 = 0.9;

/// Text fill pair used on top of a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextColors {
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u16,
    /// Tiles whose luminosity is strictly above this use `light_text`.
    pub luminosity_threshold: f64,
    pub light_text: TextColors,
    pub dark_text: TextColors,
    pub label_x: f64,
    pub name_y: f64,
    pub percent_y: f64,
    pub corner_radius: f64,
    pub corner_smoothing: f64,
    pub preserve_smoothing: bool,
    /// Fill for languages that come without a color.
    pub missing_color: String,
    pub clip_id_prefix: String,
}

impl Theme {
    pub fn github() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: 12.5,
            font_weight: 600,
            luminosity_threshold: LUMINOSITY_THRESHOLD,
            light_text: TextColors {
                primary: "#000000ff".to_string(),
                secondary: "#00000080".to_string(),
            },
            dark_text: TextColors {
                primary: "#ffffff".to_string(),
                secondary: "#ffffffa0".to_string(),
            },
            label_x: 6.0,
            name_y: 6.0,
            percent_y: 25.0,
            corner_radius: CORNER_RADIUS,
            corner_smoothing: CORNER_SMOOTHING,
            preserve_smoothing: false,
            missing_color: "#cccccc".to_string(),
            clip_id_prefix: "clip".to_string(),
        }
    }

    /// Square tiles with circular corners, for consumers that dislike the squircle look.
    pub fn plain() -> Self {
        Self {
            corner_radius: 4.0,
            corner_smoothing: 0.0,
            ..Self::github()
        }
    }

    pub fn text_colors(&self, light: bool) -> &TextColors {
        if light {
            &self.light_text
        } else {
            &self.dark_text
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::github()
    }
}
