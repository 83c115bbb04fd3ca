use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use thiserror::Error;

static RGB_FN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[0-9.]+%?\s*)?\)$")
        .unwrap()
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("empty color value")]
    Empty,
    #[error("malformed hex color {0:?}")]
    InvalidHex(String),
    #[error("channel out of range in {0:?}")]
    ChannelRange(String),
    #[error("unsupported color syntax {0:?}")]
    Unsupported(String),
}

/// An sRGB color with 8-bit channels. Alpha is accepted on input and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Relative luminance in `[0, 1]` (WCAG 2 / sRGB transfer curve).
    pub fn luminosity(self) -> f64 {
        let linear = |channel: u8| {
            let v = f64::from(channel) / 255.0;
            if v <= 0.04045 {
                v / 12.92
            } else {
                ((v + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// Strictly above `threshold` counts as light; the boundary itself is dark.
    pub fn is_light(self, threshold: f64) -> bool {
        self.luminosity() > threshold
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ColorError::Empty);
        }
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorError::InvalidHex(value.to_string()));
        }
        if let Some(caps) = RGB_FN_RE.captures(&trimmed.to_ascii_lowercase()) {
            let mut channels = [0u8; 3];
            for (slot, idx) in channels.iter_mut().zip(1..=3) {
                *slot = caps[idx]
                    .parse::<u8>()
                    .map_err(|_| ColorError::ChannelRange(value.to_string()))?;
            }
            return Ok(Rgb::new(channels[0], channels[1], channels[2]));
        }
        Err(ColorError::Unsupported(value.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 | 4 => {
            let expand = |idx: usize| {
                let nibble = u8::from_str_radix(&hex[idx..idx + 1], 16).ok()?;
                Some(nibble * 17)
            };
            Some(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
        }
        6 | 8 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}
