//! Time-to-color gradient
//!
//! A fixed ordered list of anchor colors is spread linearly across a
//! [`TimeWindow`]. Times inside the window interpolate between the two
//! nearest anchors; times outside it clamp to the first or last anchor.

use crate::error::{EventViewError, Result};
use crate::window::TimeWindow;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// RGB color with channels in `[0, 1]`
///
/// Serialized as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(EventViewError::Parse(format!(
                "Invalid color {:?}: expected #RRGGBB",
                hex
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| EventViewError::Parse(format!("Invalid color {:?}: {}", hex, e)))
        };
        Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as `#RRGGBB`, channels clamped and rounded
    pub fn to_hex(&self) -> String {
        let to_u8 = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }

    /// Channel-wise linear blend, `alpha = 0` gives `self`
    pub fn interpolate(&self, other: &Color, alpha: f64) -> Color {
        let mix = |a: f64, b: f64| (a + (b - a) * alpha).clamp(0.0, 1.0);
        Color::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = EventViewError;

    fn try_from(value: String) -> Result<Self> {
        Color::from_hex(&value)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Standard anchor colors, early to late
pub mod colors {
    use super::Color;

    pub const RED: Color = Color::new(252.0 / 255.0, 98.0 / 255.0, 85.0 / 255.0); // #FC6255
    pub const ORANGE: Color = Color::new(1.0, 134.0 / 255.0, 47.0 / 255.0); // #FF862F
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0); // #FFFF00
    pub const GREEN: Color = Color::new(131.0 / 255.0, 193.0 / 255.0, 103.0 / 255.0); // #83C167
    pub const BLUE: Color = Color::new(88.0 / 255.0, 196.0 / 255.0, 221.0 / 255.0); // #58C4DD
    pub const PURPLE: Color = Color::new(154.0 / 255.0, 114.0 / 255.0, 172.0 / 255.0); // #9A72AC
}

/// Ordered, non-empty list of anchor colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    anchors: Vec<Color>,
}

impl Palette {
    /// Create a palette; fails when `anchors` is empty
    pub fn new(anchors: Vec<Color>) -> Result<Self> {
        if anchors.is_empty() {
            return Err(EventViewError::InvalidConfig(
                "palette must contain at least one color".to_string(),
            ));
        }
        Ok(Self { anchors })
    }

    pub fn anchors(&self) -> &[Color] {
        &self.anchors
    }

    pub fn first(&self) -> Color {
        self.anchors[0]
    }

    pub fn last(&self) -> Color {
        self.anchors[self.anchors.len() - 1]
    }

    /// Color for `time` relative to `window`
    pub fn color_for_time(&self, time: f64, window: &TimeWindow) -> Color {
        if time < window.time_min {
            trace!("Time {:.2} below time window, using first anchor", time);
            return self.first();
        }
        if time > window.time_max {
            trace!("Time {:.2} above time window, using last anchor", time);
            return self.last();
        }
        if window.width() == 0.0 {
            return self.first();
        }
        if time == window.time_max {
            return self.last();
        }

        let last_index = self.anchors.len() - 1;
        let position = window.normalize(time) * last_index as f64;
        let lower = (position.floor() as usize).min(last_index);
        let upper = (lower + 1).min(last_index);
        let alpha = position - lower as f64;

        self.anchors[lower].interpolate(&self.anchors[upper], alpha)
    }
}

impl Default for Palette {
    fn default() -> Self {
        use colors::{BLUE, GREEN, ORANGE, PURPLE, RED, YELLOW};
        Self {
            anchors: vec![RED, ORANGE, YELLOW, GREEN, BLUE, PURPLE],
        }
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = EventViewError;

    fn try_from(anchors: Vec<Color>) -> Result<Self> {
        Palette::new(anchors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.anchors
    }
}

#[cfg(test)]
mod tests {
    use super::colors::*;
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let c = Color::from_hex("#FC6255").unwrap();
        assert_eq!(c.to_hex(), "#FC6255");
        assert_eq!(Color::from_hex("ffff00").unwrap(), YELLOW);
    }

    #[test]
    fn test_hex_parsing_rejects_garbage() {
        assert!(Color::from_hex("#FFF").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
        assert!(Color::from_hex("#ÿÿÿ").is_err());
    }

    #[test]
    fn test_named_colors_match_hex() {
        assert_eq!(RED.to_hex(), "#FC6255");
        assert_eq!(ORANGE.to_hex(), "#FF862F");
        assert_eq!(GREEN.to_hex(), "#83C167");
        assert_eq!(BLUE.to_hex(), "#58C4DD");
        assert_eq!(PURPLE.to_hex(), "#9A72AC");
    }

    #[test]
    fn test_window_endpoints_map_to_end_anchors() {
        let palette = Palette::default();
        let window = TimeWindow::new(100.0, 200.0);
        assert_eq!(palette.color_for_time(100.0, &window), RED);
        assert_eq!(palette.color_for_time(200.0, &window), PURPLE);
    }

    #[test]
    fn test_outside_window_clamps() {
        let palette = Palette::default();
        let window = TimeWindow::new(100.0, 200.0);
        assert_eq!(palette.color_for_time(-5.0, &window), RED);
        assert_eq!(palette.color_for_time(1e9, &window), PURPLE);
    }

    #[test]
    fn test_interior_anchor_exact() {
        // 6 anchors over [0, 5]: t = 2 lands exactly on YELLOW
        let palette = Palette::default();
        let window = TimeWindow::new(0.0, 5.0);
        assert_eq!(palette.color_for_time(2.0, &window), YELLOW);
    }

    #[test]
    fn test_midpoint_interpolation() {
        let black = Color::new(0.0, 0.0, 0.0);
        let white = Color::new(1.0, 1.0, 1.0);
        let palette = Palette::new(vec![black, white]).unwrap();
        let mid = palette.color_for_time(5.0, &TimeWindow::new(0.0, 10.0));
        assert_eq!(mid, Color::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_zero_width_window_uses_first_anchor() {
        let palette = Palette::default();
        let window = TimeWindow::new(50.0, 50.0);
        assert_eq!(palette.color_for_time(50.0, &window), RED);
        assert_eq!(palette.color_for_time(49.0, &window), RED);
        assert_eq!(palette.color_for_time(51.0, &window), PURPLE);
    }

    #[test]
    fn test_single_anchor_palette() {
        let palette = Palette::new(vec![GREEN]).unwrap();
        let window = TimeWindow::new(0.0, 1.0);
        assert_eq!(palette.color_for_time(0.3, &window), GREEN);
        assert_eq!(palette.color_for_time(1.0, &window), GREEN);
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(matches!(
            Palette::new(Vec::new()),
            Err(EventViewError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let json = serde_json::to_string(&ORANGE).unwrap();
        assert_eq!(json, "\"#FF862F\"");
        let back: Color = serde_json::from_str("\"#ff862f\"").unwrap();
        assert_eq!(back.to_hex(), "#FF862F");
    }

    #[test]
    fn test_empty_palette_fails_deserialization() {
        let result: std::result::Result<Palette, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }
}
