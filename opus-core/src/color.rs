//! RGBA colors in linear 0-1 float channels.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// An RGBA color with each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Paper color used behind strokes and recorded by the eraser.
    pub const CANVAS_BACKGROUND: Self = Self::new(0.96, 0.96, 0.98, 1.0);

    /// Workspace color outside the canvas bounds.
    pub const WORKSPACE: Self = Self::new(0.13, 0.13, 0.15, 1.0);

    /// Default brush color.
    pub const BLUE: Self = Self::new(0.0, 0.478, 1.0, 1.0);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a color from raw channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Clamp every channel into `0.0..=1.0`. NaN channels become 0.
    #[must_use]
    pub fn clamped(self) -> Self {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self::new(c(self.r), c(self.g), c(self.b), c(self.a))
    }

    /// Same color with alpha multiplied by `factor`.
    #[must_use]
    pub fn with_alpha_scaled(self, factor: f32) -> Self {
        Self {
            a: self.a * factor,
            ..self
        }
        .clamped()
    }

    /// Channel array form, as uploaded to the GPU.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] if the string is not valid hex.
    pub fn from_hex(hex: &str) -> CanvasResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || CanvasError::InvalidColor(hex.to_string());

        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| -> CanvasResult<f32> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| invalid())
        };

        let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Rgba {
    type Err = CanvasError;

    fn from_str(s: &str) -> CanvasResult<Self> {
        Self::from_hex(s)
    }
}

impl From<[f32; 4]> for Rgba {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_from_hex_rgb() {
        let c = Rgba::from_hex("#ff8000").expect("valid hex");
        assert!(approx(c.r, 1.0));
        assert!(approx(c.g, 0.502));
        assert!(approx(c.b, 0.0));
        assert!(approx(c.a, 1.0));
    }

    #[test]
    fn test_from_hex_rgba_without_hash() {
        let c: Rgba = "00000080".parse().expect("valid hex");
        assert!(approx(c.a, 0.502));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(
            Rgba::from_hex("#12345"),
            Err(CanvasError::InvalidColor("#12345".to_string()))
        );
        assert!(Rgba::from_hex("#gggggg").is_err());
        assert!(Rgba::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_alpha_scaling_clamps() {
        let c = Rgba::BLUE.with_alpha_scaled(0.85);
        assert!(approx(c.a, 0.85));
        let c = Rgba::BLUE.with_alpha_scaled(4.0);
        assert!(approx(c.a, 1.0));
    }
}
