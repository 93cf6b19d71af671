//! Particle color assignment (spec §6 "set_colors").

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A normalized RGB triple, each channel in `[0, 1]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    /// Red channel in `[0, 1]`.
    pub r: f32,
    /// Green channel in `[0, 1]`.
    pub g: f32,
    /// Blue channel in `[0, 1]`.
    pub b: f32,
}

impl Color {
    /// Creates a new color. Out-of-range channels are accepted as-is;
    /// callers render what they ask for.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// White, the default color for every slot before `set_colors` is
    /// first called.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// The three per-slot colors a caller can assign with `set_colors`
/// (spec §6).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorTheme {
    /// Color for particles bound to the hand in slot 0.
    pub left_hand: Color,
    /// Color for particles bound to the hand in slot 1.
    pub right_hand: Color,
    /// Color for particles bound to the face.
    pub face: Color,
}

impl ColorTheme {
    /// Builds a theme from three explicit colors.
    #[must_use]
    pub const fn new(left_hand: Color, right_hand: Color, face: Color) -> Self {
        Self { left_hand, right_hand, face }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_white() {
        let theme = ColorTheme::default();
        assert_eq!(theme.left_hand, Color::WHITE);
        assert_eq!(theme.face, Color::WHITE);
    }

    #[test]
    fn test_color_bytemuck() {
        let c = Color::new(0.1, 0.2, 0.3);
        let bytes: &[u8] = bytemuck::bytes_of(&c);
        assert_eq!(bytes.len(), 12);
    }
}
