//! Ball colors
//!
//! Ball colors walk a fixed palette up and back down as the size grows, so
//! neighbouring sizes always get neighbouring colors. Text drawn on a ball is
//! black or white, whichever contrasts more with the ball.

use glam::Vec4;

/// Default palette, 0xAARRGGBB
pub const DEFAULT_PALETTE: [u32; 10] = [
    0xFFF44336, // red
    0xFFFF9800, // orange
    0xFFFFEB3B, // yellow
    0xFF8BC34A, // light green
    0xFF009688, // teal
    0xFF03A9F4, // light blue
    0xFF3F51B5, // indigo
    0xFF9C27B0, // purple
    0xFFE91E63, // pink
    0xFF795548, // brown
];

/// Convert 0xAARRGGBB to RGBA in [0, 1]
pub fn color_int_to_vec(color: u32) -> Vec4 {
    Vec4::new(
        ((color >> 16) & 0xFF) as f32 / 255.0,
        ((color >> 8) & 0xFF) as f32 / 255.0,
        (color & 0xFF) as f32 / 255.0,
        ((color >> 24) & 0xFF) as f32 / 255.0,
    )
}

/// Convert RGBA in [0, 1] to 0xAARRGGBB
pub fn color_vec_to_int(color: Vec4) -> u32 {
    let channel = |c: f32| ((c.clamp(0.0, 1.0) * 255.0) as u32) & 0xFF;
    channel(color.w) << 24 | channel(color.x) << 16 | channel(color.y) << 8 | channel(color.z)
}

/// Palette index for a ball of `size`
///
/// Triangle wave over `num_colors`: 0, 1, .., n-1, n-2, .., 1, 0, 1, ..
pub fn ball_color_index(size: u32, num_colors: usize) -> usize {
    if num_colors <= 1 {
        return 0;
    }
    let period = 2 * num_colors - 2;
    let index = (size.max(1) as usize - 1) % period;
    if index >= num_colors {
        period - index
    } else {
        index
    }
}

/// WCAG relative luminance of an sRGB color
pub fn relative_luminance(color: Vec4) -> f32 {
    let linear = |c: f32| {
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(color.x) + 0.7152 * linear(color.y) + 0.0722 * linear(color.z)
}

/// Black or white, whichever has more contrast with `color`
pub fn text_color(color: Vec4) -> Vec4 {
    if relative_luminance(color) > 0.0525_f32.sqrt() - 0.05 {
        Vec4::new(0.0, 0.0, 0.0, color.w)
    } else {
        Vec4::new(1.0, 1.0, 1.0, color.w)
    }
}

/// Ordered set of ball colors, never empty
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Vec4>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_argb(&DEFAULT_PALETTE)
    }
}

impl Palette {
    /// Build from 0xAARRGGBB ints. An empty list falls back to the default.
    pub fn from_argb(colors: &[u32]) -> Self {
        if colors.is_empty() {
            log::warn!("Empty ball palette, using default");
            return Self::default();
        }
        Self {
            colors: colors.iter().copied().map(color_int_to_vec).collect(),
        }
    }

    /// Fill color for a ball of `size`
    pub fn ball_color(&self, size: u32) -> Vec4 {
        self.colors[ball_color_index(size, self.colors.len())]
    }

    /// Label color for a ball of `size`
    pub fn text_color(&self, size: u32) -> Vec4 {
        text_color(self.ball_color(size))
    }
}
