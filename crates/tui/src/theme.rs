//! Day/night palettes and the animated highlight blend.

use homedeck_core::DisplayMode;
use ratatui::style::Color;

/// Named color roles for one display mode.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub status_fg: Color,
    pub avatar_rest: Color,
    pub avatar_hover: Color,
    pub tile_rest: Color,
    pub tile_hover: Color,
    pub button_rest: Color,
    pub button_hover: Color,
}

const DAY: Palette = Palette {
    background: Color::Rgb(235, 238, 243),
    foreground: Color::Rgb(40, 44, 52),
    muted: Color::Rgb(130, 138, 150),
    accent: Color::Rgb(0, 122, 204),
    status_fg: Color::Rgb(70, 76, 88),
    avatar_rest: Color::Rgb(170, 178, 192),
    avatar_hover: Color::Rgb(0, 122, 204),
    tile_rest: Color::Rgb(180, 188, 200),
    tile_hover: Color::Rgb(255, 150, 40),
    button_rest: Color::Rgb(170, 178, 192),
    button_hover: Color::Rgb(40, 160, 100),
};

const NIGHT: Palette = Palette {
    background: Color::Rgb(24, 26, 32),
    foreground: Color::Rgb(212, 216, 224),
    muted: Color::Rgb(110, 116, 128),
    accent: Color::Rgb(90, 170, 255),
    status_fg: Color::Rgb(170, 176, 188),
    avatar_rest: Color::Rgb(70, 76, 90),
    avatar_hover: Color::Rgb(90, 170, 255),
    tile_rest: Color::Rgb(64, 70, 84),
    tile_hover: Color::Rgb(255, 170, 70),
    button_rest: Color::Rgb(70, 76, 90),
    button_hover: Color::Rgb(80, 200, 130),
};

impl Palette {
    /// Static style table for the given mode.
    pub fn for_mode(mode: DisplayMode) -> Palette {
        match mode {
            DisplayMode::Day => DAY,
            DisplayMode::Night => NIGHT,
        }
    }
}

/// Linear interpolation between two RGB colors by the hover alpha.
///
/// Non-RGB inputs cannot be mixed channel-wise; they snap to whichever
/// endpoint the alpha is closer to.
pub fn blend(rest: Color, hover: Color, alpha: f64) -> Color {
    let t = alpha.clamp(0.0, 1.0);
    match (rest, hover) {
        (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) => Color::Rgb(
            lerp_channel(r0, r1, t),
            lerp_channel(g0, g1, t),
            lerp_channel(b0, b1, t),
        ),
        _ if t < 0.5 => rest,
        _ => hover,
    }
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_select_distinct_tables() {
        let day = Palette::for_mode(DisplayMode::Day);
        let night = Palette::for_mode(DisplayMode::Night);
        assert_ne!(day.background, night.background);
        assert_ne!(day.foreground, night.foreground);
    }

    #[test]
    fn blend_endpoints_and_midpoint() {
        let rest = Color::Rgb(0, 0, 0);
        let hover = Color::Rgb(100, 200, 50);
        assert_eq!(blend(rest, hover, 0.0), rest);
        assert_eq!(blend(rest, hover, 1.0), hover);
        assert_eq!(blend(rest, hover, 0.5), Color::Rgb(50, 100, 25));
    }

    #[test]
    fn blend_clamps_out_of_range_alpha() {
        let rest = Color::Rgb(10, 10, 10);
        let hover = Color::Rgb(20, 20, 20);
        assert_eq!(blend(rest, hover, -1.0), rest);
        assert_eq!(blend(rest, hover, 2.0), hover);
    }

    #[test]
    fn blend_snaps_non_rgb_inputs() {
        assert_eq!(blend(Color::Black, Color::White, 0.2), Color::Black);
        assert_eq!(blend(Color::Black, Color::White, 0.8), Color::White);
    }
}
