//! # tui-theme
//!
//! Color palettes for memor.
//!
//! A palette is a plain value computed from the light/dark choice with
//! [`colors`]; there is no theme manager and no global state. Translucent
//! layers are emulated with [`Color::over`], which mixes a color toward the
//! surface beneath it.

mod colors;
mod mode;
mod palette;

pub use colors::{Color, ParseColorError};
pub use mode::ThemeMode;
pub use palette::{colors, ColorPalette};

use ratatui::style::Style;

/// Foreground style for `color` drawn at `opacity` over `background`.
pub fn faded(color: Color, background: Color, opacity: f32) -> Style {
    Style::default().fg(color.over(background, opacity).to_ratatui())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color as RatatuiColor;

    #[test]
    fn test_faded_full_opacity() {
        let palette = colors(true);
        let style = faded(palette.good, palette.background, 1.0);
        assert_eq!(style.fg, Some(palette.good.to_ratatui()));
    }

    #[test]
    fn test_faded_invisible() {
        let style = faded(Color::rgb(255, 0, 0), Color::rgb(0, 0, 0), 0.0);
        assert_eq!(style.fg, Some(RatatuiColor::Rgb(0, 0, 0)));
    }
}
