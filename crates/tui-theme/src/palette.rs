//! The application's light and dark palettes.

use crate::colors::Color;

/// Every color the app draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    // Surfaces
    pub background: Color,
    pub card_background: Color,
    pub card_back_background: Color,
    pub card_border: Color,
    pub dial_background: Color,
    pub indicator_background: Color,

    // Text
    pub text: Color,
    pub secondary_text: Color,
    pub disabled_text: Color,
    pub brand: Color,

    // Outcomes
    pub again: Color,
    pub hard: Color,
    pub good: Color,
    pub easy: Color,
}

const BRAND: Color = Color::rgb(0x00, 0x7a, 0xff);

const LIGHT: ColorPalette = ColorPalette {
    background: Color::rgb(0xf8, 0xf9, 0xfa),
    card_background: Color::rgb(0xff, 0xff, 0xff),
    card_back_background: Color::rgb(0xf8, 0xf9, 0xfa),
    card_border: Color::rgb(0xe9, 0xec, 0xef),
    dial_background: Color::rgb(0xff, 0xff, 0xff),
    indicator_background: Color::rgb(0x26, 0x26, 0x26),
    text: Color::rgb(0x2c, 0x3e, 0x50),
    secondary_text: Color::rgb(0x6c, 0x75, 0x7d),
    disabled_text: Color::rgb(0x99, 0x99, 0x99),
    brand: BRAND,
    again: Color::rgb(0xff, 0x3b, 0x30),
    hard: Color::rgb(0xff, 0x95, 0x00),
    good: Color::rgb(0x34, 0xc7, 0x59),
    easy: BRAND,
};

const DARK: ColorPalette = ColorPalette {
    background: Color::rgb(0x00, 0x00, 0x00),
    card_background: Color::rgb(0x1c, 0x1c, 0x1e),
    card_back_background: Color::rgb(0x2c, 0x2c, 0x2e),
    card_border: Color::rgb(0x2c, 0x2c, 0x2e),
    dial_background: Color::rgb(0x1c, 0x1c, 0x1e),
    indicator_background: Color::rgb(0x26, 0x26, 0x26),
    text: Color::rgb(0xff, 0xff, 0xff),
    secondary_text: Color::rgb(0x8e, 0x8e, 0x93),
    disabled_text: Color::rgb(0x48, 0x48, 0x4a),
    brand: BRAND,
    again: Color::rgb(0xff, 0x3b, 0x30),
    hard: Color::rgb(0xff, 0x95, 0x00),
    good: Color::rgb(0x34, 0xc7, 0x59),
    easy: BRAND,
};

/// Palette for the given scheme. Pure; nothing is cached between calls.
pub fn colors(is_dark: bool) -> ColorPalette {
    if is_dark {
        DARK
    } else {
        LIGHT
    }
}
