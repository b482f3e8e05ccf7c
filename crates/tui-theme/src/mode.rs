//! Light/dark mode selection.

use serde::{Deserialize, Serialize};

/// Which palette to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the terminal's background
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    /// Resolve to a concrete dark/light choice.
    pub fn is_dark(self) -> bool {
        match self {
            Self::Dark => true,
            Self::Light => false,
            Self::Auto => detect_dark(std::env::var("COLORFGBG").ok().as_deref()),
        }
    }
}

/// Read a `COLORFGBG` style "fg;bg" value. Unknown terminals are assumed dark.
fn detect_dark(colorfgbg: Option<&str>) -> bool {
    let Some(bg) = colorfgbg.and_then(|v| v.rsplit(';').next()) else {
        return true;
    };
    match bg.trim().parse::<u8>() {
        // 7 (white) and 9..=15 (bright colors) are light backgrounds
        Ok(7) | Ok(9..=15) => false,
        _ => true,
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}
