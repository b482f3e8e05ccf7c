//! Configuration for memor.

use crate::gesture::{CellSize, GestureConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tui_motion::MotionConfig;
use tracing::warn;
use tui_theme::{Color, ColorPalette, ThemeMode};

const APP_NAME: &str = "memor";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub motion: MotionConfig,
}

impl Config {
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|d| d.config_dir().join("config.toml"))
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::project_dirs().map(|d| d.data_dir().join("memor.db"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|d| d.data_dir().join("memor.log"))
    }

    /// Motion settings for a practice session, honoring `display.reduced_motion`.
    pub fn session_motion(&self) -> MotionConfig {
        if self.display.reduced_motion {
            MotionConfig {
                enabled: self.motion.enabled,
                ..MotionConfig::reduced_motion()
            }
        } else {
            self.motion.clone()
        }
    }

    /// Folder scanned for the user's own CSV decks.
    pub fn user_decks_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|d| d.data_dir().join("decks"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub theme: ThemeMode,
    /// Width of one terminal column in points
    #[serde(default = "default_points_per_column")]
    pub points_per_column: f32,
    /// Height of one terminal row in points
    #[serde(default = "default_points_per_row")]
    pub points_per_row: f32,
    /// Ring the terminal bell when a swipe commits
    #[serde(default = "default_true")]
    pub bell_on_commit: bool,
    #[serde(default = "default_true")]
    pub show_dial: bool,
    /// Use slower, linear motion
    #[serde(default)]
    pub reduced_motion: bool,
    /// Accent color override as `#rrggbb`
    #[serde(default)]
    pub brand_color: Option<String>,
}

fn default_points_per_column() -> f32 { 8.0 }
fn default_points_per_row() -> f32 { 16.0 }
fn default_true() -> bool { true }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Auto,
            points_per_column: default_points_per_column(),
            points_per_row: default_points_per_row(),
            bell_on_commit: true,
            show_dial: true,
            reduced_motion: false,
            brand_color: None,
        }
    }
}

impl DisplayConfig {
    pub fn cell_size(&self) -> CellSize {
        CellSize {
            width: self.points_per_column.max(1.0),
            height: self.points_per_row.max(1.0),
        }
    }

    /// The palette for the configured theme, with the accent override applied.
    pub fn palette(&self) -> ColorPalette {
        let mut palette = tui_theme::colors(self.theme.is_dark());
        if let Some(hex) = &self.brand_color {
            match hex.parse::<Color>() {
                Ok(color) => palette.brand = color,
                Err(err) => warn!(error = %err, "ignoring brand_color"),
            }
        }
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.gesture.distance_threshold, 100.0);
        assert_eq!(config.gesture.velocity_threshold, 800.0);
        assert_eq!(config.motion.exit_duration, Duration::from_millis(400));
        assert_eq!(config.display.cell_size(), CellSize::default());
        assert!(config.display.bell_on_commit);
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [display]
            theme = "dark"
            bell_on_commit = false

            [gesture]
            distance_threshold = 180.0

            [motion]
            exit_duration = 280
            "#,
        )
        .unwrap();

        assert_eq!(config.display.theme, ThemeMode::Dark);
        assert!(!config.display.bell_on_commit);
        assert!(config.display.show_dial);
        assert_eq!(config.gesture.distance_threshold, 180.0);
        assert_eq!(config.gesture.velocity_threshold, 800.0);
        assert_eq!(config.motion.exit_duration, Duration::from_millis(280));
        assert!(config.motion.enabled);
    }

    #[test]
    fn test_round_trip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.display.points_per_row, config.display.points_per_row);
        assert_eq!(back.motion.spring_back, config.motion.spring_back);
    }

    #[test]
    fn test_reduced_motion_session() {
        let mut config = Config::default();
        assert_eq!(config.session_motion().speed_multiplier, 1.0);

        config.display.reduced_motion = true;
        let motion = config.session_motion();
        assert!(motion.speed_multiplier < 1.0);
        assert!(motion.enabled);

        config.motion.enabled = false;
        assert!(!config.session_motion().enabled);
    }

    #[test]
    fn test_brand_color_override() {
        let mut display = DisplayConfig {
            theme: ThemeMode::Dark,
            brand_color: Some("#ff8800".into()),
            ..Default::default()
        };
        assert_eq!(display.palette().brand, Color::rgb(0xff, 0x88, 0x00));

        display.brand_color = Some("orange".into());
        assert_eq!(display.palette().brand, tui_theme::colors(true).brand);
    }

    #[test]
    fn test_cell_size_never_zero() {
        let display = DisplayConfig {
            points_per_column: 0.0,
            ..Default::default()
        };
        assert_eq!(display.cell_size().width, 1.0);
    }
}
