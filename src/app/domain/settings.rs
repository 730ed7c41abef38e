use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use log::warn;

use crate::app::infrastructure::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    Dark,
    SystemDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FontChoice {
    ScreenBold,
    Courier,
    HelveticaMono,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_theme_mode")]
    pub theme_mode: ThemeMode,

    #[serde(default = "default_font")]
    pub font: FontChoice,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_line_numbers")]
    pub line_numbers_enabled: bool,

    #[serde(default = "default_word_wrap")]
    pub word_wrap_enabled: bool,

    #[serde(default = "default_window_width")]
    pub window_width: i32,

    #[serde(default = "default_window_height")]
    pub window_height: i32,

    /// Last directory used in an open/save dialog.
    #[serde(default)]
    pub last_open_directory: Option<PathBuf>,
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::SystemDefault
}

fn default_font() -> FontChoice {
    FontChoice::Courier
}

fn default_font_size() -> u32 {
    16
}

fn default_line_numbers() -> bool {
    false
}

fn default_word_wrap() -> bool {
    true
}

fn default_window_width() -> i32 {
    640
}

fn default_window_height() -> i32 {
    480
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: default_theme_mode(),
            font: default_font(),
            font_size: default_font_size(),
            line_numbers_enabled: default_line_numbers(),
            word_wrap_enabled: default_word_wrap(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            last_open_directory: None,
        }
    }
}

impl AppSettings {
    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        let config_path = Self::get_config_path();

        match fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_json(&contents),
            Err(_) => {
                let default = Self::default();
                if let Err(e) = default.save() {
                    warn!("Could not write default settings: {}", e);
                }
                default
            }
        }
    }

    /// Parse settings, falling back to defaults on malformed input.
    pub fn from_json(contents: &str) -> Self {
        match serde_json::from_str(contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to parse settings: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), AppError> {
        let config_path = Self::get_config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("mirrorpad");
        path.push("settings.json");
        path
    }
}
