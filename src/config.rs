use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::ThemeMode;
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width_percent: u16,
    /// Optional override for the store location; the profile default is
    /// used when absent.
    #[serde(default)]
    pub store_path: Option<String>,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    /// Palette overrides keyed by mode name ("light"/"dark"). Built-in
    /// palettes fill whatever the file leaves out.
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_toggle_sidebar")]
    pub toggle_sidebar: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_select")]
    pub select: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_tab_left")]
    pub tab_left: String,
    #[serde(default = "default_tab_right")]
    pub tab_right: String,
    #[serde(default = "default_tab_1")]
    pub tab_1: String,
    #[serde(default = "default_tab_2")]
    pub tab_2: String,
    #[serde(default = "default_tab_3")]
    pub tab_3: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_toggle_goal_status")]
    pub toggle_goal_status: String,
    #[serde(default = "default_step_up")]
    pub step_up: String,
    #[serde(default = "default_step_down")]
    pub step_down: String,
    #[serde(default = "default_undo")]
    pub undo: String,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_export")]
    pub export: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_tab_bg")]
    pub tab_bg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sidebar_width_percent: default_sidebar_width(),
            store_path: None,
            key_bindings: KeyBindings::default(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            toggle_sidebar: default_toggle_sidebar(),
            new: default_new(),
            edit: default_edit(),
            save: default_save(),
            delete: default_delete(),
            select: default_select(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            tab_left: default_tab_left(),
            tab_right: default_tab_right(),
            tab_1: default_tab_1(),
            tab_2: default_tab_2(),
            tab_3: default_tab_3(),
            help: default_help(),
            toggle_goal_status: default_toggle_goal_status(),
            step_up: default_step_up(),
            step_down: default_step_down(),
            undo: default_undo(),
            sort: default_sort(),
            theme: default_theme(),
            export: default_export(),
        }
    }
}

impl KeyBindings {
    fn all(&self) -> [(&'static str, &str); 22] {
        [
            ("quit", &self.quit),
            ("toggle_sidebar", &self.toggle_sidebar),
            ("new", &self.new),
            ("edit", &self.edit),
            ("save", &self.save),
            ("delete", &self.delete),
            ("select", &self.select),
            ("list_up", &self.list_up),
            ("list_down", &self.list_down),
            ("tab_left", &self.tab_left),
            ("tab_right", &self.tab_right),
            ("tab_1", &self.tab_1),
            ("tab_2", &self.tab_2),
            ("tab_3", &self.tab_3),
            ("help", &self.help),
            ("toggle_goal_status", &self.toggle_goal_status),
            ("step_up", &self.step_up),
            ("step_down", &self.step_down),
            ("undo", &self.undo),
            ("sort", &self.sort),
            ("theme", &self.theme),
            ("export", &self.export),
        ]
    }

    /// Parse every binding once so a broken config fails at startup instead
    /// of mid-session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, binding) in self.all() {
            utils::parse_key_binding(binding)
                .map_err(|e| ConfigError::KeyBindingError(format!("{}: {}", name, e)))?;
        }
        Ok(())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            tab_bg: default_tab_bg(),
        }
    }
}

impl Theme {
    /// Built-in palettes for the two display modes
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert(
            "dark".to_string(),
            Theme {
                fg: "white".to_string(),
                bg: "black".to_string(),
                highlight_bg: "cyan".to_string(),
                highlight_fg: "black".to_string(),
                tab_bg: "gray".to_string(),
            },
        );

        themes.insert(
            "light".to_string(),
            Theme {
                fg: "black".to_string(),
                bg: "white".to_string(),
                highlight_bg: "blue".to_string(),
                highlight_fg: "white".to_string(),
                tab_bg: "gray".to_string(),
            },
        );

        themes
    }
}

// Default value functions
fn default_sidebar_width() -> u16 {
    38
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_toggle_sidebar() -> String {
    "b".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_select() -> String {
    "Enter".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_tab_left() -> String {
    "Left".to_string()
}

fn default_tab_right() -> String {
    "Right".to_string()
}

fn default_tab_1() -> String {
    "1".to_string()
}

fn default_tab_2() -> String {
    "2".to_string()
}

fn default_tab_3() -> String {
    "3".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_toggle_goal_status() -> String {
    "Space".to_string()
}

fn default_step_up() -> String {
    "+".to_string()
}

fn default_step_down() -> String {
    "-".to_string()
}

fn default_undo() -> String {
    "u".to_string()
}

fn default_sort() -> String {
    "s".to_string()
}

fn default_theme() -> String {
    "t".to_string()
}

fn default_export() -> String {
    "x".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "cyan".to_string()
}

fn default_highlight_fg() -> String {
    "black".to_string()
}

fn default_tab_bg() -> String {
    "gray".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid key binding: {0}")]
    KeyBindingError(String),
}

impl Config {
    /// Load configuration from file, or create default if missing.
    /// Uses the provided profile to determine the config path.
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        Self::load_from(&Self::get_config_path(profile)?)
    }

    /// Load configuration from an explicit path, creating it with defaults
    /// when missing.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            // Create default config and save it
            let mut config = Config::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save_with_profile(&mut self, profile: utils::Profile) -> Result<(), ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    /// Resolve the store path: configured override (with ~ expansion) or
    /// the profile default.
    pub fn get_store_path(&self, profile: utils::Profile) -> PathBuf {
        match &self.store_path {
            Some(path) => utils::expand_path(path),
            None => Self::default_store_path_for_profile(profile),
        }
    }

    fn default_store_path_for_profile(profile: utils::Profile) -> PathBuf {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("strive.db")
        } else {
            // Fallback paths - platform-specific
            #[cfg(target_os = "macos")]
            {
                match profile {
                    utils::Profile::Dev => {
                        utils::expand_path("~/Library/Application Support/strive-dev/strive.db")
                    }
                    utils::Profile::Prod => {
                        utils::expand_path("~/Library/Application Support/strive/strive.db")
                    }
                }
            }
            #[cfg(not(target_os = "macos"))]
            {
                match profile {
                    utils::Profile::Dev => utils::expand_path("~/.local/share/strive-dev/strive.db"),
                    utils::Profile::Prod => utils::expand_path("~/.local/share/strive/strive.db"),
                }
            }
        }
    }

    /// Palette for the given display mode: config override first, then the
    /// built-in preset. An empty highlight_fg is computed from highlight_bg
    /// so highlighted text stays readable.
    pub fn theme_for(&self, mode: ThemeMode) -> Theme {
        use crate::tui::widgets::color::{
            format_color_for_display, get_contrast_text_color, parse_color,
        };

        let mut theme = if let Some(theme) = self.themes.get(mode.as_str()) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().get(mode.as_str()) {
            theme.clone()
        } else {
            Theme::default()
        };

        if theme.highlight_fg.is_empty() {
            let highlight_bg_color = parse_color(&theme.highlight_bg);
            let calculated_fg = get_contrast_text_color(highlight_bg_color);
            theme.highlight_fg = format_color_for_display(&calculated_fg);
        }

        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_falls_back_to_every_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sidebar_width_percent, 38);
        assert_eq!(config.store_path, None);
        assert_eq!(config.key_bindings.quit, "q");
        assert_eq!(config.key_bindings.step_up, "+");
        assert_eq!(config.key_bindings.export, "x");
        assert!(config.themes.is_empty());
    }

    #[test]
    fn partial_toml_keeps_unnamed_fields_default() {
        let config: Config = toml::from_str(
            "sidebar_width_percent = 50\n\n[key_bindings]\nquit = \"Ctrl+q\"\n",
        )
        .unwrap();
        assert_eq!(config.sidebar_width_percent, 50);
        assert_eq!(config.key_bindings.quit, "Ctrl+q");
        assert_eq!(config.key_bindings.new, "n");
    }

    #[test]
    fn store_path_override_wins_over_the_profile_default() {
        let config: Config = toml::from_str("store_path = \"~/goals/strive.db\"\n").unwrap();
        let resolved = config.get_store_path(utils::Profile::Prod);
        assert!(resolved.ends_with("goals/strive.db"));
        assert!(!resolved.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn default_bindings_all_validate() {
        KeyBindings::default().validate().unwrap();
    }

    #[test]
    fn broken_binding_fails_validation_by_name() {
        let mut bindings = KeyBindings::default();
        bindings.sort = "NotAKey".to_string();
        let err = bindings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::KeyBindingError(ref msg) if msg.contains("sort")));
    }

    #[test]
    fn theme_lookup_prefers_config_overrides() {
        let mut config = Config::default();
        assert_eq!(config.theme_for(ThemeMode::Dark).bg, "black");
        assert_eq!(config.theme_for(ThemeMode::Light).bg, "white");

        config.themes.insert(
            "dark".to_string(),
            Theme {
                bg: "#101010".to_string(),
                ..Theme::default()
            },
        );
        assert_eq!(config.theme_for(ThemeMode::Dark).bg, "#101010");
        assert_eq!(config.theme_for(ThemeMode::Light).bg, "white");
    }

    #[test]
    fn load_from_creates_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("config.toml");

        let created = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.config_version, Some(CURRENT_CONFIG_VERSION));

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.key_bindings.quit, created.key_bindings.quit);
        assert_eq!(reloaded.sidebar_width_percent, created.sidebar_width_percent);
    }

    #[test]
    fn empty_highlight_fg_is_derived_from_highlight_bg() {
        let mut config = Config::default();
        config.themes.insert(
            "dark".to_string(),
            Theme {
                highlight_bg: "white".to_string(),
                highlight_fg: String::new(),
                ..Theme::default()
            },
        );
        // A white highlight needs dark text on it.
        assert_eq!(config.theme_for(ThemeMode::Dark).highlight_fg, "black");
    }
}
