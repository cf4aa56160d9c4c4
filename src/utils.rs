use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

use crate::models::ThemeMode;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(&self) -> &'static str {
        match self {
            Profile::Dev => "strive-dev",
            Profile::Prod => "strive",
        }
    }
}

/// Get the configuration directory for the given profile.
/// Dev uses "strive-dev" so development state never touches real data.
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "strive", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory for the given profile.
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "strive", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Platform download directory, where exported documents land.
pub fn get_download_dir() -> Option<PathBuf> {
    directories::UserDirs::new().and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Parse a calendar date (YYYY-MM-DD) into the instant at midnight UTC.
/// Deadlines are stored as instants, not calendar dates.
pub fn parse_deadline(input: &str) -> Result<chrono::DateTime<chrono::Utc>, chrono::ParseError> {
    let date = parse_date(input.trim())?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Format an instant as its calendar date (YYYY-MM-DD)
pub fn format_date(instant: &chrono::DateTime<chrono::Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Get the current date as an ISO 8601 string (YYYY-MM-DD)
pub fn get_current_date_string() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Guess light or dark from the COLORFGBG convention ("fg;bg", set by many
/// terminals). Background indexes 0-6 and 8 read as dark; absent or
/// unparseable values read as dark too.
pub fn detect_ambient_theme() -> ThemeMode {
    ambient_theme_from(std::env::var("COLORFGBG").ok().as_deref())
}

fn ambient_theme_from(value: Option<&str>) -> ThemeMode {
    let Some(value) = value else {
        return ThemeMode::Dark;
    };
    let bg = value
        .rsplit(';')
        .next()
        .and_then(|token| token.trim().parse::<u8>().ok());
    match bg {
        Some(n) if n <= 6 || n == 8 => ThemeMode::Dark,
        Some(_) => ThemeMode::Light,
        None => ThemeMode::Dark,
    }
}

/// Parsed key binding information
#[derive(Debug, Clone)]
pub struct ParsedKeyBinding {
    pub key_code: crossterm::event::KeyCode,
    pub requires_ctrl: bool,
}

/// Check if a key event has the primary modifier (Ctrl on Windows/Linux, Option/Alt on macOS)
pub fn has_primary_modifier(modifiers: crossterm::event::KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
            || modifiers.contains(crossterm::event::KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
    }
}

/// Format a key binding string for display, showing the platform-appropriate modifier.
/// On macOS, "Ctrl+" is shown as "Opt+" (Option key).
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a key binding string from config.
/// Supports single keys ("q", "n"), special keys ("Enter", "Left", "F2"),
/// and the Ctrl modifier ("Ctrl+s").
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        let key_code = parse_key_code(key_part)?;
        return Ok(ParsedKeyBinding {
            key_code,
            requires_ctrl: true,
        });
    }

    let key_code = parse_key_code(key_str)?;
    Ok(ParsedKeyBinding {
        key_code,
        requires_ctrl: false,
    })
}

/// Parse a key code from a string (without modifiers)
fn parse_key_code(key_str: &str) -> Result<crossterm::event::KeyCode, String> {
    use crossterm::event::KeyCode;

    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Delete" => Ok(KeyCode::Delete),
        "Insert" => Ok(KeyCode::Insert),
        _ => {
            if let Some(number) = key_str.strip_prefix('F') {
                if let Ok(n) = number.parse::<u8>() {
                    if (1..=12).contains(&n) {
                        return Ok(KeyCode::F(n));
                    }
                }
            }
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn deadline_parses_to_midnight_utc() {
        let instant = parse_deadline(" 2026-09-15 ").unwrap();
        assert_eq!(instant.to_rfc3339(), "2026-09-15T00:00:00+00:00");
        assert_eq!(format_date(&instant), "2026-09-15");
        assert!(parse_deadline("next tuesday").is_err());
        assert!(parse_deadline("2026-13-01").is_err());
    }

    #[test]
    fn tilde_paths_expand_to_home() {
        let expanded = expand_path("~/goals/strive.db");
        assert!(expanded.ends_with("goals/strive.db"));
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert_eq!(expand_path("/tmp/x.db"), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn key_bindings_parse_plain_special_and_ctrl_keys() {
        let plain = parse_key_binding("q").unwrap();
        assert_eq!(plain.key_code, KeyCode::Char('q'));
        assert!(!plain.requires_ctrl);

        let ctrl = parse_key_binding("Ctrl+s").unwrap();
        assert_eq!(ctrl.key_code, KeyCode::Char('s'));
        assert!(ctrl.requires_ctrl);

        assert_eq!(parse_key_binding("F2").unwrap().key_code, KeyCode::F(2));
        assert_eq!(
            parse_key_binding("Space").unwrap().key_code,
            KeyCode::Char(' ')
        );
        assert!(parse_key_binding("SuperHyper").is_err());
        assert!(parse_key_binding("F99").is_err());
    }

    #[test]
    fn ambient_theme_follows_the_background_index() {
        assert_eq!(ambient_theme_from(None), ThemeMode::Dark);
        assert_eq!(ambient_theme_from(Some("15;0")), ThemeMode::Dark);
        assert_eq!(ambient_theme_from(Some("0;15")), ThemeMode::Light);
        assert_eq!(ambient_theme_from(Some("0;7")), ThemeMode::Light);
        assert_eq!(ambient_theme_from(Some("default;default")), ThemeMode::Dark);
    }
}
