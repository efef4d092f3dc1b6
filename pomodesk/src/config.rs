use crate::persistence::project_dirs;
use crate::settings::{Settings, TimerSection};
use crate::sound::{SoundKind, Tracks};
use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub icons: Icons,
    pub timer: TimerSection,
    pub sound: SoundSection,
    pub notifications: NotificationSection,
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings::from(&self.timer)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "hex_to_color")]
    pub background: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub foreground: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub selection: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub black: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub red: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub green: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub yellow: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub blue: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub magenta: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub gray: Color,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Icons {
    pub timer: String,
    pub task_list: String,
    pub sound: String,
    pub play: String,
    pub pause: String,
    pub pending: String,
    pub done: String,
    pub select: String,
    pub input_cursor: String,
    pub header_left: String,
    pub header_right: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SoundSection {
    pub kind: SoundKind,
    pub volume: f32,
    pub rain: Option<PathBuf>,
    pub cafe: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationSection {
    pub desktop: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(9, 14, 19),
            foreground: Color::Rgb(197, 201, 199),
            selection: Color::Rgb(230, 195, 132),
            black: Color::Rgb(13, 12, 12),
            red: Color::Rgb(228, 104, 118),
            green: Color::Rgb(138, 154, 123),
            yellow: Color::Rgb(196, 178, 138),
            blue: Color::Rgb(127, 180, 202),
            magenta: Color::Rgb(162, 146, 163),
            gray: Color::Rgb(164, 167, 164),
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            timer: "◷".to_string(),
            task_list: "⬢".to_string(),
            sound: "♫".to_string(),
            play: "▶".to_string(),
            pause: "⏸".to_string(),
            pending: "☐".to_string(),
            done: "☑".to_string(),
            select: "▸".to_string(),
            input_cursor: "▊".to_string(),
            header_left: "⟪ ".to_string(),
            header_right: " ⟫".to_string(),
        }
    }
}

impl Default for SoundSection {
    fn default() -> Self {
        Self {
            kind: SoundKind::Rain,
            volume: 0.5,
            rain: None,
            cafe: None,
        }
    }
}

impl SoundSection {
    /// Configured track paths, defaulting to `<kind>.mp3` inside `sounds_dir`.
    pub fn tracks(&self, sounds_dir: &Path) -> Tracks {
        let defaults = Tracks::in_dir(sounds_dir);
        Tracks {
            rain: self.rain.clone().unwrap_or(defaults.rain),
            cafe: self.cafe.clone().unwrap_or(defaults.cafe),
        }
    }
}

impl Default for NotificationSection {
    fn default() -> Self {
        Self { desktop: true }
    }
}

fn hex_to_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    if !s.starts_with('#') || s.len() != 7 {
        return Err(serde::de::Error::custom("invalid hex color format"));
    }
    let r = u8::from_str_radix(&s[1..3], 16).map_err(serde::de::Error::custom)?;
    let g = u8::from_str_radix(&s[3..5], 16).map_err(serde::de::Error::custom)?;
    let b = u8::from_str_radix(&s[5..7], 16).map_err(serde::de::Error::custom)?;
    Ok(Color::Rgb(r, g, b))
}

pub fn parse_config(config_str: &str) -> Result<Config> {
    Ok(toml::from_str(config_str)?)
}

pub fn load_config() -> Result<Config> {
    let proj_dirs = project_dirs()?;
    let path = proj_dirs.config_dir().join("pomodesk.toml");
    if !path.exists() {
        return Ok(Config::default());
    }
    let config_str = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {:?}", path))?;
    parse_config(&config_str).with_context(|| format!("Failed to parse config file at {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.settings(), Settings::default());
        assert_eq!(config.sound.kind, SoundKind::Rain);
        assert!(config.notifications.desktop);
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse_config(
            r##"
            [theme]
            blue = "#102030"

            [timer]
            work_minutes = 50
            short_break_minutes = 0
            long_break_interval = 2

            [sound]
            kind = "cafe"
            volume = 0.8
            cafe = "/music/cafe.ogg"

            [notifications]
            desktop = false
            "##,
        )
        .unwrap();

        assert_eq!(config.theme.blue, Color::Rgb(16, 32, 48));
        let settings = config.settings();
        assert_eq!(settings.work_minutes, 50);
        assert_eq!(settings.short_break_minutes, 5);
        assert_eq!(settings.long_break_interval, 2);
        assert_eq!(config.sound.kind, SoundKind::Cafe);
        assert!(!config.notifications.desktop);

        let tracks = config.sound.tracks(Path::new("/data/sounds"));
        assert_eq!(tracks.cafe, PathBuf::from("/music/cafe.ogg"));
        assert_eq!(tracks.rain, PathBuf::from("/data/sounds/rain.mp3"));
    }

    #[test]
    fn bad_hex_color_is_rejected() {
        assert!(parse_config("[theme]\nred = \"red\"").is_err());
    }
}
