use std::{
    fs,
    io::ErrorKind,
    ops::Not,
    path::{Path, PathBuf},
};

use chrono::NaiveTime;
use eframe::egui::{self, Color32, FontFamily};
use serde::{Deserialize, Serialize};

use crate::{
    alerts::{BeepConfig, TriggerMode},
    audio::{AdhanVariant, Assets, REMOTE_AZAN_URL},
    error::ConfigError,
    timetable::{Convention, LocationId},
    widget::WidgetSize,
};

const APP_NAME: &str = "ramadan_clock";

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Not for Theme {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl From<Theme> for egui::Visuals {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Sans,
    Mono,
}

impl From<FontStyle> for FontFamily {
    fn from(font: FontStyle) -> Self {
        match font {
            FontStyle::Sans => Self::Proportional,
            FontStyle::Mono => Self::Monospace,
        }
    }
}

/// Colors and font layered on top of the light/dark [`Theme`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Palette {
    /// header and widget background
    #[serde(with = "hex_color")]
    pub primary: Color32,
    /// countdown, badges and highlights
    #[serde(with = "hex_color")]
    pub accent: Color32,
    pub font: FontStyle,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Color32::from_rgb(0x1e, 0x4d, 0x2e),
            accent: Color32::from_rgb(0xd4, 0xaf, 0x37),
            font: FontStyle::Sans,
        }
    }
}

/// `#rrggbb` strings in the config file.
mod hex_color {
    use eframe::egui::Color32;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn to_hex(color: Color32) -> String {
        format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
    }

    pub fn parse(text: &str) -> Option<Color32> {
        let digits = text.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| de::Error::custom(format!("expected #rrggbb, got {text:?}")))
    }
}

fn default_alarm_time() -> NaiveTime {
    NaiveTime::from_hms_opt(4, 0, 0).unwrap_or_default()
}

/// What the user can change while the clock is running.
///
/// The config file only provides the starting values, changes made in the
/// settings window last for the session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub location: LocationId,
    pub convention: Convention,
    pub sound_enabled: bool,
    pub azan_enabled: bool,
    pub azan_variant: AdhanVariant,
    #[serde(with = "toml_datetime_compat")]
    pub alarm_time: NaiveTime,
    pub trigger: TriggerMode,
    pub beeps: BeepConfig,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            location: LocationId::default(),
            convention: Convention::default(),
            sound_enabled: true,
            azan_enabled: true,
            azan_variant: AdhanVariant::default(),
            alarm_time: default_alarm_time(),
            trigger: TriggerMode::default(),
            beeps: BeepConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub time_format: String,
    pub theme: Theme,
    /// defaults to the `sounds` folder in the data directory
    pub sounds_dir: Option<PathBuf>,
    pub remote_azan_url: String,
    /// layout used when the clock is shrunk to a widget
    pub widget_size: WidgetSize,
    pub palette: Palette,
    pub preferences: Preferences,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_format: "%I:%M:%S %p".to_string(),
            theme: Theme::Dark,
            sounds_dir: None,
            remote_azan_url: REMOTE_AZAN_URL.to_string(),
            widget_size: WidgetSize::default(),
            palette: Palette::default(),
            preferences: Preferences::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the config at `path`, a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(config) => {
                let mut config: Self = toml::from_str(&config)?;
                config.preferences.beeps = config.preferences.beeps.clamped();
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Writes the defaults to `path`.
    ///
    /// An existing file is left alone unless `force` is set, and is never
    /// read, so a config that no longer parses can still be replaced.
    /// Returns the written config, or `None` if nothing was written.
    pub fn init(path: &Path, force: bool) -> Result<Option<Self>, ConfigError> {
        if path.exists() && !force {
            return Ok(None);
        }
        let config = Self::new();
        config.save(path)?;
        Ok(Some(config))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let config = toml::to_string(self)?;
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, config).map_err(write_error)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let mut path = directories::ProjectDirs::from("", "", APP_NAME)
            .ok_or(ConfigError::NoProjectDirs)?
            .config_dir()
            .to_path_buf();
        path.push("config.toml");
        Ok(path)
    }

    pub fn default_sounds_path() -> Result<PathBuf, ConfigError> {
        let mut path = directories::ProjectDirs::from("", "", APP_NAME)
            .ok_or(ConfigError::NoProjectDirs)?
            .data_dir()
            .to_path_buf();
        path.push("sounds");
        Ok(path)
    }

    pub fn sounds_path(&self) -> Result<PathBuf, ConfigError> {
        self.sounds_dir
            .clone()
            .map_or_else(Self::default_sounds_path, Ok)
    }

    pub fn assets(&self) -> Result<Assets, ConfigError> {
        Ok(Assets {
            sounds_dir: self.sounds_path()?,
            remote_url: self.remote_azan_url.clone(),
        })
    }
}
