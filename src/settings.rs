//! User settings persisted as JSON.
//!
//! Every field is a closed type, so a file that deserializes is a valid
//! configuration. Anything else (missing file, bad JSON, an unknown accent
//! colour) falls back to [`Settings::default`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, str::FromStr};
use tracing::{debug, warn};

pub const DEFAULT_SETTINGS_FILE: &str = "otp-login-settings.json";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hu")]
    Hungarian,
}

impl Language {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hungarian => "hu",
        }
    }
}

impl FromStr for Language {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::English, Self::Hungarian]
            .into_iter()
            .find(|language| language.code() == s)
            .ok_or_else(|| SettingsError::UnknownValue {
                field: "language",
                value: s.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    Red,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Emerald,
    Teal,
    Cyan,
    Sky,
    Blue,
    Indigo,
    Violet,
    #[default]
    Purple,
    Fuchsia,
    Pink,
    Rose,
}

impl AccentColor {
    pub const ALL: [AccentColor; 17] = [
        Self::Red,
        Self::Orange,
        Self::Amber,
        Self::Yellow,
        Self::Lime,
        Self::Green,
        Self::Emerald,
        Self::Teal,
        Self::Cyan,
        Self::Sky,
        Self::Blue,
        Self::Indigo,
        Self::Violet,
        Self::Purple,
        Self::Fuchsia,
        Self::Pink,
        Self::Rose,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Amber => "amber",
            Self::Yellow => "yellow",
            Self::Lime => "lime",
            Self::Green => "green",
            Self::Emerald => "emerald",
            Self::Teal => "teal",
            Self::Cyan => "cyan",
            Self::Sky => "sky",
            Self::Blue => "blue",
            Self::Indigo => "indigo",
            Self::Violet => "violet",
            Self::Purple => "purple",
            Self::Fuchsia => "fuchsia",
            Self::Pink => "pink",
            Self::Rose => "rose",
        }
    }

    /// ANSI 256-colour index used by the terminal renderer.
    #[must_use]
    pub const fn ansi(self) -> u8 {
        match self {
            Self::Red => 196,
            Self::Orange => 208,
            Self::Amber => 214,
            Self::Yellow => 226,
            Self::Lime => 154,
            Self::Green => 40,
            Self::Emerald => 36,
            Self::Teal => 30,
            Self::Cyan => 51,
            Self::Sky => 117,
            Self::Blue => 33,
            Self::Indigo => 63,
            Self::Violet => 99,
            Self::Purple => 129,
            Self::Fuchsia => 201,
            Self::Pink => 211,
            Self::Rose => 204,
        }
    }
}

impl FromStr for AccentColor {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.name() == s)
            .ok_or_else(|| SettingsError::UnknownValue {
                field: "accentColor",
                value: s.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl FromStr for ThemeMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(SettingsError::UnknownValue {
                field: "mode",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub accent_color: AccentColor,
    pub cursor_trail: bool,
    pub site_background: bool,
    pub mode: ThemeMode,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent_color: AccentColor::Purple,
            cursor_trail: true,
            site_background: true,
            mode: ThemeMode::Light,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub language: Language,
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Invalid(serde_json::Error),
    UnknownValue { field: &'static str, value: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "Failed to read settings: {err}"),
            SettingsError::Invalid(err) => write!(f, "Invalid settings: {err}"),
            SettingsError::UnknownValue { field, value } => {
                write!(f, "Unknown {field}: {value}")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Invalid(err) => Some(err),
            SettingsError::UnknownValue { .. } => None,
        }
    }
}

impl Settings {
    /// Parse and validate a settings document.
    ///
    /// # Errors
    /// Returns an error if the document is not valid JSON, misses a field or
    /// carries a value outside the allowed set.
    pub fn parse(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(SettingsError::Invalid)
    }

    /// Read settings from `path`, or defaults if the file is missing or invalid.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                warn!("{err} ({}), using defaults", path.display());
                Self::default()
            }
        }
    }

    /// # Errors
    /// Returns an error if the file cannot be read or is not valid.
    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(SettingsError::Io)?;
        Self::parse(&json)
    }

    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
