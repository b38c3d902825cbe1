use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LoadError, Result};

/// Names a JSON file holding a [`DashboardConfig`].
pub const CONFIG_ENV: &str = "BIKE_DASHBOARD_CONFIG";
pub const DAILY_ENV: &str = "BIKE_DASHBOARD_DAILY";
pub const HOURLY_ENV: &str = "BIKE_DASHBOARD_HOURLY";
pub const LOCALE_ENV: &str = "BIKE_DASHBOARD_LOCALE";

/// Language of the weekday labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "id")]
    Indonesian,
}

impl std::str::FromStr for Locale {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "id" | "indonesian" => Ok(Locale::Indonesian),
            other => Err(LoadError::Config(format!("unknown locale '{other}'"))),
        }
    }
}

/// Startup settings. Every field has a default, so a partial JSON file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub daily_path: PathBuf,
    pub hourly_path: PathBuf,
    pub locale: Locale,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            daily_path: PathBuf::from("dashboard/main_data.csv"),
            hourly_path: PathBuf::from("data/hour.csv"),
            locale: Locale::English,
            window_width: 1280.0,
            window_height: 900.0,
        }
    }
}

impl DashboardConfig {
    /// Defaults, then the JSON file named by `BIKE_DASHBOARD_CONFIG`, then the
    /// individual environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(p) = lookup(DAILY_ENV) {
            config.daily_path = PathBuf::from(p);
        }
        if let Some(p) = lookup(HOURLY_ENV) {
            config.hourly_path = PathBuf::from(p);
        }
        if let Some(l) = lookup(LOCALE_ENV) {
            config.locale = l.parse()?;
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| LoadError::Config(format!("{}: {e}", path.display())))
    }
}
