use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
pub const DEFAULT_GEOLOCATION_URL: &str = "https://ipinfo.io/json";

/// Remote endpoints the dashboard talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Base of the current-conditions (`/weather`) and forecast (`/forecast`) endpoints.
    pub weather_base_url: String,
    /// Icon CDN; icons are fetched as `{icon_base_url}/{icon}.png`.
    pub icon_base_url: String,
    /// IP geolocation lookup used in place of a platform location service.
    pub geolocation_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// geolocation = true
///
/// [endpoints]
/// weather_base_url = "https://api.openweathermap.org/data/2.5"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather `appid` credential.
    pub api_key: Option<String>,

    /// Whether to resolve the location automatically on start.
    pub geolocation: bool,

    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            geolocation: true,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config dir, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path, or defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skywatch", "skywatch")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the stored API key. Blank keys are treated as "unset".
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        let key = api_key.into();
        let key = key.trim();
        self.api_key = (!key.is_empty()).then(|| key.to_string());
    }

    /// API key, or an error telling the user how to configure one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `skywatch configure` or set SKYWATCH_API_KEY."
            )
        })
    }

    /// Icon URL for an OpenWeather icon id, e.g. `10d`.
    pub fn icon_url(&self, icon_id: &str) -> String {
        format!("{}/{}.png", self.endpoints.icon_base_url.trim_end_matches('/'), icon_id)
    }
}
