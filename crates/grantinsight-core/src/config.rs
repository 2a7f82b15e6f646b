use crate::dashboard::DashboardModule;
use crate::display::DEFAULT_ALERT_WINDOW_DAYS;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Loaded from `<config dir>/grantinsight/config.toml`. Every field has a
/// default, so a missing file or a partial one is fine. CLI flags override
/// whatever ends up here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from the default location, defaults if there is none
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("grantinsight");

        Ok(config_dir.join("config.toml"))
    }

    /// Theme named in the config, default theme if the name is unknown
    pub fn theme(&self) -> Theme {
        Theme::by_name(&self.ui.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', falling back to default", self.ui.theme);
            Theme::default()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// JSON file with opportunities. Unset means the built-in fixture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Non-urgent cards get a deadline banner this many days out
    #[serde(default = "default_alert_window")]
    pub alert_window_days: i64,
}

fn default_alert_window() -> i64 {
    DEFAULT_ALERT_WINDOW_DAYS
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            alert_window_days: default_alert_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme name (Default Dark, Light, Nord)
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Show the landing screen before the dashboard
    #[serde(default = "default_start_on_landing")]
    pub start_on_landing: bool,

    #[serde(default)]
    pub sidebar_collapsed: bool,

    /// Module id the dashboard opens on
    #[serde(default = "default_module")]
    pub start_module: String,
}

fn default_theme() -> String {
    "Default Dark".to_string()
}

fn default_start_on_landing() -> bool {
    true
}

fn default_module() -> String {
    DashboardModule::Overview.id().to_string()
}

impl UiConfig {
    pub fn start_module(&self) -> DashboardModule {
        DashboardModule::from_id(&self.start_module)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            start_on_landing: default_start_on_landing(),
            sidebar_collapsed: false,
            start_module: default_module(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.alert_window_days, 7);
        assert_eq!(config.ui.theme, "Default Dark");
        assert!(config.data.source.is_none());
        assert_eq!(config.ui.start_module(), DashboardModule::Overview);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("alert_window_days"));
        assert!(toml.contains("theme"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [ui]
            theme = "nord"
            start_module = "active"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme().name, "Nord");
        assert_eq!(config.ui.start_module(), DashboardModule::Active);
        assert!(config.ui.start_on_landing);
        assert_eq!(config.display.alert_window_days, 7);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let mut config = Config::default();
        config.ui.theme = "Solarized".to_string();
        assert_eq!(config.theme().name, "Default Dark");
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.data.source = Some(PathBuf::from("/data/opps.json"));
        config.display.alert_window_days = 14;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.data.source, Some(PathBuf::from("/data/opps.json")));
        assert_eq!(loaded.display.alert_window_days, 14);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nalert_window_days = \"soon\"").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::Error::ConfigError(_))
        ));
    }
}
