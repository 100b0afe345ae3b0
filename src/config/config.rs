use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the prediction service. `RISK_API_URL` overrides it.
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for status icons
    pub use_glyphs: bool,

    /// Icons for different states (can be overridden)
    pub icons: IconConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub api: String,
    pub warning: String,
    pub error: String,
    pub success: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Record each submission in the assessment history file
    pub enable_history: bool,

    /// Maximum history entries to keep
    pub max_history_entries: usize,

    /// Probe /api/health on startup and show the outcome in the status bar
    pub health_check_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            display: DisplayConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            icons: IconConfig::default(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            api: "🌐".to_string(),
            warning: "⚠️".to_string(),
            error: "❌".to_string(),
            success: "✅".to_string(),
        }
    }
}

impl IconConfig {
    /// ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            api: "[API]".to_string(),
            warning: "[!]".to_string(),
            error: "[X]".to_string(),
            success: "[OK]".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            enable_history: true,
            max_history_entries: 200,
            health_check_on_start: true,
        }
    }
}

impl Config {
    /// Load config from the default location, creating it on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if !config.display.use_glyphs {
            config.display.icons = IconConfig::simple();
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("risk-cli").join("config.toml"))
    }

    /// Default config file with comments, for `--generate-config`.
    pub fn create_default_with_comments() -> String {
        r#"# risk-cli Configuration File
# Location: ~/.config/risk-cli/config.toml (Linux/macOS)
#           %APPDATA%\risk-cli\config.toml (Windows)

[api]
# Base URL of the credit-risk prediction service.
# The RISK_API_URL environment variable overrides this value.
base_url = "http://localhost:8000"

[display]
# Use Unicode glyphs for status icons
# Set to false for ASCII-only mode (better compatibility)
use_glyphs = true

# Icon configuration
# These are automatically set to ASCII when use_glyphs = false
[display.icons]
api = "🌐"
warning = "⚠️"
error = "❌"
success = "✅"

[behavior]
# Record each submission in the assessment history (F3 in the TUI)
enable_history = true

# Maximum number of history entries to keep
max_history_entries = 200

# Probe /api/health on startup and show the outcome in the status bar
health_check_on_start = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert!(config.display.use_glyphs);
        assert!(config.behavior.enable_history);
        assert_eq!(config.behavior.max_history_entries, 200);
    }

    #[test]
    fn test_simple_icons() {
        let icons = IconConfig::simple();
        assert_eq!(icons.api, "[API]");
        assert_eq!(icons.success, "[OK]");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.api.base_url, parsed.api.base_url);
        assert_eq!(config.display.use_glyphs, parsed.display.use_glyphs);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[api]\nbase_url = \"http://risk.internal:9000\"\n")
            .unwrap();
        assert_eq!(parsed.api.base_url, "http://risk.internal:9000");
        assert!(parsed.behavior.enable_history);
    }
}
