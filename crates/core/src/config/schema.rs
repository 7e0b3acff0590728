//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub signing: SigningSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Gradle root project directory (the directory holding key.properties)
    #[serde(default = "default_project_root")]
    pub project_root: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
        }
    }
}

fn default_project_root() -> String {
    ".".to_string()
}

/// Release signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningSettings {
    /// Credentials file, relative to the project root
    #[serde(default = "default_properties_file")]
    pub properties_file: String,

    /// Name of the signing config created from complete credentials
    #[serde(default = "default_release_config")]
    pub release_config: String,

    /// Name of the platform-supplied fallback signing config
    #[serde(default = "default_debug_config")]
    pub debug_config: String,

    /// Build variant the selected signing config is applied to
    #[serde(default = "default_variant")]
    pub variant: String,

    /// Override for the debug keystore location (`~` is expanded)
    #[serde(default)]
    pub debug_keystore: Option<String>,
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            properties_file: default_properties_file(),
            release_config: default_release_config(),
            debug_config: default_debug_config(),
            variant: default_variant(),
            debug_keystore: None,
        }
    }
}

fn default_properties_file() -> String {
    "key.properties".to_string()
}

fn default_release_config() -> String {
    "release".to_string()
}

fn default_debug_config() -> String {
    "debug".to_string()
}

fn default_variant() -> String {
    "release".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log line format on stderr
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single lines
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}
