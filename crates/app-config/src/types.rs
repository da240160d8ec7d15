// In crates/app-config/src/types.rs

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// How records are written and read.
    #[serde(default)]
    pub codec: CodecSettings,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecSettings {
    /// Indent encoded output.
    #[serde(default)]
    pub pretty: bool,
    /// Route decoding through the declared record schema, rejecting unknown
    /// or mistyped fields instead of ignoring them.
    #[serde(default)]
    pub strict: bool,
}

/// Helper functions for serde defaults
fn default_environment() -> String { "development".to_string() }
fn default_log_level() -> String { "info".to_string() }
