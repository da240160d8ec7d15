// In crates/app-config/src/lib.rs

use std::path::Path;

use config::{Config, Environment, File};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, CodecSettings, Settings};

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `config/base.toml` file, if present.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Same as [`load_settings`], reading the TOML files from `dir`.
pub fn load_settings_from(dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        .set_default("app.environment", environment.as_str())?
        // 1. Load the base configuration file.
        .add_source(File::from(dir.join("base")).required(false))
        // 2. Load the environment-specific configuration file.
        .add_source(File::from(dir.join(&environment)).required(false))
        // 3. Load settings from environment variables (e.g., `APP_CODEC__PRETTY=true`).
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;

    Ok(settings)
}

/// Loads settings from a single TOML file, bypassing the layered sources.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;

    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_to_an_empty_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file).unwrap();
        let settings = load_settings_file(file.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.app.log_level, "info");
        assert!(!settings.codec.strict);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[app]\nlog_level = \"debug\"\n\n[codec]\npretty = true").unwrap();
        let settings = load_settings_file(file.path()).unwrap();
        assert_eq!(settings.app.log_level, "debug");
        assert_eq!(settings.app.environment, "development");
        assert!(settings.codec.pretty);
        assert!(!settings.codec.strict);
    }

    #[test]
    fn layered_loading_reads_base_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("base.toml"), "[codec]\nstrict = true\n").unwrap();
        let settings = load_settings_from(dir.path()).unwrap();
        assert!(settings.codec.strict);
    }

    #[test]
    fn layered_loading_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path()).unwrap();
        assert_eq!(settings.codec, CodecSettings::default());
    }

    #[test]
    fn malformed_file_is_a_toml_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[codec\npretty = yes").unwrap();
        assert!(matches!(
            load_settings_file(file.path()),
            Err(Error::TomlError(_))
        ));
    }
}
