//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the bootstrap function exported by the runtime library
pub const DEFAULT_ENTRY_POINT: &str = "script_bridge_initialize";

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub startup: StartupConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuntimeConfig {
    /// Managed runtime shared library
    pub library: Option<PathBuf>,
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            library: None,
            entry_point: default_entry_point(),
        }
    }
}

fn default_entry_point() -> String {
    DEFAULT_ENTRY_POINT.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartupConfig {
    /// Abort startup when the runtime leaves a callback unset
    #[serde(default = "default_true")]
    pub fail_on_missing: bool,
    /// Call the runtime's startup hooks once the table is installed
    #[serde(default = "default_true")]
    pub run_startup_hooks: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            fail_on_missing: true,
            run_startup_hooks: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Report destination (default: stdout)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [runtime]
            library = "libmanaged_runtime.so"
            entry_point = "bootstrap"

            [startup]
            fail_on_missing = false

            [output]
            format = "json"
            path = "report.json"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(
            config.runtime.library,
            Some(PathBuf::from("libmanaged_runtime.so"))
        );
        assert_eq!(config.runtime.entry_point, "bootstrap");
        assert!(!config.startup.fail_on_missing);
        assert!(config.startup.run_startup_hooks);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.runtime.library.is_none());
        assert_eq!(config.runtime.entry_point, DEFAULT_ENTRY_POINT);
        assert!(config.startup.fail_on_missing);
        assert!(config.startup.run_startup_hooks);
        assert_eq!(config.output.format, OutputFormat::Txt);
        assert!(config.output.path.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[runtime]\nlibrary = \"runtime.dll\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.runtime.library, Some(PathBuf::from("runtime.dll")));
    }

    #[test]
    fn test_load_config_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[startup]\nfail_on_missing = \"maybe\"").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
