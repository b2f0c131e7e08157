//! Configuration for the generation service
//!
//! Resolution priority: environment variables, then the TOML config file,
//! then compiled defaults. A missing file silently yields defaults; a
//! malformed file is an error rather than a silent misconfiguration.

use ezq_common::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

const ENV_PROVIDER: &str = "EZQ_PROVIDER";
const ENV_MODEL: &str = "EZQ_MODEL";
const ENV_MAX_COUNT: &str = "EZQ_MAX_COUNT";

/// On-disk config file shape (`~/.config/ezq/ezq-qg.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub max_count: Option<usize>,
}

/// Resolved generation settings.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Provider name resolved through the service registry.
    pub provider: String,
    /// Model override passed through to the provider, when it supports one.
    pub model: Option<String>,
    /// Ceiling on the question count a caller may request, 1..=100.
    pub max_count: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "echo".to_string(),
            model: None,
            max_count: 30,
        }
    }
}

impl GenerationConfig {
    /// Load from the platform config path plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path().as_deref())
    }

    /// Load from an explicit file path plus environment overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let parsed: TomlConfig = toml::from_str(&content).map_err(|e| {
                    Error::Config(format!("parse {} failed: {}", path.display(), e))
                })?;
                if let Some(provider) = parsed.provider {
                    config.provider = provider;
                }
                config.model = parsed.model.or(config.model);
                if let Some(max_count) = parsed.max_count {
                    config.max_count = max_count;
                }
            }
        }

        if let Ok(provider) = std::env::var(ENV_PROVIDER) {
            if !provider.trim().is_empty() {
                config.provider = provider.trim().to_string();
            }
        }
        if let Ok(model) = std::env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                config.model = Some(model.trim().to_string());
            }
        }
        if let Ok(raw) = std::env::var(ENV_MAX_COUNT) {
            match raw.trim().parse::<usize>() {
                Ok(value) => config.max_count = value,
                Err(_) => warn!(value = %raw, "ignoring non-numeric {}", ENV_MAX_COUNT),
            }
        }

        config.max_count = config.max_count.clamp(1, 100);
        Ok(config)
    }
}

/// Platform config file location (`<config dir>/ezq/ezq-qg.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ezq").join("ezq-qg.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var(ENV_PROVIDER);
        std::env::remove_var(ENV_MODEL);
        std::env::remove_var(ENV_MAX_COUNT);
    }

    #[test]
    #[serial]
    fn defaults_apply_without_file_or_env() {
        clear_env();
        let config = GenerationConfig::load_from(None).unwrap();
        assert_eq!(config.provider, "echo");
        assert_eq!(config.model, None);
        assert_eq!(config.max_count, 30);
    }

    #[test]
    #[serial]
    fn missing_file_is_not_an_error() {
        clear_env();
        let config =
            GenerationConfig::load_from(Some(Path::new("/nonexistent/ezq-qg.toml"))).unwrap();
        assert_eq!(config.provider, "echo");
    }

    #[test]
    #[serial]
    fn toml_file_overrides_defaults() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider = \"gemini\"\nmax_count = 12").unwrap();
        let config = GenerationConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.max_count, 12);
        assert_eq!(config.model, None);
    }

    #[test]
    #[serial]
    fn env_overrides_toml() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider = \"gemini\"\nmax_count = 12").unwrap();
        std::env::set_var(ENV_PROVIDER, "echo");
        std::env::set_var(ENV_MAX_COUNT, "55");
        let config = GenerationConfig::load_from(Some(file.path())).unwrap();
        clear_env();
        assert_eq!(config.provider, "echo");
        assert_eq!(config.max_count, 55);
    }

    #[test]
    #[serial]
    fn bad_env_count_is_ignored_and_clamped() {
        clear_env();
        std::env::set_var(ENV_MAX_COUNT, "lots");
        let config = GenerationConfig::load_from(None).unwrap();
        assert_eq!(config.max_count, 30);

        std::env::set_var(ENV_MAX_COUNT, "100000");
        let config = GenerationConfig::load_from(None).unwrap();
        clear_env();
        assert_eq!(config.max_count, 100);
    }

    #[test]
    #[serial]
    fn malformed_toml_is_a_config_error() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider = [not toml").unwrap();
        let err = GenerationConfig::load_from(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
