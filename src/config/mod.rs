use crate::models::AppConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// Environment prefix for overrides, e.g. `PARAMGROUPS__CATALOG__CATALOG_DIR`
pub const ENV_PREFIX: &str = "PARAMGROUPS";

/// Configuration manager for loading and saving the YAML configuration file.
///
/// Settings are read from `ParamGroups Config.yaml` in the configuration
/// directory and layered with environment overrides (`<PREFIX>__SECTION__KEY`).
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing the configuration file (e.g., "ParamGroups Data")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        Self::with_env_prefix(config_dir, ENV_PREFIX)
    }

    /// Same as [`new`](Self::new) but reading overrides under another prefix.
    pub fn with_env_prefix<P: AsRef<Utf8Path>>(config_dir: P, env_prefix: &str) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            config_path: config_dir.join("ParamGroups Config.yaml"),
            env_prefix: env_prefix.to_string(),
            config_dir,
        })
    }

    /// Load the application configuration.
    ///
    /// A missing file yields defaults; environment overrides apply either way.
    pub fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            tracing::warn!(
                "Config file not found at {}, using defaults",
                self.config_path
            );
        }

        let settings = Config::builder()
            .add_source(
                File::new(self.config_path.as_str(), FileFormat::Yaml).required(false),
            )
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config: {}", self.config_path))?;

        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse config: {}", self.config_path))?;

        tracing::info!("Loaded config from {}", self.config_path);
        Ok(config)
    }

    /// Save the application configuration file.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write config: {}", self.config_path))?;

        tracing::info!("Saved config to {}", self.config_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}
