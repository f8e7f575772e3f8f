//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{StabkitError, StabkitResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabkitConfig {
    /// Smoothing and crop parameters for new sessions.
    pub stabilization: StabilizationDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default stabilization parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizationDefaults {
    /// Variance of the true trajectory's drift between frames.
    ///
    /// Lower values smooth harder and follow intentional pans more slowly.
    pub process_variance: f64,

    /// Variance of the noise in the raw accumulated trajectory.
    pub measurement_variance: f64,

    /// Pixels cropped from the left and right edges after warping.
    /// The vertical margin is derived from the frame's aspect ratio.
    pub horizontal_border_crop: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "stabkit_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for StabkitConfig {
    fn default() -> Self {
        Self {
            stabilization: StabilizationDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for StabilizationDefaults {
    fn default() -> Self {
        Self {
            process_variance: 4e-3,
            measurement_variance: 0.25,
            horizontal_border_crop: 20,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl StabilizationDefaults {
    /// Reject noise values the smoother cannot run with.
    pub fn validate(&self) -> StabkitResult<()> {
        for (name, value) in [
            ("process_variance", self.process_variance),
            ("measurement_variance", self.measurement_variance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(StabkitError::config(format!(
                    "{name} must be finite and > 0 (got {value})"
                )));
            }
        }
        Ok(())
    }
}

impl StabkitConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => {
                    tracing::info!(path = %config_path.display(), "Loaded config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> StabkitResult<Self> {
        if !path.exists() {
            return Err(StabkitError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all sections.
    pub fn validate(&self) -> StabkitResult<()> {
        self.stabilization.validate()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> StabkitResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config as pretty JSON at `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> StabkitResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("stabkit").join("config.json")
}
