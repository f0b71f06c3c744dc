use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles loading, validating and saving the settings used by
/// the statistics, request-letter and export commands.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Billing report settings
    #[serde(default)]
    pub billing: BillingConfig,

    /// Voice-cast request letter settings
    #[serde(default)]
    pub voice_request: VoiceRequestConfig,

    /// Project defaults
    #[serde(default)]
    pub project: ProjectConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Billing report configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BillingConfig {
    // @field: Price per spoken character
    #[serde(default = "default_unit_price")]
    pub unit_price: f64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            unit_price: default_unit_price(),
        }
    }
}

/// Voice-cast request letter configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VoiceRequestConfig {
    // @field: Price per spoken character quoted in the letter
    #[serde(default = "default_unit_price")]
    pub unit_price: f64,

    // @field: Delivery deadline; empty means two weeks from today
    #[serde(default)]
    pub deadline: String,

    // @field: Payment date; empty means three weeks from today
    #[serde(default)]
    pub payment: String,
}

impl Default for VoiceRequestConfig {
    fn default() -> Self {
        Self {
            unit_price: default_unit_price(),
            deadline: String::new(),
            payment: String::new(),
        }
    }
}

/// Project defaults
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Number of scenes in a new project
    #[serde(default = "default_scene_count")]
    pub default_scene_count: usize,

    /// Reading speed used for runtime targets and estimates
    #[serde(default = "default_chars_per_minute")]
    pub chars_per_minute: u32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_scene_count: default_scene_count(),
            chars_per_minute: default_chars_per_minute(),
        }
    }
}

/// Export configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    /// Directory exports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_unit_price() -> f64 {
    1.0
}

fn default_scene_count() -> usize {
    crate::project::DEFAULT_SCENE_COUNT
}

fn default_chars_per_minute() -> u32 {
    crate::project::DEFAULT_CHARS_PER_MINUTE
}

fn default_output_dir() -> String {
    ".".to_string()
}

/// Prices must be finite and non-negative
pub(crate) fn validate_price(name: &str, price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(anyhow!("{} must be a non-negative number, got {}", name, price));
    }
    Ok(())
}

impl Config {
    /// Load the configuration file, creating it with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        validate_price("billing.unit_price", self.billing.unit_price)?;
        validate_price("voice_request.unit_price", self.voice_request.unit_price)?;

        if self.project.chars_per_minute == 0 {
            return Err(anyhow!("project.chars_per_minute must be greater than zero"));
        }

        if self.project.default_scene_count == 0 {
            return Err(anyhow!("project.default_scene_count must be greater than zero"));
        }

        if self.export.output_dir.trim().is_empty() {
            return Err(anyhow!("export.output_dir must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LogLevel::default(),
            billing: BillingConfig::default(),
            voice_request: VoiceRequestConfig::default(),
            project: ProjectConfig::default(),
            export: ExportConfig::default(),
        }
    }
}
