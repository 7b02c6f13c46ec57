//! Main application configuration
//!
//! This module defines the primary configuration structures for fight-elo,
//! including TOML file loading, environment variable overrides and validation.

use crate::config::input::{ColumnMapping, OutcomeVocabulary};
use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub input: InputSettings,
    pub rating: RatingConfig,
    pub output: OutputSettings,
    pub server: ServerSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where the match log lives and how to read it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Path to the match log (CSV with a header row)
    pub path: PathBuf,
    pub columns: ColumnMapping,
    pub outcomes: OutcomeVocabulary,
}

/// Where the derived tables are published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory the tables are published into
    pub dir: PathBuf,
    pub leaderboard_file: String,
    pub stats_file: String,
    pub match_ratings_file: String,
    pub manifest_file: String,
    /// Also publish the per-match rating table
    pub write_match_ratings: bool,
}

/// Query server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to (typically "0.0.0.0" for all interfaces)
    pub host: String,
    pub port: u16,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "fight-elo".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("all_ufc_fights.csv"),
            columns: ColumnMapping::default(),
            outcomes: OutcomeVocabulary::default(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            leaderboard_file: "current_fighters_elo.csv".to_string(),
            stats_file: "fighter_stats.csv".to_string(),
            match_ratings_file: "fights_with_elo.csv".to_string(),
            manifest_file: "manifest.json".to_string(),
            write_match_ratings: true,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still win
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("FIGHT_ELO_SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("FIGHT_ELO_LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Input / output
        if let Ok(path) = env::var("FIGHT_ELO_INPUT") {
            self.input.path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("FIGHT_ELO_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
        if let Ok(write) = env::var("FIGHT_ELO_WRITE_MATCH_RATINGS") {
            self.output.write_match_ratings = write
                .parse()
                .map_err(|_| anyhow!("Invalid FIGHT_ELO_WRITE_MATCH_RATINGS value: {}", write))?;
        }

        // Rating settings
        if let Ok(k) = env::var("FIGHT_ELO_K_FACTOR") {
            self.rating.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid FIGHT_ELO_K_FACTOR value: {}", k))?;
        }
        if let Ok(initial) = env::var("FIGHT_ELO_INITIAL_RATING") {
            self.rating.initial_rating = initial
                .parse()
                .map_err(|_| anyhow!("Invalid FIGHT_ELO_INITIAL_RATING value: {}", initial))?;
        }

        // Server settings
        if let Ok(host) = env::var("FIGHT_ELO_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("FIGHT_ELO_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| anyhow!("Invalid FIGHT_ELO_PORT value: {}", port))?;
        }

        Ok(())
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.leaderboard_file)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.stats_file)
    }

    pub fn match_ratings_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.match_ratings_file)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.manifest_file)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports
    if config.server.port == 0 {
        return Err(anyhow!("Server port cannot be 0"));
    }
    if config.server.host.is_empty() {
        return Err(anyhow!("Server host cannot be empty"));
    }

    // Validate paths
    if config.input.path.as_os_str().is_empty() {
        return Err(anyhow!("Input path cannot be empty"));
    }
    if config.output.dir.as_os_str().is_empty() {
        return Err(anyhow!("Output directory cannot be empty"));
    }

    // Validate output settings
    let files = [
        &config.output.leaderboard_file,
        &config.output.stats_file,
        &config.output.match_ratings_file,
        &config.output.manifest_file,
    ];
    if files.iter().any(|file| file.is_empty()) {
        return Err(anyhow!("Output file names cannot be empty"));
    }
    for (i, file) in files.iter().enumerate() {
        if files[i + 1..].contains(file) {
            return Err(anyhow!("Output file name '{}' is used twice", file));
        }
    }

    config.input.columns.validate()?;
    config.input.outcomes.validate()?;
    config.rating.validate()?;

    Ok(())
}
