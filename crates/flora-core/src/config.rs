//! Configuration loading and typed config structures for the Cave Flora engine.
//!
//! The canonical configuration lives in `flora-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every section and field is optional; missing values fall back to the
//! defaults below.

use std::path::Path;

use flora_plants::{GrowthConfig, PlantError, SpeciesCatalog, builtin_species};
use flora_types::SpeciesDefinition;
use serde::Deserialize;

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV_VAR: &str = "FLORA_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of its valid range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },

    /// The species list failed validation.
    #[error("invalid species list: {source}")]
    Species {
        /// The underlying catalog error.
        #[from]
        source: PlantError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `flora-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, cave size).
    #[serde(default)]
    pub world: WorldConfig,

    /// Run length and reporting cadence.
    #[serde(default)]
    pub time: TimeConfig,

    /// Per-batch growth tunables.
    #[serde(default)]
    pub growth: GrowthConfig,

    /// Logging and snapshot settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Species catalog. Defaults to the built-in species.
    #[serde(default = "builtin_species")]
    pub species: Vec<SpeciesDefinition>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            time: TimeConfig::default(),
            growth: GrowthConfig::default(),
            logging: LoggingConfig::default(),
            species: builtin_species(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `FLORA_SEED` overrides `world.seed` when set to a valid integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_seed_override(std::env::var(SEED_ENV_VAR).ok().as_deref());
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the world seed with `value` if it parses as an integer.
    /// Unparseable values are logged and ignored.
    pub fn apply_seed_override(&mut self, value: Option<&str>) {
        let Some(raw) = value else {
            return;
        };
        match raw.trim().parse::<u64>() {
            Ok(seed) => {
                tracing::info!(seed, "world seed overridden from {SEED_ENV_VAR}");
                self.world.seed = seed;
            }
            Err(e) => {
                tracing::warn!(value = raw, error = %e, "ignoring invalid {SEED_ENV_VAR}");
            }
        }
    }

    /// Check values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero tick lengths or a cave
    /// smaller than the starting layout needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.growth.ticks_per_day == 0 {
            return Err(ConfigError::Invalid {
                reason: "growth.ticks_per_day must be at least 1".to_owned(),
            });
        }
        if self.growth.batch_tick_span == 0 {
            return Err(ConfigError::Invalid {
                reason: "growth.batch_tick_span must be at least 1".to_owned(),
            });
        }
        let min_side = flora_world::cave::MIN_CAVE_SIDE;
        if self.world.width < min_side || self.world.height < min_side {
            return Err(ConfigError::Invalid {
                reason: format!("world.width and world.height must be at least {min_side}"),
            });
        }
        Ok(())
    }

    /// Build the validated species catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Species`] if a definition is invalid or
    /// duplicated.
    pub fn catalog(&self) -> Result<SpeciesCatalog, ConfigError> {
        Ok(SpeciesCatalog::from_definitions(self.species.iter().cloned())?)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable run name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Cave width in cells.
    #[serde(default = "default_cave_side")]
    pub width: u32,

    /// Cave height in cells.
    #[serde(default = "default_cave_side")]
    pub height: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            width: default_cave_side(),
            height: default_cave_side(),
        }
    }
}

/// Run length configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// Batches to run before the engine stops.
    #[serde(default = "default_max_batches")]
    pub max_batches: u64,

    /// Log a population summary every N batches (0 disables).
    #[serde(default = "default_summary_interval_batches")]
    pub summary_interval_batches: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            max_batches: default_max_batches(),
            summary_interval_batches: default_summary_interval_batches(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write a state snapshot every N batches (0 disables).
    #[serde(default = "default_snapshot_interval_batches")]
    pub snapshot_interval_batches: u64,

    /// Where snapshots are written.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Restore from `snapshot_path` at startup when the file exists.
    #[serde(default)]
    pub resume_from_snapshot: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            snapshot_interval_batches: default_snapshot_interval_batches(),
            snapshot_path: default_snapshot_path(),
            resume_from_snapshot: false,
        }
    }
}

fn default_world_name() -> String {
    "Cave Flora".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_cave_side() -> u32 {
    32
}

const fn default_max_batches() -> u64 {
    900
}

const fn default_summary_interval_batches() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_snapshot_interval_batches() -> u64 {
    0
}

fn default_snapshot_path() -> String {
    "flora-snapshot.json".to_owned()
}
