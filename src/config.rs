use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::Requirements;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub grouping: GroupingSettings,
    #[serde(default)]
    pub requirements: RequirementSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Engine-wide grouping parameters
#[derive(Debug, Clone, Deserialize)]
pub struct GroupingSettings {
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold_km: f64,
    #[serde(default = "default_min_group_size")]
    pub min_group_size: u32,
    #[serde(default = "default_max_group_size")]
    pub max_group_size: u32,
    #[serde(default = "default_true")]
    pub keep_families_together: bool,
    #[serde(default = "default_true")]
    pub assign_meeting_points: bool,
}

impl Default for GroupingSettings {
    fn default() -> Self {
        Self {
            distance_threshold_km: default_distance_threshold(),
            min_group_size: default_min_group_size(),
            max_group_size: default_max_group_size(),
            keep_families_together: true,
            assign_meeting_points: true,
        }
    }
}

fn default_distance_threshold() -> f64 { 2.0 }
fn default_min_group_size() -> u32 { 3 }
fn default_max_group_size() -> u32 { 20 }
fn default_true() -> bool { true }

/// Minimum role counts a group must satisfy
#[derive(Debug, Clone, Deserialize)]
pub struct RequirementSettings {
    #[serde(default)]
    pub min_elders: u32,
    #[serde(default)]
    pub min_servants: u32,
    #[serde(default)]
    pub min_pioneers: u32,
    #[serde(default = "default_min_leaders")]
    pub min_leaders: u32,
    #[serde(default = "default_min_helpers")]
    pub min_helpers: u32,
    #[serde(default)]
    pub min_publishers: u32,
}

impl Default for RequirementSettings {
    fn default() -> Self {
        Self {
            min_elders: 0,
            min_servants: 0,
            min_pioneers: 0,
            min_leaders: default_min_leaders(),
            min_helpers: default_min_helpers(),
            min_publishers: 0,
        }
    }
}

fn default_min_leaders() -> u32 { 1 }
fn default_min_helpers() -> u32 { 1 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with FLOCK_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with FLOCK_)
            // e.g., FLOCK_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("FLOCK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FLOCK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Assemble the repository's stored requirements from configuration
    pub fn requirements(&self) -> Requirements {
        Requirements {
            min_elders: self.requirements.min_elders,
            min_servants: self.requirements.min_servants,
            min_pioneers: self.requirements.min_pioneers,
            min_leaders: self.requirements.min_leaders,
            min_helpers: self.requirements.min_helpers,
            min_publishers: self.requirements.min_publishers,
            distance_threshold_km: self.grouping.distance_threshold_km,
            min_group_size: self.grouping.min_group_size,
            max_group_size: self.grouping.max_group_size,
            keep_families_together: self.grouping.keep_families_together,
            assign_meeting_points: self.grouping.assign_meeting_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grouping() {
        let grouping = GroupingSettings::default();
        assert_eq!(grouping.distance_threshold_km, 2.0);
        assert_eq!(grouping.min_group_size, 3);
        assert_eq!(grouping.max_group_size, 20);
        assert!(grouping.keep_families_together);
        assert!(grouping.assign_meeting_points);
    }

    #[test]
    fn test_default_quotas() {
        let quotas = RequirementSettings::default();
        assert_eq!(quotas.min_leaders, 1);
        assert_eq!(quotas.min_helpers, 1);
        assert_eq!(quotas.min_elders, 0);
        assert_eq!(quotas.min_publishers, 0);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }
}
