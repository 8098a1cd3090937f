//! Configuration validation
//!
//! Catches configurations that would make the engine misbehave at runtime:
//! zero intervals, malformed hashes, entities pointing outside the column
//! grid, and level kinds paired with write strategies that cannot carry
//! them.

use super::loader::{Config, ConfigError, EntityConfig, InputConfig, ValueKind, WriteKind};
use crate::input::Calibration;
use std::collections::HashSet;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_process(config)?;
        Self::validate_poll(config)?;
        Self::validate_input(&config.input)?;
        Self::validate_versions(config)?;
        for entity in &config.entities {
            Self::validate_entity(entity, &config.input)?;
        }
        Ok(())
    }

    fn validate_process(config: &Config) -> Result<(), ConfigError> {
        if config.process.name.is_empty() {
            return Err(ConfigError::Invalid(
                "Process name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_poll(config: &Config) -> Result<(), ConfigError> {
        if config.poll.attached_ms == 0 {
            return Err(ConfigError::Invalid(
                "Attached poll interval must be at least 1 ms".to_string(),
            ));
        }
        if config.poll.searching_ms == 0 || config.poll.not_running_ms == 0 {
            return Err(ConfigError::Invalid(
                "Retry poll intervals must be at least 1 ms".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_input(input: &InputConfig) -> Result<(), ConfigError> {
        if input.column_count == 0 {
            return Err(ConfigError::Invalid(
                "Column count must be at least 1".to_string(),
            ));
        }
        if !input.margin_px.is_finite() || input.margin_px < 0.0 {
            return Err(ConfigError::Invalid(
                "Column margin must be a non-negative number of pixels".to_string(),
            ));
        }
        if input.notch.max_notches < 2 {
            return Err(ConfigError::Invalid(
                "Notch controls need at least 2 notches".to_string(),
            ));
        }
        Self::validate_calibration("slider bottom", &input.slider.bottom)?;
        Self::validate_calibration("slider top", &input.slider.top)?;
        Self::validate_calibration("notch bottom", &input.notch.bottom)?;
        Self::validate_calibration("notch top", &input.notch.top)?;
        Ok(())
    }

    fn validate_calibration(name: &str, calibration: &Calibration) -> Result<(), ConfigError> {
        let anchors = calibration.anchors();
        if anchors.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "Calibration table '{name}' has no anchors"
            )));
        }
        // Deserialized tables bypass the sorting constructor.
        if anchors
            .windows(2)
            .any(|pair| pair[0].window_height >= pair[1].window_height)
        {
            return Err(ConfigError::Invalid(format!(
                "Calibration table '{name}' must be sorted by window height with no duplicates"
            )));
        }
        Ok(())
    }

    fn validate_versions(config: &Config) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for version in &config.versions {
            let hash = &version.exe_sha256;
            if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Invalid(format!(
                    "Version {} has a malformed SHA-256 hash",
                    version.version
                )));
            }
            if !seen.insert(hash.to_uppercase()) {
                return Err(ConfigError::Invalid(format!(
                    "Duplicate executable hash for version {}",
                    version.version
                )));
            }
        }
        Ok(())
    }

    fn validate_entity(entity: &EntityConfig, input: &InputConfig) -> Result<(), ConfigError> {
        if entity.column >= input.column_count {
            return Err(ConfigError::Invalid(format!(
                "Entity '{}' is in column {} but only {} columns exist",
                entity.name, entity.column, input.column_count
            )));
        }
        if entity.levels.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "Entity '{}' has no levels",
                entity.name
            )));
        }

        let mut seen = HashSet::new();
        for level in &entity.levels {
            if !seen.insert(level.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "Entity '{}' has duplicate level '{}'",
                    entity.name, level.name
                )));
            }
            if level.offsets.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Level '{}/{}' has no pointer offsets",
                    entity.name, level.name
                )));
            }
            if !(level.min <= level.max) {
                return Err(ConfigError::Invalid(format!(
                    "Level '{}/{}' has min above max",
                    entity.name, level.name
                )));
            }
            match (level.kind, level.write) {
                (ValueKind::Float, WriteKind::Notch) => {
                    return Err(ConfigError::Invalid(format!(
                        "Level '{}/{}': notch writes require a byte level",
                        entity.name, level.name
                    )));
                }
                (ValueKind::Byte | ValueKind::Int, WriteKind::Slider) => {
                    return Err(ConfigError::Invalid(format!(
                        "Level '{}/{}': slider writes require a float level",
                        entity.name, level.name
                    )));
                }
                (ValueKind::Int, WriteKind::Notch) => {
                    return Err(ConfigError::Invalid(format!(
                        "Level '{}/{}': notch writes require a byte level",
                        entity.name, level.name
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = Config::default();
        config.poll.attached_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_process_name_rejected() {
        let mut config = Config::default();
        config.process.name.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_column_out_of_range_rejected() {
        let mut config = Config::default();
        config.entities[0].column = config.input.column_count;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_malformed_hash_rejected() {
        let mut config = Config::default();
        config.versions[0].exe_sha256 = "nothex".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_hash_rejected() {
        let mut config = Config::default();
        let duplicate = config.versions[0].clone();
        config.versions.push(duplicate);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_kind_write_mismatch_rejected() {
        let mut config = Config::default();
        // Heat is a float; notch writes carry bytes.
        config.entities[0].levels[2].write = WriteKind::Notch;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unsorted_calibration_rejected() {
        // Deserialization bypasses the sorting constructor, so an unsorted
        // table in a config file must be caught here.
        #[derive(serde::Deserialize)]
        struct Wrapper {
            table: Calibration,
        }

        let unsorted: Wrapper = toml::from_str(
            "table = [{ window_height = 800, pixels = 2.0 }, { window_height = 600, pixels = 1.0 }]",
        )
        .unwrap();

        let mut config = Config::default();
        config.input.slider.top = unsorted.table;
        assert!(validate_config(&config).is_err());
    }
}
