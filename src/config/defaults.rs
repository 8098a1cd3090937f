//! Built-in default configuration
//!
//! Targets Artemis Spaceship Bridge Simulator out of the box: the known
//! build table, the eight engineering system columns with their pointer
//! chains, and the click calibration measured against real windows at a
//! range of heights.

use super::loader::{
    Config, EntityConfig, InputConfig, LevelConfig, LoggingConfig, NotchConfig, PollConfig,
    ProcessConfig, SliderConfig, ValueKind, WriteKind,
};
use crate::core::types::KnownVersion;
use crate::input::{Calibration, CalibrationPoint};

/// Returns the default configuration
pub fn default_config() -> Config {
    Config {
        process: ProcessConfig {
            name: "Artemis.exe".to_string(),
            window_title: None,
        },
        poll: PollConfig {
            attached_ms: 200,
            searching_ms: 2_000,
            not_running_ms: 10_000,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
        },
        input: default_input(),
        versions: default_versions(),
        entities: default_entities(),
    }
}

fn default_input() -> InputConfig {
    InputConfig {
        column_count: 8,
        margin_px: 24.0,
        dwell_ms: 8,
        slider: SliderConfig {
            x_inset: 50.0,
            bottom: Calibration::new(anchors(&[
                (600, 15.0),
                (664, 16.0),
                (720, 18.0),
                (768, 20.0),
                (800, 20.0),
                (864, 22.0),
                (900, 23.0),
                (960, 24.0),
                (1024, 26.0),
                (1050, 27.0),
                (1080, 27.0),
                (1200, 30.0),
                (1440, 36.0),
            ])),
            top: Calibration::new(anchors(&[
                (600, 198.0),
                (664, 223.0),
                (720, 246.0),
                (768, 266.0),
                (800, 278.0),
                (864, 228.0),
                (900, 228.0),
                (960, 236.0),
                (1024, 300.0),
                (1050, 326.0),
                (1080, 356.0),
                (1200, 438.0),
                (1440, 534.0),
            ])),
        },
        notch: NotchConfig {
            max_notches: 8,
            x_scale: 0.0037,
            x_inset: 87.695,
            bottom: Calibration::new(anchors(&[(600, 39.889), (1440, 59.881)])),
            top: Calibration::new(anchors(&[
                (600, 149.0),
                (800, 225.0),
                (810, 181.0),
                (820, 181.0),
                (950, 184.0),
                (1135, 349.0),
                (1440, 464.0),
            ])),
        },
    }
}

fn default_versions() -> Vec<KnownVersion> {
    vec![
        KnownVersion {
            version: "2.8.0".to_string(),
            base_offset: 0x1E2760,
            exe_sha256: "8754EC8D927A62B73DB680A0FF6D3995E7F8B69973FAA1CB87E05D790B31E463"
                .to_string(),
        },
        KnownVersion {
            version: "2.7.5".to_string(),
            base_offset: 0x1D2F38,
            exe_sha256: "39E7B842CEA2399D3088E93913731DD408C2426DB1973E65ECB918EC0242E05D"
                .to_string(),
        },
    ]
}

fn default_entities() -> Vec<EntityConfig> {
    const NAMES: [&str; 8] = [
        "Beams",
        "Torpedos",
        "Sensors",
        "Maneuvering",
        "Impulse",
        "Warp",
        "Front Shield",
        "Rear Shield",
    ];

    NAMES
        .iter()
        .enumerate()
        .map(|(column, name)| {
            // The power/coolant/heat block strides 0x20 per column and the
            // health block strides 0x08.
            let status = 0x20 * column as i64;
            let health = 0x08 * column as i64;
            EntityConfig {
                name: (*name).to_string(),
                column,
                levels: vec![
                    LevelConfig {
                        name: "Power".to_string(),
                        kind: ValueKind::Float,
                        offsets: vec![0x4, 0x4, 0xA4C + status],
                        min: 0.0,
                        max: 1.0,
                        write: WriteKind::Slider,
                    },
                    LevelConfig {
                        name: "Coolant".to_string(),
                        kind: ValueKind::Byte,
                        offsets: vec![0x4, 0x4, 0xA50 + status],
                        min: 0.0,
                        max: 8.0,
                        write: WriteKind::Notch,
                    },
                    LevelConfig {
                        name: "Heat".to_string(),
                        kind: ValueKind::Float,
                        offsets: vec![0x4, 0x4, 0xA54 + status],
                        min: 0.0,
                        max: 1.0,
                        write: WriteKind::None,
                    },
                    LevelConfig {
                        name: "Maximum Health".to_string(),
                        kind: ValueKind::Int,
                        offsets: vec![0x4, 0x4, 0xC58, 0x2F9C + health],
                        min: 0.0,
                        max: 8.0,
                        write: WriteKind::Direct,
                    },
                    LevelConfig {
                        name: "Damage".to_string(),
                        kind: ValueKind::Int,
                        offsets: vec![0x4, 0x4, 0xC58, 0x2F98 + health],
                        min: 0.0,
                        max: 8.0,
                        write: WriteKind::Direct,
                    },
                ],
            }
        })
        .collect()
}

fn anchors(pairs: &[(i32, f64)]) -> Vec<CalibrationPoint> {
    pairs
        .iter()
        .map(|&(height, pixels)| CalibrationPoint::new(height, pixels))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entities_cover_all_columns() {
        let entities = default_entities();
        assert_eq!(entities.len(), 8);
        for (i, entity) in entities.iter().enumerate() {
            assert_eq!(entity.column, i);
            assert_eq!(entity.levels.len(), 5);
        }
    }

    #[test]
    fn test_default_offsets_stride_per_column() {
        let entities = default_entities();
        let warp = &entities[5];
        assert_eq!(warp.name, "Warp");
        assert_eq!(warp.levels[0].offsets, vec![0x4, 0x4, 0xA4C + 0xA0]);
        assert_eq!(warp.levels[1].offsets, vec![0x4, 0x4, 0xA50 + 0xA0]);
        assert_eq!(warp.levels[4].offsets, vec![0x4, 0x4, 0xC58, 0x2F98 + 0x28]);
    }

    #[test]
    fn test_default_versions_are_well_formed() {
        for version in default_versions() {
            assert_eq!(version.exe_sha256.len(), 64);
            assert!(version.base_offset > 0);
        }
    }

    #[test]
    fn test_default_calibration_is_sampleable() {
        let input = default_input();
        // Measured anchor at 600: slider travel spans 15..198 pixels.
        assert_eq!(input.slider.bottom.sample(600), 15.0);
        assert_eq!(input.slider.top.sample(600), 198.0);
        assert!(input.notch.top.sample(1024) > input.notch.bottom.sample(1024));
    }
}
