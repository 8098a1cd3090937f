//! Builds the monitored entity roster from configuration
//!
//! Each configured entity level becomes a typed property registered with
//! the attachment loop; writable levels get the write strategy their
//! configuration names. The roster keeps the resulting handles addressable
//! by entity and level name for consumers to wire up.

use crate::config::{Config, ConfigError, InputConfig, LevelConfig, ValueKind, WriteKind};
use crate::core::types::{MemValue, MemoryAddress};
use crate::input::{NotchPlanner, SliderPlanner};
use crate::sync::{
    DirectMemoryWrite, RemoteProperty, SyncService, SynthesizedInputWrite, WritableRemoteProperty,
    WriteStrategy,
};
use std::sync::Arc;

/// Typed handle to one entity level.
pub enum LevelHandle {
    Float(Arc<RemoteProperty<f32>>),
    Byte(Arc<RemoteProperty<u8>>),
    Int(Arc<RemoteProperty<i32>>),
    WritableFloat(Arc<WritableRemoteProperty<f32>>),
    WritableByte(Arc<WritableRemoteProperty<u8>>),
    WritableInt(Arc<WritableRemoteProperty<i32>>),
}

/// One monitored value of an entity.
pub struct Level {
    pub name: String,
    pub handle: LevelHandle,
}

/// One monitored entity and its levels, in configuration order.
pub struct Entity {
    pub name: String,
    pub column: usize,
    pub levels: Vec<Level>,
}

impl Entity {
    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.name == name)
    }
}

/// All monitored entities, in configuration order.
pub struct Roster {
    pub entities: Vec<Entity>,
}

impl Roster {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name == name)
    }
}

/// Builds the roster and registers every level with `service`.
///
/// Registration order follows the configuration, so the loop's recompute
/// order (and failure attribution) is deterministic.
pub fn build(config: &Config, service: &SyncService) -> Result<Roster, ConfigError> {
    let mut entities = Vec::with_capacity(config.entities.len());
    for entity in &config.entities {
        let mut levels = Vec::with_capacity(entity.levels.len());
        for level in &entity.levels {
            let handle = build_level(&entity.name, entity.column, level, &config.input, service)?;
            levels.push(Level {
                name: level.name.clone(),
                handle,
            });
        }
        entities.push(Entity {
            name: entity.name.clone(),
            column: entity.column,
            levels,
        });
    }
    Ok(Roster { entities })
}

fn build_level(
    entity: &str,
    column: usize,
    level: &LevelConfig,
    input: &InputConfig,
    service: &SyncService,
) -> Result<LevelHandle, ConfigError> {
    let name = format!("{}/{}", entity, level.name);
    let address = MemoryAddress::versioned(level.offsets.clone());

    let handle = match level.kind {
        ValueKind::Float => {
            let strategy: Option<Box<dyn WriteStrategy<f32>>> = match level.write {
                WriteKind::None => None,
                WriteKind::Direct => Some(Box::new(DirectMemoryWrite)),
                WriteKind::Slider => Some(Box::new(SynthesizedInputWrite::new(
                    SliderPlanner {
                        x_inset: input.slider.x_inset,
                        bottom: input.slider.bottom.clone(),
                        top: input.slider.top.clone(),
                    },
                    column,
                    input.column_count,
                    input.margin_px,
                ))),
                WriteKind::Notch => {
                    return Err(mismatch(&name, "notch writes require a byte level"));
                }
            };
            typed_handle(
                name,
                address,
                strategy,
                level.min as f32,
                level.max as f32,
                service,
                LevelHandle::Float,
                LevelHandle::WritableFloat,
            )
        }
        ValueKind::Byte => {
            let strategy: Option<Box<dyn WriteStrategy<u8>>> = match level.write {
                WriteKind::None => None,
                WriteKind::Direct => Some(Box::new(DirectMemoryWrite)),
                WriteKind::Notch => Some(Box::new(SynthesizedInputWrite::new(
                    NotchPlanner {
                        max_notches: input.notch.max_notches,
                        x_scale: input.notch.x_scale,
                        x_inset: input.notch.x_inset,
                        bottom: input.notch.bottom.clone(),
                        top: input.notch.top.clone(),
                    },
                    column,
                    input.column_count,
                    input.margin_px,
                ))),
                WriteKind::Slider => {
                    return Err(mismatch(&name, "slider writes require a float level"));
                }
            };
            typed_handle(
                name,
                address,
                strategy,
                level.min as u8,
                level.max as u8,
                service,
                LevelHandle::Byte,
                LevelHandle::WritableByte,
            )
        }
        ValueKind::Int => {
            let strategy: Option<Box<dyn WriteStrategy<i32>>> = match level.write {
                WriteKind::None => None,
                WriteKind::Direct => Some(Box::new(DirectMemoryWrite)),
                WriteKind::Slider => {
                    return Err(mismatch(&name, "slider writes require a float level"));
                }
                WriteKind::Notch => {
                    return Err(mismatch(&name, "notch writes require a byte level"));
                }
            };
            typed_handle(
                name,
                address,
                strategy,
                level.min as i32,
                level.max as i32,
                service,
                LevelHandle::Int,
                LevelHandle::WritableInt,
            )
        }
    };
    Ok(handle)
}

#[allow(clippy::too_many_arguments)]
fn typed_handle<T>(
    name: String,
    address: MemoryAddress,
    strategy: Option<Box<dyn WriteStrategy<T>>>,
    min: T,
    max: T,
    service: &SyncService,
    read_only: fn(Arc<RemoteProperty<T>>) -> LevelHandle,
    writable: fn(Arc<WritableRemoteProperty<T>>) -> LevelHandle,
) -> LevelHandle
where
    T: MemValue + PartialOrd,
{
    let property = RemoteProperty::<T>::new(name, address);
    service.register(property.clone());
    match strategy {
        None => read_only(property),
        Some(strategy) => writable(WritableRemoteProperty::new(
            property,
            strategy,
            min,
            max,
            service.target_cell(),
        )),
    }
}

fn mismatch(level: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid(format!("Level '{level}': {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::KnownVersion;
    use crate::sync::PollIntervals;
    use crate::target::fake::FakeTarget;
    use crate::target::Target;

    fn service() -> SyncService {
        SyncService::new(PollIntervals::default())
    }

    #[tokio::test]
    async fn test_default_roster_builds_and_indexes() {
        let service = service();
        let roster = build(&Config::default(), &service).unwrap();

        assert_eq!(roster.entities.len(), 8);
        let warp = roster.entity("Warp").unwrap();
        assert_eq!(warp.column, 5);
        assert!(matches!(
            warp.level("Power").unwrap().handle,
            LevelHandle::WritableFloat(_)
        ));
        assert!(matches!(
            warp.level("Coolant").unwrap().handle,
            LevelHandle::WritableByte(_)
        ));
        assert!(matches!(
            warp.level("Heat").unwrap().handle,
            LevelHandle::Float(_)
        ));
        assert!(matches!(
            warp.level("Damage").unwrap().handle,
            LevelHandle::WritableInt(_)
        ));
        assert!(roster.entity("Unknown").is_none());
    }

    #[tokio::test]
    async fn test_kind_write_mismatch_fails_build() {
        let mut config = Config::default();
        config.entities[0].levels[2].write = WriteKind::Notch;

        let service = service();
        assert!(build(&config, &service).is_err());
    }

    #[tokio::test]
    async fn test_direct_level_writes_through_target() {
        let target = Arc::new(FakeTarget::new(0x400000));
        target.set_version(KnownVersion {
            version: "2.8.0".to_string(),
            base_offset: 0x1000,
            exe_sha256: String::new(),
        });
        // Chain [0x1000, 0x4, 0x4, 0xC58, 0x2F98]: three pointer hops.
        target.load_pointer(0x401000, 0x00500000);
        target.load_pointer(0x00500004, 0x00600000);
        target.load_pointer(0x00600004, 0x00700000);
        target.load_pointer(0x00700C58, 0x00800000);

        let service = service();
        let roster = build(&Config::default(), &service).unwrap();
        service.target_cell().set(target.clone());

        let beams = roster.entity("Beams").unwrap();
        let LevelHandle::WritableInt(damage) = &beams.level("Damage").unwrap().handle else {
            panic!("Expected writable int level");
        };

        damage.set(3).unwrap();
        assert_eq!(
            target.peek_bytes(0x00800000 + 0x2F98, 4).unwrap(),
            3i32.encode()
        );
        // Clamped to the configured maximum of 8.
        damage.set(100).unwrap();
        assert_eq!(
            target.peek_bytes(0x00800000 + 0x2F98, 4).unwrap(),
            8i32.encode()
        );
    }
}
