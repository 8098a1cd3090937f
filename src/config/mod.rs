//! Configuration: loading, validation, and built-in defaults
//!
//! The built-in defaults target Artemis Spaceship Bridge Simulator; a TOML
//! file can override any section to point the engine at a different target
//! or a different set of monitored entities.

mod defaults;
mod loader;
mod validator;

pub use defaults::default_config;
pub use loader::{load_config, ConfigLoader};
pub use loader::{
    Config, ConfigError, EntityConfig, InputConfig, LevelConfig, LoggingConfig, NotchConfig,
    PollConfig, ProcessConfig, SliderConfig, ValueKind, WriteKind,
};
pub use validator::{validate_config, ConfigValidator};

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
