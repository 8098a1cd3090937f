//! Target provider backed by real Windows processes

use crate::config::Config;
use crate::core::types::{AttachError, KnownVersion, VersionTable};
use crate::process::handle::ProcessHandle;
use crate::process::locator::ProcessLocator;
use crate::process::version;
use crate::sync::TargetProvider;
use crate::target::Target;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Locates the configured process and identifies its build by executable
/// hash.
pub struct WindowsTargetProvider {
    locator: ProcessLocator,
    versions: VersionTable,
    dwell: Duration,
}

impl WindowsTargetProvider {
    pub fn new(config: &Config) -> Self {
        WindowsTargetProvider {
            locator: ProcessLocator::from_config(&config.process),
            versions: VersionTable::new(config.versions.clone()),
            dwell: Duration::from_millis(config.input.dwell_ms),
        }
    }
}

impl TargetProvider for WindowsTargetProvider {
    fn locate(&mut self) -> Result<Arc<dyn Target>, AttachError> {
        let pid = self.locator.locate_pid()?;
        let handle = ProcessHandle::open(pid, self.dwell)?;
        info!(pid, path = ?handle.executable_path(), "opened target process");
        Ok(Arc::new(handle))
    }

    fn identify(&self, target: &dyn Target) -> Option<KnownVersion> {
        let path = target.executable_path()?;
        version::identify_build(&self.versions, path)
    }
}
