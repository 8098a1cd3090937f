//! Known-build table: executable content hash to version and base offset

use serde::{Deserialize, Serialize};

/// One recognized build of the target executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownVersion {
    /// Declared version string, e.g. `2.8.0`.
    pub version: String,
    /// Constant added to the main module base to anchor every indirect chain
    /// for this build.
    pub base_offset: i64,
    /// SHA-256 of the executable file on disk, uppercase hex.
    pub exe_sha256: String,
}

/// Static table of recognized target builds.
///
/// Lookup by hash is pure; an unrecognized hash yields `None` rather than an
/// error, so callers can keep polling a build the table does not know.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionTable {
    entries: Vec<KnownVersion>,
}

impl VersionTable {
    pub fn new(entries: Vec<KnownVersion>) -> Self {
        VersionTable { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[KnownVersion] {
        &self.entries
    }

    /// Looks up a build by executable content hash (case-insensitive hex).
    pub fn lookup_hash(&self, exe_sha256: &str) -> Option<&KnownVersion> {
        self.entries
            .iter()
            .find(|entry| entry.exe_sha256.eq_ignore_ascii_case(exe_sha256))
    }

    /// Looks up a build by declared version string.
    pub fn lookup_version(&self, version: &str) -> Option<&KnownVersion> {
        self.entries.iter().find(|entry| entry.version == version)
    }
}
