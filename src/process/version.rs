//! Target build identification by executable content hash
//!
//! Base offsets differ between target builds, so the engine identifies the
//! build by hashing the executable file on disk and looking the digest up
//! in the known-build table. An unrecognized digest leaves the build
//! unidentified; versioned chains simply stay unresolvable.

use crate::core::types::{KnownVersion, VersionTable};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::warn;

/// SHA-256 of the file at `path`, as uppercase hex.
pub fn hash_executable(path: impl AsRef<Path>) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode_upper(hasher.finalize()))
}

/// Hashes the executable at `path` and looks it up in `table`.
pub fn identify_build(table: &VersionTable, path: impl AsRef<Path>) -> Option<KnownVersion> {
    let path = path.as_ref();
    match hash_executable(path) {
        Ok(hash) => {
            let build = table.lookup_hash(&hash).cloned();
            if build.is_none() {
                warn!(path = %path.display(), %hash, "executable hash not in known-build table");
            }
            build
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to hash executable");
            None
        }
    }
}
