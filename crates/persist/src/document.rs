//! The world document: a single JSON object of `"x,y,z" -> structure name`.
//!
//! The document is always read and written whole.

use std::io::Write;
use std::path::{Path, PathBuf};
use worldforge_kernel::World;

use crate::StoreError;

/// Read and parse the world document at `path`.
pub fn read_world(path: &Path) -> Result<World, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(StoreError::Io(e)),
    };
    serde_json::from_slice(&bytes).map_err(StoreError::InvalidFormat)
}

/// Overwrite the world document at `path` with `world`.
///
/// Writes a sibling temp file and renames it into place, so the document on
/// disk is always either the old or the new version.
pub fn write_world(path: &Path, world: &World) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(world).map_err(std::io::Error::other)?;
    let tmp = temp_path(path);
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
