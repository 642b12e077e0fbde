//! File-backed world store with lazy hydration.
//!
//! The in-memory world starts absent. The first read or write loads it from
//! the backing document; until that succeeds, reads report the load error and
//! writes report [`StoreError::NotLoaded`]. Flushing writes the whole world back.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use worldforge_common::{Position, PositionError};
use worldforge_kernel::World;

use crate::autosave::Flusher;
use crate::document;

/// Errors from world store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("world document not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid world document format: {0}")]
    InvalidFormat(#[source] serde_json::Error),
    #[error("world not loaded")]
    NotLoaded,
    #[error("invalid position: {0}")]
    Validation(#[from] PositionError),
    #[error("structure name must not be empty")]
    EmptyStructureName,
    #[error("no structure at position {0}")]
    NotFoundAtPosition(Position),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a successful add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub position: Position,
    pub structure: String,
}

/// Result of a successful remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub position: Position,
    pub removed_structure: String,
}

/// The single owner of the in-memory world and its backing document.
///
/// Every operation holds the world lock for its duration. Flushes are
/// additionally serialized by their own lock so that a slow write can never
/// land after a newer one.
pub struct WorldStore {
    path: PathBuf,
    world: Mutex<Option<World>>,
    flush_lock: Mutex<()>,
}

impl WorldStore {
    /// Create a store backed by the document at `path`. Nothing is read yet.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            world: Mutex::new(None),
            flush_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a world is currently held in memory.
    pub fn is_loaded(&self) -> bool {
        self.lock_world().is_some()
    }

    /// Create an empty backing document if none exists, and load it.
    ///
    /// An existing document is left untouched and loaded as-is.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let mut slot = self.lock_world();
        if slot.is_some() {
            return Ok(());
        }
        if !self.path.exists() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            document::write_world(&self.path, &World::new())?;
            tracing::info!(path = %self.path.display(), "created empty world document");
        }
        hydrate(&self.path, &mut slot)?;
        Ok(())
    }

    /// Return a copy of the whole world, loading it first if needed.
    pub fn get_world(&self) -> Result<World, StoreError> {
        let mut slot = self.lock_world();
        let world = hydrate(&self.path, &mut slot)?;
        Ok(world.clone())
    }

    /// Place `structure` at `position`, replacing any existing entry.
    pub fn add_structure(
        &self,
        position: Position,
        structure: impl Into<String>,
    ) -> Result<Placement, StoreError> {
        let structure = structure.into();
        if structure.is_empty() {
            return Err(StoreError::EmptyStructureName);
        }
        let mut slot = self.lock_world();
        let world = self.loaded(&mut slot)?;
        if let Some(previous) = world.place(position, structure.clone()) {
            tracing::debug!(%position, %previous, %structure, "replaced structure");
        }
        Ok(Placement {
            position,
            structure,
        })
    }

    /// Remove the structure at `position`.
    pub fn remove_structure(&self, position: Position) -> Result<Removal, StoreError> {
        let mut slot = self.lock_world();
        let world = self.loaded(&mut slot)?;
        let removed_structure = world
            .remove(position)
            .ok_or(StoreError::NotFoundAtPosition(position))?;
        Ok(Removal {
            position,
            removed_structure,
        })
    }

    /// Write the in-memory world to the backing document.
    ///
    /// Returns the number of entries written, or `None` when nothing has been
    /// loaded and there is nothing to write.
    pub fn try_flush(&self) -> Result<Option<usize>, StoreError> {
        let _flushing = self
            .flush_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(snapshot) = self.lock_world().clone() else {
            return Ok(None);
        };
        document::write_world(&self.path, &snapshot)?;
        Ok(Some(snapshot.len()))
    }

    fn lock_world(&self) -> MutexGuard<'_, Option<World>> {
        self.world.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hydrate for a mutation, collapsing any load failure into `NotLoaded`.
    fn loaded<'a>(&self, slot: &'a mut Option<World>) -> Result<&'a mut World, StoreError> {
        hydrate(&self.path, slot).map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "world not loaded");
            StoreError::NotLoaded
        })
    }
}

impl Flusher for WorldStore {
    fn flush(&self) {
        match self.try_flush() {
            Ok(Some(entries)) => {
                tracing::info!(path = %self.path.display(), entries, "world flushed");
            }
            Ok(None) => {
                tracing::info!("world never loaded, nothing to flush");
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "world flush failed");
            }
        }
    }
}

/// Load the backing document into `slot` if it is empty.
fn hydrate<'a>(path: &Path, slot: &'a mut Option<World>) -> Result<&'a mut World, StoreError> {
    if slot.is_none() {
        let world = document::read_world(path)?;
        tracing::info!(path = %path.display(), entries = world.len(), "world hydrated");
        *slot = Some(world);
    }
    slot.as_mut().ok_or(StoreError::NotLoaded)
}
