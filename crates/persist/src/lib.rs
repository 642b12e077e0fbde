//! Persistence: the world document, lazy hydration, periodic autosave.
//!
//! # Invariants
//! - The world document is read and written whole; a flush replaces it.
//! - A failed flush is logged and never escalated to the caller.
//! - Shutting down the autosave always attempts one final flush.

pub mod autosave;
pub mod document;
pub mod store;

pub use autosave::{Autosave, DEFAULT_INTERVAL, Flusher};
pub use store::{Placement, Removal, StoreError, WorldStore};
