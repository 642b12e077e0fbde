//! Shared types for the worldforge backend.

mod types;

pub use types::{Position, PositionError};
