//! World Kernel: the authoritative mapping of placed structures.
//!
//! # Invariants
//! - Each position key holds at most one structure name.
//! - All state mutations flow through explicit operations.

pub mod sample;
pub mod world;

pub use world::World;
