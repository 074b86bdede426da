//! Aeterna simulation core as a library.
//!
//! The binary crate (`main.rs`) runs the headless simulation loop.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can import domain types, systems and resources directly.

pub mod shared;
pub mod calendar;
pub mod player;
pub mod farming;
pub mod wildlife;
pub mod world;
pub mod crafting;
pub mod foraging;
pub mod inventory;
pub mod missions;
pub mod save;
pub mod data;
