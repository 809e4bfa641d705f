//! Host interfaces and environmental evaluation for the Cave Flora engine.
//!
//! This crate models everything the growth engine asks of the world: the
//! host traits it calls into, the suitability scoring built on top of them,
//! and an in-memory host that runs without any game platform.
//!
//! # Modules
//!
//! - [`host`] -- [`WorldGrid`], [`EntityService`], and [`Randomness`] traits,
//!   plus the seeded [`SeededRandomness`].
//! - [`suitability`] -- Fertility, temperature, and light factors, the
//!   combined growth rate, cryostasis, and the spot-validity gates.
//! - [`terrain`] -- Rough-rock and rock-proximity gates, and static
//!   placement checks used before a plant exists.
//! - [`memory`] -- [`MemoryGrid`] and [`MemoryEntities`], the in-memory host.
//! - [`cave`] -- Default starting cave with landmark areas.
//! - [`error`] -- Error types for grid construction and editing.
//!
//! [`WorldGrid`]: host::WorldGrid
//! [`EntityService`]: host::EntityService
//! [`Randomness`]: host::Randomness
//! [`SeededRandomness`]: host::SeededRandomness
//! [`MemoryGrid`]: memory::MemoryGrid
//! [`MemoryEntities`]: memory::MemoryEntities

pub mod cave;
pub mod error;
pub mod host;
pub mod memory;
pub mod suitability;
pub mod terrain;

// Re-export primary types at crate root.
pub use cave::{CaveLandmarks, create_starting_cave};
pub use error::WorldError;
pub use host::{EntityService, Randomness, SeededRandomness, WorldGrid, mtb_event_chance};
pub use memory::{MemoryEntities, MemoryGrid};
pub use suitability::{Suitability, SuitabilityReport, temperature_factor_for};
