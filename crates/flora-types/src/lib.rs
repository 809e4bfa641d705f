//! Shared type definitions for the Cave Flora growth engine.
//!
//! This crate is the single source of truth for the data that flows between
//! the host interfaces, the plant logic, and persistence.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for plants, clusters, and host entities
//! - [`enums`] -- Life stages, destruction causes, dying reasons, glower tiers
//! - [`structs`] -- Grid primitives, species definitions, persistence snapshots

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    DestroyMode, DestructionCause, DyingReason, GlowerTier, LifeStage, MATURE_GROWTH_THRESHOLD,
    SEED_GROWTH_THRESHOLD,
};
pub use ids::{ClusterId, EntityId, PlantId};
pub use structs::{
    Building, ClusterSnapshot, EntityKind, FertilityRange, GlowerHandle, GlowerSpec, LightRange,
    PlantSnapshot, Position, SpeciesDefinition, SpeciesId, TemperatureRange, Terrain,
};
